//! Drawing backend seam
//!
//! The compositor and eraser only need these calls. `Surface` implements
//! them on the CPU; the browser host implements them on a 2D canvas
//! context so per-frame work stays on the browser's rasterizer.

use glam::Vec2;

use super::surface::{CompositeMode, Paint};

/// A drawable surface addressed in logical coordinates
pub trait RasterTarget {
    /// Resize the backing store to `width x height` device pixels; content
    /// becomes transparent
    fn resize(&mut self, width: u32, height: u32);

    /// Logical-to-device scale applied to every drawing call
    fn set_scale(&mut self, scale: f32);

    /// Reset to fully transparent
    fn clear(&mut self);

    /// Paint the whole surface
    fn fill(&mut self, paint: &Paint);

    /// Fill a closed polygon, blurred by `paint.blur` logical px
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);

    /// Round-capped line of `width` from `from` to `to`
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint);

    /// Composite `src` 1:1 in device pixels, anchored at the origin
    fn draw_surface(&mut self, src: &Self, mode: CompositeMode);
}
