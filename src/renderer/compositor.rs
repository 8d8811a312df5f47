//! Per-frame mask composition
//!
//! Each frame, in order:
//! 1. clear the mask and fill it opaque white
//! 2. punch every blob outline out with a blurred destination-out fill
//! 3. punch the accumulated erasure strokes out, unblurred

use glam::Vec2;

use super::surface::{Color, CompositeMode, Paint};
use super::target::RasterTarget;
use crate::field::BlobField;

/// Renders the mask from a blob field and the accumulation surface
#[derive(Debug, Clone)]
pub struct Compositor {
    blur_px: f32,
    outline: Vec<Vec2>,
    frames: u64,
}

impl Compositor {
    pub fn new(blur_px: f32) -> Self {
        Self {
            blur_px,
            outline: Vec::new(),
            frames: 0,
        }
    }

    pub fn blur_px(&self) -> f32 {
        self.blur_px
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recompose `mask` for time `t` (ms)
    pub fn render_frame<S: RasterTarget>(
        &mut self,
        mask: &mut S,
        accumulation: &S,
        field: &BlobField,
        time_ms: f64,
    ) {
        mask.clear();
        mask.fill(&Paint::solid(Color::WHITE));

        let hole = Paint::solid(Color::BLACK)
            .with_mode(CompositeMode::DestinationOut)
            .with_blur(self.blur_px);
        for blob in field.iter() {
            blob.sample_outline_into(time_ms, &mut self.outline);
            mask.fill_polygon(&self.outline, &hole);
        }

        mask.draw_surface(accumulation, CompositeMode::DestinationOut);
        self.frames += 1;
    }
}
