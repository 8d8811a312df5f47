//! Viewport state and the two raster surfaces sized from it
//!
//! Both surfaces are always `ceil(width * density) x ceil(height * density)`
//! pixels with a `density` scale applied, so drawing code uses logical px.

use crate::renderer::{RasterTarget, Surface};

/// Smallest logical extent accepted for either axis
pub const MIN_EXTENT: f32 = 1.0;

/// Logical size and pixel density of the drawable area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_density: f32,
}

impl Viewport {
    /// Build a viewport, clamping zero/negative/non-finite values
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
            pixel_density: if pixel_density.is_finite() && pixel_density > 0.0 {
                pixel_density
            } else {
                1.0
            },
        }
    }

    /// Backing surface size in device pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            device_extent(self.width, self.pixel_density),
            device_extent(self.height, self.pixel_density),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_EXTENT, MIN_EXTENT, 1.0)
    }
}

fn clamp_extent(v: f32) -> f32 {
    if v.is_finite() { v.max(MIN_EXTENT) } else { MIN_EXTENT }
}

fn device_extent(logical: f32, density: f32) -> u32 {
    (logical * density).ceil().max(1.0) as u32
}

/// Owns the viewport and keeps the mask and accumulation surfaces in sync
#[derive(Debug, Clone)]
pub struct ViewportManager<S = Surface> {
    viewport: Viewport,
    mask: S,
    accumulation: S,
}

impl ViewportManager<Surface> {
    /// CPU-backed surfaces
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self::with_surfaces(Surface::new(1, 1), Surface::new(1, 1), width, height, pixel_density)
    }
}

impl<S: RasterTarget> ViewportManager<S> {
    /// Take ownership of two surfaces and size them for the viewport
    pub fn with_surfaces(mask: S, accumulation: S, width: f32, height: f32, pixel_density: f32) -> Self {
        let mut manager = Self {
            viewport: Viewport::default(),
            mask,
            accumulation,
        };
        manager.configure(width, height, pixel_density);
        manager
    }

    /// (Re)allocate both surfaces for a new viewport
    ///
    /// Discards every erasure stroke recorded so far.
    pub fn configure(&mut self, width: f32, height: f32, pixel_density: f32) {
        self.viewport = Viewport::new(width, height, pixel_density);
        let (pw, ph) = self.viewport.pixel_size();
        let scale = self.viewport.pixel_density;

        for surface in [&mut self.mask, &mut self.accumulation] {
            surface.resize(pw, ph);
            surface.set_scale(scale);
        }
        self.accumulation.clear();

        log::debug!(
            "Viewport configured: {}x{} @{} -> {}x{} px",
            self.viewport.width,
            self.viewport.height,
            scale,
            pw,
            ph
        );
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mask(&self) -> &S {
        &self.mask
    }

    pub fn accumulation(&self) -> &S {
        &self.accumulation
    }

    pub fn accumulation_mut(&mut self) -> &mut S {
        &mut self.accumulation
    }

    /// Mask for writing plus accumulation for reading, borrowed together
    pub fn surfaces_mut(&mut self) -> (&mut S, &S) {
        (&mut self.mask, &self.accumulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Color, Paint};
    use glam::Vec2;

    #[test]
    fn test_pixel_size_rounds_up() {
        assert_eq!(Viewport::new(1000.0, 800.0, 1.0).pixel_size(), (1000, 800));
        assert_eq!(Viewport::new(100.5, 10.0, 2.0).pixel_size(), (201, 20));
        assert_eq!(Viewport::new(10.0, 10.0, 1.5).pixel_size(), (15, 15));
        assert_eq!(Viewport::new(3.0, 3.0, 1.25).pixel_size(), (4, 4));
    }

    #[test]
    fn test_degenerate_viewport_is_clamped() {
        let vp = Viewport::new(0.0, -20.0, 0.0);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
        assert_eq!(vp.pixel_density, 1.0);
        assert_eq!(vp.pixel_size(), (1, 1));

        let vp = Viewport::new(f32::NAN, f32::INFINITY, f32::NAN);
        assert_eq!(vp.pixel_size(), (1, 1));
    }

    #[test]
    fn test_configure_sizes_both_surfaces() {
        let mut vm = ViewportManager::new(640.0, 480.0, 2.0);
        assert_eq!((vm.mask().width(), vm.mask().height()), (1280, 960));
        assert_eq!(
            (vm.accumulation().width(), vm.accumulation().height()),
            (1280, 960)
        );
        assert_eq!(vm.mask().scale(), 2.0);
        assert_eq!(vm.accumulation().scale(), 2.0);

        vm.configure(0.0, 0.0, 1.0);
        assert_eq!((vm.mask().width(), vm.mask().height()), (1, 1));
        assert_eq!((vm.accumulation().width(), vm.accumulation().height()), (1, 1));
    }

    #[test]
    fn test_configure_clears_accumulation() {
        let mut vm = ViewportManager::new(200.0, 200.0, 1.0);
        vm.accumulation_mut().stroke_segment(
            Vec2::new(50.0, 50.0),
            Vec2::new(150.0, 50.0),
            20.0,
            &Paint::solid(Color::BLACK),
        );
        assert_eq!(vm.accumulation().alpha_at(100, 50), 255);

        vm.configure(200.0, 200.0, 1.0);
        assert!(vm.accumulation().is_transparent());
    }
}
