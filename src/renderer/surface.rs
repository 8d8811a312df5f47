//! Premultiplied RGBA8 raster surface with a logical-to-pixel scale
//!
//! Drawing calls take logical coordinates; the surface multiplies them by its
//! scale (the viewport's pixel density) before rasterizing.

use glam::Vec2;

use super::blur::{blur, blur_padding};
use super::raster::{Coverage, PixelRect};
use super::target::RasterTarget;

/// Straight-alpha color, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn premultiplied(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r.clamp(0.0, 1.0) * a,
            self.g.clamp(0.0, 1.0) * a,
            self.b.clamp(0.0, 1.0) * a,
            a,
        ]
    }
}

/// How new coverage combines with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Draw over existing content
    #[default]
    SourceOver,
    /// Remove existing coverage where the new shape has coverage
    DestinationOut,
}

/// Fill/stroke style for one drawing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub mode: CompositeMode,
    /// Gaussian stddev applied to the shape's coverage (logical px)
    pub blur: f32,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            mode: CompositeMode::SourceOver,
            blur: 0.0,
        }
    }

    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }
}

/// CPU raster surface
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    scale: f32,
    /// Premultiplied RGBA, row-major
    pixels: Vec<u8>,
}

impl Surface {
    /// Transparent surface of at least 1x1 pixels
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Reallocate to a new size; content becomes transparent
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixels.clear();
        let len = self.width as usize * self.height as usize * 4;
        self.pixels.resize(len, 0);
    }

    /// Logical-to-pixel scale used by every drawing call
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Raw premultiplied RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::of_size(self.width, self.height)
    }

    /// Premultiplied RGBA at a device pixel
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[self.index(x, y) + 3]
    }

    /// Whether every pixel is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Reset to fully transparent
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Paint the whole surface
    pub fn fill(&mut self, paint: &Paint) {
        let src = paint.color.premultiplied();
        match paint.mode {
            CompositeMode::SourceOver if src[3] >= 1.0 => {
                let bytes = src.map(to_byte);
                for px in self.pixels.chunks_exact_mut(4) {
                    px.copy_from_slice(&bytes);
                }
            }
            CompositeMode::DestinationOut if src[3] >= 1.0 => self.clear(),
            mode => {
                for px in self.pixels.chunks_exact_mut(4) {
                    blend(px, src, 1.0, mode);
                }
            }
        }
    }

    /// Fill a closed polygon given in logical coordinates
    ///
    /// Blur radius and padding are capped at the surface's longer side, so
    /// the work per call stays bounded by the surface size.
    pub fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        let extent = self.width.max(self.height);
        let sigma = (paint.blur.max(0.0) * self.scale).min(extent as f32);
        let pad = blur_padding(sigma).min(extent as i32);
        let device: Vec<Vec2> = points.iter().map(|p| *p * self.scale).collect();

        let mut cov = Coverage::polygon(&device, pad, self.bounds().expand(pad));
        blur(&mut cov, sigma);
        self.apply(&cov, paint);
    }

    /// Round-capped, round-joined line of `width` from `from` to `to`
    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        let radius = width * 0.5 * self.scale;
        let cov = Coverage::capsule(from * self.scale, to * self.scale, radius, self.bounds());
        self.apply(&cov, paint);
    }

    /// Composite another surface 1:1 in device pixels, anchored at the origin
    pub fn draw_surface(&mut self, src: &Surface, mode: CompositeMode) {
        let w = self.width.min(src.width) as usize;
        let h = self.height.min(src.height) as usize;

        for y in 0..h {
            let dst_row = y * self.width as usize * 4;
            let src_row = y * src.width as usize * 4;
            let dst = &mut self.pixels[dst_row..dst_row + w * 4];
            let from = &src.pixels[src_row..src_row + w * 4];

            for (d, s) in dst.chunks_exact_mut(4).zip(from.chunks_exact(4)) {
                if s[3] == 0 {
                    continue;
                }
                let s = [unit(s[0]), unit(s[1]), unit(s[2]), unit(s[3])];
                blend(d, s, 1.0, mode);
            }
        }
    }

    /// Straight-alpha RGBA, as expected by PNG encoders
    pub fn write_straight_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let unpremultiply =
                |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
            out.extend_from_slice(&[
                unpremultiply(px[0]),
                unpremultiply(px[1]),
                unpremultiply(px[2]),
                a,
            ]);
        }
    }

    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_straight_rgba(&mut out);
        out
    }

    fn apply(&mut self, cov: &Coverage, paint: &Paint) {
        let rect = cov.rect.intersect(self.bounds());
        if rect.is_empty() {
            return;
        }
        let src = paint.color.premultiplied();
        let stride = self.width as usize * 4;

        for y in rect.y0..rect.y1 {
            let row = y as usize * stride;
            for x in rect.x0..rect.x1 {
                let k = cov.get(x, y);
                if k <= 0.0 {
                    continue;
                }
                let i = row + x as usize * 4;
                blend(&mut self.pixels[i..i + 4], src, k, paint.mode);
            }
        }
    }
}

impl RasterTarget for Surface {
    fn resize(&mut self, width: u32, height: u32) {
        Surface::resize(self, width, height);
    }

    fn set_scale(&mut self, scale: f32) {
        Surface::set_scale(self, scale);
    }

    fn clear(&mut self) {
        Surface::clear(self);
    }

    fn fill(&mut self, paint: &Paint) {
        Surface::fill(self, paint);
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        Surface::fill_polygon(self, points, paint);
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        Surface::stroke_segment(self, from, to, width, paint);
    }

    fn draw_surface(&mut self, src: &Self, mode: CompositeMode) {
        Surface::draw_surface(self, src, mode);
    }
}

#[inline]
fn unit(c: u8) -> f32 {
    c as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Blend premultiplied `src` scaled by coverage `k` into one pixel
fn blend(px: &mut [u8], src: [f32; 4], k: f32, mode: CompositeMode) {
    let src_alpha = src[3] * k;
    match mode {
        CompositeMode::SourceOver => {
            for (c, s) in px.iter_mut().zip(src) {
                *c = to_byte(s * k + unit(*c) * (1.0 - src_alpha));
            }
        }
        CompositeMode::DestinationOut => {
            for c in px.iter_mut() {
                *c = to_byte(unit(*c) * (1.0 - src_alpha));
            }
        }
    }
}
