//! Coverage masks for filled polygons and round-capped strokes
//!
//! All coordinates here are device pixels. A pixel `(x, y)` spans
//! `[x, x + 1) x [y, y + 1)` and is sampled at its center for strokes.

use glam::Vec2;

use super::sdf::sd_capsule;

/// Sub-scanlines per pixel row for polygon anti-aliasing
const SUBSAMPLES: usize = 4;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering a surface of `width x height` pixels
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Smallest pixel rectangle containing the bounds `[min, max]`
    pub fn enclosing(min: Vec2, max: Vec2) -> Self {
        Self::new(
            saturate(min.x.floor()),
            saturate(min.y.floor()),
            saturate(max.x.ceil()),
            saturate(max.y.ceil()),
        )
    }

    pub fn expand(self, pad: i32) -> Self {
        Self::new(
            self.x0.saturating_sub(pad),
            self.y0.saturating_sub(pad),
            self.x1.saturating_add(pad),
            self.y1.saturating_add(pad),
        )
    }

    pub fn intersect(self, other: Self) -> Self {
        Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.x1 - self.x0).max(0) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.y1 - self.y0).max(0) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

fn saturate(v: f32) -> i32 {
    if v.is_nan() {
        0
    } else {
        v.clamp(i32::MIN as f32, i32::MAX as f32) as i32
    }
}

/// Per-pixel coverage in `[0, 1]` over a rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    pub rect: PixelRect,
    pub data: Vec<f32>,
}

impl Coverage {
    pub fn new(rect: PixelRect) -> Self {
        let rect = if rect.is_empty() {
            PixelRect::new(rect.x0, rect.y0, rect.x0, rect.y0)
        } else {
            rect
        };
        Self {
            data: vec![0.0; rect.width() * rect.height()],
            rect,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Coverage at absolute pixel `(x, y)`; zero outside the rectangle
    pub fn get(&self, x: i32, y: i32) -> f32 {
        let r = &self.rect;
        if x < r.x0 || y < r.y0 || x >= r.x1 || y >= r.y1 {
            return 0.0;
        }
        let idx = (y - r.y0) as usize * self.width() + (x - r.x0) as usize;
        self.data[idx]
    }

    /// Nonzero-winding fill of a closed polygon
    ///
    /// The mask covers the polygon bounds grown by `padding` (room for a
    /// later blur), clipped to `clip`.
    pub fn polygon(points: &[Vec2], padding: i32, clip: PixelRect) -> Self {
        if points.len() < 3 {
            return Self::new(PixelRect::new(0, 0, 0, 0));
        }

        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let mut cov = Self::new(PixelRect::enclosing(min, max).expand(padding).intersect(clip));
        if cov.is_empty() {
            return cov;
        }

        let edges: Vec<(Vec2, Vec2)> = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .filter(|(a, b)| a.y != b.y)
            .map(|(a, b)| (*a, *b))
            .collect();

        let width = cov.width();
        let x_origin = cov.rect.x0 as f32;
        let weight = 1.0 / SUBSAMPLES as f32;
        let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(16);

        for row in 0..cov.height() {
            let py = (cov.rect.y0 + row as i32) as f32;
            let line = &mut cov.data[row * width..(row + 1) * width];

            for s in 0..SUBSAMPLES {
                let sy = py + (s as f32 + 0.5) * weight;
                crossings.clear();
                for (a, b) in &edges {
                    let upward = a.y <= sy && b.y > sy;
                    let downward = b.y <= sy && a.y > sy;
                    if upward || downward {
                        let t = (sy - a.y) / (b.y - a.y);
                        let x = a.x + t * (b.x - a.x);
                        crossings.push((x - x_origin, if upward { 1 } else { -1 }));
                    }
                }
                crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, dir) in &crossings {
                    let was_inside = winding != 0;
                    winding += dir;
                    match (was_inside, winding != 0) {
                        (false, true) => span_start = x,
                        (true, false) => accumulate_span(line, span_start, x, weight),
                        _ => {}
                    }
                }
            }
        }

        for c in &mut cov.data {
            *c = c.min(1.0);
        }
        cov
    }

    /// Round-capped stroke of half-width `radius` from `a` to `b`
    ///
    /// Pixel centers within `radius - 0.5` are fully covered; coverage falls
    /// off linearly over one pixel.
    pub fn capsule(a: Vec2, b: Vec2, radius: f32, clip: PixelRect) -> Self {
        if radius.is_nan() || radius <= 0.0 {
            return Self::new(PixelRect::new(0, 0, 0, 0));
        }

        let reach = Vec2::splat(radius + 1.0);
        let rect = PixelRect::enclosing(a.min(b) - reach, a.max(b) + reach).intersect(clip);
        let mut cov = Self::new(rect);
        let width = cov.width();

        for row in 0..cov.height() {
            let cy = (rect.y0 + row as i32) as f32 + 0.5;
            for col in 0..width {
                let cx = (rect.x0 + col as i32) as f32 + 0.5;
                let d = sd_capsule(Vec2::new(cx, cy), a, b, radius);
                cov.data[row * width + col] = (0.5 - d).clamp(0.0, 1.0);
            }
        }
        cov
    }
}

/// Add `weight` times the covered length of `[start, end)` to each cell
fn accumulate_span(line: &mut [f32], start: f32, end: f32, weight: f32) {
    let len = line.len() as f32;
    let (a, b) = (start.clamp(0.0, len), end.clamp(0.0, len));
    if b <= a {
        return;
    }

    let ia = a.floor() as usize;
    let ib = b.floor() as usize;
    if ia == ib {
        line[ia] += (b - a) * weight;
        return;
    }

    line[ia] += (ia as f32 + 1.0 - a) * weight;
    for cell in &mut line[ia + 1..ib] {
        *cell += weight;
    }
    if ib < line.len() {
        line[ib] += (b - ib as f32) * weight;
    }
}
