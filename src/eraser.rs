//! Brush eraser
//!
//! Pointer drags paint round-capped black strokes onto the accumulation
//! surface. The compositor later removes that coverage from the mask, so
//! every stroke is a permanent hole until the next resize.

use glam::Vec2;

use crate::renderer::{Color, Paint, RasterTarget};

/// Drag session state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EraserState {
    #[default]
    Idle,
    /// Pointer is down; `last_point` is where the previous segment ended
    Erasing { last_point: Option<Vec2> },
}

/// One stroke between two consecutive pointer samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub from: Vec2,
    pub to: Vec2,
    pub radius: f32,
}

impl StrokeSegment {
    /// Bake the segment into `surface` (opaque black, drawn over)
    pub fn paint<S: RasterTarget>(&self, surface: &mut S) {
        surface.stroke_segment(self.from, self.to, self.radius * 2.0, &Paint::solid(Color::BLACK));
    }
}

/// Pointer gesture handler for the accumulation surface
#[derive(Debug, Clone)]
pub struct Eraser {
    radius: f32,
    state: EraserState,
}

impl Eraser {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            state: EraserState::Idle,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn state(&self) -> EraserState {
        self.state
    }

    pub fn is_erasing(&self) -> bool {
        matches!(self.state, EraserState::Erasing { .. })
    }

    /// Start a drag at `point`
    pub fn pointer_down(&mut self, point: Vec2) {
        self.state = EraserState::Erasing {
            last_point: Some(point),
        };
        log::debug!("Erase started at ({:.1}, {:.1})", point.x, point.y);
    }

    /// Continue a drag; paints and returns the segment, or `None` when idle
    ///
    /// With no previous point the segment degenerates to a dot at `point`.
    pub fn pointer_move<S: RasterTarget>(
        &mut self,
        point: Vec2,
        surface: &mut S,
    ) -> Option<StrokeSegment> {
        let EraserState::Erasing { last_point } = self.state else {
            return None;
        };

        let segment = StrokeSegment {
            from: last_point.unwrap_or(point),
            to: point,
            radius: self.radius,
        };
        segment.paint(surface);
        self.state = EraserState::Erasing {
            last_point: Some(point),
        };
        Some(segment)
    }

    /// End a drag (pointer released or left the surface)
    pub fn pointer_up(&mut self) {
        if self.is_erasing() {
            log::debug!("Erase ended");
        }
        self.state = EraserState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Surface;
    use crate::renderer::sdf::segment_distance;

    fn surface(w: u32, h: u32, scale: f32) -> Surface {
        let mut s = Surface::new(w, h);
        s.set_scale(scale);
        s
    }

    #[test]
    fn test_idle_moves_do_not_erase() {
        let mut eraser = Eraser::new(40.0);
        let mut acc = surface(200, 200, 1.0);
        assert!(eraser.pointer_move(Vec2::new(100.0, 100.0), &mut acc).is_none());
        assert!(acc.is_transparent());
        assert_eq!(eraser.state(), EraserState::Idle);
    }

    #[test]
    fn test_state_transitions() {
        let mut eraser = Eraser::new(10.0);
        let mut acc = surface(100, 100, 1.0);

        eraser.pointer_down(Vec2::new(10.0, 10.0));
        assert_eq!(
            eraser.state(),
            EraserState::Erasing {
                last_point: Some(Vec2::new(10.0, 10.0))
            }
        );

        let seg = eraser.pointer_move(Vec2::new(30.0, 10.0), &mut acc).unwrap();
        assert_eq!(seg.from, Vec2::new(10.0, 10.0));
        assert_eq!(seg.to, Vec2::new(30.0, 10.0));
        assert_eq!(seg.radius, 10.0);

        let seg = eraser.pointer_move(Vec2::new(30.0, 40.0), &mut acc).unwrap();
        assert_eq!(seg.from, Vec2::new(30.0, 10.0));

        eraser.pointer_up();
        assert!(!eraser.is_erasing());
        assert!(eraser.pointer_move(Vec2::new(80.0, 80.0), &mut acc).is_none());
        assert_eq!(acc.alpha_at(80, 80), 0);
    }

    #[test]
    fn test_stroke_erases_within_radius_only() {
        let (a, b, r) = (Vec2::new(100.0, 100.0), Vec2::new(300.0, 200.0), 40.0);
        let mut eraser = Eraser::new(r);
        let mut acc = surface(400, 320, 1.0);
        eraser.pointer_down(a);
        eraser.pointer_move(b, &mut acc);

        for y in 0..320 {
            for x in 0..400 {
                let d = segment_distance(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), a, b);
                let alpha = acc.alpha_at(x, y);
                if d <= r - 1.0 {
                    assert_eq!(alpha, 255, "({x}, {y}) at distance {d}");
                } else if d >= r + 1.0 {
                    assert_eq!(alpha, 0, "({x}, {y}) at distance {d}");
                }
            }
        }
    }

    #[test]
    fn test_stroke_respects_pixel_density() {
        let mut eraser = Eraser::new(10.0);
        let mut acc = surface(200, 200, 2.0);
        eraser.pointer_down(Vec2::new(20.0, 50.0));
        eraser.pointer_move(Vec2::new(80.0, 50.0), &mut acc);

        // Logical (50, 50) -> device (100, 100); radius 20 device px
        assert_eq!(acc.alpha_at(100, 100), 255);
        assert_eq!(acc.alpha_at(100, 118), 255);
        assert_eq!(acc.alpha_at(100, 122), 0);
    }

    #[test]
    fn test_missing_last_point_paints_a_dot() {
        let mut eraser = Eraser {
            radius: 5.0,
            state: EraserState::Erasing { last_point: None },
        };
        let mut acc = surface(50, 50, 1.0);
        let seg = eraser.pointer_move(Vec2::new(25.0, 25.0), &mut acc).unwrap();
        assert_eq!(seg.from, seg.to);
        assert_eq!(acc.alpha_at(25, 25), 255);
        assert_eq!(acc.alpha_at(25, 35), 0);
    }
}
