//! Anchor placement relative to the viewport corners

use glam::Vec2;

use crate::viewport::Viewport;

/// Fixed reference point and base radius a blob oscillates around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vec2,
    pub radius: f32,
}

impl Anchor {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            radius,
        }
    }
}

/// The four anchors used by the overlay, recomputed on every configure
///
/// Order: bottom-left corner, near the top-right corner, a top-left interior
/// point, bottom-right corner.
pub fn default_anchors(viewport: &Viewport) -> [Anchor; 4] {
    let (w, h) = (viewport.width, viewport.height);
    [
        Anchor::new(0.0, h, 300.0),
        Anchor::new(w - 80.0, 100.0, 85.0),
        Anchor::new(200.0, 220.0, 90.0),
        Anchor::new(w, h, 200.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_follow_viewport() {
        let anchors = default_anchors(&Viewport::new(1000.0, 800.0, 1.0));
        assert_eq!(anchors[0], Anchor::new(0.0, 800.0, 300.0));
        assert_eq!(anchors[1], Anchor::new(920.0, 100.0, 85.0));
        assert_eq!(anchors[2], Anchor::new(200.0, 220.0, 90.0));
        assert_eq!(anchors[3], Anchor::new(1000.0, 800.0, 200.0));

        let resized = default_anchors(&Viewport::new(500.0, 400.0, 2.0));
        assert_eq!(resized[3].position, Vec2::new(500.0, 400.0));
        // Interior anchor is fixed in logical space
        assert_eq!(resized[2], anchors[2]);
    }
}
