//! Organic blob shapes
//!
//! A blob's outline at time `t` (ms):
//! - center drifts on a Lissajous-like path around its anchor
//! - each outline point wobbles radially with its own phase offset

use glam::Vec2;
use std::f64::consts::TAU;

use super::anchor::Anchor;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Animation constants shared by every blob in a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobParams {
    pub point_count: usize,
    pub phase_stride: f32,
    /// Center drift amplitude (px) on each axis
    pub amplitude: Vec2,
    /// Center drift speed (rad/ms)
    pub move_speed: f32,
    /// Radial wobble amplitude (px)
    pub noise_amplitude: f32,
    /// Radial wobble speed (rad/ms)
    pub noise_speed: f32,
    pub phase: f32,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINTS_PER_BLOB,
            phase_stride: PHASE_STRIDE,
            amplitude: Vec2::new(DRIFT_AMPLITUDE_X, DRIFT_AMPLITUDE_Y),
            move_speed: DRIFT_SPEED,
            noise_amplitude: EDGE_NOISE_AMPLITUDE,
            noise_speed: EDGE_NOISE_SPEED,
            phase: BLOB_PHASE,
        }
    }
}

/// A single animated shape generator
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub anchor: Vec2,
    pub base_radius: f32,
    /// One phase offset per outline point
    pub phase_offsets: Vec<f32>,
    pub amplitude: Vec2,
    pub move_speed: f32,
    pub noise_amplitude: f32,
    pub noise_speed: f32,
    pub phase: f32,
}

impl Blob {
    pub fn new(anchor: Anchor, params: &BlobParams) -> Self {
        let point_count = params.point_count.max(MIN_POINTS_PER_BLOB);
        Self {
            anchor: anchor.position,
            base_radius: anchor.radius,
            phase_offsets: (0..point_count)
                .map(|i| i as f32 * params.phase_stride)
                .collect(),
            amplitude: params.amplitude,
            move_speed: params.move_speed,
            noise_amplitude: params.noise_amplitude,
            noise_speed: params.noise_speed,
            phase: params.phase,
        }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.phase_offsets.len()
    }

    /// Drifted center at time `t`
    pub fn center_at(&self, time_ms: f64) -> Vec2 {
        let drift = time_ms * f64::from(self.move_speed);
        let phase = f64::from(self.phase);
        let phase_y = phase * f64::from(PHASE_Y_FACTOR);
        Vec2::new(
            self.anchor.x + (drift + phase).cos() as f32 * self.amplitude.x,
            self.anchor.y + (drift + phase_y).sin() as f32 * self.amplitude.y,
        )
    }

    /// Radius of outline point `index` at time `t`
    pub fn radius_at(&self, index: usize, time_ms: f64) -> f32 {
        let offset = f64::from(self.phase_offsets[index]);
        let wobble = (time_ms * f64::from(self.noise_speed) + offset).sin() as f32;
        self.base_radius + wobble * self.noise_amplitude
    }

    /// Closed outline at time `t`; the last point connects back to the first
    pub fn sample_outline(&self, time_ms: f64) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.point_count());
        self.sample_outline_into(time_ms, &mut out);
        out
    }

    /// Same as [`Blob::sample_outline`], reusing `out`'s allocation
    pub fn sample_outline_into(&self, time_ms: f64, out: &mut Vec<Vec2>) {
        out.clear();
        let center = self.center_at(time_ms);
        let n = self.point_count();
        out.extend((0..n).map(|i| {
            let angle = (i as f64 / n as f64 * TAU) as f32;
            center + polar_to_cartesian(self.radius_at(i, time_ms), angle)
        }));
    }
}

/// Ordered set of blobs; order is paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlobField {
    blobs: Vec<Blob>,
}

impl BlobField {
    /// One blob per anchor, in anchor order
    pub fn new(anchors: &[Anchor], params: &BlobParams) -> Self {
        Self {
            blobs: anchors.iter().map(|a| Blob::new(*a, params)).collect(),
        }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Blob> {
        self.blobs.iter()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::default_anchors;
    use crate::viewport::Viewport;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn test_blob() -> Blob {
        Blob::new(Anchor::new(200.0, 220.0, 90.0), &BlobParams::default())
    }

    #[test]
    fn test_phase_offsets_use_stride() {
        let blob = test_blob();
        assert_eq!(blob.point_count(), 60);
        assert_eq!(blob.phase_offsets[0], 0.0);
        assert_eq!(blob.phase_offsets[1], 137.0);
        assert_eq!(blob.phase_offsets[59], 59.0 * 137.0);
    }

    #[test]
    fn test_field_preserves_anchor_order() {
        let anchors = default_anchors(&Viewport::new(1000.0, 800.0, 1.0));
        let field = BlobField::new(&anchors, &BlobParams::default());
        assert_eq!(field.len(), 4);
        for (blob, anchor) in field.iter().zip(anchors.iter()) {
            assert_eq!(blob.anchor, anchor.position);
            assert_eq!(blob.base_radius, anchor.radius);
            assert_eq!(blob.phase, BLOB_PHASE);
        }
    }

    #[test]
    fn test_outline_is_deterministic() {
        let blob = test_blob();
        assert_eq!(blob.sample_outline(1234.5), blob.sample_outline(1234.5));

        let mut reused = vec![Vec2::ZERO; 3];
        blob.sample_outline_into(1234.5, &mut reused);
        assert_eq!(reused, blob.sample_outline(1234.5));
    }

    #[test]
    fn test_outline_matches_closed_form_at_zero() {
        let blob = test_blob();
        let outline = blob.sample_outline(0.0);
        let cx = 200.0 + (500.0_f64).cos() as f32 * 40.0;
        let cy = 220.0 + (350.0_f64).sin() as f32 * 30.0;
        // Point 0: angle 0, offset 0 -> no wobble at t = 0
        assert!((outline[0].x - (cx + 90.0)).abs() < EPS);
        assert!((outline[0].y - cy).abs() < EPS);
    }

    #[test]
    fn test_outline_advances_over_time() {
        let blob = test_blob();
        assert_ne!(blob.sample_outline(0.0), blob.sample_outline(1000.0));
    }

    #[test]
    fn test_small_point_count_is_clamped() {
        let params = BlobParams {
            point_count: 0,
            ..Default::default()
        };
        let blob = Blob::new(Anchor::new(0.0, 0.0, 10.0), &params);
        assert_eq!(blob.sample_outline(0.0).len(), MIN_POINTS_PER_BLOB);
    }

    proptest! {
        #[test]
        fn prop_outline_has_point_count(t in 0.0f64..1.0e8, n in 3usize..200) {
            let params = BlobParams { point_count: n, ..Default::default() };
            let blob = Blob::new(Anchor::new(10.0, 20.0, 50.0), &params);
            prop_assert_eq!(blob.sample_outline(t).len(), n);
        }

        #[test]
        fn prop_drift_is_bounded(t in 0.0f64..1.0e8) {
            let blob = test_blob();
            let c = blob.center_at(t);
            prop_assert!((c.x - blob.anchor.x).abs() <= blob.amplitude.x + EPS);
            prop_assert!((c.y - blob.anchor.y).abs() <= blob.amplitude.y + EPS);
        }

        #[test]
        fn prop_radius_is_bounded(t in 0.0f64..1.0e8) {
            let blob = test_blob();
            let center = blob.center_at(t);
            let lo = blob.base_radius - blob.noise_amplitude - EPS;
            let hi = blob.base_radius + blob.noise_amplitude + EPS;
            for p in blob.sample_outline(t) {
                let r = p.distance(center);
                prop_assert!(r >= lo && r <= hi, "radius {} outside [{}, {}]", r, lo, hi);
            }
        }
    }
}
