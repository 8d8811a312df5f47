//! Distance helpers for round-capped stroke coverage

use glam::Vec2;

/// Unsigned distance from `p` to the segment `a`-`b`
///
/// Degenerates to point distance when `a == b`.
pub fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Signed distance to a round-capped segment (capsule) of the given radius
#[inline]
pub fn sd_capsule(p: Vec2, a: Vec2, b: Vec2, radius: f32) -> f32 {
    segment_distance(p, a, b) - radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_capsule_sign() {
        let (a, b) = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(sd_capsule(Vec2::new(5.0, 1.0), a, b, 2.0) < 0.0);
        assert!(sd_capsule(Vec2::new(5.0, 2.0), a, b, 2.0).abs() < 1e-6);
        assert!(sd_capsule(Vec2::new(12.5, 0.0), a, b, 2.0) > 0.0);
    }

    #[test]
    fn test_segment_distance_regions() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Beside the segment
        assert!((segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        // Past the end caps
        assert!((segment_distance(Vec2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-6);
        assert!((segment_distance(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_segment_is_a_dot() {
        let a = Vec2::new(3.0, 4.0);
        assert!((segment_distance(Vec2::ZERO, a, a) - 5.0).abs() < 1e-6);
        assert!(sd_capsule(Vec2::new(3.0, 5.0), a, a, 2.0) < 0.0);
    }
}
