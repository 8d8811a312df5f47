//! Overlay settings
//!
//! Supplied by the host at mount time, either as a JSON string or through the
//! canvas `data-overlay` attribute.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::field::BlobParams;

/// Mount configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlaySettings {
    /// Number of blobs taken from the anchor list (capped at its length)
    pub blob_count: usize,
    /// Softness of blob edges (gaussian stddev, logical px, at most
    /// `MAX_BLUR_PX`)
    pub blur_px: f32,
    /// Brush radius (logical px)
    pub eraser_radius: f32,
    /// Polygon points per blob outline
    pub points_per_blob: usize,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            blob_count: DEFAULT_BLOB_COUNT,
            blur_px: DEFAULT_BLUR_PX,
            eraser_radius: DEFAULT_ERASER_RADIUS,
            points_per_blob: DEFAULT_POINTS_PER_BLOB,
        }
    }
}

impl OverlaySettings {
    /// Parse settings from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse settings if present, logging and falling back to defaults on error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            log::info!("Using default overlay settings");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded overlay settings: {:?}", settings);
                settings
            }
            Err(e) => {
                log::warn!("Invalid overlay settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would produce invalid geometry
    pub fn sanitized(mut self) -> Self {
        self.points_per_blob = self.points_per_blob.max(MIN_POINTS_PER_BLOB);
        self.blur_px = non_negative(self.blur_px, DEFAULT_BLUR_PX).min(MAX_BLUR_PX);
        self.eraser_radius = non_negative(self.eraser_radius, DEFAULT_ERASER_RADIUS);
        self
    }

    /// Blob animation constants for this configuration
    pub fn blob_params(&self) -> BlobParams {
        BlobParams {
            point_count: self.points_per_blob,
            ..BlobParams::default()
        }
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_mount_contract() {
        let s = OverlaySettings::default();
        assert_eq!(s.blob_count, 3);
        assert_eq!(s.blur_px, 5.0);
        assert_eq!(s.eraser_radius, 40.0);
        assert_eq!(s.points_per_blob, 60);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = OverlaySettings::from_json(r#"{ "blobCount": 4, "eraserRadius": 25 }"#).unwrap();
        assert_eq!(s.blob_count, 4);
        assert_eq!(s.eraser_radius, 25.0);
        assert_eq!(s.blur_px, DEFAULT_BLUR_PX);
        assert_eq!(s.points_per_blob, DEFAULT_POINTS_PER_BLOB);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let s = OverlaySettings {
            blob_count: 4,
            blur_px: 8.0,
            eraser_radius: 25.0,
            points_per_blob: 30,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"blobCount\":4"), "{json}");
        assert!(json.contains("\"pointsPerBlob\":30"), "{json}");
        assert_eq!(OverlaySettings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(
            OverlaySettings::from_json_or_default(Some("{ not json")),
            OverlaySettings::default()
        );
        assert_eq!(
            OverlaySettings::from_json_or_default(None),
            OverlaySettings::default()
        );
    }

    #[test]
    fn test_sanitized_clamps_degenerate_values() {
        let s = OverlaySettings {
            blob_count: 2,
            blur_px: -3.0,
            eraser_radius: f32::NAN,
            points_per_blob: 1,
        }
        .sanitized();
        assert_eq!(s.blur_px, 0.0);
        assert_eq!(s.eraser_radius, DEFAULT_ERASER_RADIUS);
        assert_eq!(s.points_per_blob, MIN_POINTS_PER_BLOB);
    }

    #[test]
    fn test_huge_blur_is_capped() {
        let s = OverlaySettings::from_json(r#"{ "blurPx": 20000 }"#).unwrap();
        assert_eq!(s.blur_px, MAX_BLUR_PX);

        let s = OverlaySettings {
            blur_px: f32::MAX,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.blur_px, MAX_BLUR_PX);
    }

    #[test]
    fn test_blob_params_use_point_count() {
        let s = OverlaySettings {
            points_per_blob: 24,
            ..Default::default()
        };
        assert_eq!(s.blob_params().point_count, 24);
    }
}
