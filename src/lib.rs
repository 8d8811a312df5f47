//! Amoeba Overlay - an animated translucent mask with a brush eraser
//!
//! Core modules:
//! - `field`: Time-driven blob geometry (pure, deterministic)
//! - `renderer`: Per-frame mask compositor over a drawing backend, plus the CPU rasterizer
//! - `viewport`: Logical size, pixel density and the two raster surfaces
//! - `eraser`: Pointer drag state machine that carves the accumulation surface
//! - `overlay`: Host-independent orchestration of the above
//! - `platform`: Browser mount (canvas, animation frames, listeners)

pub mod error;
pub mod eraser;
pub mod field;
pub mod overlay;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod viewport;

pub use error::OverlayError;
pub use overlay::{Overlay, OverlayEvent};
pub use settings::OverlaySettings;

use glam::Vec2;

/// Overlay configuration constants
pub mod consts {
    /// Mount contract defaults
    pub const DEFAULT_BLOB_COUNT: usize = 3;
    pub const DEFAULT_BLUR_PX: f32 = 5.0;
    pub const DEFAULT_ERASER_RADIUS: f32 = 40.0;
    pub const DEFAULT_POINTS_PER_BLOB: usize = 60;

    /// Softest accepted blob edge (logical px); larger values are clamped
    pub const MAX_BLUR_PX: f32 = 100.0;

    /// Fewest outline points that still enclose an area
    pub const MIN_POINTS_PER_BLOB: usize = 3;

    /// Per-point phase stride (offset[i] = i * stride)
    pub const PHASE_STRIDE: f32 = 137.0;

    /// Center drift (px, rad/ms)
    pub const DRIFT_AMPLITUDE_X: f32 = 40.0;
    pub const DRIFT_AMPLITUDE_Y: f32 = 30.0;
    pub const DRIFT_SPEED: f32 = 0.0003;

    /// Edge wobble (px, rad/ms)
    pub const EDGE_NOISE_AMPLITUDE: f32 = 5.0;
    pub const EDGE_NOISE_SPEED: f32 = 0.001;

    /// Shared phase constant; only anchors differ between blobs
    pub const BLOB_PHASE: f32 = 500.0;
    /// The y drift uses a scaled phase so x and y do not move in lockstep
    pub const PHASE_Y_FACTOR: f32 = 0.7;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
