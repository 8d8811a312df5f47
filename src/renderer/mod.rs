//! Mask rendering
//!
//! Frame composition is written against `RasterTarget`. `Surface` is the CPU
//! implementation used natively and in tests; the browser host supplies a
//! canvas-backed one.

pub mod blur;
pub mod compositor;
pub mod raster;
pub mod sdf;
pub mod surface;
pub mod target;

pub use compositor::Compositor;
pub use surface::{Color, CompositeMode, Paint, Surface};
pub use target::RasterTarget;
