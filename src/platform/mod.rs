//! Platform abstraction layer
//!
//! The browser host lives in `web`: canvas mount, animation-frame loop,
//! pointer and resize listeners, drawing through `canvas::CanvasSurface`.
//! Native builds drive `Overlay` directly.

pub mod lifecycle;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use lifecycle::{Lifecycle, Teardown};
