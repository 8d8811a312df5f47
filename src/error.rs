//! Mount-time failures
//!
//! Nothing after a successful mount reports errors: rendering and input are
//! best-effort and degenerate values are clamped instead.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// No global `window` (not running in a browser main thread)
    NoWindow,
    /// No element with the given id
    CanvasNotFound(String),
    /// Element with the given id is not a `<canvas>`
    NotACanvas(String),
    /// The 2D drawing context could not be acquired
    ContextUnavailable,
    /// Attaching an event listener failed
    Listener(String),
}

impl Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::NoWindow => write!(f, "no window available"),
            OverlayError::CanvasNotFound(id) => write!(f, "no element with id '{id}'"),
            OverlayError::NotACanvas(id) => write!(f, "element '{id}' is not a canvas"),
            OverlayError::ContextUnavailable => write!(f, "2d drawing context unavailable"),
            OverlayError::Listener(kind) => write!(f, "failed to attach '{kind}' listener"),
        }
    }
}

impl std::error::Error for OverlayError {}
