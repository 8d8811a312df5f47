//! Blob field
//!
//! Every blob is a pure function of time and its own constants:
//! - No per-frame mutation
//! - Same `(blob, t)` always yields the same outline
//! - No rendering or platform dependencies

pub mod anchor;
pub mod blob;

pub use anchor::{Anchor, default_anchors};
pub use blob::{Blob, BlobField, BlobParams};
