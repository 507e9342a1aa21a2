//! Frame and stack data model
//!
//! Decoded microscopy images are carried as 2-D grayscale planes and
//! combined into 3-D stacks with a new leading frame axis.

/// Grayscale frame planes and multi-frame stacks
pub mod frames;

pub use frames::{Frame, FrameStack};
