//! # glint-core
//!
//! Core types and primitives for the Glint holographic card renderer.
//! This crate contains foundational types shared across all Glint crates:
//! frame buffers, colors, blend modes, tilt/projective math, content
//! hashing, and error types.

pub mod blend;
pub mod color;
pub mod error;
pub mod frame;
pub mod hash;
pub mod math;

pub use blend::BlendMode;
pub use color::Color;
pub use error::{GlintError, GlintResult};
pub use frame::{FrameBuffer, PixelFormat};
pub use math::{Size2D, TiltSample};
