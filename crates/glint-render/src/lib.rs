//! # glint-render
//!
//! The Glint rendering engine: turns a card layer stack plus a tilt
//! sample into a composited frame. All shading runs on the CPU and is
//! deterministic for identical inputs.

pub mod compositor;
pub mod exploded;
pub mod image_loader;
pub mod renderer;
pub mod shading;
pub mod text;

pub use exploded::ExplodedLayout;
pub use renderer::{CardRenderer, LayerInfo};
pub use text::TextRenderer;
