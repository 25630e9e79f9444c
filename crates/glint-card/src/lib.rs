//! # glint-card
//!
//! The Glint card model: layer kinds and their effect parameters, the
//! declarative stack builder, the card style context, preset snapshots,
//! and the motion provider that feeds tilt samples to the renderer.

pub mod builder;
pub mod layer;
pub mod motion;
pub mod params;
pub mod snapshot;
pub mod style;

pub use builder::{stack, StackBuilder};
pub use layer::{ContentDrawable, ImageHandle, Layer, LayerId, LayerKind};
pub use motion::{MotionManager, MotionProviding, MotionSource};
pub use params::{
    FoilParams, FoilPattern, FoilRimParams, GlassParams, LightParams, MetalParams, SparkleParams,
    SpecularParams,
};
pub use snapshot::{CardSnapshot, JsonPresetStore, Preset, PresetStorage, PresetStore};
pub use style::CardStyle;
