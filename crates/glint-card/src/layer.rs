//! The layer model: one visual contributor to the composited card.
//!
//! Layers are created through factory methods and configured with chained
//! modifiers:
//!
//! ```
//! use glint_card::{Layer, FoilPattern};
//!
//! let foil = Layer::holographic_foil()
//!     .intensity(0.8)
//!     .pattern(FoilPattern::Diagonal)
//!     .parallax(0.5);
//! ```
//!
//! Effect modifiers route to the matching parameter of the current kind
//! and are silent no-ops on kinds that lack it.

use std::fmt;
use std::sync::Arc;

use glint_core::{BlendMode, Color, FrameBuffer};
use uuid::Uuid;

use crate::builder::StackBuilder;
use crate::params::{
    FoilParams, FoilPattern, FoilRimParams, GlassParams, LightParams, MetalParams, SparkleParams,
    SpecularParams,
};

/// Stable identity for a layer, independent of its parameter values.
/// Usable as a diffing key when compositions are rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Uuid);

impl LayerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an image rendered as a card-filling layer.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    /// Resolved by name through the renderer's asset resolver.
    Named(String),
    /// A pre-decoded pixel buffer.
    Buffer(Arc<FrameBuffer>),
}

impl From<&str> for ImageHandle {
    fn from(name: &str) -> Self {
        ImageHandle::Named(name.to_string())
    }
}

impl From<String> for ImageHandle {
    fn from(name: String) -> Self {
        ImageHandle::Named(name)
    }
}

/// Opaque custom-drawable slot: anything that can draw itself into a
/// buffer of the requested size can be a layer.
pub trait ContentDrawable: Send + Sync {
    fn draw(&self, width: u32, height: u32) -> FrameBuffer;
}

/// The kind of a layer, with per-kind effect parameters.
#[derive(Clone)]
pub enum LayerKind {
    /// A solid-color base fill.
    Base(Color),
    /// An image that fills the card.
    Image(ImageHandle),
    /// Caller-supplied custom content.
    Content(Arc<dyn ContentDrawable>),
    /// Rainbow holographic foil over a base color.
    HolographicFoil(Color, FoilParams),
    /// Tilt-tracking specular highlight.
    SpecularHighlight(SpecularParams),
    /// Animated glitter particles.
    Sparkle(SparkleParams),
    /// Brushed metal with directional grain.
    BrushedMetal(Color, MetalParams),
    /// Light streak stretched along a grain direction.
    AnisotropicLight(LightParams),
    /// Rim glow plus sliding sheen near the rounded edge.
    PlasticFoil(FoilRimParams),
    /// Refractive smoked glass pane.
    SmokeGlass(GlassParams),
    /// A nested, compositing-isolated sublayer stack.
    Group(Vec<Layer>, Option<String>),
}

impl fmt::Debug for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Base(c) => f.debug_tuple("Base").field(c).finish(),
            LayerKind::Image(h) => f.debug_tuple("Image").field(h).finish(),
            LayerKind::Content(_) => f.write_str("Content(..)"),
            LayerKind::HolographicFoil(c, p) => {
                f.debug_tuple("HolographicFoil").field(c).field(p).finish()
            }
            LayerKind::SpecularHighlight(p) => {
                f.debug_tuple("SpecularHighlight").field(p).finish()
            }
            LayerKind::Sparkle(p) => f.debug_tuple("Sparkle").field(p).finish(),
            LayerKind::BrushedMetal(c, p) => {
                f.debug_tuple("BrushedMetal").field(c).field(p).finish()
            }
            LayerKind::AnisotropicLight(p) => {
                f.debug_tuple("AnisotropicLight").field(p).finish()
            }
            LayerKind::PlasticFoil(p) => f.debug_tuple("PlasticFoil").field(p).finish(),
            LayerKind::SmokeGlass(p) => f.debug_tuple("SmokeGlass").field(p).finish(),
            LayerKind::Group(layers, name) => f
                .debug_tuple("Group")
                .field(&layers.len())
                .field(name)
                .finish(),
        }
    }
}

/// A single layer in a card composition.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    pub kind: LayerKind,
    pub parallax_factor: f32,
    pub blend_mode: Option<BlendMode>,
    pub opacity: f32,
}

impl Layer {
    fn with_kind(kind: LayerKind) -> Self {
        Self {
            id: LayerId::new(),
            kind,
            parallax_factor: 0.0,
            blend_mode: None,
            opacity: 1.0,
        }
    }

    /// The layer's stable identity.
    pub fn id(&self) -> LayerId {
        self.id
    }

    // --- Factory methods ---

    /// A solid-color base layer.
    pub fn base(color: Color) -> Self {
        Self::with_kind(LayerKind::Base(color))
    }

    /// An image layer that fills the card.
    pub fn image(handle: impl Into<ImageHandle>) -> Self {
        Self::with_kind(LayerKind::Image(handle.into()))
    }

    /// A custom-drawable content layer.
    pub fn content(drawable: impl ContentDrawable + 'static) -> Self {
        Self::with_kind(LayerKind::Content(Arc::new(drawable)))
    }

    /// A rainbow holographic foil over the classic gold base.
    pub fn holographic_foil() -> Self {
        Self::holographic_foil_on(Color::GOLD)
    }

    /// A rainbow holographic foil over a chosen base color.
    pub fn holographic_foil_on(base: Color) -> Self {
        let mut layer = Self::with_kind(LayerKind::HolographicFoil(base, FoilParams::default()));
        layer.parallax_factor = 0.5;
        layer
    }

    /// A tilt-tracking specular highlight.
    pub fn specular_highlight() -> Self {
        let mut layer = Self::with_kind(LayerKind::SpecularHighlight(SpecularParams::default()));
        layer.parallax_factor = 0.8;
        layer
    }

    /// Animated glitter particles that catch light based on tilt angle.
    pub fn sparkle() -> Self {
        let mut layer = Self::with_kind(LayerKind::Sparkle(SparkleParams::default()));
        layer.parallax_factor = 1.0;
        layer
    }

    /// A brushed-metal surface in the default silver.
    pub fn brushed_metal() -> Self {
        Self::brushed_metal_on(Color::gray(0.78))
    }

    /// A brushed-metal surface over a chosen base color.
    pub fn brushed_metal_on(base: Color) -> Self {
        Self::with_kind(LayerKind::BrushedMetal(base, MetalParams::default()))
    }

    /// A tilt-tracking light streak stretched along a grain direction.
    /// Pairs with brushed metal or stands alone.
    pub fn anisotropic_light() -> Self {
        Self::with_kind(LayerKind::AnisotropicLight(LightParams::default()))
    }

    /// A plastic-foil rim glow with a sliding sheen.
    pub fn plastic_foil() -> Self {
        Self::with_kind(LayerKind::PlasticFoil(FoilRimParams::default()))
    }

    /// A refractive smoked-glass pane.
    pub fn smoke_glass() -> Self {
        Self::with_kind(LayerKind::SmokeGlass(GlassParams::default()))
    }

    /// A named group of sublayers, built with a nested builder and
    /// composited in isolation as a single layer.
    pub fn group(name: impl Into<String>, build: impl FnOnce(&mut StackBuilder)) -> Self {
        let mut builder = StackBuilder::new();
        build(&mut builder);
        Self::with_kind(LayerKind::Group(builder.finish(), Some(name.into())))
    }

    /// An anonymous group of sublayers.
    pub fn group_unnamed(build: impl FnOnce(&mut StackBuilder)) -> Self {
        let mut builder = StackBuilder::new();
        build(&mut builder);
        Self::with_kind(LayerKind::Group(builder.finish(), None))
    }

    // --- Universal modifiers ---

    /// Parallax movement factor relative to tilt. 0 = static, 1 = full.
    pub fn parallax(mut self, factor: f32) -> Self {
        self.parallax_factor = factor;
        self
    }

    /// Blend mode for compositing this layer.
    pub fn blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = Some(mode);
        self
    }

    /// Opacity of the layer, 0..=1.
    pub fn opacity(mut self, value: f32) -> Self {
        self.opacity = value;
        self
    }

    /// The blend mode the compositor will use: explicit, else the
    /// kind default, else Normal.
    pub fn effective_blend_mode(&self) -> BlendMode {
        self.blend_mode
            .or(self.kind_default_blend())
            .unwrap_or(BlendMode::Normal)
    }

    fn kind_default_blend(&self) -> Option<BlendMode> {
        match self.kind {
            LayerKind::HolographicFoil(..) => Some(BlendMode::Overlay),
            LayerKind::SpecularHighlight(_)
            | LayerKind::Sparkle(_)
            | LayerKind::AnisotropicLight(_)
            | LayerKind::PlasticFoil(_)
            | LayerKind::SmokeGlass(_) => Some(BlendMode::Screen),
            _ => None,
        }
    }

    // --- Effect modifiers ---

    /// Effect strength: foil glow, specular brightness, metal
    /// reflectivity, streak brightness, rim glow, or glass strength.
    /// No-op on other kinds.
    pub fn intensity(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::HolographicFoil(_, p) => p.intensity = value,
            LayerKind::SpecularHighlight(p) => p.intensity = value,
            LayerKind::BrushedMetal(_, p) => p.reflectivity = value,
            LayerKind::AnisotropicLight(p) => p.intensity = value,
            LayerKind::PlasticFoil(p) => p.intensity = value,
            LayerKind::SmokeGlass(p) => p.intensity = value,
            _ => {}
        }
        self
    }

    /// Pattern scale (foil), particle size (sparkle), or grain scale
    /// (brushed metal). No-op on other kinds.
    pub fn scale(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::HolographicFoil(_, p) => p.scale = value,
            LayerKind::Sparkle(p) => p.size = value,
            LayerKind::BrushedMetal(_, p) => p.grain_scale = value,
            _ => {}
        }
        self
    }

    /// Animation speed for the holographic shift, sparkle twinkle, or
    /// glass distortion. No-op on other kinds.
    pub fn speed(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::HolographicFoil(_, p) => p.speed = value,
            LayerKind::Sparkle(p) => p.speed = value,
            LayerKind::SmokeGlass(p) => p.speed = value,
            _ => {}
        }
        self
    }

    /// Rainbow saturation (foil only). No-op on other kinds.
    pub fn saturation(mut self, value: f32) -> Self {
        if let LayerKind::HolographicFoil(_, p) = &mut self.kind {
            p.saturation = value;
        }
        self
    }

    /// Base-color show-through (foil only). No-op on other kinds.
    pub fn transparency(mut self, value: f32) -> Self {
        if let LayerKind::HolographicFoil(_, p) = &mut self.kind {
            p.transparency = value;
        }
        self
    }

    /// Foil pattern style. No-op on other kinds.
    pub fn pattern(mut self, pattern: FoilPattern) -> Self {
        if let LayerKind::HolographicFoil(_, p) = &mut self.kind {
            p.pattern = pattern;
        }
        self
    }

    /// Highlight spot size (specular), particle size (sparkle), streak
    /// size (anisotropic light), or sheen size (plastic foil). No-op on
    /// other kinds.
    pub fn size(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::SpecularHighlight(p) => p.size = value,
            LayerKind::Sparkle(p) => p.size = value,
            LayerKind::AnisotropicLight(p) => p.size = value,
            LayerKind::PlasticFoil(p) => p.shine_size = value,
            _ => {}
        }
        self
    }

    /// Falloff curve for the specular highlight, or softness for the
    /// anisotropic streak. No-op on other kinds.
    pub fn falloff(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::SpecularHighlight(p) => p.falloff = value,
            LayerKind::AnisotropicLight(p) => p.softness = value,
            _ => {}
        }
        self
    }

    /// Light/highlight color. No-op on other kinds.
    pub fn color(mut self, value: Color) -> Self {
        match &mut self.kind {
            LayerKind::SpecularHighlight(p) => p.color = value,
            LayerKind::AnisotropicLight(p) => p.color = value,
            _ => {}
        }
        self
    }

    /// Sparkle particle density. No-op on other kinds.
    pub fn density(mut self, value: f32) -> Self {
        if let LayerKind::Sparkle(p) = &mut self.kind {
            p.density = value;
        }
        self
    }

    /// Grain/streak direction in radians, 0 = horizontal. No-op on
    /// other kinds.
    pub fn brush_angle(mut self, radians: f32) -> Self {
        match &mut self.kind {
            LayerKind::BrushedMetal(_, p) => p.brush_angle = radians,
            LayerKind::AnisotropicLight(p) => p.brush_angle = radians,
            _ => {}
        }
        self
    }

    /// Anisotropic stretch ratio; 1 = circular. No-op on other kinds.
    pub fn stretch(mut self, value: f32) -> Self {
        if let LayerKind::AnisotropicLight(p) = &mut self.kind {
            p.stretch = value;
        }
        self
    }

    /// Rim/edge band width (plastic foil, smoke glass). No-op on other
    /// kinds.
    pub fn edge_width(mut self, value: f32) -> Self {
        match &mut self.kind {
            LayerKind::PlasticFoil(p) => p.edge_width = value,
            LayerKind::SmokeGlass(p) => p.edge_width = value,
            _ => {}
        }
        self
    }

    /// Human-readable name, shown as the label in the exploded view.
    pub fn display_name(&self) -> &str {
        match &self.kind {
            LayerKind::Base(_) => "Base",
            LayerKind::Image(_) => "Image",
            LayerKind::Content(_) => "Content",
            LayerKind::HolographicFoil(..) => "Holo Foil",
            LayerKind::SpecularHighlight(_) => "Specular",
            LayerKind::Sparkle(_) => "Sparkle",
            LayerKind::BrushedMetal(..) => "Brushed Metal",
            LayerKind::AnisotropicLight(_) => "Aniso Light",
            LayerKind::PlasticFoil(_) => "Plastic Foil",
            LayerKind::SmokeGlass(_) => "Smoke Glass",
            LayerKind::Group(_, name) => name.as_deref().unwrap_or("Group"),
        }
    }
}
