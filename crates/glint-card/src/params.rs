//! Effect parameter structs.
//!
//! Pure value data: each struct is a flat mapping of named fields with
//! documented ranges and defaults. The model never re-validates them;
//! out-of-range (but finite) values are passed through to the shading
//! functions as-is.

use glint_core::Color;
use serde::{Deserialize, Serialize};

/// Spatial pattern driving the holographic foil rainbow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoilPattern {
    /// Diagonal rainbow bands.
    Diagonal,
    /// Concentric diamond rings.
    Diamond,
    /// Concentric circular rings.
    Radial,
    /// Straight vertical bands.
    Linear,
    /// Two crossing wave fields.
    Crisscross,
    /// Marbled, fluid-like noise.
    Fluid,
    /// Micro-facet cells with per-cell hue.
    Facet,
    /// Interference-fringe waves.
    Waves,
}

impl FoilPattern {
    /// Stable numeric code, matching the persisted representation.
    pub fn code(&self) -> u32 {
        match self {
            FoilPattern::Diagonal => 0,
            FoilPattern::Diamond => 1,
            FoilPattern::Radial => 2,
            FoilPattern::Linear => 3,
            FoilPattern::Crisscross => 4,
            FoilPattern::Fluid => 5,
            FoilPattern::Facet => 6,
            FoilPattern::Waves => 7,
        }
    }

    /// Inverse of [`FoilPattern::code`]; unknown codes fall back to Diagonal.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => FoilPattern::Diamond,
            2 => FoilPattern::Radial,
            3 => FoilPattern::Linear,
            4 => FoilPattern::Crisscross,
            5 => FoilPattern::Fluid,
            6 => FoilPattern::Facet,
            7 => FoilPattern::Waves,
            _ => FoilPattern::Diagonal,
        }
    }
}

impl Default for FoilPattern {
    fn default() -> Self {
        FoilPattern::Diagonal
    }
}

/// Holographic foil parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoilParams {
    /// Glow strength of the rainbow, 0..=1.
    pub intensity: f32,
    /// Spatial scale of the pattern; 1 = native card scale.
    pub scale: f32,
    /// Hue drift speed over time.
    pub speed: f32,
    /// Rainbow saturation, 0..=1.
    pub saturation: f32,
    /// How much of the base color shows through, 0..=1.
    pub transparency: f32,
    /// Spatial pattern variant.
    pub pattern: FoilPattern,
}

impl Default for FoilParams {
    fn default() -> Self {
        Self {
            intensity: 0.8,
            scale: 1.0,
            speed: 0.5,
            saturation: 0.9,
            transparency: 0.5,
            pattern: FoilPattern::Diagonal,
        }
    }
}

/// Tilt-tracking specular highlight parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecularParams {
    /// Peak brightness, 0..=1.
    pub intensity: f32,
    /// Spot size relative to the card, 0.05..=1.
    pub size: f32,
    /// Edge sharpness exponent; higher is crisper.
    pub falloff: f32,
    /// Highlight color.
    pub color: Color,
}

impl Default for SpecularParams {
    fn default() -> Self {
        Self {
            intensity: 0.7,
            size: 0.35,
            falloff: 1.2,
            color: Color::WHITE,
        }
    }
}

/// Animated glitter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparkleParams {
    /// Particle density, 0..=1.
    pub density: f32,
    /// Twinkle animation speed.
    pub speed: f32,
    /// Particle size multiplier.
    pub size: f32,
}

impl Default for SparkleParams {
    fn default() -> Self {
        Self {
            density: 0.5,
            speed: 3.0,
            size: 1.0,
        }
    }
}

/// Brushed-metal surface parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalParams {
    /// Grain frequency; 1 = native card scale.
    pub grain_scale: f32,
    /// Anisotropic highlight strength, 0..=1.
    pub reflectivity: f32,
    /// Grain direction in radians, 0 = horizontal.
    pub brush_angle: f32,
}

impl Default for MetalParams {
    fn default() -> Self {
        Self {
            grain_scale: 1.0,
            reflectivity: 0.6,
            brush_angle: 0.0,
        }
    }
}

/// Anisotropic light streak parameters — a specular variant elongated
/// along the brush angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightParams {
    /// Peak brightness, 0..=1.
    pub intensity: f32,
    /// Streak core size relative to the card, 0.05..=1.
    pub size: f32,
    /// Elongation ratio; 1 = circular, higher = longer streak.
    pub stretch: f32,
    /// Streak direction in radians.
    pub brush_angle: f32,
    /// Edge softness; higher is softer.
    pub softness: f32,
    /// Light color.
    pub color: Color,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            intensity: 0.7,
            size: 0.35,
            stretch: 8.0,
            brush_angle: 0.0,
            softness: 2.0,
            color: Color::WHITE,
        }
    }
}

/// Plastic-foil rim parameters: a glow hugging the rounded edge plus a
/// sheen that slides with tilt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoilRimParams {
    /// Rim band width as a fraction of the shorter edge.
    pub edge_width: f32,
    /// Rim glow strength, 0..=1.
    pub intensity: f32,
    /// Sliding sheen size relative to the card.
    pub shine_size: f32,
    /// Corner radius for the rim path; None inherits the card's radius.
    pub corner_radius: Option<f32>,
}

impl Default for FoilRimParams {
    fn default() -> Self {
        Self {
            edge_width: 0.04,
            intensity: 0.6,
            shine_size: 0.35,
            corner_radius: None,
        }
    }
}

/// Smoke-glass parameters: time-varying refraction with chromatic
/// aberration over a darkened pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlassParams {
    /// Refractive distortion strength, 0..=1.
    pub refraction: f32,
    /// Chromatic channel separation, 0..=1.
    pub aberration: f32,
    /// Pane clarity, 0 = opaque smoke, 1 = clear.
    pub clarity: f32,
    /// Overall effect strength, 0..=1.
    pub intensity: f32,
    /// Distortion animation speed.
    pub speed: f32,
    /// Bright edge band width as a fraction of the shorter edge.
    pub edge_width: f32,
    /// Corner radius for the edge band; None inherits the card's radius.
    pub corner_radius: Option<f32>,
}

impl Default for GlassParams {
    fn default() -> Self {
        Self {
            refraction: 0.5,
            aberration: 0.3,
            clarity: 0.8,
            intensity: 0.7,
            speed: 0.8,
            edge_width: 0.04,
            corner_radius: None,
        }
    }
}
