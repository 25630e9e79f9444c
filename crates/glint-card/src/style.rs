//! Card-level presentation settings shared by every layer in a stack.

use serde::{Deserialize, Serialize};

use glint_core::Size2D;

/// Geometry and motion-response settings for a card.
///
/// Defaults match the standard trading-card proportions: 300x420 points
/// with a 20-point corner radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStyle {
    /// Card width in points.
    pub width: f32,
    /// Card height in points.
    pub height: f32,
    /// Corner radius of the card clip, in points.
    pub corner_radius: f32,
    /// Maximum 3D tilt rotation in degrees at full deflection.
    pub tilt_intensity: f32,
    /// Maximum parallax translation in points at full deflection, for a
    /// layer with parallax factor 1.
    pub parallax_intensity: f32,
    /// Multiplier applied to raw motion samples before smoothing.
    pub motion_sensitivity: f32,
    /// One-pole smoothing coefficient in (0, 1]; 1 passes samples
    /// through unfiltered.
    pub motion_smoothing: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 420.0,
            corner_radius: 20.0,
            tilt_intensity: 15.0,
            parallax_intensity: 20.0,
            motion_sensitivity: 1.0,
            motion_smoothing: 0.15,
        }
    }
}

impl CardStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    pub fn card_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn tilt_intensity(mut self, degrees: f32) -> Self {
        self.tilt_intensity = degrees;
        self
    }

    pub fn parallax_intensity(mut self, points: f32) -> Self {
        self.parallax_intensity = points;
        self
    }

    pub fn motion_sensitivity(mut self, value: f32) -> Self {
        self.motion_sensitivity = value;
        self
    }

    pub fn motion_smoothing(mut self, value: f32) -> Self {
        self.motion_smoothing = value;
        self
    }
}
