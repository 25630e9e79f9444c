use serde::{Deserialize, Serialize};

/// Blend mode for layer compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Standard alpha blending (Porter-Duff "over").
    Normal,
    Multiply,
    Screen,
    Overlay,
    Add,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Normal
    }
}

impl BlendMode {
    /// Apply the separable blend function to one channel pair.
    ///
    /// `src` and `dst` are non-premultiplied channel values in [0, 1].
    /// `Normal` returns the source channel; alpha handling is the
    /// compositor's job.
    pub fn blend_channel(&self, src: f32, dst: f32) -> f32 {
        match self {
            BlendMode::Normal => src,
            BlendMode::Multiply => src * dst,
            BlendMode::Screen => 1.0 - (1.0 - src) * (1.0 - dst),
            BlendMode::Overlay => {
                if dst <= 0.5 {
                    2.0 * src * dst
                } else {
                    1.0 - 2.0 * (1.0 - src) * (1.0 - dst)
                }
            }
            BlendMode::Add => (src + dst).min(1.0),
        }
    }
}
