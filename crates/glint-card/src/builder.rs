//! Closure-based construction of layer stacks.
//!
//! `stack` collects layers in bottom-to-top order; conditionals and
//! loops compose naturally inside the closure:
//!
//! ```
//! use glint_card::{stack, Layer};
//! use glint_core::Color;
//!
//! let premium = true;
//! let layers = stack(|b| {
//!     b.push(Layer::base(Color::GOLD));
//!     if premium {
//!         b.push(Layer::holographic_foil());
//!         b.push(Layer::sparkle());
//!     }
//! });
//! assert_eq!(layers.len(), 3);
//! ```

use crate::layer::Layer;

/// Accumulates layers in declaration order.
#[derive(Debug, Default)]
pub struct StackBuilder {
    layers: Vec<Layer>,
}

impl StackBuilder {
    pub(crate) fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer. Later pushes composite on top of earlier ones.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Appends every layer from an iterator, preserving order.
    pub fn extend(&mut self, layers: impl IntoIterator<Item = Layer>) {
        self.layers.extend(layers);
    }

    pub(crate) fn finish(self) -> Vec<Layer> {
        self.layers
    }
}

/// Builds a layer stack from a closure. The returned vector is ordered
/// bottom-to-top, matching declaration order.
pub fn stack(build: impl FnOnce(&mut StackBuilder)) -> Vec<Layer> {
    let mut builder = StackBuilder::new();
    build(&mut builder);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;
    use glint_core::Color;

    #[test]
    fn test_stack_preserves_declaration_order() {
        let layers = stack(|b| {
            b.push(Layer::base(Color::BLACK));
            b.push(Layer::holographic_foil());
            b.push(Layer::sparkle());
        });
        assert_eq!(layers.len(), 3);
        assert!(matches!(layers[0].kind, LayerKind::Base(_)));
        assert!(matches!(layers[1].kind, LayerKind::HolographicFoil(..)));
        assert!(matches!(layers[2].kind, LayerKind::Sparkle(_)));
    }

    #[test]
    fn test_empty_stack() {
        let layers = stack(|_| {});
        assert!(layers.is_empty());
    }

    #[test]
    fn test_conditional_branches() {
        let build = |premium: bool| {
            stack(|b| {
                b.push(Layer::base(Color::GOLD));
                if premium {
                    b.push(Layer::holographic_foil());
                } else {
                    b.push(Layer::specular_highlight());
                }
            })
        };
        let on = build(true);
        assert!(matches!(on[1].kind, LayerKind::HolographicFoil(..)));
        let off = build(false);
        assert!(matches!(off[1].kind, LayerKind::SpecularHighlight(_)));
        assert_eq!(off.len(), 2);
    }

    #[test]
    fn test_loop_and_extend() {
        let layers = stack(|b| {
            for _ in 0..3 {
                b.push(Layer::sparkle());
            }
            b.extend([Layer::base(Color::WHITE), Layer::smoke_glass()]);
        });
        assert_eq!(layers.len(), 5);
    }

    #[test]
    fn test_nested_group_builder() {
        let layers = stack(|b| {
            b.push(Layer::base(Color::BLACK));
            b.push(Layer::group("Badge", |g| {
                g.push(Layer::base(Color::GOLD));
                g.push(Layer::specular_highlight());
            }));
        });
        match &layers[1].kind {
            LayerKind::Group(inner, name) => {
                assert_eq!(inner.len(), 2);
                assert_eq!(name.as_deref(), Some("Badge"));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }
}
