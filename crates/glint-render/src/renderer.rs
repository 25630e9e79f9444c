//! The card renderer: composites a layer stack into a single frame for
//! a given tilt sample and animation time.

use std::path::Path;

use dashmap::DashMap;
use tracing::{debug, warn};

use glint_card::layer::{ImageHandle, Layer, LayerKind};
use glint_card::style::CardStyle;
use glint_core::frame::FrameBuffer;
use glint_core::math::project_rect_3d;
use glint_core::{Color, GlintResult, PixelFormat, TiltSample};

use crate::compositor::{composite_blended, composite_projected};
use crate::exploded::{self, ExplodedLayout};
use crate::image_loader;
use crate::shading;
use crate::text::TextRenderer;

/// Perspective strength for the whole-card tilt rotation.
const CARD_TILT_PERSPECTIVE: f64 = 0.4;

/// Diagnostic description of one layer in a stack. Building these never
/// renders or mutates anything.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LayerInfo {
    pub id: String,
    pub name: String,
    pub depth_index: usize,
    pub parallax_factor: f32,
    pub blend_mode: String,
    pub opacity: f32,
    pub sublayer_count: usize,
}

/// Renders card layer stacks to frames. Holds the style context, an
/// image cache keyed by handle name, and the label font for exploded
/// captions.
pub struct CardRenderer {
    style: CardStyle,
    exploded: Option<ExplodedLayout>,
    image_cache: DashMap<String, FrameBuffer>,
    text: TextRenderer,
}

impl CardRenderer {
    /// A renderer in normal (stacked) presentation.
    pub fn new(style: CardStyle) -> Self {
        debug!(
            width = style.width,
            height = style.height,
            "creating card renderer"
        );
        Self {
            style,
            exploded: None,
            image_cache: DashMap::new(),
            text: TextRenderer::new(),
        }
    }

    /// A renderer in exploded-inspector presentation.
    pub fn exploded(style: CardStyle, layout: ExplodedLayout) -> Self {
        let mut renderer = Self::new(style);
        renderer.exploded = Some(layout);
        renderer
    }

    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Load the font used for exploded-view captions. Without one,
    /// captions render as bare capsules.
    pub fn load_label_font(&mut self, path: &Path) -> GlintResult<()> {
        self.text.load_font(path)
    }

    /// Register a pre-decoded image under a handle name, bypassing disk.
    pub fn register_image(&self, name: impl Into<String>, frame: FrameBuffer) {
        self.image_cache.insert(name.into(), frame);
    }

    /// Render the stack at the given tilt and animation time.
    ///
    /// Layers composite bottom-to-top. Each layer is first offset by
    /// `tilt * parallax_intensity * parallax_factor`, then blended with
    /// its effective mode and opacity. The finished card is clipped to
    /// the corner radius and, for nonzero tilt, rotated in 3D over a
    /// soft shadow.
    pub fn render(&self, layers: &[Layer], tilt: TiltSample, time: f32) -> GlintResult<FrameBuffer> {
        let size = self.style.size();
        if size.is_degenerate() {
            warn!(width = size.width, height = size.height, "degenerate card size, skipping shading");
            return Ok(FrameBuffer::new(
                (size.width.max(1.0)) as u32,
                (size.height.max(1.0)) as u32,
                PixelFormat::Rgba8,
            ));
        }
        let width = self.style.width.round() as u32;
        let height = self.style.height.round() as u32;

        match &self.exploded {
            Some(layout) => self.render_exploded(layers, layout, width, height, time),
            None => self.render_stacked(layers, tilt, width, height, time),
        }
    }

    /// Pure inspection of a stack: names, depths, blend modes. Safe to
    /// call from debug overlays without disturbing render state.
    pub fn describe(&self, layers: &[Layer]) -> Vec<LayerInfo> {
        layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerInfo {
                id: layer.id().to_string(),
                name: layer.display_name().to_string(),
                depth_index: index,
                parallax_factor: layer.parallax_factor,
                blend_mode: format!("{:?}", layer.effective_blend_mode()),
                opacity: layer.opacity,
                sublayer_count: match &layer.kind {
                    LayerKind::Group(sublayers, _) => sublayers.len(),
                    _ => 0,
                },
            })
            .collect()
    }

    fn render_stacked(
        &self,
        layers: &[Layer],
        tilt: TiltSample,
        width: u32,
        height: u32,
        time: f32,
    ) -> GlintResult<FrameBuffer> {
        let mut canvas = FrameBuffer::new(width, height, PixelFormat::Rgba8);

        for layer in layers {
            if layer.opacity <= 0.0 {
                continue;
            }
            let buf = self.render_layer(layer, &canvas, width, height, tilt, time)?;
            let (dx, dy) = self.parallax_offset(layer, tilt);
            composite_blended(
                &mut canvas,
                &buf,
                dx,
                dy,
                layer.effective_blend_mode(),
                layer.opacity,
            );
        }

        canvas.apply_corner_radius(self.style.corner_radius);

        if tilt.magnitude() > 1e-4 && self.style.tilt_intensity.abs() > 0.0 {
            canvas = self.apply_card_tilt(canvas, tilt, width, height);
        }

        Ok(canvas)
    }

    fn render_exploded(
        &self,
        layers: &[Layer],
        layout: &ExplodedLayout,
        width: u32,
        height: u32,
        time: f32,
    ) -> GlintResult<FrameBuffer> {
        // Tilt is frozen so every pane shows its resting appearance.
        let tilt = TiltSample::ZERO;
        let mut canvas = FrameBuffer::new(width, height, PixelFormat::Rgba8);
        let empty = FrameBuffer::new(width, height, PixelFormat::Rgba8);
        let count = layers.len();

        for (index, layer) in layers.iter().enumerate() {
            let mut pane = self.render_layer(layer, &empty, width, height, tilt, time)?;
            pane.scale_alpha(layer.opacity);
            pane.apply_corner_radius(self.style.corner_radius);
            exploded::stroke_border(&mut pane, self.style.corner_radius);
            exploded::draw_caption(&mut pane, layer.display_name(), &self.text);

            let corners = layout.project(width as f64, height as f64, index, count);
            composite_projected(&mut canvas, &pane, corners);
        }

        Ok(canvas)
    }

    fn render_layer(
        &self,
        layer: &Layer,
        canvas: &FrameBuffer,
        width: u32,
        height: u32,
        tilt: TiltSample,
        time: f32,
    ) -> GlintResult<FrameBuffer> {
        let frame = match &layer.kind {
            LayerKind::Base(color) => FrameBuffer::solid(width, height, color),
            LayerKind::Image(handle) => self.resolve_image(handle, width, height),
            LayerKind::Content(drawable) => {
                let buf = drawable.draw(width, height);
                if buf.width != width || buf.height != height {
                    image_loader::resize_to_fill(&buf, width, height)
                } else {
                    buf
                }
            }
            LayerKind::HolographicFoil(base, p) => {
                shading::render_foil(width, height, *base, p, tilt, time)
            }
            LayerKind::SpecularHighlight(p) => shading::render_specular(width, height, p, tilt),
            LayerKind::Sparkle(p) => shading::render_sparkle(width, height, p, tilt, time),
            LayerKind::BrushedMetal(base, p) => {
                shading::render_brushed_metal(width, height, *base, p)
            }
            LayerKind::AnisotropicLight(p) => shading::render_aniso_light(width, height, p, tilt),
            LayerKind::PlasticFoil(p) => {
                shading::render_plastic_rim(width, height, p, self.style.corner_radius, tilt)
            }
            LayerKind::SmokeGlass(p) => {
                shading::render_smoke_glass(canvas, p, self.style.corner_radius, tilt, time)
            }
            LayerKind::Group(sublayers, _) => {
                // Groups composite in isolation and land as one unit, so
                // a blend mode on the group applies to the merged result.
                let mut sub = FrameBuffer::new(width, height, PixelFormat::Rgba8);
                for sublayer in sublayers {
                    if sublayer.opacity <= 0.0 {
                        continue;
                    }
                    let buf = self.render_layer(sublayer, &sub, width, height, tilt, time)?;
                    let (dx, dy) = self.parallax_offset(sublayer, tilt);
                    composite_blended(
                        &mut sub,
                        &buf,
                        dx,
                        dy,
                        sublayer.effective_blend_mode(),
                        sublayer.opacity,
                    );
                }
                sub
            }
        };
        Ok(frame)
    }

    fn parallax_offset(&self, layer: &Layer, tilt: TiltSample) -> (i32, i32) {
        let scale = self.style.parallax_intensity * layer.parallax_factor;
        (
            (tilt.roll * scale).round() as i32,
            (tilt.pitch * scale).round() as i32,
        )
    }

    fn resolve_image(&self, handle: &ImageHandle, width: u32, height: u32) -> FrameBuffer {
        match handle {
            ImageHandle::Buffer(buf) => image_loader::resize_to_fill(buf, width, height),
            ImageHandle::Named(name) => {
                if let Some(cached) = self.image_cache.get(name) {
                    return image_loader::resize_to_fill(&cached, width, height);
                }
                match image_loader::load_image(Path::new(name)) {
                    Ok(fb) => {
                        let scaled = image_loader::resize_to_fill(&fb, width, height);
                        self.image_cache.insert(name.clone(), fb);
                        scaled
                    }
                    Err(err) => {
                        warn!(name = %name, error = %err, "image layer unresolved, rendering transparent");
                        FrameBuffer::new(width, height, PixelFormat::Rgba8)
                    }
                }
            }
        }
    }

    /// Rotate the finished card in 3D toward the tilt and drop it over
    /// a soft shadow whose offset and blur both grow with deflection.
    fn apply_card_tilt(
        &self,
        card: FrameBuffer,
        tilt: TiltSample,
        width: u32,
        height: u32,
    ) -> FrameBuffer {
        let magnitude = tilt.magnitude().min(1.0);
        let angle = (magnitude * self.style.tilt_intensity) as f64;
        let axis = [-tilt.pitch as f64, -tilt.roll as f64, 0.0];
        let corners = project_rect_3d(
            width as f64,
            height as f64,
            axis,
            angle,
            0.0,
            CARD_TILT_PERSPECTIVE,
        );

        let mut out = FrameBuffer::new(width, height, PixelFormat::Rgba8);

        let shadow_alpha = 0.25 * magnitude;
        if shadow_alpha > 0.0 {
            let mut shadow =
                FrameBuffer::solid(width, height, &Color::rgba(0.0, 0.0, 0.0, shadow_alpha));
            shadow.apply_corner_radius(self.style.corner_radius);
            blur_alpha(&mut shadow, (magnitude * 8.0).round() as i32);
            let sx = (tilt.roll * 8.0).round() as i32;
            let sy = (tilt.pitch * 8.0).round() as i32;
            out.composite_over(&shadow, sx, sy);
        }

        composite_projected(&mut out, &card, corners);
        out
    }
}

/// Separable box blur over the alpha channel. Samples past the buffer
/// edge read as transparent, so a silhouette fades out at its borders.
fn blur_alpha(frame: &mut FrameBuffer, radius: i32) {
    if radius <= 0 || frame.format != PixelFormat::Rgba8 {
        return;
    }
    let w = frame.width as i32;
    let h = frame.height as i32;
    let window = (radius * 2 + 1) as u32;

    let mut alpha: Vec<u8> = frame.data.chunks_exact(4).map(|px| px[3]).collect();
    let mut tmp = vec![0u8; alpha.len()];

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for dx in -radius..=radius {
                let sx = x + dx;
                if sx >= 0 && sx < w {
                    sum += alpha[(y * w + sx) as usize] as u32;
                }
            }
            tmp[(y * w + x) as usize] = (sum / window) as u8;
        }
    }
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for dy in -radius..=radius {
                let sy = y + dy;
                if sy >= 0 && sy < h {
                    sum += tmp[(sy * w + x) as usize] as u32;
                }
            }
            alpha[(y * w + x) as usize] = (sum / window) as u8;
        }
    }

    for (px, a) in frame.data.chunks_exact_mut(4).zip(alpha) {
        px[3] = a;
    }
}
