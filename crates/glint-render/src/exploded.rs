//! Exploded inspector geometry and layer decoration.
//!
//! In exploded mode every layer keeps the same 3D rotation but sits at
//! a different depth, so the stack fans out like a deck of panes. Each
//! pane gets a thin border and a caption naming its layer kind.

use glint_core::frame::FrameBuffer;
use glint_core::math::project_rect_3d;

use crate::shading::rounded_rect_sd;
use crate::text::TextRenderer;

/// 3D placement of the fanned-out layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplodedLayout {
    /// Shared rotation angle in degrees.
    pub angle_deg: f64,
    /// Shared rotation axis.
    pub axis: [f64; 3],
    /// Perspective strength; larger exaggerates foreshortening.
    pub perspective: f64,
    /// Depth distance between adjacent layers, in points.
    pub depth_spacing: f64,
}

impl Default for ExplodedLayout {
    fn default() -> Self {
        Self {
            angle_deg: 58.0,
            axis: [1.0, -0.36, 0.0],
            perspective: 0.15,
            depth_spacing: 140.0,
        }
    }
}

impl ExplodedLayout {
    /// Depth of the layer at `index` in a stack of `count`, centered so
    /// the middle layer sits at zero.
    pub fn anchor_z(&self, index: usize, count: usize) -> f64 {
        let center = (count.saturating_sub(1)) as f64 / 2.0;
        (index as f64 - center) * self.depth_spacing
    }

    /// Projected corner quad for the layer at `index`, [TL, TR, BR, BL].
    pub fn project(&self, width: f64, height: f64, index: usize, count: usize) -> [[f64; 2]; 4] {
        project_rect_3d(
            width,
            height,
            self.axis,
            self.angle_deg,
            self.anchor_z(index, count),
            self.perspective,
        )
    }
}

/// Stroke a one-pixel border along the rounded-rect boundary of a layer
/// pane, white at quarter opacity over whatever the pane holds.
pub fn stroke_border(frame: &mut FrameBuffer, corner_radius: f32) {
    let w = frame.width as f32;
    let h = frame.height as f32;
    for y in 0..frame.height {
        for x in 0..frame.width {
            let sd = rounded_rect_sd(x as f32 + 0.5, y as f32 + 0.5, w, h, corner_radius);
            if sd.abs() > 1.0 {
                continue;
            }
            let coverage = 1.0 - sd.abs();
            let dp = frame.get_pixel(x, y).unwrap_or([0; 4]);
            let sa = 0.25 * coverage;
            let da = dp[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                continue;
            }
            let mut out = [0u8; 4];
            for c in 0..3 {
                let d = dp[c] as f32 / 255.0;
                let v = (1.0 * sa + d * da * (1.0 - sa)) / out_a;
                out[c] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            out[3] = (out_a * 255.0).round() as u8;
            frame.set_pixel(x, y, out);
        }
    }
}

/// Draw a caption capsule with the layer name near the bottom edge of a
/// pane. Without a loaded font the capsule is drawn empty.
pub fn draw_caption(frame: &mut FrameBuffer, label: &str, text: &TextRenderer) {
    let rendered = text.render_line(label, 13.0, &glint_core::Color::WHITE);
    let text_w = rendered.as_ref().map(|t| t.width).unwrap_or(48);
    let text_h = rendered.as_ref().map(|t| t.height).unwrap_or(10);

    let pad_x = 10u32;
    let pad_y = 4u32;
    let cap_w = (text_w + pad_x * 2).min(frame.width);
    let cap_h = (text_h + pad_y * 2).min(frame.height);
    let cap_x = (frame.width.saturating_sub(cap_w)) / 2;
    let cap_y = frame.height.saturating_sub(cap_h + 12);

    // Dark capsule background.
    let radius = cap_h as f32 / 2.0;
    for y in 0..cap_h {
        for x in 0..cap_w {
            let sd = rounded_rect_sd(x as f32 + 0.5, y as f32 + 0.5, cap_w as f32, cap_h as f32, radius);
            if sd > 0.0 {
                continue;
            }
            let px = cap_x + x;
            let py = cap_y + y;
            let dp = frame.get_pixel(px, py).unwrap_or([0; 4]);
            let sa = 0.55f32;
            let da = dp[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let mut out = [0u8; 4];
            for c in 0..3 {
                let d = dp[c] as f32 / 255.0;
                out[c] = (((d * da * (1.0 - sa)) / out_a).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            out[3] = (out_a * 255.0).round() as u8;
            frame.set_pixel(px, py, out);
        }
    }

    if let Some(text_buf) = rendered {
        frame.composite_over(&text_buf, (cap_x + pad_x) as i32, (cap_y + pad_y) as i32);
    }
}
