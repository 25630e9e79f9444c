//! Label rasterization for the exploded inspector.
//! Uses fontdue for CPU-based font rasterization. No font ships with
//! the crate; callers load one at runtime and labels degrade to bare
//! capsules when none is available.

use std::path::Path;

use fontdue::{Font, FontSettings};
use glint_core::frame::FrameBuffer;
use glint_core::{Color, GlintError, PixelFormat};

/// Text renderer — rasterizes single-line labels to a FrameBuffer.
pub struct TextRenderer {
    font: Option<Font>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Load the label font from a file path.
    pub fn load_font(&mut self, path: &Path) -> Result<(), GlintError> {
        let data = std::fs::read(path)
            .map_err(|e| GlintError::asset(format!("failed to read font file: {}", e), path))?;
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            GlintError::asset(format!("failed to parse font: {}", e), path)
        })?;
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render a single line of text into a tightly sized buffer.
    /// Returns None when no font is loaded.
    pub fn render_line(&self, text: &str, font_size: f32, color: &Color) -> Option<FrameBuffer> {
        let font = self.font.as_ref()?;
        if text.is_empty() {
            return Some(FrameBuffer::new(1, 1, PixelFormat::Rgba8));
        }

        let glyphs: Vec<_> = text
            .chars()
            .map(|ch| font.rasterize(ch, font_size))
            .collect();
        let (pens, width) = pen_positions(glyphs.iter().map(|(m, _)| m.advance_width));

        let mut max_ascent: i32 = 0;
        let mut max_descent: i32 = 0;
        for (metrics, _) in &glyphs {
            let ascent = metrics.height as i32 + metrics.ymin;
            let descent = -metrics.ymin;
            max_ascent = max_ascent.max(ascent);
            max_descent = max_descent.max(descent);
        }

        let height = (max_ascent + max_descent).max(1) as u32;
        let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
        let [r, g, b, a] = color.to_rgba8();

        for ((metrics, bitmap), pen_x) in glyphs.iter().zip(pens) {
            let glyph_x = pen_x + metrics.xmin;
            let glyph_y = max_ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let px = glyph_x + gx as i32;
                    let py = glyph_y + gy as i32;
                    if px >= 0 && px < fb.width as i32 && py >= 0 && py < fb.height as i32 {
                        let glyph_alpha = (coverage as f32 / 255.0) * (a as f32 / 255.0);
                        let final_alpha = (glyph_alpha * 255.0) as u8;
                        fb.set_pixel(px as u32, py as u32, [r, g, b, final_alpha]);
                    }
                }
            }
        }

        Some(fb)
    }
}

/// Pen x position for each glyph plus the total line width. Fractional
/// advances accumulate in f32 and round per glyph, so long labels do
/// not drift narrow from per-glyph truncation.
fn pen_positions(advances: impl Iterator<Item = f32>) -> (Vec<i32>, u32) {
    let mut pens = Vec::new();
    let mut cursor = 0.0f32;
    for advance in advances {
        pens.push(cursor.round() as i32);
        cursor += advance;
    }
    (pens, (cursor.ceil() as i32).max(1) as u32)
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_font_yields_none() {
        let renderer = TextRenderer::new();
        assert!(!renderer.has_font());
        assert!(renderer.render_line("Base", 14.0, &Color::WHITE).is_none());
    }

    #[test]
    fn test_pen_positions_accumulate_fractional_advances() {
        let (pens, width) = pen_positions(std::iter::repeat(6.5f32).take(10));
        // The last pen sits at 9 * 6.5 = 58.5; truncating each advance
        // to 6 would have put it at 54.
        assert_eq!(pens[9], 59);
        assert_eq!(width, 65);
    }

    #[test]
    fn test_pen_positions_empty_line() {
        let (pens, width) = pen_positions(std::iter::empty());
        assert!(pens.is_empty());
        assert_eq!(width, 1);
    }

    #[test]
    fn test_load_font_missing_file() {
        let mut renderer = TextRenderer::new();
        let result = renderer.load_font(Path::new("/nonexistent/font.ttf"));
        assert!(result.is_err());
        assert!(!renderer.has_font());
    }
}
