//! Image loading module.
//! Decodes PNG, JPEG, WebP, and other formats into FrameBuffers.

use std::path::Path;

use glint_core::frame::FrameBuffer;
use glint_core::{GlintError, PixelFormat};

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> Result<FrameBuffer, GlintError> {
    let img = image::open(path).map_err(|e| {
        GlintError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    fb.data = rgba.into_raw();

    Ok(fb)
}

/// Resize an image to cover a target rectangle, cropping the overflow
/// around the center. Card image layers always fill the full card.
pub fn resize_to_fill(fb: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    if fb.width == width && fb.height == height {
        return fb.clone();
    }
    if width == 0 || height == 0 || fb.width == 0 || fb.height == 0 {
        return FrameBuffer::new(width.max(1), height.max(1), fb.format);
    }

    let scale = (width as f64 / fb.width as f64).max(height as f64 / fb.height as f64);
    let src_x0 = (fb.width as f64 - width as f64 / scale) / 2.0;
    let src_y0 = (fb.height as f64 - height as f64 / scale) / 2.0;

    let mut out = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    for y in 0..height {
        for x in 0..width {
            let sx = src_x0 + (x as f64 + 0.5) / scale - 0.5;
            let sy = src_y0 + (y as f64 + 0.5) / scale - 0.5;
            let [r, g, b, a] = fb.sample_bilinear(sx, sy);
            out.set_pixel(
                x,
                y,
                [
                    (r.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (g.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (b.clamp(0.0, 1.0) * 255.0).round() as u8,
                    (a.clamp(0.0, 1.0) * 255.0).round() as u8,
                ],
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Color;

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/image.png"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resize_to_fill_exact_size_is_clone() {
        let fb = FrameBuffer::solid(100, 140, &Color::RED);
        let out = resize_to_fill(&fb, 100, 140);
        assert_eq!(out.data, fb.data);
    }

    #[test]
    fn test_resize_to_fill_covers_target() {
        // A wide source covering a tall target crops left and right.
        let fb = FrameBuffer::solid(200, 100, &Color::GREEN);
        let out = resize_to_fill(&fb, 50, 100);
        assert_eq!(out.width, 50);
        assert_eq!(out.height, 100);
        // Every pixel comes from inside the source, so none are blank.
        assert!(out.get_pixel(0, 0).unwrap()[3] > 0);
        assert!(out.get_pixel(49, 99).unwrap()[3] > 0);
    }
}
