use serde::{Deserialize, Serialize};

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
    /// 8-bit RGB (3 bytes per pixel, no alpha).
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A rendered surface as a raw pixel buffer.
///
/// Every layer renders into its own `FrameBuffer`; the compositor then
/// stacks them bottom-to-top into the card surface.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &crate::Color) -> Self {
        let format = PixelFormat::Rgba8;
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                self.data[offset + 3],
            ]),
            PixelFormat::Rgb8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                255,
            ]),
        }
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => {
                self.data[offset] = rgba[0];
                self.data[offset + 1] = rgba[1];
                self.data[offset + 2] = rgba[2];
                self.data[offset + 3] = rgba[3];
            }
            PixelFormat::Rgb8 => {
                self.data[offset] = rgba[0];
                self.data[offset + 1] = rgba[1];
                self.data[offset + 2] = rgba[2];
            }
        }
    }

    /// Multiply every pixel's alpha by `opacity` in [0, 1].
    pub fn scale_alpha(&mut self, opacity: f32) {
        if self.format != PixelFormat::Rgba8 {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        if (opacity - 1.0).abs() < f32::EPSILON {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            px[3] = (px[3] as f32 * opacity) as u8;
        }
    }

    /// Clip this buffer to a rounded rect covering its full extent.
    ///
    /// Pixels outside the rounded rect become fully transparent; pixels
    /// within one pixel of the curve get a coverage-weighted alpha so the
    /// corner edge stays smooth.
    pub fn apply_corner_radius(&mut self, radius: f32) {
        if self.format != PixelFormat::Rgba8 || radius <= 0.0 {
            return;
        }
        let w = self.width as f32;
        let h = self.height as f32;
        let r = radius.min(w / 2.0).min(h / 2.0);

        for y in 0..self.height {
            for x in 0..self.width {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                // Distance from the nearest corner circle center, or
                // negative when the pixel is in the straight-edge region.
                let cx = if px < r {
                    r - px
                } else if px > w - r {
                    px - (w - r)
                } else {
                    0.0
                };
                let cy = if py < r {
                    r - py
                } else if py > h - r {
                    py - (h - r)
                } else {
                    0.0
                };
                if cx == 0.0 || cy == 0.0 {
                    continue;
                }
                let dist = (cx * cx + cy * cy).sqrt();
                if dist <= r - 0.5 {
                    continue;
                }
                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                if dist >= r + 0.5 {
                    self.data[idx + 3] = 0;
                } else {
                    let coverage = (r + 0.5 - dist).clamp(0.0, 1.0);
                    self.data[idx + 3] = (self.data[idx + 3] as f32 * coverage) as u8;
                }
            }
        }
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    /// Uses integer math arranged so the inner loop auto-vectorizes.
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        if self.format != PixelFormat::Rgba8 || src.format != PixelFormat::Rgba8 {
            return;
        }

        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let src_stride = (src.width * 4) as usize;
        let dst_stride = (self.width * 4) as usize;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * 4);
            let dst_row_start = (dst_y as usize * dst_stride) + ((dx + start_x) as usize * 4);
            let len = (end_x - start_x) as usize * 4;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice.chunks_exact(4).zip(dst_slice.chunks_exact_mut(4)) {
                let sa = s[3] as u32;
                if sa == 0 {
                    continue;
                }
                if sa == 255 {
                    d.copy_from_slice(s);
                    continue;
                }

                let da = d[3] as u32;
                let inv_sa = 255 - sa;
                let out_a = sa + ((da * inv_sa) / 255);

                if out_a == 0 {
                    continue;
                }

                let s_r = s[0] as u32;
                let s_g = s[1] as u32;
                let s_b = s[2] as u32;
                let d_r = d[0] as u32;
                let d_g = d[1] as u32;
                let d_b = d[2] as u32;

                let out_r = (s_r * sa * 255 + d_r * da * inv_sa) / (out_a * 255);
                let out_g = (s_g * sa * 255 + d_g * da * inv_sa) / (out_a * 255);
                let out_b = (s_b * sa * 255 + d_b * da * inv_sa) / (out_a * 255);

                d[0] = out_r as u8;
                d[1] = out_g as u8;
                d[2] = out_b as u8;
                d[3] = out_a as u8;
            }
        }
    }

    /// Sample with bilinear filtering at a fractional coordinate.
    /// Samples outside the buffer read as transparent.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> [f32; 4] {
        if self.format != PixelFormat::Rgba8 {
            return [0.0; 4];
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = (x - x0) as f32;
        let fy = (y - y0) as f32;

        let fetch = |ix: i64, iy: i64| -> [f32; 4] {
            if ix < 0 || iy < 0 || ix >= self.width as i64 || iy >= self.height as i64 {
                return [0.0; 4];
            }
            let p = self
                .get_pixel(ix as u32, iy as u32)
                .unwrap_or([0, 0, 0, 0]);
            [
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
                p[3] as f32 / 255.0,
            ]
        };

        let p00 = fetch(x0 as i64, y0 as i64);
        let p10 = fetch(x0 as i64 + 1, y0 as i64);
        let p01 = fetch(x0 as i64, y0 as i64 + 1);
        let p11 = fetch(x0 as i64 + 1, y0 as i64 + 1);

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            let top = p00[c] * (1.0 - fx) + p10[c] * fx;
            let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
            out[c] = top * (1.0 - fy) + bottom * fy;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_frame_buffer_new() {
        let fb = FrameBuffer::new(300, 420, PixelFormat::Rgba8);
        assert_eq!(fb.width, 300);
        assert_eq!(fb.height, 420);
        assert_eq!(fb.byte_size(), 300 * 420 * 4);
        assert_eq!(fb.pixel_count(), 300 * 420);
    }

    #[test]
    fn test_frame_buffer_solid() {
        let fb = FrameBuffer::solid(2, 2, &Color::RED);
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_frame_buffer_out_of_bounds() {
        let fb = FrameBuffer::new(10, 10, PixelFormat::Rgba8);
        assert_eq!(fb.get_pixel(10, 0), None);
        assert_eq!(fb.get_pixel(0, 10), None);
    }

    #[test]
    fn test_composite_over_opaque() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::BLUE);
        let src = FrameBuffer::solid(2, 2, &Color::RED);
        dst.composite_over(&src, 1, 1);
        assert_eq!(dst.get_pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_composite_over_transparent() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::WHITE);
        let src = FrameBuffer::new(2, 2, PixelFormat::Rgba8); // all transparent
        dst.composite_over(&src, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_over_semi_transparent() {
        let mut dst = FrameBuffer::solid(2, 2, &Color::WHITE);
        let mut src = FrameBuffer::new(1, 1, PixelFormat::Rgba8);
        src.set_pixel(0, 0, [255, 0, 0, 128]);

        dst.composite_over(&src, 0, 0);

        let pixel = dst.get_pixel(0, 0).unwrap();
        assert!(pixel[0] > 200);
        assert!(pixel[1] > 50 && pixel[1] < 200);
        assert!(pixel[2] > 50 && pixel[2] < 200);
    }

    #[test]
    fn test_scale_alpha() {
        let mut fb = FrameBuffer::solid(2, 2, &Color::WHITE);
        fb.scale_alpha(0.5);
        let px = fb.get_pixel(0, 0).unwrap();
        assert!(px[3] >= 126 && px[3] <= 128);
    }

    #[test]
    fn test_corner_radius_clips_corners_not_center() {
        let mut fb = FrameBuffer::solid(40, 40, &Color::WHITE);
        fb.apply_corner_radius(10.0);
        // Hard corner pixel is clipped, center and edge midpoints are not.
        assert_eq!(fb.get_pixel(0, 0).unwrap()[3], 0);
        assert_eq!(fb.get_pixel(20, 20).unwrap()[3], 255);
        assert_eq!(fb.get_pixel(20, 0).unwrap()[3], 255);
    }

    #[test]
    fn test_sample_bilinear_interpolates() {
        let mut fb = FrameBuffer::new(2, 1, PixelFormat::Rgba8);
        fb.set_pixel(0, 0, [0, 0, 0, 255]);
        fb.set_pixel(1, 0, [255, 255, 255, 255]);
        let mid = fb.sample_bilinear(0.5, 0.0);
        assert!((mid[0] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_sample_bilinear_outside_is_transparent() {
        let fb = FrameBuffer::solid(2, 2, &Color::RED);
        assert_eq!(fb.sample_bilinear(-5.0, -5.0)[3], 0.0);
    }
}
