//! CPU compositing: blended source-over and projected-quad paths.

use glint_core::frame::FrameBuffer;
use glint_core::math::{homography_from_points, invert_3x3};
use glint_core::{BlendMode, PixelFormat};

/// Composite `src` into `dst` at (dx, dy) with a blend mode and opacity.
///
/// The blend mode mixes source and destination color channels first;
/// the result is then source-over composited using the source alpha
/// scaled by `opacity`. Normal at full opacity takes the plain
/// source-over fast path.
pub fn composite_blended(
    dst: &mut FrameBuffer,
    src: &FrameBuffer,
    dx: i32,
    dy: i32,
    mode: BlendMode,
    opacity: f32,
) {
    if dst.format != PixelFormat::Rgba8 || src.format != PixelFormat::Rgba8 {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    if mode == BlendMode::Normal && opacity >= 1.0 {
        return dst.composite_over(src, dx, dy);
    }

    let dst_w = dst.width as i32;
    let dst_h = dst.height as i32;

    for sy in 0..src.height as i32 {
        let ty = dy + sy;
        if ty < 0 || ty >= dst_h {
            continue;
        }
        for sx in 0..src.width as i32 {
            let tx = dx + sx;
            if tx < 0 || tx >= dst_w {
                continue;
            }
            let sp = src.get_pixel(sx as u32, sy as u32).unwrap_or([0; 4]);
            let sa = sp[3] as f32 / 255.0 * opacity;
            if sa <= 0.0 {
                continue;
            }
            let dp = dst.get_pixel(tx as u32, ty as u32).unwrap_or([0; 4]);
            let da = dp[3] as f32 / 255.0;

            let mut out = [0u8; 4];
            for c in 0..3 {
                let s = sp[c] as f32 / 255.0;
                let d = dp[c] as f32 / 255.0;
                // Blend against the destination only where it has
                // coverage; over transparent areas the source passes
                // through unchanged.
                let blended = mode.blend_channel(s, d) * da + s * (1.0 - da);
                let composited = blended * sa + d * da * (1.0 - sa);
                let out_a = sa + da * (1.0 - sa);
                out[c] = if out_a > 0.0 {
                    ((composited / out_a).clamp(0.0, 1.0) * 255.0).round() as u8
                } else {
                    0
                };
            }
            out[3] = ((sa + da * (1.0 - sa)).clamp(0.0, 1.0) * 255.0).round() as u8;
            dst.set_pixel(tx as u32, ty as u32, out);
        }
    }
}

/// Composite `src` into `dst` mapped onto a projected quad, corners in
/// [TL, TR, BR, BL] order. Pixels inside the quad inverse-map back into
/// the source through the homography and sample bilinearly.
pub fn composite_projected(dst: &mut FrameBuffer, src: &FrameBuffer, corners: [[f64; 2]; 4]) {
    if dst.format != PixelFormat::Rgba8 || src.format != PixelFormat::Rgba8 {
        return;
    }
    let w = src.width as f64;
    let h = src.height as f64;
    let src_pts = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
    let Some(h_mat) = homography_from_points(src_pts, corners) else {
        return;
    };
    let Some(inv) = invert_3x3(h_mat) else {
        return;
    };

    // Bounding box of the quad, clipped to the destination.
    let min_x = corners.iter().map(|c| c[0]).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c[0]).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c[1]).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c[1]).fold(f64::NEG_INFINITY, f64::max);

    let x0 = (min_x.floor().max(0.0)) as u32;
    let y0 = (min_y.floor().max(0.0)) as u32;
    let x1 = (max_x.ceil().min(dst.width as f64)) as u32;
    let y1 = (max_y.ceil().min(dst.height as f64)) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let denom = inv[6] * px + inv[7] * py + inv[8];
            if denom.abs() < 1e-12 {
                continue;
            }
            let sx = (inv[0] * px + inv[1] * py + inv[2]) / denom;
            let sy = (inv[3] * px + inv[4] * py + inv[5]) / denom;
            if sx < -0.5 || sy < -0.5 || sx > w - 0.5 || sy > h - 0.5 {
                continue;
            }
            let [sr, sg, sb, sa] = src.sample_bilinear(sx, sy);
            if sa <= 0.0 {
                continue;
            }
            let dp = dst.get_pixel(x, y).unwrap_or([0; 4]);
            let da = dp[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                continue;
            }
            let mut out = [0u8; 4];
            for (c, s) in [sr, sg, sb].into_iter().enumerate() {
                let d = dp[c] as f32 / 255.0;
                let composited = s * sa + d * da * (1.0 - sa);
                out[c] = ((composited / out_a).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            out[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
            dst.set_pixel(x, y, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Color;

    #[test]
    fn test_screen_brightens() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::gray(0.5));
        let src = FrameBuffer::solid(4, 4, &Color::gray(0.5));
        composite_blended(&mut dst, &src, 0, 0, BlendMode::Screen, 1.0);
        let px = dst.get_pixel(1, 1).unwrap();
        assert!(px[0] > 128);
    }

    #[test]
    fn test_multiply_darkens() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::gray(0.5));
        let src = FrameBuffer::solid(4, 4, &Color::gray(0.5));
        composite_blended(&mut dst, &src, 0, 0, BlendMode::Multiply, 1.0);
        let px = dst.get_pixel(1, 1).unwrap();
        assert!(px[0] < 128);
    }

    #[test]
    fn test_zero_opacity_is_a_no_op() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::BLACK);
        let before = dst.data.clone();
        let src = FrameBuffer::solid(4, 4, &Color::WHITE);
        composite_blended(&mut dst, &src, 0, 0, BlendMode::Normal, 0.0);
        assert_eq!(dst.data, before);
    }

    #[test]
    fn test_half_opacity_mixes() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::BLACK);
        let src = FrameBuffer::solid(4, 4, &Color::WHITE);
        composite_blended(&mut dst, &src, 0, 0, BlendMode::Normal, 0.5);
        let px = dst.get_pixel(0, 0).unwrap();
        assert!(px[0] > 100 && px[0] < 160);
    }

    #[test]
    fn test_blend_over_transparent_passes_source_through() {
        let mut dst = FrameBuffer::new(4, 4, PixelFormat::Rgba8);
        let src = FrameBuffer::solid(4, 4, &Color::gray(0.5));
        composite_blended(&mut dst, &src, 0, 0, BlendMode::Screen, 1.0);
        let px = dst.get_pixel(0, 0).unwrap();
        // No destination coverage, so screen degenerates to the source.
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_projected_identity_matches_offsets() {
        let mut a = FrameBuffer::new(20, 20, PixelFormat::Rgba8);
        let mut b = FrameBuffer::new(20, 20, PixelFormat::Rgba8);
        let src = FrameBuffer::solid(10, 10, &Color::RED);

        a.composite_over(&src, 5, 5);
        let corners = [[5.0, 5.0], [15.0, 5.0], [15.0, 15.0], [5.0, 15.0]];
        composite_projected(&mut b, &src, corners);

        // Interior pixels agree; edges may differ by filtering.
        let pa = a.get_pixel(10, 10).unwrap();
        let pb = b.get_pixel(10, 10).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(b.get_pixel(2, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_degenerate_quad_is_a_no_op() {
        let mut dst = FrameBuffer::new(20, 20, PixelFormat::Rgba8);
        let before = dst.data.clone();
        let src = FrameBuffer::solid(10, 10, &Color::RED);
        let corners = [[5.0, 5.0], [5.0, 5.0], [5.0, 5.0], [5.0, 5.0]];
        composite_projected(&mut dst, &src, corners);
        assert_eq!(dst.data, before);
    }
}
