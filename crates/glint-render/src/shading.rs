//! CPU shading for the card effect layers.
//!
//! Every function here is a pure mapping from (size, parameters, tilt,
//! time) to pixels: no caches, no global state, no randomness beyond
//! hash noise seeded by pixel position. Rendering the same inputs twice
//! yields byte-identical buffers. Rows are shaded in parallel.

use rayon::prelude::*;

use glint_card::params::{
    FoilParams, FoilPattern, FoilRimParams, GlassParams, LightParams, MetalParams, SparkleParams,
    SpecularParams,
};
use glint_core::frame::FrameBuffer;
use glint_core::{Color, PixelFormat, TiltSample};

const TAU: f32 = std::f32::consts::TAU;

/// Deterministic hash noise in [0, 1), the usual fract-sin construction.
fn hash21(x: f32, y: f32) -> f32 {
    let d = x * 127.1 + y * 311.7;
    (d.sin() * 43758.547).rem_euclid(1.0)
}

/// Smoothly interpolated 1D value noise.
fn value_noise(t: f32, seed: f32) -> f32 {
    let i = t.floor();
    let f = t - i;
    let a = hash21(i, seed);
    let b = hash21(i + 1.0, seed);
    let u = f * f * (3.0 - 2.0 * f);
    a + (b - a) * u
}

fn put(px: &mut [u8], r: f32, g: f32, b: f32, a: f32) {
    px[0] = (r.clamp(0.0, 1.0) * 255.0).round() as u8;
    px[1] = (g.clamp(0.0, 1.0) * 255.0).round() as u8;
    px[2] = (b.clamp(0.0, 1.0) * 255.0).round() as u8;
    px[3] = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

/// Shades each pixel of a new Rgba8 frame in parallel rows.
fn shade(width: u32, height: u32, f: impl Fn(u32, u32, &mut [u8]) + Sync) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    let row_bytes = width as usize * 4;
    frame
        .data
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width as usize {
                f(x as u32, y as u32, &mut row[x * 4..x * 4 + 4]);
            }
        });
    frame
}

/// Spatial field driving the foil hue at a normalized position.
fn foil_field(u: f32, v: f32, pattern: FoilPattern, scale: f32) -> f32 {
    let s = scale.max(0.01);
    match pattern {
        FoilPattern::Diagonal => (u + v) * 1.5 * s,
        FoilPattern::Diamond => ((u - 0.5).abs() + (v - 0.5).abs()) * 3.0 * s,
        FoilPattern::Radial => {
            let dx = u - 0.5;
            let dy = v - 0.5;
            (dx * dx + dy * dy).sqrt() * 3.0 * s
        }
        FoilPattern::Linear => u * 3.0 * s,
        FoilPattern::Crisscross => {
            ((u * 9.0 * s).sin() + (v * 9.0 * s).sin()) * 0.25 + (u - v) * s
        }
        FoilPattern::Fluid => {
            let a = (u * 5.0 * s + (v * 4.0 * s).sin()).sin();
            let b = (v * 6.0 * s + (u * 3.0 * s).cos()).sin();
            (a + b) * 0.3
        }
        FoilPattern::Facet => {
            let cx = (u * 6.0 * s).floor();
            let cy = (v * 8.0 * s).floor();
            hash21(cx, cy)
        }
        FoilPattern::Waves => ((u * 10.0 * s + (v * 5.0 * s).sin() * 2.0).sin()) * 0.4 + v * s,
    }
}

/// Rainbow holographic foil. The hue field shifts with tilt and drifts
/// with time; saturation and transparency come from the parameters and
/// the layer alpha carries the intensity.
pub fn render_foil(
    width: u32,
    height: u32,
    base: Color,
    params: &FoilParams,
    tilt: TiltSample,
    time: f32,
) -> FrameBuffer {
    let shift = time * params.speed + (tilt.roll + tilt.pitch) * 0.5;
    shade(width, height, |x, y, px| {
        let u = (x as f32 + 0.5) / width as f32;
        let v = (y as f32 + 0.5) / height as f32;
        let field = foil_field(u, v, params.pattern, params.scale);
        let hue = (field + shift).rem_euclid(1.0);
        let rainbow = Color::from_hsv(hue, params.saturation, 1.0);
        let mixed = rainbow.lerp(&base, params.transparency);
        put(px, mixed.r, mixed.g, mixed.b, params.intensity);
    })
}

/// Tilt-tracking specular highlight: a soft spot whose center moves
/// opposite the tilt, with a power-curve falloff.
pub fn render_specular(
    width: u32,
    height: u32,
    params: &SpecularParams,
    tilt: TiltSample,
) -> FrameBuffer {
    let cx = (0.5 + tilt.roll * 0.5) * width as f32;
    let cy = (0.5 - tilt.pitch * 0.5) * height as f32;
    let extent = width.min(height) as f32 * params.size.max(0.01);
    let color = params.color;
    shade(width, height, |x, y, px| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let d = (dx * dx + dy * dy).sqrt() / extent;
        let val = (1.0 - d).clamp(0.0, 1.0).powf(params.falloff.max(0.01));
        put(px, color.r, color.g, color.b, val * params.intensity * color.a);
    })
}

/// Glitter particles on a jittered grid. Each cell hosts at most one
/// particle; the twinkle phase is seeded per cell and advanced by time
/// and tilt, so tilting the card makes different particles catch light.
pub fn render_sparkle(
    width: u32,
    height: u32,
    params: &SparkleParams,
    tilt: TiltSample,
    time: f32,
) -> FrameBuffer {
    let cells = 18.0 / params.size.max(0.2);
    let phase_shift = time * params.speed + (tilt.pitch + tilt.roll) * 4.0;
    shade(width, height, |x, y, px| {
        let u = (x as f32 + 0.5) / width as f32 * cells;
        let v = (y as f32 + 0.5) / height as f32 * cells * (height as f32 / width as f32);
        let cell_x = u.floor();
        let cell_y = v.floor();
        let seed = hash21(cell_x, cell_y);
        if seed > params.density {
            put(px, 0.0, 0.0, 0.0, 0.0);
            return;
        }
        // Particle center jittered inside the cell.
        let jx = 0.25 + 0.5 * hash21(cell_x + 13.0, cell_y);
        let jy = 0.25 + 0.5 * hash21(cell_x, cell_y + 29.0);
        let dx = u - cell_x - jx;
        let dy = v - cell_y - jy;
        let d = (dx * dx + dy * dy).sqrt() / 0.3;
        let twinkle = ((seed * TAU + phase_shift).sin() * 0.5 + 0.5).powi(2);
        let val = (1.0 - d).clamp(0.0, 1.0) * twinkle;
        put(px, 1.0, 1.0, 1.0, val);
    })
}

/// Brushed metal: the base color modulated by smooth grain streaks
/// running along the brush direction.
pub fn render_brushed_metal(
    width: u32,
    height: u32,
    base: Color,
    params: &MetalParams,
) -> FrameBuffer {
    let (sin_a, cos_a) = params.brush_angle.sin_cos();
    let grain_freq = 0.6 * params.grain_scale.max(0.01);
    shade(width, height, |x, y, px| {
        let fx = x as f32 + 0.5;
        let fy = y as f32 + 0.5;
        // Distance across the grain; streaks are constant along it.
        let cross = -fx * sin_a + fy * cos_a;
        let n = value_noise(cross * grain_freq, 3.0) * 0.7
            + value_noise(cross * grain_freq * 3.3, 11.0) * 0.3;
        let lum = 1.0 + (n - 0.5) * 0.7 * params.reflectivity;
        put(px, base.r * lum, base.g * lum, base.b * lum, base.a);
    })
}

/// Anisotropic light streak: a specular spot stretched along the brush
/// direction, tracking tilt like the round highlight.
pub fn render_aniso_light(
    width: u32,
    height: u32,
    params: &LightParams,
    tilt: TiltSample,
) -> FrameBuffer {
    let cx = (0.5 + tilt.roll * 0.5) * width as f32;
    let cy = (0.5 - tilt.pitch * 0.5) * height as f32;
    let extent = width.min(height) as f32 * params.size.max(0.01);
    let stretch = params.stretch.max(1.0);
    let (sin_a, cos_a) = params.brush_angle.sin_cos();
    let color = params.color;
    shade(width, height, |x, y, px| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let along = dx * cos_a + dy * sin_a;
        let across = -dx * sin_a + dy * cos_a;
        let d = ((along / stretch).powi(2) + across * across).sqrt() / extent;
        let val = (1.0 - d).clamp(0.0, 1.0).powf(params.softness.max(0.01));
        put(px, color.r, color.g, color.b, val * params.intensity * color.a);
    })
}

/// Signed distance to a rounded-rect border; negative inside.
pub(crate) fn rounded_rect_sd(x: f32, y: f32, width: f32, height: f32, radius: f32) -> f32 {
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    let qx = (x - width / 2.0).abs() - (width / 2.0 - r);
    let qy = (y - height / 2.0).abs() - (height / 2.0 - r);
    let ox = qx.max(0.0);
    let oy = qy.max(0.0);
    (ox * ox + oy * oy).sqrt() + qx.max(qy).min(0.0) - r
}

/// Plastic-foil rim: a glow hugging the rounded edge, with a sheen that
/// slides around the rim toward the tilt direction.
pub fn render_plastic_rim(
    width: u32,
    height: u32,
    params: &FoilRimParams,
    card_radius: f32,
    tilt: TiltSample,
) -> FrameBuffer {
    let w = width as f32;
    let h = height as f32;
    let radius = params.corner_radius.unwrap_or(card_radius);
    let band = (params.edge_width * w.min(h)).max(1.0);
    let tilt_dir = tilt.pitch.atan2(tilt.roll);
    let sheen_gain = tilt.magnitude().min(1.0);
    let sheen_exp = 1.0 / params.shine_size.max(0.05);
    shade(width, height, |x, y, px| {
        let fx = x as f32 + 0.5;
        let fy = y as f32 + 0.5;
        let sd = rounded_rect_sd(fx, fy, w, h, radius);
        let glow = (1.0 - sd.abs() / band).clamp(0.0, 1.0);
        if glow <= 0.0 {
            put(px, 0.0, 0.0, 0.0, 0.0);
            return;
        }
        let theta = (fy - h / 2.0).atan2(fx - w / 2.0);
        let sheen = (((theta - tilt_dir).cos() + 1.0) / 2.0).powf(sheen_exp);
        let val = glow * params.intensity * (0.55 + 0.45 * sheen * sheen_gain);
        put(px, 1.0, 1.0, 1.0, val);
    })
}

/// Smoked glass: refracts the backdrop with per-channel offsets for
/// chromatic aberration, mixes in smoke by clarity, and brightens a
/// band along the rounded edge.
pub fn render_smoke_glass(
    backdrop: &FrameBuffer,
    params: &GlassParams,
    card_radius: f32,
    tilt: TiltSample,
    time: f32,
) -> FrameBuffer {
    let width = backdrop.width;
    let height = backdrop.height;
    let w = width as f32;
    let h = height as f32;
    let radius = params.corner_radius.unwrap_or(card_radius);
    let band = (params.edge_width * w.min(h)).max(1.0);
    let t = time * params.speed;
    let amp = params.refraction * 6.0;
    let smoke = 0.08;
    shade(width, height, |x, y, px| {
        let u = (x as f32 + 0.5) / w;
        let v = (y as f32 + 0.5) / h;
        let ox = ((v * 9.0 + t + tilt.roll * 2.0).sin() + (u * 13.0 - t * 0.6).cos()) * 0.5 * amp;
        let oy = ((u * 7.0 - t * 0.8 + tilt.pitch * 2.0).cos() + (v * 11.0 + t).sin()) * 0.5 * amp;

        let mut rgb = [0.0f32; 3];
        for (c, out) in rgb.iter_mut().enumerate() {
            let spread = 1.0 + params.aberration * (c as f32 - 1.0) * 0.35;
            let sampled = backdrop.sample_bilinear(
                (x as f32 + 0.5 + ox * spread) as f64,
                (y as f32 + 0.5 + oy * spread) as f64,
            );
            *out = sampled[c] * params.clarity + smoke * (1.0 - params.clarity);
        }

        let sd = rounded_rect_sd(x as f32 + 0.5, y as f32 + 0.5, w, h, radius);
        let edge = (1.0 - sd.abs() / band).clamp(0.0, 1.0) * 0.8;

        put(
            px,
            rgb[0] + edge,
            rgb[1] + edge,
            rgb[2] + edge,
            params.intensity,
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::hash::hash_frame;

    #[test]
    fn test_foil_is_deterministic() {
        let p = FoilParams::default();
        let tilt = TiltSample::new(0.2, -0.1);
        let a = render_foil(64, 90, Color::GOLD, &p, tilt, 1.5);
        let b = render_foil(64, 90, Color::GOLD, &p, tilt, 1.5);
        assert_eq!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_foil_alpha_carries_intensity() {
        let p = FoilParams {
            intensity: 0.8,
            ..FoilParams::default()
        };
        let frame = render_foil(16, 16, Color::GOLD, &p, TiltSample::ZERO, 0.0);
        let px = frame.get_pixel(8, 8).unwrap();
        assert_eq!(px[3], (0.8f32 * 255.0).round() as u8);
    }

    #[test]
    fn test_foil_time_moves_the_rainbow() {
        let p = FoilParams::default();
        let a = render_foil(64, 90, Color::GOLD, &p, TiltSample::ZERO, 0.0);
        let b = render_foil(64, 90, Color::GOLD, &p, TiltSample::ZERO, 1.0);
        assert_ne!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_specular_centered_at_zero_tilt() {
        let p = SpecularParams::default();
        let frame = render_specular(101, 101, &p, TiltSample::ZERO);
        let center = frame.get_pixel(50, 50).unwrap();
        let corner = frame.get_pixel(0, 0).unwrap();
        assert!(center[3] > 0);
        assert!(center[3] > corner[3]);
    }

    #[test]
    fn test_specular_tracks_roll() {
        let p = SpecularParams::default();
        let frame = render_specular(101, 101, &p, TiltSample::new(0.0, 0.6));
        // Highlight shifts right with positive roll.
        let right = frame.get_pixel(80, 50).unwrap();
        let left = frame.get_pixel(20, 50).unwrap();
        assert!(right[3] > left[3]);
    }

    #[test]
    fn test_sparkle_zero_density_is_empty() {
        let p = SparkleParams {
            density: 0.0,
            ..SparkleParams::default()
        };
        let frame = render_sparkle(64, 90, &p, TiltSample::ZERO, 0.5);
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn test_sparkle_twinkles_over_time() {
        let p = SparkleParams::default();
        let a = render_sparkle(64, 90, &p, TiltSample::ZERO, 0.0);
        let b = render_sparkle(64, 90, &p, TiltSample::ZERO, 0.5);
        assert_ne!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_brushed_metal_is_opaque() {
        let frame = render_brushed_metal(32, 32, Color::gray(0.78), &MetalParams::default());
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_aniso_streak_is_elongated() {
        let p = LightParams::default();
        let frame = render_aniso_light(201, 201, &p, TiltSample::ZERO);
        // With brush_angle 0 the streak runs horizontally: a point far
        // along x stays brighter than the same distance along y.
        let along = frame.get_pixel(180, 100).unwrap();
        let across = frame.get_pixel(100, 180).unwrap();
        assert!(along[3] > across[3]);
    }

    #[test]
    fn test_rim_glow_hugs_the_edge() {
        let p = FoilRimParams::default();
        let frame = render_plastic_rim(100, 140, &p, 20.0, TiltSample::new(0.3, 0.2));
        let edge = frame.get_pixel(50, 0).unwrap();
        let center = frame.get_pixel(50, 70).unwrap();
        assert!(edge[3] > 0);
        assert_eq!(center[3], 0);
    }

    #[test]
    fn test_rounded_rect_sd_signs() {
        assert!(rounded_rect_sd(50.0, 70.0, 100.0, 140.0, 20.0) < 0.0);
        assert!(rounded_rect_sd(1.0, 1.0, 100.0, 140.0, 20.0) > 0.0);
        assert!(rounded_rect_sd(50.0, 0.0, 100.0, 140.0, 20.0).abs() < 1.0);
    }

    #[test]
    fn test_smoke_glass_darkens_bright_backdrop() {
        let backdrop = FrameBuffer::solid(60, 84, &Color::WHITE);
        let p = GlassParams {
            clarity: 0.5,
            edge_width: 0.0,
            ..GlassParams::default()
        };
        let frame = render_smoke_glass(&backdrop, &p, 0.0, TiltSample::ZERO, 0.0);
        let px = frame.get_pixel(30, 42).unwrap();
        assert!(px[0] < 255);
        assert_eq!(px[3], (p.intensity * 255.0).round() as u8);
    }
}
