use serde::{Deserialize, Serialize};

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f32,
    pub height: f32,
}

impl Size2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }
}

/// The current smoothed device tilt: signed pitch and roll.
///
/// Values are roughly bounded to the device-tilt range but never
/// hard-clamped. One sample is produced per frame and reused for every
/// layer of that frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltSample {
    pub pitch: f32,
    pub roll: f32,
}

impl TiltSample {
    pub const ZERO: TiltSample = TiltSample {
        pitch: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Combined tilt magnitude, used to scale the card shadow.
    pub fn magnitude(&self) -> f32 {
        self.pitch.abs() + self.roll.abs()
    }
}

/// Project the corners of a `w` x `h` rect rotated in 3D about an axis
/// through its center, back onto the 2D plane.
///
/// `anchor_z` shifts the rotation anchor along the z axis, which is what
/// spreads layers apart in the exploded view: every layer shares the same
/// rotation but sits at a different depth. `perspective` matches the
/// usual UI convention where larger values exaggerate foreshortening.
/// Returns corners in [TL, TR, BR, BL] order.
pub fn project_rect_3d(
    w: f64,
    h: f64,
    axis: [f64; 3],
    angle_deg: f64,
    anchor_z: f64,
    perspective: f64,
) -> [[f64; 2]; 4] {
    let corners = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
    let cx = w / 2.0;
    let cy = h / 2.0;

    // Normalize the rotation axis; a zero axis degenerates to no rotation.
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len < 1e-12 || angle_deg.abs() < 1e-12 {
        return corners;
    }
    let k = [axis[0] / len, axis[1] / len, axis[2] / len];
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    let focal = w.max(h) / perspective.max(1e-6);

    let mut out = [[0.0f64; 2]; 4];
    for (i, c) in corners.iter().enumerate() {
        // Corner relative to the rotation anchor. The layer plane sits at
        // z = 0, so an anchor at +z places the plane at -anchor_z in
        // anchor space.
        let v = [c[0] - cx, c[1] - cy, -anchor_z];

        // Rodrigues rotation.
        let kv_cross = [
            k[1] * v[2] - k[2] * v[1],
            k[2] * v[0] - k[0] * v[2],
            k[0] * v[1] - k[1] * v[0],
        ];
        let k_dot_v = k[0] * v[0] + k[1] * v[1] + k[2] * v[2];
        let r = [
            v[0] * cos_t + kv_cross[0] * sin_t + k[0] * k_dot_v * (1.0 - cos_t),
            v[1] * cos_t + kv_cross[1] * sin_t + k[1] * k_dot_v * (1.0 - cos_t),
            v[2] * cos_t + kv_cross[2] * sin_t + k[2] * k_dot_v * (1.0 - cos_t),
        ];

        // Back out of anchor space, then perspective-divide toward the
        // viewer at +z.
        let z = r[2] + anchor_z;
        let denom = (focal - z).max(1e-6);
        let scale = focal / denom;
        out[i] = [cx + r[0] * scale, cy + r[1] * scale];
    }
    out
}

/// Compute the homography mapping `src` quad corners onto `dst` quad
/// corners via Gauss-Jordan elimination on the standard 8x8 system.
/// Returns a row-major 3x3 matrix, or None for degenerate quads.
pub fn homography_from_points(src: [[f64; 2]; 4], dst: [[f64; 2]; 4]) -> Option<[f64; 9]> {
    let mut a = [[0.0f64; 8]; 8];
    let mut b = [0.0f64; 8];

    for i in 0..4 {
        let x = src[i][0];
        let y = src[i][1];
        let xp = dst[i][0];
        let yp = dst[i][1];

        a[2 * i][0] = x;
        a[2 * i][1] = y;
        a[2 * i][2] = 1.0;
        a[2 * i][6] = -x * xp;
        a[2 * i][7] = -y * xp;
        b[2 * i] = xp;

        a[2 * i + 1][3] = x;
        a[2 * i + 1][4] = y;
        a[2 * i + 1][5] = 1.0;
        a[2 * i + 1][6] = -x * yp;
        a[2 * i + 1][7] = -y * yp;
        b[2 * i + 1] = yp;
    }

    // Augmented matrix for Gauss-Jordan.
    let mut m = [[0.0f64; 9]; 8];
    for r in 0..8 {
        m[r][..8].copy_from_slice(&a[r]);
        m[r][8] = b[r];
    }

    for col in 0..8 {
        let mut pivot = col;
        let mut best = m[col][col].abs();
        for r in (col + 1)..8 {
            let v = m[r][col].abs();
            if v > best {
                best = v;
                pivot = r;
            }
        }
        if best < 1e-12 {
            return None;
        }
        if pivot != col {
            m.swap(pivot, col);
        }

        let div = m[col][col];
        for c in col..=8 {
            m[col][c] /= div;
        }
        for r in 0..8 {
            if r == col {
                continue;
            }
            let factor = m[r][col];
            if factor.abs() < 1e-12 {
                continue;
            }
            for c in col..=8 {
                m[r][c] -= factor * m[col][c];
            }
        }
    }

    Some([
        m[0][8], m[1][8], m[2][8], m[3][8], m[4][8], m[5][8], m[6][8], m[7][8], 1.0,
    ])
}

/// Invert a row-major 3x3 matrix. Returns None if singular.
pub fn invert_3x3(m: [f64; 9]) -> Option<[f64; 9]> {
    let [a, b, c, d, e, f, g, h, i] = m;

    let det = a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;

    Some([
        (e * i - f * h) * inv_det,
        (c * h - b * i) * inv_det,
        (b * f - c * e) * inv_det,
        (f * g - d * i) * inv_det,
        (a * i - c * g) * inv_det,
        (c * d - a * f) * inv_det,
        (d * h - e * g) * inv_det,
        (b * g - a * h) * inv_det,
        (a * e - b * d) * inv_det,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_magnitude() {
        let t = TiltSample::new(-0.3, 0.2);
        assert!((t.magnitude() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_size_degenerate() {
        assert!(Size2D::new(0.0, 420.0).is_degenerate());
        assert!(!Size2D::new(300.0, 420.0).is_degenerate());
    }

    #[test]
    fn test_project_identity_when_no_rotation() {
        let corners = project_rect_3d(300.0, 420.0, [1.0, 0.0, 0.0], 0.0, 0.0, 0.4);
        assert_eq!(corners[0], [0.0, 0.0]);
        assert_eq!(corners[2], [300.0, 420.0]);
    }

    #[test]
    fn test_project_anchor_z_shifts_layers_apart() {
        // Two layers under the same rotation but different depths must
        // land on different quads.
        let near = project_rect_3d(300.0, 420.0, [1.0, -0.36, 0.0], 58.0, 140.0, 0.15);
        let far = project_rect_3d(300.0, 420.0, [1.0, -0.36, 0.0], 58.0, -140.0, 0.15);
        assert!((near[0][0] - far[0][0]).abs() > 1.0);
    }

    #[test]
    fn test_homography_identity() {
        let quad = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let h = homography_from_points(quad, quad).unwrap();
        assert!((h[0] - 1.0).abs() < 1e-9);
        assert!((h[4] - 1.0).abs() < 1e-9);
        assert!(h[1].abs() < 1e-9);
    }

    #[test]
    fn test_homography_translation() {
        let src = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let dst = [[5.0, 7.0], [15.0, 7.0], [15.0, 17.0], [5.0, 17.0]];
        let h = homography_from_points(src, dst).unwrap();
        // Map (0,0) -> (5,7)
        let w = h[6] * 0.0 + h[7] * 0.0 + h[8];
        let x = (h[0] * 0.0 + h[1] * 0.0 + h[2]) / w;
        let y = (h[3] * 0.0 + h[4] * 0.0 + h[5]) / w;
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_homography_degenerate_quad() {
        let src = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let dst = [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]];
        assert!(homography_from_points(src, dst).is_none());
    }

    #[test]
    fn test_invert_3x3_round_trip() {
        let m = [2.0, 0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 0.0, 1.0];
        let inv = invert_3x3(m).unwrap();
        // m * inv should be identity; spot-check the diagonal.
        let d0 = m[0] * inv[0] + m[1] * inv[3] + m[2] * inv[6];
        assert!((d0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invert_3x3_singular() {
        assert!(invert_3x3([1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0]).is_none());
    }
}
