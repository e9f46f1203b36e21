//! Small fixed-size linear algebra for the pipeline
//!
//! Matrices are row-major: `m[row][col]`. Flat packing into uniform vectors
//! follows the same order, so `Mat4::from_slice(&unif[3..19])` reads back what
//! `Mat4::to_flat` wrote.

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point at distance `rho`, polar angle `phi` from +Z, azimuth `theta` from +X
    pub fn spherical(rho: f32, phi: f32, theta: f32) -> Self {
        Self {
            x: rho * phi.sin() * theta.cos(),
            y: rho * phi.sin() * theta.sin(),
            z: rho * phi.cos(),
        }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        self.scale(1.0 / l)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise product
    pub fn modulate(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_slice(s: &[f32]) -> Vec3 {
        Vec3::new(s[0], s[1], s[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// 2D Vector (screen positions, texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 2D cross product (z component of the 3D cross)
    pub fn perp_dot(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

/// dst[i] = a[i] + t * (b[i] - a[i]) over the common length
pub fn lerp_into(dst: &mut [f32], a: &[f32], b: &[f32], t: f32) {
    for ((d, &x), &y) in dst.iter_mut().zip(a).zip(b) {
        *d = x + t * (y - x);
    }
}

/// 2x2 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2 {
    pub m: [[f32; 2]; 2],
}

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2 { m: [[1.0, 0.0], [0.0, 1.0]] };

    pub fn from_columns(c0: Vec2, c1: Vec2) -> Self {
        Self { m: [[c0.x, c1.x], [c0.y, c1.y]] }
    }

    /// Counter-clockwise rotation by `angle` radians
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self { m: [[c, -s], [s, c]] }
    }

    pub fn determinant(&self) -> f32 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    /// None when the determinant is zero or not finite
    pub fn inverse(&self) -> Option<Mat2> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Mat2 {
            m: [
                [self.m[1][1] * inv, -self.m[0][1] * inv],
                [-self.m[1][0] * inv, self.m[0][0] * inv],
            ],
        })
    }

    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y,
            self.m[1][0] * v.x + self.m[1][1] * v.y,
        )
    }
}

/// 3x3 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };
    pub const ZERO: Mat3 = Mat3 { m: [[0.0; 3]; 3] };

    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self {
            m: [[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]],
        }
    }

    /// Read 9 row-major floats, e.g. a matrix packed into a uniform vector
    pub fn from_slice(s: &[f32]) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&s[i * 3..i * 3 + 3]);
        }
        Self { m }
    }

    pub fn to_flat(&self) -> [f32; 9] {
        let mut out = [0.0; 9];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(row);
        }
        out
    }

    /// Homogeneous 2D rotation followed by translation
    pub fn isometry_2d(angle: f32, translation: Vec2) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [[c, -s, translation.x], [s, c, translation.y], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation by `angle` radians about the unit vector `axis` (Rodrigues)
    pub fn angle_axis(angle: f32, axis: Vec3) -> Self {
        let (s, c) = angle.sin_cos();
        let u = Mat3 {
            m: [
                [0.0, -axis.z, axis.y],
                [axis.z, 0.0, -axis.x],
                [-axis.y, axis.x, 0.0],
            ],
        };
        let u2 = u * u;
        let mut out = Mat3::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] += s * u.m[i][j] + (1.0 - c) * u2.m[i][j];
            }
        }
        out
    }

    /// Rotation taking the orthonormal pair (u, v) to the orthonormal pair (a, b)
    pub fn basis_rotation(u: Vec3, v: Vec3, a: Vec3, b: Vec3) -> Self {
        let from = Mat3::from_columns(u, v, u.cross(v));
        let to = Mat3::from_columns(a, b, a.cross(b));
        to * from.transpose()
    }

    pub fn transpose(&self) -> Self {
        let mut out = Mat3::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = self.m[j][i];
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m = &self.m;
        let inv = 1.0 / det;
        let mut out = Mat3::ZERO;
        out.m[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv;
        out.m[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv;
        out.m[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv;
        out.m[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv;
        out.m[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv;
        out.m[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv;
        out.m[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv;
        out.m[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv;
        out.m[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv;
        Some(out)
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }
}

impl Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = Mat3::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        out
    }
}

/// 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };
    pub const ZERO: Mat4 = Mat4 { m: [[0.0; 4]; 4] };

    /// Read 16 row-major floats
    pub fn from_slice(s: &[f32]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&s[i * 4..i * 4 + 4]);
        }
        Self { m }
    }

    pub fn to_flat(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Rotation followed by translation, in homogeneous form
    pub fn isometry(rotation: &Mat3, translation: Vec3) -> Self {
        let mut out = Mat4::IDENTITY;
        for i in 0..3 {
            out.m[i][..3].copy_from_slice(&rotation.m[i]);
        }
        out.m[0][3] = translation.x;
        out.m[1][3] = translation.y;
        out.m[2][3] = translation.z;
        out
    }

    /// Maps normalized device coordinates [-1, 1]^2 onto a width x height
    /// pixel grid whose pixel centers sit on integer coordinates
    pub fn viewport(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut out = Mat4::IDENTITY;
        out.m[0][0] = w / 2.0;
        out.m[0][3] = (w - 1.0) / 2.0;
        out.m[1][1] = h / 2.0;
        out.m[1][3] = (h - 1.0) / 2.0;
        out
    }

    pub fn transpose(&self) -> Self {
        let mut out = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = self.m[j][i];
            }
        }
        out
    }

    pub fn mul_vec(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| self.m[i][k] * v[k]).sum();
        }
        out
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let c = Vec3::X.cross(Vec3::Y);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mat2_inverse() {
        let m = Mat2::from_columns(Vec2::new(2.0, 1.0), Vec2::new(1.0, 3.0));
        let inv = m.inverse().unwrap();
        let v = inv.mul_vec(m.mul_vec(Vec2::new(0.25, -4.0)));
        assert!(close(v.x, 0.25) && close(v.y, -4.0));
    }

    #[test]
    fn test_mat2_singular() {
        let m = Mat2::from_columns(Vec2::new(1.0, 2.0), Vec2::new(2.0, 4.0));
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_mat3_inverse_roundtrip() {
        let m = Mat3::angle_axis(0.7, Vec3::new(1.0, 1.0, 1.0).normalize());
        let p = m * m.inverse().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(close(p.m[i][j], expected));
            }
        }
    }

    #[test]
    fn test_angle_axis_rotates_x_to_y() {
        let r = Mat3::angle_axis(std::f32::consts::FRAC_PI_2, Vec3::Z);
        let v = r.mul_vec(Vec3::X);
        assert!(close(v.x, 0.0) && close(v.y, 1.0) && close(v.z, 0.0));
    }

    #[test]
    fn test_basis_rotation() {
        let r = Mat3::basis_rotation(Vec3::Y, Vec3::Z, Vec3::Z, Vec3::X);
        let y = r.mul_vec(Vec3::Y);
        let z = r.mul_vec(Vec3::Z);
        assert!(close(y.z, 1.0));
        assert!(close(z.x, 1.0));
    }

    #[test]
    fn test_flat_packing() {
        let m = Mat4::isometry(&Mat3::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        let flat = m.to_flat();
        assert_eq!(flat[3], 1.0);
        assert_eq!(flat[7], 2.0);
        assert_eq!(Mat4::from_slice(&flat), m);
    }

    #[test]
    fn test_viewport_maps_corners_to_pixel_centers() {
        let vp = Mat4::viewport(512, 256);
        let lo = vp.mul_vec([-1.0, -1.0, 0.0, 1.0]);
        let hi = vp.mul_vec([1.0, 1.0, 0.0, 1.0]);
        assert!(close(lo[0], -0.5) && close(lo[1], -0.5));
        assert!(close(hi[0], 511.5) && close(hi[1], 255.5));
    }
}
