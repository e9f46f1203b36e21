//! Rigid poses and projection matrices
//!
//! Camera conventions: the camera looks down its local -Z axis, the viewing
//! volume lies between the near and far planes with `0 > near > far`, and both
//! projections map near to z = -1 and far to z = +1 so that smaller depth is
//! closer.

use serde::{Serialize, Deserialize};

use super::math::{Mat3, Mat4, Vec3};

/// Rotation followed by translation. With the columns of `rotation` being
/// the local axes in world coordinates, it takes local coordinates to world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isometry {
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl Default for Isometry {
    fn default() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

impl Isometry {
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self { rotation, translation }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.mul_vec(p) + self.translation
    }

    /// Inverse of [`Isometry::transform_point`]
    pub fn untransform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.transpose().mul_vec(p - self.translation)
    }

    pub fn rotate_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.mul_vec(d)
    }

    pub fn unrotate_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.transpose().mul_vec(d)
    }

    pub fn homogeneous(&self) -> Mat4 {
        Mat4::isometry(&self.rotation, self.translation)
    }

    /// Homogeneous form of the inverse isometry
    pub fn inverse_homogeneous(&self) -> Mat4 {
        let rot = self.rotation.transpose();
        let translation = -rot.mul_vec(self.translation);
        Mat4::isometry(&rot, translation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionKind {
    Orthographic,
    #[default]
    Perspective,
}

/// Viewing volume: `[left, right] x [bottom, top]` on the near plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub far: f32,
    pub near: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            far: -10.0,
            near: -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub kind: ProjectionKind,
    pub isometry: Isometry,
}

impl Camera {
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Boxy volume mapped to `[-1, 1]^3`
    pub fn orthographic(&self) -> Mat4 {
        let Projection { left: l, right: r, bottom: b, top: t, far: f, near: n } = self.projection;
        let mut m = Mat4::ZERO;
        m.m[0][0] = 2.0 / (r - l);
        m.m[0][3] = (-r - l) / (r - l);
        m.m[1][1] = 2.0 / (t - b);
        m.m[1][3] = (-t - b) / (t - b);
        m.m[2][2] = -2.0 / (n - f);
        m.m[2][3] = (n + f) / (n - f);
        m.m[3][3] = 1.0;
        m
    }

    pub fn inverse_orthographic(&self) -> Mat4 {
        let Projection { left: l, right: r, bottom: b, top: t, far: f, near: n } = self.projection;
        let mut m = Mat4::ZERO;
        m.m[0][0] = (r - l) / 2.0;
        m.m[0][3] = (r + l) / 2.0;
        m.m[1][1] = (t - b) / 2.0;
        m.m[1][3] = (t + b) / 2.0;
        m.m[2][2] = (n - f) / -2.0;
        m.m[2][3] = (n + f) / 2.0;
        m.m[3][3] = 1.0;
        m
    }

    /// Frustum whose near-plane rectangle is the projection rectangle and
    /// whose far-plane rectangle is that scaled by `far / near`
    pub fn perspective(&self) -> Mat4 {
        let Projection { left: l, right: r, bottom: b, top: t, far: f, near: n } = self.projection;
        let mut m = Mat4::ZERO;
        m.m[0][0] = (-2.0 * n) / (r - l);
        m.m[0][2] = (r + l) / (r - l);
        m.m[1][1] = (-2.0 * n) / (t - b);
        m.m[1][2] = (t + b) / (t - b);
        m.m[2][2] = (n + f) / (n - f);
        m.m[2][3] = (-2.0 * n * f) / (n - f);
        m.m[3][2] = -1.0;
        m
    }

    pub fn inverse_perspective(&self) -> Mat4 {
        let Projection { left: l, right: r, bottom: b, top: t, far: f, near: n } = self.projection;
        let mut m = Mat4::ZERO;
        m.m[0][0] = (r - l) / (-2.0 * n);
        m.m[0][3] = (r + l) / (-2.0 * n);
        m.m[1][1] = (t - b) / (-2.0 * n);
        m.m[1][3] = (t + b) / (-2.0 * n);
        m.m[2][3] = -1.0;
        m.m[3][2] = (n - f) / (-2.0 * n * f);
        m.m[3][3] = (n + f) / (-2.0 * n * f);
        m
    }

    /// Set the volume from a vertical field of view (full angle, radians),
    /// a focal distance and a near/far ratio: `far = -focal * ratio`,
    /// `near = -focal / ratio`. Orthographic cameras get the box matching the
    /// perspective frustum at the focal plane. Re-run after resizing.
    pub fn set_frustum(&mut self, fovy: f32, focal: f32, ratio: f32, width: f32, height: f32) {
        let p = &mut self.projection;
        p.far = -focal * ratio;
        p.near = -focal / ratio;
        let tan_half = (fovy * 0.5).tan();
        p.top = match self.kind {
            ProjectionKind::Perspective => -p.near * tan_half,
            ProjectionKind::Orthographic => focal * tan_half,
        };
        p.bottom = -p.top;
        p.right = p.top * width / height;
        p.left = -p.right;
    }

    /// Projection times inverse camera pose, for either projection kind
    pub fn projection_inverse_isometry(&self) -> Mat4 {
        let proj = match self.kind {
            ProjectionKind::Orthographic => self.orthographic(),
            ProjectionKind::Perspective => self.perspective(),
        };
        proj * self.isometry.inverse_homogeneous()
    }

    /// Third-person pose: aim at `target` from distance `rho` in the
    /// direction given by spherical angles `phi`, `theta`
    pub fn look_at(&mut self, target: Vec3, rho: f32, phi: f32, theta: f32) {
        let z = Vec3::spherical(1.0, phi, theta);
        let y = Vec3::spherical(1.0, std::f32::consts::FRAC_PI_2 - phi, theta + std::f32::consts::PI);
        self.isometry.rotation = Mat3::basis_rotation(Vec3::Y, Vec3::Z, y, z);
        self.isometry.translation = target + z * rho;
    }

    /// First-person pose: stand at `position` and look along the spherical
    /// direction `phi`, `theta`
    pub fn look_from(&mut self, position: Vec3, phi: f32, theta: f32) {
        let neg_z = Vec3::spherical(1.0, phi, theta);
        let y = Vec3::spherical(1.0, std::f32::consts::FRAC_PI_2 - phi, theta + std::f32::consts::PI);
        self.isometry.rotation = Mat3::basis_rotation(Vec3::Y, -Vec3::Z, y, neg_z);
        self.isometry.translation = position;
    }
}
