//! 3x3 column-major matrix
//!
//! Serves double duty: a 2D affine transform over homogeneous 2D points
//! (translate/scale/rotate/view) and a plain 3D linear map (axis
//! rotations, normal matrix).

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

use crate::{Quat, Vec2, Vec3};

/// 3x3 matrix, column-major. `mCR` is the element in column C, row R.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    pub m00: f32, pub m01: f32, pub m02: f32,
    pub m10: f32, pub m11: f32, pub m12: f32,
    pub m20: f32, pub m21: f32, pub m22: f32,
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Axis-aligned angles snap cos/sin to exact constants, but only for
// arguments that are literally a multiple of PI/2. Computed angles that
// merely land close take the ordinary path.
pub(crate) fn rotation_cos_sin(ang: f32) -> (f32, f32) {
    if ang == PI || ang == -PI {
        (-1.0, 0.0)
    } else if ang == PI * 0.5 || ang == -PI * 1.5 {
        (0.0, 1.0)
    } else if ang == -PI * 0.5 || ang == PI * 1.5 {
        (0.0, -1.0)
    } else {
        (ang.cos(), ang.sin())
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self::new(
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    );

    pub const ZERO: Self = Self::new(
        0.0, 0.0, 0.0,
        0.0, 0.0, 0.0,
        0.0, 0.0, 0.0,
    );

    /// Create a matrix from elements in column-major order
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m01: f32, m02: f32,
        m10: f32, m11: f32, m12: f32,
        m20: f32, m21: f32, m22: f32,
    ) -> Self {
        Self { m00, m01, m02, m10, m11, m12, m20, m21, m22 }
    }

    /// 2D translation matrix
    pub fn from_translation(x: f32, y: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m20 = x;
        m.m21 = y;
        m
    }

    /// 2D scaling matrix
    pub fn from_scale(x: f32, y: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m00 = x;
        m.m11 = y;
        m
    }

    /// 2D rotation matrix (counter-clockwise about +z)
    pub fn from_rotation(angle: f32) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        let mut m = Self::IDENTITY;
        m.m00 = cos;
        m.m01 = sin;
        m.m10 = -sin;
        m.m11 = cos;
        m
    }

    /// 3D rotation about the x axis, with axis-aligned angle snapping
    pub fn from_rotation_x(angle: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(angle);
        let mut m = Self::IDENTITY;
        m.m11 = cos;
        m.m12 = sin;
        m.m21 = -sin;
        m.m22 = cos;
        m
    }

    /// 3D rotation about the y axis, with axis-aligned angle snapping
    pub fn from_rotation_y(angle: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(angle);
        let mut m = Self::IDENTITY;
        m.m00 = cos;
        m.m02 = -sin;
        m.m20 = sin;
        m.m22 = cos;
        m
    }

    /// 3D rotation about the z axis, with axis-aligned angle snapping
    pub fn from_rotation_z(angle: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(angle);
        let mut m = Self::IDENTITY;
        m.m00 = cos;
        m.m01 = sin;
        m.m10 = -sin;
        m.m11 = cos;
        m
    }

    /// Rodrigues rotation about an arbitrary unit axis
    pub fn from_axis_angle(angle: f32, x: f32, y: f32, z: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        let omc = 1.0 - c;
        Self::new(
            c + x * x * omc,
            y * x * omc + z * s,
            z * x * omc - y * s,
            x * y * omc - z * s,
            c + y * y * omc,
            z * y * omc + x * s,
            x * z * omc + y * s,
            y * z * omc - x * s,
            c + z * z * omc,
        )
    }

    /// Rotation matrix of a quaternion
    pub fn from_quat(q: &Quat) -> Self {
        let dx = q.x + q.x;
        let dy = q.y + q.y;
        let dz = q.z + q.z;
        let q00 = dx * q.x;
        let q11 = dy * q.y;
        let q22 = dz * q.z;
        let q01 = dx * q.y;
        let q02 = dx * q.z;
        let q03 = dx * q.w;
        let q12 = dy * q.z;
        let q13 = dy * q.w;
        let q23 = dz * q.w;
        Self::new(
            1.0 - q11 - q22,
            q01 + q23,
            q02 - q13,
            q01 - q23,
            1.0 - q22 - q00,
            q12 + q03,
            q02 + q13,
            q12 - q03,
            1.0 - q11 - q00,
        )
    }

    /// 2D orthographic view matrix covering the given rectangle
    pub fn view(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m00 = 2.0 / (right - left);
        m.m11 = 2.0 / (top - bottom);
        m.m20 = (left + right) / (left - right);
        m.m21 = (bottom + top) / (bottom - top);
        m.m22 = -1.0;
        m
    }

    /// Build from elements in column-major order
    #[inline]
    pub const fn from_array(b: [f32; 9]) -> Self {
        Self::new(b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8])
    }

    /// Elements in column-major order, the layout uniform upload expects
    #[inline]
    pub fn to_array(self) -> [f32; 9] {
        [
            self.m00, self.m01, self.m02,
            self.m10, self.m11, self.m12,
            self.m20, self.m21, self.m22,
        ]
    }

    pub fn determinant(self) -> f32 {
        (self.m00 * self.m11 - self.m01 * self.m10) * self.m22
            + (self.m02 * self.m10 - self.m00 * self.m12) * self.m21
            + (self.m01 * self.m12 - self.m02 * self.m11) * self.m20
    }

    /// Invert via the adjugate.
    ///
    /// A singular matrix yields non-finite elements; check the
    /// determinant first if that matters.
    pub fn invert(self) -> Self {
        let s = 1.0 / self.determinant();
        Self::new(
            (self.m11 * self.m22 - self.m21 * self.m12) * s,
            (self.m21 * self.m02 - self.m01 * self.m22) * s,
            (self.m01 * self.m12 - self.m11 * self.m02) * s,
            (self.m20 * self.m12 - self.m10 * self.m22) * s,
            (self.m00 * self.m22 - self.m20 * self.m02) * s,
            (self.m10 * self.m02 - self.m00 * self.m12) * s,
            (self.m10 * self.m21 - self.m20 * self.m11) * s,
            (self.m20 * self.m01 - self.m00 * self.m21) * s,
            (self.m00 * self.m11 - self.m10 * self.m01) * s,
        )
    }

    pub fn transpose(self) -> Self {
        Self::new(
            self.m00, self.m10, self.m20,
            self.m01, self.m11, self.m21,
            self.m02, self.m12, self.m22,
        )
    }

    /// Inverse-transpose in one fused step, for transforming surface
    /// normals under non-uniform scale.
    pub fn normal_matrix(self) -> Self {
        let s = 1.0 / self.determinant();
        Self::new(
            (self.m11 * self.m22 - self.m21 * self.m12) * s,
            (self.m20 * self.m12 - self.m10 * self.m22) * s,
            (self.m10 * self.m21 - self.m20 * self.m11) * s,
            (self.m21 * self.m02 - self.m01 * self.m22) * s,
            (self.m00 * self.m22 - self.m20 * self.m02) * s,
            (self.m20 * self.m01 - self.m00 * self.m21) * s,
            (self.m01 * self.m12 - self.m11 * self.m02) * s,
            (self.m10 * self.m02 - self.m00 * self.m12) * s,
            (self.m00 * self.m11 - self.m10 * self.m01) * s,
        )
    }

    /// Matrix product `self * other`
    pub fn mul(self, other: Self) -> Self {
        Self::new(
            self.m00 * other.m00 + self.m10 * other.m01 + self.m20 * other.m02,
            self.m01 * other.m00 + self.m11 * other.m01 + self.m21 * other.m02,
            self.m02 * other.m00 + self.m12 * other.m01 + self.m22 * other.m02,
            self.m00 * other.m10 + self.m10 * other.m11 + self.m20 * other.m12,
            self.m01 * other.m10 + self.m11 * other.m11 + self.m21 * other.m12,
            self.m02 * other.m10 + self.m12 * other.m11 + self.m22 * other.m12,
            self.m00 * other.m20 + self.m10 * other.m21 + self.m20 * other.m22,
            self.m01 * other.m20 + self.m11 * other.m21 + self.m21 * other.m22,
            self.m02 * other.m20 + self.m12 * other.m21 + self.m22 * other.m22,
        )
    }

    /// Post-apply a 2D translation
    pub fn translate(self, x: f32, y: f32) -> Self {
        let mut dest = self;
        dest.m20 = self.m00 * x + self.m10 * y + self.m20;
        dest.m21 = self.m01 * x + self.m11 * y + self.m21;
        dest.m22 = self.m02 * x + self.m12 * y + self.m22;
        dest
    }

    /// Post-apply a 2D scaling
    pub fn scale(self, x: f32, y: f32) -> Self {
        let mut dest = self;
        dest.m00 = self.m00 * x;
        dest.m01 = self.m01 * x;
        dest.m02 = self.m02 * x;
        dest.m10 = self.m10 * y;
        dest.m11 = self.m11 * y;
        dest.m12 = self.m12 * y;
        dest
    }

    /// Post-apply a 2D rotation. Only the two affected columns are
    /// recomputed.
    pub fn rotate(self, ang: f32) -> Self {
        let cos = ang.cos();
        let sin = ang.sin();
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m10 * sin;
        dest.m01 = self.m01 * cos + self.m11 * sin;
        dest.m02 = self.m02 * cos + self.m12 * sin;
        dest.m10 = self.m00 * -sin + self.m10 * cos;
        dest.m11 = self.m01 * -sin + self.m11 * cos;
        dest.m12 = self.m02 * -sin + self.m12 * cos;
        dest
    }

    /// Post-apply a 2D rotation about the pivot `(x, y)`
    pub fn rotate_about(self, ang: f32, x: f32, y: f32) -> Self {
        let tm20 = self.m00 * x + self.m10 * y + self.m20;
        let tm21 = self.m01 * x + self.m11 * y + self.m21;
        let tm22 = self.m02 * x + self.m12 * y + self.m22;
        let cos = ang.cos();
        let sin = ang.sin();
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m10 * sin;
        dest.m01 = self.m01 * cos + self.m11 * sin;
        dest.m02 = self.m02 * cos + self.m12 * sin;
        dest.m10 = self.m00 * -sin + self.m10 * cos;
        dest.m11 = self.m01 * -sin + self.m11 * cos;
        dest.m12 = self.m02 * -sin + self.m12 * cos;
        dest.m20 = dest.m00 * -x + dest.m10 * -y + tm20;
        dest.m21 = dest.m01 * -x + dest.m11 * -y + tm21;
        dest.m22 = dest.m02 * -x + dest.m12 * -y + tm22;
        dest
    }

    /// Post-apply the 2D rotation that takes the unit direction
    /// `from_dir` onto the unit direction `to_dir`
    pub fn rotate_to(self, from_dir: Vec2, to_dir: Vec2) -> Self {
        let dot = from_dir.x * to_dir.x + from_dir.y * to_dir.y;
        let det = from_dir.x * to_dir.y - from_dir.y * to_dir.x;
        let mut dest = self;
        dest.m00 = self.m00 * dot + self.m10 * det;
        dest.m01 = self.m01 * dot + self.m11 * det;
        dest.m02 = self.m02 * dot + self.m12 * det;
        dest.m10 = self.m00 * -det + self.m10 * dot;
        dest.m11 = self.m01 * -det + self.m11 * dot;
        dest.m12 = self.m02 * -det + self.m12 * dot;
        dest
    }

    /// Post-apply a 3D rotation about the x axis, with axis-aligned
    /// angle snapping
    pub fn rotate_x(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m10 = self.m10 * cos + self.m20 * sin;
        dest.m11 = self.m11 * cos + self.m21 * sin;
        dest.m12 = self.m12 * cos + self.m22 * sin;
        dest.m20 = self.m10 * -sin + self.m20 * cos;
        dest.m21 = self.m11 * -sin + self.m21 * cos;
        dest.m22 = self.m12 * -sin + self.m22 * cos;
        dest
    }

    /// Post-apply a 3D rotation about the y axis, with axis-aligned
    /// angle snapping
    pub fn rotate_y(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m20 * -sin;
        dest.m01 = self.m01 * cos + self.m21 * -sin;
        dest.m02 = self.m02 * cos + self.m22 * -sin;
        dest.m20 = self.m00 * sin + self.m20 * cos;
        dest.m21 = self.m01 * sin + self.m21 * cos;
        dest.m22 = self.m02 * sin + self.m22 * cos;
        dest
    }

    /// Post-apply a 3D rotation about the z axis, with axis-aligned
    /// angle snapping
    pub fn rotate_z(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m10 * sin;
        dest.m01 = self.m01 * cos + self.m11 * sin;
        dest.m02 = self.m02 * cos + self.m12 * sin;
        dest.m10 = self.m00 * -sin + self.m10 * cos;
        dest.m11 = self.m01 * -sin + self.m11 * cos;
        dest.m12 = self.m02 * -sin + self.m12 * cos;
        dest
    }

    /// Post-apply a 2D orthographic view transformation
    pub fn mul_view(self, left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let rm00 = 2.0 / (right - left);
        let rm11 = 2.0 / (top - bottom);
        let rm20 = (left + right) / (left - right);
        let rm21 = (bottom + top) / (bottom - top);
        let mut dest = self;
        dest.m20 = self.m00 * rm20 + self.m10 * rm21 - self.m20;
        dest.m21 = self.m01 * rm20 + self.m11 * rm21 - self.m21;
        dest.m22 = self.m02 * rm20 + self.m12 * rm21 - self.m22;
        dest.m00 = self.m00 * rm00;
        dest.m01 = self.m01 * rm00;
        dest.m02 = self.m02 * rm00;
        dest.m10 = self.m10 * rm11;
        dest.m11 = self.m11 * rm11;
        dest.m12 = self.m12 * rm11;
        dest
    }

    /// The 2D point this matrix maps to the origin.
    ///
    /// Assumes a determinant of one, which holds for rigid transforms.
    pub fn origin(self) -> Vec2 {
        Vec2::new(
            self.m10 * self.m21 - self.m11 * self.m20,
            self.m01 * self.m20 - self.m00 * self.m21,
        )
    }

    /// Axis-aligned bounding rectangle `[min_x, min_y, max_x, max_y]` of
    /// the view rectangle of this 2D view matrix.
    ///
    /// Transforms the four corners `(+-1, +-1)` through the inverse and
    /// takes the componentwise extremes.
    pub fn view_area(self) -> [f32; 4] {
        let s = 1.0 / (self.m00 * self.m11 - self.m01 * self.m10);
        let rm00 = self.m11 * s;
        let rm01 = -self.m01 * s;
        let rm10 = -self.m10 * s;
        let rm11 = self.m00 * s;
        let rm20 = (self.m10 * self.m21 - self.m20 * self.m11) * s;
        let rm21 = (self.m20 * self.m01 - self.m00 * self.m21) * s;
        let nxny_x = -rm00 - rm10;
        let nxny_y = -rm01 - rm11;
        let pxny_x = rm00 - rm10;
        let pxny_y = rm01 - rm11;
        let nxpy_x = -rm00 + rm10;
        let nxpy_y = -rm01 + rm11;
        let pxpy_x = rm00 + rm10;
        let pxpy_y = rm01 + rm11;
        let min_x = nxny_x.min(nxpy_x).min(pxny_x).min(pxpy_x);
        let min_y = nxny_y.min(nxpy_y).min(pxny_y).min(pxpy_y);
        let max_x = nxny_x.max(nxpy_x).max(pxny_x).max(pxpy_x);
        let max_y = nxny_y.max(nxpy_y).max(pxny_y).max(pxpy_y);
        [min_x + rm20, min_y + rm21, max_x + rm20, max_y + rm21]
    }

    /// Transform a 3D vector by the full 3x3 matrix
    pub fn transform(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m00 * v.x + self.m10 * v.y + self.m20 * v.z,
            self.m01 * v.x + self.m11 * v.y + self.m21 * v.z,
            self.m02 * v.x + self.m12 * v.y + self.m22 * v.z,
        )
    }

    /// Transform a 2D point, applying translation
    pub fn transform_position(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m00 * v.x + self.m10 * v.y + self.m20,
            self.m01 * v.x + self.m11 * v.y + self.m21,
        )
    }

    /// Transform a 2D direction, ignoring translation
    pub fn transform_direction(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m00 * v.x + self.m10 * v.y,
            self.m01 * v.x + self.m11 * v.y,
        )
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Mat3::mul(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn mat_approx_eq(a: Mat3, b: Mat3) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array().iter())
            .all(|(x, y)| approx_eq(*x, *y))
    }

    fn vec2_approx_eq(a: Vec2, b: Vec2) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    #[test]
    fn test_identity_transform() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY.transform(v), v);
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Mat3::IDENTITY.determinant(), 1.0);
        let m = Mat3::from_scale(2.0, 3.0);
        assert_eq!(m.determinant(), 6.0);
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Mat3::from_rotation(0.7).translate(3.0, -1.0).scale(2.0, 0.5);
        let id = m.mul(m.invert());
        assert!(mat_approx_eq(id, Mat3::IDENTITY), "Expected identity, got {:?}", id);
    }

    #[test]
    fn test_invert_singular_is_not_finite() {
        let inv = Mat3::ZERO.invert();
        assert!(!inv.m00.is_finite());
    }

    #[test]
    fn test_transpose_involution() {
        let m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let m = Mat3::from_rotation(FRAC_PI_2);
        let p = m.transform_position(Vec2::X);
        assert!(vec2_approx_eq(p, Vec2::Y), "Expected Y, got {:?}", p);
    }

    #[test]
    fn test_rotation_snapping_is_exact() {
        let m = Mat3::from_rotation_z(PI);
        assert_eq!(m.m00, -1.0);
        assert_eq!(m.m01, 0.0);
        let m = Mat3::from_rotation_x(PI * 0.5);
        assert_eq!(m.m11, 0.0);
        assert_eq!(m.m12, 1.0);
        // Near misses must not snap
        let m = Mat3::from_rotation_z(PI + 1e-4);
        assert_ne!(m.m01, 0.0);
    }

    #[test]
    fn test_rotate_matches_dense_multiply() {
        let m = Mat3::from_translation(1.0, 2.0).scale(2.0, 3.0);
        let sparse = m.rotate(0.6);
        let dense = m.mul(Mat3::from_rotation(0.6));
        assert!(mat_approx_eq(sparse, dense), "Expected {:?}, got {:?}", dense, sparse);
    }

    #[test]
    fn test_rotate_xyz_match_dense_multiply() {
        let m = Mat3::from_axis_angle(0.4, 0.0, 1.0, 0.0);
        assert!(mat_approx_eq(m.rotate_x(0.8), m.mul(Mat3::from_rotation_x(0.8))));
        assert!(mat_approx_eq(m.rotate_y(0.8), m.mul(Mat3::from_rotation_y(0.8))));
        assert!(mat_approx_eq(m.rotate_z(0.8), m.mul(Mat3::from_rotation_z(0.8))));
    }

    #[test]
    fn test_mul_view_matches_dense_multiply() {
        let base = Mat3::from_rotation(0.3).translate(1.0, -2.0);
        let composed = base.mul_view(-3.0, 5.0, -1.0, 7.0);
        let dense = base.mul(Mat3::view(-3.0, 5.0, -1.0, 7.0));
        assert!(mat_approx_eq(composed, dense), "Expected {:?}, got {:?}", dense, composed);
    }

    #[test]
    fn test_from_axis_angle_matches_elementary() {
        let a = Mat3::from_axis_angle(0.9, 0.0, 0.0, 1.0);
        let b = Mat3::from_rotation_z(0.9);
        assert!(mat_approx_eq(a, b), "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_rotate_about_fixes_pivot() {
        let m = Mat3::IDENTITY.rotate_about(1.1, 3.0, -2.0);
        let pivot = Vec2::new(3.0, -2.0);
        let p = m.transform_position(pivot);
        assert!(vec2_approx_eq(p, pivot), "Pivot must not move, got {:?}", p);
    }

    #[test]
    fn test_rotate_to_maps_direction() {
        let from = Vec2::X;
        let to = Vec2::new(0.6, 0.8);
        let m = Mat3::IDENTITY.rotate_to(from, to);
        let d = m.transform_direction(from);
        assert!(vec2_approx_eq(d, to), "Expected {:?}, got {:?}", to, d);
    }

    #[test]
    fn test_view_maps_rectangle_to_unit_square() {
        let m = Mat3::view(0.0, 4.0, -2.0, 2.0);
        let bl = m.transform_position(Vec2::new(0.0, -2.0));
        let tr = m.transform_position(Vec2::new(4.0, 2.0));
        assert!(vec2_approx_eq(bl, Vec2::new(-1.0, -1.0)), "got {:?}", bl);
        assert!(vec2_approx_eq(tr, Vec2::new(1.0, 1.0)), "got {:?}", tr);
    }

    #[test]
    fn test_view_area_recovers_rectangle() {
        let m = Mat3::view(-3.0, 5.0, -1.0, 7.0);
        let area = m.view_area();
        assert!(approx_eq(area[0], -3.0), "got {:?}", area);
        assert!(approx_eq(area[1], -1.0), "got {:?}", area);
        assert!(approx_eq(area[2], 5.0), "got {:?}", area);
        assert!(approx_eq(area[3], 7.0), "got {:?}", area);
    }

    #[test]
    fn test_origin_of_rigid_transform() {
        let m = Mat3::from_rotation(0.5).translate(3.0, 4.0);
        // (-3, -4) is the point the transform maps to the origin
        let o = m.origin();
        assert!(vec2_approx_eq(o, Vec2::new(-3.0, -4.0)), "got {:?}", o);
        let p = m.transform_position(o);
        assert!(vec2_approx_eq(p, Vec2::ZERO), "got {:?}", p);
    }

    #[test]
    fn test_normal_matrix_is_inverse_transpose() {
        let m = Mat3::from_axis_angle(0.5, 1.0, 0.0, 0.0).mul(Mat3::new(
            2.0, 0.0, 0.0,
            0.0, 3.0, 0.0,
            0.0, 0.0, 0.5,
        ));
        let a = m.normal_matrix();
        let b = m.invert().transpose();
        assert!(mat_approx_eq(a, b), "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_quat_conversion_matches_transform() {
        let q = Quat::from_axis_angle(0.8, 0.0, 1.0, 0.0);
        let m = Mat3::from_quat(&q);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let a = m.transform(v);
        let b = q.transform(v);
        assert!(approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z));
    }

    #[test]
    fn test_array_round_trip() {
        let m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(Mat3::from_array(m.to_array()), m);
    }
}
