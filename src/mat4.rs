//! 4x4 column-major matrix
//!
//! The workhorse transform type: model/view/projection construction,
//! optimized post-multiplication composes, frustum queries, and the
//! window-space project/unproject pair.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::mat3::rotation_cos_sin;
use crate::{Mat3, Quat, Vec3, Vec4};

/// 4x4 matrix, column-major. `mCR` is the element in column C, row R.
///
/// Operations never guard against singular or degenerate input; a
/// non-invertible matrix inverts to non-finite elements and flows
/// through downstream math as NaN. Only [`Mat4::frustum_plane`] and
/// [`Mat4::frustum_corner`] panic, on an out-of-range index.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    pub m00: f32, pub m01: f32, pub m02: f32, pub m03: f32,
    pub m10: f32, pub m11: f32, pub m12: f32, pub m13: f32,
    pub m20: f32, pub m21: f32, pub m22: f32, pub m23: f32,
    pub m30: f32, pub m31: f32, pub m32: f32, pub m33: f32,
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// Index of the left frustum plane (`x = -1`)
    pub const PLANE_NX: usize = 0;
    /// Index of the right frustum plane (`x = 1`)
    pub const PLANE_PX: usize = 1;
    /// Index of the bottom frustum plane (`y = -1`)
    pub const PLANE_NY: usize = 2;
    /// Index of the top frustum plane (`y = 1`)
    pub const PLANE_PY: usize = 3;
    /// Index of the near frustum plane (`z = -1`)
    pub const PLANE_NZ: usize = 4;
    /// Index of the far frustum plane (`z = 1`)
    pub const PLANE_PZ: usize = 5;

    /// Corner at `(-1, -1, -1)` in clip space (left, bottom, near)
    pub const CORNER_NXNYNZ: usize = 0;
    /// Corner at `(1, -1, -1)` (right, bottom, near)
    pub const CORNER_PXNYNZ: usize = 1;
    /// Corner at `(1, 1, -1)` (right, top, near)
    pub const CORNER_PXPYNZ: usize = 2;
    /// Corner at `(-1, 1, -1)` (left, top, near)
    pub const CORNER_NXPYNZ: usize = 3;
    /// Corner at `(1, -1, 1)` (right, bottom, far)
    pub const CORNER_PXNYPZ: usize = 4;
    /// Corner at `(-1, -1, 1)` (left, bottom, far)
    pub const CORNER_NXNYPZ: usize = 5;
    /// Corner at `(-1, 1, 1)` (left, top, far)
    pub const CORNER_NXPYPZ: usize = 6;
    /// Corner at `(1, 1, 1)` (right, top, far)
    pub const CORNER_PXPYPZ: usize = 7;

    pub const IDENTITY: Self = Self::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    pub const ZERO: Self = Self::new(
        0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0,
    );

    /// Create a matrix from elements in column-major order
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m01: f32, m02: f32, m03: f32,
        m10: f32, m11: f32, m12: f32, m13: f32,
        m20: f32, m21: f32, m22: f32, m23: f32,
        m30: f32, m31: f32, m32: f32, m33: f32,
    ) -> Self {
        Self {
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        }
    }

    /// Translation matrix
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m30 = x;
        m.m31 = y;
        m.m32 = z;
        m
    }

    /// Scaling matrix
    pub fn from_scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m00 = x;
        m.m11 = y;
        m.m22 = z;
        m
    }

    /// Rotation about the x axis, with axis-aligned angle snapping
    pub fn from_rotation_x(angle: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(angle);
        let mut m = Self::IDENTITY;
        m.m11 = cos;
        m.m12 = sin;
        m.m21 = -sin;
        m.m22 = cos;
        m
    }

    /// Rotation about the y axis, with axis-aligned angle snapping
    pub fn from_rotation_y(angle: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(angle);
        let mut m = Self::IDENTITY;
        m.m00 = cos;
        m.m02 = -sin;
        m.m20 = sin;
        m.m22 = cos;
        m
    }

    /// Rotation about the z axis, with axis-aligned angle snapping
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
            0.0,
            x * y * omc - z * s,
            c + y * y * omc,
            z * y * omc + x * s,
            0.0,
            x * z * omc + y * s,
            y * z * omc - x * s,
            c + z * z * omc,
            0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation matrix of a quaternion
    pub fn from_quat(q: &Quat) -> Self {
        let w2 = q.w * q.w;
        let x2 = q.x * q.x;
        let y2 = q.y * q.y;
        let z2 = q.z * q.z;
        let zw = q.z * q.w;
        let xy = q.x * q.y;
        let xz = q.x * q.z;
        let yw = q.y * q.w;
        let yz = q.y * q.z;
        let xw = q.x * q.w;
        Self::new(
            w2 + x2 - z2 - y2,
            xy + zw + zw + xy,
            xz - yw + xz - yw,
            0.0,
            -zw + xy - zw + xy,
            y2 - z2 + w2 - x2,
            yz + yz + xw + xw,
            0.0,
            yw + xz + xz + yw,
            yz + yz - xw - xw,
            z2 - y2 - x2 + w2,
            0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Orthographic projection mapping the given box onto the clip-space
    /// cube. `z_zero_to_one` selects the `[0, 1]` depth convention
    /// instead of `[-1, 1]`.
    pub fn ortho(
        left: f32, right: f32, bottom: f32, top: f32,
        z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let mut m = Self::IDENTITY;
        m.m00 = 2.0 / (right - left);
        m.m11 = 2.0 / (top - bottom);
        m.m22 = (if z_zero_to_one { 1.0 } else { 2.0 }) / (z_near - z_far);
        m.m30 = (right + left) / (left - right);
        m.m31 = (top + bottom) / (bottom - top);
        m.m32 = (if z_zero_to_one { z_near } else { z_far + z_near }) / (z_near - z_far);
        m
    }

    /// 2D orthographic projection, depth fixed to the `[-1, 1]` unit range
    pub fn ortho_2d(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.m00 = 2.0 / (right - left);
        m.m11 = 2.0 / (top - bottom);
        m.m22 = -1.0;
        m.m30 = -(right + left) / (right - left);
        m.m31 = -(top + bottom) / (top - bottom);
        m
    }

    /// Symmetric perspective projection from a vertical field of view.
    ///
    /// An infinite `z_far` (or `z_near`) builds the epsilon-perturbed
    /// infinite projection instead of dividing by infinity.
    pub fn perspective(
        fovy: f32, aspect: f32, z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let h = (fovy * 0.5).tan();
        let (m22, m32) = perspective_depth_terms(z_near, z_far, z_zero_to_one);
        let mut m = Self::ZERO;
        m.m00 = 1.0 / (h * aspect);
        m.m11 = 1.0 / h;
        m.m22 = m22;
        m.m32 = m32;
        m.m23 = -1.0;
        m
    }

    /// Off-center perspective projection from explicit near-plane extents
    pub fn frustum(
        left: f32, right: f32, bottom: f32, top: f32,
        z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let (m22, m32) = perspective_depth_terms(z_near, z_far, z_zero_to_one);
        let mut m = Self::ZERO;
        m.m00 = (z_near + z_near) / (right - left);
        m.m11 = (z_near + z_near) / (top - bottom);
        m.m20 = (right + left) / (right - left);
        m.m21 = (top + bottom) / (top - bottom);
        m.m22 = m22;
        m.m32 = m32;
        m.m23 = -1.0;
        m
    }

    /// Right-handed view matrix looking from `eye` toward `center`.
    ///
    /// A zero-length direction or an up vector parallel to it is not
    /// checked and yields non-finite elements.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        eye_x: f32, eye_y: f32, eye_z: f32,
        center_x: f32, center_y: f32, center_z: f32,
        up_x: f32, up_y: f32, up_z: f32,
    ) -> Self {
        let dir = Vec3::new(eye_x - center_x, eye_y - center_y, eye_z - center_z).normalized();
        let left = Vec3::new(up_x, up_y, up_z).cross(dir).normalized();
        let upn = dir.cross(left);
        Self::new(
            left.x, upn.x, dir.x, 0.0,
            left.y, upn.y, dir.y, 0.0,
            left.z, upn.z, dir.z, 0.0,
            -(left.x * eye_x + left.y * eye_y + left.z * eye_z),
            -(upn.x * eye_x + upn.y * eye_y + upn.z * eye_z),
            -(dir.x * eye_x + dir.y * eye_y + dir.z * eye_z),
            1.0,
        )
    }

    /// Reflection across the plane `ax + by + cz + d = 0`; the plane
    /// normal `(a, b, c)` must be unit length
    pub fn reflection(a: f32, b: f32, c: f32, d: f32) -> Self {
        let da = a + a;
        let db = b + b;
        let dc = c + c;
        let dd = d + d;
        Self::new(
            1.0 - da * a, -da * b, -da * c, 0.0,
            -db * a, 1.0 - db * b, -db * c, 0.0,
            -dc * a, -dc * b, 1.0 - dc * c, 0.0,
            -dd * a, -dd * b, -dd * c, 1.0,
        )
    }

    /// Reflection across the plane through `point` with the given
    /// (not necessarily unit) normal
    pub fn reflection_about(normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalized();
        Self::reflection(n.x, n.y, n.z, -n.dot(point))
    }

    /// Reflection across the plane through `point` whose normal is the
    /// `+z` axis of the given rotation
    pub fn reflection_quat(orientation: &Quat, point: Vec3) -> Self {
        let num1 = orientation.x + orientation.x;
        let num2 = orientation.y + orientation.y;
        let num3 = orientation.z + orientation.z;
        let normal = Vec3::new(
            orientation.x * num3 + orientation.w * num2,
            orientation.y * num3 - orientation.w * num1,
            1.0 - (orientation.x * num1 + orientation.y * num2),
        );
        Self::reflection_about(normal, point)
    }

    /// Model matrix placing an object at `obj`, facing `target`, free to
    /// rotate only about the fixed `up` axis
    pub fn billboard_cylindrical(obj: Vec3, target: Vec3, up: Vec3) -> Self {
        let left = up.cross(target - obj).normalized();
        let dir = left.cross(up).normalized();
        Self::new(
            left.x, left.y, left.z, 0.0,
            up.x, up.y, up.z, 0.0,
            dir.x, dir.y, dir.z, 0.0,
            obj.x, obj.y, obj.z, 1.0,
        )
    }

    /// Model matrix placing an object at `obj`, fully rotated to face
    /// `target`, using `up` to orient the vertical
    pub fn billboard_spherical(obj: Vec3, target: Vec3, up: Vec3) -> Self {
        let dir = (target - obj).normalized();
        let left = up.cross(dir).normalized();
        let upn = dir.cross(left);
        Self::new(
            left.x, left.y, left.z, 0.0,
            upn.x, upn.y, upn.z, 0.0,
            dir.x, dir.y, dir.z, 0.0,
            obj.x, obj.y, obj.z, 1.0,
        )
    }

    /// Up-less spherical billboard using the minimal rotation that takes
    /// `+z` onto the facing direction
    pub fn billboard_spherical_shortest(obj: Vec3, target: Vec3) -> Self {
        let to_dir = target - obj;
        // Shortest-arc quaternion from +z to to_dir, written out inline
        let x = -to_dir.y;
        let y = to_dir.x;
        let w = to_dir.length() + to_dir.z;
        let inv_norm = 1.0 / (x * x + y * y + w * w).sqrt();
        let x = x * inv_norm;
        let y = y * inv_norm;
        let w = w * inv_norm;
        let q00 = (x + x) * x;
        let q11 = (y + y) * y;
        let q01 = (x + x) * y;
        let q03 = (x + x) * w;
        let q13 = (y + y) * w;
        Self::new(
            1.0 - q11, q01, -q13, 0.0,
            q01, 1.0 - q00, q03, 0.0,
            q13, -q03, 1.0 - q11 - q00, 0.0,
            obj.x, obj.y, obj.z, 1.0,
        )
    }

    /// Build from elements in column-major order
    #[inline]
    pub const fn from_array(b: [f32; 16]) -> Self {
        Self::new(
            b[0], b[1], b[2], b[3],
            b[4], b[5], b[6], b[7],
            b[8], b[9], b[10], b[11],
            b[12], b[13], b[14], b[15],
        )
    }

    /// Elements in column-major order, the layout uniform upload expects
    #[inline]
    pub fn to_array(self) -> [f32; 16] {
        [
            self.m00, self.m01, self.m02, self.m03,
            self.m10, self.m11, self.m12, self.m13,
            self.m20, self.m21, self.m22, self.m23,
            self.m30, self.m31, self.m32, self.m33,
        ]
    }

    pub fn determinant(self) -> f32 {
        (self.m00 * self.m11 - self.m01 * self.m10) * (self.m22 * self.m33 - self.m23 * self.m32)
            + (self.m02 * self.m10 - self.m00 * self.m12) * (self.m21 * self.m33 - self.m23 * self.m31)
            + (self.m00 * self.m13 - self.m03 * self.m10) * (self.m21 * self.m32 - self.m22 * self.m31)
            + (self.m01 * self.m12 - self.m02 * self.m11) * (self.m20 * self.m33 - self.m23 * self.m30)
            + (self.m03 * self.m11 - self.m01 * self.m13) * (self.m20 * self.m32 - self.m22 * self.m30)
            + (self.m02 * self.m13 - self.m03 * self.m12) * (self.m20 * self.m31 - self.m21 * self.m30)
    }

    /// Determinant of the upper-left 3x3 submatrix
    pub fn determinant_3x3(self) -> f32 {
        (self.m00 * self.m11 - self.m01 * self.m10) * self.m22
            + (self.m02 * self.m10 - self.m00 * self.m12) * self.m21
            + (self.m01 * self.m12 - self.m02 * self.m11) * self.m20
    }

    /// General inverse via paired 2x2 cofactor products.
    ///
    /// A singular matrix yields non-finite elements.
    pub fn invert(self) -> Self {
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let c = self.m00 * self.m13 - self.m03 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let e = self.m01 * self.m13 - self.m03 * self.m11;
        let f = self.m02 * self.m13 - self.m03 * self.m12;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let i = self.m20 * self.m33 - self.m23 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        let k = self.m21 * self.m33 - self.m23 * self.m31;
        let l = self.m22 * self.m33 - self.m23 * self.m32;
        let det = a * l - b * k + c * j + d * i - e * h + f * g;
        let det = 1.0 / det;
        Self::new(
            (self.m11 * l - self.m12 * k + self.m13 * j) * det,
            (-self.m01 * l + self.m02 * k - self.m03 * j) * det,
            (self.m31 * f - self.m32 * e + self.m33 * d) * det,
            (-self.m21 * f + self.m22 * e - self.m23 * d) * det,
            (-self.m10 * l + self.m12 * i - self.m13 * h) * det,
            (self.m00 * l - self.m02 * i + self.m03 * h) * det,
            (-self.m30 * f + self.m32 * c - self.m33 * b) * det,
            (self.m20 * f - self.m22 * c + self.m23 * b) * det,
            (self.m10 * k - self.m11 * i + self.m13 * g) * det,
            (-self.m00 * k + self.m01 * i - self.m03 * g) * det,
            (self.m30 * e - self.m31 * c + self.m33 * a) * det,
            (-self.m20 * e + self.m21 * c - self.m23 * a) * det,
            (-self.m10 * j + self.m11 * h - self.m12 * g) * det,
            (self.m00 * j - self.m01 * h + self.m02 * g) * det,
            (-self.m30 * d + self.m31 * b - self.m32 * a) * det,
            (self.m20 * d - self.m21 * b + self.m22 * a) * det,
        )
    }

    /// Cheaper inverse for affine matrices.
    ///
    /// The caller must guarantee the bottom row is `[0, 0, 0, 1]`; the
    /// result is wrong otherwise, with no runtime check.
    pub fn invert_affine(self) -> Self {
        let m11m00 = self.m00 * self.m11;
        let m10m01 = self.m01 * self.m10;
        let m10m02 = self.m02 * self.m10;
        let m12m00 = self.m00 * self.m12;
        let m12m01 = self.m01 * self.m12;
        let m11m02 = self.m02 * self.m11;
        let s = 1.0
            / ((m11m00 - m10m01) * self.m22
                + (m10m02 - m12m00) * self.m21
                + (m12m01 - m11m02) * self.m20);
        let m10m22 = self.m10 * self.m22;
        let m10m21 = self.m10 * self.m21;
        let m11m22 = self.m11 * self.m22;
        let m11m20 = self.m11 * self.m20;
        let m12m21 = self.m12 * self.m21;
        let m12m20 = self.m12 * self.m20;
        let m20m02 = self.m20 * self.m02;
        let m20m01 = self.m20 * self.m01;
        let m21m02 = self.m21 * self.m02;
        let m21m00 = self.m21 * self.m00;
        let m22m01 = self.m22 * self.m01;
        let m22m00 = self.m22 * self.m00;
        Self::new(
            (m11m22 - m12m21) * s,
            (m21m02 - m22m01) * s,
            (m12m01 - m11m02) * s,
            0.0,
            (m12m20 - m10m22) * s,
            (m22m00 - m20m02) * s,
            (m10m02 - m12m00) * s,
            0.0,
            (m10m21 - m11m20) * s,
            (m20m01 - m21m00) * s,
            (m11m00 - m10m01) * s,
            0.0,
            (m10m22 * self.m31 - m10m21 * self.m32 + m11m20 * self.m32
                - m11m22 * self.m30 + m12m21 * self.m30 - m12m20 * self.m31) * s,
            (m20m02 * self.m31 - m20m01 * self.m32 + m21m00 * self.m32
                - m21m02 * self.m30 + m22m01 * self.m30 - m22m00 * self.m31) * s,
            (m11m02 * self.m30 - m12m01 * self.m30 + m12m00 * self.m31
                - m10m02 * self.m31 + m10m01 * self.m32 - m11m00 * self.m32) * s,
            1.0,
        )
    }

    pub fn transpose(self) -> Self {
        Self::new(
            self.m00, self.m10, self.m20, self.m30,
            self.m01, self.m11, self.m21, self.m31,
            self.m02, self.m12, self.m22, self.m32,
            self.m03, self.m13, self.m23, self.m33,
        )
    }

    /// Inverse-transpose of the upper-left 3x3 in one fused step, for
    /// transforming surface normals
    pub fn normal_matrix(self) -> Mat3 {
        let m00m11 = self.m00 * self.m11;
        let m01m10 = self.m01 * self.m10;
        let m02m10 = self.m02 * self.m10;
        let m00m12 = self.m00 * self.m12;
        let m01m12 = self.m01 * self.m12;
        let m02m11 = self.m02 * self.m11;
        let det = (m00m11 - m01m10) * self.m22
            + (m02m10 - m00m12) * self.m21
            + (m01m12 - m02m11) * self.m20;
        let s = 1.0 / det;
        Mat3::new(
            (self.m11 * self.m22 - self.m21 * self.m12) * s,
            (self.m20 * self.m12 - self.m10 * self.m22) * s,
            (self.m10 * self.m21 - self.m20 * self.m11) * s,
            (self.m21 * self.m02 - self.m01 * self.m22) * s,
            (self.m00 * self.m22 - self.m20 * self.m02) * s,
            (self.m20 * self.m01 - self.m00 * self.m21) * s,
            (m01m12 - m02m11) * s,
            (m02m10 - m00m12) * s,
            (m00m11 - m01m10) * s,
        )
    }

    /// Whether the bottom row is `[0, 0, 0, 1]`
    pub fn is_affine(self) -> bool {
        self.m03 == 0.0 && self.m13 == 0.0 && self.m23 == 0.0 && self.m33 == 1.0
    }

    /// Matrix product `self * other`
    pub fn mul(self, r: Self) -> Self {
        Self::new(
            self.m00 * r.m00 + self.m10 * r.m01 + self.m20 * r.m02 + self.m30 * r.m03,
            self.m01 * r.m00 + self.m11 * r.m01 + self.m21 * r.m02 + self.m31 * r.m03,
            self.m02 * r.m00 + self.m12 * r.m01 + self.m22 * r.m02 + self.m32 * r.m03,
            self.m03 * r.m00 + self.m13 * r.m01 + self.m23 * r.m02 + self.m33 * r.m03,
            self.m00 * r.m10 + self.m10 * r.m11 + self.m20 * r.m12 + self.m30 * r.m13,
            self.m01 * r.m10 + self.m11 * r.m11 + self.m21 * r.m12 + self.m31 * r.m13,
            self.m02 * r.m10 + self.m12 * r.m11 + self.m22 * r.m12 + self.m32 * r.m13,
            self.m03 * r.m10 + self.m13 * r.m11 + self.m23 * r.m12 + self.m33 * r.m13,
            self.m00 * r.m20 + self.m10 * r.m21 + self.m20 * r.m22 + self.m30 * r.m23,
            self.m01 * r.m20 + self.m11 * r.m21 + self.m21 * r.m22 + self.m31 * r.m23,
            self.m02 * r.m20 + self.m12 * r.m21 + self.m22 * r.m22 + self.m32 * r.m23,
            self.m03 * r.m20 + self.m13 * r.m21 + self.m23 * r.m22 + self.m33 * r.m23,
            self.m00 * r.m30 + self.m10 * r.m31 + self.m20 * r.m32 + self.m30 * r.m33,
            self.m01 * r.m30 + self.m11 * r.m31 + self.m21 * r.m32 + self.m31 * r.m33,
            self.m02 * r.m30 + self.m12 * r.m31 + self.m22 * r.m32 + self.m32 * r.m33,
            self.m03 * r.m30 + self.m13 * r.m31 + self.m23 * r.m32 + self.m33 * r.m33,
        )
    }

    /// Post-apply a translation. Only the last column changes.
    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        let mut dest = self;
        dest.m30 = self.m00 * x + self.m10 * y + self.m20 * z + self.m30;
        dest.m31 = self.m01 * x + self.m11 * y + self.m21 * z + self.m31;
        dest.m32 = self.m02 * x + self.m12 * y + self.m22 * z + self.m32;
        dest.m33 = self.m03 * x + self.m13 * y + self.m23 * z + self.m33;
        dest
    }

    /// Post-apply a translation by a vector
    pub fn translate_v(self, offset: Vec3) -> Self {
        self.translate(offset.x, offset.y, offset.z)
    }

    /// Post-apply a scaling
    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        let mut dest = self;
        dest.m00 = self.m00 * x;
        dest.m01 = self.m01 * x;
        dest.m02 = self.m02 * x;
        dest.m03 = self.m03 * x;
        dest.m10 = self.m10 * y;
        dest.m11 = self.m11 * y;
        dest.m12 = self.m12 * y;
        dest.m13 = self.m13 * y;
        dest.m20 = self.m20 * z;
        dest.m21 = self.m21 * z;
        dest.m22 = self.m22 * z;
        dest.m23 = self.m23 * z;
        dest
    }

    /// Post-apply a rotation about an arbitrary unit axis
    pub fn rotate(self, ang: f32, x: f32, y: f32, z: f32) -> Self {
        let s = ang.sin();
        let c = ang.cos();
        let omc = 1.0 - c;
        let xx = x * x;
        let xy = x * y;
        let xz = x * z;
        let yy = y * y;
        let yz = y * z;
        let zz = z * z;
        let rm00 = xx * omc + c;
        let rm01 = xy * omc + z * s;
        let rm02 = xz * omc - y * s;
        let rm10 = xy * omc - z * s;
        let rm11 = yy * omc + c;
        let rm12 = yz * omc + x * s;
        let rm20 = xz * omc + y * s;
        let rm21 = yz * omc - x * s;
        let rm22 = zz * omc + c;
        let mut dest = self;
        dest.m00 = self.m00 * rm00 + self.m10 * rm01 + self.m20 * rm02;
        dest.m01 = self.m01 * rm00 + self.m11 * rm01 + self.m21 * rm02;
        dest.m02 = self.m02 * rm00 + self.m12 * rm01 + self.m22 * rm02;
        dest.m03 = self.m03 * rm00 + self.m13 * rm01 + self.m23 * rm02;
        dest.m10 = self.m00 * rm10 + self.m10 * rm11 + self.m20 * rm12;
        dest.m11 = self.m01 * rm10 + self.m11 * rm11 + self.m21 * rm12;
        dest.m12 = self.m02 * rm10 + self.m12 * rm11 + self.m22 * rm12;
        dest.m13 = self.m03 * rm10 + self.m13 * rm11 + self.m23 * rm12;
        dest.m20 = self.m00 * rm20 + self.m10 * rm21 + self.m20 * rm22;
        dest.m21 = self.m01 * rm20 + self.m11 * rm21 + self.m21 * rm22;
        dest.m22 = self.m02 * rm20 + self.m12 * rm21 + self.m22 * rm22;
        dest.m23 = self.m03 * rm20 + self.m13 * rm21 + self.m23 * rm22;
        dest
    }

    /// Post-apply a rotation about the x axis, with axis-aligned angle
    /// snapping
    pub fn rotate_x(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m10 = self.m10 * cos + self.m20 * sin;
        dest.m11 = self.m11 * cos + self.m21 * sin;
        dest.m12 = self.m12 * cos + self.m22 * sin;
        dest.m13 = self.m13 * cos + self.m23 * sin;
        dest.m20 = self.m10 * -sin + self.m20 * cos;
        dest.m21 = self.m11 * -sin + self.m21 * cos;
        dest.m22 = self.m12 * -sin + self.m22 * cos;
        dest.m23 = self.m13 * -sin + self.m23 * cos;
        dest
    }

    /// Post-apply a rotation about the y axis, with axis-aligned angle
    /// snapping
    pub fn rotate_y(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m20 * -sin;
        dest.m01 = self.m01 * cos + self.m21 * -sin;
        dest.m02 = self.m02 * cos + self.m22 * -sin;
        dest.m03 = self.m03 * cos + self.m23 * -sin;
        dest.m20 = self.m00 * sin + self.m20 * cos;
        dest.m21 = self.m01 * sin + self.m21 * cos;
        dest.m22 = self.m02 * sin + self.m22 * cos;
        dest.m23 = self.m03 * sin + self.m23 * cos;
        dest
    }

    /// Post-apply a rotation about the z axis, with axis-aligned angle
    /// snapping
    pub fn rotate_z(self, ang: f32) -> Self {
        let (cos, sin) = rotation_cos_sin(ang);
        let mut dest = self;
        dest.m00 = self.m00 * cos + self.m10 * sin;
        dest.m01 = self.m01 * cos + self.m11 * sin;
        dest.m02 = self.m02 * cos + self.m12 * sin;
        dest.m03 = self.m03 * cos + self.m13 * sin;
        dest.m10 = self.m00 * -sin + self.m10 * cos;
        dest.m11 = self.m01 * -sin + self.m11 * cos;
        dest.m12 = self.m02 * -sin + self.m12 * cos;
        dest.m13 = self.m03 * -sin + self.m13 * cos;
        dest
    }

    /// Post-apply a quaternion rotation
    pub fn rotate_quat(self, q: &Quat) -> Self {
        let rot = Self::from_quat(q);
        let mut dest = self;
        dest.m00 = self.m00 * rot.m00 + self.m10 * rot.m01 + self.m20 * rot.m02;
        dest.m01 = self.m01 * rot.m00 + self.m11 * rot.m01 + self.m21 * rot.m02;
        dest.m02 = self.m02 * rot.m00 + self.m12 * rot.m01 + self.m22 * rot.m02;
        dest.m03 = self.m03 * rot.m00 + self.m13 * rot.m01 + self.m23 * rot.m02;
        dest.m10 = self.m00 * rot.m10 + self.m10 * rot.m11 + self.m20 * rot.m12;
        dest.m11 = self.m01 * rot.m10 + self.m11 * rot.m11 + self.m21 * rot.m12;
        dest.m12 = self.m02 * rot.m10 + self.m12 * rot.m11 + self.m22 * rot.m12;
        dest.m13 = self.m03 * rot.m10 + self.m13 * rot.m11 + self.m23 * rot.m12;
        dest.m20 = self.m00 * rot.m20 + self.m10 * rot.m21 + self.m20 * rot.m22;
        dest.m21 = self.m01 * rot.m20 + self.m11 * rot.m21 + self.m21 * rot.m22;
        dest.m22 = self.m02 * rot.m20 + self.m12 * rot.m21 + self.m22 * rot.m22;
        dest.m23 = self.m03 * rot.m20 + self.m13 * rot.m21 + self.m23 * rot.m22;
        dest
    }

    /// Post-apply an orthographic projection
    #[allow(clippy::too_many_arguments)]
    pub fn mul_ortho(
        self, left: f32, right: f32, bottom: f32, top: f32,
        z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let rm00 = 2.0 / (right - left);
        let rm11 = 2.0 / (top - bottom);
        let rm22 = (if z_zero_to_one { 1.0 } else { 2.0 }) / (z_near - z_far);
        let rm30 = (left + right) / (left - right);
        let rm31 = (top + bottom) / (bottom - top);
        let rm32 = (if z_zero_to_one { z_near } else { z_far + z_near }) / (z_near - z_far);
        let mut dest = self;
        dest.m30 = self.m00 * rm30 + self.m10 * rm31 + self.m20 * rm32 + self.m30;
        dest.m31 = self.m01 * rm30 + self.m11 * rm31 + self.m21 * rm32 + self.m31;
        dest.m32 = self.m02 * rm30 + self.m12 * rm31 + self.m22 * rm32 + self.m32;
        dest.m33 = self.m03 * rm30 + self.m13 * rm31 + self.m23 * rm32 + self.m33;
        dest.m00 = self.m00 * rm00;
        dest.m01 = self.m01 * rm00;
        dest.m02 = self.m02 * rm00;
        dest.m03 = self.m03 * rm00;
        dest.m10 = self.m10 * rm11;
        dest.m11 = self.m11 * rm11;
        dest.m12 = self.m12 * rm11;
        dest.m13 = self.m13 * rm11;
        dest.m20 = self.m20 * rm22;
        dest.m21 = self.m21 * rm22;
        dest.m22 = self.m22 * rm22;
        dest.m23 = self.m23 * rm22;
        dest
    }

    /// Post-apply a symmetric perspective projection
    pub fn mul_perspective(
        self, fovy: f32, aspect: f32, z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let h = (fovy * 0.5).tan();
        let rm00 = 1.0 / (h * aspect);
        let rm11 = 1.0 / h;
        let (rm22, rm32) = perspective_depth_terms(z_near, z_far, z_zero_to_one);
        let nm20 = self.m20 * rm22 - self.m30;
        let nm21 = self.m21 * rm22 - self.m31;
        let nm22 = self.m22 * rm22 - self.m32;
        let nm23 = self.m23 * rm22 - self.m33;
        let mut dest = self;
        dest.m00 = self.m00 * rm00;
        dest.m01 = self.m01 * rm00;
        dest.m02 = self.m02 * rm00;
        dest.m03 = self.m03 * rm00;
        dest.m10 = self.m10 * rm11;
        dest.m11 = self.m11 * rm11;
        dest.m12 = self.m12 * rm11;
        dest.m13 = self.m13 * rm11;
        dest.m30 = self.m20 * rm32;
        dest.m31 = self.m21 * rm32;
        dest.m32 = self.m22 * rm32;
        dest.m33 = self.m23 * rm32;
        dest.m20 = nm20;
        dest.m21 = nm21;
        dest.m22 = nm22;
        dest.m23 = nm23;
        dest
    }

    /// Post-apply an off-center perspective projection
    #[allow(clippy::too_many_arguments)]
    pub fn mul_frustum(
        self, left: f32, right: f32, bottom: f32, top: f32,
        z_near: f32, z_far: f32, z_zero_to_one: bool,
    ) -> Self {
        let rm00 = (z_near + z_near) / (right - left);
        let rm11 = (z_near + z_near) / (top - bottom);
        let rm20 = (right + left) / (right - left);
        let rm21 = (top + bottom) / (top - bottom);
        let (rm22, rm32) = perspective_depth_terms(z_near, z_far, z_zero_to_one);
        let nm20 = self.m00 * rm20 + self.m10 * rm21 + self.m20 * rm22 - self.m30;
        let nm21 = self.m01 * rm20 + self.m11 * rm21 + self.m21 * rm22 - self.m31;
        let nm22 = self.m02 * rm20 + self.m12 * rm21 + self.m22 * rm22 - self.m32;
        let nm23 = self.m03 * rm20 + self.m13 * rm21 + self.m23 * rm22 - self.m33;
        let mut dest = self;
        dest.m00 = self.m00 * rm00;
        dest.m01 = self.m01 * rm00;
        dest.m02 = self.m02 * rm00;
        dest.m03 = self.m03 * rm00;
        dest.m10 = self.m10 * rm11;
        dest.m11 = self.m11 * rm11;
        dest.m12 = self.m12 * rm11;
        dest.m13 = self.m13 * rm11;
        dest.m30 = self.m20 * rm32;
        dest.m31 = self.m21 * rm32;
        dest.m32 = self.m22 * rm32;
        dest.m33 = self.m23 * rm32;
        dest.m20 = nm20;
        dest.m21 = nm21;
        dest.m22 = nm22;
        dest.m23 = nm23;
        dest
    }

    /// Post-apply a right-handed look-at view transformation
    #[allow(clippy::too_many_arguments)]
    pub fn mul_look_at(
        self,
        eye_x: f32, eye_y: f32, eye_z: f32,
        center_x: f32, center_y: f32, center_z: f32,
        up_x: f32, up_y: f32, up_z: f32,
    ) -> Self {
        let dir = Vec3::new(eye_x - center_x, eye_y - center_y, eye_z - center_z).normalized();
        let left = Vec3::new(up_x, up_y, up_z).cross(dir).normalized();
        let upn = dir.cross(left);
        let rm30 = -(left.x * eye_x + left.y * eye_y + left.z * eye_z);
        let rm31 = -(upn.x * eye_x + upn.y * eye_y + upn.z * eye_z);
        let rm32 = -(dir.x * eye_x + dir.y * eye_y + dir.z * eye_z);
        let mut dest = self;
        dest.m30 = self.m00 * rm30 + self.m10 * rm31 + self.m20 * rm32 + self.m30;
        dest.m31 = self.m01 * rm30 + self.m11 * rm31 + self.m21 * rm32 + self.m31;
        dest.m32 = self.m02 * rm30 + self.m12 * rm31 + self.m22 * rm32 + self.m32;
        dest.m33 = self.m03 * rm30 + self.m13 * rm31 + self.m23 * rm32 + self.m33;
        let nm00 = self.m00 * left.x + self.m10 * upn.x + self.m20 * dir.x;
        let nm01 = self.m01 * left.x + self.m11 * upn.x + self.m21 * dir.x;
        let nm02 = self.m02 * left.x + self.m12 * upn.x + self.m22 * dir.x;
        let nm03 = self.m03 * left.x + self.m13 * upn.x + self.m23 * dir.x;
        let nm10 = self.m00 * left.y + self.m10 * upn.y + self.m20 * dir.y;
        let nm11 = self.m01 * left.y + self.m11 * upn.y + self.m21 * dir.y;
        let nm12 = self.m02 * left.y + self.m12 * upn.y + self.m22 * dir.y;
        let nm13 = self.m03 * left.y + self.m13 * upn.y + self.m23 * dir.y;
        dest.m20 = self.m00 * left.z + self.m10 * upn.z + self.m20 * dir.z;
        dest.m21 = self.m01 * left.z + self.m11 * upn.z + self.m21 * dir.z;
        dest.m22 = self.m02 * left.z + self.m12 * upn.z + self.m22 * dir.z;
        dest.m23 = self.m03 * left.z + self.m13 * upn.z + self.m23 * dir.z;
        dest.m00 = nm00;
        dest.m01 = nm01;
        dest.m02 = nm02;
        dest.m03 = nm03;
        dest.m10 = nm10;
        dest.m11 = nm11;
        dest.m12 = nm12;
        dest.m13 = nm13;
        dest
    }

    /// Post-apply a planar shadow projection flattening geometry onto
    /// the plane `ax + by + cz + d = 0` as seen from the homogeneous
    /// light position (`light.w == 0` for directional light). The plane
    /// equation is normalized internally.
    pub fn shadow(self, light: Vec4, a: f32, b: f32, c: f32, d: f32) -> Self {
        let inv_plane_len = 1.0 / (a * a + b * b + c * c).sqrt();
        let an = a * inv_plane_len;
        let bn = b * inv_plane_len;
        let cn = c * inv_plane_len;
        let dn = d * inv_plane_len;
        let dot = an * light.x + bn * light.y + cn * light.z + dn * light.w;
        let rm00 = dot - an * light.x;
        let rm01 = -an * light.y;
        let rm02 = -an * light.z;
        let rm03 = -an * light.w;
        let rm10 = -bn * light.x;
        let rm11 = dot - bn * light.y;
        let rm12 = -bn * light.z;
        let rm13 = -bn * light.w;
        let rm20 = -cn * light.x;
        let rm21 = -cn * light.y;
        let rm22 = dot - cn * light.z;
        let rm23 = -cn * light.w;
        let rm30 = -dn * light.x;
        let rm31 = -dn * light.y;
        let rm32 = -dn * light.z;
        let rm33 = dot - dn * light.w;
        Self::new(
            self.m00 * rm00 + self.m10 * rm01 + self.m20 * rm02 + self.m30 * rm03,
            self.m01 * rm00 + self.m11 * rm01 + self.m21 * rm02 + self.m31 * rm03,
            self.m02 * rm00 + self.m12 * rm01 + self.m22 * rm02 + self.m32 * rm03,
            self.m03 * rm00 + self.m13 * rm01 + self.m23 * rm02 + self.m33 * rm03,
            self.m00 * rm10 + self.m10 * rm11 + self.m20 * rm12 + self.m30 * rm13,
            self.m01 * rm10 + self.m11 * rm11 + self.m21 * rm12 + self.m31 * rm13,
            self.m02 * rm10 + self.m12 * rm11 + self.m22 * rm12 + self.m32 * rm13,
            self.m03 * rm10 + self.m13 * rm11 + self.m23 * rm12 + self.m33 * rm13,
            self.m00 * rm20 + self.m10 * rm21 + self.m20 * rm22 + self.m30 * rm23,
            self.m01 * rm20 + self.m11 * rm21 + self.m21 * rm22 + self.m31 * rm23,
            self.m02 * rm20 + self.m12 * rm21 + self.m22 * rm22 + self.m32 * rm23,
            self.m03 * rm20 + self.m13 * rm21 + self.m23 * rm22 + self.m33 * rm23,
            self.m00 * rm30 + self.m10 * rm31 + self.m20 * rm32 + self.m30 * rm33,
            self.m01 * rm30 + self.m11 * rm31 + self.m21 * rm32 + self.m31 * rm33,
            self.m02 * rm30 + self.m12 * rm31 + self.m22 * rm32 + self.m32 * rm33,
            self.m03 * rm30 + self.m13 * rm31 + self.m23 * rm32 + self.m33 * rm33,
        )
    }

    /// Post-apply a reflection across the plane `ax + by + cz + d = 0`;
    /// the plane normal must be unit length
    pub fn reflect(self, a: f32, b: f32, c: f32, d: f32) -> Self {
        let da = a + a;
        let db = b + b;
        let dc = c + c;
        let dd = d + d;
        let rm00 = 1.0 - da * a;
        let rm01 = -da * b;
        let rm02 = -da * c;
        let rm10 = -db * a;
        let rm11 = 1.0 - db * b;
        let rm12 = -db * c;
        let rm20 = -dc * a;
        let rm21 = -dc * b;
        let rm22 = 1.0 - dc * c;
        let rm30 = -dd * a;
        let rm31 = -dd * b;
        let rm32 = -dd * c;
        let mut dest = self;
        dest.m30 = self.m00 * rm30 + self.m10 * rm31 + self.m20 * rm32 + self.m30;
        dest.m31 = self.m01 * rm30 + self.m11 * rm31 + self.m21 * rm32 + self.m31;
        dest.m32 = self.m02 * rm30 + self.m12 * rm31 + self.m22 * rm32 + self.m32;
        dest.m33 = self.m03 * rm30 + self.m13 * rm31 + self.m23 * rm32 + self.m33;
        dest.m00 = self.m00 * rm00 + self.m10 * rm01 + self.m20 * rm02;
        dest.m01 = self.m01 * rm00 + self.m11 * rm01 + self.m21 * rm02;
        dest.m02 = self.m02 * rm00 + self.m12 * rm01 + self.m22 * rm02;
        dest.m03 = self.m03 * rm00 + self.m13 * rm01 + self.m23 * rm02;
        dest.m10 = self.m00 * rm10 + self.m10 * rm11 + self.m20 * rm12;
        dest.m11 = self.m01 * rm10 + self.m11 * rm11 + self.m21 * rm12;
        dest.m12 = self.m02 * rm10 + self.m12 * rm11 + self.m22 * rm12;
        dest.m13 = self.m03 * rm10 + self.m13 * rm11 + self.m23 * rm12;
        dest.m20 = self.m00 * rm20 + self.m10 * rm21 + self.m20 * rm22;
        dest.m21 = self.m01 * rm20 + self.m11 * rm21 + self.m21 * rm22;
        dest.m22 = self.m02 * rm20 + self.m12 * rm21 + self.m22 * rm22;
        dest.m23 = self.m03 * rm20 + self.m13 * rm21 + self.m23 * rm22;
        dest
    }

    /// Post-apply a reflection across the plane through `point` with the
    /// given (not necessarily unit) normal
    pub fn reflect_about(self, normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalized();
        self.reflect(n.x, n.y, n.z, -n.dot(point))
    }

    /// Post-apply a transformation that remaps the sub-rectangle of the
    /// viewport centered at `(x, y)` with the given extent onto the full
    /// clip-space cube, for picking. `viewport` is `[x, y, width, height]`.
    pub fn pick(self, x: f32, y: f32, width: f32, height: f32, viewport: [f32; 4]) -> Self {
        let sx = viewport[2] / width;
        let sy = viewport[3] / height;
        let tx = (viewport[2] + 2.0 * (viewport[0] - x)) / width;
        let ty = (viewport[3] + 2.0 * (viewport[1] - y)) / height;
        let mut dest = self;
        dest.m30 = self.m00 * tx + self.m10 * ty + self.m30;
        dest.m31 = self.m01 * tx + self.m11 * ty + self.m31;
        dest.m32 = self.m02 * tx + self.m12 * ty + self.m32;
        dest.m33 = self.m03 * tx + self.m13 * ty + self.m33;
        dest.m00 = self.m00 * sx;
        dest.m01 = self.m01 * sx;
        dest.m02 = self.m02 * sx;
        dest.m03 = self.m03 * sx;
        dest.m10 = self.m10 * sy;
        dest.m11 = self.m11 * sy;
        dest.m12 = self.m12 * sy;
        dest.m13 = self.m13 * sy;
        dest
    }

    /// Post-apply an arcball camera transform orbiting the pivot
    /// `(cx, cy, cz)` at the given radius.
    ///
    /// Same result as `translate(0, 0, -radius)` then `rotate_x`,
    /// `rotate_y`, `translate(-cx, -cy, -cz)`, fused.
    pub fn arcball(
        self, radius: f32, cx: f32, cy: f32, cz: f32, angle_x: f32, angle_y: f32,
    ) -> Self {
        let m30 = self.m20 * -radius + self.m30;
        let m31 = self.m21 * -radius + self.m31;
        let m32 = self.m22 * -radius + self.m32;
        let m33 = self.m23 * -radius + self.m33;
        let sin = angle_x.sin();
        let cos = angle_x.cos();
        let nm10 = self.m10 * cos + self.m20 * sin;
        let nm11 = self.m11 * cos + self.m21 * sin;
        let nm12 = self.m12 * cos + self.m22 * sin;
        let nm13 = self.m13 * cos + self.m23 * sin;
        let m20 = self.m20 * cos - self.m10 * sin;
        let m21 = self.m21 * cos - self.m11 * sin;
        let m22 = self.m22 * cos - self.m12 * sin;
        let m23 = self.m23 * cos - self.m13 * sin;
        let sin = angle_y.sin();
        let cos = angle_y.cos();
        let nm00 = self.m00 * cos - m20 * sin;
        let nm01 = self.m01 * cos - m21 * sin;
        let nm02 = self.m02 * cos - m22 * sin;
        let nm03 = self.m03 * cos - m23 * sin;
        let nm20 = self.m00 * sin + m20 * cos;
        let nm21 = self.m01 * sin + m21 * cos;
        let nm22 = self.m02 * sin + m22 * cos;
        let nm23 = self.m03 * sin + m23 * cos;
        Self::new(
            nm00, nm01, nm02, nm03,
            nm10, nm11, nm12, nm13,
            nm20, nm21, nm22, nm23,
            -nm00 * cx - nm10 * cy - nm20 * cz + m30,
            -nm01 * cx - nm11 * cy - nm21 * cz + m31,
            -nm02 * cx - nm12 * cy - nm22 * cz + m32,
            -nm03 * cx - nm13 * cy - nm23 * cz + m33,
        )
    }

    /// One of the six clip-space frustum planes of this transformation,
    /// as a plane equation `(a, b, c, d)` normalized by the length of
    /// its normal.
    ///
    /// Panics if `plane` is not one of the `PLANE_*` constants.
    pub fn frustum_plane(self, plane: usize) -> Vec4 {
        let eq = match plane {
            Self::PLANE_NX => Vec4::new(
                self.m03 + self.m00, self.m13 + self.m10,
                self.m23 + self.m20, self.m33 + self.m30,
            ),
            Self::PLANE_PX => Vec4::new(
                self.m03 - self.m00, self.m13 - self.m10,
                self.m23 - self.m20, self.m33 - self.m30,
            ),
            Self::PLANE_NY => Vec4::new(
                self.m03 + self.m01, self.m13 + self.m11,
                self.m23 + self.m21, self.m33 + self.m31,
            ),
            Self::PLANE_PY => Vec4::new(
                self.m03 - self.m01, self.m13 - self.m11,
                self.m23 - self.m21, self.m33 - self.m31,
            ),
            Self::PLANE_NZ => Vec4::new(
                self.m03 + self.m02, self.m13 + self.m12,
                self.m23 + self.m22, self.m33 + self.m32,
            ),
            Self::PLANE_PZ => Vec4::new(
                self.m03 - self.m02, self.m13 - self.m12,
                self.m23 - self.m22, self.m33 - self.m32,
            ),
            _ => panic!("invalid frustum plane index: {plane}"),
        };
        eq.normalize3()
    }

    /// One of the eight frustum corner points, as the intersection of
    /// the three planes meeting at that corner.
    ///
    /// Panics if `corner` is not one of the `CORNER_*` constants.
    pub fn frustum_corner(self, corner: usize) -> Vec3 {
        let left = (
            Vec3::new(self.m03 + self.m00, self.m13 + self.m10, self.m23 + self.m20),
            self.m33 + self.m30,
        );
        let right = (
            Vec3::new(self.m03 - self.m00, self.m13 - self.m10, self.m23 - self.m20),
            self.m33 - self.m30,
        );
        let bottom = (
            Vec3::new(self.m03 + self.m01, self.m13 + self.m11, self.m23 + self.m21),
            self.m33 + self.m31,
        );
        let top = (
            Vec3::new(self.m03 - self.m01, self.m13 - self.m11, self.m23 - self.m21),
            self.m33 - self.m31,
        );
        let near = (
            Vec3::new(self.m03 + self.m02, self.m13 + self.m12, self.m23 + self.m22),
            self.m33 + self.m32,
        );
        let far = (
            Vec3::new(self.m03 - self.m02, self.m13 - self.m12, self.m23 - self.m22),
            self.m33 - self.m32,
        );
        let (p1, p2, p3) = match corner {
            Self::CORNER_NXNYNZ => (left, bottom, near),
            Self::CORNER_PXNYNZ => (right, bottom, near),
            Self::CORNER_PXPYNZ => (right, top, near),
            Self::CORNER_NXPYNZ => (left, top, near),
            Self::CORNER_PXNYPZ => (right, bottom, far),
            Self::CORNER_NXNYPZ => (left, bottom, far),
            Self::CORNER_NXPYPZ => (left, top, far),
            Self::CORNER_PXPYPZ => (right, top, far),
            _ => panic!("invalid frustum corner index: {corner}"),
        };
        intersect_planes(p1, p2, p3)
    }

    /// Eye position of a perspective transformation, recovered as the
    /// intersection of the left, right, and top frustum planes
    pub fn perspective_origin(self) -> Vec3 {
        let left = (
            Vec3::new(self.m03 + self.m00, self.m13 + self.m10, self.m23 + self.m20),
            self.m33 + self.m30,
        );
        let right = (
            Vec3::new(self.m03 - self.m00, self.m13 - self.m10, self.m23 - self.m20),
            self.m33 - self.m30,
        );
        let top = (
            Vec3::new(self.m03 - self.m01, self.m13 - self.m11, self.m23 - self.m21),
            self.m33 - self.m31,
        );
        intersect_planes(left, right, top)
    }

    /// Vertical field of view of a perspective transformation, as the
    /// angle between the bottom and top frustum plane normals
    pub fn perspective_fov(self) -> f32 {
        let n1 = Vec3::new(self.m03 + self.m01, self.m13 + self.m11, self.m23 + self.m21);
        let n2 = Vec3::new(self.m01 - self.m03, self.m11 - self.m13, self.m21 - self.m23);
        (n1.dot(n2) / (n1.length() * n2.length())).acos()
    }

    /// Near plane distance of a perspective projection
    pub fn perspective_near(self) -> f32 {
        self.m32 / (self.m23 + self.m22)
    }

    /// Far plane distance of a perspective projection
    pub fn perspective_far(self) -> f32 {
        self.m32 / (self.m22 - self.m23)
    }

    /// Normalized view ray through the screen-space point `(x, y)`, both
    /// in `[0, 1]` across the frustum, by bilinear interpolation of the
    /// corner ray directions
    pub fn frustum_ray_dir(self, x: f32, y: f32) -> Vec3 {
        let a = self.m10 * self.m23;
        let b = self.m13 * self.m21;
        let c = self.m10 * self.m21;
        let d = self.m11 * self.m23;
        let e = self.m13 * self.m20;
        let f = self.m11 * self.m20;
        let g = self.m03 * self.m20;
        let h = self.m01 * self.m23;
        let i = self.m01 * self.m20;
        let j = self.m03 * self.m21;
        let k = self.m00 * self.m23;
        let l = self.m00 * self.m21;
        let m = self.m00 * self.m13;
        let n = self.m03 * self.m11;
        let o = self.m00 * self.m11;
        let p = self.m01 * self.m13;
        let q = self.m03 * self.m10;
        let r = self.m01 * self.m10;
        let m1x = (d + e + f - a - b - c) * (1.0 - y) + (a - b - c + d - e + f) * y;
        let m1y = (j + k + l - g - h - i) * (1.0 - y) + (g - h - i + j - k + l) * y;
        let m1z = (p + q + r - m - n - o) * (1.0 - y) + (m - n - o + p - q + r) * y;
        let m2x = (b - c - d + e + f - a) * (1.0 - y) + (a + b - c - d - e + f) * y;
        let m2y = (h - i - j + k + l - g) * (1.0 - y) + (g + h - i - j - k + l) * y;
        let m2z = (n - o - p + q + r - m) * (1.0 - y) + (m + n - o - p - q + r) * y;
        Vec3::new(
            m1x + (m2x - m1x) * x,
            m1y + (m2y - m1y) * x,
            m1z + (m2z - m1z) * x,
        )
        .normalized()
    }

    /// Direction that `+x` is rotated to by the inverse of this
    /// transformation, without computing a full inverse. For an
    /// orthonormal basis use [`Mat4::normalized_positive_x`].
    pub fn positive_x(self) -> Vec3 {
        Vec3::new(
            self.m11 * self.m22 - self.m12 * self.m21,
            self.m02 * self.m21 - self.m01 * self.m22,
            self.m01 * self.m12 - self.m02 * self.m11,
        )
        .normalized()
    }

    /// Same as [`Mat4::positive_x`] for a matrix whose upper-left 3x3 is
    /// orthonormal
    pub fn normalized_positive_x(self) -> Vec3 {
        Vec3::new(self.m00, self.m10, self.m20)
    }

    /// Direction that `+y` is rotated to by the inverse of this
    /// transformation
    pub fn positive_y(self) -> Vec3 {
        Vec3::new(
            self.m12 * self.m20 - self.m10 * self.m22,
            self.m00 * self.m22 - self.m02 * self.m20,
            self.m02 * self.m10 - self.m00 * self.m12,
        )
        .normalized()
    }

    /// Same as [`Mat4::positive_y`] for an orthonormal upper-left 3x3
    pub fn normalized_positive_y(self) -> Vec3 {
        Vec3::new(self.m01, self.m11, self.m21)
    }

    /// Direction that `+z` is rotated to by the inverse of this
    /// transformation
    pub fn positive_z(self) -> Vec3 {
        Vec3::new(
            self.m10 * self.m21 - self.m11 * self.m20,
            self.m20 * self.m01 - self.m21 * self.m00,
            self.m00 * self.m11 - self.m01 * self.m10,
        )
        .normalized()
    }

    /// Same as [`Mat4::positive_z`] for an orthonormal upper-left 3x3
    pub fn normalized_positive_z(self) -> Vec3 {
        Vec3::new(self.m02, self.m12, self.m22)
    }

    /// Position this matrix transforms to the origin, via a partial
    /// cofactor inverse. Works for non-affine matrices too.
    pub fn origin(self) -> Vec3 {
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let c = self.m00 * self.m13 - self.m03 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let e = self.m01 * self.m13 - self.m03 * self.m11;
        let f = self.m02 * self.m13 - self.m03 * self.m12;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let i = self.m20 * self.m33 - self.m23 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        let k = self.m21 * self.m33 - self.m23 * self.m31;
        let l = self.m22 * self.m33 - self.m23 * self.m32;
        let det = a * l - b * k + c * j + d * i - e * h + f * g;
        let inv_det = 1.0 / det;
        let nm30 = (-self.m10 * j + self.m11 * h - self.m12 * g) * inv_det;
        let nm31 = (self.m00 * j - self.m01 * h + self.m02 * g) * inv_det;
        let nm32 = (-self.m30 * d + self.m31 * b - self.m32 * a) * inv_det;
        let nm33 = det / (self.m20 * d - self.m21 * b + self.m22 * a);
        Vec3::new(nm30 * nm33, nm31 * nm33, nm32 * nm33)
    }

    /// Position an affine matrix transforms to the origin; assumes a
    /// determinant of one
    pub fn origin_affine(self) -> Vec3 {
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        Vec3::new(
            -self.m10 * j + self.m11 * h - self.m12 * g,
            self.m00 * j - self.m01 * h + self.m02 * g,
            -self.m30 * d + self.m31 * b - self.m32 * a,
        )
    }

    /// Transform a homogeneous vector by the full matrix
    pub fn transform(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.m00 * v.x + self.m10 * v.y + self.m20 * v.z + self.m30 * v.w,
            self.m01 * v.x + self.m11 * v.y + self.m21 * v.z + self.m31 * v.w,
            self.m02 * v.x + self.m12 * v.y + self.m22 * v.z + self.m32 * v.w,
            self.m03 * v.x + self.m13 * v.y + self.m23 * v.z + self.m33 * v.w,
        )
    }

    /// Transform assuming this matrix is affine; `v.w` passes through
    /// unchanged
    pub fn transform_affine(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.m00 * v.x + self.m10 * v.y + self.m20 * v.z + self.m30 * v.w,
            self.m01 * v.x + self.m11 * v.y + self.m21 * v.z + self.m31 * v.w,
            self.m02 * v.x + self.m12 * v.y + self.m22 * v.z + self.m32 * v.w,
            v.w,
        )
    }

    /// Transform a 3D point, applying translation
    pub fn transform_position(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m00 * v.x + self.m10 * v.y + self.m20 * v.z + self.m30,
            self.m01 * v.x + self.m11 * v.y + self.m21 * v.z + self.m31,
            self.m02 * v.x + self.m12 * v.y + self.m22 * v.z + self.m32,
        )
    }

    /// Transform a 3D direction, ignoring translation
    pub fn transform_direction(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m00 * v.x + self.m10 * v.y + self.m20 * v.z,
            self.m01 * v.x + self.m11 * v.y + self.m21 * v.z,
            self.m02 * v.x + self.m12 * v.y + self.m22 * v.z,
        )
    }

    /// Transform a point and perform the perspective divide
    pub fn transform_project(self, v: Vec3) -> Vec3 {
        let inv_w = 1.0 / (self.m03 * v.x + self.m13 * v.y + self.m23 * v.z + self.m33);
        Vec3::new(
            (self.m00 * v.x + self.m10 * v.y + self.m20 * v.z + self.m30) * inv_w,
            (self.m01 * v.x + self.m11 * v.y + self.m21 * v.z + self.m31) * inv_w,
            (self.m02 * v.x + self.m12 * v.y + self.m22 * v.z + self.m32) * inv_w,
        )
    }

    /// Transform a homogeneous vector and perform the perspective
    /// divide; the result has `w == 1`
    pub fn transform_project4(self, v: Vec4) -> Vec4 {
        let inv_w = 1.0 / (self.m03 * v.x + self.m13 * v.y + self.m23 * v.z + self.m33 * v.w);
        Vec4::new(
            (self.m00 * v.x + self.m10 * v.y + self.m20 * v.z + self.m30 * v.w) * inv_w,
            (self.m01 * v.x + self.m11 * v.y + self.m21 * v.z + self.m31 * v.w) * inv_w,
            (self.m02 * v.x + self.m12 * v.y + self.m22 * v.z + self.m32 * v.w) * inv_w,
            1.0,
        )
    }

    /// Project an object-space point through this matrix into window
    /// coordinates. `viewport` is `[x, y, width, height]`; the returned
    /// depth is in `[0, 1]`.
    pub fn project(self, x: f32, y: f32, z: f32, viewport: [f32; 4]) -> Vec3 {
        let ndc = self.transform_project(Vec3::new(x, y, z));
        Vec3::new(
            (ndc.x * 0.5 + 0.5) * viewport[2] + viewport[0],
            (ndc.y * 0.5 + 0.5) * viewport[3] + viewport[1],
            (1.0 + ndc.z) * 0.5,
        )
    }

    /// Map window coordinates back through the inverse of this matrix
    /// into object space. Inverts the matrix inline; use
    /// [`Mat4::unproject_inv`] with a precomputed inverse when
    /// unprojecting many points.
    pub fn unproject(self, win_x: f32, win_y: f32, win_z: f32, viewport: [f32; 4]) -> Vec3 {
        self.invert().unproject_inv(win_x, win_y, win_z, viewport)
    }

    /// [`Mat4::unproject`] for a matrix that already is the inverse of
    /// the projection-view transformation
    pub fn unproject_inv(self, win_x: f32, win_y: f32, win_z: f32, viewport: [f32; 4]) -> Vec3 {
        let ndc_x = (win_x - viewport[0]) / viewport[2] * 2.0 - 1.0;
        let ndc_y = (win_y - viewport[1]) / viewport[3] * 2.0 - 1.0;
        let ndc_z = win_z + win_z - 1.0;
        self.transform_project(Vec3::new(ndc_x, ndc_y, ndc_z))
    }

    /// Picking ray through the window coordinate `(win_x, win_y)`:
    /// returns the ray origin on the near plane and the un-normalized
    /// direction to the far plane. Inverts the matrix inline.
    pub fn unproject_ray(self, win_x: f32, win_y: f32, viewport: [f32; 4]) -> (Vec3, Vec3) {
        self.invert().unproject_inv_ray(win_x, win_y, viewport)
    }

    /// [`Mat4::unproject_ray`] for a matrix that already is the inverse
    pub fn unproject_inv_ray(self, win_x: f32, win_y: f32, viewport: [f32; 4]) -> (Vec3, Vec3) {
        let ndc_x = (win_x - viewport[0]) / viewport[2] * 2.0 - 1.0;
        let ndc_y = (win_y - viewport[1]) / viewport[3] * 2.0 - 1.0;
        let near = self.transform_project(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = self.transform_project(Vec3::new(ndc_x, ndc_y, 1.0));
        (near, far - near)
    }
}

// Depth terms (m22, m32) of a perspective projection, including the
// epsilon-perturbed infinite near/far limits.
fn perspective_depth_terms(z_near: f32, z_far: f32, z_zero_to_one: bool) -> (f32, f32) {
    let far_inf = z_far > 0.0 && z_far.is_infinite();
    let near_inf = z_near > 0.0 && z_near.is_infinite();
    if far_inf {
        // Epsilon keeps the depth term representable when z_far is infinite
        let e = 1e-6;
        (e - 1.0, (e - if z_zero_to_one { 1.0 } else { 2.0 }) * z_near)
    } else if near_inf {
        let e = 1e-6;
        (
            (if z_zero_to_one { 0.0 } else { 1.0 }) - e,
            ((if z_zero_to_one { 1.0 } else { 2.0 }) - e) * z_far,
        )
    } else {
        (
            (if z_zero_to_one { z_far } else { z_far + z_near }) / (z_near - z_far),
            (if z_zero_to_one { z_far } else { z_far + z_far }) * z_near / (z_near - z_far),
        )
    }
}

// Intersection point of three planes given as (normal, d), by the
// scalar-triple-product solve of the 3x3 system.
fn intersect_planes(p1: (Vec3, f32), p2: (Vec3, f32), p3: (Vec3, f32)) -> Vec3 {
    let (n1, d1) = p1;
    let (n2, d2) = p2;
    let (n3, d3) = p3;
    let c23 = n2.cross(n3);
    let c31 = n3.cross(n1);
    let c12 = n1.cross(n2);
    let inv_dot = 1.0 / n1.dot(c23);
    (-c23 * d1 - c31 * d2 - c12 * d3) * inv_dot
}

impl std::ops::Mul for Mat4 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Mat4::mul(self, other)
    }
}
