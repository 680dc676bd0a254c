//! Rotation quaternion
//!
//! Composition follows the Hamilton convention: `a * b` applies `b`
//! first, then `a`, so `(a * b).transform(v) == a.transform(b.transform(v))`.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::{Mat3, Mat4, Vec3, Vec4};

/// Rotation quaternion with x, y, z imaginary parts and w real part
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about the given axis.
    ///
    /// The axis does not need to be normalized.
    pub fn from_axis_angle(angle: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Self {
        let half = angle * 0.5;
        let sin = half.sin();
        let inv_len =
            1.0 / (axis_x * axis_x + axis_y * axis_y + axis_z * axis_z).sqrt();
        Self::new(
            axis_x * inv_len * sin,
            axis_y * inv_len * sin,
            axis_z * inv_len * sin,
            half.cos(),
        )
    }

    /// Rotation from a scaled rotation vector (exponential map).
    ///
    /// `(ax, ay, az)` points along the rotation axis with magnitude equal
    /// to the angle in radians. Small magnitudes take a series branch to
    /// avoid dividing by a vanishing `sin`.
    pub fn from_scaled_axis(ax: f32, ay: f32, az: f32) -> Self {
        let theta_x = ax * 0.5;
        let theta_y = ay * 0.5;
        let theta_z = az * 0.5;
        let theta_mag_sq = theta_x * theta_x + theta_y * theta_y + theta_z * theta_z;
        let (w, s) = if theta_mag_sq * theta_mag_sq / 24.0 < 1e-8 {
            (1.0 - theta_mag_sq / 2.0, 1.0 - theta_mag_sq / 6.0)
        } else {
            let theta_mag = theta_mag_sq.sqrt();
            (theta_mag.cos(), theta_mag.sin() / theta_mag)
        };
        Self::new(theta_x * s, theta_y * s, theta_z * s, w)
    }

    /// Rotation about the x axis
    pub fn from_rotation_x(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(half.sin(), 0.0, 0.0, half.cos())
    }

    /// Rotation about the y axis
    pub fn from_rotation_y(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    /// Rotation about the z axis
    pub fn from_rotation_z(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, 0.0, half.sin(), half.cos())
    }

    /// Extract the rotation of a normalized (unscaled) rotation matrix.
    ///
    /// The caller guarantees `m` is orthonormal; no correction is applied.
    pub fn from_normalized_mat3(m: &Mat3) -> Self {
        Self::from_rotation_elements(
            m.m00, m.m01, m.m02, m.m10, m.m11, m.m12, m.m20, m.m21, m.m22,
        )
    }

    /// Extract the rotation of a normalized affine transformation.
    pub fn from_normalized_mat4(m: &Mat4) -> Self {
        Self::from_rotation_elements(
            m.m00, m.m01, m.m02, m.m10, m.m11, m.m12, m.m20, m.m21, m.m22,
        )
    }

    // Trace-based extraction, branching on the largest diagonal element
    // for numerical stability.
    #[allow(clippy::too_many_arguments)]
    fn from_rotation_elements(
        m00: f32, m01: f32, m02: f32,
        m10: f32, m11: f32, m12: f32,
        m20: f32, m21: f32, m22: f32,
    ) -> Self {
        let tr = m00 + m11 + m22;
        if tr >= 0.0 {
            let t = (tr + 1.0).sqrt();
            let w = t * 0.5;
            let t = 0.5 / t;
            Self::new((m12 - m21) * t, (m20 - m02) * t, (m01 - m10) * t, w)
        } else if m00 >= m11 && m00 >= m22 {
            let t = (m00 - (m11 + m22) + 1.0).sqrt();
            let x = t * 0.5;
            let t = 0.5 / t;
            Self::new(x, (m10 + m01) * t, (m02 + m20) * t, (m12 - m21) * t)
        } else if m11 > m22 {
            let t = (m11 - (m22 + m00) + 1.0).sqrt();
            let y = t * 0.5;
            let t = 0.5 / t;
            Self::new((m10 + m01) * t, y, (m21 + m12) * t, (m20 - m02) * t)
        } else {
            let t = (m22 - (m00 + m11) + 1.0).sqrt();
            let z = t * 0.5;
            let t = 0.5 / t;
            Self::new((m02 + m20) * t, (m21 + m12) * t, z, (m01 - m10) * t)
        }
    }

    /// Normalize to a unit quaternion
    #[inline]
    pub fn normalized(self) -> Self {
        let inv_norm = 1.0
            / (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w)
                .sqrt();
        Self::new(
            self.x * inv_norm,
            self.y * inv_norm,
            self.z * inv_norm,
            self.w * inv_norm,
        )
    }

    /// Conjugate (negated imaginary parts)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse. Equal to the conjugate for unit quaternions.
    #[inline]
    pub fn invert(self) -> Self {
        let inv_norm = 1.0
            / (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w);
        Self::new(
            -self.x * inv_norm,
            -self.y * inv_norm,
            -self.z * inv_norm,
            self.w * inv_norm,
        )
    }

    /// Hamilton product `self * q`
    #[inline]
    pub fn mul(self, q: Self) -> Self {
        Self::new(
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
        )
    }

    /// Multiply by the inverse of `b`
    pub fn div(self, b: Self) -> Self {
        self.mul(b.invert())
    }

    /// Rotate a vector by this quaternion
    pub fn transform(self, vec: Vec3) -> Vec3 {
        let dx = self.x + self.x;
        let dy = self.y + self.y;
        let dz = self.z + self.z;
        let xx = self.x * dx;
        let yy = self.y * dy;
        let zz = self.z * dz;
        let xy = self.x * dy;
        let xz = self.x * dz;
        let yz = self.y * dz;
        let wx = self.w * dx;
        let wy = self.w * dy;
        let wz = self.w * dz;
        Vec3::new(
            (1.0 - (yy + zz)) * vec.x + (xy - wz) * vec.y + (xz + wy) * vec.z,
            (xy + wz) * vec.x + (1.0 - (xx + zz)) * vec.y + (yz - wx) * vec.z,
            (xz - wy) * vec.x + (yz + wx) * vec.y + (1.0 - (xx + yy)) * vec.z,
        )
    }

    /// Rotate the xyz part of a vector, leaving w untouched
    pub fn transform4(self, vec: Vec4) -> Vec4 {
        let r = self.transform(vec.xyz());
        Vec4::new(r.x, r.y, r.z, vec.w)
    }

    /// Spherical linear interpolation toward `target`.
    ///
    /// Interpolates along the shorter arc. Falls back to linear
    /// interpolation when the inputs are nearly parallel.
    pub fn slerp(self, target: Self, alpha: f32) -> Self {
        let cosom =
            self.x * target.x + self.y * target.y + self.z * target.z + self.w * target.w;
        let abs_cosom = cosom.abs();
        let (scale0, scale1) = if 1.0 - abs_cosom > 1e-6 {
            let sin_sqr = 1.0 - abs_cosom * abs_cosom;
            let sinom = 1.0 / sin_sqr.sqrt();
            let omega = (sin_sqr * sinom).atan2(abs_cosom);
            (
                ((1.0 - alpha) * omega).sin() * sinom,
                (alpha * omega).sin() * sinom,
            )
        } else {
            (1.0 - alpha, alpha)
        };
        let scale1 = if cosom >= 0.0 { scale1 } else { -scale1 };
        Self::new(
            scale0 * self.x + scale1 * target.x,
            scale0 * self.y + scale1 * target.y,
            scale0 * self.z + scale1 * target.z,
            scale0 * self.w + scale1 * target.w,
        )
    }

    /// Normalized linear interpolation toward `q` along the shorter arc
    pub fn nlerp(self, q: Self, factor: f32) -> Self {
        let cosom = self.x * q.x + self.y * q.y + self.z * q.z + self.w * q.w;
        let scale0 = 1.0 - factor;
        let scale1 = if cosom >= 0.0 { factor } else { -factor };
        Self::new(
            scale0 * self.x + scale1 * q.x,
            scale0 * self.y + scale1 * q.y,
            scale0 * self.z + scale1 * q.z,
            scale0 * self.w + scale1 * q.w,
        )
        .normalized()
    }

    /// Scale the rotation angle by `factor`.
    ///
    /// Spherical interpolation from the identity toward self, so
    /// `scale_rotation(0.5)` is half the rotation.
    pub fn scale_rotation(self, factor: f32) -> Self {
        let abs_cosom = self.w.abs();
        let (scale0, scale1) = if 1.0 - abs_cosom > 1e-6 {
            let sin_sqr = 1.0 - abs_cosom * abs_cosom;
            let sinom = 1.0 / sin_sqr.sqrt();
            let omega = (sin_sqr * sinom).atan2(abs_cosom);
            (
                ((1.0 - factor) * omega).sin() * sinom,
                (factor * omega).sin() * sinom,
            )
        } else {
            (1.0 - factor, factor)
        };
        let scale1 = if self.w >= 0.0 { scale1 } else { -scale1 };
        Self::new(
            scale1 * self.x,
            scale1 * self.y,
            scale1 * self.z,
            scale0 + scale1 * self.w,
        )
    }

    /// Apply a rotation-vector delta in world space (post-multiplied)
    pub fn rotate(self, ax: f32, ay: f32, az: f32) -> Self {
        self.mul(Self::from_scaled_axis(ax, ay, az))
    }

    /// Apply a rotation-vector delta in local space (pre-multiplied)
    pub fn rotate_local(self, ax: f32, ay: f32, az: f32) -> Self {
        Self::from_scaled_axis(ax, ay, az).mul(self)
    }

    /// Integrate an angular velocity over a time step
    #[inline]
    pub fn integrate(self, dt: f32, vx: f32, vy: f32, vz: f32) -> Self {
        self.rotate_local(dt * vx, dt * vy, dt * vz)
    }

    /// Post-rotate about the x axis
    pub fn rotate_x(self, angle: f32) -> Self {
        let cos = (angle * 0.5).cos();
        let sin = (angle * 0.5).sin();
        Self::new(
            self.w * sin + self.x * cos,
            self.y * cos + self.z * sin,
            self.z * cos - self.y * sin,
            self.w * cos - self.x * sin,
        )
    }

    /// Post-rotate about the y axis
    pub fn rotate_y(self, angle: f32) -> Self {
        let cos = (angle * 0.5).cos();
        let sin = (angle * 0.5).sin();
        Self::new(
            self.x * cos - self.z * sin,
            self.w * sin + self.y * cos,
            self.x * sin + self.z * cos,
            self.w * cos - self.y * sin,
        )
    }

    /// Post-rotate about the z axis
    pub fn rotate_z(self, angle: f32) -> Self {
        let cos = (angle * 0.5).cos();
        let sin = (angle * 0.5).sin();
        Self::new(
            self.x * cos + self.y * sin,
            self.y * cos - self.x * sin,
            self.w * sin + self.z * cos,
            self.w * cos - self.z * sin,
        )
    }

    /// Post-apply a rotation that maps `dir` onto the positive z axis,
    /// the rotational part of a look-at view transformation.
    ///
    /// `dir` and `up` need not be normalized or orthogonal.
    pub fn look_rotate(self, dir: Vec3, up: Vec3) -> Self {
        let dirn = dir.normalized();
        let left = up.cross(dirn).normalized();
        let upn = dirn.cross(left);
        // Extracts from the transposed (left, upn, dirn) basis so the
        // result rotates world space into the view basis.
        let look = Self::from_rotation_elements(
            left.x, upn.x, dirn.x, left.y, upn.y, dirn.y, left.z, upn.z, dirn.z,
        );
        self.mul(look)
    }

    /// Direction of +x before this rotation is applied.
    ///
    /// Equivalent to `self.invert().transform(Vec3::X)`.
    pub fn positive_x(self) -> Vec3 {
        self.invert_basis_axis(|nx, ny, nz, nw| {
            let dy = ny + ny;
            let dz = nz + nz;
            Vec3::new(
                -ny * dy - nz * dz + 1.0,
                nx * dy + nw * dz,
                nx * dz - nw * dy,
            )
        })
    }

    /// `positive_x` for an already-normalized quaternion
    pub fn normalized_positive_x(self) -> Vec3 {
        let dy = self.y + self.y;
        let dz = self.z + self.z;
        Vec3::new(
            -self.y * dy - self.z * dz + 1.0,
            self.x * dy - self.w * dz,
            self.x * dz + self.w * dy,
        )
    }

    /// Direction of +y before this rotation is applied
    pub fn positive_y(self) -> Vec3 {
        self.invert_basis_axis(|nx, ny, nz, nw| {
            let dx = nx + nx;
            let dy = ny + ny;
            let dz = nz + nz;
            Vec3::new(
                nx * dy - nw * dz,
                -nx * dx - nz * dz + 1.0,
                ny * dz + nw * dx,
            )
        })
    }

    /// `positive_y` for an already-normalized quaternion
    pub fn normalized_positive_y(self) -> Vec3 {
        let dx = self.x + self.x;
        let dy = self.y + self.y;
        let dz = self.z + self.z;
        Vec3::new(
            self.x * dy + self.w * dz,
            -self.x * dx - self.z * dz + 1.0,
            self.y * dz - self.w * dx,
        )
    }

    /// Direction of +z before this rotation is applied
    pub fn positive_z(self) -> Vec3 {
        self.invert_basis_axis(|nx, ny, nz, nw| {
            let dx = nx + nx;
            let dy = ny + ny;
            let dz = nz + nz;
            Vec3::new(
                nx * dz + nw * dy,
                ny * dz - nw * dx,
                -nx * dx - ny * dy + 1.0,
            )
        })
    }

    /// `positive_z` for an already-normalized quaternion
    pub fn normalized_positive_z(self) -> Vec3 {
        let dx = self.x + self.x;
        let dy = self.y + self.y;
        let dz = self.z + self.z;
        Vec3::new(
            self.x * dz - self.w * dy,
            self.y * dz + self.w * dx,
            -self.x * dx - self.y * dy + 1.0,
        )
    }

    // Shared setup for the positive_* axis queries: feed the components of
    // the inverse quaternion to the column extraction.
    fn invert_basis_axis(self, f: impl FnOnce(f32, f32, f32, f32) -> Vec3) -> Vec3 {
        let inv_norm = 1.0
            / (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w);
        f(
            -self.x * inv_norm,
            -self.y * inv_norm,
            -self.z * inv_norm,
            self.w * inv_norm,
        )
    }

    /// Components as an array
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Build from an array
    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Quat::mul(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn quat_approx_eq(a: Quat, b: Quat) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    #[test]
    fn test_identity_transform() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Quat::IDENTITY.transform(v), v);
    }

    #[test]
    fn test_axis_angle_rotation() {
        // 90 degrees about Z takes X to Y
        let q = Quat::from_axis_angle(FRAC_PI_2, 0.0, 0.0, 1.0);
        let rotated = q.transform(Vec3::X);
        assert!(vec_approx_eq(rotated, Vec3::Y), "Expected Y, got {:?}", rotated);
    }

    #[test]
    fn test_axis_angle_accepts_unnormalized_axis() {
        let a = Quat::from_axis_angle(1.3, 0.0, 2.0, 0.0);
        let b = Quat::from_axis_angle(1.3, 0.0, 1.0, 0.0);
        assert!(quat_approx_eq(a, b), "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_from_scaled_axis_matches_axis_angle() {
        let q1 = Quat::from_scaled_axis(0.0, 0.7, 0.0);
        let q2 = Quat::from_rotation_y(0.7);
        assert!(quat_approx_eq(q1, q2), "Expected {:?}, got {:?}", q2, q1);
    }

    #[test]
    fn test_from_scaled_axis_small_angle() {
        // Exercises the series branch
        let q = Quat::from_scaled_axis(1e-5, 0.0, 0.0);
        let v = q.transform(Vec3::Y);
        assert!(vec_approx_eq(v, Vec3::Y));
        assert!(approx_eq(q.w, 1.0));
    }

    #[test]
    fn test_mul_applies_right_factor_first() {
        let rot_x = Quat::from_rotation_x(FRAC_PI_2);
        let rot_y = Quat::from_rotation_y(FRAC_PI_2);
        let combined = rot_y * rot_x;
        let v = Vec3::Y;
        let expected = rot_y.transform(rot_x.transform(v));
        let got = combined.transform(v);
        assert!(vec_approx_eq(got, expected), "Expected {:?}, got {:?}", expected, got);
    }

    #[test]
    fn test_invert_undoes_rotation() {
        let q = Quat::from_axis_angle(1.1, 1.0, 2.0, -0.5);
        let v = Vec3::new(0.3, -4.0, 2.0);
        let round_trip = q.invert().transform(q.transform(v));
        assert!(vec_approx_eq(round_trip, v), "Expected {:?}, got {:?}", v, round_trip);
    }

    #[test]
    fn test_div_is_mul_by_inverse() {
        let a = Quat::from_rotation_x(0.8);
        let b = Quat::from_rotation_y(0.3);
        let q = a.div(b);
        assert!(quat_approx_eq(q.mul(b), a));
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quat::from_rotation_x(0.2);
        let b = Quat::from_rotation_x(1.5);
        assert!(quat_approx_eq(a.slerp(b, 0.0), a));
        assert!(quat_approx_eq(a.slerp(b, 1.0), b));
    }

    #[test]
    fn test_slerp_halfway() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_z(FRAC_PI_2);
        let mid = a.slerp(b, 0.5);
        let expected = Quat::from_rotation_z(FRAC_PI_2 * 0.5);
        assert!(quat_approx_eq(mid, expected), "Expected {:?}, got {:?}", expected, mid);
    }

    #[test]
    fn test_slerp_takes_shorter_arc() {
        let a = Quat::from_rotation_y(0.1);
        let b = Quat::from_rotation_y(0.4);
        // Negated target represents the same rotation; interpolation must
        // not swing the long way around.
        let neg_b = Quat::new(-b.x, -b.y, -b.z, -b.w);
        let mid = a.slerp(neg_b, 0.5);
        let v = mid.transform(Vec3::X);
        let expected = Quat::from_rotation_y(0.25).transform(Vec3::X);
        assert!(vec_approx_eq(v, expected), "Expected {:?}, got {:?}", expected, v);
    }

    #[test]
    fn test_nlerp_stays_normalized() {
        let a = Quat::from_rotation_x(0.3);
        let b = Quat::from_rotation_y(1.2);
        let q = a.nlerp(b, 0.3);
        let norm = q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w;
        assert!(approx_eq(norm, 1.0));
    }

    #[test]
    fn test_scale_rotation_half_angle() {
        let q = Quat::from_rotation_z(1.0);
        let half = q.scale_rotation(0.5);
        let expected = Quat::from_rotation_z(0.5);
        assert!(quat_approx_eq(half, expected), "Expected {:?}, got {:?}", expected, half);
    }

    #[test]
    fn test_rotate_x_matches_composition() {
        let q = Quat::from_rotation_y(0.4);
        let a = q.rotate_x(0.9);
        let b = q * Quat::from_rotation_x(0.9);
        assert!(quat_approx_eq(a, b), "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_rotate_local_premultiplies() {
        let q = Quat::from_rotation_y(0.4);
        let a = q.rotate_local(0.9, 0.0, 0.0);
        let b = Quat::from_rotation_x(0.9) * q;
        assert!(quat_approx_eq(a, b), "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_integrate_accumulates_angle() {
        let q = Quat::IDENTITY.integrate(0.5, 0.0, 2.0, 0.0);
        let expected = Quat::from_rotation_y(1.0);
        assert!(quat_approx_eq(q, expected), "Expected {:?}, got {:?}", expected, q);
    }

    #[test]
    fn test_look_rotate_maps_dir_to_z() {
        let dir = Vec3::new(1.0, 0.0, 1.0);
        let q = Quat::IDENTITY.look_rotate(dir, Vec3::Y);
        let mapped = q.transform(dir.normalized());
        assert!(vec_approx_eq(mapped, Vec3::Z), "Expected Z, got {:?}", mapped);
    }

    #[test]
    fn test_positive_axes_match_inverse_transform() {
        let q = Quat::from_axis_angle(0.77, 0.2, 1.0, -0.4);
        let inv = q.invert();
        assert!(vec_approx_eq(q.positive_x(), inv.transform(Vec3::X)));
        assert!(vec_approx_eq(q.positive_y(), inv.transform(Vec3::Y)));
        assert!(vec_approx_eq(q.positive_z(), inv.transform(Vec3::Z)));
    }

    #[test]
    fn test_normalized_positive_axes() {
        let q = Quat::from_rotation_y(FRAC_PI_2);
        assert!(vec_approx_eq(q.normalized_positive_x(), q.positive_x()));
        assert!(vec_approx_eq(q.normalized_positive_y(), q.positive_y()));
        assert!(vec_approx_eq(q.normalized_positive_z(), q.positive_z()));
    }

    #[test]
    fn test_transform4_preserves_w() {
        let q = Quat::from_rotation_z(PI);
        let v = q.transform4(Vec4::new(1.0, 0.0, 0.0, 7.0));
        assert!(approx_eq(v.x, -1.0));
        assert_eq!(v.w, 7.0);
    }

    #[test]
    fn test_matrix_round_trip() {
        let q = Quat::from_axis_angle(0.9, 1.0, -2.0, 0.5);
        let m = Mat3::from_quat(&q);
        let back = Quat::from_normalized_mat3(&m);
        // Sign may flip; both represent the same rotation
        let same = quat_approx_eq(back, q)
            || quat_approx_eq(back, Quat::new(-q.x, -q.y, -q.z, -q.w));
        assert!(same, "Expected {:?}, got {:?}", q, back);
    }
}
