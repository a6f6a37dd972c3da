// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for representing 3D rotations.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

use super::{Vec3, EPSILON};

/// A rotation stored as `(x, y, z, w)`, vector part first, scalar part last.
///
/// Rotations should be unit quaternions, but nothing here enforces it:
/// composing rotations with `*` does not renormalise the result. Callers that
/// accumulate many small rotations call [`Quaternion::normalize`] themselves
/// (see `Transform::rotate_by`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from its raw components. No normalisation is applied.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle_radians` around `axis`.
    ///
    /// The axis is normalised first; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = (angle_radians * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Creates a rotation from Euler angles: `yaw` around Y, then `pitch`
    /// around X, then `roll` around Z, all expressed in the parent frame of
    /// the previous step.
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, yaw)
            * Self::from_axis_angle(Vec3::X, pitch)
            * Self::from_axis_angle(Vec3::Z, roll)
    }

    /// Decomposes the rotation into a unit axis and an angle in `[0, 2π]`.
    ///
    /// Near-identity rotations report the X axis with a zero angle.
    pub fn to_axis_angle(&self) -> (Vec3, f32) {
        let q = self.normalize();
        let angle = 2.0 * q.w.clamp(-1.0, 1.0).acos();
        let s = (1.0 - q.w * q.w).max(0.0).sqrt();
        if s < EPSILON {
            (Vec3::X, angle)
        } else {
            (Vec3::new(q.x / s, q.y / s, q.z / s), angle)
        }
    }

    /// Calculates the squared length of the quaternion.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length of the quaternion.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the unit quaternion with the same orientation.
    /// A zero quaternion normalises to the identity.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Computes the multiplicative inverse. For a unit quaternion this equals
    /// the conjugate.
    pub fn inverse(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 0.0 {
            self.conjugate() * (1.0 / len_sq)
        } else {
            Self::IDENTITY
        }
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates a vector by this quaternion (assumed to be unit length).
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Spherical linear interpolation along the shortest arc, `t` clamped to `[0.0, 1.0]`.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut cos_theta = start.dot(end);
        let mut end = end;
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end = -end;
        }

        if cos_theta > 1.0 - EPSILON {
            // Nearly parallel: fall back to a normalised lerp.
            return (start * (1.0 - t) + end * t).normalize();
        }

        let angle = cos_theta.acos();
        let inv_sin = 1.0 / angle.sin();
        start * (((1.0 - t) * angle).sin() * inv_sin) + end * ((t * angle).sin() * inv_sin)
    }
}

impl Default for Quaternion {
    /// Returns the identity quaternion.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;
    /// Hamilton product: `a * b` applies `b` first, then `a`.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion.
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate_vec3(rhs)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales every component.
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Quaternion {
    type Output = Self;
    /// Component-wise addition (not a rotation operation).
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.w.abs_diff_eq(&other.w, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
            && self.w.relative_eq(&other.w, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2, PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Quaternion::IDENTITY * v, v);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_from_axis_angle_rotates() {
        let q = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert_abs_diff_eq!(q * Vec3::X, Vec3::Y, epsilon = 1e-6);

        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert_abs_diff_eq!(q * Vec3::Z, Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn test_from_axis_angle_zero_axis_is_identity() {
        assert_eq!(
            Quaternion::from_axis_angle(Vec3::ZERO, 1.0),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_hamilton_product_order() {
        let yaw = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let pitch = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
        // pitch first, then yaw
        let combined = yaw * pitch;
        let expected = yaw * (pitch * Vec3::Z);
        assert_abs_diff_eq!(combined * Vec3::Z, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_composition_does_not_renormalize() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        let product = q * q;
        assert!(approx_eq(product.length(), 4.0));
        assert!(approx_eq(product.normalize().length(), 1.0));
    }

    #[test]
    fn test_normalize_zero_is_identity() {
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7);
        let v = Vec3::new(0.3, -2.0, 5.0);
        assert_abs_diff_eq!(q.inverse() * (q * v), v, epsilon = 1e-5);
        assert_abs_diff_eq!(q.inverse(), q.conjugate(), epsilon = 1e-6);
    }

    #[test]
    fn test_to_axis_angle_round_trip() {
        let axis = Vec3::new(0.0, 0.6, 0.8);
        let q = Quaternion::from_axis_angle(axis, 1.2);
        let (out_axis, angle) = q.to_axis_angle();
        assert_abs_diff_eq!(out_axis, axis, epsilon = 1e-5);
        assert!(approx_eq(angle, 1.2));
    }

    #[test]
    fn test_from_euler_yaw_only() {
        let q = Quaternion::from_euler(PI, 0.0, 0.0);
        assert_abs_diff_eq!(q * Vec3::Z, -Vec3::Z, epsilon = 1e-6);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert_abs_diff_eq!(Quaternion::slerp(a, b, 0.0), a, epsilon = 1e-6);
        assert_abs_diff_eq!(Quaternion::slerp(a, b, 1.0), b, epsilon = 1e-6);

        let mid = Quaternion::slerp(a, b, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);
        assert_abs_diff_eq!(mid, expected, epsilon = 1e-5);
    }
}
