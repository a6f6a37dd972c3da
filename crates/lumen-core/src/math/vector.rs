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

//! 2D, 3D and 4D vector types and their associated operations.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use super::{Mat4, MathError};

/// Implements the component-wise operators, indexing and `approx` traits
/// shared by every vector type.
macro_rules! impl_vector_ops {
    ($ty:ident, $len:expr, { $($field:ident => $idx:expr),+ }) => {
        impl $ty {
            /// Number of components.
            pub const LEN: usize = $len;

            /// Calculates the dot product of this vector and another.
            #[inline]
            pub fn dot(&self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Calculates the squared length of the vector.
            #[inline]
            pub fn length_squared(&self) -> f32 {
                self.dot(*self)
            }

            /// Calculates the length (magnitude) of the vector.
            #[inline]
            pub fn length(&self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Returns the unit vector pointing in the same direction.
            ///
            /// A zero-length vector yields the zero vector instead of NaN.
            #[inline]
            pub fn normalize(&self) -> Self {
                let len = self.length();
                if len > 0.0 {
                    *self * (1.0 / len)
                } else {
                    Self::ZERO
                }
            }

            /// Calculates the distance between this vector and another.
            #[inline]
            pub fn distance(&self, other: Self) -> f32 {
                (*self - other).length()
            }

            /// Linear interpolation between two vectors, `t` clamped to `[0.0, 1.0]`.
            #[inline]
            pub fn lerp(start: Self, end: Self, t: f32) -> Self {
                start + (end - start) * t.clamp(0.0, 1.0)
            }

            /// Component-wise minimum.
            #[inline]
            pub fn min(self, rhs: Self) -> Self {
                Self { $($field: self.$field.min(rhs.$field)),+ }
            }

            /// Component-wise maximum.
            #[inline]
            pub fn max(self, rhs: Self) -> Self {
                Self { $($field: self.$field.max(rhs.$field)),+ }
            }

            /// Returns a vector with the absolute value of each component.
            #[inline]
            pub fn abs(self) -> Self {
                Self { $($field: self.$field.abs()),+ }
            }

            /// Returns the component at `index`, or an error if it does not exist.
            pub fn get(&self, index: usize) -> Result<f32, MathError> {
                match index {
                    $($idx => Ok(self.$field),)+
                    _ => Err(MathError::IndexOutOfRange { index, len: $len }),
                }
            }

            /// Returns the components as an array.
            #[inline]
            pub fn to_array(self) -> [f32; $len] {
                [$(self.$field),+]
            }
        }

        impl Add for $ty {
            type Output = Self;
            /// Adds two vectors component-wise.
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $ty {
            type Output = Self;
            /// Subtracts two vectors component-wise.
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            /// Multiplies the vector by a scalar.
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;
            /// Multiplies a scalar by a vector.
            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl Mul for $ty {
            type Output = Self;
            /// Multiplies two vectors component-wise.
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            /// Divides the vector by a scalar.
            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Div for $ty {
            type Output = Self;
            /// Divides two vectors component-wise.
            #[inline]
            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Index<usize> for $ty {
            type Output = f32;
            /// Accesses a component by index.
            ///
            /// # Panics
            /// Panics if `index` is out of bounds. Use `get` for a checked access.
            #[inline]
            fn index(&self, index: usize) -> &f32 {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("Index out of bounds for {}", stringify!($ty)),
                }
            }
        }

        impl IndexMut<usize> for $ty {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("Index out of bounds for {}", stringify!($ty)),
                }
            }
        }

        impl AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                super::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                true $(&& self.$field.abs_diff_eq(&other.$field, epsilon))+
            }
        }

        impl RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                true $(&& self.$field.relative_eq(&other.$field, epsilon, max_relative))+
            }
        }
    };
}

// --- Vec2 ---

/// A 2-dimensional vector with `f32` components.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0);
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self::new(1.0, 0.0);
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self::new(0.0, 1.0);

    /// Creates a new `Vec2`.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Extends the vector with a `z` component.
    #[inline]
    pub const fn extend(self, z: f32) -> Vec3 {
        Vec3::new(self.x, self.y, z)
    }
}

impl_vector_ops!(Vec2, 2, { x => 0, y => 1 });

// --- Vec3 ---

/// A 3-dimensional vector with `f32` components.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new `Vec3`.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Computes the cross product of this vector and another.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Extends the vector with a `w` component.
    #[inline]
    pub const fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    /// Drops the `z` component.
    #[inline]
    pub const fn truncate(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Transforms this vector as a point (`w = 1`) by `m`.
    #[inline]
    pub fn transform_position(self, m: &Mat4) -> Vec3 {
        m.transform_point(self)
    }

    /// Transforms this vector as a direction (`w = 0`) by `m`.
    #[inline]
    pub fn transform_direction(self, m: &Mat4) -> Vec3 {
        m.transform_vector(self)
    }
}

impl_vector_ops!(Vec3, 3, { x => 0, y => 1, z => 2 });

// --- Vec4 ---

/// A 4-dimensional vector with `f32` components.
///
/// Used for homogeneous coordinates (`w = 1` for points, `w = 0` for
/// directions) and as the row type of [`Mat4`](super::Mat4).
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec4 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
    /// The w component of the vector.
    pub w: f32,
}

impl Vec4 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// The unit vector along X.
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// The unit vector along Y.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// The unit vector along Z.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// The unit vector along W.
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new `Vec4`.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a `Vec4` from a `Vec3` and a `w` component.
    #[inline]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drops the `w` component.
    #[inline]
    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl_vector_ops!(Vec4, 4, { x => 0, y => 1, z => 2, w => 3 });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vec2_ops() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);
        assert_eq!(v1 + v2, Vec2::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vec2::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(3.0 * v1, Vec2::new(3.0, 6.0));
        assert_eq!(v1 * v2, Vec2::new(3.0, 8.0));
        assert_eq!(-v1, Vec2::new(-1.0, -2.0));
        assert_eq!(Vec2::new(4.0, 6.0) / 2.0, Vec2::new(2.0, 3.0));
        assert_eq!(v1.dot(v2), 11.0);
    }

    #[test]
    fn test_vec2_index() {
        let mut v = Vec2::new(5.0, 6.0);
        assert_eq!(v[0], 5.0);
        assert_eq!(v[1], 6.0);
        v[0] = 10.0;
        assert_eq!(v.x, 10.0);
    }

    #[test]
    #[should_panic]
    fn test_vec2_index_out_of_bounds() {
        let v = Vec2::new(1.0, 2.0);
        let _ = v[2];
    }

    #[test]
    fn test_checked_get() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(2), Ok(3.0));
        assert_eq!(
            v.get(3),
            Err(MathError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(Vec4::W.get(3), Ok(1.0));
    }

    #[test]
    fn test_length_and_distance() {
        let v = Vec3::new(1.0, 2.0, 2.0);
        assert!(approx_eq(v.length(), 3.0));
        assert!(approx_eq(v.length_squared(), 9.0));
        assert!(approx_eq(Vec3::ZERO.distance(v), 3.0));
    }

    #[test]
    fn test_normalize_unit_length() {
        let samples = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-1.0, 5.0, 2.5),
            Vec3::new(1e-3, 2e-3, -4e-3),
            Vec3::new(1000.0, -250.0, 75.0),
        ];
        for v in samples {
            assert!(approx_eq(v.normalize().length(), 1.0), "{v:?}");
        }
        assert!(approx_eq(Vec4::new(1.0, 1.0, 1.0, 1.0).normalize().length(), 1.0));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert_eq!(Vec4::ZERO.normalize(), Vec4::ZERO);
        assert!(!Vec3::ZERO.normalize().x.is_nan());
    }

    #[test]
    fn test_cross() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.cross(v), Vec3::ZERO);
    }

    #[test]
    fn test_lerp_clamps() {
        let start = Vec3::new(0.0, 10.0, -2.0);
        let end = Vec3::new(10.0, 0.0, 2.0);
        assert_eq!(Vec3::lerp(start, end, 0.5), Vec3::new(5.0, 5.0, 0.0));
        assert_eq!(Vec3::lerp(start, end, -1.0), start);
        assert_eq!(Vec3::lerp(start, end, 2.0), end);
    }

    #[test]
    fn test_min_max_abs() {
        let a = Vec3::new(1.0, -5.0, 3.0);
        let b = Vec3::new(-2.0, 4.0, 3.5);
        assert_eq!(a.min(b), Vec3::new(-2.0, -5.0, 3.0));
        assert_eq!(a.max(b), Vec3::new(1.0, 4.0, 3.5));
        assert_eq!(a.abs(), Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_extend_truncate() {
        let v = Vec2::new(1.0, 2.0).extend(3.0);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.extend(1.0).truncate(), v);
        assert_eq!(Vec4::from_vec3(v, 0.0), Vec4::new(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn test_equality_is_exact() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(1.0, 2.0, 3.0 + 1e-6);
        assert_ne!(a, b);
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }

    #[test]
    fn test_assign_ops() {
        let mut v = Vec2::new(1.0, 1.0);
        v += Vec2::new(2.0, 3.0);
        assert_eq!(v, Vec2::new(3.0, 4.0));
        v -= Vec2::ONE;
        assert_eq!(v, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_transform_position_and_direction() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let v = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(v.transform_position(&m), Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(v.transform_direction(&m), v);
    }
}
