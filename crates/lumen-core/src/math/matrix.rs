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

//! A 4x4 row-major matrix for affine and projective transforms.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use super::{MathError, Quaternion, Vec3, Vec4, EPSILON, PI};

/// A 4x4 matrix stored as four rows.
///
/// Points are row vectors multiplied on the left (`v * M`). Translation
/// lives in the fourth row and `a * b` means "apply `a`, then `b`". A local
/// model matrix is therefore `scale * rotation * translation` and a full
/// model-view-projection is `world * view * projection`.
///
/// The flat row-major array returned by [`Mat4::to_array`] can be uploaded
/// as-is to an OpenGL `mat4` uniform (with `transpose = false`) and used as
/// `mvp * vec4(position, 1.0)` in GLSL.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The rows of the matrix.
    pub rows: [Vec4; 4],
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A matrix with every element set to zero. It has no inverse.
    pub const ZERO: Self = Self {
        rows: [Vec4::ZERO; 4],
    };

    /// Creates a matrix from four rows.
    #[inline]
    pub const fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            rows: [r0, r1, r2, r3],
        }
    }

    /// Creates a matrix from a row-major `[[f32; 4]; 4]` array.
    pub fn from_rows_array(a: [[f32; 4]; 4]) -> Self {
        let row = |r: [f32; 4]| Vec4::new(r[0], r[1], r[2], r[3]);
        Self::from_rows(row(a[0]), row(a[1]), row(a[2]), row(a[3]))
    }

    /// Returns the elements as a row-major `[[f32; 4]; 4]` array.
    pub fn to_rows_array(&self) -> [[f32; 4]; 4] {
        self.rows.map(Vec4::to_array)
    }

    /// Returns the sixteen elements in row-major order.
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.rows.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&row.to_array());
        }
        out
    }

    // --- Checked access ---

    /// Returns row `index`.
    pub fn row(&self, index: usize) -> Result<Vec4, MathError> {
        self.rows
            .get(index)
            .copied()
            .ok_or(MathError::IndexOutOfRange { index, len: 4 })
    }

    /// Returns column `index`.
    pub fn column(&self, index: usize) -> Result<Vec4, MathError> {
        Ok(Vec4::new(
            self.rows[0].get(index)?,
            self.rows[1].get(index)?,
            self.rows[2].get(index)?,
            self.rows[3].get(index)?,
        ))
    }

    /// Returns the element at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> Result<f32, MathError> {
        self.row(row)?.get(col)
    }

    /// Overwrites the element at (`row`, `col`).
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<(), MathError> {
        let r = self
            .rows
            .get_mut(row)
            .ok_or(MathError::IndexOutOfRange { index: row, len: 4 })?;
        if col >= Vec4::LEN {
            return Err(MathError::IndexOutOfRange { index: col, len: 4 });
        }
        r[col] = value;
        Ok(())
    }

    // --- Affine constructors ---

    /// A translation by `v`.
    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// A non-uniform scale.
    pub fn from_scale(s: Vec3) -> Self {
        Self::from_rows(
            Vec4::new(s.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, s.z, 0.0),
            Vec4::W,
        )
    }

    /// A counter-clockwise rotation of `angle` radians around the X axis.
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// A counter-clockwise rotation of `angle` radians around the Y axis.
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// A counter-clockwise rotation of `angle` radians around the Z axis.
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// A rotation of `angle` radians around an arbitrary axis.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::from_quaternion(Quaternion::from_axis_angle(axis, angle))
    }

    /// The rotation matrix of a quaternion. The quaternion is normalised first.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let q = q.normalize();
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, yy, zz) = (q.x * x2, q.y * y2, q.z * z2);
        let (xy, xz, yz) = (q.x * y2, q.x * z2, q.y * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);

        Self::from_rows(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// A right-handed view matrix looking from `eye` towards `target`.
    ///
    /// Fails when `eye == target` or when `up` is parallel to the view direction.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        let back = eye - target;
        if back.length_squared() < EPSILON * EPSILON {
            return Err(MathError::out_of_range(
                "target",
                "a point distinct from eye",
                back.length(),
            ));
        }
        let z = back.normalize();
        let x = up.cross(z);
        if x.length_squared() < EPSILON * EPSILON {
            return Err(MathError::out_of_range(
                "up",
                "a vector not parallel to the view direction",
                x.length(),
            ));
        }
        let x = x.normalize();
        let y = z.cross(x);

        Ok(Self::from_rows(
            Vec4::new(x.x, y.x, z.x, 0.0),
            Vec4::new(x.y, y.y, z.y, 0.0),
            Vec4::new(x.z, y.z, z.z, 0.0),
            Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
        ))
    }

    // --- Projections (OpenGL clip space, depth in [-1, 1]) ---

    /// A centred orthographic projection of the given `width` and `height`.
    pub fn orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Result<Self, MathError> {
        Self::orthographic_off_center(
            -width * 0.5,
            width * 0.5,
            -height * 0.5,
            height * 0.5,
            z_near,
            z_far,
        )
    }

    /// An orthographic projection of an arbitrary box.
    pub fn orthographic_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, MathError> {
        if right == left {
            return Err(MathError::out_of_range("right", "!= left", right));
        }
        if top == bottom {
            return Err(MathError::out_of_range("top", "!= bottom", top));
        }
        if z_far == z_near {
            return Err(MathError::out_of_range("z_far", "!= z_near", z_far));
        }

        let inv_rl = 1.0 / (right - left);
        let inv_tb = 1.0 / (top - bottom);
        let inv_fn = 1.0 / (z_far - z_near);

        Ok(Self::from_rows(
            Vec4::new(2.0 * inv_rl, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * inv_tb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 * inv_fn, 0.0),
            Vec4::new(
                -(right + left) * inv_rl,
                -(top + bottom) * inv_tb,
                -(z_far + z_near) * inv_fn,
                1.0,
            ),
        ))
    }

    /// A perspective projection from a vertical field of view.
    ///
    /// ## Arguments
    ///
    /// * `fovy` - Vertical field of view in radians, in `(0, π]`.
    /// * `aspect` - Width divided by height, `> 0`.
    /// * `z_near` - Distance to the near plane, `> 0`.
    /// * `z_far` - Distance to the far plane, `> z_near`.
    pub fn perspective_field_of_view(
        fovy: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, MathError> {
        if !(fovy > 0.0 && fovy <= PI) {
            return Err(MathError::out_of_range("fovy", "(0, π]", fovy));
        }
        if !(aspect > 0.0) {
            return Err(MathError::out_of_range("aspect", "> 0", aspect));
        }
        Self::check_depth_range(z_near, z_far)?;

        let y_max = z_near * (0.5 * fovy).tan();
        let x_max = y_max * aspect;
        Self::perspective_off_center(-x_max, x_max, -y_max, y_max, z_near, z_far)
    }

    /// A perspective projection of an asymmetric frustum.
    pub fn perspective_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, MathError> {
        Self::check_depth_range(z_near, z_far)?;
        if right == left {
            return Err(MathError::out_of_range("right", "!= left", right));
        }
        if top == bottom {
            return Err(MathError::out_of_range("top", "!= bottom", top));
        }

        let x = 2.0 * z_near / (right - left);
        let y = 2.0 * z_near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(z_far + z_near) / (z_far - z_near);
        let d = -(2.0 * z_far * z_near) / (z_far - z_near);

        Ok(Self::from_rows(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(a, b, c, -1.0),
            Vec4::new(0.0, 0.0, d, 0.0),
        ))
    }

    fn check_depth_range(z_near: f32, z_far: f32) -> Result<(), MathError> {
        if !(z_near > 0.0) {
            return Err(MathError::out_of_range("z_near", "> 0", z_near));
        }
        if !(z_far > z_near) {
            return Err(MathError::out_of_range("z_far", "> z_near", z_far));
        }
        Ok(())
    }

    // --- Operations ---

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let a = self.to_rows_array();
        let mut t = [[0.0; 4]; 4];
        for (r, row) in a.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                t[c][r] = *value;
            }
        }
        Self::from_rows_array(t)
    }

    /// Computes the determinant by elimination with partial pivoting.
    pub fn determinant(&self) -> f32 {
        let mut a = self.to_rows_array();
        let mut det = 1.0;
        for col in 0..4 {
            let pivot_row = Self::pivot_row(&a, col);
            if a[pivot_row][col] == 0.0 {
                return 0.0;
            }
            if pivot_row != col {
                a.swap(col, pivot_row);
                det = -det;
            }
            let pivot = a[col][col];
            det *= pivot;
            for r in col + 1..4 {
                let factor = a[r][col] / pivot;
                for c in col..4 {
                    let v = a[col][c];
                    a[r][c] -= factor * v;
                }
            }
        }
        det
    }

    /// Inverts the matrix by Gauss-Jordan elimination with partial pivoting.
    ///
    /// For each column the row with the largest-magnitude entry at or below
    /// the diagonal becomes the pivot. A pivot of exactly zero means the
    /// matrix is singular.
    ///
    /// ## Returns
    ///
    /// The inverse, or [`MathError::SingularMatrix`].
    pub fn inverse(&self) -> Result<Self, MathError> {
        let mut a = self.to_rows_array();
        let mut inv = Self::IDENTITY.to_rows_array();

        for col in 0..4 {
            let pivot_row = Self::pivot_row(&a, col);
            if a[pivot_row][col] == 0.0 {
                return Err(MathError::SingularMatrix);
            }
            a.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let pivot = a[col][col];
            for c in 0..4 {
                a[col][c] /= pivot;
                inv[col][c] /= pivot;
            }

            for r in 0..4 {
                if r == col {
                    continue;
                }
                let factor = a[r][col];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..4 {
                    let (pa, pi) = (a[col][c], inv[col][c]);
                    a[r][c] -= factor * pa;
                    inv[r][c] -= factor * pi;
                }
            }
        }

        Ok(Self::from_rows_array(inv))
    }

    fn pivot_row(a: &[[f32; 4]; 4], col: usize) -> usize {
        let mut best = col;
        for r in col + 1..4 {
            if a[r][col].abs() > a[best][col].abs() {
                best = r;
            }
        }
        best
    }

    /// Transforms a point (`w = 1`), ignoring the resulting `w`.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (p.extend(1.0) * *self).truncate()
    }

    /// Transforms a direction (`w = 0`); translation has no effect.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (v.extend(0.0) * *self).truncate()
    }

    /// Transforms a point and applies the perspective divide.
    pub fn project_point(&self, p: Vec3) -> Vec3 {
        let clip = p.extend(1.0) * *self;
        if clip.w != 0.0 {
            clip.truncate() / clip.w
        } else {
            clip.truncate()
        }
    }

    /// The translation stored in the fourth row.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.rows[3].truncate()
    }
}

impl Default for Mat4 {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;
    /// Composes two transforms: `a * b` applies `a` first, then `b`.
    fn mul(self, rhs: Self) -> Self {
        Self {
            rows: self.rows.map(|row| row * rhs),
        }
    }
}

impl Mul<Mat4> for Vec4 {
    type Output = Vec4;
    /// Transforms a row vector: `v * M`.
    #[inline]
    fn mul(self, m: Mat4) -> Vec4 {
        m.rows[0] * self.x + m.rows[1] * self.y + m.rows[2] * self.z + m.rows[3] * self.w
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;
    /// Scales every element.
    fn mul(self, s: f32) -> Self {
        Self {
            rows: self.rows.map(|row| row * s),
        }
    }
}

impl Add for Mat4 {
    type Output = Self;
    /// Element-wise addition.
    fn add(self, rhs: Self) -> Self {
        Self::from_rows(
            self.rows[0] + rhs.rows[0],
            self.rows[1] + rhs.rows[1],
            self.rows[2] + rhs.rows[2],
            self.rows[3] + rhs.rows[3],
        )
    }
}

impl Sub for Mat4 {
    type Output = Self;
    /// Element-wise subtraction.
    fn sub(self, rhs: Self) -> Self {
        Self::from_rows(
            self.rows[0] - rhs.rows[0],
            self.rows[1] - rhs.rows[1],
            self.rows[2] - rhs.rows[2],
            self.rows[3] - rhs.rows[3],
        )
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;
    /// Accesses the element at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is greater than 3. Use [`Mat4::get`] for a checked access.
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.rows[row][col]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.rows[row][col]
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
