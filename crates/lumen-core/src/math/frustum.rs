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

//! View-frustum planes for coarse visibility tests.

use super::{Mat4, Vec3, Vec4};

/// A plane `normal · p + d = 0`. Points with a positive distance are in front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// The unit normal of the plane.
    pub normal: Vec3,
    /// The signed offset from the origin.
    pub d: f32,
}

impl Plane {
    fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                d: v.w / len,
            }
        } else {
            Self { normal, d: v.w }
        }
    }

    /// Signed distance from the plane to `p`.
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }
}

/// The six clipping planes of a camera, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes of a `view * projection` matrix.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        // With row vectors, clip component j is the dot product with column j.
        let [c0, c1, c2, c3] = view_projection.transpose().rows;
        Self {
            planes: [
                Plane::from_coefficients(c3 + c0),
                Plane::from_coefficients(c3 - c0),
                Plane::from_coefficients(c3 + c1),
                Plane::from_coefficients(c3 - c1),
                Plane::from_coefficients(c3 + c2),
                Plane::from_coefficients(c3 - c2),
            ],
        }
    }

    /// Returns `true` if `p` is inside or on the boundary of the frustum.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance(p) >= 0.0)
    }

    /// Returns `true` if a sphere touches the frustum. Conservative near corners.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance(center) >= -radius)
    }
}
