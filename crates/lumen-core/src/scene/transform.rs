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

//! The `Transform` value: position, rotation and scale with a cached local matrix.

use crate::math::{Mat4, Quaternion, Vec3};

use super::{SceneError, TransformArena, TransformId};

/// Position, rotation and scale of a node, plus an optional parent link.
///
/// The local matrix is `scale * rotation * translation` and is recomputed
/// eagerly by every setter, so [`Transform::local_matrix`] is a plain read.
/// The world matrix is never cached: it is rebuilt from the parent chain each
/// time it is requested, so a parent mutation is visible on the next read.
///
/// The parent is a non-owning [`TransformId`] into a [`TransformArena`]. A
/// parent that has since been removed from the arena is ignored and the
/// transform behaves as a root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quaternion,
    scale: Vec3,
    local: Mat4,
    parent: Option<TransformId>,
}

impl Transform {
    /// Creates a root transform.
    pub fn new(position: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            local: Mat4::IDENTITY,
            parent: None,
        };
        transform.update_local();
        transform
    }

    /// A root transform at the origin with no rotation and unit scale.
    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Quaternion::IDENTITY, Vec3::ONE)
    }

    /// A root transform at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quaternion::IDENTITY, Vec3::ONE)
    }

    fn update_local(&mut self) {
        self.local = Mat4::from_scale(self.scale)
            * Mat4::from_quaternion(self.rotation)
            * Mat4::from_translation(self.position);
    }

    /// The translation component.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The rotation component, exactly as it was last set.
    #[inline]
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// The scale component.
    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// The parent link, if any. The link may be stale.
    #[inline]
    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    /// Sets the translation and recomputes the local matrix.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_local();
    }

    /// Sets the rotation and recomputes the local matrix.
    ///
    /// The quaternion is stored as given. The local matrix is built from its
    /// normalised form, so a slightly drifted rotation never skews the model.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.update_local();
    }

    /// Sets the scale and recomputes the local matrix.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.update_local();
    }

    /// Moves the transform by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Applies `rotation` after the current rotation and renormalises the result.
    pub fn rotate_by(&mut self, rotation: Quaternion) {
        self.set_rotation((rotation * self.rotation).normalize());
    }

    /// Renormalises the stored rotation.
    pub fn renormalize(&mut self) {
        self.set_rotation(self.rotation.normalize());
    }

    /// Sets or clears the parent link without any validation.
    ///
    /// Use [`TransformArena::set_parent`] for nodes stored in an arena so that
    /// cycles are rejected up front.
    pub fn set_parent(&mut self, parent: Option<TransformId>) {
        self.parent = parent;
    }

    /// Returns a copy of this transform attached to `parent`.
    pub fn with_parent(mut self, parent: TransformId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The cached `scale * rotation * translation` matrix.
    #[inline]
    pub fn local_matrix(&self) -> Mat4 {
        self.local
    }

    /// The world matrix: the local matrix multiplied by every live ancestor's
    /// local matrix, nearest first.
    ///
    /// ## Returns
    ///
    /// [`SceneError::CycleDetected`] if the parent chain loops back on itself.
    pub fn world_matrix(&self, arena: &TransformArena) -> Result<Mat4, SceneError> {
        let mut world = self.local;
        let mut next = self.parent;
        let mut depth = 0usize;

        while let Some(id) = next {
            let Some(parent) = arena.get(id) else {
                break;
            };
            depth += 1;
            if depth > arena.len() {
                return Err(SceneError::CycleDetected { node: id });
            }
            world = world * parent.local;
            next = parent.parent;
        }

        Ok(world)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_local_matrix_order_is_scale_rotation_translation() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let r = Quaternion::from_axis_angle(Vec3::Y, 0.4);
        let s = Vec3::new(2.0, 1.0, 0.5);
        let t = Transform::new(p, r, s);
        let expected = Mat4::from_scale(s) * Mat4::from_quaternion(r) * Mat4::from_translation(p);
        assert_eq!(t.local_matrix(), expected);
    }

    #[test]
    fn test_setters_refresh_local_matrix() {
        let mut t = Transform::identity();
        t.set_position(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(t.local_matrix().translation(), Vec3::new(5.0, 0.0, 0.0));

        t.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(
            t.local_matrix().transform_point(Vec3::X),
            Vec3::new(7.0, 0.0, 0.0)
        );

        t.set_rotation(Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2));
        assert_abs_diff_eq!(
            t.local_matrix().transform_point(Vec3::X),
            Vec3::new(5.0, 2.0, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_set_rotation_keeps_value_as_given() {
        let mut t = Transform::identity();
        let drifted = Quaternion::new(0.0, 0.0, 0.0, 1.01);
        t.set_rotation(drifted);
        assert_eq!(t.rotation(), drifted);
        assert_abs_diff_eq!(t.local_matrix(), Mat4::IDENTITY, epsilon = 1e-6);

        t.renormalize();
        assert_abs_diff_eq!(t.rotation(), Quaternion::IDENTITY, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_by_stays_unit_length() {
        let mut t = Transform::identity();
        let step = Quaternion::from_axis_angle(Vec3::new(0.3, 1.0, 0.2), 0.01);
        for _ in 0..10_000 {
            t.rotate_by(step);
        }
        assert!((t.rotation().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_root_world_equals_local() {
        let arena = TransformArena::new();
        let t = Transform::from_position(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(t.world_matrix(&arena).unwrap(), t.local_matrix());
    }
}
