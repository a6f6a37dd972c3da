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

//! Orthographic and perspective cameras.

use crate::math::{Frustum, Mat4, MathError, Vec3, FRAC_PI_2, TAU};

/// Margin kept between the pitch and the poles.
pub const PITCH_MARGIN: f32 = 1e-3;

/// Where the origin of an orthographic camera sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewOrigin {
    /// `(0, 0)` is the centre of the view, Y points up.
    #[default]
    Centered,
    /// `(0, 0)` is the top-left corner, Y points down (pixel coordinates).
    TopLeft,
}

/// The projection parameters a camera was created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// A parallel projection of a `width` x `height` box.
    Orthographic {
        /// Width of the view volume.
        width: f32,
        /// Height of the view volume.
        height: f32,
        /// Near clipping plane.
        z_near: f32,
        /// Far clipping plane.
        z_far: f32,
        /// Screen-space origin convention.
        origin: ViewOrigin,
    },
    /// A perspective projection from a vertical field of view.
    Perspective {
        /// Vertical field of view in radians.
        fovy: f32,
        /// Width divided by height.
        aspect: f32,
        /// Near clipping plane.
        z_near: f32,
        /// Far clipping plane.
        z_far: f32,
    },
}

impl Projection {
    fn matrix(&self) -> Result<Mat4, MathError> {
        match *self {
            Projection::Orthographic {
                width,
                height,
                z_near,
                z_far,
                origin,
            } => {
                if !(width > 0.0) {
                    return Err(MathError::out_of_range("width", "> 0", width));
                }
                if !(height > 0.0) {
                    return Err(MathError::out_of_range("height", "> 0", height));
                }
                if !(z_far > z_near) {
                    return Err(MathError::out_of_range("z_far", "> z_near", z_far));
                }
                match origin {
                    ViewOrigin::Centered => Mat4::orthographic(width, height, z_near, z_far),
                    ViewOrigin::TopLeft => {
                        Mat4::orthographic_off_center(0.0, width, height, 0.0, z_near, z_far)
                    }
                }
            }
            Projection::Perspective {
                fovy,
                aspect,
                z_near,
                z_far,
            } => Mat4::perspective_field_of_view(fovy, aspect, z_near, z_far),
        }
    }
}

/// A camera with a fixed projection and a free position and orientation.
///
/// `orientation` holds Euler angles: `x` is the yaw around world Y, `y` the
/// pitch around the camera's X axis and `z` the roll around its view axis.
/// With zero orientation the camera looks down `-Z` with `+Y` up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection: Projection,
    projection_matrix: Mat4,
    position: Vec3,
    orientation: Vec3,
}

impl Camera {
    /// Creates an orthographic camera.
    ///
    /// ## Returns
    ///
    /// [`MathError::ArgumentOutOfRange`] for a non-positive `width` or
    /// `height`, or when `z_far <= z_near`.
    pub fn orthographic(
        width: f32,
        height: f32,
        z_near: f32,
        z_far: f32,
        origin: ViewOrigin,
    ) -> Result<Self, MathError> {
        Self::with_projection(Projection::Orthographic {
            width,
            height,
            z_near,
            z_far,
            origin,
        })
    }

    /// Creates a perspective camera.
    ///
    /// ## Returns
    ///
    /// [`MathError::ArgumentOutOfRange`] unless `fovy ∈ (0, π]`, `aspect > 0`,
    /// `z_near > 0` and `z_far > z_near`.
    pub fn perspective_fov(fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> Result<Self, MathError> {
        Self::with_projection(Projection::Perspective {
            fovy,
            aspect,
            z_near,
            z_far,
        })
    }

    /// Creates a camera at the origin from projection parameters.
    pub fn with_projection(projection: Projection) -> Result<Self, MathError> {
        Ok(Self {
            projection_matrix: projection.matrix()?,
            projection,
            position: Vec3::ZERO,
            orientation: Vec3::ZERO,
        })
    }

    /// Rebuilds the projection for a new viewport size.
    ///
    /// Orthographic cameras take the size as their view volume, perspective
    /// cameras only update their aspect ratio. On error the camera is unchanged.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), MathError> {
        if !(width > 0.0) {
            return Err(MathError::out_of_range("width", "> 0", width));
        }
        if !(height > 0.0) {
            return Err(MathError::out_of_range("height", "> 0", height));
        }
        let projection = match self.projection {
            Projection::Orthographic {
                z_near,
                z_far,
                origin,
                ..
            } => Projection::Orthographic {
                width,
                height,
                z_near,
                z_far,
                origin,
            },
            Projection::Perspective {
                fovy, z_near, z_far, ..
            } => Projection::Perspective {
                fovy,
                aspect: width / height,
                z_near,
                z_far,
            },
        };
        self.projection_matrix = projection.matrix()?;
        self.projection = projection;
        Ok(())
    }

    /// The projection parameters.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The projection matrix computed at creation (or last resize).
    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// The world-to-view matrix derived from position and orientation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
            * Mat4::from_rotation_y(-self.orientation.x)
            * Mat4::from_rotation_x(-self.orientation.y)
            * Mat4::from_rotation_z(-self.orientation.z)
    }

    /// `view * projection`.
    pub fn view_projection(&self) -> Mat4 {
        self.view_matrix() * self.projection_matrix
    }

    /// The world-space clipping planes of this camera.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// The camera position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the camera to `position`.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Yaw, pitch and roll in radians.
    #[inline]
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Replaces the orientation. Yaw is wrapped and pitch clamped like
    /// [`Camera::add_rotation`] does.
    pub fn set_orientation(&mut self, orientation: Vec3) {
        self.orientation = Vec3::new(
            orientation.x.rem_euclid(TAU),
            clamp_pitch(orientation.y),
            orientation.z,
        );
    }

    /// The horizontal forward direction for the current yaw.
    pub fn forward(&self) -> Vec3 {
        let (s, c) = self.orientation.x.sin_cos();
        Vec3::new(-s, 0.0, -c)
    }

    /// The horizontal right direction for the current yaw.
    pub fn right(&self) -> Vec3 {
        let (s, c) = self.orientation.x.sin_cos();
        Vec3::new(c, 0.0, -s)
    }

    /// Translates the camera relative to its heading: `x` along right, `y`
    /// along world up, `z` along forward.
    pub fn move_by(&mut self, x: f32, y: f32, z: f32) {
        self.position += self.right() * x + Vec3::Y * y + self.forward() * z;
    }

    /// Adds `x` to the yaw (wrapped into `[0, 2π)`) and `y` to the pitch
    /// (clamped just short of straight up or down).
    pub fn add_rotation(&mut self, x: f32, y: f32) {
        self.orientation.x = (self.orientation.x + x).rem_euclid(TAU);
        self.orientation.y = clamp_pitch(self.orientation.y + y);
    }

    /// Turns the camera towards `target`. Roll is left untouched.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize();
        if dir == Vec3::ZERO {
            return;
        }
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.set_orientation(Vec3::new(yaw, pitch, self.orientation.z));
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-FRAC_PI_2 + PITCH_MARGIN, FRAC_PI_2 - PITCH_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perspective_projection_is_computed_at_creation() {
        let camera = Camera::perspective_fov(PI / 3.0, 16.0 / 9.0, 0.1, 100.0).unwrap();
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_field_of_view(PI / 3.0, 16.0 / 9.0, 0.1, 100.0).unwrap()
        );
        assert!(matches!(
            camera.projection(),
            Projection::Perspective { .. }
        ));
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        assert!(Camera::perspective_fov(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(Camera::perspective_fov(1.0, -1.0, 0.1, 10.0).is_err());
        assert!(Camera::perspective_fov(1.0, 1.0, 10.0, 1.0).is_err());
        assert!(Camera::orthographic(0.0, 10.0, -1.0, 1.0, ViewOrigin::Centered).is_err());
        assert!(Camera::orthographic(10.0, 10.0, 1.0, 1.0, ViewOrigin::Centered).is_err());
    }

    #[test]
    fn test_top_left_origin_maps_pixels() {
        let camera = Camera::orthographic(800.0, 600.0, -1.0, 1.0, ViewOrigin::TopLeft).unwrap();
        let vp = camera.view_projection();
        assert_abs_diff_eq!(
            vp.project_point(Vec3::ZERO),
            Vec3::new(-1.0, 1.0, 0.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            vp.project_point(Vec3::new(800.0, 600.0, 0.0)),
            Vec3::new(1.0, -1.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_centered_origin() {
        let camera = Camera::orthographic(200.0, 100.0, -1.0, 1.0, ViewOrigin::Centered).unwrap();
        let vp = camera.view_projection();
        assert_abs_diff_eq!(vp.project_point(Vec3::ZERO), Vec3::ZERO, epsilon = 1e-6);
        assert_abs_diff_eq!(
            vp.project_point(Vec3::new(100.0, 50.0, 0.0)),
            Vec3::new(1.0, 1.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_view_matrix_inverts_camera_placement() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        camera.set_position(Vec3::new(0.0, 0.0, 10.0));
        assert_abs_diff_eq!(
            camera.view_matrix().transform_point(Vec3::ZERO),
            Vec3::new(0.0, 0.0, -10.0),
            epsilon = 1e-6
        );

        camera.add_rotation(PI / 2.0, 0.0);
        // Facing -X now: a point on -X is straight ahead.
        assert_abs_diff_eq!(
            camera
                .view_matrix()
                .transform_point(Vec3::new(-5.0, 0.0, 10.0)),
            Vec3::new(0.0, 0.0, -5.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_move_by_follows_yaw() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        camera.move_by(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(camera.position(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);

        camera.add_rotation(PI / 2.0, 0.0);
        camera.move_by(1.0, 2.0, 1.0);
        // right = (0,0,-1), forward = (-1,0,0)
        assert_abs_diff_eq!(camera.position(), Vec3::new(-1.0, 2.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        camera.add_rotation(TAU + 0.5, 0.0);
        assert!(approx_eq(camera.orientation().x, 0.5));
        camera.add_rotation(-1.0, 0.0);
        assert!(approx_eq(camera.orientation().x, TAU - 0.5));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        for _ in 0..100 {
            camera.add_rotation(0.0, 10.0);
            assert!(camera.orientation().y < FRAC_PI_2);
        }
        assert!(approx_eq(camera.orientation().y, FRAC_PI_2 - PITCH_MARGIN));
        for _ in 0..100 {
            camera.add_rotation(0.0, -10.0);
            assert!(camera.orientation().y > -FRAC_PI_2);
        }
    }

    #[test]
    fn test_look_at_points_forward() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        camera.set_position(Vec3::new(0.0, 0.0, 5.0));
        camera.look_at(Vec3::new(5.0, 0.0, 5.0));
        assert_abs_diff_eq!(camera.forward(), Vec3::X, epsilon = 1e-6);
        let view_target = camera.view_matrix().transform_point(Vec3::new(5.0, 0.0, 5.0));
        assert_abs_diff_eq!(view_target, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_resize() {
        let mut camera = Camera::perspective_fov(1.0, 1.0, 0.1, 100.0).unwrap();
        camera.resize(1920.0, 1080.0).unwrap();
        assert!(matches!(
            camera.projection(),
            Projection::Perspective { aspect, .. } if approx_eq(*aspect, 1920.0 / 1080.0)
        ));

        let before = camera;
        assert!(camera.resize(100.0, 0.0).is_err());
        assert_eq!(camera, before);
    }

    #[test]
    fn test_frustum_follows_camera() {
        let mut camera = Camera::perspective_fov(FRAC_PI_2, 1.0, 0.1, 100.0).unwrap();
        assert!(camera.frustum().contains_point(Vec3::new(0.0, 0.0, -10.0)));
        camera.add_rotation(PI, 0.0);
        assert!(!camera.frustum().contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(camera.frustum().contains_point(Vec3::new(0.0, 0.0, 10.0)));
    }
}
