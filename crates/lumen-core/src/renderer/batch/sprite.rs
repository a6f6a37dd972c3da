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

use std::sync::Arc;

use crate::math::{LinearRgba, Vec2};
use crate::renderer::mesh::{MeshData, MeshSlot};
use crate::renderer::texture::{Texture, TextureRegion};
use crate::scene::Transform;

/// A textured quad.
///
/// The quad spans `(0, 0)` to `size` in model space with `y` growing towards
/// the bottom of the image, which matches a [`ViewOrigin::TopLeft`]
/// orthographic camera.
///
/// [`ViewOrigin::TopLeft`]: crate::camera::ViewOrigin::TopLeft
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: Arc<Texture>,
    mesh: Arc<MeshSlot>,
    transform: Transform,
    tint: LinearRgba,
    size: Vec2,
}

impl Sprite {
    /// A sprite showing the whole texture at its native size.
    pub fn new(texture: Arc<Texture>) -> Self {
        let size = texture.size();
        Self::with_size(texture, size)
    }

    /// A sprite showing the whole texture stretched to `size`.
    pub fn with_size(texture: Arc<Texture>, size: Vec2) -> Self {
        let mesh = MeshData::quad(Vec2::ZERO, size, Vec2::ZERO, Vec2::ONE);
        Self::from_parts(texture, mesh, size)
    }

    /// A sprite showing the `region` sub-rectangle of an atlas at its native size.
    pub fn with_region(texture: Arc<Texture>, region: TextureRegion) -> Self {
        let size = region.size();
        let (uv_min, uv_max) = region.uv_bounds(texture.size());
        let mesh = MeshData::quad(Vec2::ZERO, size, uv_min, uv_max);
        Self::from_parts(texture, mesh, size)
    }

    fn from_parts(texture: Arc<Texture>, mesh: MeshData, size: Vec2) -> Self {
        Self {
            texture,
            mesh: Arc::new(MeshSlot::new(mesh)),
            transform: Transform::identity(),
            tint: LinearRgba::WHITE,
            size,
        }
    }

    /// The texture being shown.
    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub(crate) fn mesh(&self) -> &Arc<MeshSlot> {
        &self.mesh
    }

    /// The sprite's transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the sprite's transform.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The colour the texture is multiplied by.
    pub fn tint(&self) -> LinearRgba {
        self.tint
    }

    /// Sets the colour the texture is multiplied by.
    pub fn set_tint(&mut self, tint: LinearRgba) {
        self.tint = tint;
    }

    /// Size of the quad in model units.
    pub fn size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::cleanup::CleanupQueue;
    use crate::renderer::headless::RecordingDevice;
    use crate::renderer::texture::TextureOptions;

    fn texture(queue: &CleanupQueue, device: &RecordingDevice) -> Arc<Texture> {
        Arc::new(
            Texture::from_pixels(
                device,
                queue.sender(),
                4,
                2,
                &[255; 32],
                TextureOptions::default(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn sprite_takes_texture_size() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = texture(&queue, &device);
        let sprite = Sprite::new(texture.clone());
        assert_eq!(sprite.size(), Vec2::new(4.0, 2.0));
        assert_eq!(sprite.tint(), LinearRgba::WHITE);
        assert_eq!(sprite.mesh().data().vertices()[2].position, [4.0, 2.0, 0.0]);
        texture.dispose();
    }

    #[test]
    fn region_sprite_samples_sub_rectangle() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = texture(&queue, &device);
        let sprite = Sprite::with_region(texture.clone(), TextureRegion::new(2, 0, 2, 1));
        let vertices = sprite.mesh().data().vertices();
        assert_eq!(sprite.size(), Vec2::new(2.0, 1.0));
        assert_eq!(vertices[0].uv, [0.5, 0.0]);
        assert_eq!(vertices[2].uv, [1.0, 0.5]);
        texture.dispose();
    }

    #[test]
    fn clones_share_geometry() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = texture(&queue, &device);
        let mut a = Sprite::with_size(texture.clone(), Vec2::new(10.0, 10.0));
        let b = a.clone();
        a.set_tint(LinearRgba::RED);
        assert!(Arc::ptr_eq(a.mesh(), b.mesh()));
        assert_eq!(b.tint(), LinearRgba::WHITE);
        texture.dispose();
    }
}
