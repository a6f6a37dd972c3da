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

use std::mem;
use std::sync::Arc;

use crate::camera::Camera;
use crate::math::{LinearRgba, Mat4};
use crate::renderer::api::{BlendFactor, Capability, TextureId};
use crate::renderer::cleanup::CleanupSender;
use crate::renderer::error::{RenderError, ShaderError};
use crate::renderer::mesh::MeshSlot;
use crate::renderer::shader::{ShaderProgram, MVP_UNIFORM, TEXTURE_UNIFORM, TINT_UNIFORM};
use crate::renderer::texture::Texture;
use crate::renderer::traits::GraphicsDevice;
use crate::scene::{Transform, TransformArena};

use super::{Sprite, Text};

/// Counters describing one [`SpriteBatch::draw`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Indexed draws issued.
    pub draw_calls: usize,
    /// Texture binds issued.
    pub texture_binds: usize,
    /// Tint uniform uploads issued.
    pub tint_updates: usize,
    /// MVP uniform uploads issued.
    pub mvp_updates: usize,
    /// Drawables skipped by frustum culling.
    pub culled: usize,
}

/// A queued drawable, read when the batch is drawn.
#[derive(Debug, Clone, Copy)]
enum Drawable<'a> {
    Sprite(&'a Sprite),
    Text(&'a Text),
}

impl<'a> Drawable<'a> {
    fn texture(self) -> &'a Arc<Texture> {
        match self {
            Drawable::Sprite(sprite) => sprite.texture(),
            Drawable::Text(text) => text.font().atlas(),
        }
    }

    fn mesh(self) -> &'a Arc<MeshSlot> {
        match self {
            Drawable::Sprite(sprite) => sprite.mesh(),
            Drawable::Text(text) => text.mesh(),
        }
    }

    fn tint(self) -> LinearRgba {
        match self {
            Drawable::Sprite(sprite) => sprite.tint(),
            Drawable::Text(text) => text.tint(),
        }
    }

    fn transform(self) -> &'a Transform {
        match self {
            Drawable::Sprite(sprite) => sprite.transform(),
            Drawable::Text(text) => text.transform(),
        }
    }
}

/// Draws sprites and texts with the built-in sprite shader.
///
/// Drawables are queued by reference with [`SpriteBatch::add`] and
/// [`SpriteBatch::add_text`] and flushed by [`SpriteBatch::draw`]: sprites
/// first, then texts, each in insertion order. Transforms and tints are read
/// at draw time. Nothing is sorted. Instead, each draw only reissues the
/// texture bind, tint and MVP uploads that differ from the previous drawable,
/// so consecutive drawables sharing a texture share the bind.
///
/// The queue borrows its drawables for `'a`. A batch kept across frames is
/// moved to the next frame's lifetime with [`SpriteBatch::recycle`], which
/// keeps the compiled shader.
#[derive(Debug)]
pub struct SpriteBatch<'a> {
    shader: ShaderProgram,
    sender: CleanupSender,
    sprites: Vec<&'a Sprite>,
    texts: Vec<&'a Text>,
    frustum_culling: bool,
}

impl<'a> SpriteBatch<'a> {
    /// Creates an empty batch and compiles the sprite shader.
    ///
    /// ## Arguments
    /// * `device` - The device to compile on.
    /// * `sender` - Where the shader and lazily uploaded meshes are released.
    pub fn new(device: &dyn GraphicsDevice, sender: CleanupSender) -> Result<Self, ShaderError> {
        let shader = ShaderProgram::sprite(device, sender.clone())?;
        log::info!("Sprite batch initialized.");
        Ok(Self {
            shader,
            sender,
            sprites: Vec::new(),
            texts: Vec::new(),
            frustum_culling: false,
        })
    }

    /// Moves the batch to drawables of another lifetime.
    ///
    /// Anything still queued is dropped without drawing.
    pub fn recycle<'b>(self) -> SpriteBatch<'b> {
        SpriteBatch {
            shader: self.shader,
            sender: self.sender,
            sprites: Vec::with_capacity(self.sprites.capacity()),
            texts: Vec::with_capacity(self.texts.capacity()),
            frustum_culling: self.frustum_culling,
        }
    }

    /// Queues a sprite for the next draw.
    pub fn add(&mut self, sprite: &'a Sprite) {
        self.sprites.push(sprite);
    }

    /// Queues a text for the next draw.
    pub fn add_text(&mut self, text: &'a Text) {
        self.texts.push(text);
    }

    /// Number of queued drawables.
    pub fn len(&self) -> usize {
        self.sprites.len() + self.texts.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every queued drawable without drawing.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }

    /// Enables skipping drawables whose bounds are outside the camera frustum.
    pub fn set_frustum_culling(&mut self, enabled: bool) {
        self.frustum_culling = enabled;
    }

    /// Whether frustum culling is enabled. Off by default.
    pub fn frustum_culling(&self) -> bool {
        self.frustum_culling
    }

    /// Draws and clears every queued drawable.
    ///
    /// Blending is enabled and depth testing disabled for the duration of the
    /// pass; both are restored to their previous state afterwards, also when
    /// the pass fails. The queues are emptied in every case.
    ///
    /// ## Arguments
    /// * `device` - The device to draw with.
    /// * `camera` - Supplies the view and projection matrices.
    /// * `transforms` - Resolves the parents of the drawables' transforms.
    ///
    /// ## Returns
    /// The pass counters, or the first error hit while drawing.
    pub fn draw(
        &mut self,
        device: &dyn GraphicsDevice,
        camera: &Camera,
        transforms: &TransformArena,
    ) -> Result<BatchStats, RenderError> {
        let mut sprites = mem::take(&mut self.sprites);
        let mut texts = mem::take(&mut self.texts);
        if sprites.is_empty() && texts.is_empty() {
            return Ok(BatchStats::default());
        }

        let blend_was_enabled = device.is_capability_enabled(Capability::Blend);
        let depth_was_enabled = device.is_capability_enabled(Capability::DepthTest);
        device.set_capability(Capability::Blend, true);
        device.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        device.set_capability(Capability::DepthTest, false);

        let drawables = sprites
            .iter()
            .map(|&sprite| Drawable::Sprite(sprite))
            .chain(texts.iter().map(|&text| Drawable::Text(text)));
        let result = self.flush(device, camera, transforms, drawables);

        device.bind_vertex_array(None);
        device.set_capability(Capability::Blend, blend_was_enabled);
        device.set_capability(Capability::DepthTest, depth_was_enabled);

        sprites.clear();
        texts.clear();
        self.sprites = sprites;
        self.texts = texts;

        if let Err(e) = &result {
            log::error!("Sprite batch draw failed: {e}");
        }
        result
    }

    fn flush<'d>(
        &mut self,
        device: &dyn GraphicsDevice,
        camera: &Camera,
        transforms: &TransformArena,
        drawables: impl Iterator<Item = Drawable<'d>>,
    ) -> Result<BatchStats, RenderError> {
        self.shader.bind(device)?;
        self.shader.set_uniform(device, TEXTURE_UNIFORM, 0i32)?;

        let view_projection = camera.view_projection();
        let frustum = self.frustum_culling.then(|| camera.frustum());

        let mut stats = BatchStats::default();
        let mut bound_texture: Option<TextureId> = None;
        let mut current_tint: Option<LinearRgba> = None;
        let mut current_mvp: Option<Mat4> = None;

        for drawable in drawables {
            let mesh_slot = drawable.mesh();
            let data = mesh_slot.data();
            if data.is_empty() {
                continue;
            }

            let world = drawable.transform().world_matrix(transforms)?;
            if let Some(frustum) = &frustum {
                let (center, radius) = data.bounding_sphere();
                if !frustum.intersects_sphere(world.transform_point(center), radius * max_scale(&world))
                {
                    stats.culled += 1;
                    continue;
                }
            }

            let texture = drawable.texture().id()?;
            if bound_texture != Some(texture) {
                device.bind_texture(0, Some(texture));
                bound_texture = Some(texture);
                stats.texture_binds += 1;
            }

            let tint = drawable.tint();
            if current_tint != Some(tint) {
                self.shader.set_uniform(device, TINT_UNIFORM, tint)?;
                current_tint = Some(tint);
                stats.tint_updates += 1;
            }

            let mvp = world * view_projection;
            if current_mvp != Some(mvp) {
                self.shader.set_uniform(device, MVP_UNIFORM, mvp)?;
                current_mvp = Some(mvp);
                stats.mvp_updates += 1;
            }

            let mesh = mesh_slot.gpu(device, &self.sender)?;
            device.bind_vertex_array(Some(mesh.vertex_array()));
            device.draw_indexed(mesh.index_count());
            stats.draw_calls += 1;
        }

        log::trace!("Sprite batch flushed: {stats:?}");
        Ok(stats)
    }

    /// Schedules the sprite shader for deletion.
    pub fn dispose(&mut self) {
        self.clear();
        self.shader.dispose();
    }
}

/// The largest axis scale of an affine matrix.
fn max_scale(m: &Mat4) -> f32 {
    (0..3)
        .map(|i| m.rows[i].truncate().length())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewOrigin;
    use crate::math::Vec3;
    use crate::renderer::cleanup::CleanupQueue;
    use crate::renderer::headless::{DeviceCall, RecordingDevice};
    use crate::renderer::api::UniformValue;
    use crate::renderer::texture::TextureOptions;
    use approx::assert_abs_diff_eq;

    fn texture(queue: &CleanupQueue, device: &RecordingDevice) -> Arc<Texture> {
        Arc::new(
            Texture::from_pixels(
                device,
                queue.sender(),
                1,
                1,
                &[255; 4],
                TextureOptions::default(),
            )
            .unwrap(),
        )
    }

    fn camera() -> Camera {
        Camera::orthographic(800.0, 600.0, -1.0, 1.0, ViewOrigin::TopLeft).unwrap()
    }

    #[test]
    fn empty_draw_touches_nothing() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();
        device.clear_calls();

        let stats = batch.draw(&device, &camera(), &TransformArena::new()).unwrap();
        assert_eq!(stats, BatchStats::default());
        assert!(device.calls().is_empty());
        batch.dispose();
    }

    #[test]
    fn state_is_restored_after_draw() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let tex = texture(&queue, &device);
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();
        device.set_capability(Capability::DepthTest, true);

        let sprite = Sprite::new(tex.clone());
        batch.add(&sprite);
        batch.draw(&device, &camera(), &TransformArena::new()).unwrap();

        assert!(!device.is_capability_enabled(Capability::Blend));
        assert!(device.is_capability_enabled(Capability::DepthTest));
        assert!(batch.is_empty());
        batch.dispose();
        tex.dispose();
    }

    #[test]
    fn repeated_tint_and_transform_are_not_reuploaded() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let tex = texture(&queue, &device);
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();

        let a = Sprite::new(tex.clone());
        let mut b = Sprite::new(tex.clone());
        batch.add(&a);
        batch.add(&a);
        b.transform_mut().set_position(Vec3::new(10.0, 0.0, 0.0));
        b.set_tint(LinearRgba::RED);
        batch.add(&b);

        let stats = batch.draw(&device, &camera(), &TransformArena::new()).unwrap();
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.texture_binds, 1);
        assert_eq!(stats.tint_updates, 2);
        assert_eq!(stats.mvp_updates, 2);
        assert_eq!(device.count_calls(|c| matches!(c, DeviceCall::DrawIndexed(6))), 3);
        batch.dispose();
        tex.dispose();
    }

    #[test]
    fn frustum_culling_skips_offscreen_sprites() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let tex = texture(&queue, &device);
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();
        batch.set_frustum_culling(true);

        let visible = Sprite::with_size(tex.clone(), crate::math::Vec2::new(10.0, 10.0));
        let mut hidden = visible.clone();
        hidden
            .transform_mut()
            .set_position(Vec3::new(5000.0, 5000.0, 0.0));
        batch.add(&visible);
        batch.add(&hidden);

        let stats = batch.draw(&device, &camera(), &TransformArena::new()).unwrap();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.culled, 1);
        batch.dispose();
        tex.dispose();
    }

    #[test]
    fn disposed_texture_fails_the_pass_and_clears_the_queue() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let tex = texture(&queue, &device);
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();

        let sprite = Sprite::new(tex.clone());
        batch.add(&sprite);
        tex.dispose();
        let result = batch.draw(&device, &camera(), &TransformArena::new());
        assert!(matches!(result, Err(RenderError::ResourceError(_))));
        assert!(batch.is_empty());
        assert!(!device.is_capability_enabled(Capability::Blend));
        batch.dispose();
    }

    fn uploaded_matrices(device: &RecordingDevice) -> Vec<Mat4> {
        device
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DeviceCall::SetUniform {
                    value: UniformValue::Mat4(m),
                    ..
                } => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn recycled_batch_draws_the_sprite_as_it_is_now() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let tex = texture(&queue, &device);
        let camera = camera();
        let mut sprite = Sprite::new(tex.clone());
        let mut batch = SpriteBatch::new(&device, queue.sender()).unwrap();

        batch.add(&sprite);
        device.clear_calls();
        batch.draw(&device, &camera, &TransformArena::new()).unwrap();
        assert_eq!(uploaded_matrices(&device), vec![camera.view_projection()]);

        let mut batch = batch.recycle();
        sprite.transform_mut().set_position(Vec3::new(100.0, 0.0, 0.0));
        batch.add(&sprite);
        device.clear_calls();
        batch.draw(&device, &camera, &TransformArena::new()).unwrap();

        let expected = sprite.transform().local_matrix() * camera.view_projection();
        assert_eq!(uploaded_matrices(&device), vec![expected]);
        assert_abs_diff_eq!(expected.rows[3].x, -0.75, epsilon = 1e-6);
        batch.dispose();
        tex.dispose();
    }
}
