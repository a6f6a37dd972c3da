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

use crate::math::LinearRgba;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use std::fmt::Debug;

/// The OpenGL-style immediate-mode device every renderer component talks to.
///
/// All methods take `&self`: a device wraps a single graphics context whose
/// state is mutated by the calls themselves. The trait is deliberately not
/// `Send`/`Sync` since a context is current on exactly one thread; other
/// threads hand work back through the
/// [`CleanupQueue`](crate::renderer::CleanupQueue) instead.
///
/// Calls act on whatever object is currently bound, as in OpenGL: buffer
/// uploads go to the bound vertex array, `attach_texture` targets the bound
/// framebuffer, `set_uniform` targets the program in use.
pub trait GraphicsDevice: Debug {
    // --- Vertex arrays and buffers ---

    /// Creates a vertex array object.
    /// ## Returns
    /// The handle of the new vertex array, or an error if the backend refused.
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError>;

    /// Binds a vertex array, or unbinds with `None`.
    fn bind_vertex_array(&self, id: Option<VertexArrayId>);

    /// Deletes a vertex array object.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the handle is not live.
    fn delete_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError>;

    /// Creates a buffer, binds it to `target` and uploads `data` as static data.
    /// ## Arguments
    /// * `target` - Whether the buffer holds vertices or indices.
    /// * `data` - The initial contents.
    /// ## Returns
    /// The handle of the new buffer.
    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId, ResourceError>;

    /// Deletes a buffer.
    fn delete_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Declares and enables a float vertex attribute for the bound vertex buffer.
    fn set_vertex_attribute(&self, attribute: &VertexAttribute);

    // --- Textures ---

    /// Creates a 2D texture and optionally fills it.
    /// ## Arguments
    /// * `descriptor` - Size, format and sampling of the texture.
    /// * `pixels` - Tightly packed texels, or `None` to leave the storage uninitialised.
    /// ## Returns
    /// The handle of the new texture.
    fn create_texture(
        &self,
        descriptor: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError>;

    /// Binds a texture to texture unit `unit`, or unbinds with `None`.
    fn bind_texture(&self, unit: u32, id: Option<TextureId>);

    /// Regenerates the mipmap chain of a texture.
    fn generate_mipmap(&self, id: TextureId);

    /// Deletes a texture.
    fn delete_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    // --- Framebuffers ---

    /// Creates a framebuffer object.
    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError>;

    /// Binds a framebuffer for drawing, or the default framebuffer with `None`.
    fn bind_framebuffer(&self, id: Option<FramebufferId>);

    /// Attaches a texture to the bound framebuffer.
    fn attach_texture(&self, attachment: FramebufferAttachment, texture: TextureId);

    /// Checks the completeness of the bound framebuffer.
    fn framebuffer_status(&self) -> FramebufferStatus;

    /// Routes fragment outputs `0..count` to colour attachments `0..count`.
    fn draw_buffers(&self, count: u32);

    /// Deletes a framebuffer object. Attached textures are not deleted.
    fn delete_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError>;

    // --- Fixed-function state ---

    /// Sets the viewport rectangle in pixels.
    fn viewport(&self, x: i32, y: i32, width: u32, height: u32);

    /// Sets the colour used by `clear`.
    fn clear_color(&self, color: LinearRgba);

    /// Clears the buffers selected by `mask` in the bound framebuffer.
    fn clear(&self, mask: ClearMask);

    /// Enables or disables a capability.
    fn set_capability(&self, capability: Capability, enabled: bool);

    /// Returns whether a capability is currently enabled.
    fn is_capability_enabled(&self, capability: Capability) -> bool;

    /// Sets the blend equation factors.
    fn blend_func(&self, src: BlendFactor, dst: BlendFactor);

    // --- Programs ---

    /// Compiles both stages and links them into a program.
    /// ## Arguments
    /// * `vertex_source` - GLSL source of the vertex stage.
    /// * `fragment_source` - GLSL source of the fragment stage.
    /// ## Returns
    /// The linked program, or the compiler/linker log.
    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError>;

    /// Makes a program current, or none with `None`.
    fn use_program(&self, id: Option<ProgramId>);

    /// Looks up an active uniform by name.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Uploads a uniform value to the program currently in use.
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    /// Deletes a program.
    fn delete_program(&self, id: ProgramId) -> Result<(), ResourceError>;

    // --- Drawing ---

    /// Draws `index_count` `u32` indices from the bound vertex array as triangles.
    fn draw_indexed(&self, index_count: u32);

    /// Releases one queued resource with the matching delete call.
    fn release(&self, resource: GpuResource) -> Result<(), ResourceError> {
        match resource {
            GpuResource::VertexArray(id) => self.delete_vertex_array(id),
            GpuResource::Buffer(id) => self.delete_buffer(id),
            GpuResource::Texture(id) => self.delete_texture(id),
            GpuResource::Framebuffer(id) => self.delete_framebuffer(id),
            GpuResource::Program(id) => self.delete_program(id),
        }
    }
}
