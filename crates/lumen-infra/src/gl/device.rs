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

//! The [`GraphicsDevice`] implementation over a `glow` OpenGL context.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;

use glow::HasContext;
use lumen_core::math::LinearRgba;
use lumen_core::renderer::api::*;
use lumen_core::renderer::{GraphicsDevice, ResourceError, ShaderError, ShaderStage};

use super::conversions::{filter_pair, framebuffer_status_name, GlTextureFormat, IntoGl};

/// An OpenGL 3.3 core device.
///
/// Every method issues GL calls on the wrapped context, so the device must only
/// be used on the thread where that context is current. The device keeps the
/// set of objects it created and refuses to delete anything else.
pub struct GlowDevice {
    gl: glow::Context,
    live: RefCell<HashSet<GpuResource>>,
}

impl fmt::Debug for GlowDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDevice")
            .field("live_objects", &self.live.borrow().len())
            .finish_non_exhaustive()
    }
}

fn stage_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn native_vertex_array(id: VertexArrayId) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id.0).map(glow::NativeVertexArray)
}

fn native_buffer(id: BufferId) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id.0).map(glow::NativeBuffer)
}

fn native_texture(id: TextureId) -> Option<glow::NativeTexture> {
    NonZeroU32::new(id.0).map(glow::NativeTexture)
}

fn native_framebuffer(id: FramebufferId) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(id.0).map(glow::NativeFramebuffer)
}

fn native_program(id: ProgramId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id.0).map(glow::NativeProgram)
}

impl GlowDevice {
    /// Wraps a context that is current on the calling thread.
    pub fn new(gl: glow::Context) -> Self {
        log::info!("GlowDevice: created on OpenGL {:?}", gl.version());
        Self {
            gl,
            live: RefCell::new(HashSet::new()),
        }
    }

    /// Loads the GL function pointers and wraps the resulting context.
    ///
    /// # Safety
    /// A context must be current on the calling thread and `loader` must return
    /// valid function pointers for it.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }

    /// The raw `glow` context, for hosts that issue their own GL calls.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// The number of objects created through this device and not yet deleted.
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    fn track(&self, resource: GpuResource) {
        log::debug!("GlowDevice: created {} {resource:?}", resource.kind());
        self.live.borrow_mut().insert(resource);
    }

    fn untrack(&self, resource: GpuResource) -> Result<(), ResourceError> {
        if !self.live.borrow_mut().remove(&resource) {
            return Err(ResourceError::InvalidHandle {
                kind: resource.kind(),
            });
        }
        log::debug!("GlowDevice: deleted {} {resource:?}", resource.kind());
        Ok(())
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<glow::NativeShader, ShaderError> {
        let gl = &self.gl;
        unsafe {
            let shader =
                gl.create_shader(stage_kind(stage))
                    .map_err(|log| ShaderError::CompilationFailed { stage, log })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                Err(ShaderError::CompilationFailed { stage, log })
            }
        }
    }
}

impl GraphicsDevice for GlowDevice {
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        let native = unsafe { self.gl.create_vertex_array() }.map_err(|details| {
            ResourceError::CreationFailed {
                kind: "vertex array",
                details,
            }
        })?;
        let id = VertexArrayId(native.0.get());
        self.track(id.into());
        Ok(id)
    }

    fn bind_vertex_array(&self, id: Option<VertexArrayId>) {
        unsafe { self.gl.bind_vertex_array(id.and_then(native_vertex_array)) };
    }

    fn delete_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.untrack(id.into())?;
        if let Some(native) = native_vertex_array(id) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
        Ok(())
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId, ResourceError> {
        let target = target.into_gl();
        let native = unsafe { self.gl.create_buffer() }.map_err(|details| {
            ResourceError::CreationFailed {
                kind: "buffer",
                details,
            }
        })?;
        unsafe {
            self.gl.bind_buffer(target, Some(native));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
        }
        let id = BufferId(native.0.get());
        self.track(id.into());
        Ok(id)
    }

    fn delete_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.untrack(id.into())?;
        if let Some(native) = native_buffer(id) {
            unsafe { self.gl.delete_buffer(native) };
        }
        Ok(())
    }

    fn set_vertex_attribute(&self, attribute: &VertexAttribute) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components as i32,
                glow::FLOAT,
                false,
                attribute.stride as i32,
                attribute.offset as i32,
            );
            self.gl.enable_vertex_attrib_array(attribute.location);
        }
    }

    fn create_texture(
        &self,
        descriptor: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        if let Some(pixels) = pixels {
            if pixels.len() != descriptor.byte_len() {
                return Err(ResourceError::CreationFailed {
                    kind: "texture",
                    details: format!(
                        "expected {} bytes of pixel data, got {}",
                        descriptor.byte_len(),
                        pixels.len()
                    ),
                });
            }
        }

        let native = unsafe { self.gl.create_texture() }.map_err(|details| {
            ResourceError::CreationFailed {
                kind: "texture",
                details,
            }
        })?;
        let format: GlTextureFormat = descriptor.format.into_gl();
        let (min_filter, mag_filter) = filter_pair(descriptor.filter, descriptor.mipmaps);
        unsafe {
            let gl = &self.gl;
            gl.bind_texture(glow::TEXTURE_2D, Some(native));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.internal as i32,
                descriptor.width as i32,
                descriptor.height as i32,
                0,
                format.format,
                format.ty,
                glow::PixelUnpackData::Slice(pixels),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, mag_filter as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        let id = TextureId(native.0.get());
        self.track(id.into());
        Ok(id)
    }

    fn bind_texture(&self, unit: u32, id: Option<TextureId>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, id.and_then(native_texture));
        }
    }

    fn generate_mipmap(&self, id: TextureId) {
        let Some(native) = native_texture(id) else {
            return;
        };
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(native));
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    fn delete_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.untrack(id.into())?;
        if let Some(native) = native_texture(id) {
            unsafe { self.gl.delete_texture(native) };
        }
        Ok(())
    }

    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError> {
        let native = unsafe { self.gl.create_framebuffer() }.map_err(|details| {
            ResourceError::CreationFailed {
                kind: "framebuffer",
                details,
            }
        })?;
        let id = FramebufferId(native.0.get());
        self.track(id.into());
        Ok(id)
    }

    fn bind_framebuffer(&self, id: Option<FramebufferId>) {
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, id.and_then(native_framebuffer))
        };
    }

    fn attach_texture(&self, attachment: FramebufferAttachment, texture: TextureId) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment.into_gl(),
                glow::TEXTURE_2D,
                native_texture(texture),
                0,
            );
        }
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        if status == glow::FRAMEBUFFER_COMPLETE {
            FramebufferStatus::Complete
        } else {
            FramebufferStatus::Incomplete(framebuffer_status_name(status).to_string())
        }
    }

    fn draw_buffers(&self, count: u32) {
        unsafe {
            if count == 0 {
                self.gl.draw_buffer(glow::NONE);
                self.gl.read_buffer(glow::NONE);
            } else {
                let buffers: Vec<u32> = (0..count).map(|i| glow::COLOR_ATTACHMENT0 + i).collect();
                self.gl.draw_buffers(&buffers);
            }
        }
    }

    fn delete_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        self.untrack(id.into())?;
        if let Some(native) = native_framebuffer(id) {
            unsafe { self.gl.delete_framebuffer(native) };
        }
        Ok(())
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn clear_color(&self, color: LinearRgba) {
        unsafe { self.gl.clear_color(color.r, color.g, color.b, color.a) };
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(mask.into_gl()) };
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        let capability = capability.into_gl();
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }

    fn is_capability_enabled(&self, capability: Capability) -> bool {
        unsafe { self.gl.is_enabled(capability.into_gl()) }
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.blend_func(src.into_gl(), dst.into_gl()) };
    }

    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, vertex_source)?;
        let fragment = match self.compile_stage(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(e) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        let gl = &self.gl;
        let linked = unsafe {
            match gl.create_program() {
                Ok(program) => {
                    gl.attach_shader(program, vertex);
                    gl.attach_shader(program, fragment);
                    gl.link_program(program);
                    gl.detach_shader(program, vertex);
                    gl.detach_shader(program, fragment);
                    if gl.get_program_link_status(program) {
                        Ok(program)
                    } else {
                        let log = gl.get_program_info_log(program);
                        gl.delete_program(program);
                        Err(ShaderError::LinkFailed { log })
                    }
                }
                Err(log) => Err(ShaderError::LinkFailed { log }),
            }
        };
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }

        let id = ProgramId(linked?.0.get());
        self.track(id.into());
        Ok(id)
    }

    fn use_program(&self, id: Option<ProgramId>) {
        unsafe { self.gl.use_program(id.and_then(native_program)) };
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let native = native_program(program)?;
        unsafe { self.gl.get_uniform_location(native, name) }.map(|loc| UniformLocation(loc.0))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match *value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                // Row-major storage read as column-major is the transpose GLSL's
                // `M * v` needs for row-vector matrices.
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(location, false, &m.to_array())
                }
            }
        }
    }

    fn delete_program(&self, id: ProgramId) -> Result<(), ResourceError> {
        self.untrack(id.into())?;
        if let Some(native) = native_program(id) {
            unsafe { self.gl.delete_program(native) };
        }
        Ok(())
    }

    fn draw_indexed(&self, index_count: u32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0)
        };
    }
}
