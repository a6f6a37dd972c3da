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

//! A headless [`GraphicsDevice`] that records every call.
//!
//! [`RecordingDevice`] hands out fresh handles, tracks which objects are alive
//! and keeps the full call log. It has no GPU behind it, so it is what the
//! test suites render against, and it lets a host run the frame loop without
//! a window.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::math::LinearRgba;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError, ShaderStage};
use crate::renderer::traits::GraphicsDevice;

/// One call made on a [`RecordingDevice`].
///
/// Queries (`framebuffer_status`, `is_capability_enabled`, `uniform_location`)
/// are not recorded.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCall {
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer {
        id: BufferId,
        target: BufferTarget,
        size: usize,
    },
    DeleteBuffer(BufferId),
    SetVertexAttribute(VertexAttribute),
    CreateTexture {
        id: TextureId,
        descriptor: TextureDescriptor,
    },
    BindTexture {
        unit: u32,
        id: Option<TextureId>,
    },
    GenerateMipmap(TextureId),
    DeleteTexture(TextureId),
    CreateFramebuffer(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    AttachTexture {
        attachment: FramebufferAttachment,
        texture: TextureId,
    },
    DrawBuffers(u32),
    DeleteFramebuffer(FramebufferId),
    Viewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    ClearColor(LinearRgba),
    Clear(ClearMask),
    SetCapability {
        capability: Capability,
        enabled: bool,
    },
    BlendFunc {
        src: BlendFactor,
        dst: BlendFactor,
    },
    CreateProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    SetUniform {
        location: UniformLocation,
        value: UniformValue,
    },
    DeleteProgram(ProgramId),
    DrawIndexed(u32),
}

impl DeviceCall {
    /// Returns `true` for the calls that delete a native object.
    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            DeviceCall::DeleteVertexArray(_)
                | DeviceCall::DeleteBuffer(_)
                | DeviceCall::DeleteTexture(_)
                | DeviceCall::DeleteFramebuffer(_)
                | DeviceCall::DeleteProgram(_)
        )
    }
}

#[derive(Debug, Default)]
struct DeviceState {
    next_id: u32,
    live: HashSet<GpuResource>,
    calls: Vec<DeviceCall>,
    capabilities: HashSet<Capability>,
    bound_framebuffer: Option<FramebufferId>,
    attachments: HashMap<FramebufferId, Vec<(FramebufferAttachment, TextureId)>>,
    uniforms: HashMap<ProgramId, Vec<String>>,
    force_incomplete: bool,
}

impl DeviceState {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn delete(&mut self, resource: GpuResource, call: DeviceCall) -> Result<(), ResourceError> {
        if !self.live.remove(&resource) {
            return Err(ResourceError::InvalidHandle {
                kind: resource.kind(),
            });
        }
        self.calls.push(call);
        Ok(())
    }
}

/// A [`GraphicsDevice`] without a GPU.
///
/// Clones share the same state, so a test can keep a handle on a device it
/// has boxed into a frame loop.
#[derive(Debug, Default, Clone)]
pub struct RecordingDevice {
    state: Rc<RefCell<DeviceState>>,
}

impl RecordingDevice {
    /// Creates a device with no live objects and an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the call log, oldest first.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.borrow().calls.clone()
    }

    /// Empties the call log. Live objects are kept.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Counts the logged calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    /// The number of objects created and not yet deleted.
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Returns `true` if `resource` was created and not yet deleted.
    pub fn is_live(&self, resource: GpuResource) -> bool {
        self.state.borrow().live.contains(&resource)
    }

    /// Makes every subsequent completeness check report an incomplete framebuffer.
    pub fn set_force_incomplete(&self, incomplete: bool) {
        self.state.borrow_mut().force_incomplete = incomplete;
    }
}

/// Collects the names declared by `uniform <type> <name>;` lines.
fn parse_uniform_names(source: &str, names: &mut Vec<String>) {
    for line in source.lines() {
        let mut words = line.split_whitespace();
        if words.next() != Some("uniform") {
            continue;
        }
        let (Some(_ty), Some(name)) = (words.next(), words.next()) else {
            continue;
        };
        let name = name.trim_end_matches(';');
        let name = name.split('[').next().unwrap_or(name);
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        let mut state = self.state.borrow_mut();
        let id = VertexArrayId(state.allocate());
        state.live.insert(id.into());
        state.calls.push(DeviceCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, id: Option<VertexArrayId>) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::BindVertexArray(id));
    }

    fn delete_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.state
            .borrow_mut()
            .delete(id.into(), DeviceCall::DeleteVertexArray(id))
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId, ResourceError> {
        let mut state = self.state.borrow_mut();
        let id = BufferId(state.allocate());
        state.live.insert(id.into());
        state.calls.push(DeviceCall::CreateBuffer {
            id,
            target,
            size: data.len(),
        });
        Ok(id)
    }

    fn delete_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.state
            .borrow_mut()
            .delete(id.into(), DeviceCall::DeleteBuffer(id))
    }

    fn set_vertex_attribute(&self, attribute: &VertexAttribute) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::SetVertexAttribute(*attribute));
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
        let mut state = self.state.borrow_mut();
        let id = TextureId(state.allocate());
        state.live.insert(id.into());
        state.calls.push(DeviceCall::CreateTexture {
            id,
            descriptor: *descriptor,
        });
        Ok(id)
    }

    fn bind_texture(&self, unit: u32, id: Option<TextureId>) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::BindTexture { unit, id });
    }

    fn generate_mipmap(&self, id: TextureId) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::GenerateMipmap(id));
    }

    fn delete_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.state
            .borrow_mut()
            .delete(id.into(), DeviceCall::DeleteTexture(id))
    }

    fn create_framebuffer(&self) -> Result<FramebufferId, ResourceError> {
        let mut state = self.state.borrow_mut();
        let id = FramebufferId(state.allocate());
        state.live.insert(id.into());
        state.attachments.insert(id, Vec::new());
        state.calls.push(DeviceCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn bind_framebuffer(&self, id: Option<FramebufferId>) {
        let mut state = self.state.borrow_mut();
        state.bound_framebuffer = id;
        state.calls.push(DeviceCall::BindFramebuffer(id));
    }

    fn attach_texture(&self, attachment: FramebufferAttachment, texture: TextureId) {
        let mut state = self.state.borrow_mut();
        if let Some(fb) = state.bound_framebuffer {
            if let Some(list) = state.attachments.get_mut(&fb) {
                list.retain(|(slot, _)| *slot != attachment);
                list.push((attachment, texture));
            }
        }
        state
            .calls
            .push(DeviceCall::AttachTexture { attachment, texture });
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        let state = self.state.borrow();
        let Some(fb) = state.bound_framebuffer else {
            return FramebufferStatus::Complete;
        };
        if state.force_incomplete {
            return FramebufferStatus::Incomplete("forced incomplete".to_string());
        }
        match state.attachments.get(&fb) {
            None => FramebufferStatus::Incomplete("framebuffer is not live".to_string()),
            Some(list) if list.is_empty() => {
                FramebufferStatus::Incomplete("missing attachment".to_string())
            }
            Some(list) => {
                if list
                    .iter()
                    .all(|(_, tex)| state.live.contains(&GpuResource::Texture(*tex)))
                {
                    FramebufferStatus::Complete
                } else {
                    FramebufferStatus::Incomplete("incomplete attachment".to_string())
                }
            }
        }
    }

    fn draw_buffers(&self, count: u32) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::DrawBuffers(count));
    }

    fn delete_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        let mut state = self.state.borrow_mut();
        state.delete(id.into(), DeviceCall::DeleteFramebuffer(id))?;
        state.attachments.remove(&id);
        if state.bound_framebuffer == Some(id) {
            state.bound_framebuffer = None;
        }
        Ok(())
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.state.borrow_mut().calls.push(DeviceCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, color: LinearRgba) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::ClearColor(color));
    }

    fn clear(&self, mask: ClearMask) {
        self.state.borrow_mut().calls.push(DeviceCall::Clear(mask));
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.capabilities.insert(capability);
        } else {
            state.capabilities.remove(&capability);
        }
        state.calls.push(DeviceCall::SetCapability {
            capability,
            enabled,
        });
    }

    fn is_capability_enabled(&self, capability: Capability) -> bool {
        self.state.borrow().capabilities.contains(&capability)
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::BlendFunc { src, dst });
    }

    fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderError> {
        for (stage, source) in [
            (ShaderStage::Vertex, vertex_source),
            (ShaderStage::Fragment, fragment_source),
        ] {
            if let Some(line) = source.lines().position(|l| l.trim_start().starts_with("#error")) {
                return Err(ShaderError::CompilationFailed {
                    stage,
                    log: format!("0:{}: #error directive", line + 1),
                });
            }
        }
        if !vertex_source.contains("main") || !fragment_source.contains("main") {
            return Err(ShaderError::LinkFailed {
                log: "missing entry point 'main'".to_string(),
            });
        }

        let mut names = Vec::new();
        parse_uniform_names(vertex_source, &mut names);
        parse_uniform_names(fragment_source, &mut names);

        let mut state = self.state.borrow_mut();
        let id = ProgramId(state.allocate());
        state.live.insert(id.into());
        state.uniforms.insert(id, names);
        state.calls.push(DeviceCall::CreateProgram(id));
        Ok(id)
    }

    fn use_program(&self, id: Option<ProgramId>) {
        self.state.borrow_mut().calls.push(DeviceCall::UseProgram(id));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.state
            .borrow()
            .uniforms
            .get(&program)?
            .iter()
            .position(|n| n == name)
            .map(|index| UniformLocation(index as u32))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.state.borrow_mut().calls.push(DeviceCall::SetUniform {
            location,
            value: *value,
        });
    }

    fn delete_program(&self, id: ProgramId) -> Result<(), ResourceError> {
        let mut state = self.state.borrow_mut();
        state.delete(id.into(), DeviceCall::DeleteProgram(id))?;
        state.uniforms.remove(&id);
        Ok(())
    }

    fn draw_indexed(&self, index_count: u32) {
        self.state
            .borrow_mut()
            .calls
            .push(DeviceCall::DrawIndexed(index_count));
    }
}
