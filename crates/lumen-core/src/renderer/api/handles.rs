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

//! Opaque handles to native GPU objects.
//!
//! Each handle wraps the backend's object name. Zero is never a valid name.

/// An opaque handle to a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayId(pub u32);

/// An opaque handle to a vertex or index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// An opaque handle to a 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// An opaque handle to a framebuffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramebufferId(pub u32);

/// An opaque handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// The location of a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// A GPU object awaiting deletion on the context thread.
///
/// Wrappers push one of these onto the cleanup queue when they are disposed
/// or dropped. The queue drain issues the matching native delete exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    /// A vertex array object.
    VertexArray(VertexArrayId),
    /// A vertex or index buffer.
    Buffer(BufferId),
    /// A texture.
    Texture(TextureId),
    /// A framebuffer object.
    Framebuffer(FramebufferId),
    /// A shader program.
    Program(ProgramId),
}

impl GpuResource {
    /// A short name for the kind of object, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GpuResource::VertexArray(_) => "vertex array",
            GpuResource::Buffer(_) => "buffer",
            GpuResource::Texture(_) => "texture",
            GpuResource::Framebuffer(_) => "framebuffer",
            GpuResource::Program(_) => "program",
        }
    }
}

impl From<VertexArrayId> for GpuResource {
    fn from(id: VertexArrayId) -> Self {
        GpuResource::VertexArray(id)
    }
}

impl From<BufferId> for GpuResource {
    fn from(id: BufferId) -> Self {
        GpuResource::Buffer(id)
    }
}

impl From<TextureId> for GpuResource {
    fn from(id: TextureId) -> Self {
        GpuResource::Texture(id)
    }
}

impl From<FramebufferId> for GpuResource {
    fn from(id: FramebufferId) -> Self {
        GpuResource::Framebuffer(id)
    }
}

impl From<ProgramId> for GpuResource {
    fn from(id: ProgramId) -> Self {
        GpuResource::Program(id)
    }
}
