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

//! CPU-side quad geometry and its lazily uploaded GPU counterpart.

use std::sync::OnceLock;

use crate::math::{Vec2, Vec3};
use crate::renderer::api::{BufferId, BufferTarget, SpriteVertex, VertexArrayId};
use crate::renderer::cleanup::CleanupSender;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// Indexed geometry built from axis-aligned quads in the XY plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    min: Vec2,
    max: Vec2,
}

impl MeshData {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mesh holding a single quad.
    pub fn quad(min: Vec2, max: Vec2, uv_min: Vec2, uv_max: Vec2) -> Self {
        let mut mesh = Self::new();
        mesh.push_quad(min, max, uv_min, uv_max);
        mesh
    }

    /// Appends a quad spanning `min..max` sampling `uv_min..uv_max`.
    pub fn push_quad(&mut self, min: Vec2, max: Vec2, uv_min: Vec2, uv_max: Vec2) {
        if self.vertices.is_empty() {
            self.min = min;
            self.max = max;
        } else {
            self.min = self.min.min(min);
            self.max = self.max.max(max);
        }

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            SpriteVertex::new(Vec3::new(min.x, min.y, 0.0), uv_min),
            SpriteVertex::new(Vec3::new(max.x, min.y, 0.0), Vec2::new(uv_max.x, uv_min.y)),
            SpriteVertex::new(Vec3::new(max.x, max.y, 0.0), uv_max),
            SpriteVertex::new(Vec3::new(min.x, max.y, 0.0), Vec2::new(uv_min.x, uv_max.y)),
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// The vertices, four per quad.
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// The triangle indices, six per quad.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns `true` if the mesh holds no quads.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The centre and radius of a sphere enclosing every vertex, in model space.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let center = ((self.min + self.max) * 0.5).extend(0.0);
        let radius = (self.max - self.min).length() * 0.5;
        (center, radius)
    }
}

/// Native vertex array, vertex buffer and index buffer of an uploaded mesh.
///
/// Dropping it schedules all three objects for deletion.
#[derive(Debug)]
pub struct GpuMesh {
    vertex_array: VertexArrayId,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    index_count: u32,
    sender: CleanupSender,
}

impl GpuMesh {
    /// Uploads `data` and declares the sprite vertex layout.
    ///
    /// ## Returns
    /// The uploaded mesh. On failure, any object created so far is queued for
    /// release before the error is returned.
    pub fn upload(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        data: &MeshData,
    ) -> Result<Self, ResourceError> {
        let vertex_array = device.create_vertex_array()?;
        device.bind_vertex_array(Some(vertex_array));

        let vertex_buffer =
            match device.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(data.vertices())) {
                Ok(id) => id,
                Err(e) => {
                    device.bind_vertex_array(None);
                    sender.enqueue(vertex_array.into());
                    return Err(e);
                }
            };
        for attribute in SpriteVertex::attributes() {
            device.set_vertex_attribute(&attribute);
        }

        let index_buffer =
            match device.create_buffer(BufferTarget::Index, bytemuck::cast_slice(data.indices())) {
                Ok(id) => id,
                Err(e) => {
                    device.bind_vertex_array(None);
                    sender.enqueue(vertex_buffer.into());
                    sender.enqueue(vertex_array.into());
                    return Err(e);
                }
            };
        device.bind_vertex_array(None);

        log::trace!(
            "Uploaded mesh {vertex_array:?} with {} indices.",
            data.indices().len()
        );
        Ok(Self {
            vertex_array,
            vertex_buffer,
            index_buffer,
            index_count: data.indices().len() as u32,
            sender,
        })
    }

    /// The vertex array to bind before drawing.
    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.sender.enqueue(self.index_buffer.into());
        self.sender.enqueue(self.vertex_buffer.into());
        self.sender.enqueue(self.vertex_array.into());
    }
}

/// Geometry shared between a drawable and the draw commands that reference it.
///
/// The GPU copy is created on first use and released when the last `Arc`
/// to the slot goes away.
#[derive(Debug)]
pub struct MeshSlot {
    data: MeshData,
    gpu: OnceLock<GpuMesh>,
}

impl MeshSlot {
    /// Wraps CPU geometry. Nothing is uploaded yet.
    pub fn new(data: MeshData) -> Self {
        Self {
            data,
            gpu: OnceLock::new(),
        }
    }

    /// The CPU geometry.
    pub fn data(&self) -> &MeshData {
        &self.data
    }

    /// Returns `true` once the geometry lives on the GPU.
    pub fn is_uploaded(&self) -> bool {
        self.gpu.get().is_some()
    }

    /// The GPU copy, uploading it first if needed.
    pub fn gpu(
        &self,
        device: &dyn GraphicsDevice,
        sender: &CleanupSender,
    ) -> Result<&GpuMesh, ResourceError> {
        if let Some(mesh) = self.gpu.get() {
            return Ok(mesh);
        }
        let mesh = GpuMesh::upload(device, sender.clone(), &self.data)?;
        Ok(self.gpu.get_or_init(|| mesh))
    }
}
