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

//! Vertex layout types.

use crate::math::{Vec2, Vec3};

/// The binding point a buffer is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Vertex,
    /// `u32` element indices.
    Index,
}

/// One float attribute of the currently bound vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader attribute location.
    pub location: u32,
    /// Number of `f32` components (1 to 4).
    pub components: u32,
    /// Distance in bytes between two consecutive vertices.
    pub stride: u32,
    /// Offset in bytes of the attribute inside a vertex.
    pub offset: u32,
}

/// The vertex format of sprite and glyph quads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl SpriteVertex {
    /// Creates a vertex.
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            uv: [uv.x, uv.y],
        }
    }

    /// The attribute layout: position at location 0, uv at location 1.
    pub fn attributes() -> [VertexAttribute; 2] {
        let stride = std::mem::size_of::<Self>() as u32;
        [
            VertexAttribute {
                location: 0,
                components: 3,
                stride,
                offset: 0,
            },
            VertexAttribute {
                location: 1,
                components: 2,
                stride,
                offset: 12,
            },
        ]
    }
}
