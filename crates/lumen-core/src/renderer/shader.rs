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

//! Linked shader programs and the built-in sprite shader.

use std::collections::HashMap;

use crate::renderer::api::{ProgramId, UniformLocation, UniformValue};
use crate::renderer::cleanup::CleanupSender;
use crate::renderer::error::ShaderError;
use crate::renderer::traits::GraphicsDevice;

/// Name of the model-view-projection uniform of the sprite shader.
pub const MVP_UNIFORM: &str = "mvp";
/// Name of the colour multiplier uniform of the sprite shader.
pub const TINT_UNIFORM: &str = "tint";
/// Name of the sampler uniform of the sprite shader.
pub const TEXTURE_UNIFORM: &str = "active_texture";

/// Vertex stage of the sprite shader.
///
/// Matrices are uploaded row-major without transposition, which GLSL reads as
/// the transpose. Multiplying on the left therefore applies the row-vector
/// convention used on the CPU.
pub const SPRITE_VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;

uniform mat4 mvp;

out vec2 v_uv;

void main() {
    v_uv = uv;
    gl_Position = mvp * vec4(position, 1.0);
}
"#;

/// Fragment stage of the sprite shader.
pub const SPRITE_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_uv;

uniform sampler2D active_texture;
uniform vec4 tint;

out vec4 frag_color;

void main() {
    frag_color = texture(active_texture, v_uv) * tint;
}
"#;

/// A linked vertex + fragment program.
#[derive(Debug)]
pub struct ShaderProgram {
    id: Option<ProgramId>,
    uniforms: HashMap<String, UniformLocation>,
    sender: CleanupSender,
}

impl ShaderProgram {
    /// Compiles and links a program.
    ///
    /// ## Arguments
    /// * `device` - The device that will own the program.
    /// * `sender` - Where the handle goes once the program is disposed.
    /// * `vertex_source`, `fragment_source` - GLSL sources.
    ///
    /// ## Returns
    /// The program, or the compile or link diagnostics.
    pub fn compile(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let id = device
            .create_program(vertex_source, fragment_source)
            .inspect_err(|e| log::error!("{e}"))?;
        log::debug!("Linked shader program {id:?}.");
        Ok(Self {
            id: Some(id),
            uniforms: HashMap::new(),
            sender,
        })
    }

    /// Compiles the built-in sprite shader.
    pub fn sprite(device: &dyn GraphicsDevice, sender: CleanupSender) -> Result<Self, ShaderError> {
        Self::compile(device, sender, SPRITE_VERTEX_SHADER, SPRITE_FRAGMENT_SHADER)
    }

    /// The native handle.
    pub fn id(&self) -> Result<ProgramId, ShaderError> {
        self.id.ok_or(ShaderError::ProgramDisposed)
    }

    /// Makes this program current.
    pub fn bind(&self, device: &dyn GraphicsDevice) -> Result<(), ShaderError> {
        device.use_program(Some(self.id()?));
        Ok(())
    }

    /// Resolves a uniform location, caching the answer.
    pub fn uniform_location(
        &mut self,
        device: &dyn GraphicsDevice,
        name: &str,
    ) -> Result<UniformLocation, ShaderError> {
        let id = self.id()?;
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }
        let location = device
            .uniform_location(id, name)
            .ok_or_else(|| ShaderError::UniformNotFound {
                name: name.to_string(),
            })?;
        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }

    /// Uploads a uniform. The program must be bound.
    ///
    /// ## Returns
    /// `ShaderError::UniformNotFound` if the program has no active uniform
    /// called `name`.
    pub fn set_uniform(
        &mut self,
        device: &dyn GraphicsDevice,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaderError> {
        let location = self.uniform_location(device, name)?;
        device.set_uniform(location, &value.into());
        Ok(())
    }

    /// Returns `true` once [`ShaderProgram::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.id.is_none()
    }

    /// Schedules the program for deletion. Further calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(id) = self.id.take() {
            self.uniforms.clear();
            self.sender.enqueue(id.into());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            log::warn!("Shader program {id:?} dropped without dispose.");
            self.dispose();
        }
    }
}
