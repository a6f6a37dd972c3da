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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::math::MathError;
use crate::scene::SceneError;
use std::fmt;
use std::thread::ThreadId;

/// The programmable stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex stage.
    Vertex,
    /// The fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// An error related to compiling, linking or feeding a shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    CompilationFailed {
        /// The stage that failed.
        stage: ShaderStage,
        /// The compiler's info log.
        log: String,
    },
    /// The compiled stages failed to link into a program.
    LinkFailed {
        /// The linker's info log.
        log: String,
    },
    /// The program has no active uniform with this name.
    UniformNotFound {
        /// The requested uniform name.
        name: String,
    },
    /// The program was used after `dispose`.
    ProgramDisposed,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "Shader compilation failed for {stage} stage: {log}")
            }
            ShaderError::LinkFailed { log } => write!(f, "Shader program link failed: {log}"),
            ShaderError::UniformNotFound { name } => {
                write!(f, "Uniform '{name}' not found in shader program")
            }
            ShaderError::ProgramDisposed => write!(f, "Shader program has been disposed"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// The backend refused to create a resource, or its inputs were invalid.
    CreationFailed {
        /// The kind of resource, e.g. `"texture"`.
        kind: &'static str,
        /// What went wrong.
        details: String,
    },
    /// The handle does not name a live resource (never created, or already disposed).
    InvalidHandle {
        /// The kind of resource, e.g. `"framebuffer"`.
        kind: &'static str,
    },
    /// A generic resource could not be found.
    NotFound,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::CreationFailed { kind, details } => {
                write!(f, "Failed to create {kind}: {details}")
            }
            ResourceError::InvalidHandle { kind } => {
                write!(f, "Invalid or disposed {kind} handle.")
            }
            ResourceError::NotFound => write!(f, "Resource not found."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error raised by a rendering pass or by the cleanup queue.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// A matrix could not be built or inverted.
    Math(MathError),
    /// A drawable's transform could not be resolved.
    Scene(SceneError),
    /// A context-bound operation was called from a thread that does not own
    /// the graphics context.
    WrongThread {
        /// The thread that owns the context.
        owner: ThreadId,
        /// The thread that made the call.
        caller: ThreadId,
    },
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Math(err) => write!(f, "Math error during rendering: {err}"),
            RenderError::Scene(err) => write!(f, "Scene error during rendering: {err}"),
            RenderError::WrongThread { owner, caller } => write!(
                f,
                "Graphics context owned by {owner:?} was used from {caller:?}"
            ),
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::Math(err) => Some(err),
            RenderError::Scene(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

impl From<MathError> for RenderError {
    fn from(err: MathError) -> Self {
        RenderError::Math(err)
    }
}

impl From<SceneError> for RenderError {
    fn from(err: SceneError) -> Self {
        RenderError::Scene(err)
    }
}
