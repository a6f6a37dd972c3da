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

//! The backend-agnostic rendering layer of Lumen.
//!
//! This module holds the GL-style [`GraphicsDevice`] contract together with
//! everything built on top of it: owned textures and shader programs,
//! off-screen framebuffers, the sprite/text batch and bitmap fonts.
//!
//! Native objects are only ever deleted on the context thread. Every wrapper
//! that owns one holds a [`CleanupSender`] and hands its handles to the
//! [`CleanupQueue`] when it is disposed or dropped; the frame loop drains the
//! queue once per frame. The concrete OpenGL device lives in `lumen-infra`.

pub mod api;
pub mod batch;
pub mod cleanup;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod headless;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::batch::{BatchStats, Sprite, SpriteBatch, Text, TextAlignment};
pub use self::cleanup::{CleanupQueue, CleanupSender};
pub use self::error::{RenderError, ResourceError, ShaderError, ShaderStage};
pub use self::font::{BitmapFont, BitmapFontRegion, FontDescription, GlyphDescription};
pub use self::framebuffer::{Attachment, Framebuffer, FramebufferDescriptor, FramebufferState};
pub use self::headless::{DeviceCall, RecordingDevice};
pub use self::shader::ShaderProgram;
pub use self::texture::{Texture, TextureOptions, TextureRegion};
pub use self::traits::GraphicsDevice;
