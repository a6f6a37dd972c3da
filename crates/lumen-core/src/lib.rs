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

//! # Lumen Core
//!
//! Math, scene graph, camera and the OpenGL-style rendering layer of the Lumen
//! renderer, written against the [`GraphicsDevice`](renderer::GraphicsDevice)
//! contract so that every piece can run on a real context or headless.

#![warn(missing_docs)]

pub mod app;
pub mod camera;
pub mod config;
pub mod math;
pub mod renderer;
pub mod scene;

pub use app::{Application, FrameContext, GameLoop, LoopEvent, LoopStatus};
pub use camera::{Camera, Projection, ViewOrigin};
pub use config::RenderSettings;
