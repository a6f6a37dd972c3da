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

//! The frame loop driver.
//!
//! The host owns the window and the event loop. It builds a [`GameLoop`] on
//! the thread where the graphics context is current, forwards window events
//! through [`GameLoop::event_sender`] and calls [`GameLoop::tick`] once per
//! frame. Each tick runs the [`Application`]'s update and render phases, in
//! that order and on that thread, then drains the GPU cleanup queue.

mod clock;
mod event;
mod game_loop;

pub use self::clock::{FrameClock, FrameTime};
pub use self::event::{EventBus, LoopEvent};
pub use self::game_loop::{GameLoop, LoopStatus, RenderContext};

use crate::config::RenderSettings;
use crate::renderer::{CleanupSender, GraphicsDevice};

/// What the application sees during one phase of a frame.
pub struct FrameContext<'a> {
    /// The device to draw with.
    pub graphics_device: &'a dyn GraphicsDevice,
    /// Hand this to wrappers that own GPU objects.
    pub cleanup: &'a CleanupSender,
    /// Timing of the current frame.
    pub time: FrameTime,
    /// Size of the drawable surface, `(0, 0)` until the host reports one.
    pub viewport: (u32, u32),
    /// The loop's settings.
    pub settings: &'a RenderSettings,
    exit_requested: bool,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        graphics_device: &'a dyn GraphicsDevice,
        cleanup: &'a CleanupSender,
        time: FrameTime,
        viewport: (u32, u32),
        settings: &'a RenderSettings,
    ) -> Self {
        Self {
            graphics_device,
            cleanup,
            time,
            viewport,
            settings,
            exit_requested: false,
        }
    }

    /// Asks the loop to stop after this frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Whether [`FrameContext::request_exit`] was called this frame.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// User code driven by a [`GameLoop`].
pub trait Application {
    /// Called every frame before [`Application::render`], for game logic.
    fn update(&mut self, context: &mut FrameContext<'_>);

    /// Called every frame after [`Application::update`], to issue draw calls.
    fn render(&mut self, context: &mut FrameContext<'_>) -> anyhow::Result<()>;

    /// Called for every host event, before the frame's update.
    fn on_event(&mut self, _event: &LoopEvent) {}
}
