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

use anyhow::{Context, Result};

use super::{Application, EventBus, FrameClock, FrameContext, LoopEvent};
use crate::config::RenderSettings;
use crate::renderer::{ClearMask, CleanupQueue, CleanupSender, GraphicsDevice};

/// Whether the loop should keep ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// Call [`GameLoop::tick`] again.
    Running,
    /// Stop ticking and call [`GameLoop::shutdown`].
    Exit,
}

/// Everything the loop owns besides the application.
#[derive(Debug)]
pub struct RenderContext {
    /// The device every frame draws with.
    pub graphics_device: Box<dyn GraphicsDevice>,
    /// Deferred deletion of GPU objects, drained once per frame.
    pub cleanup: CleanupQueue,
    /// A sender for `cleanup`, lent to the application each frame.
    pub cleanup_sender: CleanupSender,
    /// Frame timing.
    pub clock: FrameClock,
    /// Host events waiting for the next tick.
    pub events: EventBus<LoopEvent>,
    /// Loop settings.
    pub settings: RenderSettings,
    /// Last reported surface size.
    pub viewport: (u32, u32),
}

impl RenderContext {
    /// Builds the context on the calling thread, which becomes the cleanup
    /// queue's owner.
    pub fn new(graphics_device: Box<dyn GraphicsDevice>, settings: RenderSettings) -> Self {
        let cleanup = CleanupQueue::new();
        let cleanup_sender = cleanup.sender();
        Self {
            graphics_device,
            cleanup,
            cleanup_sender,
            clock: FrameClock::from_settings(&settings),
            events: EventBus::new(),
            settings,
            viewport: (0, 0),
        }
    }
}

/// Drives an [`Application`] one frame at a time.
#[derive(Debug)]
pub struct GameLoop<A: Application> {
    // Dropped before the context so the application's GPU objects reach the
    // cleanup queue while it still exists.
    app: Option<A>,
    context: RenderContext,
    last_fps_log: f64,
}

impl<A: Application> GameLoop<A> {
    /// Creates the render context and then the application.
    ///
    /// ## Arguments
    /// * `graphics_device` - The device, current on the calling thread.
    /// * `settings` - Loop settings.
    /// * `app_factory` - Builds the application with the device and a cleanup sender.
    ///
    /// ## Returns
    /// The loop, or the factory's error.
    pub fn new<F>(
        graphics_device: Box<dyn GraphicsDevice>,
        settings: RenderSettings,
        app_factory: F,
    ) -> Result<Self>
    where
        F: FnOnce(&dyn GraphicsDevice, CleanupSender) -> Result<A>,
    {
        let context = RenderContext::new(graphics_device, settings);
        let app = app_factory(context.graphics_device.as_ref(), context.cleanup.sender())
            .context("Failed to create the application")?;
        log::info!("Game loop initialized.");
        Ok(Self {
            app: Some(app),
            context,
            last_fps_log: 0.0,
        })
    }

    /// A sender the host uses to forward window events.
    pub fn event_sender(&self) -> flume::Sender<LoopEvent> {
        self.context.events.sender()
    }

    /// The render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// The application, until [`GameLoop::shutdown`].
    pub fn app(&self) -> Option<&A> {
        self.app.as_ref()
    }

    /// Mutable access to the application.
    pub fn app_mut(&mut self) -> Option<&mut A> {
        self.app.as_mut()
    }

    /// Runs one frame.
    ///
    /// Pending host events are handled first. A close request ends the frame
    /// right there. Otherwise the clock advances, the application updates,
    /// the default framebuffer is cleared if the settings ask for it, and the
    /// application renders. The cleanup queue is drained exactly once at the
    /// end of every tick, also when rendering fails.
    ///
    /// ## Returns
    /// [`LoopStatus::Exit`] after a close request, after the application
    /// called [`FrameContext::request_exit`], or once the loop is shut down.
    pub fn tick(&mut self) -> Result<LoopStatus> {
        let Some(app) = self.app.as_mut() else {
            return Ok(LoopStatus::Exit);
        };
        let context = &mut self.context;
        let device = context.graphics_device.as_ref();

        let mut status = LoopStatus::Running;
        for event in context.events.drain() {
            match event {
                LoopEvent::Resized { width, height } => {
                    context.viewport = (width, height);
                    if width > 0 && height > 0 {
                        device.viewport(0, 0, width, height);
                    }
                }
                LoopEvent::CloseRequested => {
                    log::info!("Close requested.");
                    status = LoopStatus::Exit;
                }
            }
            app.on_event(&event);
        }

        let mut rendered = Ok(());
        if status == LoopStatus::Running {
            let time = context.clock.tick();
            let interval = context.settings.fps_log_interval as f64;
            if interval > 0.0 && time.elapsed - self.last_fps_log >= interval {
                log::info!("FPS: {:.1} (frame {})", time.fps, time.frame_index);
                self.last_fps_log = time.elapsed;
            }

            let mut frame = FrameContext::new(
                device,
                &context.cleanup_sender,
                time,
                context.viewport,
                &context.settings,
            );
            app.update(&mut frame);

            if context.settings.clear_each_frame {
                device.bind_framebuffer(None);
                device.clear_color(context.settings.clear_color);
                device.clear(ClearMask::COLOR | ClearMask::DEPTH);
            }
            rendered = app.render(&mut frame);

            if frame.exit_requested() {
                status = LoopStatus::Exit;
            }
        }

        context
            .cleanup
            .drain_and_release(device)
            .context("Failed to drain the GPU cleanup queue")?;
        rendered.context("Application render failed")?;
        Ok(status)
    }

    /// Drops the application and releases everything it left in the cleanup queue.
    ///
    /// ## Returns
    /// The number of GPU objects released by the final drain.
    pub fn shutdown(&mut self) -> Result<usize> {
        if self.app.take().is_some() {
            log::info!("Game loop shutting down.");
        }
        let released = self
            .context
            .cleanup
            .drain_and_release(self.context.graphics_device.as_ref())
            .context("Failed to drain the GPU cleanup queue")?;
        log::info!("Game loop shutdown complete ({released} GPU object(s) released).");
        Ok(released)
    }
}

impl<A: Application> Drop for GameLoop<A> {
    fn drop(&mut self) {
        if self.app.is_some() {
            log::info!("GameLoop dropped without shutdown. Performing controlled shutdown...");
            if let Err(e) = self.shutdown() {
                log::error!("{e:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DeviceCall, RecordingDevice};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        exit_after: Option<u64>,
    }

    impl Application for Recorder {
        fn update(&mut self, context: &mut FrameContext<'_>) {
            self.log
                .borrow_mut()
                .push(format!("update {}", context.time.frame_index));
            if self.exit_after == Some(context.time.frame_index) {
                context.request_exit();
            }
        }

        fn render(&mut self, context: &mut FrameContext<'_>) -> Result<()> {
            self.log
                .borrow_mut()
                .push(format!("render {}", context.time.frame_index));
            Ok(())
        }

        fn on_event(&mut self, event: &LoopEvent) {
            self.log.borrow_mut().push(format!("{event:?}"));
        }
    }

    fn game_loop(exit_after: Option<u64>) -> (GameLoop<Recorder>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let app_log = log.clone();
        let game_loop = GameLoop::new(
            Box::new(RecordingDevice::new()),
            RenderSettings::default(),
            move |_, _| {
                Ok(Recorder {
                    log: app_log,
                    exit_after,
                })
            },
        )
        .unwrap();
        (game_loop, log)
    }

    #[test]
    fn update_runs_before_render() {
        let (mut game_loop, log) = game_loop(None);
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Running);
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Running);
        assert_eq!(
            *log.borrow(),
            vec!["update 0", "render 0", "update 1", "render 1"]
        );
    }

    #[test]
    fn request_exit_stops_the_loop() {
        let (mut game_loop, _) = game_loop(Some(0));
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Exit);
    }

    #[test]
    fn events_are_delivered_before_update() {
        let (mut game_loop, log) = game_loop(None);
        let sender = game_loop.event_sender();
        sender
            .send(LoopEvent::Resized {
                width: 320,
                height: 200,
            })
            .unwrap();

        game_loop.tick().unwrap();
        assert_eq!(log.borrow()[0], "Resized { width: 320, height: 200 }");
        assert_eq!(log.borrow()[1], "update 0");
        assert_eq!(game_loop.context().viewport, (320, 200));
    }

    #[test]
    fn close_request_skips_the_frame() {
        let (mut game_loop, log) = game_loop(None);
        game_loop
            .event_sender()
            .send(LoopEvent::CloseRequested)
            .unwrap();
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Exit);
        assert_eq!(*log.borrow(), vec!["CloseRequested"]);
    }

    #[test]
    fn dropping_the_loop_releases_what_the_app_left_behind() {
        let device = RecordingDevice::new();
        let game_loop = GameLoop::new(
            Box::new(device.clone()),
            RenderSettings::default(),
            |device, sender| {
                let program = device.create_program("void main() {}", "void main() {}")?;
                sender.enqueue(program.into());
                Ok(Recorder {
                    log: Rc::default(),
                    exit_after: None,
                })
            },
        )
        .unwrap();
        assert_eq!(device.live_count(), 1);
        drop(game_loop);
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn shutdown_drops_the_application() {
        let (mut game_loop, _) = game_loop(None);
        assert_eq!(game_loop.shutdown().unwrap(), 0);
        assert!(game_loop.app().is_none());
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Exit);
    }

    #[test]
    fn factory_errors_are_reported() {
        let result = GameLoop::<Recorder>::new(
            Box::new(RecordingDevice::new()),
            RenderSettings::default(),
            |_, _| Err(anyhow::anyhow!("no assets")),
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("no assets"));
    }

    #[test]
    fn tick_clears_then_drains() {
        let device = RecordingDevice::new();
        let mut game_loop = GameLoop::new(
            Box::new(device.clone()),
            RenderSettings::default(),
            |_, _| {
                Ok(Recorder {
                    log: Rc::default(),
                    exit_after: None,
                })
            },
        )
        .unwrap();

        game_loop.tick().unwrap();
        assert!(device
            .calls()
            .contains(&DeviceCall::Clear(ClearMask::COLOR | ClearMask::DEPTH)));
        assert!(device
            .calls()
            .contains(&DeviceCall::ClearColor(RenderSettings::default().clear_color)));
    }
}
