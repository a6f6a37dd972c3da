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

use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_core::app::{Application, FrameContext, GameLoop, LoopEvent, LoopStatus};
use lumen_core::camera::{Camera, ViewOrigin};
use lumen_core::config::RenderSettings;
use lumen_core::math::Vec3;
use lumen_core::renderer::{
    CleanupSender, DeviceCall, GraphicsDevice, RecordingDevice, Sprite, SpriteBatch, Texture,
    TextureOptions,
};
use lumen_core::scene::TransformArena;

struct DriftingQuad {
    batch: Option<SpriteBatch<'static>>,
    sprite: Sprite,
    camera: Camera,
    transforms: TransformArena,
    draw_calls: usize,
}

impl DriftingQuad {
    fn new(device: &dyn GraphicsDevice, sender: CleanupSender) -> Result<Self> {
        let texture = Texture::from_pixels(
            device,
            sender.clone(),
            2,
            2,
            &[255; 16],
            TextureOptions::default(),
        )?;
        Ok(Self {
            batch: Some(SpriteBatch::new(device, sender)?),
            sprite: Sprite::new(Arc::new(texture)),
            camera: Camera::orthographic(320.0, 240.0, -1.0, 1.0, ViewOrigin::TopLeft)?,
            transforms: TransformArena::new(),
            draw_calls: 0,
        })
    }
}

impl Application for DriftingQuad {
    fn update(&mut self, context: &mut FrameContext<'_>) {
        self.sprite
            .transform_mut()
            .translate(Vec3::new(context.time.dt * 10.0, 0.0, 0.0));
    }

    fn render(&mut self, context: &mut FrameContext<'_>) -> Result<()> {
        let mut batch = self.batch.take().context("sprite batch missing")?;
        batch.add(&self.sprite);
        let drawn = batch.draw(context.graphics_device, &self.camera, &self.transforms);
        self.batch = Some(batch.recycle());
        self.draw_calls += drawn?.draw_calls;
        Ok(())
    }

    fn on_event(&mut self, event: &LoopEvent) {
        if let LoopEvent::Resized { width, height } = *event {
            // A zero-sized window keeps the previous projection.
            let _ = self.camera.resize(width as f32, height as f32);
        }
    }
}

#[test]
fn frames_clear_draw_and_release_everything_on_shutdown() {
    let device = RecordingDevice::new();
    let mut game_loop = GameLoop::new(
        Box::new(device.clone()),
        RenderSettings::default(),
        DriftingQuad::new,
    )
    .expect("application creation failed");

    for _ in 0..3 {
        assert_eq!(game_loop.tick().unwrap(), LoopStatus::Running);
    }
    assert_eq!(game_loop.app().map(|app| app.draw_calls), Some(3));

    let calls = device.calls();
    let clear = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::Clear(_)))
        .expect("frame was not cleared");
    let draw = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::DrawIndexed(_)))
        .expect("nothing was drawn");
    assert!(clear < draw);
    assert!(device.live_count() > 0);

    let released = game_loop.shutdown().unwrap();
    assert!(released > 0);
    assert_eq!(device.live_count(), 0);
}

#[test]
fn resize_reaches_the_device_and_the_application() {
    let device = RecordingDevice::new();
    let mut game_loop = GameLoop::new(
        Box::new(device.clone()),
        RenderSettings::default(),
        DriftingQuad::new,
    )
    .unwrap();

    let events = game_loop.event_sender();
    events
        .send(LoopEvent::Resized {
            width: 800,
            height: 600,
        })
        .unwrap();
    events.send(LoopEvent::CloseRequested).unwrap();

    assert_eq!(game_loop.tick().unwrap(), LoopStatus::Exit);
    assert!(device.calls().contains(&DeviceCall::Viewport {
        x: 0,
        y: 0,
        width: 800,
        height: 600
    }));
    assert_eq!(game_loop.app().map(|app| app.draw_calls), Some(0));
    game_loop.shutdown().unwrap();
}

#[test]
fn frames_without_clearing() {
    let device = RecordingDevice::new();
    let settings = RenderSettings {
        clear_each_frame: false,
        ..RenderSettings::default()
    };
    let mut game_loop =
        GameLoop::new(Box::new(device.clone()), settings, DriftingQuad::new).unwrap();

    game_loop.tick().unwrap();
    assert_eq!(
        device.count_calls(|c| matches!(c, DeviceCall::Clear(_))),
        0
    );
    game_loop.shutdown().unwrap();
}
