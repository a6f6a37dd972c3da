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

use lumen_core::camera::{Camera, ViewOrigin};
use lumen_core::math::{Vec2, Vec3};
use lumen_core::renderer::{
    BitmapFont, CleanupQueue, DeviceCall, FontDescription, GlyphDescription, RecordingDevice,
    Sprite, SpriteBatch, Text, TextAlignment, Texture, TextureOptions, TextureRegion,
};
use lumen_core::scene::{Transform, TransformArena};

fn solid_texture(device: &RecordingDevice, queue: &CleanupQueue, size: u32) -> Arc<Texture> {
    let pixels = vec![255u8; (size * size * 4) as usize];
    Arc::new(
        Texture::from_pixels(
            device,
            queue.sender(),
            size,
            size,
            &pixels,
            TextureOptions::default(),
        )
        .expect("texture upload failed"),
    )
}

fn screen_camera() -> Camera {
    Camera::orthographic(640.0, 480.0, -1.0, 1.0, ViewOrigin::TopLeft).expect("valid camera")
}

fn font(atlas: Arc<Texture>) -> BitmapFont {
    let glyph = |c: char, x: u32, width: u32, height: u32, x_advance: i32| GlyphDescription {
        id: c as u32,
        x,
        y: 0,
        width,
        height,
        x_offset: 0,
        y_offset: 2,
        x_advance,
    };
    let description = FontDescription {
        line_height: 16,
        glyphs: vec![
            glyph('A', 0, 8, 12, 10),
            glyph('B', 8, 10, 13, 12),
            glyph(' ', 0, 0, 0, 4),
        ],
    };
    BitmapFont::new(atlas, &description)
}

#[test]
fn consecutive_sprites_share_a_texture_bind() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let tex1 = solid_texture(&device, &queue, 4);
    let tex2 = solid_texture(&device, &queue, 4);
    let mut batch = SpriteBatch::new(&device, queue.sender()).expect("sprite shader");

    let a = Sprite::new(tex1.clone());
    let mut b = Sprite::new(tex1.clone());
    b.transform_mut().set_position(Vec3::new(20.0, 0.0, 0.0));
    let c = Sprite::new(tex2.clone());
    batch.add(&a);
    batch.add(&b);
    batch.add(&c);

    device.clear_calls();
    let stats = batch
        .draw(&device, &screen_camera(), &TransformArena::new())
        .expect("draw failed");

    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.texture_binds, 2);
    assert_eq!(
        device.count_calls(|c| matches!(c, DeviceCall::BindTexture { id: Some(_), .. })),
        2
    );

    batch.dispose();
    tex1.dispose();
    tex2.dispose();
    drop((a, b, c));
    queue.drain_and_release(&device).unwrap();
    assert_eq!(device.live_count(), 0);
}

#[test]
fn text_is_drawn_after_sprites_with_the_atlas() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let atlas = solid_texture(&device, &queue, 32);
    let sheet = solid_texture(&device, &queue, 32);
    let font = Arc::new(font(atlas.clone()));
    let mut batch = SpriteBatch::new(&device, queue.sender()).expect("sprite shader");

    let text = Text::new(font.clone(), "AB");
    let tile = Sprite::with_region(sheet.clone(), TextureRegion::new(0, 0, 16, 16));
    batch.add_text(&text);
    batch.add(&tile);

    device.clear_calls();
    let stats = batch
        .draw(&device, &screen_camera(), &TransformArena::new())
        .expect("draw failed");
    assert_eq!(stats.draw_calls, 2);

    let binds: Vec<DeviceCall> = device
        .calls()
        .into_iter()
        .filter(|c| matches!(c, DeviceCall::BindTexture { .. }))
        .collect();
    assert_eq!(
        binds,
        vec![
            DeviceCall::BindTexture {
                unit: 0,
                id: Some(sheet.id().unwrap())
            },
            DeviceCall::BindTexture {
                unit: 0,
                id: Some(atlas.id().unwrap())
            },
        ]
    );
    // Two glyph quads in one mesh.
    assert!(device.calls().contains(&DeviceCall::DrawIndexed(12)));
    batch.dispose();
}

#[test]
fn text_block_size_follows_the_font() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let font = Arc::new(font(solid_texture(&device, &queue, 32)));

    assert_eq!(font.measure_string(""), Vec2::ZERO);
    assert_eq!(font.measure_string("??"), Vec2::ZERO);
    assert_eq!(font.measure_string("AB"), Vec2::new(22.0, 15.0));

    let mut text = Text::new(font.clone(), "AB\nA");
    assert_eq!(text.size(), Vec2::new(22.0, 16.0 + 14.0));

    text.set_alignment(TextAlignment::Right);
    assert_eq!(text.alignment(), TextAlignment::Right);
    text.set_text("");
    assert_eq!(text.size(), Vec2::ZERO);

    font.atlas().dispose();
}

#[test]
fn sprites_follow_their_parent_transform() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let texture = solid_texture(&device, &queue, 2);
    let mut batch = SpriteBatch::new(&device, queue.sender()).expect("sprite shader");
    batch.set_frustum_culling(true);

    let mut transforms = TransformArena::new();
    let parent = transforms.insert(Transform::from_position(Vec3::new(100.0, 100.0, 0.0)));
    let mut sprite = Sprite::with_size(texture.clone(), Vec2::new(10.0, 10.0));
    sprite.transform_mut().set_parent(Some(parent));

    batch.add(&sprite);
    let stats = batch.draw(&device, &screen_camera(), &transforms).unwrap();
    assert_eq!((stats.draw_calls, stats.culled), (1, 0));

    transforms
        .get_mut(parent)
        .unwrap()
        .set_position(Vec3::new(10_000.0, 0.0, 0.0));
    batch.add(&sprite);
    let stats = batch.draw(&device, &screen_camera(), &transforms).unwrap();
    assert_eq!((stats.draw_calls, stats.culled), (0, 1));

    batch.dispose();
    texture.dispose();
}
