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

use lumen_core::renderer::{
    Attachment, ClearMask, CleanupQueue, DeviceCall, Framebuffer, FramebufferDescriptor, FramebufferState,
    GpuResource, RecordingDevice,
};

fn color_and_depth(width: u32, height: u32) -> FramebufferDescriptor {
    FramebufferDescriptor {
        attachments: vec![Attachment::Color, Attachment::Depth],
        ..FramebufferDescriptor::new(width, height)
    }
}

#[test]
fn dispose_enqueues_one_item_per_handle() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let mut framebuffer = Framebuffer::new(&device, queue.sender(), color_and_depth(64, 32))
        .expect("framebuffer creation failed");
    assert!(framebuffer.is_complete());
    assert_eq!(device.live_count(), 3);

    framebuffer.dispose();
    assert_eq!(framebuffer.state(), FramebufferState::Disposed);
    assert_eq!(queue.pending(), 3);
    // Nothing is deleted before the owning thread drains.
    assert_eq!(device.count_calls(DeviceCall::is_delete), 0);

    assert_eq!(queue.drain_and_release(&device).unwrap(), 3);
    assert_eq!(queue.pending(), 0);
    assert_eq!(device.count_calls(DeviceCall::is_delete), 3);
    assert_eq!(device.live_count(), 0);

    framebuffer.dispose();
    assert_eq!(queue.pending(), 0);
}

#[test]
fn dropping_an_enabled_framebuffer_still_releases_it() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    {
        let mut framebuffer = Framebuffer::new(&device, queue.sender(), color_and_depth(16, 16))
            .expect("framebuffer creation failed");
        framebuffer.enable(&device, true).unwrap();
        assert_eq!(framebuffer.state(), FramebufferState::Bound);
    }
    assert_eq!(queue.drain_and_release(&device).unwrap(), 3);
    assert_eq!(device.live_count(), 0);
}

#[test]
fn render_to_texture_round_trip() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let mut descriptor = FramebufferDescriptor::new(128, 128);
    descriptor.mipmaps = true;
    let mut framebuffer =
        Framebuffer::new(&device, queue.sender(), descriptor).expect("framebuffer creation failed");
    let color = framebuffer.color_textures()[0].id().unwrap();
    let id = framebuffer.framebuffer_id().unwrap();
    device.clear_calls();

    framebuffer.enable(&device, true).unwrap();
    framebuffer.disable(&device).unwrap();

    let calls = device.calls();
    assert_eq!(calls.first(), Some(&DeviceCall::BindFramebuffer(Some(id))));
    assert!(calls.contains(&DeviceCall::Viewport {
        x: 0,
        y: 0,
        width: 128,
        height: 128
    }));
    assert!(calls.contains(&DeviceCall::BindFramebuffer(None)));
    assert_eq!(calls.last(), Some(&DeviceCall::GenerateMipmap(color)));

    framebuffer.dispose();
    queue.drain_and_release(&device).unwrap();
    assert!(!device.is_live(GpuResource::Texture(color)));
}

#[test]
fn depth_only_framebuffer_clears_depth() {
    let device = RecordingDevice::new();
    let queue = CleanupQueue::new();
    let descriptor = FramebufferDescriptor {
        attachments: vec![Attachment::Depth],
        ..FramebufferDescriptor::new(32, 32)
    };
    let mut framebuffer =
        Framebuffer::new(&device, queue.sender(), descriptor).expect("framebuffer creation failed");
    assert!(framebuffer.color_textures().is_empty());
    assert!(framebuffer.depth_texture().is_some());

    device.clear_calls();
    framebuffer.enable(&device, true).unwrap();
    assert!(device
        .calls()
        .contains(&DeviceCall::Clear(ClearMask::DEPTH)));
    framebuffer.disable(&device).unwrap();
    framebuffer.dispose();
    assert_eq!(queue.drain_and_release(&device).unwrap(), 2);
}
