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

//! Owned 2D textures.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::renderer::api::{FilterMode, TextureDescriptor, TextureFormat, TextureId};
use crate::renderer::cleanup::CleanupSender;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// Sampling options for textures created from pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextureOptions {
    /// Minification and magnification filter.
    pub filter: FilterMode,
    /// Whether to build a mipmap chain after upload.
    pub mipmaps: bool,
}

/// A rectangle of texels inside a texture, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextureRegion {
    /// Left edge in texels.
    pub x: u32,
    /// Top edge in texels.
    pub y: u32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl TextureRegion {
    /// Creates a region.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region's size as floats.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// The normalised texture coordinates of the top-left and bottom-right
    /// corners inside a `texture_size` texture.
    pub fn uv_bounds(&self, texture_size: Vec2) -> (Vec2, Vec2) {
        if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
            return (Vec2::ZERO, Vec2::ZERO);
        }
        let min = Vec2::new(self.x as f32 / texture_size.x, self.y as f32 / texture_size.y);
        let max = Vec2::new(
            (self.x + self.width) as f32 / texture_size.x,
            (self.y + self.height) as f32 / texture_size.y,
        );
        (min, max)
    }
}

/// A 2D texture owning its native handle.
///
/// Textures are shared between drawables through `Arc`, so disposal works on
/// `&self`: the handle is an atomic that is swapped to zero exactly once.
/// Whoever swaps it out pushes the handle onto the cleanup queue.
#[derive(Debug)]
pub struct Texture {
    handle: AtomicU32,
    width: u32,
    height: u32,
    format: TextureFormat,
    sender: CleanupSender,
}

impl Texture {
    /// Uploads tightly packed RGBA8 pixels into a new texture.
    ///
    /// ## Arguments
    /// * `device` - The device that will own the texture.
    /// * `sender` - Where the handle goes once the texture is disposed.
    /// * `width`, `height` - Dimensions in texels, both non-zero.
    /// * `pixels` - `width * height * 4` bytes, top row first.
    /// * `options` - Sampling options.
    ///
    /// ## Returns
    /// The texture, or `ResourceError::CreationFailed` if the dimensions or
    /// the pixel buffer are invalid.
    pub fn from_pixels(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        width: u32,
        height: u32,
        pixels: &[u8],
        options: TextureOptions,
    ) -> Result<Self, ResourceError> {
        let descriptor = TextureDescriptor {
            width,
            height,
            format: TextureFormat::Rgba8,
            filter: options.filter,
            mipmaps: options.mipmaps,
        };
        if pixels.len() != descriptor.byte_len() {
            return Err(ResourceError::CreationFailed {
                kind: "texture",
                details: format!(
                    "{width}x{height} RGBA8 texture needs {} bytes, got {}",
                    descriptor.byte_len(),
                    pixels.len()
                ),
            });
        }
        Self::create(device, sender, &descriptor, Some(pixels))
    }

    /// Uploads a decoded RGBA image into a new texture.
    pub fn from_image(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        image: &image::RgbaImage,
        options: TextureOptions,
    ) -> Result<Self, ResourceError> {
        Self::from_pixels(
            device,
            sender,
            image.width(),
            image.height(),
            image.as_raw(),
            options,
        )
    }

    /// Creates an uninitialised texture, typically a render target.
    pub fn render_target(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        descriptor: &TextureDescriptor,
    ) -> Result<Self, ResourceError> {
        Self::create(device, sender, descriptor, None)
    }

    fn create(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        descriptor: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<Self, ResourceError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ResourceError::CreationFailed {
                kind: "texture",
                details: format!(
                    "dimensions must be non-zero, got {}x{}",
                    descriptor.width, descriptor.height
                ),
            });
        }

        let id = device.create_texture(descriptor, pixels)?;
        if descriptor.mipmaps && pixels.is_some() {
            device.generate_mipmap(id);
        }
        log::debug!(
            "Created {:?} texture {:?} ({}x{}).",
            descriptor.format,
            id,
            descriptor.width,
            descriptor.height
        );

        Ok(Self {
            handle: AtomicU32::new(id.0),
            width: descriptor.width,
            height: descriptor.height,
            format: descriptor.format,
            sender,
        })
    }

    /// The native handle.
    ///
    /// ## Returns
    /// `ResourceError::InvalidHandle` once the texture has been disposed.
    pub fn id(&self) -> Result<TextureId, ResourceError> {
        match self.handle.load(Ordering::Acquire) {
            0 => Err(ResourceError::InvalidHandle { kind: "texture" }),
            h => Ok(TextureId(h)),
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` as floats.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// The pixel layout.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Returns `true` once [`Texture::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.handle.load(Ordering::Acquire) == 0
    }

    /// Schedules the native texture for deletion. Further calls do nothing.
    pub fn dispose(&self) {
        let handle = self.handle.swap(0, Ordering::AcqRel);
        if handle != 0 {
            self.sender.enqueue(TextureId(handle).into());
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        let handle = *self.handle.get_mut();
        if handle != 0 {
            log::warn!("Texture {:?} dropped without dispose.", TextureId(handle));
            self.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::cleanup::CleanupQueue;
    use crate::renderer::headless::{DeviceCall, RecordingDevice};

    #[test]
    fn region_uv_bounds() {
        let region = TextureRegion::new(32, 0, 32, 16);
        let (min, max) = region.uv_bounds(Vec2::new(128.0, 64.0));
        assert_eq!(min, Vec2::new(0.25, 0.0));
        assert_eq!(max, Vec2::new(0.5, 0.25));
        assert_eq!(region.uv_bounds(Vec2::ZERO), (Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn from_pixels_checks_buffer_length() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let result = Texture::from_pixels(
            &device,
            queue.sender(),
            2,
            2,
            &[255; 12],
            TextureOptions::default(),
        );
        assert!(matches!(
            result,
            Err(ResourceError::CreationFailed { kind: "texture", .. })
        ));
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn zero_sized_texture_is_rejected() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let result = Texture::from_pixels(
            &device,
            queue.sender(),
            0,
            4,
            &[],
            TextureOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn mipmaps_are_generated_on_upload() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = Texture::from_pixels(
            &device,
            queue.sender(),
            1,
            1,
            &[255; 4],
            TextureOptions {
                filter: FilterMode::Nearest,
                mipmaps: true,
            },
        )
        .unwrap();
        let id = texture.id().unwrap();
        assert_eq!(device.count_calls(|c| *c == DeviceCall::GenerateMipmap(id)), 1);
        texture.dispose();
    }

    #[test]
    fn from_image_uses_image_dimensions() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let texture =
            Texture::from_image(&device, queue.sender(), &image, TextureOptions::default()).unwrap();
        assert_eq!(texture.size(), Vec2::new(3.0, 2.0));
        texture.dispose();
    }

    #[test]
    fn dispose_is_idempotent() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = Texture::from_pixels(
            &device,
            queue.sender(),
            1,
            1,
            &[0; 4],
            TextureOptions::default(),
        )
        .unwrap();

        texture.dispose();
        texture.dispose();
        assert!(texture.is_disposed());
        assert_eq!(
            texture.id(),
            Err(ResourceError::InvalidHandle { kind: "texture" })
        );
        assert_eq!(queue.pending(), 1);

        drop(texture);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.drain_and_release(&device).unwrap(), 1);
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn drop_without_dispose_enqueues() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let texture = Texture::from_pixels(
            &device,
            queue.sender(),
            1,
            1,
            &[0; 4],
            TextureOptions::default(),
        )
        .unwrap();
        drop(texture);
        assert_eq!(queue.pending(), 1);
    }
}
