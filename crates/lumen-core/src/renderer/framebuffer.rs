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

//! Off-screen render targets.
//!
//! A [`Framebuffer`] owns a native framebuffer object and the textures
//! attached to it. Its lifecycle is `Idle -> Bound -> Idle -> ... -> Disposed`;
//! [`Framebuffer::enable`] and [`Framebuffer::disable`] move between the first
//! two states and [`Framebuffer::dispose`] ends it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::renderer::api::{
    ClearMask, FilterMode, FramebufferAttachment, FramebufferId, TextureDescriptor, TextureFormat,
};
use crate::renderer::cleanup::CleanupSender;
use crate::renderer::error::ResourceError;
use crate::renderer::texture::Texture;
use crate::renderer::traits::GraphicsDevice;

/// A declared attachment of a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attachment {
    /// A colour texture in the descriptor's colour format.
    Color,
    /// A depth texture. On its own it makes a depth-only framebuffer.
    Depth,
}

/// Describes a framebuffer to allocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferDescriptor {
    /// `(width, height)` in pixels.
    pub size: (u32, u32),
    /// Declared attachments, in colour-slot order.
    pub attachments: Vec<Attachment>,
    /// Format of every colour texture.
    pub color_format: TextureFormat,
    /// Whether colour textures get their mipmaps regenerated on `disable`.
    pub mipmaps: bool,
    /// Sampling filter of the colour textures.
    pub filter: FilterMode,
}

impl FramebufferDescriptor {
    /// A single RGBA8 colour attachment without mipmaps.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            attachments: vec![Attachment::Color],
            color_format: TextureFormat::Rgba8,
            mipmaps: false,
            filter: FilterMode::Linear,
        }
    }

    /// Returns `true` if the only declared attachment is a depth attachment.
    pub fn is_depth_only(&self) -> bool {
        self.attachments == [Attachment::Depth]
    }

    /// Number of colour attachments.
    pub fn color_count(&self) -> usize {
        self.attachments
            .iter()
            .filter(|a| **a == Attachment::Color)
            .count()
    }
}

/// Where a framebuffer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferState {
    /// Allocated, not bound.
    Idle,
    /// Bound as the draw target.
    Bound,
    /// Released. Every operation fails.
    Disposed,
}

/// An off-screen render target with its attached textures.
#[derive(Debug)]
pub struct Framebuffer {
    id: Option<FramebufferId>,
    color_textures: Vec<Arc<Texture>>,
    depth_texture: Option<Arc<Texture>>,
    depth_only: bool,
    size: (u32, u32),
    mipmaps: bool,
    complete: bool,
    state: FramebufferState,
    sender: CleanupSender,
}

impl Framebuffer {
    /// Allocates a framebuffer and its textures.
    ///
    /// A depth-only descriptor gets exactly one depth texture. Any other
    /// descriptor gets one texture per colour attachment plus one combined
    /// depth/stencil texture.
    ///
    /// An incomplete framebuffer is reported with a warning and recorded in
    /// [`Framebuffer::is_complete`]; it does not fail construction.
    ///
    /// ## Arguments
    /// * `device` - The device that will own the objects.
    /// * `sender` - Where the handles go once the framebuffer is disposed.
    /// * `descriptor` - What to allocate.
    ///
    /// ## Returns
    /// The framebuffer in the `Idle` state. If any allocation fails, the
    /// objects created so far are queued for release and the error returned.
    pub fn new(
        device: &dyn GraphicsDevice,
        sender: CleanupSender,
        descriptor: FramebufferDescriptor,
    ) -> Result<Self, ResourceError> {
        if descriptor.attachments.is_empty() {
            return Err(ResourceError::CreationFailed {
                kind: "framebuffer",
                details: "at least one attachment is required".to_string(),
            });
        }
        let (width, height) = descriptor.size;
        if width == 0 || height == 0 {
            return Err(ResourceError::CreationFailed {
                kind: "framebuffer",
                details: format!("dimensions must be non-zero, got {width}x{height}"),
            });
        }

        let mut framebuffer = Self {
            id: Some(device.create_framebuffer()?),
            color_textures: Vec::with_capacity(descriptor.color_count()),
            depth_texture: None,
            depth_only: descriptor.is_depth_only(),
            size: descriptor.size,
            mipmaps: descriptor.mipmaps,
            complete: false,
            state: FramebufferState::Idle,
            sender,
        };

        if let Err(e) = framebuffer.allocate(device, &descriptor) {
            log::error!("Framebuffer allocation failed: {e}");
            framebuffer.dispose();
            return Err(e);
        }
        Ok(framebuffer)
    }

    fn allocate(
        &mut self,
        device: &dyn GraphicsDevice,
        descriptor: &FramebufferDescriptor,
    ) -> Result<(), ResourceError> {
        let (width, height) = self.size;

        if !self.depth_only {
            let color = TextureDescriptor {
                width,
                height,
                format: descriptor.color_format,
                filter: descriptor.filter,
                mipmaps: descriptor.mipmaps,
            };
            for _ in 0..descriptor.color_count() {
                let texture = Texture::render_target(device, self.sender.clone(), &color)?;
                self.color_textures.push(Arc::new(texture));
            }
        }

        let depth = TextureDescriptor {
            width,
            height,
            format: if self.depth_only {
                TextureFormat::Depth32Float
            } else {
                TextureFormat::Depth24Stencil8
            },
            filter: FilterMode::Nearest,
            mipmaps: false,
        };
        let texture = Texture::render_target(device, self.sender.clone(), &depth)?;
        self.depth_texture = Some(Arc::new(texture));

        let id = self.framebuffer_id()?;
        device.bind_framebuffer(Some(id));
        let attached = self.attach_all(device);
        let status = device.framebuffer_status();
        device.bind_framebuffer(None);
        attached?;

        self.complete = status.is_complete();
        if self.complete {
            log::debug!(
                "Created framebuffer {id:?} ({width}x{height}, {} colour attachment(s)).",
                self.color_textures.len()
            );
        } else {
            log::warn!("Framebuffer {id:?} is {status}.");
        }
        Ok(())
    }

    /// Binds and attaches every texture to the bound framebuffer, then
    /// declares the draw buffers. Texture unit 0 is left unbound.
    fn attach_all(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        let attach = |point: FramebufferAttachment, texture: &Arc<Texture>| {
            let id = texture.id()?;
            device.bind_texture(0, Some(id));
            device.attach_texture(point, id);
            Ok::<(), ResourceError>(())
        };
        let attached = self
            .color_textures
            .iter()
            .enumerate()
            .try_for_each(|(slot, texture)| {
                attach(FramebufferAttachment::Color(slot as u32), texture)
            })
            .and_then(|()| match &self.depth_texture {
                Some(depth) if self.depth_only => attach(FramebufferAttachment::Depth, depth),
                Some(depth) => attach(FramebufferAttachment::DepthStencil, depth),
                None => Ok(()),
            });
        device.bind_texture(0, None);
        attached?;

        match self.color_textures.len() {
            0 => device.draw_buffers(0),
            1 => {}
            n => device.draw_buffers(n as u32),
        }
        Ok(())
    }

    /// Binds the framebuffer as the draw target.
    ///
    /// ## Arguments
    /// * `device` - The owning device.
    /// * `clear` - Whether to clear the colour and depth buffers (depth only
    ///   for a depth-only framebuffer).
    ///
    /// ## Returns
    /// `ResourceError::InvalidHandle` once disposed.
    pub fn enable(&mut self, device: &dyn GraphicsDevice, clear: bool) -> Result<(), ResourceError> {
        let id = self.framebuffer_id()?;
        device.bind_framebuffer(Some(id));
        self.attach_all(device)?;

        let (width, height) = self.size;
        device.viewport(0, 0, width, height);
        if clear {
            let mask = if self.depth_only {
                ClearMask::DEPTH
            } else {
                ClearMask::COLOR | ClearMask::DEPTH
            };
            device.clear(mask);
        }

        self.state = FramebufferState::Bound;
        Ok(())
    }

    /// Restores the default framebuffer and refreshes colour mipmaps if requested.
    pub fn disable(&mut self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        self.framebuffer_id()?;
        device.bind_framebuffer(None);

        if self.mipmaps {
            for texture in &self.color_textures {
                device.generate_mipmap(texture.id()?);
            }
        }

        self.state = FramebufferState::Idle;
        Ok(())
    }

    /// Schedules the framebuffer and every attached texture for deletion.
    ///
    /// One cleanup item is queued per handle. Further calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(id) = self.id.take() {
            self.sender.enqueue(id.into());
        }
        for texture in self.color_textures.drain(..) {
            texture.dispose();
        }
        if let Some(depth) = self.depth_texture.take() {
            depth.dispose();
        }
        self.state = FramebufferState::Disposed;
    }

    /// The native framebuffer handle.
    pub fn framebuffer_id(&self) -> Result<FramebufferId, ResourceError> {
        self.id.ok_or(ResourceError::InvalidHandle {
            kind: "framebuffer",
        })
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The lifecycle state.
    pub fn state(&self) -> FramebufferState {
        self.state
    }

    /// Whether the completeness check passed at construction.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The colour textures in slot order. Empty once disposed.
    pub fn color_textures(&self) -> &[Arc<Texture>] {
        &self.color_textures
    }

    /// The depth (or depth/stencil) texture.
    pub fn depth_texture(&self) -> Option<&Arc<Texture>> {
        self.depth_texture.as_ref()
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if self.id.is_some() || !self.color_textures.is_empty() || self.depth_texture.is_some() {
            log::warn!("Framebuffer {:?} dropped without dispose.", self.id);
            self.dispose();
        }
    }
}
