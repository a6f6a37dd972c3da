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

//! Conversions from the core's GL-style enums to raw OpenGL constants.

use lumen_core::renderer::api::{
    BlendFactor, BufferTarget, Capability, ClearMask, FilterMode, FramebufferAttachment,
    TextureFormat,
};

/// A local extension trait mapping core enums onto `glow` constants.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into the OpenGL value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl IntoGl<u32> for Capability {
    fn into_gl(self) -> u32 {
        match self {
            Capability::Blend => glow::BLEND,
            Capability::DepthTest => glow::DEPTH_TEST,
            Capability::CullFace => glow::CULL_FACE,
            Capability::ScissorTest => glow::SCISSOR_TEST,
        }
    }
}

impl IntoGl<u32> for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        }
    }
}

impl IntoGl<u32> for FramebufferAttachment {
    fn into_gl(self) -> u32 {
        match self {
            FramebufferAttachment::Color(slot) => glow::COLOR_ATTACHMENT0 + slot,
            FramebufferAttachment::Depth => glow::DEPTH_ATTACHMENT,
            FramebufferAttachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

impl IntoGl<u32> for ClearMask {
    fn into_gl(self) -> u32 {
        let mut bits = 0;
        if self.color {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if self.depth {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        if self.stencil {
            bits |= glow::STENCIL_BUFFER_BIT;
        }
        bits
    }
}

/// The three enums `glTexImage2D` needs for one storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTextureFormat {
    /// Sized internal format.
    pub internal: u32,
    /// Pixel data format.
    pub format: u32,
    /// Pixel component type.
    pub ty: u32,
}

impl IntoGl<GlTextureFormat> for TextureFormat {
    fn into_gl(self) -> GlTextureFormat {
        let (internal, format, ty) = match self {
            TextureFormat::Rgba8 => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
            TextureFormat::Rgba16Float => (glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT),
            TextureFormat::Depth24Stencil8 => (
                glow::DEPTH24_STENCIL8,
                glow::DEPTH_STENCIL,
                glow::UNSIGNED_INT_24_8,
            ),
            TextureFormat::Depth32Float => (
                glow::DEPTH_COMPONENT32F,
                glow::DEPTH_COMPONENT,
                glow::FLOAT,
            ),
        };
        GlTextureFormat {
            internal,
            format,
            ty,
        }
    }
}

/// Returns the `(min, mag)` filters for a sampling mode.
pub fn filter_pair(filter: FilterMode, mipmaps: bool) -> (u32, u32) {
    match (filter, mipmaps) {
        (FilterMode::Nearest, false) => (glow::NEAREST, glow::NEAREST),
        (FilterMode::Nearest, true) => (glow::NEAREST_MIPMAP_NEAREST, glow::NEAREST),
        (FilterMode::Linear, false) => (glow::LINEAR, glow::LINEAR),
        (FilterMode::Linear, true) => (glow::LINEAR_MIPMAP_LINEAR, glow::LINEAR),
    }
}

/// Describes a `glCheckFramebufferStatus` result.
pub fn framebuffer_status_name(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "complete",
        glow::FRAMEBUFFER_UNDEFINED => "undefined",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "missing attachment",
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "incomplete draw buffer",
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "incomplete read buffer",
        glow::FRAMEBUFFER_UNSUPPORTED => "unsupported",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
        glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "incomplete layer targets",
        _ => "unknown status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_mask_bits() {
        assert_eq!(ClearMask::default().into_gl(), 0);
        assert_eq!(
            (ClearMask::COLOR | ClearMask::DEPTH).into_gl(),
            glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT
        );
    }

    #[test]
    fn color_attachments_are_consecutive() {
        assert_eq!(FramebufferAttachment::Color(0).into_gl(), glow::COLOR_ATTACHMENT0);
        assert_eq!(FramebufferAttachment::Color(2).into_gl(), glow::COLOR_ATTACHMENT2);
    }

    #[test]
    fn depth_formats_upload_as_depth() {
        let format: GlTextureFormat = TextureFormat::Depth32Float.into_gl();
        assert_eq!(format.format, glow::DEPTH_COMPONENT);
        let format: GlTextureFormat = TextureFormat::Depth24Stencil8.into_gl();
        assert_eq!(format.ty, glow::UNSIGNED_INT_24_8);
    }

    #[test]
    fn mipmapped_filters() {
        assert_eq!(
            filter_pair(FilterMode::Linear, true),
            (glow::LINEAR_MIPMAP_LINEAR, glow::LINEAR)
        );
        assert_eq!(
            filter_pair(FilterMode::Nearest, false),
            (glow::NEAREST, glow::NEAREST)
        );
    }

    #[test]
    fn unknown_status_is_named() {
        assert_eq!(framebuffer_status_name(0xDEAD), "unknown status");
        assert_eq!(
            framebuffer_status_name(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT),
            "missing attachment"
        );
    }
}
