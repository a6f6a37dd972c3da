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

//! Descriptors for 2D texture creation.

use serde::{Deserialize, Serialize};

/// The pixel layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit RGBA, normalised.
    Rgba8,
    /// 16-bit float RGBA, for HDR render targets.
    Rgba16Float,
    /// 24-bit depth with 8-bit stencil.
    Depth24Stencil8,
    /// 32-bit float depth.
    Depth32Float,
}

impl TextureFormat {
    /// Returns `true` for depth or depth-stencil formats.
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth24Stencil8 | TextureFormat::Depth32Float)
    }

    /// The size of one texel in bytes.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Rgba8 | TextureFormat::Depth24Stencil8 | TextureFormat::Depth32Float => 4,
            TextureFormat::Rgba16Float => 8,
        }
    }
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation of the four nearest texels.
    #[default]
    Linear,
}

/// Describes a 2D texture to be created by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Pixel layout.
    pub format: TextureFormat,
    /// Minification and magnification filter.
    pub filter: FilterMode,
    /// Whether the texture samples from a mipmap chain.
    pub mipmaps: bool,
}

impl TextureDescriptor {
    /// A linear-filtered RGBA8 texture without mipmaps.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::Rgba8,
            filter: FilterMode::Linear,
            mipmaps: false,
        }
    }

    /// The number of bytes a tightly packed upload for this texture must contain.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}
