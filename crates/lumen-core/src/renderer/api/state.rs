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

//! Fixed-function pipeline state and framebuffer attachment points.

use std::fmt;
use std::ops::BitOr;

/// Which buffers a `clear` call resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClearMask {
    /// Clear the colour buffers.
    pub color: bool,
    /// Clear the depth buffer.
    pub depth: bool,
    /// Clear the stencil buffer.
    pub stencil: bool,
}

impl ClearMask {
    /// Colour only.
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
        stencil: false,
    };
    /// Depth only.
    pub const DEPTH: Self = Self {
        color: false,
        depth: true,
        stencil: false,
    };
    /// Stencil only.
    pub const STENCIL: Self = Self {
        color: false,
        depth: false,
        stencil: true,
    };
}

impl BitOr for ClearMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
            stencil: self.stencil || rhs.stencil,
        }
    }
}

/// A server-side capability that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Alpha blending.
    Blend,
    /// Depth testing.
    DepthTest,
    /// Back-face culling.
    CullFace,
    /// Scissor testing.
    ScissorTest,
}

/// A source or destination factor for alpha blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
}

/// An attachment point of a framebuffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferAttachment {
    /// Colour attachment `n`.
    Color(u32),
    /// The depth attachment.
    Depth,
    /// The combined depth and stencil attachment.
    DepthStencil,
}

/// The result of a framebuffer completeness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramebufferStatus {
    /// The framebuffer can be rendered to.
    Complete,
    /// The framebuffer is unusable. Holds the backend's reason.
    Incomplete(String),
}

impl FramebufferStatus {
    /// Returns `true` for [`FramebufferStatus::Complete`].
    pub fn is_complete(&self) -> bool {
        matches!(self, FramebufferStatus::Complete)
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => write!(f, "complete"),
            FramebufferStatus::Incomplete(reason) => write!(f, "incomplete ({reason})"),
        }
    }
}
