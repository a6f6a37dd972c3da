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

//! The `LinearRgba` colour used for sprite tints and clear colours.

use serde::{Deserialize, Serialize};

use crate::math::vector::Vec4;

/// A colour in linear RGBA space with `f32` components.
///
/// Tints are sent to shaders as a `vec4` uniform, so the layout is `#[repr(C)]`.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque white. The neutral tint.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Cornflower blue, the default clear colour.
    pub const CORNFLOWER_BLUE: Self = Self::rgb(0.127, 0.301, 0.846);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a colour from 8-bit sRGB channels. Alpha is kept linear.
    pub fn from_srgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let lin = |c: u8| srgb_to_linear(c as f32 / 255.0);
        Self::new(lin(r), lin(g), lin(b), a as f32 / 255.0)
    }

    /// Returns the same colour with a different alpha.
    #[inline]
    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// Creates a colour from a [`Vec4`] (`x, y, z, w` → `r, g, b, a`).
    #[inline]
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Converts this colour to a [`Vec4`].
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl Default for LinearRgba {
    /// Returns opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_default_is_white() {
        assert_eq!(LinearRgba::default(), LinearRgba::WHITE);
    }

    #[test]
    fn test_from_srgba8() {
        let c = LinearRgba::from_srgba8(255, 0, 128, 51);
        assert!(approx_eq(c.r, 1.0));
        assert!(approx_eq(c.g, 0.0));
        assert!((c.b - 0.2158).abs() < 1e-3);
        assert!(approx_eq(c.a, 0.2));
    }

    #[test]
    fn test_vec4_conversion() {
        let c = LinearRgba::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(LinearRgba::from_vec4(c.to_vec4()), c);
        assert_eq!(c.with_alpha(1.0).a, 1.0);
    }
}
