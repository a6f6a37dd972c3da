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

//! Bitmap fonts: a glyph atlas texture plus per-character metrics.
//!
//! The glyph table comes from an external font description (for example a
//! BMFont export converted to RON). Parsing the source file format is the
//! host's job; this module only consumes the resulting [`FontDescription`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::renderer::texture::{Texture, TextureRegion};

/// One glyph entry of a font description. Units are atlas texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphDescription {
    /// Unicode scalar value of the character.
    pub id: u32,
    /// Left edge of the glyph in the atlas.
    pub x: u32,
    /// Top edge of the glyph in the atlas.
    pub y: u32,
    /// Width of the glyph bitmap.
    pub width: u32,
    /// Height of the glyph bitmap.
    pub height: u32,
    /// Horizontal offset from the pen position to the bitmap.
    pub x_offset: i32,
    /// Vertical offset from the line top to the bitmap.
    pub y_offset: i32,
    /// How far the pen moves after this glyph.
    pub x_advance: i32,
}

/// An already-parsed font description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescription {
    /// Distance between two baselines.
    pub line_height: u32,
    /// Glyph table.
    pub glyphs: Vec<GlyphDescription>,
}

impl FontDescription {
    /// Parses a description from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

/// Where a character lives in the atlas and how it is placed on the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapFontRegion {
    /// The glyph bitmap inside the atlas.
    pub region: TextureRegion,
    /// Offset from the pen position to the bitmap's top-left corner.
    pub offset: Vec2,
    /// Horizontal pen advance.
    pub x_advance: f32,
}

impl BitmapFontRegion {
    /// The vertical extent the glyph occupies below the line top.
    pub fn extent_height(&self) -> f32 {
        self.region.height as f32 + self.offset.y
    }
}

/// A glyph atlas and its character table. Immutable once built.
#[derive(Debug)]
pub struct BitmapFont {
    atlas: Arc<Texture>,
    regions: HashMap<char, BitmapFontRegion>,
    line_height: f32,
}

impl BitmapFont {
    /// Builds a font from its atlas and description.
    ///
    /// Entries whose id is not a valid character are skipped with a warning.
    /// A repeated id keeps the last entry.
    pub fn new(atlas: Arc<Texture>, description: &FontDescription) -> Self {
        let mut regions = HashMap::with_capacity(description.glyphs.len());
        for glyph in &description.glyphs {
            let Some(c) = char::from_u32(glyph.id) else {
                log::warn!("Skipping glyph with invalid character id {}.", glyph.id);
                continue;
            };
            regions.insert(
                c,
                BitmapFontRegion {
                    region: TextureRegion::new(glyph.x, glyph.y, glyph.width, glyph.height),
                    offset: Vec2::new(glyph.x_offset as f32, glyph.y_offset as f32),
                    x_advance: glyph.x_advance as f32,
                },
            );
        }
        log::debug!("Loaded bitmap font with {} glyphs.", regions.len());

        Self {
            atlas,
            regions,
            line_height: description.line_height as f32,
        }
    }

    /// The atlas texture.
    pub fn atlas(&self) -> &Arc<Texture> {
        &self.atlas
    }

    /// Distance between two baselines.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Number of characters in the table.
    pub fn glyph_count(&self) -> usize {
        self.regions.len()
    }

    /// Looks up a character. Unknown characters return `None` and should be
    /// treated as zero-width.
    pub fn character_region(&self, c: char) -> Option<&BitmapFontRegion> {
        self.regions.get(&c)
    }

    /// Measures a single line of text.
    ///
    /// ## Returns
    /// The sum of the advances as `x` and the tallest `height + y_offset` as
    /// `y`. Unknown characters contribute nothing, so an empty string or one
    /// made only of unknown characters measures `(0, 0)`.
    pub fn measure_string(&self, text: &str) -> Vec2 {
        text.chars()
            .filter_map(|c| self.character_region(c))
            .fold(Vec2::ZERO, |size, glyph| {
                Vec2::new(size.x + glyph.x_advance, size.y.max(glyph.extent_height()))
            })
    }
}
