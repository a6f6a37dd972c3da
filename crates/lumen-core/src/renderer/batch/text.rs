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

use serde::{Deserialize, Serialize};

use crate::math::{LinearRgba, Vec2};
use crate::renderer::font::BitmapFont;
use crate::renderer::mesh::{MeshData, MeshSlot};
use crate::scene::Transform;

/// Horizontal placement of each line inside the text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    /// Lines start at the block's left edge.
    #[default]
    Left,
    /// Lines are centred on the block's width.
    Center,
    /// Lines end at the block's right edge.
    Right,
}

/// A string laid out with a [`BitmapFont`], one quad per known glyph.
///
/// Lines are separated by `'\n'` and stacked downwards by the font's line
/// height. The block's top-left corner is the model-space origin.
#[derive(Debug, Clone)]
pub struct Text {
    font: Arc<BitmapFont>,
    text: String,
    alignment: TextAlignment,
    mesh: Arc<MeshSlot>,
    transform: Transform,
    tint: LinearRgba,
    size: Vec2,
}

impl Text {
    /// Lays out `text` with `font`, left-aligned.
    pub fn new(font: Arc<BitmapFont>, text: impl Into<String>) -> Self {
        let mut result = Self {
            font,
            text: text.into(),
            alignment: TextAlignment::Left,
            mesh: Arc::new(MeshSlot::new(MeshData::new())),
            transform: Transform::identity(),
            tint: LinearRgba::WHITE,
            size: Vec2::ZERO,
        };
        result.rebuild();
        result
    }

    /// Replaces the string and rebuilds the glyph geometry.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.rebuild();
        }
    }

    /// Changes the alignment and rebuilds the glyph geometry.
    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        if alignment != self.alignment {
            self.alignment = alignment;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let widths: Vec<f32> = lines
            .iter()
            .map(|line| self.font.measure_string(line).x)
            .collect();
        let block_width = widths.iter().copied().fold(0.0f32, f32::max);
        let (uv_size, line_height) = (self.font.atlas().size(), self.font.line_height());

        let mut mesh = MeshData::new();
        for (row, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let mut pen = match self.alignment {
                TextAlignment::Left => 0.0,
                TextAlignment::Center => (block_width - width) * 0.5,
                TextAlignment::Right => block_width - width,
            };
            let top = row as f32 * line_height;
            for glyph in line.chars().filter_map(|c| self.font.character_region(c)) {
                if glyph.region.width > 0 && glyph.region.height > 0 {
                    let min = Vec2::new(pen + glyph.offset.x, top + glyph.offset.y);
                    let (uv_min, uv_max) = glyph.region.uv_bounds(uv_size);
                    mesh.push_quad(min, min + glyph.region.size(), uv_min, uv_max);
                }
                pen += glyph.x_advance;
            }
        }

        let last_height = lines
            .last()
            .map(|line| self.font.measure_string(line).y)
            .unwrap_or(0.0);
        let height = if block_width > 0.0 || last_height > 0.0 {
            (lines.len() - 1) as f32 * line_height + last_height
        } else {
            0.0
        };

        self.size = Vec2::new(block_width, height);
        self.mesh = Arc::new(MeshSlot::new(mesh));
    }

    /// The displayed string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current alignment.
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// The font used for layout.
    pub fn font(&self) -> &Arc<BitmapFont> {
        &self.font
    }

    pub(crate) fn mesh(&self) -> &Arc<MeshSlot> {
        &self.mesh
    }

    /// The measured extent of the laid-out block.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The text's transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the text's transform.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The colour the glyphs are multiplied by.
    pub fn tint(&self) -> LinearRgba {
        self.tint
    }

    /// Sets the colour the glyphs are multiplied by.
    pub fn set_tint(&mut self, tint: LinearRgba) {
        self.tint = tint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::cleanup::CleanupQueue;
    use crate::renderer::font::{FontDescription, GlyphDescription};
    use crate::renderer::headless::RecordingDevice;
    use crate::renderer::texture::{Texture, TextureOptions};

    fn font(queue: &CleanupQueue, device: &RecordingDevice) -> Arc<BitmapFont> {
        let atlas = Texture::from_pixels(
            device,
            queue.sender(),
            4,
            4,
            &[255; 64],
            TextureOptions::default(),
        )
        .unwrap();
        let glyph = |c: char, x: u32, width: u32, x_advance: i32| GlyphDescription {
            id: c as u32,
            x,
            y: 0,
            width,
            height: 4,
            x_offset: 0,
            y_offset: 0,
            x_advance,
        };
        let description = FontDescription {
            line_height: 5,
            glyphs: vec![glyph('a', 0, 2, 2), glyph('b', 2, 2, 3), glyph(' ', 0, 0, 1)],
        };
        Arc::new(BitmapFont::new(Arc::new(atlas), &description))
    }

    #[test]
    fn one_quad_per_visible_glyph() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let font = font(&queue, &device);
        let text = Text::new(font.clone(), "a b?");

        assert_eq!(text.mesh().data().indices().len(), 12);
        assert_eq!(text.size(), Vec2::new(6.0, 4.0));
        // 'b' starts after 'a' (2) and ' ' (1).
        assert_eq!(text.mesh().data().vertices()[4].position, [3.0, 0.0, 0.0]);
        font.atlas().dispose();
    }

    #[test]
    fn lines_stack_by_line_height() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let font = font(&queue, &device);
        let text = Text::new(font.clone(), "ab\na");

        assert_eq!(text.size(), Vec2::new(5.0, 9.0));
        assert_eq!(text.mesh().data().vertices()[8].position, [0.0, 5.0, 0.0]);
        font.atlas().dispose();
    }

    #[test]
    fn alignment_offsets_short_lines() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let font = font(&queue, &device);
        let mut text = Text::new(font.clone(), "ab\na");

        text.set_alignment(TextAlignment::Right);
        assert_eq!(text.mesh().data().vertices()[8].position, [3.0, 5.0, 0.0]);

        text.set_alignment(TextAlignment::Center);
        assert_eq!(text.mesh().data().vertices()[8].position, [1.5, 5.0, 0.0]);
        font.atlas().dispose();
    }

    #[test]
    fn set_text_rebuilds_geometry() {
        let device = RecordingDevice::new();
        let queue = CleanupQueue::new();
        let font = font(&queue, &device);
        let mut text = Text::new(font.clone(), "");
        assert!(text.mesh().data().is_empty());
        assert_eq!(text.size(), Vec2::ZERO);

        let before = text.mesh().clone();
        text.set_text("ab");
        assert!(!Arc::ptr_eq(&before, text.mesh()));
        assert_eq!(text.text(), "ab");
        assert_eq!(text.mesh().data().indices().len(), 12);
        font.atlas().dispose();
    }
}
