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

//! Runtime settings of the frame loop, stored as RON.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::LinearRgba;

/// An error raised while loading or validating [`RenderSettings`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The settings file could not be read.
    Io(String),
    /// The text is not valid RON for [`RenderSettings`].
    InvalidFormat(String),
    /// A field holds a value outside its allowed range.
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// What the field must satisfy.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read settings: {msg}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid settings format: {msg}"),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings consumed by the frame loop.
///
/// Every field has a default, so a settings file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Colour the default framebuffer is cleared to.
    pub clear_color: LinearRgba,
    /// Whether the loop clears colour and depth before each render.
    pub clear_each_frame: bool,
    /// Smallest frame delta reported by the clock, in seconds.
    pub min_frame_time: f32,
    /// Largest frame delta reported by the clock, in seconds.
    pub max_frame_time: f32,
    /// Seconds between two FPS log lines. Zero disables the log.
    pub fps_log_interval: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: LinearRgba::CORNFLOWER_BLUE,
            clear_each_frame: true,
            min_frame_time: 0.0001,
            max_frame_time: 0.25,
            fps_log_interval: 1.0,
        }
    }
}

impl RenderSettings {
    /// Parses and validates settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a RON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let settings: Self =
            ron::de::from_bytes(&bytes).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        log::info!("Loaded render settings from {}.", path.display());
        Ok(settings)
    }

    /// Serialises the settings as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Checks the frame time clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_frame_time >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "min_frame_time",
                reason: "must be >= 0",
            });
        }
        if !(self.max_frame_time >= self.min_frame_time) {
            return Err(ConfigError::InvalidValue {
                field: "max_frame_time",
                reason: "must be >= min_frame_time",
            });
        }
        if !(self.fps_log_interval >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "fps_log_interval",
                reason: "must be >= 0",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_use_defaults() {
        let settings = RenderSettings::from_ron_str("(clear_each_frame: false)").unwrap();
        assert!(!settings.clear_each_frame);
        assert_eq!(settings.clear_color, LinearRgba::CORNFLOWER_BLUE);
        assert_eq!(settings.max_frame_time, 0.25);
    }

    #[test]
    fn settings_survive_a_ron_round_trip() {
        let settings = RenderSettings {
            clear_color: LinearRgba::new(0.1, 0.2, 0.3, 1.0),
            fps_log_interval: 0.0,
            ..RenderSettings::default()
        };
        let text = settings.to_ron_string().unwrap();
        assert_eq!(RenderSettings::from_ron_str(&text).unwrap(), settings);
    }

    #[test]
    fn inverted_clamps_are_rejected() {
        let err = RenderSettings::from_ron_str("(min_frame_time: 0.5, max_frame_time: 0.1)")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                field: "max_frame_time",
                reason: "must be >= min_frame_time",
            }
        );
    }

    #[test]
    fn malformed_text_is_a_format_error() {
        assert!(matches!(
            RenderSettings::from_ron_str("(clear_each_frame: maybe)"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            RenderSettings::load("/definitely/not/here.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
