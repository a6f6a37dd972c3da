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

//! Global logger initialisation.

use std::sync::Once;

use env_logger::{Builder, Env, WriteStyle};

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax, e.g. `"info"` or
/// `"lumen_core=debug,lumen_infra=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit filter. When `None`, `RUST_LOG` is honoured and falls back to
    /// `default_level`.
    pub filter: Option<String>,
    /// Level used when neither `filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    /// ANSI colouring.
    pub write_style: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            default_level: log::LevelFilter::Info,
            write_style: WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// Only the first call has an effect. If another logger was installed
/// elsewhere, that logger is kept.
///
/// ## Returns
/// `true` if this call installed the logger.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let mut builder = match &config.filter {
            Some(filter) => {
                let mut builder = Builder::new();
                builder.parse_filters(filter);
                builder
            }
            None => Builder::from_env(
                Env::default().default_filter_or(config.default_level.as_str()),
            ),
        };
        builder.write_style(config.write_style);
        installed = builder.try_init().is_ok();
        if installed {
            log::debug!("Logging initialized.");
        }
    });
    installed
}
