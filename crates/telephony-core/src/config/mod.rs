//! Daemon configuration schemas.
//!
//! The configuration is assembled with the `config` crate from an optional
//! `config/default.toml`, an optional explicit file, and environment
//! variables prefixed with `TELEPHONY__` (nested keys use `__`).

pub mod logging;
pub mod monitor;
pub mod plugin;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::monitor::MonitorConfig;
use self::plugin::PluginConfig;

use crate::result::AppResult;

/// Root daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Plugin discovery settings.
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Introspection monitor settings.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl DaemonConfig {
    /// Load the configuration.
    ///
    /// `config/default.toml` is optional. When `explicit` is given the file
    /// must exist. Environment variables win over both files.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("TELEPHONY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Override the plugin directory (positional command-line argument).
    pub fn with_plugin_directory(mut self, directory: Option<String>) -> Self {
        if let Some(dir) = directory {
            self.plugins.directory = dir;
        }
        self
    }
}
