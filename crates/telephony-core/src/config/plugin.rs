//! Plugin discovery configuration.

use serde::{Deserialize, Serialize};

/// Order in which registered plugins are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitOrder {
    /// Ascending descriptor priority; ties keep registration order.
    #[default]
    Priority,
    /// Registration order, which follows the sorted directory listing.
    Registration,
}

/// Plugin discovery and lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Directory containing plugin shared libraries.
    #[serde(default = "default_plugin_directory")]
    pub directory: String,
    /// File extension that marks a loadable unit (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,
    /// File-name prefix reserved for the daemon's own libraries.
    #[serde(default = "default_excluded_prefix")]
    pub excluded_prefix: String,
    /// Initialization order for the lifecycle pass.
    #[serde(default)]
    pub init_order: InitOrder,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            directory: default_plugin_directory(),
            extension: default_extension(),
            excluded_prefix: default_excluded_prefix(),
            init_order: InitOrder::default(),
        }
    }
}

fn default_plugin_directory() -> String {
    "/usr/lib/telephony/plugins/".to_string()
}

fn default_extension() -> String {
    "so".to_string()
}

fn default_excluded_prefix() -> String {
    "lib".to_string()
}
