//! Introspection monitor configuration.

use serde::{Deserialize, Serialize};

/// Signal-triggered introspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether `SIGUSR1` requests a registry dump.
    #[serde(default = "default_true")]
    pub dump_on_signal: bool,
    /// Whether `SIGHUP`/`SIGPIPE` are intercepted and logged.
    #[serde(default = "default_true")]
    pub log_diagnostic_signals: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dump_on_signal: true,
            log_diagnostic_signals: true,
        }
    }
}

fn default_true() -> bool {
    true
}
