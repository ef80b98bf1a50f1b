//! Lifecycle initializer: the second pass that runs every module's `init`.

use std::sync::Arc;

use tracing::{error, info};

use telephony_core::config::plugin::InitOrder;
use telephony_server::{Plugin, Server};

use crate::error::PluginError;

/// Outcome of one initializer pass.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Names of modules whose `init` succeeded.
    pub initialized: Vec<String>,
    /// Modules whose `init` failed. They remain registered.
    pub failed: Vec<PluginError>,
    /// Records skipped because `init` was already attempted.
    pub already_initialized: usize,
}

/// Runs `init` on every registered plugin exactly once.
///
/// The registry's collection is not reordered; with [`InitOrder::Priority`]
/// a snapshot is sorted by ascending priority, ties keeping registration
/// order. Failures are logged and do not stop the pass.
pub fn initialize_plugins(server: &Server, order: InitOrder) -> InitReport {
    let mut plugins: Vec<Arc<Plugin>> = server.plugins();
    if order == InitOrder::Priority {
        plugins.sort_by_key(|p| p.priority());
    }

    let mut report = InitReport::default();

    for plugin in plugins {
        match plugin.initialize() {
            None => report.already_initialized += 1,
            Some(Ok(())) => report.initialized.push(plugin.name().to_string()),
            Some(Err(e)) => {
                error!(
                    plugin = %plugin.name(),
                    file = %plugin.filename().display(),
                    error = %e,
                    "Plugin init failed"
                );
                report.failed.push(PluginError::InitFailed {
                    name: plugin.name().to_string(),
                    path: plugin.filename().to_path_buf(),
                    reason: e.reason,
                });
            }
        }
    }

    info!(
        initialized = report.initialized.len(),
        failed = report.failed.len(),
        "Plugin initialization complete"
    );

    report
}
