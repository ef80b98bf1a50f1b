//! Plugin manager: runs discovery and the initializer in order.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use telephony_core::config::plugin::{InitOrder, PluginConfig};
use telephony_server::Server;

use crate::discovery::{CandidateFilter, DiscoveryMode, DiscoveryReport, DiscoveryWalker};
use crate::error::PluginError;
use crate::lifecycle::{InitReport, initialize_plugins};
use crate::loader::DynamicLoader;

/// Combined outcome of a startup pass.
#[derive(Debug)]
pub struct StartupReport {
    /// Discovery outcome.
    pub discovery: DiscoveryReport,
    /// Initializer outcome; `None` for dry runs.
    pub init: Option<InitReport>,
}

/// Drives plugin startup: discover, register, then initialize.
#[derive(Debug)]
pub struct PluginManager {
    walker: DiscoveryWalker,
    init_order: InitOrder,
}

impl PluginManager {
    /// Creates a manager loading real shared libraries.
    pub fn new(config: &PluginConfig) -> Self {
        Self::with_loader(config, DynamicLoader::native())
    }

    /// Creates a manager over a custom loader.
    pub fn with_loader(config: &PluginConfig, loader: DynamicLoader) -> Self {
        Self {
            walker: DiscoveryWalker::new(loader, CandidateFilter::from_config(config)),
            init_order: config.init_order,
        }
    }

    /// Loads every module in `dir`.
    ///
    /// In [`DiscoveryMode::DryRun`] nothing is registered and no `init` runs.
    /// Fails only if the directory cannot be read, in which case the
    /// initializer does not run either.
    pub fn start(
        &self,
        server: &Arc<Server>,
        dir: &Path,
        mode: DiscoveryMode,
    ) -> Result<StartupReport, PluginError> {
        info!(path = %dir.display(), mode = ?mode, "Loading plugins");

        let discovery = self.walker.walk(server, dir, mode)?;

        info!(
            registered = discovery.registered.len(),
            validated = discovery.validated.len(),
            skipped = discovery.skipped.len(),
            "Plugin discovery finished"
        );

        let init = match mode {
            DiscoveryMode::Register => Some(initialize_plugins(server, self.init_order)),
            DiscoveryMode::DryRun => None,
        };

        Ok(StartupReport { discovery, init })
    }
}
