//! Shared test helpers for integration tests.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use telephony_core::config::plugin::PluginConfig;
use telephony_plugin::mock::{MockOpener, ModuleScript};
use telephony_plugin::{DynamicLoader, ModuleOpener, PluginManager};
use telephony_server::Server;

/// A plugin directory on disk plus a fresh registry.
pub struct TestDaemon {
    /// Temporary plugin directory
    pub dir: TempDir,
    /// Registry under test
    pub server: Arc<Server>,
}

impl TestDaemon {
    /// Creates a plugin directory containing empty files named `files`.
    pub fn with_files(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create plugin dir");
        for name in files {
            std::fs::write(dir.path().join(name), b"").expect("Failed to create plugin file");
        }
        Self {
            dir,
            server: Server::new(),
        }
    }

    /// Plugin directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Builds a manager with default configuration over `opener`.
pub fn manager(opener: impl ModuleOpener + 'static) -> PluginManager {
    PluginManager::with_loader(&PluginConfig::default(), DynamicLoader::new(Box::new(opener)))
}

/// The classic directory: two candidates, one declining `load`, plus two
/// entries the naming filter rejects.
pub fn scenario_opener() -> MockOpener {
    MockOpener::new()
        .with_module("modA.so", ModuleScript::new("modA"))
        .with_module("modB.so", ModuleScript::new("modB").decline_load())
        .with_module("libcore.so", ModuleScript::new("core"))
}

/// File names for [`scenario_opener`].
pub const SCENARIO_FILES: &[&str] = &["modA.so", "modB.so", "readme.txt", "libcore.so"];
