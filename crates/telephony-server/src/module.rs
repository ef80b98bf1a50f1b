//! Capability interface implemented by every loadable module.

use std::fmt;

use thiserror::Error;

use crate::plugin::Plugin;

/// Failure reported by a module callback.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct ModuleError {
    /// Human-readable reason supplied by the module.
    pub reason: String,
}

impl ModuleError {
    /// Create a new module error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A module the daemon can register.
///
/// Native shared objects are adapted to this trait by the plugin loader;
/// compiled-in modules implement it directly. `load` runs before the module
/// is registered and may decline registration; `init` runs once after all
/// modules of a discovery pass are registered.
pub trait Module: Send + Sync + fmt::Debug {
    /// Declared module name.
    fn name(&self) -> &str;

    /// Declared module version.
    fn version(&self) -> i32;

    /// Declared priority (lower = initialized first).
    fn priority(&self) -> i32;

    /// Pre-registration gate. `Err` means the module declines to be loaded.
    fn load(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Post-registration setup.
    fn init(&self, _plugin: &Plugin) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called once during daemon teardown.
    fn unload(&self, _plugin: &Plugin) {}
}
