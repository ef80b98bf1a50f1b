//! Dynamic loader: opens one candidate and hands back a validated module.
//!
//! Opening is delegated to a [`ModuleOpener`] so the discovery and lifecycle
//! logic can run against in-memory modules; [`LibraryOpener`] is the real
//! `libloading`-backed implementation.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use telephony_server::Module;

use crate::error::PluginError;
use crate::ffi::abi::{DESCRIPTOR_SYMBOL, PluginDefineDesc};
use crate::native::NativeModule;

/// Opens a candidate file and resolves its descriptor.
///
/// Implementations must not call the module's `load` gate.
pub trait ModuleOpener: Send + Sync {
    /// Opens `path`, returning the module on success.
    fn open(&self, path: &Path) -> Result<Box<dyn Module>, PluginError>;
}

/// Opens shared libraries with `libloading`.
#[derive(Debug, Default)]
pub struct LibraryOpener;

impl ModuleOpener for LibraryOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn Module>, PluginError> {
        // SAFETY: loading a library runs its constructors; the plugin
        // directory is trusted.
        let library = unsafe { libloading::Library::new(path) }.map_err(|e| PluginError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let desc = {
            let symbol = unsafe { library.get::<*const PluginDefineDesc>(DESCRIPTOR_SYMBOL) }
                .map_err(|e| PluginError::Contract {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            *symbol
        };

        let module = unsafe { NativeModule::from_library(library, desc) }.map_err(|reason| {
            PluginError::Contract {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        Ok(Box::new(module))
    }
}

/// Whether the loader runs the module's `load` gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadGate {
    /// Call `load` and reject the module if it declines.
    Run,
    /// Validate only; used by dry-run discovery.
    Skip,
}

/// Loads candidates through a [`ModuleOpener`].
pub struct DynamicLoader {
    opener: Box<dyn ModuleOpener>,
}

impl DynamicLoader {
    /// Creates a loader over the given opener.
    pub fn new(opener: Box<dyn ModuleOpener>) -> Self {
        Self { opener }
    }

    /// Creates a loader for real shared libraries.
    pub fn native() -> Self {
        Self::new(Box::new(LibraryOpener))
    }

    /// Opens `path`, validates its descriptor and, when `gate` is
    /// [`LoadGate::Run`], runs the `load` callback.
    ///
    /// Any failure drops the module, closing the unit before returning.
    pub fn load(&self, path: &Path, gate: LoadGate) -> Result<Box<dyn Module>, PluginError> {
        let module = self.opener.open(path)?;

        debug!(
            path = %path.display(),
            name = %module.name(),
            version = module.version(),
            priority = module.priority(),
            modified = %modified_at(path),
            "Plugin descriptor resolved"
        );

        if gate == LoadGate::Run {
            module.load().map_err(|e| PluginError::LoadRejected {
                name: module.name().to_string(),
                path: path.to_path_buf(),
                reason: e.reason,
            })?;
        }

        Ok(module)
    }
}

impl Default for DynamicLoader {
    fn default() -> Self {
        Self::native()
    }
}

impl std::fmt::Debug for DynamicLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLoader").finish()
    }
}

/// Modification time of `path`, for load diagnostics.
fn modified_at(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_else(|_| "unknown".to_string())
}
