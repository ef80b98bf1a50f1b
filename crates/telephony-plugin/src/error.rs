//! Error taxonomy for plugin discovery and lifecycle.
//!
//! Only [`PluginError::Directory`] aborts startup; every other variant is
//! per-candidate or per-module and is recorded, logged and absorbed.

use std::path::PathBuf;

use telephony_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised while discovering, loading or initializing plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin directory is missing or unreadable.
    #[error("Cannot read plugin directory '{path}': {source}")]
    Directory {
        /// The directory that was scanned.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The candidate could not be opened as a shared library.
    #[error("Failed to open '{path}': {reason}")]
    Open {
        /// Candidate path.
        path: PathBuf,
        /// Loader diagnostic.
        reason: String,
    },

    /// The library opened but does not satisfy the descriptor contract.
    #[error("'{path}' does not export a valid plugin descriptor: {reason}")]
    Contract {
        /// Candidate path.
        path: PathBuf,
        /// What was wrong with the descriptor.
        reason: String,
    },

    /// The module's load gate declined registration.
    #[error("Plugin '{name}' ({path}) declined to load: {reason}")]
    LoadRejected {
        /// Declared module name.
        name: String,
        /// Candidate path.
        path: PathBuf,
        /// Reason reported by the module.
        reason: String,
    },

    /// The module's init callback failed. The record stays registered.
    #[error("Plugin '{name}' ({path}) init failed: {reason}")]
    InitFailed {
        /// Declared module name.
        name: String,
        /// Resolved filename.
        path: PathBuf,
        /// Reason reported by the module.
        reason: String,
    },
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        let kind = match &err {
            PluginError::Directory { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Plugin,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
