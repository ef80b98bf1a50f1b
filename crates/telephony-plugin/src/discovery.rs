//! Discovery walker: scans the plugin directory and registers modules.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use telephony_core::config::plugin::PluginConfig;
use telephony_server::{Plugin, Server};

use crate::error::PluginError;
use crate::loader::{DynamicLoader, LoadGate};

/// What discovery does with a module that validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Run the load gate and register accepted modules.
    Register,
    /// Open and validate, then close again. The registry is never touched.
    DryRun,
}

/// File-name convention for installable modules.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    extension: String,
    excluded_prefix: String,
}

impl CandidateFilter {
    /// Creates a filter accepting `*.{extension}` files that do not start
    /// with `excluded_prefix`.
    pub fn new(extension: impl Into<String>, excluded_prefix: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            excluded_prefix: excluded_prefix.into(),
        }
    }

    /// Builds the filter from configuration.
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(&config.extension, &config.excluded_prefix)
    }

    /// Whether `file_name` names an installable module.
    pub fn accepts(&self, file_name: &str) -> bool {
        if !self.excluded_prefix.is_empty() && file_name.starts_with(&self.excluded_prefix) {
            return false;
        }
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::from_config(&PluginConfig::default())
    }
}

/// Why a directory entry did not become a plugin.
#[derive(Debug)]
pub enum SkipReason {
    /// The file name does not follow the module naming convention.
    NotACandidate,
    /// The directory entry could not be read.
    Unreadable(std::io::Error),
    /// The file name is not valid UTF-8.
    InvalidName,
    /// The loader rejected the candidate.
    Failed(PluginError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotACandidate => write!(f, "not a plugin file"),
            Self::Unreadable(e) => write!(f, "unreadable entry: {e}"),
            Self::InvalidName => write!(f, "file name is not valid UTF-8"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// One skipped directory entry.
#[derive(Debug)]
pub struct SkippedEntry {
    /// Path of the entry.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of one discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Files registered as plugins, in registration order.
    pub registered: Vec<PathBuf>,
    /// Files that validated during a dry run.
    pub validated: Vec<PathBuf>,
    /// Entries that were skipped. Unreadable entries come first, then
    /// everything else in file-name order.
    pub skipped: Vec<SkippedEntry>,
}

impl DiscoveryReport {
    /// Skips caused by loader failures (not by the naming filter).
    pub fn failures(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Failed(_)))
    }
}

/// Walks a directory and drives the loader over every candidate.
#[derive(Debug)]
pub struct DiscoveryWalker {
    loader: DynamicLoader,
    filter: CandidateFilter,
}

impl DiscoveryWalker {
    /// Creates a walker.
    pub fn new(loader: DynamicLoader, filter: CandidateFilter) -> Self {
        Self { loader, filter }
    }

    /// Scans `dir`.
    ///
    /// Entries are processed in file-name order. Only an unreadable
    /// directory fails the pass; per-entry problems are logged and recorded
    /// in the report.
    pub fn walk(
        &self,
        server: &Arc<Server>,
        dir: &Path,
        mode: DiscoveryMode,
    ) -> Result<DiscoveryReport, PluginError> {
        let entries = std::fs::read_dir(dir).map_err(|source| PluginError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut report = DiscoveryReport::default();
        let mut names = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                    report.skipped.push(SkippedEntry {
                        path: dir.to_path_buf(),
                        reason: SkipReason::Unreadable(e),
                    });
                    continue;
                }
            };
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    let path = dir.join(raw);
                    warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
                    report.skipped.push(SkippedEntry {
                        path,
                        reason: SkipReason::InvalidName,
                    });
                }
            }
        }
        names.sort();

        for name in names {
            let path = dir.join(&name);

            if !self.filter.accepts(&name) {
                debug!(path = %path.display(), "Skipping non-plugin entry");
                report.skipped.push(SkippedEntry {
                    path,
                    reason: SkipReason::NotACandidate,
                });
                continue;
            }

            let gate = match mode {
                DiscoveryMode::Register => LoadGate::Run,
                DiscoveryMode::DryRun => LoadGate::Skip,
            };

            let module = match self.loader.load(&path, gate) {
                Ok(module) => module,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping plugin");
                    report.skipped.push(SkippedEntry {
                        path,
                        reason: SkipReason::Failed(e),
                    });
                    continue;
                }
            };

            match mode {
                DiscoveryMode::DryRun => {
                    info!(path = %path.display(), name = %module.name(), "Plugin load test passed");
                    drop(module);
                    report.validated.push(path);
                }
                DiscoveryMode::Register => {
                    let plugin = Plugin::new(server, module, path.clone());
                    server.add_plugin(Arc::new(plugin));
                    info!(path = %path.display(), "Plugin added");
                    report.registered.push(path);
                }
            }
        }

        Ok(report)
    }
}
