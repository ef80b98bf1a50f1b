//! # telephony-plugin
//!
//! Plugin framework for the telephony daemon. Provides:
//!
//! - The C descriptor contract native modules export
//! - A dynamic loader over `libloading` that adapts descriptors to the
//!   [`telephony_server::Module`] trait
//! - Directory discovery with a dry-run (load test) mode
//! - The lifecycle initializer that runs each module's `init` once

pub mod discovery;
pub mod error;
pub mod ffi;
pub mod lifecycle;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod native;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use discovery::{CandidateFilter, DiscoveryMode, DiscoveryReport, DiscoveryWalker};
pub use error::PluginError;
pub use lifecycle::{InitReport, initialize_plugins};
pub use loader::{DynamicLoader, LibraryOpener, LoadGate, ModuleOpener};
pub use manager::{PluginManager, StartupReport};
pub use native::NativeModule;
