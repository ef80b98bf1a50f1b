//! The runtime registry shared by the daemon and its modules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::communicator::Communicator;
use crate::plugin::Plugin;
use crate::storage::Storage;
use crate::transport::Transport;

/// Ordered collections of everything registered at runtime.
///
/// All collections preserve insertion order. Accessors return snapshots;
/// two snapshots taken one after the other may disagree when another thread
/// registers in between.
#[derive(Debug, Default)]
pub struct Server {
    plugins: RwLock<Vec<Arc<Plugin>>>,
    storages: RwLock<Vec<Arc<Storage>>>,
    communicators: RwLock<Vec<Arc<Communicator>>>,
    transports: RwLock<Vec<Arc<Transport>>>,
    shut_down: AtomicBool,
}

impl Server {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Appends a plugin record.
    pub fn add_plugin(&self, plugin: Arc<Plugin>) {
        debug!(plugin = %plugin.name(), id = %plugin.id(), "Plugin registered");
        self.plugins
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(plugin);
    }

    /// Snapshot of the plugin collection in registration order.
    pub fn plugins(&self) -> Vec<Arc<Plugin>> {
        self.plugins
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Finds a plugin by declared name.
    pub fn find_plugin(&self, name: &str) -> Option<Arc<Plugin>> {
        self.plugins
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    /// Appends a storage.
    pub fn add_storage(&self, storage: Arc<Storage>) {
        self.storages
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(storage);
    }

    /// Snapshot of the storages.
    pub fn storages(&self) -> Vec<Arc<Storage>> {
        self.storages
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Appends a communicator.
    pub fn add_communicator(&self, communicator: Arc<Communicator>) {
        self.communicators
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(communicator);
    }

    /// Snapshot of the communicators.
    pub fn communicators(&self) -> Vec<Arc<Communicator>> {
        self.communicators
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Appends a transport.
    pub fn add_transport(&self, transport: Arc<Transport>) {
        self.transports
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(transport);
    }

    /// Snapshot of the transports.
    pub fn transports(&self) -> Vec<Arc<Transport>> {
        self.transports
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether [`Server::shutdown`] already ran.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Unloads every plugin in reverse registration order and empties all
    /// collections. Only the first call has an effect.
    pub fn shutdown(&self) -> bool {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return false;
        }

        let plugins = std::mem::take(&mut *self.plugins.write().unwrap_or_else(|e| e.into_inner()));
        for plugin in plugins.iter().rev() {
            plugin.unload();
        }

        self.transports
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.communicators
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.storages
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();

        info!(plugins = plugins.len(), "Registry released");
        true
    }
}
