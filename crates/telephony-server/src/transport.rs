//! Transport handles: the hardware-abstraction endpoints modules talk through.

use std::sync::{Arc, RwLock};

use telephony_core::types::{PluginId, TransportId};

use crate::queue::PendingQueue;
use crate::user_data::{self, UserData};

/// A registered communication endpoint.
#[derive(Debug)]
pub struct Transport {
    id: TransportId,
    name: String,
    plugin: PluginId,
    user_data: RwLock<Option<UserData>>,
    queue: Option<Arc<PendingQueue>>,
}

impl Transport {
    /// Creates a transport without a pending-request queue.
    pub fn new(name: impl Into<String>, plugin: PluginId) -> Self {
        Self {
            id: TransportId::new(),
            name: name.into(),
            plugin,
            user_data: RwLock::new(None),
            queue: None,
        }
    }

    /// Attaches a fresh pending-request queue.
    pub fn with_queue(mut self) -> Self {
        self.queue = Some(Arc::new(PendingQueue::new()));
        self
    }

    /// Transport identity.
    pub fn id(&self) -> TransportId {
        self.id
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning plugin.
    pub fn plugin(&self) -> PluginId {
        self.plugin
    }

    /// The pending-request queue, if this transport has one.
    pub fn queue(&self) -> Option<&Arc<PendingQueue>> {
        self.queue.as_ref()
    }

    /// Replaces the user-data slot.
    pub fn set_user_data(&self, data: Option<UserData>) {
        *self.user_data.write().unwrap_or_else(|e| e.into_inner()) = data;
    }

    /// Address of the user data, for diagnostics.
    pub fn user_data_addr(&self) -> Option<usize> {
        self.user_data
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(user_data::address_of)
    }
}
