//! Communicator handles: client-facing endpoints (IPC, D-Bus, ...).

use std::sync::RwLock;

use telephony_core::types::{CommunicatorId, PluginId};

use crate::user_data::{self, UserData};

/// A client-facing endpoint registered by a plugin.
#[derive(Debug)]
pub struct Communicator {
    id: CommunicatorId,
    name: String,
    plugin: Option<PluginId>,
    user_data: RwLock<Option<UserData>>,
}

impl Communicator {
    /// Creates a communicator owned by `plugin`.
    pub fn new(name: impl Into<String>, plugin: Option<PluginId>) -> Self {
        Self {
            id: CommunicatorId::new(),
            name: name.into(),
            plugin,
            user_data: RwLock::new(None),
        }
    }

    /// Communicator identity.
    pub fn id(&self) -> CommunicatorId {
        self.id
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning plugin.
    pub fn plugin(&self) -> Option<PluginId> {
        self.plugin
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
