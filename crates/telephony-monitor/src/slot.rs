//! Process-wide handle to the active registry.

use std::sync::{Arc, RwLock};

use telephony_server::Server;

/// Lifecycle-scoped slot holding the active server.
///
/// Installed once startup created the registry, cleared once at shutdown.
/// Readers must treat an empty slot as "nothing to do": triggers can arrive
/// before the registry exists or after it was released.
#[derive(Debug)]
pub struct ServerSlot {
    inner: RwLock<Option<Arc<Server>>>,
}

/// The slot used by the daemon binary.
pub static ACTIVE_SERVER: ServerSlot = ServerSlot::new();

impl ServerSlot {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Publishes `server`, replacing any previous one.
    pub fn install(&self, server: Arc<Server>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(server);
    }

    /// The active server, if any.
    pub fn current(&self) -> Option<Arc<Server>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Takes the server out of the slot. Later calls return `None`.
    pub fn release(&self) -> Option<Arc<Server>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl Default for ServerSlot {
    fn default() -> Self {
        Self::new()
    }
}
