//! Storage handles registered by plugins.

use telephony_core::types::StorageId;

/// A named key/value storage backend.
#[derive(Debug)]
pub struct Storage {
    id: StorageId,
    name: String,
}

impl Storage {
    /// Creates a storage handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StorageId::new(),
            name: name.into(),
        }
    }

    /// Storage identity.
    pub fn id(&self) -> StorageId {
        self.id
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
