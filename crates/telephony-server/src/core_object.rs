//! Typed sub-entities owned by a plugin (modems, SIM slots, network...).

use std::collections::BTreeMap;
use std::sync::RwLock;

use telephony_core::types::{CoreObjectId, PluginId};

/// A typed object published by a plugin with a string property table.
#[derive(Debug)]
pub struct CoreObject {
    id: CoreObjectId,
    kind: String,
    plugin: PluginId,
    properties: RwLock<BTreeMap<String, String>>,
}

impl CoreObject {
    /// Creates an empty core object of the given type tag.
    pub fn new(kind: impl Into<String>, plugin: PluginId) -> Self {
        Self {
            id: CoreObjectId::new(),
            kind: kind.into(),
            plugin,
            properties: RwLock::new(BTreeMap::new()),
        }
    }

    /// Object identity.
    pub fn id(&self) -> CoreObjectId {
        self.id
    }

    /// Type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Owning plugin.
    pub fn plugin(&self) -> PluginId {
        self.plugin
    }

    /// Sets a property, returning the previous value.
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let mut props = self.properties.write().unwrap_or_else(|e| e.into_inner());
        props.insert(key.into(), value.into())
    }

    /// Looks up one property.
    pub fn property(&self, key: &str) -> Option<String> {
        let props = self.properties.read().unwrap_or_else(|e| e.into_inner());
        props.get(key).cloned()
    }

    /// Snapshot of all properties, ordered by key.
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.properties
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
