//! Shared domain types.

pub mod id;

pub use id::{CommunicatorId, CoreObjectId, PluginId, StorageId, TransportId, UserRequestId};
