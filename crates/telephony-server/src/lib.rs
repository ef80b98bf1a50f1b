//! # telephony-server
//!
//! The shared runtime registry (the "server"). It owns, in insertion order:
//!
//! - plugin records wrapping loaded modules
//! - storages
//! - communicators
//! - transports and their pending-request queues
//!
//! Startup code only appends; the introspection monitor only reads.
//! Collections are guarded by short-lived `RwLock`s and every accessor
//! returns a cloned snapshot, so readers never hold a lock while rendering.

pub mod communicator;
pub mod core_object;
pub mod module;
pub mod plugin;
pub mod queue;
pub mod server;
pub mod storage;
pub mod transport;
pub mod user_data;

pub use communicator::Communicator;
pub use core_object::CoreObject;
pub use module::{Module, ModuleError};
pub use plugin::{Plugin, PluginState};
pub use queue::{PendingQueue, PendingRequest, UserRequest};
pub use server::Server;
pub use storage::Storage;
pub use transport::Transport;
pub use user_data::{ForeignPointer, UserData};
