//! Plugin record: one registered module and everything it owns.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, Weak};

use telephony_core::types::PluginId;

use crate::core_object::CoreObject;
use crate::module::{Module, ModuleError};
use crate::server::Server;
use crate::user_data::{self, UserData};

/// Lifecycle state of a plugin record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Registered, `init` not yet attempted.
    Registered,
    /// `init` is running.
    Initializing,
    /// `init` returned success (or the module has none).
    Initialized,
    /// `init` returned failure; the record stays registered.
    InitFailed,
    /// `unload` ran during teardown.
    Unloaded,
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Initializing => write!(f, "initializing"),
            Self::Initialized => write!(f, "initialized"),
            Self::InitFailed => write!(f, "init-failed"),
            Self::Unloaded => write!(f, "unloaded"),
        }
    }
}

/// A registered module.
///
/// Owns the module (and with it the loaded library) for the lifetime of the
/// record. Only the user-data slot, the core objects and the lifecycle state
/// change after registration.
pub struct Plugin {
    id: PluginId,
    filename: PathBuf,
    server: Weak<Server>,
    state: Mutex<PluginState>,
    user_data: RwLock<Option<UserData>>,
    objects: RwLock<Vec<Arc<CoreObject>>>,
    // Dropped last: values above may point into the module's library.
    module: Box<dyn Module>,
}

impl Plugin {
    /// Wraps a loaded module into a new record bound to `server`.
    pub fn new(server: &Arc<Server>, module: Box<dyn Module>, filename: impl Into<PathBuf>) -> Self {
        Self {
            id: PluginId::new(),
            filename: filename.into(),
            server: Arc::downgrade(server),
            state: Mutex::new(PluginState::Registered),
            user_data: RwLock::new(None),
            objects: RwLock::new(Vec::new()),
            module,
        }
    }

    /// Record identity.
    pub fn id(&self) -> PluginId {
        self.id
    }

    /// The wrapped module.
    pub fn module(&self) -> &dyn Module {
        self.module.as_ref()
    }

    /// Declared module name.
    pub fn name(&self) -> &str {
        self.module.name()
    }

    /// Declared priority.
    pub fn priority(&self) -> i32 {
        self.module.priority()
    }

    /// Resolved filename the module was loaded from.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// The owning server, if it is still alive.
    pub fn server(&self) -> Option<Arc<Server>> {
        self.server.upgrade()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PluginState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs the module's `init` callback unless it was already attempted.
    ///
    /// Returns `None` when the record was not in the `Registered` state, so
    /// a record can never be initialized twice.
    pub fn initialize(&self) -> Option<Result<(), ModuleError>> {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if *state != PluginState::Registered {
                return None;
            }
            *state = PluginState::Initializing;
        }

        let result = self.module.init(self);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = if result.is_ok() {
            PluginState::Initialized
        } else {
            PluginState::InitFailed
        };
        Some(result)
    }

    /// Runs the module's `unload` callback once.
    pub fn unload(&self) -> bool {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if *state == PluginState::Unloaded {
                return false;
            }
            *state = PluginState::Unloaded;
        }
        self.module.unload(self);
        true
    }

    /// Replaces the user-data slot.
    pub fn set_user_data(&self, data: Option<UserData>) {
        *self.user_data.write().unwrap_or_else(|e| e.into_inner()) = data;
    }

    /// Current user data.
    pub fn user_data(&self) -> Option<UserData> {
        self.user_data
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Address of the user data, for diagnostics.
    pub fn user_data_addr(&self) -> Option<usize> {
        self.user_data().as_ref().map(user_data::address_of)
    }

    /// Publishes a new core object of the given type.
    pub fn add_core_object(&self, kind: impl Into<String>) -> Arc<CoreObject> {
        let object = Arc::new(CoreObject::new(kind, self.id));
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&object));
        object
    }

    /// First core object of the given type.
    pub fn core_object(&self, kind: &str) -> Option<Arc<CoreObject>> {
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|o| o.kind() == kind)
            .cloned()
    }

    /// Snapshot of all core objects in publication order.
    pub fn core_objects(&self) -> Vec<Arc<CoreObject>> {
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("id", &self.id)
            .field("name", &self.module.name())
            .field("filename", &self.filename)
            .field("state", &self.state())
            .finish()
    }
}
