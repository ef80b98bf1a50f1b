//! In-memory module opener for development and testing.
//!
//! Simulates plugin libraries without building shared objects: each file
//! name maps to a scripted unit that either fails to open, lacks a
//! descriptor, or yields a module with scripted `load`/`init` outcomes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use telephony_server::{Module, ModuleError, Plugin};

use crate::error::PluginError;
use crate::loader::ModuleOpener;

/// Call counters shared between a scripted unit and the test.
#[derive(Debug, Default)]
pub struct CallCounts {
    /// Times the unit was opened.
    pub opened: AtomicUsize,
    /// Times a module instance was dropped (unit closed).
    pub closed: AtomicUsize,
    /// `load` invocations.
    pub load: AtomicUsize,
    /// `init` invocations.
    pub init: AtomicUsize,
    /// `unload` invocations.
    pub unload: AtomicUsize,
}

/// Scripted descriptor and callback outcomes.
#[derive(Debug, Clone)]
pub struct ModuleScript {
    name: String,
    version: i32,
    priority: i32,
    accept_load: bool,
    init_ok: bool,
    objects: Vec<(String, String, String)>,
}

impl ModuleScript {
    /// A module that accepts `load` and succeeds in `init`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            priority: 100,
            accept_load: true,
            init_ok: true,
            objects: Vec::new(),
        }
    }

    /// Sets the declared priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Makes `load` decline.
    pub fn decline_load(mut self) -> Self {
        self.accept_load = false;
        self
    }

    /// Makes `init` fail.
    pub fn fail_init(mut self) -> Self {
        self.init_ok = false;
        self
    }

    /// Publishes `key = value` on a core object of type `kind` during `init`.
    pub fn with_property(mut self, kind: &str, key: &str, value: &str) -> Self {
        self.objects
            .push((kind.to_string(), key.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug)]
enum MockUnit {
    Unopenable(String),
    MissingDescriptor,
    Module(ModuleScript),
}

/// A module instance produced by [`MockOpener`].
#[derive(Debug)]
pub struct ScriptedModule {
    script: ModuleScript,
    calls: Arc<CallCounts>,
    journal: Arc<Mutex<Vec<String>>>,
    unloads: Arc<Mutex<Vec<String>>>,
}

impl Module for ScriptedModule {
    fn name(&self) -> &str {
        &self.script.name
    }

    fn version(&self) -> i32 {
        self.script.version
    }

    fn priority(&self) -> i32 {
        self.script.priority
    }

    fn load(&self) -> Result<(), ModuleError> {
        self.calls.load.fetch_add(1, Ordering::SeqCst);
        if self.script.accept_load {
            Ok(())
        } else {
            Err(ModuleError::new("load() returned false"))
        }
    }

    fn init(&self, plugin: &Plugin) -> Result<(), ModuleError> {
        self.calls.init.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(self.script.name.clone());

        for (kind, key, value) in &self.script.objects {
            let object = plugin
                .core_object(kind)
                .unwrap_or_else(|| plugin.add_core_object(kind.clone()));
            object.set_property(key.clone(), value.clone());
        }

        if self.script.init_ok {
            Ok(())
        } else {
            Err(ModuleError::new("init() returned false"))
        }
    }

    fn unload(&self, _plugin: &Plugin) {
        self.calls.unload.fetch_add(1, Ordering::SeqCst);
        self.unloads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(self.script.name.clone());
    }
}

impl Drop for ScriptedModule {
    fn drop(&mut self) {
        self.calls.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Opener that serves scripted units keyed by file name.
#[derive(Debug, Default)]
pub struct MockOpener {
    units: HashMap<String, (MockUnit, Arc<CallCounts>)>,
    journal: Arc<Mutex<Vec<String>>>,
    unloads: Arc<Mutex<Vec<String>>>,
}

impl MockOpener {
    /// Creates an opener with no units; every open fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a module for `file_name`.
    pub fn with_module(self, file_name: &str, script: ModuleScript) -> Self {
        self.with_unit(file_name, MockUnit::Module(script))
    }

    /// Makes `file_name` fail to open.
    pub fn with_broken(self, file_name: &str, reason: &str) -> Self {
        self.with_unit(file_name, MockUnit::Unopenable(reason.to_string()))
    }

    /// Makes `file_name` open but lack the descriptor symbol.
    pub fn with_missing_descriptor(self, file_name: &str) -> Self {
        self.with_unit(file_name, MockUnit::MissingDescriptor)
    }

    fn with_unit(mut self, file_name: &str, unit: MockUnit) -> Self {
        self.units
            .insert(file_name.to_string(), (unit, Arc::new(CallCounts::default())));
        self
    }

    /// Counters for `file_name`. Unknown names get a detached counter.
    pub fn calls(&self, file_name: &str) -> Arc<CallCounts> {
        self.units
            .get(file_name)
            .map(|(_, calls)| Arc::clone(calls))
            .unwrap_or_default()
    }

    /// Module names in the order their `init` ran.
    pub fn journal(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.journal)
    }

    /// Module names in the order their `unload` ran.
    pub fn unload_journal(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.unloads)
    }
}

impl ModuleOpener for MockOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn Module>, PluginError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let Some((unit, calls)) = self.units.get(file_name) else {
            return Err(PluginError::Open {
                path: path.to_path_buf(),
                reason: "cannot open shared object file: No such file or directory".to_string(),
            });
        };

        match unit {
            MockUnit::Unopenable(reason) => Err(PluginError::Open {
                path: path.to_path_buf(),
                reason: reason.clone(),
            }),
            MockUnit::MissingDescriptor => {
                calls.opened.fetch_add(1, Ordering::SeqCst);
                calls.closed.fetch_add(1, Ordering::SeqCst);
                Err(PluginError::Contract {
                    path: path.to_path_buf(),
                    reason: "undefined symbol: plugin_define_desc".to_string(),
                })
            }
            MockUnit::Module(script) => {
                calls.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ScriptedModule {
                    script: script.clone(),
                    calls: Arc::clone(calls),
                    journal: Arc::clone(&self.journal),
                    unloads: Arc::clone(&self.unloads),
                }))
            }
        }
    }
}
