//! Adapter from an exported C descriptor to the [`Module`] trait.
//!
//! This is the only place that dereferences descriptor pointers or calls
//! into plugin code.

use std::fmt;

use telephony_server::{Module, ModuleError, Plugin};

use crate::ffi::abi::{PluginDefineDesc, PluginHandle};
use crate::ffi::safety::c_str_to_string;

/// A module backed by a [`PluginDefineDesc`].
///
/// Owns the library the descriptor lives in; dropping the module closes the
/// library, after which the descriptor pointer is never touched again.
pub struct NativeModule {
    desc: *const PluginDefineDesc,
    name: String,
    version: i32,
    priority: i32,
    _library: Option<libloading::Library>,
}

// The descriptor is immutable and the library handle is thread-safe.
unsafe impl Send for NativeModule {}
unsafe impl Sync for NativeModule {}

impl NativeModule {
    /// Wraps a descriptor resolved from `library`.
    ///
    /// # Safety
    /// `desc` must be null or point to a descriptor that lives inside
    /// `library`.
    pub unsafe fn from_library(
        library: libloading::Library,
        desc: *const PluginDefineDesc,
    ) -> Result<Self, String> {
        unsafe { Self::from_raw(desc, Some(library)) }
    }

    /// Wraps a descriptor compiled into the daemon itself.
    pub fn from_static(desc: &'static PluginDefineDesc) -> Result<Self, String> {
        unsafe { Self::from_raw(desc, None) }
    }

    unsafe fn from_raw(
        desc: *const PluginDefineDesc,
        library: Option<libloading::Library>,
    ) -> Result<Self, String> {
        if desc.is_null() {
            return Err("descriptor symbol resolves to NULL".to_string());
        }
        let d = unsafe { &*desc };
        let name = unsafe { c_str_to_string(d.name) }
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "descriptor name is missing or not UTF-8".to_string())?;

        Ok(Self {
            desc,
            name,
            version: d.version,
            priority: d.priority,
            _library: library,
        })
    }

    fn descriptor(&self) -> &PluginDefineDesc {
        // Valid while `_library` is held, which is as long as `self`.
        unsafe { &*self.desc }
    }
}

impl Module for NativeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn load(&self) -> Result<(), ModuleError> {
        match self.descriptor().load {
            Some(load) if !unsafe { load() } => Err(ModuleError::new("load() returned false")),
            _ => Ok(()),
        }
    }

    fn init(&self, plugin: &Plugin) -> Result<(), ModuleError> {
        let Some(init) = self.descriptor().init else {
            return Ok(());
        };
        let mut handle = PluginHandle::for_plugin(plugin);
        if unsafe { init(&mut handle) } {
            Ok(())
        } else {
            Err(ModuleError::new("init() returned false"))
        }
    }

    fn unload(&self, plugin: &Plugin) {
        if let Some(unload) = self.descriptor().unload {
            let mut handle = PluginHandle::for_plugin(plugin);
            unsafe { unload(&mut handle) };
        }
    }
}

impl fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeModule")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("priority", &self.priority)
            .field("dynamic", &self._library.is_some())
            .finish()
    }
}
