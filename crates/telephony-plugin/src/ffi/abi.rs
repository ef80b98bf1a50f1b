//! FFI ABI definitions for native plugins.
//!
//! Every plugin library exports one static named [`DESCRIPTOR_SYMBOL`] with
//! the layout of [`PluginDefineDesc`]. Lifecycle callbacks that need to touch
//! their own registry record receive a [`PluginHandle`], valid only for the
//! duration of the call.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

/// Name of the exported descriptor symbol.
pub const DESCRIPTOR_SYMBOL: &[u8] = b"plugin_define_desc\0";

/// Revision of the [`PluginHandle`] callback table.
pub const HANDLE_ABI_VERSION: u32 = 1;

/// Pre-registration gate. `false` declines registration.
pub type LoadFn = unsafe extern "C" fn() -> bool;

/// Post-registration setup. `false` reports an initialization failure.
pub type InitFn = unsafe extern "C" fn(handle: *mut PluginHandle) -> bool;

/// Teardown hook.
pub type UnloadFn = unsafe extern "C" fn(handle: *mut PluginHandle);

/// The descriptor every plugin library exports.
#[repr(C)]
#[derive(Debug)]
pub struct PluginDefineDesc {
    /// Plugin name (null-terminated C string).
    pub name: *const c_char,
    /// Priority (lower = initialized first).
    pub priority: c_int,
    /// Plugin version.
    pub version: c_int,
    /// Optional load gate.
    pub load: Option<LoadFn>,
    /// Optional init callback.
    pub init: Option<InitFn>,
    /// Optional unload callback.
    pub unload: Option<UnloadFn>,
}

// Descriptors are immutable statics; the name pointer refers to static data.
unsafe impl Sync for PluginDefineDesc {}

/// Callback table handed to `init` and `unload`.
#[repr(C)]
pub struct PluginHandle {
    /// Always [`HANDLE_ABI_VERSION`].
    pub abi_version: u32,
    /// The daemon's record for this plugin. Opaque to the module.
    pub plugin: *const c_void,
    /// Stores a module-owned pointer on the record (`NULL` clears it).
    pub set_user_data: unsafe extern "C" fn(handle: *mut PluginHandle, data: *mut c_void),
    /// Returns the pointer stored with `set_user_data`, or `NULL`.
    pub get_user_data: unsafe extern "C" fn(handle: *mut PluginHandle) -> *mut c_void,
    /// Sets `key = value` on the plugin's core object of type `kind`,
    /// creating the object on first use.
    pub set_property: unsafe extern "C" fn(
        handle: *mut PluginHandle,
        kind: *const c_char,
        key: *const c_char,
        value: *const c_char,
    ) -> bool,
}
