//! FFI safety wrappers: converts between FFI types and Rust types.

use std::ffi::{CStr, c_void};
use std::os::raw::c_char;
use std::sync::Arc;

use telephony_server::{ForeignPointer, Plugin};

use super::abi::{HANDLE_ABI_VERSION, PluginHandle};

/// Safely converts a C string pointer to a Rust `String`.
///
/// Returns `None` if the pointer is null or the bytes are not UTF-8.
///
/// # Safety
/// A non-null `ptr` must point to a null-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn c_str_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .ok()
        .map(|s| s.to_string())
}

impl PluginHandle {
    /// Builds a callback table bound to `plugin`.
    ///
    /// The table borrows `plugin` through a raw pointer; it must not outlive
    /// the callback it is passed to.
    pub fn for_plugin(plugin: &Plugin) -> Self {
        Self {
            abi_version: HANDLE_ABI_VERSION,
            plugin: plugin as *const Plugin as *const c_void,
            set_user_data: handle_set_user_data,
            get_user_data: handle_get_user_data,
            set_property: handle_set_property,
        }
    }
}

/// Recovers the plugin record from a handle.
unsafe fn plugin_from_handle<'a>(handle: *mut PluginHandle) -> Option<&'a Plugin> {
    if handle.is_null() {
        return None;
    }
    let raw = unsafe { (*handle).plugin } as *const Plugin;
    if raw.is_null() {
        return None;
    }
    Some(unsafe { &*raw })
}

unsafe extern "C" fn handle_set_user_data(handle: *mut PluginHandle, data: *mut c_void) {
    let Some(plugin) = (unsafe { plugin_from_handle(handle) }) else {
        return;
    };
    if data.is_null() {
        plugin.set_user_data(None);
    } else {
        plugin.set_user_data(Some(Arc::new(ForeignPointer(data as usize))));
    }
}

unsafe extern "C" fn handle_get_user_data(handle: *mut PluginHandle) -> *mut c_void {
    let Some(plugin) = (unsafe { plugin_from_handle(handle) }) else {
        return std::ptr::null_mut();
    };
    plugin
        .user_data()
        .and_then(|data| data.downcast_ref::<ForeignPointer>().map(|p| p.0))
        .map_or(std::ptr::null_mut(), |addr| addr as *mut c_void)
}

unsafe extern "C" fn handle_set_property(
    handle: *mut PluginHandle,
    kind: *const c_char,
    key: *const c_char,
    value: *const c_char,
) -> bool {
    let Some(plugin) = (unsafe { plugin_from_handle(handle) }) else {
        return false;
    };
    let strings = unsafe {
        (
            c_str_to_string(kind),
            c_str_to_string(key),
            c_str_to_string(value),
        )
    };
    let (Some(kind), Some(key), Some(value)) = strings else {
        return false;
    };

    let object = plugin
        .core_object(&kind)
        .unwrap_or_else(|| plugin.add_core_object(kind));
    object.set_property(key, value);
    true
}
