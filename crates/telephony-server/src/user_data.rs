//! Opaque user-data slots attached to plugins, communicators and transports.

use std::any::Any;
use std::sync::Arc;

/// Opaque value a module stores on one of its registry objects.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Raw pointer handed over by a native module through the C ABI.
///
/// The daemon never dereferences it; it is kept so the owning module can
/// read it back and so the monitor can print the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignPointer(pub usize);

/// Address shown for a user-data value.
///
/// Foreign pointers report the module's own address, everything else the
/// address of the shared allocation.
pub fn address_of(data: &UserData) -> usize {
    match data.downcast_ref::<ForeignPointer>() {
        Some(ptr) => ptr.0,
        None => Arc::as_ptr(data) as *const () as usize,
    }
}
