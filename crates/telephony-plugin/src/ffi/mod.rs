//! C ABI shared with native plugin libraries.

pub mod abi;
pub mod safety;

pub use abi::{DESCRIPTOR_SYMBOL, PluginDefineDesc, PluginHandle};
