//! String key-value stores backing the session cache and the persistent user state.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Best-effort string key-value store.
///
/// Reads never fail; an unreadable entry is reported as absent. Writes may fail
/// (quota, disk errors) and callers are expected to log and carry on.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn delete(&self, key: &str) -> Result<(), StoreError>;

    fn keys(&self) -> Vec<String>;
}
