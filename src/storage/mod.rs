//! Key-value storage behind the offline cache.
//!
//! The cache only ever needs three string operations, mirroring the browser's
//! local storage: read a record, write a record, remove a record. Anything
//! that can do those can back the cache.
//!
//! - [`MemoryStorage`]: process-local map with an optional byte quota.
//! - [`FileStorage`]: a single JSON file holding every record.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::Result;

/// Synchronous string key-value store.
///
/// Implementations handle their own interior mutability so a single store
/// can be shared behind an `Arc` by every caller.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
