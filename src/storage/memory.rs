use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStorage;
use crate::{Result, SakhaError};

/// In-memory key-value store.
///
/// With [`with_quota()`](Self::with_quota) the store rejects writes that would
/// push the total size of keys and values past the limit, the same way a
/// browser rejects writes once local storage is full.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `bytes` of keys plus values.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota_bytes: Some(bytes),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> SakhaError {
        SakhaError::Storage("memory storage lock poisoned".to_string())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;

        if let Some(limit) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(SakhaError::QuotaExceeded { needed, limit });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("absent").unwrap(), None);
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove_item("absent").is_ok());
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(8);
        let err = storage.set_item("key", "too long value").unwrap_err();
        assert!(matches!(err, SakhaError::QuotaExceeded { limit: 8, .. }));
        assert!(storage.is_empty());
    }

    #[test]
    fn quota_counts_replacement_once() {
        // "k" + "1234" = 5 bytes; overwriting must not count the old value.
        let storage = MemoryStorage::with_quota(5);
        storage.set_item("k", "1234").unwrap();
        storage.set_item("k", "5678").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("5678".to_string()));
        assert_eq!(storage.len(), 1);
    }
}
