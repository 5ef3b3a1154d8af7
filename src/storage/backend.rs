use crate::core::error::StoreError;
use dashmap::DashMap;

/// Client-local key-value medium behind the persistence store
///
/// Values are whole encoded records: every `set` replaces the previous
/// value for that key.
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Bytes charged against the quota (key + value of every live entry)
    fn usage_bytes(&self) -> usize;
}

/// Live entries with optional quota accounting, shared by both backends
pub(crate) struct Entries {
    map: DashMap<String, String>,
    quota: Option<usize>,
}

impl Entries {
    pub(crate) fn new(quota: Option<usize>) -> Self {
        Self {
            map: DashMap::new(),
            quota,
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    /// Fail if storing `value` under `key` would overflow the quota
    pub(crate) fn check_quota(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let Some(quota) = self.quota else {
            return Ok(());
        };

        let replaced = self
            .map
            .get(key)
            .map(|entry| key.len() + entry.value().len())
            .unwrap_or(0);
        let required = self.usage_bytes() - replaced + key.len() + value.len();

        if required > quota {
            return Err(StoreError::QuotaExceeded { required, quota });
        }
        Ok(())
    }

    pub(crate) fn insert(&self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
    }

    pub(crate) fn remove(&self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn snapshot(&self) -> Vec<(String, String)> {
        self.map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub(crate) fn usage_bytes(&self) -> usize {
        self.map
            .iter()
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

/// Process-lifetime backend
pub struct MemoryBackend {
    entries: Entries,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: Entries::new(None),
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Entries::new(Some(quota_bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.check_quota(key, &value)?;
        self.entries.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn usage_bytes(&self) -> usize {
        self.entries.usage_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();

        backend.set("k", "v1".to_string()).unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v1"));

        backend.set("k", "v2".to_string()).unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(backend.len(), 1);

        backend.remove("k").unwrap();
        assert!(backend.get("k").unwrap().is_none());

        // Removing again is a no-op
        backend.remove("k").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_usage_counts_keys_and_values() {
        let backend = MemoryBackend::new();
        backend.set("abc", "12345".to_string()).unwrap();
        backend.set("de", "1".to_string()).unwrap();
        assert_eq!(backend.usage_bytes(), 3 + 5 + 2 + 1);
    }

    #[test]
    fn test_quota_exceeded() {
        let backend = MemoryBackend::with_quota(10);

        backend.set("key", "1234567".to_string()).unwrap();

        let err = backend.set("other", "x".to_string()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded { required: 16, quota: 10 }
        ));

        // The rejected write left nothing behind
        assert!(backend.get("other").unwrap().is_none());
    }

    #[test]
    fn test_quota_accounts_for_replaced_value() {
        let backend = MemoryBackend::with_quota(10);

        backend.set("key", "1234567".to_string()).unwrap();
        // Replacing the value frees the old bytes first
        backend.set("key", "7654321".to_string()).unwrap();
        assert_eq!(backend.get("key").unwrap().as_deref(), Some("7654321"));
    }
}
