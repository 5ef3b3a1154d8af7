use crate::core::error::StoreError;
use crate::storage::backend::{KvBackend, MemoryBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Named records held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Resources,
    Categories,
    Users,
    Courses,
    Session,
}

impl StoreKey {
    /// The four collection records removed by `Store::clear`
    pub const COLLECTIONS: [StoreKey; 4] = [
        StoreKey::Resources,
        StoreKey::Categories,
        StoreKey::Users,
        StoreKey::Courses,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            StoreKey::Resources => "resources",
            StoreKey::Categories => "categories",
            StoreKey::Users => "users",
            StoreKey::Courses => "courses",
            StoreKey::Session => "auth",
        }
    }
}

/// Namespaced, JSON-encoded persistence store
///
/// Failures never propagate: `save` and `clear` report `false`, `load`
/// reports `None`, and the cause is logged.
pub struct Store {
    backend: Box<dyn KvBackend>,
    namespace: String,
}

impl Store {
    pub fn new(backend: impl KvBackend + 'static, namespace: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            namespace: namespace.into(),
        }
    }

    /// Unbounded in-memory store under the default namespace
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(), "electricien")
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn full_key(&self, key: StoreKey) -> String {
        format!("{}_{}", self.namespace, key.suffix())
    }

    /// Encode `value` and replace the record under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> bool {
        let full_key = self.full_key(key);

        let result = serde_json::to_string(value)
            .map_err(StoreError::Encode)
            .and_then(|text| self.backend.set(&full_key, text));

        match result {
            Ok(()) => {
                debug!(key = %full_key, "Record saved");
                true
            }
            Err(e) => {
                warn!(key = %full_key, error = %e, "Failed to save record");
                false
            }
        }
    }

    /// Decode the record under `key`; absent or undecodable records yield `None`
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let full_key = self.full_key(key);

        let text = match self.backend.get(&full_key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = %full_key, "No stored record");
                return None;
            }
            Err(e) => {
                warn!(key = %full_key, error = %e, "Failed to read record");
                return None;
            }
        };

        match serde_json::from_str(&text).map_err(StoreError::Decode) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %full_key, error = %e, "Failed to decode record");
                None
            }
        }
    }

    pub fn contains(&self, key: StoreKey) -> bool {
        matches!(self.backend.get(&self.full_key(key)), Ok(Some(_)))
    }

    pub fn remove(&self, key: StoreKey) -> bool {
        let full_key = self.full_key(key);
        match self.backend.remove(&full_key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %full_key, error = %e, "Failed to remove record");
                false
            }
        }
    }

    /// Remove every collection record. The session record is left alone.
    pub fn clear(&self) -> bool {
        StoreKey::COLLECTIONS
            .iter()
            .fold(true, |ok, key| self.remove(*key) && ok)
    }

    pub fn usage_bytes(&self) -> usize {
        self.backend.usage_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::resource::Resource;
    use crate::storage::journal::JournalBackend;
    use tempfile::TempDir;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource {
                id: 1,
                title: "Norme NF C 15-100".to_string(),
                category: "Normes".to_string(),
                description: "Installations électriques basse tension".to_string(),
                url: "https://www.promotelec.com".to_string(),
                visible: true,
                created_at: "2025-01-01".to_string(),
            },
            Resource {
                id: 2,
                title: "Guide du calcul de section de câbles".to_string(),
                category: "Guides".to_string(),
                description: "Méthodologie pour dimensionner les conducteurs".to_string(),
                url: String::new(),
                visible: false,
                created_at: "2025-01-02".to_string(),
            },
        ]
    }

    #[test]
    fn test_save_then_load_is_deep_equal() {
        let store = Store::in_memory();
        let resources = sample_resources();

        assert!(store.save(StoreKey::Resources, &resources));

        let loaded: Vec<Resource> = store.load(StoreKey::Resources).unwrap();
        assert_eq!(loaded, resources);

        // Loading again yields the same value
        let again: Vec<Resource> = store.load(StoreKey::Resources).unwrap();
        assert_eq!(again, loaded);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let store = Store::in_memory();
        assert_eq!(store.full_key(StoreKey::Resources), "electricien_resources");
        assert_eq!(store.full_key(StoreKey::Categories), "electricien_categories");
        assert_eq!(store.full_key(StoreKey::Users), "electricien_users");
        assert_eq!(store.full_key(StoreKey::Courses), "electricien_courses");
        assert_eq!(store.full_key(StoreKey::Session), "electricien_auth");
    }

    #[test]
    fn test_absent_record_loads_as_none() {
        let store = Store::in_memory();
        assert!(store.load::<Vec<Category>>(StoreKey::Categories).is_none());
        assert!(!store.contains(StoreKey::Categories));
    }

    #[test]
    fn test_corrupt_record_loads_as_none() {
        let backend = MemoryBackend::new();
        backend
            .set("electricien_resources", "[{not json".to_string())
            .unwrap();
        let store = Store::new(backend, "electricien");

        assert!(store.contains(StoreKey::Resources));
        assert!(store.load::<Vec<Resource>>(StoreKey::Resources).is_none());
    }

    #[test]
    fn test_quota_failure_reports_false() {
        let store = Store::new(MemoryBackend::with_quota(64), "electricien");

        assert!(!store.save(StoreKey::Resources, &sample_resources()));
        assert!(store.load::<Vec<Resource>>(StoreKey::Resources).is_none());

        assert!(store.save(StoreKey::Categories, &vec![Category::new("Normes")]));
    }

    #[test]
    fn test_clear_removes_collections_but_not_session() {
        let store = Store::in_memory();
        store.save(StoreKey::Resources, &sample_resources());
        store.save(StoreKey::Categories, &vec![Category::new("Normes")]);
        store.save(StoreKey::Users, &Vec::<crate::models::user::User>::new());
        store.save(StoreKey::Courses, &Vec::<crate::models::course::Course>::new());
        store.save(StoreKey::Session, &serde_json::json!({"isAuthenticated": true}));

        assert!(store.clear());

        for key in StoreKey::COLLECTIONS {
            assert!(!store.contains(key), "{:?} should be cleared", key);
        }
        assert!(store.contains(StoreKey::Session));

        // Clearing an empty store still succeeds
        assert!(store.clear());
    }

    #[test]
    fn test_journal_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("electricien.journal");
        let resources = sample_resources();

        {
            let store = Store::new(JournalBackend::open(&path, None).unwrap(), "electricien");
            assert!(store.save(StoreKey::Resources, &resources));
        }

        let store = Store::new(JournalBackend::open(&path, None).unwrap(), "electricien");
        let loaded: Vec<Resource> = store.load(StoreKey::Resources).unwrap();
        assert_eq!(loaded, resources);
    }
}
