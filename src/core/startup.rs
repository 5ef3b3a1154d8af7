use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::{BackendKind, StorageConfig};
use crate::models::category::Category;
use crate::models::resource::Resource;
use crate::models::user::{Role, Status, User};
use crate::storage::backend::MemoryBackend;
use crate::storage::journal::JournalBackend;
use crate::storage::store::Store;

/// Build the persistence store selected by configuration
pub fn open_store(config: &StorageConfig) -> Result<Arc<Store>> {
    let store = match config.backend {
        BackendKind::Memory => {
            let backend = match config.quota_bytes {
                Some(quota) => MemoryBackend::with_quota(quota),
                None => MemoryBackend::new(),
            };
            info!(namespace = %config.namespace, "Using in-memory storage");
            Store::new(backend, config.namespace.clone())
        }
        BackendKind::Journal => {
            let path = config
                .path
                .clone()
                .context("storage.path is required for the journal backend")?;

            let journal = JournalBackend::open(path.clone(), config.quota_bytes)
                .context(format!("Failed to open journal at '{}'", path.display()))?;

            // Startup is the one point where nothing else holds the journal
            if let Err(e) = journal.compact() {
                warn!(
                    path = %journal.path().display(),
                    error = %e,
                    "Journal compaction failed, keeping the existing journal"
                );
            }

            info!(
                path = %journal.path().display(),
                namespace = %config.namespace,
                "Using journal storage"
            );
            Store::new(journal, config.namespace.clone())
        }
    };

    Ok(Arc::new(store))
}

pub fn default_resources() -> Vec<Resource> {
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
            visible: true,
            created_at: "2025-01-02".to_string(),
        },
    ]
}

pub fn default_users() -> Vec<User> {
    vec![
        User::new(1, "Jean Dupont", "jean@example.com", Role::Admin, Status::Active),
        User::new(2, "Marie Martin", "marie@example.com", Role::User, Status::Active),
    ]
}

pub fn default_categories() -> Vec<Category> {
    ["Normes", "Guides", "Schémas", "Calculs", "Sécurité", "Vidéos"]
        .into_iter()
        .map(Category::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::StoreKey;
    use tempfile::TempDir;

    #[test]
    fn test_seed_resources_reference_seed_categories() {
        let categories = default_categories();
        for resource in default_resources() {
            assert!(categories.iter().any(|c| *c == resource.category.as_str()));
        }
    }

    #[test]
    fn test_open_memory_store() {
        let config = StorageConfig {
            backend: BackendKind::Memory,
            path: None,
            namespace: "test".to_string(),
            quota_bytes: Some(1024),
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.full_key(StoreKey::Users), "test_users");
    }

    #[test]
    fn test_open_journal_store_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: BackendKind::Journal,
            path: Some(temp_dir.path().join("electricien.journal")),
            namespace: "electricien".to_string(),
            quota_bytes: None,
        };

        {
            let store = open_store(&config).unwrap();
            assert!(store.save(StoreKey::Resources, &default_resources()));
        }

        let store = open_store(&config).unwrap();
        let loaded: Vec<Resource> = store.load(StoreKey::Resources).unwrap();
        assert_eq!(loaded, default_resources());
    }

    #[test]
    fn test_open_journal_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: BackendKind::Journal,
            path: Some(temp_dir.path().join("missing").join("electricien.journal")),
            namespace: "electricien".to_string(),
            quota_bytes: None,
        };
        assert!(open_store(&config).is_err());
    }
}
