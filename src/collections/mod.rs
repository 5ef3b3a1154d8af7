//! In-memory collections seeded from the store and written through on
//! every mutation.

pub mod catalog;
pub mod categories;
pub mod query;
pub mod users;

use crate::storage::store::{Store, StoreKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

/// Interactive yes/no prompt answered before destructive commands
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, for callers that already asked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        *self == Answer::Yes
    }
}

/// Outcome of a confirmed removal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal<T> {
    Removed(T),
    Declined,
}

impl<T> Removal<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, Removal::Removed(_))
    }
}

/// Load a collection, falling back to `seed` (persisted) when the record is absent
pub(crate) fn load_or_seed<T, F>(store: &Store, key: StoreKey, seed: F) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    if let Some(items) = store.load::<Vec<T>>(key) {
        return items;
    }

    let items = seed();
    if store.save(key, &items) {
        info!(key = key.suffix(), count = items.len(), "Seeded collection with defaults");
    } else {
        warn!(key = key.suffix(), "Failed to persist seeded collection");
    }
    items
}

/// Write a full collection snapshot, logging failures
pub(crate) fn persist<T: Serialize>(store: &Store, key: StoreKey, items: &[T]) -> bool {
    let saved = store.save(key, items);
    if !saved {
        warn!(
            key = key.suffix(),
            count = items.len(),
            "Collection change kept in memory but not persisted"
        );
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;

    #[test]
    fn test_closures_and_answers_confirm() {
        assert!(Answer::Yes.confirm("Delete?"));
        assert!(!Answer::No.confirm("Delete?"));

        let prompts = std::cell::RefCell::new(Vec::new());
        let recorder = |prompt: &str| {
            prompts.borrow_mut().push(prompt.to_string());
            false
        };
        assert!(!recorder.confirm("Delete category \"Normes\"?"));
        assert_eq!(prompts.borrow().len(), 1);
    }

    #[test]
    fn test_seed_applies_only_when_absent() {
        let store = Store::in_memory();

        let seeded: Vec<Category> =
            load_or_seed(&store, StoreKey::Categories, || vec![Category::new("Normes")]);
        assert_eq!(seeded, vec![Category::new("Normes")]);
        assert!(store.contains(StoreKey::Categories));

        // A stored (even empty) collection wins over the seed
        assert!(store.save(StoreKey::Categories, &Vec::<Category>::new()));
        let loaded: Vec<Category> =
            load_or_seed(&store, StoreKey::Categories, || vec![Category::new("Guides")]);
        assert!(loaded.is_empty());
    }
}
