use crate::collections::{load_or_seed, persist, Confirm, Removal};
use crate::core::error::CollectionError;
use crate::models::category::Category;
use crate::storage::store::{Store, StoreKey};
use std::sync::Arc;
use tracing::info;

/// Ordered set of category names
///
/// Removing a category does not touch resources or courses that still
/// reference it by name.
pub struct CategorySet {
    items: Vec<Category>,
    store: Arc<Store>,
}

impl CategorySet {
    pub fn load(store: Arc<Store>) -> Self {
        let items = store.load(StoreKey::Categories).unwrap_or_default();
        Self { items, store }
    }

    pub fn load_or_seed<F>(store: Arc<Store>, seed: F) -> Self
    where
        F: FnOnce() -> Vec<Category>,
    {
        let items = load_or_seed(&store, StoreKey::Categories, seed);
        Self { items, store }
    }

    pub fn list(&self) -> &[Category] {
        &self.items
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|category| category.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|category| category == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `name` unless it is empty or already present. Returns whether it was added.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }

        let next: Vec<Category> = self
            .items
            .iter()
            .cloned()
            .chain(std::iter::once(Category::new(name)))
            .collect();
        self.items = next;
        persist(&self.store, StoreKey::Categories, &self.items);

        info!(category = name, "Category added");
        true
    }

    pub fn remove(
        &mut self,
        name: &str,
        confirm: &impl Confirm,
    ) -> Result<Removal<Category>, CollectionError> {
        let existing = self
            .items
            .iter()
            .find(|category| *category == name)
            .cloned()
            .ok_or_else(|| CollectionError::not_found("category", name))?;

        if !confirm.confirm(&format!("Delete category \"{}\"?", name)) {
            return Ok(Removal::Declined);
        }

        let next: Vec<Category> = self
            .items
            .iter()
            .filter(|category| *category != name)
            .cloned()
            .collect();
        self.items = next;
        persist(&self.store, StoreKey::Categories, &self.items);

        info!(category = name, "Category removed");
        Ok(Removal::Removed(existing))
    }
}
