use crate::codec::pdf::{check_pdf_data_uri, DEFAULT_MAX_PDF_BYTES};
use crate::collections::query::{CatalogQuery, View};
use crate::collections::{load_or_seed, persist, Confirm, Removal};
use crate::core::error::{CollectionError, ValidationError};
use crate::models::course::{Course, CourseDraft, Level};
use crate::models::resource::{Resource, ResourceDraft};
use crate::storage::store::{Store, StoreKey};
use crate::utils::time::{current_timestamp_millis, next_id, today};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Entity kept in a `Catalog`: resources and courses
pub trait CatalogEntry: Clone + Serialize + DeserializeOwned {
    /// Form input accepted by `create` and `update`
    type Draft;

    const KEY: StoreKey;
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn created_at(&self) -> &str;
    fn is_visible(&self) -> bool;

    fn level(&self) -> Option<Level> {
        None
    }

    fn with_visibility(&self, visible: bool) -> Self;

    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    fn from_draft(id: i64, created_at: String, draft: Self::Draft) -> Self;
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

impl CatalogEntry for Resource {
    type Draft = ResourceDraft;

    const KEY: StoreKey = StoreKey::Resources;
    const KIND: &'static str = "resource";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn with_visibility(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    fn validate(draft: &ResourceDraft) -> Result<(), ValidationError> {
        require("title", &draft.title)?;
        require("description", &draft.description)
    }

    fn from_draft(id: i64, created_at: String, draft: ResourceDraft) -> Self {
        Self {
            id,
            title: draft.title,
            category: draft.category,
            description: draft.description,
            url: draft.url,
            visible: draft.visible,
            created_at,
        }
    }
}

impl CatalogEntry for Course {
    type Draft = CourseDraft;

    const KEY: StoreKey = StoreKey::Courses;
    const KIND: &'static str = "course";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn level(&self) -> Option<Level> {
        Some(self.level)
    }

    fn with_visibility(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    fn validate(draft: &CourseDraft) -> Result<(), ValidationError> {
        require("title", &draft.title)?;
        require("description", &draft.description)?;

        let attachments = [
            ("coursePdf", &draft.course_pdf),
            ("exercisePdf", &draft.exercise_pdf),
        ];
        for (field, attachment) in attachments {
            let Some(pdf) = attachment else {
                continue;
            };
            if let Err(e) = check_pdf_data_uri(&pdf.data, DEFAULT_MAX_PDF_BYTES) {
                warn!(field, file = %pdf.name, error = %e, "Attachment rejected");
                return Err(ValidationError::InvalidAttachment(field));
            }
        }
        Ok(())
    }

    fn from_draft(id: i64, created_at: String, draft: CourseDraft) -> Self {
        Self {
            id,
            title: draft.title,
            category: draft.category,
            level: draft.level,
            description: draft.description,
            course_pdf: draft.course_pdf,
            more_info_url: draft.more_info_url.filter(|url| !url.is_empty()),
            exercise_pdf: draft.exercise_pdf,
            exercise_visual_url: draft.exercise_visual_url.filter(|url| !url.is_empty()),
            visible: draft.visible,
            created_at,
        }
    }
}

/// Ordered, write-through collection of resources or courses
///
/// Every command recomputes the full collection, swaps it in, and saves the
/// whole snapshot once.
pub struct Catalog<E: CatalogEntry> {
    items: Vec<E>,
    store: Arc<Store>,
    last_id: i64,
}

pub type ResourceCatalog = Catalog<Resource>;
pub type CourseCatalog = Catalog<Course>;

impl<E: CatalogEntry> Catalog<E> {
    /// Load the stored collection; an absent record is an empty collection
    pub fn load(store: Arc<Store>) -> Self {
        let items = store.load::<Vec<E>>(E::KEY).unwrap_or_default();
        Self::from_items(store, items)
    }

    /// Load the stored collection, or persist and use `seed` when absent
    pub fn load_or_seed<F>(store: Arc<Store>, seed: F) -> Self
    where
        F: FnOnce() -> Vec<E>,
    {
        let items = load_or_seed(&store, E::KEY, seed);
        Self::from_items(store, items)
    }

    fn from_items(store: Arc<Store>, items: Vec<E>) -> Self {
        let last_id = items.iter().map(|entry| entry.id()).max().unwrap_or(0);
        Self {
            items,
            store,
            last_id,
        }
    }

    pub fn list(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.items.iter().find(|entry| entry.id() == id)
    }

    fn require_existing(&self, id: i64) -> Result<&E, CollectionError> {
        self.get(id)
            .ok_or_else(|| CollectionError::not_found(E::KIND, id))
    }

    fn commit(&mut self, next: Vec<E>) -> bool {
        self.items = next;
        persist(&self.store, E::KEY, &self.items)
    }

    /// Append a new entry with a fresh id and today's date
    pub fn create(&mut self, draft: E::Draft) -> Result<E, CollectionError> {
        E::validate(&draft)?;

        let id = next_id(self.last_id, current_timestamp_millis()).ok_or(
            CollectionError::IdsExhausted {
                kind: E::KIND,
                last: self.last_id,
            },
        )?;
        let entry = E::from_draft(id, today(), draft);

        let next = self
            .items
            .iter()
            .cloned()
            .chain(std::iter::once(entry.clone()))
            .collect();
        self.last_id = id;
        self.commit(next);

        info!(kind = E::KIND, id, title = entry.title(), "Entry created");
        Ok(entry)
    }

    /// Replace every field except `id` and `createdAt`
    pub fn update(&mut self, id: i64, draft: E::Draft) -> Result<E, CollectionError> {
        let created_at = self.require_existing(id)?.created_at().to_string();
        E::validate(&draft)?;

        let updated = E::from_draft(id, created_at, draft);
        let next = self
            .items
            .iter()
            .map(|entry| {
                if entry.id() == id {
                    updated.clone()
                } else {
                    entry.clone()
                }
            })
            .collect();
        self.commit(next);

        info!(kind = E::KIND, id, "Entry updated");
        Ok(updated)
    }

    /// Remove the entry after the caller confirms
    pub fn delete(&mut self, id: i64, confirm: &impl Confirm) -> Result<Removal<E>, CollectionError> {
        let existing = self.require_existing(id)?.clone();

        let prompt = format!("Delete {} \"{}\"?", E::KIND, existing.title());
        if !confirm.confirm(&prompt) {
            info!(kind = E::KIND, id, "Deletion declined");
            return Ok(Removal::Declined);
        }

        let next = self
            .items
            .iter()
            .filter(|entry| entry.id() != id)
            .cloned()
            .collect();
        self.commit(next);

        info!(kind = E::KIND, id, "Entry deleted");
        Ok(Removal::Removed(existing))
    }

    pub fn set_visibility(&mut self, id: i64, visible: bool) -> Result<E, CollectionError> {
        self.require_existing(id)?;

        let next: Vec<E> = self
            .items
            .iter()
            .map(|entry| {
                if entry.id() == id {
                    entry.with_visibility(visible)
                } else {
                    entry.clone()
                }
            })
            .collect();
        let updated = next
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
            .ok_or_else(|| CollectionError::not_found(E::KIND, id))?;
        self.commit(next);

        info!(kind = E::KIND, id, visible, "Visibility changed");
        Ok(updated)
    }

    pub fn toggle_visibility(&mut self, id: i64) -> Result<E, CollectionError> {
        let visible = self.require_existing(id)?.is_visible();
        self.set_visibility(id, !visible)
    }

    pub fn filter<P>(&self, predicate: P) -> View<'_, E, P>
    where
        P: Fn(&E) -> bool,
    {
        View::new(&self.items, predicate)
    }

    pub fn query(&self, query: &CatalogQuery) -> View<'_, E, impl Fn(&E) -> bool> {
        let query = query.clone();
        View::new(&self.items, move |entry: &E| query.matches(entry))
    }

    /// Entries visitors may see
    pub fn public(&self) -> View<'_, E, fn(&E) -> bool> {
        let visible: fn(&E) -> bool = |entry| entry.is_visible();
        View::new(&self.items, visible)
    }
}
