// Application state (AppState)

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::gate::AuthGate;
use crate::codec::pdf::{PdfCodec, UploadedFile};
use crate::collections::catalog::{Catalog, CourseCatalog, ResourceCatalog};
use crate::collections::categories::CategorySet;
use crate::collections::users::UserDirectory;
use crate::core::config::Config;
use crate::core::error::{CollectionError, FileError, ValidationError};
use crate::core::startup::{default_categories, default_resources, default_users, open_store};
use crate::models::course::PdfAttachment;
use crate::models::resource::{Resource, ResourceDraft};
use crate::storage::store::Store;

/// Counters shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_resources: usize,
    pub visible_resources: usize,
    pub total_users: usize,
    pub total_categories: usize,
    pub total_courses: usize,
    pub visible_courses: usize,
}

/// Every collection manager wired to one shared store
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub resources: ResourceCatalog,
    pub courses: CourseCatalog,
    pub categories: CategorySet,
    pub users: UserDirectory,
    pub auth: AuthGate,
    pub pdf_codec: PdfCodec,
}

impl AppState {
    /// Open the configured store and load every collection
    pub fn open(config: Config) -> Result<Self> {
        let store = open_store(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<Store>) -> Self {
        let config = Arc::new(config);

        let (resources, categories, users) = if config.seed.defaults {
            (
                Catalog::load_or_seed(Arc::clone(&store), default_resources),
                CategorySet::load_or_seed(Arc::clone(&store), default_categories),
                UserDirectory::load_or_seed(&store, default_users),
            )
        } else {
            (
                Catalog::load(Arc::clone(&store)),
                CategorySet::load(Arc::clone(&store)),
                UserDirectory::load(&store),
            )
        };

        let courses = Catalog::load(Arc::clone(&store));
        let auth = AuthGate::new(Arc::clone(&store), config.auth.clone());
        let pdf_codec = PdfCodec::new(config.uploads.max_pdf_bytes);

        let state = Self {
            config,
            store,
            resources,
            courses,
            categories,
            users,
            auth,
            pdf_codec,
        };

        info!(
            resources = state.resources.len(),
            courses = state.courses.len(),
            categories = state.categories.len(),
            users = state.users.len(),
            "Collections loaded"
        );

        state
    }

    fn require_category(&self, name: &str) -> Result<(), CollectionError> {
        if !self.categories.contains(name) {
            return Err(ValidationError::UnknownCategory(name.to_string()).into());
        }
        Ok(())
    }

    /// Create a resource whose category must exist
    pub fn create_resource(&mut self, draft: ResourceDraft) -> Result<Resource, CollectionError> {
        self.require_category(&draft.category)?;
        self.resources.create(draft)
    }

    pub fn update_resource(
        &mut self,
        id: i64,
        draft: ResourceDraft,
    ) -> Result<Resource, CollectionError> {
        self.require_category(&draft.category)?;
        self.resources.update(id, draft)
    }

    pub async fn attach_pdf(&self, file: &UploadedFile) -> Result<PdfAttachment, FileError> {
        self.pdf_codec.encode(file).await
    }

    /// Resources still pointing at a category that has been removed
    pub fn dangling_resources(&self) -> Vec<&Resource> {
        self.resources
            .list()
            .iter()
            .filter(|resource| !self.categories.contains(&resource.category))
            .collect()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_resources: self.resources.len(),
            visible_resources: self.resources.public().count(),
            total_users: self.users.len(),
            total_categories: self.categories.len(),
            total_courses: self.courses.len(),
            visible_courses: self.courses.public().count(),
        }
    }

    /// Drop the four stored collections and empty the in-memory copies
    ///
    /// The session record is kept.
    pub fn clear_all(&mut self) -> bool {
        let cleared = self.store.clear();
        if !cleared {
            warn!("Some collections could not be removed from storage");
        }

        self.resources = Catalog::load(Arc::clone(&self.store));
        self.courses = Catalog::load(Arc::clone(&self.store));
        self.categories = CategorySet::load(Arc::clone(&self.store));
        self.users = UserDirectory::load(&self.store);

        info!(cleared, "Stored collections cleared");
        cleared
    }
}
