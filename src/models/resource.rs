use serde::{Deserialize, Serialize};

/// Admin-curated reference entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    /// Category name, not re-validated once stored
    pub category: String,
    pub description: String,
    /// External link, empty when the resource has none
    #[serde(default)]
    pub url: String,
    pub visible: bool,
    /// YYYY-MM-DD
    pub created_at: String,
}

/// Form input for creating or replacing a resource
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub url: String,
    pub visible: bool,
}

impl Resource {
    pub fn link(&self) -> Option<&str> {
        if self.url.is_empty() {
            None
        } else {
            Some(&self.url)
        }
    }
}

impl From<&Resource> for ResourceDraft {
    fn from(resource: &Resource) -> Self {
        Self {
            title: resource.title.clone(),
            category: resource.category.clone(),
            description: resource.description.clone(),
            url: resource.url.clone(),
            visible: resource.visible,
        }
    }
}
