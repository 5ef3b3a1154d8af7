use serde::{Deserialize, Serialize};
use std::fmt;

/// Category name. Resources and courses reference categories by this value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Category {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Category {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_serialize_as_bare_strings() {
        let categories = vec![Category::new("Normes"), Category::new("Guides")];
        let json = serde_json::to_string(&categories).unwrap();
        assert_eq!(json, r#"["Normes","Guides"]"#);

        let parsed: Vec<Category> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, categories);
    }
}
