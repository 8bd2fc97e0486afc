//! Category descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a category recognizes values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    /// Defined by a regular expression
    Regex,
    /// Defined by a closed set of reference values
    #[default]
    Dictionary,
    /// Defined by keywords that may appear inside longer values
    Keyword,
    /// Defined only through its child categories
    Compound,
}

/// A semantic category such as `EMAIL` or `CITY`.
///
/// Parents and children are referenced by id and resolved through
/// [`CategoryMetadata`](super::metadata::CategoryMetadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable technical identifier
    pub id: String,
    /// Name, also used for canonical ordering
    pub name: String,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Recognition mechanism
    #[serde(default, rename = "type")]
    pub category_type: CategoryType,
    /// Ids of parent categories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    /// Ids of child categories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Tenant-level override of a shared category
    #[serde(default)]
    pub modified: bool,
    /// Tenant-level deletion of a shared category
    #[serde(default)]
    pub deleted: bool,
    /// Whether the reference data is considered complete
    #[serde(default)]
    pub completeness: bool,
    /// Time of the last tenant modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a category whose id and name are equal.
    pub fn new(id: impl Into<String>, category_type: CategoryType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            label: None,
            description: None,
            category_type,
            parents: Vec::new(),
            children: Vec::new(),
            modified: false,
            deleted: false,
            completeness: false,
            modified_at: None,
        }
    }

    /// The implicit bucket for null and blank values.
    pub fn empty() -> Self {
        Self::new("", CategoryType::Compound)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a parent reference.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parents.push(parent_id.into());
        self
    }

    /// Adds a child reference.
    pub fn with_child(mut self, child_id: impl Into<String>) -> Self {
        self.children.push(child_id.into());
        self
    }

    /// Sets the completeness flag.
    pub fn with_completeness(mut self, complete: bool) -> Self {
        self.completeness = complete;
        self
    }

    /// Label if present, name otherwise.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// True for the implicit empty category.
    pub fn is_empty_category(&self) -> bool {
        self.id.is_empty()
    }

    /// True when the category has at least one parent.
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_label() {
        let category = Category::new("FR_COMMUNE", CategoryType::Dictionary);
        assert_eq!(category.display_name(), "FR_COMMUNE");

        let category = category.with_label("French Commune");
        assert_eq!(category.display_name(), "French Commune");
    }

    #[test]
    fn test_empty_category() {
        let empty = Category::empty();
        assert!(empty.is_empty_category());
        assert_eq!(empty.name, "");
        assert!(!empty.has_parents());
    }

    #[test]
    fn test_deserialize_minimal() {
        let category: Category = serde_json::from_str(
            r#"{"id": "a1", "name": "US_PHONE", "type": "regex", "parents": ["p1"]}"#,
        )
        .unwrap();
        assert_eq!(category.category_type, CategoryType::Regex);
        assert_eq!(category.parents, vec!["p1".to_string()]);
        assert!(!category.deleted);
        assert!(category.modified_at.is_none());
    }
}
