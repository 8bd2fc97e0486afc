//! In-memory category graph.
//!
//! Categories reference each other by id; the graph formed by `parents` links
//! must be acyclic. [`CategoryMetadata::validate`] checks both properties and
//! is run by the recognizer builder.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use tracing::debug;

use super::category::{Category, CategoryType};
use super::known::KnownCategory;
use crate::error::{ErrorContext, Result, SemanticError};

/// Maps category ids to their descriptors.
#[derive(Debug, Clone, Default)]
pub struct CategoryMetadata {
    categories: HashMap<String, Category>,
}

impl CategoryMetadata {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of categories. Later duplicates win.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut metadata = Self::new();
        for category in categories {
            metadata.insert(category);
        }
        metadata
    }

    /// Parses a JSON array of categories.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Ok(Self::from_categories(categories))
    }

    /// Reads a JSON array of categories from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading category metadata {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Inserts or replaces a category.
    pub fn insert(&mut self, category: Category) -> Option<Category> {
        self.categories.insert(category.id.clone(), category)
    }

    /// Returns the category with the given id.
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    /// True when the id is known and the category is not deleted.
    pub fn is_active(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| !c.deleted)
    }

    /// Resolved parents of a category. Dangling references are skipped.
    pub fn parents(&self, id: &str) -> Vec<&Category> {
        self.resolve(id, |c| &c.parents)
    }

    /// Resolved children of a category. Dangling references are skipped.
    pub fn children(&self, id: &str) -> Vec<&Category> {
        self.resolve(id, |c| &c.children)
    }

    fn resolve<'a>(&'a self, id: &str, links: impl Fn(&Category) -> &Vec<String>) -> Vec<&'a Category> {
        self.get(id)
            .map(|c| links(c).iter().filter_map(|l| self.get(l)).collect())
            .unwrap_or_default()
    }

    /// Replaces a shared category with a tenant-level version.
    pub fn apply_override(&mut self, mut category: Category) {
        category.modified = true;
        category.modified_at = Some(Utc::now());
        debug!(category = %category.id, "Applying category override");
        self.insert(category);
    }

    /// Marks a category deleted for this tenant. Returns false if unknown.
    pub fn mark_deleted(&mut self, id: &str) -> bool {
        match self.categories.get_mut(id) {
            Some(category) => {
                category.deleted = true;
                category.modified_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates over all categories in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Checks that references resolve and the parent graph is acyclic.
    pub fn validate(&self) -> Result<()> {
        for category in self.categories.values() {
            for link in category.parents.iter().chain(&category.children) {
                if !self.categories.contains_key(link) {
                    return Err(SemanticError::metadata(format!(
                        "category '{}' references unknown category '{link}'",
                        category.id
                    )));
                }
            }
        }

        // Three-colour DFS over parent links
        let mut done: HashSet<&str> = HashSet::new();
        for start in self.categories.keys() {
            if done.contains(start.as_str()) {
                continue;
            }
            let mut on_path: HashSet<&str> = HashSet::new();
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            on_path.insert(start.as_str());
            while let Some((id, next)) = stack.pop() {
                let parents = &self.categories[id].parents;
                if next < parents.len() {
                    stack.push((id, next + 1));
                    let parent = parents[next].as_str();
                    if on_path.contains(parent) {
                        return Err(SemanticError::metadata(format!(
                            "cycle in category hierarchy through '{parent}'"
                        )));
                    }
                    if !done.contains(parent) {
                        on_path.insert(parent);
                        stack.push((parent, 0));
                    }
                } else {
                    on_path.remove(id);
                    done.insert(id);
                }
            }
        }
        Ok(())
    }

    /// Catalog matching the built-in regex and dictionary definitions.
    ///
    /// Ids equal names. `PHONE` is a compound parent of the country phone
    /// categories; `ADDRESS_LINE` and `COMPANY` are keyword categories.
    pub fn builtin() -> Self {
        let mut categories: Vec<Category> = KnownCategory::ALL
            .iter()
            .map(|known| Category::new(known.name(), builtin_type(*known)))
            .collect();
        categories.push(Category::new("ADDRESS_LINE", CategoryType::Keyword));
        categories.push(Category::new("COMPANY", CategoryType::Keyword));

        for category in categories.iter_mut() {
            match category.id.as_str() {
                "US_PHONE" | "FR_PHONE" | "UK_PHONE" => category.parents.push("PHONE".to_string()),
                "PHONE" => {
                    category.children = vec![
                        "US_PHONE".to_string(),
                        "FR_PHONE".to_string(),
                        "UK_PHONE".to_string(),
                    ]
                }
                "ANSWER" | "GENDER" | "CIVILITY" | "US_STATE" => category.completeness = true,
                _ => {}
            }
        }
        Self::from_categories(categories)
    }
}

fn builtin_type(known: KnownCategory) -> CategoryType {
    match known {
        KnownCategory::Phone => CategoryType::Compound,
        KnownCategory::Email
        | KnownCategory::Url
        | KnownCategory::UsPhone
        | KnownCategory::FrPhone
        | KnownCategory::UkPhone
        | KnownCategory::UsSsn
        | KnownCategory::Sedol
        | KnownCategory::Iban
        | KnownCategory::CreditCard
        | KnownCategory::Ipv4Address
        | KnownCategory::Uuid => CategoryType::Regex,
        _ => CategoryType::Dictionary,
    }
}
