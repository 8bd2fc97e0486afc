//! Combines shared, tenant and keyword indexes behind one lookup.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use super::CategoryLookup;
use crate::error::{Result, SemanticError};
use crate::index::tokenize;
use crate::model::Category;

/// Dictionary lookup over a shared dictionary, an optional tenant
/// dictionary and an optional keyword index.
///
/// Values with fewer than `max_tokens` words are looked up in the
/// dictionaries only. Longer values are also looked up in the keyword index.
#[derive(Debug, Clone)]
pub struct DictionaryFieldClassifier {
    shared: Arc<dyn CategoryLookup>,
    custom: Option<Arc<dyn CategoryLookup>>,
    keyword: Option<Arc<dyn CategoryLookup>>,
    max_tokens: usize,
}

impl DictionaryFieldClassifier {
    /// Creates a classifier over the shared dictionary only.
    pub fn new(shared: Arc<dyn CategoryLookup>, max_tokens: usize) -> Self {
        Self {
            shared,
            custom: None,
            keyword: None,
            max_tokens,
        }
    }

    /// Adds a tenant dictionary holding modified categories.
    pub fn with_custom(mut self, custom: Arc<dyn CategoryLookup>) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Adds a keyword index.
    pub fn with_keyword(mut self, keyword: Arc<dyn CategoryLookup>) -> Self {
        self.keyword = Some(keyword);
        self
    }

    fn lookups(&self) -> impl Iterator<Item = &Arc<dyn CategoryLookup>> {
        std::iter::once(&self.shared)
            .chain(self.custom.as_ref())
            .chain(self.keyword.as_ref())
    }
}

impl CategoryLookup for DictionaryFieldClassifier {
    fn init_index(&self) {
        self.lookups().for_each(|lookup| lookup.init_index());
    }

    fn close_index(&self) {
        self.lookups().for_each(|lookup| lookup.close_index());
    }

    /// Unions the hits of every consulted index. A failing index is logged
    /// and skipped; the call fails only when no index answered.
    fn find_categories(&self, value: &str) -> Result<BTreeSet<String>> {
        let mut consulted: Vec<(&str, &Arc<dyn CategoryLookup>)> = Vec::with_capacity(3);
        if let Some(custom) = &self.custom {
            consulted.push(("custom", custom));
        }
        consulted.push(("shared", &self.shared));
        if tokenize(value).len() >= self.max_tokens {
            if let Some(keyword) = &self.keyword {
                consulted.push(("keyword", keyword));
            }
        }

        let mut categories = BTreeSet::new();
        let mut first_error: Option<SemanticError> = None;
        let mut answered = false;
        for (role, lookup) in consulted {
            match lookup.find_categories(value) {
                Ok(found) => {
                    answered = true;
                    categories.extend(found);
                }
                Err(e) => {
                    warn!(index = role, error = %e, "Index lookup failed, using the other indexes");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !answered => Err(e),
            _ => Ok(categories),
        }
    }

    fn valid_categories(
        &self,
        value: &str,
        category: &Category,
        children: &[&Category],
    ) -> Result<bool> {
        match &self.custom {
            Some(custom) if category.modified => custom.valid_categories(value, category, children),
            _ => self.shared.valid_categories(value, category, children),
        }
    }
}
