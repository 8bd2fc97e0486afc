//! Per-column category inference over records.
//!
//! [`CategoryInferenceManager`] feeds each field of a record to the
//! recognizer of its column. Recognizers are created on first use from a
//! shared builder, so every column gets its own cache and counts.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::recognizer::{
    CategoryFrequency, CategoryRecognizer, CategoryRecognizerBuilder, DefaultCategoryRecognizer,
};

/// Category statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticCategory {
    /// Category id; empty for the null/blank bucket
    pub id: String,
    /// Category name
    pub name: String,
    /// Matching values
    pub count: u64,
    /// Percentage of the column's values
    pub frequency: f32,
}

impl From<&CategoryFrequency> for SemanticCategory {
    fn from(frequency: &CategoryFrequency) -> Self {
        Self {
            id: frequency.category.id.clone(),
            name: frequency.category.name.clone(),
            count: frequency.count,
            frequency: frequency.frequency,
        }
    }
}

/// Best non-empty category of a ranked result, if its frequency reaches
/// `threshold` percent.
pub fn suggested_category(
    result: &[CategoryFrequency],
    threshold: f32,
) -> Option<&CategoryFrequency> {
    result
        .iter()
        .find(|f| !f.is_empty_category())
        .filter(|f| f.frequency >= threshold)
}

/// Runs one recognizer per column.
#[derive(Debug)]
pub struct CategoryInferenceManager {
    builder: CategoryRecognizerBuilder,
    recognizers: BTreeMap<usize, DefaultCategoryRecognizer>,
    records: u64,
}

impl CategoryInferenceManager {
    /// Creates a manager. Sources of the builder are loaded once here and
    /// the builder is checked by building a throwaway recognizer.
    pub fn new(builder: CategoryRecognizerBuilder) -> Result<Self> {
        let builder = builder.resolve()?;
        builder.build()?;
        Ok(Self {
            builder,
            recognizers: BTreeMap::new(),
            records: 0,
        })
    }

    /// Processes one record; field `i` goes to the recognizer of column `i`.
    pub fn infer_record(&mut self, record: &[Option<&str>]) -> Result<()> {
        for (column, value) in record.iter().enumerate() {
            self.recognizer(column)?.process(*value)?;
        }
        self.records += 1;
        Ok(())
    }

    /// Processes every value of one column.
    pub fn infer_column<'a>(
        &mut self,
        column: usize,
        values: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Result<()> {
        let recognizer = self.recognizer(column)?;
        for value in values {
            recognizer.process(value)?;
        }
        Ok(())
    }

    fn recognizer(&mut self, column: usize) -> Result<&mut DefaultCategoryRecognizer> {
        match self.recognizers.entry(column) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(column, "Creating column recognizer");
                Ok(entry.insert(self.builder.build()?))
            }
        }
    }

    /// Ranked categories per column index.
    pub fn semantic_categories(&self) -> BTreeMap<usize, Vec<SemanticCategory>> {
        self.recognizers
            .iter()
            .map(|(column, recognizer)| {
                let categories = recognizer.result().iter().map(SemanticCategory::from).collect();
                (*column, categories)
            })
            .collect()
    }

    /// Suggested category per column, using the configured threshold.
    pub fn suggested_categories(&self) -> BTreeMap<usize, Option<SemanticCategory>> {
        let threshold = self.builder.recognizer_config().suggestion_threshold;
        self.recognizers
            .iter()
            .map(|(column, recognizer)| {
                let result = recognizer.result();
                (
                    *column,
                    suggested_category(&result, threshold).map(SemanticCategory::from),
                )
            })
            .collect()
    }

    /// Number of records processed with [`infer_record`](Self::infer_record).
    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Number of columns seen.
    pub fn column_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Ends every column recognizer.
    pub fn end(&mut self) {
        for recognizer in self.recognizers.values_mut() {
            recognizer.end();
        }
        info!(
            columns = self.recognizers.len(),
            records = self.records,
            "Category inference finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CategoryInferenceManager {
        CategoryInferenceManager::new(CategoryRecognizerBuilder::builtin()).unwrap()
    }

    #[test]
    fn test_infer_records() {
        let mut manager = manager();
        let records = [
            [Some("Paris"), Some("sliu@talend.com"), None],
            [Some("London"), Some("jane.doe@example.org"), Some("")],
            [Some("Berlin"), Some("not an email"), None],
        ];
        for record in &records {
            manager.infer_record(record).unwrap();
        }
        assert_eq!(manager.record_count(), 3);
        assert_eq!(manager.column_count(), 3);

        let categories = manager.semantic_categories();
        assert_eq!(categories[&0][0].name, "CITY");
        assert_eq!(categories[&0][0].count, 3);
        assert_eq!(categories[&1][0].name, "EMAIL");
        assert_eq!(categories[&1][0].frequency, 66.67);
        assert_eq!(categories[&2][0].id, "");

        let suggested = manager.suggested_categories();
        assert_eq!(suggested[&0].as_ref().unwrap().name, "CITY");
        assert_eq!(suggested[&1].as_ref().unwrap().name, "EMAIL");
        assert!(suggested[&2].is_none());
        manager.end();
    }

    #[test]
    fn test_threshold_filters_suggestions() {
        let builder = CategoryRecognizerBuilder::builtin().config(
            crate::config::RecognizerConfig::default().with_suggestion_threshold(80.0),
        );
        let mut manager = CategoryInferenceManager::new(builder).unwrap();
        manager
            .infer_column(0, [Some("Paris"), Some("London"), Some("qwxz"), Some("zzkq")])
            .unwrap();
        assert!(manager.suggested_categories()[&0].is_none());
    }

    #[test]
    fn test_invalid_builder_is_rejected() {
        assert!(CategoryInferenceManager::new(CategoryRecognizerBuilder::new()).is_err());
    }
}
