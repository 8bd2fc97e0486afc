//! Streaming category recognition.
//!
//! A recognizer consumes the values of one column, classifies each through
//! the regex layer and the dictionary lookup, and tallies matches per
//! category. [`CategoryRecognizer::result`] expands the tally to ancestor
//! categories and ranks it.
//!
//! ```rust,no_run
//! use dq_semantic::prelude::*;
//!
//! # fn main() -> dq_semantic::error::Result<()> {
//! let mut recognizer = CategoryRecognizerBuilder::builtin().build()?;
//! for value in [Some("jane@example.com"), Some("Paris"), None] {
//!     recognizer.process(value)?;
//! }
//! for frequency in recognizer.result() {
//!     println!("{} {} {:.2}%", frequency.category.name, frequency.count, frequency.frequency);
//! }
//! recognizer.end();
//! # Ok(())
//! # }
//! ```
//!
//! A recognizer is not meant to be shared between threads; use one per
//! column.

pub mod builder;
pub mod cache;
pub mod frequency;

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::classifier::{CategoryLookup, PatternClassifier};
use crate::config::RecognizerConfig;
use crate::error::{Result, SemanticError};
use crate::logging::{truncate_field, LogConfig};
use crate::model::{Category, CategoryMetadata, CategoryType, MainCategory};

pub use builder::CategoryRecognizerBuilder;
pub use cache::{CacheStats, LfuCache};
pub use frequency::{percentage, CategoryFrequency};

/// Recognition session over a stream of values.
pub trait CategoryRecognizer: Send {
    /// Classifies one value and returns the names of its categories.
    ///
    /// Null and blank values count toward the empty category and return no
    /// names.
    fn process(&mut self, value: Option<&str>) -> Result<Vec<String>>;

    /// Ranked statistics including ancestor categories.
    ///
    /// Calling this repeatedly without processing more values returns the
    /// same result.
    fn result(&self) -> Vec<CategoryFrequency>;

    /// Clears counts and the cache.
    fn reset(&mut self);

    /// Releases index handles and the cache. Later `process` calls fail.
    fn end(&mut self);

    /// Number of values processed since creation or the last reset.
    fn total(&self) -> u64;

    /// Number of null or blank values processed.
    fn empty_count(&self) -> u64;
}

/// Recognizer backed by a regex classifier and an optional dictionary
/// lookup.
#[derive(Debug)]
pub struct DefaultCategoryRecognizer {
    metadata: Arc<CategoryMetadata>,
    regex: Arc<dyn PatternClassifier>,
    lookup: Option<Arc<dyn CategoryLookup>>,
    config: RecognizerConfig,
    log_config: LogConfig,
    cache: LfuCache<String, BTreeSet<String>>,
    counts: HashMap<String, CategoryFrequency>,
    total: u64,
    empty_count: u64,
    ended: bool,
}

impl DefaultCategoryRecognizer {
    /// Creates a recognizer and opens a handle on the lookup.
    pub fn new(
        metadata: Arc<CategoryMetadata>,
        regex: Arc<dyn PatternClassifier>,
        lookup: Option<Arc<dyn CategoryLookup>>,
        config: RecognizerConfig,
    ) -> Self {
        if let Some(lookup) = &lookup {
            lookup.init_index();
        }
        let cache = LfuCache::with_config(
            config.cache_capacity,
            config.cache_initial_capacity,
            config.cache_eviction_factor,
        );
        Self {
            metadata,
            regex,
            lookup,
            config,
            log_config: LogConfig::default(),
            cache,
            counts: HashMap::new(),
            total: 0,
            empty_count: 0,
            ended: false,
        }
    }

    /// Replaces the logging switches.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Category metadata in use.
    pub fn metadata(&self) -> &CategoryMetadata {
        &self.metadata
    }

    /// Statistics of the value cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// True once `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Checks a value against one category.
    ///
    /// Regex categories are checked with their pattern; other categories
    /// against the reference values of the category and its children.
    /// Unknown or deleted categories never validate.
    pub fn validate(&self, value: &str, category_id: &str) -> Result<bool> {
        if self.ended {
            return Err(SemanticError::RecognizerEnded);
        }
        let Some(category) = self.metadata.get(category_id).filter(|c| !c.deleted) else {
            return Ok(false);
        };
        match category.category_type {
            CategoryType::Regex => Ok(self.regex.is_valid(category_id, value)),
            _ => match &self.lookup {
                Some(lookup) => {
                    let children = self.metadata.children(category_id);
                    lookup.valid_categories(value, category, &children)
                }
                None => Ok(false),
            },
        }
    }

    fn classify(&mut self, value: &str, main_category: MainCategory) -> BTreeSet<String> {
        if let Some(cached) = self.cache.get(value) {
            crate::log_cache_op!(
                self.log_config,
                value = %truncate_field(value, self.log_config.max_field_length),
                "Cache hit"
            );
            return cached.clone();
        }

        let (ids, cacheable) = match main_category {
            MainCategory::Alpha | MainCategory::AlphaNumeric => {
                let (mut ids, ok) = self.lookup_categories(value);
                ids.extend(self.regex.classify(value, main_category));
                (ids, ok)
            }
            MainCategory::Numeric => (self.regex.classify(value, main_category), true),
            MainCategory::Null | MainCategory::Blank | MainCategory::Unknown => {
                return BTreeSet::new()
            }
        };

        if cacheable {
            let evicted = self.cache.insert(value.to_string(), ids.clone());
            if evicted > 0 {
                crate::log_cache_op!(self.log_config, evicted, "Cache evicted entries");
            }
        }
        ids
    }

    /// Dictionary categories of a value; a failing lookup yields none.
    fn lookup_categories(&self, value: &str) -> (BTreeSet<String>, bool) {
        let Some(lookup) = &self.lookup else {
            return (BTreeSet::new(), true);
        };
        match lookup.find_categories(value) {
            Ok(ids) => (ids, true),
            Err(e) => {
                warn!(
                    error = %e,
                    value = %truncate_field(value, self.log_config.max_field_length),
                    "Dictionary lookup failed, value left unclassified"
                );
                (BTreeSet::new(), false)
            }
        }
    }

    fn increment(&mut self, category: &Category) {
        self.counts
            .entry(category.id.clone())
            .or_insert_with(|| CategoryFrequency::new(category.clone()))
            .count += 1;
    }

    /// Adds each directly matched category's count to its active ancestors.
    ///
    /// An ancestor gains a source's count once, even when several paths lead
    /// to it; its level is the longest distance at which it was reached.
    fn propagate(&self, merged: &mut HashMap<String, CategoryFrequency>) {
        let max_depth = self.metadata.len() as u32;
        for (id, direct) in &self.counts {
            if direct.is_empty_category() {
                continue;
            }
            let mut queue: VecDeque<(String, u32)> = self
                .metadata
                .parents(id)
                .into_iter()
                .map(|parent| (parent.id.clone(), 1))
                .collect();
            let mut reached: HashMap<String, u32> = HashMap::new();
            reached.insert(id.clone(), 0);

            while let Some((ancestor_id, level)) = queue.pop_front() {
                if level > max_depth {
                    warn!(category = %id, "Ancestor walk deeper than the hierarchy, metadata has a cycle");
                    break;
                }
                let first_visit = match reached.get(&ancestor_id) {
                    None => true,
                    Some(&seen_level) if level > seen_level => false,
                    Some(_) => continue,
                };
                reached.insert(ancestor_id.clone(), level);

                let Some(ancestor) = self.metadata.get(&ancestor_id).filter(|c| !c.deleted) else {
                    continue;
                };
                let entry = merged
                    .entry(ancestor_id.clone())
                    .or_insert_with(|| CategoryFrequency::with_level(ancestor.clone(), level));
                if first_visit {
                    entry.count += direct.count;
                }
                entry.level = entry.level.max(level);

                queue.extend(
                    self.metadata
                        .parents(&ancestor_id)
                        .into_iter()
                        .map(|parent| (parent.id.clone(), level + 1)),
                );
            }
        }
    }
}

impl CategoryRecognizer for DefaultCategoryRecognizer {
    fn process(&mut self, value: Option<&str>) -> Result<Vec<String>> {
        if self.ended {
            return Err(SemanticError::RecognizerEnded);
        }
        self.total += 1;

        let main_category = MainCategory::of(value);
        let value = match value {
            Some(value) if !main_category.is_empty() => value,
            _ => {
                self.empty_count += 1;
                self.increment(&Category::empty());
                return Ok(Vec::new());
            }
        };

        let ids = self.classify(value, main_category);
        let mut names = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.metadata.get(id).filter(|c| !c.deleted).cloned() {
                Some(category) => {
                    self.increment(&category);
                    names.push(category.name);
                }
                None => debug!(category = %id, "Matched category has no active metadata, skipped"),
            }
        }
        Ok(names)
    }

    #[instrument(skip(self), fields(total = self.total, empty = self.empty_count))]
    fn result(&self) -> Vec<CategoryFrequency> {
        let mut merged = self.counts.clone();
        self.propagate(&mut merged);

        let mut result: Vec<CategoryFrequency> = merged
            .into_values()
            .map(|mut frequency| {
                frequency.update_frequency(self.total);
                frequency
            })
            .collect();
        result.sort();
        debug!(categories = result.len(), "Computed recognition result");
        result
    }

    fn reset(&mut self) {
        self.counts.clear();
        self.cache.clear();
        self.total = 0;
        self.empty_count = 0;
    }

    fn end(&mut self) {
        if self.ended {
            return;
        }
        if let Some(lookup) = &self.lookup {
            lookup.close_index();
        }
        self.cache.clear();
        self.ended = true;
        debug!(total = self.total, "Recognizer ended");
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn empty_count(&self) -> u64 {
        self.empty_count
    }
}

impl Drop for DefaultCategoryRecognizer {
    fn drop(&mut self) {
        if !self.ended {
            if let Some(lookup) = &self.lookup {
                lookup.close_index();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RegexClassifier;
    use crate::index::{DictionaryDocument, DictionaryIndex, IndexMode};

    fn recognizer(metadata: CategoryMetadata, documents: Vec<DictionaryDocument>) -> DefaultCategoryRecognizer {
        let dictionary = DictionaryIndex::from_documents("test", IndexMode::Dictionary, documents);
        DefaultCategoryRecognizer::new(
            Arc::new(metadata),
            Arc::new(RegexClassifier::new(Vec::new(), true).unwrap()),
            Some(Arc::new(dictionary)),
            RecognizerConfig::default(),
        )
    }

    fn answers() -> DefaultCategoryRecognizer {
        recognizer(
            CategoryMetadata::from_categories(vec![Category::new("ANSWER", CategoryType::Dictionary)]),
            vec![DictionaryDocument::new("ANSWER", ["YES", "NO"])],
        )
    }

    #[test]
    fn test_answer_example() {
        let mut recognizer = answers();
        for value in [Some("YES"), Some("NO"), Some("unknownword"), Some(""), None] {
            recognizer.process(value).unwrap();
        }

        let result = recognizer.result();
        assert_eq!(recognizer.total(), 5);
        assert_eq!(recognizer.empty_count(), 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category_id(), "ANSWER");
        assert_eq!(result[0].count, 2);
        assert_eq!(result[0].frequency, 40.0);
        assert!(result[1].is_empty_category());
        assert_eq!(result[1].count, 2);
    }

    #[test]
    fn test_process_returns_names() {
        let mut recognizer = recognizer(
            CategoryMetadata::from_categories(vec![
                Category::new("c-1", CategoryType::Dictionary).with_name("ANSWER")
            ]),
            vec![DictionaryDocument::new("c-1", ["YES"])],
        );
        assert_eq!(recognizer.process(Some("yes")).unwrap(), vec!["ANSWER"]);
        assert!(recognizer.process(Some("   ")).unwrap().is_empty());
        assert!(recognizer.process(Some("%%%")).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_values_hit_cache() {
        let mut recognizer = answers();
        recognizer.process(Some("YES")).unwrap();
        recognizer.process(Some("YES")).unwrap();

        let stats = recognizer.cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(recognizer.result()[0].count, 2);
    }

    #[test]
    fn test_unknown_class_is_not_cached() {
        let mut recognizer = answers();
        recognizer.process(Some("#!?")).unwrap();
        assert_eq!(recognizer.cache_stats().entries, 0);
        assert_eq!(recognizer.total(), 1);
        assert!(recognizer.result().is_empty());
    }

    #[test]
    fn test_result_is_idempotent() {
        let mut recognizer = recognizer(
            CategoryMetadata::from_categories(vec![
                Category::new("PHONE", CategoryType::Compound),
                Category::new("MOBILE", CategoryType::Dictionary).with_parent("PHONE"),
            ]),
            vec![DictionaryDocument::new("MOBILE", ["cell"])],
        );
        recognizer.process(Some("cell")).unwrap();
        recognizer.process(Some("cell")).unwrap();

        let first = recognizer.result();
        let second = recognizer.result();
        assert_eq!(first, second);
        let phone = first.iter().find(|f| f.category_id() == "PHONE").unwrap();
        assert_eq!(phone.count, 2);
        assert_eq!(phone.level, 1);
    }

    #[test]
    fn test_diamond_hierarchy_counts_once_per_source() {
        let mut recognizer = recognizer(
            CategoryMetadata::from_categories(vec![
                Category::new("ROOT", CategoryType::Compound),
                Category::new("LEFT", CategoryType::Compound).with_parent("ROOT"),
                Category::new("RIGHT", CategoryType::Compound).with_parent("ROOT"),
                Category::new("LEAF", CategoryType::Dictionary)
                    .with_parent("LEFT")
                    .with_parent("RIGHT"),
            ]),
            vec![DictionaryDocument::new("LEAF", ["leaf"])],
        );
        for _ in 0..3 {
            recognizer.process(Some("leaf")).unwrap();
        }
        let result = recognizer.result();
        let count = |id: &str| result.iter().find(|f| f.category_id() == id).unwrap().count;
        assert_eq!(count("LEAF"), 3);
        assert_eq!(count("LEFT"), 3);
        assert_eq!(count("RIGHT"), 3);
        assert_eq!(count("ROOT"), 3);
        let root = result.iter().find(|f| f.category_id() == "ROOT").unwrap();
        assert_eq!(root.level, 2);
    }

    #[test]
    fn test_deleted_categories_are_ignored() {
        let mut metadata = CategoryMetadata::from_categories(vec![
            Category::new("PHONE", CategoryType::Compound),
            Category::new("MOBILE", CategoryType::Dictionary).with_parent("PHONE"),
            Category::new("OLD", CategoryType::Dictionary),
        ]);
        metadata.mark_deleted("PHONE");
        metadata.mark_deleted("OLD");
        let mut recognizer = recognizer(
            metadata,
            vec![
                DictionaryDocument::new("MOBILE", ["cell"]),
                DictionaryDocument::new("OLD", ["legacy"]),
            ],
        );
        assert_eq!(recognizer.process(Some("cell")).unwrap(), vec!["MOBILE"]);
        assert!(recognizer.process(Some("legacy")).unwrap().is_empty());

        let ids: Vec<String> = recognizer
            .result()
            .iter()
            .map(|f| f.category_id().to_string())
            .collect();
        assert_eq!(ids, vec!["MOBILE"]);
    }

    #[test]
    fn test_reset_and_end() {
        let mut recognizer = answers();
        recognizer.process(Some("YES")).unwrap();
        recognizer.reset();
        assert_eq!(recognizer.total(), 0);
        assert!(recognizer.result().is_empty());

        recognizer.end();
        recognizer.end();
        assert!(recognizer.is_ended());
        assert!(matches!(
            recognizer.process(Some("YES")),
            Err(SemanticError::RecognizerEnded)
        ));
    }

    #[test]
    fn test_validate_by_category_type() {
        let metadata = CategoryMetadata::from_categories(vec![
            Category::new("ANSWER", CategoryType::Dictionary),
            Category::new("DIGITS", CategoryType::Regex),
        ]);
        let dictionary = DictionaryIndex::from_documents(
            "test",
            IndexMode::Dictionary,
            vec![DictionaryDocument::new("ANSWER", ["YES"])],
        );
        let regex = RegexClassifier::new(
            vec![crate::classifier::RegexCategory::new(
                "DIGITS",
                r"^\d+$",
                MainCategory::Numeric,
            )],
            true,
        )
        .unwrap();
        let recognizer = DefaultCategoryRecognizer::new(
            Arc::new(metadata),
            Arc::new(regex),
            Some(Arc::new(dictionary)),
            RecognizerConfig::default(),
        );

        assert!(recognizer.validate("yes", "ANSWER").unwrap());
        assert!(!recognizer.validate("maybe", "ANSWER").unwrap());
        assert!(recognizer.validate("123", "DIGITS").unwrap());
        assert!(!recognizer.validate("12a", "DIGITS").unwrap());
        assert!(!recognizer.validate("yes", "MISSING").unwrap());
    }

    #[test]
    fn test_cached_values_skip_lookup() {
        let lookup = crate::test_fixtures::counting_answer_lookup();
        let mut recognizer = DefaultCategoryRecognizer::new(
            Arc::new(crate::test_fixtures::answer_metadata()),
            Arc::new(RegexClassifier::builtin().unwrap()),
            Some(lookup.clone()),
            RecognizerConfig::default(),
        );
        for _ in 0..3 {
            assert_eq!(recognizer.process(Some("YES")).unwrap(), vec!["ANSWER"]);
        }
        recognizer.process(Some("12345")).unwrap();

        // Numeric values never reach the dictionary
        assert_eq!(lookup.calls(), 1);
        assert_eq!(recognizer.result()[0].count, 3);
    }

    #[test]
    fn test_failing_lookup_degrades_to_regex() {
        let mut recognizer = DefaultCategoryRecognizer::new(
            Arc::new(CategoryMetadata::builtin()),
            Arc::new(RegexClassifier::builtin().unwrap()),
            Some(Arc::new(crate::test_fixtures::FailingLookup)),
            RecognizerConfig::default(),
        );
        assert!(recognizer.process(Some("Paris")).unwrap().is_empty());
        assert_eq!(
            recognizer.process(Some("sliu@talend.com")).unwrap(),
            vec!["EMAIL"]
        );
        assert_eq!(recognizer.total(), 2);
        // Failed lookups are retried rather than cached
        assert_eq!(recognizer.cache_stats().entries, 0);
    }

    #[test]
    fn test_multi_level_propagation() {
        let mut recognizer = recognizer(
            crate::test_fixtures::phone_hierarchy_metadata(),
            vec![
                DictionaryDocument::new("MOBILE", ["cell"]),
                DictionaryDocument::new("LANDLINE", ["desk"]),
            ],
        );
        for value in ["cell", "cell", "desk"] {
            recognizer.process(Some(value)).unwrap();
        }
        let result = recognizer.result();
        let ids: Vec<&str> = result.iter().map(|f| f.category_id()).collect();
        assert_eq!(ids, vec!["CONTACT", "PHONE", "MOBILE", "LANDLINE"]);

        let contact = &result[0];
        assert_eq!(contact.count, 3);
        assert_eq!(contact.level, 2);
        assert_eq!(contact.frequency, 100.0);
        assert_eq!(result[2].frequency, 66.67);
    }

    #[test]
    fn test_ancestor_level_follows_longest_path() {
        let mut recognizer = recognizer(
            CategoryMetadata::from_categories(vec![
                Category::new("TOP", CategoryType::Compound),
                Category::new("MID", CategoryType::Compound).with_parent("TOP"),
                Category::new("LEAF", CategoryType::Dictionary)
                    .with_parent("TOP")
                    .with_parent("MID"),
            ]),
            vec![DictionaryDocument::new("LEAF", ["leaf"])],
        );
        recognizer.process(Some("leaf")).unwrap();

        let result = recognizer.result();
        let top = result.iter().find(|f| f.category_id() == "TOP").unwrap();
        assert_eq!(top.count, 1);
        assert_eq!(top.level, 2);
        let mid = result.iter().find(|f| f.category_id() == "MID").unwrap();
        assert_eq!(mid.count, 1);
        assert_eq!(mid.level, 1);
        assert_eq!(recognizer.result(), result);
    }
}
