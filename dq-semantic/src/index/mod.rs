//! In-memory reference indexes used for dictionary and keyword lookups.

pub mod dictionary_index;
pub mod similarity;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::RecognizerConfig;

pub use dictionary_index::{DictionaryDocument, DictionaryIndex, IndexMode};

/// Splits a value into lowercase Unicode words. Punctuation is dropped.
pub fn tokenize(value: &str) -> Vec<String> {
    value.unicode_words().map(str::to_lowercase).collect()
}

/// Normalized form of a value: its tokens joined by single spaces.
pub fn normalize(value: &str) -> String {
    tokenize(value).join(" ")
}

/// Lookup tuning shared by all indexes built from one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOptions {
    /// Enables fuzzy matching for single-token values
    pub fuzzy_matching: bool,
    /// Minimum length in characters for a fuzzy lookup
    pub fuzzy_min_length: usize,
    /// Maximum Levenshtein distance of a fuzzy hit
    pub fuzzy_max_edits: usize,
    /// Minimum overall similarity of a fuzzy hit
    pub min_similarity: f32,
    /// Maximum fuzzy candidates considered per lookup
    pub top_doc_limit: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self::from(&RecognizerConfig::default())
    }
}

impl From<&RecognizerConfig> for LookupOptions {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            fuzzy_matching: config.fuzzy_matching,
            fuzzy_min_length: config.fuzzy_min_length,
            fuzzy_max_edits: config.fuzzy_max_edits,
            min_similarity: config.min_similarity,
            top_doc_limit: config.top_doc_limit,
        }
    }
}
