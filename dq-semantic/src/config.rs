//! Recognizer configuration.
//!
//! ```rust
//! use dq_semantic::config::RecognizerConfig;
//!
//! let config = RecognizerConfig::default()
//!     .with_cache_capacity(5_000)
//!     .with_fuzzy_matching(false);
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result, SemanticError};

/// Tuning knobs shared by the recognizer and its lookup collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Maximum number of raw values kept in the category cache (default: 1000)
    pub cache_capacity: usize,
    /// Initial allocation of the category cache (default: 10)
    pub cache_initial_capacity: usize,
    /// Share of the cache evicted when it is full (default: 0.01)
    pub cache_eviction_factor: f32,
    /// Token count from which the keyword index is also queried (default: 3)
    pub max_tokens_for_dictionary: usize,
    /// Enable fuzzy dictionary lookup for short values (default: true)
    pub fuzzy_matching: bool,
    /// Minimum character length of a value for fuzzy lookup (default: 5)
    pub fuzzy_min_length: usize,
    /// Maximum Levenshtein edits for a fuzzy candidate (default: 2)
    pub fuzzy_max_edits: usize,
    /// Minimum overall similarity for a fuzzy match (default: 0.75)
    pub min_similarity: f32,
    /// Maximum number of documents considered per lookup (default: 20)
    pub top_doc_limit: usize,
    /// Default case sensitivity of regex categories (default: true)
    pub case_insensitive: bool,
    /// Minimum frequency, in percent, for a category suggestion (default: 50.0)
    pub suggestion_threshold: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_initial_capacity: 10,
            cache_eviction_factor: 0.01,
            max_tokens_for_dictionary: 3,
            fuzzy_matching: true,
            fuzzy_min_length: 5,
            fuzzy_max_edits: 2,
            min_similarity: 0.75,
            top_doc_limit: 20,
            case_insensitive: true,
            suggestion_threshold: 50.0,
        }
    }
}

impl RecognizerConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading recognizer config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Sets the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Sets the cache eviction factor.
    pub fn with_cache_eviction_factor(mut self, factor: f32) -> Self {
        self.cache_eviction_factor = factor;
        self
    }

    /// Sets the token threshold for keyword lookups.
    pub fn with_max_tokens_for_dictionary(mut self, tokens: usize) -> Self {
        self.max_tokens_for_dictionary = tokens;
        self
    }

    /// Enables or disables fuzzy dictionary lookup.
    pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.fuzzy_matching = enabled;
        self
    }

    /// Sets the minimum similarity for fuzzy matches.
    pub fn with_min_similarity(mut self, similarity: f32) -> Self {
        self.min_similarity = similarity;
        self
    }

    /// Sets the default regex case sensitivity.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Sets the suggestion threshold in percent.
    pub fn with_suggestion_threshold(mut self, threshold: f32) -> Self {
        self.suggestion_threshold = threshold;
        self
    }

    /// Checks that every setting is within range.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(SemanticError::configuration(
                "cache_capacity must be greater than zero",
            ));
        }
        if !(self.cache_eviction_factor > 0.0 && self.cache_eviction_factor <= 1.0) {
            return Err(SemanticError::configuration(format!(
                "cache_eviction_factor must be in (0, 1], got {}",
                self.cache_eviction_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(SemanticError::configuration(format!(
                "min_similarity must be in [0, 1], got {}",
                self.min_similarity
            )));
        }
        if !(0.0..=100.0).contains(&self.suggestion_threshold) {
            return Err(SemanticError::configuration(format!(
                "suggestion_threshold must be a percentage, got {}",
                self.suggestion_threshold
            )));
        }
        if self.max_tokens_for_dictionary == 0 {
            return Err(SemanticError::configuration(
                "max_tokens_for_dictionary must be greater than zero",
            ));
        }
        Ok(())
    }
}
