//! Builder for [`DefaultCategoryRecognizer`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::DefaultCategoryRecognizer;
use crate::classifier::{
    regex::builtin_definitions, CategoryLookup, DictionaryFieldClassifier, PatternClassifier,
    RegexClassifier,
};
use crate::config::RecognizerConfig;
use crate::error::{ErrorContext, Result, SemanticError};
use crate::index::{DictionaryIndex, IndexMode, LookupOptions};
use crate::logging::LogConfig;
use crate::model::CategoryMetadata;

/// Assembles recognizers from metadata, a regex classifier and dictionary
/// indexes.
///
/// Collaborators are shared through `Arc`, so a builder can be cloned and
/// built once per column. Sources given as paths are loaded on
/// [`build`](Self::build); call [`resolve`](Self::resolve) first to load them
/// only once.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dq_semantic::prelude::*;
/// use dq_semantic::index::{DictionaryDocument, DictionaryIndex, IndexMode};
///
/// # fn main() -> dq_semantic::error::Result<()> {
/// let dictionary = DictionaryIndex::from_documents(
///     "answers",
///     IndexMode::Dictionary,
///     vec![DictionaryDocument::new("ANSWER", ["YES", "NO"])],
/// );
/// let mut recognizer = CategoryRecognizerBuilder::new()
///     .metadata(CategoryMetadata::builtin())
///     .regex_classifier(Arc::new(RegexClassifier::builtin()?))
///     .dictionary(Arc::new(dictionary))
///     .build()?;
///
/// assert_eq!(recognizer.process(Some("yes"))?, vec!["ANSWER"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CategoryRecognizerBuilder {
    metadata: Option<Arc<CategoryMetadata>>,
    metadata_path: Option<PathBuf>,
    regex: Option<Arc<dyn PatternClassifier>>,
    regex_path: Option<PathBuf>,
    dictionary: Option<Arc<dyn CategoryLookup>>,
    dictionary_path: Option<PathBuf>,
    custom_dictionary: Option<Arc<dyn CategoryLookup>>,
    keyword: Option<Arc<dyn CategoryLookup>>,
    keyword_path: Option<PathBuf>,
    builtin: bool,
    config: RecognizerConfig,
    log_config: LogConfig,
}

impl CategoryRecognizerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder falling back to the built-in catalog for every source that is
    /// not set explicitly.
    pub fn builtin() -> Self {
        Self {
            builtin: true,
            ..Self::default()
        }
    }

    /// Sets the category metadata.
    pub fn metadata(mut self, metadata: impl Into<Arc<CategoryMetadata>>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Loads category metadata from a JSON file on build.
    pub fn metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(path.into());
        self
    }

    /// Sets the regex classifier.
    pub fn regex_classifier(mut self, classifier: Arc<dyn PatternClassifier>) -> Self {
        self.regex = Some(classifier);
        self
    }

    /// Loads regex definitions from a JSON file on build.
    pub fn regex_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.regex_path = Some(path.into());
        self
    }

    /// Sets the shared dictionary.
    pub fn dictionary(mut self, dictionary: Arc<dyn CategoryLookup>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Loads the shared dictionary from a JSON file on build.
    pub fn dictionary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_path = Some(path.into());
        self
    }

    /// Sets the tenant dictionary used for modified categories.
    pub fn custom_dictionary(mut self, dictionary: Arc<dyn CategoryLookup>) -> Self {
        self.custom_dictionary = Some(dictionary);
        self
    }

    /// Sets the keyword index.
    pub fn keyword(mut self, keyword: Arc<dyn CategoryLookup>) -> Self {
        self.keyword = Some(keyword);
        self
    }

    /// Loads the keyword index from a JSON file on build.
    pub fn keyword_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keyword_path = Some(path.into());
        self
    }

    /// Sets the recognizer configuration.
    pub fn config(mut self, config: RecognizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the logging switches passed to recognizers and loaded indexes.
    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Configuration recognizers will be built with.
    pub fn recognizer_config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Loads every path and built-in source into memory.
    ///
    /// Explicitly set collaborators take precedence over paths, and paths
    /// over the built-in catalog.
    #[instrument(skip(self))]
    pub fn resolve(mut self) -> Result<Self> {
        let options = LookupOptions::from(&self.config);

        if self.metadata.is_none() {
            if let Some(path) = &self.metadata_path {
                self.metadata = Some(Arc::new(CategoryMetadata::from_json_file(path)?));
            } else if self.builtin {
                self.metadata = Some(Arc::new(CategoryMetadata::builtin()));
            }
        }

        if self.regex.is_none() {
            if let Some(path) = &self.regex_path {
                let classifier = RegexClassifier::from_json_file(path, self.config.case_insensitive)?;
                self.regex = Some(Arc::new(classifier));
            } else if self.builtin {
                let classifier =
                    RegexClassifier::new(builtin_definitions(), self.config.case_insensitive)?;
                self.regex = Some(Arc::new(classifier));
            }
        }

        if self.dictionary.is_none() {
            let index = match &self.dictionary_path {
                Some(path) => Some(
                    DictionaryIndex::from_json_file("shared-dictionary", IndexMode::Dictionary, path)
                        .context("Loading shared dictionary")?,
                ),
                None if self.builtin => Some(DictionaryIndex::builtin_dictionary()),
                None => None,
            };
            if let Some(index) = index {
                let index = index
                    .with_options(options.clone())
                    .with_log_config(self.log_config.clone());
                self.dictionary = Some(Arc::new(index));
            }
        }

        if self.keyword.is_none() {
            let index = match &self.keyword_path {
                Some(path) => Some(
                    DictionaryIndex::from_json_file("keyword", IndexMode::Keyword, path)
                        .context("Loading keyword index")?,
                ),
                None if self.builtin => Some(DictionaryIndex::builtin_keyword()),
                None => None,
            };
            if let Some(index) = index {
                let index = index
                    .with_options(options)
                    .with_log_config(self.log_config.clone());
                self.keyword = Some(Arc::new(index));
            }
        }

        Ok(self)
    }

    /// Builds a recognizer.
    ///
    /// Fails when the configuration is invalid, metadata or the regex
    /// classifier is missing, the metadata graph is malformed, or a tenant
    /// dictionary or keyword index is given without a shared dictionary.
    pub fn build(&self) -> Result<DefaultCategoryRecognizer> {
        self.config.validate()?;
        let resolved = self.clone().resolve()?;

        let metadata = resolved
            .metadata
            .ok_or_else(|| SemanticError::configuration("category metadata is not set"))?;
        metadata.validate()?;

        let regex = resolved
            .regex
            .ok_or_else(|| SemanticError::configuration("regex classifier is not set"))?;

        let lookup: Option<Arc<dyn CategoryLookup>> = match resolved.dictionary {
            Some(shared) => {
                let mut classifier =
                    DictionaryFieldClassifier::new(shared, self.config.max_tokens_for_dictionary);
                if let Some(custom) = resolved.custom_dictionary {
                    classifier = classifier.with_custom(custom);
                }
                if let Some(keyword) = resolved.keyword {
                    classifier = classifier.with_keyword(keyword);
                }
                Some(Arc::new(classifier))
            }
            None if resolved.custom_dictionary.is_some() || resolved.keyword.is_some() => {
                return Err(SemanticError::configuration(
                    "a tenant dictionary or keyword index requires a shared dictionary",
                ));
            }
            None => None,
        };

        debug!(
            categories = metadata.len(),
            dictionary = lookup.is_some(),
            "Building category recognizer"
        );
        Ok(
            DefaultCategoryRecognizer::new(metadata, regex, lookup, self.config.clone())
                .with_log_config(self.log_config.clone()),
        )
    }
}
