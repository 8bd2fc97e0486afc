//! Prelude for commonly used types and traits in dq-semantic.

pub use crate::analyzers::{ColumnSemanticProfile, SemanticTypeAnalyzer};
pub use crate::classifier::{CategoryLookup, DictionaryFieldClassifier, PatternClassifier, RegexClassifier};
pub use crate::config::RecognizerConfig;
pub use crate::error::{ErrorContext, Result, SemanticError};
pub use crate::formatters::{FormatterConfig, ProfileFormatter};
pub use crate::index::{DictionaryDocument, DictionaryIndex, IndexMode};
pub use crate::inference::{CategoryInferenceManager, SemanticCategory};
pub use crate::logging::LogConfig;
pub use crate::model::{Category, CategoryMetadata, CategoryType, MainCategory};
pub use crate::recognizer::{
    CategoryFrequency, CategoryRecognizer, CategoryRecognizerBuilder, DefaultCategoryRecognizer,
};
