//! Error types for semantic category recognition.
//!
//! All fallible operations in this crate return [`SemanticError`] through the
//! [`Result`] alias. Errors raised while a recognizer streams values (lookup
//! failures) are logged and absorbed by the recognizer; only setup errors
//! surface to callers.

use thiserror::Error;

/// The main error type for the dq-semantic library.
#[derive(Error, Debug)]
pub enum SemanticError {
    /// Invalid or incomplete recognizer configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A category's regular expression could not be compiled or was rejected.
    #[error("Invalid pattern for category '{category}': {message}")]
    InvalidPattern {
        /// Identifier of the offending category
        category: String,
        /// Detailed error message
        message: String,
    },

    /// A lookup was attempted on an index with no open handle.
    #[error("Index '{0}' is closed")]
    IndexClosed(String),

    /// The lookup layer failed while answering a query.
    #[error("Lookup failed on index '{index}': {message}")]
    Lookup {
        /// Name of the index that failed
        index: String,
        /// Detailed error message
        message: String,
    },

    /// `process` was called after `end`.
    #[error("Recognizer has been ended and cannot process more values")]
    RecognizerEnded,

    /// Malformed category metadata (dangling references, cycles).
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, SemanticError>`.
pub type Result<T> = std::result::Result<T, SemanticError>;

impl SemanticError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an invalid pattern error for the given category.
    pub fn invalid_pattern(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Creates a lookup error for the given index.
    pub fn lookup(index: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            index: index.into(),
            message: message.into(),
        }
    }

    /// Creates a metadata error.
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata(message.into())
    }

    /// Returns true for errors that the recognizer absorbs while streaming.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            SemanticError::IndexClosed(_) | SemanticError::Lookup { .. } | SemanticError::Io(_)
        )
    }
}

impl From<serde_json::Error> for SemanticError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<SemanticError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

fn wrap(msg: &str, err: SemanticError) -> SemanticError {
    match err {
        SemanticError::Configuration(inner) => {
            SemanticError::Configuration(format!("{msg}: {inner}"))
        }
        SemanticError::Internal(inner) => SemanticError::Internal(format!("{msg}: {inner}")),
        other => SemanticError::Internal(format!("{msg}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_message() {
        let err = SemanticError::invalid_pattern("EMAIL", "unclosed group");
        assert_eq!(
            err.to_string(),
            "Invalid pattern for category 'EMAIL': unclosed group"
        );
    }

    #[test]
    fn test_lookup_failures_are_recognized() {
        assert!(SemanticError::IndexClosed("dictionary".to_string()).is_lookup_failure());
        assert!(SemanticError::lookup("keyword", "broken").is_lookup_failure());
        assert!(!SemanticError::configuration("missing metadata").is_lookup_failure());
        assert!(!SemanticError::RecognizerEnded.is_lookup_failure());
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: SemanticError = serde_json::from_str::<Vec<String>>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, SemanticError::Serialization(_)));
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(SemanticError::configuration("metadata is not set"))
        }

        let err = failing_operation()
            .context("While building recognizer")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: While building recognizer: metadata is not set"
        );
    }

    #[test]
    fn test_io_error_with_lazy_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = io
            .with_context(|| "Loading categories.json".to_string())
            .unwrap_err();
        assert!(err.to_string().contains("Loading categories.json"));
        assert!(err.to_string().contains("no such file"));
    }
}
