//! Input validation for user-supplied identifiers and regular expressions.
//!
//! Column and table names end up in sampling SQL, and category patterns come
//! from user-editable JSON, so both are checked before use.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SemanticError};

/// Maximum identifier length accepted in sampling queries.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum regex pattern length accepted for a category.
pub const MAX_PATTERN_LENGTH: usize = 2000;

/// Identifier and pattern validation utilities.
pub struct InputSecurity;

impl InputSecurity {
    /// Validates and escapes a SQL identifier (table or column name).
    ///
    /// # Examples
    /// ```rust
    /// use dq_semantic::security::InputSecurity;
    ///
    /// assert_eq!(InputSecurity::escape_identifier("email").unwrap(), "\"email\"");
    /// assert!(InputSecurity::escape_identifier("id; DROP TABLE users--").is_err());
    /// ```
    pub fn escape_identifier(identifier: &str) -> Result<String> {
        Self::validate_identifier(identifier)?;
        let escaped = identifier.replace('"', "\"\"");
        Ok(format!("\"{escaped}\""))
    }

    /// Validates a SQL identifier without escaping it.
    pub fn validate_identifier(identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(SemanticError::SecurityError(
                "SQL identifier cannot be empty or whitespace-only".to_string(),
            ));
        }

        if identifier.len() > MAX_IDENTIFIER_LENGTH {
            return Err(SemanticError::SecurityError(format!(
                "SQL identifier too long (max {MAX_IDENTIFIER_LENGTH} characters)"
            )));
        }

        Self::validate_no_null_bytes(identifier, "SQL identifier")?;

        static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::expect_used)]
            Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*$")
                .expect("Hard-coded regex pattern should be valid")
        });

        if !IDENTIFIER_REGEX.is_match(identifier) {
            return Err(SemanticError::SecurityError(format!(
                "Invalid SQL identifier format: '{identifier}'. Identifiers must start with a letter or underscore and contain only letters, numbers, underscores, and dots"
            )));
        }

        Self::check_reserved_words(identifier)
    }

    /// Validates a category regex pattern.
    ///
    /// The pattern must compile and must not contain the classic nested
    /// quantifier shapes.
    pub fn validate_regex_pattern(pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(SemanticError::SecurityError(
                "Regex pattern cannot be empty".to_string(),
            ));
        }

        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(SemanticError::SecurityError(format!(
                "Regex pattern too long (max {MAX_PATTERN_LENGTH} characters)"
            )));
        }

        Self::validate_no_null_bytes(pattern, "Regex pattern")?;

        if let Err(e) = Regex::new(pattern) {
            return Err(SemanticError::SecurityError(format!(
                "Invalid regex pattern: {e}"
            )));
        }

        const NESTED_QUANTIFIERS: &[&str] = &["(.*)*", "(.*)+", "(.+)+", "(.+)*"];
        if NESTED_QUANTIFIERS.iter().any(|shape| pattern.contains(shape)) {
            return Err(SemanticError::SecurityError(
                "Regex pattern contains nested unbounded quantifiers".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates that a string doesn't exceed the maximum length.
    pub fn validate_string_length(value: &str, max_length: usize, name: &str) -> Result<()> {
        if value.len() > max_length {
            return Err(SemanticError::SecurityError(format!(
                "{name} too long (max {max_length} characters)"
            )));
        }
        Ok(())
    }

    /// Validates that a string doesn't contain null bytes.
    pub fn validate_no_null_bytes(value: &str, name: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(SemanticError::SecurityError(format!(
                "{name} cannot contain null bytes"
            )));
        }
        Ok(())
    }

    fn check_reserved_words(identifier: &str) -> Result<()> {
        const RESERVED: &[&str] = &[
            "select", "insert", "update", "delete", "drop", "create", "alter", "exec", "execute",
            "union", "truncate",
        ];

        for part in identifier.split('.') {
            let lower = part.to_lowercase();
            if RESERVED.contains(&lower.as_str()) {
                return Err(SemanticError::SecurityError(format!(
                    "SQL identifier uses reserved word: '{part}'"
                )));
            }
        }
        Ok(())
    }
}
