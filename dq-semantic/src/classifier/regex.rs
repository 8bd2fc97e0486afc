//! Regex-defined categories.
//!
//! Definitions are compiled once when the classifier is built; a definition
//! that does not compile or fails the pattern safety checks aborts
//! construction with [`SemanticError::InvalidPattern`].
//!
//! ```rust
//! use dq_semantic::classifier::{PatternClassifier, RegexClassifier};
//! use dq_semantic::model::MainCategory;
//!
//! let classifier = RegexClassifier::builtin().unwrap();
//! let found = classifier.classify("jane.doe@example.com", MainCategory::Alpha);
//! assert!(found.contains("EMAIL"));
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::validators::{validator_by_name, SemanticValidator};
use super::PatternClassifier;
use crate::error::{ErrorContext, Result, SemanticError};
use crate::model::MainCategory;
use crate::security::InputSecurity;

/// Serialized form of a regex category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexCategory {
    /// Category id reported on match
    pub id: String,
    /// Pattern; anchor it to match whole values
    pub pattern: String,
    /// Lexical class of values the pattern applies to
    pub main_category: MainCategory,
    /// Optional checksum validator name (`sedol`, `luhn`, `iban`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_validator: Option<String>,
    /// Overrides the configured default case sensitivity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

impl RegexCategory {
    /// Creates a definition without sub-validator.
    pub fn new(
        id: impl Into<String>,
        pattern: impl Into<String>,
        main_category: MainCategory,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            main_category,
            sub_validator: None,
            case_insensitive: None,
        }
    }

    /// Attaches a named sub-validator.
    pub fn with_validator(mut self, name: impl Into<String>) -> Self {
        self.sub_validator = Some(name.into());
        self
    }

    /// Sets case sensitivity for this definition.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = Some(case_insensitive);
        self
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RegexCatalog {
    classifiers: Vec<RegexCategory>,
}

#[derive(Debug)]
struct CompiledCategory {
    id: String,
    regex: Regex,
    main_category: MainCategory,
    validator: Option<Box<dyn SemanticValidator>>,
}

impl CompiledCategory {
    fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
            && self
                .validator
                .as_ref()
                .map_or(true, |validator| validator.is_valid(value))
    }
}

/// Evaluates values against compiled regex categories.
#[derive(Debug)]
pub struct RegexClassifier {
    categories: Vec<CompiledCategory>,
}

impl RegexClassifier {
    /// Compiles the given definitions.
    ///
    /// `default_case_insensitive` applies to definitions that do not set
    /// their own flag.
    pub fn new(definitions: Vec<RegexCategory>, default_case_insensitive: bool) -> Result<Self> {
        let mut categories = Vec::with_capacity(definitions.len());
        for definition in definitions {
            InputSecurity::validate_regex_pattern(&definition.pattern)
                .map_err(|e| SemanticError::invalid_pattern(&definition.id, e.to_string()))?;

            let regex = RegexBuilder::new(&definition.pattern)
                .case_insensitive(
                    definition
                        .case_insensitive
                        .unwrap_or(default_case_insensitive),
                )
                .build()
                .map_err(|e| SemanticError::invalid_pattern(&definition.id, e.to_string()))?;

            let validator = match definition.sub_validator.as_deref() {
                None => None,
                Some(name) if name.trim().is_empty() => None,
                Some(name) => {
                    let found = validator_by_name(name);
                    if found.is_none() {
                        warn!(
                            category = %definition.id,
                            validator = name,
                            "Unknown sub-validator, matching on pattern only"
                        );
                    }
                    found
                }
            };

            categories.push(CompiledCategory {
                id: definition.id,
                regex,
                main_category: definition.main_category,
                validator,
            });
        }

        debug!(categories = categories.len(), "Compiled regex classifier");
        Ok(Self { categories })
    }

    /// Parses `{"classifiers": [...]}` JSON.
    pub fn from_json_str(json: &str, default_case_insensitive: bool) -> Result<Self> {
        let catalog: RegexCatalog = serde_json::from_str(json)?;
        Self::new(catalog.classifiers, default_case_insensitive)
    }

    /// Reads `{"classifiers": [...]}` JSON from a file.
    pub fn from_json_file(path: impl AsRef<Path>, default_case_insensitive: bool) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading regex classifiers {}", path.display()))?;
        Self::from_json_str(&json, default_case_insensitive)
    }

    /// Serializes definitions to the JSON catalog format.
    pub fn catalog_json(definitions: &[RegexCategory]) -> Result<String> {
        let catalog = RegexCatalog {
            classifiers: definitions.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&catalog)?)
    }

    /// Classifier over [`builtin_definitions`], case-insensitive.
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_definitions(), true)
    }

    /// Number of compiled categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no category is defined.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// True when the category with this id matches the value.
    ///
    /// Ignores the lexical class; unknown ids never match.
    pub fn is_valid(&self, id: &str, value: &str) -> bool {
        self.categories
            .iter()
            .filter(|c| c.id == id)
            .any(|c| c.matches(value.trim()))
    }
}

impl PatternClassifier for RegexClassifier {
    fn classify(&self, value: &str, main_category: MainCategory) -> BTreeSet<String> {
        let value = value.trim();
        self.categories
            .iter()
            .filter(|c| c.main_category.accepts(main_category))
            .filter(|c| c.matches(value))
            .map(|c| c.id.clone())
            .collect()
    }

    fn is_valid(&self, id: &str, value: &str) -> bool {
        RegexClassifier::is_valid(self, id, value)
    }
}

/// Regex definitions shipped with the crate. Ids match
/// [`CategoryMetadata::builtin`](crate::model::CategoryMetadata::builtin).
pub fn builtin_definitions() -> Vec<RegexCategory> {
    const LABEL: &str = r"[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?";
    vec![
        RegexCategory::new(
            "EMAIL",
            format!(
                r"^[\p{{L}}\p{{N}}_+-]+(?:\.[\p{{L}}\p{{N}}_+-]+)*@{LABEL}(?:\.{LABEL})*\.\p{{L}}{{2,}}$"
            ),
            MainCategory::AlphaNumeric,
        ),
        RegexCategory::new(
            "URL",
            format!(r"^(?:https?|ftp)://(?:[^\s:@/]+(?::[^\s@/]*)?@)?(?:{LABEL}\.)+\p{{L}}{{2,}}(?::\d{{1,5}})?(?:[/?#]\S*)?$"),
            MainCategory::AlphaNumeric,
        ),
        RegexCategory::new(
            "US_PHONE",
            r"^(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\d{3})[-.\s]?\d{3}[-.\s]?\d{4}(?:\s*(?:ext|x)\.?\s*\d{1,5})?$",
            MainCategory::AlphaNumeric,
        ),
        RegexCategory::new(
            "FR_PHONE",
            r"^(?:(?:\+|00)33[\s.-]?|0)[1-9](?:[\s.-]?\d{2}){4}$",
            MainCategory::Numeric,
        ),
        RegexCategory::new(
            "UK_PHONE",
            r"^(?:\+44\s?|0)(?:\d\s?){9}\d$",
            MainCategory::Numeric,
        ),
        RegexCategory::new(
            "US_SSN",
            r"^(?:00[1-9]|0[1-9]\d|[1-578]\d{2}|6[0-57-9]\d|66[0-57-9])-?(?:0[1-9]|[1-9]\d)-?(?:000[1-9]|00[1-9]\d|0[1-9]\d{2}|[1-9]\d{3})$",
            MainCategory::Numeric,
        ),
        RegexCategory::new(
            "SEDOL",
            r"^[B-DF-HJ-NP-TV-XYZ\d]{6}\d$",
            MainCategory::AlphaNumeric,
        )
        .with_validator("sedol"),
        RegexCategory::new(
            "IBAN",
            r"^[A-Z]{2}\d{2}(?:\s?[A-Z0-9]){11,30}$",
            MainCategory::AlphaNumeric,
        )
        .with_validator("iban"),
        RegexCategory::new(
            "CREDIT_CARD",
            r"^(?:4\d{12}(?:\d{3})?|5[1-5]\d{14}|3[47]\d{13}|6(?:011|5\d{2})\d{12}|(?:\d{4}[-\s]){3}\d{4})$",
            MainCategory::Numeric,
        )
        .with_validator("luhn"),
        RegexCategory::new(
            "IPV4_ADDRESS",
            r"^(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)$",
            MainCategory::Numeric,
        ),
        RegexCategory::new(
            "UUID",
            r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
            MainCategory::AlphaNumeric,
        ),
    ]
}
