//! Coarse lexical classification of raw values.

use serde::{Deserialize, Serialize};

/// Lexical class of a raw value, used to route it to recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    /// Missing value
    Null,
    /// Empty or whitespace-only value
    Blank,
    /// Letters, no digits
    Alpha,
    /// Letters and digits
    AlphaNumeric,
    /// Digits, no letters
    Numeric,
    /// Neither letters nor digits
    Unknown,
}

impl MainCategory {
    /// Classifies a raw value.
    ///
    /// Separators and punctuation do not affect the class: `"(541) 754-3010"`
    /// is numeric, `"New York"` is alphabetic.
    pub fn of(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return MainCategory::Null;
        };
        if value.trim().is_empty() {
            return MainCategory::Blank;
        }

        let mut has_letter = false;
        let mut has_digit = false;
        for c in value.chars() {
            if c.is_alphabetic() {
                has_letter = true;
            } else if c.is_numeric() {
                has_digit = true;
            }
            if has_letter && has_digit {
                return MainCategory::AlphaNumeric;
            }
        }

        match (has_letter, has_digit) {
            (true, false) => MainCategory::Alpha,
            (false, true) => MainCategory::Numeric,
            _ => MainCategory::Unknown,
        }
    }

    /// True for null and blank values.
    pub fn is_empty(self) -> bool {
        matches!(self, MainCategory::Null | MainCategory::Blank)
    }

    /// True when a regex category tagged `self` should be evaluated for a
    /// value of class `value_class`.
    ///
    /// `AlphaNumeric` definitions apply to any non-empty value.
    pub fn accepts(self, value_class: MainCategory) -> bool {
        match self {
            MainCategory::AlphaNumeric => matches!(
                value_class,
                MainCategory::Alpha | MainCategory::AlphaNumeric | MainCategory::Numeric
            ),
            MainCategory::Alpha => value_class == MainCategory::Alpha,
            MainCategory::Numeric => value_class == MainCategory::Numeric,
            MainCategory::Null | MainCategory::Blank | MainCategory::Unknown => false,
        }
    }
}
