//! Classifiers consulted by the recognizer for each value.
//!
//! Two seams are defined here:
//!
//! - [`PatternClassifier`] evaluates a value against regex categories.
//! - [`CategoryLookup`] answers "which categories list this value" from
//!   reference dictionaries and keyword indexes.
//!
//! Both are object safe so recognizers can hold them as `Arc<dyn ...>` and
//! tests can substitute counting or failing doubles.

pub mod dictionary;
pub mod regex;
pub mod validators;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::model::{Category, MainCategory};

pub use dictionary::DictionaryFieldClassifier;
pub use regex::{RegexCategory, RegexClassifier};
pub use validators::{validator_by_name, IbanValidator, LuhnValidator, SedolValidator, SemanticValidator};

/// Regex layer contract.
pub trait PatternClassifier: Send + Sync + std::fmt::Debug {
    /// Ids of the categories whose definition applies to `main_category`
    /// and matches `value`.
    fn classify(&self, value: &str, main_category: MainCategory) -> BTreeSet<String>;

    /// True when the category `id` matches `value`, regardless of class.
    fn is_valid(&self, id: &str, value: &str) -> bool {
        self.classify(value, MainCategory::of(Some(value))).contains(id)
    }
}

/// Dictionary and keyword lookup contract.
///
/// Lookups require an open handle: every `init_index` must be paired with a
/// `close_index`. Lookups with no open handle fail with
/// [`SemanticError::IndexClosed`](crate::error::SemanticError::IndexClosed).
pub trait CategoryLookup: Send + Sync + std::fmt::Debug {
    /// Opens a handle on the underlying index.
    fn init_index(&self);

    /// Releases a handle previously opened with `init_index`.
    fn close_index(&self);

    /// Ids of the categories whose reference values contain `value`.
    fn find_categories(&self, value: &str) -> Result<BTreeSet<String>>;

    /// True when `value` is a reference value of `category` or of one of
    /// `children`.
    fn valid_categories(&self, value: &str, category: &Category, children: &[&Category])
        -> Result<bool>;
}
