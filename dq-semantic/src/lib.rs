//! # dq-semantic - Semantic category recognition for column data
//!
//! dq-semantic tells what kind of data a column holds. Each value is
//! classified against a catalog of semantic categories (e-mail, phone
//! number, city, first name, ...) and the matches are aggregated into
//! ranked per-category frequencies.
//!
//! ## Quick Start
//!
//! ```rust
//! use dq_semantic::prelude::*;
//!
//! # fn main() -> dq_semantic::error::Result<()> {
//! let mut recognizer = CategoryRecognizerBuilder::builtin().build()?;
//!
//! for value in [Some("jane@example.com"), Some("sliu@talend.com"), Some(""), None] {
//!     recognizer.process(value)?;
//! }
//!
//! let result = recognizer.result();
//! assert_eq!(result[0].category.name, "EMAIL");
//! assert_eq!(result[0].frequency, 50.0);
//! assert!(result.last().is_some_and(|f| f.is_empty_category()));
//! recognizer.end();
//! # Ok(())
//! # }
//! ```
//!
//! ## How values are classified
//!
//! - The lexical class of a value ([`model::MainCategory`]) decides which
//!   recognizers run: alphabetic and alphanumeric values go through the
//!   dictionaries and the regex catalog, numeric values through the regex
//!   catalog only.
//! - Regex categories ([`classifier::RegexClassifier`]) match a pattern and
//!   optionally a checksum validator (Luhn, SEDOL, IBAN).
//! - Dictionary categories ([`index::DictionaryIndex`]) match normalized
//!   reference values, with optional fuzzy matching; keyword categories
//!   match single tokens of longer values.
//! - Matches are counted once per value and propagated to every ancestor in
//!   the category hierarchy ([`model::CategoryMetadata`]).
//!
//! ## Profiling tables
//!
//! [`analyzers::SemanticTypeAnalyzer`] samples columns of tables registered
//! in a DataFusion `SessionContext` and reports a [`analyzers::ColumnSemanticProfile`]
//! per column; [`formatters`] render profiles as JSON, text or Markdown.
//! [`inference::CategoryInferenceManager`] does the same for records
//! streamed from any other source.
//!
//! ## Logging
//!
//! Every component logs through `tracing`. Call
//! [`logging::setup::init_logging`] or install your own subscriber.

pub mod analyzers;
pub mod classifier;
pub mod config;
pub mod error;
pub mod formatters;
pub mod index;
pub mod inference;
pub mod logging;
pub mod model;
pub mod prelude;
pub mod recognizer;
pub mod security;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
