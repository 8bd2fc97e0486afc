//! Category data model: descriptors, the category graph, lexical classes and
//! the canonical ordering of well-known categories.

pub mod category;
pub mod known;
pub mod lexical;
pub mod metadata;

pub use category::{Category, CategoryType};
pub use known::KnownCategory;
pub use lexical::MainCategory;
pub use metadata::CategoryMetadata;
