//! Analyzers that profile DataFusion tables.

pub mod semantic;

pub use semantic::{ColumnSemanticProfile, SemanticTypeAnalyzer};
