//! Common fixtures for recognition tests.
//!
//! Small catalogs with known answers and DataFusion contexts whose string
//! columns have a predictable semantic profile.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;

use crate::classifier::CategoryLookup;
use crate::error::{Result, SemanticError};
use crate::index::{DictionaryDocument, DictionaryIndex, IndexMode};
use crate::model::{Category, CategoryMetadata, CategoryType};

/// Metadata with a single `ANSWER` dictionary category.
pub fn answer_metadata() -> CategoryMetadata {
    CategoryMetadata::from_categories(vec![Category::new("ANSWER", CategoryType::Dictionary)])
}

/// Dictionary listing `YES` and `NO` under `ANSWER`.
pub fn answer_dictionary() -> DictionaryIndex {
    DictionaryIndex::from_documents(
        "answers",
        IndexMode::Dictionary,
        vec![DictionaryDocument::new("ANSWER", ["YES", "NO"])],
    )
}

/// `PHONE` with the children `MOBILE` and `LANDLINE`, under `CONTACT`.
pub fn phone_hierarchy_metadata() -> CategoryMetadata {
    CategoryMetadata::from_categories(vec![
        Category::new("CONTACT", CategoryType::Compound).with_child("PHONE"),
        Category::new("PHONE", CategoryType::Compound)
            .with_parent("CONTACT")
            .with_child("MOBILE")
            .with_child("LANDLINE"),
        Category::new("MOBILE", CategoryType::Dictionary).with_parent("PHONE"),
        Category::new("LANDLINE", CategoryType::Dictionary).with_parent("PHONE"),
    ])
}

/// Lookup double counting `find_categories` calls.
#[derive(Debug)]
pub struct CountingLookup {
    inner: DictionaryIndex,
    calls: AtomicUsize,
}

impl CountingLookup {
    /// Wraps an index.
    pub fn new(inner: DictionaryIndex) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `find_categories` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CategoryLookup for CountingLookup {
    fn init_index(&self) {
        self.inner.init_index();
    }

    fn close_index(&self) {
        self.inner.close_index();
    }

    fn find_categories(&self, value: &str) -> Result<BTreeSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_categories(value)
    }

    fn valid_categories(
        &self,
        value: &str,
        category: &Category,
        children: &[&Category],
    ) -> Result<bool> {
        self.inner.valid_categories(value, category, children)
    }
}

/// Lookup double whose queries always fail.
#[derive(Debug, Default)]
pub struct FailingLookup;

impl CategoryLookup for FailingLookup {
    fn init_index(&self) {}

    fn close_index(&self) {}

    fn find_categories(&self, _value: &str) -> Result<BTreeSet<String>> {
        Err(SemanticError::lookup("failing", "simulated read failure"))
    }

    fn valid_categories(&self, _: &str, _: &Category, _: &[&Category]) -> Result<bool> {
        Err(SemanticError::lookup("failing", "simulated read failure"))
    }
}

/// Shared handle to a [`CountingLookup`] over [`answer_dictionary`].
pub fn counting_answer_lookup() -> Arc<CountingLookup> {
    Arc::new(CountingLookup::new(answer_dictionary()))
}

/// Creates a context with a `customers` table of 8 rows.
///
/// `email` holds 6 addresses, one NULL and one blank; `city` holds 8 cities
/// from the built-in dictionary; `phone` holds US numbers and one NULL.
pub async fn create_semantic_context() -> Result<SessionContext> {
    let ctx = SessionContext::new();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("email", DataType::Utf8, true),
        Field::new("city", DataType::Utf8, true),
        Field::new("phone", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6, 7, 8])),
            Arc::new(StringArray::from(vec![
                Some("alice@example.com"),
                Some("bob@example.com"),
                None,
                Some("david@example.org"),
                Some(""),
                Some("frank.martin@talend.com"),
                Some("grace@example.com"),
                Some("henry@example.fr"),
            ])),
            Arc::new(StringArray::from(vec![
                Some("Paris"),
                Some("London"),
                Some("Berlin"),
                Some("Madrid"),
                Some("Paris"),
                Some("Tokyo"),
                Some("Lyon"),
                Some("Nantes"),
            ])),
            Arc::new(StringArray::from(vec![
                Some("(541) 754-3010"),
                Some("+1-541-754-3010"),
                Some("1 541 754 3010"),
                None,
                Some("541.754.3010"),
                Some("(650) 539-3200"),
                Some("650 539 3200"),
                Some("n/a"),
            ])),
        ],
    )?;

    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("customers", Arc::new(table))?;

    Ok(ctx)
}
