//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use dq_semantic::prelude::*;

/// Builtin recognizer with a custom configuration.
pub fn builtin_recognizer(config: RecognizerConfig) -> DefaultCategoryRecognizer {
    CategoryRecognizerBuilder::builtin()
        .config(config)
        .build()
        .unwrap()
}

/// Recognizer over a single dictionary and no regex categories.
pub fn dictionary_recognizer(
    categories: Vec<Category>,
    documents: Vec<DictionaryDocument>,
) -> DefaultCategoryRecognizer {
    CategoryRecognizerBuilder::new()
        .metadata(CategoryMetadata::from_categories(categories))
        .regex_classifier(Arc::new(RegexClassifier::new(Vec::new(), true).unwrap()))
        .dictionary(Arc::new(DictionaryIndex::from_documents(
            "test",
            IndexMode::Dictionary,
            documents,
        )))
        .build()
        .unwrap()
}

/// Feeds every value and returns the ranked result.
pub fn recognize<R: CategoryRecognizer>(
    recognizer: &mut R,
    values: &[Option<&str>],
) -> Vec<CategoryFrequency> {
    for value in values {
        recognizer.process(*value).unwrap();
    }
    recognizer.result()
}

/// Context with a `contacts` table: `name`, `email`, `phone`, `country`.
pub async fn contacts_context() -> SessionContext {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("email", DataType::Utf8, true),
        Field::new("phone", DataType::Utf8, true),
        Field::new("country", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6])),
            Arc::new(StringArray::from(vec![
                Some("James"),
                Some("Mary"),
                Some("Sophie"),
                Some("Lucas"),
                None,
                Some("Olivia"),
            ])),
            Arc::new(StringArray::from(vec![
                Some("james@example.com"),
                Some("mary.smith@example.org"),
                Some("sophie@talend.com"),
                Some("not-an-email"),
                Some("  "),
                Some("olivia+news@example.co.uk"),
            ])),
            Arc::new(StringArray::from(vec![
                Some("(541) 754-3010"),
                Some("+1-541-754-3010"),
                Some("1 541 754 3010"),
                Some("541.754.3010"),
                Some("(650) 539-3200"),
                None,
            ])),
            Arc::new(StringArray::from(vec![
                Some("France"),
                Some("Germany"),
                Some("Japan"),
                Some("Canada"),
                Some("France"),
                Some("Atlantis"),
            ])),
        ],
    )
    .unwrap();

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    ctx.register_table("contacts", Arc::new(table)).unwrap();
    ctx
}
