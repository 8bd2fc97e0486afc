//! End-to-end behaviour of category recognizers.

mod common;

use std::sync::Arc;

use common::{builtin_recognizer, dictionary_recognizer, recognize};
use dq_semantic::prelude::*;

#[test]
fn test_answer_column() {
    let mut recognizer = dictionary_recognizer(
        vec![Category::new("ANSWER", CategoryType::Dictionary)],
        vec![DictionaryDocument::new("ANSWER", ["YES", "NO"])],
    );

    let result = recognize(
        &mut recognizer,
        &[Some("YES"), Some("NO"), Some("unknownword"), Some(""), None],
    );

    assert_eq!(recognizer.total(), 5);
    assert_eq!(recognizer.empty_count(), 2);
    assert_eq!(result.len(), 2);

    assert_eq!(result[0].category.name, "ANSWER");
    assert_eq!(result[0].count, 2);
    assert_eq!(result[0].frequency, 40.0);

    assert!(result[1].is_empty_category());
    assert_eq!(result[1].count, 2);
    assert_eq!(result[1].frequency, 40.0);
}

#[test]
fn test_process_returns_category_names() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());

    assert_eq!(recognizer.process(Some("sliu@talend.com")).unwrap(), vec!["EMAIL"]);
    assert_eq!(recognizer.process(Some("Paris")).unwrap(), vec!["CITY"]);
    assert!(recognizer.process(None).unwrap().is_empty());
    assert!(recognizer.process(Some("   ")).unwrap().is_empty());
    assert!(recognizer.process(Some("!!!")).unwrap().is_empty());

    assert_eq!(recognizer.total(), 5);
    assert_eq!(recognizer.empty_count(), 2);
}

#[test]
fn test_repeated_values_hit_the_cache() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    for _ in 0..10 {
        recognizer.process(Some("London")).unwrap();
    }

    let stats = recognizer.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 9);
    assert_eq!(recognizer.result()[0].count, 10);
}

#[test]
fn test_cache_eviction_keeps_counting() {
    let config = RecognizerConfig::default()
        .with_cache_capacity(4)
        .with_cache_eviction_factor(0.5);
    let mut recognizer = builtin_recognizer(config);

    let cities = ["Paris", "London", "Berlin", "Madrid", "Rome", "Lisbon", "Paris"];
    let result = recognize(&mut recognizer, &cities.map(Some));

    let stats = recognizer.cache_stats();
    assert!(stats.entries <= 4);
    assert!(stats.evictions >= 2);
    assert_eq!(result[0].category.name, "CITY");
    assert_eq!(result[0].count, 7);
}

#[test]
fn test_result_is_idempotent() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    recognize(
        &mut recognizer,
        &[Some("(541) 754-3010"), Some("Washington"), None],
    );

    let first = recognizer.result();
    let second = recognizer.result();
    assert_eq!(first, second);
}

#[test]
fn test_ties_follow_canonical_order() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    let result = recognize(&mut recognizer, &[Some("Washington"), None]);

    let names: Vec<&str> = result.iter().map(|f| f.category.name.as_str()).collect();
    assert_eq!(names, vec!["LAST_NAME", "CITY", "US_STATE", ""]);
    assert!(result.iter().take(3).all(|f| f.frequency == 50.0));
}

#[test]
fn test_empty_bucket_sorts_last() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    let result = recognize(&mut recognizer, &[None, None, None, Some("Paris")]);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].category.name, "CITY");
    assert!(result[1].is_empty_category());
    assert_eq!(result[1].count, 3);
    assert_eq!(result[1].frequency, 75.0);
}

#[test]
fn test_phone_numbers_roll_up_to_parent() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    let result = recognize(
        &mut recognizer,
        &[
            Some("(541) 754-3010"),
            Some("1 541 754 3010"),
            Some("08 25 01 20 11"),
            Some("+33123456789"),
        ],
    );

    let phone = result.iter().find(|f| f.category.name == "PHONE").unwrap();
    let us = result.iter().find(|f| f.category.name == "US_PHONE").unwrap();
    let fr = result.iter().find(|f| f.category.name == "FR_PHONE").unwrap();

    assert_eq!(us.count, 2);
    assert_eq!(fr.count, 2);
    assert_eq!(phone.count, 4);
    assert_eq!(phone.level, 1);
    assert_eq!(phone.frequency, 100.0);
    assert_eq!(result[0].category.name, "PHONE");
}

#[test]
fn test_deleted_category_is_not_reported() {
    let mut metadata = CategoryMetadata::builtin();
    assert!(metadata.mark_deleted("CITY"));

    let mut recognizer = CategoryRecognizerBuilder::builtin()
        .metadata(metadata)
        .build()
        .unwrap();
    let result = recognize(&mut recognizer, &[Some("Paris"), Some("Washington")]);

    assert!(result.iter().all(|f| f.category.name != "CITY"));
    assert!(result.iter().any(|f| f.category.name == "US_STATE"));
}

#[test]
fn test_keyword_categories_match_long_values() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    let found = recognizer.process(Some("12 rue de la Paix")).unwrap();
    assert!(found.contains(&"ADDRESS_LINE".to_string()));

    let found = recognizer.process(Some("Acme Widgets Inc")).unwrap();
    assert!(found.contains(&"COMPANY".to_string()));
}

#[test]
fn test_fuzzy_matching_can_be_disabled() {
    let mut fuzzy = builtin_recognizer(RecognizerConfig::default());
    assert_eq!(fuzzy.process(Some("Pariss")).unwrap(), vec!["CITY"]);

    let mut exact = builtin_recognizer(RecognizerConfig::default().with_fuzzy_matching(false));
    assert!(exact.process(Some("Pariss")).unwrap().is_empty());
}

#[test]
fn test_validate_against_category() {
    let recognizer = builtin_recognizer(RecognizerConfig::default());

    assert!(recognizer.validate("sliu@talend.com", "EMAIL").unwrap());
    assert!(!recognizer.validate("sliu@talend", "EMAIL").unwrap());
    assert!(recognizer.validate("Nantes", "CITY").unwrap());
    assert!(!recognizer.validate("Nantes", "COUNTRY").unwrap());
    assert!(!recognizer.validate("Nantes", "NO_SUCH_CATEGORY").unwrap());
}

#[test]
fn test_reset_and_end() {
    let mut recognizer = builtin_recognizer(RecognizerConfig::default());
    recognize(&mut recognizer, &[Some("Paris"), None]);

    recognizer.reset();
    assert_eq!(recognizer.total(), 0);
    assert_eq!(recognizer.empty_count(), 0);
    assert!(recognizer.result().is_empty());
    assert_eq!(recognizer.cache_stats().entries, 0);

    recognizer.end();
    recognizer.end();
    assert!(matches!(
        recognizer.process(Some("Paris")),
        Err(SemanticError::RecognizerEnded)
    ));
}

#[test]
fn test_tenant_dictionary_overrides_shared() {
    let mut metadata = CategoryMetadata::builtin();
    metadata.apply_override(
        Category::new("CITY", CategoryType::Dictionary).with_label("Customer cities"),
    );

    let custom = DictionaryIndex::from_documents(
        "tenant",
        IndexMode::Dictionary,
        vec![DictionaryDocument::new("CITY", ["Springfield"])],
    );
    let mut recognizer = CategoryRecognizerBuilder::builtin()
        .metadata(metadata)
        .custom_dictionary(Arc::new(custom))
        .build()
        .unwrap();

    assert_eq!(recognizer.process(Some("Springfield")).unwrap(), vec!["CITY"]);
    assert!(recognizer.validate("Springfield", "CITY").unwrap());
}
