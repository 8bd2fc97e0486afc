//! Per-category match statistics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Category, KnownCategory};

/// Counts and frequency of one category within a recognition session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    /// Category descriptor (the empty category for null/blank values)
    pub category: Category,
    /// Number of values matching the category or one of its descendants
    pub count: u64,
    /// Percentage of all processed values, two decimals
    pub frequency: f32,
    /// Distance from the directly matched category; 0 for direct matches
    pub level: u32,
}

impl CategoryFrequency {
    /// Creates an accumulator with a count of zero.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            count: 0,
            frequency: 0.0,
            level: 0,
        }
    }

    /// Creates an accumulator at the given hierarchy level.
    pub fn with_level(category: Category, level: u32) -> Self {
        Self {
            level,
            ..Self::new(category)
        }
    }

    /// Category id.
    pub fn category_id(&self) -> &str {
        &self.category.id
    }

    /// Category name.
    pub fn category_name(&self) -> &str {
        &self.category.name
    }

    /// True for the bucket of null and blank values.
    pub fn is_empty_category(&self) -> bool {
        self.category.is_empty_category()
    }

    /// Recomputes `frequency` against `total` processed values.
    pub fn update_frequency(&mut self, total: u64) {
        self.frequency = percentage(self.count, total);
    }

    /// Canonical position; `None` for categories outside the known set.
    fn known_ordinal(&self) -> Option<usize> {
        KnownCategory::from_name(&self.category.name).map(KnownCategory::ordinal)
    }
}

/// `count / total` as a percentage rounded to two decimals; 0 when `total`
/// is 0.
pub fn percentage(count: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 * 10_000.0 / total as f64).round() / 100.0) as f32
}

impl Eq for CategoryFrequency {}

impl PartialOrd for CategoryFrequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryFrequency {
    /// Result order: the empty category last, then count descending. Ties
    /// put custom categories before known ones, known ones in canonical
    /// order, then sort by name and id.
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_empty_category()
            .cmp(&other.is_empty_category())
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| self.known_ordinal().cmp(&other.known_ordinal()))
            .then_with(|| self.category.name.cmp(&other.category.name))
            .then_with(|| self.category.id.cmp(&other.category.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryType;

    fn frequency(id: &str, count: u64) -> CategoryFrequency {
        CategoryFrequency {
            count,
            ..CategoryFrequency::new(Category::new(id, CategoryType::Dictionary))
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(2, 5), 40.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(7, 7), 100.0);
    }

    #[test]
    fn test_count_descending() {
        let mut list = vec![frequency("CITY", 1), frequency("COUNTRY", 4)];
        list.sort();
        assert_eq!(list[0].category_id(), "COUNTRY");
    }

    #[test]
    fn test_known_order_breaks_ties() {
        let mut list = vec![
            frequency("ANIMAL", 5),
            frequency("ZZZ_CUSTOM", 5),
            frequency("EMAIL", 5),
            frequency("AAA_CUSTOM", 5),
        ];
        list.sort();
        let ids: Vec<&str> = list.iter().map(|f| f.category_id()).collect();
        assert_eq!(ids, vec!["AAA_CUSTOM", "ZZZ_CUSTOM", "EMAIL", "ANIMAL"]);
    }

    #[test]
    fn test_custom_ties_rank_by_name() {
        let named = |id: &str, name: &str| CategoryFrequency {
            count: 2,
            ..CategoryFrequency::new(Category::new(id, CategoryType::Dictionary).with_name(name))
        };
        let mut list = vec![named("c-1", "ZONE"), named("c-2", "AREA"), frequency("EMAIL", 2)];
        list.sort();
        let names: Vec<&str> = list.iter().map(|f| f.category_name()).collect();
        assert_eq!(names, vec!["AREA", "ZONE", "EMAIL"]);
    }

    #[test]
    fn test_empty_category_is_last() {
        let mut empty = CategoryFrequency::new(Category::empty());
        empty.count = 100;
        let mut list = vec![empty, frequency("CITY", 1)];
        list.sort();
        assert!(list[1].is_empty_category());
    }
}
