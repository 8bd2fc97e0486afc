//! Inverted index over reference values.
//!
//! A [`DictionaryIndex`] maps normalized reference values to the ids of the
//! categories that list them. In [`IndexMode::Dictionary`] the whole
//! normalized value must match a reference value (with an optional fuzzy
//! fallback for single words); in [`IndexMode::Keyword`] any word of the value
//! matching a reference word is enough.
//!
//! # Example
//!
//! ```rust
//! use dq_semantic::classifier::CategoryLookup;
//! use dq_semantic::index::{DictionaryDocument, DictionaryIndex, IndexMode};
//!
//! let index = DictionaryIndex::from_documents(
//!     "answers",
//!     IndexMode::Dictionary,
//!     vec![DictionaryDocument::new("ANSWER", ["Yes", "No"])],
//! );
//! index.init_index();
//! assert!(index.find_categories("YES").unwrap().contains("ANSWER"));
//! index.close_index();
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::similarity::{levenshtein, overall_similarity};
use super::{tokenize, LookupOptions};
use crate::classifier::CategoryLookup;
use crate::error::{ErrorContext, Result, SemanticError};
use crate::logging::{truncate_field, LogConfig};
use crate::model::Category;

/// How values are matched against reference values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// The whole normalized value must equal a reference value.
    Dictionary,
    /// Any word of the value must equal a reference word.
    Keyword,
}

/// Reference values of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryDocument {
    /// Category id
    pub category: String,
    /// Raw reference values
    pub values: Vec<String>,
}

impl DictionaryDocument {
    /// Creates a document.
    pub fn new<I, S>(category: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug)]
struct ReferenceValue {
    raw: String,
    tokens: Vec<String>,
}

/// In-memory inverted index with handle counting.
#[derive(Debug)]
pub struct DictionaryIndex {
    name: String,
    mode: IndexMode,
    options: LookupOptions,
    log_config: LogConfig,
    entries: HashMap<String, BTreeSet<String>>,
    terms_by_length: BTreeMap<usize, Vec<String>>,
    by_category: HashMap<String, Vec<ReferenceValue>>,
    open_handles: AtomicUsize,
}

impl DictionaryIndex {
    /// Builds an index from documents with default lookup options.
    pub fn from_documents(
        name: impl Into<String>,
        mode: IndexMode,
        documents: impl IntoIterator<Item = DictionaryDocument>,
    ) -> Self {
        let mut index = Self {
            name: name.into(),
            mode,
            options: LookupOptions::default(),
            log_config: LogConfig::default(),
            entries: HashMap::new(),
            terms_by_length: BTreeMap::new(),
            by_category: HashMap::new(),
            open_handles: AtomicUsize::new(0),
        };
        for document in documents {
            index.add_document(document);
        }
        for terms in index.terms_by_length.values_mut() {
            terms.sort();
            terms.dedup();
        }
        debug!(
            index = %index.name,
            mode = ?index.mode,
            terms = index.entries.len(),
            categories = index.by_category.len(),
            "Built dictionary index"
        );
        index
    }

    /// Parses a JSON array of `{"category": ..., "values": [...]}` documents.
    pub fn from_json_str(name: impl Into<String>, mode: IndexMode, json: &str) -> Result<Self> {
        let documents: Vec<DictionaryDocument> = serde_json::from_str(json)?;
        Ok(Self::from_documents(name, mode, documents))
    }

    /// Reads documents from a JSON file.
    pub fn from_json_file(
        name: impl Into<String>,
        mode: IndexMode,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading dictionary {}", path.display()))?;
        Self::from_json_str(name, mode, &json)
    }

    /// Shared dictionary of the built-in alphabetic categories.
    pub fn builtin_dictionary() -> Self {
        let documents = BUILTIN_DICTIONARY
            .iter()
            .map(|(category, values)| DictionaryDocument::new(*category, values.iter().copied()));
        Self::from_documents("shared-dictionary", IndexMode::Dictionary, documents)
    }

    /// Built-in keyword index.
    pub fn builtin_keyword() -> Self {
        let documents = BUILTIN_KEYWORDS
            .iter()
            .map(|(category, values)| DictionaryDocument::new(*category, values.iter().copied()));
        Self::from_documents("keyword", IndexMode::Keyword, documents)
    }

    /// Replaces the lookup options.
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the logging switches.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Index name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matching mode.
    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    fn add_document(&mut self, document: DictionaryDocument) {
        let references = self.by_category.entry(document.category.clone()).or_default();
        for raw in document.values {
            let tokens = tokenize(&raw);
            if tokens.is_empty() {
                continue;
            }
            let keys = match self.mode {
                IndexMode::Dictionary => vec![tokens.join(" ")],
                IndexMode::Keyword => tokens.clone(),
            };
            for key in keys {
                self.terms_by_length
                    .entry(key.chars().count())
                    .or_default()
                    .push(key.clone());
                self.entries
                    .entry(key)
                    .or_default()
                    .insert(document.category.clone());
            }
            references.push(ReferenceValue { raw, tokens });
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open_handles() == 0 {
            return Err(SemanticError::IndexClosed(self.name.clone()));
        }
        Ok(())
    }

    fn exact_categories(&self, tokens: &[String]) -> BTreeSet<String> {
        match self.mode {
            IndexMode::Dictionary => self
                .entries
                .get(&tokens.join(" "))
                .cloned()
                .unwrap_or_default(),
            IndexMode::Keyword => tokens
                .iter()
                .filter_map(|token| self.entries.get(token))
                .flatten()
                .cloned()
                .collect(),
        }
    }

    fn fuzzy_categories(&self, token: &str) -> BTreeSet<String> {
        let length = token.chars().count();
        let max_edits = self.options.fuzzy_max_edits;
        let input = [token.to_string()];

        let mut candidates: Vec<(f32, &str)> = self
            .terms_by_length
            .range(length.saturating_sub(max_edits)..=length + max_edits)
            .flat_map(|(_, terms)| terms.iter())
            .filter(|term| levenshtein(token, term) <= max_edits)
            .filter_map(|term| {
                let score = overall_similarity(&input, &tokenize(term));
                (score >= self.options.min_similarity).then_some((score, term.as_str()))
            })
            .collect();
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        candidates.truncate(self.options.top_doc_limit);

        candidates
            .iter()
            .filter_map(|(_, term)| self.entries.get(*term))
            .flatten()
            .cloned()
            .collect()
    }

    /// Reference values of `category` similar to `input`, best first.
    ///
    /// Scores use [`overall_similarity`]; values scoring below
    /// `min_similarity` are dropped.
    pub fn find_similar_in_category(
        &self,
        input: &str,
        category: &str,
        min_similarity: f32,
    ) -> Result<Vec<(String, f32)>> {
        self.ensure_open()?;
        let input_tokens = tokenize(input);
        if input_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(String, f32)> = self
            .by_category
            .get(category)
            .map(|references| {
                references
                    .iter()
                    .map(|r| (r.raw.clone(), overall_similarity(&input_tokens, &r.tokens)))
                    .filter(|(_, score)| *score >= min_similarity)
                    .collect()
            })
            .unwrap_or_default();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.dedup_by(|a, b| a.0 == b.0);
        Ok(scored)
    }
}

impl CategoryLookup for DictionaryIndex {
    fn init_index(&self) {
        let handles = self.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(index = %self.name, handles, "Opened index handle");
    }

    fn close_index(&self) {
        let released = self
            .open_handles
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match released {
            Ok(previous) => debug!(index = %self.name, handles = previous - 1, "Closed index handle"),
            Err(_) => warn!(index = %self.name, "close_index called with no open handle"),
        }
    }

    fn find_categories(&self, value: &str) -> Result<BTreeSet<String>> {
        self.ensure_open()?;
        let tokens = tokenize(value);
        if tokens.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mut categories = self.exact_categories(&tokens);
        if categories.is_empty()
            && self.mode == IndexMode::Dictionary
            && self.options.fuzzy_matching
            && tokens.len() == 1
            && tokens[0].chars().count() >= self.options.fuzzy_min_length
        {
            categories = self.fuzzy_categories(&tokens[0]);
        }

        crate::log_lookup!(
            self.log_config,
            index = %self.name,
            value = %truncate_field(value, self.log_config.max_field_length),
            found = categories.len(),
            "Dictionary lookup"
        );
        Ok(categories)
    }

    fn valid_categories(
        &self,
        value: &str,
        category: &Category,
        children: &[&Category],
    ) -> Result<bool> {
        self.ensure_open()?;
        let tokens = tokenize(value);
        if tokens.is_empty() {
            return Ok(false);
        }
        let found = self.exact_categories(&tokens);
        Ok(found.contains(&category.id) || children.iter().any(|c| found.contains(&c.id)))
    }
}

impl From<&DictionaryIndex> for Vec<DictionaryDocument> {
    fn from(index: &DictionaryIndex) -> Self {
        let mut documents: Vec<DictionaryDocument> = index
            .by_category
            .iter()
            .map(|(category, references)| {
                DictionaryDocument::new(category.clone(), references.iter().map(|r| r.raw.clone()))
            })
            .collect();
        documents.sort_by(|a, b| a.category.cmp(&b.category));
        documents
    }
}

const BUILTIN_DICTIONARY: &[(&str, &[&str])] = &[
    (
        "ANSWER",
        &["Yes", "No", "Y", "N", "True", "False", "Oui", "Non", "Si", "Sí", "Ja", "Nein"],
    ),
    (
        "GENDER",
        &["Male", "Female", "M", "F", "Man", "Woman", "Homme", "Femme", "Masculin", "Féminin"],
    ),
    (
        "CIVILITY",
        &["Mr", "Mrs", "Ms", "Miss", "Dr", "Mister", "Madam", "Sir", "Monsieur", "Madame", "Mademoiselle"],
    ),
    (
        "US_STATE",
        &[
            "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
            "Connecticut", "Delaware", "Florida", "Georgia", "Hawaii", "Idaho",
            "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana", "Maine",
            "Maryland", "Massachusetts", "Michigan", "Minnesota", "Mississippi",
            "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
            "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio",
            "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island", "South Carolina",
            "South Dakota", "Tennessee", "Texas", "Utah", "Vermont", "Virginia",
            "Washington", "West Virginia", "Wisconsin", "Wyoming",
        ],
    ),
    (
        "COUNTRY",
        &[
            "France", "Germany", "Spain", "Italy", "Portugal", "Belgium", "Netherlands",
            "Switzerland", "Austria", "Ireland", "United Kingdom", "United States",
            "Canada", "Mexico", "Brazil", "Argentina", "Chile", "China", "Japan",
            "India", "Australia", "New Zealand", "South Africa", "Morocco", "Egypt",
            "Sweden", "Norway", "Denmark", "Finland", "Poland", "Greece", "Turkey",
            "Russia", "Georgia",
        ],
    ),
    (
        "CITY",
        &[
            "Paris", "London", "Berlin", "Madrid", "Rome", "Lisbon", "Brussels",
            "Amsterdam", "Geneva", "Vienna", "Dublin", "New York", "Los Angeles",
            "Chicago", "Houston", "Boston", "Seattle", "San Francisco", "Washington",
            "Toronto", "Montreal", "Tokyo", "Beijing", "Shanghai", "Sydney", "Nantes",
            "Lyon", "Marseille", "Toulouse", "Bordeaux", "Suresnes",
        ],
    ),
    (
        "FIRST_NAME",
        &[
            "James", "John", "Robert", "Michael", "William", "David", "Mary", "Patricia",
            "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
            "Karen", "Pierre", "Jean", "Marie", "Sophie", "Camille", "Louis", "Julien",
            "Emma", "Olivia", "Lucas", "Hugo", "Chloé",
        ],
    ),
    (
        "LAST_NAME",
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia",
            "Rodriguez", "Wilson", "Martinez", "Anderson", "Taylor", "Thomas", "Moore",
            "Martin", "Bernard", "Dubois", "Durand", "Lefebvre", "Leroy", "Moreau",
            "Washington",
        ],
    ),
    (
        "ANIMAL",
        &[
            "Cat", "Dog", "Horse", "Cow", "Sheep", "Goat", "Pig", "Rabbit", "Lion",
            "Tiger", "Elephant", "Giraffe", "Zebra", "Monkey", "Bear", "Wolf", "Fox",
            "Deer", "Eagle", "Dolphin", "Whale", "Shark", "Penguin", "Kangaroo",
        ],
    ),
];

const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "ADDRESS_LINE",
        &[
            "street", "st", "avenue", "ave", "road", "rd", "boulevard", "blvd", "lane",
            "drive", "court", "place", "square", "rue", "chemin", "allée", "impasse",
        ],
    ),
    (
        "COMPANY",
        &["inc", "ltd", "llc", "corp", "corporation", "company", "gmbh", "sarl", "sas", "plc"],
    ),
];
