//! Read-only biomarker knowledge base.
//!
//! Built once per process (see [`KnowledgeBase::shared`]) and handed to every
//! stage by `Arc`. Nothing mutates it after construction.

pub mod dictionary;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use thiserror::Error;

use crate::models::BiomarkerDefinition;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Term '{term}' maps to both '{first}' and '{second}'")]
    DuplicateTerm {
        term: String,
        first: String,
        second: String,
    },

    #[error("Definition '{0}' has an empty canonical name or no unit")]
    IncompleteDefinition(String),
}

/// Lowercase, punctuation to spaces, collapsed whitespace.
/// "HDL-C", "hdl c" and " HDL  c. " share the key "hdl c".
pub fn normalize_key(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

static SHARED: LazyLock<Arc<KnowledgeBase>> =
    LazyLock::new(|| Arc::new(KnowledgeBase::builtin()));

#[derive(Debug)]
pub struct KnowledgeBase {
    definitions: Vec<BiomarkerDefinition>,
    /// normalized term -> index into `definitions`
    index: HashMap<String, usize>,
    /// (normalized term, index), longest term first
    terms_by_length: Vec<(String, usize)>,
}

impl KnowledgeBase {
    /// Process-wide instance built from the bundled dictionary.
    pub fn shared() -> Arc<KnowledgeBase> {
        Arc::clone(&SHARED)
    }

    /// Fresh instance over the bundled dictionary. Duplicate terms keep the
    /// first definition (the bundled table has none; see tests).
    pub fn builtin() -> Self {
        match Self::build(dictionary::BIOMARKERS.to_vec(), false) {
            Ok(kb) => kb,
            Err(e) => {
                tracing::error!(error = %e, "Bundled biomarker dictionary rejected");
                Self {
                    definitions: Vec::new(),
                    index: HashMap::new(),
                    terms_by_length: Vec::new(),
                }
            }
        }
    }

    /// Strict constructor for custom dictionaries: conflicting terms are an error.
    pub fn from_definitions(definitions: Vec<BiomarkerDefinition>) -> Result<Self, KnowledgeError> {
        Self::build(definitions, true)
    }

    fn build(definitions: Vec<BiomarkerDefinition>, strict: bool) -> Result<Self, KnowledgeError> {
        let mut index: HashMap<String, usize> = HashMap::new();

        for (i, def) in definitions.iter().enumerate() {
            if def.canonical_name.trim().is_empty() || def.units.is_empty() {
                return Err(KnowledgeError::IncompleteDefinition(def.canonical_name.to_string()));
            }
            for term in def.terms() {
                let key = normalize_key(term);
                if key.is_empty() {
                    continue;
                }
                match index.get(&key) {
                    Some(&existing) if existing != i => {
                        if strict {
                            return Err(KnowledgeError::DuplicateTerm {
                                term: key,
                                first: definitions[existing].canonical_name.to_string(),
                                second: def.canonical_name.to_string(),
                            });
                        }
                        tracing::warn!(term = %key, "Duplicate biomarker term ignored");
                    }
                    Some(_) => {}
                    None => {
                        index.insert(key, i);
                    }
                }
            }
        }

        let mut terms_by_length: Vec<(String, usize)> =
            index.iter().map(|(k, &i)| (k.clone(), i)).collect();
        // Longest first; ties broken alphabetically so lookups are deterministic.
        terms_by_length.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self {
            definitions,
            index,
            terms_by_length,
        })
    }

    pub fn definitions(&self) -> &[BiomarkerDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Exact lookup by canonical name or alias (any spelling `normalize_key` folds).
    pub fn get(&self, name: &str) -> Option<&BiomarkerDefinition> {
        self.lookup_key(&normalize_key(name))
    }

    /// Exact lookup by an already-normalized key.
    pub fn lookup_key(&self, key: &str) -> Option<&BiomarkerDefinition> {
        self.index.get(key).map(|&i| &self.definitions[i])
    }

    /// All normalized terms, longest first.
    pub fn terms_by_length(&self) -> impl Iterator<Item = (&str, &BiomarkerDefinition)> {
        self.terms_by_length
            .iter()
            .map(|(term, i)| (term.as_str(), &self.definitions[*i]))
    }

    /// Single lowercase words (>= 5 chars) appearing in any term; the
    /// vocabulary for post-OCR spelling correction. Sorted, deduplicated.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .index
            .keys()
            .flat_map(|k| k.split(' '))
            .filter(|w| w.chars().count() >= 5 && w.chars().all(char::is_alphabetic))
            .map(str::to_string)
            .collect();
        words.sort();
        words.dedup();
        words
    }
}
