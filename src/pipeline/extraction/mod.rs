//! Biomarker extraction strategies.
//!
//! Every strategy turns preprocessed report text into candidates on its own;
//! `merge` reconciles them afterwards. Strategies share only the read-only
//! knowledge base.

pub mod adapter;
pub mod category;
pub mod generic;
pub mod knowledge_based;
pub mod merge;
pub mod names;

pub use adapter::TabularReportAdapter;
pub use category::infer_category;
pub use generic::GenericPatternExtractor;
pub use knowledge_based::KnowledgeBasedExtractor;
pub use merge::merge;
pub use names::NameNormalizer;

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ExtractedBiomarker;

/// One independent way of finding biomarkers in report text.
pub trait ExtractionStrategy: Send + Sync {
    /// Recorded on every candidate and in report metadata.
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Vec<ExtractedBiomarker>;
}

/// Layout-specific parser, run only when it recognises the document.
pub trait FormatAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, text: &str) -> bool;

    fn extract(&self, text: &str) -> Vec<ExtractedBiomarker>;
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Reference-range shapes printed on reports: "70-99", "70 - 99", "3.5 to 5.0",
/// "<200", ">= 40", "Up to 200".
pub(crate) static RANGE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[(\[]?\s*(?:\d+(?:\.\d+)?\s*(?:-|to)\s*\d+(?:\.\d+)?|(?:[<>]=?|≤|≥|up\s*to|upto|less\s+than|more\s+than|greater\s+than)\s*\d+(?:\.\d+)?)\s*[)\]]?$",
    )
    .unwrap()
});

/// Numbers not glued to letters: "120" in "Glucose 120" but not "12" in "B12",
/// nor "25" in "25-OH".
pub(crate) fn standalone_numbers(text: &str) -> Vec<(usize, f64)> {
    NUMBER
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let mut rest = text[m.end()..].chars();
            let after = rest.next();
            let hyphenated_word = after == Some('-') && rest.next().is_some_and(char::is_alphabetic);
            !before.is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '^')
                && !after.is_some_and(|c| c.is_alphanumeric())
                && !hyphenated_word
        })
        .filter_map(|m| m.as_str().parse::<f64>().ok().map(|v| (m.start(), v)))
        .collect()
}

/// First standalone number at or after byte offset `from`; else the first one
/// anywhere on the line.
pub(crate) fn value_after(line: &str, from: usize) -> Option<f64> {
    let numbers = standalone_numbers(line);
    numbers
        .iter()
        .find(|(pos, _)| *pos >= from)
        .or_else(|| numbers.first())
        .map(|(_, v)| *v)
}
