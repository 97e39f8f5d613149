//! Post-OCR biomarker term correction.
//!
//! Fuzzy-matches words against the knowledge-base vocabulary to undo common
//! OCR misreads ("Creatinlne", "Cholesteral"). Conservative: only words of at
//! least 5 letters, edit distance 1 below 8 letters and 2 otherwise, and only
//! when the best match is unique.

use crate::knowledge::KnowledgeBase;

/// Report keywords that carry structure; never rewritten even when they sit
/// close to a vocabulary word.
const PROTECTED_WORDS: &[&str] = &[
    "comment", "comments", "interpretation", "investigation", "laboratory",
    "method", "methodology", "normal", "patient", "range", "reference",
    "remark", "remarks", "report", "result", "results", "sample", "specimen",
    "units", "value", "values",
];

const MIN_WORD_LEN: usize = 5;
const LONG_WORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct TermCorrector {
    /// Lowercase, sorted for binary search.
    vocabulary: Vec<String>,
}

impl TermCorrector {
    pub fn new(mut vocabulary: Vec<String>) -> Self {
        for word in vocabulary.iter_mut() {
            *word = word.to_lowercase();
        }
        vocabulary.sort();
        vocabulary.dedup();
        Self { vocabulary }
    }

    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        Self::new(kb.vocabulary())
    }

    /// Rewrite every correctable word; everything else passes through untouched.
    pub fn correct(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut word_buf = String::new();

        for ch in text.chars() {
            if ch.is_alphanumeric() {
                word_buf.push(ch);
            } else {
                if !word_buf.is_empty() {
                    result.push_str(&self.correct_word(&word_buf));
                    word_buf.clear();
                }
                result.push(ch);
            }
        }
        if !word_buf.is_empty() {
            result.push_str(&self.correct_word(&word_buf));
        }

        result
    }

    fn correct_word(&self, word: &str) -> String {
        let len = word.chars().count();
        if len < MIN_WORD_LEN || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }

        let lower = word.to_lowercase();
        if PROTECTED_WORDS.contains(&lower.as_str()) || self.vocabulary.binary_search(&lower).is_ok() {
            return word.to_string();
        }

        let max_distance: u32 = if len < LONG_WORD_LEN { 1 } else { 2 };
        let mut best_term: Option<&str> = None;
        let mut best_distance = max_distance + 1;
        let mut ambiguous = false;

        for term in &self.vocabulary {
            let len_diff = (len as i64 - term.chars().count() as i64).unsigned_abs();
            if len_diff > u64::from(max_distance) {
                continue;
            }
            let dist = edit_distance(&lower, term);
            if dist < best_distance {
                best_distance = dist;
                best_term = Some(term);
                ambiguous = false;
            } else if dist == best_distance && best_term.is_some() {
                ambiguous = true;
            }
        }

        match best_term {
            Some(term) if !ambiguous => preserve_case(word, term),
            _ => word.to_string(),
        }
    }
}

/// Keep the original capitalization pattern (UPPER, Title, lower).
fn preserve_case(original: &str, correction: &str) -> String {
    if original.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()) {
        return correction.to_uppercase();
    }

    let first_upper = original.chars().next().is_some_and(|c| c.is_uppercase());
    if first_upper {
        let mut chars = correction.chars();
        match chars.next() {
            Some(c) => {
                let mut s = c.to_uppercase().to_string();
                s.extend(chars);
                s
            }
            None => correction.to_string(),
        }
    } else {
        correction.to_string()
    }
}

/// Levenshtein distance over chars.
pub(crate) fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n as u32;
    }
    if n == 0 {
        return a_chars.len() as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = u32::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
