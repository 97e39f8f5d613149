use std::collections::HashMap;

use crate::models::ExtractedBiomarker;

/// Combine per-strategy candidate lists into one list keyed by lower-cased
/// canonical name. First-seen order is kept; a later candidate replaces the
/// kept one only when `replaces` says so.
pub fn merge(strategy_results: Vec<Vec<ExtractedBiomarker>>) -> Vec<ExtractedBiomarker> {
    let mut merged: Vec<ExtractedBiomarker> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in strategy_results.into_iter().flatten() {
        let key = candidate.merge_key();
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => {
                if replaces(&merged[i], &candidate) {
                    merged[i] = candidate;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

/// Value+unit completeness outranks confidence; otherwise strictly higher
/// confidence wins, so exact ties keep the incumbent.
pub fn replaces(incumbent: &ExtractedBiomarker, challenger: &ExtractedBiomarker) -> bool {
    match (incumbent.has_value_and_unit(), challenger.has_value_and_unit()) {
        (true, false) => false,
        (false, true) => true,
        _ => challenger.confidence > incumbent.confidence,
    }
}
