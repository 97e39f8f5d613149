use std::sync::Arc;

use crate::knowledge::{normalize_key, KnowledgeBase};
use crate::models::{BiomarkerDefinition, ExtractedBiomarker};

/// Canonicalizes extracted names against the knowledge base.
pub struct NameNormalizer {
    kb: Arc<KnowledgeBase>,
}

impl NameNormalizer {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Dictionary entry for a raw name:
    /// 1. exact match on a normalized canonical name or alias;
    /// 2. the longest key (> 2 chars) the input contains as whole words;
    /// 3. the shortest key containing the input (> 2 chars) at a word start.
    pub fn resolve(&self, name: &str) -> Option<&BiomarkerDefinition> {
        let key = normalize_key(name);
        if !key.chars().any(char::is_alphabetic) {
            return None;
        }
        if let Some(def) = self.kb.lookup_key(&key) {
            return Some(def);
        }

        let padded = format!(" {key} ");
        if let Some((_, def)) = self
            .kb
            .terms_by_length()
            .find(|(term, _)| term.len() > 2 && padded.contains(&format!(" {term} ")))
        {
            return Some(def);
        }

        if key.len() > 2 {
            let prefix = format!(" {key}");
            let mut shortest: Option<(usize, &BiomarkerDefinition)> = None;
            for (term, def) in self.kb.terms_by_length() {
                if format!(" {term}").contains(&prefix) && shortest.map_or(true, |(len, _)| term.len() <= len) {
                    shortest = Some((term.len(), def));
                }
            }
            return shortest.map(|(_, def)| def);
        }

        None
    }

    /// Canonical name, or None when the name has no alphabetic content or no
    /// dictionary entry.
    pub fn normalize(&self, name: &str) -> Option<String> {
        self.resolve(name).map(|def| def.canonical_name.to_string())
    }

    /// Canonicalize candidates in place. Names without letters are dropped;
    /// unknown names keep their cleaned raw spelling.
    pub fn apply(&self, candidates: Vec<ExtractedBiomarker>) -> Vec<ExtractedBiomarker> {
        candidates
            .into_iter()
            .filter_map(|mut candidate| {
                let source = if candidate.canonical_name.trim().is_empty() {
                    candidate.raw_name.clone()
                } else {
                    candidate.canonical_name.clone()
                };
                if !source.chars().any(char::is_alphabetic) {
                    return None;
                }
                match self.resolve(&source) {
                    Some(def) => {
                        candidate.canonical_name = def.canonical_name.to_string();
                        candidate.category = def.category;
                    }
                    None => {
                        candidate.canonical_name = clean_name(&source);
                    }
                }
                Some(candidate)
            })
            .collect()
    }
}

/// Collapse whitespace and strip trailing separators; case is preserved.
fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([':', '=', '-', ',', '.'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::dictionary::BIOMARKERS;
    use crate::models::BiomarkerCategory;

    fn normalizer() -> NameNormalizer {
        NameNormalizer::new(KnowledgeBase::shared())
    }

    #[test]
    fn every_alias_normalizes_like_its_canonical_name() {
        let n = normalizer();
        for def in BIOMARKERS {
            let canonical = n.normalize(def.canonical_name);
            assert_eq!(canonical.as_deref(), Some(def.canonical_name));
            for alias in def.aliases {
                assert_eq!(n.normalize(alias), canonical, "alias {alias} of {}", def.canonical_name);
            }
        }
    }

    #[test]
    fn exact_match_ignores_case_and_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("HDL-C").as_deref(), Some("HDL Cholesterol"));
        assert_eq!(n.normalize("  s.g.p.t ").as_deref(), None);
        assert_eq!(n.normalize("SGPT:").as_deref(), Some("ALT"));
    }

    #[test]
    fn containment_prefers_longest_key() {
        let n = normalizer();
        assert_eq!(n.normalize("Serum HDL Cholesterol Direct").as_deref(), Some("HDL Cholesterol"));
        assert_eq!(n.normalize("Alanine Aminotransferase (ALT)").as_deref(), Some("ALT"));
        assert_eq!(n.normalize("Glucose PP level").as_deref(), Some("Postprandial Glucose"));
        assert_eq!(n.normalize("Glucose (Fasting) level").as_deref(), Some("Glucose"));
    }

    #[test]
    fn reverse_containment_for_abbreviations() {
        let n = normalizer();
        assert_eq!(n.normalize("Triglycer").as_deref(), Some("Triglycerides"));
    }

    #[test]
    fn no_alphabetic_content_is_none() {
        let n = normalizer();
        assert!(n.normalize("123.4").is_none());
        assert!(n.normalize("--").is_none());
    }

    #[test]
    fn apply_sets_canonical_and_category() {
        let n = normalizer();
        let candidates = vec![
            ExtractedBiomarker::new("Sugar Fasting Blood", "generic_pattern", 0.8),
            ExtractedBiomarker::new("Lp(a)", "generic_pattern", 0.7),
            ExtractedBiomarker::new("123", "generic_pattern", 0.7),
        ];
        let out = n.apply(candidates);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].canonical_name, "Lp(a)");
        assert_eq!(out[1].category, BiomarkerCategory::General);
    }

    #[test]
    fn apply_resolves_generic_names() {
        let n = normalizer();
        let out = n.apply(vec![ExtractedBiomarker::new("Serum Creatinine", "generic_pattern", 0.8)]);
        assert_eq!(out[0].canonical_name, "Creatinine");
        assert_eq!(out[0].category, BiomarkerCategory::Kidney);
        assert_eq!(out[0].raw_name, "Serum Creatinine");
    }
}
