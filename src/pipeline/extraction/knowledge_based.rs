use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{value_after, ExtractionStrategy};
use crate::knowledge::KnowledgeBase;
use crate::models::{normalize_unit, BiomarkerDefinition, ExtractedBiomarker};

pub const STRATEGY_NAME: &str = "knowledge_based";

/// Header/footer lines; skipped before any dictionary matching.
static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:page|date|laboratory|sample|name|age)\b").unwrap()
});

/// Unit-shaped token: "mg/dL", "%", "10^3/uL", "/cumm", "mg%".
static UNIT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%|[xX]?10\^\d+/[A-Za-zµ]+|/?[A-Za-zµ][A-Za-zµ0-9]*(?:/[A-Za-zµ0-9^.]+)*%?)$").unwrap()
});

struct TermMatcher {
    regex: Regex,
    definition: usize,
}

/// Scans each line for dictionary names and aliases.
///
/// Matchers are compiled once, longest term first, so the first hit on a line
/// is the most specific one ("HDL Cholesterol" over "Cholesterol").
pub struct KnowledgeBasedExtractor {
    kb: Arc<KnowledgeBase>,
    matchers: Vec<TermMatcher>,
    confidence: f32,
}

impl KnowledgeBasedExtractor {
    pub fn new(kb: Arc<KnowledgeBase>, confidence: f32) -> Self {
        let mut matchers = Vec::new();
        for (term, def) in kb.terms_by_length() {
            let Some(definition) = kb
                .definitions()
                .iter()
                .position(|d| d.canonical_name == def.canonical_name)
            else {
                continue;
            };
            let body = term
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s\-./]*");
            match Regex::new(&format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}])({body})(?:$|[^\p{{L}}\p{{N}}])")) {
                Ok(regex) => matchers.push(TermMatcher { regex, definition }),
                Err(e) => tracing::warn!(term, error = %e, "Skipping unmatchable dictionary term"),
            }
        }

        Self {
            kb,
            matchers,
            confidence,
        }
    }

    fn extract_line(&self, line: &str) -> Option<ExtractedBiomarker> {
        if HEADER_LINE.is_match(line) {
            return None;
        }

        let (matched, def) = self.matchers.iter().find_map(|m| {
            m.regex
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|hit| (hit, &self.kb.definitions()[m.definition]))
        })?;

        let value = value_after(line, matched.end())?;
        let unit = line_unit(line, matched.end(), value, def);

        Some(
            ExtractedBiomarker::new(matched.as_str(), STRATEGY_NAME, self.confidence)
                .with_value(value, unit)
                .with_reference_range(&def.reference_range())
                .with_category(def.category)
                .with_source_line(line)
                .with_canonical(def.canonical_name),
        )
    }
}

/// Unit for a matched line. A dictionary unit anywhere after the value wins,
/// since unit columns often follow the reference range. Otherwise a unit
/// printed right after the value is kept as printed, so validation sees a
/// unit it cannot compare against. Failing both, the primary unit.
fn line_unit<'a>(line: &'a str, from: usize, value: f64, def: &BiomarkerDefinition) -> &'a str {
    let rest = &line[from..];
    let Some(after_value) = super::standalone_numbers(rest)
        .into_iter()
        .find(|(_, v)| (*v - value).abs() < f64::EPSILON)
        .map(|(pos, _)| {
            let after = &rest[pos..];
            let skip = after.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(after.len());
            &after[skip..]
        })
    else {
        return def.primary_unit();
    };

    let tokens: Vec<&str> = after_value
        .split(|c: char| c.is_whitespace() || c == '|')
        .map(|t| t.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '[' | ']')))
        .filter(|t| !t.is_empty())
        .collect();

    let accepted = tokens.iter().find_map(|token| {
        let wanted = normalize_unit(token);
        def.units.iter().copied().find(|u| normalize_unit(u) == wanted)
    });
    if let Some(unit) = accepted {
        return unit;
    }

    match tokens.first() {
        Some(&first) if UNIT_TOKEN.is_match(first) && first.contains(['/', '%', '^']) => first,
        _ => def.primary_unit(),
    }
}

impl ExtractionStrategy for KnowledgeBasedExtractor {
    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn extract(&self, text: &str) -> Vec<ExtractedBiomarker> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.extract_line(line))
            .collect()
    }
}
