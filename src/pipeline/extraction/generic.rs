//! Dictionary-free extraction: an ordered cascade of line patterns.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::category::infer_category;
use super::ExtractionStrategy;
use crate::models::{BiomarkerCategory, ExtractedBiomarker};

pub const STRATEGY_NAME: &str = "generic_pattern";

const MAX_NAME_LEN: usize = 60;

const NAME: &str = r"(?P<name>[A-Za-z][A-Za-z0-9\-',./ ]*?)";
const VALUE: &str = r"(?P<value>\d+(?:\.\d+)?)";
const UNIT: &str =
    r"(?P<unit>%|[xX]?\s?10\^\d+/[A-Za-zµ]+|[A-Za-zµ][A-Za-zµ0-9]*(?:/[A-Za-zµ0-9^.]+)*)";
const RANGE: &str = r"[(\[]?\s*(?P<range>(?:[<>]=?|≤|≥)\s*\d+(?:\.\d+)?|\d+(?:\.\d+)?\s*(?:-|to)\s*\d+(?:\.\d+)?)\s*[)\]]?";

/// One step of the cascade.
pub struct PatternRule {
    pub name: &'static str,
    pub regex: Regex,
    pub confidence: f32,
    pub infer_category: fn(&str) -> BiomarkerCategory,
}

/// Highest confidence first; the first rule that matches a line wins.
pub static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule {
            name: "name_value_unit_range",
            regex: Regex::new(&format!(r"^\s*{NAME}\s*[:=]?\s+{VALUE}\s*{UNIT}\s+{RANGE}")).unwrap(),
            confidence: 0.80,
            infer_category,
        },
        PatternRule {
            name: "name_value_unit",
            regex: Regex::new(&format!(
                r"^\s*{NAME}\s*[:=]?\s+{VALUE}\s*{UNIT}(?:\s+[A-Za-z*!]{{1,10}})?\s*$"
            ))
            .unwrap(),
            confidence: 0.70,
            infer_category,
        },
        PatternRule {
            name: "name_parenthetical_value_unit",
            regex: Regex::new(&format!(
                r"^\s*{NAME}\s*\((?P<alias>[^)]{{1,40}})\)\s*[:=]?\s*{VALUE}\s*{UNIT}(?:\s+{RANGE})?"
            ))
            .unwrap(),
            confidence: 0.65,
            infer_category,
        },
    ]
});

pub struct GenericPatternExtractor {
    rules: &'static [PatternRule],
}

impl Default for GenericPatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericPatternExtractor {
    pub fn new() -> Self {
        Self {
            rules: PATTERN_RULES.as_slice(),
        }
    }

    fn extract_line(&self, line: &str) -> Option<ExtractedBiomarker> {
        self.rules.iter().find_map(|rule| {
            let caps = rule.regex.captures(line)?;
            build_candidate(rule, &caps, line)
        })
    }
}

fn build_candidate(rule: &PatternRule, caps: &Captures, line: &str) -> Option<ExtractedBiomarker> {
    let mut name = caps.name("name")?.as_str().trim().trim_end_matches([':', '=', '-', ',']).trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN || !name.chars().any(char::is_alphabetic) {
        return None;
    }
    if let Some(alias) = caps.name("alias") {
        name = format!("{name} ({})", alias.as_str().trim());
    }

    let value: f64 = caps.name("value")?.as_str().parse().ok()?;
    let unit = caps.name("unit").map(|m| m.as_str()).unwrap_or_default();
    let range = caps.name("range").map(|m| m.as_str()).unwrap_or_default();

    Some(
        ExtractedBiomarker::new(&name, STRATEGY_NAME, rule.confidence)
            .with_value(value, unit)
            .with_reference_range(range)
            .with_category((rule.infer_category)(&name))
            .with_source_line(line),
    )
}

impl ExtractionStrategy for GenericPatternExtractor {
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
