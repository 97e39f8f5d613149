use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{BiomarkerCategory, BiomarkerStatus};

/// Inclusive numeric band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Render as the "70-99" form printed on most reports.
    pub fn display(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

/// Static dictionary entry for one biomarker.
///
/// `normal_range` drives status (low/normal/high). `plausible_range` is the
/// life-compatible band; a value outside it is an extraction error, not a
/// clinical finding.
#[derive(Debug, Clone, Serialize)]
pub struct BiomarkerDefinition {
    pub canonical_name: &'static str,
    pub aliases: &'static [&'static str],
    pub category: BiomarkerCategory,
    pub units: &'static [&'static str],
    pub normal_range: ValueRange,
    pub plausible_range: ValueRange,
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
}

impl BiomarkerDefinition {
    /// Unit reported when the source line's own unit is not trusted.
    pub fn primary_unit(&self) -> &'static str {
        self.units.first().copied().unwrap_or("")
    }

    /// Canonical name followed by every alias.
    pub fn terms(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.canonical_name).chain(self.aliases.iter().copied())
    }

    pub fn accepts_unit(&self, unit: &str) -> bool {
        let wanted = normalize_unit(unit);
        self.units.iter().any(|u| normalize_unit(u) == wanted)
    }

    pub fn reference_range(&self) -> String {
        self.normal_range.display()
    }
}

/// Case/spelling-insensitive unit key: "µIU/mL", "uIU/ml" and "μIU / mL" agree.
pub fn normalize_unit(unit: &str) -> String {
    unit.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'µ' | 'μ' => 'u',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Clamp into [0, 1]; NaN collapses to 0.
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Per-biomarker validation findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub status: BiomarkerStatus,
    pub confidence: f32,
}

/// A biomarker candidate as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBiomarker {
    pub raw_name: String,
    pub canonical_name: String,
    pub value: Option<f64>,
    pub unit: String,
    pub reference_range: String,
    pub category: BiomarkerCategory,
    pub confidence: f32,
    pub status: BiomarkerStatus,
    /// Source line, kept for debugging extraction mistakes.
    pub source_line: String,
    /// Strategy that produced the candidate.
    pub strategy: String,
    pub validation: ValidationOutcome,
    pub remark_ids: Vec<Uuid>,
}

impl ExtractedBiomarker {
    pub fn new(raw_name: &str, strategy: &str, confidence: f32) -> Self {
        let name = raw_name.trim();
        Self {
            raw_name: name.to_string(),
            canonical_name: name.to_string(),
            value: None,
            unit: String::new(),
            reference_range: String::new(),
            category: BiomarkerCategory::General,
            confidence: clamp_confidence(confidence),
            status: BiomarkerStatus::Undefined,
            source_line: String::new(),
            strategy: strategy.to_string(),
            validation: ValidationOutcome::default(),
            remark_ids: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: f64, unit: &str) -> Self {
        self.value = Some(value);
        self.unit = unit.trim().to_string();
        self
    }

    pub fn with_reference_range(mut self, range: &str) -> Self {
        self.reference_range = range.trim().to_string();
        self
    }

    pub fn with_category(mut self, category: BiomarkerCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_canonical(mut self, canonical_name: &str) -> Self {
        self.canonical_name = canonical_name.to_string();
        self
    }

    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = line.to_string();
        self
    }

    /// Both a numeric value and a unit: the completeness rule used by the merger.
    pub fn has_value_and_unit(&self) -> bool {
        self.value.is_some_and(f64::is_finite) && !self.unit.trim().is_empty()
    }

    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = clamp_confidence(confidence);
    }

    /// Lower-cased canonical name; the merge/dedup key.
    pub fn merge_key(&self) -> String {
        self.canonical_name.trim().to_lowercase()
    }
}
