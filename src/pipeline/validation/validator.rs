use std::sync::Arc;

use super::confidence::{ERROR_FACTOR, UNKNOWN_BIOMARKER_CONFIDENCE, WARNING_FACTOR};
use crate::knowledge::KnowledgeBase;
use crate::models::{
    clamp_confidence, normalize_unit, BiomarkerDefinition, BiomarkerStatus, ExtractedBiomarker,
    ValidationOutcome, ValueRange,
};
use crate::pipeline::extraction::RANGE_SHAPE;

/// Status from the normal band and optional critical thresholds. Critical
/// thresholds are checked first, on either side.
pub fn derive_status(
    value: f64,
    normal: ValueRange,
    critical_low: Option<f64>,
    critical_high: Option<f64>,
) -> BiomarkerStatus {
    if critical_low.is_some_and(|low| value < low) || critical_high.is_some_and(|high| value > high) {
        BiomarkerStatus::Critical
    } else if value < normal.min {
        BiomarkerStatus::Low
    } else if value > normal.max {
        BiomarkerStatus::High
    } else {
        BiomarkerStatus::Normal
    }
}

pub struct BiomarkerValidator {
    kb: Arc<KnowledgeBase>,
}

impl BiomarkerValidator {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Run every rule against one biomarker. Errors multiply confidence by
    /// 0.8 and mark it invalid; warnings multiply by 0.9.
    pub fn validate(&self, biomarker: &ExtractedBiomarker) -> ValidationOutcome {
        let mut outcome = ValidationOutcome {
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            status: biomarker.status,
            confidence: biomarker.confidence,
        };

        let Some(def) = self.kb.get(&biomarker.canonical_name) else {
            outcome.warnings.push(format!(
                "No dictionary definition for '{}'",
                biomarker.canonical_name
            ));
            outcome.confidence = UNKNOWN_BIOMARKER_CONFIDENCE;
            return outcome;
        };

        // Ranges are stored in the primary unit; a value in any other unit,
        // accepted or not, cannot be range-checked.
        let printed_unit = !biomarker.unit.trim().is_empty();
        let foreign_unit = printed_unit && !def.accepts_unit(&biomarker.unit);
        let alternate_unit = printed_unit
            && !foreign_unit
            && normalize_unit(&biomarker.unit) != normalize_unit(def.primary_unit());
        let comparable = !foreign_unit && !alternate_unit;

        if let Some(value) = biomarker.value {
            if alternate_unit {
                warn(
                    &mut outcome,
                    format!("Range checks skipped for alternate unit {}", biomarker.unit),
                );
            } else if comparable {
                check_plausible(&mut outcome, value, def);
                check_critical(&mut outcome, value, def);
            }
        }

        if foreign_unit {
            warn(
                &mut outcome,
                format!("Unit '{}' not expected for {}", biomarker.unit, def.canonical_name),
            );
        }

        let range = biomarker.reference_range.trim();
        if !range.is_empty() && !RANGE_SHAPE.is_match(range) {
            warn(&mut outcome, format!("Unrecognized reference range '{range}'"));
        }

        if outcome.status == BiomarkerStatus::Undefined && comparable {
            if let Some(value) = biomarker.value {
                outcome.status =
                    derive_status(value, def.normal_range, def.critical_low, def.critical_high);
            }
        }

        outcome.confidence = clamp_confidence(outcome.confidence);
        outcome
    }

    /// Validate every biomarker, attach the outcome, drop those under
    /// `min_confidence` and sort the rest by descending confidence.
    pub fn validate_and_filter(
        &self,
        biomarkers: Vec<ExtractedBiomarker>,
        min_confidence: f32,
    ) -> Vec<ExtractedBiomarker> {
        let mut retained: Vec<ExtractedBiomarker> = biomarkers
            .into_iter()
            .filter_map(|mut biomarker| {
                let outcome = self.validate(&biomarker);
                biomarker.set_confidence(outcome.confidence);
                biomarker.status = outcome.status;
                biomarker.validation = outcome;
                if biomarker.confidence >= min_confidence {
                    Some(biomarker)
                } else {
                    tracing::debug!(
                        biomarker = %biomarker.canonical_name,
                        confidence = biomarker.confidence,
                        "Biomarker below confidence threshold"
                    );
                    None
                }
            })
            .collect();

        retained.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        retained
    }
}

fn error(outcome: &mut ValidationOutcome, message: String) {
    outcome.errors.push(message);
    outcome.is_valid = false;
    outcome.confidence *= ERROR_FACTOR;
}

fn warn(outcome: &mut ValidationOutcome, message: String) {
    outcome.warnings.push(message);
    outcome.confidence *= WARNING_FACTOR;
}

fn check_plausible(outcome: &mut ValidationOutcome, value: f64, def: &BiomarkerDefinition) {
    if !def.plausible_range.contains(value) {
        error(
            outcome,
            format!(
                "Value {value} outside plausible range {} {}",
                def.plausible_range.display(),
                def.primary_unit()
            ),
        );
    }
}

fn check_critical(outcome: &mut ValidationOutcome, value: f64, def: &BiomarkerDefinition) {
    if let Some(low) = def.critical_low.filter(|low| value < *low) {
        error(outcome, format!("Critical value {value} below {low}"));
    } else if let Some(high) = def.critical_high.filter(|high| value > *high) {
        error(outcome, format!("Critical value {value} above {high}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiomarkerCategory;

    fn validator() -> BiomarkerValidator {
        BiomarkerValidator::new(KnowledgeBase::shared())
    }

    fn glucose(value: f64) -> ExtractedBiomarker {
        ExtractedBiomarker::new("Glucose", "knowledge_based", 0.85)
            .with_value(value, "mg/dL")
            .with_reference_range("70-99")
            .with_category(BiomarkerCategory::Diabetes)
    }

    #[test]
    fn status_rule() {
        let normal = ValueRange::new(70.0, 99.0);
        assert_eq!(derive_status(120.0, normal, None, Some(400.0)), BiomarkerStatus::High);
        assert_eq!(derive_status(50.0, normal, None, Some(400.0)), BiomarkerStatus::Low);
        assert_eq!(derive_status(85.0, normal, None, Some(400.0)), BiomarkerStatus::Normal);
        assert_eq!(derive_status(450.0, normal, None, Some(400.0)), BiomarkerStatus::Critical);
        assert_eq!(derive_status(30.0, normal, Some(40.0), None), BiomarkerStatus::Critical);
    }

    #[test]
    fn abnormal_but_plausible_value_keeps_confidence() {
        let outcome = validator().validate(&glucose(120.0));
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
        assert_eq!(outcome.status, BiomarkerStatus::High);
        assert!((outcome.confidence - 0.85).abs() < 1e-6);
    }

    #[test]
    fn critical_value_is_an_error() {
        let outcome = validator().validate(&glucose(450.0));
        assert!(!outcome.is_valid);
        assert_eq!(outcome.status, BiomarkerStatus::Critical);
        assert_eq!(outcome.errors.len(), 1);
        assert!((outcome.confidence - 0.85 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn implausible_value_is_an_error() {
        let outcome = validator().validate(&glucose(5000.0));
        assert!(!outcome.is_valid);
        // outside plausible range and above the critical threshold
        assert_eq!(outcome.errors.len(), 2);
        assert!((outcome.confidence - 0.85 * 0.8 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn unexpected_unit_and_odd_range_are_warnings() {
        let b = ExtractedBiomarker::new("Glucose", "generic_pattern", 0.8)
            .with_value(90.0, "g/L")
            .with_reference_range("see note");
        let outcome = validator().validate(&b);
        assert!(outcome.is_valid);
        assert_eq!(outcome.warnings.len(), 2);
        assert!((outcome.confidence - 0.8 * 0.9 * 0.9).abs() < 1e-6);
        assert_eq!(outcome.status, BiomarkerStatus::Undefined);
    }

    #[test]
    fn unexpected_unit_never_yields_a_critical_status() {
        let b = ExtractedBiomarker::new("WBC", "knowledge_based", 0.85).with_value(7500.0, "/cumm");
        let outcome = validator().validate(&b);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.status, BiomarkerStatus::Undefined);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn alternate_unit_skips_range_checks_and_status() {
        let b = ExtractedBiomarker::new("Glucose", "knowledge_based", 0.85).with_value(5.5, "mmol/L");
        let outcome = validator().validate(&b);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.status, BiomarkerStatus::Undefined);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn upstream_status_is_kept() {
        let mut b = glucose(85.0);
        b.status = BiomarkerStatus::High;
        assert_eq!(validator().validate(&b).status, BiomarkerStatus::High);
    }

    #[test]
    fn unknown_biomarker_is_heavily_discounted() {
        let b = ExtractedBiomarker::new("Unobtainium", "generic_pattern", 0.8).with_value(1.0, "mg/dL");
        let outcome = validator().validate(&b);
        assert!((outcome.confidence - UNKNOWN_BIOMARKER_CONFIDENCE).abs() < f32::EPSILON);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.status, BiomarkerStatus::Undefined);
    }

    #[test]
    fn validate_and_filter_drops_low_and_sorts_descending() {
        let list = vec![
            ExtractedBiomarker::new("Sodium", "generic_pattern", 0.7).with_value(140.0, "mmol/L"),
            ExtractedBiomarker::new("Unobtainium", "generic_pattern", 0.9).with_value(1.0, "mg/dL"),
            glucose(120.0),
            ExtractedBiomarker::new("Potassium", "generic_pattern", 0.45).with_value(4.0, "mmol/L"),
        ];
        let retained = validator().validate_and_filter(list, 0.5);

        let names: Vec<&str> = retained.iter().map(|b| b.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Glucose", "Sodium"]);
        assert!(retained.iter().all(|b| b.confidence >= 0.5));
        assert!(retained.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(retained[0].validation.status, BiomarkerStatus::High);
    }

    #[test]
    fn confidence_never_leaves_unit_interval() {
        let v = validator();
        for value in [-10.0, 0.0, 50.0, 120.0, 450.0, 1e9] {
            let outcome = v.validate(&glucose(value));
            assert!((0.0..=1.0).contains(&outcome.confidence), "{value}: {}", outcome.confidence);
        }
    }
}
