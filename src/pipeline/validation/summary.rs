use std::collections::BTreeMap;

use super::confidence::overall_confidence;
use crate::models::{BiomarkerCategory, BiomarkerStatus, ExtractedBiomarker, ValidationReport};

/// Summarize one validation pass. `total` counts candidates before
/// filtering; `retained` is what `validate_and_filter` kept.
pub fn build_validation_report(
    total: usize,
    retained: &[ExtractedBiomarker],
    remark_count: usize,
    low_confidence_threshold: f32,
) -> ValidationReport {
    let mut category_counts: BTreeMap<BiomarkerCategory, usize> = BTreeMap::new();
    for biomarker in retained {
        *category_counts.entry(biomarker.category).or_insert(0) += 1;
    }

    ValidationReport {
        total_biomarkers: total,
        valid_biomarkers: retained.iter().filter(|b| b.validation.is_valid).count(),
        filtered_out: total.saturating_sub(retained.len()),
        average_confidence: overall_confidence(retained),
        category_counts,
        critical_findings: retained
            .iter()
            .filter(|b| b.status == BiomarkerStatus::Critical)
            .map(|b| b.canonical_name.clone())
            .collect(),
        low_confidence: retained
            .iter()
            .filter(|b| b.confidence < low_confidence_threshold)
            .map(|b| b.canonical_name.clone())
            .collect(),
        remark_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biomarker(name: &str, category: BiomarkerCategory, confidence: f32, status: BiomarkerStatus) -> ExtractedBiomarker {
        let mut b = ExtractedBiomarker::new(name, "test", confidence).with_category(category);
        b.status = status;
        b.validation.is_valid = status != BiomarkerStatus::Critical;
        b
    }

    #[test]
    fn counts_and_subsets() {
        let retained = vec![
            biomarker("Glucose", BiomarkerCategory::Diabetes, 0.68, BiomarkerStatus::Critical),
            biomarker("HbA1c", BiomarkerCategory::Diabetes, 0.85, BiomarkerStatus::High),
            biomarker("Sodium", BiomarkerCategory::Electrolytes, 0.8, BiomarkerStatus::Normal),
        ];
        let report = build_validation_report(5, &retained, 2, 0.7);

        assert_eq!(report.total_biomarkers, 5);
        assert_eq!(report.valid_biomarkers, 2);
        assert_eq!(report.filtered_out, 2);
        assert_eq!(report.category_counts[&BiomarkerCategory::Diabetes], 2);
        assert_eq!(report.category_counts[&BiomarkerCategory::Electrolytes], 1);
        assert_eq!(report.critical_findings, vec!["Glucose"]);
        assert_eq!(report.low_confidence, vec!["Glucose"]);
        assert_eq!(report.remark_count, 2);
        assert!((report.average_confidence - (0.68 + 0.85 + 0.8) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_report() {
        let report = build_validation_report(0, &[], 0, 0.7);
        assert_eq!(report, ValidationReport::default());
    }
}
