pub mod claims;
pub mod config;
pub mod knowledge;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use claims::{
    check_for_abnormal_values, generate_blood_test_cpt_codes, map_biomarkers_to_diagnoses, ClaimsCoder,
    ClaimsError,
};
pub use config::{ConfigError, PipelineConfig};
pub use knowledge::KnowledgeBase;
pub use models::{ExtractedBiomarker, ParsedReport, ParserResult, ReportInput, ReportType};
pub use pipeline::{parse_batch, ParseError, ReportParser};

/// Install the fmt subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiomarkerStatus;

    fn parser() -> ReportParser {
        ReportParser::new(KnowledgeBase::shared(), PipelineConfig::default())
    }

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn empty_report_fails_with_message() {
        let result = parser().parse("", None);
        assert!(!result.success);
        assert!(!result.error.unwrap_or_default().is_empty());
    }

    #[test]
    fn glucose_line_end_to_end() {
        let report = parser()
            .parse("Glucose 120 mg/dL 70-99", None)
            .into_result()
            .unwrap();
        assert_eq!(report.biomarkers.len(), 1);
        assert_eq!(report.biomarkers[0].canonical_name, "Glucose");
        assert_eq!(report.biomarkers[0].status, BiomarkerStatus::High);
        assert!(report.biomarkers[0].confidence >= 0.7);
    }

    #[test]
    fn parsed_report_feeds_claims_coding() {
        let text = "LIPID PROFILE\n\
            Total Cholesterol 240 mg/dL 125-200\n\
            HDL Cholesterol 35 mg/dL 40-60\n\
            LDL Cholesterol 160 mg/dL 0-100\n\
            Triglycerides 210 mg/dL 0-150";
        let report = parser().parse(text, None).into_result().unwrap();
        assert_eq!(report.report_type, ReportType::LipidProfile);
        assert_eq!(report.biomarkers.len(), 4);

        let codes: Vec<String> = generate_blood_test_cpt_codes(&report.biomarkers)
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["80061"]);
        assert_eq!(map_biomarkers_to_diagnoses(&report.biomarkers), vec!["Z13.220"]);
        assert_eq!(check_for_abnormal_values(&report.biomarkers), vec!["E78.5"]);
    }

    #[test]
    fn parsed_report_serializes() {
        let result = parser().parse("Hemoglobin 13.5 g/dL 12.0-17.5", None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["biomarkers"][0]["canonical_name"], "Hemoglobin");
        assert_eq!(json["data"]["biomarkers"][0]["status"], "normal");
        assert_eq!(json["data"]["metadata"]["parser"], "rule_based_lab_parser");
    }
}
