//! Final assembly of a `ParsedReport` from the stage outputs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::{APP_VERSION, PARSER_NAME};
use crate::models::{
    BiomarkerStatus, ExtractedBiomarker, LabInfo, ParsedReport, PatientInfo, Remark, ReportMetadata,
    ReportType, StrategyCount,
};
use crate::pipeline::validation::{build_validation_report, overall_confidence};

/// Everything the earlier stages produced for one report.
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub id: Uuid,
    pub report_type: ReportType,
    pub biomarkers: Vec<ExtractedBiomarker>,
    pub remarks: Vec<Remark>,
    pub patient_info: PatientInfo,
    pub lab_info: LabInfo,
    pub sections: Vec<String>,
    pub strategy_counts: Vec<StrategyCount>,
    /// Candidates handed to the validator, before filtering.
    pub total_candidates: usize,
    pub low_confidence_threshold: f32,
}

pub fn assemble_report(parts: ReportParts, started_at: DateTime<Utc>) -> ParsedReport {
    let validation = build_validation_report(
        parts.total_candidates,
        &parts.biomarkers,
        parts.remarks.len(),
        parts.low_confidence_threshold,
    );
    let critical_findings: Vec<ExtractedBiomarker> = parts
        .biomarkers
        .iter()
        .filter(|b| b.status == BiomarkerStatus::Critical)
        .cloned()
        .collect();

    let finished_at = Utc::now();
    let duration_ms = u64::try_from((finished_at - started_at).num_milliseconds()).unwrap_or(0);

    let metadata = ReportMetadata {
        parser: PARSER_NAME.to_string(),
        parser_version: APP_VERSION.to_string(),
        biomarker_count: parts.biomarkers.len(),
        remark_count: parts.remarks.len(),
        strategy_counts: parts.strategy_counts,
        started_at,
        finished_at,
        duration_ms,
        sections: parts.sections,
        confidence: overall_confidence(&parts.biomarkers),
        validation,
    };

    ParsedReport {
        id: parts.id,
        report_type: parts.report_type,
        patient_info: (!parts.patient_info.is_empty()).then_some(parts.patient_info),
        lab_info: (!parts.lab_info.is_empty()).then_some(parts.lab_info),
        biomarkers: parts.biomarkers,
        remarks: parts.remarks,
        critical_findings,
        metadata,
    }
}
