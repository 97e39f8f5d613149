use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use super::biomarker::ExtractedBiomarker;
use super::enums::{BiomarkerCategory, RemarkSource, RemarkType, ReportType, Sex};

/// Free-text clinical remark found in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remark {
    pub id: Uuid,
    pub text: String,
    /// Canonical names of associated biomarkers (may be empty).
    pub biomarkers: Vec<String>,
    pub remark_type: RemarkType,
    pub confidence: f32,
    pub source: RemarkSource,
    /// Section the remark appeared under, when known.
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.age.is_none() && self.sex.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    /// Date string as printed.
    pub report_date: Option<String>,
    pub report_date_parsed: Option<NaiveDate>,
}

impl LabInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.report_date.is_none()
    }
}

/// Summary of the validation pass over one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_biomarkers: usize,
    pub valid_biomarkers: usize,
    pub filtered_out: usize,
    pub average_confidence: f32,
    pub category_counts: BTreeMap<BiomarkerCategory, usize>,
    pub critical_findings: Vec<String>,
    pub low_confidence: Vec<String>,
    pub remark_count: usize,
}

/// How many candidates each strategy contributed before merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyCount {
    pub strategy: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub parser: String,
    pub parser_version: String,
    pub biomarker_count: usize,
    pub remark_count: usize,
    pub strategy_counts: Vec<StrategyCount>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub sections: Vec<String>,
    pub confidence: f32,
    pub validation: ValidationReport,
}

/// Terminal artifact of one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub id: Uuid,
    pub report_type: ReportType,
    pub biomarkers: Vec<ExtractedBiomarker>,
    pub remarks: Vec<Remark>,
    pub patient_info: Option<PatientInfo>,
    pub lab_info: Option<LabInfo>,
    pub critical_findings: Vec<ExtractedBiomarker>,
    pub metadata: ReportMetadata,
}

impl ParsedReport {
    /// Scrub patient-identifying text and source lines once the caller is done.
    pub fn release(mut self) {
        for biomarker in self
            .biomarkers
            .iter_mut()
            .chain(self.critical_findings.iter_mut())
        {
            biomarker.source_line.zeroize();
            biomarker.raw_name.zeroize();
        }
        for remark in &mut self.remarks {
            remark.text.zeroize();
        }
        if let Some(patient) = self.patient_info.as_mut() {
            if let Some(name) = patient.name.as_mut() {
                name.zeroize();
            }
            if let Some(id) = patient.id.as_mut() {
                id.zeroize();
            }
        }
    }
}

/// Envelope returned by `ReportParser::parse`; never an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParserResult {
    pub fn ok(report: ParsedReport) -> Self {
        Self {
            success: true,
            data: Some(report),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<ParsedReport, String> {
        match (self.success, self.data) {
            (true, Some(report)) => Ok(report),
            _ => Err(self
                .error
                .unwrap_or_else(|| "Parser returned no report".to_string())),
        }
    }
}

/// One document queued for batch parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub text: String,
    pub report_type: Option<ReportType>,
}

impl ReportInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            report_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_envelope_serializes_without_data() {
        let result = ParserResult::failure("Input text is empty");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Input text is empty");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn into_result_reports_error_text() {
        let err = ParserResult::failure("boom").into_result().unwrap_err();
        assert_eq!(err, "boom");
    }

    #[test]
    fn empty_metadata_bags() {
        assert!(PatientInfo::default().is_empty());
        assert!(LabInfo::default().is_empty());
        let patient = PatientInfo {
            age: Some(40),
            ..Default::default()
        };
        assert!(!patient.is_empty());
    }
}
