use serde::{Deserialize, Serialize};

/// A lab panel billed under a single CPT code.
#[derive(Debug, Clone, Serialize)]
pub struct PanelDefinition {
    pub code: &'static str,
    pub description: &'static str,
    pub charge: f64,
    /// Canonical biomarker names making up the panel.
    pub required: &'static [&'static str],
    /// How many of `required` must be present for the panel to qualify.
    pub min_required: usize,
    /// The general health panel returned when nothing else qualifies.
    pub fallback: bool,
}

/// Procedure code line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CptCode {
    pub code: String,
    pub description: String,
    pub charge: f64,
    /// ICD-10 codes justifying the line (filled when building claim lines).
    pub diagnoses: Vec<String>,
    pub units: u32,
}

impl CptCode {
    pub fn new(code: &str, description: &str, charge: f64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            charge,
            diagnoses: Vec::new(),
            units: 1,
        }
    }
}

/// Diagnosis code with its short description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icd10Code {
    pub code: &'static str,
    pub description: &'static str,
}
