//! Billing codes derived from extracted biomarkers.
//!
//! Panels and individual analytes map to CPT procedure codes, biomarker
//! categories map to ICD-10 diagnosis codes. Every public entry point has a
//! documented default and never returns an error to its caller.

pub mod cpt;
pub mod icd10;
pub mod panels;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::knowledge::KnowledgeBase;
use crate::models::{BiomarkerCategory, BiomarkerStatus, CptCode, ExtractedBiomarker, Icd10Code, PanelDefinition};
use crate::pipeline::extraction::NameNormalizer;
use crate::pipeline::validation::derive_status;

pub use cpt::{individual_code, IndividualCode, INDIVIDUAL_CODES, UNLISTED_CODE};
pub use icd10::{abnormal_code, category_codes, DEFAULT_DIAGNOSES};
pub use panels::{qualifying_panels, GENERAL_HEALTH_PANEL_CODE, PANELS};

/// Flagged biomarkers a category needs before its abnormal code is added.
const ABNORMAL_PER_CATEGORY: usize = 2;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("Panel table is empty")]
    EmptyPanelTable,

    #[error("Unknown CPT code: {0}")]
    UnknownCode(String),

    #[error("Invalid charge {charge} for CPT {code}")]
    InvalidCharge { code: String, charge: f64 },
}

/// The general health panel line used when coding cannot proceed.
pub fn general_health_panel() -> CptCode {
    CptCode::new(GENERAL_HEALTH_PANEL_CODE, "General health panel", 120.00)
}

/// A biomarker resolved against the dictionary for coding purposes.
struct CodedBiomarker {
    name: String,
    category: BiomarkerCategory,
    flagged: bool,
}

pub struct ClaimsCoder {
    names: NameNormalizer,
    panels: Vec<PanelDefinition>,
    default_charge: f64,
}

static SHARED: LazyLock<ClaimsCoder> = LazyLock::new(|| {
    ClaimsCoder::builtin(KnowledgeBase::shared(), PipelineConfig::default().default_charge)
});

impl ClaimsCoder {
    /// Coder over a custom panel table. Rejects an empty table and negative
    /// or non-finite charges.
    pub fn new(
        kb: Arc<KnowledgeBase>,
        panels: Vec<PanelDefinition>,
        default_charge: f64,
    ) -> Result<Self, ClaimsError> {
        if panels.is_empty() {
            return Err(ClaimsError::EmptyPanelTable);
        }
        let charges = panels
            .iter()
            .map(|p| (p.code, p.charge))
            .chain(std::iter::once((UNLISTED_CODE, default_charge)));
        for (code, charge) in charges {
            if !charge.is_finite() || charge < 0.0 {
                return Err(ClaimsError::InvalidCharge {
                    code: code.to_string(),
                    charge,
                });
            }
        }
        Ok(Self::from_parts(kb, panels, default_charge))
    }

    /// Coder over the bundled panel table.
    pub fn builtin(kb: Arc<KnowledgeBase>, default_charge: f64) -> Self {
        Self::from_parts(kb, PANELS.to_vec(), default_charge)
    }

    fn from_parts(kb: Arc<KnowledgeBase>, panels: Vec<PanelDefinition>, default_charge: f64) -> Self {
        Self {
            names: NameNormalizer::new(kb),
            panels,
            default_charge,
        }
    }

    /// Process-wide coder over the bundled tables and shared dictionary.
    pub fn shared() -> &'static ClaimsCoder {
        &SHARED
    }

    /// Resolve names and flags once; duplicates keep the first occurrence.
    fn resolve(&self, biomarkers: &[ExtractedBiomarker]) -> Vec<CodedBiomarker> {
        let mut seen = BTreeSet::new();
        let mut coded = Vec::new();
        for b in biomarkers {
            let def = self.names.resolve(&b.canonical_name);
            let name = def
                .map(|d| d.canonical_name.to_string())
                .unwrap_or_else(|| b.canonical_name.trim().to_string());
            if name.is_empty() || !seen.insert(name.clone()) {
                continue;
            }

            let out_of_range = match (b.value, def) {
                (Some(value), Some(d)) if b.status == BiomarkerStatus::Undefined => {
                    derive_status(value, d.normal_range, d.critical_low, d.critical_high).is_flagged()
                }
                _ => false,
            };
            coded.push(CodedBiomarker {
                name,
                category: def.map_or(b.category, |d| d.category),
                flagged: b.status.is_flagged() || out_of_range,
            });
        }
        coded
    }

    /// Panels matched by canonical biomarker names (aliases are resolved first).
    /// Falls back to the general health panel when nothing qualifies.
    pub fn identify_panels(&self, names: &[&str]) -> Vec<&PanelDefinition> {
        let present: BTreeSet<String> = names
            .iter()
            .map(|n| self.names.normalize(n).unwrap_or_else(|| n.trim().to_string()))
            .collect();
        qualifying_panels(&self.panels, &present)
    }

    /// CPT codes for a report: qualifying panels, then individual codes for
    /// biomarkers no qualifying panel covers. Degrades to the general health panel.
    pub fn generate_codes(&self, biomarkers: &[ExtractedBiomarker]) -> Vec<CptCode> {
        match self.try_generate_codes(biomarkers) {
            Ok(codes) => codes,
            Err(e) => {
                tracing::warn!(error = %e, "CPT coding failed, using general health panel");
                vec![general_health_panel()]
            }
        }
    }

    fn try_generate_codes(&self, biomarkers: &[ExtractedBiomarker]) -> Result<Vec<CptCode>, ClaimsError> {
        let coded = self.resolve(biomarkers);
        let present: BTreeSet<String> = coded.iter().map(|c| c.name.clone()).collect();
        let fallback = || {
            self.panels
                .iter()
                .find(|p| p.fallback)
                .map(|p| CptCode::new(p.code, p.description, p.charge))
                .ok_or_else(|| ClaimsError::UnknownCode(GENERAL_HEALTH_PANEL_CODE.to_string()))
        };
        if coded.is_empty() {
            return Ok(vec![fallback()?]);
        }

        let panels: Vec<&PanelDefinition> = qualifying_panels(&self.panels, &present)
            .into_iter()
            .filter(|p| !p.fallback)
            .collect();
        let covered: BTreeSet<&str> = panels
            .iter()
            .flat_map(|p| p.required.iter().copied())
            .collect();

        let mut codes: Vec<CptCode> = panels
            .iter()
            .map(|p| CptCode::new(p.code, p.description, p.charge))
            .collect();
        let mut individual = 0;
        for c in coded.iter().filter(|c| !covered.contains(c.name.as_str())) {
            match individual_code(&c.name) {
                Some(ic) => {
                    individual += 1;
                    codes.push(CptCode::new(ic.code, ic.description, ic.charge));
                }
                None => codes.push(CptCode::new(
                    UNLISTED_CODE,
                    &format!("{} ({})", cpt::UNLISTED_DESCRIPTION, c.name),
                    self.default_charge,
                )),
            }
        }

        if panels.is_empty() && individual == 0 {
            return Ok(vec![fallback()?]);
        }

        tracing::debug!(
            panels = panels.len(),
            individual,
            lines = codes.len(),
            "CPT codes generated"
        );
        Ok(codes)
    }

    /// ICD-10 screening codes for the categories present, in category order.
    /// The default pair when no category yields a code.
    pub fn map_to_diagnoses(&self, biomarkers: &[ExtractedBiomarker]) -> Vec<Icd10Code> {
        let categories: BTreeSet<BiomarkerCategory> =
            self.resolve(biomarkers).iter().map(|c| c.category).collect();
        let codes = diagnoses_for(categories);
        if codes.is_empty() {
            DEFAULT_DIAGNOSES.to_vec()
        } else {
            codes
        }
    }

    /// One abnormal-results code per category with at least two flagged
    /// (low, high, critical or out-of-range) biomarkers.
    pub fn check_abnormal(&self, biomarkers: &[ExtractedBiomarker]) -> Vec<Icd10Code> {
        let mut flagged: BTreeMap<BiomarkerCategory, usize> = BTreeMap::new();
        for c in self.resolve(biomarkers).iter().filter(|c| c.flagged) {
            *flagged.entry(c.category).or_insert(0) += 1;
        }
        flagged
            .into_iter()
            .filter(|(_, count)| *count >= ABNORMAL_PER_CATEGORY)
            .map(|(category, _)| abnormal_code(category))
            .collect()
    }

    /// CPT lines with billed units and the ICD-10 codes justifying each: the
    /// category codes of the biomarkers a line covers, else the default pair.
    pub fn build_claim_lines(&self, biomarkers: &[ExtractedBiomarker]) -> Vec<CptCode> {
        let coded = self.resolve(biomarkers);
        let mut lines = self.generate_codes(biomarkers);

        for line in &mut lines {
            let panel = self.panels.iter().find(|p| p.code == line.code && !p.fallback);
            let categories: BTreeSet<BiomarkerCategory> = coded
                .iter()
                .filter(|c| match panel {
                    Some(p) => p.required.contains(&c.name.as_str()),
                    None => individual_code(&c.name).is_some_and(|ic| ic.code == line.code)
                        || (line.code == UNLISTED_CODE && line.description.ends_with(&format!("({})", c.name))),
                })
                .map(|c| c.category)
                .collect();

            let mut diagnoses = diagnoses_for(categories);
            if diagnoses.is_empty() {
                diagnoses = DEFAULT_DIAGNOSES.to_vec();
            }
            line.diagnoses = diagnoses.iter().map(|d| d.code.to_string()).collect();
            line.units = 1;
        }
        lines
    }
}

fn diagnoses_for(categories: BTreeSet<BiomarkerCategory>) -> Vec<Icd10Code> {
    let mut codes: Vec<Icd10Code> = Vec::new();
    for category in categories {
        for code in category_codes(category) {
            if !codes.contains(code) {
                codes.push(*code);
            }
        }
    }
    codes
}

// ═══════════════════════════════════════════════════════════
// Entry points for the billing module
// ═══════════════════════════════════════════════════════════

pub fn generate_blood_test_cpt_codes(biomarkers: &[ExtractedBiomarker]) -> Vec<CptCode> {
    ClaimsCoder::shared().generate_codes(biomarkers)
}

pub fn map_biomarkers_to_diagnoses(biomarkers: &[ExtractedBiomarker]) -> Vec<String> {
    ClaimsCoder::shared()
        .map_to_diagnoses(biomarkers)
        .into_iter()
        .map(|c| c.code.to_string())
        .collect()
}

pub fn check_for_abnormal_values(biomarkers: &[ExtractedBiomarker]) -> Vec<String> {
    ClaimsCoder::shared()
        .check_abnormal(biomarkers)
        .into_iter()
        .map(|c| c.code.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<ExtractedBiomarker> {
        names
            .iter()
            .map(|n| ExtractedBiomarker::new(n, "knowledge_based", 0.85))
            .collect()
    }

    fn with_status(name: &str, status: BiomarkerStatus) -> ExtractedBiomarker {
        let mut b = ExtractedBiomarker::new(name, "knowledge_based", 0.85);
        b.status = status;
        b
    }

    fn codes(lines: &[CptCode]) -> Vec<&str> {
        lines.iter().map(|c| c.code.as_str()).collect()
    }

    const CMP_TEN: [&str; 10] = [
        "Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride", "Bicarbonate", "Calcium",
        "Albumin", "ALT",
    ];

    #[test]
    fn glucose_and_cholesterol_get_individual_codes() {
        let lines = generate_blood_test_cpt_codes(&named(&["Glucose", "Cholesterol"]));
        assert_eq!(codes(&lines), vec!["82947", "82465"]);
    }

    #[test]
    fn aliases_resolve_before_lookup() {
        let lines = generate_blood_test_cpt_codes(&named(&["FBS", "Total Cholesterol"]));
        assert_eq!(codes(&lines), vec!["82947", "82465"]);
    }

    #[test]
    fn cmp_plus_uncovered_markers() {
        let mut names = CMP_TEN.to_vec();
        names.push("TSH");
        let lines = generate_blood_test_cpt_codes(&named(&names));
        assert_eq!(codes(&lines), vec!["80053", "80048", "80069", "84443"]);
    }

    #[test]
    fn empty_input_gets_the_general_panel() {
        let lines = generate_blood_test_cpt_codes(&[]);
        assert_eq!(codes(&lines), vec![GENERAL_HEALTH_PANEL_CODE]);
    }

    #[test]
    fn uncodable_biomarkers_only_get_the_general_panel() {
        let lines = generate_blood_test_cpt_codes(&named(&["Unobtainium"]));
        assert_eq!(codes(&lines), vec![GENERAL_HEALTH_PANEL_CODE]);
    }

    #[test]
    fn biomarker_without_code_uses_unlisted_at_default_charge() {
        let coder = ClaimsCoder::builtin(KnowledgeBase::shared(), 19.5);
        let lines = coder.generate_codes(&named(&["Glucose", "eGFR"]));
        assert_eq!(codes(&lines), vec!["82947", UNLISTED_CODE]);
        assert_eq!(lines[1].charge, 19.5);
    }

    #[test]
    fn duplicates_are_billed_once() {
        let lines = generate_blood_test_cpt_codes(&named(&["Glucose", "glucose", "Blood Sugar"]));
        assert_eq!(codes(&lines), vec!["82947"]);
    }

    #[test]
    fn broken_table_degrades_to_general_panel() {
        let panels: Vec<PanelDefinition> = PANELS.iter().filter(|p| !p.fallback).cloned().collect();
        let coder = ClaimsCoder::new(KnowledgeBase::shared(), panels, 25.0).unwrap();
        let lines = coder.generate_codes(&[]);
        assert_eq!(lines, vec![general_health_panel()]);
    }

    #[test]
    fn constructor_validation() {
        assert!(matches!(
            ClaimsCoder::new(KnowledgeBase::shared(), Vec::new(), 25.0),
            Err(ClaimsError::EmptyPanelTable)
        ));
        assert!(matches!(
            ClaimsCoder::new(KnowledgeBase::shared(), PANELS.to_vec(), -1.0),
            Err(ClaimsError::InvalidCharge { .. })
        ));
        assert!(ClaimsCoder::new(KnowledgeBase::shared(), PANELS.to_vec(), 25.0).is_ok());
    }

    #[test]
    fn identify_panels_by_name() {
        let coder = ClaimsCoder::shared();
        let panels = coder.identify_panels(&["Total Cholesterol", "HDL", "LDL", "TG"]);
        assert_eq!(panels.iter().map(|p| p.code).collect::<Vec<_>>(), vec!["80061"]);

        let fallback = coder.identify_panels(&["Glucose"]);
        assert!(fallback[0].fallback);
    }

    #[test]
    fn identify_panels_returns_every_qualifying_panel() {
        let panels = ClaimsCoder::shared().identify_panels(&CMP_TEN);
        let found: Vec<&str> = panels.iter().map(|p| p.code).collect();
        assert_eq!(found, vec!["80053", "80048", "80069"]);
    }

    #[test]
    fn diagnoses_by_category() {
        let codes = map_biomarkers_to_diagnoses(&named(&["Glucose", "Cholesterol", "Creatinine", "ALT"]));
        // kidney and liver share Z13.89
        assert_eq!(codes, vec!["Z13.89", "Z13.1", "Z13.220"]);
    }

    #[test]
    fn no_categorized_biomarkers_gives_default_pair() {
        assert_eq!(map_biomarkers_to_diagnoses(&[]), vec!["Z00.00", "Z13.9"]);
        assert_eq!(map_biomarkers_to_diagnoses(&named(&["CRP"])), vec!["Z00.00", "Z13.9"]);
    }

    #[test]
    fn abnormal_codes_need_two_flagged_per_category() {
        let biomarkers = vec![
            with_status("Glucose", BiomarkerStatus::High),
            with_status("HbA1c", BiomarkerStatus::Critical),
            with_status("TSH", BiomarkerStatus::High),
            with_status("Sodium", BiomarkerStatus::Normal),
            with_status("Potassium", BiomarkerStatus::Normal),
        ];
        assert_eq!(check_for_abnormal_values(&biomarkers), vec!["R73.9"]);
    }

    #[test]
    fn undefined_status_uses_the_normal_range() {
        let biomarkers = vec![
            ExtractedBiomarker::new("Cholesterol", "generic_pattern", 0.8).with_value(260.0, "mg/dL"),
            ExtractedBiomarker::new("Triglycerides", "generic_pattern", 0.8).with_value(300.0, "mg/dL"),
        ];
        assert_eq!(check_for_abnormal_values(&biomarkers), vec!["E78.5"]);
        assert!(check_for_abnormal_values(&biomarkers[..1]).is_empty());
    }

    #[test]
    fn claim_lines_carry_diagnoses() {
        let mut names = CMP_TEN.to_vec();
        names.push("TSH");
        names.push("eGFR");
        let lines = ClaimsCoder::shared().build_claim_lines(&named(&names));

        assert_eq!(codes(&lines), vec!["80053", "80048", "80069", "84443", UNLISTED_CODE]);
        assert!(lines.iter().all(|l| l.units == 1));
        assert_eq!(lines[3].diagnoses, vec!["Z13.29"]);
        assert!(lines[0].diagnoses.contains(&"Z13.1".to_string()));
        assert!(lines[0].diagnoses.contains(&"Z13.228".to_string()));
        assert_eq!(lines[4].diagnoses, vec!["Z13.89"]);
    }

    #[test]
    fn general_panel_line_gets_default_diagnoses() {
        let lines = ClaimsCoder::shared().build_claim_lines(&[]);
        assert_eq!(lines[0].diagnoses, vec!["Z00.00", "Z13.9"]);
    }
}
