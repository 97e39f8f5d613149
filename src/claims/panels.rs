//! Lab panel table and panel qualification.

use std::collections::BTreeSet;

use crate::models::PanelDefinition;

pub const GENERAL_HEALTH_PANEL_CODE: &str = "80050";

pub static PANELS: &[PanelDefinition] = &[
    PanelDefinition {
        code: "80053",
        description: "Comprehensive metabolic panel",
        charge: 45.00,
        required: &[
            "Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride", "Bicarbonate",
            "Calcium", "Total Protein", "Albumin", "Total Bilirubin", "ALP", "AST", "ALT",
        ],
        min_required: 10,
        fallback: false,
    },
    PanelDefinition {
        code: "80048",
        description: "Basic metabolic panel (calcium, total)",
        charge: 35.00,
        required: &["Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride", "Bicarbonate", "Calcium"],
        min_required: 6,
        fallback: false,
    },
    PanelDefinition {
        code: "80069",
        description: "Renal function panel",
        charge: 40.00,
        required: &[
            "Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride", "Bicarbonate",
            "Calcium", "Phosphorus", "Albumin",
        ],
        min_required: 8,
        fallback: false,
    },
    PanelDefinition {
        code: "80061",
        description: "Lipid panel",
        charge: 40.00,
        required: &["Cholesterol", "HDL Cholesterol", "LDL Cholesterol", "Triglycerides"],
        min_required: 3,
        fallback: false,
    },
    PanelDefinition {
        code: "80076",
        description: "Hepatic function panel",
        charge: 35.00,
        required: &["Albumin", "Total Bilirubin", "Direct Bilirubin", "ALP", "AST", "ALT", "Total Protein"],
        min_required: 5,
        fallback: false,
    },
    PanelDefinition {
        code: "85025",
        description: "Complete blood count (CBC) with automated differential",
        charge: 30.00,
        required: &["Hemoglobin", "Hematocrit", "WBC", "RBC", "Platelets", "MCV", "MCH", "MCHC"],
        min_required: 4,
        fallback: false,
    },
    PanelDefinition {
        code: GENERAL_HEALTH_PANEL_CODE,
        description: "General health panel",
        charge: 120.00,
        required: &[],
        min_required: 0,
        fallback: true,
    },
];

fn matched_count(panel: &PanelDefinition, present: &BTreeSet<String>) -> usize {
    panel
        .required
        .iter()
        .filter(|name| present.contains(**name))
        .count()
}

/// Panels billed for `present` (canonical names), in table order.
///
/// Every non-fallback panel with at least `min_required` of its markers
/// qualifies, overlapping panels included. When nothing qualifies the
/// fallback panel is returned, if the table has one.
pub fn qualifying_panels<'p>(panels: &'p [PanelDefinition], present: &BTreeSet<String>) -> Vec<&'p PanelDefinition> {
    let mut kept: Vec<&PanelDefinition> = panels
        .iter()
        .filter(|p| !p.fallback)
        .filter(|p| matched_count(p, present) >= p.min_required.max(1))
        .collect();

    if kept.is_empty() {
        kept.extend(panels.iter().find(|p| p.fallback));
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    fn present(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn codes(panels: Vec<&PanelDefinition>) -> Vec<&'static str> {
        panels.into_iter().map(|p| p.code).collect()
    }

    #[test]
    fn panel_markers_are_dictionary_names() {
        let kb = KnowledgeBase::builtin();
        for panel in PANELS {
            for name in panel.required {
                assert_eq!(kb.get(name).map(|d| d.canonical_name), Some(*name), "{}", panel.code);
            }
            assert!(panel.min_required <= panel.required.len());
        }
    }

    #[test]
    fn nothing_qualifies_gives_the_general_panel() {
        let result = qualifying_panels(PANELS, &present(&["Glucose", "Cholesterol"]));
        assert_eq!(codes(result), vec![GENERAL_HEALTH_PANEL_CODE]);
        assert_eq!(codes(qualifying_panels(PANELS, &BTreeSet::new())), vec![GENERAL_HEALTH_PANEL_CODE]);
    }

    #[test]
    fn lipid_panel_at_threshold() {
        let result = qualifying_panels(PANELS, &present(&["Cholesterol", "HDL Cholesterol", "Triglycerides"]));
        assert_eq!(codes(result), vec!["80061"]);
    }

    #[test]
    fn overlapping_metabolic_panels_all_qualify() {
        let names = present(&[
            "Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride", "Bicarbonate",
            "Calcium", "Albumin", "ALT",
        ]);
        // CMP 10 of 14, BMP 8 of 8, renal 9 of 10
        assert_eq!(codes(qualifying_panels(PANELS, &names)), vec!["80053", "80048", "80069"]);
    }

    #[test]
    fn bmp_alone() {
        let names = present(&["Glucose", "BUN", "Creatinine", "Sodium", "Potassium", "Chloride"]);
        assert_eq!(codes(qualifying_panels(PANELS, &names)), vec!["80048"]);
    }

    #[test]
    fn below_minimum_does_not_qualify() {
        let names = present(&["Glucose", "BUN", "Creatinine", "Sodium", "Potassium"]);
        assert_eq!(codes(qualifying_panels(PANELS, &names)), vec![GENERAL_HEALTH_PANEL_CODE]);
    }

    #[test]
    fn independent_panels_keep_table_order() {
        let names = present(&[
            "Cholesterol", "HDL Cholesterol", "LDL Cholesterol", "Hemoglobin", "WBC", "RBC", "Platelets",
        ]);
        assert_eq!(codes(qualifying_panels(PANELS, &names)), vec!["80061", "85025"]);
    }

    #[test]
    fn table_without_fallback_can_return_nothing() {
        let no_fallback: Vec<PanelDefinition> = PANELS.iter().filter(|p| !p.fallback).cloned().collect();
        assert!(qualifying_panels(&no_fallback, &present(&["Glucose"])).is_empty());
    }
}
