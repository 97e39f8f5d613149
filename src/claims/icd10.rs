//! ICD-10 diagnosis codes by biomarker category.

use crate::models::{BiomarkerCategory, Icd10Code};

const fn icd(code: &'static str, description: &'static str) -> Icd10Code {
    Icd10Code { code, description }
}

const SCREEN_DIABETES: Icd10Code = icd("Z13.1", "Encounter for screening for diabetes mellitus");
const SCREEN_LIPIDS: Icd10Code = icd("Z13.220", "Encounter for screening for lipoid disorders");
const SCREEN_OTHER: Icd10Code = icd("Z13.89", "Encounter for screening for other disorder");
const SCREEN_BLOOD: Icd10Code = icd(
    "Z13.0",
    "Encounter for screening for diseases of the blood and blood-forming organs",
);
const SCREEN_ENDOCRINE: Icd10Code = icd("Z13.29", "Encounter for screening for other suspected endocrine disorder");
const SCREEN_NUTRITION: Icd10Code = icd("Z13.21", "Encounter for screening for nutritional disorder");
const SCREEN_METABOLIC: Icd10Code = icd("Z13.228", "Encounter for screening for other metabolic disorders");

/// Returned when no category maps to a code.
pub const DEFAULT_DIAGNOSES: [Icd10Code; 2] = [
    icd("Z00.00", "Encounter for general adult medical examination without abnormal findings"),
    icd("Z13.9", "Encounter for screening, unspecified"),
];

/// Screening codes justifying tests in `category`. General has none.
pub fn category_codes(category: BiomarkerCategory) -> &'static [Icd10Code] {
    match category {
        BiomarkerCategory::Diabetes => &[SCREEN_DIABETES],
        BiomarkerCategory::Lipids => &[SCREEN_LIPIDS],
        BiomarkerCategory::Kidney | BiomarkerCategory::Liver => &[SCREEN_OTHER],
        BiomarkerCategory::BloodCount => &[SCREEN_BLOOD],
        BiomarkerCategory::Thyroid | BiomarkerCategory::Hormones => &[SCREEN_ENDOCRINE],
        BiomarkerCategory::Vitamins => &[SCREEN_NUTRITION],
        BiomarkerCategory::Electrolytes => &[SCREEN_METABOLIC],
        BiomarkerCategory::General => &[],
    }
}

/// "Abnormal results" code added when a category has several flagged values.
pub fn abnormal_code(category: BiomarkerCategory) -> Icd10Code {
    match category {
        BiomarkerCategory::Diabetes => icd("R73.9", "Hyperglycemia, unspecified"),
        BiomarkerCategory::Lipids => icd("E78.5", "Hyperlipidemia, unspecified"),
        BiomarkerCategory::Kidney => icd("R94.4", "Abnormal results of kidney function studies"),
        BiomarkerCategory::Liver => icd("R94.5", "Abnormal results of liver function studies"),
        BiomarkerCategory::Thyroid => icd("R94.6", "Abnormal results of thyroid function studies"),
        BiomarkerCategory::BloodCount => icd("R71.8", "Other abnormality of red blood cells"),
        BiomarkerCategory::Electrolytes => icd("E87.8", "Other disorders of electrolyte and fluid balance"),
        BiomarkerCategory::Vitamins => icd("E56.9", "Vitamin deficiency, unspecified"),
        BiomarkerCategory::Hormones => icd("E34.9", "Endocrine disorder, unspecified"),
        BiomarkerCategory::General => icd("R79.9", "Abnormal finding of blood chemistry, unspecified"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_has_no_screening_code() {
        assert!(category_codes(BiomarkerCategory::General).is_empty());
        assert_eq!(category_codes(BiomarkerCategory::Lipids)[0].code, "Z13.220");
    }

    #[test]
    fn kidney_and_liver_share_a_code() {
        assert_eq!(
            category_codes(BiomarkerCategory::Kidney),
            category_codes(BiomarkerCategory::Liver)
        );
    }

    #[test]
    fn default_pair() {
        let codes: Vec<&str> = DEFAULT_DIAGNOSES.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["Z00.00", "Z13.9"]);
    }

    #[test]
    fn abnormal_codes_are_distinct_per_category() {
        assert_eq!(abnormal_code(BiomarkerCategory::Diabetes).code, "R73.9");
        assert_eq!(abnormal_code(BiomarkerCategory::Thyroid).code, "R94.6");
        assert_ne!(
            abnormal_code(BiomarkerCategory::Kidney),
            abnormal_code(BiomarkerCategory::Liver)
        );
    }
}
