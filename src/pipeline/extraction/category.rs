use crate::knowledge::normalize_key;
use crate::models::BiomarkerCategory;

/// Keyword lists in priority order; the first category with a hit wins.
/// Keywords of 3 chars or fewer must equal a whole word, longer ones match
/// a word prefix ("triglyceride" hits "triglycerides"), and multi-word
/// keywords match a word-aligned phrase.
const CATEGORY_KEYWORDS: &[(BiomarkerCategory, &[&str])] = &[
    (
        BiomarkerCategory::Kidney,
        &["creatinine", "urea", "bun", "uric", "egfr", "gfr", "kidney", "renal", "cystatin", "microalbumin"],
    ),
    (
        BiomarkerCategory::Diabetes,
        &["glucose", "sugar", "hba1c", "a1c", "insulin", "glycated", "glycosylated", "fbs", "ppbs", "rbs", "diabet"],
    ),
    (
        BiomarkerCategory::Electrolytes,
        &["sodium", "potassium", "chloride", "bicarbonate", "calcium", "phosph", "magnesium", "electrolyte", "na", "k", "cl", "hco3", "co2"],
    ),
    (
        BiomarkerCategory::Lipids,
        &["cholesterol", "hdl", "ldl", "vldl", "triglyceride", "lipid", "tg"],
    ),
    (
        BiomarkerCategory::Thyroid,
        &["tsh", "t3", "t4", "ft3", "ft4", "thyroid", "thyroxine", "triiodothyronine"],
    ),
    (
        BiomarkerCategory::BloodCount,
        &[
            "hemoglobin", "haemoglobin", "hb", "wbc", "rbc", "platelet", "hematocrit", "haematocrit",
            "hct", "pcv", "mcv", "mch", "mchc", "rdw", "neutrophil", "lymphocyte", "monocyte",
            "eosinophil", "basophil", "leukocyte", "erythrocyte", "cbc", "blood count", "hemogram",
            "haemogram", "hematology", "haematology",
        ],
    ),
    (
        BiomarkerCategory::Vitamins,
        &["vitamin", "b12", "folate", "folic", "iron", "ferritin", "cobalamin", "tibc", "transferrin"],
    ),
    (
        BiomarkerCategory::Liver,
        &[
            "alt", "ast", "sgpt", "sgot", "alp", "bilirubin", "albumin", "protein", "ggt", "liver",
            "hepatic", "alkaline phosphatase", "globulin",
        ],
    ),
    (
        BiomarkerCategory::Hormones,
        &["testosterone", "cortisol", "prolactin", "estradiol", "progesterone", "lh", "fsh", "hormone", "dhea"],
    ),
];

/// Keyword category for a biomarker or section name; `General` when nothing hits.
pub fn infer_category(name: &str) -> BiomarkerCategory {
    let key = normalize_key(name);
    if key.is_empty() {
        return BiomarkerCategory::General;
    }
    let words: Vec<&str> = key.split(' ').collect();
    let padded = format!(" {key} ");

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| keyword_hits(kw, &words, &padded)))
        .map(|(category, _)| *category)
        .unwrap_or(BiomarkerCategory::General)
}

fn keyword_hits(keyword: &str, words: &[&str], padded: &str) -> bool {
    if keyword.contains(' ') {
        padded.contains(&format!(" {keyword} "))
    } else if keyword.len() <= 3 {
        words.contains(&keyword)
    } else {
        words.iter().any(|w| w.starts_with(keyword))
    }
}
