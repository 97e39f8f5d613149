//! Individual CPT codes for biomarkers billed outside a panel.

/// Code for a single analyte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndividualCode {
    /// Canonical biomarker name.
    pub biomarker: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    pub charge: f64,
}

const fn code(biomarker: &'static str, code: &'static str, description: &'static str, charge: f64) -> IndividualCode {
    IndividualCode {
        biomarker,
        code,
        description,
        charge,
    }
}

/// Billed at `PipelineConfig::default_charge` for analytes with no code of their own.
pub const UNLISTED_CODE: &str = "84999";
pub const UNLISTED_DESCRIPTION: &str = "Unlisted chemistry procedure";

pub static INDIVIDUAL_CODES: &[IndividualCode] = &[
    // Diabetes
    code("Glucose", "82947", "Glucose; quantitative, blood", 12.00),
    code("Postprandial Glucose", "82950", "Glucose; post glucose dose (includes glucose)", 15.00),
    code("HbA1c", "83036", "Hemoglobin; glycosylated (A1C)", 25.00),
    code("Insulin", "83525", "Insulin; total", 32.00),
    // Kidney
    code("Creatinine", "82565", "Creatinine; blood", 14.00),
    code("BUN", "84520", "Urea nitrogen; quantitative", 10.00),
    code("Urea", "84540", "Urea nitrogen, urine", 12.00),
    code("Uric Acid", "84550", "Uric acid; blood", 13.00),
    // Electrolytes
    code("Sodium", "84295", "Sodium; serum, plasma or whole blood", 12.00),
    code("Potassium", "84132", "Potassium; serum, plasma or whole blood", 12.00),
    code("Chloride", "82435", "Chloride; blood", 11.00),
    code("Bicarbonate", "82374", "Carbon dioxide (bicarbonate)", 11.00),
    code("Calcium", "82310", "Calcium; total", 13.00),
    code("Phosphorus", "84100", "Phosphorus inorganic (phosphate)", 12.00),
    code("Magnesium", "83735", "Magnesium", 15.00),
    // Lipids
    code("Cholesterol", "82465", "Cholesterol, serum or whole blood, total", 15.00),
    code("HDL Cholesterol", "83718", "Lipoprotein, direct measurement; high density cholesterol (HDL)", 18.00),
    code("LDL Cholesterol", "83721", "Lipoprotein, direct measurement; LDL cholesterol", 20.00),
    code("Triglycerides", "84478", "Triglycerides", 16.00),
    // Thyroid
    code("TSH", "84443", "Thyroid stimulating hormone (TSH)", 35.00),
    code("T3", "84480", "Triiodothyronine T3; total (TT-3)", 30.00),
    code("T4", "84436", "Thyroxine; total", 22.00),
    code("Free T4", "84439", "Thyroxine; free", 28.00),
    code("Free T3", "84481", "Triiodothyronine T3; free", 32.00),
    // Blood count
    code("Hemoglobin", "85018", "Blood count; hemoglobin (Hgb)", 8.00),
    code("Hematocrit", "85014", "Blood count; hematocrit (Hct)", 8.00),
    code("WBC", "85048", "Blood count; leukocyte (WBC), automated", 9.00),
    code("RBC", "85041", "Blood count; red blood cell (RBC), automated", 9.00),
    code("Platelets", "85049", "Blood count; platelet, automated", 10.00),
    // Liver
    code("ALT", "84460", "Transferase; alanine amino (ALT) (SGPT)", 14.00),
    code("AST", "84450", "Transferase; aspartate amino (AST) (SGOT)", 14.00),
    code("ALP", "84075", "Phosphatase, alkaline", 14.00),
    code("Total Bilirubin", "82247", "Bilirubin; total", 13.00),
    code("Direct Bilirubin", "82248", "Bilirubin; direct", 13.00),
    code("Albumin", "82040", "Albumin; serum, plasma or whole blood", 12.00),
    code("Total Protein", "84155", "Protein, total, except by refractometry; serum", 10.00),
    code("GGT", "82977", "Glutamyltransferase, gamma (GGT)", 18.00),
    // Vitamins and iron
    code("Vitamin D", "82306", "Vitamin D; 25 hydroxy", 45.00),
    code("Vitamin B12", "82607", "Cyanocobalamin (Vitamin B-12)", 30.00),
    code("Folate", "82746", "Folic acid; serum", 28.00),
    code("Iron", "83540", "Iron", 14.00),
    code("Ferritin", "82728", "Ferritin", 26.00),
    // Hormones
    code("Testosterone", "84403", "Testosterone; total", 38.00),
    code("Cortisol", "82533", "Cortisol; total", 30.00),
    code("Prolactin", "84146", "Prolactin", 30.00),
    code("Estradiol", "82670", "Estradiol; total", 40.00),
    // General
    code("CRP", "86140", "C-reactive protein", 16.00),
    code("ESR", "85652", "Sedimentation rate, erythrocyte; automated", 8.00),
];

/// Exact canonical-name lookup.
pub fn individual_code(canonical_name: &str) -> Option<&'static IndividualCode> {
    INDIVIDUAL_CODES.iter().find(|c| c.biomarker == canonical_name)
}
