//! Built-in biomarker dictionary.
//!
//! Normal ranges are adult reference intervals as commonly printed on
//! Indian/US lab reports (conventional units first). Plausible ranges are wide
//! "life-compatible" bands, NOT reference ranges; a value outside them is
//! almost certainly an extraction mistake.

use crate::models::{BiomarkerCategory as C, BiomarkerDefinition, ValueRange};

#[allow(clippy::too_many_arguments)]
const fn entry(
    canonical_name: &'static str,
    aliases: &'static [&'static str],
    category: C,
    units: &'static [&'static str],
    normal: (f64, f64),
    plausible: (f64, f64),
    critical_low: Option<f64>,
    critical_high: Option<f64>,
) -> BiomarkerDefinition {
    BiomarkerDefinition {
        canonical_name,
        aliases,
        category,
        units,
        normal_range: ValueRange::new(normal.0, normal.1),
        plausible_range: ValueRange::new(plausible.0, plausible.1),
        critical_low,
        critical_high,
    }
}

pub static BIOMARKERS: &[BiomarkerDefinition] = &[
    // Diabetes
    entry(
        "Glucose",
        &["fasting glucose", "blood glucose", "fasting blood sugar", "fbs", "blood sugar", "glucose fasting", "plasma glucose"],
        C::Diabetes,
        &["mg/dL", "mmol/L"],
        (70.0, 99.0),
        (10.0, 2000.0),
        Some(40.0),
        Some(400.0),
    ),
    entry(
        "Postprandial Glucose",
        &["post prandial glucose", "glucose post prandial", "glucose postprandial", "glucose pp", "pp glucose", "ppbs", "post prandial blood sugar", "blood sugar pp"],
        C::Diabetes,
        &["mg/dL", "mmol/L"],
        (70.0, 140.0),
        (10.0, 2000.0),
        Some(40.0),
        Some(400.0),
    ),
    // Calculated from HbA1c; reported alongside it.
    entry(
        "Estimated Average Glucose",
        &["eag", "estimated avg glucose", "average blood glucose", "mean blood glucose"],
        C::Diabetes,
        &["mg/dL", "mmol/L"],
        (68.0, 114.0),
        (20.0, 800.0),
        None,
        None,
    ),
    entry(
        "HbA1c",
        &["glycated hemoglobin", "glycosylated hemoglobin", "hemoglobin a1c", "a1c", "glycated haemoglobin"],
        C::Diabetes,
        &["%", "mmol/mol"],
        (4.0, 5.6),
        (2.0, 20.0),
        None,
        None,
    ),
    entry(
        "Insulin",
        &["fasting insulin", "serum insulin"],
        C::Diabetes,
        &["µIU/mL", "mIU/L", "pmol/L"],
        (2.6, 24.9),
        (0.0, 1000.0),
        None,
        None,
    ),
    // Kidney
    entry(
        "Creatinine",
        &["serum creatinine", "creat", "s creatinine"],
        C::Kidney,
        &["mg/dL", "µmol/L"],
        (0.6, 1.2),
        (0.05, 30.0),
        None,
        Some(10.0),
    ),
    entry(
        "BUN",
        &["blood urea nitrogen", "urea nitrogen", "serum urea nitrogen"],
        C::Kidney,
        &["mg/dL", "mmol/L"],
        (7.0, 20.0),
        (0.5, 300.0),
        None,
        Some(100.0),
    ),
    entry(
        "Urea",
        &["blood urea", "serum urea"],
        C::Kidney,
        &["mg/dL", "mmol/L"],
        (15.0, 40.0),
        (1.0, 600.0),
        None,
        None,
    ),
    entry(
        "Uric Acid",
        &["serum uric acid", "urate"],
        C::Kidney,
        &["mg/dL", "µmol/L"],
        (3.5, 7.2),
        (0.5, 30.0),
        None,
        Some(13.0),
    ),
    entry(
        "eGFR",
        &["estimated gfr", "estimated glomerular filtration rate", "gfr"],
        C::Kidney,
        &["mL/min/1.73m2", "mL/min/1.73m²", "mL/min"],
        (90.0, 120.0),
        (1.0, 200.0),
        Some(15.0),
        None,
    ),
    // Electrolytes
    entry(
        "Sodium",
        &["serum sodium"],
        C::Electrolytes,
        &["mmol/L", "mEq/L"],
        (135.0, 145.0),
        (80.0, 200.0),
        Some(120.0),
        Some(160.0),
    ),
    entry(
        "Potassium",
        &["serum potassium"],
        C::Electrolytes,
        &["mmol/L", "mEq/L"],
        (3.5, 5.0),
        (0.5, 15.0),
        Some(2.5),
        Some(6.5),
    ),
    entry(
        "Chloride",
        &["serum chloride", "cl"],
        C::Electrolytes,
        &["mmol/L", "mEq/L"],
        (98.0, 107.0),
        (60.0, 150.0),
        Some(80.0),
        Some(120.0),
    ),
    entry(
        "Bicarbonate",
        &["hco3", "total co2", "co2", "carbon dioxide", "serum bicarbonate"],
        C::Electrolytes,
        &["mmol/L", "mEq/L"],
        (22.0, 29.0),
        (1.0, 60.0),
        Some(10.0),
        Some(40.0),
    ),
    entry(
        "Calcium",
        &["serum calcium", "total calcium", "ca"],
        C::Electrolytes,
        &["mg/dL", "mmol/L"],
        (8.5, 10.5),
        (2.0, 20.0),
        Some(6.0),
        Some(13.0),
    ),
    entry(
        "Phosphorus",
        &["phosphate", "serum phosphorus", "inorganic phosphorus"],
        C::Electrolytes,
        &["mg/dL", "mmol/L"],
        (2.5, 4.5),
        (0.3, 20.0),
        Some(1.0),
        None,
    ),
    entry(
        "Magnesium",
        &["serum magnesium"],
        C::Electrolytes,
        &["mg/dL", "mmol/L"],
        (1.7, 2.2),
        (0.2, 10.0),
        Some(1.0),
        Some(4.9),
    ),
    // Lipids
    entry(
        "Cholesterol",
        &["total cholesterol", "serum cholesterol", "cholesterol total", "chol"],
        C::Lipids,
        &["mg/dL", "mmol/L"],
        (125.0, 200.0),
        (20.0, 1000.0),
        None,
        None,
    ),
    entry(
        "HDL Cholesterol",
        &["hdl", "hdl c", "cholesterol hdl", "high density lipoprotein"],
        C::Lipids,
        &["mg/dL", "mmol/L"],
        (40.0, 60.0),
        (2.0, 200.0),
        None,
        None,
    ),
    entry(
        "LDL Cholesterol",
        &["ldl", "ldl c", "cholesterol ldl", "low density lipoprotein", "direct ldl"],
        C::Lipids,
        &["mg/dL", "mmol/L"],
        (0.0, 100.0),
        (0.0, 800.0),
        None,
        None,
    ),
    entry(
        "VLDL Cholesterol",
        &["vldl", "vldl c", "very low density lipoprotein"],
        C::Lipids,
        &["mg/dL", "mmol/L"],
        (5.0, 40.0),
        (0.0, 500.0),
        None,
        None,
    ),
    entry(
        "Triglycerides",
        &["triglyceride", "tg", "trigs", "serum triglycerides"],
        C::Lipids,
        &["mg/dL", "mmol/L"],
        (0.0, 150.0),
        (0.0, 10000.0),
        None,
        Some(1000.0),
    ),
    entry(
        "Cholesterol/HDL Ratio",
        &["chol hdl ratio", "total cholesterol hdl ratio", "tc hdl ratio", "cholesterol to hdl ratio"],
        C::Lipids,
        &["ratio"],
        (0.0, 5.0),
        (0.0, 30.0),
        None,
        None,
    ),
    entry(
        "LDL/HDL Ratio",
        &["ldl to hdl ratio", "ldl c hdl c ratio"],
        C::Lipids,
        &["ratio"],
        (0.0, 3.5),
        (0.0, 20.0),
        None,
        None,
    ),
    // Thyroid
    entry(
        "TSH",
        &["thyroid stimulating hormone", "thyrotropin", "ultrasensitive tsh"],
        C::Thyroid,
        &["µIU/mL", "mIU/L", "uIU/mL"],
        (0.4, 4.0),
        (0.001, 500.0),
        None,
        None,
    ),
    entry(
        "T3",
        &["total t3", "triiodothyronine", "total triiodothyronine"],
        C::Thyroid,
        &["ng/dL", "nmol/L"],
        (80.0, 200.0),
        (10.0, 1000.0),
        None,
        None,
    ),
    entry(
        "T4",
        &["total t4", "thyroxine", "total thyroxine"],
        C::Thyroid,
        &["µg/dL", "ug/dL", "nmol/L"],
        (5.0, 12.0),
        (0.5, 40.0),
        None,
        None,
    ),
    entry(
        "Free T4",
        &["ft4", "free thyroxine"],
        C::Thyroid,
        &["ng/dL", "pmol/L"],
        (0.8, 1.8),
        (0.05, 10.0),
        None,
        None,
    ),
    entry(
        "Free T3",
        &["ft3", "free triiodothyronine"],
        C::Thyroid,
        &["pg/mL", "pmol/L"],
        (2.3, 4.2),
        (0.2, 30.0),
        None,
        None,
    ),
    // Blood count
    entry(
        "Hemoglobin",
        &["haemoglobin", "hb", "hgb"],
        C::BloodCount,
        &["g/dL", "g/L"],
        (12.0, 17.5),
        (1.0, 25.0),
        Some(7.0),
        Some(20.0),
    ),
    entry(
        "WBC",
        &["white blood cells", "white blood cell count", "total leucocyte count", "total leukocyte count", "tlc", "wbc count", "leukocytes"],
        C::BloodCount,
        &["10^3/µL", "x10^3/uL", "10^3/uL", "K/uL", "cells/cumm", "10^9/L"],
        (4.0, 11.0),
        (0.1, 500.0),
        Some(2.0),
        Some(30.0),
    ),
    entry(
        "RBC",
        &["red blood cells", "red blood cell count", "rbc count", "erythrocytes", "total rbc count"],
        C::BloodCount,
        &["million/µL", "mill/cumm", "10^6/uL", "x10^6/uL", "10^12/L"],
        (4.2, 5.9),
        (0.5, 10.0),
        None,
        None,
    ),
    entry(
        "Platelets",
        &["platelet count", "plt", "thrombocytes", "platelet"],
        C::BloodCount,
        &["10^3/µL", "x10^3/uL", "10^3/uL", "K/uL", "lakhs/cumm", "10^9/L"],
        (150.0, 450.0),
        (1.0, 2000.0),
        Some(50.0),
        Some(1000.0),
    ),
    entry(
        "Hematocrit",
        &["haematocrit", "hct", "pcv", "packed cell volume"],
        C::BloodCount,
        &["%"],
        (36.0, 50.0),
        (5.0, 75.0),
        Some(20.0),
        Some(60.0),
    ),
    entry(
        "MCV",
        &["mean corpuscular volume", "mean cell volume"],
        C::BloodCount,
        &["fL"],
        (80.0, 100.0),
        (40.0, 150.0),
        None,
        None,
    ),
    entry(
        "MCH",
        &["mean corpuscular hemoglobin", "mean cell hemoglobin"],
        C::BloodCount,
        &["pg"],
        (27.0, 33.0),
        (10.0, 50.0),
        None,
        None,
    ),
    entry(
        "MCHC",
        &["mean corpuscular hemoglobin concentration", "mean cell hemoglobin concentration"],
        C::BloodCount,
        &["g/dL", "%"],
        (32.0, 36.0),
        (20.0, 45.0),
        None,
        None,
    ),
    // Liver
    entry(
        "ALT",
        &["sgpt", "alanine aminotransferase", "alanine transaminase", "alt sgpt"],
        C::Liver,
        &["U/L", "IU/L"],
        (7.0, 56.0),
        (0.0, 10000.0),
        None,
        Some(1000.0),
    ),
    entry(
        "AST",
        &["sgot", "aspartate aminotransferase", "aspartate transaminase", "ast sgot"],
        C::Liver,
        &["U/L", "IU/L"],
        (10.0, 40.0),
        (0.0, 10000.0),
        None,
        Some(1000.0),
    ),
    entry(
        "ALP",
        &["alkaline phosphatase", "alk phos", "serum alkaline phosphatase"],
        C::Liver,
        &["U/L", "IU/L"],
        (44.0, 147.0),
        (0.0, 5000.0),
        None,
        None,
    ),
    entry(
        "Total Bilirubin",
        &["bilirubin", "bilirubin total", "serum bilirubin", "t bilirubin"],
        C::Liver,
        &["mg/dL", "µmol/L"],
        (0.1, 1.2),
        (0.0, 60.0),
        None,
        Some(15.0),
    ),
    entry(
        "Direct Bilirubin",
        &["bilirubin direct", "conjugated bilirubin", "d bilirubin"],
        C::Liver,
        &["mg/dL", "µmol/L"],
        (0.0, 0.3),
        (0.0, 40.0),
        None,
        None,
    ),
    entry(
        "Albumin",
        &["serum albumin"],
        C::Liver,
        &["g/dL", "g/L"],
        (3.5, 5.0),
        (0.5, 7.0),
        Some(1.5),
        None,
    ),
    entry(
        "Total Protein",
        &["protein total", "serum protein", "serum total protein"],
        C::Liver,
        &["g/dL", "g/L"],
        (6.0, 8.3),
        (1.0, 15.0),
        None,
        None,
    ),
    entry(
        "GGT",
        &["gamma gt", "ggtp", "gamma glutamyl transferase", "gamma glutamyl transpeptidase"],
        C::Liver,
        &["U/L", "IU/L"],
        (9.0, 48.0),
        (0.0, 5000.0),
        None,
        None,
    ),
    // Vitamins and iron stores
    entry(
        "Vitamin D",
        &["25 oh vitamin d", "25 hydroxy vitamin d", "vitamin d3", "vit d", "vitamin d total"],
        C::Vitamins,
        &["ng/mL", "nmol/L"],
        (30.0, 100.0),
        (1.0, 500.0),
        None,
        Some(150.0),
    ),
    entry(
        "Vitamin B12",
        &["b12", "cobalamin", "vit b12", "cyanocobalamin"],
        C::Vitamins,
        &["pg/mL", "pmol/L"],
        (200.0, 900.0),
        (10.0, 5000.0),
        None,
        None,
    ),
    entry(
        "Folate",
        &["folic acid", "serum folate"],
        C::Vitamins,
        &["ng/mL", "nmol/L"],
        (2.7, 17.0),
        (0.1, 100.0),
        None,
        None,
    ),
    entry(
        "Iron",
        &["serum iron"],
        C::Vitamins,
        &["µg/dL", "ug/dL", "µmol/L"],
        (60.0, 170.0),
        (2.0, 1000.0),
        None,
        None,
    ),
    entry(
        "Ferritin",
        &["serum ferritin"],
        C::Vitamins,
        &["ng/mL", "µg/L"],
        (20.0, 250.0),
        (0.5, 10000.0),
        None,
        None,
    ),
    // Hormones
    entry(
        "Testosterone",
        &["total testosterone", "serum testosterone"],
        C::Hormones,
        &["ng/dL", "nmol/L"],
        (300.0, 1000.0),
        (1.0, 3000.0),
        None,
        None,
    ),
    entry(
        "Cortisol",
        &["serum cortisol", "morning cortisol"],
        C::Hormones,
        &["µg/dL", "ug/dL", "nmol/L"],
        (6.0, 23.0),
        (0.1, 200.0),
        None,
        None,
    ),
    entry(
        "Prolactin",
        &["serum prolactin", "prl"],
        C::Hormones,
        &["ng/mL"],
        (4.0, 23.0),
        (0.1, 1000.0),
        None,
        None,
    ),
    entry(
        "Estradiol",
        &["e2", "oestradiol"],
        C::Hormones,
        &["pg/mL", "pmol/L"],
        (15.0, 350.0),
        (1.0, 5000.0),
        None,
        None,
    ),
    // General
    entry(
        "CRP",
        &["c reactive protein", "hs crp", "hscrp"],
        C::General,
        &["mg/L", "mg/dL"],
        (0.0, 10.0),
        (0.0, 500.0),
        None,
        None,
    ),
    entry(
        "ESR",
        &["erythrocyte sedimentation rate", "sed rate"],
        C::General,
        &["mm/hr", "mm/h"],
        (0.0, 20.0),
        (0.0, 150.0),
        None,
        None,
    ),
];
