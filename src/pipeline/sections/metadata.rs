//! Patient and lab metadata, plus report-type detection.

use std::sync::LazyLock;

use regex::Regex;

use super::dates::parse_report_date;
use crate::models::{LabInfo, PatientInfo, ReportType, Sex};

const MAX_NAME_LEN: usize = 60;
const MAX_AGE: u32 = 130;
/// Lab letterheads sit at the top of the page.
const LETTERHEAD_SCAN_LINES: usize = 15;

static PATIENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:patient(?:'s)?[ \t]*name|name[ \t]+of[ \t]+(?:the[ \t]+)?patient|patient|name)[ \t]*[:\-][ \t]*([A-Za-z][A-Za-z.' ]*?)[ \t]*(?:  |\t|$|\b(?:age|sex|gender|id|dob|mrn)\b)",
    )
    .unwrap()
});

static PATIENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:patient[ \t]*(?:id|no\.?|number)|pid|mrn|uhid|reg(?:istration)?[ \t]*no\.?)[ \t]*[:#\-][ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    )
    .unwrap()
});

/// "Age/Sex: 45 Y / M", "Age / Gender : 45 Years/Female"
static AGE_SEX_COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bage[ \t]*/[ \t]*(?:sex|gender)[ \t]*[:\-]?[ \t]*(\d{1,3})[ \t]*(?:y(?:ears?|rs?)?\.?)?[ \t]*/[ \t]*(male|female|other|m|f)\b",
    )
    .unwrap()
});

static AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bage\b[ \t]*[:\-]?[ \t]*(\d{1,3})\b").unwrap()
});

static SEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:sex|gender)\b[ \t]*[:\-][ \t]*(male|female|other|m|f)\b").unwrap()
});

static LAB_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*lab(?:oratory)?(?:[ \t]*name)?[ \t]*:[ \t]*(.+?)[ \t]*$").unwrap()
});

static LAB_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:laborator(?:y|ies)|labs?|diagnostics?|pathology|clinic|hospital|medical[ \t]+cent(?:er|re))\b",
    )
    .unwrap()
});

static ADDRESS_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*address[ \t]*:[ \t]*(.+?)[ \t]*$").unwrap()
});

static ADDRESS_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d|,|\b(?:road|rd|street|st|avenue|ave|lane|block|sector|floor|building|suite|city|nagar)\b",
    )
    .unwrap()
});

/// Lines that start like a field label are never letterhead or address lines.
static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:patient|name|date|report|age|sex|gender|sample|ref|dr\b|test)").unwrap()
});

const DATE_VALUE: &str = r"(\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{1,2}[ \-][A-Za-z]{3,9}[ \-,]+\d{4}|[A-Za-z]{3,9}[ \t]+\d{1,2},?[ \t]+\d{4})";

static REPORT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:report(?:ed)?[ \t]*(?:date|on)|date[ \t]+of[ \t]+report)\b[ \t]*[:\-]?[ \t]*{DATE_VALUE}"
    ))
    .unwrap()
});

static ANY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:collection|collected|sample|registration|registered)[ \t]*(?:date|on)?|date)\b[ \t]*[:\-]?[ \t]*{DATE_VALUE}"
    ))
    .unwrap()
});

pub fn extract_patient_info(text: &str) -> PatientInfo {
    let mut info = PatientInfo::default();

    if let Some(caps) = PATIENT_NAME.captures(text) {
        let name = caps[1].trim().trim_end_matches(['.', ',']).trim();
        if !name.is_empty() && name.chars().count() <= MAX_NAME_LEN {
            info.name = Some(name.to_string());
        }
    }

    if let Some(caps) = PATIENT_ID.captures(text) {
        info.id = Some(caps[1].to_string());
    }

    if let Some(caps) = AGE_SEX_COMBINED.captures(text) {
        info.age = parse_age(&caps[1]);
        info.sex = parse_sex(&caps[2]);
    }
    if info.age.is_none() {
        info.age = AGE.captures(text).and_then(|caps| parse_age(&caps[1]));
    }
    if info.sex.is_none() {
        info.sex = SEX.captures(text).and_then(|caps| parse_sex(&caps[1]));
    }

    info
}

fn parse_age(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|age| *age <= MAX_AGE)
}

fn parse_sex(raw: &str) -> Option<Sex> {
    match raw.to_lowercase().as_str() {
        "m" | "male" => Some(Sex::Male),
        "f" | "female" => Some(Sex::Female),
        "other" => Some(Sex::Other),
        _ => None,
    }
}

pub fn extract_lab_info(text: &str) -> LabInfo {
    let mut info = LabInfo::default();
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut name_line: Option<usize> = None;
    if let Some(caps) = LAB_LABELLED.captures(text) {
        info.name = Some(caps[1].to_string());
    } else {
        name_line = lines.iter().take(LETTERHEAD_SCAN_LINES).position(|line| {
            LAB_KEYWORD.is_match(line)
                && !line.contains(':')
                && !line.chars().any(|c| c.is_ascii_digit())
                && !LABEL_LINE.is_match(line)
                && line.chars().count() <= 80
        });
        info.name = name_line.map(|i| lines[i].to_string());
    }

    if let Some(caps) = ADDRESS_LABELLED.captures(text) {
        info.address = Some(caps[1].to_string());
    } else if let Some(i) = name_line {
        info.address = lines
            .get(i + 1)
            .filter(|next| {
                ADDRESS_HINT.is_match(next) && !next.contains(':') && !LABEL_LINE.is_match(next)
            })
            .map(|next| next.to_string());
    }

    let date = REPORT_DATE
        .captures(text)
        .or_else(|| ANY_DATE.captures(text))
        .map(|caps| caps[1].trim().to_string());
    if let Some(date) = date {
        info.report_date_parsed = parse_report_date(&date);
        info.report_date = Some(date);
    }

    info
}

/// Infer the report type from its wording. Blood test when nothing more
/// specific shows up.
pub fn detect_report_type(text: &str) -> ReportType {
    let lower = text.to_lowercase();
    if lower.contains("urinalysis") || lower.contains("urine routine") || lower.contains("urine examination") {
        ReportType::Urinalysis
    } else if lower.contains("lipid profile") || lower.contains("lipid panel") {
        ReportType::LipidProfile
    } else if lower.contains("thyroid profile") || lower.contains("thyroid function") || lower.contains("thyroid panel") {
        ReportType::ThyroidProfile
    } else {
        ReportType::BloodTest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "CITY DIAGNOSTIC LABORATORY\n\
        12 Park Road, Springfield\n\
        Patient Name: John Doe  Age: 45\n\
        Patient ID: P-1029\n\
        Sex: Male\n\
        Report Date: 12/03/2024";

    #[test]
    fn extracts_patient_fields() {
        let info = extract_patient_info(HEADER);
        assert_eq!(info.name.as_deref(), Some("John Doe"));
        assert_eq!(info.id.as_deref(), Some("P-1029"));
        assert_eq!(info.age, Some(45));
        assert_eq!(info.sex, Some(Sex::Male));
    }

    #[test]
    fn combined_age_sex_field() {
        let info = extract_patient_info("Name: Jane Roe\nAge/Sex: 52 Y / F");
        assert_eq!(info.name.as_deref(), Some("Jane Roe"));
        assert_eq!(info.age, Some(52));
        assert_eq!(info.sex, Some(Sex::Female));
    }

    #[test]
    fn name_stops_before_inline_age() {
        let info = extract_patient_info("Name: Jane Roe Age: 30");
        assert_eq!(info.name.as_deref(), Some("Jane Roe"));
        assert_eq!(info.age, Some(30));
    }

    #[test]
    fn missing_fields_are_omitted() {
        let info = extract_patient_info("Glucose 120 mg/dL");
        assert!(info.is_empty());
    }

    #[test]
    fn implausible_age_dropped() {
        assert_eq!(extract_patient_info("Age: 999").age, None);
    }

    #[test]
    fn extracts_lab_letterhead_address_and_date() {
        let info = extract_lab_info(HEADER);
        assert_eq!(info.name.as_deref(), Some("CITY DIAGNOSTIC LABORATORY"));
        assert_eq!(info.address.as_deref(), Some("12 Park Road, Springfield"));
        assert_eq!(info.report_date.as_deref(), Some("12/03/2024"));
        assert_eq!(info.report_date_parsed, NaiveDate::from_ymd_opt(2024, 3, 12));
    }

    #[test]
    fn labelled_lab_name_wins() {
        let info = extract_lab_info("Lab Name: Acme Pathology\nDate: 12 Mar 2024");
        assert_eq!(info.name.as_deref(), Some("Acme Pathology"));
        assert_eq!(info.report_date.as_deref(), Some("12 Mar 2024"));
        assert_eq!(info.report_date_parsed, NaiveDate::from_ymd_opt(2024, 3, 12));
    }

    #[test]
    fn unparseable_date_keeps_raw_string() {
        let info = extract_lab_info("Report Date: 45/45/2024");
        assert_eq!(info.report_date.as_deref(), Some("45/45/2024"));
        assert!(info.report_date_parsed.is_none());
    }

    #[test]
    fn no_lab_info_in_plain_results() {
        assert!(extract_lab_info("Glucose 120 mg/dL 70-99").is_empty());
    }

    #[test]
    fn report_type_detection() {
        assert_eq!(detect_report_type("LIPID PROFILE\nCholesterol 180"), ReportType::LipidProfile);
        assert_eq!(detect_report_type("Thyroid Function Test\nTSH 2.1"), ReportType::ThyroidProfile);
        assert_eq!(detect_report_type("URINALYSIS"), ReportType::Urinalysis);
        assert_eq!(detect_report_type("Glucose 120 mg/dL"), ReportType::BloodTest);
    }
}
