//! OCR artifact repair.
//!
//! Each pass is a pure `&str -> String` rewrite. Numeric repairs only fire
//! inside numeric tokens, so words and section keywords pass through unless
//! the term corrector recognises them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::correction::TermCorrector;
use super::sanitize::sanitize_report_text;

/// Unit stems that commonly arrive glued to the value ("120mg/dL").
const GLUED_UNIT: &str = r"(?:mg|g|mmol|mEq|µIU|uIU|mIU|IU|U|ng|pg|µg|ug|nmol|pmol|µmol|umol|cells|fL|fl)(?:/[A-Za-zµ0-9^.]+)?|%";

static SPACED_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)(?: +\. *| *\. +)(\d)").unwrap());

static THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}(?:,\d{3})+\b").unwrap());

static DECIMAL_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+),(\d{1,2})\b").unwrap());

static GLUED_VALUE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(\d)({GLUED_UNIT})([^A-Za-z]|$)")).unwrap()
});

static LABEL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z)\]][:=])(\d)").unwrap());

static SPACED_UNIT_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(mg|g|mmol|mEq|µIU|uIU|mIU|IU|U|ng|pg|µg|ug|nmol|pmol|µmol|umol|cells|mm) */ *(dL|dl|L|l|mL|ml|µL|uL|ul|cumm|hr|h)\b",
    )
    .unwrap()
});

/// (pattern, replacement) pairs for misspelled units.
static UNIT_FIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(?:mg|rng)/d[lLI1]\b", "mg/dL"),
        (r"(?i)\bmg/dl\b", "mg/dL"),
        (r"(?i)\bg/dl\b", "g/dL"),
        (r"(?i)\bmmol/l\b", "mmol/L"),
        (r"(?i)\bµmol/l\b|\bumol/l\b", "µmol/L"),
        (r"(?i)\bnmol/l\b", "nmol/L"),
        (r"(?i)\bpmol/l\b", "pmol/L"),
        (r"(?i)\bmeq/l\b", "mEq/L"),
        (r"(?i)\b[uµ]iu/ml\b", "µIU/mL"),
        (r"(?i)\bmiu/l\b", "mIU/L"),
        (r"(?i)\biu/l\b", "IU/L"),
        (r"(?i)\bu/l\b", "U/L"),
        (r"(?i)\bng/ml\b", "ng/mL"),
        (r"(?i)\bng/dl\b", "ng/dL"),
        (r"(?i)\bpg/ml\b", "pg/mL"),
        (r"(?i)\b[uµ]g/dl\b", "µg/dL"),
        (r"(?i)\bmm/hr\b", "mm/hr"),
        (r"\bfl\b", "fL"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:(?:[•*>]+|-)[ \t]+)?").unwrap());

static DOUBLED_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":{2,}").unwrap());

/// Dot/underscore leaders between a label and its value ("Glucose.....120").
static LEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z)])[ \t]*(?:\.{2,}|_{3,}|…+)[ \t]*").unwrap());

pub struct OcrNormalizer {
    corrector: Option<TermCorrector>,
}

impl OcrNormalizer {
    pub fn new(corrector: Option<TermCorrector>) -> Self {
        Self { corrector }
    }

    /// Repair OCR artifacts. Never fails: when the repaired text is blank the
    /// original is returned unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = sanitize_report_text(raw);
        text = repair_numeric_confusions(&text);
        text = repair_decimals(&text);
        text = repair_spacing(&text);
        text = repair_units(&text);
        text = strip_stray_punctuation(&text);
        if let Some(corrector) = &self.corrector {
            text = corrector.correct(&text);
        }

        if text.trim().is_empty() && !raw.trim().is_empty() {
            tracing::warn!(stage = "ocr_normalize", "Normalization emptied the text, keeping original");
            return raw.to_string();
        }
        text
    }
}

/// Letters OCR confuses with digits, and the digit each stands for.
fn digit_lookalike(c: char) -> Option<char> {
    match c {
        'O' | 'o' => Some('0'),
        'l' | 'I' => Some('1'),
        'S' => Some('5'),
        'B' => Some('8'),
        _ => None,
    }
}

/// "1O0" -> "100", "12O" -> "120", "4.l" -> "4.1". A lookalike is replaced
/// only right after a digit (or a decimal point after a digit) and when no
/// letter follows, so "25OH" and "B12" survive.
pub(crate) fn repair_numeric_confusions(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let digit_at = |i: Option<usize>| {
        i.and_then(|i| chars.get(i))
            .is_some_and(|c| c.is_ascii_digit())
    };

    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let Some(digit) = digit_lookalike(c) else {
            out.push(c);
            continue;
        };
        let prev = i.checked_sub(1);
        let after_digit = digit_at(prev);
        let after_point = prev.is_some_and(|p| chars[p] == '.') && digit_at(i.checked_sub(2));
        let letter_follows = chars.get(i + 1).is_some_and(|c| c.is_alphabetic());

        if (after_digit || after_point) && !letter_follows {
            out.push(digit);
        } else {
            out.push(c);
        }
    }
    out
}

/// "12 . 5" -> "12.5", "150,000" -> "150000", "12,5" -> "12.5".
pub(crate) fn repair_decimals(text: &str) -> String {
    let text = SPACED_DECIMAL.replace_all(text, "$1.$2");
    let text = THOUSANDS.replace_all(&text, |caps: &Captures| caps[0].replace(',', ""));
    DECIMAL_COMMA.replace_all(&text, "$1.$2").into_owned()
}

/// "120mg/dL" -> "120 mg/dL", "Glucose:120" -> "Glucose: 120", "mg / dL" -> "mg/dL".
pub(crate) fn repair_spacing(text: &str) -> String {
    let text = GLUED_VALUE_UNIT.replace_all(text, "$1 $2$3");
    let text = LABEL_VALUE.replace_all(&text, "$1 $2");
    SPACED_UNIT_SLASH.replace_all(&text, "$1/$2").into_owned()
}

pub(crate) fn repair_units(text: &str) -> String {
    UNIT_FIXES
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

pub(crate) fn strip_stray_punctuation(text: &str) -> String {
    let text = LEADING_BULLET.replace_all(text, "");
    let text = DOUBLED_COLON.replace_all(&text, ":");
    LEADERS.replace_all(&text, "$1  ").into_owned()
}
