/// Strip control characters and fold look-alike symbols before OCR repair.
/// Keeps newlines and tabs (line/column structure) and medical punctuation.
pub fn sanitize_report_text(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(c),
            '\r' | '\u{000C}' => Some('\n'),
            c if c.is_control() => None,
            // Zero-width and BOM characters survive copy/paste from PDFs
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => None,
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
            // Greek mu and micro sign both mean "micro" in units
            'μ' => Some('µ'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => Some('-'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2264}' => Some('<'),
            '\u{2265}' => Some('>'),
            '•' | '●' | '▪' | '■' => Some(' '),
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "Glucose\x00 120 mg/dL";
        let clean = sanitize_report_text(raw);
        assert!(!clean.contains('\x00'));
        assert_eq!(clean, "Glucose 120 mg/dL");
    }

    #[test]
    fn strips_control_characters_keeps_lines() {
        let raw = "Sodium 140 mmol/L\x01\x02\nPotassium 4.2 mmol/L";
        let clean = sanitize_report_text(raw);
        assert_eq!(clean, "Sodium 140 mmol/L\nPotassium 4.2 mmol/L");
    }

    #[test]
    fn carriage_returns_become_newlines() {
        assert_eq!(sanitize_report_text("a\rb\x0Cc"), "a\nb\nc");
    }

    #[test]
    fn preserves_medical_punctuation() {
        let raw = "TSH 2.5 µIU/mL (0.4-4.0) 10^3/uL 37.5°C";
        assert_eq!(sanitize_report_text(raw), raw);
    }

    #[test]
    fn folds_dashes_and_micro_signs() {
        let raw = "TSH 2.5 μIU/mL 0.4\u{2013}4.0";
        assert_eq!(sanitize_report_text(raw), "TSH 2.5 µIU/mL 0.4-4.0");
    }

    #[test]
    fn drops_zero_width_characters() {
        assert_eq!(sanitize_report_text("Glu\u{200B}cose"), "Glucose");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_report_text(""), "");
        assert_eq!(sanitize_report_text("\x00\x01\x02"), "");
    }
}
