use std::sync::LazyLock;

use regex::Regex;

static WIDE_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Line-level cleanup after OCR repair.
///
/// Line endings become `\n`, tabs become two spaces and any run of two or
/// more spaces becomes exactly two, so column gaps stay distinguishable from
/// word gaps. Lines are trimmed and blank lines dropped. When nothing is left
/// the input is returned as-is.
pub fn preprocess(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace(['\r', '\u{000C}'], "\n");

    let lines: Vec<String> = unified
        .lines()
        .map(|line| {
            let spaced = line.replace('\t', "  ");
            WIDE_GAP.replace_all(spaced.trim(), "  ").into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        if !text.trim().is_empty() {
            tracing::warn!(stage = "preprocess", "Preprocessing emptied the text, keeping input");
        }
        return text.to_string();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unifies_line_endings_and_drops_blank_lines() {
        let out = preprocess("Glucose 120\r\n\r\n  \rSodium 140\n");
        assert_eq!(out, "Glucose 120\nSodium 140");
    }

    #[test]
    fn column_gaps_collapse_to_two_spaces() {
        let out = preprocess("Glucose      120   mg/dL\t70-99");
        assert_eq!(out, "Glucose  120  mg/dL  70-99");
    }

    #[test]
    fn single_spaces_are_kept() {
        assert_eq!(preprocess("Total Bilirubin 0.8"), "Total Bilirubin 0.8");
    }

    #[test]
    fn whitespace_only_input_returned_unchanged() {
        assert_eq!(preprocess("  \n\t "), "  \n\t ");
        assert_eq!(preprocess(""), "");
    }
}
