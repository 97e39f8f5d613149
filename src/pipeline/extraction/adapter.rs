//! Column-layout reports: `TEST | RESULT | UNIT | RANGE | FLAG`.
//!
//! Cells are separated by pipes or by the two-space gaps the preprocessor
//! keeps between columns.

use std::sync::LazyLock;

use regex::Regex;

use super::category::infer_category;
use super::{FormatAdapter, RANGE_SHAPE};
use crate::models::{BiomarkerStatus, ExtractedBiomarker};

pub const ADAPTER_NAME: &str = "tabular_report";
const ADAPTER_CONFIDENCE: f32 = 0.75;
/// Rows needed before a document counts as tabular.
const MIN_TABLE_ROWS: usize = 3;

static CELL_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|\s*|\s{2,}").unwrap());

/// "120" or "120 H" / "120*" when the flag shares the result cell.
static RESULT_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<value>\d+(?:\.\d+)?)\s*(?P<flag>[A-Za-z*]{1,8})?$").unwrap()
});

static UNIT_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%|[xX]?\s?10\^\d+/[A-Za-zµ]+|[A-Za-zµ][A-Za-zµ0-9]*(?:/[A-Za-zµ0-9^.]+)*)$").unwrap()
});

/// Flag column value to status. `*`/`A`/`ABNORMAL` carry no direction, so
/// they leave the status for the validator to derive.
fn flag_status(flag: &str) -> Option<BiomarkerStatus> {
    match flag.trim().to_uppercase().as_str() {
        "H" | "HI" | "HIGH" => Some(BiomarkerStatus::High),
        "L" | "LO" | "LOW" => Some(BiomarkerStatus::Low),
        "HH" | "LL" | "C" | "CRIT" | "CRITICAL" | "PANIC" => Some(BiomarkerStatus::Critical),
        "N" | "NORMAL" => Some(BiomarkerStatus::Normal),
        _ => None,
    }
}

fn is_flag(cell: &str) -> bool {
    flag_status(cell).is_some() || matches!(cell.trim().to_uppercase().as_str(), "*" | "**" | "***" | "A" | "ABNORMAL")
}

#[derive(Debug, Default)]
pub struct TabularReportAdapter;

impl TabularReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn cells(line: &str) -> Vec<&str> {
        CELL_GAP
            .split(line.trim().trim_matches('|'))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    fn parse_row(&self, line: &str) -> Option<ExtractedBiomarker> {
        let cells = Self::cells(line);
        if cells.len() < 3 {
            return None;
        }
        let name = cells[0];
        if !name.chars().any(char::is_alphabetic) || name.chars().count() > 60 {
            return None;
        }
        let result = RESULT_CELL.captures(cells[1])?;
        let value: f64 = result.name("value")?.as_str().parse().ok()?;
        let mut flag = result.name("flag").map(|m| m.as_str());

        let mut unit = "";
        let mut range = "";
        for &cell in &cells[2..] {
            if range.is_empty() && RANGE_SHAPE.is_match(cell) {
                range = cell.trim_matches(['(', ')', '[', ']']);
            } else if flag.is_none() && is_flag(cell) {
                flag = Some(cell);
            } else if unit.is_empty() && UNIT_CELL.is_match(cell) {
                unit = cell;
            }
        }
        if unit.is_empty() && range.is_empty() {
            return None;
        }

        let mut biomarker = ExtractedBiomarker::new(name, ADAPTER_NAME, ADAPTER_CONFIDENCE)
            .with_value(value, unit)
            .with_reference_range(range)
            .with_category(infer_category(name))
            .with_source_line(line);
        if let Some(status) = flag.and_then(flag_status) {
            biomarker.status = status;
        }
        Some(biomarker)
    }
}

impl FormatAdapter for TabularReportAdapter {
    fn name(&self) -> &'static str {
        ADAPTER_NAME
    }

    fn detect(&self, text: &str) -> bool {
        let has_header = text.lines().any(|line| {
            let lower = line.to_lowercase();
            (lower.contains("test") || lower.contains("investigation") || lower.contains("parameter"))
                && lower.contains("result")
                && (lower.contains("unit") || lower.contains("range"))
        });
        let rows = text.lines().filter(|line| self.parse_row(line).is_some()).count();
        rows >= MIN_TABLE_ROWS || (has_header && rows > 0)
    }

    fn extract(&self, text: &str) -> Vec<ExtractedBiomarker> {
        text.lines().filter_map(|line| self.parse_row(line)).collect()
    }
}
