//! Section splitting and report metadata.
//!
//! Headings are found heuristically; everything before the first heading is
//! the `header` section. All functions here are best-effort and infallible.

pub mod dates;
pub mod metadata;

pub use dates::parse_report_date;
pub use metadata::{detect_report_type, extract_lab_info, extract_patient_info};

use serde::Serialize;

/// Name of the section holding text before the first heading.
pub const HEADER_SECTION: &str = "header";

/// Lines starting with these are table headers or labels, never headings.
const HEADING_BLACKLIST: &[&str] = &[
    "investigation", "sample", "remark", "methodology", "note", "test", "result",
    "reference", "unit", "patient", "page", "comment", "interpretation", "specimen",
    "method", "end of report",
];

/// Lab letterheads are uppercase too; they are metadata, not sections.
const LETTERHEAD_WORDS: &[&str] = &[
    "laboratory", "laboratories", "diagnostic", "diagnostics", "pathology", "hospital", "clinic",
];

const MIN_HEADING_LEN: usize = 3;
const MAX_HEADING_LEN: usize = 60;
const MAX_HEADING_WORDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub body: String,
}

/// Sections in document order. Repeated headings share one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sections {
    entries: Vec<Section>,
}

impl Sections {
    pub fn get(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|s| s.name == wanted)
            .map(|s| s.body.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|s| s.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_line(&mut self, name: &str, line: &str) {
        let entry = match self.entries.iter().position(|s| s.name == name) {
            Some(i) => &mut self.entries[i],
            None => {
                self.entries.push(Section {
                    name: name.to_string(),
                    body: String::new(),
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        };
        if !entry.body.is_empty() {
            entry.body.push('\n');
        }
        entry.body.push_str(line);
    }

    fn open(&mut self, name: &str) {
        if !self.entries.iter().any(|s| s.name == name) {
            self.entries.push(Section {
                name: name.to_string(),
                body: String::new(),
            });
        }
    }
}

/// Split preprocessed text into named sections.
pub fn parse_sections(text: &str) -> Sections {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut sections = Sections::default();
    let mut current = HEADER_SECTION.to_string();

    for (i, line) in lines.iter().enumerate() {
        if is_section_heading(line, lines.get(i + 1).copied()) {
            current = heading_name(line);
            sections.open(&current);
            continue;
        }
        sections.push_line(&current, line);
    }

    tracing::debug!(sections = sections.len(), "Sections parsed");
    sections
}

/// Heading heuristic. A line qualifies when it is short, digit-free, not a
/// blacklisted label, and either mostly uppercase or title-like and
/// confirmed by a following "Sample..." line.
pub fn is_section_heading(line: &str, next_line: Option<&str>) -> bool {
    let trimmed = line.trim().trim_end_matches(':').trim();
    let len = trimmed.chars().count();
    if !(MIN_HEADING_LEN..=MAX_HEADING_LEN).contains(&len) {
        return false;
    }
    if trimmed.split_whitespace().count() > MAX_HEADING_WORDS {
        return false;
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) || trimmed.contains(':') {
        return false;
    }

    let lower = trimmed.to_lowercase();
    if HEADING_BLACKLIST.iter().any(|k| lower.starts_with(k)) {
        return false;
    }
    if lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| LETTERHEAD_WORDS.contains(&w))
    {
        return false;
    }

    let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() < MIN_HEADING_LEN {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    if upper * 5 >= letters.len() * 4 {
        return true;
    }

    let title_like = trimmed.chars().next().is_some_and(char::is_uppercase);
    let confirmed = next_line.is_some_and(|next| next.trim().to_lowercase().starts_with("sample"));
    title_like && confirmed
}

pub(crate) fn heading_name(line: &str) -> String {
    line.trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
