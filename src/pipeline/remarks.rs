//! Clinical remarks and their association with biomarkers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use uuid::Uuid;

use crate::knowledge::{normalize_key, KnowledgeBase};
use crate::models::{BiomarkerCategory, ExtractedBiomarker, Remark, RemarkSource, RemarkType};
use crate::pipeline::extraction::generic::PATTERN_RULES;
use crate::pipeline::extraction::infer_category;
use crate::pipeline::sections::{heading_name, is_section_heading, HEADER_SECTION};

const DIRECT_CONFIDENCE: f32 = 0.9;
const INFERRED_CONFIDENCE: f32 = 0.6;

/// "Remarks:", "Comment -", "Interpretation" at the start of a line; the
/// rest of the line is remark text.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:remarks?|comments?|interpretation|notes?|impression)\b\s*[:\-]?\s*(.*)$").unwrap()
});

static TERMINATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:methodology|method\b|sample\s*:|sample\s+type|specimen|end\s+of\s+report|\*+\s*end\b)").unwrap()
});

/// Interpretive sentences outside remark blocks.
static INFERRED_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:suggestive\s+of|consistent\s+with|advised|recommended|correlate\s+clinically|kindly\s+correlate|clinical\s+correlation)\b",
    )
    .unwrap()
});

static CRITICAL_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:critical|panic|urgent|urgently|immediate|immediately|alarming|life[\s\-]threatening)\b").unwrap()
});

static RECOMMENDATION_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:advised?|advisable|recommend(?:ed)?|suggest(?:ed)?|repeat|follow[\s\-]?up|consult|correlate|correlation)\b",
    )
    .unwrap()
});

static INTERPRETATION_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:suggestive|consistent|indicates?|indicative|elevated|raised|increased|decreased|reduced|low|high|deficien\w*|normal|within|borderline)\b",
    )
    .unwrap()
});

pub fn classify_remark(text: &str) -> RemarkType {
    if CRITICAL_CUE.is_match(text) {
        RemarkType::Critical
    } else if RECOMMENDATION_CUE.is_match(text) {
        RemarkType::Recommendation
    } else if INTERPRETATION_CUE.is_match(text) {
        RemarkType::Interpretation
    } else {
        RemarkType::General
    }
}

/// Remarks found in one report, plus the biomarkers with `remark_ids` filled in.
#[derive(Debug, Clone, Default)]
pub struct RemarksOutcome {
    pub remarks: Vec<Remark>,
    pub biomarkers: Vec<ExtractedBiomarker>,
}

struct PendingRemark {
    section: String,
    lines: Vec<String>,
}

pub struct RemarksExtractor {
    kb: Arc<KnowledgeBase>,
}

impl RemarksExtractor {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Find remarks and link them to `biomarkers`. Never fails: if anything
    /// goes wrong the biomarkers come back unchanged with no remarks.
    pub fn extract(&self, text: &str, biomarkers: Vec<ExtractedBiomarker>) -> RemarksOutcome {
        let found = catch_unwind(AssertUnwindSafe(|| self.collect(text, &biomarkers)));
        match found {
            Ok(remarks) => {
                let mut biomarkers = biomarkers;
                for remark in &remarks {
                    for b in biomarkers
                        .iter_mut()
                        .filter(|b| remark.biomarkers.contains(&b.canonical_name))
                    {
                        b.remark_ids.push(remark.id);
                    }
                }
                tracing::debug!(remarks = remarks.len(), "Remarks extracted");
                RemarksOutcome { remarks, biomarkers }
            }
            Err(_) => {
                tracing::warn!(stage = "remarks", "Remark extraction failed, continuing without remarks");
                RemarksOutcome {
                    remarks: Vec::new(),
                    biomarkers,
                }
            }
        }
    }

    fn collect(&self, text: &str, biomarkers: &[ExtractedBiomarker]) -> Vec<Remark> {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let mut remarks = Vec::new();
        let mut section = HEADER_SECTION.to_string();
        let mut pending: Option<PendingRemark> = None;

        for (i, line) in lines.iter().enumerate() {
            if let Some(caps) = MARKER.captures(line) {
                self.flush(pending.take(), biomarkers, &mut remarks);
                let rest = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                pending = Some(PendingRemark {
                    section: section.clone(),
                    lines: if rest.is_empty() { Vec::new() } else { vec![rest.to_string()] },
                });
                continue;
            }

            let heading = is_section_heading(line, lines.get(i + 1).copied())
                && classify_remark(line) == RemarkType::General;
            if heading {
                self.flush(pending.take(), biomarkers, &mut remarks);
                section = heading_name(line);
                continue;
            }

            if let Some(block) = pending.as_mut() {
                if TERMINATOR.is_match(line) || is_result_line(line) {
                    self.flush(pending.take(), biomarkers, &mut remarks);
                } else {
                    block.lines.push(line.to_string());
                }
                continue;
            }

            if INFERRED_CUE.is_match(line) && !is_result_line(line) {
                let mentioned = self.mentioned_biomarkers(line, biomarkers);
                remarks.push(Remark {
                    id: Uuid::new_v4(),
                    text: line.to_string(),
                    biomarkers: mentioned,
                    remark_type: classify_remark(line),
                    confidence: INFERRED_CONFIDENCE,
                    source: RemarkSource::Inferred,
                    section: Some(section.clone()),
                });
            }
        }
        self.flush(pending.take(), biomarkers, &mut remarks);

        remarks
    }

    fn flush(&self, pending: Option<PendingRemark>, biomarkers: &[ExtractedBiomarker], remarks: &mut Vec<Remark>) {
        let Some(block) = pending else {
            return;
        };
        let text = block.lines.join(" ").trim().to_string();
        if text.is_empty() {
            return;
        }

        let section_category = infer_category(&block.section);
        let associated = if section_category == BiomarkerCategory::General {
            self.mentioned_biomarkers(&text, biomarkers)
        } else {
            biomarkers
                .iter()
                .filter(|b| b.category == section_category)
                .map(|b| b.canonical_name.clone())
                .collect()
        };

        remarks.push(Remark {
            id: Uuid::new_v4(),
            remark_type: classify_remark(&text),
            text,
            biomarkers: associated,
            confidence: DIRECT_CONFIDENCE,
            source: RemarkSource::Direct,
            section: Some(block.section),
        });
    }

    /// Biomarkers whose canonical name or any alias appears as whole words.
    fn mentioned_biomarkers(&self, text: &str, biomarkers: &[ExtractedBiomarker]) -> Vec<String> {
        let padded = format!(" {} ", normalize_key(text));
        let mentions = |term: &str| {
            let key = normalize_key(term);
            key.len() > 2 && padded.contains(&format!(" {key} "))
        };

        let mut names: Vec<String> = Vec::new();
        for b in biomarkers {
            let hit = match self.kb.get(&b.canonical_name) {
                Some(def) => def.terms().any(mentions),
                None => mentions(&b.canonical_name),
            };
            if hit && !names.contains(&b.canonical_name) {
                names.push(b.canonical_name.clone());
            }
        }
        names
    }
}

fn is_result_line(line: &str) -> bool {
    PATTERN_RULES.iter().any(|rule| rule.regex.is_match(line))
}
