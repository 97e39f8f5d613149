//! Report parser: single entry point that drives the full text pipeline.
//!
//! normalize → preprocess → sections/metadata → extraction strategies →
//! name normalization → merge → validation → remarks → assembly.
//!
//! `parse` never fails outward: every error, and any panic inside a stage,
//! is converted into a `ParserResult` failure envelope.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::config::PipelineConfig;
use crate::knowledge::KnowledgeBase;
use crate::models::{ExtractedBiomarker, ParsedReport, ParserResult, ReportType, StrategyCount};
use crate::pipeline::assembler::{assemble_report, ReportParts};
use crate::pipeline::extraction::{
    merge, ExtractionStrategy, FormatAdapter, GenericPatternExtractor, KnowledgeBasedExtractor,
    NameNormalizer, TabularReportAdapter,
};
use crate::pipeline::normalize::{preprocess, OcrNormalizer, TermCorrector};
use crate::pipeline::remarks::{RemarksExtractor, RemarksOutcome};
use crate::pipeline::sections::{
    detect_report_type, extract_lab_info, extract_patient_info, parse_sections,
};
use crate::pipeline::validation::BiomarkerValidator;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Input is {size} bytes, limit is {max}")]
    InputTooLarge { size: usize, max: usize },

    #[error("Stage '{stage}' failed: {reason}")]
    Stage { stage: &'static str, reason: String },

    #[error("Parser panicked: {0}")]
    Panicked(String),
}

// ---------------------------------------------------------------------------
// Per-parse scratch state
// ---------------------------------------------------------------------------

/// Intermediate text and candidates of one parse. Dropping it scrubs the
/// copies of the report, on success, error and unwind alike.
struct ParseContext {
    raw: String,
    normalized: String,
    preprocessed: String,
    candidates: Vec<ExtractedBiomarker>,
}

impl ParseContext {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: String::new(),
            preprocessed: String::new(),
            candidates: Vec::new(),
        }
    }
}

impl Drop for ParseContext {
    fn drop(&mut self) {
        self.raw.zeroize();
        self.normalized.zeroize();
        self.preprocessed.zeroize();
        for candidate in &mut self.candidates {
            candidate.source_line.zeroize();
            candidate.raw_name.zeroize();
        }
        self.candidates.clear();
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Owns every stage; shareable across threads behind an `Arc`.
pub struct ReportParser {
    config: PipelineConfig,
    ocr: OcrNormalizer,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    adapters: Vec<Box<dyn FormatAdapter>>,
    names: NameNormalizer,
    validator: BiomarkerValidator,
    remarks: RemarksExtractor,
}

impl ReportParser {
    pub fn new(kb: Arc<KnowledgeBase>, config: PipelineConfig) -> Self {
        let corrector = config
            .enable_term_correction
            .then(|| TermCorrector::from_knowledge(&kb));

        Self {
            ocr: OcrNormalizer::new(corrector),
            strategies: vec![
                Box::new(KnowledgeBasedExtractor::new(Arc::clone(&kb), config.knowledge_confidence)),
                Box::new(GenericPatternExtractor::new()),
            ],
            adapters: vec![Box::new(TabularReportAdapter::new())],
            names: NameNormalizer::new(Arc::clone(&kb)),
            validator: BiomarkerValidator::new(Arc::clone(&kb)),
            remarks: RemarksExtractor::new(kb),
            config,
        }
    }

    /// Shared knowledge base with the config from `~/.labextract/config.json`.
    pub fn with_defaults() -> Self {
        Self::new(KnowledgeBase::shared(), PipelineConfig::load_or_default())
    }

    /// Register an extra layout adapter; runs after the built-in ones.
    pub fn with_adapter(mut self, adapter: Box<dyn FormatAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse one report. A declared `report_type` overrides detection.
    pub fn parse(&self, text: &str, report_type: Option<ReportType>) -> ParserResult {
        let report_id = Uuid::new_v4();
        let span = tracing::info_span!("parse_report", report_id = %report_id, bytes = text.len());
        let _guard = span.enter();

        match catch_unwind(AssertUnwindSafe(|| self.run(report_id, text, report_type))) {
            Ok(Ok(report)) => {
                tracing::info!(
                    biomarkers = report.biomarkers.len(),
                    remarks = report.remarks.len(),
                    critical = report.critical_findings.len(),
                    duration_ms = report.metadata.duration_ms,
                    "Report parsed"
                );
                ParserResult::ok(report)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Report parse failed");
                ParserResult::failure(e.to_string())
            }
            Err(payload) => {
                let e = ParseError::Panicked(panic_message(payload.as_ref()));
                tracing::error!(error = %e, "Report parse aborted");
                ParserResult::failure(e.to_string())
            }
        }
    }

    fn run(
        &self,
        report_id: Uuid,
        text: &str,
        declared_type: Option<ReportType>,
    ) -> Result<ParsedReport, ParseError> {
        let started_at = Utc::now();

        self.config.validate().map_err(|e| ParseError::Stage {
            stage: "config",
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }
        if text.len() > self.config.max_input_bytes {
            return Err(ParseError::InputTooLarge {
                size: text.len(),
                max: self.config.max_input_bytes,
            });
        }

        let mut ctx = ParseContext::new(text);
        ctx.normalized = self.ocr.normalize(&ctx.raw);
        ctx.preprocessed = preprocess(&ctx.normalized);
        let text = ctx.preprocessed.as_str();

        let sections = parse_sections(text);
        let patient_info = extract_patient_info(text);
        let lab_info = extract_lab_info(text);
        let report_type = declared_type.unwrap_or_else(|| detect_report_type(text));
        tracing::debug!(report_type = %report_type, "Report type resolved");

        let mut strategy_counts = Vec::new();
        let mut results = Vec::new();
        for strategy in &self.strategies {
            let found = strategy.extract(text);
            tracing::debug!(strategy = strategy.name(), candidates = found.len(), "Strategy finished");
            strategy_counts.push(StrategyCount {
                strategy: strategy.name().to_string(),
                candidates: found.len(),
            });
            results.push(self.names.apply(found));
        }
        if self.config.enable_format_adapters {
            for adapter in self.adapters.iter().filter(|a| a.detect(text)) {
                let found = adapter.extract(text);
                tracing::debug!(adapter = adapter.name(), candidates = found.len(), "Format adapter finished");
                strategy_counts.push(StrategyCount {
                    strategy: adapter.name().to_string(),
                    candidates: found.len(),
                });
                results.push(self.names.apply(found));
            }
        }

        ctx.candidates = merge(results);
        let total_candidates = ctx.candidates.len();
        let retained = self.validator.validate_and_filter(
            std::mem::take(&mut ctx.candidates),
            self.config.min_confidence,
        );
        tracing::debug!(
            candidates = total_candidates,
            retained = retained.len(),
            "Validation finished"
        );

        let RemarksOutcome { remarks, biomarkers } = self.remarks.extract(text, retained);

        Ok(assemble_report(
            ReportParts {
                id: report_id,
                report_type,
                biomarkers,
                remarks,
                patient_info,
                lab_info,
                sections: sections.names(),
                strategy_counts,
                total_candidates,
                low_confidence_threshold: self.config.low_confidence_threshold,
            },
            started_at,
        ))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
