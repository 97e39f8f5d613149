//! Concurrent parsing of many reports.
//!
//! Each report is parsed on the blocking pool, bounded by a per-report
//! timeout. A timed-out parse is reported as a failure but the blocking
//! thread is left to finish on its own; parses are short and CPU-only.

use std::sync::Arc;
use std::time::Duration;

use zeroize::Zeroize;

use crate::models::{ParserResult, ReportInput};
use crate::pipeline::orchestrator::ReportParser;

/// Parse every input concurrently. Results come back in input order, and a
/// failure in one report never affects the others.
pub async fn parse_batch(
    parser: Arc<ReportParser>,
    inputs: Vec<ReportInput>,
    per_report_timeout: Duration,
) -> Vec<ParserResult> {
    let total = inputs.len();
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let parser = Arc::clone(&parser);
            tokio::spawn(async move {
                let job = tokio::task::spawn_blocking(move || {
                    let mut input = input;
                    let result = parser.parse(&input.text, input.report_type);
                    input.text.zeroize();
                    result
                });
                match tokio::time::timeout(per_report_timeout, job).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Parse task failed");
                        ParserResult::failure(format!("Parse task failed: {e}"))
                    }
                    Err(_) => {
                        tracing::warn!(
                            timeout_ms = per_report_timeout.as_millis() as u64,
                            "Parse timed out"
                        );
                        ParserResult::failure(format!(
                            "Parse timed out after {} ms",
                            per_report_timeout.as_millis()
                        ))
                    }
                }
            })
        })
        .collect();

    let mut results = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap_or_else(|e| {
            tracing::warn!(index, error = %e, "Batch task failed");
            ParserResult::failure(format!("Parse task failed: {e}"))
        });
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    tracing::info!(total, succeeded, "Batch parsed");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::knowledge::KnowledgeBase;
    use crate::models::{ExtractedBiomarker, ReportType};
    use crate::pipeline::extraction::FormatAdapter;

    struct SlowAdapter;

    impl FormatAdapter for SlowAdapter {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn detect(&self, text: &str) -> bool {
            text.contains("SLOW")
        }

        fn extract(&self, _text: &str) -> Vec<ExtractedBiomarker> {
            std::thread::sleep(Duration::from_millis(1500));
            Vec::new()
        }
    }

    fn parser() -> Arc<ReportParser> {
        Arc::new(ReportParser::new(KnowledgeBase::shared(), PipelineConfig::default()))
    }

    #[tokio::test]
    async fn results_keep_input_order() {
        let inputs = vec![
            ReportInput::new("Glucose 120 mg/dL 70-99"),
            ReportInput::new(""),
            ReportInput {
                text: "TSH 2.1 µIU/mL 0.4-4.0".into(),
                report_type: Some(ReportType::ThyroidProfile),
            },
        ];
        let results = parse_batch(parser(), inputs, Duration::from_secs(10)).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert_eq!(
            results[0].data.as_ref().unwrap().biomarkers[0].canonical_name,
            "Glucose"
        );
        assert!(!results[1].success, "empty input must fail on its own");
        let thyroid = results[2].data.as_ref().unwrap();
        assert_eq!(thyroid.report_type, ReportType::ThyroidProfile);
        assert_eq!(thyroid.biomarkers[0].canonical_name, "TSH");
    }

    #[tokio::test]
    async fn empty_batch() {
        let results = parse_batch(parser(), Vec::new(), Duration::from_secs(1)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn slow_report_times_out_alone() {
        let parser = Arc::new(
            ReportParser::new(KnowledgeBase::shared(), PipelineConfig::default())
                .with_adapter(Box::new(SlowAdapter)),
        );
        // warm up the lazily compiled patterns outside the timed batch
        assert!(parser.parse("Glucose 90 mg/dL 70-99", None).success);

        let inputs = vec![
            ReportInput::new("SLOW\nGlucose 120 mg/dL 70-99"),
            ReportInput::new("Glucose 90 mg/dL 70-99"),
        ];
        let results = parse_batch(parser, inputs, Duration::from_millis(750)).await;

        assert!(!results[0].success);
        assert!(results[0].error.as_deref().unwrap_or_default().contains("timed out"));
        assert!(results[1].success);
    }
}
