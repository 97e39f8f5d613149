use crate::models::{clamp_confidence, ExtractedBiomarker};

/// Confidence thresholds used by the pipeline and its consumers
pub mod thresholds {
    /// Below this: extraction likely wrong.
    pub const VERY_LOW: f32 = 0.30;

    /// Below this: dropped by default (`PipelineConfig::min_confidence`).
    pub const LOW: f32 = 0.50;

    /// Below this: kept but listed as low-confidence.
    pub const MODERATE: f32 = 0.70;

    /// Dictionary-backed extraction.
    pub const HIGH: f32 = 0.85;

    /// Above this: very high confidence.
    pub const VERY_HIGH: f32 = 0.95;
}

/// Multiplier for a hard validation error.
pub const ERROR_FACTOR: f32 = 0.8;

/// Multiplier for a soft validation warning.
pub const WARNING_FACTOR: f32 = 0.9;

/// Confidence forced onto biomarkers with no dictionary definition.
pub const UNKNOWN_BIOMARKER_CONFIDENCE: f32 = 0.1;

/// Mean confidence of the retained biomarkers; 0 when there are none.
pub fn overall_confidence(biomarkers: &[ExtractedBiomarker]) -> f32 {
    if biomarkers.is_empty() {
        return 0.0;
    }
    let sum: f32 = biomarkers.iter().map(|b| b.confidence).sum();
    clamp_confidence(sum / biomarkers.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ordered() {
        assert!(thresholds::VERY_LOW < thresholds::LOW);
        assert!(thresholds::LOW < thresholds::MODERATE);
        assert!(thresholds::MODERATE < thresholds::HIGH);
        assert!(thresholds::HIGH < thresholds::VERY_HIGH);
    }

    #[test]
    fn overall_confidence_is_the_mean() {
        let list = vec![
            ExtractedBiomarker::new("Glucose", "test", 0.8),
            ExtractedBiomarker::new("Sodium", "test", 0.6),
        ];
        assert!((overall_confidence(&list) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn overall_confidence_of_nothing_is_zero() {
        assert_eq!(overall_confidence(&[]), 0.0);
    }
}
