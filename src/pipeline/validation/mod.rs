//! Per-biomarker validation, confidence discounting and the report summary.

pub mod confidence;
pub mod summary;
pub mod validator;

pub use confidence::{overall_confidence, thresholds};
pub use summary::build_validation_report;
pub use validator::{derive_status, BiomarkerValidator};
