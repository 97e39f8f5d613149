//! Report text to structured biomarkers.

pub mod assembler;
pub mod batch;
pub mod extraction;
pub mod normalize;
pub mod orchestrator;
pub mod remarks;
pub mod sections;
pub mod validation;

pub use batch::parse_batch;
pub use orchestrator::{ParseError, ReportParser};
