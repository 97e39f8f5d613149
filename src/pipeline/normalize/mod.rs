//! Text normalization: OCR artifact repair, then line cleanup.

pub mod correction;
pub mod ocr;
pub mod preprocess;
pub mod sanitize;

pub use correction::TermCorrector;
pub use ocr::OcrNormalizer;
pub use preprocess::preprocess;
