pub mod biomarker;
pub mod claims;
pub mod enums;
pub mod report;

pub use biomarker::*;
pub use claims::*;
pub use enums::*;
pub use report::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
