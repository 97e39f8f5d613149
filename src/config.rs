use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "labextract";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parser name recorded in report metadata.
pub const PARSER_NAME: &str = "rule_based_lab_parser";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labextract=info"
}

/// ~/.labextract/, or None when no home directory can be determined.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{APP_NAME}")))
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ═══════════════════════════════════════════════════════════
// Pipeline configuration
// ═══════════════════════════════════════════════════════════

/// Tunables for one `ReportParser`. Every field has a default, so a partial
/// JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Biomarkers below this confidence are dropped by `validate_and_filter`.
    pub min_confidence: f32,
    /// Confidence assigned by the knowledge-based strategy.
    pub knowledge_confidence: f32,
    /// Inputs larger than this are rejected before any stage runs.
    pub max_input_bytes: usize,
    /// Fuzzy-correct misspelled biomarker names after OCR repair.
    pub enable_term_correction: bool,
    /// Run layout-specific format adapters after the generic strategies.
    pub enable_format_adapters: bool,
    /// Retained biomarkers below this are listed as low-confidence.
    pub low_confidence_threshold: f32,
    /// Charge for biomarkers billed under the unlisted-procedure code.
    pub default_charge: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            knowledge_confidence: 0.85,
            max_input_bytes: 2 * 1024 * 1024,
            enable_term_correction: true,
            enable_format_adapters: true,
            low_confidence_threshold: 0.7,
            default_charge: 25.00,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.labextract/config.json` when present and valid, defaults otherwise.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded pipeline config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid pipeline config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_confidence", self.min_confidence),
            ("knowledge_confidence", self.knowledge_confidence),
            ("low_confidence_threshold", self.low_confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.max_input_bytes == 0 {
            return Err(ConfigError::Invalid("max_input_bytes must be positive".into()));
        }
        if !self.default_charge.is_finite() || self.default_charge < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_charge must be a non-negative amount, got {}",
                self.default_charge
            )));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_under_home() {
        let dir = config_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(".labextract"));
        assert!(config_file_path().unwrap().ends_with("config.json"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.min_confidence - 0.5).abs() < f32::EPSILON);
        assert!((config.knowledge_confidence - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.max_input_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "min_confidence": 0.6 }"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert!((config.min_confidence - 0.6).abs() < f32::EPSILON);
        assert!(config.enable_format_adapters);
        assert!((config.default_charge - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "min_confidence": 1.5 }"#).unwrap();

        let err = PipelineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(PipelineConfig::load(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn zero_input_limit_rejected() {
        let config = PipelineConfig {
            max_input_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
