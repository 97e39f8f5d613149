use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(BiomarkerStatus {
    Low => "low",
    Normal => "normal",
    High => "high",
    Critical => "critical",
    Undefined => "undefined",
});

impl Default for BiomarkerStatus {
    fn default() -> Self {
        Self::Undefined
    }
}

impl BiomarkerStatus {
    /// Anything outside the normal band counts as flagged for coding purposes.
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Low | Self::High | Self::Critical)
    }
}

str_enum!(BiomarkerCategory {
    Kidney => "kidney",
    Diabetes => "diabetes",
    Electrolytes => "electrolytes",
    Lipids => "lipids",
    Thyroid => "thyroid",
    BloodCount => "blood_count",
    Vitamins => "vitamins",
    Liver => "liver",
    Hormones => "hormones",
    General => "general",
});

impl Default for BiomarkerCategory {
    fn default() -> Self {
        Self::General
    }
}

str_enum!(RemarkType {
    Interpretation => "interpretation",
    Recommendation => "recommendation",
    Critical => "critical",
    General => "general",
});

str_enum!(RemarkSource {
    Direct => "direct",
    Inferred => "inferred",
});

str_enum!(ReportType {
    BloodTest => "blood_test",
    LipidProfile => "lipid_profile",
    ThyroidProfile => "thyroid_profile",
    Urinalysis => "urinalysis",
    Other => "other",
});

str_enum!(Sex {
    Male => "male",
    Female => "female",
    Other => "other",
});
