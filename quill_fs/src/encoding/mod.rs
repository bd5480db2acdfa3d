use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod utf16;
pub mod utf8;

pub use utf16::looks_like_utf16;

/// Text encodings the editor can read and write.
///
/// UTF-16 is always little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "utf-16", alias = "utf16", alias = "utf-16le", alias = "utf16le")]
    Utf16,
}

impl Encoding {
    /// Size in bytes of one code unit
    pub fn unit_size(self) -> usize {
        match self {
            Encoding::Utf8 => 1,
            Encoding::Utf16 => 2,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "UTF-8"),
            Encoding::Utf16 => write!(f, "UTF-16"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "utf16" | "utf-16" | "utf16le" | "utf-16le" => Ok(Encoding::Utf16),
            other => Err(format!("unsupported encoding '{other}' (expected utf-8 or utf-16)")),
        }
    }
}

/// Tuning knobs for the "looks like UTF-16" heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Number of leading 16-bit units inspected
    pub sample_units: usize,
    /// Minimum share of ASCII-compatible units for a UTF-16 verdict
    pub ascii_ratio: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            sample_units: 256,
            ascii_ratio: 0.5,
        }
    }
}
