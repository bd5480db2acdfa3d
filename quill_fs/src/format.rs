//! Format descriptors: encoding, line-ending style and BOM presence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bom::{BomSpec, bom_for};
use crate::encoding::Encoding;

/// Line terminator convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Line Feed - \n
    #[serde(alias = "lf")]
    Unix,
    /// Carriage Return + Line Feed - \r\n
    #[serde(alias = "crlf")]
    Windows,
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Unix => write!(f, "Unix (LF)"),
            LineEnding::Windows => write!(f, "Windows (CRLF)"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" | "lf" => Ok(LineEnding::Unix),
            "windows" | "win" | "crlf" => Ok(LineEnding::Windows),
            other => Err(format!("unsupported line ending '{other}' (expected unix or windows)")),
        }
    }
}

/// How a document is laid out on disk.
///
/// Descriptors are replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub encoding: Encoding,
    pub line_ending: LineEnding,
    pub has_bom: bool,
}

impl FormatDescriptor {
    /// What the editing surface always holds
    pub const CANONICAL: FormatDescriptor = FormatDescriptor {
        encoding: Encoding::Utf16,
        line_ending: LineEnding::Windows,
        has_bom: false,
    };

    /// Used for documents that were never saved
    pub const DEFAULT_SAVE: FormatDescriptor = FormatDescriptor {
        encoding: Encoding::Utf8,
        line_ending: LineEnding::Windows,
        has_bom: false,
    };

    pub const fn new(encoding: Encoding, line_ending: LineEnding, has_bom: bool) -> Self {
        FormatDescriptor {
            encoding,
            line_ending,
            has_bom,
        }
    }

    /// The BOM this format writes, empty when `has_bom` is false
    pub fn bom(&self) -> BomSpec {
        if self.has_bom {
            bom_for(self.encoding)
        } else {
            BomSpec::NONE
        }
    }

    pub fn with_encoding(self, encoding: Encoding) -> Self {
        FormatDescriptor { encoding, ..self }
    }

    pub fn with_line_ending(self, line_ending: LineEnding) -> Self {
        FormatDescriptor { line_ending, ..self }
    }

    pub fn with_bom(self, has_bom: bool) -> Self {
        FormatDescriptor { has_bom, ..self }
    }

    /// Status-line label for the encoding, e.g. `UTF-8 with BOM`
    pub fn encoding_label(&self) -> String {
        if self.has_bom {
            format!("{} with BOM", self.encoding)
        } else {
            self.encoding.to_string()
        }
    }
}

impl Default for FormatDescriptor {
    fn default() -> Self {
        FormatDescriptor::DEFAULT_SAVE
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.encoding_label(), self.line_ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(FormatDescriptor::CANONICAL.encoding, Encoding::Utf16);
        assert_eq!(FormatDescriptor::CANONICAL.line_ending, LineEnding::Windows);
        assert!(!FormatDescriptor::CANONICAL.has_bom);
        assert_eq!(FormatDescriptor::default(), FormatDescriptor::DEFAULT_SAVE);
        assert_eq!(FormatDescriptor::DEFAULT_SAVE.encoding, Encoding::Utf8);
    }

    #[test]
    fn test_bom_follows_flag() {
        assert!(FormatDescriptor::DEFAULT_SAVE.bom().is_empty());
        let with_bom = FormatDescriptor::DEFAULT_SAVE.with_bom(true);
        assert_eq!(with_bom.bom().bytes(), &[0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_display_matches_status_line() {
        let format = FormatDescriptor::new(Encoding::Utf8, LineEnding::Unix, true);
        assert_eq!(format.encoding_label(), "UTF-8 with BOM");
        assert_eq!(format.to_string(), "UTF-8 with BOM, Unix (LF)");
        assert_eq!(
            FormatDescriptor::CANONICAL.to_string(),
            "UTF-16, Windows (CRLF)"
        );
    }

    #[test]
    fn test_builders_replace_single_field() {
        let format = FormatDescriptor::DEFAULT_SAVE
            .with_encoding(Encoding::Utf16)
            .with_line_ending(LineEnding::Unix);
        assert_eq!(format, FormatDescriptor::new(Encoding::Utf16, LineEnding::Unix, false));
    }

    #[test]
    fn test_line_ending_from_str() {
        assert_eq!("LF".parse::<LineEnding>(), Ok(LineEnding::Unix));
        assert_eq!("crlf".parse::<LineEnding>(), Ok(LineEnding::Windows));
        assert!("cr".parse::<LineEnding>().is_err());
    }
}
