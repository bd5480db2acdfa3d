//! Best-effort format detection for raw file contents.

use tracing::debug;

use crate::bom::strip_bom;
use crate::convert::eol::{CR, LF};
use crate::encoding::utf16::units_le;
use crate::encoding::{DetectionConfig, Encoding, looks_like_utf16};
use crate::format::{FormatDescriptor, LineEnding};

/// Detect the format of `bytes` with the default heuristic settings.
pub fn detect(bytes: &[u8]) -> FormatDescriptor {
    detect_with_config(bytes, &DetectionConfig::default())
}

/// Detect the format of `bytes`.
///
/// Never fails: anything that does not look like UTF-16 is treated as
/// UTF-8, and a buffer without a bare line feed is treated as Windows.
pub fn detect_with_config(bytes: &[u8], config: &DetectionConfig) -> FormatDescriptor {
    let encoding = if looks_like_utf16(bytes, config) {
        Encoding::Utf16
    } else {
        Encoding::Utf8
    };

    let (body, has_bom) = strip_bom(bytes, encoding);

    let line_ending = match encoding {
        Encoding::Utf8 => scan_line_ending(body.iter().map(|&b| u16::from(b))),
        Encoding::Utf16 => scan_line_ending(units_le(body)),
    };

    let format = FormatDescriptor::new(encoding, line_ending, has_bom);
    debug!(len = bytes.len(), %format, "detected format");
    format
}

/// The first line feed without a carriage return before it makes the text
/// Unix. A line feed in the very first unit has nothing before it and
/// never decides.
fn scan_line_ending(units: impl Iterator<Item = u16>) -> LineEnding {
    let mut prev: Option<u16> = None;
    for unit in units {
        if unit == LF && prev.is_some_and(|p| p != CR) {
            return LineEnding::Unix;
        }
        prev = Some(unit);
    }
    LineEnding::Windows
}
