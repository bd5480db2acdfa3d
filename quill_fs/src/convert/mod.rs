//! The transcoding pipeline.
//!
//! Every conversion runs three stages over an intermediate canonical
//! buffer of UTF-16 code units:
//! 1. decode the source into canonical units (aliasing UTF-16 input)
//! 2. rewrite line endings for the target, only when something changes
//! 3. encode into the target encoding with its BOM and optional terminator

pub mod eol;

use std::borrow::Cow;

use tracing::{debug, trace, warn};

use crate::bom::strip_bom;
use crate::buffer::{ConversionStats, Converted, TextBuffer, try_alloc, try_grow};
use crate::encoding::utf16::{BOM_UNIT, units_le};
use crate::encoding::{Encoding, utf8};
use crate::format::FormatDescriptor;
use crate::{Error, Result};

/// Per-call knobs for `convert`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Append a terminator unit (`0` byte or `0x0000` unit) and count it in
    /// the reported size
    pub null_terminate: bool,
    /// Reject inputs larger than this many bytes before decoding
    pub max_input_bytes: Option<usize>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn null_terminated(mut self, null_terminate: bool) -> Self {
        self.null_terminate = null_terminate;
        self
    }

    pub fn with_limit(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = Some(max_input_bytes);
        self
    }
}

/// Convert `input` from format `from` to format `to`.
///
/// An owned `input` is released by the pipeline on every path; a borrowed
/// one is left with the caller. On success the result is a single freshly
/// owned buffer. On failure nothing is returned.
pub fn convert(
    input: TextBuffer<'_>,
    from: FormatDescriptor,
    to: FormatDescriptor,
    options: &ConvertOptions,
) -> Result<Converted> {
    let input_bytes = input.byte_len();
    if let Some(limit) = options.max_input_bytes {
        if input_bytes > limit {
            warn!(size = input_bytes, limit, "refusing oversized input");
            return Err(Error::OversizedInput {
                size: input_bytes,
                limit,
            });
        }
    }

    let mut stats = ConversionStats {
        input_bytes,
        ..ConversionStats::default()
    };

    let canonical = decode(input, from, &mut stats)?;
    trace!(units = canonical.len(), copied = stats.decode_copied, "decoded to canonical");

    let (canonical, rewritten) = eol::normalize(canonical, to.line_ending)?;
    stats.line_endings_rewritten = rewritten;
    debug!(
        target_eol = %to.line_ending,
        rewritten = stats.line_endings_rewritten,
        "line endings normalized"
    );

    let buffer = encode(canonical, to, options.null_terminate)?;
    let converted = Converted::new(buffer, options.null_terminate, stats);
    trace!(from = %from, to = %to, size = converted.size(), "conversion finished");
    Ok(converted)
}

/// Stage A: bring the source into canonical code units.
fn decode<'a>(
    input: TextBuffer<'a>,
    from: FormatDescriptor,
    stats: &mut ConversionStats,
) -> Result<Cow<'a, [u16]>> {
    match (input, from.encoding) {
        (TextBuffer::Units(units), Encoding::Utf16) => Ok(skip_bom_unit(units, from.has_bom)),
        (TextBuffer::Units(_), Encoding::Utf8) => Err(Error::invalid(
            Encoding::Utf8,
            None,
            "code-unit input requires a UTF-16 source format",
        )),
        (TextBuffer::Bytes(bytes), encoding) => {
            stats.decode_copied = true;
            let (body, skipped) = skip_bom_bytes(&bytes, from);
            let units = match encoding {
                Encoding::Utf16 => decode_utf16_bytes(body),
                // the transcoder is never handed an empty string
                Encoding::Utf8 if body.is_empty() => Ok(Vec::new()),
                Encoding::Utf8 => utf8::decode_to_units(body),
            }
            .map_err(|err| err.offset_by(skipped))?;
            Ok(Cow::Owned(units))
        }
    }
}

fn skip_bom_unit(units: Cow<'_, [u16]>, has_bom: bool) -> Cow<'_, [u16]> {
    if !has_bom {
        return units;
    }
    if units.first() != Some(&BOM_UNIT) {
        warn!("source format claims a BOM that is not present");
        return units;
    }
    match units {
        Cow::Borrowed(slice) => Cow::Borrowed(&slice[1..]),
        Cow::Owned(mut vec) => {
            vec.remove(0);
            Cow::Owned(vec)
        }
    }
}

/// Returns the body and the number of signature bytes skipped.
fn skip_bom_bytes(bytes: &[u8], from: FormatDescriptor) -> (&[u8], usize) {
    if !from.has_bom {
        return (bytes, 0);
    }
    let (body, found) = strip_bom(bytes, from.encoding);
    if !found {
        warn!(encoding = %from.encoding, "source format claims a BOM that is not present");
    }
    (body, bytes.len() - body.len())
}

fn decode_utf16_bytes(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::invalid(
            Encoding::Utf16,
            Some(bytes.len() - 1),
            "odd byte length",
        ));
    }
    let mut units = try_alloc(bytes.len() / 2)?;
    units.extend(units_le(bytes));
    Ok(units)
}

/// Stage C: produce the owned output in the target encoding.
fn encode(
    canonical: Cow<'_, [u16]>,
    to: FormatDescriptor,
    null_terminate: bool,
) -> Result<TextBuffer<'static>> {
    match to.encoding {
        Encoding::Utf16 => encode_utf16(canonical, to.has_bom, null_terminate).map(TextBuffer::from),
        Encoding::Utf8 => encode_utf8(&canonical, to, null_terminate).map(TextBuffer::from),
    }
}

fn encode_utf16(canonical: Cow<'_, [u16]>, has_bom: bool, null_terminate: bool) -> Result<Vec<u16>> {
    let mut out = match canonical {
        Cow::Owned(units) if !has_bom => units,
        units => {
            let len = usize::from(has_bom) + units.len() + usize::from(null_terminate);
            let mut out = try_alloc(len)?;
            if has_bom {
                out.push(BOM_UNIT);
            }
            out.extend_from_slice(&units);
            out
        }
    };
    if null_terminate {
        try_grow(&mut out, 1)?;
        out.push(0);
    }
    Ok(out)
}

fn encode_utf8(canonical: &[u16], to: FormatDescriptor, null_terminate: bool) -> Result<Vec<u8>> {
    let bom = to.bom();
    let terminator = usize::from(null_terminate);

    // the transcoder is never handed an empty string
    if canonical.is_empty() {
        let mut out = try_alloc(bom.len() + terminator)?;
        out.extend_from_slice(bom.bytes());
        if null_terminate {
            out.push(0);
        }
        return Ok(out);
    }

    let measured = utf8::measure_utf8(canonical);
    let mut out = try_alloc(bom.len() + measured + terminator)?;
    out.extend_from_slice(bom.bytes());
    let written = utf8::encode_units(canonical, &mut out);
    if written != measured {
        return Err(Error::invalid(
            Encoding::Utf8,
            None,
            format!("measured {measured} bytes but wrote {written}"),
        ));
    }
    if null_terminate {
        out.push(0);
    }
    Ok(out)
}
