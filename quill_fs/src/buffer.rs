//! Ownership types for text flowing through the conversion pipeline.
//!
//! A borrowed buffer stays with the caller; an owned buffer is moved into
//! the pipeline and released there, whether the conversion succeeds or not.

use std::borrow::Cow;
use std::mem;

use crate::Error;

/// Text handed to or returned from the pipeline, as raw bytes or as
/// UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBuffer<'a> {
    Bytes(Cow<'a, [u8]>),
    Units(Cow<'a, [u16]>),
}

impl<'a> TextBuffer<'a> {
    pub fn borrowed_bytes(bytes: &'a [u8]) -> Self {
        TextBuffer::Bytes(Cow::Borrowed(bytes))
    }

    pub fn borrowed_units(units: &'a [u16]) -> Self {
        TextBuffer::Units(Cow::Borrowed(units))
    }

    /// Length in bytes, as it would be laid out on disk
    pub fn byte_len(&self) -> usize {
        match self {
            TextBuffer::Bytes(bytes) => bytes.len(),
            TextBuffer::Units(units) => units.len() * 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }

    /// Serialize to on-disk bytes (code units are written little-endian).
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            TextBuffer::Bytes(bytes) => bytes.into_owned(),
            TextBuffer::Units(units) => units.iter().flat_map(|u| u.to_le_bytes()).collect(),
        }
    }

    /// Take the code units, if this buffer holds UTF-16 units.
    pub fn into_units(self) -> Option<Vec<u16>> {
        match self {
            TextBuffer::Units(units) => Some(units.into_owned()),
            TextBuffer::Bytes(_) => None,
        }
    }
}

impl From<Vec<u8>> for TextBuffer<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        TextBuffer::Bytes(Cow::Owned(bytes))
    }
}

impl From<Vec<u16>> for TextBuffer<'static> {
    fn from(units: Vec<u16>) -> Self {
        TextBuffer::Units(Cow::Owned(units))
    }
}

impl<'a> From<&'a [u8]> for TextBuffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TextBuffer::borrowed_bytes(bytes)
    }
}

impl<'a> From<&'a [u16]> for TextBuffer<'a> {
    fn from(units: &'a [u16]) -> Self {
        TextBuffer::borrowed_units(units)
    }
}

impl<'a> From<&'a str> for TextBuffer<'a> {
    fn from(text: &'a str) -> Self {
        TextBuffer::borrowed_bytes(text.as_bytes())
    }
}

/// What a single conversion did, for callers that care about allocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub input_bytes: usize,
    /// Stage A had to copy or transcode instead of aliasing the input
    pub decode_copied: bool,
    /// Stage B rewrote line endings into a fresh buffer
    pub line_endings_rewritten: bool,
    pub output_bytes: usize,
}

/// The freshly owned result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    buffer: TextBuffer<'static>,
    size: usize,
    null_terminated: bool,
    stats: ConversionStats,
}

impl Converted {
    pub(crate) fn new(buffer: TextBuffer<'static>, null_terminated: bool, mut stats: ConversionStats) -> Self {
        let size = buffer.byte_len();
        stats.output_bytes = size;
        Converted {
            buffer,
            size,
            null_terminated,
            stats,
        }
    }

    /// Size in bytes, BOM included. The terminator only counts when one was
    /// requested.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_null_terminated(&self) -> bool {
        self.null_terminated
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    pub fn into_buffer(self) -> TextBuffer<'static> {
        self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    pub fn into_units(self) -> Option<Vec<u16>> {
        self.buffer.into_units()
    }
}

/// Allocate an empty vector able to hold exactly `len` elements.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::AllocationFailure {
        requested: len.saturating_mul(mem::size_of::<T>()),
    })?;
    Ok(buf)
}

/// Make room for `additional` more elements without aborting on failure.
pub(crate) fn try_grow<T>(buf: &mut Vec<T>, additional: usize) -> Result<(), Error> {
    buf.try_reserve_exact(additional)
        .map_err(|_| Error::AllocationFailure {
            requested: buf
                .len()
                .saturating_add(additional)
                .saturating_mul(mem::size_of::<T>()),
        })
}
