//! # quill_fs - Format detection and transcoding for the quill editor
//!
//! The editing surface always holds canonical text (UTF-16 code units,
//! Windows line endings, no BOM). This crate moves text between that
//! representation and whatever sits on disk.
//!
//! Modules:
//! - `bom` for the byte-order-mark table
//! - `encoding` for the encoding enum and the UTF-8/UTF-16 primitives
//! - `format` for the format descriptor and its well-known constants
//! - `detect` for best-effort format detection
//! - `convert` for the three-stage transcoding pipeline
//! - `buffer` for the ownership types flowing through the pipeline
//! - `document` for per-document editor state
//! - `file` for loading and saving documents

mod bom;
mod buffer;
mod convert;
mod detect;
mod document;
mod encoding;
mod file;
mod format;

pub use bom::{BomSpec, bom_for, strip_bom};
pub use buffer::{ConversionStats, Converted, TextBuffer};
pub use convert::{ConvertOptions, convert};
pub use detect::{detect, detect_with_config};
pub use document::{DocumentState, LoadOptions, NEW_FILE_NAME};
pub use encoding::{DetectionConfig, Encoding, looks_like_utf16};
pub use file::{FileSaveResult, SaveOptions, detect_file, load_file, save_file};
pub use format::{FormatDescriptor, LineEnding};

use std::io;

/// Errors produced while converting or persisting text
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source cannot be decoded under the claimed encoding, or re-encoding
    /// produced a length other than the measured one
    #[error("invalid {encoding} text{}: {reason}", offset.map(|o| format!(" at byte {o}")).unwrap_or_default())]
    InvalidEncoding {
        encoding: Encoding,
        offset: Option<usize>,
        reason: String,
    },
    /// Input is larger than the editing surface can hold
    #[error("input is too large ({size} bytes), maximum is {limit} bytes")]
    OversizedInput { size: usize, limit: usize },
    /// The allocator refused a conversion buffer
    #[error("failed to allocate a conversion buffer of {requested} bytes")]
    AllocationFailure { requested: usize },
    /// I/O error while reading or writing a document
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid(encoding: Encoding, offset: Option<usize>, reason: impl Into<String>) -> Self {
        Error::InvalidEncoding {
            encoding,
            offset,
            reason: reason.into(),
        }
    }

    /// Move a decode offset measured in a sub-slice back to the whole input.
    pub(crate) fn offset_by(self, skipped: usize) -> Self {
        match self {
            Error::InvalidEncoding {
                encoding,
                offset,
                reason,
            } => Error::InvalidEncoding {
                encoding,
                offset: offset.map(|o| o + skipped),
                reason,
            },
            other => other,
        }
    }

    /// Whether the caller should stop instead of carrying on with the
    /// current document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::AllocationFailure { .. })
    }
}

/// Result type for conversion and document operations
pub type Result<T> = std::result::Result<T, Error>;
