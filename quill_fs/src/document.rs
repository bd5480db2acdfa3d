//! Per-document editor state: the canonical text plus the format it is
//! saved in.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{Error, Result};
use crate::buffer::{Converted, TextBuffer};
use crate::convert::{ConvertOptions, convert};
use crate::detect::detect_with_config;
use crate::encoding::DetectionConfig;
use crate::format::FormatDescriptor;

/// Name shown for a document that has never been saved
pub const NEW_FILE_NAME: &str = "Empty file";

/// Limits and heuristics applied when a document is loaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Capacity of the editing surface, in UTF-16 units
    pub max_chars: usize,
    pub detection: DetectionConfig,
}

impl LoadOptions {
    /// Largest file accepted, in bytes
    pub fn max_input_bytes(&self) -> usize {
        self.max_chars.saturating_mul(2)
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            max_chars: 32 * 1024 * 1024,
            detection: DetectionConfig::default(),
        }
    }
}

/// The open document.
///
/// `text` is always canonical: UTF-16 units with Windows line endings and
/// no BOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    format: FormatDescriptor,
    path: Option<PathBuf>,
    is_new: bool,
    text: Vec<u16>,
}

impl DocumentState {
    /// An empty, never-saved document
    pub fn new_document(format: FormatDescriptor) -> Self {
        DocumentState {
            format,
            path: None,
            is_new: true,
            text: Vec::new(),
        }
    }

    /// Build a document from raw file contents.
    pub fn from_bytes(path: Option<PathBuf>, bytes: Vec<u8>, options: &LoadOptions) -> Result<Self> {
        let mut doc = DocumentState::new_document(FormatDescriptor::DEFAULT_SAVE);
        doc.load_bytes(path, bytes, options)?;
        Ok(doc)
    }

    pub fn format(&self) -> FormatDescriptor {
        self.format
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Canonical text as UTF-16 units
    pub fn text(&self) -> &[u16] {
        &self.text
    }

    pub fn text_string(&self) -> String {
        String::from_utf16_lossy(&self.text)
    }

    /// File path for saved documents, `Empty file` otherwise
    pub fn display_name(&self) -> Cow<'_, str> {
        match (&self.path, self.is_new) {
            (Some(path), false) => path.to_string_lossy(),
            _ => Cow::Borrowed(NEW_FILE_NAME),
        }
    }

    /// Replace the format used for the next save. The text is untouched.
    pub fn change_format(&mut self, format: FormatDescriptor) {
        debug!(from = %self.format, to = %format, "format changed");
        self.format = format;
    }

    /// Replace the text with `text`, bringing its line endings into
    /// canonical form.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let converted = convert(
            TextBuffer::from(text),
            FormatDescriptor::DEFAULT_SAVE,
            FormatDescriptor::CANONICAL,
            &ConvertOptions::new(),
        )?;
        self.text = converted.into_units().unwrap_or_default();
        Ok(())
    }

    /// Replace this document with the decoded contents of `bytes`.
    ///
    /// The format is detected, the input is checked against the size limit
    /// and then converted to canonical text. On error the document is left
    /// exactly as it was.
    pub fn load_bytes(&mut self, path: Option<PathBuf>, bytes: Vec<u8>, options: &LoadOptions) -> Result<()> {
        let limit = options.max_input_bytes();
        if bytes.len() > limit {
            warn!(size = bytes.len(), limit, "refusing oversized document");
            return Err(Error::OversizedInput {
                size: bytes.len(),
                limit,
            });
        }

        let format = detect_with_config(&bytes, &options.detection);
        let convert_options = ConvertOptions::new().with_limit(limit);

        let converted = convert(
            TextBuffer::from(bytes),
            format,
            FormatDescriptor::CANONICAL,
            &convert_options,
        )?;

        self.text = converted.into_units().unwrap_or_default();
        self.format = format;
        self.path = path;
        self.is_new = false;
        info!(name = %self.display_name(), %format, units = self.text.len(), "document loaded");
        Ok(())
    }

    /// Encode the text for writing in this document's format.
    ///
    /// The result carries no terminator; its size is the exact byte count
    /// to write.
    pub fn encode_for_save(&self) -> Result<Converted> {
        convert(
            TextBuffer::borrowed_units(&self.text),
            FormatDescriptor::CANONICAL,
            self.format,
            &ConvertOptions::new(),
        )
    }

    /// Record a successful save to `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.is_new = false;
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        DocumentState::new_document(FormatDescriptor::DEFAULT_SAVE)
    }
}
