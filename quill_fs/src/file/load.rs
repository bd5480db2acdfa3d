//! File loading with a size guard and format detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::detect::detect_with_config;
use crate::document::{DocumentState, LoadOptions};
use crate::format::FormatDescriptor;
use crate::{Error, Result};

/// Load a file into a new document.
///
/// The file size is checked against the editing surface capacity before a
/// single byte is read.
pub fn load_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<DocumentState> {
    let path = path.as_ref();
    let bytes = read_file(path, options.max_input_bytes())?;
    DocumentState::from_bytes(Some(path.to_path_buf()), bytes, options)
}

/// Detect the on-disk format of a file without decoding it.
///
/// Only the size guard and I/O can fail; text that would not decode under
/// the detected encoding still gets a format.
pub fn detect_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<FormatDescriptor> {
    let bytes = read_file(path.as_ref(), options.max_input_bytes())?;
    Ok(detect_with_config(&bytes, &options.detection))
}

/// Read a whole file, refusing anything larger than `limit` bytes.
fn read_file(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let size = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
    if size > limit {
        warn!(file = %path.display(), size, limit, "file too large to open");
        return Err(Error::OversizedInput { size, limit });
    }

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size)
        .map_err(|_| Error::AllocationFailure { requested: size })?;
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
