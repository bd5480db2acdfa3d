//! Atomic file saving with permission preservation.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Result;
use crate::document::DocumentState;
use crate::format::FormatDescriptor;

/// Configuration for file saving operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Whether to preserve file permissions (Unix only)
    pub preserve_permissions: bool,
    /// Whether to use atomic writes with temp files
    pub atomic_writes: bool,
    /// Custom temp file suffix
    pub temp_suffix: String,
    /// Buffer size for streaming writes
    pub buffer_size: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            preserve_permissions: true,
            atomic_writes: true,
            temp_suffix: ".tmp".to_string(),
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

/// Result of a file saving operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSaveResult {
    /// Final path where file was saved
    pub path: PathBuf,
    /// Number of bytes written, BOM included
    pub bytes_written: u64,
    /// Whether atomic write was used
    pub atomic_write: bool,
    /// Format the bytes were written in
    pub format: FormatDescriptor,
}

/// Save `doc` to `path` in the document's current format.
///
/// The text is encoded first; nothing touches the disk if encoding fails.
/// On success the document remembers `path` and is no longer new.
pub fn save_file<P: AsRef<Path>>(doc: &mut DocumentState, path: P, options: &SaveOptions) -> Result<FileSaveResult> {
    let path = path.as_ref();
    let format = doc.format();
    let content = doc.encode_for_save()?.into_bytes();

    let bytes_written = if options.atomic_writes {
        save_atomic(path, &content, options)?
    } else {
        write_to_file(path, &content, options)?
    };

    doc.mark_saved(path.to_path_buf());
    debug!(file = %path.display(), bytes_written, %format, "document saved");

    Ok(FileSaveResult {
        path: path.to_path_buf(),
        bytes_written,
        atomic_write: options.atomic_writes,
        format,
    })
}

/// Write to a temp file next to `path`, then rename it into place.
fn save_atomic(path: &Path, content: &[u8], options: &SaveOptions) -> io::Result<u64> {
    let temp_path = get_temp_path(path, &options.temp_suffix);

    let bytes_written = write_to_file(&temp_path, content, options).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;

    if options.preserve_permissions && path.exists() {
        if let Err(err) = preserve_permissions(path, &temp_path) {
            warn!(file = %path.display(), %err, "could not preserve permissions");
        }
    }

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;

    Ok(bytes_written)
}

/// Write content to a file with buffering.
fn write_to_file(path: &Path, content: &[u8], options: &SaveOptions) -> io::Result<u64> {
    let file = File::create(path)?;
    let mut writer = io::BufWriter::with_capacity(options.buffer_size.max(1), file);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_mut().sync_all()?;

    Ok(content.len() as u64)
}

/// Generate temp file path.
fn get_temp_path(original_path: &Path, suffix: &str) -> PathBuf {
    let mut temp_path = original_path.to_path_buf();
    let original_name = temp_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");

    let temp_name = format!("{}{}", original_name, suffix);
    temp_path.set_file_name(temp_name);
    temp_path
}

#[cfg(unix)]
fn preserve_permissions(source: &Path, target: &Path) -> io::Result<()> {
    let permissions = fs::metadata(source)?.permissions();
    fs::set_permissions(target, permissions)
}

#[cfg(not(unix))]
fn preserve_permissions(_source: &Path, _target: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::format::LineEnding;

    #[test]
    fn test_save_new_document_default_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut doc = DocumentState::default();
        doc.set_text("Line1\nLine2").unwrap();

        let result = save_file(&mut doc, &path, &SaveOptions::default()).unwrap();
        assert!(result.atomic_write);
        assert_eq!(result.bytes_written, 12);
        assert_eq!(fs::read(&path).unwrap(), b"Line1\r\nLine2");
        assert!(!doc.is_new());
        assert_eq!(doc.path(), Some(path.as_path()));
        assert!(!get_temp_path(&path, ".tmp").exists());
    }

    #[test]
    fn test_save_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        let mut doc = DocumentState::default();
        doc.set_text("Hello with BOM!").unwrap();
        doc.change_format(FormatDescriptor::new(Encoding::Utf8, LineEnding::Windows, true));

        save_file(&mut doc, &path, &SaveOptions::default()).unwrap();
        let saved = fs::read(&path).unwrap();
        assert_eq!(&saved[0..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&saved[3..], b"Hello with BOM!");
    }

    #[test]
    fn test_save_utf16_unix_direct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        let mut doc = DocumentState::default();
        doc.set_text("a\r\nb").unwrap();
        doc.change_format(FormatDescriptor::new(Encoding::Utf16, LineEnding::Unix, false));

        let options = SaveOptions {
            atomic_writes: false,
            ..SaveOptions::default()
        };
        let result = save_file(&mut doc, &path, &options).unwrap();
        assert!(!result.atomic_write);
        assert_eq!(fs::read(&path).unwrap(), vec![0x61, 0x00, 0x0A, 0x00, 0x62, 0x00]);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.txt");
        fs::write(&path, b"old contents that are longer").unwrap();

        let mut doc = DocumentState::default();
        doc.set_text("new").unwrap();
        save_file(&mut doc, &path, &SaveOptions::default()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"echo hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

        let mut doc = DocumentState::default();
        doc.set_text("echo bye").unwrap();
        save_file(&mut doc, &path, &SaveOptions::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }

    #[test]
    fn test_custom_suffix_and_small_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.txt");
        let mut doc = DocumentState::default();
        doc.set_text("more than four bytes").unwrap();

        let options = SaveOptions {
            temp_suffix: ".swp".to_string(),
            buffer_size: 4,
            ..SaveOptions::default()
        };
        let result = save_file(&mut doc, &path, &options).unwrap();
        assert_eq!(result.bytes_written, 20);
        assert_eq!(fs::read(&path).unwrap(), b"more than four bytes");
        assert!(!get_temp_path(&path, ".swp").exists());
    }

    #[test]
    fn test_get_temp_path() {
        let original = Path::new("/path/to/file.txt");
        let temp = get_temp_path(original, ".tmp");

        assert_eq!(temp, Path::new("/path/to/file.txt.tmp"));
    }
}
