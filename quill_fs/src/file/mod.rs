//! Reading documents from disk and writing them back.
//!
//! This module provides:
//! - Whole-file loading with a size guard applied before reading
//! - Format detection of a file without decoding it
//! - Atomic saving through a temp file and rename
//! - Permission preservation on Unix

pub mod load;
pub mod save;

pub use load::{detect_file, load_file};
pub use save::{FileSaveResult, SaveOptions, save_file};
