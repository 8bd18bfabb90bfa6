//! Storyboard exporters for Storyloom.
//!
//! - [`ArchiveExporter`] writes every panel image into a ZIP archive.
//! - [`DocumentExporter`] writes a self-contained HTML storyboard.
//!
//! Both name their output after the storyboard title, passed through
//! [`sanitize_filename`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod document;
mod sanitize;

pub use archive::ArchiveExporter;
pub use document::DocumentExporter;
pub use sanitize::sanitize_filename;

use std::path::{Path, PathBuf};
use storyloom_error::{ExportError, ExportErrorKind};

/// Output path `{dir}/{sanitized title}.{extension}`.
fn output_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    let mut base = sanitize_filename(title);
    if base.is_empty() {
        base = "storyboard".to_string();
    }
    dir.join(format!("{base}.{extension}"))
}

#[track_caller]
fn io_error(e: std::io::Error) -> ExportError {
    ExportError::new(ExportErrorKind::Io(e.to_string()))
}
