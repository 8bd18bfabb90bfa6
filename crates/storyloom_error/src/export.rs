//! Export error types.

/// Specific error conditions for storyboard export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExportErrorKind {
    /// Filesystem failure
    #[display("I/O error: {}", _0)]
    Io(String),
    /// Archive writer failure
    #[display("Archive error: {}", _0)]
    Archive(String),
    /// No scene holds an image
    #[display("No generated images to export")]
    NoImages,
}

/// Export error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The specific error condition
    pub kind: ExportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExportError {
    /// Create a new ExportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
