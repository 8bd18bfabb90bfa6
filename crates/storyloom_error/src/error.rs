//! Top-level error wrapper types.

use crate::{
    ConfigError, ExportError, GeminiError, GeminiErrorKind, StoryboardError, VideoError,
    is_credential_rejection,
};

/// Every error condition a Storyloom operation can produce.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ExportError, ExportErrorKind, StoryloomError};
///
/// let export_err = ExportError::new(ExportErrorKind::NoImages);
/// let err: StoryloomError = export_err.into();
/// assert!(format!("{}", err).contains("Export Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Generation service error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Storyboard orchestration error
    #[from(StoryboardError)]
    Storyboard(StoryboardError),
    /// Video session error
    #[from(VideoError)]
    Video(VideoError),
    /// Export error
    #[from(ExportError)]
    Export(ExportError),
}

impl StoryloomErrorKind {
    /// Display-ready message without source location.
    pub fn user_message(&self) -> String {
        match self {
            StoryloomErrorKind::Config(e) => e.kind.to_string(),
            StoryloomErrorKind::Gemini(e) => e.kind.to_string(),
            StoryloomErrorKind::Storyboard(e) => e.kind.to_string(),
            StoryloomErrorKind::Video(e) => e.kind.to_string(),
            StoryloomErrorKind::Export(e) => e.kind.to_string(),
        }
    }
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ConfigError, ConfigErrorKind, StoryloomResult};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Deserialize("missing field".to_string())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.user_message(), "Failed to parse configuration: missing field");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }

    /// Display-ready message for storing in presentation state.
    pub fn user_message(&self) -> String {
        self.0.user_message()
    }

    /// True if the generation service rejected the caller's credential.
    ///
    /// Recognizes both the distinguished kind and rejection text carried by any
    /// other error.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_error::{GeminiError, GeminiErrorKind, StoryloomError};
    ///
    /// let err: StoryloomError = GeminiError::new(GeminiErrorKind::HttpError {
    ///     status_code: 404,
    ///     message: "Requested entity was not found.".to_string(),
    /// })
    /// .into();
    /// assert!(err.is_credential_rejected());
    /// ```
    pub fn is_credential_rejected(&self) -> bool {
        match self.kind() {
            StoryloomErrorKind::Gemini(e)
                if matches!(e.kind, GeminiErrorKind::CredentialRejected(_)) =>
            {
                true
            }
            _ => is_credential_rejection(&self.user_message()),
        }
    }
}

// Generic From implementation for any type that converts to StoryloomErrorKind
impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
