//! Video session error types.

/// Specific error conditions for video generation sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum VideoErrorKind {
    /// Source prompt is empty or whitespace
    #[display("Please provide a prompt for the video")]
    EmptyPrompt,
    /// A render is already running in this session
    #[display("A video is already being generated")]
    AlreadyGenerating,
    /// The session already holds a finished video
    #[display("This session already produced a video; close it before starting another")]
    AlreadySucceeded,
    /// The session was closed while the start was in progress
    #[display("The video session was closed")]
    Closed,
    /// No credential is selected and selection did not succeed
    #[display("An API key must be selected before generating video: {}", _0)]
    CredentialRequired(String),
    /// The operation finished without a video reference
    #[display("Video generation completed but no video was returned.")]
    MissingAsset,
    /// Downloading the finished video failed
    #[display("Failed to download video: {}", _0)]
    FetchFailed(String),
}

/// Video session error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyloom_error::{VideoError, VideoErrorKind};
///
/// let err = VideoError::new(VideoErrorKind::MissingAsset);
/// assert!(format!("{}", err).contains("no video was returned"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Video Error: {} at line {} in {}", kind, line, file)]
pub struct VideoError {
    /// The specific error condition
    pub kind: VideoErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl VideoError {
    /// Create a new VideoError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: VideoErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
