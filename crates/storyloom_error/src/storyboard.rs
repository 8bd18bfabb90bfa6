//! Storyboard orchestration error types.

/// Specific error conditions for storyboard operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryboardErrorKind {
    /// Story prompt is empty or whitespace
    #[display("Please enter a story idea")]
    EmptyPrompt,
    /// Theme is empty or whitespace
    #[display("Please enter a theme")]
    EmptyTheme,
    /// Edit instruction is empty or whitespace
    #[display("Please describe the edit to apply")]
    EmptyEditPrompt,
    /// Another storyboard run is already in progress
    #[display("A storyboard is already being generated")]
    Busy,
    /// Scene index does not exist in the current collection
    #[display("Scene {} does not exist (storyboard has {} scenes)", index, len)]
    SceneOutOfRange {
        /// Requested index
        index: usize,
        /// Number of scenes in the collection
        len: usize,
    },
    /// Edit requested on a scene that holds no image
    #[display("Scene {} has no image to edit", _0)]
    NoImageToEdit(usize),
    /// Operation requested on a scene whose image request is in flight
    #[display("Scene {} is still generating", _0)]
    ScenePending(usize),
    /// Storyboard was replaced while the operation was in flight
    #[display("Storyboard was replaced before the operation completed")]
    RunReplaced,
}

/// Error type for storyboard operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryboardError, StoryboardErrorKind};
///
/// let err = StoryboardError::new(StoryboardErrorKind::Busy);
/// assert!(format!("{}", err).contains("already being generated"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {} at line {} in {}", kind, line, file)]
pub struct StoryboardError {
    /// The specific error condition
    pub kind: StoryboardErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryboardError {
    /// Create a new StoryboardError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryboardErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
