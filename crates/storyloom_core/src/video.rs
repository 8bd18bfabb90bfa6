//! Long-running video render handle.

use serde::{Deserialize, Serialize};

/// Handle to an out-of-process video render job.
///
/// Replaced wholesale by each status poll until `done` is true.
///
/// # Examples
///
/// ```
/// use storyloom_core::VideoOperation;
///
/// let op = VideoOperation::started("models/veo/operations/abc123");
/// assert!(!op.done);
///
/// let uri = Some("https://example.com/v.mp4".to_string());
/// let finished = VideoOperation::finished(&op, uri, None);
/// assert!(finished.done);
/// assert_eq!(finished.name, op.name);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Service-assigned operation name, used to poll
    pub name: String,
    /// True once the render has terminated
    pub done: bool,
    /// Location of the finished video, when present
    pub video_uri: Option<String>,
    /// Failure message carried by the operation, when present
    pub error: Option<String>,
}

impl VideoOperation {
    /// A freshly started, not yet finished operation.
    pub fn started(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            video_uri: None,
            error: None,
        }
    }

    /// A terminal copy of `op`.
    pub fn finished(op: &VideoOperation, video_uri: Option<String>, error: Option<String>) -> Self {
        Self {
            name: op.name.clone(),
            done: true,
            video_uri,
            error,
        }
    }
}
