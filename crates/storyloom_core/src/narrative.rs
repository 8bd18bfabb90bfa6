//! Prose narrative accompanying a storyboard.

use serde::{Deserialize, Serialize};

/// Narrative lifecycle, independent of the scene collection.
///
/// A failed narrative request degrades to fallback text and never invalidates
/// the storyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeResult {
    /// No narrative requested yet
    #[default]
    Empty,
    /// Narrative request in flight
    Pending,
    /// Narrative generated by the service
    Ready(String),
    /// Narrative request failed; fixed fallback text is shown instead
    Fallback {
        /// Fallback text
        text: String,
        /// Display-ready error from the failed request
        error: String,
    },
}

impl NarrativeResult {
    /// Displayable narrative text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            NarrativeResult::Ready(text) => Some(text),
            NarrativeResult::Fallback { text, .. } => Some(text),
            NarrativeResult::Empty | NarrativeResult::Pending => None,
        }
    }

    /// True while the narrative request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, NarrativeResult::Pending)
    }

    /// Error reported by a failed narrative request.
    pub fn error(&self) -> Option<&str> {
        match self {
            NarrativeResult::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }
}
