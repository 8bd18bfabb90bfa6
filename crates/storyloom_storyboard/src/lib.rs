//! Storyboard workflow for Storyloom.
//!
//! Two state machines live here:
//!
//! - [`StoryboardOrchestrator`] turns a story idea into scene descriptions,
//!   then renders a narrative and one image per scene. Images are requested
//!   strictly in panel order, one at a time, and every result is published
//!   before the next request goes out.
//! - [`VideoSession`] drives one long-running video render: start, poll
//!   until done, download. A rotating status message is published while the
//!   render runs.
//!
//! Both publish read-only snapshots through `tokio::sync::watch` channels so a
//! presentation layer can observe progress without touching the workflow.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod orchestrator;
mod video;

pub use orchestrator::{
    BusyGuard, RunContext, StoryboardOrchestrator, StoryboardRun, StoryboardState,
};
pub use video::{VideoPhase, VideoSession, VideoTiming};
