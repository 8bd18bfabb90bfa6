//! Error types for Storyloom.
//!
//! This crate provides the foundation error types used throughout the Storyloom workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{StoryboardError, StoryboardErrorKind, StoryloomResult};
//!
//! fn validate(prompt: &str) -> StoryloomResult<()> {
//!     if prompt.trim().is_empty() {
//!         Err(StoryboardError::new(StoryboardErrorKind::EmptyPrompt))?
//!     }
//!     Ok(())
//! }
//!
//! match validate("  ") {
//!     Ok(()) => println!("ok"),
//!     Err(e) => eprintln!("Error: {}", e.user_message()),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod credential;
mod error;
mod export;
mod gemini;
mod storyboard;
mod video;

pub use config::{ConfigError, ConfigErrorKind};
pub use credential::is_credential_rejection;
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use export::{ExportError, ExportErrorKind};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use storyboard::{StoryboardError, StoryboardErrorKind};
pub use video::{VideoError, VideoErrorKind};
