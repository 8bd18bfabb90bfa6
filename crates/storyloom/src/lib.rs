//! Storyloom - illustrated storyboards from a single story idea.
//!
//! Storyloom turns a story idea and an art theme into a multi-panel
//! storyboard, a prose narrative, and optionally a short video. The heavy
//! lifting happens in Google's generative models; Storyloom sequences the
//! requests, tracks per-panel state, and exports the results.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storyloom::{GeminiClient, GenerationSettings, StoryboardOrchestrator, StoryloomConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryloomConfig::load()?;
//!     let client = Arc::new(GeminiClient::new()?);
//!     let orchestrator = StoryboardOrchestrator::from_config(client, &config);
//!
//!     let run = orchestrator
//!         .generate_storyboard("A lone hero", "watercolor", GenerationSettings::default())
//!         .await?;
//!     println!("{} panels", run.scenes().len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyloom_error` - Error types
//! - `storyloom_core` - Settings, scenes, media assets
//! - `storyloom_config` - Layered TOML configuration
//! - `storyloom_interface` - Client, credential and exporter traits
//! - `storyloom_models` - Gemini REST client
//! - `storyloom_storyboard` - Storyboard orchestrator and video session
//! - `storyloom_export` - ZIP and HTML exporters
//!
//! This crate re-exports everything for convenience and ships the
//! `storyloom` command-line tool.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;

pub use credentials::EnvCredentials;

pub use storyloom_config::*;
pub use storyloom_core::*;
pub use storyloom_error::*;
pub use storyloom_export::*;
pub use storyloom_interface::*;
pub use storyloom_models::{GeminiClient, GeminiResult};
pub use storyloom_storyboard::*;
