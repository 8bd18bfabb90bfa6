//! Configuration for Storyloom.
//!
//! Settings are loaded from TOML with a precedence system:
//! - Bundled defaults (include_str! from storyloom.toml)
//! - User overrides (~/.config/storyloom/storyloom.toml, then ./storyloom.toml)
//!
//! User values take precedence over bundled ones, key by key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{
    GeminiConfig, ImageModels, NarrativeConfig, RetryConfig, StoryloomConfig, VideoConfig,
};
