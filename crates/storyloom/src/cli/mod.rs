//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyloom binary.

mod commands;
mod generate;
mod video;

pub use commands::{Cli, Commands};
pub use generate::{GenerateOptions, run_generate};
pub use video::{VideoOptions, run_video};
