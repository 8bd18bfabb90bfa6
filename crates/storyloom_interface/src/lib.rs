//! Trait definitions for Storyloom.
//!
//! This crate provides the seams between the workflow and its collaborators:
//! the generative service, the credential source, and the exporters.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{CredentialProvider, GenerationClient, StoryboardExporter};
pub use types::{ExportMeta, ExportMetaBuilder};
