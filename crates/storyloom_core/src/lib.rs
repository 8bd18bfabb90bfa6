//! Core data types for Storyloom.
//!
//! This crate provides the data model shared by the orchestrator, the
//! generation clients, and the exporters: generation settings, scene records
//! and their ordered collection, media assets, the narrative result, and the
//! long-running video operation handle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod media;
mod narrative;
mod scene;
mod settings;
mod video;

pub use collection::SceneCollection;
pub use media::{ImageAsset, VideoAsset};
pub use narrative::NarrativeResult;
pub use scene::{ImageState, SceneDescription, SceneRecord};
pub use settings::{
    AspectRatio, GenerationSettings, GenerationSettingsBuilder, ImageQuality, StoryDuration,
};
pub use video::VideoOperation;
