//! Scene descriptions and per-panel records.

use crate::ImageAsset;
use serde::{Deserialize, Serialize};

/// A title and long description pair, as returned by scene generation.
///
/// The description doubles as the image-generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Short panel label
    pub title: String,
    /// Long description, fed to image generation
    pub description: String,
}

impl SceneDescription {
    /// Creates a description pair.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Image lifecycle of one panel.
///
/// Exactly one condition holds at a time: a request is in flight, an image is
/// held, or the most recent request failed with no image held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageState {
    /// An image request for this scene is in flight
    Pending,
    /// The scene holds an image
    Ready(ImageAsset),
    /// The most recent request failed; retryable
    Failed,
}

/// One storyboard panel.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ImageAsset, ImageState, SceneDescription, SceneRecord};
///
/// let scene = SceneDescription::new("Arrival", "A hero at the gate");
/// let placeholder = SceneRecord::placeholder(&scene);
/// assert!(placeholder.image_pending());
/// assert!(placeholder.image_asset().is_none());
///
/// let done = placeholder.with_image(ImageState::Ready(ImageAsset::new("image/png", vec![1])));
/// assert!(!done.image_pending());
/// assert!(done.image_asset().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SceneRecord {
    /// Short panel label
    title: String,
    /// Long description, used as display text and image prompt
    description: String,
    /// Image lifecycle
    image: ImageState,
}

impl SceneRecord {
    /// Creates a placeholder record with an image request pending.
    pub fn placeholder(scene: &SceneDescription) -> Self {
        Self {
            title: scene.title.clone(),
            description: scene.description.clone(),
            image: ImageState::Pending,
        }
    }

    /// Returns a copy of this record with its image state replaced.
    pub fn with_image(&self, image: ImageState) -> Self {
        Self {
            title: self.title.clone(),
            description: self.description.clone(),
            image,
        }
    }

    /// The held image, if any.
    pub fn image_asset(&self) -> Option<&ImageAsset> {
        match &self.image {
            ImageState::Ready(asset) => Some(asset),
            _ => None,
        }
    }

    /// True while an image request for this scene is in flight.
    pub fn image_pending(&self) -> bool {
        matches!(self.image, ImageState::Pending)
    }

    /// True if the most recent image request failed.
    pub fn image_failed(&self) -> bool {
        matches!(self.image, ImageState::Failed)
    }

    /// The title/description pair this record was created from.
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription::new(self.title.clone(), self.description.clone())
    }
}
