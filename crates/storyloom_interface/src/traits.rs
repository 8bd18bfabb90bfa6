//! Trait definitions for generation backends and their collaborators.

use crate::ExportMeta;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use storyloom_core::{
    AspectRatio, ImageAsset, ImageQuality, SceneCollection, SceneDescription, StoryDuration,
    VideoAsset, VideoOperation,
};
use storyloom_error::StoryloomResult;

/// Core trait that every generative backend implements.
///
/// Each method is one request/response exchange. Implementations must not
/// hold state that ties one call to the next; sequencing is the caller's job.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Break a story into titled scene descriptions.
    ///
    /// The number of scenes is decided by the service, guided by the
    /// duration's band.
    ///
    /// # Errors
    ///
    /// Fails if the response is malformed or holds no scenes.
    async fn describe_scenes(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        duration: StoryDuration,
        theme: &str,
    ) -> StoryloomResult<Vec<SceneDescription>>;

    /// Render one panel image from its description.
    ///
    /// # Errors
    ///
    /// Fails if the response carries no image payload or a non-image type.
    async fn render_image(
        &self,
        description: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
        theme: &str,
    ) -> StoryloomResult<ImageAsset>;

    /// Apply a free-text instruction to an existing image.
    async fn edit_image(&self, image: &ImageAsset, instruction: &str)
    -> StoryloomResult<ImageAsset>;

    /// Write a prose narrative covering the given scenes.
    async fn compose_narrative(
        &self,
        prompt: &str,
        scenes: &[SceneDescription],
        theme: &str,
    ) -> StoryloomResult<String>;

    /// Submit a video render job.
    ///
    /// # Errors
    ///
    /// Fails with a credential-rejected error when the service reports the
    /// caller's key invalid or not found.
    async fn start_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        start_image: Option<&ImageAsset>,
    ) -> StoryloomResult<VideoOperation>;

    /// Fetch the latest status of a render job.
    async fn poll_video(&self, operation: &VideoOperation) -> StoryloomResult<VideoOperation>;

    /// Download a finished video.
    ///
    /// The caller's credential is attached to the request.
    async fn fetch_video(&self, uri: &str) -> StoryloomResult<VideoAsset>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// Source of the credential used for paid operations.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// True if a credential is currently available.
    async fn has_credential(&self) -> bool;

    /// Ask for a credential to be selected.
    ///
    /// # Errors
    ///
    /// Fails if no credential could be obtained.
    async fn select_credential(&self) -> StoryloomResult<()>;
}

/// Writes a storyboard to some output format.
pub trait StoryboardExporter {
    /// Write `scenes` into `dir`, returning the path of the created file.
    fn export(
        &self,
        scenes: &SceneCollection,
        meta: &ExportMeta,
        dir: &Path,
    ) -> StoryloomResult<PathBuf>;

    /// Short format name for logs (e.g., "zip").
    fn format_name(&self) -> &'static str;
}
