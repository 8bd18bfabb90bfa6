//! Video rendering command handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyloom::{
    AspectRatio, EnvCredentials, ExportError, ExportErrorKind, GeminiClient, ImageAsset,
    StoryloomConfig, StoryloomResult, VideoPhase, VideoSession, VideoTiming,
};
use tracing::{error, info, warn};

/// Inputs of a standalone video render.
#[derive(Debug, Clone)]
pub struct VideoOptions {
    /// What the video should show
    pub prompt: String,
    /// Video aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Optional start frame on disk
    pub image: Option<PathBuf>,
    /// Output file
    pub out: PathBuf,
}

/// Render a video and write it to `options.out`.
pub async fn run_video(options: VideoOptions) -> StoryloomResult<()> {
    let config = StoryloomConfig::load()?;
    let client = gemini_client(&config)?;

    let start_image = match &options.image {
        Some(path) => Some(read_image(path)?),
        None => None,
    };

    render_video(
        client,
        &config,
        &options.prompt,
        options.aspect_ratio,
        start_image,
        &options.out,
    )
    .await
}

/// Client that reads the configured key variable on every request, so a
/// key re-selected through [`EnvCredentials`] takes effect immediately.
pub(crate) fn gemini_client(config: &StoryloomConfig) -> StoryloomResult<Arc<GeminiClient>> {
    Ok(Arc::new(GeminiClient::from_env(config.clone())?))
}

/// Run one video session to completion and save the result.
///
/// Status messages are logged while the render runs. A failed render is
/// logged and reported as success of the command; only local I/O errors
/// propagate.
pub(crate) async fn render_video(
    client: Arc<GeminiClient>,
    config: &StoryloomConfig,
    prompt: &str,
    aspect_ratio: AspectRatio,
    start_image: Option<ImageAsset>,
    out: &Path,
) -> StoryloomResult<()> {
    let credentials = Arc::new(EnvCredentials::new(config.gemini.api_key_env.clone()));
    let session = VideoSession::new(client, credentials, VideoTiming::from(&config.video));

    let mut phases = session.subscribe();
    let status_log = tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            if let VideoPhase::Generating { status_message } = &*phases.borrow_and_update() {
                info!(status = %status_message, "Rendering video");
            }
        }
    });

    session.start(prompt, aspect_ratio, start_image).await?;
    let outcome = session.wait_until_settled().await;
    status_log.abort();

    match outcome {
        VideoPhase::Succeeded { asset, uri } => {
            std::fs::write(out, asset.data())
                .map_err(|e| ExportError::new(ExportErrorKind::Io(e.to_string())))?;
            info!(path = %out.display(), %uri, "Video saved");
        }
        VideoPhase::Failed { message } => {
            if !session.credential_selected() {
                warn!("Credential was rejected; check the API key before retrying");
            }
            error!(%message, "Video generation failed");
        }
        VideoPhase::Idle | VideoPhase::Generating { .. } => {
            warn!("Video session ended without a result");
        }
    }

    session.close();
    Ok(())
}

fn read_image(path: &Path) -> StoryloomResult<ImageAsset> {
    let data =
        std::fs::read(path).map_err(|e| ExportError::new(ExportErrorKind::Io(e.to_string())))?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    };
    Ok(ImageAsset::new(mime, data))
}
