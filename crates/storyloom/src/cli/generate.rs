//! Storyboard generation command handler.

use super::video::{gemini_client, render_video};
use std::path::PathBuf;
use storyloom::{
    ArchiveExporter, AspectRatio, DocumentExporter, ExportError, ExportErrorKind, ExportMeta,
    GenerationSettings, ImageQuality, StoryDuration, StoryboardExporter, StoryboardOrchestrator,
    StoryboardState, StoryloomConfig, StoryloomResult,
};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Inputs of a storyboard run and the outputs to produce.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// The story idea
    pub prompt: String,
    /// Art style
    pub theme: String,
    /// Story length tier
    pub duration: StoryDuration,
    /// Panel aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Image quality tier
    pub quality: ImageQuality,
    /// Output directory
    pub out: PathBuf,
    /// Write a ZIP archive
    pub archive: bool,
    /// Write an HTML document
    pub document: bool,
    /// Render a video of the story
    pub video: bool,
}

/// Generate a storyboard and write everything requested into `options.out`.
#[instrument(skip_all, fields(out = %options.out.display()))]
pub async fn run_generate(options: GenerateOptions) -> StoryloomResult<()> {
    let config = StoryloomConfig::load()?;
    let client = gemini_client(&config)?;
    let orchestrator = StoryboardOrchestrator::from_config(client.clone(), &config);

    let progress = tokio::spawn(log_progress(orchestrator.subscribe()));

    let settings =
        GenerationSettings::new(options.aspect_ratio, options.quality, options.duration);

    let run = orchestrator
        .generate_storyboard(&options.prompt, &options.theme, settings)
        .await;
    progress.abort();
    let run = run?;

    std::fs::create_dir_all(&options.out).map_err(io_error)?;

    let narrative = run.narrative().text().map(str::to_string);
    if let Some(error) = run.narrative().error() {
        warn!(%error, "Narrative generation failed; writing fallback text");
    }
    if let Some(text) = &narrative {
        std::fs::write(options.out.join("narrative.txt"), text).map_err(io_error)?;
    }

    for (index, scene) in run.scenes().iter().enumerate() {
        match scene.image_asset() {
            Some(image) => {
                let name = ArchiveExporter::entry_name(index, scene.title(), image.extension());
                std::fs::write(options.out.join(name), image.data()).map_err(io_error)?;
            }
            None => warn!(scene_index = index, title = %scene.title(), "Panel has no image"),
        }
    }

    let meta = ExportMeta::new(options.prompt.clone(), narrative.clone());
    let mut exporters: Vec<Box<dyn StoryboardExporter>> = Vec::new();
    if options.archive {
        exporters.push(Box::new(ArchiveExporter::new()));
    }
    if options.document {
        exporters.push(Box::new(DocumentExporter::new()));
    }
    for exporter in exporters {
        match exporter.export(run.scenes(), &meta, &options.out) {
            Ok(path) => {
                info!(format = exporter.format_name(), path = %path.display(), "Exported")
            }
            Err(e) => {
                warn!(
                    format = exporter.format_name(),
                    error = %e.user_message(),
                    "Export skipped"
                )
            }
        }
    }

    if options.video {
        let story = narrative.unwrap_or_else(|| options.prompt.clone());
        let start_image = run
            .scenes()
            .get(0)
            .and_then(|scene| scene.image_asset())
            .cloned();
        render_video(
            client,
            &config,
            &story,
            options.aspect_ratio,
            start_image,
            &options.out.join("storyboard.mp4"),
        )
        .await?;
    }

    info!(
        ready = run.scenes().ready_count(),
        failed = run.scenes().failed_count(),
        "Storyboard written"
    );
    Ok(())
}

/// Log each panel as its image settles, and the narrative once it lands.
async fn log_progress(mut state: watch::Receiver<StoryboardState>) {
    let mut reported = 0;
    let mut narrated = false;
    while state.changed().await.is_ok() {
        let snapshot = state.borrow_and_update().clone();

        // Images settle in panel order, so the settled panels form a prefix.
        let settled = snapshot
            .scenes()
            .iter()
            .take_while(|scene| !scene.image_pending())
            .count();
        for (index, scene) in snapshot.scenes().iter().enumerate().take(settled).skip(reported) {
            if scene.image_failed() {
                warn!(scene_index = index, title = %scene.title(), "Panel failed");
            } else {
                info!(scene_index = index, title = %scene.title(), "Panel ready");
            }
        }
        reported = reported.max(settled);

        if !narrated {
            if let Some(text) = snapshot.narrative().text() {
                info!(chars = text.len(), "Narrative ready");
                narrated = true;
            }
        }
    }
}

fn io_error(e: std::io::Error) -> ExportError {
    ExportError::new(ExportErrorKind::Io(e.to_string()))
}
