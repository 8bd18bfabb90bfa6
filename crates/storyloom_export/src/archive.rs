//! ZIP archive of panel images.

use crate::{io_error, output_path, sanitize_filename};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use storyloom_core::SceneCollection;
use storyloom_error::{ExportError, ExportErrorKind, StoryloomResult};
use storyloom_interface::{ExportMeta, StoryboardExporter};
use tracing::{debug, info, instrument};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes every panel that holds an image into `{title}.zip`.
///
/// Entries are named `panel_{position}_{title}.{ext}` with a 1-based panel
/// position and the sanitized scene title. Panels without an image are
/// skipped; their positions are not reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExporter;

impl ArchiveExporter {
    /// Creates an archive exporter.
    pub fn new() -> Self {
        Self
    }

    /// Entry name for the panel at zero-based `index`.
    pub fn entry_name(index: usize, title: &str, extension: &str) -> String {
        format!(
            "panel_{}_{}.{}",
            index + 1,
            sanitize_filename(title),
            extension
        )
    }
}

impl StoryboardExporter for ArchiveExporter {
    #[instrument(
        skip(self, scenes, meta),
        fields(scene_count = scenes.len(), dir = %dir.display())
    )]
    fn export(
        &self,
        scenes: &SceneCollection,
        meta: &ExportMeta,
        dir: &Path,
    ) -> StoryloomResult<PathBuf> {
        if scenes.ready_count() == 0 {
            return Err(ExportError::new(ExportErrorKind::NoImages).into());
        }

        let path = output_path(dir, meta.title(), "zip");
        let file = File::create(&path).map_err(io_error)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let mut written = 0;
        for (index, scene) in scenes.iter().enumerate() {
            let Some(image) = scene.image_asset() else {
                debug!(scene_index = index, "Skipping panel without image");
                continue;
            };
            let name = Self::entry_name(index, scene.title(), image.extension());
            writer
                .start_file(name, options)
                .map_err(|e| ExportError::new(ExportErrorKind::Archive(e.to_string())))?;
            writer.write_all(image.data()).map_err(io_error)?;
            written += 1;
        }

        writer
            .finish()
            .map_err(|e| ExportError::new(ExportErrorKind::Archive(e.to_string())))?;

        info!(path = %path.display(), images = written, "Wrote storyboard archive");
        Ok(path)
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}
