//! Self-contained HTML storyboard document.

use crate::{io_error, output_path};
use std::path::{Path, PathBuf};
use storyloom_core::{SceneCollection, SceneRecord};
use storyloom_error::StoryloomResult;
use storyloom_interface::{ExportMeta, StoryboardExporter};
use tracing::{info, instrument};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;color:#222}\
.narrative{white-space:pre-wrap;line-height:1.5}\
.panel{page-break-inside:avoid;margin:2em 0}\
.panel img{max-width:100%}\
.missing{color:#888;font-style:italic}";

/// Writes a printable `{title}.html` holding the title, the narrative when
/// present, and every panel in order.
///
/// Images are embedded as `data:` URLs so the file stands alone. A panel with
/// no image gets a placeholder note in place of the picture.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl DocumentExporter {
    /// Creates a document exporter.
    pub fn new() -> Self {
        Self
    }

    /// Renders the storyboard as an HTML document.
    pub fn render(scenes: &SceneCollection, meta: &ExportMeta) -> String {
        let title = escape(meta.title());
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{title}</title>\n"));
        html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
        html.push_str(&format!("<h1>{title}</h1>\n"));

        if let Some(narrative) = meta.narrative().as_deref().filter(|n| !n.trim().is_empty()) {
            html.push_str(&format!(
                "<section class=\"narrative\">{}</section>\n",
                escape(narrative)
            ));
        }

        for (index, scene) in scenes.iter().enumerate() {
            html.push_str(&panel(index, scene));
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn panel(index: usize, scene: &SceneRecord) -> String {
    let title = escape(scene.title());
    let picture = match scene.image_asset() {
        Some(image) => format!("<img src=\"{}\" alt=\"{}\">", image.to_data_url(), title),
        None => "<p class=\"missing\">Image not available</p>".to_string(),
    };
    format!(
        "<div class=\"panel\">\n<h2>{}. {}</h2>\n{}\n<p>{}</p>\n</div>\n",
        index + 1,
        title,
        picture,
        escape(scene.description())
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl StoryboardExporter for DocumentExporter {
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
        let path = output_path(dir, meta.title(), "html");
        std::fs::write(&path, Self::render(scenes, meta)).map_err(io_error)?;
        info!(path = %path.display(), "Wrote storyboard document");
        Ok(path)
    }

    fn format_name(&self) -> &'static str {
        "html"
    }
}
