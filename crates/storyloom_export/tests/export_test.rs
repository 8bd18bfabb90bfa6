//! Tests for the storyboard exporters.

use std::fs::File;
use storyloom_core::{ImageAsset, ImageState, SceneCollection, SceneDescription, SceneRecord};
use storyloom_error::{ExportErrorKind, StoryloomErrorKind};
use storyloom_export::{ArchiveExporter, DocumentExporter, sanitize_filename};
use storyloom_interface::{ExportMeta, StoryboardExporter};

fn record(title: &str, description: &str, image: ImageState) -> SceneRecord {
    SceneRecord::placeholder(&SceneDescription::new(title, description)).with_image(image)
}

fn png(bytes: &[u8]) -> ImageState {
    ImageState::Ready(ImageAsset::new("image/png", bytes.to_vec()))
}

fn three_panels() -> SceneCollection {
    SceneCollection::new(vec![
        record("The Arrival", "A hero at the gate", png(b"first")),
        record("Storm!", "Lightning over the keep", ImageState::Failed),
        record("Dawn", "Sun over the valley", png(b"third")),
    ])
}

#[test]
fn test_sanitize_collapses_runs() {
    assert_eq!(sanitize_filename("A Lone Hero! (v2)"), "a_lone_hero_v2_");
    assert_eq!(sanitize_filename("already_clean_9"), "already_clean_9");
    assert_eq!(sanitize_filename("   "), "_");
}

#[test]
fn test_sanitize_truncates() {
    let long = "x".repeat(80);
    assert_eq!(sanitize_filename(&long).len(), 50);
}

#[test]
fn test_sanitize_drops_non_ascii() {
    assert_eq!(sanitize_filename("Café Noir"), "caf_noir");
}

#[test]
fn test_archive_entries_skip_missing_images() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let meta = ExportMeta::new("A Lone Hero! (v2)", None);

    let path = ArchiveExporter::new().export(&three_panels(), &meta, dir.path())?;
    assert_eq!(path, dir.path().join("a_lone_hero_v2_.zip"));

    let mut archive = zip::ZipArchive::new(File::open(&path)?)?;
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["panel_1_the_arrival.png", "panel_3_dawn.png"]);

    let mut entry = archive.by_name("panel_3_dawn.png")?;
    let mut contents = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut contents)?;
    assert_eq!(contents, b"third");
    Ok(())
}

#[test]
fn test_archive_without_images_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let scenes = SceneCollection::new(vec![
        record("One", "first", ImageState::Failed),
        record("Two", "second", ImageState::Pending),
    ]);

    let err = ArchiveExporter::new()
        .export(&scenes, &ExportMeta::new("Empty", None), dir.path())
        .expect_err("no images to archive");
    match err.kind() {
        StoryloomErrorKind::Export(e) => assert_eq!(e.kind, ExportErrorKind::NoImages),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("empty.zip").exists());
    Ok(())
}

#[test]
fn test_blank_title_uses_default_name() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = DocumentExporter::new().export(&three_panels(), &ExportMeta::default(), dir.path())?;
    assert_eq!(path, dir.path().join("storyboard.html"));
    Ok(())
}

#[test]
fn test_document_lists_panels_in_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let meta = ExportMeta::new(
        "Knights & <Dragons>",
        Some("Long ago, a knight set out.".to_string()),
    );

    let path = DocumentExporter::new().export(&three_panels(), &meta, dir.path())?;
    assert_eq!(path, dir.path().join("knights_dragons_.html"));

    let html = std::fs::read_to_string(&path)?;
    assert!(html.contains("<h1>Knights &amp; &lt;Dragons&gt;</h1>"));
    assert!(html.contains("Long ago, a knight set out."));

    let arrival = html.find("1. The Arrival").expect("first panel");
    let storm = html.find("2. Storm!").expect("second panel");
    let dawn = html.find("3. Dawn").expect("third panel");
    assert!(arrival < storm && storm < dawn);

    assert_eq!(html.matches("data:image/png;base64,").count(), 2);
    assert_eq!(html.matches("Image not available").count(), 1);
    Ok(())
}

#[test]
fn test_document_omits_empty_narrative() {
    let meta = ExportMeta::new("Quiet", Some("   ".to_string()));
    let html = DocumentExporter::render(&three_panels(), &meta);
    assert!(!html.contains("class=\"narrative\""));
}
