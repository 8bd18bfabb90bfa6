//! Live tests against the Generative Language API.
//!
//! Run with `cargo test -p storyloom_models --features api` and
//! `GEMINI_API_KEY` set.

use anyhow::Result;
use storyloom_config::StoryloomConfig;
use storyloom_core::{AspectRatio, ImageQuality, StoryDuration};
use storyloom_interface::GenerationClient;
use storyloom_models::GeminiClient;

fn client() -> Result<GeminiClient> {
    dotenvy::dotenv().ok();
    Ok(GeminiClient::new()?)
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_describe_scenes_live() -> Result<()> {
    let client = client()?;

    let scenes = client
        .describe_scenes(
            "A lighthouse keeper befriends a whale",
            AspectRatio::Landscape,
            StoryDuration::Short,
            "watercolor",
        )
        .await?;

    assert!(!scenes.is_empty());
    assert!(scenes.iter().all(|scene| !scene.title.is_empty()));
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_render_image_live() -> Result<()> {
    let client = client()?;

    let image = client
        .render_image(
            "A lighthouse at dusk",
            AspectRatio::Square,
            ImageQuality::Draft,
            "watercolor",
        )
        .await?;

    assert!(image.is_image());
    assert!(!image.data().is_empty());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_invalid_key_is_rejected_live() -> Result<()> {
    let client = GeminiClient::with_api_key("not-a-real-key", StoryloomConfig::bundled()?)?;

    let err = client
        .start_video("A whale breaching", AspectRatio::Landscape, None)
        .await
        .unwrap_err();

    assert!(err.is_credential_rejected());
    Ok(())
}
