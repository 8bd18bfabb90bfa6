//! Offline tests for GeminiClient construction.

use anyhow::Result;
use storyloom_config::StoryloomConfig;
use storyloom_core::ImageQuality;
use storyloom_error::{GeminiErrorKind, StoryloomErrorKind};
use storyloom_interface::GenerationClient;
use storyloom_models::GeminiClient;

#[test]
fn test_with_api_key_uses_configured_models() -> Result<()> {
    let config = StoryloomConfig::bundled()?;
    let expected_high = config.gemini.image_models.high.clone();

    let client = GeminiClient::with_api_key("test-key", config)?;

    assert_eq!(client.provider_name(), "gemini");
    assert_eq!(client.config().image_model(ImageQuality::High), expected_high);
    assert!(client.config().base_url.starts_with("https://"));
    Ok(())
}

#[test]
fn test_from_env_reads_key_per_request() -> Result<()> {
    let config = StoryloomConfig::bundled()?;
    let var = config.gemini.api_key_env.clone();

    let env_client = GeminiClient::from_env(config.clone())?;
    assert_eq!(env_client.api_key_env(), Some(var.as_str()));

    let fixed_client = GeminiClient::with_api_key("test-key", config)?;
    assert_eq!(fixed_client.api_key_env(), None);
    Ok(())
}

#[tokio::test]
async fn test_missing_env_key_fails_before_sending() -> Result<()> {
    let mut config = StoryloomConfig::bundled()?;
    config.gemini.api_key_env = "STORYLOOM_TEST_KEY_THAT_IS_NEVER_SET".to_string();
    // Nothing listens here; the request must not get that far
    config.gemini.base_url = "http://127.0.0.1:9".to_string();

    let client = GeminiClient::from_env(config)?;
    let err = client
        .compose_narrative("A lone hero", &[], "Fantasy Adventure")
        .await
        .expect_err("no key in the environment");

    match err.kind() {
        StoryloomErrorKind::Gemini(e) => assert_eq!(
            e.kind,
            GeminiErrorKind::MissingApiKey("STORYLOOM_TEST_KEY_THAT_IS_NEVER_SET".to_string())
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}
