//! Tests for Gemini request construction and response parsing.

use anyhow::Result;
use storyloom_core::{AspectRatio, ImageAsset, StoryDuration};
use storyloom_error::{GeminiErrorKind, RetryableError};
use storyloom_models::{
    GenerateContentResponse, OperationResponse, PredictResponse, conversions,
};

#[test]
fn test_parse_scenes_from_json_mode_response() -> Result<()> {
    let scenes_text = serde_json::json!([
        {"title": "Arrival", "description": "A hero reaches the gate"},
        {"title": "Duel", "description": "Swords cross at dusk"}
    ])
    .to_string();
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": scenes_text}]
            },
            "finishReason": "STOP"
        }]
    });
    let response: GenerateContentResponse = serde_json::from_value(body)?;

    let scenes = conversions::parse_scenes(&response)?;

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].title, "Arrival");
    assert_eq!(scenes[1].description, "Swords cross at dusk");
    Ok(())
}

#[test]
fn test_parse_scenes_rejects_malformed_text() -> Result<()> {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"Here are your scenes!"}]}}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let err = conversions::parse_scenes(&response).unwrap_err();
    assert!(matches!(err.kind, GeminiErrorKind::MalformedResponse(_)));
    Ok(())
}

#[test]
fn test_parse_scenes_rejects_empty_list() -> Result<()> {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"[]"}]}}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let err = conversions::parse_scenes(&response).unwrap_err();
    assert!(matches!(err.kind, GeminiErrorKind::EmptyResponse(_)));
    Ok(())
}

#[test]
fn test_response_text_without_candidates_is_empty() -> Result<()> {
    let response: GenerateContentResponse = serde_json::from_str("{}")?;

    let err = conversions::response_text(&response).unwrap_err();
    assert!(matches!(err.kind, GeminiErrorKind::EmptyResponse(_)));
    Ok(())
}

#[test]
fn test_parse_prediction_image() -> Result<()> {
    // "iVBORw==" decodes to the PNG magic prefix
    let body = r#"{"predictions":[{"bytesBase64Encoded":"iVBORw==","mimeType":"image/png"}]}"#;
    let response: PredictResponse = serde_json::from_str(body)?;

    let image = conversions::parse_prediction_image(&response)?;
    assert_eq!(image.mime(), "image/png");
    assert_eq!(image.data(), &vec![0x89, 0x50, 0x4E, 0x47]);
    Ok(())
}

#[test]
fn test_prediction_without_bytes_is_missing_image() -> Result<()> {
    let body = r#"{"predictions":[{"raiFilteredReason":"blocked"}]}"#;
    let response: PredictResponse = serde_json::from_str(body)?;

    let err = conversions::parse_prediction_image(&response).unwrap_err();
    assert_eq!(err.kind, GeminiErrorKind::MissingImage);
    Ok(())
}

#[test]
fn test_inline_non_image_is_rejected() -> Result<()> {
    let body = r#"{"candidates":[{"content":{"parts":[
        {"text":"Sure, here it is"},
        {"inlineData":{"mimeType":"text/plain","data":"aGVsbG8="}}
    ]}}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let err = conversions::parse_inline_image(&response).unwrap_err();
    assert_eq!(
        err.kind,
        GeminiErrorKind::UnexpectedContentType("text/plain".to_string())
    );
    Ok(())
}

#[test]
fn test_inline_image_skips_text_parts() -> Result<()> {
    let body = r#"{"candidates":[{"content":{"parts":[
        {"text":"Edited."},
        {"inlineData":{"mimeType":"image/jpeg","data":"/9j/"}}
    ]}}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let image = conversions::parse_inline_image(&response)?;
    assert_eq!(image.extension(), "jpg");
    Ok(())
}

#[test]
fn test_running_operation() -> Result<()> {
    let body = r#"{"name":"models/veo-3.0-fast-generate-001/operations/abc"}"#;
    let response: OperationResponse = serde_json::from_str(body)?;

    let op = conversions::parse_operation(&response);
    assert!(!op.done);
    assert_eq!(op.name, "models/veo-3.0-fast-generate-001/operations/abc");
    assert!(op.video_uri.is_none());
    Ok(())
}

#[test]
fn test_finished_operation_with_video() -> Result<()> {
    let body = r#"{
        "name": "operations/abc",
        "done": true,
        "response": {
            "generateVideoResponse": {
                "generatedSamples": [{"video": {"uri": "https://example.com/files/v1:download"}}]
            }
        }
    }"#;
    let response: OperationResponse = serde_json::from_str(body)?;

    let op = conversions::parse_operation(&response);
    assert!(op.done);
    assert_eq!(
        op.video_uri.as_deref(),
        Some("https://example.com/files/v1:download")
    );
    assert!(op.error.is_none());
    Ok(())
}

#[test]
fn test_finished_operation_with_error() -> Result<()> {
    let body = r#"{
        "name": "operations/abc",
        "done": true,
        "error": {"code": 3, "message": "Prompt was blocked"}
    }"#;
    let response: OperationResponse = serde_json::from_str(body)?;

    let op = conversions::parse_operation(&response);
    assert!(op.done);
    assert!(op.video_uri.is_none());
    assert_eq!(op.error.as_deref(), Some("Prompt was blocked"));
    Ok(())
}

#[test]
fn test_finished_operation_without_samples() -> Result<()> {
    let body = r#"{"name":"operations/abc","done":true,"response":{"generateVideoResponse":{}}}"#;
    let response: OperationResponse = serde_json::from_str(body)?;

    let op = conversions::parse_operation(&response);
    assert!(op.done);
    assert!(op.video_uri.is_none());
    assert!(op.error.is_none());
    Ok(())
}

#[test]
fn test_invalid_key_maps_to_credential_rejected() {
    let body = r#"{"error": {
        "code": 400,
        "message": "API key not valid. Please pass a valid API key.",
        "status": "INVALID_ARGUMENT",
        "details": [{"reason": "API_KEY_INVALID"}]
    }}"#;

    let err = conversions::http_error(400, body);
    assert!(matches!(err.kind, GeminiErrorKind::CredentialRejected(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_unknown_entity_maps_to_credential_rejected() {
    let body = r#"{"error": {
        "code": 404,
        "message": "Requested entity was not found.",
        "status": "NOT_FOUND"
    }}"#;

    let err = conversions::http_error(404, body);
    assert_eq!(
        err.kind,
        GeminiErrorKind::CredentialRejected("Requested entity was not found.".to_string())
    );
}

#[test]
fn test_server_errors_are_retryable() {
    let body = r#"{"error": {
        "code": 503,
        "message": "The model is overloaded.",
        "status": "UNAVAILABLE"
    }}"#;

    let err = conversions::http_error(503, body);
    assert_eq!(
        err.kind,
        GeminiErrorKind::HttpError {
            status_code: 503,
            message: "The model is overloaded.".to_string()
        }
    );
    assert!(err.is_retryable());
    assert_eq!(err.retry_strategy_params(), (2000, 5, 60));
}

#[test]
fn test_plain_text_error_body() {
    let err = conversions::http_error(429, "Too many requests\n");
    assert!(err.is_retryable());
    assert!(format!("{}", err).contains("Too many requests"));
}

#[test]
fn test_bad_request_is_permanent() {
    let err = conversions::http_error(400, r#"{"error":{"message":"Invalid aspect ratio"}}"#);
    assert!(!err.is_retryable());
}

#[test]
fn test_video_request_uses_supported_ratio_and_start_image() -> Result<()> {
    let image = ImageAsset::new("image/png", vec![1, 2, 3]);
    let request =
        conversions::video_request("A hero rides away", AspectRatio::Square, Some(&image));

    let json = serde_json::to_value(&request)?;
    assert_eq!(json["parameters"]["aspectRatio"], "16:9");
    assert_eq!(json["instances"][0]["image"]["mimeType"], "image/png");
    assert_eq!(json["instances"][0]["image"]["bytesBase64Encoded"], "AQID");
    Ok(())
}

#[test]
fn test_scene_request_asks_for_json() -> Result<()> {
    let request = conversions::scene_request(
        "A lone hero",
        AspectRatio::Portrait,
        StoryDuration::Medium,
        "ink wash",
    );

    let json = serde_json::to_value(&request)?;
    assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
    let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    assert!(text.contains("A lone hero"));
    assert!(text.contains("12 to 16"));
    Ok(())
}

#[test]
fn test_image_request_carries_one_sample() -> Result<()> {
    let request = conversions::image_request("A castle", AspectRatio::Classic, "pixel art");

    let json = serde_json::to_value(&request)?;
    assert_eq!(json["parameters"]["aspectRatio"], "4:3");
    assert_eq!(json["parameters"]["sampleCount"], 1);
    Ok(())
}
