//! Request construction and response parsing for the Generative Language API.
//!
//! Everything here is pure so that it can be tested against recorded payloads.

use crate::gemini::dto::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    OperationResponse, Part, PredictImage, PredictInstance, PredictParameters, PredictRequest,
    PredictResponse,
};
use crate::gemini::GeminiResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use storyloom_core::{
    AspectRatio, ImageAsset, SceneDescription, StoryDuration, VideoOperation,
};
use storyloom_error::{GeminiError, GeminiErrorKind, is_credential_rejection};

/// Scene breakdown request with a JSON response schema of `[{title, description}]`.
pub fn scene_request(
    prompt: &str,
    aspect_ratio: AspectRatio,
    duration: StoryDuration,
    theme: &str,
) -> GenerateContentRequest {
    let instruction = format!(
        "Create a storyboard for the following story idea.\n\
         Story idea: {prompt}\n\
         Visual theme: {theme}\n\
         Frame aspect ratio: {aspect_ratio}\n\
         {band}\n\
         For each scene give a short title and a detailed visual description \
         suitable as an image-generation prompt.",
        band = duration.instruction(),
    );

    let schema = serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["title", "description"]
        }
    });

    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(instruction)])],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            response_modalities: None,
        }),
    }
}

/// Narrative request covering the scenes in order.
pub fn narrative_request(
    prompt: &str,
    scenes: &[SceneDescription],
    theme: &str,
) -> GenerateContentRequest {
    let outline = scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| format!("{}. {}: {}", i + 1, scene.title, scene.description))
        .collect::<Vec<_>>()
        .join("\n");

    let instruction = format!(
        "Write a short prose narrative for this story, in a voice that suits the theme.\n\
         Story idea: {prompt}\n\
         Theme: {theme}\n\
         Scenes:\n{outline}"
    );

    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(instruction)])],
        generation_config: None,
    }
}

/// Single-image `predict` request.
pub fn image_request(description: &str, aspect_ratio: AspectRatio, theme: &str) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: format!("{description}\n\nArt style: {theme}"),
            image: None,
        }],
        parameters: PredictParameters {
            aspect_ratio: aspect_ratio.to_string(),
            sample_count: Some(1),
        },
    }
}

/// Image edit request: the existing image followed by the instruction.
pub fn edit_request(image: &ImageAsset, instruction: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::inline(image.mime().clone(), image.to_base64()),
            Part::text(instruction),
        ])],
        generation_config: Some(GenerationConfig {
            response_mime_type: None,
            response_schema: None,
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
        }),
    }
}

/// Video render request. Only landscape and portrait framing are supported.
pub fn video_request(
    prompt: &str,
    aspect_ratio: AspectRatio,
    start_image: Option<&ImageAsset>,
) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: prompt.to_string(),
            image: start_image.map(|image| PredictImage {
                bytes_base64_encoded: image.to_base64(),
                mime_type: image.mime().clone(),
            }),
        }],
        parameters: PredictParameters {
            aspect_ratio: aspect_ratio.video_ratio().to_string(),
            sample_count: None,
        },
    }
}

/// Concatenated text of the first candidate.
///
/// # Errors
///
/// Returns `EmptyResponse` if the candidate carries no text.
pub fn response_text(response: &GenerateContentResponse) -> GeminiResult<String> {
    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(
            "response contained no text".to_string(),
        )));
    }
    Ok(text)
}

/// Scene descriptions from a JSON-mode response.
///
/// # Errors
///
/// Returns `MalformedResponse` if the text is not a JSON array of
/// `{title, description}`, or `EmptyResponse` if the array is empty.
pub fn parse_scenes(response: &GenerateContentResponse) -> GeminiResult<Vec<SceneDescription>> {
    let text = response_text(response)?;
    let scenes: Vec<SceneDescription> = serde_json::from_str(text.trim()).map_err(|e| {
        GeminiError::new(GeminiErrorKind::MalformedResponse(format!(
            "scene list is not valid JSON: {}",
            e
        )))
    })?;

    if scenes.is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(
            "no scenes were returned".to_string(),
        )));
    }
    Ok(scenes)
}

/// First image of a `predict` response.
///
/// # Errors
///
/// Returns `MissingImage` when no prediction carries bytes, or
/// `UnexpectedContentType` when the payload is not an image.
pub fn parse_prediction_image(response: &PredictResponse) -> GeminiResult<ImageAsset> {
    let prediction = response
        .predictions
        .iter()
        .find(|prediction| prediction.bytes_base64_encoded.is_some())
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingImage))?;

    let mime = prediction
        .mime_type
        .clone()
        .unwrap_or_else(|| "image/png".to_string());
    let encoded = prediction.bytes_base64_encoded.as_deref().unwrap_or_default();

    decode_image(&mime, encoded)
}

/// First inline image of a `generateContent` response.
///
/// # Errors
///
/// Returns `MissingImage` when no part carries inline data, or
/// `UnexpectedContentType` when that data is not an image.
pub fn parse_inline_image(response: &GenerateContentResponse) -> GeminiResult<ImageAsset> {
    let inline = response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| part.inline_data.as_ref())
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingImage))?;

    decode_image(&inline.mime_type, &inline.data)
}

fn decode_image(mime: &str, encoded: &str) -> GeminiResult<ImageAsset> {
    let data = STANDARD
        .decode(encoded)
        .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;

    let asset = ImageAsset::new(mime, data);
    if !asset.is_image() {
        return Err(GeminiError::new(GeminiErrorKind::UnexpectedContentType(
            mime.to_string(),
        )));
    }
    if asset.data().is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::MissingImage));
    }
    Ok(asset)
}

/// Operation handle from a start or poll response.
///
/// A finished operation with an error payload carries its message; one with
/// samples carries the first sample's URI.
pub fn parse_operation(response: &OperationResponse) -> VideoOperation {
    if !response.done {
        return VideoOperation::started(response.name.clone());
    }

    let error = response.error.as_ref().map(|status| {
        if status.message.is_empty() {
            format!("operation failed with code {}", status.code.unwrap_or_default())
        } else {
            status.message.clone()
        }
    });

    let video_uri = response
        .response
        .as_ref()
        .and_then(|result| result.generate_video_response.as_ref())
        .and_then(|video| video.generated_samples.first())
        .and_then(|sample| sample.video.as_ref())
        .and_then(|video| video.uri.clone());

    VideoOperation {
        name: response.name.clone(),
        done: true,
        video_uri,
        error,
    }
}

/// Error for a non-success HTTP response.
///
/// Client errors whose body says the key is invalid or unknown become
/// `CredentialRejected`; everything else keeps its status code.
pub fn http_error(status_code: u16, body: &str) -> GeminiError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    if matches!(status_code, 400 | 401 | 403 | 404) && is_credential_rejection(body) {
        return GeminiError::new(GeminiErrorKind::CredentialRejected(message));
    }

    GeminiError::new(GeminiErrorKind::HttpError {
        status_code,
        message,
    })
}
