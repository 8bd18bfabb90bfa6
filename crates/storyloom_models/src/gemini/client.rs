//! Generative Language API client.

use crate::gemini::conversions;
use crate::gemini::dto::{
    GenerateContentRequest, GenerateContentResponse, OperationResponse, PredictRequest,
    PredictResponse,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use storyloom_config::{GeminiConfig, RetryConfig, StoryloomConfig};
use storyloom_core::{
    AspectRatio, ImageAsset, ImageQuality, SceneDescription, StoryDuration, VideoAsset,
    VideoOperation,
};
use storyloom_error::{GeminiError, GeminiErrorKind, RetryableError, StoryloomResult};
use storyloom_interface::GenerationClient;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Result type for Gemini API calls.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Client for the Generative Language REST API.
///
/// Covers every service call a storyboard needs: scene breakdown and
/// narrative (Gemini), panel images (Imagen), image edits (Gemini image
/// model) and video renders (Veo).
///
/// Transient failures (408, 429, 5xx, transport errors) are retried with
/// exponential backoff and jitter, using a strategy chosen from the first
/// error and optionally overridden by `[retry]` configuration.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: ApiKey,
    config: GeminiConfig,
    retry: RetryConfig,
}

/// Where each request takes its API key from.
#[derive(Debug, Clone)]
enum ApiKey {
    /// Key fixed at construction
    Fixed(String),
    /// Key re-read from this environment variable on every request
    Env(String),
}

impl ApiKey {
    fn resolve(&self) -> GeminiResult<String> {
        match self {
            ApiKey::Fixed(key) => Ok(key.clone()),
            ApiKey::Env(var) => std::env::var(var)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey(var.clone()))),
        }
    }
}

impl GeminiClient {
    /// Creates a client from layered configuration and the API key found in
    /// the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration fails to load
    /// - The API key environment variable is not set
    /// - The HTTP client cannot be initialized
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> StoryloomResult<Self> {
        let client = Self::from_env(StoryloomConfig::load()?)?;
        client.api_key.resolve()?;
        Ok(client)
    }

    /// Creates a client that reads its API key from the configured
    /// environment variable at request time.
    ///
    /// A key replaced in the environment after construction is used from the
    /// next request on. A missing key fails each request with
    /// `MissingApiKey` before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(name = "gemini_client_from_env", skip_all)]
    pub fn from_env(config: StoryloomConfig) -> StoryloomResult<Self> {
        let var = config.gemini.api_key_env.clone();
        Self::build(ApiKey::Env(var), config)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(name = "gemini_client_with_api_key", skip_all)]
    pub fn with_api_key(
        api_key: impl Into<String>,
        config: StoryloomConfig,
    ) -> StoryloomResult<Self> {
        Self::build(ApiKey::Fixed(api_key.into()), config)
    }

    fn build(api_key: ApiKey, config: StoryloomConfig) -> StoryloomResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key,
            config: config.gemini,
            retry: config.retry,
        })
    }

    /// Environment variable the key is read from, if the key is not fixed.
    pub fn api_key_env(&self) -> Option<&str> {
        match &self.api_key {
            ApiKey::Env(var) => Some(var),
            ApiKey::Fixed(_) => None,
        }
    }

    /// Endpoint and model settings in use.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    /// Run `attempt`, retrying transient failures.
    ///
    /// The first failure picks the backoff strategy; config overrides win.
    async fn with_retry<T, F, Fut>(&self, operation: &str, mut attempt: F) -> GeminiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GeminiResult<T>>,
    {
        let first = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !self.retry.enabled || !first.is_retryable() {
            return Err(first);
        }

        let (mut initial_ms, mut max_retries, mut max_delay_secs) = first.retry_strategy_params();
        if let Some(override_backoff) = self.retry.initial_backoff_ms {
            initial_ms = override_backoff;
        }
        if let Some(override_retries) = self.retry.max_retries {
            max_retries = override_retries;
        }
        if let Some(override_delay) = self.retry.max_delay_secs {
            max_delay_secs = override_delay;
        }

        info!(
            error = %first,
            operation,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Gemini request failed, will retry with configured strategy"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        Retry::spawn(strategy, || {
            let fut = attempt();
            async move {
                match fut.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Gemini request failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent Gemini error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> GeminiResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url = %url, "Sending Gemini API request");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.resolve()?)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Self::decode(response).await
    }

    async fn get_json<R>(&self, url: &str) -> GeminiResult<R>
    where
        R: DeserializeOwned,
    {
        debug!(url = %url, "Polling Gemini API");
        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", self.api_key.resolve()?)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Self::decode(response).await
    }

    async fn decode<R>(response: Response) -> GeminiResult<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(conversions::http_error(status.as_u16(), &body));
        }

        response.json::<R>().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::MalformedResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.model_url(model, "generateContent");
        self.with_retry("generateContent", || self.post_json(&url, request))
            .await
    }

    async fn download(&self, uri: &str) -> GeminiResult<VideoAsset> {
        let api_key = self.api_key.resolve()?;
        let response = self
            .client
            .get(uri)
            .query(&[("key", api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(conversions::http_error(status.as_u16(), &body));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("video/"))
            .unwrap_or_else(|| "video/mp4".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Ok(VideoAsset::new(mime, bytes.to_vec()))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    #[instrument(skip(self, prompt, theme), fields(model = %self.config.text_model))]
    async fn describe_scenes(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        duration: StoryDuration,
        theme: &str,
    ) -> StoryloomResult<Vec<SceneDescription>> {
        let request = conversions::scene_request(prompt, aspect_ratio, duration, theme);
        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        let scenes = conversions::parse_scenes(&response)?;
        debug!(scene_count = scenes.len(), "Parsed scene descriptions");
        Ok(scenes)
    }

    #[instrument(skip(self, description, theme), fields(model = %self.config.image_model(quality)))]
    async fn render_image(
        &self,
        description: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
        theme: &str,
    ) -> StoryloomResult<ImageAsset> {
        let request = conversions::image_request(description, aspect_ratio, theme);
        let url = self.model_url(self.config.image_model(quality), "predict");
        let response: PredictResponse = self
            .with_retry("predict", || self.post_json(&url, &request))
            .await?;
        Ok(conversions::parse_prediction_image(&response)?)
    }

    #[instrument(skip(self, image, instruction), fields(model = %self.config.edit_model))]
    async fn edit_image(
        &self,
        image: &ImageAsset,
        instruction: &str,
    ) -> StoryloomResult<ImageAsset> {
        let request = conversions::edit_request(image, instruction);
        let response = self
            .generate_content(&self.config.edit_model, &request)
            .await?;
        Ok(conversions::parse_inline_image(&response)?)
    }

    #[instrument(skip(self, prompt, scenes, theme), fields(scene_count = scenes.len()))]
    async fn compose_narrative(
        &self,
        prompt: &str,
        scenes: &[SceneDescription],
        theme: &str,
    ) -> StoryloomResult<String> {
        let request = conversions::narrative_request(prompt, scenes, theme);
        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        Ok(conversions::response_text(&response)?.trim().to_string())
    }

    #[instrument(
        skip(self, prompt, start_image),
        fields(model = %self.config.video_model, has_image = start_image.is_some())
    )]
    async fn start_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        start_image: Option<&ImageAsset>,
    ) -> StoryloomResult<VideoOperation> {
        let request = conversions::video_request(prompt, aspect_ratio, start_image);
        let url = self.model_url(&self.config.video_model, "predictLongRunning");
        let response: OperationResponse = self
            .with_retry("predictLongRunning", || self.post_json(&url, &request))
            .await?;
        info!(operation = %response.name, "Video render started");
        Ok(conversions::parse_operation(&response))
    }

    #[instrument(skip(self), fields(operation = %operation.name))]
    async fn poll_video(&self, operation: &VideoOperation) -> StoryloomResult<VideoOperation> {
        let url = format!("{}/{}", self.config.base_url, operation.name);
        let response: OperationResponse = self
            .with_retry("getOperation", || self.get_json(&url))
            .await?;
        debug!(done = response.done, "Polled video operation");
        Ok(conversions::parse_operation(&response))
    }

    #[instrument(skip(self, uri))]
    async fn fetch_video(&self, uri: &str) -> StoryloomResult<VideoAsset> {
        let asset = self.with_retry("fetchVideo", || self.download(uri)).await?;
        info!(bytes = asset.data().len(), "Downloaded video");
        Ok(asset)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
