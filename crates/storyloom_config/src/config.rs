//! Configuration structures and loading.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyloom_core::ImageQuality;
use storyloom_error::{ConfigError, ConfigErrorKind, StoryloomError, StoryloomResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storyloom.toml");

/// Image model per quality tier.
///
/// ```toml
/// [gemini.image_models]
/// draft = "imagen-4.0-fast-generate-001"
/// standard = "imagen-4.0-generate-001"
/// high = "imagen-4.0-ultra-generate-001"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageModels {
    /// Model for [`ImageQuality::Draft`]
    pub draft: String,
    /// Model for [`ImageQuality::Standard`]
    pub standard: String,
    /// Model for [`ImageQuality::High`]
    pub high: String,
}

/// Generation service endpoints and models.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// REST base URL, without trailing slash
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model for scene descriptions and narrative
    pub text_model: String,
    /// Model for image editing
    pub edit_model: String,
    /// Model for video rendering
    pub video_model: String,
    /// Image models by quality tier
    pub image_models: ImageModels,
}

impl GeminiConfig {
    /// Image model for a quality tier.
    pub fn image_model(&self, quality: ImageQuality) -> &str {
        match quality {
            ImageQuality::Draft => &self.image_models.draft,
            ImageQuality::Standard => &self.image_models.standard,
            ImageQuality::High => &self.image_models.high,
        }
    }
}

/// Retry overrides for transient service errors.
///
/// Unset values fall back to the error-specific strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retry transient errors at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Override maximum retry attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,

    /// Override initial backoff delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_backoff_ms: Option<u64>,

    /// Override maximum delay between attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: None,
            initial_backoff_ms: None,
            max_delay_secs: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Video session timing and status text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoConfig {
    /// Seconds between operation status polls
    pub poll_interval_secs: u64,
    /// Seconds between rotating status messages
    pub status_interval_secs: u64,
    /// Status messages cycled while a render is running
    pub status_messages: Vec<String>,
}

impl VideoConfig {
    /// Interval between operation status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Interval between status message changes.
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }
}

/// Narrative generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NarrativeConfig {
    /// Text shown when narrative generation fails
    pub fallback: String,
}

/// Top-level Storyloom configuration.
///
/// # Example
///
/// ```no_run
/// use storyloom_config::StoryloomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryloomConfig::load()?;
/// println!("Polling every {:?}", config.video.poll_interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoryloomConfig {
    /// Generation service settings
    pub gemini: GeminiConfig,
    /// Retry overrides
    #[serde(default)]
    pub retry: RetryConfig,
    /// Video session settings
    pub video: VideoConfig,
    /// Narrative settings
    pub narrative: NarrativeConfig,
}

impl StoryloomConfig {
    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    #[instrument]
    pub fn bundled() -> StoryloomResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration from file");

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file fails to parse.
    #[instrument]
    pub fn load() -> StoryloomResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyloom/storyloom.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyloom").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StoryloomResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(ConfigErrorKind::Load(e.to_string())))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(ConfigErrorKind::Deserialize(
                    e.to_string(),
                )))
            })
    }
}
