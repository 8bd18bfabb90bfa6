//! Generation settings read by the orchestrator when a run starts.

use serde::{Deserialize, Serialize};

/// Aspect ratio for generated panels and video.
///
/// Parses from and prints as the service's wire form.
///
/// # Examples
///
/// ```
/// use storyloom_core::AspectRatio;
///
/// let ratio: AspectRatio = "9:16".parse().unwrap();
/// assert_eq!(ratio, AspectRatio::Portrait);
/// assert_eq!(AspectRatio::Landscape.to_string(), "16:9");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AspectRatio {
    /// Widescreen 16:9
    #[default]
    #[strum(serialize = "16:9")]
    #[serde(rename = "16:9")]
    Landscape,
    /// Vertical 9:16
    #[strum(serialize = "9:16")]
    #[serde(rename = "9:16")]
    Portrait,
    /// Square 1:1
    #[strum(serialize = "1:1")]
    #[serde(rename = "1:1")]
    Square,
    /// Classic 4:3
    #[strum(serialize = "4:3")]
    #[serde(rename = "4:3")]
    Classic,
    /// Tall 3:4
    #[strum(serialize = "3:4")]
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    /// Ratio used for video renders.
    ///
    /// The video model only accepts widescreen and vertical; other ratios
    /// fall back to widescreen.
    pub fn video_ratio(self) -> AspectRatio {
        match self {
            AspectRatio::Portrait => AspectRatio::Portrait,
            _ => AspectRatio::Landscape,
        }
    }
}

/// Image quality tier, mapped to an image model by configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageQuality {
    /// Fastest, lowest fidelity
    Draft,
    /// Balanced default
    #[default]
    Standard,
    /// Highest fidelity
    High,
}

/// Coarse story length controlling the target panel-count band.
///
/// The band is an instruction to the service; the exact count is decided
/// remotely and never enforced locally.
///
/// # Examples
///
/// ```
/// use storyloom_core::StoryDuration;
///
/// assert_eq!(StoryDuration::Short.panel_range(), 6..=8);
/// assert!(StoryDuration::Long.instruction().contains("30"));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoryDuration {
    /// Roughly 6 to 8 panels
    #[default]
    Short,
    /// Roughly 12 to 16 panels
    Medium,
    /// Roughly 30 to 40 panels
    Long,
}

impl StoryDuration {
    /// Approximate panel-count band for this tier.
    pub fn panel_range(self) -> std::ops::RangeInclusive<usize> {
        match self {
            StoryDuration::Short => 6..=8,
            StoryDuration::Medium => 12..=16,
            StoryDuration::Long => 30..=40,
        }
    }

    /// Instruction describing the band, embedded in the scene request.
    pub fn instruction(self) -> String {
        let range = self.panel_range();
        format!(
            "Break the story into approximately {} to {} scenes.",
            range.start(),
            range.end()
        )
    }
}

/// User-editable generation settings.
///
/// # Examples
///
/// ```
/// use storyloom_core::{AspectRatio, GenerationSettings, ImageQuality, StoryDuration};
///
/// let settings = GenerationSettings::builder()
///     .aspect_ratio(AspectRatio::Square)
///     .duration(StoryDuration::Medium)
///     .build()
///     .unwrap();
///
/// assert_eq!(*settings.image_quality(), ImageQuality::Standard);
/// assert_eq!(*settings.aspect_ratio(), AspectRatio::Square);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default)]
pub struct GenerationSettings {
    /// Panel and video aspect ratio
    aspect_ratio: AspectRatio,
    /// Image quality tier
    image_quality: ImageQuality,
    /// Story length tier
    duration: StoryDuration,
}

impl GenerationSettings {
    /// Creates a new settings builder.
    pub fn builder() -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::default()
    }

    /// Settings with every field given.
    pub fn new(
        aspect_ratio: AspectRatio,
        image_quality: ImageQuality,
        duration: StoryDuration,
    ) -> Self {
        Self {
            aspect_ratio,
            image_quality,
            duration,
        }
    }
}
