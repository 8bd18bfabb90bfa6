//! Generative service clients for Storyloom.
//!
//! The only provider is Google's Generative Language API, which hosts the
//! text (Gemini), image (Imagen) and video (Veo) models a storyboard needs.
//!
//! # Example
//!
//! ```no_run
//! use storyloom_models::GeminiClient;
//! use storyloom_interface::GenerationClient;
//! use storyloom_core::{AspectRatio, StoryDuration};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let scenes = client
//!     .describe_scenes("A lone hero", AspectRatio::Landscape, StoryDuration::Short, "watercolor")
//!     .await?;
//! println!("{} scenes", scenes.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{
    ApiErrorBody, ApiErrorDetail, Candidate, Content, GeminiClient, GeminiResult,
    GenerateContentRequest, GenerateContentResponse, GenerateVideoResponse, GeneratedSample,
    GenerationConfig, InlineData, OperationResponse, OperationResult, OperationStatus, Part,
    PredictImage, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
    Prediction, VideoReference, conversions,
};
