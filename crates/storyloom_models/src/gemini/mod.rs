//! Google Generative Language API integration.

mod client;
pub mod conversions;
mod dto;

pub use client::{GeminiClient, GeminiResult};
pub use dto::{
    ApiErrorBody, ApiErrorDetail, Candidate, Content, GenerateContentRequest,
    GenerateContentResponse, GenerateVideoResponse, GeneratedSample, GenerationConfig, InlineData,
    OperationResponse, OperationResult, OperationStatus, Part, PredictImage, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse, Prediction, VideoReference,
};
