//! Generated media assets.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A generated or edited panel image.
///
/// # Examples
///
/// ```
/// use storyloom_core::ImageAsset;
///
/// let asset = ImageAsset::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// assert!(asset.is_image());
/// assert_eq!(asset.extension(), "png");
/// assert!(asset.to_data_url().starts_with("data:image/png;base64,"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct ImageAsset {
    /// MIME type, e.g. "image/png"
    mime: String,
    /// Raw image bytes
    data: Vec<u8>,
}

impl ImageAsset {
    /// Creates an asset from a MIME type and raw bytes.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Whether the MIME type names an image.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        mime_extension(&self.mime)
    }

    /// Base64 encoding of the bytes, as sent back to the service for edits.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL suitable for inline embedding.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

/// A finished video downloaded from the service.
///
/// Dropping the asset releases the downloaded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct VideoAsset {
    /// MIME type, e.g. "video/mp4"
    mime: String,
    /// Raw video bytes
    data: Vec<u8>,
}

impl VideoAsset {
    /// Creates an asset from a MIME type and raw bytes.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        mime_extension(&self.mime)
    }
}

fn mime_extension(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        _ => "bin",
    }
}
