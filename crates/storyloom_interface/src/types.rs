//! Types shared across trait boundaries.

use serde::{Deserialize, Serialize};

/// Descriptive data accompanying an exported storyboard.
///
/// # Examples
///
/// ```
/// use storyloom_interface::ExportMeta;
///
/// let meta = ExportMeta::builder()
///     .title("The Lone Hero")
///     .narrative(Some("Once upon a time...".to_string()))
///     .build()
///     .unwrap();
/// assert_eq!(meta.title(), "The Lone Hero");
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into), default)]
pub struct ExportMeta {
    /// Storyboard title, also the base of output file names
    title: String,
    /// Prose narrative, when one was produced
    narrative: Option<String>,
}

impl ExportMeta {
    /// Creates a builder for export metadata.
    pub fn builder() -> ExportMetaBuilder {
        ExportMetaBuilder::default()
    }

    /// Metadata with a title and optional narrative.
    pub fn new(title: impl Into<String>, narrative: Option<String>) -> Self {
        Self {
            title: title.into(),
            narrative,
        }
    }
}
