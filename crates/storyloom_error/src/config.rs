//! Configuration error types.

/// Specific error conditions while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source could not be read or merged (missing required file, bad TOML)
    #[display("Failed to build configuration: {}", _0)]
    Load(String),
    /// The merged sources do not match the expected shape
    #[display("Failed to parse configuration: {}", _0)]
    Deserialize(String),
}

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Deserialize("missing field `gemini`".to_string()));
/// assert!(format!("{}", err).contains("missing field `gemini`"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific error condition
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
