//! Environment-variable credential source.

use async_trait::async_trait;
use storyloom_error::{GeminiError, GeminiErrorKind, StoryloomResult};
use storyloom_interface::CredentialProvider;
use tracing::{debug, instrument};

/// Treats a non-blank environment variable as the selected credential.
///
/// Selection reloads `.env` from the working directory, overriding the
/// current value, so a key added or corrected there while the process runs
/// replaces a rejected one. Pair it with a client that reads the same
/// variable per request.
///
/// # Examples
///
/// ```
/// use storyloom::EnvCredentials;
///
/// let credentials = EnvCredentials::new("GEMINI_API_KEY");
/// assert_eq!(credentials.var(), "GEMINI_API_KEY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    /// Credentials read from the variable `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the environment variable.
    pub fn var(&self) -> &str {
        &self.var
    }

    fn present(&self) -> bool {
        std::env::var(&self.var)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    async fn has_credential(&self) -> bool {
        self.present()
    }

    #[instrument(skip(self), fields(var = %self.var))]
    async fn select_credential(&self) -> StoryloomResult<()> {
        if dotenvy::dotenv_override().is_ok() {
            debug!("Reloaded .env");
        }
        if self.present() {
            Ok(())
        } else {
            Err(GeminiError::new(GeminiErrorKind::MissingApiKey(self.var.clone())).into())
        }
    }
}
