//! Recognition of credential rejections in service error text.

/// Phrases the generation service uses when the caller's key is missing or invalid.
const REJECTION_PATTERNS: &[&str] = &[
    "api key not found",
    "api_key_invalid",
    "api key not valid",
    "requested entity was not found",
];

/// Returns true if an error message indicates the credential was rejected.
///
/// Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use storyloom_error::is_credential_rejection;
///
/// assert!(is_credential_rejection(
///     "400 Bad Request: API key not found. Please pass a valid API key."
/// ));
/// assert!(!is_credential_rejection("503 Service Unavailable"));
/// ```
pub fn is_credential_rejection(message: &str) -> bool {
    let lowered = message.to_lowercase();
    REJECTION_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}
