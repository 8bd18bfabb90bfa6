//! File name sanitization.

use regex::Regex;
use std::sync::OnceLock;

/// Longest sanitized name, in characters.
const MAX_LEN: usize = 50;

static DISALLOWED: OnceLock<Regex> = OnceLock::new();

/// Make `name` safe for use in a file name.
///
/// Lowercases, collapses each run of characters outside `[a-z0-9_]` into a
/// single `_`, and truncates to 50 characters.
///
/// # Examples
///
/// ```
/// use storyloom_export::sanitize_filename;
///
/// assert_eq!(sanitize_filename("A Lone Hero! (v2)"), "a_lone_hero_v2_");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let pattern =
        DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9_]+").expect("Valid filename regex"));
    let lowered = name.to_lowercase();
    pattern
        .replace_all(&lowered, "_")
        .chars()
        .take(MAX_LEN)
        .collect()
}
