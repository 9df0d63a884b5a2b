//! Automatic derivations for bookmark fields
//!
//! Abbreviations and default descriptions are computed from the bookmark
//! URL. A URL that does not parse never fails the caller; the derivation
//! falls back to a sentinel instead.

use url::Url;

/// Abbreviation used when none can be derived from the URL
pub const ABBR_SENTINEL: &str = "XX";

/// Maximum number of letters in an abbreviation
pub const ABBR_MAX_LEN: usize = 2;

/// Host component of `url`, if it parses and has one
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

/// Derive a short code from the URL host.
///
/// Strips a leading `www.`, keeps the label before the next dot, drops
/// everything that is not an ASCII letter, uppercases and keeps the first
/// two letters. Returns [`ABBR_SENTINEL`] when the URL does not parse or
/// the label holds no letters.
pub fn generate_abbreviation(url: &str) -> String {
    let Some(host) = host_of(url) else {
        return ABBR_SENTINEL.to_string();
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next().unwrap_or_default();

    let letters: String = label
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(ABBR_MAX_LEN)
        .collect();

    if letters.is_empty() {
        ABBR_SENTINEL.to_string()
    } else {
        letters
    }
}

/// Clean a user supplied abbreviation: letters only, uppercased, at most two.
///
/// Returns `None` when nothing usable is left.
pub fn normalize_abbreviation(input: &str) -> Option<String> {
    let letters: String = input
        .trim()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(ABBR_MAX_LEN)
        .collect();
    (!letters.is_empty()).then_some(letters)
}

/// Default description for a bookmark: the URL host, or the raw URL text
/// when there is no host to show.
pub fn default_description(url: &str) -> String {
    host_of(url).unwrap_or_else(|| url.trim().to_string())
}
