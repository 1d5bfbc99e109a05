//! Username normalization applied once at ingestion.

/// Normalize an external username for matching.
///
/// Directory entries may store a full profile URL
/// (`https://github.com/Alice/`); the trailing path segment is the username.
/// Matching is case-insensitive, so the key is lowercased.
pub fn normalize_username(raw: &str) -> String {
    strip_profile_prefix(raw).to_lowercase()
}

/// Strip a profile URL prefix, keeping the original casing.
pub fn strip_profile_prefix(raw: &str) -> &str {
    let trimmed = raw.trim().trim_end_matches('/');
    let name = match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    name.trim_start_matches('@')
}
