pub mod format;
pub mod label;

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

pub use format::{format_bytes, percent};
pub use label::Labeler;

/// Get current Unix timestamp in seconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Append a `retry=<timestamp>` query parameter so caches between us and the
/// origin cannot answer a retried request.
pub fn with_retry_param(url: &str, timestamp: u64) -> Result<String, url::ParseError> {
    let mut url = Url::parse(url)?;
    url.query_pairs_mut()
        .append_pair("retry", &timestamp.to_string());
    Ok(url.into())
}

/// Last path segment of an absolute URL; `None` when it has none.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.path_segments()?
        .last()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
