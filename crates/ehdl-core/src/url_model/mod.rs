//! URL modeling: gallery URL normalization, query handling for page URLs,
//! and filesystem names derived from URLs and titles.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::{sanitize_segment, title_to_basename, FALLBACK_BASENAME, MAX_BASENAME_BYTES};

/// Strips one trailing `/` from a gallery URL (`.../g/1/abc/` → `.../g/1/abc`).
pub fn normalize_gallery_url(url: &str) -> String {
    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// The URL without its query string and fragment.
pub fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// True if the URL's query string carries `key` (with or without a value).
pub fn has_query_param(url: &str, key: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.query_pairs().any(|(k, _)| k == key),
        Err(_) => false,
    }
}

/// Appends `key=value` to the query string (`?` or `&` as appropriate).
pub fn with_query_param(url: &str, key: &str, value: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{key}={value}")
}

/// Identifier for the staging directory: the last two path pieces of the
/// gallery URL joined by `_` (`.../g/123/abcdef` → `123_abcdef`).
pub fn work_signature(gallery_url: &str) -> String {
    let pieces: Vec<&str> = strip_query(gallery_url).rsplit('/').take(2).collect();
    let joined = pieces.into_iter().rev().collect::<Vec<_>>().join("_");
    sanitize_segment(&joined)
}
