//! Parse HTTP response header lines into a ResponseHead.

/// Headers of the final response that the downloader cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

/// Parse collected header lines into a ResponseHead.
///
/// When redirects are followed the lines of several responses arrive in one
/// list; every status line starts a fresh head so only the last response counts.
pub fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    head.content_length = Some(n);
                }
            }
        }
    }

    head
}
