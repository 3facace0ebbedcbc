//! Content page fetcher.
//!
//! Fetches one page of the chain (retrying transient failures) and extracts
//! the image URL, the next-page URL and the reload token.

mod parse;

pub use parse::{parse_content_page, token_from_onclick};

use crate::error::GalleryError;
use crate::http::HttpClient;
use crate::retry::{run_with_retry, RetryPolicy};

/// Fields of one content page. Recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// `src` of the displayed image (absolute).
    pub image_url: String,
    /// `href` of the "next" link (absolute).
    pub next_page_url: String,
    /// Token for the `nl` query parameter, from the reload link.
    pub fail_token: String,
}

/// Fetches and parses the page at `url`.
///
/// Connection failures and timeouts are retried within `policy`; a page
/// that parses badly fails immediately.
pub fn fetch_page(
    client: &mut dyn HttpClient,
    policy: &RetryPolicy,
    url: &str,
) -> Result<PageInfo, GalleryError> {
    let html = run_with_retry(policy, url, || client.get_text(url)).map_err(|source| {
        GalleryError::Fetch {
            url: url.to_string(),
            source,
        }
    })?;
    parse_content_page(&html, url).map_err(|source| GalleryError::Parse {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::{content_page, FakeClient, Reply};
    use crate::retry::RetryError;

    const PAGE: &str = "https://site.test/s/aaa/1-1";

    #[test]
    fn fetches_after_transient_failures() {
        let mut client = FakeClient::new();
        client
            .route(PAGE, Reply::Timeout)
            .route(PAGE, Reply::Refused)
            .route(
                PAGE,
                Reply::Html(content_page("https://img.test/1.jpg", "/s/bbb/1-2", "1-2")),
            );
        let info = fetch_page(&mut client, &RetryPolicy::without_backoff(10), PAGE).unwrap();
        assert_eq!(info.image_url, "https://img.test/1.jpg");
        assert_eq!(info.next_page_url, "https://site.test/s/bbb/1-2");
        assert_eq!(info.fail_token, "1-2");
        assert_eq!(client.requests_for(PAGE), 3);
    }

    #[test]
    fn gives_up_after_ten_attempts() {
        let mut client = FakeClient::new();
        client.route(PAGE, Reply::Timeout);
        let err = fetch_page(&mut client, &RetryPolicy::without_backoff(10), PAGE).unwrap_err();
        assert!(err.is_retries_exhausted());
        assert!(matches!(
            err,
            GalleryError::Fetch {
                source: RetryError::Exhausted { attempts: 10, .. },
                ..
            }
        ));
        assert_eq!(client.requests_for(PAGE), 10);
    }

    #[test]
    fn layout_mismatch_is_not_retried() {
        let mut client = FakeClient::new();
        client.route(PAGE, Reply::Html("<html><body>gone</body></html>".into()));
        let err = fetch_page(&mut client, &RetryPolicy::without_backoff(10), PAGE).unwrap_err();
        assert!(matches!(err, GalleryError::Parse { .. }));
        assert_eq!(client.requests_for(PAGE), 1);
    }
}
