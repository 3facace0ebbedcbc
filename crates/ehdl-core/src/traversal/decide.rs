//! Pure transition rules: what a fetched page means, and when the chain closes.

use crate::page::PageInfo;
use crate::url_model::{has_query_param, strip_query, with_query_param};

/// Image path the site serves instead of content when the bandwidth cap hits.
pub const RATE_LIMIT_MARKER: &str = "/g/509.gif";

/// Substring of image URLs that need an access token on the page URL.
pub const TOKEN_MARKER: &str = "keystamp=";

/// Query parameter carrying the access token.
pub const TOKEN_PARAM: &str = "nl";

/// What to do with a freshly fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Rate-limit marker served: wait, then fetch the same URL again.
    Wait,
    /// Fetch the same page again with the access token attached.
    Refetch { url: String },
    /// The image is real: download it.
    Download,
}

/// Decides the next action for the page at `current_url`.
pub fn decide(current_url: &str, page: &PageInfo) -> PageAction {
    if page.image_url.contains(RATE_LIMIT_MARKER) {
        return PageAction::Wait;
    }
    if page.image_url.contains(TOKEN_MARKER) && !has_query_param(current_url, TOKEN_PARAM) {
        return PageAction::Refetch {
            url: with_query_param(current_url, TOKEN_PARAM, &page.fail_token),
        };
    }
    PageAction::Download
}

/// True when the "next" link of the page at `current_url` loops back onto the
/// chain: either onto the page itself (the last page links to itself) or onto
/// the first page. Query strings are ignored on every side.
pub fn chain_closed(current_url: &str, next_page_url: &str, start_url: &str) -> bool {
    let next = strip_query(next_page_url);
    next == strip_query(current_url) || next == strip_query(start_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(image_url: &str) -> PageInfo {
        PageInfo {
            image_url: image_url.to_string(),
            next_page_url: "https://site.test/s/b/1-2".to_string(),
            fail_token: "777-1".to_string(),
        }
    }

    #[test]
    fn rate_limit_marker_waits() {
        let p = page("https://site.test/img/g/509.gif");
        assert_eq!(decide("https://site.test/s/a/1-1", &p), PageAction::Wait);
    }

    #[test]
    fn rate_limit_wins_over_token() {
        let p = page("https://site.test/g/509.gif?keystamp=1");
        assert_eq!(decide("https://site.test/s/a/1-1", &p), PageAction::Wait);
    }

    #[test]
    fn token_marker_without_token_refetches() {
        let p = page("https://img.test/h/x/keystamp=123;fileindex=4/001.jpg");
        assert_eq!(
            decide("https://site.test/s/a/1-1", &p),
            PageAction::Refetch {
                url: "https://site.test/s/a/1-1?nl=777-1".to_string()
            }
        );
    }

    #[test]
    fn token_marker_with_token_downloads() {
        let p = page("https://img.test/h/x/keystamp=123/001.jpg");
        assert_eq!(
            decide("https://site.test/s/a/1-1?nl=777-1", &p),
            PageAction::Download
        );
    }

    #[test]
    fn plain_image_downloads() {
        let p = page("https://img.test/h/x/001.jpg");
        assert_eq!(decide("https://site.test/s/a/1-1", &p), PageAction::Download);
    }

    #[test]
    fn closes_on_self_link() {
        assert!(chain_closed(
            "https://site.test/s/c/1-3?nl=5",
            "https://site.test/s/c/1-3",
            "https://site.test/s/a/1-1"
        ));
    }

    #[test]
    fn closes_on_link_back_to_first_page() {
        assert!(chain_closed(
            "https://site.test/s/c/1-3",
            "https://site.test/s/a/1-1",
            "https://site.test/s/a/1-1"
        ));
        // first page reached with a token query still counts
        assert!(chain_closed(
            "https://site.test/s/c/1-3",
            "https://site.test/s/a/1-1?nl=9",
            "https://site.test/s/a/1-1"
        ));
    }

    #[test]
    fn open_chain_continues() {
        assert!(!chain_closed(
            "https://site.test/s/a/1-1",
            "https://site.test/s/b/1-2",
            "https://site.test/s/a/1-1"
        ));
    }
}
