//! Gallery metadata resolver: title and first content page from the index page.

use crate::error::GalleryError;
use crate::html::{first_text, resolve, selector, ParseError};
use crate::http::HttpClient;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::url_model::title_to_basename;
use scraper::Html;

/// Title selectors, most specific first: the original-language title, the
/// romanized title, the document title, any heading.
const TITLE_CANDIDATES: &[&str] = &["#gj", "#gn", "title", "h1"];

/// Thumbnail grid anchors; the classic layout first, then the newer grid.
const LISTING_CANDIDATES: &[&str] = &["div.gdtm > div > a", "#gdt a"];

/// What the index page tells us about a gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryMeta {
    pub title: String,
    /// Title with `|`, `:` and `/` removed; names the staging subdirectory and the archive.
    pub basename: String,
    /// First content page of the chain.
    pub first_page_url: String,
}

/// Fetches the index page at `url` and extracts [`GalleryMeta`].
pub fn resolve_gallery(
    client: &mut dyn HttpClient,
    policy: &RetryPolicy,
    url: &str,
) -> Result<GalleryMeta, GalleryError> {
    let html = run_with_retry(policy, url, || client.get_text(url)).map_err(|source| {
        GalleryError::Fetch {
            url: url.to_string(),
            source,
        }
    })?;
    parse_index(&html, url).map_err(|source| GalleryError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Extracts the title and the first page link from index markup.
pub fn parse_index(html: &str, index_url: &str) -> Result<GalleryMeta, ParseError> {
    let doc = Html::parse_document(html);

    let mut title = None;
    for &css in TITLE_CANDIDATES {
        if let Some(text) = first_text(&doc, css)? {
            title = Some(text);
            break;
        }
    }
    let title = title.ok_or(ParseError::MissingTitle)?;

    let mut first_href = None;
    for &css in LISTING_CANDIDATES {
        first_href = doc
            .select(&selector(css)?)
            .find_map(|a| a.value().attr("href"));
        if first_href.is_some() {
            break;
        }
    }
    let first_href = first_href.ok_or(ParseError::EmptyListing)?;

    Ok(GalleryMeta {
        basename: title_to_basename(&title),
        first_page_url: resolve(index_url, first_href)?,
        title,
    })
}
