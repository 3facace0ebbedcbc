//! Content page extraction.

use super::PageInfo;
use crate::html::{first_attr, resolve, ParseError};
use scraper::Html;

const IMAGE: &str = "#img";
const NEXT_LINK: &str = "div#i3 a";
const RELOAD_LINK: &str = "a#loadfail";

/// Extracts [`PageInfo`] from a content page; relative URLs are resolved
/// against `page_url`.
pub fn parse_content_page(html: &str, page_url: &str) -> Result<PageInfo, ParseError> {
    let doc = Html::parse_document(html);
    let image_src = first_attr(&doc, IMAGE, "src")?;
    let next_href = first_attr(&doc, NEXT_LINK, "href")?;
    let onclick = first_attr(&doc, RELOAD_LINK, "onclick")?;

    Ok(PageInfo {
        image_url: resolve(page_url, image_src)?,
        next_page_url: resolve(page_url, next_href)?,
        fail_token: token_from_onclick(onclick)?,
    })
}

/// The second `'`-delimited piece of the reload handler:
/// `return nl('12345-678')` → `12345-678`.
pub fn token_from_onclick(onclick: &str) -> Result<String, ParseError> {
    onclick
        .split('\'')
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| ParseError::MalformedToken(onclick.to_string()))
}
