//! Selector helpers shared by the index and content page parsers.
//!
//! A missing element or attribute means the site layout no longer matches
//! what the parsers expect; it surfaces as [`ParseError`] and is never retried.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Structural mismatch between a fetched page and the expected layout.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(&'static str),
    #[error("no element matches `{0}`")]
    MissingElement(&'static str),
    #[error("`{selector}` has no `{attr}` attribute")]
    MissingAttribute {
        selector: &'static str,
        attr: &'static str,
    },
    #[error("no retry token in onclick handler `{0}`")]
    MalformedToken(String),
    #[error("cannot resolve `{href}`")]
    BadUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no title candidate matched")]
    MissingTitle,
    #[error("gallery page listing is empty")]
    EmptyListing,
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::InvalidSelector(css))
}

/// First element matching `css`.
pub(crate) fn first<'a>(doc: &'a Html, css: &'static str) -> Result<ElementRef<'a>, ParseError> {
    doc.select(&selector(css)?)
        .next()
        .ok_or(ParseError::MissingElement(css))
}

/// Attribute `attr` of the first element matching `css`.
pub(crate) fn first_attr<'a>(
    doc: &'a Html,
    css: &'static str,
    attr: &'static str,
) -> Result<&'a str, ParseError> {
    first(doc, css)?
        .value()
        .attr(attr)
        .ok_or(ParseError::MissingAttribute {
            selector: css,
            attr,
        })
}

/// Trimmed text content of the first element matching `css`, if non-empty.
pub(crate) fn first_text(doc: &Html, css: &'static str) -> Result<Option<String>, ParseError> {
    let text = doc
        .select(&selector(css)?)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());
    Ok(text.filter(|t| !t.is_empty()))
}

/// Resolves `href` against the URL of the page it was found on.
pub(crate) fn resolve(base: &str, href: &str) -> Result<String, ParseError> {
    let bad = |source| ParseError::BadUrl {
        href: href.to_string(),
        source,
    };
    let base = url::Url::parse(base).map_err(bad)?;
    Ok(base.join(href.trim()).map_err(bad)?.to_string())
}
