//! HTTP transport.
//!
//! Everything above this module talks to the network through [`HttpClient`],
//! so the traversal, downloader and resolver can be driven by an in-memory
//! client in tests. [`CurlSession`] is the production implementation: one
//! libcurl handle shared for the whole run (keep-alive, cookie engine).

mod parse;
mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use parse::{parse_headers, ResponseHead};
pub use session::{CurlSession, SessionOptions};

use crate::retry::FetchError;

/// Browser-like request headers sent on every request.
///
/// `Accept-Encoding` is not listed here: the session negotiates
/// `gzip, deflate` through libcurl so bodies are decoded transparently.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:43.0) Gecko/20100101 Firefox/43.0",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3"),
    ("Connection", "keep-alive"),
    ("Cache-Control", "max-age=0"),
];

/// Encodings offered in `Accept-Encoding`.
pub const ACCEPT_ENCODING: &str = "gzip, deflate";

/// Whether a streaming sink wants the body after seeing the response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    /// Deliver the body through `write_chunk`.
    Continue,
    /// Abort the transfer; the sink already has what it needs.
    Skip,
}

/// How a streaming GET ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Body delivered in full.
    Completed,
    /// The sink declined the body in `begin`.
    Skipped,
}

/// Receiver of a streamed response body.
pub trait BodySink {
    /// Called once the final response head is known, before any body bytes.
    fn begin(&mut self, content_length: Option<u64>) -> Result<SinkControl, FetchError>;

    /// Called for each body chunk, in order.
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), FetchError>;
}

/// Blocking HTTP client used by every component.
pub trait HttpClient {
    /// GET `url` and return the body as text (lossy UTF-8).
    fn get_text(&mut self, url: &str) -> Result<String, FetchError>;

    /// GET `url`, streaming the body into `sink`.
    fn get_stream(&mut self, url: &str, sink: &mut dyn BodySink)
        -> Result<StreamOutcome, FetchError>;
}
