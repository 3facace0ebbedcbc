//! Scripted in-memory client for unit tests.

use super::{BodySink, HttpClient, SinkControl, StreamOutcome};
use crate::retry::FetchError;
use std::collections::{HashMap, VecDeque};

/// Canned response for one request.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Html(String),
    /// Body plus the length the server claims in `Content-Length`.
    Bytes { body: Vec<u8>, declared: Option<u64> },
    Timeout,
    Refused,
    Status(u32),
}

impl Reply {
    pub(crate) fn image(body: &[u8]) -> Self {
        Reply::Bytes {
            body: body.to_vec(),
            declared: Some(body.len() as u64),
        }
    }

    fn failure(&self) -> Option<FetchError> {
        match self {
            Reply::Timeout => Some(FetchError::Curl(curl::Error::new(28))),
            Reply::Refused => Some(FetchError::Curl(curl::Error::new(7))),
            Reply::Status(code) => Some(FetchError::Http(*code)),
            Reply::Html(_) | Reply::Bytes { .. } => None,
        }
    }
}

/// Each URL owns a queue of replies; the last reply repeats once the queue
/// is down to one entry. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    routes: HashMap<String, VecDeque<Reply>>,
    /// Every URL requested, in order.
    pub(crate) requests: Vec<String>,
    /// Number of bodies actually streamed into a sink.
    pub(crate) bodies_streamed: usize,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(&mut self, url: &str, reply: Reply) -> &mut Self {
        self.routes
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn requests_for(&self, url: &str) -> usize {
        self.requests.iter().filter(|u| *u == url).count()
    }

    fn next_reply(&mut self, url: &str) -> Reply {
        self.requests.push(url.to_string());
        match self.routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Status(404)),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

impl HttpClient for FakeClient {
    fn get_text(&mut self, url: &str) -> Result<String, FetchError> {
        let reply = self.next_reply(url);
        if let Some(e) = reply.failure() {
            return Err(e);
        }
        match reply {
            Reply::Html(html) => Ok(html),
            Reply::Bytes { body, .. } => Ok(String::from_utf8_lossy(&body).into_owned()),
            _ => unreachable!("failures handled above"),
        }
    }

    fn get_stream(
        &mut self,
        url: &str,
        sink: &mut dyn BodySink,
    ) -> Result<StreamOutcome, FetchError> {
        let reply = self.next_reply(url);
        if let Some(e) = reply.failure() {
            return Err(e);
        }
        let (body, declared) = match reply {
            Reply::Html(html) => {
                let len = html.len() as u64;
                (html.into_bytes(), Some(len))
            }
            Reply::Bytes { body, declared } => (body, declared),
            _ => unreachable!("failures handled above"),
        };
        if sink.begin(declared)? == SinkControl::Skip {
            return Ok(StreamOutcome::Skipped);
        }
        self.bodies_streamed += 1;
        for chunk in body.chunks(3) {
            sink.write_chunk(chunk)?;
            // keep-alive style empty chunk
            sink.write_chunk(&[])?;
        }
        Ok(StreamOutcome::Completed)
    }
}

/// Content page markup in the layout the page parser expects.
pub(crate) fn content_page(image_url: &str, next_url: &str, token: &str) -> String {
    format!(
        r##"<html><head><title>page</title></head><body>
<div id="i1">
  <div id="i3"><a href="{next_url}"><img id="img" src="{image_url}" style="width:1280px"></a></div>
  <div id="i6"><a href="#" id="loadfail" onclick="return nl('{token}')">Reload broken image</a></div>
</div>
</body></html>"##
    )
}

/// Index page markup: title in `#gn`, thumbnails in the `gdtm` grid.
pub(crate) fn index_page(title: &str, page_urls: &[&str]) -> String {
    let thumbs: String = page_urls
        .iter()
        .map(|u| format!(r#"<div class="gdtm"><div><a href="{u}"><img src="t.jpg"></a></div></div>"#))
        .collect();
    format!(
        r#"<html><head><title>{title} - Gallery</title></head><body>
<div id="gd2"><h1 id="gn">{title}</h1><h1 id="gj"></h1></div>
<div id="gdt">{thumbs}</div>
</body></html>"#
    )
}
