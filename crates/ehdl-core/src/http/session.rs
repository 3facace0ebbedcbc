//! Persistent libcurl session shared by every request of a run.

use super::{
    parse_headers, BodySink, HttpClient, SinkControl, StreamOutcome, ACCEPT_ENCODING,
    BROWSER_HEADERS,
};
use crate::retry::FetchError;
use curl::easy::{Easy, List};
use std::cell::RefCell;
use std::str;
use std::time::Duration;

/// Timeouts applied to every request of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Limit for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// A transfer that receives nothing for this long is aborted.
    pub read_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// One reused curl handle: connections are kept alive between requests and
/// cookies set by the site are replayed on later requests.
#[derive(Debug)]
pub struct CurlSession {
    easy: Easy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Head,
    Body,
    Skipped,
}

impl CurlSession {
    pub fn new(opts: SessionOptions) -> Result<Self, curl::Error> {
        let mut easy = Easy::new();
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(opts.connect_timeout)?;
        // No overall deadline; a stalled transfer (< 1 B/s) is aborted instead.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(opts.read_timeout)?;
        easy.accept_encoding(ACCEPT_ENCODING)?;
        // Empty file name turns on the in-memory cookie engine.
        easy.cookie_file("")?;
        easy.fail_on_error(true)?;

        let mut list = List::new();
        for (name, value) in BROWSER_HEADERS {
            list.append(&format!("{}: {}", name, value))?;
        }
        easy.http_headers(list)?;

        Ok(Self { easy })
    }

    fn prepare(&mut self, url: &str) -> Result<(), FetchError> {
        self.easy.url(url)?;
        self.easy.get(true)?;
        Ok(())
    }

    /// Maps a failed `perform` to an HTTP status error when curl stopped on one.
    fn perform_error(&mut self, err: curl::Error) -> FetchError {
        if err.is_http_returned_error() {
            if let Ok(code) = self.easy.response_code() {
                if code != 0 {
                    return FetchError::Http(code);
                }
            }
        }
        FetchError::Curl(err)
    }
}

impl HttpClient for CurlSession {
    fn get_text(&mut self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);
        self.prepare(url)?;
        let mut body = Vec::new();
        let result = {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if let Err(e) = result {
            return Err(self.perform_error(e));
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn get_stream(
        &mut self,
        url: &str,
        sink: &mut dyn BodySink,
    ) -> Result<StreamOutcome, FetchError> {
        tracing::debug!("GET (stream) {}", url);
        self.prepare(url)?;
        let lines = RefCell::new(Vec::<String>::new());
        let mut phase = Phase::Head;
        let mut sink_error: Option<FetchError> = None;
        let result = {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.borrow_mut().push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if phase == Phase::Head {
                    let head = parse_headers(&lines.borrow());
                    match sink.begin(head.content_length) {
                        Ok(SinkControl::Continue) => phase = Phase::Body,
                        Ok(SinkControl::Skip) => phase = Phase::Skipped,
                        Err(e) => {
                            sink_error = Some(e);
                            return Ok(0); // abort transfer
                        }
                    }
                }
                if phase == Phase::Skipped {
                    return Ok(0);
                }
                match sink.write_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        sink_error = Some(e);
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(e);
        }
        if phase == Phase::Skipped {
            return Ok(StreamOutcome::Skipped);
        }
        if let Err(e) = result {
            return Err(self.perform_error(e));
        }
        if phase == Phase::Head {
            // Empty body: the write callback never ran.
            let head = parse_headers(&lines.borrow());
            if sink.begin(head.content_length)? == SinkControl::Skip {
                return Ok(StreamOutcome::Skipped);
            }
        }
        Ok(StreamOutcome::Completed)
    }
}
