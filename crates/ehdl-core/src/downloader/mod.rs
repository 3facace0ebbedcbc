//! Image downloader: one URL to one verified file.
//!
//! Each attempt streams the body to `<dir>/<last path segment>` and then
//! checks the file size against the declared `Content-Length`. A file that
//! already has that exact size is reused without transferring the body, so
//! repeating a download inside one staging directory is cheap.

mod sink;

use crate::error::GalleryError;
use crate::http::{HttpClient, StreamOutcome};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::url_model::filename_from_url_path;
use sink::FileSink;
use std::fs;
use std::path::{Path, PathBuf};

/// A file that is on disk with exactly `expected_len` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub filename: String,
    pub path: PathBuf,
    /// Declared `Content-Length` of the response.
    pub expected_len: u64,
    /// False when an existing file of the right size was reused.
    pub fresh: bool,
}

/// Downloads `url` into `dir`, retrying transient failures and size
/// mismatches within `policy`.
pub fn download_image(
    client: &mut dyn HttpClient,
    policy: &RetryPolicy,
    dir: &Path,
    url: &str,
) -> Result<DownloadedImage, GalleryError> {
    let filename = filename_from_url_path(url).ok_or_else(|| GalleryError::ImageName {
        url: url.to_string(),
    })?;
    let path = dir.join(&filename);
    tracing::info!("downloading an image file: {}", path.display());

    let (expected_len, fresh) = run_with_retry(policy, url, || download_once(client, url, &path))
        .map_err(|source| GalleryError::Download {
            url: url.to_string(),
            source,
        })?;

    Ok(DownloadedImage {
        filename,
        path,
        expected_len,
        fresh,
    })
}

/// One attempt. Returns the verified length and whether the body was written.
fn download_once(
    client: &mut dyn HttpClient,
    url: &str,
    path: &Path,
) -> Result<(u64, bool), FetchError> {
    let mut sink = FileSink::new(path);
    let outcome = client.get_stream(url, &mut sink)?;
    let expected = sink.finish()?.ok_or(FetchError::MissingContentLength)?;

    if outcome == StreamOutcome::Skipped {
        tracing::info!("use existing file: {}", path.display());
        return Ok((expected, false));
    }

    let received = fs::metadata(path).map_err(FetchError::Storage)?.len();
    if received != expected {
        tracing::warn!(
            "download size mismatch for {}: file size {}, Content-Length {}",
            path.display(),
            received,
            expected
        );
        return Err(FetchError::SizeMismatch { expected, received });
    }
    Ok((expected, true))
}
