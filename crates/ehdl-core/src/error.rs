//! Gallery-level error type.
//!
//! Every fatal condition of one gallery run ends up here; the orchestrator
//! releases the staging directory before handing it to the caller.

use crate::archive::ArchiveError;
use crate::html::ParseError;
use crate::retry::RetryError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why one gallery could not be completed.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Index or content page could not be fetched.
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: RetryError,
    },
    /// Image download failed or never matched its declared length.
    #[error("downloading {url}")]
    Download {
        url: String,
        #[source]
        source: RetryError,
    },
    /// Page layout did not match; not retried.
    #[error("unexpected page layout at {url}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
    /// Image URL has no usable last path segment.
    #[error("no file name in image URL {url}")]
    ImageName { url: String },
    #[error("staging directory")]
    WorkArea(#[source] io::Error),
    #[error("packaging {}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },
}

impl GalleryError {
    /// True when a request site used its whole retry budget.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(
            self,
            GalleryError::Fetch {
                source: RetryError::Exhausted { .. },
                ..
            } | GalleryError::Download {
                source: RetryError::Exhausted { .. },
                ..
            }
        )
    }
}
