//! File-backed body sink with the "already downloaded" short-circuit.

use crate::http::{BodySink, SinkControl};
use crate::retry::FetchError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub(super) struct FileSink<'a> {
    path: &'a Path,
    expected: Option<u64>,
    file: Option<File>,
}

impl<'a> FileSink<'a> {
    pub(super) fn new(path: &'a Path) -> Self {
        Self {
            path,
            expected: None,
            file: None,
        }
    }

    /// Flushes and closes the file; returns the declared length seen in `begin`.
    pub(super) fn finish(mut self) -> Result<Option<u64>, FetchError> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(FetchError::Storage)?;
        }
        Ok(self.expected)
    }
}

impl BodySink for FileSink<'_> {
    fn begin(&mut self, content_length: Option<u64>) -> Result<SinkControl, FetchError> {
        let expected = content_length.ok_or(FetchError::MissingContentLength)?;
        self.expected = Some(expected);

        if let Ok(meta) = fs::metadata(self.path) {
            if meta.is_file() && meta.len() == expected {
                return Ok(SinkControl::Skip);
            }
        }
        let file = File::create(self.path).map_err(FetchError::Storage)?;
        self.file = Some(file);
        Ok(SinkControl::Continue)
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), FetchError> {
        if chunk.is_empty() {
            return Ok(());
        }
        let file = self.file.as_mut().ok_or_else(|| {
            FetchError::Storage(io::Error::other("body chunk before response head"))
        })?;
        file.write_all(chunk).map_err(FetchError::Storage)?;
        file.flush().map_err(FetchError::Storage)
    }
}
