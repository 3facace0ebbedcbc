//! Archive packager: a directory (or one file) into a DEFLATE zip.
//!
//! Entries are added in file-name order with `/`-separated paths relative to
//! the input directory. The archive is assembled at `<output>.part` and
//! renamed into place, so a failed run leaves no partial archive behind.

use crate::storage::temp_path;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("walking input directory")]
    Walk(#[from] walkdir::Error),
    #[error("writing zip")]
    Zip(#[from] zip::result::ZipError),
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// Packs every regular file under `src` into `archive`. When `src` is a
/// regular file it becomes the only entry, stored under its file name.
/// Returns the archive path.
pub fn zip_dir(src: &Path, archive: &Path) -> Result<PathBuf, ArchiveError> {
    let part = temp_path(archive);
    match write_archive(src, &part) {
        Ok(entries) => {
            fs::rename(&part, archive)?;
            tracing::info!("archived {} files into {}", entries, archive.display());
            Ok(archive.to_path_buf())
        }
        Err(e) => {
            let _ = fs::remove_file(&part);
            Err(e)
        }
    }
}

fn write_archive(src: &Path, out: &Path) -> Result<usize, ArchiveError> {
    let files = collect_entries(src)?;
    let mut writer = ZipWriter::new(File::create(out)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, path) in &files {
        tracing::debug!("adding {} as {}", path.display(), name);
        writer.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(path)?, &mut writer)?;
    }
    writer.finish()?;
    Ok(files.len())
}

/// `(arcname, path)` pairs in archive order.
fn collect_entries(src: &Path) -> Result<Vec<(String, PathBuf)>, ArchiveError> {
    if fs::metadata(src)?.is_file() {
        let name = src
            .file_name()
            .ok_or_else(|| ArchiveError::NoFileName(src.to_path_buf()))?;
        return Ok(vec![(name.to_string_lossy().into_owned(), src.to_path_buf())]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((name, entry.into_path()));
    }
    Ok(files)
}
