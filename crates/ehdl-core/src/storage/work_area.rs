//! Scoped staging directory for one gallery run.

use crate::url_model::work_signature;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// RAM-backed tmpfs, preferred for staging when present.
pub const SHM_DIR: &str = "/dev/shm";

/// `/dev/shm` if it is a directory on this host.
pub fn default_work_parent() -> Option<PathBuf> {
    let shm = Path::new(SHM_DIR);
    shm.is_dir().then(|| shm.to_path_buf())
}

/// Exclusively-owned temporary directory. Dropping it removes everything
/// below it, so every exit path of a gallery run cleans up.
#[derive(Debug)]
pub struct WorkArea {
    dir: TempDir,
}

impl WorkArea {
    /// Creates `ehdl-<signature>XXXXXX` under `parent`, or under the system
    /// temp dir when `parent` is `None`. The signature comes from the last
    /// two path segments of `gallery_url`.
    pub fn create(parent: Option<&Path>, gallery_url: &str) -> io::Result<Self> {
        let prefix = format!("ehdl-{}", work_signature(gallery_url));
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match parent {
            Some(p) => builder.tempdir_in(p)?,
            None => builder.tempdir()?,
        };
        tracing::info!("staging directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Creates (or reuses) the subdirectory the images of `basename` go into.
    pub fn create_gallery_dir(&self, basename: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(basename);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Removes the directory now and reports failure instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
