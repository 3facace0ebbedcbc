//! `ehdl zip` – package a directory or file with the archive packager.

use anyhow::{Context, Result};
use ehdl_core::archive::zip_dir;
use std::path::{Path, PathBuf};

/// `<name>.zip` in the current directory, `name` being the last component of `src`.
pub fn default_archive_path(src: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .with_context(|| format!("{} has no file name", src.display()))?;
    let mut archive = name.to_os_string();
    archive.push(".zip");
    Ok(PathBuf::from(archive))
}

pub fn run_zip(src: &Path, output: Option<PathBuf>) -> Result<()> {
    let archive = match output {
        Some(out) => out,
        None => default_archive_path(src)?,
    };
    let written = zip_dir(src, &archive)
        .with_context(|| format!("failed to package {}", src.display()))?;
    println!("{}", written.display());
    Ok(())
}
