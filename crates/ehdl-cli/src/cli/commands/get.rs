//! `ehdl get` – download galleries into zip archives.

use anyhow::{bail, Context, Result};
use ehdl_core::config::EhdlConfig;
use ehdl_core::gallery::parse_url_list;
use ehdl_core::http::CurlSession;
use ehdl_core::{download_galleries, GalleryOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// URLs from `--urls`, or from the `--list` file when given.
pub fn gather_urls(urls: Vec<String>, list: Option<&Path>) -> Result<Vec<String>> {
    let urls = match list {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read URL list {}", path.display()))?;
            parse_url_list(&text)
        }
        None => urls,
    };
    if urls.is_empty() {
        bail!("no gallery URLs given");
    }
    Ok(urls)
}

pub fn run_get(cfg: &EhdlConfig, urls: Vec<String>, list: Option<&Path>, out_dir: PathBuf) -> Result<()> {
    let urls = gather_urls(urls, list)?;
    let opts = GalleryOptions::from_config(cfg, out_dir);
    let mut session =
        CurlSession::new(cfg.session_options()).context("failed to set up HTTP session")?;

    let batch = download_galleries(&mut session, &opts, &urls);
    for outcome in &batch.completed {
        println!("{}  {}", outcome.archive.display(), outcome.url);
    }
    for (url, err) in &batch.failed {
        eprintln!("failed: {}: {:#}", url, err);
    }
    if !batch.all_succeeded() {
        bail!(
            "{} of {} galleries failed",
            batch.failed.len(),
            batch.failed.len() + batch.completed.len()
        );
    }
    Ok(())
}
