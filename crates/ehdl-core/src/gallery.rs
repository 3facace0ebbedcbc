//! Gallery orchestrator: index page → traversal → archive, one gallery at a
//! time. The staging directory is released on every exit path.

use crate::archive::zip_dir;
use crate::config::EhdlConfig;
use crate::error::GalleryError;
use crate::http::HttpClient;
use crate::index::resolve_gallery;
use crate::retry::RetryPolicy;
use crate::storage::WorkArea;
use crate::traversal::{Pacing, Traversal, TraversalReport};
use crate::url_model::normalize_gallery_url;
use std::path::PathBuf;

/// Everything a gallery run needs besides the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryOptions {
    pub policy: RetryPolicy,
    pub pacing: Pacing,
    /// Parent for staging directories (None = system temp dir).
    pub work_parent: Option<PathBuf>,
    /// Where `<basename>.zip` is written.
    pub out_dir: PathBuf,
}

impl GalleryOptions {
    pub fn from_config(cfg: &EhdlConfig, out_dir: PathBuf) -> Self {
        Self {
            policy: cfg.retry_policy(),
            pacing: cfg.pacing(),
            work_parent: cfg.work_parent(),
            out_dir,
        }
    }
}

/// A finished gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOutcome {
    pub url: String,
    pub title: String,
    pub basename: String,
    pub archive: PathBuf,
    pub report: TraversalReport,
}

/// Downloads one gallery and packages it into `<out_dir>/<basename>.zip`.
pub fn download_gallery(
    client: &mut dyn HttpClient,
    opts: &GalleryOptions,
    url: &str,
) -> Result<GalleryOutcome, GalleryError> {
    let url = normalize_gallery_url(url);
    let area = WorkArea::create(opts.work_parent.as_deref(), &url).map_err(GalleryError::WorkArea)?;
    let result = run_in(client, opts, &url, &area);
    let root = area.root().to_path_buf();
    if let Err(e) = area.close() {
        tracing::warn!("could not remove staging directory {}: {}", root.display(), e);
    }
    result
}

fn run_in(
    client: &mut dyn HttpClient,
    opts: &GalleryOptions,
    url: &str,
    area: &WorkArea,
) -> Result<GalleryOutcome, GalleryError> {
    let meta = resolve_gallery(client, &opts.policy, url)?;
    tracing::info!("title: {}", meta.title);

    let dir = area
        .create_gallery_dir(&meta.basename)
        .map_err(GalleryError::WorkArea)?;
    let report = Traversal::new(client, opts.policy, opts.pacing, &dir, &meta.first_page_url).run()?;

    let archive = opts.out_dir.join(format!("{}.zip", meta.basename));
    zip_dir(&dir, &archive).map_err(|source| GalleryError::Archive {
        path: archive.clone(),
        source,
    })?;
    tracing::info!("{} is successfully packaged at {}", url, archive.display());

    Ok(GalleryOutcome {
        url: url.to_string(),
        title: meta.title,
        basename: meta.basename,
        archive,
        report,
    })
}

/// Result of a batch: galleries in input order, split by outcome.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<GalleryOutcome>,
    /// Failed URLs with the gallery error (a [`GalleryError`] underneath).
    pub failed: Vec<(String, anyhow::Error)>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs [`download_gallery`] for every URL in order. A failed gallery is
/// logged and recorded; the remaining URLs are still attempted.
pub fn download_galleries<I, S>(client: &mut dyn HttpClient, opts: &GalleryOptions, urls: I) -> BatchReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = BatchReport::default();
    for url in urls {
        let url = url.as_ref();
        match download_gallery(client, opts, url) {
            Ok(outcome) => batch.completed.push(outcome),
            Err(e) => {
                let e = anyhow::Error::from(e);
                tracing::error!("gallery {} failed: {:#}", url, e);
                batch.failed.push((url.to_string(), e));
            }
        }
    }
    batch
}

/// One URL per line; surrounding whitespace and blank lines are dropped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
