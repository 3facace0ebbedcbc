//! Pagination traversal state machine.
//!
//! The site exposes no page count, so the chain of "next" links is followed
//! until it loops back onto itself:
//!
//! ```text
//! Start ─► FetchingPage ─┬─► RateLimited ─► FetchingPage   (same URL, after the wait)
//!                        ├─► NeedsToken  ─► FetchingPage   (same page + ?nl=<token>)
//!                        └─► Downloading ─┬► FetchingPage  (next page)
//!                                         └► Closed
//! any fatal error ─► Failed
//! ```
//!
//! All I/O goes through the injected [`HttpClient`]; sleeps are blocking.

mod decide;


pub use decide::{chain_closed, decide, PageAction, RATE_LIMIT_MARKER, TOKEN_MARKER, TOKEN_PARAM};

use crate::downloader::download_image;
use crate::error::GalleryError;
use crate::http::HttpClient;
use crate::page::{fetch_page, PageInfo};
use crate::retry::RetryPolicy;
use std::path::Path;
use std::time::Duration;

/// Named states of the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Start,
    FetchingPage,
    RateLimited,
    NeedsToken,
    Downloading,
    /// Chain looped back; every image is on disk.
    Closed,
    /// A fatal error aborted the gallery.
    Failed,
}

impl TraversalState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TraversalState::Closed | TraversalState::Failed)
    }
}

/// The two blocking delays of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after the rate-limit marker before fetching the page again.
    pub rate_limit_wait: Duration,
    /// Politeness delay before each image download.
    pub page_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            rate_limit_wait: Duration::from_secs(60),
            page_delay: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            rate_limit_wait: Duration::ZERO,
            page_delay: Duration::ZERO,
        }
    }
}

/// Counters for one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalReport {
    pub pages_fetched: usize,
    pub images_downloaded: usize,
    /// Images already on disk with the right size.
    pub images_reused: usize,
    pub rate_limit_waits: usize,
    pub token_retries: usize,
}

/// State plus the data that state carries into its next transition.
#[derive(Debug)]
enum Phase {
    Start,
    FetchingPage,
    RateLimited,
    NeedsToken { url: String },
    Downloading { page: PageInfo },
    Closed,
    Failed,
}

impl Phase {
    fn state(&self) -> TraversalState {
        match self {
            Phase::Start => TraversalState::Start,
            Phase::FetchingPage => TraversalState::FetchingPage,
            Phase::RateLimited => TraversalState::RateLimited,
            Phase::NeedsToken { .. } => TraversalState::NeedsToken,
            Phase::Downloading { .. } => TraversalState::Downloading,
            Phase::Closed => TraversalState::Closed,
            Phase::Failed => TraversalState::Failed,
        }
    }
}

/// Walks one gallery's page chain, downloading every image into `dest`.
pub struct Traversal<'a> {
    client: &'a mut dyn HttpClient,
    policy: RetryPolicy,
    pacing: Pacing,
    dest: &'a Path,
    start_url: String,
    current_url: String,
    phase: Phase,
    history: Vec<TraversalState>,
    report: TraversalReport,
}

impl<'a> Traversal<'a> {
    pub fn new(
        client: &'a mut dyn HttpClient,
        policy: RetryPolicy,
        pacing: Pacing,
        dest: &'a Path,
        first_page_url: &str,
    ) -> Self {
        Self {
            client,
            policy,
            pacing,
            dest,
            start_url: first_page_url.to_string(),
            current_url: first_page_url.to_string(),
            phase: Phase::Start,
            history: vec![TraversalState::Start],
            report: TraversalReport::default(),
        }
    }

    pub fn state(&self) -> TraversalState {
        self.phase.state()
    }

    /// URL the next `FetchingPage` step will request.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Every state entered so far, starting with `Start`.
    pub fn history(&self) -> &[TraversalState] {
        &self.history
    }

    pub fn report(&self) -> &TraversalReport {
        &self.report
    }

    /// Runs until the chain closes.
    pub fn run(mut self) -> Result<TraversalReport, GalleryError> {
        loop {
            if self.step()? == TraversalState::Closed {
                tracing::info!(
                    "traversal closed: {} pages, {} images downloaded, {} reused",
                    self.report.pages_fetched,
                    self.report.images_downloaded,
                    self.report.images_reused
                );
                return Ok(self.report);
            }
        }
    }

    /// Performs one transition and returns the state entered.
    /// Terminal states are sticky.
    pub fn step(&mut self) -> Result<TraversalState, GalleryError> {
        if self.state().is_terminal() {
            return Ok(self.state());
        }
        let phase = std::mem::replace(&mut self.phase, Phase::Failed);
        match self.advance(phase) {
            Ok(next) => Ok(self.enter(next)),
            Err(e) => {
                self.enter(Phase::Failed);
                Err(e)
            }
        }
    }

    fn enter(&mut self, phase: Phase) -> TraversalState {
        let state = phase.state();
        self.history.push(state);
        self.phase = phase;
        state
    }

    fn advance(&mut self, phase: Phase) -> Result<Phase, GalleryError> {
        match phase {
            Phase::Start => Ok(Phase::FetchingPage),
            Phase::FetchingPage => {
                tracing::debug!("fetching page {}", self.current_url);
                let page = fetch_page(self.client, &self.policy, &self.current_url)?;
                self.report.pages_fetched += 1;
                Ok(match decide(&self.current_url, &page) {
                    PageAction::Wait => Phase::RateLimited,
                    PageAction::Refetch { url } => Phase::NeedsToken { url },
                    PageAction::Download => Phase::Downloading { page },
                })
            }
            Phase::RateLimited => {
                tracing::warn!(
                    "509 bandwidth exceeded at {}; waiting {:?}",
                    self.current_url,
                    self.pacing.rate_limit_wait
                );
                std::thread::sleep(self.pacing.rate_limit_wait);
                self.report.rate_limit_waits += 1;
                Ok(Phase::FetchingPage)
            }
            Phase::NeedsToken { url } => {
                tracing::info!("image needs an access token; refetching {}", url);
                self.current_url = url;
                self.report.token_retries += 1;
                Ok(Phase::FetchingPage)
            }
            Phase::Downloading { page } => {
                std::thread::sleep(self.pacing.page_delay);
                let image = download_image(self.client, &self.policy, self.dest, &page.image_url)?;
                if image.fresh {
                    self.report.images_downloaded += 1;
                } else {
                    self.report.images_reused += 1;
                }
                if chain_closed(&self.current_url, &page.next_page_url, &self.start_url) {
                    tracing::info!("{} is successfully downloaded", self.current_url);
                    Ok(Phase::Closed)
                } else {
                    self.current_url = page.next_page_url;
                    Ok(Phase::FetchingPage)
                }
            }
            Phase::Closed => Ok(Phase::Closed),
            Phase::Failed => Ok(Phase::Failed),
        }
    }
}
