use crate::http::SessionOptions;
use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::storage::default_work_parent;
use crate::traversal::Pacing;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: secs(self.base_delay_secs, Duration::from_millis(250)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/ehdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EhdlConfig {
    /// Seconds to wait after the site serves its bandwidth-exceeded image.
    pub rate_limit_wait_secs: f64,
    /// Seconds to sleep before each image download.
    pub page_delay_secs: f64,
    pub connect_timeout_secs: u64,
    /// Abort a transfer that receives nothing for this many seconds.
    pub read_timeout_secs: u64,
    /// Where staging directories are created (None = /dev/shm if present, else the system temp dir).
    #[serde(default)]
    pub work_dir_parent: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for EhdlConfig {
    fn default() -> Self {
        Self {
            rate_limit_wait_secs: 60.0,
            page_delay_secs: 1.0,
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
            work_dir_parent: None,
            retry: None,
        }
    }
}

impl EhdlConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn pacing(&self) -> Pacing {
        let defaults = Pacing::default();
        Pacing {
            rate_limit_wait: secs(self.rate_limit_wait_secs, defaults.rate_limit_wait),
            page_delay: secs(self.page_delay_secs, defaults.page_delay),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }

    /// Explicit `work_dir_parent`, else `/dev/shm` when it exists.
    pub fn work_parent(&self) -> Option<PathBuf> {
        self.work_dir_parent.clone().or_else(default_work_parent)
    }
}

/// Negative or non-finite values fall back to `default`.
fn secs(value: f64, default: Duration) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|_| {
        tracing::warn!("ignoring invalid duration {} in config", value);
        default
    })
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ehdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EhdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EhdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: EhdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
