//! `ehdl config` – show the config file path and effective settings.

use anyhow::Result;
use ehdl_core::config::{config_path, EhdlConfig};

pub fn run_config(cfg: &EhdlConfig) -> Result<()> {
    let policy = cfg.retry_policy();
    let pacing = cfg.pacing();
    let session = cfg.session_options();
    println!("config file:       {}", config_path()?.display());
    println!("rate limit wait:   {:?}", pacing.rate_limit_wait);
    println!("page delay:        {:?}", pacing.page_delay);
    println!("connect timeout:   {:?}", session.connect_timeout);
    println!("read timeout:      {:?}", session.read_timeout);
    println!(
        "staging parent:    {}",
        cfg.work_parent()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "system temp dir".to_string())
    );
    println!(
        "retry:             {} attempts, backoff {:?}..{:?}",
        policy.max_attempts, policy.base_delay, policy.max_delay
    );
    Ok(())
}
