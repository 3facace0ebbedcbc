//! CLI for the ehdl gallery downloader.

mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use ehdl_core::config;
use std::path::PathBuf;

use commands::{run_config, run_get, run_zip};

/// Top-level CLI for the ehdl gallery downloader.
#[derive(Debug, Parser)]
#[command(name = "ehdl")]
#[command(about = "ehdl: download paginated image galleries into zip archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download galleries and package each into `<title>.zip`.
    #[command(group(ArgGroup::new("source").required(true).args(["urls", "list"])))]
    Get {
        /// Gallery URLs, processed in order.
        #[arg(short = 'u', long = "urls", num_args = 1.., value_name = "URL")]
        urls: Vec<String>,
        /// File with one gallery URL per line (blank lines ignored).
        #[arg(short = 'l', long = "list", value_name = "FILE")]
        list: Option<PathBuf>,
        /// Directory the archives are written to (default: current directory).
        #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Package a directory (or a single file) into a zip archive.
    Zip {
        /// Directory or file to package.
        path: PathBuf,
        /// Output archive (default: `<name>.zip` in the current directory).
        #[arg(short = 'o', long = "output", value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                urls,
                list,
                output_dir,
            } => {
                let out_dir = match output_dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_get(&cfg, urls, list.as_deref(), out_dir)?;
            }
            CliCommand::Zip { path, output } => run_zip(&path, output)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
