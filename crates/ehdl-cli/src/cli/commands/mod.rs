//! CLI command handlers, one file per subcommand.

mod config;
pub(super) mod get;
mod zip;

pub use config::run_config;
pub use get::run_get;
pub use zip::run_zip;
