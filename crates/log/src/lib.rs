//! # reuse-log
//!
//! One-call `tracing` subscriber setup for the reuse tools.
//!
//! Records go to stderr so that program output on stdout stays clean. The
//! filter comes from `REUSE_LOG` (or `RUST_LOG`), the layout from
//! `REUSE_LOG_FORMAT` (`pretty`, `compact` or `json`).
//!
//! ```no_run
//! use reuse_log::{Format, LogConfig};
//!
//! let config = LogConfig::from_env().with_format(Format::Json);
//! reuse_log::init_with(config)?;
//! tracing::info!("ready");
//! # Ok::<(), reuse_log::LogError>(())
//! ```

mod builder;
mod config;
mod error;

pub use builder::LoggerBuilder;
pub use config::{DisplayConfig, Format, LogConfig};
pub use error::{LogError, LogResult};

/// Install the global subscriber configured from the environment
pub fn init() -> LogResult<()> {
    init_with(LogConfig::from_env())
}

/// Install the global subscriber with an explicit configuration
pub fn init_with(config: LogConfig) -> LogResult<()> {
    LoggerBuilder::from_config(config).build()
}
