//! `reuse` - print selected values from a `key=value` configuration file
//!
//! ```bash
//! # Host and port from ./config.txt
//! reuse
//!
//! # Other keys, other file, pool events on stderr
//! REUSE_LOG=reuse_pool=trace reuse -c app.conf --trace-pool user timeout
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reuse_config::ConfigMap;
use reuse_log::{Format, LogConfig};
use reuse_pool::config::parse_capacity;
use reuse_pool::{PoolAllocator, PoolConfig, TracingHook};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "reuse")]
#[command(version)]
#[command(about = "Print values from a key/value configuration file", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.txt", env = "REUSE_CONFIG")]
    config: PathBuf,

    /// Entries the pool can hold
    #[arg(long, env = "REUSE_POOL_CAPACITY", value_parser = parse_capacity)]
    capacity: Option<usize>,

    /// Report every pool block event at trace level
    #[arg(long)]
    trace_pool: bool,

    /// Log layout: pretty, compact or json
    #[arg(long, env = "REUSE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Keys to print, in order
    #[arg(default_values_t = ["host".to_owned(), "port".to_owned()])]
    keys: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load(&cli)?;
    for key in &cli.keys {
        println!("{}: {}", label(key), config.value_or_empty(key));
    }

    let stats = config.pool_stats();
    debug!(
        entries = config.len(),
        capacity = stats.capacity,
        reused = stats.reused,
        "done"
    );
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut log = LogConfig::from_env();
    if let Some(raw) = &cli.log_format {
        log.format = raw.parse::<Format>()?;
    }
    if cli.trace_pool {
        log.level = format!("{},reuse_pool=trace", log.level);
    }
    reuse_log::init_with(log).context("failed to initialize logging")
}

fn load(cli: &Cli) -> Result<ConfigMap> {
    let mut pool = PoolConfig::default();
    if let Some(capacity) = cli.capacity {
        pool = pool.with_capacity(capacity);
    }

    let alloc = if cli.trace_pool {
        PoolAllocator::with_hook(pool, TracingHook)?
    } else {
        PoolAllocator::with_config(pool)?
    };

    let mut config = ConfigMap::with_allocator(alloc);
    config
        .parse_file(&cli.config)
        .with_context(|| format!("failed to read {}", cli.config.display()))?;
    Ok(config)
}

/// `host` -> `Host`
fn label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label("host"), "Host");
        assert_eq!(label("Port"), "Port");
        assert_eq!(label("ßx"), "SSx");
        assert_eq!(label(""), "");
    }

    #[test]
    fn test_default_keys() {
        let cli = Cli::try_parse_from(["reuse"]).unwrap();
        assert_eq!(cli.keys, ["host", "port"]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Cli::try_parse_from(["reuse", "--capacity", "0"]).is_err());
    }
}
