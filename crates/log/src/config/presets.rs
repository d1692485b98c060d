//! Configuration presets for common scenarios

use super::{DisplayConfig, Format, LogConfig};

/// Filter variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "REUSE_LOG";
/// Format variable
pub const LOG_FORMAT_ENV: &str = "REUSE_LOG_FORMAT";

impl LogConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // REUSE_LOG, then RUST_LOG
        if let Some(level) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        // Unknown names fall back to compact
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                ..DisplayConfig::default()
            },
        }
    }

    /// Test configuration
    #[cfg(test)]
    pub(crate) fn test() -> Self {
        Self {
            level: "trace".to_owned(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
        }
    }
}
