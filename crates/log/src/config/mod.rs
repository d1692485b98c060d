//! Logger configuration

mod presets;

use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Record layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// One line per record
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(LogError::Format(s.to_owned())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Which parts of a record are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub colors: bool,
    pub time: bool,
    pub target: bool,
    /// File and line of the call site
    pub source: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            time: true,
            target: true,
            source: false,
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `reuse_pool=trace,warn`
    pub level: String,
    pub format: Format,
    pub display: DisplayConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl LogConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case("COMPACT", Format::Compact)]
    #[case(" json ", Format::Json)]
    fn test_format_parse(#[case] raw: &str, #[case] expected: Format) {
        assert_eq!(raw.parse::<Format>(), Ok(expected));
    }

    #[test]
    fn test_format_parse_unknown() {
        assert_eq!("logfmt".parse::<Format>(), Err(LogError::Format("logfmt".into())));
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_format(Format::Pretty);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format.to_string(), "pretty");
    }
}
