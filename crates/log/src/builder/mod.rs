//! Logger builder implementation

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{Format, LogConfig};
use crate::error::{LogError, LogResult};

type Filtered = Layered<EnvFilter, Registry>;
type FmtLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Build a boxed stderr `fmt` layer in the given style.
/// Dropping the timer changes the layer type, hence the two boxed branches.
macro_rules! create_fmt_layer {
    ($style:ident, $display:expr) => {{
        let display = $display;
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .$style();
        let boxed: FmtLayer = if display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        };
        boxed
    }};
}

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: LogConfig,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: LogConfig) -> Self {
        Self { config }
    }

    /// Parse the filter directive without installing anything
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// - `Filter` if the filter string cannot be parsed
    /// - `Init` if a global subscriber is already set
    pub fn build(self) -> LogResult<()> {
        let filter = self.filter()?;

        let fmt_layer = match self.config.format {
            Format::Pretty => create_fmt_layer!(pretty, &self.config.display),
            Format::Compact => create_fmt_layer!(compact, &self.config.display),
            Format::Json => create_fmt_layer!(json, &self.config.display),
        };

        Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?;

        tracing::debug!(
            level = %self.config.level,
            format = %self.config.format,
            "logger initialized"
        );
        Ok(())
    }
}
