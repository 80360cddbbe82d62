//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the process hosting the contracts. `init_logging` is the standard
//! way to do that: an `EnvFilter` (honouring `RUST_LOG` first) and either a
//! plain or a JSON formatting layer.

use crate::errors::{RecordError, RecordResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output format of the formatting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `info` or
    /// `recordcore=debug`
    pub filter: String,
    /// Output format
    pub format: LogFormat,
    /// Whether to include file and line of the call site
    pub include_source: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Plain,
            include_source: false,
        }
    }
}

impl LoggingConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Switches to JSON output.
    #[must_use]
    pub const fn with_json_format(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Includes source locations.
    #[must_use]
    pub const fn with_source_location(mut self) -> Self {
        self.include_source = true;
        self
    }

    fn env_filter(&self) -> RecordResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|error| RecordError::Configuration(format!("log filter: {error}"))),
        }
    }
}

/// Installs the global tracing subscriber described by `config`.
///
/// Fails if the filter directive is invalid or a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> RecordResult<()> {
    let filter = config.env_filter()?;

    let json_layer = (config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_source)
            .with_line_number(config.include_source)
    });
    let plain_layer = (config.format == LogFormat::Plain).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.include_source)
            .with_line_number(config.include_source)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .try_init()
        .map_err(|error| RecordError::Configuration(format!("logging already initialized: {error}")))
}
