//! Log output for the roomboard binaries.
//!
//! `RUST_LOG` always wins. Without it, roomboard crates and `tower_http`
//! log at [`TracingConfig::level`] and everything else stays quiet.
//!
//! ```ignore
//! use roomboard_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::from_flags(json, debug))?;
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),

    /// The filter directive does not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// Unknown output format name.
    #[error("unknown log format {0:?} (expected pretty, compact or json)")]
    UnknownFormat(String),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingOutputFormat {
    /// Multi-line, colored; for a terminal.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// JSON lines, for log shippers.
    Json,
}

impl FromStr for TracingOutputFormat {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TracingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Logging setup.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for roomboard and HTTP request logs when `RUST_LOG` is unset.
    pub level: Level,
    /// Rendering.
    pub format: TracingOutputFormat,
    /// Add source file and line to each event.
    pub with_location: bool,
    /// Emit an event when a span closes, carrying its busy/idle time.
    pub span_timings: bool,
    /// Explicit filter directive; takes precedence over `level` but not
    /// over `RUST_LOG`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Compact,
            with_location: false,
            span_timings: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Picks a setup from the `--log-json` and `--debug` flags.
    ///
    /// JSON output carries span timings and source locations; debug output
    /// is pretty-printed at DEBUG.
    pub fn from_flags(json: bool, debug: bool) -> Self {
        let level = if debug { Level::DEBUG } else { Level::INFO };
        if json {
            return Self {
                level,
                format: TracingOutputFormat::Json,
                with_location: true,
                span_timings: true,
                filter: None,
            };
        }
        if debug {
            return Self {
                level,
                format: TracingOutputFormat::Pretty,
                with_location: true,
                ..Self::default()
            };
        }
        Self::default()
    }

    /// Overrides the rendering picked by [`from_flags`](Self::from_flags).
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets an explicit filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The directive used when `RUST_LOG` is unset.
    pub fn filter_directive(&self) -> String {
        match &self.filter {
            Some(filter) => filter.clone(),
            None => format!("warn,roomboard={0},tower_http={0}", self.level),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.filter_directive())?),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.with_location)
            .with_line_number(self.with_location)
            .with_span_events(span_events);

        match self.format {
            TracingOutputFormat::Pretty => layer.pretty().boxed(),
            TracingOutputFormat::Compact => layer.compact().boxed(),
            TracingOutputFormat::Json => layer.json().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()?;
    Ok(())
}
