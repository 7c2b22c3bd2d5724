//! Telemetry initialization.
//!
//! Installs the `tracing` subscriber that receives the crate's logs and spans.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default log level
    pub default_level: Level,
    /// Whether to log span close events (carries per-call duration)
    pub include_span_events: bool,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
    /// Whether to use compact format
    pub compact: bool,
    /// Custom filter directive (overrides default_level if set)
    pub filter_directive: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_span_events: false,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            compact: true,
            filter_directive: None,
        }
    }
}

impl TelemetryConfig {
    /// Create a development configuration (more verbose).
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_span_events: true,
            include_file_line: true,
            include_target: true,
            ansi_colors: true,
            compact: false,
            filter_directive: None,
        }
    }

    /// Create a production configuration (minimal overhead).
    pub fn production() -> Self {
        Self {
            default_level: Level::WARN,
            include_span_events: false,
            include_file_line: false,
            include_target: false,
            ansi_colors: false,
            compact: true,
            filter_directive: None,
        }
    }

    fn filter(&self) -> anyhow::Result<EnvFilter> {
        let filter = match self.filter_directive {
            Some(ref directive) => EnvFilter::try_new(directive)?,
            None => EnvFilter::from_default_env()
                .add_directive(self.default_level.into())
                .add_directive(format!("mqtt_tracer={}", self.default_level).parse()?),
        };
        Ok(filter)
    }
}

/// Guard that keeps the telemetry subscriber active.
pub struct TelemetryGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Initialize telemetry with the given configuration.
///
/// Host applications that already install their own subscriber should skip
/// this; the crate only emits through `tracing` macros.
///
/// # Example
///
/// ```rust,ignore
/// use mqtt_tracer::telemetry::{init_telemetry, TelemetryConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let _guard = init_telemetry(&TelemetryConfig::development())?;
///     Ok(())
/// }
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let filter = config.filter()?;

    let span_events = if config.include_span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events);

    let fmt_layer = if config.compact {
        fmt_layer.compact().boxed()
    } else {
        fmt_layer.boxed()
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { _private: () })
}
