//! Log subscriber setup shared by the Roundabout binaries.
//!
//! [`init`] installs a `tracing-subscriber` registry with an `EnvFilter`
//! (`RUST_LOG` takes precedence over the given default) and a `fmt` layer,
//! and bridges `log` records emitted by dependencies such as `sqlx`.

use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-line output for terminals.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Builds the filter used by [`init`].
///
/// `RUST_LOG` wins when it is set and valid; otherwise `default_filter` applies.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs the global subscriber. Call once at startup.
pub fn init(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let registry = Registry::default().with(env_filter(default_filter));
    match format {
        LogFormat::Pretty => set_global_default(registry.with(fmt::layer().pretty()))?,
        LogFormat::Json => set_global_default(
            registry.with(fmt::layer().json().with_current_span(true)),
        )?,
    }

    LogTracer::init()?;
    Ok(())
}
