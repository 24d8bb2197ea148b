//! Logging setup for hosts that embed object enablers.
//!
//! The crate emits events under three targets: `lwm2m_client::enabler` for
//! dispatched operations, `lwm2m_client::instance` for executed resources,
//! and `lwm2m_client::initializer` for enabler construction. A host that has
//! no subscriber of its own can call [`initialise`] to route them to stderr
//! in the format [`EnablerConfig`] selects.

use std::io::{self, IsTerminal};

use lwm2m_config::{EnablerConfig, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that enabler events reach a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors raised while installing the enabler's subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter, such as `lwm2m_client::enabler=debug`, does not
    /// parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// The host installed its own global subscriber first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Routes enabler events to stderr using `config`.
///
/// Only the first call installs anything. Later calls succeed with a new
/// [`TelemetryHandle`] and ignore their configuration.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when [`EnablerConfig::log_filter`] is
/// not a valid directive list, and [`TelemetryError::Subscriber`] when a
/// global subscriber already exists.
///
/// # Examples
///
/// ```rust
/// use lwm2m_client::telemetry;
/// use lwm2m_config::{EnablerConfig, LogFormat};
///
/// # fn main() -> Result<(), lwm2m_client::telemetry::TelemetryError> {
/// let config = EnablerConfig::default()
///     .with_log_filter("lwm2m_client::enabler=debug")
///     .with_log_format(LogFormat::Compact);
/// telemetry::initialise(&config)?;
/// telemetry::initialise(&EnablerConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &EnablerConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn enabler_filter(config: &EnablerConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &EnablerConfig) -> Result<(), TelemetryError> {
    let filter = enabler_filter(config)?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
