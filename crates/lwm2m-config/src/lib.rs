//! Shared configuration for the object enabler and its telemetry.
//!
//! The enabler is a library, so this crate does not decide where settings come
//! from. [`EnablerConfig`] deserializes from any `serde` source the host
//! application already reads (a TOML file, JSON, environment mapping) and
//! falls back to the built-in defaults in [`defaults`] for missing fields.

pub mod defaults;
mod logging;

use lwm2m_core::ObjectId;
use serde::{Deserialize, Serialize};

pub use defaults::{default_log_filter, default_log_format, default_security_object_id};
pub use logging::LogFormat;

/// Settings consumed by the enabler crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnablerConfig {
    log_filter: String,
    log_format: LogFormat,
    security_object_id: ObjectId,
}

impl EnablerConfig {
    /// Returns the `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the object id treated as the Security object.
    #[must_use]
    pub const fn security_object_id(&self) -> ObjectId {
        self.security_object_id
    }

    /// Overrides the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Overrides the Security object id.
    #[must_use]
    pub const fn with_security_object_id(mut self, object_id: ObjectId) -> Self {
        self.security_object_id = object_id;
        self
    }
}

impl Default for EnablerConfig {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: default_log_format(),
            security_object_id: default_security_object_id(),
        }
    }
}
