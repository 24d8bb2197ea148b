//! Built-in defaults applied when a setting is absent.

use lwm2m_core::{ObjectId, SECURITY_OBJECT_ID};

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Object id of the Security object unless overridden.
#[must_use]
pub const fn default_security_object_id() -> ObjectId {
    SECURITY_OBJECT_ID
}
