//! Caller identity attached to every inbound request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Principal on whose behalf an operation runs.
///
/// The identity decides which model permissions apply. [`Self::System`] is
/// the trusted in-process caller and bypasses every read and write check.
/// [`Self::Server`] is an ordinary management server and is bound by the
/// readable and writable flags of the object model. [`Self::Bootstrap`] may
/// write anything but cannot remove the bootstrap-server account.
///
/// # Example
///
/// ```
/// use lwm2m_core::ServerIdentity;
///
/// assert!(ServerIdentity::System.is_system());
/// assert!(!ServerIdentity::Bootstrap.is_server());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerIdentity {
    /// The client itself, acting internally.
    System,
    /// An ordinary management server.
    Server,
    /// The bootstrap server.
    Bootstrap,
}

impl ServerIdentity {
    /// Returns `true` for the internal system caller.
    #[must_use]
    pub const fn is_system(self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns `true` for an ordinary management server.
    #[must_use]
    pub const fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }

    /// Returns `true` for the bootstrap server.
    #[must_use]
    pub const fn is_bootstrap(self) -> bool {
        matches!(self, Self::Bootstrap)
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::System => "system",
            Self::Server => "server",
            Self::Bootstrap => "bootstrap",
        };
        formatter.write_str(label)
    }
}
