//! Output format of the enabler's `tracing` events.
//!
//! Enabler events carry the object id, the target path, and the caller
//! identity as fields. [`LogFormat::Json`] keeps them machine-readable for a
//! device's log shipper; [`LogFormat::Compact`] suits a developer watching a
//! client on a terminal.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How [`crate::EnablerConfig`] asks for events to be rendered.
///
/// Parsed case-insensitively from `json` or `compact`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, with event fields flattened to the top.
    #[default]
    Json,
    /// One line of text per event.
    Compact,
}
