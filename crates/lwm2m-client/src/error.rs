//! Errors raised while assembling object enablers.
//!
//! Request-level failures are [`lwm2m_core::ResponseError`] values; the
//! errors here only arise while wiring enablers together.

use lwm2m_core::ObjectId;
use thiserror::Error;

/// Errors raised while constructing object enablers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnablerError {
    /// The model provider has no model for the object.
    #[error("no object model registered for object {object_id}")]
    UnknownObject {
        /// Requested object id.
        object_id: ObjectId,
    },

    /// A single-instance object was seeded with several instances.
    #[error("object {object_id} is single-instance but {count} instances were supplied")]
    TooManyInstances {
        /// Object being seeded.
        object_id: ObjectId,
        /// Number of supplied instances.
        count: usize,
    },
}

impl EnablerError {
    /// Creates an unknown-object error.
    #[must_use]
    pub const fn unknown_object(object_id: ObjectId) -> Self {
        Self::UnknownObject { object_id }
    }
}
