//! Operation results shared by the enabler and instance implementations.
//!
//! Every operation returns `Result<Payload, ResponseError>`. The aliases below
//! name the payload per operation so signatures read like the protocol.

use std::fmt;

use thiserror::Error;

use crate::node::LwM2mNode;
use crate::path::LwM2mPath;

/// Protocol-level outcome code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// An instance was created.
    Created,
    /// An instance was deleted.
    Deleted,
    /// A write or execute was applied.
    Changed,
    /// A read or observe returned content.
    Content,
    /// The request is semantically invalid.
    BadRequest,
    /// The caller may not perform the request.
    Unauthorized,
    /// The target does not exist.
    NotFound,
    /// The target does not support the operation.
    MethodNotAllowed,
    /// The instance failed while handling the request.
    InternalServerError,
}

impl ResponseCode {
    /// Returns `true` for failure codes.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(
            self,
            Self::Created | Self::Deleted | Self::Changed | Self::Content
        )
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "CREATED",
            Self::Deleted => "DELETED",
            Self::Changed => "CHANGED",
            Self::Content => "CONTENT",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        };
        formatter.write_str(label)
    }
}

/// Failure outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The target instance or resource does not exist.
    #[error("not found")]
    NotFound,

    /// The request is semantically invalid.
    #[error("bad request: {reason}")]
    BadRequest {
        /// Human-readable reason.
        reason: String,
    },

    /// The caller may not perform the request.
    #[error("unauthorized")]
    Unauthorized,

    /// The target does not support the operation.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The instance failed while handling the request.
    #[error("internal server error: {message}")]
    InternalServerError {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl ResponseError {
    /// Creates a bad-request error.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    /// Creates an internal-server-error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalServerError {
            message: message.into(),
        }
    }

    /// Returns the protocol code for this failure.
    #[must_use]
    pub const fn code(&self) -> ResponseCode {
        match self {
            Self::NotFound => ResponseCode::NotFound,
            Self::BadRequest { .. } => ResponseCode::BadRequest,
            Self::Unauthorized => ResponseCode::Unauthorized,
            Self::MethodNotAllowed => ResponseCode::MethodNotAllowed,
            Self::InternalServerError { .. } => ResponseCode::InternalServerError,
        }
    }
}

/// Result of a create: the path of the new instance.
pub type CreateResponse = Result<LwM2mPath, ResponseError>;

/// Result of a read.
pub type ReadResponse = Result<LwM2mNode, ResponseError>;

/// Result of an observe.
pub type ObserveResponse = Result<LwM2mNode, ResponseError>;

/// Result of a write.
pub type WriteResponse = Result<(), ResponseError>;

/// Result of a bootstrap write.
pub type BootstrapWriteResponse = Result<(), ResponseError>;

/// Result of an execute.
pub type ExecuteResponse = Result<(), ResponseError>;

/// Result of a delete.
pub type DeleteResponse = Result<(), ResponseError>;

/// Result of a bootstrap delete.
pub type BootstrapDeleteResponse = Result<(), ResponseError>;
