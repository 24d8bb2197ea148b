//! Core value types for the LWM2M object tree.
//!
//! This crate holds the vocabulary shared by the object enabler and the
//! components around it: numeric identifiers, addressable paths, resource
//! values and nodes, static object models, caller identities, typed requests,
//! and operation results. Nothing here owns mutable device state; the
//! `lwm2m-client` crate builds the dispatcher on top of these types.
//!
//! # Core types
//!
//! - [`LwM2mPath`]: root, object, instance, or resource target
//! - [`LwM2mNode`] and friends: object, instance, and resource snapshots
//! - [`ObjectModel`] and [`ResourceModel`]: read-only capability descriptions
//! - [`ServerIdentity`]: who is calling
//! - request types such as [`WriteRequest`] and the [`ResponseError`]
//!   taxonomy shared by every operation
//!
//! # Example
//!
//! ```
//! use lwm2m_core::LwM2mPath;
//!
//! let path: LwM2mPath = "3/0/1".parse().expect("valid path");
//! assert_eq!(path, LwM2mPath::resource(3, 0, 1));
//! assert_eq!(path.to_string(), "3/0/1");
//! ```

mod identity;
mod ids;
mod model;
mod node;
mod path;
mod request;
mod response;

pub use identity::ServerIdentity;
pub use ids::{InstanceId, ObjectId, ResourceId, SECURITY_BOOTSTRAP_RESOURCE, SECURITY_OBJECT_ID};
pub use model::{
    ModelError, ModelProvider, ModelRegistry, ObjectModel, Operations, ResourceModel, ResourceType,
};
pub use node::{
    LwM2mNode, LwM2mObject, LwM2mObjectInstance, LwM2mResource, ResourceValue, Value,
};
pub use path::{LwM2mPath, PathParseError};
pub use request::{
    BootstrapDeleteRequest, BootstrapWriteRequest, BootstrapWriteTarget, CreateRequest,
    DeleteRequest, ExecuteRequest, ObserveRequest, ReadRequest, RequestError, WriteMode,
    WriteRequest, WriteTarget,
};
pub use response::{
    BootstrapDeleteResponse, BootstrapWriteResponse, CreateResponse, DeleteResponse,
    ExecuteResponse, ObserveResponse, ReadResponse, ResponseCode, ResponseError, WriteResponse,
};

#[cfg(test)]
mod tests;
