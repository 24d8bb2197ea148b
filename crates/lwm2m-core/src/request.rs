//! Typed requests handed to an object enabler.
//!
//! Each request type only admits the path granularities its operation
//! supports. Requests that pair a path with a node validate the pairing at
//! construction so the enabler never sees an instance node aimed at a
//! resource path.

use thiserror::Error;

use crate::ids::{InstanceId, ObjectId, ResourceId};
use crate::node::{LwM2mNode, LwM2mObject, LwM2mObjectInstance, LwM2mResource};
use crate::path::LwM2mPath;

/// Errors raised when a request pairs a path with an unsuitable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The operation cannot target this path granularity.
    #[error("{operation} cannot target path {path}")]
    UnsupportedPath {
        /// Operation label.
        operation: &'static str,
        /// Rejected path.
        path: LwM2mPath,
    },

    /// The node level does not match the path granularity.
    #[error("{operation} at {path} cannot carry a {found} node")]
    NodeMismatch {
        /// Operation label.
        operation: &'static str,
        /// Target path.
        path: LwM2mPath,
        /// Level of the supplied node.
        found: &'static str,
    },

    /// The node id differs from the id named by the path.
    #[error("{operation} at {path} carries a node with id {node_id}")]
    IdMismatch {
        /// Operation label.
        operation: &'static str,
        /// Target path.
        path: LwM2mPath,
        /// Id of the supplied node.
        node_id: u16,
    },
}

/// How an instance-level write treats resources the request omits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Unsupplied writable resources are reset to their defaults.
    Replace,
    /// Unsupplied resources are left untouched.
    Update,
}

/// Creates a new instance, optionally with a caller-chosen id.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    object_id: ObjectId,
    instance_id: Option<InstanceId>,
    resources: Vec<LwM2mResource>,
}

impl CreateRequest {
    /// Creates an instance whose id the enabler assigns.
    #[must_use]
    pub fn new(object_id: ObjectId, resources: impl IntoIterator<Item = LwM2mResource>) -> Self {
        Self {
            object_id,
            instance_id: None,
            resources: resources.into_iter().collect(),
        }
    }

    /// Creates an instance with the given id.
    #[must_use]
    pub fn with_instance_id(
        object_id: ObjectId,
        instance_id: InstanceId,
        resources: impl IntoIterator<Item = LwM2mResource>,
    ) -> Self {
        Self {
            object_id,
            instance_id: Some(instance_id),
            resources: resources.into_iter().collect(),
        }
    }

    /// Creates an instance mirroring a snapshot, id included.
    #[must_use]
    pub fn from_instance(object_id: ObjectId, instance: LwM2mObjectInstance) -> Self {
        let instance_id = instance.id();
        Self::with_instance_id(object_id, instance_id, instance.into_resources().into_values())
    }

    /// Returns the target object path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        LwM2mPath::object(self.object_id)
    }

    /// Returns the requested instance id, if any.
    #[must_use]
    pub const fn instance_id(&self) -> Option<InstanceId> {
        self.instance_id
    }

    /// Returns the initial resources.
    #[must_use]
    pub fn resources(&self) -> &[LwM2mResource] {
        &self.resources
    }

    /// Consumes the request, returning the initial resources.
    #[must_use]
    pub fn into_resources(self) -> Vec<LwM2mResource> {
        self.resources
    }
}

/// Reads an object, instance, or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    path: LwM2mPath,
}

impl ReadRequest {
    /// Builds a read of `path`.
    #[must_use]
    pub const fn new(path: LwM2mPath) -> Self {
        Self { path }
    }

    /// Returns the target path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        self.path
    }
}

/// Reads and registers an observation on an object, instance, or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveRequest {
    path: LwM2mPath,
}

impl ObserveRequest {
    /// Builds an observation of `path`.
    #[must_use]
    pub const fn new(path: LwM2mPath) -> Self {
        Self { path }
    }

    /// Returns the target path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        self.path
    }
}

/// Payload of an ordinary write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteTarget {
    /// Instance-level write of several resources.
    Instance(LwM2mObjectInstance),
    /// Single-resource write.
    Resource {
        /// Owning instance.
        instance_id: InstanceId,
        /// New resource content.
        resource: LwM2mResource,
    },
}

/// Writes one instance or one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    mode: WriteMode,
    object_id: ObjectId,
    target: WriteTarget,
}

impl WriteRequest {
    /// Builds an instance-level write.
    #[must_use]
    pub const fn instance(
        mode: WriteMode,
        object_id: ObjectId,
        instance: LwM2mObjectInstance,
    ) -> Self {
        Self {
            mode,
            object_id,
            target: WriteTarget::Instance(instance),
        }
    }

    /// Builds a single-resource write.
    #[must_use]
    pub const fn resource(
        object_id: ObjectId,
        instance_id: InstanceId,
        resource: LwM2mResource,
    ) -> Self {
        Self {
            mode: WriteMode::Replace,
            object_id,
            target: WriteTarget::Resource {
                instance_id,
                resource,
            },
        }
    }

    /// Builds a write from a path and node, validating the pairing.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when the path is not an instance or resource
    /// path, or when the node level or id disagrees with the path.
    pub fn new(mode: WriteMode, path: LwM2mPath, node: LwM2mNode) -> Result<Self, RequestError> {
        const OPERATION: &str = "write";
        match (path, node) {
            (
                LwM2mPath::Instance {
                    object_id,
                    instance_id,
                },
                LwM2mNode::Instance(instance),
            ) => {
                ensure_id(OPERATION, path, instance_id, instance.id())?;
                Ok(Self::instance(mode, object_id, instance))
            }
            (
                LwM2mPath::Resource {
                    object_id,
                    instance_id,
                    resource_id,
                },
                LwM2mNode::Resource(resource),
            ) => {
                ensure_id(OPERATION, path, resource_id, resource.id())?;
                Ok(Self {
                    mode,
                    object_id,
                    target: WriteTarget::Resource {
                        instance_id,
                        resource,
                    },
                })
            }
            (LwM2mPath::Instance { .. } | LwM2mPath::Resource { .. }, other) => {
                Err(RequestError::NodeMismatch {
                    operation: OPERATION,
                    path,
                    found: other.kind(),
                })
            }
            (LwM2mPath::Root | LwM2mPath::Object { .. }, _) => Err(RequestError::UnsupportedPath {
                operation: OPERATION,
                path,
            }),
        }
    }

    /// Returns the write mode.
    #[must_use]
    pub const fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Returns `true` for [`WriteMode::Replace`].
    #[must_use]
    pub const fn is_replace(&self) -> bool {
        matches!(self.mode, WriteMode::Replace)
    }

    /// Returns the payload.
    #[must_use]
    pub const fn target(&self) -> &WriteTarget {
        &self.target
    }

    /// Returns the target path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        match &self.target {
            WriteTarget::Instance(instance) => LwM2mPath::instance(self.object_id, instance.id()),
            WriteTarget::Resource {
                instance_id,
                resource,
            } => LwM2mPath::resource(self.object_id, *instance_id, resource.id()),
        }
    }

    /// Consumes the request, returning its payload.
    #[must_use]
    pub fn into_target(self) -> WriteTarget {
        self.target
    }
}

/// Payload of a bootstrap write.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapWriteTarget {
    /// Several instances of the object.
    Object(LwM2mObject),
    /// One instance.
    Instance(LwM2mObjectInstance),
    /// One resource.
    Resource {
        /// Owning instance.
        instance_id: InstanceId,
        /// New resource content.
        resource: LwM2mResource,
    },
}

/// Privileged write issued by the bootstrap server.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapWriteRequest {
    object_id: ObjectId,
    target: BootstrapWriteTarget,
}

impl BootstrapWriteRequest {
    /// Builds an object-level bootstrap write.
    #[must_use]
    pub const fn object(object: LwM2mObject) -> Self {
        Self {
            object_id: object.id(),
            target: BootstrapWriteTarget::Object(object),
        }
    }

    /// Builds an instance-level bootstrap write.
    #[must_use]
    pub const fn instance(object_id: ObjectId, instance: LwM2mObjectInstance) -> Self {
        Self {
            object_id,
            target: BootstrapWriteTarget::Instance(instance),
        }
    }

    /// Builds a resource-level bootstrap write.
    #[must_use]
    pub const fn resource(
        object_id: ObjectId,
        instance_id: InstanceId,
        resource: LwM2mResource,
    ) -> Self {
        Self {
            object_id,
            target: BootstrapWriteTarget::Resource {
                instance_id,
                resource,
            },
        }
    }

    /// Builds a bootstrap write from a path and node, validating the pairing.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] for the root path, or when the node level or
    /// id disagrees with the path.
    pub fn new(path: LwM2mPath, node: LwM2mNode) -> Result<Self, RequestError> {
        const OPERATION: &str = "bootstrap write";
        match (path, node) {
            (LwM2mPath::Object { object_id }, LwM2mNode::Object(object)) => {
                ensure_id(OPERATION, path, object_id, object.id())?;
                Ok(Self::object(object))
            }
            (
                LwM2mPath::Instance {
                    object_id,
                    instance_id,
                },
                LwM2mNode::Instance(instance),
            ) => {
                ensure_id(OPERATION, path, instance_id, instance.id())?;
                Ok(Self::instance(object_id, instance))
            }
            (
                LwM2mPath::Resource {
                    object_id,
                    instance_id,
                    resource_id,
                },
                LwM2mNode::Resource(resource),
            ) => {
                ensure_id(OPERATION, path, resource_id, resource.id())?;
                Ok(Self::resource(object_id, instance_id, resource))
            }
            (LwM2mPath::Root, _) => Err(RequestError::UnsupportedPath {
                operation: OPERATION,
                path,
            }),
            (_, other) => Err(RequestError::NodeMismatch {
                operation: OPERATION,
                path,
                found: other.kind(),
            }),
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn target(&self) -> &BootstrapWriteTarget {
        &self.target
    }

    /// Returns the target path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        match &self.target {
            BootstrapWriteTarget::Object(_) => LwM2mPath::object(self.object_id),
            BootstrapWriteTarget::Instance(instance) => {
                LwM2mPath::instance(self.object_id, instance.id())
            }
            BootstrapWriteTarget::Resource {
                instance_id,
                resource,
            } => LwM2mPath::resource(self.object_id, *instance_id, resource.id()),
        }
    }

    /// Consumes the request, returning its payload.
    #[must_use]
    pub fn into_target(self) -> BootstrapWriteTarget {
        self.target
    }
}

/// Executes a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRequest {
    object_id: ObjectId,
    instance_id: InstanceId,
    resource_id: ResourceId,
    parameters: Option<String>,
}

impl ExecuteRequest {
    /// Builds an execute request without parameters.
    #[must_use]
    pub const fn new(object_id: ObjectId, instance_id: InstanceId, resource_id: ResourceId) -> Self {
        Self {
            object_id,
            instance_id,
            resource_id,
            parameters: None,
        }
    }

    /// Attaches opaque execute parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    /// Returns the target resource path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        LwM2mPath::resource(self.object_id, self.instance_id, self.resource_id)
    }

    /// Returns the target instance id.
    #[must_use]
    pub const fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Returns the target resource id.
    #[must_use]
    pub const fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    /// Returns the execute parameters, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }
}

/// Deletes one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    object_id: ObjectId,
    instance_id: InstanceId,
}

impl DeleteRequest {
    /// Builds a delete of one instance.
    #[must_use]
    pub const fn new(object_id: ObjectId, instance_id: InstanceId) -> Self {
        Self {
            object_id,
            instance_id,
        }
    }

    /// Returns the target instance path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        LwM2mPath::instance(self.object_id, self.instance_id)
    }

    /// Returns the target instance id.
    #[must_use]
    pub const fn instance_id(&self) -> InstanceId {
        self.instance_id
    }
}

/// Privileged delete issued by the bootstrap server.
///
/// Any path is representable; the enabler rejects granularities it does not
/// support with a bad-request result rather than at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapDeleteRequest {
    path: LwM2mPath,
}

impl BootstrapDeleteRequest {
    /// Builds a bootstrap delete of `path`.
    #[must_use]
    pub const fn new(path: LwM2mPath) -> Self {
        Self { path }
    }

    /// Returns the target path.
    #[must_use]
    pub const fn path(&self) -> LwM2mPath {
        self.path
    }
}

fn ensure_id(
    operation: &'static str,
    path: LwM2mPath,
    expected: u16,
    node_id: u16,
) -> Result<(), RequestError> {
    if expected == node_id {
        Ok(())
    } else {
        Err(RequestError::IdMismatch {
            operation,
            path,
            node_id,
        })
    }
}
