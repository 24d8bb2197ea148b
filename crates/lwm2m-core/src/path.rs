//! Addressable targets within the object tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{InstanceId, ObjectId, ResourceId};

/// Target of an operation: the whole tree, an object, an instance, or a
/// single resource.
///
/// Paths render without a leading slash (`"3"`, `"3/0"`, `"3/0/1"`) except
/// for the root, which renders as `"/"`. Parsing accepts both forms.
///
/// # Example
///
/// ```
/// use lwm2m_core::LwM2mPath;
///
/// let path = LwM2mPath::instance(4, 3);
/// assert_eq!(path.object_id(), Some(4));
/// assert_eq!(path.instance_id(), Some(3));
/// assert_eq!(path.resource_id(), None);
/// assert_eq!("/4/3".parse::<LwM2mPath>(), Ok(path));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum LwM2mPath {
    /// The whole tree.
    Root,
    /// Every instance of one object.
    Object {
        /// Object identifier.
        object_id: ObjectId,
    },
    /// One instance of an object.
    Instance {
        /// Object identifier.
        object_id: ObjectId,
        /// Instance identifier.
        instance_id: InstanceId,
    },
    /// One resource of an instance.
    Resource {
        /// Object identifier.
        object_id: ObjectId,
        /// Instance identifier.
        instance_id: InstanceId,
        /// Resource identifier.
        resource_id: ResourceId,
    },
}

impl LwM2mPath {
    /// Builds an object path.
    #[must_use]
    pub const fn object(object_id: ObjectId) -> Self {
        Self::Object { object_id }
    }

    /// Builds an instance path.
    #[must_use]
    pub const fn instance(object_id: ObjectId, instance_id: InstanceId) -> Self {
        Self::Instance {
            object_id,
            instance_id,
        }
    }

    /// Builds a resource path.
    #[must_use]
    pub const fn resource(
        object_id: ObjectId,
        instance_id: InstanceId,
        resource_id: ResourceId,
    ) -> Self {
        Self::Resource {
            object_id,
            instance_id,
            resource_id,
        }
    }

    /// Returns the object identifier, absent for the root.
    #[must_use]
    pub const fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Root => None,
            Self::Object { object_id }
            | Self::Instance { object_id, .. }
            | Self::Resource { object_id, .. } => Some(*object_id),
        }
    }

    /// Returns the instance identifier for instance and resource paths.
    #[must_use]
    pub const fn instance_id(&self) -> Option<InstanceId> {
        match self {
            Self::Root | Self::Object { .. } => None,
            Self::Instance { instance_id, .. } | Self::Resource { instance_id, .. } => {
                Some(*instance_id)
            }
        }
    }

    /// Returns the resource identifier for resource paths.
    #[must_use]
    pub const fn resource_id(&self) -> Option<ResourceId> {
        match self {
            Self::Resource { resource_id, .. } => Some(*resource_id),
            Self::Root | Self::Object { .. } | Self::Instance { .. } => None,
        }
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// Returns `true` for an object path.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Returns `true` for an instance path.
    #[must_use]
    pub const fn is_instance(&self) -> bool {
        matches!(self, Self::Instance { .. })
    }

    /// Returns `true` for a resource path.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Resource { .. })
    }
}

impl fmt::Display for LwM2mPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => formatter.write_str("/"),
            Self::Object { object_id } => write!(formatter, "{object_id}"),
            Self::Instance {
                object_id,
                instance_id,
            } => write!(formatter, "{object_id}/{instance_id}"),
            Self::Resource {
                object_id,
                instance_id,
                resource_id,
            } => write!(formatter, "{object_id}/{instance_id}/{resource_id}"),
        }
    }
}

/// Errors raised when parsing a [`LwM2mPath`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// A segment is empty or not a 16-bit unsigned integer.
    #[error("invalid segment '{segment}' in path '{path}'")]
    InvalidSegment {
        /// Full input text.
        path: String,
        /// Offending segment.
        segment: String,
    },

    /// The path names more than object, instance, and resource.
    #[error("path '{path}' has more than three segments")]
    TooDeep {
        /// Full input text.
        path: String,
    },
}

impl FromStr for LwM2mPath {
    type Err = PathParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let body = input.strip_prefix('/').unwrap_or(input);
        if body.is_empty() {
            return Ok(Self::Root);
        }

        let ids = body
            .split('/')
            .map(|segment| {
                segment
                    .parse::<u16>()
                    .map_err(|_| PathParseError::InvalidSegment {
                        path: input.to_owned(),
                        segment: segment.to_owned(),
                    })
            })
            .collect::<Result<Vec<u16>, _>>()?;

        match ids.as_slice() {
            [object_id] => Ok(Self::object(*object_id)),
            [object_id, instance_id] => Ok(Self::instance(*object_id, *instance_id)),
            [object_id, instance_id, resource_id] => {
                Ok(Self::resource(*object_id, *instance_id, *resource_id))
            }
            _ => Err(PathParseError::TooDeep {
                path: input.to_owned(),
            }),
        }
    }
}
