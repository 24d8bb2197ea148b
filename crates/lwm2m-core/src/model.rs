//! Static object and resource models.
//!
//! A model describes which resources an object declares and what callers may
//! do with each one. Models are immutable once built and shared through
//! [`Arc`] by the enabler and every instance of the object.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ObjectId, ResourceId};

/// Capability set of a resource.
///
/// # Example
///
/// ```
/// use lwm2m_core::Operations;
///
/// let ops = Operations::READ_WRITE;
/// assert!(ops.is_readable());
/// assert!(ops.is_writable());
/// assert!(!ops.is_executable());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operations {
    readable: bool,
    writable: bool,
    executable: bool,
}

impl Operations {
    /// No operation is permitted.
    pub const NONE: Self = Self::new(false, false, false);
    /// Read only.
    pub const READ: Self = Self::new(true, false, false);
    /// Write only.
    pub const WRITE: Self = Self::new(false, true, false);
    /// Read and write.
    pub const READ_WRITE: Self = Self::new(true, true, false);
    /// Execute only.
    pub const EXECUTE: Self = Self::new(false, false, true);

    /// Builds an arbitrary capability set.
    #[must_use]
    pub const fn new(readable: bool, writable: bool, executable: bool) -> Self {
        Self {
            readable,
            writable,
            executable,
        }
    }

    /// Whether a management server may read the resource.
    #[must_use]
    pub const fn is_readable(self) -> bool {
        self.readable
    }

    /// Whether a management server may write the resource.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.writable
    }

    /// Whether the resource can be executed.
    #[must_use]
    pub const fn is_executable(self) -> bool {
        self.executable
    }
}

impl fmt::Display for Operations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !(self.readable || self.writable || self.executable) {
            return formatter.write_str("NONE");
        }
        for (flag, label) in [
            (self.readable, "R"),
            (self.writable, "W"),
            (self.executable, "E"),
        ] {
            if flag {
                formatter.write_str(label)?;
            }
        }
        Ok(())
    }
}

/// Declared data type of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// UTF-8 text.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Raw bytes.
    Opaque,
    /// Seconds since the Unix epoch.
    Time,
    /// Reference to another object instance.
    ObjectLink,
    /// Executable resources carry no value.
    None,
}

/// Description of one resource of an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    id: ResourceId,
    name: String,
    operations: Operations,
    kind: ResourceType,
    multiple: bool,
    mandatory: bool,
}

impl ResourceModel {
    /// Builds a single-instance, optional resource description.
    #[must_use]
    pub fn new(
        id: ResourceId,
        name: impl Into<String>,
        operations: Operations,
        kind: ResourceType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            operations,
            kind,
            multiple: false,
            mandatory: false,
        }
    }

    /// Marks the resource as multi-instance.
    #[must_use]
    pub const fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Marks the resource as mandatory.
    #[must_use]
    pub const fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Returns the resource identifier.
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capability set.
    #[must_use]
    pub const fn operations(&self) -> Operations {
        self.operations
    }

    /// Returns the declared data type.
    #[must_use]
    pub const fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Whether the resource is multi-instance.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the resource is mandatory.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }
}

/// Description of an object type and its resources.
///
/// Resources iterate in ascending id order.
///
/// # Example
///
/// ```
/// use lwm2m_core::{ObjectModel, Operations, ResourceModel, ResourceType};
///
/// let model = ObjectModel::new(
///     3,
///     "Device",
///     [
///         ResourceModel::new(0, "Manufacturer", Operations::READ, ResourceType::String),
///         ResourceModel::new(4, "Reboot", Operations::EXECUTE, ResourceType::None),
///     ],
/// );
/// assert_eq!(model.resource_ids(), vec![0, 4]);
/// assert!(model.resource(4).is_some_and(|r| r.operations().is_executable()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectModel {
    id: ObjectId,
    name: String,
    multiple: bool,
    mandatory: bool,
    resources: BTreeMap<ResourceId, ResourceModel>,
}

impl ObjectModel {
    /// Builds a multi-instance, optional object description.
    #[must_use]
    pub fn new(
        id: ObjectId,
        name: impl Into<String>,
        resources: impl IntoIterator<Item = ResourceModel>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            multiple: true,
            mandatory: false,
            resources: resources
                .into_iter()
                .map(|resource| (resource.id(), resource))
                .collect(),
        }
    }

    /// Sets whether the object allows more than one instance.
    #[must_use]
    pub const fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Sets whether the object is mandatory.
    #[must_use]
    pub const fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Returns the object identifier.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the object allows more than one instance.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the object is mandatory.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Iterates over the resource descriptions in ascending id order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceModel> + '_ {
        self.resources.values()
    }

    /// Looks up one resource description.
    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceModel> {
        self.resources.get(&id)
    }

    /// Returns the declared resource ids in ascending order.
    #[must_use]
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        self.resources.keys().copied().collect()
    }
}

/// Source of object models keyed by object id.
pub trait ModelProvider {
    /// Returns the model for `object_id`, if known.
    fn object_model(&self, object_id: ObjectId) -> Option<Arc<ObjectModel>>;
}

/// Errors raised while assembling a [`ModelRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A model with the same object id is already registered.
    #[error("object model {object_id} is already registered")]
    Duplicate {
        /// Conflicting object id.
        object_id: ObjectId,
    },
}

/// In-memory [`ModelProvider`] holding a fixed set of models.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ObjectId, Arc<ObjectModel>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Duplicate`] when a model with the same object id
    /// is already registered.
    pub fn register(&mut self, model: ObjectModel) -> Result<(), ModelError> {
        let object_id = model.id();
        if self.models.contains_key(&object_id) {
            return Err(ModelError::Duplicate { object_id });
        }
        self.models.insert(object_id, Arc::new(model));
        Ok(())
    }

    /// Returns the registered object ids in ascending order.
    #[must_use]
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.models.keys().copied().collect()
    }

    /// Returns the number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` when no model is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelProvider for ModelRegistry {
    fn object_model(&self, object_id: ObjectId) -> Option<Arc<ObjectModel>> {
        self.models.get(&object_id).map(Arc::clone)
    }
}
