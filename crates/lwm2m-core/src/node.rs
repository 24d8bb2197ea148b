//! Snapshots of object, instance, and resource content.
//!
//! Nodes are plain values: an instance enabler produces them on read, and
//! requests carry them on create and write. They never alias live state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, ObjectId, ResourceId};
use crate::model::ResourceType;

/// A single typed resource value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// UTF-8 text.
    String(String),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Raw bytes.
    Opaque(Vec<u8>),
    /// Seconds since the Unix epoch.
    Time(i64),
    /// Reference to another object instance.
    ObjectLink {
        /// Referenced object.
        object_id: ObjectId,
        /// Referenced instance.
        instance_id: InstanceId,
    },
}

impl Value {
    /// Returns the model type this value satisfies.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            Self::String(_) => ResourceType::String,
            Self::Integer(_) => ResourceType::Integer,
            Self::Float(_) => ResourceType::Float,
            Self::Boolean(_) => ResourceType::Boolean,
            Self::Opaque(_) => ResourceType::Opaque,
            Self::Time(_) => ResourceType::Time,
            Self::ObjectLink { .. } => ResourceType::ObjectLink,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// Content of a resource: one value, or indexed values for multi-instance
/// resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceValue {
    /// Single-instance resource.
    Single(Value),
    /// Multi-instance resource keyed by resource instance id.
    Multiple(BTreeMap<u16, Value>),
}

/// A resource and its content.
///
/// # Example
///
/// ```
/// use lwm2m_core::{LwM2mResource, Value};
///
/// let resource = LwM2mResource::string(0, "Open Mobile Alliance");
/// assert_eq!(resource.id(), 0);
/// assert_eq!(
///     resource.single_value(),
///     Some(&Value::String("Open Mobile Alliance".into())),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwM2mResource {
    id: ResourceId,
    value: ResourceValue,
}

impl LwM2mResource {
    /// Builds a single-instance resource.
    #[must_use]
    pub const fn single(id: ResourceId, value: Value) -> Self {
        Self {
            id,
            value: ResourceValue::Single(value),
        }
    }

    /// Builds a multi-instance resource.
    #[must_use]
    pub const fn multiple(id: ResourceId, values: BTreeMap<u16, Value>) -> Self {
        Self {
            id,
            value: ResourceValue::Multiple(values),
        }
    }

    /// Builds a string resource.
    #[must_use]
    pub fn string(id: ResourceId, text: impl Into<String>) -> Self {
        Self::single(id, Value::String(text.into()))
    }

    /// Builds an integer resource.
    #[must_use]
    pub const fn integer(id: ResourceId, number: i64) -> Self {
        Self::single(id, Value::Integer(number))
    }

    /// Builds a boolean resource.
    #[must_use]
    pub const fn boolean(id: ResourceId, flag: bool) -> Self {
        Self::single(id, Value::Boolean(flag))
    }

    /// Returns the resource identifier.
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the resource content.
    #[must_use]
    pub const fn value(&self) -> &ResourceValue {
        &self.value
    }

    /// Returns the value of a single-instance resource.
    #[must_use]
    pub const fn single_value(&self) -> Option<&Value> {
        match &self.value {
            ResourceValue::Single(value) => Some(value),
            ResourceValue::Multiple(_) => None,
        }
    }

    /// Returns `true` for multi-instance resources.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self.value, ResourceValue::Multiple(_))
    }
}

/// Snapshot of one object instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LwM2mObjectInstance {
    id: InstanceId,
    resources: BTreeMap<ResourceId, LwM2mResource>,
}

impl LwM2mObjectInstance {
    /// Builds an instance snapshot; later resources win on duplicate ids.
    #[must_use]
    pub fn new(id: InstanceId, resources: impl IntoIterator<Item = LwM2mResource>) -> Self {
        Self {
            id,
            resources: resources
                .into_iter()
                .map(|resource| (resource.id(), resource))
                .collect(),
        }
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the resources keyed by id.
    #[must_use]
    pub const fn resources(&self) -> &BTreeMap<ResourceId, LwM2mResource> {
        &self.resources
    }

    /// Looks up one resource.
    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&LwM2mResource> {
        self.resources.get(&id)
    }

    /// Consumes the snapshot, returning its resources.
    #[must_use]
    pub fn into_resources(self) -> BTreeMap<ResourceId, LwM2mResource> {
        self.resources
    }
}

/// Snapshot of every instance of one object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LwM2mObject {
    id: ObjectId,
    instances: BTreeMap<InstanceId, LwM2mObjectInstance>,
}

impl LwM2mObject {
    /// Builds an object snapshot; later instances win on duplicate ids.
    #[must_use]
    pub fn new(id: ObjectId, instances: impl IntoIterator<Item = LwM2mObjectInstance>) -> Self {
        Self {
            id,
            instances: instances
                .into_iter()
                .map(|instance| (instance.id(), instance))
                .collect(),
        }
    }

    /// Returns the object identifier.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the instances keyed by id.
    #[must_use]
    pub const fn instances(&self) -> &BTreeMap<InstanceId, LwM2mObjectInstance> {
        &self.instances
    }

    /// Looks up one instance.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&LwM2mObjectInstance> {
        self.instances.get(&id)
    }

    /// Consumes the snapshot, returning its instances.
    #[must_use]
    pub fn into_instances(self) -> BTreeMap<InstanceId, LwM2mObjectInstance> {
        self.instances
    }
}

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LwM2mNode {
    /// Object snapshot.
    Object(LwM2mObject),
    /// Instance snapshot.
    Instance(LwM2mObjectInstance),
    /// Single resource.
    Resource(LwM2mResource),
}

impl LwM2mNode {
    /// Returns a short label for the node level, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Instance(_) => "instance",
            Self::Resource(_) => "resource",
        }
    }

    /// Returns the resource when the node is one.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&LwM2mResource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Object(_) | Self::Instance(_) => None,
        }
    }

    /// Consumes the node, returning the resource when it is one.
    #[must_use]
    pub fn into_resource(self) -> Option<LwM2mResource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Object(_) | Self::Instance(_) => None,
        }
    }

    /// Returns the instance when the node is one.
    #[must_use]
    pub const fn as_instance(&self) -> Option<&LwM2mObjectInstance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Object(_) | Self::Resource(_) => None,
        }
    }

    /// Returns the object when the node is one.
    #[must_use]
    pub const fn as_object(&self) -> Option<&LwM2mObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Instance(_) | Self::Resource(_) => None,
        }
    }
}

impl From<LwM2mObject> for LwM2mNode {
    fn from(object: LwM2mObject) -> Self {
        Self::Object(object)
    }
}

impl From<LwM2mObjectInstance> for LwM2mNode {
    fn from(instance: LwM2mObjectInstance) -> Self {
        Self::Instance(instance)
    }
}

impl From<LwM2mResource> for LwM2mNode {
    fn from(resource: LwM2mResource) -> Self {
        Self::Resource(resource)
    }
}
