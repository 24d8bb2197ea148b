//! Numeric identifiers for the object, instance, and resource levels.

/// Identifier of an object type, such as `3` for Device.
pub type ObjectId = u16;

/// Identifier of an instance, unique within one object.
pub type InstanceId = u16;

/// Identifier of a resource, unique within one object model.
pub type ResourceId = u16;

/// The Security object holding server accounts and credentials.
pub const SECURITY_OBJECT_ID: ObjectId = 0;

/// Security resource flagging an account as the bootstrap server.
pub const SECURITY_BOOTSTRAP_RESOURCE: ResourceId = 1;
