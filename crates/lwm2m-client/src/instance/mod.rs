//! Contract between the object enabler and one object instance.
//!
//! The enabler owns each instance as a `Box<dyn InstanceEnabler>` and calls it
//! only while holding its collection lock, so implementations see one call at
//! a time and need no internal locking of their own.

mod simple;

use std::sync::Arc;

use lwm2m_core::{
    ExecuteResponse, LwM2mResource, ObjectModel, ObserveResponse, ReadResponse, ResourceId,
    WriteResponse,
};

use crate::notify::{ResourceChangedListener, Subscription};

pub use self::simple::{SimpleInstanceEnabler, SimpleInstanceEnablerFactory};

/// Per-resource operations of one object instance.
///
/// Identity checks happen in the enabler before these calls; an instance only
/// decides whether the value itself is acceptable.
pub trait InstanceEnabler: Send {
    /// Reads one resource.
    fn read(&self, resource_id: ResourceId) -> ReadResponse;

    /// Replaces the content of one resource.
    fn write(&mut self, resource_id: ResourceId, resource: LwM2mResource) -> WriteResponse;

    /// Restores one resource to its default content.
    fn reset(&mut self, resource_id: ResourceId);

    /// Executes one resource with opaque parameters, empty when none were
    /// supplied.
    fn execute(&mut self, resource_id: ResourceId, parameters: &str) -> ExecuteResponse;

    /// Reads one resource on behalf of an observation.
    fn observe(&mut self, resource_id: ResourceId) -> ObserveResponse {
        self.read(resource_id)
    }

    /// Lists the resources this instance currently exposes, ascending.
    fn available_resource_ids(&self, model: &ObjectModel) -> Vec<ResourceId> {
        model.resource_ids()
    }

    /// Attaches a change listener until the returned handle is dropped.
    fn subscribe(&self, listener: ResourceChangedListener) -> Subscription;
}

/// Builds default instances for an object model.
pub trait InstanceEnablerFactory: Send + Sync {
    /// Creates a fresh instance of `model`.
    fn create(&self, model: &Arc<ObjectModel>) -> Box<dyn InstanceEnabler>;
}

impl<F> InstanceEnablerFactory for F
where
    F: Fn(&Arc<ObjectModel>) -> Box<dyn InstanceEnabler> + Send + Sync,
{
    fn create(&self, model: &Arc<ObjectModel>) -> Box<dyn InstanceEnabler> {
        self(model)
    }
}
