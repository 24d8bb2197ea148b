//! In-memory instance backed by a value map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lwm2m_core::{
    ExecuteResponse, LwM2mResource, ObjectModel, ReadResponse, ResourceId, ResourceType,
    ResourceValue, ResponseError, WriteResponse,
};
use tracing::debug;

use super::{InstanceEnabler, InstanceEnablerFactory};
use crate::notify::{ChangeNotifier, ResourceChangedListener, Subscription};

const INSTANCE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::instance");

type ValueMap = BTreeMap<ResourceId, LwM2mResource>;

/// Instance that stores resource values in memory.
///
/// Reset restores the initial value of a resource, or clears it when none was
/// seeded. Writes and resets that change a value fire a change event.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use lwm2m_client::{InstanceEnabler, SimpleInstanceEnabler};
/// use lwm2m_core::{LwM2mResource, ObjectModel, Operations, ResourceModel, ResourceType};
///
/// let model = Arc::new(ObjectModel::new(
///     3,
///     "Device",
///     [ResourceModel::new(0, "Manufacturer", Operations::READ, ResourceType::String)],
/// ));
/// let mut instance = SimpleInstanceEnabler::with_initial_values(
///     model,
///     [LwM2mResource::string(0, "ACME")],
/// );
///
/// instance.write(0, LwM2mResource::string(0, "Initech")).expect("write");
/// instance.reset(0);
///
/// let node = instance.read(0).expect("read");
/// assert_eq!(node.as_resource(), Some(&LwM2mResource::string(0, "ACME")));
/// ```
#[derive(Debug)]
pub struct SimpleInstanceEnabler {
    model: Arc<ObjectModel>,
    initial: Arc<ValueMap>,
    values: ValueMap,
    strict: bool,
    notifier: ChangeNotifier,
}

impl SimpleInstanceEnabler {
    /// Creates an instance holding no values.
    #[must_use]
    pub fn new(model: Arc<ObjectModel>) -> Self {
        Self::from_shared(model, Arc::default())
    }

    /// Creates an instance seeded with `initial` values.
    #[must_use]
    pub fn with_initial_values(
        model: Arc<ObjectModel>,
        initial: impl IntoIterator<Item = LwM2mResource>,
    ) -> Self {
        Self::from_shared(model, Arc::new(collect_values(initial)))
    }

    fn from_shared(model: Arc<ObjectModel>, initial: Arc<ValueMap>) -> Self {
        Self {
            model,
            values: initial.as_ref().clone(),
            initial,
            strict: false,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Rejects writes of resources the model does not declare when `strict`.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the stored content of one resource.
    #[must_use]
    pub fn value(&self, resource_id: ResourceId) -> Option<&LwM2mResource> {
        self.values.get(&resource_id)
    }

    /// Stores `resource` without model checks and fires a change event.
    ///
    /// Used by device-side code reporting a new measurement.
    pub fn set_value(&mut self, resource: LwM2mResource) {
        let resource_id = resource.id();
        self.values.insert(resource_id, resource);
        self.notifier.notify(&[resource_id]);
    }

    /// Returns the notifier used to publish changes of this instance.
    #[must_use]
    pub const fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn check_type(&self, resource: &LwM2mResource) -> Result<(), ResponseError> {
        let Some(declared) = self.model.resource(resource.id()) else {
            return Ok(());
        };
        let expected = declared.kind();
        if expected == ResourceType::None {
            return Err(ResponseError::MethodNotAllowed);
        }
        let matches = match resource.value() {
            ResourceValue::Single(value) => value.resource_type() == expected,
            ResourceValue::Multiple(values) => values
                .values()
                .all(|value| value.resource_type() == expected),
        };
        if matches {
            Ok(())
        } else {
            Err(ResponseError::bad_request(format!(
                "resource {} expects a {expected:?} value",
                resource.id()
            )))
        }
    }
}

impl InstanceEnabler for SimpleInstanceEnabler {
    fn read(&self, resource_id: ResourceId) -> ReadResponse {
        self.values
            .get(&resource_id)
            .cloned()
            .map(Into::into)
            .ok_or(ResponseError::NotFound)
    }

    fn write(&mut self, resource_id: ResourceId, resource: LwM2mResource) -> WriteResponse {
        if self.strict && self.model.resource(resource_id).is_none() {
            return Err(ResponseError::NotFound);
        }
        self.check_type(&resource)?;
        let changed = self.values.get(&resource_id) != Some(&resource);
        self.values.insert(resource_id, resource);
        if changed {
            self.notifier.notify(&[resource_id]);
        }
        Ok(())
    }

    fn reset(&mut self, resource_id: ResourceId) {
        let previous = self.values.remove(&resource_id);
        if let Some(initial) = self.initial.get(&resource_id) {
            self.values.insert(resource_id, initial.clone());
        }
        if previous.as_ref() != self.values.get(&resource_id) {
            self.notifier.notify(&[resource_id]);
        }
    }

    fn execute(&mut self, resource_id: ResourceId, parameters: &str) -> ExecuteResponse {
        let declared = self
            .model
            .resource(resource_id)
            .ok_or(ResponseError::NotFound)?;
        if !declared.operations().is_executable() {
            return Err(ResponseError::MethodNotAllowed);
        }
        debug!(
            target: INSTANCE_TARGET,
            object_id = self.model.id(),
            resource_id,
            parameters,
            "executed resource"
        );
        Ok(())
    }

    fn available_resource_ids(&self, model: &ObjectModel) -> Vec<ResourceId> {
        let executable = model
            .resources()
            .filter(|resource| resource.operations().is_executable())
            .map(lwm2m_core::ResourceModel::id);
        self.values
            .keys()
            .copied()
            .chain(executable)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn subscribe(&self, listener: ResourceChangedListener) -> Subscription {
        self.notifier.subscribe(listener)
    }
}

/// Factory producing [`SimpleInstanceEnabler`]s that share initial values.
#[derive(Debug, Clone, Default)]
pub struct SimpleInstanceEnablerFactory {
    initial: Arc<ValueMap>,
    strict: bool,
}

impl SimpleInstanceEnablerFactory {
    /// Creates a factory producing empty, permissive instances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every produced instance with `initial` values.
    #[must_use]
    pub fn with_initial_values(initial: impl IntoIterator<Item = LwM2mResource>) -> Self {
        Self {
            initial: Arc::new(collect_values(initial)),
            strict: false,
        }
    }

    /// Makes produced instances reject resources outside the model.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl InstanceEnablerFactory for SimpleInstanceEnablerFactory {
    fn create(&self, model: &Arc<ObjectModel>) -> Box<dyn InstanceEnabler> {
        Box::new(
            SimpleInstanceEnabler::from_shared(Arc::clone(model), Arc::clone(&self.initial))
                .with_strict(self.strict),
        )
    }
}

fn collect_values(resources: impl IntoIterator<Item = LwM2mResource>) -> ValueMap {
    resources
        .into_iter()
        .map(|resource| (resource.id(), resource))
        .collect()
}
