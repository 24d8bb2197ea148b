//! Builds object enablers from a model provider.

use std::collections::BTreeMap;
use std::sync::Arc;

use lwm2m_config::EnablerConfig;
use lwm2m_core::{InstanceId, ModelProvider, ObjectId, SECURITY_OBJECT_ID};
use tracing::debug;

use crate::classifier::{BootstrapAccountClassifier, SecurityResourceClassifier};
use crate::enabler::ObjectEnabler;
use crate::error::EnablerError;
use crate::instance::{InstanceEnabler, InstanceEnablerFactory, SimpleInstanceEnablerFactory};

const INITIALIZER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::initializer");

type SeededInstances = Vec<(InstanceId, Box<dyn InstanceEnabler>)>;

/// Binds factories and initial instances to object ids, then builds one
/// [`ObjectEnabler`] per object.
///
/// Objects without a dedicated factory use the default factory, which starts
/// as a [`SimpleInstanceEnablerFactory`]. Seeded instances are handed to the
/// first enabler built for their object.
///
/// # Example
///
/// ```
/// use lwm2m_client::ObjectsInitializer;
/// use lwm2m_core::{ModelRegistry, ObjectModel, Operations, ResourceModel, ResourceType};
///
/// let mut registry = ModelRegistry::new();
/// registry
///     .register(ObjectModel::new(
///         3,
///         "Device",
///         [ResourceModel::new(0, "Manufacturer", Operations::READ, ResourceType::String)],
///     ))
///     .expect("register device");
///
/// let ids = registry.object_ids();
/// let mut initializer = ObjectsInitializer::new(registry);
/// let enablers = initializer.create_all(ids).expect("enablers");
/// assert_eq!(enablers.len(), 1);
/// assert!(enablers.iter().all(|enabler| enabler.instance_ids().is_empty()));
/// ```
pub struct ObjectsInitializer<P> {
    provider: P,
    default_factory: Arc<dyn InstanceEnablerFactory>,
    factories: BTreeMap<ObjectId, Arc<dyn InstanceEnablerFactory>>,
    instances: BTreeMap<ObjectId, SeededInstances>,
    classifier: Arc<dyn BootstrapAccountClassifier>,
    security_object_id: ObjectId,
}

impl<P: ModelProvider> ObjectsInitializer<P> {
    /// Creates an initializer with the built-in defaults.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            default_factory: Arc::new(SimpleInstanceEnablerFactory::new()),
            factories: BTreeMap::new(),
            instances: BTreeMap::new(),
            classifier: Arc::new(SecurityResourceClassifier),
            security_object_id: SECURITY_OBJECT_ID,
        }
    }

    /// Creates an initializer honouring the configured Security object id.
    #[must_use]
    pub fn with_config(provider: P, config: &EnablerConfig) -> Self {
        let mut initializer = Self::new(provider);
        initializer.security_object_id = config.security_object_id();
        initializer
    }

    /// Uses `factory` for objects without a dedicated factory.
    pub fn set_default_factory(&mut self, factory: Arc<dyn InstanceEnablerFactory>) {
        self.default_factory = factory;
    }

    /// Uses `factory` for `object_id`.
    pub fn set_factory(&mut self, object_id: ObjectId, factory: Arc<dyn InstanceEnablerFactory>) {
        self.factories.insert(object_id, factory);
    }

    /// Replaces the bootstrap-account classifier given to every enabler.
    pub fn set_classifier(&mut self, classifier: Arc<dyn BootstrapAccountClassifier>) {
        self.classifier = classifier;
    }

    /// Seeds `object_id` with already-built instances.
    ///
    /// # Errors
    ///
    /// Returns [`EnablerError::UnknownObject`] when the provider has no model
    /// for `object_id`, and [`EnablerError::TooManyInstances`] when the model
    /// is single-instance and more than one instance is supplied.
    pub fn set_instances(
        &mut self,
        object_id: ObjectId,
        instances: impl IntoIterator<Item = (InstanceId, Box<dyn InstanceEnabler>)>,
    ) -> Result<(), EnablerError> {
        let model = self
            .provider
            .object_model(object_id)
            .ok_or_else(|| EnablerError::unknown_object(object_id))?;
        let seeded: SeededInstances = instances.into_iter().collect();
        if !model.is_multiple() && seeded.len() > 1 {
            return Err(EnablerError::TooManyInstances {
                object_id,
                count: seeded.len(),
            });
        }
        self.instances.insert(object_id, seeded);
        Ok(())
    }

    /// Builds the enabler for `object_id`, consuming its seeded instances.
    ///
    /// # Errors
    ///
    /// Returns [`EnablerError::UnknownObject`] when the provider has no model
    /// for `object_id`.
    pub fn create(&mut self, object_id: ObjectId) -> Result<ObjectEnabler, EnablerError> {
        let factory = self
            .factories
            .get(&object_id)
            .map_or_else(|| Arc::clone(&self.default_factory), Arc::clone);
        let enabler = ObjectEnabler::from_provider(
            &self.provider,
            object_id,
            factory,
            Arc::clone(&self.classifier),
        )?
        .with_security_object_id(self.security_object_id)
        .with_instances(self.instances.remove(&object_id).unwrap_or_default());
        debug!(
            target: INITIALIZER_TARGET,
            object_id,
            instances = enabler.instance_ids().len(),
            "created object enabler"
        );
        Ok(enabler)
    }

    /// Builds one enabler per id, in the order given.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::create`].
    pub fn create_all(
        &mut self,
        object_ids: impl IntoIterator<Item = ObjectId>,
    ) -> Result<Vec<ObjectEnabler>, EnablerError> {
        object_ids
            .into_iter()
            .map(|object_id| self.create(object_id))
            .collect()
    }
}
