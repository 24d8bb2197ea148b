//! Per-object dispatcher owning the instance collection.
//!
//! An [`ObjectEnabler`] routes every operation aimed at one object id to the
//! right instance. It assigns instance ids on create, applies the model's
//! read and write permissions according to the caller's identity, implements
//! replace and update writes, protects the bootstrap-server account of the
//! Security object, and re-publishes instance changes as paths.
//!
//! All operations serialize on one mutex. Public entry points take the lock
//! once and run the internal operations of `dispatch` on the locked table,
//! so composite operations such as bootstrap writes never re-acquire it.

mod dispatch;
mod table;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lwm2m_core::{
    BootstrapDeleteRequest, BootstrapDeleteResponse, BootstrapWriteRequest,
    BootstrapWriteResponse, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
    ExecuteRequest, ExecuteResponse, InstanceId, ModelProvider, ObjectId, ObjectModel,
    ObserveRequest, ObserveResponse, ReadRequest, ReadResponse, ResourceId, ResponseError,
    SECURITY_OBJECT_ID, ServerIdentity, WriteRequest, WriteResponse,
};
use tracing::{debug, info};

use self::dispatch::Access;
use self::table::{InstanceEntry, InstanceTable};
use crate::classifier::BootstrapAccountClassifier;
use crate::error::EnablerError;
use crate::instance::{InstanceEnabler, InstanceEnablerFactory};
use crate::notify::{NotifySender, NotifySlot, Subscription, publish_changes};

/// Tracing target for enabler operations.
pub(crate) const ENABLER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::enabler");

/// Dispatcher for every instance of one object.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use lwm2m_client::{ObjectEnabler, SecurityResourceClassifier, SimpleInstanceEnablerFactory};
/// use lwm2m_core::{
///     CreateRequest, LwM2mPath, LwM2mResource, ObjectModel, Operations, ReadRequest,
///     ResourceModel, ResourceType, ServerIdentity,
/// };
///
/// let model = ObjectModel::new(
///     4,
///     "Sensor",
///     [ResourceModel::new(0, "Label", Operations::READ_WRITE, ResourceType::String)],
/// );
/// let enabler = ObjectEnabler::new(
///     Arc::new(model),
///     Arc::new(SimpleInstanceEnablerFactory::new()),
///     Arc::new(SecurityResourceClassifier),
/// );
///
/// let created = enabler
///     .create(CreateRequest::new(4, [LwM2mResource::string(0, "hall")]))
///     .expect("create");
/// assert_eq!(created, LwM2mPath::instance(4, 0));
///
/// let node = enabler
///     .read(ServerIdentity::Server, ReadRequest::new(LwM2mPath::resource(4, 0, 0)))
///     .expect("read");
/// assert_eq!(node.as_resource(), Some(&LwM2mResource::string(0, "hall")));
/// ```
pub struct ObjectEnabler {
    object_id: ObjectId,
    model: Arc<ObjectModel>,
    factory: Arc<dyn InstanceEnablerFactory>,
    classifier: Arc<dyn BootstrapAccountClassifier>,
    security_object_id: ObjectId,
    table: Mutex<InstanceTable>,
    sender: NotifySlot,
}

impl ObjectEnabler {
    /// Creates an enabler with no instances for the object `model` describes.
    #[must_use]
    pub fn new(
        model: Arc<ObjectModel>,
        factory: Arc<dyn InstanceEnablerFactory>,
        classifier: Arc<dyn BootstrapAccountClassifier>,
    ) -> Self {
        Self {
            object_id: model.id(),
            model,
            factory,
            classifier,
            security_object_id: SECURITY_OBJECT_ID,
            table: Mutex::new(InstanceTable::default()),
            sender: NotifySlot::default(),
        }
    }

    /// Creates an enabler for `object_id` using the model `provider` knows.
    ///
    /// # Errors
    ///
    /// Returns [`EnablerError::UnknownObject`] when the provider has no model
    /// for `object_id`.
    pub fn from_provider(
        provider: &(impl ModelProvider + ?Sized),
        object_id: ObjectId,
        factory: Arc<dyn InstanceEnablerFactory>,
        classifier: Arc<dyn BootstrapAccountClassifier>,
    ) -> Result<Self, EnablerError> {
        let model = provider
            .object_model(object_id)
            .ok_or_else(|| EnablerError::unknown_object(object_id))?;
        Ok(Self::new(model, factory, classifier))
    }

    /// Overrides which object id receives Security-object protection.
    #[must_use]
    pub const fn with_security_object_id(mut self, security_object_id: ObjectId) -> Self {
        self.security_object_id = security_object_id;
        self
    }

    /// Seeds the collection with already-built instances.
    #[must_use]
    pub fn with_instances(
        self,
        instances: impl IntoIterator<Item = (InstanceId, Box<dyn InstanceEnabler>)>,
    ) -> Self {
        {
            let mut table = self.lock();
            for (instance_id, instance) in instances {
                self.attach(&mut table, instance_id, instance);
            }
        }
        self
    }

    /// Returns the object id this enabler serves.
    #[must_use]
    pub const fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Returns the model of the served object.
    #[must_use]
    pub const fn object_model(&self) -> &Arc<ObjectModel> {
        &self.model
    }

    /// Attaches the sink receiving change notifications, replacing any
    /// previous one.
    pub fn set_notify_sender(&self, sender: Arc<dyn NotifySender>) {
        self.sender.set(sender);
    }

    /// Detaches the notification sink; later changes are dropped.
    pub fn clear_notify_sender(&self) {
        self.sender.clear();
    }

    /// Returns the ids of the current instances in ascending order.
    #[must_use]
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.lock().ids()
    }

    /// Returns the resources an instance exposes, or nothing when the
    /// instance does not exist.
    #[must_use]
    pub fn resource_ids(&self, instance_id: InstanceId) -> Vec<ResourceId> {
        self.lock()
            .get(instance_id)
            .map(|instance| instance.available_resource_ids(&self.model))
            .unwrap_or_default()
    }

    /// Inserts an instance, replacing and unsubscribing any instance that
    /// held the same id.
    pub fn add_instance(&self, instance_id: InstanceId, instance: Box<dyn InstanceEnabler>) {
        self.attach(&mut self.lock(), instance_id, instance);
    }

    /// Runs `action` against one instance while the collection is locked.
    ///
    /// `action` must not call back into this enabler.
    pub fn with_instance<R>(
        &self,
        instance_id: InstanceId,
        action: impl FnOnce(&mut dyn InstanceEnabler) -> R,
    ) -> Option<R> {
        let mut table = self.lock();
        let instance: &mut dyn InstanceEnabler = table.get_mut(instance_id)?;
        Some(action(instance))
    }

    /// Removes an instance and stops relaying its changes.
    #[must_use]
    pub fn remove_instance(&self, instance_id: InstanceId) -> Option<Box<dyn InstanceEnabler>> {
        self.lock()
            .remove(instance_id)
            .map(InstanceEntry::into_instance)
    }

    /// Creates an instance.
    ///
    /// Resources in the request are written without permission checks. The
    /// new instance is inserted only when every write succeeded.
    pub fn create(&self, request: CreateRequest) -> CreateResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            instance_id = ?request.instance_id(),
            resources = request.resources().len(),
            "create"
        );
        self.do_create(&mut self.lock(), request)
    }

    /// Reads the object, an instance, or a resource.
    pub fn read(&self, identity: ServerIdentity, request: ReadRequest) -> ReadResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            %identity,
            "read"
        );
        self.do_collect(&mut self.lock(), identity, request.path(), Access::Read)
    }

    /// Reads for an observation; gated like [`Self::read`].
    pub fn observe(&self, identity: ServerIdentity, request: ObserveRequest) -> ObserveResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            %identity,
            "observe"
        );
        self.do_collect(&mut self.lock(), identity, request.path(), Access::Observe)
    }

    /// Writes an instance or a resource.
    pub fn write(&self, identity: ServerIdentity, request: WriteRequest) -> WriteResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            mode = ?request.mode(),
            %identity,
            "write"
        );
        self.do_write(&mut self.lock(), identity, request)
    }

    /// Writes on behalf of the bootstrap server, creating missing instances.
    ///
    /// An object-level write applies every instance it carries and reports
    /// the first failure once all of them were attempted.
    pub fn bootstrap_write(
        &self,
        identity: ServerIdentity,
        request: BootstrapWriteRequest,
    ) -> BootstrapWriteResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            %identity,
            "bootstrap write"
        );
        self.do_bootstrap_write(&mut self.lock(), identity, request)
    }

    /// Executes a resource.
    pub fn execute(&self, request: &ExecuteRequest) -> ExecuteResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            "execute"
        );
        let mut table = self.lock();
        let instance = table
            .get_mut(request.instance_id())
            .ok_or(ResponseError::NotFound)?;
        instance.execute(request.resource_id(), request.parameters().unwrap_or_default())
    }

    /// Deletes an instance.
    pub fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        debug!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            "delete"
        );
        self.lock()
            .remove(request.instance_id())
            .map(drop)
            .ok_or(ResponseError::NotFound)
    }

    /// Deletes on behalf of the bootstrap server.
    ///
    /// The bootstrap-server account of the Security object survives an object
    /// or root delete and cannot be deleted on its own.
    pub fn bootstrap_delete(&self, request: BootstrapDeleteRequest) -> BootstrapDeleteResponse {
        info!(
            target: ENABLER_TARGET,
            object_id = self.object_id,
            path = %request.path(),
            "bootstrap delete"
        );
        self.do_bootstrap_delete(&mut self.lock(), request)
    }

    const fn is_security_object(&self) -> bool {
        self.object_id == self.security_object_id
    }

    fn lock(&self) -> MutexGuard<'_, InstanceTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach(
        &self,
        table: &mut InstanceTable,
        instance_id: InstanceId,
        instance: Box<dyn InstanceEnabler>,
    ) {
        let subscription = self.listen(instance_id, instance.as_ref());
        table.insert(instance_id, InstanceEntry::new(instance, subscription));
    }

    fn listen(&self, instance_id: InstanceId, instance: &dyn InstanceEnabler) -> Subscription {
        let sender = self.sender.clone();
        let object_id = self.object_id;
        instance.subscribe(Arc::new(move |resource_ids: &[ResourceId]| {
            if let Some(current) = sender.current() {
                publish_changes(current.as_ref(), object_id, instance_id, resource_ids);
            }
        }))
    }
}

impl fmt::Debug for ObjectEnabler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `instances` is `None` while the collection is locked, for example
        // when formatted from inside `with_instance`.
        formatter
            .debug_struct("ObjectEnabler")
            .field("object_id", &self.object_id)
            .field("instances", &self.table.try_lock().ok().map(|table| table.ids()))
            .field("notify_sender", &self.sender.is_attached())
            .finish_non_exhaustive()
    }
}
