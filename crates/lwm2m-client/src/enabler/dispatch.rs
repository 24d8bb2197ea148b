//! Operations on an already-locked instance table.

use std::collections::BTreeMap;

use lwm2m_core::{
    BootstrapDeleteRequest, BootstrapDeleteResponse, BootstrapWriteRequest,
    BootstrapWriteResponse, BootstrapWriteTarget, CreateRequest, CreateResponse, InstanceId,
    LwM2mNode, LwM2mObject, LwM2mObjectInstance, LwM2mPath, LwM2mResource, ReadResponse,
    ResourceId, ResponseError, ServerIdentity, WriteMode, WriteRequest, WriteResponse,
    WriteTarget,
};
use tracing::warn;

use super::table::InstanceTable;
use super::{ENABLER_TARGET, ObjectEnabler};
use crate::instance::InstanceEnabler;

/// Which instance call backs a read-like operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Access {
    Read,
    Observe,
}

impl Access {
    fn fetch(self, instance: &mut dyn InstanceEnabler, resource_id: ResourceId) -> ReadResponse {
        match self {
            Self::Read => instance.read(resource_id),
            Self::Observe => instance.observe(resource_id),
        }
    }
}

impl ObjectEnabler {
    pub(super) fn do_create(
        &self,
        table: &mut InstanceTable,
        request: CreateRequest,
    ) -> CreateResponse {
        let instance_id = request
            .instance_id()
            .or_else(|| table.next_id())
            .ok_or_else(|| {
                ResponseError::bad_request(format!(
                    "no instance id left for object {}",
                    self.object_id
                ))
            })?;

        let mut instance = self.factory.create(&self.model);
        for resource in request.into_resources() {
            let resource_id = resource.id();
            instance.write(resource_id, resource).inspect_err(|error| {
                warn!(
                    target: ENABLER_TARGET,
                    object_id = self.object_id,
                    instance_id,
                    resource_id,
                    %error,
                    "create aborted by resource write"
                );
            })?;
        }

        self.attach(table, instance_id, instance);
        Ok(LwM2mPath::instance(self.object_id, instance_id))
    }

    pub(super) fn do_collect(
        &self,
        table: &mut InstanceTable,
        identity: ServerIdentity,
        path: LwM2mPath,
        access: Access,
    ) -> ReadResponse {
        match path {
            LwM2mPath::Root | LwM2mPath::Object { .. } => {
                let instances: Vec<LwM2mObjectInstance> = table
                    .iter_mut()
                    .map(|(instance_id, instance)| {
                        self.snapshot(instance_id, instance, identity, access)
                    })
                    .collect();
                Ok(LwM2mObject::new(self.object_id, instances).into())
            }
            LwM2mPath::Instance { instance_id, .. } => {
                let instance = table.get_mut(instance_id).ok_or(ResponseError::NotFound)?;
                Ok(self.snapshot(instance_id, instance, identity, access).into())
            }
            LwM2mPath::Resource {
                instance_id,
                resource_id,
                ..
            } => {
                let instance = table.get_mut(instance_id).ok_or(ResponseError::NotFound)?;
                access.fetch(instance, resource_id)
            }
        }
    }

    /// Collects every model resource the identity may read and the instance
    /// answers with a resource value.
    fn snapshot(
        &self,
        instance_id: InstanceId,
        instance: &mut dyn InstanceEnabler,
        identity: ServerIdentity,
        access: Access,
    ) -> LwM2mObjectInstance {
        let resources: Vec<LwM2mResource> = self
            .model
            .resources()
            .filter(|resource| identity.is_system() || resource.operations().is_readable())
            .filter_map(|resource| {
                access
                    .fetch(instance, resource.id())
                    .ok()
                    .and_then(LwM2mNode::into_resource)
            })
            .collect();
        LwM2mObjectInstance::new(instance_id, resources)
    }

    pub(super) fn do_write(
        &self,
        table: &mut InstanceTable,
        identity: ServerIdentity,
        request: WriteRequest,
    ) -> WriteResponse {
        let mode = request.mode();
        match request.into_target() {
            WriteTarget::Resource {
                instance_id,
                resource,
            } => {
                let instance = table.get_mut(instance_id).ok_or(ResponseError::NotFound)?;
                instance.write(resource.id(), resource)
            }
            WriteTarget::Instance(node) => {
                let instance_id = node.id();
                let instance = table.get_mut(instance_id).ok_or(ResponseError::NotFound)?;
                self.write_instance(instance_id, instance, identity, mode, node.into_resources());
                Ok(())
            }
        }
    }

    /// Applies an instance-level write.
    ///
    /// Replace first walks the model: supplied resources the identity may
    /// write are written, the others are reset. Whatever was not consumed by
    /// that pass, including resources outside the model and resources a
    /// server was not allowed to replace, is then written unconditionally.
    fn write_instance(
        &self,
        instance_id: InstanceId,
        instance: &mut dyn InstanceEnabler,
        identity: ServerIdentity,
        mode: WriteMode,
        mut remaining: BTreeMap<ResourceId, LwM2mResource>,
    ) {
        if mode == WriteMode::Replace {
            for resource in self.model.resources() {
                if identity.is_server() && !resource.operations().is_writable() {
                    continue;
                }
                match remaining.remove(&resource.id()) {
                    Some(supplied) => self.apply(instance_id, instance, supplied),
                    None => instance.reset(resource.id()),
                }
            }
        }
        for supplied in remaining.into_values() {
            self.apply(instance_id, instance, supplied);
        }
    }

    fn apply(
        &self,
        instance_id: InstanceId,
        instance: &mut dyn InstanceEnabler,
        resource: LwM2mResource,
    ) {
        let resource_id = resource.id();
        if let Err(error) = instance.write(resource_id, resource) {
            warn!(
                target: ENABLER_TARGET,
                object_id = self.object_id,
                instance_id,
                resource_id,
                %error,
                "resource write failed"
            );
        }
    }

    pub(super) fn do_bootstrap_write(
        &self,
        table: &mut InstanceTable,
        identity: ServerIdentity,
        request: BootstrapWriteRequest,
    ) -> BootstrapWriteResponse {
        match request.into_target() {
            BootstrapWriteTarget::Object(object) => {
                let outcomes: Vec<Result<(), ResponseError>> = object
                    .into_instances()
                    .into_values()
                    .map(|instance| self.create_or_replace(table, identity, instance))
                    .collect();
                outcomes.into_iter().find_map(Result::err).map_or(Ok(()), Err)
            }
            BootstrapWriteTarget::Instance(instance) => {
                self.create_or_replace(table, identity, instance)
            }
            BootstrapWriteTarget::Resource {
                instance_id,
                resource,
            } => {
                if !table.contains(instance_id) {
                    let request =
                        CreateRequest::with_instance_id(self.object_id, instance_id, [resource]);
                    return self.do_create(table, request).map(drop);
                }
                let instance = table.get_mut(instance_id).ok_or(ResponseError::NotFound)?;
                instance.write(resource.id(), resource)
            }
        }
    }

    fn create_or_replace(
        &self,
        table: &mut InstanceTable,
        identity: ServerIdentity,
        instance: LwM2mObjectInstance,
    ) -> Result<(), ResponseError> {
        if table.contains(instance.id()) {
            self.do_write(
                table,
                identity,
                WriteRequest::instance(WriteMode::Replace, self.object_id, instance),
            )
        } else {
            self.do_create(table, CreateRequest::from_instance(self.object_id, instance))
                .map(drop)
        }
    }

    pub(super) fn do_bootstrap_delete(
        &self,
        table: &mut InstanceTable,
        request: BootstrapDeleteRequest,
    ) -> BootstrapDeleteResponse {
        let path = request.path();
        match path {
            LwM2mPath::Root | LwM2mPath::Object { .. } => {
                let keep = if self.is_security_object() {
                    table.find(|instance| self.classifier.is_bootstrap_server(instance))
                } else {
                    None
                };
                table.retain_only(keep);
                Ok(())
            }
            LwM2mPath::Instance { instance_id, .. } => {
                if self.is_bootstrap_account(table, instance_id) {
                    return Err(ResponseError::bad_request(
                        "bootstrap server can not be deleted",
                    ));
                }
                table
                    .remove(instance_id)
                    .map(drop)
                    .ok_or_else(|| ResponseError::bad_request(format!("instance {path} not found")))
            }
            LwM2mPath::Resource { .. } => Err(ResponseError::bad_request(format!(
                "unexpected path {path}"
            ))),
        }
    }

    fn is_bootstrap_account(&self, table: &InstanceTable, instance_id: InstanceId) -> bool {
        self.is_security_object()
            && table
                .get(instance_id)
                .is_some_and(|instance| self.classifier.is_bootstrap_server(instance))
    }
}
