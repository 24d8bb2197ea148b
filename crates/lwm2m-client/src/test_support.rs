//! Shared fixtures for unit and behaviour tests.

use std::sync::{Arc, Mutex};

use lwm2m_core::{
    ExecuteResponse, LwM2mPath, LwM2mResource, ObjectModel, ObserveResponse, Operations,
    ReadResponse, ResourceModel, ResourceType, SECURITY_BOOTSTRAP_RESOURCE, SECURITY_OBJECT_ID,
    WriteResponse,
};
use mockall::mock;

use crate::instance::InstanceEnabler;
use crate::notify::{NotifySender, ResourceChangedListener, Subscription};

mock! {
    pub(crate) Instance {}
    impl InstanceEnabler for Instance {
        fn read(&self, resource_id: u16) -> ReadResponse;
        fn write(&mut self, resource_id: u16, resource: LwM2mResource) -> WriteResponse;
        fn reset(&mut self, resource_id: u16);
        fn execute(&mut self, resource_id: u16, parameters: &str) -> ExecuteResponse;
        fn observe(&mut self, resource_id: u16) -> ObserveResponse;
        fn subscribe(&self, listener: ResourceChangedListener) -> Subscription;
    }
}

/// Object id of the sensor model used across tests.
pub(crate) const SENSOR_OBJECT_ID: u16 = 4;
/// Read-write label.
pub(crate) const LABEL: u16 = 0;
/// Read-only reading.
pub(crate) const READING: u16 = 1;
/// Write-only secret.
pub(crate) const SECRET: u16 = 2;
/// Executable trigger.
pub(crate) const TRIGGER: u16 = 5;
/// Read-write counter.
pub(crate) const COUNTER: u16 = 7;
/// Resource id absent from the sensor model.
pub(crate) const UNDECLARED: u16 = 42;

pub(crate) fn sensor_model() -> Arc<ObjectModel> {
    Arc::new(ObjectModel::new(
        SENSOR_OBJECT_ID,
        "Sensor",
        [
            ResourceModel::new(LABEL, "Label", Operations::READ_WRITE, ResourceType::String),
            ResourceModel::new(READING, "Reading", Operations::READ, ResourceType::Integer),
            ResourceModel::new(SECRET, "Secret", Operations::WRITE, ResourceType::String),
            ResourceModel::new(TRIGGER, "Trigger", Operations::EXECUTE, ResourceType::None),
            ResourceModel::new(COUNTER, "Counter", Operations::READ_WRITE, ResourceType::Integer),
        ],
    ))
}

pub(crate) fn security_model() -> Arc<ObjectModel> {
    Arc::new(ObjectModel::new(
        SECURITY_OBJECT_ID,
        "LWM2M Security",
        [
            ResourceModel::new(0, "Server URI", Operations::NONE, ResourceType::String),
            ResourceModel::new(
                SECURITY_BOOTSTRAP_RESOURCE,
                "Bootstrap-Server",
                Operations::NONE,
                ResourceType::Boolean,
            ),
        ],
    ))
}

pub(crate) fn security_account(uri: &str, bootstrap: bool) -> [LwM2mResource; 2] {
    [
        LwM2mResource::string(0, uri),
        LwM2mResource::boolean(SECURITY_BOOTSTRAP_RESOURCE, bootstrap),
    ]
}

/// Sink recording every published path.
#[derive(Debug, Default)]
pub(crate) struct RecordingSender {
    paths: Mutex<Vec<LwM2mPath>>,
}

impl RecordingSender {
    pub(crate) fn paths(&self) -> Vec<LwM2mPath> {
        self.paths.lock().expect("recorded paths").clone()
    }

    pub(crate) fn rendered(&self) -> Vec<String> {
        self.paths().iter().map(ToString::to_string).collect()
    }
}

impl NotifySender for RecordingSender {
    fn send_notify(&self, path: &LwM2mPath) {
        self.paths.lock().expect("recorded paths").push(*path);
    }
}
