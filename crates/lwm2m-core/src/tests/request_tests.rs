//! Tests for request construction and path/node validation.

use rstest::rstest;

use crate::{
    BootstrapDeleteRequest, BootstrapWriteRequest, BootstrapWriteTarget, CreateRequest,
    DeleteRequest, ExecuteRequest, LwM2mNode, LwM2mObject, LwM2mObjectInstance, LwM2mPath,
    LwM2mResource, RequestError, WriteMode, WriteRequest, WriteTarget,
};

fn instance_node(id: u16) -> LwM2mNode {
    LwM2mObjectInstance::new(id, [LwM2mResource::string(0, "coap://server")]).into()
}

#[test]
fn create_without_id_targets_object() {
    let request = CreateRequest::new(1, [LwM2mResource::integer(0, 123)]);
    assert_eq!(request.path(), LwM2mPath::object(1));
    assert_eq!(request.instance_id(), None);
    assert_eq!(request.resources().len(), 1);
}

#[test]
fn create_from_instance_keeps_id_and_resources() {
    let snapshot = LwM2mObjectInstance::new(
        7,
        [LwM2mResource::integer(0, 1), LwM2mResource::integer(1, 300)],
    );
    let request = CreateRequest::from_instance(1, snapshot);
    assert_eq!(request.instance_id(), Some(7));
    let ids: Vec<u16> = request.into_resources().iter().map(LwM2mResource::id).collect();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn write_accepts_matching_instance_node() {
    let request = WriteRequest::new(WriteMode::Update, LwM2mPath::instance(0, 2), instance_node(2))
        .expect("valid write");
    assert_eq!(request.mode(), WriteMode::Update);
    assert!(!request.is_replace());
    assert_eq!(request.path(), LwM2mPath::instance(0, 2));
    assert!(matches!(request.target(), WriteTarget::Instance(_)));
}

#[test]
fn write_accepts_matching_resource_node() {
    let request = WriteRequest::new(
        WriteMode::Replace,
        LwM2mPath::resource(3, 0, 13),
        LwM2mResource::integer(13, 1_700_000_000).into(),
    )
    .expect("valid write");
    assert_eq!(request.path(), LwM2mPath::resource(3, 0, 13));
    assert!(matches!(
        request.into_target(),
        WriteTarget::Resource { instance_id: 0, .. }
    ));
}

#[rstest]
#[case::object_path(LwM2mPath::object(3))]
#[case::root_path(LwM2mPath::Root)]
fn write_rejects_coarse_paths(#[case] path: LwM2mPath) {
    let err = WriteRequest::new(WriteMode::Replace, path, instance_node(0))
        .expect_err("should reject");
    assert!(matches!(err, RequestError::UnsupportedPath { .. }));
}

#[test]
fn write_rejects_level_mismatch() {
    let err = WriteRequest::new(
        WriteMode::Replace,
        LwM2mPath::resource(3, 0, 1),
        instance_node(0),
    )
    .expect_err("should reject");
    assert!(matches!(
        err,
        RequestError::NodeMismatch {
            found: "instance",
            ..
        }
    ));
}

#[test]
fn write_rejects_id_mismatch() {
    let err = WriteRequest::new(WriteMode::Replace, LwM2mPath::instance(3, 0), instance_node(1))
        .expect_err("should reject");
    assert_eq!(
        err,
        RequestError::IdMismatch {
            operation: "write",
            path: LwM2mPath::instance(3, 0),
            node_id: 1,
        }
    );
}

#[test]
fn bootstrap_write_accepts_object_node() {
    let object = LwM2mObject::new(0, [LwM2mObjectInstance::new(0, [])]);
    let request = BootstrapWriteRequest::new(LwM2mPath::object(0), object.into())
        .expect("valid bootstrap write");
    assert_eq!(request.path(), LwM2mPath::object(0));
    assert!(matches!(request.target(), BootstrapWriteTarget::Object(_)));
}

#[test]
fn bootstrap_write_rejects_root() {
    let err = BootstrapWriteRequest::new(LwM2mPath::Root, instance_node(0))
        .expect_err("should reject");
    assert!(matches!(err, RequestError::UnsupportedPath { .. }));
}

#[test]
fn bootstrap_write_rejects_object_id_mismatch() {
    let object = LwM2mObject::new(1, []);
    let err = BootstrapWriteRequest::new(LwM2mPath::object(0), object.into())
        .expect_err("should reject");
    assert!(matches!(err, RequestError::IdMismatch { node_id: 1, .. }));
}

#[test]
fn execute_carries_parameters() {
    let request = ExecuteRequest::new(3, 0, 4).with_parameters("0='delay'");
    assert_eq!(request.path(), LwM2mPath::resource(3, 0, 4));
    assert_eq!(request.instance_id(), 0);
    assert_eq!(request.resource_id(), 4);
    assert_eq!(request.parameters(), Some("0='delay'"));
    assert_eq!(ExecuteRequest::new(3, 0, 4).parameters(), None);
}

#[test]
fn delete_targets_instance() {
    let request = DeleteRequest::new(1, 2);
    assert_eq!(request.path(), LwM2mPath::instance(1, 2));
    assert_eq!(request.instance_id(), 2);
}

#[test]
fn bootstrap_delete_accepts_any_path() {
    let request = BootstrapDeleteRequest::new(LwM2mPath::resource(0, 0, 1));
    assert_eq!(request.path(), LwM2mPath::resource(0, 0, 1));
}
