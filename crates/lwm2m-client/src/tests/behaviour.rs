//! Behaviour-driven tests for instance creation, bootstrap deletion, and
//! change notification.

use std::str::FromStr;
use std::sync::Arc;

use lwm2m_core::{
    BootstrapDeleteRequest, BootstrapDeleteResponse, CreateRequest, CreateResponse, InstanceId,
    LwM2mPath, LwM2mResource, ServerIdentity, WriteRequest,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::test_support::{
    COUNTER, RecordingSender, SENSOR_OBJECT_ID, security_account, security_model, sensor_model,
};
use crate::{
    InstanceEnabler, NotifySender, ObjectEnabler, SecurityResourceClassifier,
    SimpleInstanceEnabler, SimpleInstanceEnablerFactory,
};

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }

    fn ids(&self) -> Vec<InstanceId> {
        self.0
            .split(',')
            .map(|id| id.trim().parse().expect("numeric instance id"))
            .collect()
    }
}

#[derive(Default)]
struct TestWorld {
    enabler: Option<ObjectEnabler>,
    sender: Arc<RecordingSender>,
    created: Option<CreateResponse>,
    deleted: Option<BootstrapDeleteResponse>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn enabler(world: &TestWorld) -> &ObjectEnabler {
    world.enabler.as_ref().expect("enabler should be set")
}

#[given("a sensor object with instances {ids}")]
fn given_sensor_object(world: &mut TestWorld, ids: QuotedString) {
    let model = sensor_model();
    let instances = ids.ids().into_iter().map(|id| {
        let instance: Box<dyn InstanceEnabler> =
            Box::new(SimpleInstanceEnabler::new(Arc::clone(&model)));
        (id, instance)
    });
    let sensors = ObjectEnabler::new(
        Arc::clone(&model),
        Arc::new(SimpleInstanceEnablerFactory::new()),
        Arc::new(SecurityResourceClassifier),
    )
    .with_instances(instances.collect::<Vec<_>>());
    world.enabler = Some(sensors);
}

#[given("a security object with a bootstrap account at 3 and a server account at 0")]
fn given_security_object(world: &mut TestWorld) {
    let model = security_model();
    let account = |uri: &str, bootstrap: bool| -> Box<dyn InstanceEnabler> {
        Box::new(SimpleInstanceEnabler::with_initial_values(
            Arc::clone(&model),
            security_account(uri, bootstrap),
        ))
    };
    let accounts = vec![
        (0, account("coap://server", false)),
        (3, account("coap://bootstrap", true)),
    ];
    let security = ObjectEnabler::new(
        Arc::clone(&model),
        Arc::new(SimpleInstanceEnablerFactory::new()),
        Arc::new(SecurityResourceClassifier),
    )
    .with_instances(accounts);
    world.enabler = Some(security);
}

#[given("a notification sink is attached")]
fn given_notification_sink(world: &mut TestWorld) {
    let sender: Arc<dyn NotifySender> = world.sender.clone();
    enabler(world).set_notify_sender(sender);
}

#[when("the server creates an instance")]
fn when_server_creates(world: &mut TestWorld) {
    let created = enabler(world).create(CreateRequest::new(SENSOR_OBJECT_ID, []));
    world.created = Some(created);
}

#[when("the bootstrap server deletes {path}")]
fn when_bootstrap_deletes(world: &mut TestWorld, path: QuotedString) {
    let target: LwM2mPath = path.as_str().parse().expect("valid path");
    let deleted = enabler(world).bootstrap_delete(BootstrapDeleteRequest::new(target));
    world.deleted = Some(deleted);
}

#[when("the server writes {value} to the counter of instance {id}")]
fn when_server_writes_counter(world: &mut TestWorld, value: QuotedString, id: QuotedString) {
    let counter: i64 = value.as_str().parse().expect("numeric counter");
    let instance_id: InstanceId = id.as_str().parse().expect("numeric instance id");
    enabler(world)
        .write(
            ServerIdentity::Server,
            WriteRequest::resource(
                SENSOR_OBJECT_ID,
                instance_id,
                LwM2mResource::integer(COUNTER, counter),
            ),
        )
        .expect("counter write");
}

#[then("the created path is {path}")]
fn then_created_path(world: &mut TestWorld, path: QuotedString) {
    let created = world
        .created
        .clone()
        .expect("create should have run")
        .expect("create should succeed");
    assert_eq!(created.to_string(), path.as_str());
}

#[then("the instances are {ids}")]
fn then_instances(world: &mut TestWorld, ids: QuotedString) {
    assert_eq!(enabler(world).instance_ids(), ids.ids());
}

#[then("the bootstrap delete succeeds")]
fn then_bootstrap_delete_succeeds(world: &mut TestWorld) {
    let deleted = world.deleted.clone().expect("bootstrap delete should have run");
    assert_eq!(deleted, Ok(()));
}

#[then("the bootstrap delete fails mentioning {text}")]
fn then_bootstrap_delete_fails(world: &mut TestWorld, text: QuotedString) {
    let error = world
        .deleted
        .clone()
        .expect("bootstrap delete should have run")
        .expect_err("expected a refusal");
    assert!(
        error.to_string().contains(text.as_str()),
        "expected '{}' in '{error}'",
        text.as_str()
    );
}

#[then("the published paths are {paths}")]
fn then_published_paths(world: &mut TestWorld, paths: QuotedString) {
    let expected: Vec<&str> = paths.as_str().split(',').collect();
    assert_eq!(world.sender.rendered(), expected);
}

#[scenario(path = "tests/features/object_enabler.feature")]
fn object_enabler_behaviour(world: TestWorld) {
    let _ = world;
}
