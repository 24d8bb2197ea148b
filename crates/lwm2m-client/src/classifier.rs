//! Recognition of the bootstrap-server account in the Security object.

use lwm2m_core::{LwM2mNode, SECURITY_BOOTSTRAP_RESOURCE, Value};

use crate::instance::InstanceEnabler;

/// Decides whether an instance is the active bootstrap-server account.
///
/// Only consulted for the Security object.
pub trait BootstrapAccountClassifier: Send + Sync {
    /// Returns `true` when `instance` is the bootstrap-server account.
    fn is_bootstrap_server(&self, instance: &dyn InstanceEnabler) -> bool;
}

/// Flags instances whose "Bootstrap-Server" resource reads as `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityResourceClassifier;

impl BootstrapAccountClassifier for SecurityResourceClassifier {
    fn is_bootstrap_server(&self, instance: &dyn InstanceEnabler) -> bool {
        instance
            .read(SECURITY_BOOTSTRAP_RESOURCE)
            .ok()
            .and_then(LwM2mNode::into_resource)
            .and_then(|resource| resource.single_value().and_then(Value::as_bool))
            .unwrap_or(false)
    }
}
