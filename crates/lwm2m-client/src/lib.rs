//! Object-instance dispatcher for an LWM2M client.
//!
//! The central type is [`ObjectEnabler`]: one per object id, it owns the
//! instances of that object and routes create, read, observe, write, execute,
//! delete, and the bootstrap variants to them. Around it sit the pieces it
//! consumes:
//!
//! - [`InstanceEnabler`]: the per-instance contract, with the in-memory
//!   [`SimpleInstanceEnabler`] as a ready-made implementation
//! - [`InstanceEnablerFactory`]: builds default instances on create
//! - [`BootstrapAccountClassifier`]: recognises the bootstrap-server account
//!   of the Security object
//! - [`NotifySender`]: receives the paths of changed content
//!
//! [`ObjectsInitializer`] wires enablers for a set of object ids from a
//! [`lwm2m_core::ModelProvider`], and [`telemetry::initialise`] installs the
//! structured logging subscriber hosts usually want.

mod classifier;
mod enabler;
mod error;
mod initializer;
mod instance;
mod notify;
pub mod telemetry;

pub use classifier::{BootstrapAccountClassifier, SecurityResourceClassifier};
pub use enabler::ObjectEnabler;
pub use error::EnablerError;
pub use initializer::ObjectsInitializer;
pub use instance::{
    InstanceEnabler, InstanceEnablerFactory, SimpleInstanceEnabler, SimpleInstanceEnablerFactory,
};
pub use notify::{ChangeNotifier, NotifySender, ResourceChangedListener, Subscription};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests;
