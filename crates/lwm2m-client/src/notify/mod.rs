//! Resource-change subscriptions and the outbound notification seam.
//!
//! Instances publish changes through a [`ChangeNotifier`]. The object enabler
//! subscribes once per owned instance and keeps the returned
//! [`Subscription`]; dropping that handle detaches the listener, so removed
//! instances stop reaching the enabler. The enabler re-publishes every change
//! as fully-qualified paths to whichever [`NotifySender`] is attached.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use lwm2m_core::{InstanceId, LwM2mPath, ObjectId, ResourceId};

/// Callback invoked with the ids of the resources that changed.
pub type ResourceChangedListener = Arc<dyn Fn(&[ResourceId]) + Send + Sync>;

/// Sink for observation delivery.
///
/// The enabler calls [`NotifySender::send_notify`] while its collection lock
/// may be held, so implementations must hand the path off (queue, channel)
/// rather than call back into the enabler synchronously.
pub trait NotifySender: Send + Sync {
    /// Signals that the content at `path` changed.
    fn send_notify(&self, path: &LwM2mPath);
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, ResourceChangedListener>,
}

fn lock_listeners(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out point an instance embeds to publish resource changes.
///
/// Clones share the same listener set, so a sensor thread can hold a clone
/// and publish changes while the instance itself is owned by an enabler.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use lwm2m_client::ChangeNotifier;
///
/// let notifier = ChangeNotifier::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let subscription = notifier.subscribe(Arc::new(move |ids: &[u16]| {
///     sink.lock().expect("lock").extend_from_slice(ids);
/// }));
///
/// notifier.notify(&[7]);
/// drop(subscription);
/// notifier.notify(&[8]);
///
/// assert_eq!(*seen.lock().expect("lock"), vec![7]);
/// ```
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    listeners: Arc<Mutex<Listeners>>,
}

impl ChangeNotifier {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a listener until the returned handle is dropped.
    pub fn subscribe(&self, listener: ResourceChangedListener) -> Subscription {
        let mut listeners = lock_listeners(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id = listeners.next_id.wrapping_add(1);
        listeners.entries.insert(id, listener);
        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            id,
        }
    }

    /// Publishes a change of `resource_ids` to every attached listener.
    ///
    /// Listeners run after the internal lock is released, so a listener may
    /// subscribe or drop subscriptions without deadlocking.
    pub fn notify(&self, resource_ids: &[ResourceId]) {
        if resource_ids.is_empty() {
            return;
        }
        let listeners: Vec<ResourceChangedListener> = lock_listeners(&self.listeners)
            .entries
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(resource_ids);
        }
    }

    /// Returns the number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock_listeners(&self.listeners).entries.len()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle keeping a listener attached to a [`ChangeNotifier`].
#[must_use = "dropping a subscription detaches its listener"]
pub struct Subscription {
    listeners: Weak<Mutex<Listeners>>,
    id: u64,
}

impl Subscription {
    /// Returns `true` while the listener is still attached.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| lock_listeners(&listeners).entries.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock_listeners(&listeners).entries.remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Shared, swappable reference to the attached [`NotifySender`].
#[derive(Clone, Default)]
pub(crate) struct NotifySlot {
    sender: Arc<RwLock<Option<Arc<dyn NotifySender>>>>,
}

impl NotifySlot {
    pub(crate) fn set(&self, sender: Arc<dyn NotifySender>) {
        *self
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(sender);
    }

    pub(crate) fn clear(&self) {
        *self
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn current(&self) -> Option<Arc<dyn NotifySender>> {
        self.sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.current().is_some()
    }
}

/// Publishes the object, the instance, then each changed resource.
pub(crate) fn publish_changes(
    sender: &dyn NotifySender,
    object_id: ObjectId,
    instance_id: InstanceId,
    resource_ids: &[ResourceId],
) {
    sender.send_notify(&LwM2mPath::object(object_id));
    sender.send_notify(&LwM2mPath::instance(object_id, instance_id));
    for resource_id in resource_ids {
        sender.send_notify(&LwM2mPath::resource(object_id, instance_id, *resource_id));
    }
}
