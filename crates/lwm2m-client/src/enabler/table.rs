//! Instance collection guarded by the enabler's lock.

use std::collections::BTreeMap;

use lwm2m_core::InstanceId;

use crate::instance::InstanceEnabler;
use crate::notify::Subscription;

/// An owned instance and the handle keeping the enabler subscribed to it.
pub(super) struct InstanceEntry {
    instance: Box<dyn InstanceEnabler>,
    _subscription: Subscription,
}

impl InstanceEntry {
    pub(super) const fn new(
        instance: Box<dyn InstanceEnabler>,
        subscription: Subscription,
    ) -> Self {
        Self {
            instance,
            _subscription: subscription,
        }
    }

    /// Detaches the subscription and hands the instance back.
    pub(super) fn into_instance(self) -> Box<dyn InstanceEnabler> {
        self.instance
    }
}

/// Instances of one object keyed by id; iteration is ascending.
#[derive(Default)]
pub(super) struct InstanceTable {
    entries: BTreeMap<InstanceId, InstanceEntry>,
}

impl InstanceTable {
    pub(super) fn ids(&self) -> Vec<InstanceId> {
        self.entries.keys().copied().collect()
    }

    pub(super) fn contains(&self, instance_id: InstanceId) -> bool {
        self.entries.contains_key(&instance_id)
    }

    pub(super) fn get(&self, instance_id: InstanceId) -> Option<&dyn InstanceEnabler> {
        self.entries
            .get(&instance_id)
            .map(|entry| entry.instance.as_ref())
    }

    pub(super) fn get_mut(
        &mut self,
        instance_id: InstanceId,
    ) -> Option<&mut (dyn InstanceEnabler + 'static)> {
        self.entries
            .get_mut(&instance_id)
            .map(|entry| entry.instance.as_mut())
    }

    pub(super) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (InstanceId, &mut (dyn InstanceEnabler + 'static))> + '_ {
        self.entries
            .iter_mut()
            .map(|(instance_id, entry)| (*instance_id, entry.instance.as_mut()))
    }

    /// Returns `0` when empty, else one past the highest id in use.
    pub(super) fn next_id(&self) -> Option<InstanceId> {
        self.entries
            .keys()
            .next_back()
            .map_or(Some(0), |highest| highest.checked_add(1))
    }

    /// Returns the lowest id whose instance satisfies `predicate`.
    pub(super) fn find(
        &self,
        mut predicate: impl FnMut(&dyn InstanceEnabler) -> bool,
    ) -> Option<InstanceId> {
        self.entries
            .iter()
            .find(|(_, entry)| predicate(entry.instance.as_ref()))
            .map(|(instance_id, _)| *instance_id)
    }

    /// Inserts an entry, dropping any previous entry with the same id.
    pub(super) fn insert(&mut self, instance_id: InstanceId, entry: InstanceEntry) {
        self.entries.insert(instance_id, entry);
    }

    pub(super) fn remove(&mut self, instance_id: InstanceId) -> Option<InstanceEntry> {
        self.entries.remove(&instance_id)
    }

    /// Drops every entry except `keep`, which stays untouched.
    pub(super) fn retain_only(&mut self, keep: Option<InstanceId>) {
        self.entries.retain(|instance_id, _| Some(*instance_id) == keep);
    }
}
