use std::fmt;
use std::sync::Arc;

use dashmap::DashSet;

use crate::metrics::prometheus;

/// Chat identifier of someone who asked for alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub i64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of subscribed chats, shared between command handlers (writers)
/// and the notification fan-out (reader).
///
/// DashSet-backed, so clones share the same set.
#[derive(Clone, Debug, Default)]
pub struct SubscriberRegistry {
    inner: Arc<DashSet<SubscriberId>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not subscribed before.
    pub fn add(&self, id: SubscriberId) -> bool {
        let inserted = self.inner.insert(id);
        prometheus::record_subscriber_count(self.inner.len());
        inserted
    }

    /// Returns `true` if the id was subscribed.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.inner.remove(&id).is_some();
        prometheus::record_subscriber_count(self.inner.len());
        removed
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.inner.contains(&id)
    }

    /// Point-in-time copy. Mutations after this call are not reflected.
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        self.inner.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_are_idempotent() {
        let registry = SubscriberRegistry::new();

        assert!(registry.add(SubscriberId(1)));
        assert!(!registry.add(SubscriberId(1)));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(SubscriberId(1)));
        assert!(!registry.remove(SubscriberId(1)));
        assert!(!registry.remove(SubscriberId(42)));
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let registry = SubscriberRegistry::new();
        registry.add(SubscriberId(1));
        registry.add(SubscriberId(2));

        let mut snapshot = registry.snapshot();
        registry.remove(SubscriberId(1));
        registry.add(SubscriberId(3));

        snapshot.sort();
        assert_eq!(snapshot, vec![SubscriberId(1), SubscriberId(2)]);
        assert!(!registry.contains(SubscriberId(1)));
        assert!(registry.contains(SubscriberId(3)));
    }

    #[test]
    fn clones_share_membership() {
        let registry = SubscriberRegistry::new();
        let handle = registry.clone();

        handle.add(SubscriberId(7));

        assert!(registry.contains(SubscriberId(7)));
    }

    #[test]
    fn mutation_while_iterating_a_snapshot_is_safe() {
        let registry = SubscriberRegistry::new();
        for id in 0..100 {
            registry.add(SubscriberId(id));
        }

        for id in registry.snapshot() {
            registry.remove(id);
            registry.add(SubscriberId(id.0 + 1_000));
        }

        assert_eq!(registry.len(), 100);
        assert!((0..100).all(|id| !registry.contains(SubscriberId(id))));
    }
}
