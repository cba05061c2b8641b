//! Subscriber registration and fan-out.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use noticeboard_core::types::Snapshot;

/// Callback receiving every post-dispatch snapshot.
pub(crate) type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Ordered set of listeners.
///
/// Each `register` call is tracked on its own, even for the same callback.
pub(crate) struct SubscriptionManager {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Listener)>>,
}

impl SubscriptionManager {
    /// Creates an empty manager.
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        })
    }

    /// Registers a listener at the end of the broadcast order.
    pub(crate) fn register(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push((id, listener));
        trace!(subscriber = id, "Subscriber registered");
        Subscription {
            id,
            manager: Arc::downgrade(self),
            active: AtomicBool::new(true),
        }
    }

    fn unregister(&self, id: u64) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        let removed = listeners.len() != before;
        if removed {
            trace!(subscriber = id, "Subscriber removed");
        }
        removed
    }

    /// Invokes every listener, in registration order, with `snapshot`.
    ///
    /// The list is copied before the first call so listeners may subscribe or
    /// unsubscribe while being notified; such changes apply from the next
    /// broadcast.
    pub(crate) fn broadcast(&self, snapshot: &Snapshot) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        trace!(subscribers = listeners.len(), notices = snapshot.len(), "Broadcasting");
        for listener in listeners {
            listener(snapshot);
        }
    }

    /// Number of registered listeners.
    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    manager: Weak<SubscriptionManager>,
    active: AtomicBool,
}

impl Subscription {
    /// Removes the listener. Later calls do nothing.
    ///
    /// Returns true only for the call that actually removed it.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.manager
            .upgrade()
            .map_or(false, |manager| manager.unregister(self.id))
    }

    /// Returns true until `unsubscribe` has been called.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Listener {
        let log = log.clone();
        Arc::new(move |_: &Snapshot| log.lock().push(name))
    }

    #[test]
    fn test_broadcast_in_registration_order() {
        let manager = SubscriptionManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _s1 = manager.register(recording(&log, "s1"));
        let _s2 = manager.register(recording(&log, "s2"));

        manager.broadcast(&Snapshot::empty());
        manager.broadcast(&Snapshot::empty());
        assert_eq!(*log.lock(), vec!["s1", "s2", "s1", "s2"]);
    }

    #[test]
    fn test_same_callback_tracked_independently() {
        let manager = SubscriptionManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recording(&log, "same");
        let first = manager.register(listener.clone());
        let _second = manager.register(listener);
        assert_eq!(manager.len(), 2);

        assert!(first.unsubscribe());
        manager.broadcast(&Snapshot::empty());
        assert_eq!(*log.lock(), vec!["same"]);
    }

    #[test]
    fn test_double_unsubscribe() {
        let manager = SubscriptionManager::new();
        let subscription = manager.register(Arc::new(|_: &Snapshot| {}));
        assert!(subscription.is_active());
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_unsubscribe_after_manager_dropped() {
        let manager = SubscriptionManager::new();
        let subscription = manager.register(Arc::new(|_: &Snapshot| {}));
        drop(manager);
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_unsubscribe_during_broadcast() {
        let manager = SubscriptionManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let inner = slot.clone();
        let first = manager.register(Arc::new(move |_: &Snapshot| {
            if let Some(sub) = inner.lock().as_ref() {
                sub.unsubscribe();
            }
        }));
        *slot.lock() = Some(manager.register(recording(&log, "s2")));

        // s2 still sees the broadcast in which it was removed
        manager.broadcast(&Snapshot::empty());
        manager.broadcast(&Snapshot::empty());
        assert_eq!(*log.lock(), vec!["s2"]);
        assert_eq!(manager.len(), 1);
        first.unsubscribe();
    }
}
