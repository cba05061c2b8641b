//! The notice store.
//!
//! All state changes go through [`NoticeStore::dispatch`]: the reducer computes
//! the next sequence, dismissals arm their evictions, and every subscriber is
//! handed the new snapshot before the call returns.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{debug, trace, warn};

use noticeboard_core::constants::ID_WRAP;
use noticeboard_core::error::Result;
use noticeboard_core::types::{
    Notice, NoticeContent, NoticeId, NoticePatch, Snapshot, VisibilityHook,
};

use crate::config::StoreConfig;
use crate::reducer::{Action, Reducer};
use crate::subscriptions::{Subscription, SubscriptionManager};
use crate::timeouts::{PendingEvictions, TimeoutRegistry};

/// Shared handle to a notice store.
///
/// Cloning is cheap; clones address the same store. Collaborators reach it
/// only through `NoticeBoard`.
#[derive(Clone)]
pub(crate) struct NoticeStore {
    shared: Arc<Shared>,
}

struct Shared {
    config: StoreConfig,
    reducer: Reducer,
    state: RwLock<Snapshot>,
    /// Actions waiting for the running drain
    queue: Mutex<VecDeque<Action>>,
    /// Serializes dispatch; `true` while a drain is running on the owning thread
    draining: ReentrantMutex<Cell<bool>>,
    subscriptions: Arc<SubscriptionManager>,
    timeouts: TimeoutRegistry,
    next_id: AtomicU64,
}

/// Ends a drain, including when a subscriber unwinds out of it.
///
/// A finished drain leaves the queue empty. After a panic, actions queued
/// behind the failed broadcast are discarded.
struct DrainGuard<'a> {
    draining: &'a Cell<bool>,
    queue: &'a Mutex<VecDeque<Action>>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        let discarded = self.queue.lock().drain(..).count();
        if discarded > 0 {
            warn!(discarded, "Discarding dispatches queued behind a failed broadcast");
        }
        self.draining.set(false);
    }
}

impl NoticeStore {
    /// Creates a store with the default configuration.
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Creates a store with a validated custom configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                reducer: Reducer::new(config.capacity),
                timeouts: TimeoutRegistry::new(config.eviction_delay()),
                state: RwLock::new(Snapshot::empty()),
                queue: Mutex::new(VecDeque::new()),
                draining: ReentrantMutex::new(Cell::new(false)),
                subscriptions: SubscriptionManager::new(),
                next_id: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Applies `action` and broadcasts the result to every subscriber.
    ///
    /// Dispatches issued by a subscriber during a broadcast are applied, in
    /// order, once the current broadcast has finished.
    pub(crate) fn dispatch(&self, action: Action) {
        self.shared.dispatch(action);
    }

    /// Builds a visible notice with a fresh id and adds it.
    pub fn publish(&self, content: NoticeContent) -> NoticeId {
        self.shared.publish(content)
    }

    /// Merges `patch` into the notice with `id`, if present.
    pub fn update(&self, id: NoticeId, patch: NoticePatch) {
        self.shared.dispatch(Action::Update { id, patch });
    }

    /// Hides one notice (or all) and arms their evictions.
    pub fn dismiss(&self, id: Option<NoticeId>) {
        self.shared.dispatch(Action::Dismiss(id));
    }

    /// Current notice sequence.
    pub fn state(&self) -> Snapshot {
        self.shared.state.read().clone()
    }

    /// Registers a listener for every future dispatch.
    ///
    /// The listener is not called with the current state; use
    /// [`NoticeStore::state`] for that.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.shared.subscriptions.register(Arc::new(listener))
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscriptions.len()
    }

    /// Read-only view of the armed evictions.
    pub fn pending_evictions(&self) -> PendingEvictions<'_> {
        PendingEvictions::new(&self.shared.timeouts)
    }

    #[cfg(test)]
    fn starting_after(config: StoreConfig, last_id: u64) -> Self {
        let store = Self::build(config);
        store.shared.next_id.store(last_id, Ordering::SeqCst);
        store
    }
}

impl Default for NoticeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NoticeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeStore")
            .field("config", &self.shared.config)
            .field("notices", &self.shared.state.read().len())
            .field("subscribers", &self.shared.subscriptions.len())
            .field("pending_evictions", &self.shared.timeouts.len())
            .finish()
    }
}

impl Shared {
    fn dispatch(self: &Arc<Self>, action: Action) {
        let draining = self.draining.lock();
        self.queue.lock().push_back(action);
        if draining.get() {
            trace!("Dispatch queued behind running broadcast");
            return;
        }

        draining.set(true);
        let _reset = DrainGuard {
            draining: &draining,
            queue: &self.queue,
        };
        loop {
            let next = self.queue.lock().pop_front();
            let Some(action) = next else { break };
            self.apply(action);
        }
    }

    fn apply(self: &Arc<Self>, action: Action) {
        let next = {
            let mut state = self.state.write();
            let next = Snapshot::from(self.reducer.reduce(&state, &action));
            if let Action::Add(_) = action {
                let evicted = dropped_ids(&state, &next);
                if !evicted.is_empty() {
                    debug!(
                        evicted = evicted.len(),
                        ids = ?evicted,
                        capacity = self.reducer.capacity(),
                        "Capacity eviction"
                    );
                }
            }
            *state = next.clone();
            next
        };
        trace!(action = action.kind(), notices = next.len(), "Dispatched");

        if let Action::Dismiss(target) = action {
            for notice in next.iter().filter(|n| target.map_or(true, |id| id == n.id)) {
                self.schedule_eviction(notice.id);
            }
        }

        self.subscriptions.broadcast(&next);
    }

    fn publish(self: &Arc<Self>, content: NoticeContent) -> NoticeId {
        let id = self.allocate_id();
        let store = Arc::downgrade(self);
        let hook = VisibilityHook::new(move |visible| {
            if visible {
                return;
            }
            if let Some(shared) = store.upgrade() {
                shared.dispatch(Action::Dismiss(Some(id)));
            }
        });

        debug!(%id, variant = ?content.variant, "Publishing notice");
        self.dispatch(Action::Add(Notice::new(id, content).with_visibility_hook(hook)));
        id
    }

    fn schedule_eviction(self: &Arc<Self>, id: NoticeId) {
        let store = Arc::downgrade(self);
        self.timeouts.schedule(id, move |id| {
            if let Some(shared) = store.upgrade() {
                shared.dispatch(Action::Remove(Some(id)));
            }
        });
    }

    fn allocate_id(&self) -> NoticeId {
        let previous = match self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some((n + 1) % ID_WRAP))
        {
            Ok(n) | Err(n) => n,
        };
        NoticeId::new((previous + 1) % ID_WRAP)
    }
}

/// Ids present in `before` but gone from `after`.
fn dropped_ids(before: &[Notice], after: &Snapshot) -> Vec<NoticeId> {
    before
        .iter()
        .map(|n| n.id)
        .filter(|id| !after.contains(*id))
        .collect()
}
