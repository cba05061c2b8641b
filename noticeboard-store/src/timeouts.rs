//! Delayed eviction of dismissed notices.
//!
//! Each dismissed notice gets at most one pending eviction. Evictions run as
//! tokio tasks sleeping on the tokio clock, so tests can pause and advance
//! time instead of waiting.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use noticeboard_core::types::NoticeId;

#[derive(Debug)]
struct PendingEviction {
    deadline: Instant,
    task: JoinHandle<()>,
}

/// Tracks one scheduled eviction per notice id.
///
/// There is no cancel: once armed, an eviction fires after the delay. Dropping
/// the registry aborts whatever is still pending. Only the store arms
/// evictions; everyone else gets a [`PendingEvictions`] view.
#[derive(Debug)]
pub(crate) struct TimeoutRegistry {
    delay: Duration,
    pending: Arc<Mutex<HashMap<NoticeId, PendingEviction>>>,
}

impl TimeoutRegistry {
    /// Creates an empty registry whose evictions fire after `delay`.
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Eviction delay.
    pub(crate) fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms an eviction for `id` unless one is already pending.
    ///
    /// When the timer fires, the entry is removed first and `on_expire` runs
    /// afterwards. Returns true if a new eviction was armed. Outside a tokio
    /// runtime nothing is armed and false is returned.
    pub(crate) fn schedule<F>(&self, id: NoticeId, on_expire: F) -> bool
    where
        F: FnOnce(NoticeId) + Send + 'static,
    {
        // Held across spawn + insert so the task cannot observe a missing entry.
        let mut pending = self.pending.lock();
        if pending.contains_key(&id) {
            return false;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(%id, "No tokio runtime; eviction not scheduled");
                return false;
            }
        };

        let deadline = Instant::now() + self.delay;
        let entries = Arc::clone(&self.pending);
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            entries.lock().remove(&id);
            debug!(%id, "Eviction fired");
            on_expire(id);
        });

        debug!(%id, delay_ms = self.delay.as_millis() as u64, "Eviction scheduled");
        pending.insert(id, PendingEviction { deadline, task });
        true
    }

    /// Returns true if an eviction for `id` is armed.
    pub(crate) fn is_pending(&self, id: NoticeId) -> bool {
        self.pending.lock().contains_key(&id)
    }

    /// When the eviction for `id` fires, if one is armed.
    pub(crate) fn deadline(&self, id: NoticeId) -> Option<Instant> {
        self.pending.lock().get(&id).map(|p| p.deadline)
    }

    /// Ids with an armed eviction, soonest first.
    pub(crate) fn pending_ids(&self) -> Vec<NoticeId> {
        let pending = self.pending.lock();
        let mut ids: Vec<_> = pending.iter().map(|(id, p)| (p.deadline, *id)).collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of armed evictions.
    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true if nothing is armed.
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Read-only view of the evictions a store has armed.
///
/// Evictions cannot be armed through the view:
///
/// ```compile_fail
/// use noticeboard_store::{NoticeBoard, NoticeId};
///
/// let board = NoticeBoard::new();
/// board.pending_evictions().schedule(NoticeId::new(1), |_| {});
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PendingEvictions<'a> {
    registry: &'a TimeoutRegistry,
}

impl<'a> PendingEvictions<'a> {
    pub(crate) fn new(registry: &'a TimeoutRegistry) -> Self {
        Self { registry }
    }

    /// Delay between dismissal and eviction.
    pub fn delay(&self) -> Duration {
        self.registry.delay()
    }

    /// Returns true if an eviction for `id` is armed.
    pub fn is_pending(&self, id: NoticeId) -> bool {
        self.registry.is_pending(id)
    }

    /// When the eviction for `id` fires, if one is armed.
    pub fn deadline(&self, id: NoticeId) -> Option<Instant> {
        self.registry.deadline(id)
    }

    /// Ids with an armed eviction, soonest first.
    pub fn ids(&self) -> Vec<NoticeId> {
        self.registry.pending_ids()
    }

    /// Number of armed evictions.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if nothing is armed.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl Drop for TimeoutRegistry {
    fn drop(&mut self) {
        for (_, pending) in self.pending.lock().drain() {
            pending.task.abort();
        }
    }
}
