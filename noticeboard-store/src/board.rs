//! Public facade.
//!
//! [`NoticeBoard`] is what producers and renderers hold. It forwards to the
//! store and adds nothing but per-notice handles.

use tracing::instrument;

use noticeboard_core::error::Result;
use noticeboard_core::traits::Notifier;
use noticeboard_core::types::{NoticeContent, NoticeId, NoticePatch, Snapshot};

use crate::config::StoreConfig;
use crate::store::NoticeStore;
use crate::subscriptions::Subscription;
use crate::timeouts::PendingEvictions;

/// Entry point for publishing, dismissing and observing notices.
///
/// Construct one per application and share it (it is cheap to clone). The
/// board is the only way in: raw actions cannot be dispatched from outside.
///
/// ```compile_fail
/// use noticeboard_store::NoticeBoard;
///
/// let board = NoticeBoard::new();
/// board.store();
/// ```
#[derive(Clone, Debug, Default)]
pub struct NoticeBoard {
    store: NoticeStore,
}

impl NoticeBoard {
    /// Creates a board with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board with a validated custom configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            store: NoticeStore::with_config(config)?,
        })
    }

    /// Creates a board configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::with_config(StoreConfig::from_env()?)
    }

    /// Publishes a notice and returns its id immediately.
    #[instrument(skip(self, content), fields(title = content.title.as_deref()))]
    pub fn publish(&self, content: NoticeContent) -> NoticeId {
        self.store.publish(content)
    }

    /// Publishes a notice and returns a handle bound to it.
    pub fn toast(&self, content: NoticeContent) -> NoticeHandle {
        let id = self.publish(content);
        self.handle(id)
    }

    /// Handle for an existing (or already evicted) notice.
    pub fn handle(&self, id: NoticeId) -> NoticeHandle {
        NoticeHandle {
            id,
            store: self.store.clone(),
        }
    }

    /// Merges `patch` into the notice with `id`. Unknown ids are ignored.
    pub fn update(&self, id: NoticeId, patch: NoticePatch) {
        self.store.update(id, patch);
    }

    /// Hides one notice, or all of them with `None`. Unknown ids are ignored.
    #[instrument(skip(self, id), fields(id = ?id.into_option()))]
    pub fn dismiss(&self, id: impl IntoTarget) {
        self.store.dismiss(id.into_option());
    }

    /// Registers a listener called with the new snapshot after every dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Current notices, newest first.
    pub fn state(&self) -> Snapshot {
        self.store.state()
    }

    /// Read-only view of the armed evictions.
    pub fn pending_evictions(&self) -> PendingEvictions<'_> {
        self.store.pending_evictions()
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.store.subscriber_count()
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        self.store.config()
    }
}

impl Notifier for NoticeBoard {
    fn publish(&self, content: NoticeContent) -> NoticeId {
        NoticeBoard::publish(self, content)
    }

    fn update(&self, id: NoticeId, patch: NoticePatch) {
        NoticeBoard::update(self, id, patch)
    }

    fn dismiss(&self, id: Option<NoticeId>) {
        NoticeBoard::dismiss(self, id)
    }
}

/// Accepts either a single id or `None` (meaning every notice).
pub trait IntoTarget: Copy {
    /// Converts into the dismissal target.
    fn into_option(self) -> Option<NoticeId>;
}

impl IntoTarget for NoticeId {
    fn into_option(self) -> Option<NoticeId> {
        Some(self)
    }
}

impl IntoTarget for Option<NoticeId> {
    fn into_option(self) -> Option<NoticeId> {
        self
    }
}

/// Operations bound to one published notice.
#[derive(Clone, Debug)]
pub struct NoticeHandle {
    id: NoticeId,
    store: NoticeStore,
}

impl NoticeHandle {
    /// The notice id.
    pub fn id(&self) -> NoticeId {
        self.id
    }

    /// Dismisses this notice.
    pub fn dismiss(&self) {
        self.store.dismiss(Some(self.id));
    }

    /// Merges `patch` into this notice.
    pub fn update(&self, patch: NoticePatch) {
        self.store.update(self.id, patch);
    }

    /// Returns true while the notice is still in the store.
    pub fn is_present(&self) -> bool {
        self.store.state().contains(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::json;

    use noticeboard_core::types::{Notice, Variant};

    const DELAY: Duration = Duration::from_secs(30);

    fn board(capacity: usize) -> NoticeBoard {
        NoticeBoard::with_config(
            StoreConfig::default()
                .with_capacity(capacity)
                .with_eviction_delay(DELAY),
        )
        .unwrap()
    }

    /// Lets the paused clock run past `duration` and the woken tasks finish.
    async fn elapse(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    fn record(board: &NoticeBoard) -> (Arc<Mutex<Vec<Snapshot>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let subscription = board.subscribe(move |s: &Snapshot| log.lock().push(s.clone()));
        (seen, subscription)
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let board = NoticeBoard::new();
        let first = board.publish(NoticeContent::new().with_title("first"));
        let second = board.publish(NoticeContent::new().with_title("second"));

        let state = board.state();
        assert_eq!(state.len(), 1);
        assert!(!state.contains(first));
        assert!(state.contains(second));
    }

    #[test]
    fn test_capacity_holds_after_every_dispatch() {
        let board = board(2);
        let (seen, _sub) = record(&board);
        for i in 0..6 {
            board.publish(NoticeContent::new().with_title(format!("n{i}")));
        }
        assert!(seen.lock().iter().all(|s| s.len() <= 2));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_dismiss_then_evict() {
        let board = board(1);
        let (seen, _sub) = record(&board);
        let id = board.publish(NoticeContent::new().with_title("A"));

        board.dismiss(id);
        // hidden synchronously, before the timer fires
        let last = seen.lock().last().cloned().unwrap();
        assert!(!last.get(id).unwrap().visible);
        assert!(board.pending_evictions().is_pending(id));

        elapse(DELAY - Duration::from_millis(1)).await;
        assert!(board.state().contains(id));

        elapse(Duration::from_millis(2)).await;
        assert!(!board.state().contains(id));
        assert!(seen.lock().last().unwrap().is_empty());
        assert!(board.pending_evictions().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_double_dismiss_evicts_once() {
        let board = board(1);
        let id = board.publish(NoticeContent::new().with_title("A"));
        let (seen, _sub) = record(&board);

        board.dismiss(id);
        board.dismiss(id);
        assert_eq!(board.pending_evictions().len(), 1);

        elapse(DELAY * 3).await;
        assert!(board.state().is_empty());
        // two dismiss broadcasts, exactly one removal broadcast
        assert_eq!(seen.lock().len(), 3);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_redismiss_does_not_extend_timer() {
        let board = board(1);
        let id = board.publish(NoticeContent::new().with_title("A"));
        board.dismiss(id);
        elapse(DELAY / 2).await;
        board.dismiss(id);

        elapse(DELAY / 2 + Duration::from_millis(1)).await;
        assert!(!board.state().contains(id));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_capacity_eviction_preempts_timer() {
        let board = board(1);
        let first = board.publish(NoticeContent::new().with_title("A"));
        board.dismiss(first);
        let second = board.publish(NoticeContent::new().with_title("B"));
        assert!(!board.state().contains(first));

        elapse(DELAY * 2).await;
        // the stale eviction of `first` leaves `second` alone
        assert_eq!(board.state().ids(), vec![second]);
        assert!(board.state()[0].visible);
    }

    #[test]
    fn test_update_merge() {
        let board = NoticeBoard::new();
        let x = board.publish(NoticeContent::new().with_title("A"));
        board.update(x, NoticePatch::new().with_description("B"));

        let notice = board.state().get(x).cloned().unwrap();
        assert_eq!(notice.title(), Some("A"));
        assert_eq!(notice.description(), Some("B"));
    }

    #[test]
    fn test_broadcast_order() {
        let board = NoticeBoard::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let (o1, o2) = (order.clone(), order.clone());
        let _s1 = board.subscribe(move |_: &Snapshot| o1.lock().push("S1"));
        let _s2 = board.subscribe(move |_: &Snapshot| o2.lock().push("S2"));

        board.publish(NoticeContent::new().with_title("A"));
        board
            .store
            .dispatch(crate::reducer::Action::Remove(Some(NoticeId::new(404))));
        assert_eq!(*order.lock(), vec!["S1", "S2", "S1", "S2"]);
    }

    #[test]
    fn test_unsubscribe_safety() {
        let board = NoticeBoard::new();
        let (seen, subscription) = record(&board);
        board.publish(NoticeContent::new().with_title("A"));
        board.publish(NoticeContent::new().with_title("B"));

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        board.publish(NoticeContent::new().with_title("C"));

        assert_eq!(seen.lock().len(), 2);
        assert_eq!(board.subscriber_count(), 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_end_to_end_scenario() {
        let board = NoticeBoard::new();
        let id = board.publish(
            NoticeContent::new()
                .with_title("Error")
                .with_description("Failed to fetch!"),
        );
        assert_eq!(id.to_string(), "1");
        assert_eq!(
            serde_json::to_value(board.state()).unwrap(),
            json!([{
                "id": 1,
                "title": "Error",
                "description": "Failed to fetch!",
                "variant": "default",
                "visible": true,
            }])
        );

        board.dismiss(None);
        let state = board.state();
        assert_eq!(state.len(), 1);
        assert!(!state[0].visible);

        elapse(StoreConfig::default().eviction_delay() + Duration::from_millis(1)).await;
        assert!(board.state().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_handle_operations() {
        let board = board(1);
        let handle = board.toast(NoticeContent::new().with_title("Saving"));
        handle.update(
            NoticePatch::new()
                .with_title("Saved")
                .with_variant(Variant::Default),
        );
        assert_eq!(board.state()[0].title(), Some("Saved"));

        handle.dismiss();
        assert!(!board.state()[0].visible);
        elapse(DELAY + Duration::from_millis(1)).await;
        assert!(!handle.is_present());

        // stale handles stay harmless
        handle.dismiss();
        handle.update(NoticePatch::new().with_title("ghost"));
        assert!(board.state().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_renderer_close_evicts() {
        let board = board(1);
        let id = board.publish(NoticeContent::new().with_title("A"));
        let rendered: Notice = board.state()[0].clone();

        // the rendering adapter reports that the user closed the notice
        rendered.visibility_changed(false);
        assert!(!board.state()[0].visible);
        assert!(board.pending_evictions().is_pending(id));

        elapse(DELAY + Duration::from_millis(1)).await;
        assert!(board.state().is_empty());
    }

    #[test]
    fn test_notifier_reports() {
        let board = NoticeBoard::new();
        let notifier: Arc<dyn Notifier> = Arc::new(board.clone());
        notifier.report_error("Failed to fetch!");

        let notice = board.state()[0].clone();
        assert_eq!(notice.title(), Some("Error"));
        assert_eq!(notice.content.variant, Variant::Destructive);

        board.report_result(Ok(()));
        assert_eq!(board.state()[0].title(), Some("Success"));

        let err = String::from("timeout");
        notifier.report_result(Err(&err));
        assert_eq!(board.state()[0].description(), Some("timeout"));
        assert!(board.state()[0].content.is_destructive());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(NoticeBoard::with_config(StoreConfig::default().with_capacity(0)).is_err());
    }
}
