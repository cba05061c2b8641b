//! Notice identity and lifecycle.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::content::{NoticeContent, NoticePatch};

/// Opaque notice identifier, assigned by the store.
///
/// Rendered in decimal; the first id a store hands out is `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(u64);

impl NoticeId {
    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NoticeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Callback invoked when a rendering adapter reports a visibility change.
///
/// The store installs one on every notice it publishes; reporting `false`
/// dismisses the notice.
#[derive(Clone)]
pub struct VisibilityHook(Arc<dyn Fn(bool) + Send + Sync>);

impl VisibilityHook {
    /// Wraps a callback.
    pub fn new(callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Invokes the callback.
    pub fn call(&self, visible: bool) {
        (self.0)(visible)
    }
}

impl fmt::Debug for VisibilityHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VisibilityHook(..)")
    }
}

/// One notification instance.
///
/// Notices are replaced, never mutated in place, once they are in a store:
/// subscribers only ever see them through a [`crate::Snapshot`].
#[derive(Clone, Debug, Serialize)]
pub struct Notice {
    /// Store-assigned identifier
    pub id: NoticeId,
    /// Producer payload
    #[serde(flatten)]
    pub content: NoticeContent,
    /// `false` once dismissed; the notice stays until evicted
    pub visible: bool,
    /// Adapter-facing visibility callback
    #[serde(skip)]
    pub on_visibility_change: Option<VisibilityHook>,
}

impl Notice {
    /// Creates a visible notice without a visibility hook.
    pub fn new(id: NoticeId, content: NoticeContent) -> Self {
        Self {
            id,
            content,
            visible: true,
            on_visibility_change: None,
        }
    }

    /// Attaches a visibility hook.
    pub fn with_visibility_hook(mut self, hook: VisibilityHook) -> Self {
        self.on_visibility_change = Some(hook);
        self
    }

    /// Returns a copy with `patch` merged into the content.
    pub fn patched(&self, patch: &NoticePatch) -> Self {
        Self {
            content: self.content.merged(patch),
            ..self.clone()
        }
    }

    /// Returns a hidden copy.
    pub fn hidden(&self) -> Self {
        Self {
            visible: false,
            ..self.clone()
        }
    }

    /// Reports a visibility change from the rendering side.
    ///
    /// Does nothing when no hook is attached.
    pub fn visibility_changed(&self, visible: bool) {
        if let Some(hook) = &self.on_visibility_change {
            hook.call(visible);
        }
    }

    /// Title shortcut.
    pub fn title(&self) -> Option<&str> {
        self.content.title.as_deref()
    }

    /// Description shortcut.
    pub fn description(&self) -> Option<&str> {
        self.content.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notice_starts_visible() {
        let notice = Notice::new(NoticeId::new(1), NoticeContent::new().with_title("A"));
        assert!(notice.visible);
        assert_eq!(notice.title(), Some("A"));
        assert!(notice.on_visibility_change.is_none());
    }

    #[test]
    fn test_hidden_keeps_identity() {
        let notice = Notice::new(NoticeId::new(7), NoticeContent::new().with_title("A"));
        let hidden = notice.hidden();
        assert_eq!(hidden.id, notice.id);
        assert_eq!(hidden.content, notice.content);
        assert!(!hidden.visible);
        assert!(notice.visible);
    }

    #[test]
    fn test_visibility_hook_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let notice = Notice::new(NoticeId::new(1), NoticeContent::new()).with_visibility_hook(
            VisibilityHook::new(move |visible| {
                if !visible {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );
        notice.visibility_changed(true);
        notice.visibility_changed(false);
        notice.clone().visibility_changed(false);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_notice_json_shape() {
        let notice = Notice::new(
            NoticeId::new(1),
            NoticeContent::new()
                .with_title("Error")
                .with_description("Failed to fetch!"),
        )
        .with_visibility_hook(VisibilityHook::new(|_| {}));
        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "title": "Error",
                "description": "Failed to fetch!",
                "variant": "default",
                "visible": true,
            })
        );
    }

    #[test]
    fn test_id_display() {
        assert_eq!(NoticeId::new(42).to_string(), "42");
        assert_eq!(NoticeId::from(3).get(), 3);
    }
}
