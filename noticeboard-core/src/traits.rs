//! Common traits for noticeboard.
//!
//! Producers (request handlers, background jobs) depend on [`Notifier`] rather
//! than on a concrete store, so they can be tested against a recording fake.

use std::fmt::Display;

use crate::constants::{ERROR_TITLE, SUCCESS_TITLE};
use crate::types::{NoticeContent, NoticeId, NoticePatch, Variant};

// ═══════════════════════════════════════════════════════════════════════════════
// NOTIFIER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Producer-facing interface of a notification store.
///
/// None of these operations can fail: unknown ids are ignored.
pub trait Notifier: Send + Sync {
    /// Publishes a new notice and returns its id.
    fn publish(&self, content: NoticeContent) -> NoticeId;

    /// Merges `patch` into the notice with `id`.
    fn update(&self, id: NoticeId, patch: NoticePatch);

    /// Hides one notice, or every notice when `id` is `None`.
    fn dismiss(&self, id: Option<NoticeId>);

    /// Publishes a destructive "Error" notice with the given description.
    fn report_error(&self, description: &str) -> NoticeId {
        self.publish(
            NoticeContent::new()
                .with_title(ERROR_TITLE)
                .with_description(description)
                .with_variant(Variant::Destructive),
        )
    }

    /// Publishes a default-variant notice with the given title.
    fn report_success(&self, title: &str) -> NoticeId {
        self.publish(NoticeContent::new().with_title(title))
    }

    /// Reports the outcome of a fallible operation.
    ///
    /// `Ok` becomes a "Success" notice; `Err` becomes an error notice carrying
    /// the error's display text. Callable through `dyn Notifier`.
    fn report_result(&self, result: std::result::Result<(), &dyn Display>) -> NoticeId {
        match result {
            Ok(()) => self.report_success(SUCCESS_TITLE),
            Err(err) => self.report_error(&err.to_string()),
        }
    }
}
