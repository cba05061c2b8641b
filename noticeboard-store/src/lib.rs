//! # Noticeboard Store
//!
//! Process-wide registry of short-lived, user-facing notices.
//!
//! Producers publish notices, renderers subscribe to the current notice set
//! and re-render on every change. The pieces, leaf first:
//!
//! - **Reducer**: Pure `(state, action) -> state` transition function
//! - **Timeouts**: One pending eviction per dismissed notice
//! - **Subscriptions**: Ordered listener list with idempotent unsubscribe
//! - **Store**: Serialized dispatch path and fan-out
//! - **Board**: The public facade producers and renderers use
//!
//! ## Example
//!
//! ```rust,ignore
//! use noticeboard_store::NoticeBoard;
//! use noticeboard_core::NoticeContent;
//!
//! let board = NoticeBoard::new();
//! let subscription = board.subscribe(|notices| render(notices));
//!
//! let id = board.publish(NoticeContent::new().with_title("Saved"));
//! board.dismiss(id);
//!
//! subscription.unsubscribe();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod board;
mod config;
mod reducer;
mod store;
mod subscriptions;
mod timeouts;

pub use board::{IntoTarget, NoticeBoard, NoticeHandle};
pub use config::StoreConfig;
pub use subscriptions::Subscription;
pub use timeouts::PendingEvictions;

// Re-export the core types producers need alongside the store
pub use noticeboard_core::{
    Notice, NoticeAction, NoticeContent, NoticeError, NoticeId, NoticePatch, Notifier, Snapshot,
    Variant,
};
