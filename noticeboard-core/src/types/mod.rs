//! Domain types for noticeboard.
//!
//! - [`NoticeContent`]: Producer-supplied payload (title, description, variant, action)
//! - [`NoticePatch`]: Partial content used by updates
//! - [`Notice`]: One notification instance with its lifecycle flag
//! - [`Snapshot`]: Read-only view of the notice sequence handed to subscribers

mod content;
mod notice;
mod snapshot;

pub use content::*;
pub use notice::*;
pub use snapshot::*;
