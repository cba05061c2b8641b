//! Pure state transitions.
//!
//! The reducer is the only code that computes a new notice sequence. It never
//! mutates its input: every action returns a fresh sequence, and notices that
//! change are replaced by modified copies.

use noticeboard_core::types::{Notice, NoticeId, NoticePatch};

/// A state transition request.
#[derive(Clone, Debug)]
pub(crate) enum Action {
    /// Prepend a notice, then truncate to capacity.
    Add(Notice),
    /// Merge a patch into the notice with the given id.
    Update {
        /// Target notice
        id: NoticeId,
        /// Fields to override
        patch: NoticePatch,
    },
    /// Hide one notice, or all of them.
    Dismiss(Option<NoticeId>),
    /// Delete one notice, or clear the sequence.
    Remove(Option<NoticeId>),
}

impl Action {
    /// Short name for logs.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Action::Add(_) => "add",
            Action::Update { .. } => "update",
            Action::Dismiss(_) => "dismiss",
            Action::Remove(_) => "remove",
        }
    }
}

/// Reducer bound to a capacity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Reducer {
    capacity: usize,
}

impl Reducer {
    /// Creates a reducer keeping at most `capacity` notices (minimum 1).
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    /// Configured capacity.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Computes the sequence that follows `state` under `action`.
    pub(crate) fn reduce(&self, state: &[Notice], action: &Action) -> Vec<Notice> {
        match action {
            Action::Add(notice) => std::iter::once(notice.clone())
                .chain(state.iter().filter(|n| n.id != notice.id).cloned())
                .take(self.capacity)
                .collect(),
            Action::Update { id, patch } => state
                .iter()
                .map(|n| if n.id == *id { n.patched(patch) } else { n.clone() })
                .collect(),
            Action::Dismiss(target) => state
                .iter()
                .map(|n| {
                    if target.map_or(true, |id| id == n.id) {
                        n.hidden()
                    } else {
                        n.clone()
                    }
                })
                .collect(),
            Action::Remove(Some(id)) => state.iter().filter(|n| n.id != *id).cloned().collect(),
            Action::Remove(None) => Vec::new(),
        }
    }
}
