//! Read-only view of the notice sequence.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::notice::{Notice, NoticeId};

/// Immutable, cheaply clonable notice sequence, newest first.
#[derive(Clone, Debug, Default)]
pub struct Snapshot(Arc<[Notice]>);

impl Snapshot {
    /// Empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a notice by id.
    pub fn get(&self, id: NoticeId) -> Option<&Notice> {
        self.0.iter().find(|n| n.id == id)
    }

    /// Returns true if `id` is still in the sequence.
    pub fn contains(&self, id: NoticeId) -> bool {
        self.get(id).is_some()
    }

    /// Notices that have not been dismissed.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter().filter(|n| n.visible)
    }

    /// Ids in sequence order.
    pub fn ids(&self) -> Vec<NoticeId> {
        self.0.iter().map(|n| n.id).collect()
    }

    /// Copies the notices out.
    pub fn to_vec(&self) -> Vec<Notice> {
        self.0.to_vec()
    }
}

impl Deref for Snapshot {
    type Target = [Notice];

    fn deref(&self) -> &[Notice] {
        &self.0
    }
}

impl From<Vec<Notice>> for Snapshot {
    fn from(notices: Vec<Notice>) -> Self {
        Self(notices.into())
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}
