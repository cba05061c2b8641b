//! Notice payload types.
//!
//! Content is opaque to the store: it is carried, merged by field, and handed
//! back to renderers, but never interpreted.

use serde::{Deserialize, Serialize};

/// Visual severity of a notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Neutral/informational notice
    #[default]
    Default,
    /// Failure notice; renderers usually highlight it
    Destructive,
}

/// Optional action attached to a notice (e.g. an "Undo" button).
///
/// The store never invokes it; the renderer reports `key` back to the producer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeAction {
    /// Producer-defined identifier routed back on activation
    pub key: String,
    /// Human-readable label
    pub label: String,
}

impl NoticeAction {
    /// Creates a new action.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Producer-supplied payload of a notice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeContent {
    /// Short headline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Severity
    #[serde(default)]
    pub variant: Variant,
    /// Optional action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NoticeAction>,
}

impl NoticeContent {
    /// Creates empty content with the default variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Attaches an action.
    pub fn with_action(mut self, action: NoticeAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Returns true for destructive notices.
    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }

    /// Returns a copy with every field present in `patch` overriding ours.
    pub fn merged(&self, patch: &NoticePatch) -> Self {
        Self {
            title: patch.title.clone().or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            variant: patch.variant.unwrap_or(self.variant),
            action: patch.action.clone().or_else(|| self.action.clone()),
        }
    }
}

/// Partial content for updates.
///
/// `None` fields leave the current value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    /// New action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NoticeAction>,
}

impl NoticePatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Overrides the action.
    pub fn with_action(mut self, action: NoticeAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.variant.is_none()
            && self.action.is_none()
    }
}
