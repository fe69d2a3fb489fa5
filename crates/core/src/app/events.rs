//! Events surfaced to the presentation adapter.
//!
//! Mutating operations queue events; the adapter drains them after each
//! intent and decides how (or whether) to display them.

use serde::Serialize;

use super::types::DataOrigin;
use crate::catalog::ListKind;

/// Application event types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A catalog became active.
    CatalogLoaded {
        kind: ListKind,
        origin: DataOrigin,
        count: usize,
    },
    /// A network load failed; the adapter should offer the recovery actions.
    CatalogLoadFailed { kind: ListKind, error: String },
    /// An achievement transitioned to unlocked.
    AchievementUnlocked {
        id: String,
        title: String,
        description: String,
    },
    /// A favorite was added or removed.
    FavoriteToggled { id: String, favored: bool },
    /// A completion was added or removed.
    CompletionToggled { id: String, completed: bool },
    /// An add-to-compare intent was rejected because the selection is full.
    CompareSelectionFull { id: String },
}
