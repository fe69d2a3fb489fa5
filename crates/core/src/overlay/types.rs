//! Overlay data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate user profile.
///
/// `completed_count` and `favorite_count` mirror the corresponding sets and
/// are resynchronized after every mutation; `level` is always derived from
/// `experience` and never stored independently of the formula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub completed_count: usize,
    #[serde(default)]
    pub favorite_count: usize,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
}

impl UserProfile {
    /// Level derived from experience points: one level per 100 XP.
    pub fn level_for(experience: u32) -> u32 {
        experience / 100 + 1
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: default_username(),
            completed_count: 0,
            favorite_count: 0,
            level: default_level(),
            experience: 0,
        }
    }
}

fn default_username() -> String {
    "Guest".to_string()
}

fn default_level() -> u32 {
    1
}

/// Tracked progress on a level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEntry {
    /// Percentage 0-100. Reaching 100 marks the level completed.
    pub percent: u8,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A free-text review attached to a level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommunityReview {
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of toggling a level into the comparison selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    /// The level was added to the selection.
    Added,
    /// The level was already selected and has been removed.
    Removed,
    /// The selection is full (4 levels); nothing changed.
    LimitReached,
}
