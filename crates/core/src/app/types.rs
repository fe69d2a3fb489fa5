//! Application-level state types.

use serde::{Deserialize, Serialize};

/// Which load strategy produced the active catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Network,
    Cache,
    Sample,
}

/// Catalog load state. Exactly one strategy is active at a time; a failed
/// load stays failed until one of the recovery entry points replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Ready(DataOrigin),
    Failed(String),
}

/// Card layout preference, persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Color theme preference, persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Headline numbers for the active catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Levels labelled extreme or impossible.
    pub extreme_count: usize,
}

/// One row of an exported comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub id: String,
    pub creator: String,
    pub verifier: String,
    pub difficulty: String,
    pub rating: f32,
}
