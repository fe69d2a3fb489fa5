use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::ListKind;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Catalog source URLs, one per list kind. The lists are parallel and never
/// merged; the active one is always selected explicitly by the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// CSV export URL for the demon list.
    pub demonlist: String,
    /// CSV export URL for the pemon list.
    pub pemonlist: String,
    /// CSV export URL for the impossible list.
    pub impossiblelist: String,
}

impl SourcesConfig {
    /// Returns the source URL for a list kind.
    pub fn url_for(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Demon => &self.demonlist,
            ListKind::Pemon => &self.pemonlist,
            ListKind::Impossible => &self.impossiblelist,
        }
    }
}

/// Catalog fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// View configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    /// Default number of cards per page (default: 12)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    12
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("demonlens.db")
}
