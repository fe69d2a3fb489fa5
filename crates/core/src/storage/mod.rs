//! Durable key/value persistence seam.
//!
//! The overlay store and the catalog snapshot cache both write through the
//! [`KvStore`] trait; the presentation layer never touches storage directly.
//! Every value is JSON text so that a malformed entry can be detected and
//! degraded to a default instead of failing the caller.

mod sqlite;

pub use sqlite::SqliteKvStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Trait for key/value storage backends.
pub trait KvStore: Send + Sync {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every stored key.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Persistence keys. The layout is shared with earlier releases, so the
/// names are load-bearing and must not change.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const RECENTLY_VIEWED: &str = "recentlyViewed";
    pub const COMPLETED_LEVELS: &str = "completedLevels";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const USER_PROFILE: &str = "userProfile";
    pub const VIEW_MODE: &str = "viewMode";
    pub const USER_RATINGS: &str = "userRatings";
    pub const LEVEL_PROGRESS: &str = "levelProgress";
    pub const SEARCH_HISTORY: &str = "searchHistory";
    pub const COMMUNITY_REVIEWS: &str = "communityReviews";
    pub const PAGE_SIZE: &str = "pageSize";
    pub const THEME: &str = "theme";
    pub const CACHED_DATA: &str = "cachedDemonData";
    pub const LAST_DATA_UPDATE: &str = "lastDataUpdate";
}
