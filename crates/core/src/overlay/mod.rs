//! Per-user state layered on top of the catalogs.
//!
//! The overlay is the only writer of persistent storage besides the catalog
//! snapshot. Every mutation is flushed synchronously before it returns, so
//! the in-memory state and the persisted copy are never observably out of
//! sync between operations.

mod store;
mod types;

pub use store::UserOverlay;
pub use types::{CommunityReview, CompareOutcome, ProgressEntry, UserProfile};

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for overlay operations.
///
/// Mutations only fail on input validation or when the storage backend
/// does; validation failures leave the overlay untouched.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Rating outside the accepted 1-5 range.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// Progress outside the accepted 0-100 range.
    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    /// The synchronous flush failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
