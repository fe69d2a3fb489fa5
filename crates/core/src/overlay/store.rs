//! The overlay store: load, mutate, flush.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{CommunityReview, CompareOutcome, ProgressEntry, UserProfile};
use super::OverlayError;
use crate::catalog::Level;
use crate::storage::{keys, KvStore, StorageError};

/// Bound for the recently-viewed list and the search history.
const RECENT_BOUND: usize = 10;
/// Bound for the comparison selection.
const COMPARE_BOUND: usize = 4;
/// Experience awarded when a level is completed. Never taken back.
const COMPLETION_XP: u32 = 10;

/// Per-user state, persisted key-by-key through the storage seam.
pub struct UserOverlay {
    store: Arc<dyn KvStore>,
    favorites: Vec<String>,
    completed: Vec<String>,
    recently_viewed: Vec<Level>,
    ratings: BTreeMap<String, u8>,
    progress: BTreeMap<String, ProgressEntry>,
    reviews: BTreeMap<String, Vec<CommunityReview>>,
    search_history: Vec<String>,
    unlocked: Vec<String>,
    profile: UserProfile,
    // Comparison selection is session-scoped and not persisted.
    compare: Vec<Level>,
}

impl UserOverlay {
    /// Load the overlay from storage, defaulting each key independently when
    /// it is absent or corrupt.
    pub fn load(store: Arc<dyn KvStore>) -> Self {
        let favorites: Vec<String> = read_or_default(store.as_ref(), keys::FAVORITES);
        let completed: Vec<String> = read_or_default(store.as_ref(), keys::COMPLETED_LEVELS);
        let mut profile: UserProfile = read_or_default(store.as_ref(), keys::USER_PROFILE);

        // The counts and the level are derived values; recompute them so a
        // stale or hand-edited profile cannot violate the invariants.
        profile.completed_count = completed.len();
        profile.favorite_count = favorites.len();
        profile.level = UserProfile::level_for(profile.experience);

        Self {
            favorites,
            completed,
            recently_viewed: read_or_default(store.as_ref(), keys::RECENTLY_VIEWED),
            ratings: read_or_default(store.as_ref(), keys::USER_RATINGS),
            progress: read_or_default(store.as_ref(), keys::LEVEL_PROGRESS),
            reviews: read_or_default(store.as_ref(), keys::COMMUNITY_REVIEWS),
            search_history: read_or_default(store.as_ref(), keys::SEARCH_HISTORY),
            unlocked: read_or_default(store.as_ref(), keys::ACHIEVEMENTS),
            profile,
            compare: Vec::new(),
            store,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    /// Completed ids as a set, for filter predicates.
    pub fn completed_set(&self) -> HashSet<String> {
        self.completed.iter().cloned().collect()
    }

    /// Most-recent-first level snapshots, at most 10.
    pub fn recently_viewed(&self) -> &[Level] {
        &self.recently_viewed
    }

    pub fn ratings(&self) -> &BTreeMap<String, u8> {
        &self.ratings
    }

    pub fn rating_of(&self, id: &str) -> Option<u8> {
        self.ratings.get(id).copied()
    }

    pub fn progress(&self) -> &BTreeMap<String, ProgressEntry> {
        &self.progress
    }

    pub fn progress_of(&self, id: &str) -> Option<&ProgressEntry> {
        self.progress.get(id)
    }

    pub fn reviews_for(&self, id: &str) -> &[CommunityReview] {
        self.reviews.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total review count across all levels.
    pub fn total_review_count(&self) -> usize {
        self.reviews.values().map(Vec::len).sum()
    }

    /// Most-recent-first search terms, at most 10, de-duplicated.
    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    pub fn unlocked_achievements(&self) -> &[String] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|a| a == id)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn compare_selection(&self) -> &[Level] {
        &self.compare
    }

    // =========================================================================
    // Mutations — each flushes synchronously before returning
    // =========================================================================

    /// Toggle a level in or out of the favorites. Returns whether the level
    /// is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, OverlayError> {
        let now_favorite = if let Some(pos) = self.favorites.iter().position(|f| f == id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(id.to_string());
            true
        };

        self.persist(keys::FAVORITES, &self.favorites)?;
        self.sync_profile()?;

        debug!(id, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    /// Toggle a level's completed state. Completing awards experience and
    /// pins the progress entry at 100; un-completing drops the progress
    /// entry so the two views stay in agreement.
    pub fn toggle_completed(&mut self, id: &str) -> Result<bool, OverlayError> {
        let now_completed = if let Some(pos) = self.completed.iter().position(|c| c == id) {
            self.completed.remove(pos);
            self.progress.remove(id);
            false
        } else {
            self.completed.push(id.to_string());
            let note = self.progress.get(id).and_then(|p| p.note.clone());
            self.progress
                .insert(id.to_string(), ProgressEntry { percent: 100, note });
            self.profile.experience += COMPLETION_XP;
            true
        };

        self.persist(keys::COMPLETED_LEVELS, &self.completed)?;
        self.persist(keys::LEVEL_PROGRESS, &self.progress)?;
        self.sync_profile()?;

        debug!(id, now_completed, "completion toggled");
        Ok(now_completed)
    }

    /// Record or update progress on a level. Reaching 100 marks the level
    /// completed (awarding experience if it was not already); dropping below
    /// 100 removes the completion.
    pub fn set_progress(
        &mut self,
        id: &str,
        percent: u8,
        note: Option<String>,
    ) -> Result<(), OverlayError> {
        if percent > 100 {
            return Err(OverlayError::InvalidProgress(percent));
        }

        let note = note.or_else(|| self.progress.get(id).and_then(|p| p.note.clone()));
        self.progress
            .insert(id.to_string(), ProgressEntry { percent, note });

        if percent == 100 {
            if !self.is_completed(id) {
                self.completed.push(id.to_string());
                self.profile.experience += COMPLETION_XP;
            }
        } else if let Some(pos) = self.completed.iter().position(|c| c == id) {
            self.completed.remove(pos);
        }

        self.persist(keys::LEVEL_PROGRESS, &self.progress)?;
        self.persist(keys::COMPLETED_LEVELS, &self.completed)?;
        self.sync_profile()?;

        Ok(())
    }

    /// Record a user rating for a level; an optional comment becomes a
    /// community review. Ratings outside 1-5 are rejected with no state
    /// change.
    pub fn rate(
        &mut self,
        id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<(), OverlayError> {
        if !(1..=5).contains(&rating) {
            return Err(OverlayError::InvalidRating(rating));
        }

        self.ratings.insert(id.to_string(), rating);
        self.persist(keys::USER_RATINGS, &self.ratings)?;

        if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
            self.reviews
                .entry(id.to_string())
                .or_default()
                .push(CommunityReview {
                    author: self.profile.username.clone(),
                    rating,
                    comment: comment.to_string(),
                    timestamp: Utc::now(),
                });
            self.persist(keys::COMMUNITY_REVIEWS, &self.reviews)?;
        }

        Ok(())
    }

    /// Record a level view. The snapshot moves to the front of the
    /// recently-viewed list, which is de-duplicated by id and bounded.
    pub fn record_view(&mut self, level: &Level) -> Result<(), OverlayError> {
        if let Some(pos) = self.recently_viewed.iter().position(|l| l.id == level.id) {
            self.recently_viewed.remove(pos);
        }
        self.recently_viewed.insert(0, level.clone());
        self.recently_viewed.truncate(RECENT_BOUND);

        self.persist(keys::RECENTLY_VIEWED, &self.recently_viewed)
    }

    /// Record a search term. Blank terms are ignored; the history is
    /// de-duplicated, most-recent-first and bounded.
    pub fn record_search(&mut self, term: &str) -> Result<(), OverlayError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        self.search_history.retain(|t| t != term);
        self.search_history.insert(0, term.to_string());
        self.search_history.truncate(RECENT_BOUND);

        self.persist(keys::SEARCH_HISTORY, &self.search_history)
    }

    /// Unlock an achievement. Returns false (and does nothing) when it is
    /// already unlocked; the set never shrinks.
    pub fn unlock_achievement(&mut self, id: &str) -> Result<bool, OverlayError> {
        if self.is_unlocked(id) {
            return Ok(false);
        }
        self.unlocked.push(id.to_string());
        self.persist(keys::ACHIEVEMENTS, &self.unlocked)?;
        Ok(true)
    }

    /// Toggle a level in the comparison selection (bounded to 4).
    pub fn toggle_compare(&mut self, level: &Level) -> CompareOutcome {
        if let Some(pos) = self.compare.iter().position(|l| l.id == level.id) {
            self.compare.remove(pos);
            CompareOutcome::Removed
        } else if self.compare.len() >= COMPARE_BOUND {
            CompareOutcome::LimitReached
        } else {
            self.compare.push(level.clone());
            CompareOutcome::Added
        }
    }

    /// Remove a level from the comparison selection.
    pub fn remove_from_compare(&mut self, id: &str) -> bool {
        if let Some(pos) = self.compare.iter().position(|l| l.id == id) {
            self.compare.remove(pos);
            true
        } else {
            false
        }
    }

    /// Change the profile username used as the review author.
    pub fn set_username(&mut self, username: &str) -> Result<(), OverlayError> {
        self.profile.username = username.to_string();
        self.persist(keys::USER_PROFILE, &self.profile)
    }

    /// Wipe persisted storage and reinitialize every field to its default.
    pub fn reset(&mut self) -> Result<(), OverlayError> {
        self.store.clear()?;

        self.favorites.clear();
        self.completed.clear();
        self.recently_viewed.clear();
        self.ratings.clear();
        self.progress.clear();
        self.reviews.clear();
        self.search_history.clear();
        self.unlocked.clear();
        self.profile = UserProfile::default();
        self.compare.clear();

        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resynchronize derived profile fields and flush the profile.
    fn sync_profile(&mut self) -> Result<(), OverlayError> {
        self.profile.completed_count = self.completed.len();
        self.profile.favorite_count = self.favorites.len();
        self.profile.level = UserProfile::level_for(self.profile.experience);
        self.persist(keys::USER_PROFILE, &self.profile)
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), OverlayError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Database(e.to_string()))?;
        self.store.set(key, &json)?;
        Ok(())
    }
}

fn read_or_default<T: DeserializeOwned + Default>(store: &dyn KvStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "corrupt persisted value, using default");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using default");
            T::default()
        }
    }
}
