//! Advanced filter panel criteria.
//!
//! Applied conjunctively on top of the basic search/difficulty filter. The
//! completion criterion consults the caller-supplied completed-id set so the
//! filter itself stays a pure function.

use std::collections::HashSet;

use crate::catalog::Level;

/// Completion state criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionFilter {
    #[default]
    All,
    Completed,
    NotCompleted,
}

/// Criteria from the advanced filter panel. The default value matches every
/// level.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedFilters {
    pub min_rating: f32,
    pub max_rating: f32,
    /// Case-insensitive substring of the creator name; empty disables.
    pub creator: String,
    /// Case-insensitive substring of the verifier name; empty disables.
    pub verifier: String,
    /// Only levels that have a video URL.
    pub has_video: bool,
    pub completion: CompletionFilter,
    /// Case-insensitive substring matched against any tag; empty disables.
    pub tag: String,
}

impl Default for AdvancedFilters {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            max_rating: 5.0,
            creator: String::new(),
            verifier: String::new(),
            has_video: false,
            completion: CompletionFilter::All,
            tag: String::new(),
        }
    }
}

impl AdvancedFilters {
    /// Whether a level passes every active criterion.
    pub fn matches(&self, level: &Level, completed: &HashSet<String>) -> bool {
        if level.rating < self.min_rating || level.rating > self.max_rating {
            return false;
        }

        if !self.creator.is_empty()
            && !level
                .creator
                .to_lowercase()
                .contains(&self.creator.to_lowercase())
        {
            return false;
        }

        if !self.verifier.is_empty()
            && !level
                .verifier
                .to_lowercase()
                .contains(&self.verifier.to_lowercase())
        {
            return false;
        }

        if self.has_video && level.video_url.is_empty() {
            return false;
        }

        let is_completed = completed.contains(&level.id);
        match self.completion {
            CompletionFilter::All => {}
            CompletionFilter::Completed if !is_completed => return false,
            CompletionFilter::NotCompleted if is_completed => return false,
            _ => {}
        }

        if !self.tag.is_empty() {
            let needle = self.tag.to_lowercase();
            if !level
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        true
    }
}

/// Filter `rows` by advanced criteria.
pub fn filter_advanced(
    rows: &[Level],
    filters: &AdvancedFilters,
    completed: &HashSet<String>,
) -> Vec<Level> {
    rows.iter()
        .filter(|l| filters.matches(l, completed))
        .cloned()
        .collect()
}
