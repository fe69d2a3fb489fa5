//! Preference-weighted level recommendations.
//!
//! Derives a difficulty preference from what the user has recently viewed
//! and how they rated levels, then surfaces unfinished levels matching that
//! preference. Deterministic given the same inputs and RNG; the RNG is
//! injected so tests can seed it.

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, Level};
use crate::overlay::UserOverlay;

/// Default number of recommendations.
pub const DEFAULT_COUNT: usize = 6;

/// Recommend up to `count` levels using a thread-local RNG.
pub fn recommend(catalog: &Catalog, overlay: &UserOverlay, count: usize) -> Vec<Level> {
    recommend_with_rng(catalog, overlay, count, &mut rand::thread_rng())
}

/// Recommend up to `count` levels the user has not completed.
///
/// With no viewing or rating history the pick is uniformly random. Otherwise
/// difficulty labels are weighted (+1 per recently-viewed occurrence,
/// +rating/5 per rated level) and candidates carrying a weighted label are
/// preferred, ordered by preference rank then source rating; any shortfall
/// is backfilled with random remaining candidates. Never fails; returns
/// fewer than `count` when the candidate pool is smaller.
pub fn recommend_with_rng<R: Rng + ?Sized>(
    catalog: &Catalog,
    overlay: &UserOverlay,
    count: usize,
    rng: &mut R,
) -> Vec<Level> {
    let mut candidates: Vec<&Level> = catalog
        .rows()
        .iter()
        .filter(|l| !overlay.is_completed(&l.id))
        .collect();

    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }

    // Cold start: nothing to derive a preference from
    if overlay.recently_viewed().is_empty() && overlay.ratings().is_empty() {
        candidates.shuffle(rng);
        return candidates.into_iter().take(count).cloned().collect();
    }

    let mut weights: HashMap<String, f32> = HashMap::new();
    for viewed in overlay.recently_viewed() {
        *weights.entry(viewed.difficulty_lower()).or_default() += 1.0;
    }
    for (id, rating) in overlay.ratings() {
        if let Some(level) = catalog.find(id) {
            *weights.entry(level.difficulty_lower()).or_default() += f32::from(*rating) / 5.0;
        }
    }

    // Rank labels by accumulated weight; label order breaks exact ties so
    // the ranking is deterministic
    let mut ranking: Vec<(String, f32)> = weights.into_iter().collect();
    ranking.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let preference_index: HashMap<&str, usize> = ranking
        .iter()
        .enumerate()
        .map(|(i, (label, _))| (label.as_str(), i))
        .collect();

    let mut preferred: Vec<&Level> = candidates
        .iter()
        .copied()
        .filter(|l| preference_index.contains_key(l.difficulty_lower().as_str()))
        .collect();
    preferred.sort_by(|a, b| {
        let rank_a = preference_index[a.difficulty_lower().as_str()];
        let rank_b = preference_index[b.difficulty_lower().as_str()];
        rank_a.cmp(&rank_b).then_with(|| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
        })
    });

    let mut result: Vec<Level> = preferred
        .into_iter()
        .take(count)
        .cloned()
        .collect();

    if result.len() < count {
        let mut backfill: Vec<&Level> = candidates
            .into_iter()
            .filter(|l| !result.iter().any(|chosen| chosen.id == l.id))
            .collect();
        backfill.shuffle(rng);
        for level in backfill {
            if result.len() >= count {
                break;
            }
            result.push(level.clone());
        }
    }

    result
}
