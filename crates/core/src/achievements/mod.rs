//! Achievement definitions and the unlock evaluator.
//!
//! Each achievement is a one-way state machine: locked until its predicate
//! over the overlay first holds, unlocked forever after. The evaluator runs
//! after every mutating overlay operation and is idempotent — achievements
//! already unlocked are never re-fired.

use crate::overlay::UserOverlay;

/// A fixed achievement definition.
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    condition: fn(&UserOverlay) -> bool,
}

impl Achievement {
    /// Whether the predicate currently holds (independent of unlock state).
    pub fn condition_met(&self, overlay: &UserOverlay) -> bool {
        (self.condition)(overlay)
    }
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// The full achievement table. Thresholds are inclusive.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "firstLevel",
        title: "First Steps",
        description: "View your first level",
        condition: |o| o.recently_viewed().len() >= 1,
    },
    Achievement {
        id: "explorer",
        title: "Explorer",
        description: "View 10 different levels",
        condition: |o| o.recently_viewed().len() >= 10,
    },
    Achievement {
        id: "collector",
        title: "Collector",
        description: "Add 5 levels to favorites",
        condition: |o| o.favorites().len() >= 5,
    },
    Achievement {
        id: "completer",
        title: "Demon Slayer",
        description: "Complete 3 levels",
        condition: |o| o.completed().len() >= 3,
    },
    Achievement {
        id: "master",
        title: "Demon Master",
        description: "Complete 10 levels",
        condition: |o| o.completed().len() >= 10,
    },
    Achievement {
        id: "reviewer",
        title: "Critic",
        description: "Rate 5 levels",
        condition: |o| o.ratings().len() >= 5,
    },
    Achievement {
        id: "progressTracker",
        title: "Progress Tracker",
        description: "Track progress on 5 levels",
        condition: |o| o.progress().len() >= 5,
    },
    Achievement {
        id: "communityMember",
        title: "Community Member",
        description: "Write 3 reviews",
        condition: |o| o.total_review_count() >= 3,
    },
];

/// Look up an achievement definition by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Achievements whose predicate holds but which are not yet unlocked.
///
/// Pure with respect to the overlay; the caller records the unlocks and
/// emits the events.
pub fn evaluate(overlay: &UserOverlay) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !overlay.is_unlocked(a.id) && a.condition_met(overlay))
        .collect()
}
