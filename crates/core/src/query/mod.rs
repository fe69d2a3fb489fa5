//! Pure view derivation: filtering and sorting.
//!
//! `query` is deterministic and side-effect free; the application recomputes
//! the whole view from the catalog on every triggering intent rather than
//! patching a previous result.

mod advanced;
mod paginate;

pub use advanced::{filter_advanced, AdvancedFilters, CompletionFilter};
pub use paginate::{paginate, Page};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::Level;

/// Sort order for the derived view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Canonical catalog order. The identity sort: input order is preserved
    /// exactly, it is not a sort by some rank field.
    #[default]
    Rank,
    Name,
    Difficulty,
    Creator,
    Rating,
}

/// Difficulty filter with an explicit match-everything sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DifficultyFilter {
    #[default]
    All,
    Label(String),
}

impl DifficultyFilter {
    /// Parse a filter value, mapping the `all` sentinel to [`Self::All`].
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            DifficultyFilter::All
        } else {
            DifficultyFilter::Label(value.to_string())
        }
    }

    fn matches(&self, level: &Level) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Label(label) => {
                level.difficulty.to_lowercase() == label.to_lowercase()
            }
        }
    }
}

/// Filter and sort parameters for one view derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Free-text search term; empty matches everything.
    pub search: String,
    pub difficulty: DifficultyFilter,
    pub sort: SortKey,
}

/// Severity rank of a difficulty label for the `difficulty` sort.
///
/// Unknown labels sort after every known one; ties keep catalog order via
/// the stable sort.
pub fn difficulty_severity(label: &str) -> u8 {
    match label.to_lowercase().as_str() {
        "easy" => 1,
        "medium" => 2,
        "hard" => 3,
        "insane" => 4,
        "extreme" => 5,
        "impossible" => 6,
        _ => 7,
    }
}

/// Derive the filtered, sorted view of `rows`.
///
/// Filters compose conjunctively (search AND difficulty), then the sort is
/// applied. All sorts are stable, so equal keys keep catalog order.
pub fn query(rows: &[Level], params: &QueryParams) -> Vec<Level> {
    let term = params.search.trim().to_lowercase();

    let mut result: Vec<Level> = rows
        .iter()
        .filter(|level| term.is_empty() || level.search_blob().contains(&term))
        .filter(|level| params.difficulty.matches(level))
        .cloned()
        .collect();

    match params.sort {
        SortKey::Rank => {}
        SortKey::Name => result.sort_by(|a, b| fold(&a.name).cmp(&fold(&b.name))),
        SortKey::Creator => result.sort_by(|a, b| fold(&a.creator).cmp(&fold(&b.creator))),
        SortKey::Difficulty => {
            result.sort_by_key(|l| difficulty_severity(&l.difficulty));
        }
        SortKey::Rating => {
            result.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(Ordering::Equal)
            });
        }
    }

    result
}

// Case-folded sort key; approximates locale collation without pulling in a
// full collator.
fn fold(s: &str) -> String {
    s.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: &str, name: &str, creator: &str, difficulty: &str, rating: f32) -> Level {
        Level {
            id: id.to_string(),
            name: name.to_string(),
            creator: creator.to_string(),
            verifier: creator.to_string(),
            difficulty: difficulty.to_string(),
            video_url: String::new(),
            rating,
            tags: vec![],
            description: String::new(),
            length: String::new(),
            object_count: 0,
            downloads: 0,
        }
    }

    fn fixture() -> Vec<Level> {
        vec![
            level("1", "Zodiac", "Bianka", "Extreme", 4.5),
            level("2", "Acheron", "ryamu", "Extreme", 5.0),
            level("3", "The Nightmare", "Jax", "Easy", 2.0),
            level("4", "Cataclysm", "GgBoy", "Insane", 4.0),
            level("5", "Unnamed", "anon", "Mythic", 1.0),
        ]
    }

    #[test]
    fn test_rank_sort_preserves_input_order() {
        let rows = fixture();
        let result = query(&rows, &QueryParams::default());
        assert_eq!(result, rows);
    }

    #[test]
    fn test_query_is_deterministic() {
        let rows = fixture();
        let params = QueryParams {
            search: "a".to_string(),
            difficulty: DifficultyFilter::All,
            sort: SortKey::Name,
        };
        assert_eq!(query(&rows, &params), query(&rows, &params));
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let rows = fixture();

        let by_name = query(
            &rows,
            &QueryParams {
                search: "ZODIAC".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "1");

        let by_creator = query(
            &rows,
            &QueryParams {
                search: "ggboy".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_creator.len(), 1);
        assert_eq!(by_creator[0].id, "4");
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                search: "   ".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(result.len(), rows.len());
    }

    #[test]
    fn test_difficulty_filter_exact_match() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                difficulty: DifficultyFilter::parse("EXTREME"),
                ..Default::default()
            },
        );
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|l| l.difficulty == "Extreme"));
    }

    #[test]
    fn test_all_sentinel_disables_difficulty_filter() {
        let rows = fixture();
        assert_eq!(DifficultyFilter::parse("all"), DifficultyFilter::All);
        assert_eq!(DifficultyFilter::parse("All"), DifficultyFilter::All);
        let result = query(
            &rows,
            &QueryParams {
                difficulty: DifficultyFilter::parse("all"),
                ..Default::default()
            },
        );
        assert_eq!(result.len(), rows.len());
    }

    #[test]
    fn test_name_sort_case_folded() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                sort: SortKey::Name,
                ..Default::default()
            },
        );
        let names: Vec<&str> = result.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Acheron", "Cataclysm", "The Nightmare", "Unnamed", "Zodiac"]
        );
    }

    #[test]
    fn test_creator_sort_case_folded() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                sort: SortKey::Creator,
                ..Default::default()
            },
        );
        let creators: Vec<&str> = result.iter().map(|l| l.creator.as_str()).collect();
        // "ryamu" sorts after "Jax"/"GgBoy" once case is folded
        assert_eq!(creators, vec!["anon", "Bianka", "GgBoy", "Jax", "ryamu"]);
    }

    #[test]
    fn test_difficulty_sort_unknown_labels_last() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                sort: SortKey::Difficulty,
                ..Default::default()
            },
        );
        let difficulties: Vec<&str> = result.iter().map(|l| l.difficulty.as_str()).collect();
        assert_eq!(
            difficulties,
            vec!["Easy", "Insane", "Extreme", "Extreme", "Mythic"]
        );
        // Equal labels keep catalog order
        assert_eq!(result[2].id, "1");
        assert_eq!(result[3].id, "2");
    }

    #[test]
    fn test_rating_sort_non_increasing() {
        let rows = fixture();
        let result = query(
            &rows,
            &QueryParams {
                sort: SortKey::Rating,
                ..Default::default()
            },
        );
        for pair in result.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_filter_then_sort_scenario() {
        // 15 levels: easy x5, extreme x5, impossible x5
        let mut rows = Vec::new();
        for (block, difficulty) in ["Easy", "Extreme", "Impossible"].iter().enumerate() {
            for i in 0..5 {
                let id = block * 5 + i;
                rows.push(level(&id.to_string(), &format!("L{}", id), "c", difficulty, 0.0));
            }
        }

        let result = query(
            &rows,
            &QueryParams {
                difficulty: DifficultyFilter::parse("extreme"),
                sort: SortKey::Rank,
                ..Default::default()
            },
        );

        assert_eq!(result.len(), 5);
        let ids: Vec<&str> = result.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "6", "7", "8", "9"]);
    }
}
