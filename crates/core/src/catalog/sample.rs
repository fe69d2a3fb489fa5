//! Built-in sample dataset.
//!
//! Used as the last-resort fallback when both the network and the cached
//! snapshot are unavailable. Loading it never fails.

use once_cell::sync::Lazy;

use super::Level;

static SAMPLE_LEVELS: Lazy<Vec<Level>> = Lazy::new(|| {
    vec![
        Level {
            id: "123456".to_string(),
            name: "Sample Demon".to_string(),
            creator: "SampleCreator".to_string(),
            verifier: "SampleVerifier".to_string(),
            difficulty: "Extreme".to_string(),
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            rating: 4.5,
            tags: vec!["Sample".to_string(), "Test".to_string(), "Demo".to_string()],
            description: "A placeholder level shown while real data is unavailable".to_string(),
            length: "Long".to_string(),
            object_count: 45_000,
            downloads: 1_000_000,
        },
        Level {
            id: "123457".to_string(),
            name: "Warmup Lane".to_string(),
            creator: "SampleCreator".to_string(),
            verifier: "SampleCreator".to_string(),
            difficulty: "Easy".to_string(),
            video_url: String::new(),
            rating: 3.0,
            tags: vec!["Sample".to_string(), "Short".to_string()],
            description: "An easy placeholder entry".to_string(),
            length: "Short".to_string(),
            object_count: 5_200,
            downloads: 250_000,
        },
        Level {
            id: "123458".to_string(),
            name: "Midnight Circuit".to_string(),
            creator: "NightBuilder".to_string(),
            verifier: "SampleVerifier".to_string(),
            difficulty: "Insane".to_string(),
            video_url: String::new(),
            rating: 4.0,
            tags: vec!["Sample".to_string()],
            description: "An insane placeholder entry".to_string(),
            length: "Medium".to_string(),
            object_count: 28_000,
            downloads: 640_000,
        },
    ]
});

/// Returns a copy of the built-in sample rows.
pub fn sample_levels() -> Vec<Level> {
    SAMPLE_LEVELS.clone()
}
