//! Test doubles for driving the core without a network.

mod mock_source;

pub use mock_source::MockCatalogSource;

use crate::catalog::Level;

/// Build a level with the given identity and difficulty; remaining fields
/// get innocuous defaults.
pub fn make_level(id: &str, name: &str, difficulty: &str, rating: f32) -> Level {
    Level {
        id: id.to_string(),
        name: name.to_string(),
        creator: "creator".to_string(),
        verifier: "verifier".to_string(),
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
