//! Core catalog data types.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Which of the three parallel lists a catalog belongs to.
///
/// The lists are independent datasets with their own source URLs; they are
/// never merged, and every core operation receives the kind explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Demon,
    Pemon,
    Impossible,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Demon, ListKind::Pemon, ListKind::Impossible];

    /// Returns the kind as its config/source key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Demon => "demonlist",
            ListKind::Pemon => "pemonlist",
            ListKind::Impossible => "impossiblelist",
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog entry.
///
/// Field values are kept as the source provides them; in particular the
/// difficulty label preserves its original casing and is only lowercased at
/// comparison sites. A level's rank is not stored here — it is the 1-based
/// position within its catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub creator: String,
    pub verifier: String,
    /// Raw difficulty label, case preserved.
    pub difficulty: String,
    /// Video URL, empty when the source has none.
    #[serde(default)]
    pub video_url: String,
    /// Source-provided rating, 0-5.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub object_count: u64,
    #[serde(default)]
    pub downloads: u64,
}

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtu\.be/|/v/|/embed/|watch\?v=|&v=)([A-Za-z0-9_-]{11})")
        .expect("video id pattern is valid")
});

impl Level {
    /// Lowercased difficulty label, the form used for filtering and severity
    /// ranking.
    pub fn difficulty_lower(&self) -> String {
        self.difficulty.to_lowercase()
    }

    /// Extracts the YouTube video id from the level's video URL, if present.
    pub fn video_id(&self) -> Option<&str> {
        YOUTUBE_ID
            .captures(&self.video_url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Thumbnail URL for the level's video, if it has one.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.video_id()
            .map(|id| format!("https://img.youtube.com/vi/{}/mqdefault.jpg", id))
    }

    /// Concatenation of every field value, lowercased, used for free-text
    /// search matching.
    pub fn search_blob(&self) -> String {
        let mut blob = String::new();
        for part in [
            self.id.as_str(),
            self.name.as_str(),
            self.creator.as_str(),
            self.verifier.as_str(),
            self.difficulty.as_str(),
            self.video_url.as_str(),
            self.description.as_str(),
            self.length.as_str(),
        ] {
            blob.push_str(part);
            blob.push(' ');
        }
        for tag in &self.tags {
            blob.push_str(tag);
            blob.push(' ');
        }
        blob.push_str(&self.rating.to_string());
        blob.push(' ');
        blob.push_str(&self.object_count.to_string());
        blob.push(' ');
        blob.push_str(&self.downloads.to_string());
        blob.to_lowercase()
    }
}

/// An ordered collection of levels for one list kind.
///
/// Replaced wholesale on reload, never mutated in place. Duplicate ids are
/// tolerated; lookups return the first match.
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: ListKind,
    rows: Vec<Level>,
}

impl Catalog {
    pub fn new(kind: ListKind, rows: Vec<Level>) -> Self {
        Self { kind, rows }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn rows(&self) -> &[Level] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First level with the given id, if any.
    pub fn find(&self, id: &str) -> Option<&Level> {
        self.rows.iter().find(|l| l.id == id)
    }

    /// 1-based canonical rank of the first level with the given id.
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|l| l.id == id).map(|i| i + 1)
    }
}
