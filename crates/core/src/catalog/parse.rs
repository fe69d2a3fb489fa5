//! CSV row mapping with per-field column fallbacks.
//!
//! The three list sources use different header names for the same semantic
//! field, so each field resolves through a fixed priority list (e.g. the
//! name comes from "Level", falling back to "Name"). Rows whose resolved
//! name is blank are dropped.

use csv::ReaderBuilder;
use tracing::debug;

use super::{CatalogError, Level};

/// Column priority per semantic field. First header present wins.
const NAME_COLUMNS: &[&str] = &["Level", "Name"];
const ID_COLUMNS: &[&str] = &["ID Level", "ID"];
const CREATOR_COLUMNS: &[&str] = &["Creators", "Creator"];
const VERIFIER_COLUMNS: &[&str] = &["Display Nickname", "Verifier"];
const VIDEO_COLUMNS: &[&str] = &["Video Link", "Video"];
const DIFFICULTY_COLUMNS: &[&str] = &["Level Placement Opinion", "Difficulty"];
const RATING_COLUMNS: &[&str] = &["Rating"];
const TAGS_COLUMNS: &[&str] = &["Tags"];
const DESCRIPTION_COLUMNS: &[&str] = &["Description"];
const LENGTH_COLUMNS: &[&str] = &["Length"];
const OBJECTS_COLUMNS: &[&str] = &["Objects"];
const DOWNLOADS_COLUMNS: &[&str] = &["Downloads"];

/// Parse CSV text into levels.
///
/// Returns [`CatalogError::Parse`] when the text is not valid CSV and
/// [`CatalogError::EmptyDataset`] when no row survives the blank-name
/// filter.
pub fn parse_levels(csv_text: &str) -> Result<Vec<Level>, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CatalogError::Parse(e.to_string()))?
        .clone();

    let resolve = |columns: &[&str]| -> Option<usize> {
        columns
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name))
    };

    let name_col = resolve(NAME_COLUMNS);
    let id_col = resolve(ID_COLUMNS);
    let creator_col = resolve(CREATOR_COLUMNS);
    let verifier_col = resolve(VERIFIER_COLUMNS);
    let video_col = resolve(VIDEO_COLUMNS);
    let difficulty_col = resolve(DIFFICULTY_COLUMNS);
    let rating_col = resolve(RATING_COLUMNS);
    let tags_col = resolve(TAGS_COLUMNS);
    let description_col = resolve(DESCRIPTION_COLUMNS);
    let length_col = resolve(LENGTH_COLUMNS);
    let objects_col = resolve(OBJECTS_COLUMNS);
    let downloads_col = resolve(DOWNLOADS_COLUMNS);

    let mut levels = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::Parse(e.to_string()))?;
        let field = |col: Option<usize>| -> &str {
            col.and_then(|i| record.get(i)).unwrap_or_default()
        };

        let name = field(name_col).trim();
        if name.is_empty() {
            dropped += 1;
            continue;
        }

        let creator = field(creator_col).to_string();
        let verifier = field(verifier_col).trim();
        let verifier = if verifier.is_empty() {
            // Sources without a verifier column credit the creator
            creator.clone()
        } else {
            verifier.to_string()
        };

        levels.push(Level {
            id: field(id_col).to_string(),
            name: name.to_string(),
            creator,
            verifier,
            difficulty: field(difficulty_col).to_string(),
            video_url: field(video_col).to_string(),
            rating: field(rating_col).trim().parse().unwrap_or(0.0),
            tags: split_tags(field(tags_col)),
            description: field(description_col).to_string(),
            length: field(length_col).to_string(),
            object_count: parse_count(field(objects_col)),
            downloads: parse_count(field(downloads_col)),
        });
    }

    debug!(rows = levels.len(), dropped, "parsed catalog rows");

    if levels.is_empty() {
        return Err(CatalogError::EmptyDataset);
    }

    Ok(levels)
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn parse_count(raw: &str) -> u64 {
    raw.trim().replace(',', "").parse().unwrap_or(0)
}
