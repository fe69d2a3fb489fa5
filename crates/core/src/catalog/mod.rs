//! Catalog loading and storage.
//!
//! A catalog is loaded through one of four strategies — network, cached
//! snapshot, built-in sample, or it stays in a failed state — and exactly one
//! of those is active at a time. A successful network load writes a snapshot
//! to persistent storage so the cache strategy has something to fall back on.

mod parse;
mod sample;
mod source;
mod types;

pub use parse::parse_levels;
pub use sample::sample_levels;
pub use source::{CatalogSource, HttpCatalogSource};
pub use types::{Catalog, Level, ListKind};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{keys, KvStore, StorageError};

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fetch failed for a reason other than the timeout.
    #[error("network error: {0}")]
    Network(String),

    /// Fetch did not complete within the configured bound.
    #[error("catalog request timed out")]
    Timeout,

    /// The fetched text is not parseable tabular data.
    #[error("failed to parse catalog data: {0}")]
    Parse(String),

    /// Parsing succeeded but no usable rows remained.
    #[error("catalog contains no valid rows")]
    EmptyDataset,

    /// No snapshot is available for the cache fallback.
    #[error("no cached catalog data available")]
    NoCachedData,

    /// The snapshot write failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Fetch and parse a catalog, writing the fallback snapshot on success.
pub async fn load(
    source: &dyn CatalogSource,
    kind: ListKind,
    store: &dyn KvStore,
) -> Result<Catalog, CatalogError> {
    let text = source.fetch(kind).await?;
    let rows = parse_levels(&text)?;
    let catalog = Catalog::new(kind, rows);

    write_snapshot(store, &catalog)?;

    info!(%kind, rows = catalog.len(), "catalog loaded from network");
    Ok(catalog)
}

/// Load the last snapshot written by a successful network load.
///
/// Also returns the snapshot timestamp when one was recorded. An absent or
/// corrupt snapshot yields [`CatalogError::NoCachedData`].
pub fn load_cached(
    kind: ListKind,
    store: &dyn KvStore,
) -> Result<(Catalog, Option<DateTime<Utc>>), CatalogError> {
    let raw = store
        .get(keys::CACHED_DATA)?
        .ok_or(CatalogError::NoCachedData)?;

    let rows: Vec<Level> = serde_json::from_str(&raw).map_err(|e| {
        warn!(error = %e, "cached catalog snapshot is corrupt");
        CatalogError::NoCachedData
    })?;

    if rows.is_empty() {
        return Err(CatalogError::NoCachedData);
    }

    let cached_at = store
        .get(keys::LAST_DATA_UPDATE)?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    info!(%kind, rows = rows.len(), "catalog loaded from cache");
    Ok((Catalog::new(kind, rows), cached_at))
}

/// Load the built-in sample dataset. Never fails.
pub fn load_sample(kind: ListKind) -> Catalog {
    let catalog = Catalog::new(kind, sample_levels());
    info!(%kind, rows = catalog.len(), "catalog loaded from sample data");
    catalog
}

fn write_snapshot(store: &dyn KvStore, catalog: &Catalog) -> Result<(), CatalogError> {
    let json = serde_json::to_string(catalog.rows())
        .map_err(|e| CatalogError::Parse(e.to_string()))?;
    store.set(keys::CACHED_DATA, &json)?;
    store.set(keys::LAST_DATA_UPDATE, &Utc::now().to_rfc3339())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteKvStore;
    use crate::testing::MockCatalogSource;

    const CSV: &str = "\
Level,ID Level,Creators,Level Placement Opinion,Rating
Alpha,1,MakerA,Extreme,4.5
Beta,2,MakerB,Easy,3
";

    #[tokio::test]
    async fn test_load_writes_snapshot() {
        let store = SqliteKvStore::in_memory().unwrap();
        let source = MockCatalogSource::with_csv(CSV);

        let catalog = load(&source, ListKind::Demon, &store).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rank_of("2"), Some(2));

        // Snapshot and timestamp are persisted
        assert!(store.get(keys::CACHED_DATA).unwrap().is_some());
        assert!(store.get(keys::LAST_DATA_UPDATE).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_propagates_fetch_errors() {
        let store = SqliteKvStore::in_memory().unwrap();
        let source = MockCatalogSource::failing(CatalogError::Timeout);

        let result = load(&source, ListKind::Demon, &store).await;
        assert!(matches!(result, Err(CatalogError::Timeout)));
        // No snapshot is written on failure
        assert!(store.get(keys::CACHED_DATA).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_cached_round_trip() {
        let store = SqliteKvStore::in_memory().unwrap();
        let source = MockCatalogSource::with_csv(CSV);

        load(&source, ListKind::Demon, &store).await.unwrap();

        let (cached, cached_at) = load_cached(ListKind::Demon, &store).unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached.find("1").unwrap().name, "Alpha");
        assert!(cached_at.is_some());
    }

    #[test]
    fn test_load_cached_absent() {
        let store = SqliteKvStore::in_memory().unwrap();
        let result = load_cached(ListKind::Demon, &store);
        assert!(matches!(result, Err(CatalogError::NoCachedData)));
    }

    #[test]
    fn test_load_cached_corrupt_snapshot() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set(keys::CACHED_DATA, "{not json").unwrap();

        let result = load_cached(ListKind::Demon, &store);
        assert!(matches!(result, Err(CatalogError::NoCachedData)));
    }

    #[test]
    fn test_load_sample_never_fails() {
        let catalog = load_sample(ListKind::Impossible);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.kind(), ListKind::Impossible);
    }
}
