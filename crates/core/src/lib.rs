//! Core engine for a ranked-level catalog browser.
//!
//! Owns the canonical in-memory collections — the catalog rows and the
//! per-user overlay — and recomputes the filtered/sorted/paginated view on
//! every state change. Presentation and persistence are collaborators: the
//! presentation adapter forwards user intents into [`App`] and renders the
//! derived views; persistence sits behind the [`storage::KvStore`] trait
//! and mirrors every overlay mutation synchronously.

pub mod achievements;
pub mod app;
pub mod catalog;
pub mod config;
pub mod overlay;
pub mod query;
pub mod recommend;
pub mod storage;
pub mod testing;

pub use app::{App, AppEvent, DataOrigin, LoadState, Theme, ViewMode};
pub use catalog::{Catalog, CatalogError, CatalogSource, HttpCatalogSource, Level, ListKind};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use overlay::{CompareOutcome, OverlayError, UserOverlay, UserProfile};
pub use query::{
    paginate, query, AdvancedFilters, CompletionFilter, DifficultyFilter, Page, QueryParams,
    SortKey,
};
pub use storage::{KvStore, SqliteKvStore, StorageError};
