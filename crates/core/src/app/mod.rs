//! The application core: canonical state and every presentation intent.
//!
//! [`App`] is the composition root. It owns the active catalog, the user
//! overlay and the view parameters, recomputes the derived view on every
//! state change, and queues events for the presentation adapter. There are
//! no hidden globals — adapters hold an `App` and call intents on it.
//!
//! Intents run to completion in arrival order. The only suspension point is
//! the catalog fetch in [`App::reload`]; no state is applied until that
//! await completes, so dropping the in-flight future abandons the load
//! without side effects, which is how a superseded load is cancelled.

mod coalesce;
mod events;
mod types;

pub use coalesce::{Debouncer, Throttler};
pub use events::AppEvent;
pub use types::{CatalogStats, ComparisonEntry, DataOrigin, LoadState, Theme, ViewMode};

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{info, warn};

use crate::achievements;
use crate::catalog::{self, Catalog, CatalogError, CatalogSource, Level, ListKind};
use crate::config::{validate_config, Config, ConfigError};
use crate::overlay::{CompareOutcome, OverlayError, UserOverlay};
use crate::query::{
    self, filter_advanced, paginate, AdvancedFilters, DifficultyFilter, Page, QueryParams,
    SortKey,
};
use crate::recommend;
use crate::storage::{keys, KvStore, StorageError};

/// The application core.
pub struct App {
    config: Config,
    kind: ListKind,
    store: Arc<dyn KvStore>,
    source: Arc<dyn CatalogSource>,
    catalog: Option<Catalog>,
    load_state: LoadState,
    overlay: UserOverlay,
    params: QueryParams,
    advanced: Option<AdvancedFilters>,
    page: usize,
    page_size: NonZeroUsize,
    view_mode: ViewMode,
    theme: Theme,
    filtered: Vec<Level>,
    events: VecDeque<AppEvent>,
}

impl App {
    /// Create the core for one list kind.
    ///
    /// Validates the configuration, loads the persisted overlay and view
    /// preferences, and leaves the catalog in [`LoadState::NotLoaded`] until
    /// one of the load entry points runs.
    pub fn new(
        config: Config,
        kind: ListKind,
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn KvStore>,
    ) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let default_page_size = NonZeroUsize::new(config.view.page_size).ok_or_else(|| {
            ConfigError::ValidationError("view.page_size cannot be 0".to_string())
        })?;

        let overlay = UserOverlay::load(Arc::clone(&store));
        let page_size = read_pref::<usize>(store.as_ref(), keys::PAGE_SIZE)
            .and_then(NonZeroUsize::new)
            .unwrap_or(default_page_size);
        let view_mode = read_pref(store.as_ref(), keys::VIEW_MODE).unwrap_or_default();
        let theme = read_pref(store.as_ref(), keys::THEME).unwrap_or_default();

        Ok(Self {
            config,
            kind,
            store,
            source,
            catalog: None,
            load_state: LoadState::NotLoaded,
            overlay,
            params: QueryParams::default(),
            advanced: None,
            page: 1,
            page_size,
            view_mode,
            theme,
            filtered: Vec::new(),
            events: VecDeque::new(),
        })
    }

    // =========================================================================
    // Catalog loading
    // =========================================================================

    /// Initial load: fetch the configured source for this list.
    pub async fn init(&mut self) -> Result<(), CatalogError> {
        self.reload().await
    }

    /// Fetch the catalog from the network, replacing the active one.
    ///
    /// On failure the core enters [`LoadState::Failed`]; the adapter is
    /// expected to offer retry, cached data and sample data as recovery
    /// actions.
    pub async fn reload(&mut self) -> Result<(), CatalogError> {
        match catalog::load(self.source.as_ref(), self.kind, self.store.as_ref()).await {
            Ok(loaded) => {
                self.install_catalog(loaded, DataOrigin::Network);
                Ok(())
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "catalog load failed");
                self.load_state = LoadState::Failed(e.to_string());
                self.events.push_back(AppEvent::CatalogLoadFailed {
                    kind: self.kind,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Fall back to the snapshot written by the last successful load.
    /// Returns the snapshot timestamp when one was recorded.
    pub fn load_cached(&mut self) -> Result<Option<DateTime<Utc>>, CatalogError> {
        let (loaded, cached_at) = catalog::load_cached(self.kind, self.store.as_ref())?;
        self.install_catalog(loaded, DataOrigin::Cache);
        Ok(cached_at)
    }

    /// Fall back to the built-in sample dataset. Never fails.
    pub fn load_sample(&mut self) {
        let loaded = catalog::load_sample(self.kind);
        self.install_catalog(loaded, DataOrigin::Sample);
    }

    fn install_catalog(&mut self, loaded: Catalog, origin: DataOrigin) {
        self.events.push_back(AppEvent::CatalogLoaded {
            kind: self.kind,
            origin,
            count: loaded.len(),
        });
        self.catalog = Some(loaded);
        self.load_state = LoadState::Ready(origin);
        self.page = 1;
        self.recompute();
    }

    // =========================================================================
    // View derivation
    // =========================================================================

    /// Apply search term, difficulty filter and sort key, and recompute the
    /// view. Non-blank search terms are recorded in the search history.
    pub fn apply_filters(
        &mut self,
        search: &str,
        difficulty: DifficultyFilter,
        sort: SortKey,
    ) -> Result<(), OverlayError> {
        self.overlay.record_search(search)?;

        self.params = QueryParams {
            search: search.to_string(),
            difficulty,
            sort,
        };
        self.page = 1;
        self.recompute();

        self.run_achievement_checks()
    }

    /// Apply the advanced filter panel on top of the basic filters.
    pub fn apply_advanced_filters(&mut self, filters: AdvancedFilters) {
        self.advanced = Some(filters);
        self.page = 1;
        self.recompute();
    }

    /// Clear every filter and sort back to the defaults.
    pub fn reset_filters(&mut self) {
        self.params = QueryParams::default();
        self.advanced = None;
        self.page = 1;
        self.recompute();
    }

    /// One-shot view of the user's favorites, in catalog order. The next
    /// filter intent recomputes from the catalog as usual.
    pub fn show_favorites(&mut self) {
        self.params = QueryParams::default();
        self.advanced = None;
        self.page = 1;
        self.filtered = self
            .catalog_rows()
            .iter()
            .filter(|l| self.overlay.is_favorite(&l.id))
            .cloned()
            .collect();
    }

    /// One-shot view of the recently-viewed snapshots, most recent first.
    pub fn show_recently_viewed(&mut self) {
        self.params = QueryParams::default();
        self.advanced = None;
        self.page = 1;
        self.filtered = self.overlay.recently_viewed().to_vec();
    }

    /// The current derived view (filtered and sorted, before pagination).
    pub fn filtered(&self) -> &[Level] {
        &self.filtered
    }

    /// The current page of the derived view.
    pub fn current_page(&self) -> Page<Level> {
        paginate(&self.filtered, self.page_size.get(), self.page)
    }

    /// Jump to a page; out-of-range values clamp to the nearest valid page.
    pub fn set_page(&mut self, page: usize) {
        let total = self
            .filtered
            .len()
            .div_ceil(self.page_size.get())
            .max(1);
        self.page = page.clamp(1, total);
    }

    /// Change the page size and restart from page 1. Persisted.
    pub fn set_page_size(&mut self, size: NonZeroUsize) -> Result<(), StorageError> {
        self.page_size = size;
        self.page = 1;
        self.persist_pref(keys::PAGE_SIZE, &size.get())
    }

    fn recompute(&mut self) {
        let mut filtered = query::query(self.catalog_rows(), &self.params);
        if let Some(advanced) = &self.advanced {
            let completed = self.overlay.completed_set();
            filtered = filter_advanced(&filtered, advanced, &completed);
        }
        self.filtered = filtered;
    }

    fn catalog_rows(&self) -> &[Level] {
        self.catalog.as_ref().map(Catalog::rows).unwrap_or_default()
    }

    // =========================================================================
    // Overlay intents
    // =========================================================================

    /// Toggle a favorite. Returns whether the level is a favorite now.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, OverlayError> {
        let favored = self.overlay.toggle_favorite(id)?;
        self.events.push_back(AppEvent::FavoriteToggled {
            id: id.to_string(),
            favored,
        });
        self.run_achievement_checks()?;
        Ok(favored)
    }

    /// Toggle a completion. Returns whether the level is completed now.
    pub fn mark_completed(&mut self, id: &str) -> Result<bool, OverlayError> {
        let completed = self.overlay.toggle_completed(id)?;
        self.events.push_back(AppEvent::CompletionToggled {
            id: id.to_string(),
            completed,
        });
        self.run_achievement_checks()?;
        // Completion state feeds the advanced filter criteria
        self.recompute();
        Ok(completed)
    }

    /// Rate a level 1-5, optionally attaching a review comment.
    pub fn rate_level(
        &mut self,
        id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<(), OverlayError> {
        self.overlay.rate(id, rating, comment)?;
        self.run_achievement_checks()
    }

    /// Record or update progress on a level.
    pub fn set_progress(
        &mut self,
        id: &str,
        percent: u8,
        note: Option<String>,
    ) -> Result<(), OverlayError> {
        self.overlay.set_progress(id, percent, note)?;
        self.run_achievement_checks()?;
        self.recompute();
        Ok(())
    }

    /// Record that the user opened a level.
    pub fn view_level(&mut self, level: &Level) -> Result<(), OverlayError> {
        self.overlay.record_view(level)?;
        self.run_achievement_checks()
    }

    /// Pick a uniformly random level from the active catalog and record it
    /// as viewed.
    pub fn random_level(&mut self) -> Result<Option<Level>, OverlayError> {
        let picked = self
            .catalog_rows()
            .choose(&mut rand::thread_rng())
            .cloned();
        if let Some(level) = &picked {
            self.overlay.record_view(level)?;
            self.run_achievement_checks()?;
        }
        Ok(picked)
    }

    /// Toggle a level in the comparison selection.
    pub fn add_to_compare(&mut self, level: &Level) -> CompareOutcome {
        let outcome = self.overlay.toggle_compare(level);
        if outcome == CompareOutcome::LimitReached {
            self.events.push_back(AppEvent::CompareSelectionFull {
                id: level.id.clone(),
            });
        }
        outcome
    }

    /// Remove a level from the comparison selection.
    pub fn remove_from_compare(&mut self, id: &str) -> bool {
        self.overlay.remove_from_compare(id)
    }

    // =========================================================================
    // Derived products
    // =========================================================================

    /// Preference-weighted recommendations from the active catalog.
    pub fn recommendations(&self, count: usize) -> Vec<Level> {
        match &self.catalog {
            Some(catalog) => recommend::recommend(catalog, &self.overlay, count),
            None => Vec::new(),
        }
    }

    /// Export the active catalog as JSON.
    pub fn export_catalog(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.catalog_rows())
    }

    /// Export the comparison selection as JSON.
    pub fn export_comparison(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<ComparisonEntry> = self
            .overlay
            .compare_selection()
            .iter()
            .map(|l| ComparisonEntry {
                name: l.name.clone(),
                id: l.id.clone(),
                creator: l.creator.clone(),
                verifier: l.verifier.clone(),
                difficulty: l.difficulty.clone(),
                rating: l.rating,
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }

    /// Headline numbers for the active catalog.
    pub fn stats(&self) -> CatalogStats {
        let rows = self.catalog_rows();
        let extreme_count = rows
            .iter()
            .filter(|l| {
                let d = l.difficulty_lower();
                d == "extreme" || d == "impossible"
            })
            .count();
        CatalogStats {
            total: rows.len(),
            extreme_count,
        }
    }

    // =========================================================================
    // Preferences & lifecycle
    // =========================================================================

    /// Change the card layout preference. Persisted.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), StorageError> {
        self.view_mode = mode;
        self.persist_pref(keys::VIEW_MODE, &mode)
    }

    /// Change the theme preference. Persisted.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.theme = theme;
        self.persist_pref(keys::THEME, &theme)
    }

    /// Wipe persisted storage and reinitialize the overlay and view
    /// preferences. The active catalog stays in memory until the next load.
    pub fn reset(&mut self) -> Result<(), OverlayError> {
        self.overlay.reset()?;

        self.params = QueryParams::default();
        self.advanced = None;
        self.page = 1;
        self.page_size = NonZeroUsize::new(self.config.view.page_size)
            .unwrap_or(NonZeroUsize::MIN);
        self.view_mode = ViewMode::default();
        self.theme = Theme::default();
        self.recompute();

        info!("user data reset");
        Ok(())
    }

    /// Drain the queued events for the presentation adapter.
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        self.events.drain(..).collect()
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn list_kind(&self) -> ListKind {
        self.kind
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn overlay(&self) -> &UserOverlay {
        &self.overlay
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn run_achievement_checks(&mut self) -> Result<(), OverlayError> {
        let newly: Vec<_> = achievements::evaluate(&self.overlay);
        for achievement in newly {
            if self.overlay.unlock_achievement(achievement.id)? {
                info!(id = achievement.id, "achievement unlocked");
                self.events.push_back(AppEvent::AchievementUnlocked {
                    id: achievement.id.to_string(),
                    title: achievement.title.to_string(),
                    description: achievement.description.to_string(),
                });
            }
        }
        Ok(())
    }

    fn persist_pref<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Database(e.to_string()))?;
        self.store.set(key, &json)
    }
}

fn read_pref<T: serde::de::DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "preference read failed, using default");
            None
        }
    }
}
