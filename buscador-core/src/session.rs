use crate::config::EngineConfig;
use crate::models::{Category, Criteria, ListingRecord, Preferences, SearchResult, SortKey, ViewMode};
use crate::normalize::{rewrite_legacy_slug, ALL_SENTINEL};
use crate::pagination::{paginate, visible_pages, Page, PageCursor, ResultInputs};
use crate::search::{search, SearchRequest};
use crate::staging::{CriteriaPatch, FilterStagingStore, StagingError};
use chrono::{DateTime, Utc};
use tracing::debug;

/// A user's browsing state over one catalog: current category and
/// sub-type, the filter staging store, sort, query, view mode and page.
///
/// The only writer of its parts. Every read of results goes through
/// [`BrowseSession::search`], which also resets the page when any input
/// changed since the last read.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    config: EngineConfig,
    filters: FilterStagingStore,
    category: Category,
    sub_type: String,
    sort: Option<SortKey>,
    query: String,
    view_mode: ViewMode,
    cursor: PageCursor,
}

/// Results for the current page plus the statistics of the whole set
#[derive(Debug, Clone)]
pub struct PagedResults {
    pub result: SearchResult,
    pub page_number: usize,
    pub total_pages: usize,
    pub visible_pages: Vec<usize>,
}

impl PagedResults {
    pub fn page(&self, page_size: usize) -> Page<'_, ListingRecord> {
        paginate(&self.result.listings, page_size, self.page_number)
    }
}

impl BrowseSession {
    pub fn new(config: EngineConfig, category: Category) -> Self {
        Self {
            filters: FilterStagingStore::new(config.defaults.clone()),
            config,
            category,
            sub_type: ALL_SENTINEL.to_string(),
            sort: None,
            query: String::new(),
            view_mode: ViewMode::default(),
            cursor: PageCursor::new(),
        }
    }

    /// Seed the session from stored preferences. Staged criteria start
    /// equal to the stored applied criteria.
    pub fn restore(&mut self, prefs: &Preferences) {
        self.filters
            .load_persisted(&prefs.applied_filters_by_category);
        self.sort = prefs.sort_key;
        self.view_mode = prefs.view_mode;
        debug!(sort = ?self.sort, view_mode = ?self.view_mode, "restored preferences");
    }

    pub fn export_preferences(&self) -> Preferences {
        Preferences {
            view_mode: self.view_mode,
            applied_filters_by_category: self.filters.export(),
            sort_key: self.sort,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterStagingStore {
        &self.filters
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn applied(&self) -> &Criteria {
        self.filters.applied(self.category)
    }

    pub fn set_category(&mut self, category: Category) {
        if category != self.category {
            self.category = category;
            self.sub_type = ALL_SENTINEL.to_string();
        }
    }

    /// Legacy slugs are rewritten here, so later reads see the current one
    pub fn set_sub_type(&mut self, sub_type: &str) {
        self.sub_type = rewrite_legacy_slug(self.category, sub_type);
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.sort = sort;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn set_page(&mut self, page: usize) {
        self.cursor.set_page(page);
    }

    pub fn stage(
        &mut self,
        patches: impl IntoIterator<Item = CriteriaPatch>,
    ) -> Result<(), StagingError> {
        self.filters.set_staged(self.category, patches)
    }

    pub fn apply_filters(&mut self) -> &Criteria {
        self.filters.apply(self.category)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear(self.category);
    }

    fn inputs(&self) -> ResultInputs {
        ResultInputs {
            category: self.category,
            sub_type: self.sub_type.clone(),
            criteria: self.applied().clone(),
            sort: self.sort,
            query: self.query.clone(),
        }
    }

    /// Search with the applied criteria and locate the current page
    pub fn search(&mut self, catalog: &[ListingRecord], as_of: DateTime<Utc>) -> PagedResults {
        if self.cursor.observe(&self.inputs()) {
            debug!("result inputs changed; back to page 1");
        }

        let request = SearchRequest {
            category: self.category,
            sub_type: self.sub_type.clone(),
            criteria: self.applied().clone(),
            sort: self.sort,
            query: self.query.clone(),
            as_of,
            new_listing_threshold_hours: self.config.new_listing_threshold_hours,
        };
        let result = search(catalog, &request);

        let page = paginate(&result.listings, self.config.page_size, self.cursor.page());
        let (page_number, total_pages) = (page.page_number, page.total_pages);

        PagedResults {
            visible_pages: visible_pages(page_number, total_pages, self.config.max_visible_pages),
            result,
            page_number,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{as_of, property, vehicle};
    use crate::models::NumericRange;

    fn catalog() -> Vec<ListingRecord> {
        (0..5)
            .map(|i| property(&format!("p{}", i), 100_000.0 * (i + 1) as f64))
            .chain([vehicle("v0", 30_000.0)])
            .collect()
    }

    fn session() -> BrowseSession {
        let config = EngineConfig {
            page_size: 2,
            ..EngineConfig::default()
        };
        BrowseSession::new(config, Category::Property)
    }

    #[test]
    fn test_staged_edits_do_not_change_results_until_applied() {
        let catalog = catalog();
        let mut session = session();

        session
            .stage([CriteriaPatch::Price(NumericRange(0.0, 250_000.0))])
            .unwrap();
        let before = session.search(&catalog, as_of());
        assert_eq!(before.result.listings.len(), 5);

        session.apply_filters();
        let after = session.search(&catalog, as_of());
        assert_eq!(after.result.listings.len(), 2);
    }

    #[test]
    fn test_page_resets_when_inputs_change() {
        let catalog = catalog();
        let mut session = session();

        session.search(&catalog, as_of());
        session.set_page(3);
        let paged = session.search(&catalog, as_of());
        assert_eq!(paged.page_number, 3);
        assert_eq!(paged.total_pages, 3);
        assert_eq!(paged.page(2).items.len(), 1);

        session.set_sort(Some(SortKey::HighestBid));
        let paged = session.search(&catalog, as_of());
        assert_eq!(paged.page_number, 1);
        assert_eq!(paged.page(2).items[0].id, "p4");
    }

    #[test]
    fn test_legacy_sub_type_rewritten_on_set() {
        let mut session = BrowseSession::new(EngineConfig::default(), Category::Vehicle);
        session.set_sub_type("trailers");
        assert_eq!(session.sub_type(), "support");

        session.set_category(Category::Property);
        assert_eq!(session.sub_type(), "all");
    }

    #[test]
    fn test_preferences_round_trip_through_session() {
        let mut session = session();
        session.set_sort(Some(SortKey::Nearest));
        session.set_view_mode(ViewMode::Vertical);
        session
            .stage([CriteriaPatch::State(Some("SP".to_string()))])
            .unwrap();
        session.apply_filters();
        // Staged-only edits are not persisted
        session
            .stage([CriteriaPatch::City(Some("Santos".to_string()))])
            .unwrap();

        let prefs = session.export_preferences();
        let property = prefs.applied_filters_by_category.property.clone().unwrap();
        assert_eq!(property.base.state.as_deref(), Some("SP"));
        assert_eq!(property.base.city, None);

        let mut restored = BrowseSession::new(EngineConfig::default(), Category::Property);
        restored.restore(&prefs);
        assert_eq!(restored.sort(), Some(SortKey::Nearest));
        assert_eq!(restored.view_mode(), ViewMode::Vertical);
        assert_eq!(restored.applied(), restored.filters().staged(Category::Property));
        assert_eq!(restored.applied().base().state.as_deref(), Some("SP"));
    }
}
