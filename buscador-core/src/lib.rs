// Public modules
pub mod config;
pub mod dates;
pub mod filtering;
pub mod io;
pub mod mappings;
pub mod models;
pub mod normalize;
pub mod pagination;
pub mod schema_validation;
pub mod search;
pub mod session;
pub mod sorting;
pub mod staging;
pub mod validation;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types for convenience
pub use config::{CriteriaDefaults, EngineConfig};
pub use filtering::{has_active_filters, matches, matches_query};
pub use io::{load_catalog, load_config, load_preferences, save_preferences, Catalog, IoError};
pub use models::{
    AppliedFiltersByCategory, BaseCriteria, Category, Criteria, ListingDetails, ListingRecord,
    NumericRange, Preferences, PropertyCriteria, SearchResult, SortKey, VehicleCriteria, ViewMode,
};
pub use normalize::{normalize_text, rewrite_legacy_slug};
pub use pagination::{paginate, visible_pages, Page, PageCursor};
pub use schema_validation::{validate_against_schema, validate_preferences};
pub use search::{search, SearchRequest};
pub use session::{BrowseSession, PagedResults};
pub use sorting::{discount_percent, sort_listings};
pub use staging::{CriteriaPatch, FilterStagingStore, StagingError};
pub use validation::{is_listing_record, validate_catalog};
