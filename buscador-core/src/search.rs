use crate::config::DEFAULT_NEW_LISTING_THRESHOLD_HOURS;
use crate::dates::is_within_last_hours;
use crate::filtering::{matches, matches_query};
use crate::models::{Category, Criteria, ListingRecord, SearchResult, SortKey};
use crate::normalize::{normalize_text, rewrite_legacy_slug};
use crate::sorting::sort_listings;
use crate::validation::is_well_formed;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Everything one search depends on besides the catalog itself
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub category: Category,
    /// Sub-type slug; `"all"` means unconstrained
    pub sub_type: String,
    pub criteria: Criteria,
    pub sort: Option<SortKey>,
    pub query: String,
    pub as_of: DateTime<Utc>,
    /// Listings scraped within this many hours of `as_of` count as new
    pub new_listing_threshold_hours: i64,
}

impl SearchRequest {
    /// A request for the criteria's own category with no sub-type, sort or
    /// query
    pub fn new(criteria: Criteria, as_of: DateTime<Utc>) -> Self {
        Self {
            category: criteria.category(),
            sub_type: "all".to_string(),
            criteria,
            sort: None,
            query: String::new(),
            as_of,
            new_listing_threshold_hours: DEFAULT_NEW_LISTING_THRESHOLD_HOURS,
        }
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = sub_type.into();
        self
    }

    pub fn with_sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// Run the full pipeline over a catalog: validate, filter, free-text
/// match, sort, then compute statistics over the final set.
///
/// Pure: owns no state and never fails on bad data. If sorting or the
/// statistics pass panics, the filtered list comes back in catalog order
/// with zeroed statistics.
pub fn search(catalog: &[ListingRecord], request: &SearchRequest) -> SearchResult {
    run_search(catalog, request, statistics)
}

fn run_search<F>(catalog: &[ListingRecord], request: &SearchRequest, stats: F) -> SearchResult
where
    F: Fn(&[ListingRecord], &SearchRequest) -> (usize, usize),
{
    debug_assert_eq!(
        request.criteria.category(),
        request.category,
        "criteria shape does not match the requested category"
    );

    let sub_type = rewrite_legacy_slug(request.category, &request.sub_type);
    let query = normalize_text(&request.query);

    let mut malformed = 0usize;
    let filtered: Vec<ListingRecord> = catalog
        .iter()
        .filter(|record| {
            let ok = is_well_formed(record);
            if !ok {
                malformed += 1;
            }
            ok
        })
        .filter(|record| {
            matches(
                record,
                request.category,
                &sub_type,
                &request.criteria,
                request.as_of,
            )
        })
        .filter(|record| matches_query(record, &query))
        .cloned()
        .collect();

    if malformed > 0 {
        warn!(count = malformed, "skipped malformed catalog records");
    }

    let mut sorted = filtered.clone();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        if let Some(key) = request.sort {
            sort_listings(&mut sorted, key);
        }
        stats(&sorted, request)
    }));

    match outcome {
        Ok((distinct_source_count, new_today_count)) => {
            debug!(
                category = %request.category,
                sub_type = %sub_type,
                results = sorted.len(),
                distinct_source_count,
                new_today_count,
                "search complete"
            );
            SearchResult {
                listings: sorted,
                distinct_source_count,
                new_today_count,
            }
        }
        Err(_) => {
            warn!(
                category = %request.category,
                "sorting or statistics failed; returning unsorted results"
            );
            SearchResult {
                listings: filtered,
                distinct_source_count: 0,
                new_today_count: 0,
            }
        }
    }
}

/// Distinct source count and new-listing count over a result set
fn statistics(listings: &[ListingRecord], request: &SearchRequest) -> (usize, usize) {
    let sources: HashSet<&str> = listings
        .iter()
        .map(|l| l.source_site.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    let new_today = listings
        .iter()
        .filter(|l| {
            is_within_last_hours(
                &l.scraped_at,
                request.new_listing_threshold_hours,
                request.as_of,
            )
        })
        .count();

    (sources.len(), new_today)
}
