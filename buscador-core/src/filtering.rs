use crate::config::CriteriaDefaults;
use crate::dates;
use crate::mappings::{accepted_values, map_labels, type_groups, FORMAT_GROUPS, ORIGIN_LABELS, STAGE_LABELS};
use crate::models::{BaseCriteria, Category, Criteria, ListingRecord};
use crate::normalize::{is_unconstrained, normalize_text, text_equals};
use chrono::{DateTime, Utc};

/// Check if a listing matches a category, sub-type and criteria set
///
/// Checks run cheapest first and stop at the first failure:
/// active, category, sub-type, scalar filters, multi-select filters,
/// numeric ranges.
pub fn matches(
    record: &ListingRecord,
    category: Category,
    sub_type: &str,
    criteria: &Criteria,
    as_of: DateTime<Utc>,
) -> bool {
    if !dates::is_future(&record.end_date, as_of) {
        return false;
    }

    if record.category() != category {
        return false;
    }

    if !matches_sub_type(record, category, sub_type) {
        return false;
    }

    if !matches_scalars(record, criteria) {
        return false;
    }

    if !matches_multi_select(record, criteria.base()) {
        return false;
    }

    matches_ranges(record, criteria)
}

/// Sub-type check. `sub_type` is expected to have been through the legacy
/// slug rewrite already.
pub fn matches_sub_type(record: &ListingRecord, category: Category, sub_type: &str) -> bool {
    if is_unconstrained(Some(sub_type)) {
        return true;
    }

    let accepted = accepted_values(type_groups(category), sub_type);
    let Some(value) = record.type_value() else {
        return false;
    };

    accepted.iter().any(|a| text_equals(a, value))
}

fn scalar_matches(filter: Option<&str>, value: Option<&str>) -> bool {
    if is_unconstrained(filter) {
        return true;
    }
    match (filter, value) {
        (Some(f), Some(v)) => text_equals(f, v),
        _ => false,
    }
}

fn matches_scalars(record: &ListingRecord, criteria: &Criteria) -> bool {
    let base = criteria.base();

    if let Some(format) = base.format.as_deref().filter(|f| !is_unconstrained(Some(*f))) {
        let accepted = accepted_values(FORMAT_GROUPS, format);
        if !accepted.iter().any(|a| text_equals(a, &record.format)) {
            return false;
        }
    }

    if !scalar_matches(base.state.as_deref(), Some(&record.state)) {
        return false;
    }

    // City names come from the region reference list and from scraped
    // records, which disagree on accents
    if !scalar_matches(base.city.as_deref(), Some(&record.city)) {
        return false;
    }

    if let Criteria::Vehicle(vc) = criteria {
        let vehicle = record.as_vehicle();
        let brand = vehicle.and_then(|v| v.brand.as_deref());
        let model = vehicle.and_then(|v| v.model.as_deref());
        let color = vehicle.and_then(|v| v.color.as_deref());

        if !scalar_matches(vc.brand.as_deref(), brand)
            || !scalar_matches(vc.model.as_deref(), model)
            || !scalar_matches(vc.color.as_deref(), color)
        {
            return false;
        }
    }

    true
}

fn matches_multi_select(record: &ListingRecord, base: &BaseCriteria) -> bool {
    if !base.origin.is_empty() {
        let mapped = map_labels(ORIGIN_LABELS, &base.origin);
        if !mapped.iter().any(|o| text_equals(o, &record.origin)) {
            return false;
        }
    }

    if !base.stage.is_empty() {
        let mapped = map_labels(STAGE_LABELS, &base.stage);
        if !mapped.iter().any(|s| text_equals(s, &record.stage)) {
            return false;
        }
    }

    true
}

fn matches_ranges(record: &ListingRecord, criteria: &Criteria) -> bool {
    if !criteria.base().price.contains(record.initial_bid_value) {
        return false;
    }

    match criteria {
        Criteria::Property(pc) => {
            // A record without an area is not disqualified by the area filter
            if let Some(area) = record.as_property().and_then(|p| p.useful_area_m2) {
                if !pc.area.contains(area) {
                    return false;
                }
            }
        }
        Criteria::Vehicle(vc) => {
            if let Some(year) = record.as_vehicle().and_then(|v| v.year) {
                if !vc.year.contains(f64::from(year)) {
                    return false;
                }
            }
        }
    }

    true
}

/// Free-text containment over the record's descriptive fields
pub fn matches_query(record: &ListingRecord, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return true;
    }
    normalize_text(&searchable_text(record)).contains(normalized_query)
}

/// Concatenate the present subset of type, address, brand, model, city,
/// state and source into one haystack
pub fn searchable_text(record: &ListingRecord) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(t) = record.type_value() {
        parts.push(t);
    }
    if let Some(address) = record.as_property().and_then(|p| p.address.as_deref()) {
        parts.push(address);
    }
    if let Some(v) = record.as_vehicle() {
        parts.extend(v.brand.as_deref());
        parts.extend(v.model.as_deref());
    }
    parts.push(&record.city);
    parts.push(&record.state);
    parts.push(&record.source_site);

    parts.join(" ")
}

/// Check if criteria differ from the category defaults.
/// Sentinel-only differences ("all", empty strings) do not count.
pub fn has_active_filters(criteria: &Criteria, defaults: &CriteriaDefaults) -> bool {
    let default = defaults.for_category(criteria.category());
    let base = criteria.base();

    let scalars_open = [&base.state, &base.city, &base.format]
        .iter()
        .all(|v| is_unconstrained(v.as_deref()));

    let specific_default = match (criteria, &default) {
        (Criteria::Property(pc), Criteria::Property(dc)) => pc.area == dc.area,
        (Criteria::Vehicle(vc), Criteria::Vehicle(dc)) => {
            vc.year == dc.year
                && [&vc.brand, &vc.model, &vc.color]
                    .iter()
                    .all(|v| is_unconstrained(v.as_deref()))
        }
        _ => false,
    };

    !(scalars_open
        && specific_default
        && base.origin.is_empty()
        && base.stage.is_empty()
        && base.price == default.base().price)
}
