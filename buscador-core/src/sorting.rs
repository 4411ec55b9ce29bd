use crate::dates::parse_timestamp;
use crate::models::{ListingRecord, SortKey};
use std::cmp::Ordering;

/// Sort listings in place by the given key.
///
/// `sort_by` is stable, so equal keys keep their catalog order.
pub fn sort_listings(listings: &mut [ListingRecord], key: SortKey) {
    listings.sort_by(|a, b| compare(a, b, key));
}

/// Compare two listings under a sort key
/// - newest: `updatedAt` descending
/// - lowest-bid / highest-bid: initial bid ascending / descending
/// - highest-discount: derived discount descending
/// - nearest: `endDate` ascending
///
/// The order is total: listings with a missing or unparseable date sort
/// after every dated listing, and floats compare with `total_cmp`.
pub fn compare(a: &ListingRecord, b: &ListingRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Newest => compare_dates(&a.updated_at, &b.updated_at, Direction::Descending),
        SortKey::LowestBid => a.initial_bid_value.total_cmp(&b.initial_bid_value),
        SortKey::HighestBid => b.initial_bid_value.total_cmp(&a.initial_bid_value),
        SortKey::HighestDiscount => discount_percent(b).total_cmp(&discount_percent(a)),
        SortKey::Nearest => compare_dates(&a.end_date, &b.end_date, Direction::Ascending),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Ascending,
    Descending,
}

fn compare_dates(a: &str, b: &str, direction: Direction) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => match direction {
            Direction::Ascending => a.cmp(&b),
            Direction::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Discount of the initial bid against the appraisal, in percent.
///
/// Zero when there is no appraisal, the appraisal does not exceed the bid,
/// or any input is non-finite. Never negative, never NaN.
pub fn discount_percent(record: &ListingRecord) -> f64 {
    let bid = record.initial_bid_value;
    match record.appraised_value {
        Some(appraised) if appraised.is_finite() && bid.is_finite() && appraised > bid => {
            let discount = (appraised - bid) / appraised * 100.0;
            if discount.is_finite() && discount > 0.0 {
                discount
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
