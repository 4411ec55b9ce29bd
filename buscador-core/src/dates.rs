use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Offset applied to timestamps that carry no zone of their own
/// (auction houses publish in Brasília time, UTC-03:00).
pub const MARKET_UTC_OFFSET_HOURS: i32 = -3;

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})(?:\s+(\d{2}):(\d{2}):(\d{2}))?$").unwrap()
});

static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[\sT](\d{2}):(\d{2}):(\d{2})(?:\.\d+)?)?$").unwrap()
});

/// Parse a timestamp defensively.
///
/// Accepts RFC 3339 / ISO 8601 with a zone, and the zone-less forms
/// `YYYY-MM-DD[ HH:MM:SS]`, `YYYY-MM-DDTHH:MM:SS[.fff]` and
/// `DD/MM/YYYY[ HH:MM:SS]`, which are read in market time.
/// Returns `None` for anything else, including out-of-range components.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(caps) = YEAR_FIRST.captures(input) {
        return build(&caps, [1, 2, 3]);
    }

    if let Some(caps) = DAY_FIRST.captures(input) {
        return build(&caps, [3, 2, 1]);
    }

    None
}

/// Assemble a market-time timestamp from captures; `order` gives the
/// capture indices of year, month and day.
fn build(caps: &regex::Captures<'_>, order: [usize; 3]) -> Option<DateTime<Utc>> {
    let num = |i: usize| -> Option<u32> { caps.get(i).and_then(|m| m.as_str().parse().ok()) };

    let year = caps.get(order[0])?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(order[1])?, num(order[2])?)?;

    let naive: NaiveDateTime = match (num(4), num(5), num(6)) {
        (Some(h), Some(m), Some(s)) => date.and_hms_opt(h, m, s)?,
        _ => date.and_hms_opt(0, 0, 0)?,
    };

    let offset = FixedOffset::east_opt(MARKET_UTC_OFFSET_HOURS * 3600)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// True if the timestamp parses and lies within `[as_of - hours, as_of]`.
/// A window that cannot be represented matches nothing.
pub fn is_within_last_hours(input: &str, hours: i64, as_of: DateTime<Utc>) -> bool {
    let Some(start) = TimeDelta::try_hours(hours).and_then(|h| as_of.checked_sub_signed(h)) else {
        return false;
    };
    parse_timestamp(input).is_some_and(|dt| dt >= start && dt <= as_of)
}

/// True if the timestamp parses and is strictly after `as_of`.
/// Unparseable input counts as already past.
pub fn is_future(input: &str, as_of: DateTime<Utc>) -> bool {
    parse_timestamp(input).is_some_and(|dt| dt > as_of)
}
