use anyhow::Result;
use buscador_core::dates::{parse_timestamp, MARKET_UTC_OFFSET_HOURS};
use buscador_core::mappings::{self, ORIGIN_LABELS, STAGE_LABELS};
use buscador_core::normalize::{is_legacy_slug, is_unconstrained, rewrite_legacy_slug};
use buscador_core::{
    discount_percent, has_active_filters, paginate, Category, Criteria, CriteriaDefaults,
    ListingDetails, ListingRecord, PagedResults,
};
use chrono::FixedOffset;
use colored::Colorize;
use serde::Serialize;

use crate::state::AppState;

/// Format a BRL amount with dot thousands separators, e.g. `R$ 1.250.000`
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "R$ -".to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("R$ {}{}", sign, grouped)
}

/// Timestamp in market time as `DD/MM/YYYY HH:MM`, or the raw text if it
/// does not parse
pub fn format_timestamp(raw: &str) -> String {
    let offset = FixedOffset::east_opt(MARKET_UTC_OFFSET_HOURS * 3600);
    match (parse_timestamp(raw), offset) {
        (Some(dt), Some(offset)) => dt.with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string(),
        _ => raw.to_string(),
    }
}

/// Headline for a listing card: type plus address, or brand, model and year
pub fn format_headline(record: &ListingRecord) -> String {
    match &record.details {
        ListingDetails::Property(p) => {
            let kind = p.property_type.as_deref().unwrap_or("Property");
            match p.address.as_deref() {
                Some(address) if !address.trim().is_empty() => format!("{} - {}", kind, address),
                _ => kind.to_string(),
            }
        }
        ListingDetails::Vehicle(v) => {
            let parts: Vec<String> = [v.brand.clone(), v.model.clone(), v.year.map(|y| y.to_string())]
                .into_iter()
                .flatten()
                .collect();
            if parts.is_empty() {
                v.vehicle_type.clone().unwrap_or_else(|| "Vehicle".to_string())
            } else {
                parts.join(" ")
            }
        }
    }
}

/// One line per criterion that narrows the results
pub fn format_active_filters(criteria: &Criteria, defaults: &CriteriaDefaults) -> Vec<String> {
    if !has_active_filters(criteria, defaults) {
        return Vec::new();
    }

    let default = defaults.for_category(criteria.category());
    let base = criteria.base();
    let mut lines = Vec::new();

    let mut scalar = |name: &str, value: &Option<String>| {
        if !is_unconstrained(value.as_deref()) {
            lines.push(format!("{}: {}", name, value.as_deref().unwrap_or_default()));
        }
    };
    scalar("State", &base.state);
    scalar("City", &base.city);
    scalar("Format", &base.format);
    if let Criteria::Vehicle(v) = criteria {
        scalar("Brand", &v.brand);
        scalar("Model", &v.model);
        scalar("Color", &v.color);
    }

    if !base.origin.is_empty() {
        lines.push(format!(
            "Origin: {}",
            mappings::map_labels(ORIGIN_LABELS, &base.origin).join(" OR ")
        ));
    }
    if !base.stage.is_empty() {
        lines.push(format!(
            "Stage: {}",
            mappings::map_labels(STAGE_LABELS, &base.stage).join(" OR ")
        ));
    }
    if base.price != default.base().price {
        lines.push(format!(
            "Price: {} to {}",
            format_price(base.price.min()),
            format_price(base.price.max())
        ));
    }

    match (criteria, &default) {
        (Criteria::Property(p), Criteria::Property(d)) if p.area != d.area => {
            lines.push(format!("Area: {} to {} m²", p.area.min(), p.area.max()));
        }
        (Criteria::Vehicle(v), Criteria::Vehicle(d)) if v.year != d.year => {
            lines.push(format!("Year: {} to {}", v.year.min(), v.year.max()));
        }
        _ => {}
    }

    lines
}

fn print_listing(position: usize, record: &ListingRecord) {
    println!("{}. {}", position, format_headline(record).bold());
    println!("   {}/{}", record.city, record.state);

    let mut bid = format!("   Initial bid: {}", format_price(record.initial_bid_value).green());
    if let Some(appraised) = record.appraised_value {
        bid.push_str(&format!(" (appraised {}", format_price(appraised)));
        let discount = discount_percent(record);
        if discount > 0.0 {
            bid.push_str(&format!(", {}", format!("-{:.0}%", discount).yellow()));
        }
        bid.push(')');
    }
    println!("{}", bid);

    let classification: Vec<&str> = [&record.origin, &record.stage, &record.format]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !classification.is_empty() {
        println!("   {}", classification.join(" • "));
    }

    println!("   Ends: {}", format_timestamp(&record.end_date));
    if !record.source_site.is_empty() {
        println!("   Source: {}", record.source_site.dimmed());
    }
    println!("   {}", record.url.blue());
    println!();
}

/// Print the current page with statistics and active filters
pub fn print_results(app: &AppState, results: &PagedResults) {
    let session = &app.session;
    let page_size = session.config().page_size;

    println!("{}\n", app.get_title().bold());

    if session.sub_type() != "all" {
        println!(
            "{} {}",
            "Type:".bold(),
            mappings::sub_type_label(session.category(), session.sub_type())
        );
    }

    let filters = format_active_filters(session.applied(), &session.config().defaults);
    if !filters.is_empty() {
        println!("{}", "Active filters:".bold());
        for line in &filters {
            println!("  - {}", line);
        }
    }

    if let Some(sort) = session.sort() {
        println!("{} {}", "Sorted by:".bold(), sort.label());
    }
    if !session.query().trim().is_empty() {
        println!("{} \"{}\"", "Search:".bold(), session.query().trim());
    }

    let result = &results.result;
    println!(
        "\n{} listings from {} sources, {} new today\n",
        result.listings.len().to_string().bold(),
        result.distinct_source_count,
        result.new_today_count
    );

    let page = results.page(page_size);
    if page.items.is_empty() {
        if result.listings.is_empty() {
            println!("{}", "No listings match the current filters.".italic());
        } else {
            println!(
                "{}",
                format!("Page {} is past the last page ({}).", page.page_number, page.total_pages)
                    .italic()
            );
        }
        return;
    }

    let offset = (page.page_number - 1) * page_size;
    for (i, record) in page.items.iter().enumerate() {
        print_listing(offset + i + 1, record);
    }

    let bar: Vec<String> = results
        .visible_pages
        .iter()
        .map(|&n| {
            if n == page.page_number {
                format!("[{}]", n).bold().to_string()
            } else {
                n.to_string()
            }
        })
        .collect();
    println!("Page {} of {}   {}", page.page_number, page.total_pages, bar.join(" "));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPage<'a> {
    total: usize,
    distinct_source_count: usize,
    new_today_count: usize,
    page_number: usize,
    total_pages: usize,
    listings: &'a [ListingRecord],
}

/// Print the current page as pretty JSON
pub fn print_json(results: &PagedResults, page_size: usize) -> Result<()> {
    let page = paginate(&results.result.listings, page_size, results.page_number);
    let out = JsonPage {
        total: results.result.listings.len(),
        distinct_source_count: results.result.distinct_source_count,
        new_today_count: results.result.new_today_count,
        page_number: page.page_number,
        total_pages: page.total_pages,
        listings: page.items,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Heads-up for a `--type` slug that is retired or not in the vocabulary
pub fn sub_type_notice(category: Category, slug: &str) -> Option<String> {
    if is_legacy_slug(category, slug) {
        return Some(format!(
            "'{}' is a retired type, showing '{}'",
            slug.trim(),
            rewrite_legacy_slug(category, slug)
        ));
    }
    if is_unconstrained(Some(slug)) || mappings::is_known_sub_type(category, slug) {
        return None;
    }
    Some(format!(
        "unknown {} type '{}'; run `buscador types` to list them",
        category.as_str(),
        slug.trim()
    ))
}

/// Print sub-type slugs and labels for a category
pub fn print_types(category: Category) {
    println!("{}", category.as_str().bold());
    for (slug, label) in mappings::type_labels(category) {
        println!("  {:<16} {}", slug, label);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use buscador_core::NumericRange;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(0.0), "R$ 0");
        assert_eq!(format_price(950.0), "R$ 950");
        assert_eq!(format_price(1_250_000.0), "R$ 1.250.000");
        assert_eq!(format_price(f64::NAN), "R$ -");
    }

    #[test]
    fn test_format_timestamp_uses_market_time() {
        assert_eq!(format_timestamp("2025-06-17T12:00:00Z"), "17/06/2025 09:00");
        assert_eq!(format_timestamp("soon"), "soon");
    }

    #[test]
    fn test_default_criteria_have_no_filter_lines() {
        let defaults = CriteriaDefaults::default();
        let criteria = defaults.for_category(Category::Vehicle);
        assert!(format_active_filters(&criteria, &defaults).is_empty());
    }

    #[test]
    fn test_filter_lines_use_labels() {
        let defaults = CriteriaDefaults::default();
        let mut criteria = defaults.property();
        criteria.base.state = Some("SP".to_string());
        criteria.base.stage = vec!["second".to_string()];
        criteria.area = NumericRange(50.0, 90.0);

        let lines = format_active_filters(&Criteria::Property(criteria), &defaults);
        assert_eq!(lines, vec!["State: SP", "Stage: 2nd Round", "Area: 50 to 90 m²"]);
    }

    #[test]
    fn test_sub_type_notice() {
        assert_eq!(sub_type_notice(Category::Property, "apartments"), None);
        assert_eq!(sub_type_notice(Category::Property, "all"), None);
        assert_eq!(
            sub_type_notice(Category::Vehicle, "trailers").as_deref(),
            Some("'trailers' is a retired type, showing 'support'")
        );
        let unknown = sub_type_notice(Category::Property, "cars").unwrap();
        assert!(unknown.starts_with("unknown property type 'cars'"));
    }
}
