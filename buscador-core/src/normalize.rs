use crate::models::Category;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sentinel a UI sends for "no constraint" on scalar filters and sub-types.
pub const ALL_SENTINEL: &str = "all";

/// Normalize text for comparison
/// - Lowercase (first, since lowercasing can itself emit combining marks)
/// - Unicode NFD decomposition with combining marks removed
/// - Leading/trailing whitespace removed, internal whitespace collapsed
pub fn normalize_text(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-, accent- and whitespace-insensitive equality
pub fn text_equals(a: &str, b: &str) -> bool {
    normalize_text(a) == normalize_text(b)
}

/// True when a scalar filter value places no constraint on results.
pub fn is_unconstrained(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v.eq_ignore_ascii_case(ALL_SENTINEL)
        }
    }
}

/// Deprecated sub-type slugs and their current replacements, per category.
const LEGACY_SLUGS: &[(Category, &str, &str)] = &[
    (Category::Vehicle, "trailers", "support"),
    (Category::Vehicle, "scrap", "not-informed"),
    (Category::Property, "vacant-land", "land-and-lots"),
];

/// Rewrite a deprecated sub-type slug to its current equivalent.
///
/// The slug is trimmed and lowercased; anything not in the legacy table is
/// returned as-is.
pub fn rewrite_legacy_slug(category: Category, slug: &str) -> String {
    let slug = slug.trim().to_lowercase();

    LEGACY_SLUGS
        .iter()
        .find(|(cat, old, _)| *cat == category && *old == slug)
        .map(|(_, _, new)| new.to_string())
        .unwrap_or(slug)
}

/// True if the slug is one of the rewritten legacy slugs
pub fn is_legacy_slug(category: Category, slug: &str) -> bool {
    let slug = slug.trim().to_lowercase();
    LEGACY_SLUGS
        .iter()
        .any(|(cat, old, _)| *cat == category && *old == slug)
}
