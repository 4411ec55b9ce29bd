//! Vocabulary tables reconciling UI filter values with record values.
//!
//! Each entry maps one UI-facing key (a slug) to the record values it
//! accepts. Adding vocabulary means adding rows here; the evaluator only
//! ever goes through [`accepted_values`].

use crate::models::Category;
use crate::normalize::rewrite_legacy_slug;

/// A slug and the record values it accepts.
pub type Group = (&'static str, &'static [&'static str]);

/// A slug and its single record label.
pub type Label = (&'static str, &'static str);

pub const FORMAT_GROUPS: &[Group] = &[
    ("auction", &["In-person", "Online", "Hybrid"]),
    ("direct-sale", &["Direct Sale"]),
];

pub const ORIGIN_LABELS: &[Label] = &[
    ("judicial", "Judicial"),
    ("extrajudicial", "Extrajudicial"),
    ("private", "Private"),
    ("public", "Public"),
];

pub const STAGE_LABELS: &[Label] = &[
    ("single-round", "Single Round"),
    ("first", "1st Round"),
    ("second", "2nd Round"),
    ("third", "3rd Round"),
];

pub const VEHICLE_TYPE_GROUPS: &[Group] = &[
    ("cars", &["Car"]),
    ("motorcycles", &["Motorcycle"]),
    ("trucks", &["Truck"]),
    ("buses", &["Bus"]),
    ("machinery", &["Machine"]),
    ("support", &["Trailer"]),
    ("boats", &["Boat"]),
    ("recreational", &["Recreational"]),
    ("not-informed", &["Not Informed"]),
];

pub const PROPERTY_TYPE_GROUPS: &[Group] = &[
    ("apartments", &["Apartment"]),
    ("houses", &["House"]),
    ("commercial", &["Commercial"]),
    ("compact", &["Compact"]),
    ("condominiums", &["Condominium"]),
    ("warehouses", &["Warehouse"]),
    ("garage", &["Garage"]),
    ("lodging", &["Lodging"]),
    ("industrial", &["Industrial"]),
    ("mixed-use", &["Mixed Use"]),
    ("buildings", &["Building"]),
    ("rural", &["Rural"]),
    ("land-and-lots", &["Land"]),
    ("not-informed", &["Not Informed"]),
];

/// Display labels for sub-type slugs, in navigation order.
pub const VEHICLE_TYPE_LABELS: &[Label] = &[
    ("all", "All"),
    ("cars", "Cars"),
    ("motorcycles", "Motorcycles"),
    ("trucks", "Trucks"),
    ("buses", "Buses"),
    ("machinery", "Machinery"),
    ("support", "Support"),
    ("boats", "Boats"),
    ("recreational", "Recreational"),
    ("not-informed", "Not Informed"),
];

pub const PROPERTY_TYPE_LABELS: &[Label] = &[
    ("all", "All"),
    ("apartments", "Apartments"),
    ("houses", "Houses"),
    ("commercial", "Commercial"),
    ("compact", "Compact"),
    ("condominiums", "Condominiums"),
    ("warehouses", "Warehouses"),
    ("garage", "Garage"),
    ("lodging", "Lodging"),
    ("industrial", "Industrial"),
    ("mixed-use", "Mixed Use"),
    ("buildings", "Buildings"),
    ("rural", "Rural"),
    ("land-and-lots", "Land and Lots"),
    ("not-informed", "Not Informed"),
];

/// Record values accepted for a grouped key. Unknown keys accept themselves.
pub fn accepted_values(table: &[Group], key: &str) -> Vec<String> {
    let key = key.trim();
    match table.iter().find(|(slug, _)| slug.eq_ignore_ascii_case(key)) {
        Some((_, values)) => values.iter().map(|v| v.to_string()).collect(),
        None => vec![key.to_string()],
    }
}

/// Record label for a labelled key. Unknown keys map to themselves.
pub fn label_for(table: &[Label], key: &str) -> String {
    let key = key.trim();
    table
        .iter()
        .find(|(slug, _)| slug.eq_ignore_ascii_case(key))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Map every selected key through a label table
pub fn map_labels(table: &[Label], keys: &[String]) -> Vec<String> {
    keys.iter().map(|k| label_for(table, k)).collect()
}

pub fn type_groups(category: Category) -> &'static [Group] {
    match category {
        Category::Property => PROPERTY_TYPE_GROUPS,
        Category::Vehicle => VEHICLE_TYPE_GROUPS,
    }
}

pub fn type_labels(category: Category) -> &'static [Label] {
    match category {
        Category::Property => PROPERTY_TYPE_LABELS,
        Category::Vehicle => VEHICLE_TYPE_LABELS,
    }
}

/// True for official slugs and for legacy slugs that rewrite to one
pub fn is_known_sub_type(category: Category, slug: &str) -> bool {
    let slug = rewrite_legacy_slug(category, slug);
    type_labels(category).iter().any(|(known, _)| *known == slug)
}

/// Display label for a sub-type slug
pub fn sub_type_label(category: Category, slug: &str) -> String {
    let slug = rewrite_legacy_slug(category, slug);
    label_for(type_labels(category), &slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_values_known_key() {
        assert_eq!(
            accepted_values(FORMAT_GROUPS, "auction"),
            vec!["In-person", "Online", "Hybrid"]
        );
        assert_eq!(accepted_values(FORMAT_GROUPS, "direct-sale"), vec!["Direct Sale"]);
    }

    #[test]
    fn test_accepted_values_unknown_key_falls_back_to_itself() {
        assert_eq!(accepted_values(FORMAT_GROUPS, "Online"), vec!["Online"]);
        assert_eq!(accepted_values(PROPERTY_TYPE_GROUPS, "castles"), vec!["castles"]);
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for(ORIGIN_LABELS, "judicial"), "Judicial");
        assert_eq!(label_for(STAGE_LABELS, "second"), "2nd Round");
        assert_eq!(label_for(STAGE_LABELS, "Final Round"), "Final Round");
    }

    #[test]
    fn test_map_labels() {
        let keys = vec!["first".to_string(), "custom".to_string()];
        assert_eq!(map_labels(STAGE_LABELS, &keys), vec!["1st Round", "custom"]);
    }

    #[test]
    fn test_every_group_slug_has_a_label() {
        for category in Category::ALL {
            for (slug, _) in type_groups(category) {
                assert!(
                    type_labels(category).iter().any(|(s, _)| s == slug),
                    "missing label for {} slug '{}'",
                    category,
                    slug
                );
            }
        }
    }

    #[test]
    fn test_is_known_sub_type_accepts_legacy() {
        assert!(is_known_sub_type(Category::Property, "vacant-land"));
        assert!(is_known_sub_type(Category::Property, "apartments"));
        assert!(!is_known_sub_type(Category::Property, "cars"));
    }

    #[test]
    fn test_sub_type_label() {
        assert_eq!(sub_type_label(Category::Property, "land-and-lots"), "Land and Lots");
        assert_eq!(sub_type_label(Category::Vehicle, "trailers"), "Support");
    }
}
