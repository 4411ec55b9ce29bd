use crate::models::{
    BaseCriteria, Category, Criteria, NumericRange, PropertyCriteria, VehicleCriteria,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 7;
pub const DEFAULT_NEW_LISTING_THRESHOLD_HOURS: i64 = 24;
/// One year
pub const MAX_NEW_LISTING_THRESHOLD_HOURS: i64 = 24 * 366;

/// Range a filter starts from before the user narrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaDefaults {
    pub property_price: NumericRange,
    pub property_area: NumericRange,
    pub vehicle_price: NumericRange,
    pub vehicle_year: NumericRange,
}

impl Default for CriteriaDefaults {
    fn default() -> Self {
        Self {
            property_price: NumericRange(0.0, 5_000_000.0),
            property_area: NumericRange(0.0, 1_000.0),
            vehicle_price: NumericRange(0.0, 500_000.0),
            vehicle_year: NumericRange(1990.0, f64::from(Utc::now().year())),
        }
    }
}

impl CriteriaDefaults {
    pub fn property(&self) -> PropertyCriteria {
        PropertyCriteria {
            base: BaseCriteria::unconstrained(self.property_price),
            area: self.property_area,
        }
    }

    pub fn vehicle(&self) -> VehicleCriteria {
        VehicleCriteria {
            base: BaseCriteria::unconstrained(self.vehicle_price),
            brand: None,
            model: None,
            color: None,
            year: self.vehicle_year,
        }
    }

    pub fn for_category(&self, category: Category) -> Criteria {
        match category {
            Category::Property => Criteria::Property(self.property()),
            Category::Vehicle => Criteria::Vehicle(self.vehicle()),
        }
    }
}

impl BaseCriteria {
    /// Base criteria with every filter open except the given price range.
    pub fn unconstrained(price: NumericRange) -> Self {
        Self {
            state: None,
            city: None,
            format: None,
            origin: Vec::new(),
            stage: Vec::new(),
            price,
        }
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Listings per page
    pub page_size: usize,
    /// Width of the numbered page bar
    pub max_visible_pages: usize,
    /// A listing scraped within this many hours counts as new
    pub new_listing_threshold_hours: i64,
    pub defaults: CriteriaDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_visible_pages: DEFAULT_MAX_VISIBLE_PAGES,
            new_listing_threshold_hours: DEFAULT_NEW_LISTING_THRESHOLD_HOURS,
            defaults: CriteriaDefaults::default(),
        }
    }
}

impl EngineConfig {
    /// Every out-of-range setting, one message each
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.page_size == 0 {
            problems.push("'pageSize' must be at least 1".to_string());
        }
        if self.max_visible_pages == 0 {
            problems.push("'maxVisiblePages' must be at least 1".to_string());
        }
        if !(1..=MAX_NEW_LISTING_THRESHOLD_HOURS).contains(&self.new_listing_threshold_hours) {
            problems.push(format!(
                "'newListingThresholdHours' must be between 1 and {}, got {}",
                MAX_NEW_LISTING_THRESHOLD_HOURS, self.new_listing_threshold_hours
            ));
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_per_category() {
        let defaults = CriteriaDefaults::default();

        let property = defaults.property();
        assert_eq!(property.base.price, NumericRange(0.0, 5_000_000.0));
        assert_eq!(property.area, NumericRange(0.0, 1_000.0));
        assert!(property.base.origin.is_empty());

        let vehicle = defaults.vehicle();
        assert_eq!(vehicle.base.price, NumericRange(0.0, 500_000.0));
        assert_eq!(vehicle.year.min(), 1990.0);
        assert!(vehicle.brand.is_none());

        assert_eq!(defaults.for_category(Category::Vehicle).category(), Category::Vehicle);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_value(json!({"pageSize": 12})).unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.max_visible_pages, DEFAULT_MAX_VISIBLE_PAGES);
        assert_eq!(config.new_listing_threshold_hours, 24);
    }

    #[test]
    fn test_default_config_has_no_problems() {
        assert!(EngineConfig::default().problems().is_empty());
    }

    #[test]
    fn test_threshold_out_of_range_reported() {
        for hours in [0, -24, i64::MAX, MAX_NEW_LISTING_THRESHOLD_HOURS + 1] {
            let config = EngineConfig {
                new_listing_threshold_hours: hours,
                ..EngineConfig::default()
            };
            let problems = config.problems();
            assert_eq!(problems.len(), 1, "hours = {}", hours);
            assert!(problems[0].contains("newListingThresholdHours"));
        }
    }

    #[test]
    fn test_zero_sizes_reported() {
        let config = EngineConfig {
            page_size: 0,
            max_visible_pages: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.problems().len(), 2);
    }
}
