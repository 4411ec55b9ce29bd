use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing category. Also accepts the storefront's Portuguese route names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "imoveis")]
    Property,
    #[serde(alias = "veiculos")]
    Vehicle,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Property, Category::Vehicle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Property => "property",
            Category::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "property" | "imoveis" => Ok(Category::Property),
            "vehicle" | "veiculos" => Ok(Category::Vehicle),
            other => Err(format!(
                "unknown category '{}' (expected 'property' or 'vehicle')",
                other
            )),
        }
    }
}

/// One listing in the searchable catalog.
///
/// Timestamps are kept exactly as received; they are parsed at evaluation
/// time so that a malformed date excludes the record instead of failing
/// the whole catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub image: String,
    #[serde(alias = "href", default)]
    pub url: String,

    #[serde(alias = "end_date")]
    pub end_date: String,
    #[serde(alias = "updated", default)]
    pub updated_at: String,
    #[serde(alias = "data_scraped", default)]
    pub scraped_at: String,

    #[serde(alias = "initial_bid_value")]
    pub initial_bid_value: f64,
    #[serde(alias = "appraised_value", default)]
    pub appraised_value: Option<f64>,

    pub city: String,
    pub state: String,

    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub format: String,

    #[serde(alias = "website", default)]
    pub source_site: String,
    #[serde(default)]
    pub docs: Vec<String>,

    #[serde(flatten)]
    pub details: ListingDetails,
}

/// Variant-specific part of a listing, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListingDetails {
    Property(PropertyDetails),
    Vehicle(VehicleDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    #[serde(alias = "property_type", default)]
    pub property_type: Option<String>,
    #[serde(alias = "useful_area_m2", default)]
    pub useful_area_m2: Option<f64>,
    #[serde(alias = "property_address", default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    #[serde(alias = "vehicle_type", default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl ListingRecord {
    pub fn category(&self) -> Category {
        match self.details {
            ListingDetails::Property(_) => Category::Property,
            ListingDetails::Vehicle(_) => Category::Vehicle,
        }
    }

    /// The record's sub-type value as stored (e.g. "Apartment", "Car").
    pub fn type_value(&self) -> Option<&str> {
        match &self.details {
            ListingDetails::Property(p) => p.property_type.as_deref(),
            ListingDetails::Vehicle(v) => v.vehicle_type.as_deref(),
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDetails> {
        match &self.details {
            ListingDetails::Property(p) => Some(p),
            ListingDetails::Vehicle(_) => None,
        }
    }

    pub fn as_vehicle(&self) -> Option<&VehicleDetails> {
        match &self.details {
            ListingDetails::Vehicle(v) => Some(v),
            ListingDetails::Property(_) => None,
        }
    }
}

/// Closed numeric interval `[min, max]`, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange(pub f64, pub f64);

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self(min, max)
    }

    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    /// Inclusive containment. An inverted or non-finite range contains nothing.
    pub fn contains(&self, value: f64) -> bool {
        let (min, max) = (self.0, self.1);
        if !min.is_finite() || !max.is_finite() || min > max {
            return false;
        }
        value >= min && value <= max
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

impl FromStr for NumericRange {
    type Err = String;

    /// Parses `MIN:MAX` (a `..` separator is accepted too).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once(':')
            .or_else(|| s.split_once(".."))
            .ok_or_else(|| format!("invalid range '{}', expected MIN:MAX", s))?;

        let min: f64 = min
            .trim()
            .parse()
            .map_err(|_| format!("invalid range minimum '{}'", min.trim()))?;
        let max: f64 = max
            .trim()
            .parse()
            .map_err(|_| format!("invalid range maximum '{}'", max.trim()))?;

        Ok(NumericRange(min, max))
    }
}

/// Criteria shared by both categories.
///
/// Scalar fields are unconstrained when `None`, empty or the `"all"`
/// sentinel; multi-select fields are unconstrained when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCriteria {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub origin: Vec<String>,
    #[serde(default)]
    pub stage: Vec<String>,
    pub price: NumericRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCriteria {
    #[serde(flatten)]
    pub base: BaseCriteria,
    pub area: NumericRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCriteria {
    #[serde(flatten)]
    pub base: BaseCriteria,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub year: NumericRange,
}

/// Category-specific filter criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Criteria {
    Property(PropertyCriteria),
    Vehicle(VehicleCriteria),
}

impl Criteria {
    pub fn category(&self) -> Category {
        match self {
            Criteria::Property(_) => Category::Property,
            Criteria::Vehicle(_) => Category::Vehicle,
        }
    }

    pub fn base(&self) -> &BaseCriteria {
        match self {
            Criteria::Property(p) => &p.base,
            Criteria::Vehicle(v) => &v.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseCriteria {
        match self {
            Criteria::Property(p) => &mut p.base,
            Criteria::Vehicle(v) => &mut v.base,
        }
    }
}

/// Result ordering chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Newest,
    LowestBid,
    HighestBid,
    HighestDiscount,
    Nearest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::LowestBid,
        SortKey::HighestBid,
        SortKey::HighestDiscount,
        SortKey::Nearest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::LowestBid => "lowest-bid",
            SortKey::HighestBid => "highest-bid",
            SortKey::HighestDiscount => "highest-discount",
            SortKey::Nearest => "nearest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Most recent",
            SortKey::LowestBid => "Lowest bid",
            SortKey::HighestBid => "Highest bid",
            SortKey::HighestDiscount => "Highest discount",
            SortKey::Nearest => "Ending soonest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| {
                let known: Vec<_> = SortKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown sort key '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Card layout preference. Carried through persisted preferences only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Horizontal,
    Vertical,
}

/// Output of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub listings: Vec<ListingRecord>,
    pub distinct_source_count: usize,
    pub new_today_count: usize,
}

/// Applied criteria per category as stored in preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFiltersByCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleCriteria>,
}

/// Persisted user preferences. Staged criteria and the free-text query
/// are session-transient and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub applied_filters_by_category: AppliedFiltersByCategory,
    #[serde(default)]
    pub sort_key: Option<SortKey>,
}
