use crate::config::{CriteriaDefaults, EngineConfig};
use crate::models::{ListingRecord, Preferences};
use crate::schema_validation::validate_preferences;
use crate::validation::{criteria_problems, record_problems};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain a JSON array of listings", path.display())]
    NotACatalog { path: PathBuf },
    #[error("invalid preferences in {}: {}", path.display(), problems.join("; "))]
    InvalidPreferences {
        path: PathBuf,
        problems: Vec<String>,
    },
    #[error("invalid settings in {}: {}", path.display(), problems.join("; "))]
    InvalidConfig {
        path: PathBuf,
        problems: Vec<String>,
    },
}

/// Listings loaded from a catalog file, and how many records were dropped
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub records: Vec<ListingRecord>,
    pub skipped: usize,
}

fn read_json(path: &Path) -> Result<Value, IoError> {
    let contents = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a catalog from a JSON file.
///
/// The file must be an array. Records that fail the structural check or do
/// not deserialize are skipped with a warning; they never fail the load.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, IoError> {
    let path = path.as_ref();
    let Value::Array(raw) = read_json(path)? else {
        return Err(IoError::NotACatalog {
            path: path.to_path_buf(),
        });
    };

    let catalog = parse_records(raw);
    debug!(
        path = %path.display(),
        loaded = catalog.records.len(),
        skipped = catalog.skipped,
        "catalog loaded"
    );
    Ok(catalog)
}

/// Keep the loadable records of a raw catalog array
pub fn parse_records(raw: Vec<Value>) -> Catalog {
    let mut catalog = Catalog::default();

    for (idx, value) in raw.into_iter().enumerate() {
        let problems = record_problems(&value);
        if !problems.is_empty() {
            warn!(record = idx + 1, problems = %problems.join("; "), "skipping malformed listing");
            catalog.skipped += 1;
            continue;
        }

        match serde_json::from_value::<ListingRecord>(value) {
            Ok(record) => catalog.records.push(record),
            Err(e) => {
                warn!(record = idx + 1, error = %e, "skipping unreadable listing");
                catalog.skipped += 1;
            }
        }
    }

    catalog
}

/// Load saved preferences.
///
/// The document is checked against the preferences schema, then each stored
/// category is laid over that category's defaults so a partial criteria
/// object still yields complete criteria.
pub fn load_preferences<P: AsRef<Path>>(
    path: P,
    defaults: &CriteriaDefaults,
) -> Result<Preferences, IoError> {
    let path = path.as_ref();
    let raw = read_json(path)?;
    let invalid = |problems: Vec<String>| IoError::InvalidPreferences {
        path: path.to_path_buf(),
        problems,
    };

    validate_preferences(&raw).map_err(invalid)?;
    let merged = merge_over_defaults(raw, defaults).map_err(invalid)?;

    serde_json::from_value(merged).map_err(|e| invalid(vec![e.to_string()]))
}

fn merge_over_defaults(mut raw: Value, defaults: &CriteriaDefaults) -> Result<Value, Vec<String>> {
    let mut problems = Vec::new();

    if let Some(by_category) = raw
        .get_mut("appliedFiltersByCategory")
        .and_then(Value::as_object_mut)
    {
        for (key, base) in [
            ("property", serde_json::to_value(defaults.property())),
            ("vehicle", serde_json::to_value(defaults.vehicle())),
        ] {
            let Some(Value::Object(stored)) = by_category.get(key) else {
                continue;
            };

            problems.extend(
                criteria_problems(&Value::Object(stored.clone()))
                    .into_iter()
                    .map(|p| format!("{}: {}", key, p)),
            );

            let mut merged = base.map_err(|e| vec![e.to_string()])?;
            if let Value::Object(target) = &mut merged {
                for (field, value) in stored {
                    target.insert(field.clone(), value.clone());
                }
            }
            by_category.insert(key.to_string(), merged);
        }
    }

    if problems.is_empty() {
        Ok(raw)
    } else {
        Err(problems)
    }
}

/// Save preferences to a JSON file with pretty printing
pub fn save_preferences<P: AsRef<Path>>(prefs: &Preferences, path: P) -> Result<(), IoError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(prefs).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "preferences saved");
    Ok(())
}

/// Load engine settings; absent keys keep their defaults and out-of-range
/// values are rejected
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, IoError> {
    let path = path.as_ref();
    let raw = read_json(path)?;
    let config: EngineConfig = serde_json::from_value(raw).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let problems = config.problems();
    if !problems.is_empty() {
        return Err(IoError::InvalidConfig {
            path: path.to_path_buf(),
            problems,
        });
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumericRange, SortKey, ViewMode};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn listing(id: &str, kind: &str) -> Value {
        json!({
            "id": id,
            "type": kind,
            "image": "https://img.example/x.jpg",
            "url": "https://auction.example/x",
            "endDate": "2030-01-01T00:00:00Z",
            "updatedAt": "2025-06-15T12:00:00Z",
            "scrapedAt": "2025-06-10T12:00:00Z",
            "initialBidValue": 120000,
            "city": "Campinas",
            "state": "SP",
            "origin": "Judicial",
            "stage": "1st Round",
            "format": "Online",
            "sourceSite": "Auction House A"
        })
    }

    #[test]
    fn test_load_catalog_skips_bad_records() {
        let mut no_price = listing("p-3", "property");
        no_price.as_object_mut().unwrap().remove("initialBidValue");

        let file = write_temp(&json!([
            listing("p-1", "property"),
            {"id": "", "type": "property", "image": "a", "url": "b"},
            listing("v-1", "vehicle"),
            no_price
        ]));

        let catalog = load_catalog(file.path()).unwrap();
        let ids: Vec<_> = catalog.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "v-1"]);
        assert_eq!(catalog.skipped, 2);
    }

    #[test]
    fn test_load_catalog_rejects_non_array() {
        let file = write_temp(&json!({"listings": []}));
        assert!(matches!(
            load_catalog(file.path()),
            Err(IoError::NotACatalog { .. })
        ));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(dir.path().join("nope.json"));
        assert!(matches!(result, Err(IoError::Read { .. })));
    }

    #[test]
    fn test_partial_preferences_fill_from_defaults() {
        let file = write_temp(&json!({
            "sortKey": "highest-discount",
            "appliedFiltersByCategory": {
                "vehicle": {"brand": "Honda", "price": [1000, 20000]}
            }
        }));

        let defaults = CriteriaDefaults::default();
        let prefs = load_preferences(file.path(), &defaults).unwrap();

        assert_eq!(prefs.sort_key, Some(SortKey::HighestDiscount));
        assert_eq!(prefs.view_mode, ViewMode::Horizontal);
        assert!(prefs.applied_filters_by_category.property.is_none());

        let vehicle = prefs.applied_filters_by_category.vehicle.unwrap();
        assert_eq!(vehicle.brand.as_deref(), Some("Honda"));
        assert_eq!(vehicle.base.price, NumericRange(1000.0, 20000.0));
        assert_eq!(vehicle.year, defaults.vehicle_year);
    }

    #[test]
    fn test_invalid_preferences_rejected() {
        let file = write_temp(&json!({
            "appliedFiltersByCategory": {"property": {"area": [10]}}
        }));
        let result = load_preferences(file.path(), &CriteriaDefaults::default());
        assert!(matches!(result, Err(IoError::InvalidPreferences { .. })));
    }

    #[test]
    fn test_preferences_save_then_load() {
        let defaults = CriteriaDefaults::default();
        let mut property = defaults.property();
        property.base.origin = vec!["extrajudicial".to_string()];

        let prefs = Preferences {
            view_mode: ViewMode::Vertical,
            sort_key: Some(SortKey::Nearest),
            applied_filters_by_category: crate::models::AppliedFiltersByCategory {
                property: Some(property),
                vehicle: None,
            },
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        save_preferences(&prefs, &path).unwrap();

        assert_eq!(load_preferences(&path, &defaults).unwrap(), prefs);
    }

    #[test]
    fn test_load_config_partial() {
        let file = write_temp(&json!({"pageSize": 50}));
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_visible_pages, 7);
    }

    #[test]
    fn test_load_config_rejects_huge_threshold() {
        let file = write_temp(&json!({"newListingThresholdHours": i64::MAX}));
        let result = load_config(file.path());
        assert!(matches!(result, Err(IoError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_image_rejected_by_validate_load_and_search_alike() {
        let mut blank_image = listing("p-blank", "property");
        blank_image["image"] = json!("");
        let mut blank_url = listing("p-nourl", "property");
        blank_url["url"] = json!("  ");
        let raw = vec![blank_image, blank_url, listing("p-ok", "property")];

        let errors = crate::validation::validate_catalog(&Value::Array(raw.clone())).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("missing image"));
        assert!(errors[1].contains("missing url"));

        let catalog = parse_records(raw);
        assert_eq!(catalog.skipped, 2);

        let request = crate::search::SearchRequest::new(
            crate::models::Criteria::Property(CriteriaDefaults::default().property()),
            crate::fixtures::as_of(),
        );
        let ids: Vec<String> = crate::search::search(&catalog.records, &request)
            .listings
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["p-ok"]);
    }
}
