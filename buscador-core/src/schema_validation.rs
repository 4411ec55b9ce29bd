use serde_json::{json, Value};
use std::sync::LazyLock;

/// JSON Schema for the persisted preferences document.
///
/// Ranges are checked for shape only; an inverted range is legal and
/// simply matches nothing.
pub static PREFERENCES_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Listing search preferences",
        "type": "object",
        "definitions": {
            "range": {
                "type": "array",
                "items": {"type": "number"},
                "minItems": 2,
                "maxItems": 2
            },
            "scalar": {"type": ["string", "null"]},
            "multi": {"type": "array", "items": {"type": "string"}},
            "property": {
                "type": "object",
                "properties": {
                    "state": {"$ref": "#/definitions/scalar"},
                    "city": {"$ref": "#/definitions/scalar"},
                    "format": {"$ref": "#/definitions/scalar"},
                    "origin": {"$ref": "#/definitions/multi"},
                    "stage": {"$ref": "#/definitions/multi"},
                    "price": {"$ref": "#/definitions/range"},
                    "area": {"$ref": "#/definitions/range"}
                }
            },
            "vehicle": {
                "type": "object",
                "properties": {
                    "state": {"$ref": "#/definitions/scalar"},
                    "city": {"$ref": "#/definitions/scalar"},
                    "format": {"$ref": "#/definitions/scalar"},
                    "origin": {"$ref": "#/definitions/multi"},
                    "stage": {"$ref": "#/definitions/multi"},
                    "price": {"$ref": "#/definitions/range"},
                    "brand": {"$ref": "#/definitions/scalar"},
                    "model": {"$ref": "#/definitions/scalar"},
                    "color": {"$ref": "#/definitions/scalar"},
                    "year": {"$ref": "#/definitions/range"}
                }
            }
        },
        "properties": {
            "viewMode": {"enum": ["horizontal", "vertical"]},
            "sortKey": {
                "enum": ["newest", "lowest-bid", "highest-bid", "highest-discount", "nearest", null]
            },
            "appliedFiltersByCategory": {
                "type": "object",
                "properties": {
                    "property": {"$ref": "#/definitions/property"},
                    "vehicle": {"$ref": "#/definitions/vehicle"}
                }
            }
        }
    })
});

/// Validate data against JSON Schema
/// Returns Ok(()) if valid, Err with list of validation errors if invalid
pub fn validate_against_schema(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let compiled = jsonschema::validator_for(schema)
        .map_err(|e| vec![format!("Schema compilation error: {}", e)])?;

    match compiled.validate(data) {
        Ok(()) => Ok(()),
        Err(error) => {
            let path_str = error.instance_path.to_string();
            let location = if path_str.is_empty() {
                "root".to_string()
            } else {
                path_str
            };
            Err(vec![format!("{} at {}", error, location)])
        }
    }
}

/// Validate a raw preferences document against [`PREFERENCES_SCHEMA`]
pub fn validate_preferences(data: &Value) -> Result<(), Vec<String>> {
    validate_against_schema(&PREFERENCES_SCHEMA, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_preferences_pass() {
        let data = json!({
            "viewMode": "vertical",
            "sortKey": "lowest-bid",
            "appliedFiltersByCategory": {
                "property": {
                    "state": "SP",
                    "city": null,
                    "origin": ["judicial"],
                    "price": [0, 750000],
                    "area": [40, 120]
                },
                "vehicle": {
                    "brand": "Fiat",
                    "year": [2010, 2020]
                }
            }
        });
        assert!(validate_preferences(&data).is_ok());
    }

    #[test]
    fn test_empty_document_passes() {
        assert!(validate_preferences(&json!({})).is_ok());
    }

    #[test]
    fn test_malformed_range_fails_with_location() {
        let data = json!({
            "appliedFiltersByCategory": {"property": {"price": [0]}}
        });
        let errors = validate_preferences(&data).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("/appliedFiltersByCategory/property/price"));
    }

    #[test]
    fn test_inverted_range_is_structurally_valid() {
        let data = json!({
            "appliedFiltersByCategory": {"vehicle": {"year": [2020, 2010]}}
        });
        assert!(validate_preferences(&data).is_ok());
    }

    #[test]
    fn test_unknown_sort_key_fails() {
        assert!(validate_preferences(&json!({"sortKey": "cheapest"})).is_err());
        assert!(validate_preferences(&json!({"sortKey": null})).is_ok());
    }

    #[test]
    fn test_multi_select_must_hold_strings() {
        let data = json!({
            "appliedFiltersByCategory": {"vehicle": {"stage": ["first", 2]}}
        });
        assert!(validate_preferences(&data).is_err());
    }

    #[test]
    fn test_root_errors_report_root() {
        let schema = json!({"type": "object"});
        let errors = validate_against_schema(&schema, &json!([1, 2])).unwrap_err();
        assert!(errors[0].ends_with("at root"));
    }
}
