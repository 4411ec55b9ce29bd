use crate::models::ListingRecord;
use serde_json::Value;

fn non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.trim().is_empty())
}

fn first_present<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

/// Structural check on an untrusted record: non-empty id, a known `type`
/// discriminant, and non-empty `image`/`url` fields.
pub fn is_listing_record(value: &Value) -> bool {
    record_problems(value).is_empty()
}

/// Every structural problem found on a raw record
pub fn record_problems(value: &Value) -> Vec<String> {
    let mut problems = Vec::new();

    let Some(obj) = value.as_object() else {
        return vec!["record is not an object".to_string()];
    };

    if !non_empty_str(first_present(obj, &["id", "_id"])) {
        problems.push("missing or empty id".to_string());
    }

    match obj.get("type").and_then(|v| v.as_str()) {
        Some("property") | Some("vehicle") => {}
        Some(other) => problems.push(format!("unknown type '{}'", other)),
        None => problems.push("missing type".to_string()),
    }

    if !non_empty_str(obj.get("image")) {
        problems.push("missing image".to_string());
    }

    if !non_empty_str(first_present(obj, &["url", "href"])) {
        problems.push("missing url".to_string());
    }

    problems
}

/// The same structural check applied to an already typed record
pub fn is_well_formed(record: &ListingRecord) -> bool {
    [&record.id, &record.image, &record.url]
        .iter()
        .all(|field| !field.trim().is_empty())
}

/// Two finite numbers. Ordering is deliberately left to the evaluator.
pub fn is_numeric_range(value: &Value) -> bool {
    match value.as_array() {
        Some(arr) if arr.len() == 2 => arr
            .iter()
            .all(|v| v.as_f64().is_some_and(|n| n.is_finite())),
        _ => false,
    }
}

pub fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|arr| arr.iter().all(|v| v.is_string()))
}

/// Validate a raw catalog document
/// Returns Ok(()) if every record is well formed, or Err(Vec<String>) with
/// one message per problem
pub fn validate_catalog(catalog: &Value) -> Result<(), Vec<String>> {
    let Some(records) = catalog.as_array() else {
        return Err(vec!["Catalog must be a JSON array of records".to_string()]);
    };

    let mut errors = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let record_ref = match record.get("id").or_else(|| record.get("_id")) {
            Some(Value::String(id)) if !id.is_empty() => format!("Record #{} ('{}')", idx + 1, id),
            _ => format!("Record #{}", idx + 1),
        };

        for problem in record_problems(record) {
            errors.push(format!("{}: {}", record_ref, problem));
        }

        // Structurally fine but not loadable (bad field types, missing price...)
        if is_listing_record(record) {
            if let Err(e) = serde_json::from_value::<ListingRecord>(record.clone()) {
                errors.push(format!("{}: {}", record_ref, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a raw criteria object for one category: multi-select fields must
/// be string arrays and range fields numeric ranges, when present.
pub fn criteria_problems(value: &Value) -> Vec<String> {
    let mut problems = Vec::new();

    let Some(obj) = value.as_object() else {
        return vec!["criteria is not an object".to_string()];
    };

    for field in ["origin", "stage"] {
        if let Some(v) = obj.get(field) {
            if !is_string_array(v) {
                problems.push(format!("'{}' must be an array of strings", field));
            }
        }
    }

    for field in ["price", "area", "year"] {
        if let Some(v) = obj.get(field) {
            if !is_numeric_range(v) {
                problems.push(format!("'{}' must be a [min, max] pair of numbers", field));
            }
        }
    }

    for field in ["state", "city", "format", "brand", "model", "color"] {
        if let Some(v) = obj.get(field) {
            if !(v.is_string() || v.is_null()) {
                problems.push(format!("'{}' must be a string", field));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_record() -> Value {
        json!({
            "id": "p-1",
            "type": "property",
            "image": "https://img.example/1.jpg",
            "url": "https://auction.example/1",
            "endDate": "2030-01-01T00:00:00Z",
            "initialBidValue": 100000,
            "city": "São Paulo",
            "state": "SP"
        })
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(is_listing_record(&raw_record()));
    }

    #[test]
    fn test_legacy_field_names_pass() {
        let record = json!({
            "_id": "7",
            "type": "vehicle",
            "image": "x.jpg",
            "href": "https://auction.example/7"
        });
        assert!(is_listing_record(&record));
    }

    #[test]
    fn test_missing_id_fails() {
        let mut record = raw_record();
        record["id"] = json!("  ");
        assert!(!is_listing_record(&record));
        assert_eq!(record_problems(&record), vec!["missing or empty id"]);
    }

    #[test]
    fn test_bad_type_fails() {
        let mut record = raw_record();
        record["type"] = json!("boat");
        assert!(!is_listing_record(&record));

        record.as_object_mut().unwrap().remove("type");
        assert!(!is_listing_record(&record));
    }

    #[test]
    fn test_missing_image_or_url_fails() {
        let mut record = raw_record();
        record.as_object_mut().unwrap().remove("image");
        assert!(!is_listing_record(&record));

        let mut record = raw_record();
        record["url"] = json!(42);
        assert!(!is_listing_record(&record));
    }

    #[test]
    fn test_empty_image_or_url_fails() {
        let mut record = raw_record();
        record["image"] = json!("");
        assert_eq!(record_problems(&record), vec!["missing image"]);

        let mut record = raw_record();
        record["url"] = json!(" ");
        assert_eq!(record_problems(&record), vec!["missing url"]);
    }

    #[test]
    fn test_non_object_fails() {
        assert!(!is_listing_record(&json!("p-1")));
        assert!(!is_listing_record(&json!(null)));
    }

    #[test]
    fn test_is_numeric_range() {
        assert!(is_numeric_range(&json!([0, 100])));
        assert!(is_numeric_range(&json!([1.5, 2.5])));
        // Inverted ranges are still structurally valid
        assert!(is_numeric_range(&json!([100, 0])));
        assert!(!is_numeric_range(&json!([0])));
        assert!(!is_numeric_range(&json!([0, 1, 2])));
        assert!(!is_numeric_range(&json!(["0", 1])));
        assert!(!is_numeric_range(&json!({"min": 0, "max": 1})));
    }

    #[test]
    fn test_is_string_array() {
        assert!(is_string_array(&json!([])));
        assert!(is_string_array(&json!(["judicial", "public"])));
        assert!(!is_string_array(&json!(["judicial", 1])));
        assert!(!is_string_array(&json!("judicial")));
    }

    #[test]
    fn test_validate_catalog_reports_each_bad_record() {
        let catalog = json!([
            raw_record(),
            {"id": "", "type": "property", "image": "a", "url": "b"},
            {"id": "v-1", "type": "spaceship", "image": "a"}
        ]);

        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Record #2"));
        assert!(errors[1].contains("unknown type 'spaceship'"));
        assert!(errors[2].contains("missing url"));
    }

    #[test]
    fn test_validate_catalog_reports_unloadable_record() {
        let mut record = raw_record();
        record["initialBidValue"] = json!("lots");
        let errors = validate_catalog(&json!([record])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Record #1 ('p-1')"));
    }

    #[test]
    fn test_validate_catalog_rejects_non_array() {
        assert!(validate_catalog(&json!({"records": []})).is_err());
        assert!(validate_catalog(&json!([])).is_ok());
    }

    #[test]
    fn test_criteria_problems() {
        assert!(criteria_problems(&json!({"price": [0, 10], "origin": ["judicial"]})).is_empty());
        let problems = criteria_problems(&json!({"price": [0], "stage": "first", "city": 3}));
        assert_eq!(problems.len(), 3);
    }
}
