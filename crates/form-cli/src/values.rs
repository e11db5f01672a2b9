use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hubspot_form_spec::fields::state::MULTI_VALUE_DELIMITER;
use serde_json::Value;

use crate::CliResult;

/// Reads a JSON object of field values. Arrays become `;` joined lists and
/// nulls are skipped.
pub fn load_values(path: &Path) -> CliResult<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    values_from_json(&value)
}

pub fn values_from_json(value: &Value) -> CliResult<BTreeMap<String, String>> {
    let Value::Object(map) = value else {
        return Err("field values must be a JSON object".into());
    };
    let mut values = BTreeMap::new();
    for (name, value) in map {
        if let Some(text) = scalar(name, value)? {
            values.insert(name.clone(), text);
        }
    }
    Ok(values)
}

fn scalar(name: &str, value: &Value) -> CliResult<Option<String>> {
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Array(_) | Value::Object(_) => {
                        return Err(format!("field '{name}' has a nested value").into());
                    }
                    other => parts.extend(scalar(name, other)?),
                }
            }
            Some(parts.join(MULTI_VALUE_DELIMITER))
        }
        Value::Object(_) => return Err(format!("field '{name}' has an object value").into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_and_lists_are_flattened() {
        let values = values_from_json(&json!({
            "email": "ada@example.com",
            "employees": 12,
            "subscribed": true,
            "topics": ["red", "blue"],
            "skipped": null
        }))
        .expect("values");

        assert_eq!(values["email"], "ada@example.com");
        assert_eq!(values["employees"], "12");
        assert_eq!(values["subscribed"], "true");
        assert_eq!(values["topics"], "red;blue");
        assert!(!values.contains_key("skipped"));
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(values_from_json(&json!(["a"])).is_err());
        assert!(values_from_json(&json!({ "a": { "b": 1 } })).is_err());
        assert!(values_from_json(&json!({ "a": [[1]] })).is_err());
    }

    #[test]
    fn values_load_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("values.json");
        fs::write(&path, r#"{ "firstname": "Ada" }"#).expect("write values");
        let values = load_values(&path).expect("load");
        assert_eq!(values.get("firstname").map(String::as_str), Some("Ada"));
    }
}
