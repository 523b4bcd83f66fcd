//! Structural JSON schema validation
//!
//! A small checker covering the subset of JSON Schema the tool contracts
//! use: primitive types, union types via a type array, object properties,
//! and required fields. Each tool validates its arguments before executing
//! and its payload before the result is shown to the model.

use serde_json::Value;

/// Validate a value against a schema, describing the violated constraint
pub fn validate(schema: &Value, value: &Value) -> Result<(), String> {
    validate_at(schema, value, "$")
}

fn validate_at(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    if let Some(declared) = schema.get("type") {
        check_type(declared, value, path)?;
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        if let Some(object) = value.as_object() {
            for (key, prop_schema) in properties {
                if let Some(prop_value) = object.get(key) {
                    validate_at(prop_schema, prop_value, &format!("{}.{}", path, key))?;
                }
            }
        }
    }

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        let object = value
            .as_object()
            .ok_or_else(|| format!("{}: expected an object with required fields", path))?;
        for key in required.iter().filter_map(|k| k.as_str()) {
            if !object.contains_key(key) {
                return Err(format!("{}: missing required field '{}'", path, key));
            }
        }
    }

    Ok(())
}

/// Check a value against a type name or an array of alternatives
fn check_type(declared: &Value, value: &Value, path: &str) -> Result<(), String> {
    let matches = |name: &str| -> bool {
        match name {
            "object" => value.is_object(),
            "array" => value.is_array(),
            "string" => value.is_string(),
            "integer" => is_integer(value),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "null" => value.is_null(),
            _ => false,
        }
    };

    match declared {
        Value::String(name) => {
            if matches(name) {
                Ok(())
            } else {
                Err(format!("{}: expected {}, got {}", path, name, type_name(value)))
            }
        }
        Value::Array(names) => {
            if names.iter().filter_map(|n| n.as_str()).any(matches) {
                Ok(())
            } else {
                let wanted: Vec<&str> = names.iter().filter_map(|n| n.as_str()).collect();
                Err(format!(
                    "{}: expected one of [{}], got {}",
                    path,
                    wanted.join(", "),
                    type_name(value)
                ))
            }
        }
        _ => Err(format!("{}: malformed type specification", path)),
    }
}

/// Whole-valued floats count as integers; nothing else is coerced
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string" },
                "degree_c": { "type": ["integer", "null"] },
                "condition": { "type": "string" }
            },
            "required": ["city", "condition"]
        })
    }

    #[test]
    fn test_valid_object() {
        let value = json!({ "city": "Paris", "degree_c": 15, "condition": "Partly cloudy" });
        assert!(validate(&weather_output_schema(), &value).is_ok());
    }

    #[test]
    fn test_union_type_allows_null() {
        let value = json!({ "city": "Paris", "degree_c": null, "condition": "Fog" });
        assert!(validate(&weather_output_schema(), &value).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({ "city": "Paris" });
        let err = validate(&weather_output_schema(), &value).unwrap_err();
        assert!(err.contains("condition"));
    }

    #[test]
    fn test_wrong_type_is_named_in_error() {
        let value = json!({ "city": "Paris", "degree_c": "warm", "condition": "Sunny" });
        let err = validate(&weather_output_schema(), &value).unwrap_err();
        assert!(err.contains("degree_c"));
        assert!(err.contains("string"));
    }

    #[test]
    fn test_whole_float_counts_as_integer() {
        let schema = json!({ "type": "integer" });
        assert!(validate(&schema, &json!(15.0)).is_ok());
        assert!(validate(&schema, &json!(15.5)).is_err());
    }

    #[test]
    fn test_non_object_against_required() {
        let schema = json!({ "type": "object", "required": ["city"] });
        assert!(validate(&schema, &json!("Paris")).is_err());
    }
}
