// Argument checks against a tool's input schema

use serde_json::Value;

/// Check `arguments` against the subset of JSON Schema used by tool
/// descriptors: `required` names and the `type` of each declared property.
/// Properties the schema does not declare pass through unchecked.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), String> {
    let args = arguments
        .as_object()
        .ok_or_else(|| "arguments must be an object".to_string())?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            match args.get(name) {
                None | Some(Value::Null) => {
                    return Err(format!("missing required argument '{}'", name));
                }
                Some(_) => {}
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            let (Some(value), Some(expected)) = (
                args.get(name),
                property.get("type").and_then(Value::as_str),
            ) else {
                continue;
            };
            // optional arguments may be sent as explicit nulls
            if value.is_null() {
                continue;
            }
            if !matches_type(value, expected) {
                return Err(format!("argument '{}' must be of type {}", name, expected));
            }
        }
    }

    Ok(())
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}
