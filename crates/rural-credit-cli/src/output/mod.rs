pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `parent.child` keys. Arrays stay whole and
/// are rendered by the caller.
pub fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into(None, map, &mut rows);
    rows
}

fn flatten_into(prefix: Option<&str>, map: &Map<String, Value>, rows: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) if !inner.is_empty() => flatten_into(Some(&name), inner, rows),
            _ => rows.push((name, val.clone())),
        }
    }
}

/// Scalar rendering shared by the table and CSV writers.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => {
            arr.iter().map(scalar_text).collect::<Vec<_>>().join(", ")
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_uses_dotted_keys() {
        let value = json!({
            "credit_score": "725",
            "capacity": { "safe_emi_capacity": "4313", "detail": { "estimated": true } },
            "key_risk_factors": ["Repayment History"],
        });
        let rows = flatten(value.as_object().unwrap());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"capacity.safe_emi_capacity"));
        assert!(keys.contains(&"capacity.detail.estimated"));
        assert!(keys.contains(&"key_risk_factors"));
    }

    #[test]
    fn test_scalar_arrays_join_and_null_is_blank() {
        assert_eq!(scalar_text(&json!(["a", "b"])), "a, b");
        assert_eq!(scalar_text(&Value::Null), "");
        assert_eq!(scalar_text(&json!([{"x": 1}])), r#"[{"x":1}]"#);
    }
}
