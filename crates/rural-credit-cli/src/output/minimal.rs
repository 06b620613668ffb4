use serde_json::Value;

/// The headline answer of each command, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "credit_score",
    "final_cap",
    "recommended_amount",
    "total_value",
    "monthly_installment",
    "completeness_percentage",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_priority(result_obj) {
            return format_minimal(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

/// Priority keys at the top level first, then one level down (the evaluate
/// command nests its verdict under `assessment`/`eligibility`).
fn find_priority(obj: &Value) -> Option<&Value> {
    let map = obj.as_object()?;
    let top = PRIORITY_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
    top.or_else(|| {
        PRIORITY_KEYS.iter().find_map(|key| {
            map.values()
                .filter_map(Value::as_object)
                .find_map(|inner| inner.get(*key).filter(|v| !v.is_null()))
        })
    })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
