use rural_credit_core::policy::ScoringPolicy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON file as a generic serde_json::Value.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    read_json(path)
}

/// Load a policy document. `.yaml`/`.yml` files are read as YAML, anything
/// else as JSON. Weights are normalized and every table validated.
pub fn read_policy(path: &str) -> Result<ScoringPolicy, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let policy: ScoringPolicy = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(policy.prepared()?)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rce-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_yaml_policy() {
        let path = scratch_file(
            "policy.yaml",
            "version: pilot-3\neffective_date: 2025-06-01\nlending:\n  tenure_months: 48\n",
        );
        let policy = read_policy(path.to_str().unwrap()).unwrap();
        assert_eq!(policy.version, "pilot-3");
        assert_eq!(policy.lending.tenure_months, 48);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_read_json_policy_rejects_bad_ltv() {
        let path = scratch_file("policy.json", r#"{"lending": {"loan_to_value": "1.4"}}"#);
        let err = read_policy(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("loan_to_value"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file() {
        let err = read_json_value("/nonexistent/profile.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
