//! Flattened-path JSON reader
//!
//! Dotted field access over an already-parsed document. The core never
//! implements a JSON grammar of its own; `serde_json` supplies the parsed
//! tree and these helpers supply the `a.b.c` addressing the driver
//! definitions use.

use serde_json::Value;

/// Walk a dotted path through nested objects
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

pub fn get_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    lookup(root, path)?.as_str()
}

pub fn get_str_or<'a>(root: &'a Value, path: &str, default: &'a str) -> &'a str {
    get_str(root, path).unwrap_or(default)
}

pub fn get_bool(root: &Value, path: &str) -> Option<bool> {
    lookup(root, path)?.as_bool()
}

pub fn get_bool_or(root: &Value, path: &str, default: bool) -> bool {
    get_bool(root, path).unwrap_or(default)
}

pub fn get_i64(root: &Value, path: &str) -> Option<i64> {
    lookup(root, path)?.as_i64()
}

pub fn get_i64_or(root: &Value, path: &str, default: i64) -> i64 {
    get_i64(root, path).unwrap_or(default)
}

pub fn get_f64(root: &Value, path: &str) -> Option<f64> {
    lookup(root, path)?.as_f64()
}

pub fn get_object<'a>(
    root: &'a Value,
    path: &str,
) -> Option<&'a serde_json::Map<String, Value>> {
    lookup(root, path)?.as_object()
}

pub fn get_array<'a>(root: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    lookup(root, path)?.as_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "driver": {
                "id": "led0",
                "persistent": true,
                "config": { "pin": 13 }
            }
        })
    }

    #[test]
    fn test_dotted_lookup() {
        let doc = doc();
        assert_eq!(get_str(&doc, "driver.id"), Some("led0"));
        assert_eq!(get_i64(&doc, "driver.config.pin"), Some(13));
        assert_eq!(get_bool(&doc, "driver.persistent"), Some(true));
    }

    #[test]
    fn test_missing_paths_yield_defaults() {
        let doc = doc();
        assert_eq!(get_str(&doc, "driver.missing"), None);
        assert_eq!(get_str_or(&doc, "driver.missing", "fallback"), "fallback");
        assert_eq!(get_i64_or(&doc, "driver.config.baud", 9600), 9600);
        assert!(!get_bool_or(&doc, "nope", false));
    }

    #[test]
    fn test_traversal_through_non_object_fails() {
        let doc = doc();
        assert_eq!(get_str(&doc, "driver.id.deeper"), None);
    }

    #[test]
    fn test_object_and_array_access() {
        let doc = json!({"a": {"b": [1, 2]}});
        assert!(get_object(&doc, "a").is_some());
        assert_eq!(get_array(&doc, "a.b").map(Vec::len), Some(2));
    }
}
