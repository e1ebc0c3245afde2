//! Lenient typed lookups in a JSON parameter object.
//!
//! A missing key or a value of the wrong type yields the supplied default,
//! so partial override objects such as `{"drift": 80}` are always usable.

use serde_json::Value;

/// `params[name]` as `f64`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as `usize`; only non-negative integers are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as an owned `String`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_extracts_float_and_integer() {
        let params = json!({"drift": 2.5, "min_duration": 1});
        assert_eq!(param_f64(&params, "drift", 0.0), 2.5);
        assert_eq!(param_f64(&params, "min_duration", 0.0), 1.0);
    }

    #[test]
    fn param_f64_falls_back_on_missing_wrong_type_or_null() {
        let params = json!({"drift": "far", "radius_min": null});
        assert_eq!(param_f64(&params, "drift", 50.0), 50.0);
        assert_eq!(param_f64(&params, "radius_min", 2.0), 2.0);
        assert_eq!(param_f64(&params, "absent", 7.0), 7.0);
    }

    #[test]
    fn param_f64_falls_back_for_non_object() {
        assert_eq!(param_f64(&json!([1, 2]), "drift", 3.0), 3.0);
    }

    #[test]
    fn param_usize_extracts_non_negative_integer() {
        assert_eq!(param_usize(&json!({"neighbors": 8}), "neighbors", 5), 8);
    }

    #[test]
    fn param_usize_rejects_float_negative_and_string() {
        assert_eq!(param_usize(&json!({"neighbors": 2.5}), "neighbors", 5), 5);
        assert_eq!(param_usize(&json!({"neighbors": -1}), "neighbors", 5), 5);
        assert_eq!(param_usize(&json!({"neighbors": "many"}), "neighbors", 5), 5);
    }

    #[test]
    fn param_string_extracts_or_falls_back() {
        let params = json!({"color": "#ffffff", "other": 4});
        assert_eq!(param_string(&params, "color", "#000000"), "#ffffff");
        assert_eq!(param_string(&params, "other", "x"), "x");
        assert_eq!(param_string(&params, "missing", "y"), "y");
    }
}
