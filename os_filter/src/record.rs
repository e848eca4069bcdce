//! Property access over arbitrary records
//!
//! Records are untyped property bags. `None` from [`Record::get`] means the
//! property is absent; `Some(Value::Null)` means it is present and null.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Capability interface for anything a filter or bin method can read fields from
pub trait Record {
    fn get(&self, field: &str) -> Option<Value>;
}

impl Record for Map<String, Value> {
    fn get(&self, field: &str) -> Option<Value> {
        Map::get(self, field).cloned()
    }
}

impl Record for Value {
    fn get(&self, field: &str) -> Option<Value> {
        match self {
            Value::Object(map) => Map::get(map, field).cloned(),
            _ => None,
        }
    }
}

impl Record for HashMap<String, Value> {
    fn get(&self, field: &str) -> Option<Value> {
        HashMap::get(self, field).cloned()
    }
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, field: &str) -> Option<Value> {
        BTreeMap::get(self, field).cloned()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, field: &str) -> Option<Value> {
        (**self).get(field)
    }
}

impl<R: Record + ?Sized> Record for std::sync::Arc<R> {
    fn get(&self, field: &str) -> Option<Value> {
        (**self).get(field)
    }
}

// ============================================================================
// LOOSE COERCION
// ============================================================================

/// String form of a value under the loose rules filters use (`String(x)`)
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Print a float the way loose string coercion does: shortest round-trip
/// digits, integral values without a fraction, and exponent form (`1e+21`,
/// `1e-7`) outside `1e-6 <= |x| < 1e21`
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponent_form = format!("{:e}", value);
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponent_form,
    }
}

/// Numeric form of a value under loose rules; `None` where the result would be NaN
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => parse_number(&coerce_string(value)),
    }
}

/// Parse numeric text; blank text is zero, anything else must be a full float
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
}

/// Whether a value counts as empty for "No field" and "is empty" purposes
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_impls() {
        let value = json!({"a": 1, "b": null});
        assert_eq!(Record::get(&value, "a"), Some(json!(1)));
        assert_eq!(Record::get(&value, "b"), Some(Value::Null));
        assert_eq!(Record::get(&value, "c"), None);
        assert_eq!(Record::get(&json!([1, 2]), "a"), None);

        let mut map = HashMap::new();
        map.insert("x".to_string(), json!("y"));
        assert_eq!(Record::get(&map, "x"), Some(json!("y")));
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(coerce_string(&json!(10)), "10");
        assert_eq!(coerce_string(&json!(10.0)), "10");
        assert_eq!(coerce_string(&json!(10.5)), "10.5");
        assert_eq!(coerce_string(&json!(-0.0)), "0");
        assert_eq!(coerce_string(&json!(false)), "false");
        assert_eq!(coerce_string(&Value::Null), "null");
        assert_eq!(coerce_string(&json!("Tada!")), "Tada!");
        assert_eq!(coerce_string(&json!([1, "a", null])), "1,a,");
        assert_eq!(coerce_string(&json!({"k": 1})), "[object Object]");
    }

    #[test]
    fn test_format_number_exponent_edges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e21), "-1.5e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(coerce_string(&json!(1e21)), "1e+21");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!("12.5")), Some(12.5));
        assert_eq!(coerce_number(&json!(" ")), Some(0.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
        assert_eq!(coerce_number(&json!([5])), Some(5.0));
        assert_eq!(coerce_number(&json!({"k": 1})), None);
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(None));
        assert!(is_empty_value(Some(&Value::Null)));
        assert!(is_empty_value(Some(&json!(""))));
        assert!(!is_empty_value(Some(&json!(0))));
        assert!(!is_empty_value(Some(&json!(" "))));
    }
}
