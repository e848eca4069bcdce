use super::literal::{open_tag, property_name};
use super::FilterOp;
use crate::config::constants::column_types;
use crate::record::is_empty_value;
use serde_json::Value;

fn null_predicate(column: &str, hint: Option<&str>) -> String {
    format!(
        "{}{}</PropertyIsNull>",
        open_tag("PropertyIsNull", hint, &[]),
        property_name(column)
    )
}

/// `PropertyIsNull`; matches undefined and null values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsNull;

impl FilterOp for IsNull {
    fn local_name(&self) -> &str {
        "PropertyIsNull"
    }

    fn title(&self) -> String {
        "is null".to_string()
    }

    fn short_title(&self) -> String {
        "null".to_string()
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::ALL
    }

    fn filter(&self, column: &str, _literal: &str) -> String {
        null_predicate(column, None)
    }

    fn eval_expression(&self, var_name: &str, _literal: &str) -> String {
        format!("{}==null", var_name)
    }

    fn evaluate(&self, value: Option<&Value>, _literal: &str) -> bool {
        matches!(value, None | Some(Value::Null))
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}

/// `PropertyIsNull` with the `is empty` hint; also matches the empty string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsEmpty;

impl IsEmpty {
    pub const HINT: &'static str = "is empty";
}

impl FilterOp for IsEmpty {
    fn local_name(&self) -> &str {
        "PropertyIsNull"
    }

    fn title(&self) -> String {
        "is empty".to_string()
    }

    fn short_title(&self) -> String {
        "empty".to_string()
    }

    fn match_hint(&self) -> Option<&str> {
        Some(Self::HINT)
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::ALL
    }

    fn filter(&self, column: &str, _literal: &str) -> String {
        null_predicate(column, Some(Self::HINT))
    }

    fn eval_expression(&self, var_name: &str, _literal: &str) -> String {
        format!("({0}==null||{0}===\"\")", var_name)
    }

    fn evaluate(&self, value: Option<&Value>, _literal: &str) -> bool {
        is_empty_value(value)
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_filters() {
        assert_eq!(
            IsNull.filter("A", ""),
            "<PropertyIsNull><PropertyName>A</PropertyName></PropertyIsNull>"
        );
        assert_eq!(
            IsEmpty.filter("A", ""),
            "<PropertyIsNull hint=\"is empty\"><PropertyName>A</PropertyName></PropertyIsNull>"
        );
    }

    #[test]
    fn test_null_evaluate() {
        assert!(IsNull.evaluate(None, ""));
        assert!(IsNull.evaluate(Some(&Value::Null), ""));
        assert!(!IsNull.evaluate(Some(&json!("")), ""));

        assert!(IsEmpty.evaluate(Some(&json!("")), ""));
        assert!(IsEmpty.evaluate(None, ""));
        assert!(!IsEmpty.evaluate(Some(&json!(0)), ""));
    }

    #[test]
    fn test_hint_distinguishes_null_ops() {
        let empty = crate::xml::parse_str(&IsEmpty.filter("A", "")).unwrap();
        let null = crate::xml::parse_str(&IsNull.filter("A", "")).unwrap();
        assert!(IsEmpty.matches(&empty));
        assert!(!IsNull.matches(&empty));
        assert!(IsNull.matches(&null));
        assert!(!IsEmpty.matches(&null));
    }
}
