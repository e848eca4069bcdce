//! Literal handling shared by the ops: XML fragments, expression quoting and loose comparison

use crate::config::constants::filter::{HINT_ATTRIBUTE, LIST_SEPARATOR};
use crate::record::{coerce_number, coerce_string, parse_number};
use crate::xml::{cdata, escape_attribute, escape_text};
use serde_json::Value;
use std::cmp::Ordering;

/// Opening tag with an optional hint attribute and extra attributes
pub fn open_tag(local_name: &str, hint: Option<&str>, attributes: &[(&str, String)]) -> String {
    let mut tag = format!("<{}", local_name);
    if let Some(hint) = hint {
        tag.push_str(&format!(" {}=\"{}\"", HINT_ATTRIBUTE, escape_attribute(hint)));
    }
    for (key, value) in attributes {
        tag.push_str(&format!(" {}=\"{}\"", key, escape_attribute(value)));
    }
    tag.push('>');
    tag
}

pub fn property_name(column: &str) -> String {
    format!("<PropertyName>{}</PropertyName>", escape_text(column))
}

pub fn literal_element(literal: &str) -> String {
    format!("<Literal>{}</Literal>", cdata(literal))
}

/// `<Name><PropertyName>column</PropertyName><Literal>literal</Literal></Name>`
pub fn binary_predicate(local_name: &str, column: &str, literal: &str) -> String {
    format!(
        "<{0}>{1}{2}</{0}>",
        local_name,
        property_name(column),
        literal_element(literal)
    )
}

/// Quote text as a double-quoted expression string literal
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Trimmed literal text when it reads as a finite number
pub fn numeric_text(literal: &str) -> Option<&str> {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|_| trimmed)
}

/// Literal as an expression operand: bare when numeric, quoted otherwise
pub fn expression_operand(literal: &str) -> String {
    numeric_text(literal)
        .map(str::to_string)
        .unwrap_or_else(|| quote_string(literal))
}

/// Split a comma separated literal into trimmed, non-empty values
pub fn split_list(literal: &str) -> Vec<String> {
    literal
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// LOOSE COMPARISON
// ============================================================================

/// `value == "literal"` under loose equality
pub fn loose_equals(value: Option<&Value>, literal: &str) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => s == literal,
        Some(Value::Number(n)) => match (n.as_f64(), parse_number(literal)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        Some(Value::Bool(b)) => parse_number(literal) == Some(if *b { 1.0 } else { 0.0 }),
        Some(other) => coerce_string(other) == literal,
    }
}

/// Relational comparison of a value against a literal operand
///
/// A numeric literal compares numerically; otherwise only string values can
/// compare (lexicographically) and everything else is false.
pub fn loose_compare(value: Option<&Value>, literal: &str) -> Option<Ordering> {
    let value = value?;

    if let Some(text) = numeric_text(literal) {
        let right: f64 = text.parse().ok()?;
        let left = coerce_number(value)?;
        return left.partial_cmp(&right);
    }

    match value {
        Value::String(s) => Some(s.as_str().cmp(literal)),
        _ => None,
    }
}

/// Number of fractional digits in numeric text, counted on the string
pub fn fractional_digits(text: &str) -> usize {
    let mantissa = text
        .split(|c| c == 'e' || c == 'E')
        .next()
        .unwrap_or(text);
    mantissa
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binary_predicate() {
        assert_eq!(
            binary_predicate("PropertyIsEqualTo", "A&B", "x]]>y"),
            "<PropertyIsEqualTo><PropertyName>A&amp;B</PropertyName>\
             <Literal><![CDATA[x]]]]><![CDATA[>y]]></Literal></PropertyIsEqualTo>"
        );
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_expression_operand() {
        assert_eq!(expression_operand(" 10.5 "), "10.5");
        assert_eq!(expression_operand("abc"), "\"abc\"");
        assert_eq!(expression_operand(""), "\"\"");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_loose_equals() {
        assert!(loose_equals(Some(&json!("abc")), "abc"));
        assert!(loose_equals(Some(&json!(10)), "10"));
        assert!(loose_equals(Some(&json!(10)), "10.0"));
        assert!(loose_equals(Some(&json!(true)), "1"));
        assert!(!loose_equals(Some(&json!(true)), "true"));
        assert!(!loose_equals(None, "undefined"));
        assert!(!loose_equals(Some(&Value::Null), "null"));
    }

    #[test]
    fn test_loose_compare() {
        assert_eq!(loose_compare(Some(&json!("9")), "10"), Some(Ordering::Less));
        assert_eq!(loose_compare(Some(&json!("b")), "a"), Some(Ordering::Greater));
        assert_eq!(loose_compare(Some(&json!(5)), "abc"), None);
        assert_eq!(loose_compare(None, "1"), None);
    }

    #[test]
    fn test_fractional_digits() {
        assert_eq!(fractional_digits("23.4567"), 4);
        assert_eq!(fractional_digits("23"), 0);
        assert_eq!(fractional_digits("23."), 0);
        assert_eq!(fractional_digits("1.50e3"), 2);
    }
}
