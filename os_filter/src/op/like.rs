//! Pattern ops: `PropertyIsLike` and the numeric prefix match

use super::literal::{binary_predicate, fractional_digits, loose_compare, numeric_text, property_name, literal_element, open_tag};
use super::{FilterOp, ValueMatcher};
use crate::config::constants::column_types;
use crate::config::constants::filter::{ESCAPE_CHAR, SINGLE_CHAR, WILDCARD};
use crate::record::coerce_string;
use crate::xml::XmlElement;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

/// Translate a like literal into regex source
///
/// The wildcard matches any run of characters, the single char matches one
/// character and the escape char makes the next character literal.
pub fn like_pattern(literal: &str) -> String {
    let mut pattern = String::with_capacity(literal.len() * 2);
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE_CHAR {
            if let Some(next) = chars.next() {
                pattern.push_str(&regex::escape(&next.to_string()));
            } else {
                pattern.push_str(&regex::escape(&c.to_string()));
            }
        } else if c == WILDCARD {
            pattern.push_str(".*");
        } else if c == SINGLE_CHAR {
            pattern.push('.');
        } else {
            pattern.push_str(&regex::escape(&c.to_string()));
        }
    }
    pattern
}

/// `PropertyIsLike` with `*`, `.` and `\` as wildcard, single char and escape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsLike {
    case_insensitive: bool,
}

impl Default for IsLike {
    fn default() -> Self {
        Self::with_case_insensitive(true)
    }
}

impl IsLike {
    pub fn with_case_insensitive(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn flags(&self) -> &'static str {
        if self.case_insensitive {
            "im"
        } else {
            "m"
        }
    }

    /// Anchored regex for a literal
    pub fn compile(&self, literal: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("(?{})^{}$", self.flags(), like_pattern(literal)))
    }
}

impl FilterOp for IsLike {
    fn local_name(&self) -> &str {
        "PropertyIsLike"
    }

    fn title(&self) -> String {
        "is like".to_string()
    }

    fn short_title(&self) -> String {
        "like".to_string()
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::ALL
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        let attributes = [
            ("wildCard", WILDCARD.to_string()),
            ("singleChar", SINGLE_CHAR.to_string()),
            ("escapeChar", ESCAPE_CHAR.to_string()),
        ];
        format!(
            "{}{}{}</PropertyIsLike>",
            open_tag(self.local_name(), None, &attributes),
            property_name(column),
            literal_element(literal)
        )
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        let pattern = like_pattern(literal).replace('/', "\\/");
        format!("/^{}$/{}.test({})", pattern, self.flags(), var_name)
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        self.compile(literal)
            .map(|re| re.is_match(&like_text(value)))
            .unwrap_or(false)
    }

    fn matcher(&self, literal: &str) -> ValueMatcher {
        match self.compile(literal) {
            Ok(re) => ValueMatcher::new(move |value| re.is_match(&like_text(value))),
            Err(_) => ValueMatcher::new(|_| false),
        }
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}

/// Text a like pattern is tested against; an absent value tests as "undefined"
fn like_text(value: Option<&Value>) -> String {
    value
        .map(coerce_string)
        .unwrap_or_else(|| "undefined".to_string())
}

/// Numeric prefix match: `"23.45*"` covers `[23.45, 23.46)`
///
/// Written as an `And` of `>=` and `<` predicates carrying the `like numeric` hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsLikeNumeric;

impl IsLikeNumeric {
    pub const HINT: &'static str = "like numeric";

    /// Lower and upper bound literals, both printed with the literal's precision
    ///
    /// Precision is the digit count after the decimal point in the literal text.
    pub fn range(literal: &str) -> Option<(String, String)> {
        let text = literal.trim().trim_end_matches(WILDCARD).trim();
        let text = numeric_text(text)?;
        let start: f64 = text.parse().ok()?;
        let precision = fractional_digits(text);
        let end = start + 10f64.powi(-(precision as i32));
        Some((text.to_string(), format!("{:.*}", precision, end)))
    }
}

impl FilterOp for IsLikeNumeric {
    fn local_name(&self) -> &str {
        "And"
    }

    fn title(&self) -> String {
        "is like numeric".to_string()
    }

    fn short_title(&self) -> String {
        "like".to_string()
    }

    fn match_hint(&self) -> Option<&str> {
        Some(Self::HINT)
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::NUMERIC
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        let Some((lower, upper)) = Self::range(literal) else {
            return String::new();
        };

        format!(
            "{}{}{}</And>",
            open_tag(self.local_name(), Some(Self::HINT), &[]),
            binary_predicate("PropertyIsGreaterThanOrEqualTo", column, &lower),
            binary_predicate("PropertyIsLessThan", column, &upper)
        )
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        match Self::range(literal) {
            Some((lower, upper)) => format!("({0}>={1}&&{0}<{2})", var_name, lower, upper),
            None => String::new(),
        }
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        let Some((lower, upper)) = Self::range(literal) else {
            return true;
        };

        matches!(
            loose_compare(value, &lower),
            Some(Ordering::Greater | Ordering::Equal)
        ) && loose_compare(value, &upper) == Some(Ordering::Less)
    }

    fn column(&self, element: &XmlElement) -> Option<String> {
        element
            .find_child("PropertyIsGreaterThanOrEqualTo")?
            .find_child("PropertyName")
            .map(XmlElement::text_content)
    }

    fn literal(&self, element: &XmlElement) -> Option<String> {
        let lower = element
            .find_child("PropertyIsGreaterThanOrEqualTo")?
            .find_child("Literal")?
            .text_content();
        Some(format!("{}{}", lower, WILDCARD))
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use serde_json::json;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("AB*C"), "AB.*C");
        assert_eq!(like_pattern("a.c"), "a.c");
        assert_eq!(like_pattern(r"a\.c"), r"a\.c");
        assert_eq!(like_pattern(r"a\*"), r"a\*");
        assert_eq!(like_pattern("(x)"), r"\(x\)");
    }

    #[test]
    fn test_like_filter() {
        assert_eq!(
            IsLike::default().filter("NAME", "AB*"),
            "<PropertyIsLike wildCard=\"*\" singleChar=\".\" escapeChar=\"\\\">\
             <PropertyName>NAME</PropertyName><Literal><![CDATA[AB*]]></Literal></PropertyIsLike>"
        );
    }

    #[test]
    fn test_like_eval_expression() {
        assert_eq!(IsLike::default().eval_expression("x", "AB*"), "/^AB.*$/im.test(x)");
        assert_eq!(
            IsLike::with_case_insensitive(false).eval_expression("x", "a/b"),
            "/^a\\/b$/m.test(x)"
        );
    }

    #[test]
    fn test_like_evaluate() {
        let like = IsLike::default();
        assert!(like.evaluate(Some(&json!("ABC")), "ab*"));
        assert!(like.evaluate(Some(&json!("AxC")), "A.C"));
        assert!(!like.evaluate(Some(&json!("AxC")), r"A\.C"));
        assert!(like.evaluate(Some(&json!(1234)), "12*"));
        assert!(like.evaluate(None, "undef*"));

        let strict = IsLike::with_case_insensitive(false);
        assert!(!strict.evaluate(Some(&json!("ABC")), "ab*"));
    }

    #[test]
    fn test_like_matcher_agrees_with_evaluate() {
        let like = IsLike::default();
        let matcher = like.matcher("ab*");
        for value in [json!("ABC"), json!("xab"), json!(12), json!(null)] {
            assert_eq!(matcher.is_match(Some(&value)), like.evaluate(Some(&value), "ab*"));
        }
        assert!(!matcher.is_match(None));
        assert!(like.matcher("undef*").is_match(None));

        let negated = crate::op::Not::new(Box::new(like)).matcher("ab*");
        assert!(!negated.is_match(Some(&json!("abc"))));
        assert!(negated.is_match(Some(&json!("cab"))));
    }

    #[test]
    fn test_like_numeric_precision() {
        let filter = IsLikeNumeric.filter("X", "23.4567*");
        let element = parse_str(&filter).unwrap();

        let lower = element
            .find_child("PropertyIsGreaterThanOrEqualTo")
            .and_then(|e| e.find_child("Literal"))
            .map(XmlElement::text_content);
        let upper = element
            .find_child("PropertyIsLessThan")
            .and_then(|e| e.find_child("Literal"))
            .map(XmlElement::text_content);

        assert_eq!(lower.as_deref(), Some("23.4567"));
        assert_eq!(upper.as_deref(), Some("23.4568"));
        assert_eq!(element.attribute("hint"), Some("like numeric"));
    }

    #[test]
    fn test_like_numeric_range() {
        assert_eq!(
            IsLikeNumeric::range("5*"),
            Some(("5".to_string(), "6".to_string()))
        );
        assert_eq!(
            IsLikeNumeric::range(" 0.10* "),
            Some(("0.10".to_string(), "0.11".to_string()))
        );
        assert_eq!(IsLikeNumeric::range("abc*"), None);
        assert_eq!(IsLikeNumeric::range("*"), None);
    }

    #[test]
    fn test_like_numeric_unparsable_is_empty() {
        assert_eq!(IsLikeNumeric.filter("X", "abc"), "");
        assert_eq!(IsLikeNumeric.eval_expression("x", "abc"), "");
    }

    #[test]
    fn test_like_numeric_evaluate() {
        assert_eq!(
            IsLikeNumeric.eval_expression("x", "23.45*"),
            "(x>=23.45&&x<23.46)"
        );
        assert!(IsLikeNumeric.evaluate(Some(&json!(23.459)), "23.45*"));
        assert!(IsLikeNumeric.evaluate(Some(&json!("23.45")), "23.45*"));
        assert!(!IsLikeNumeric.evaluate(Some(&json!(23.46)), "23.45*"));
        assert!(!IsLikeNumeric.evaluate(None, "23.45*"));
    }
}
