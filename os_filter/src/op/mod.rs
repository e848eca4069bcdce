//! Filter ops
//!
//! Each op is one OGC-filter comparison predicate with three faces: the XML
//! fragment it writes (`filter`), the boolean expression text it compiles to
//! (`eval_expression`) and a native evaluation (`evaluate`) with the same
//! semantics. `matches`, `column` and `literal` read a written fragment back.
//!
//! Ops are stateless. An op only ever inspects the element it is handed, never
//! its ancestors, so callers can nest ops inside `And`/`Or`/`Not` groups freely.

pub mod between;
pub mod comparison;
pub mod like;
pub mod list;
pub mod literal;
pub mod not;
pub mod null;

pub use between::Between;
pub use comparison::{Comparison, ComparisonOp};
pub use like::{IsLike, IsLikeNumeric};
pub use list::InList;
pub use not::Not;
pub use null::{IsEmpty, IsNull};

use crate::config::constants::filter::HINT_ATTRIBUTE;
use crate::config::runtime::ExpressionPreferences;
use crate::xml::{parse_str, XmlElement};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A predicate bound to one literal, built once and applied to many values
#[derive(Clone)]
pub struct ValueMatcher(Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>);

impl ValueMatcher {
    pub fn new(test: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(test))
    }

    pub fn is_match(&self, value: Option<&Value>) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for ValueMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueMatcher")
    }
}

pub trait FilterOp: fmt::Debug + Send + Sync {
    /// OGC element name written by `filter`
    fn local_name(&self) -> &str;

    /// Display title, e.g. "is equal to"
    fn title(&self) -> String;

    /// Compact display title, e.g. "="
    fn short_title(&self) -> String;

    /// Discriminator written as the `hint` attribute when several ops share a local name
    fn match_hint(&self) -> Option<&str> {
        None
    }

    /// Column type tags this op applies to
    fn supported_types(&self) -> &[&'static str];

    fn is_supported(&self, column_type: &str) -> bool {
        self.supported_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(column_type))
    }

    /// XML fragment constraining `column` by `literal`; empty when the literal is unusable
    fn filter(&self, column: &str, literal: &str) -> String;

    /// Boolean expression text over `var_name`; empty means "no constraint"
    fn eval_expression(&self, var_name: &str, literal: &str) -> String;

    /// Evaluate the predicate against a record value (`None` when the field is absent)
    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool;

    /// `evaluate` bound to `literal`; ops with costly literal parsing do it here once
    fn matcher(&self, literal: &str) -> ValueMatcher {
        let op = self.clone_op();
        let literal = literal.to_string();
        ValueMatcher::new(move |value| op.evaluate(value, &literal))
    }

    /// Whether `element` is a fragment this op wrote
    fn matches(&self, element: &XmlElement) -> bool {
        element.local_name() == self.local_name()
            && element.attribute(HINT_ATTRIBUTE) == self.match_hint()
    }

    /// Column named by a fragment this op wrote
    fn column(&self, element: &XmlElement) -> Option<String> {
        element
            .find_child("PropertyName")
            .map(XmlElement::text_content)
    }

    /// Literal held by a fragment this op wrote
    fn literal(&self, element: &XmlElement) -> Option<String> {
        element.find_child("Literal").map(XmlElement::text_content)
    }

    fn clone_op(&self) -> Box<dyn FilterOp>;

    /// `filter` parsed into an element; `None` when the literal is unusable
    fn filter_as_element(&self, column: &str, literal: &str) -> Option<XmlElement> {
        let filter = self.filter(column, literal);
        if filter.is_empty() {
            return None;
        }
        parse_str(&filter).ok()
    }
}

impl Clone for Box<dyn FilterOp> {
    fn clone(&self) -> Self {
        self.clone_op()
    }
}

/// The op vocabulary used to recognise predicates in stored filters
#[derive(Debug, Clone)]
pub struct OpRegistry {
    ops: Vec<Box<dyn FilterOp>>,
}

impl OpRegistry {
    /// Registry with explicit ops, checked in the given order
    pub fn new(ops: Vec<Box<dyn FilterOp>>) -> Self {
        Self { ops }
    }

    /// The full vocabulary configured from runtime preferences
    pub fn with_preferences(preferences: &ExpressionPreferences) -> Self {
        let ops: Vec<Box<dyn FilterOp>> = vec![
            Box::new(ComparisonOp::new(Comparison::EqualTo)),
            Box::new(ComparisonOp::new(Comparison::NotEqualTo)),
            Box::new(ComparisonOp::new(Comparison::GreaterThan)),
            Box::new(ComparisonOp::new(Comparison::GreaterThanOrEqualTo)),
            Box::new(ComparisonOp::new(Comparison::LessThan)),
            Box::new(ComparisonOp::new(Comparison::LessThanOrEqualTo)),
            Box::new(Between),
            Box::new(IsLike::with_case_insensitive(
                preferences.like_case_insensitive,
            )),
            Box::new(IsLikeNumeric),
            Box::new(IsNull),
            Box::new(IsEmpty),
            Box::new(InList),
        ];

        Self::new(ops)
    }

    pub fn ops(&self) -> &[Box<dyn FilterOp>] {
        &self.ops
    }

    /// First op that recognises the element
    pub fn resolve(&self, element: &XmlElement) -> Option<&dyn FilterOp> {
        self.ops
            .iter()
            .find(|op| op.matches(element))
            .map(|op| op.as_ref())
    }

    /// Ops applicable to a column type
    pub fn supported_for(&self, column_type: &str) -> Vec<&dyn FilterOp> {
        self.ops
            .iter()
            .filter(|op| op.is_supported(column_type))
            .map(|op| op.as_ref())
            .collect()
    }
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::with_preferences(&ExpressionPreferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Case = (Box<dyn FilterOp>, &'static str, &'static str);

    fn case(op: impl FilterOp + 'static, column: &'static str, literal: &'static str) -> Case {
        (Box::new(op), column, literal)
    }

    /// (op, column, literal) triples that every op must round-trip
    fn round_trip_cases() -> Vec<Case> {
        vec![
            case(ComparisonOp::new(Comparison::EqualTo), "NAME", "Tada!"),
            case(ComparisonOp::new(Comparison::NotEqualTo), "NAME", "x"),
            case(ComparisonOp::new(Comparison::GreaterThan), "SPEED", "10"),
            case(ComparisonOp::new(Comparison::GreaterThanOrEqualTo), "SPEED", "10.5"),
            case(ComparisonOp::new(Comparison::LessThan), "SPEED", "-3"),
            case(ComparisonOp::new(Comparison::LessThanOrEqualTo), "SPEED", "7"),
            case(Between, "ALT", "10, 20"),
            case(IsLike::default(), "NAME", "AB*C"),
            case(IsLikeNumeric, "LAT", "23.4567*"),
            case(IsNull, "NAME", ""),
            case(IsEmpty, "NAME", ""),
            case(InList, "TYPE", "a, b, c"),
            case(Not::new(Box::new(ComparisonOp::new(Comparison::EqualTo))), "NAME", "x"),
            case(Not::new(Box::new(IsLike::default())), "NAME", "a*"),
            case(Not::new(Box::new(InList)), "TYPE", "a, b"),
        ]
    }

    #[test]
    fn test_round_trip_matches_column_literal() {
        for (op, column, literal) in round_trip_cases() {
            let element = op
                .filter_as_element(column, literal)
                .unwrap_or_else(|| panic!("{} produced no filter", op.title()));

            assert!(op.matches(&element), "{} does not match its own filter", op.title());
            assert_eq!(op.column(&element).as_deref(), Some(column), "{}", op.title());

            if op.local_name() != "PropertyIsNull" {
                assert_eq!(op.literal(&element).as_deref(), Some(literal), "{}", op.title());
            }
        }
    }

    #[test]
    fn test_round_trip_is_unambiguous_in_registry() {
        let registry = OpRegistry::default();
        for (op, column, literal) in round_trip_cases() {
            if op.local_name() == "Not" {
                continue;
            }
            let element = op.filter_as_element(column, literal).unwrap();
            let resolved = registry.resolve(&element).unwrap();
            assert_eq!(resolved.title(), op.title());
        }
    }

    #[test]
    fn test_supported_for() {
        let registry = OpRegistry::default();
        let string_ops: Vec<String> = registry
            .supported_for("string")
            .iter()
            .map(|op| op.title())
            .collect();
        assert!(string_ops.contains(&"is like".to_string()));
        assert!(!string_ops.contains(&"is like numeric".to_string()));

        let decimal_ops: Vec<String> = registry
            .supported_for("DECIMAL")
            .iter()
            .map(|op| op.title())
            .collect();
        assert!(decimal_ops.contains(&"is like numeric".to_string()));
    }
}
