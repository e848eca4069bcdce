//! Binary comparison ops: equal, not equal and the four relational comparisons

use super::literal::{binary_predicate, expression_operand, loose_compare, loose_equals, quote_string};
use super::FilterOp;
use crate::config::constants::column_types;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl Comparison {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::EqualTo => "PropertyIsEqualTo",
            Self::NotEqualTo => "PropertyIsNotEqualTo",
            Self::GreaterThan => "PropertyIsGreaterThan",
            Self::GreaterThanOrEqualTo => "PropertyIsGreaterThanOrEqualTo",
            Self::LessThan => "PropertyIsLessThan",
            Self::LessThanOrEqualTo => "PropertyIsLessThanOrEqualTo",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::EqualTo => "is equal to",
            Self::NotEqualTo => "is not equal to",
            Self::GreaterThan => "is greater than",
            Self::GreaterThanOrEqualTo => "is greater than or equal to",
            Self::LessThan => "is less than",
            Self::LessThanOrEqualTo => "is less than or equal to",
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            Self::EqualTo => "==",
            Self::NotEqualTo => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
        }
    }

    fn is_equality(&self) -> bool {
        matches!(self, Self::EqualTo | Self::NotEqualTo)
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::EqualTo => ordering == Ordering::Equal,
            Self::NotEqualTo => ordering != Ordering::Equal,
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::GreaterThanOrEqualTo => ordering != Ordering::Less,
            Self::LessThan => ordering == Ordering::Less,
            Self::LessThanOrEqualTo => ordering != Ordering::Greater,
        }
    }
}

/// `PropertyIs<Comparison>` with a single literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonOp {
    kind: Comparison,
}

impl ComparisonOp {
    pub fn new(kind: Comparison) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> Comparison {
        self.kind
    }
}

impl FilterOp for ComparisonOp {
    fn local_name(&self) -> &str {
        self.kind.local_name()
    }

    fn title(&self) -> String {
        self.kind.title().to_string()
    }

    fn short_title(&self) -> String {
        self.kind.operator().to_string()
    }

    fn supported_types(&self) -> &[&'static str] {
        if self.kind.is_equality() {
            column_types::ALL
        } else {
            column_types::NUMERIC
        }
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        binary_predicate(self.kind.local_name(), column, literal)
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        // Equality compares against the literal text; relational ops compare numerically when they can
        let operand = if self.kind.is_equality() {
            quote_string(literal)
        } else {
            expression_operand(literal)
        };
        format!("{}{}{}", var_name, self.kind.operator(), operand)
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        match self.kind {
            Comparison::EqualTo => loose_equals(value, literal),
            Comparison::NotEqualTo => !loose_equals(value, literal),
            kind => loose_compare(value, literal)
                .map(|ordering| kind.accepts(ordering))
                .unwrap_or(false),
        }
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
    fn test_equal_to_filter() {
        let op = ComparisonOp::new(Comparison::EqualTo);
        assert_eq!(
            op.filter("field", "Tada!"),
            "<PropertyIsEqualTo><PropertyName>field</PropertyName>\
             <Literal><![CDATA[Tada!]]></Literal></PropertyIsEqualTo>"
        );
        assert_eq!(op.title(), "is equal to");
        assert_eq!(op.short_title(), "==");
    }

    #[test]
    fn test_eval_expressions() {
        assert_eq!(
            ComparisonOp::new(Comparison::EqualTo).eval_expression("x", "abc"),
            "x==\"abc\""
        );
        assert_eq!(
            ComparisonOp::new(Comparison::NotEqualTo).eval_expression("x", "10"),
            "x!=\"10\""
        );
        assert_eq!(
            ComparisonOp::new(Comparison::GreaterThan).eval_expression("x", "10"),
            "x>10"
        );
        assert_eq!(
            ComparisonOp::new(Comparison::LessThanOrEqualTo).eval_expression("x", "b"),
            "x<=\"b\""
        );
    }

    #[test]
    fn test_evaluate_equality() {
        let eq = ComparisonOp::new(Comparison::EqualTo);
        assert!(eq.evaluate(Some(&json!("abc")), "abc"));
        assert!(eq.evaluate(Some(&json!(10)), "10"));
        assert!(!eq.evaluate(None, "abc"));

        let ne = ComparisonOp::new(Comparison::NotEqualTo);
        assert!(ne.evaluate(None, "abc"));
        assert!(!ne.evaluate(Some(&json!(10)), "10"));
    }

    #[test]
    fn test_evaluate_relational() {
        let gt = ComparisonOp::new(Comparison::GreaterThan);
        assert!(gt.evaluate(Some(&json!(11)), "10"));
        assert!(gt.evaluate(Some(&json!("11")), "10"));
        assert!(!gt.evaluate(Some(&json!(10)), "10"));
        assert!(!gt.evaluate(None, "10"));
        assert!(!gt.evaluate(Some(&json!("abc")), "10"));

        let lte = ComparisonOp::new(Comparison::LessThanOrEqualTo);
        assert!(lte.evaluate(Some(&json!(10)), "10"));
        assert!(lte.evaluate(Some(&json!("a")), "b"));
    }

    #[test]
    fn test_supported_types() {
        assert!(ComparisonOp::new(Comparison::EqualTo).is_supported("string"));
        assert!(!ComparisonOp::new(Comparison::GreaterThan).is_supported("string"));
        assert!(ComparisonOp::new(Comparison::GreaterThan).is_supported("integer"));
    }
}
