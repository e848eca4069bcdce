use super::literal::{expression_operand, literal_element, loose_compare, property_name, split_list};
use super::FilterOp;
use crate::config::constants::column_types;
use crate::xml::XmlElement;
use serde_json::Value;
use std::cmp::Ordering;

/// `PropertyIsBetween` with an inclusive `"lower, upper"` literal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Between;

impl Between {
    /// Lower and upper bound of a `"lower, upper"` literal
    pub fn bounds(literal: &str) -> Option<(String, String)> {
        let mut parts = split_list(literal);
        if parts.len() != 2 {
            return None;
        }
        let upper = parts.pop()?;
        let lower = parts.pop()?;
        Some((lower, upper))
    }
}

impl FilterOp for Between {
    fn local_name(&self) -> &str {
        "PropertyIsBetween"
    }

    fn title(&self) -> String {
        "is between".to_string()
    }

    fn short_title(&self) -> String {
        "between".to_string()
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::NUMERIC
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        let Some((lower, upper)) = Self::bounds(literal) else {
            return String::new();
        };

        format!(
            "<PropertyIsBetween>{}<LowerBoundary>{}</LowerBoundary>\
             <UpperBoundary>{}</UpperBoundary></PropertyIsBetween>",
            property_name(column),
            literal_element(&lower),
            literal_element(&upper)
        )
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        match Self::bounds(literal) {
            Some((lower, upper)) => format!(
                "({0}>={1}&&{0}<={2})",
                var_name,
                expression_operand(&lower),
                expression_operand(&upper)
            ),
            None => String::new(),
        }
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        let Some((lower, upper)) = Self::bounds(literal) else {
            return true;
        };

        let above = matches!(
            loose_compare(value, &lower),
            Some(Ordering::Greater | Ordering::Equal)
        );
        let below = matches!(
            loose_compare(value, &upper),
            Some(Ordering::Less | Ordering::Equal)
        );
        above && below
    }

    fn literal(&self, element: &XmlElement) -> Option<String> {
        let lower = element.find_child("LowerBoundary")?.text_content();
        let upper = element.find_child("UpperBoundary")?.text_content();
        Some(format!("{}, {}", lower, upper))
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}
