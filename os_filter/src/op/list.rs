use super::comparison::Comparison;
use super::literal::{binary_predicate, open_tag, quote_string, split_list};
use super::FilterOp;
use crate::config::constants::column_types;
use crate::record::coerce_string;
use crate::xml::XmlElement;
use serde_json::Value;

/// Membership in a comma separated list, written as an `Or` of equal-to predicates
///
/// Both sides compare by loose string coercion, so `false` and `"false"` are
/// the same member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InList;

impl InList {
    pub const HINT: &'static str = "in list";

    fn equal_predicates<'a>(element: &'a XmlElement) -> impl Iterator<Item = &'a XmlElement> {
        let local_name = Comparison::EqualTo.local_name();
        element
            .child_elements()
            .filter(move |child| child.local_name() == local_name)
    }
}

impl FilterOp for InList {
    fn local_name(&self) -> &str {
        "Or"
    }

    fn title(&self) -> String {
        "is in list".to_string()
    }

    fn short_title(&self) -> String {
        "in".to_string()
    }

    fn match_hint(&self) -> Option<&str> {
        Some(Self::HINT)
    }

    fn supported_types(&self) -> &[&'static str] {
        column_types::ALL
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        let values = split_list(literal);
        if values.is_empty() {
            return String::new();
        }

        let mut filter = open_tag(self.local_name(), Some(Self::HINT), &[]);
        for value in &values {
            filter.push_str(&binary_predicate(
                Comparison::EqualTo.local_name(),
                column,
                value,
            ));
        }
        filter.push_str("</Or>");
        filter
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        let values = split_list(literal);
        if values.is_empty() {
            return String::new();
        }

        let quoted: Vec<String> = values.iter().map(|v| quote_string(v)).collect();
        format!("[{}].indexOf(String({}))!=-1", quoted.join(","), var_name)
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        let values = split_list(literal);
        if values.is_empty() {
            return true;
        }

        let text = value
            .map(coerce_string)
            .unwrap_or_else(|| "undefined".to_string());
        values.iter().any(|v| *v == text)
    }

    fn column(&self, element: &XmlElement) -> Option<String> {
        Self::equal_predicates(element)
            .next()?
            .find_child("PropertyName")
            .map(XmlElement::text_content)
    }

    fn literal(&self, element: &XmlElement) -> Option<String> {
        let values: Vec<String> = Self::equal_predicates(element)
            .filter_map(|predicate| predicate.find_child("Literal"))
            .map(XmlElement::text_content)
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(*self)
    }
}
