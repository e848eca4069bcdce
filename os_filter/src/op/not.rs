use super::{FilterOp, ValueMatcher};
use crate::xml::XmlElement;
use serde_json::Value;

/// Negation of another op, written as `<Not>` around its filter
#[derive(Debug, Clone)]
pub struct Not {
    inner: Box<dyn FilterOp>,
}

impl Not {
    pub fn new(inner: Box<dyn FilterOp>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &dyn FilterOp {
        self.inner.as_ref()
    }
}

impl FilterOp for Not {
    fn local_name(&self) -> &str {
        "Not"
    }

    fn title(&self) -> String {
        let title = self.inner.title();
        match title.strip_prefix("is ") {
            Some(rest) => format!("is not {}", rest),
            None => format!("not {}", title),
        }
    }

    fn short_title(&self) -> String {
        format!("not {}", self.inner.short_title())
    }

    fn supported_types(&self) -> &[&'static str] {
        self.inner.supported_types()
    }

    fn filter(&self, column: &str, literal: &str) -> String {
        let inner = self.inner.filter(column, literal);
        if inner.is_empty() {
            return inner;
        }
        format!("<Not>{}</Not>", inner)
    }

    fn eval_expression(&self, var_name: &str, literal: &str) -> String {
        let inner = self.inner.eval_expression(var_name, literal);
        if inner.is_empty() {
            return inner;
        }
        format!("!({})", inner)
    }

    fn evaluate(&self, value: Option<&Value>, literal: &str) -> bool {
        // No constraint stays no constraint
        if self.inner.eval_expression("v", literal).is_empty() {
            return true;
        }
        !self.inner.evaluate(value, literal)
    }

    fn matcher(&self, literal: &str) -> ValueMatcher {
        if self.inner.eval_expression("v", literal).is_empty() {
            return ValueMatcher::new(|_| true);
        }
        let inner = self.inner.matcher(literal);
        ValueMatcher::new(move |value| !inner.is_match(value))
    }

    fn matches(&self, element: &XmlElement) -> bool {
        element.local_name() == self.local_name()
            && element
                .first_child_element()
                .map(|child| self.inner.matches(child))
                .unwrap_or(false)
    }

    fn column(&self, element: &XmlElement) -> Option<String> {
        self.inner.column(element.first_child_element()?)
    }

    fn literal(&self, element: &XmlElement) -> Option<String> {
        self.inner.literal(element.first_child_element()?)
    }

    fn clone_op(&self) -> Box<dyn FilterOp> {
        Box::new(self.clone())
    }
}
