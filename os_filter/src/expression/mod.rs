//! Compiled filter expressions
//!
//! A stored filter string is compiled once into a [`FilterNode`] tree and then
//! evaluated against any number of records. Registered ops are tried before the
//! plain `And`/`Or`/`Not` groups, so hinted groups such as the in-list `Or`
//! come back as the op that wrote them.

pub mod error;

pub use error::ExpressionError;

use crate::config::constants::filter::MAX_FILTER_DEPTH;
use crate::op::literal::quote_string;
use crate::op::{FilterOp, OpRegistry, ValueMatcher};
use crate::record::Record;
use crate::xml::{parse_str, XmlElement};

#[derive(Debug, Clone)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    Predicate {
        op: Box<dyn FilterOp>,
        column: String,
        literal: String,
        matcher: ValueMatcher,
    },
}

impl FilterNode {
    pub fn evaluate(&self, record: &dyn Record) -> bool {
        match self {
            Self::And(children) => children.iter().all(|child| child.evaluate(record)),
            Self::Or(children) => children.iter().any(|child| child.evaluate(record)),
            Self::Not(child) => !child.evaluate(record),
            Self::Predicate { column, matcher, .. } => {
                matcher.is_match(record.get(column).as_ref())
            }
        }
    }

    /// Expression text over `record_var`; empty when nothing constrains
    pub fn eval_expression(&self, record_var: &str) -> String {
        match self {
            Self::And(children) => join_group(children, record_var, "&&"),
            Self::Or(children) => join_group(children, record_var, "||"),
            Self::Not(child) => {
                let inner = child.eval_expression(record_var);
                if inner.is_empty() {
                    inner
                } else {
                    format!("!({})", inner)
                }
            }
            Self::Predicate { op, column, literal, .. } => {
                let var = format!("{}[{}]", record_var, quote_string(column));
                op.eval_expression(&var, literal)
            }
        }
    }

    /// Number of predicates in the tree
    pub fn predicate_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().map(FilterNode::predicate_count).sum()
            }
            Self::Not(child) => child.predicate_count(),
            Self::Predicate { .. } => 1,
        }
    }
}

fn join_group(children: &[FilterNode], record_var: &str, operator: &str) -> String {
    let parts: Vec<String> = children
        .iter()
        .map(|child| child.eval_expression(record_var))
        .filter(|part| !part.is_empty())
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => format!("({})", parts.join(operator)),
    }
}

/// A compiled filter; an empty filter matches every record
#[derive(Debug, Clone)]
pub struct FilterExpression {
    source: String,
    root: Option<FilterNode>,
}

impl FilterExpression {
    /// Compile a normalized filter string with the default op vocabulary
    pub fn compile(filter: &str) -> Result<Self, ExpressionError> {
        Self::compile_with(filter, &OpRegistry::default())
    }

    pub fn compile_with(filter: &str, registry: &OpRegistry) -> Result<Self, ExpressionError> {
        let root = if filter.trim().is_empty() {
            None
        } else {
            let element = parse_str(filter)?;
            Some(build_node(&element, registry, 0)?)
        };

        Ok(Self {
            source: filter.to_string(),
            root,
        })
    }

    /// Expression that matches everything
    pub fn always() -> Self {
        Self {
            source: String::new(),
            root: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Option<&FilterNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn evaluate(&self, record: &dyn Record) -> bool {
        self.root
            .as_ref()
            .map(|root| root.evaluate(record))
            .unwrap_or(true)
    }

    pub fn eval_expression(&self, record_var: &str) -> String {
        self.root
            .as_ref()
            .map(|root| root.eval_expression(record_var))
            .unwrap_or_default()
    }
}

fn build_node(
    element: &XmlElement,
    registry: &OpRegistry,
    depth: usize,
) -> Result<FilterNode, ExpressionError> {
    if depth >= MAX_FILTER_DEPTH {
        return Err(ExpressionError::DepthExceeded {
            max: MAX_FILTER_DEPTH,
        });
    }

    if let Some(op) = registry.resolve(element) {
        let column = op
            .column(element)
            .ok_or_else(|| ExpressionError::missing_operand(element.local_name()))?;
        let literal = op.literal(element).unwrap_or_default();
        return Ok(FilterNode::Predicate {
            op: op.clone_op(),
            matcher: op.matcher(&literal),
            column,
            literal,
        });
    }

    let children = || -> Result<Vec<FilterNode>, ExpressionError> {
        element
            .child_elements()
            .map(|child| build_node(child, registry, depth + 1))
            .collect()
    };

    match element.local_name() {
        "And" | "Filter" => Ok(FilterNode::And(children()?)),
        "Or" => Ok(FilterNode::Or(children()?)),
        "Not" => {
            let child = element
                .first_child_element()
                .ok_or_else(|| ExpressionError::missing_operand("Not"))?;
            Ok(FilterNode::Not(Box::new(build_node(child, registry, depth + 1)?)))
        }
        other => Err(ExpressionError::unsupported_element(other)),
    }
}
