use crate::logging::{codes, Code};
use crate::xml::XmlError;

/// Errors raised while compiling a stored filter into an expression tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("Filter is not well-formed XML: {0}")]
    Xml(#[from] XmlError),

    #[error("Unsupported filter element <{element}>")]
    UnsupportedElement { element: String },

    #[error("Filter element <{element}> has no operand")]
    MissingOperand { element: String },

    #[error("Filter nesting exceeds {max} levels")]
    DepthExceeded { max: usize },
}

impl ExpressionError {
    pub fn unsupported_element(element: &str) -> Self {
        Self::UnsupportedElement {
            element: element.to_string(),
        }
    }

    pub fn missing_operand(element: &str) -> Self {
        Self::MissingOperand {
            element: element.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Xml(err) => err.error_code(),
            Self::UnsupportedElement { .. } => codes::expression::UNSUPPORTED_ELEMENT,
            Self::MissingOperand { .. } => codes::expression::MISSING_OPERAND,
            Self::DepthExceeded { .. } => codes::expression::MAX_DEPTH_EXCEEDED,
        }
    }
}
