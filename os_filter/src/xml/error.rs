//! Errors raised while reading XML text into an element tree

use crate::logging::{codes, Code};

pub type XmlResult<T> = Result<T, XmlError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("Invalid attribute on <{element}>: {message}")]
    InvalidAttribute { element: String, message: String },

    #[error("XML text is not valid UTF-8: {message}")]
    InvalidEncoding { message: String },

    #[error("XML document has no root element")]
    EmptyDocument,
}

impl XmlError {
    pub fn malformed(position: usize, message: impl std::fmt::Display) -> Self {
        Self::Malformed {
            position,
            message: message.to_string(),
        }
    }

    pub fn invalid_attribute(element: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidAttribute {
            element: element.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_encoding(message: impl std::fmt::Display) -> Self {
        Self::InvalidEncoding {
            message: message.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Malformed { .. } => codes::xml::MALFORMED_DOCUMENT,
            Self::InvalidAttribute { .. } => codes::xml::INVALID_ATTRIBUTE,
            Self::InvalidEncoding { .. } => codes::xml::INVALID_ENCODING,
            Self::EmptyDocument => codes::xml::EMPTY_DOCUMENT,
        }
    }
}
