use os_filter::logging::{codes, Code};

pub type HistoResult<T> = Result<T, HistoError>;

/// Bin method configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoError {
    #[error("Bin width must be positive and finite, got {width}")]
    InvalidWidth { width: f64 },

    #[error("Bin offset must be finite, got {offset}")]
    InvalidOffset { offset: f64 },

    #[error("Unknown bin method type '{name}'")]
    UnknownMethod { name: String },

    #[error("Unknown date bin type '{name}'")]
    UnknownDateType { name: String },
}

impl HistoError {
    pub fn unknown_method(name: &str) -> Self {
        Self::UnknownMethod {
            name: name.to_string(),
        }
    }

    pub fn unknown_date_type(name: &str) -> Self {
        Self::UnknownDateType {
            name: name.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidWidth { .. } => codes::histo::INVALID_WIDTH,
            Self::InvalidOffset { .. } => codes::histo::INVALID_OFFSET,
            Self::UnknownMethod { .. } => codes::histo::UNKNOWN_METHOD,
            Self::UnknownDateType { .. } => codes::histo::UNKNOWN_DATE_TYPE,
        }
    }
}
