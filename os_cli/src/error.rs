use os_filter::logging::{codes, Code};
use os_filter::{ExpressionError, XmlError};
use os_histo::HistoError;
use std::path::{Path, PathBuf};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{}' is neither a JSON array nor a GeoJSON FeatureCollection", path.display())]
    UnsupportedInput { path: PathBuf },

    #[error("Cannot write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Histo(#[from] HistoError),
}

impl CliError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn config(path: &Path, source: toml::de::Error) -> Self {
        Self::Config {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Xml(e) => e.error_code(),
            Self::Expression(e) => e.error_code(),
            Self::Histo(e) => e.error_code(),
            Self::Config { .. } => codes::system::INITIALIZATION_FAILURE,
            _ => codes::system::INTERNAL_ERROR,
        }
    }
}
