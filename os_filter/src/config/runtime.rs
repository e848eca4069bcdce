// RUNTIME PREFERENCES

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

/// Logging preferences; fields missing from a config file fall back to the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("OS_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("OS_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionPreferences {
    /// Whether `PropertyIsLike` comparisons ignore case when evaluated natively
    pub like_case_insensitive: bool,
}

impl Default for ExpressionPreferences {
    fn default() -> Self {
        Self {
            like_case_insensitive: env::var("OS_FILTER_LIKE_CASE_INSENSITIVE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub expression: ExpressionPreferences,
}

impl RuntimeConfig {
    /// Read every preference from the environment
    pub fn from_env() -> Self {
        Self::default()
    }
}
