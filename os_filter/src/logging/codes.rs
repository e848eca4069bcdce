//! Log codes and their classification metadata
//!
//! Single source of truth for every code the filter and histogram crates emit.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper shared by error, warning and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata for a single code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// XML document handling
pub mod xml {
    use super::Code;

    pub const MALFORMED_DOCUMENT: Code = Code::new("E010");
    pub const INVALID_ATTRIBUTE: Code = Code::new("E011");
    pub const INVALID_ENCODING: Code = Code::new("E012");
    pub const EMPTY_DOCUMENT: Code = Code::new("E013");
}

/// Filter expression compilation
pub mod expression {
    use super::Code;

    pub const UNSUPPORTED_ELEMENT: Code = Code::new("E020");
    pub const MISSING_OPERAND: Code = Code::new("E021");
    pub const MAX_DEPTH_EXCEEDED: Code = Code::new("E022");
}

/// Filter action parsing
pub mod action {
    use super::Code;

    pub const ENTRY_SKIPPED: Code = Code::new("W030");
    pub const ACTION_SKIPPED: Code = Code::new("W031");
    pub const TYPE_UNRESOLVED: Code = Code::new("W032");
}

/// Histogram binning
pub mod histo {
    use super::Code;

    pub const INVALID_WIDTH: Code = Code::new("E040");
    pub const UNKNOWN_METHOD: Code = Code::new("E041");
    pub const UNKNOWN_DATE_TYPE: Code = Code::new("E042");
    pub const BIN_NOT_EXPORTABLE: Code = Code::new("W043");
    pub const INVALID_OFFSET: Code = Code::new("E044");
}

pub mod success {
    use super::Code;

    pub const LOGGING_INITIALIZED: Code = Code::new("I001");
    pub const ENTRIES_PARSED: Code = Code::new("I002");
    pub const BINS_EXPORTED: Code = Code::new("I003");
}

// ============================================================================
// REGISTRY
// ============================================================================

fn registry() -> &'static HashMap<&'static str, CodeMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

    REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata::new("ERR001", "System", Severity::Critical, false, "Internal error"),
            CodeMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging or configuration could not be initialized",
            ),
            CodeMetadata::new("E010", "Xml", Severity::High, true, "XML document is malformed"),
            CodeMetadata::new("E011", "Xml", Severity::Medium, true, "XML attribute is invalid"),
            CodeMetadata::new("E012", "Xml", Severity::Medium, true, "XML text is not valid UTF-8"),
            CodeMetadata::new("E013", "Xml", Severity::Medium, true, "XML document has no root element"),
            CodeMetadata::new(
                "E020",
                "Expression",
                Severity::Medium,
                true,
                "Filter element is not a known operator or group",
            ),
            CodeMetadata::new(
                "E021",
                "Expression",
                Severity::Medium,
                true,
                "Filter group or negation has no operand",
            ),
            CodeMetadata::new(
                "E022",
                "Expression",
                Severity::High,
                true,
                "Filter nesting is deeper than the configured maximum",
            ),
            CodeMetadata::new(
                "W030",
                "FilterAction",
                Severity::Low,
                true,
                "Filter action entry skipped because it has no usable filter or type",
            ),
            CodeMetadata::new(
                "W031",
                "FilterAction",
                Severity::Low,
                true,
                "Action element not recognized by the action factory",
            ),
            CodeMetadata::new(
                "W032",
                "FilterAction",
                Severity::Low,
                true,
                "Entry type resolved to no filterable types",
            ),
            CodeMetadata::new("E040", "Histogram", Severity::Medium, true, "Bin width must be positive"),
            CodeMetadata::new("E041", "Histogram", Severity::Medium, true, "Unknown bin method type"),
            CodeMetadata::new("E042", "Histogram", Severity::Medium, true, "Unknown date bin type"),
            CodeMetadata::new(
                "W043",
                "Histogram",
                Severity::Low,
                true,
                "Bin has no filter representation and was left out of the export",
            ),
            CodeMetadata::new("E044", "Histogram", Severity::Medium, true, "Bin offset must be finite"),
            CodeMetadata::new("I001", "System", Severity::Low, true, "Logging initialized"),
            CodeMetadata::new("I002", "FilterAction", Severity::Low, true, "Filter action entries parsed"),
            CodeMetadata::new("I003", "Histogram", Severity::Low, true, "Bins exported as filter"),
        ];

        entries.into_iter().map(|m| (m.code, m)).collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}
