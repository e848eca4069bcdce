//! Bin keys
//!
//! Missing values and values a method cannot bin get their own variants so
//! they never collide with a real value that happens to read the same.

use os_filter::record::format_number;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Label of the bin holding items with no value
pub const EMPTY_LABEL: &str = "No field";

/// Label of the bin holding items whose value could not be binned
pub const INVALID_LABEL: &str = "Invalid";

#[derive(Debug, Clone)]
pub enum BinKey {
    Text(String),
    Number(f64),
    /// Value absent, null or the empty string
    Empty,
    /// Value present but not binnable by the method; never exported
    Invalid,
}

impl BinKey {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Empty => 2,
            Self::Invalid => 3,
        }
    }
}

/// -0 and every NaN collapse to one representative
fn normalize(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else {
        value + 0.0
    }
}

impl PartialEq for BinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BinKey {}

impl Hash for BinKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Text(s) => s.hash(state),
            Self::Number(n) => normalize(*n).to_bits().hash(state),
            Self::Empty | Self::Invalid => {}
        }
    }
}

impl Ord for BinKey {
    /// Numbers, then text, then `Empty`, then `Invalid`
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => normalize(*a).total_cmp(&normalize(*b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for BinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Empty => f.write_str(EMPTY_LABEL),
            Self::Invalid => f.write_str(INVALID_LABEL),
        }
    }
}

impl PartialEq<str> for BinKey {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for BinKey {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl From<&str> for BinKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BinKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for BinKey {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl Serialize for BinKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            other => serializer.collect_str(other),
        }
    }
}
