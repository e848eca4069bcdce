use crate::key::BinKey;
use os_filter::record::{coerce_string, is_empty_value};
use serde_json::Value;

/// One bin per distinct string form of the value
pub fn unique_key(value: Option<&Value>) -> BinKey {
    match value {
        Some(v) if !is_empty_value(value) => BinKey::Text(coerce_string(v)),
        _ => BinKey::Empty,
    }
}
