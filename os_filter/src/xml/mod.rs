//! XML element tree and stored-filter normalization

pub mod element;
pub mod error;

pub use element::{cdata, escape_attribute, escape_text, parse_fragment, parse_str, XmlElement, XmlNode};
pub use error::{XmlError, XmlResult};

use crate::config::constants::filter::OGC_PREFIX;
use regex::Regex;
use std::sync::OnceLock;

fn xmlns_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\s+xmlns(:\w+)?\s*=\s*("[^"]*"|'[^']*')"#).expect("static pattern compiles")
    })
}

fn inter_tag_whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r">\s+<").expect("static pattern compiles"))
}

/// Canonical stored form of a filter: namespace declarations removed, `ogc:`
/// prefixes removed from tags, whitespace between tags collapsed.
///
/// Applying it to an already normalized string is a no-op.
pub fn normalize_filter(xml: &str) -> String {
    let without_ns = xmlns_pattern().replace_all(xml, "");
    let without_prefix = without_ns
        .replace(&format!("<{}", OGC_PREFIX), "<")
        .replace(&format!("</{}", OGC_PREFIX), "</");
    inter_tag_whitespace()
        .replace_all(&without_prefix, "><")
        .into_owned()
}
