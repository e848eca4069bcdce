//! Reading filter action entries from their XML form
//!
//! Parsing is tolerant: a node with no usable filter or no resolvable type
//! yields no entries and the rest of the batch is still read.

use super::entry::{FilterActionEntry, CHILDREN_TAG};
use super::{FilterAction, ParseContext};
use crate::config::constants::action::{ACTIONS_TAG, FILTER_TAG, ROOT_TAG, TYPE_HINT_EXACT};
use crate::logging::codes;
use crate::xml::{self, normalize_filter, XmlElement, XmlNode, XmlResult};
use uuid::Uuid;

/// Parse one entry node into zero or more entries
///
/// Without an exact type hint the node's `type` is expanded through the
/// resolver and one entry is produced per resolved type. The first carries the
/// node's id (or an id derived from the node's content), the rest get random ids.
pub fn parse_entry(node: &XmlElement, context: &ParseContext<'_>) -> Vec<FilterActionEntry> {
    let title = node.attribute("title").unwrap_or_default();

    let Some(filter_element) = node
        .find_child(FILTER_TAG)
        .and_then(XmlElement::first_child_element)
    else {
        crate::log_warning!(codes::action::ENTRY_SKIPPED, "Filter action has no filter",
            "title" => title
        );
        return Vec::new();
    };
    let filter = normalize_filter(&filter_element.to_xml_string());

    let type_name = node.attribute("type").unwrap_or_default();
    let exact = node
        .attribute("typeHint")
        .map(|hint| hint.eq_ignore_ascii_case(TYPE_HINT_EXACT))
        .unwrap_or(false);

    let types: Vec<String> = if exact {
        if type_name.is_empty() {
            Vec::new()
        } else {
            vec![type_name.to_string()]
        }
    } else {
        context.resolver.resolve(type_name)
    };

    let Some((first_type, other_types)) = types.split_first() else {
        crate::log_warning!(codes::action::TYPE_UNRESOLVED, "Filter action type resolved to nothing",
            "title" => title,
            "type" => type_name
        );
        return Vec::new();
    };

    let id = node
        .attribute("id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| derived_id(node));

    let mut root = FilterActionEntry::new(id, first_type.as_str(), title, &filter);
    root.set_description(node.attribute("description").unwrap_or_default());
    root.set_enabled(parse_flag(node.attribute("active"), true));
    root.set_temporary(parse_flag(node.attribute("temporary"), false));
    root.set_actions(parse_actions(node, context));

    if let Some(children) = node.find_child(CHILDREN_TAG) {
        root.set_children(
            children
                .child_elements()
                .flat_map(|child| parse_entry(child, context))
                .collect(),
        );
    }

    let mut entries = Vec::with_capacity(types.len());
    let clones: Vec<FilterActionEntry> = other_types
        .iter()
        .map(|entry_type| root.clone_for_type(entry_type))
        .collect();
    entries.push(root);
    entries.extend(clones);
    entries
}

/// Parse every child element of a document root as an entry node
pub fn parse_document(root: &XmlElement, context: &ParseContext<'_>) -> Vec<FilterActionEntry> {
    let entries: Vec<FilterActionEntry> = root
        .child_elements()
        .flat_map(|node| parse_entry(node, context))
        .collect();

    crate::log_success!(codes::success::ENTRIES_PARSED, "Filter action entries parsed",
        "count" => entries.len()
    );

    entries
}

/// Parse filter action XML text
pub fn parse_entries_str(
    input: &str,
    context: &ParseContext<'_>,
) -> XmlResult<Vec<FilterActionEntry>> {
    let root = xml::parse_str(input)?;
    Ok(parse_document(&root, context))
}

/// Document root holding the serialized entries
pub fn to_document(entries: &[FilterActionEntry]) -> XmlResult<XmlElement> {
    let mut root = XmlElement::new(ROOT_TAG);
    for entry in entries {
        root.children.push(XmlNode::Element(entry.to_xml()?));
    }
    Ok(root)
}

fn parse_actions(node: &XmlElement, context: &ParseContext<'_>) -> Vec<Box<dyn FilterAction>> {
    let Some(actions) = node.find_child(ACTIONS_TAG) else {
        return Vec::new();
    };

    actions
        .child_elements()
        .filter_map(|element| {
            let action = context.factory.create_action(element);
            if action.is_none() {
                crate::log_warning!(codes::action::ACTION_SKIPPED, "Unrecognized action skipped",
                    "action" => element.local_name()
                );
            }
            action
        })
        .collect()
}

/// Stable id for a node without one: name-based UUID of its serialized form
fn derived_id(node: &XmlElement) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, node.to_xml_string().as_bytes()).to_string()
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}
