use super::FilterAction;
use crate::config::constants::action::{
    ACTIONS_TAG, ENTRY_TAG, FILTER_TAG, STATE_SCOPE_SEPARATOR, TYPE_HINT_EXACT,
};
use crate::expression::{ExpressionError, FilterExpression};
use crate::record::Record;
use crate::xml::{normalize_filter, parse_str, XmlElement, XmlNode, XmlResult};
use uuid::Uuid;

/// Element holding nested entries in the serialized form
pub const CHILDREN_TAG: &str = "children";

/// A typed filter with the actions to run on the records it matches
#[derive(Debug, Clone)]
pub struct FilterActionEntry {
    id: String,
    entry_type: String,
    title: String,
    description: String,
    filter: String,
    enabled: bool,
    temporary: bool,
    actions: Vec<Box<dyn FilterAction>>,
    children: Vec<FilterActionEntry>,
}

impl FilterActionEntry {
    /// Enabled, non-temporary entry with no actions
    pub fn new(
        id: impl Into<String>,
        entry_type: impl Into<String>,
        title: impl Into<String>,
        filter: &str,
    ) -> Self {
        Self {
            id: id.into(),
            entry_type: entry_type.into(),
            title: title.into(),
            description: String::new(),
            filter: normalize_filter(filter),
            enabled: true,
            temporary: false,
            actions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    pub fn set_entry_type(&mut self, entry_type: impl Into<String>) {
        self.entry_type = entry_type.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Normalized filter string
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = normalize_filter(filter);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn set_temporary(&mut self, temporary: bool) {
        self.temporary = temporary;
    }

    pub fn actions(&self) -> &[Box<dyn FilterAction>] {
        &self.actions
    }

    pub fn add_action(&mut self, action: Box<dyn FilterAction>) {
        self.actions.push(action);
    }

    pub fn set_actions(&mut self, actions: Vec<Box<dyn FilterAction>>) {
        self.actions = actions;
    }

    pub fn children(&self) -> &[FilterActionEntry] {
        &self.children
    }

    pub fn add_child(&mut self, child: FilterActionEntry) {
        self.children.push(child);
    }

    pub fn set_children(&mut self, children: Vec<FilterActionEntry>) {
        self.children = children;
    }

    /// Copy of this entry for another type, under a fresh random id
    pub fn clone_for_type(&self, entry_type: &str) -> Self {
        let mut clone = self.clone();
        clone.id = Uuid::new_v4().to_string();
        clone.entry_type = entry_type.to_string();
        clone
    }

    /// Prefix id and type with a state id, recursively through children
    pub fn scope_to_state(&mut self, state_id: &str) {
        self.id = format!("{}{}{}", state_id, STATE_SCOPE_SEPARATOR, self.id);
        self.entry_type = format!("{}{}{}", state_id, STATE_SCOPE_SEPARATOR, self.entry_type);
        for child in &mut self.children {
            child.scope_to_state(state_id);
        }
    }

    pub fn compile(&self) -> Result<FilterExpression, ExpressionError> {
        FilterExpression::compile(&self.filter)
    }

    pub fn matches(&self, record: &dyn Record) -> Result<bool, ExpressionError> {
        Ok(self.compile()?.evaluate(record))
    }

    /// Run every action over the matching records; returns the match count
    ///
    /// A disabled entry matches nothing.
    pub fn process_items<R: Record>(&self, items: &[R]) -> Result<usize, ExpressionError> {
        if !self.enabled {
            return Ok(0);
        }

        let expression = self.compile()?;
        let matched: Vec<&dyn Record> = items
            .iter()
            .map(|item| item as &dyn Record)
            .filter(|item| expression.evaluate(*item))
            .collect();

        if !matched.is_empty() {
            for action in &self.actions {
                action.execute(&matched);
            }
        }

        crate::log_debug!("Filter action processed",
            "entry" => self.id,
            "matched" => matched.len()
        );

        Ok(matched.len())
    }

    /// Serialized form read back by the parser as an exact-typed entry
    pub fn to_xml(&self) -> XmlResult<XmlElement> {
        let mut filter = XmlElement::new(FILTER_TAG);
        if !self.filter.trim().is_empty() {
            filter = filter.with_child(parse_str(&self.filter)?);
        }

        let mut actions = XmlElement::new(ACTIONS_TAG);
        for action in &self.actions {
            actions = actions.with_child(action.to_xml());
        }

        let mut element = XmlElement::new(ENTRY_TAG)
            .with_attribute("id", self.id.as_str())
            .with_attribute("title", self.title.as_str())
            .with_attribute("description", self.description.as_str())
            .with_attribute("type", self.entry_type.as_str())
            .with_attribute("typeHint", TYPE_HINT_EXACT)
            .with_attribute("active", self.enabled.to_string())
            .with_attribute("temporary", self.temporary.to_string())
            .with_child(filter)
            .with_child(actions);

        if !self.children.is_empty() {
            let mut children = XmlElement::new(CHILDREN_TAG);
            for child in &self.children {
                children.children.push(XmlNode::Element(child.to_xml()?));
            }
            element = element.with_child(children);
        }

        Ok(element)
    }

    pub fn to_xml_string(&self) -> XmlResult<String> {
        Ok(self.to_xml()?.to_xml_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::XmlAction;
    use crate::op::{Comparison, ComparisonOp, FilterOp};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    struct CountingAction {
        seen: Arc<AtomicUsize>,
    }

    impl FilterAction for CountingAction {
        fn action_type(&self) -> &str {
            "countingAction"
        }

        fn execute(&self, items: &[&dyn Record]) {
            self.seen.fetch_add(items.len(), Ordering::SeqCst);
        }

        fn to_xml(&self) -> XmlElement {
            XmlElement::new("countingAction")
        }

        fn clone_action(&self) -> Box<dyn FilterAction> {
            Box::new(self.clone())
        }
    }

    fn speed_entry() -> FilterActionEntry {
        let filter = ComparisonOp::new(Comparison::GreaterThan).filter("SPEED", "10");
        FilterActionEntry::new("e1", "tracks", "Fast", &filter)
    }

    #[test]
    fn test_set_filter_normalizes() {
        let mut entry = speed_entry();
        entry.set_filter(
            "<ogc:PropertyIsNull xmlns:ogc=\"http://www.opengis.net/ogc\">\n  <ogc:PropertyName>A</ogc:PropertyName>\n</ogc:PropertyIsNull>",
        );
        assert_eq!(
            entry.filter(),
            "<PropertyIsNull><PropertyName>A</PropertyName></PropertyIsNull>"
        );
    }

    #[test]
    fn test_clone_for_type() {
        let mut entry = speed_entry();
        entry.add_action(Box::new(XmlAction::new(XmlElement::new("featureStyleAction"))));

        let clone = entry.clone_for_type("other");
        assert_ne!(clone.id(), entry.id());
        assert_eq!(clone.entry_type(), "other");
        assert_eq!(clone.title(), entry.title());
        assert_eq!(clone.filter(), entry.filter());
        assert_eq!(clone.actions().len(), 1);
    }

    #[test]
    fn test_scope_to_state() {
        let mut entry = speed_entry();
        entry.add_child(FilterActionEntry::new("c1", "child", "Child", ""));
        entry.scope_to_state("state1");

        assert_eq!(entry.id(), "state1_e1");
        assert_eq!(entry.entry_type(), "state1_tracks");
        assert_eq!(entry.children()[0].id(), "state1_c1");
        assert_eq!(entry.children()[0].entry_type(), "state1_child");
    }

    #[test]
    fn test_matches_and_process_items() {
        let counter = CountingAction::default();
        let mut entry = speed_entry();
        entry.add_action(Box::new(counter.clone()));

        let items: Vec<Value> = vec![
            json!({"SPEED": 5}),
            json!({"SPEED": 15}),
            json!({"SPEED": "20"}),
            json!({}),
        ];

        assert!(entry.matches(&items[1]).unwrap());
        assert!(!entry.matches(&items[0]).unwrap());
        assert_eq!(entry.process_items(&items).unwrap(), 2);
        assert_eq!(counter.seen.load(Ordering::SeqCst), 2);

        entry.set_enabled(false);
        assert_eq!(entry.process_items(&items).unwrap(), 0);
        assert_eq!(counter.seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_filter_is_an_error() {
        let entry = FilterActionEntry::new("e", "t", "bad", "<Touches/>");
        assert!(entry.compile().is_err());
        assert!(entry.process_items(&[json!({})]).is_err());
    }

    #[test]
    fn test_to_xml() {
        let mut entry = speed_entry();
        entry.set_description("desc");
        entry.add_action(Box::new(XmlAction::new(XmlElement::new("featureStyleAction"))));

        let element = entry.to_xml().unwrap();
        assert_eq!(element.name, "filterAction");
        assert_eq!(element.attribute("typeHint"), Some("exact"));
        assert_eq!(element.attribute("active"), Some("true"));
        assert_eq!(element.attribute("description"), Some("desc"));

        let filter = element.find_child("filter").unwrap().first_child_element().unwrap();
        assert_eq!(filter.to_xml_string(), entry.filter());
        assert_eq!(
            element.find_child("actions").unwrap().child_elements().count(),
            1
        );
    }
}
