//! Filter actions: typed filters paired with the actions they trigger
//!
//! Collaborators that the host application owns (the type resolver and the
//! action factory) are handed to the parser through a [`ParseContext`] rather
//! than looked up globally.

pub mod entry;
pub mod parser;

pub use entry::FilterActionEntry;
pub use parser::{parse_document, parse_entry, parse_entries_str, to_document};

use crate::record::Record;
use crate::xml::XmlElement;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An action run over the records a filter action entry matched
pub trait FilterAction: fmt::Debug + Send + Sync {
    /// Identifier of the action kind, also the XML tag it is written as
    fn action_type(&self) -> &str;

    fn label(&self) -> String {
        self.action_type().to_string()
    }

    fn execute(&self, items: &[&dyn Record]);

    fn to_xml(&self) -> XmlElement;

    fn clone_action(&self) -> Box<dyn FilterAction>;
}

impl Clone for Box<dyn FilterAction> {
    fn clone(&self) -> Self {
        self.clone_action()
    }
}

/// Builds actions from their XML form
pub trait ActionFactory {
    /// `None` when the element is not an action this factory knows
    fn create_action(&self, element: &XmlElement) -> Option<Box<dyn FilterAction>>;
}

/// Expands an entry's `type` into the concrete types it applies to
pub trait TypeResolver {
    fn resolve(&self, type_name: &str) -> Vec<String>;
}

/// Everything the parser needs from the host application
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub resolver: &'a dyn TypeResolver,
    pub factory: &'a dyn ActionFactory,
}

impl<'a> ParseContext<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, factory: &'a dyn ActionFactory) -> Self {
        Self { resolver, factory }
    }
}

// ============================================================================
// PROVIDED COLLABORATORS
// ============================================================================

/// Resolver backed by an explicit type map; unknown types resolve to nothing
#[derive(Debug, Clone, Default)]
pub struct StaticTypeResolver {
    types: HashMap<String, Vec<String>>,
}

impl StaticTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping<I, S>(mut self, type_name: &str, resolved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(type_name, resolved);
        self
    }

    pub fn insert<I, S>(&mut self, type_name: &str, resolved: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.insert(
            type_name.to_string(),
            resolved.into_iter().map(Into::into).collect(),
        );
    }
}

impl TypeResolver for StaticTypeResolver {
    fn resolve(&self, type_name: &str) -> Vec<String> {
        self.types.get(type_name).cloned().unwrap_or_default()
    }
}

/// Every non-empty type resolves to itself
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTypeResolver;

impl TypeResolver for IdentityTypeResolver {
    fn resolve(&self, type_name: &str) -> Vec<String> {
        if type_name.is_empty() {
            Vec::new()
        } else {
            vec![type_name.to_string()]
        }
    }
}

/// Opaque action that keeps its XML element for re-serialization
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAction {
    element: XmlElement,
}

impl XmlAction {
    pub fn new(element: XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &XmlElement {
        &self.element
    }
}

impl FilterAction for XmlAction {
    fn action_type(&self) -> &str {
        self.element.local_name()
    }

    fn execute(&self, items: &[&dyn Record]) {
        crate::log_debug!("Action applied",
            "action" => self.action_type(),
            "items" => items.len()
        );
    }

    fn to_xml(&self) -> XmlElement {
        self.element.clone()
    }

    fn clone_action(&self) -> Box<dyn FilterAction> {
        Box::new(self.clone())
    }
}

/// Creates [`XmlAction`]s for a set of registered tag names
#[derive(Debug, Clone, Default)]
pub struct XmlActionFactory {
    tags: HashSet<String>,
    accept_all: bool,
}

impl XmlActionFactory {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            accept_all: false,
        }
    }

    /// Factory that accepts any element as an action
    pub fn permissive() -> Self {
        Self {
            tags: HashSet::new(),
            accept_all: true,
        }
    }

    pub fn register(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn accepts(&self, tag: &str) -> bool {
        self.accept_all || self.tags.contains(tag)
    }
}

impl ActionFactory for XmlActionFactory {
    fn create_action(&self, element: &XmlElement) -> Option<Box<dyn FilterAction>> {
        if self.accepts(element.local_name()) {
            Some(Box::new(XmlAction::new(element.clone())))
        } else {
            None
        }
    }
}
