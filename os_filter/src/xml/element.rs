//! Minimal element tree built from quick-xml events

use super::error::{XmlError, XmlResult};
use crate::config::constants::xml::MAX_ELEMENT_DEPTH;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
}

/// An element with its attributes in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attribute value by qualified or local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn first_child_element(&self) -> Option<&XmlElement> {
        self.child_elements().next()
    }

    /// First child element with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements()
            .find(|child| child.local_name() == local_name)
    }

    /// Concatenated text and CDATA of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize this element and its subtree
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Element(el) => collect_text(el, out),
            XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
        }
    }
}

fn write_element(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(el, out),
            XmlNode::Text(text) => out.push_str(&escape_text(text)),
            XmlNode::CData(text) => out.push_str(&cdata(text)),
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

/// Escape character data
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Wrap a value in a CDATA section, splitting any `]]>` it contains
pub fn cdata(value: &str) -> String {
    format!("<![CDATA[{}]]>", value.replace("]]>", "]]]]><![CDATA[>"))
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a document with a single root element
///
/// Nesting deeper than `MAX_ELEMENT_DEPTH` is rejected as malformed.
pub fn parse_str(input: &str) -> XmlResult<XmlElement> {
    let mut reader = Reader::from_str(input);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if stack.len() >= MAX_ELEMENT_DEPTH {
                    return Err(XmlError::malformed(
                        position,
                        format!("elements nested deeper than {}", MAX_ELEMENT_DEPTH),
                    ));
                }
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::malformed(position, "unexpected end tag"))?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::malformed(position, e))?;
                if !text.trim().is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8(c.into_inner().into_owned())
                    .map_err(XmlError::invalid_encoding)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::CData(text));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlError::malformed(reader.buffer_position(), e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::malformed(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.name),
        ));
    }

    root.ok_or(XmlError::EmptyDocument)
}

/// Parse a sequence of sibling elements without a shared root
pub fn parse_fragment(input: &str) -> XmlResult<Vec<XmlElement>> {
    let wrapped = parse_str(&format!("<fragment>{}</fragment>", input))?;
    Ok(wrapped.child_elements().cloned().collect())
}

fn element_from_start(start: &BytesStart) -> XmlResult<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(XmlError::invalid_encoding)?
        .to_string();

    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::invalid_attribute(&element.name, e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(XmlError::invalid_encoding)?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::invalid_attribute(&element.name, e))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: usize,
) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(XmlError::malformed(position, "more than one root element"));
    }

    *root = Some(element);
    Ok(())
}
