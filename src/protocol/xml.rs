//! Minimal XML writing and reading on top of `quick-xml`.
//!
//! Responses are read into a small element tree so that lookups of absent
//! elements return `None` instead of failing.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::TransportError;

/// Streaming writer for request envelopes.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), TransportError> {
        self.writer
            .write_event(event)
            .map_err(|e| TransportError::Encoding {
                message: e.to_string(),
            })
    }

    pub(crate) fn declaration(&mut self) -> Result<(), TransportError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub(crate) fn start(&mut self, name: &str) -> Result<(), TransportError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn start_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), TransportError> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.write(Event::Start(start))
    }

    pub(crate) fn empty(&mut self, name: &str) -> Result<(), TransportError> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), TransportError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes `<name>value</name>` with the value escaped.
    pub(crate) fn element(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    /// Writes the element only when a non-blank value is present.
    ///
    /// The upstream parser treats presence as meaningful, so absent values
    /// must not produce an empty element.
    pub(crate) fn optional(&mut self, name: &str, value: Option<&str>) -> Result<(), TransportError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.element(name, value),
            None => Ok(()),
        }
    }

    pub(crate) fn finish(self) -> Result<String, TransportError> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| TransportError::Encoding {
            message: e.to_string(),
        })
    }
}

/// An element of a parsed response, keyed by local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct XmlNode {
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    /// Parses a document into a synthetic root node holding the top element.
    pub(crate) fn parse(xml: &str) -> Result<XmlNode, TransportError> {
        let malformed = |message: String| TransportError::MalformedResponse { message };

        let mut reader = Reader::from_str(xml);
        let mut stack = vec![XmlNode::named(b"#document")];
        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            match event {
                Event::Start(start) => stack.push(XmlNode::named(start.local_name().as_ref())),
                Event::Empty(start) => {
                    let node = XmlNode::named(start.local_name().as_ref());
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| malformed("unbalanced closing tag".to_string()))?;
                    let parent = stack
                        .last_mut()
                        .ok_or_else(|| malformed("unbalanced closing tag".to_string()))?;
                    parent.children.push(node);
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text);
                    let value = unescape(&raw).map_err(|e| malformed(e.to_string()))?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::GeneralRef(reference) => {
                    let raw = format!("&{};", String::from_utf8_lossy(&reference));
                    let value = unescape(&raw).map_err(|e| malformed(e.to_string()))?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&value);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        match stack.pop() {
            Some(root) if stack.is_empty() => Ok(root),
            _ => Err(malformed("document ended inside an open element".to_string())),
        }
    }

    /// First direct child with the given local name.
    pub(crate) fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given local name, in document order.
    pub(crate) fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth first, document order) with the given local name.
    pub(crate) fn find(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given local name, in document order.
    pub(crate) fn find_all<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            } else {
                child.find_all(name, found);
            }
        }
    }

    /// Trimmed text of this node, `None` when blank.
    pub(crate) fn value(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|t| !t.is_empty())
    }

    /// Trimmed text of the first direct child, `None` when absent or blank.
    pub(crate) fn text_of(&self, name: &str) -> Option<String> {
        self.child(name).and_then(XmlNode::value).map(str::to_string)
    }
}
