//! A small ordered XML tree.
//!
//! Attributes keep their document order so that parsing and serializing an
//! unchanged tree is stable, which the recolor pass relies on for
//! deterministic output.
//!
//! # Example
//!
//! ```
//! use server_resources_svg::xml::{XmlElement, parse_xml};
//!
//! let mut root = parse_xml(r##"<svg><g><path fill="#212121"/></g></svg>"##).unwrap();
//! let path = root.child_elements_mut().next().unwrap().child_elements_mut().next().unwrap();
//! path.set_attribute("fill", "#d6d6d6");
//! assert_eq!(root.to_xml_string().unwrap(), r##"<svg><g><path fill="#d6d6d6"/></g></svg>"##);
//! ```

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, SvgError};

/// An XML element with ordered attributes and child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// A node in an XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    CData(String),
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The qualified name (`svg`, `svg:path`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Iterate attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: impl Into<XmlNode>) {
        self.children.push(child.into());
    }

    /// Serialize the element and its subtree without indentation.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| SvgError::xml(e.to_string()))
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            write_event(writer, Event::Empty(start))
        } else {
            write_event(writer, Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
        }
    }
}

impl XmlNode {
    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            Self::Element(element) => element.write_to(writer),
            Self::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
            Self::Comment(comment) => {
                write_event(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))
            }
            Self::CData(content) => write_event(writer, Event::CData(BytesCData::new(content.as_str()))),
        }
    }
}

impl From<XmlElement> for XmlNode {
    fn from(element: XmlElement) -> Self {
        Self::Element(element)
    }
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SvgError::xml(e.to_string()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SvgError::xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn is_text_content(local_name: &str) -> bool {
    matches!(local_name, "text" | "tspan" | "textPath")
}

/// Parse an XML document and return its root element.
///
/// Declarations, processing instructions and doctypes are dropped.
/// Whitespace-only text is dropped except inside text content elements;
/// all other text is kept verbatim.
pub fn parse_xml(text: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(text);

    let mut root: Option<XmlElement> = None;
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => stack.push(element_from_start(&start)?),
            Ok(Event::Empty(empty)) => {
                let element = element_from_start(&empty)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(text)) => {
                let content = text
                    .unescape()
                    .map_err(|e| SvgError::xml(e.to_string()))?
                    .into_owned();
                if let Some(parent) = stack.last_mut()
                    && !content.is_empty()
                    && (is_text_content(parent.local_name()) || !content.trim().is_empty())
                {
                    parent.children.push(XmlNode::Text(content));
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(parent) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    parent.children.push(XmlNode::CData(content));
                }
            }
            Ok(Event::Comment(comment)) => {
                if let Some(parent) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&comment).into_owned();
                    parent.children.push(XmlNode::Comment(content));
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(SvgError::xml(format!(
                    "{e} at position {}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if !stack.is_empty() {
        return Err(SvgError::xml("unclosed element at end of document"));
    }
    root.ok_or(SvgError::NoRoot)
}
