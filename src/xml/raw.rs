//! Raw XML nodes for markup the typed model does not interpret

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::xml::collect_attrs;

/// Uninterpreted XML node
#[derive(Clone, Debug, PartialEq)]
pub enum RawXmlNode {
    /// Element node
    Element(RawXmlElement),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
}

/// Uninterpreted XML element with attributes and children
#[derive(Clone, Debug, PartialEq)]
pub struct RawXmlElement {
    /// Qualified name, e.g. `w:sectPr`
    pub name: String,
    /// Attributes as (name, value) pairs
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<RawXmlNode>,
}

impl RawXmlElement {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: RawXmlElement) -> Self {
        self.children.push(RawXmlNode::Element(child));
        self
    }

    /// Read a complete element (reader is positioned after the start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = collect_attrs(start);

        let mut children = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child = Self::from_reader(reader, &e)?;
                    children.push(RawXmlNode::Element(child));
                }
                Event::Empty(e) => {
                    children.push(RawXmlNode::Element(Self::from_empty(&e)));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.to_string();
                    if !text.is_empty() {
                        children.push(RawXmlNode::Text(text));
                    }
                }
                Event::Comment(c) => {
                    children.push(RawXmlNode::Comment(String::from_utf8_lossy(&c).to_string()));
                }
                Event::End(e) => {
                    if e.name().as_ref() == name.as_bytes() {
                        break;
                    }
                }
                Event::Eof => {
                    return Err(Error::InvalidDocument(format!(
                        "unexpected end of input inside <{}>",
                        name
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            name,
            attributes,
            children,
        })
    }

    /// Create from an empty element tag
    pub fn from_empty(e: &BytesStart) -> Self {
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes: collect_attrs(e),
            children: Vec::new(),
        }
    }

    /// Local part of the element name (`sectPr` for `w:sectPr`)
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(&self.name);
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(&self.name)))?;
        }

        Ok(())
    }
}

impl RawXmlNode {
    /// Local element name, if this node is an element
    pub fn element_name(&self) -> Option<&str> {
        match self {
            RawXmlNode::Element(e) => Some(e.local_name()),
            _ => None,
        }
    }

    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RawXmlNode::Element(e) => e.write_to(writer),
            RawXmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t)))?;
                Ok(())
            }
            RawXmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::new(c)))?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_raw_element_roundtrip() {
        let xml = r#"<w:sectPr w:rsidR="00AB"><w:pgSz w:w="11906"/><w:cols>2</w:cols></w:sectPr>"#;
        let mut reader = Reader::from_str(xml);

        let mut buf = Vec::new();
        let elem = match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) => {
                let e = e.into_owned();
                RawXmlElement::from_reader(&mut reader, &e).unwrap()
            }
            other => panic!("unexpected {other:?}"),
        };

        assert_eq!(elem.name, "w:sectPr");
        assert_eq!(elem.local_name(), "sectPr");
        assert_eq!(elem.attributes.len(), 1);
        assert_eq!(elem.children.len(), 2);

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        elem.write_to(&mut writer).unwrap();
        let written = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(written, xml);
    }

    #[test]
    fn test_truncated_element_is_an_error() {
        let xml = r#"<w:custom><w:child/>"#;
        let mut reader = Reader::from_str(xml);
        let start = match reader.read_event().unwrap() {
            Event::Start(e) => e.into_owned(),
            other => panic!("unexpected {other:?}"),
        };

        assert!(RawXmlElement::from_reader(&mut reader, &start).is_err());
    }
}
