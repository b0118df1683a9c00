//! Table cell elements (w:tc, w:tcPr)

use crate::document::{Alignment, Paragraph};
use crate::error::Result;
use crate::xml::{get_w_val, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Table cell (w:tc)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableCell {
    /// Cell properties
    pub properties: Option<TableCellProperties>,
    /// Cell content (paragraphs)
    pub paragraphs: Vec<Paragraph>,
}

/// Table cell properties (w:tcPr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableCellProperties {
    /// Horizontal merge: number of grid columns covered
    pub grid_span: Option<u32>,
    /// Vertical merge state
    pub v_merge: Option<VMerge>,
    /// Properties not modelled above
    pub unknown_children: Vec<RawXmlNode>,
}

/// Vertical merge state (w:vMerge)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VMerge {
    /// First cell of a vertically merged range
    Restart,
    /// Covered by the cell above
    Continue,
}

impl TableCell {
    /// Create a new cell with text
    pub fn new(text: impl Into<String>) -> Self {
        TableCell {
            paragraphs: vec![text_paragraph(text.into())],
            ..Default::default()
        }
    }

    /// Parse from reader (after w:tc start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut cell = TableCell::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"tcPr" => cell.properties = Some(TableCellProperties::from_reader(reader)?),
                    b"p" => cell.paragraphs.push(Paragraph::from_reader(reader)?),
                    // Nested tables and other block content are not carried
                    _ => crate::xml::skip_element(reader, &e)?,
                },
                Event::Empty(e) if e.name().local_name().as_ref() == b"p" => {
                    cell.paragraphs.push(Paragraph::default());
                }
                Event::End(e) if e.name().local_name().as_ref() == b"tc" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(cell)
    }

    /// Cell text: paragraph texts joined with `\n`
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the content with a single paragraph holding `text`
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.paragraphs.clear();
        self.paragraphs.push(text_paragraph(text.into()));
    }

    /// Iterate over paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter()
    }

    /// Alignment of the first paragraph, if explicitly set
    pub fn alignment(&self) -> Option<Alignment> {
        self.paragraphs.first()?.alignment()
    }

    /// Set the alignment of the first paragraph
    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        self.paragraphs[0].set_alignment(alignment);
    }

    /// Number of grid columns covered (1 unless horizontally merged)
    pub fn span(&self) -> usize {
        self.properties
            .as_ref()
            .and_then(|p| p.grid_span)
            .map_or(1, |s| s.max(1) as usize)
    }

    /// Whether the cell above covers this one
    pub fn is_merge_continuation(&self) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|p| p.v_merge == Some(VMerge::Continue))
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:tc")))?;

        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }

        // A cell must end with a paragraph
        if self.paragraphs.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("w:p")))?;
        } else {
            for para in &self.paragraphs {
                para.write_to(writer)?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
        Ok(())
    }
}

/// Empty text gives an empty paragraph rather than an empty run
fn text_paragraph(text: String) -> Paragraph {
    if text.is_empty() {
        Paragraph::default()
    } else {
        Paragraph::new(text)
    }
}

impl TableCellProperties {
    /// Parse from reader (after w:tcPr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut props = TableCellProperties::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let raw = RawXmlElement::from_reader(reader, &e)?;
                    props.unknown_children.push(RawXmlNode::Element(raw));
                }
                Event::Empty(e) => {
                    match e.name().local_name().as_ref() {
                        b"gridSpan" => {
                            props.grid_span = get_w_val(&e).and_then(|v| v.parse().ok());
                        }
                        b"vMerge" => {
                            props.v_merge = Some(match get_w_val(&e).as_deref() {
                                Some("restart") => VMerge::Restart,
                                _ => VMerge::Continue,
                            });
                        }
                        _ => {
                            let raw = RawXmlElement::from_empty(&e);
                            props.unknown_children.push(RawXmlNode::Element(raw));
                        }
                    }
                }
                Event::End(e) if e.name().local_name().as_ref() == b"tcPr" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.grid_span.is_none() && self.v_merge.is_none() && self.unknown_children.is_empty() {
            return Ok(());
        }

        writer.write_event(Event::Start(BytesStart::new("w:tcPr")))?;
        if let Some(span) = self.grid_span {
            let mut elem = BytesStart::new("w:gridSpan");
            elem.push_attribute(("w:val", span.to_string().as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        match self.v_merge {
            Some(VMerge::Restart) => {
                let mut elem = BytesStart::new("w:vMerge");
                elem.push_attribute(("w:val", "restart"));
                writer.write_event(Event::Empty(elem))?;
            }
            Some(VMerge::Continue) => {
                writer.write_event(Event::Empty(BytesStart::new("w:vMerge")))?;
            }
            None => {}
        }
        for child in &self.unknown_children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tcPr")))?;
        Ok(())
    }
}
