//! Paragraph element (w:p)

use crate::document::Run;
use crate::error::Result;
use crate::xml::{get_attr, get_w_attr, get_w_val, skip_element, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Paragraph element (w:p)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    /// Paragraph properties
    pub properties: Option<ParagraphProperties>,
    /// Paragraph content (runs, hyperlinks, etc.)
    pub content: Vec<ParagraphContent>,
}

/// Content within a paragraph
#[derive(Clone, Debug, PartialEq)]
pub enum ParagraphContent {
    /// Text run
    Run(Run),
    /// Hyperlink
    Hyperlink(Hyperlink),
    /// Bookmarks, fields, revisions, ...
    Unknown(RawXmlNode),
}

/// Hyperlink element (w:hyperlink)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hyperlink {
    /// Relationship ID (external links)
    pub r_id: Option<String>,
    /// Bookmark name (internal links)
    pub anchor: Option<String>,
    /// Content runs
    pub runs: Vec<Run>,
}

/// Paragraph properties (w:pPr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Paragraph style ID
    pub style: Option<String>,
    /// Justification; `None` inherits from the style
    pub alignment: Option<Alignment>,
    /// Properties not modelled above
    pub unknown_children: Vec<RawXmlNode>,
}

/// Paragraph justification (w:jc)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    /// Parse a `w:jc` value; unrecognised values yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" => Some(Alignment::Justify),
            "distribute" => Some(Alignment::Distribute),
            _ => None,
        }
    }

    /// The `w:jc` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
            Alignment::Distribute => "distribute",
        }
    }
}

impl Paragraph {
    /// Create a paragraph holding one unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            content: vec![ParagraphContent::Run(Run::new(text))],
            ..Default::default()
        }
    }

    /// A paragraph whose only content is a hard page break
    pub fn page_break() -> Self {
        Paragraph {
            content: vec![ParagraphContent::Run(Run::page_break())],
            ..Default::default()
        }
    }

    /// Parse paragraph from reader (after w:p start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut para = Paragraph::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"pPr" => {
                        para.properties = Some(ParagraphProperties::from_reader(reader)?);
                    }
                    b"r" => {
                        let run = Run::from_reader(reader)?;
                        para.content.push(ParagraphContent::Run(run));
                    }
                    b"hyperlink" => {
                        let link = Hyperlink::from_reader(reader, &e)?;
                        para.content.push(ParagraphContent::Hyperlink(link));
                    }
                    _ => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        para.content.push(ParagraphContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"pPr" => {}
                    b"r" => para.content.push(ParagraphContent::Run(Run::default())),
                    _ => {
                        let raw = RawXmlElement::from_empty(&e);
                        para.content.push(ParagraphContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::End(e) if e.name().local_name().as_ref() == b"p" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(para)
    }

    /// Get all text in this paragraph, including hyperlink text
    pub fn text(&self) -> String {
        self.all_runs().map(|r| r.text()).collect()
    }

    /// Get style ID
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.style.as_deref()
    }

    /// Get explicit alignment
    pub fn alignment(&self) -> Option<Alignment> {
        self.properties.as_ref()?.alignment
    }

    /// Runs directly inside the paragraph
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    /// Runs in reading order, descending into hyperlinks
    pub fn all_runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().flat_map(|c| match c {
            ParagraphContent::Run(r) => std::slice::from_ref(r),
            ParagraphContent::Hyperlink(link) => link.runs.as_slice(),
            ParagraphContent::Unknown(_) => Default::default(),
        })
    }

    /// Whether the paragraph holds nothing but a page break
    pub fn is_page_break(&self) -> bool {
        self.properties.as_ref().map_or(true, |p| p.is_empty())
            && matches!(self.content.as_slice(), [ParagraphContent::Run(run)] if run.is_page_break())
    }

    /// Add a run to this paragraph, returning it for further formatting
    pub fn add_run(&mut self, run: Run) -> &mut Run {
        self.content.push(ParagraphContent::Run(run));
        match self.content.last_mut() {
            Some(ParagraphContent::Run(run)) => run,
            _ => unreachable!("a run was just pushed"),
        }
    }

    /// Set style
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.properties.get_or_insert_with(Default::default).style = Some(style.into());
    }

    /// Set alignment
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.properties.get_or_insert_with(Default::default).alignment = Some(alignment);
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let start = BytesStart::new("w:p");
        let props = self.properties.as_ref().filter(|p| !p.is_empty());

        if props.is_none() && self.content.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(props) = props {
            props.write_to(writer)?;
        }
        for content in &self.content {
            content.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;

        Ok(())
    }
}

impl ParagraphContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            ParagraphContent::Run(run) => run.write_to(writer),
            ParagraphContent::Hyperlink(link) => link.write_to(writer),
            ParagraphContent::Unknown(node) => node.write_to(writer),
        }
    }
}

impl ParagraphProperties {
    /// Parse from reader (after w:pPr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut props = ParagraphProperties::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if props.apply(&e) {
                        skip_element(reader, &e)?;
                    } else {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        props.unknown_children.push(RawXmlNode::Element(raw));
                    }
                }
                Event::Empty(e) => {
                    if !props.apply(&e) {
                        let raw = RawXmlElement::from_empty(&e);
                        props.unknown_children.push(RawXmlNode::Element(raw));
                    }
                }
                Event::End(e) if e.name().local_name().as_ref() == b"pPr" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    fn apply(&mut self, e: &BytesStart) -> bool {
        match e.name().local_name().as_ref() {
            b"pStyle" => self.style = get_w_val(e),
            // Unrecognised justification values stay raw
            b"jc" => match get_w_val(e).as_deref().and_then(Alignment::parse) {
                Some(alignment) => self.alignment = Some(alignment),
                None => return false,
            },
            _ => return false,
        }
        true
    }

    /// Whether no property is set at all
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.alignment.is_none() && self.unknown_children.is_empty()
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;

        if let Some(style) = &self.style {
            let mut elem = BytesStart::new("w:pStyle");
            elem.push_attribute(("w:val", style.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        if let Some(alignment) = self.alignment {
            let mut elem = BytesStart::new("w:jc");
            elem.push_attribute(("w:val", alignment.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        for child in &self.unknown_children {
            child.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
        Ok(())
    }
}

impl Hyperlink {
    /// Parse from reader (after w:hyperlink start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut link = Hyperlink {
            r_id: get_attr(start, "r:id"),
            anchor: get_w_attr(start, "anchor"),
            ..Default::default()
        };
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if e.name().local_name().as_ref() == b"r" {
                        link.runs.push(Run::from_reader(reader)?);
                    } else {
                        skip_element(reader, &e)?;
                    }
                }
                Event::Empty(e) if e.name().local_name().as_ref() == b"r" => {
                    link.runs.push(Run::default());
                }
                Event::End(e) if e.name().local_name().as_ref() == b"hyperlink" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(link)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:hyperlink");
        if let Some(r_id) = &self.r_id {
            start.push_attribute(("r:id", r_id.as_str()));
        }
        if let Some(anchor) = &self.anchor {
            start.push_attribute(("w:anchor", anchor.as_str()));
        }

        if self.runs.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for run in &self.runs {
                run.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:hyperlink")))?;
        }

        Ok(())
    }
}
