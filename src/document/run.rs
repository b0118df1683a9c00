//! Run element (w:r) - a contiguous span of text with one formatting set

use crate::error::Result;
use crate::xml::{get_w_attr, get_w_val, parse_bool, skip_element, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::io::BufRead;

/// Run element (w:r)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    /// Run properties
    pub properties: Option<RunProperties>,
    /// Run content
    pub content: Vec<RunContent>,
}

/// Content within a run
#[derive(Clone, Debug, PartialEq)]
pub enum RunContent {
    /// Text (w:t)
    Text(String),
    /// Tab (w:tab)
    Tab,
    /// Break (w:br)
    Break(BreakType),
    /// Carriage return (w:cr)
    CarriageReturn,
    /// Anything else (drawings, field codes, ...)
    Unknown(RawXmlNode),
}

/// Break type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakType {
    #[default]
    TextWrapping,
    Page,
    Column,
}

/// Run properties (w:rPr).
///
/// Every field is tri-state: `None` means "not set on this run", so the
/// value is inherited from the paragraph or character style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunProperties {
    /// Character style ID
    pub style: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Underline kind (`single`, `double`, ...); `none` turns underline off
    pub underline: Option<String>,
    /// Font size in half-points (24 = 12pt)
    pub size: Option<u32>,
    /// Raw color value: hex RGB, `auto`, ...
    pub color: Option<String>,
    /// Font for ASCII characters
    pub font_ascii: Option<String>,
    /// Font for high ANSI characters
    pub font_h_ansi: Option<String>,
    /// Font for East Asian characters
    pub font_east_asia: Option<String>,
    /// Properties not modelled above
    pub unknown_children: Vec<RawXmlNode>,
}

/// 24-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Parse a six-digit hex value such as `FF0000`
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Run {
    /// Create a run with text; `\t` becomes a tab and `\n` a line break
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            content: text_content(&text.into()),
            ..Default::default()
        }
    }

    /// A run holding a single hard page break
    pub fn page_break() -> Self {
        Run {
            content: vec![RunContent::Break(BreakType::Page)],
            ..Default::default()
        }
    }

    /// Parse from reader (after w:r start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut run = Run::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"rPr" => run.properties = Some(RunProperties::from_reader(reader)?),
                    b"t" => run.content.push(RunContent::Text(read_text_content(reader)?)),
                    _ => {
                        if let Some(content) = simple_content(&e) {
                            run.content.push(content);
                            skip_element(reader, &e)?;
                        } else {
                            let raw = RawXmlElement::from_reader(reader, &e)?;
                            run.content.push(RunContent::Unknown(RawXmlNode::Element(raw)));
                        }
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"rPr" => {}
                    b"t" => run.content.push(RunContent::Text(String::new())),
                    _ => {
                        let content = simple_content(&e).unwrap_or_else(|| {
                            RunContent::Unknown(RawXmlNode::Element(RawXmlElement::from_empty(&e)))
                        });
                        run.content.push(content);
                    }
                },
                Event::End(e) if e.name().local_name().as_ref() == b"r" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(run)
    }

    /// Get all text in this run (tabs as `\t`, line breaks as `\n`)
    pub fn text(&self) -> String {
        let mut result = String::new();
        for content in &self.content {
            match content {
                RunContent::Text(t) => result.push_str(t),
                RunContent::Tab => result.push('\t'),
                RunContent::Break(BreakType::TextWrapping) | RunContent::CarriageReturn => {
                    result.push('\n')
                }
                _ => {}
            }
        }
        result
    }

    /// Whether this run is nothing but an unformatted page break
    pub fn is_page_break(&self) -> bool {
        self.properties.is_none() && self.content == [RunContent::Break(BreakType::Page)]
    }

    /// Check if bold; `None` inherits
    pub fn bold(&self) -> Option<bool> {
        self.properties.as_ref()?.bold
    }

    /// Check if italic; `None` inherits
    pub fn italic(&self) -> Option<bool> {
        self.properties.as_ref()?.italic
    }

    /// Underline kind, if set
    pub fn underline(&self) -> Option<&str> {
        self.properties.as_ref()?.underline.as_deref()
    }

    /// Font name (the ASCII font slot)
    pub fn font_name(&self) -> Option<&str> {
        self.properties.as_ref()?.font_ascii.as_deref()
    }

    /// Font size in half-points
    pub fn font_size_half_points(&self) -> Option<u32> {
        self.properties.as_ref()?.size
    }

    /// Font size in points
    pub fn font_size_pt(&self) -> Option<f32> {
        self.font_size_half_points().map(|s| s as f32 / 2.0)
    }

    /// Raw color value
    pub fn color(&self) -> Option<&str> {
        self.properties.as_ref()?.color.as_deref()
    }

    /// Color as RGB; `None` when unset, `auto`, or not a hex value
    pub fn color_rgb(&self) -> Option<RgbColor> {
        self.color().and_then(RgbColor::from_hex)
    }

    /// Set bold
    pub fn set_bold(&mut self, bold: bool) {
        self.props_mut().bold = Some(bold);
    }

    /// Set italic
    pub fn set_italic(&mut self, italic: bool) {
        self.props_mut().italic = Some(italic);
    }

    /// Set underline kind (`single`, `double`, `none`, ...)
    pub fn set_underline(&mut self, kind: impl Into<String>) {
        self.props_mut().underline = Some(kind.into());
    }

    /// Set the font for ASCII and high ANSI text
    pub fn set_font_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let props = self.props_mut();
        props.font_h_ansi = Some(name.clone());
        props.font_ascii = Some(name);
    }

    /// Set font size in half-points
    pub fn set_font_size_half_points(&mut self, size: u32) {
        self.props_mut().size = Some(size);
    }

    /// Set font size in points
    pub fn set_font_size_pt(&mut self, size: f32) {
        self.set_font_size_half_points((size * 2.0).round() as u32);
    }

    /// Set font color
    pub fn set_color_rgb(&mut self, color: RgbColor) {
        self.props_mut().color = Some(color.to_string());
    }

    fn props_mut(&mut self) -> &mut RunProperties {
        self.properties.get_or_insert_with(Default::default)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let start = BytesStart::new("w:r");

        if self.properties.is_none() && self.content.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }
        for content in &self.content {
            content.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;

        Ok(())
    }
}

impl RunContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RunContent::Text(text) => {
                let mut start = BytesStart::new("w:t");
                if text.starts_with(char::is_whitespace)
                    || text.ends_with(char::is_whitespace)
                    || text.contains("  ")
                {
                    start.push_attribute(("xml:space", "preserve"));
                }
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            }
            RunContent::Tab => {
                writer.write_event(Event::Empty(BytesStart::new("w:tab")))?;
            }
            RunContent::Break(break_type) => {
                let mut start = BytesStart::new("w:br");
                match break_type {
                    BreakType::Page => start.push_attribute(("w:type", "page")),
                    BreakType::Column => start.push_attribute(("w:type", "column")),
                    BreakType::TextWrapping => {}
                }
                writer.write_event(Event::Empty(start))?;
            }
            RunContent::CarriageReturn => {
                writer.write_event(Event::Empty(BytesStart::new("w:cr")))?;
            }
            RunContent::Unknown(node) => node.write_to(writer)?,
        }
        Ok(())
    }
}

impl RunProperties {
    /// Parse from reader (after w:rPr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut props = RunProperties::default();
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
                Event::End(e) if e.name().local_name().as_ref() == b"rPr" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    /// Record a modelled property; returns false for anything else
    fn apply(&mut self, e: &BytesStart) -> bool {
        match e.name().local_name().as_ref() {
            b"rStyle" => self.style = get_w_val(e),
            b"b" => self.bold = Some(parse_bool(e)),
            b"i" => self.italic = Some(parse_bool(e)),
            b"u" => self.underline = Some(get_w_val(e).unwrap_or_else(|| "single".into())),
            b"sz" => self.size = get_w_val(e).and_then(|v| v.parse().ok()),
            b"color" => self.color = get_w_val(e),
            b"rFonts" => {
                self.font_ascii = get_w_attr(e, "ascii");
                self.font_h_ansi = get_w_attr(e, "hAnsi");
                self.font_east_asia = get_w_attr(e, "eastAsia");
            }
            _ => return false,
        }
        true
    }

    /// Whether no property is set at all
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.font_ascii.is_none()
            && self.font_h_ansi.is_none()
            && self.font_east_asia.is_none()
            && self.unknown_children.is_empty()
    }

    /// Write to XML writer (schema order: rStyle, rFonts, b, i, color, sz, u)
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;

        if let Some(style) = &self.style {
            write_val(writer, "w:rStyle", style)?;
        }

        if self.font_ascii.is_some() || self.font_h_ansi.is_some() || self.font_east_asia.is_some() {
            let mut elem = BytesStart::new("w:rFonts");
            if let Some(font) = &self.font_ascii {
                elem.push_attribute(("w:ascii", font.as_str()));
            }
            if let Some(font) = &self.font_h_ansi {
                elem.push_attribute(("w:hAnsi", font.as_str()));
            }
            if let Some(font) = &self.font_east_asia {
                elem.push_attribute(("w:eastAsia", font.as_str()));
            }
            writer.write_event(Event::Empty(elem))?;
        }

        if let Some(bold) = self.bold {
            write_toggle(writer, "w:b", bold)?;
        }
        if let Some(italic) = self.italic {
            write_toggle(writer, "w:i", italic)?;
        }
        if let Some(color) = &self.color {
            write_val(writer, "w:color", color)?;
        }
        if let Some(size) = self.size {
            write_val(writer, "w:sz", &size.to_string())?;
        }
        if let Some(underline) = &self.underline {
            write_val(writer, "w:u", underline)?;
        }

        for child in &self.unknown_children {
            child.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
        Ok(())
    }
}

fn write_val<W: std::io::Write>(writer: &mut Writer<W>, name: &str, val: &str) -> Result<()> {
    let mut elem = BytesStart::new(name);
    elem.push_attribute(("w:val", val));
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_toggle<W: std::io::Write>(writer: &mut Writer<W>, name: &str, on: bool) -> Result<()> {
    let mut elem = BytesStart::new(name);
    if !on {
        elem.push_attribute(("w:val", "0"));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Map tab / break / carriage-return elements
fn simple_content(e: &BytesStart) -> Option<RunContent> {
    match e.name().local_name().as_ref() {
        b"tab" => Some(RunContent::Tab),
        b"cr" => Some(RunContent::CarriageReturn),
        b"br" => Some(RunContent::Break(match get_w_attr(e, "type").as_deref() {
            Some("page") => BreakType::Page,
            Some("column") => BreakType::Column,
            _ => BreakType::TextWrapping,
        })),
        _ => None,
    }
}

/// Split text into run content, turning `\t` and `\n` into their elements
fn text_content(text: &str) -> Vec<RunContent> {
    let mut content = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                if !current.is_empty() {
                    content.push(RunContent::Text(std::mem::take(&mut current)));
                }
                content.push(if ch == '\t' {
                    RunContent::Tab
                } else {
                    RunContent::Break(BreakType::TextWrapping)
                });
            }
            '\r' => {}
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || content.is_empty() {
        content.push(RunContent::Text(current));
    }
    content
}

/// Read text content of a w:t element
fn read_text_content<R: BufRead>(reader: &mut Reader<R>) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::End(e) if e.name().local_name().as_ref() == b"t" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
