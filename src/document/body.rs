//! Document body and block-level content

use crate::document::{Paragraph, Table};
use crate::error::Result;
use crate::xml::{RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Block-level content in a document body
#[derive(Clone, Debug, PartialEq)]
pub enum BlockContent {
    /// Paragraph
    Paragraph(Paragraph),
    /// Table
    Table(Table),
    /// Paragraph holding only a page break
    PageBreak,
    /// Unknown element (preserved for round-trip)
    Unknown(RawXmlNode),
}

/// Document body (w:body)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    /// Block-level content
    pub content: Vec<BlockContent>,
    /// Section properties (last sectPr in body)
    pub section_properties: Option<RawXmlNode>,
}

impl Body {
    /// Parse body from XML reader (after w:body start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut body = Body::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"p" => {
                        let para = Paragraph::from_reader(reader)?;
                        if para.is_page_break() {
                            body.content.push(BlockContent::PageBreak);
                        } else {
                            body.content.push(BlockContent::Paragraph(para));
                        }
                    }
                    b"tbl" => {
                        let table = Table::from_reader(reader)?;
                        body.content.push(BlockContent::Table(table));
                    }
                    b"sectPr" => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        body.section_properties = Some(RawXmlNode::Element(raw));
                    }
                    _ => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        body.content.push(BlockContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"p" => body.content.push(BlockContent::Paragraph(Paragraph::default())),
                    b"sectPr" => {
                        let raw = RawXmlElement::from_empty(&e);
                        body.section_properties = Some(RawXmlNode::Element(raw));
                    }
                    _ => {
                        let raw = RawXmlElement::from_empty(&e);
                        body.content.push(BlockContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::End(e) if e.name().local_name().as_ref() == b"body" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(body)
    }

    /// Get all paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|c| match c {
            BlockContent::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Get all tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|c| match c {
            BlockContent::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Number of page-break blocks
    pub fn page_break_count(&self) -> usize {
        self.content
            .iter()
            .filter(|c| matches!(c, BlockContent::PageBreak))
            .count()
    }

    /// Write body to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:body")))?;

        for content in &self.content {
            content.write_to(writer)?;
        }

        if let Some(sect_pr) = &self.section_properties {
            sect_pr.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:body")))?;
        Ok(())
    }

    /// Add a paragraph
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(BlockContent::Paragraph(para));
    }

    /// Add a table
    pub fn add_table(&mut self, table: Table) {
        self.content.push(BlockContent::Table(table));
    }

    /// Add a page break
    pub fn add_page_break(&mut self) {
        self.content.push(BlockContent::PageBreak);
    }
}

impl BlockContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            BlockContent::Paragraph(para) => para.write_to(writer),
            BlockContent::Table(table) => table.write_to(writer),
            BlockContent::PageBreak => Paragraph::page_break().write_to(writer),
            BlockContent::Unknown(node) => node.write_to(writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_body(xml: &str) -> Body {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().local_name().as_ref() == b"body" => {
                    return Body::from_reader(&mut reader).unwrap()
                }
                Event::Eof => panic!("no body in {xml}"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_page_break_paragraph_becomes_block() {
        let body = parse_body(
            r#"<w:body><w:p><w:r><w:t>a</w:t></w:r></w:p><w:p><w:r><w:br w:type="page"/></w:r></w:p><w:p/></w:body>"#,
        );
        assert_eq!(body.content.len(), 3);
        assert!(matches!(body.content[1], BlockContent::PageBreak));
        assert_eq!(body.page_break_count(), 1);
        assert_eq!(body.paragraphs().count(), 2);
    }

    #[test]
    fn test_break_inside_text_stays_a_paragraph() {
        let body = parse_body(
            r#"<w:body><w:p><w:r><w:t>before</w:t><w:br w:type="page"/></w:r></w:p></w:body>"#,
        );
        assert_eq!(body.page_break_count(), 0);
        assert_eq!(body.paragraphs().count(), 1);
    }

    #[test]
    fn test_section_properties_and_unknown_blocks() {
        let body = parse_body(
            r#"<w:body><w:sdt><w:sdtContent/></w:sdt><w:p/><w:sectPr><w:pgSz w:w="11906"/></w:sectPr></w:body>"#,
        );
        assert!(matches!(body.content[0], BlockContent::Unknown(_)));
        assert!(body.section_properties.is_some());
        assert_eq!(body.content.len(), 2);
    }

    #[test]
    fn test_write_page_break() {
        let mut body = Body::default();
        body.add_page_break();

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        body.write_to(&mut writer).unwrap();
        let xml = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(
            xml,
            r#"<w:body><w:p><w:r><w:br w:type="page"/></w:r></w:p></w:body>"#
        );
    }
}
