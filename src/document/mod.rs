//! Document model - high-level API for DOCX documents

mod body;
mod paragraph;
mod run;
mod styles;
mod table;

pub use body::{BlockContent, Body};
pub use paragraph::{Alignment, Hyperlink, Paragraph, ParagraphContent, ParagraphProperties};
pub use run::{BreakType, RgbColor, Run, RunContent, RunProperties};
pub use styles::StyleSheet;
pub use table::{GridColumn, Table, TableCell, TableCellProperties, TableRow, VMerge};

use crate::error::{Error, Result};
use crate::opc::{rel_types, well_known, Package, Part, Relationships, MAIN_DOCUMENT, STYLES};
use crate::xml;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use std::path::Path;

/// A DOCX document
#[derive(Debug)]
pub struct Document {
    /// Underlying OPC package
    package: Package,
    /// Parsed document body
    body: Body,
    /// Style sheet, if the document has one
    styles: Option<StyleSheet>,
}

impl Document {
    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(package)
    }

    /// Open a document from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        Self::from_package(package)
    }

    /// Create document from an OPC package
    fn from_package(package: Package) -> Result<Self> {
        let doc_part = package
            .main_document_part()
            .ok_or_else(|| Error::MissingPart("word/document.xml".into()))?;

        let body = parse_document_xml(doc_part.data_as_str()?)?;

        let styles = match package.related_part(doc_part, rel_types::STYLES) {
            Some(part) => Some(StyleSheet::from_bytes(part.data().to_vec())?),
            None => None,
        };

        log::debug!(
            "parsed {} with {} blocks",
            doc_part.uri(),
            body.content.len()
        );
        Ok(Self {
            package,
            body,
            styles,
        })
    }

    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            package: Package::new(),
            body: Body::default(),
            styles: None,
        }
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.update_package()?;
        self.package.save(path)
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.update_package()?;
        self.package.to_bytes()
    }

    /// Update the package with current body content and styles
    fn update_package(&mut self) -> Result<()> {
        let xml = serialize_document_xml(&self.body)?;
        let uri = self
            .package
            .main_document_uri()
            .unwrap_or_else(well_known::document);

        let mut rels = self
            .package
            .part(&uri)
            .and_then(Part::relationships)
            .cloned()
            .unwrap_or_else(Relationships::new);

        if let Some(styles) = &self.styles {
            let styles_uri = match self.package.part(&uri).and_then(|p| {
                self.package
                    .related_part(p, rel_types::STYLES)
                    .map(|s| s.uri().clone())
            }) {
                Some(existing) => existing,
                None => {
                    rels.add(rel_types::STYLES, "styles.xml");
                    uri.resolve("styles.xml")?
                }
            };
            self.package
                .add_part(Part::new(styles_uri, STYLES, styles.data().to_vec()));
        }

        self.package
            .add_part(Part::new(uri.clone(), MAIN_DOCUMENT, xml.into_bytes()).with_relationships(rels));

        if self.package.main_document_uri().is_none() {
            self.package
                .add_relationship(rel_types::OFFICE_DOCUMENT, uri.zip_path());
        }

        Ok(())
    }

    /// Get the style sheet
    pub fn styles(&self) -> Option<&StyleSheet> {
        self.styles.as_ref()
    }

    /// Attach a style sheet; written as `word/styles.xml` on save
    pub fn set_styles(&mut self, styles: StyleSheet) {
        self.styles = Some(styles);
    }

    /// Get all paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    /// Get paragraph count
    pub fn paragraph_count(&self) -> usize {
        self.body.paragraphs().count()
    }

    /// Get paragraph by index
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.body.paragraphs().nth(index)
    }

    /// Get all tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    /// Get table count
    pub fn table_count(&self) -> usize {
        self.body.tables().count()
    }

    /// Get table by index
    pub fn table(&self, index: usize) -> Option<&Table> {
        self.body.tables().nth(index)
    }

    /// Get page break count
    pub fn page_break_count(&self) -> usize {
        self.body.page_break_count()
    }

    /// Block-level content in document order
    pub fn blocks(&self) -> impl Iterator<Item = &BlockContent> {
        self.body.content.iter()
    }

    /// Get all text in the document
    pub fn text(&self) -> String {
        self.body
            .paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the underlying package
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Get body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Get mutable body
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Add a paragraph with text
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        self.push_paragraph(Paragraph::new(text))
    }

    /// Add an empty paragraph
    pub fn add_empty_paragraph(&mut self) -> &mut Paragraph {
        self.push_paragraph(Paragraph::default())
    }

    /// Append a paragraph, returning it for further editing
    pub fn push_paragraph(&mut self, para: Paragraph) -> &mut Paragraph {
        self.body.add_paragraph(para);
        match self.body.content.last_mut() {
            Some(BlockContent::Paragraph(p)) => p,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    /// Add an empty `rows` x `cols` table
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        self.body.add_table(Table::new(rows, cols));
        match self.body.content.last_mut() {
            Some(BlockContent::Table(t)) => t,
            _ => unreachable!("a table was just pushed"),
        }
    }

    /// Add a page break
    pub fn add_page_break(&mut self) {
        self.body.add_page_break();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse document.xml content
fn parse_document_xml(xml: &str) -> Result<Body> {
    // Text is not trimmed: whitespace inside w:t is content
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut body = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().local_name().as_ref() {
                b"body" => body = Some(Body::from_reader(&mut reader)?),
                b"document" => {}
                _ => xml::skip_element(&mut reader, &e)?,
            },
            Event::Empty(e) if e.name().local_name().as_ref() == b"body" => {
                body = Some(Body::default());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    body.ok_or_else(|| Error::InvalidDocument("Missing w:body element".into()))
}

/// Serialize body to document.xml content
fn serialize_document_xml(body: &Body) -> Result<String> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new(&mut buffer);

    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        Some("yes"),
    )))?;

    let mut doc_start = BytesStart::new("w:document");
    for (attr, value) in xml::document_namespaces() {
        doc_start.push_attribute((attr, value));
    }
    writer.write_event(Event::Start(doc_start))?;

    body.write_to(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    let xml_bytes = buffer.into_inner();
    String::from_utf8(xml_bytes).map_err(|e| Error::InvalidDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r>
        <w:t xml:space="preserve">Hello, World! </w:t>
      </w:r>
    </w:p>
    <w:p>
      <w:pPr>
        <w:pStyle w:val="Heading1"/>
        <w:jc w:val="center"/>
      </w:pPr>
      <w:r>
        <w:rPr>
          <w:b/>
          <w:i w:val="0"/>
          <w:sz w:val="28"/>
          <w:color w:val="FF0000"/>
        </w:rPr>
        <w:t>This is a heading</w:t>
      </w:r>
    </w:p>
    <w:tbl>
      <w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr>
    </w:tbl>
    <w:p><w:r><w:br w:type="page"/></w:r></w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#;

    #[test]
    fn test_parse_simple_document() {
        let body = parse_document_xml(SIMPLE_DOC).unwrap();

        let paras: Vec<_> = body.paragraphs().collect();
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text(), "Hello, World! ");
        assert_eq!(paras[1].text(), "This is a heading");
        assert_eq!(paras[1].style(), Some("Heading1"));
        assert_eq!(paras[1].alignment(), Some(Alignment::Center));

        let run = paras[1].runs().next().unwrap();
        assert_eq!(run.bold(), Some(true));
        assert_eq!(run.italic(), Some(false));
        assert_eq!(run.underline(), None);
        assert_eq!(run.font_size_pt(), Some(14.0));
        assert_eq!(run.color_rgb(), Some(RgbColor(0xFF, 0, 0)));

        assert_eq!(body.tables().count(), 1);
        assert_eq!(body.page_break_count(), 1);
        assert!(body.section_properties.is_some());
    }

    #[test]
    fn test_missing_body() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        assert!(matches!(
            parse_document_xml(xml),
            Err(Error::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_new_document_roundtrip() {
        let mut doc = Document::new();
        doc.add_paragraph("first").add_run(Run::new(" more"));
        doc.add_page_break();
        doc.add_table(2, 3).set_cell_text(1, 2, "corner");
        doc.add_empty_paragraph();

        let bytes = doc.to_bytes().unwrap();
        let reopened = Document::from_bytes(&bytes).unwrap();

        assert_eq!(reopened.body(), doc.body());
        assert_eq!(reopened.paragraph_count(), 2);
        assert_eq!(reopened.paragraph(0).unwrap().text(), "first more");
        assert_eq!(reopened.page_break_count(), 1);
        assert_eq!(reopened.table(0).unwrap().cell(1, 2).unwrap().text(), "corner");
        assert!(reopened.styles().is_none());
    }

    #[test]
    fn test_styles_written_and_reloaded() {
        let styles = StyleSheet::from_bytes(
            br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Title"/></w:styles>"#
                .to_vec(),
        )
        .unwrap();

        let mut doc = Document::new();
        doc.set_styles(styles);
        doc.add_paragraph("titled").set_style("Title");

        let bytes = doc.to_bytes().unwrap();
        let reopened = Document::from_bytes(&bytes).unwrap();
        assert!(reopened.styles().unwrap().contains("Title"));

        // Saving twice must not duplicate the styles relationship
        let mut again = reopened;
        let bytes = again.to_bytes().unwrap();
        let pkg = Package::from_bytes(&bytes).unwrap();
        let doc_part = pkg.main_document_part().unwrap();
        assert_eq!(doc_part.relationships().unwrap().len(), 1);
    }
}
