//! Saved documents re-open with the same structure

use docx_merge::{Alignment, Document, MergeOptions, Merger, Package, SeparatorMode};
use pretty_assertions::assert_eq;

fn sample() -> Document {
    let mut doc = Document::new();
    doc.add_paragraph("Tabs\tand\nbreaks");
    doc.add_paragraph("  padded  ").set_alignment(Alignment::Justify);
    doc.add_page_break();
    let table = doc.add_table(1, 3);
    table.set_cell_text(0, 2, "two\nlines");
    doc.add_empty_paragraph();
    doc
}

#[test]
fn merged_output_roundtrips_through_bytes() {
    let merger = Merger::new(MergeOptions::default().separator(SeparatorMode::PageBreak));
    let mut merged = merger.merge(&[sample(), sample()]).unwrap();

    let bytes = merged.to_bytes().unwrap();
    let reopened = Document::from_bytes(&bytes).unwrap();

    assert_eq!(reopened.body(), merged.body());
    assert_eq!(reopened.page_break_count(), 3);
    assert_eq!(reopened.table_count(), 2);
    assert_eq!(reopened.paragraph(0).unwrap().text(), "Tabs\tand\nbreaks");
    assert_eq!(reopened.paragraph(1).unwrap().text(), "  padded  ");
    assert_eq!(
        reopened.table(1).unwrap().cell(0, 2).unwrap().text(),
        "two\nlines"
    );
}

#[test]
fn output_is_a_minimal_package() {
    let mut doc = sample();
    let bytes = doc.to_bytes().unwrap();
    let package = Package::from_bytes(&bytes).unwrap();

    let main = package.main_document_part().unwrap();
    assert_eq!(main.uri().as_str(), "/word/document.xml");
    let xml = main.data_as_str().unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"<w:br w:type="page"/>"#));
    assert!(xml.contains("<w:tab/>"));
}

#[test]
fn missing_main_part_is_an_error() {
    let package = Package::new();
    let bytes = package.to_bytes().unwrap();
    assert!(matches!(
        Document::from_bytes(&bytes),
        Err(docx_merge::Error::MissingPart(_))
    ));
}
