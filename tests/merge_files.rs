//! End-to-end merging of documents on disk

use docx_merge::document::RgbColor;
use docx_merge::{
    merge_files, merge_to_file, Alignment, BlockContent, BlockOrder, Document, Error,
    MergeOptions, SeparatorMode, StyleSheet, StylePolicy,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"/>
  <w:style w:type="paragraph" w:styleId="Heading1"/>
</w:styles>"#;

/// Two paragraphs and a 2x2 table, with some formatting
fn document_a() -> Document {
    let mut doc = Document::new();
    doc.set_styles(StyleSheet::from_bytes(STYLES_XML.as_bytes().to_vec()).unwrap());

    let heading = doc.add_empty_paragraph();
    heading.set_style("Heading1");
    heading.set_alignment(Alignment::Center);
    let run = heading.add_run(docx_merge::Run::new("Report"));
    run.set_bold(true);
    run.set_color_rgb(RgbColor(0x1F, 0x4E, 0x79));

    doc.add_paragraph("Body text").set_style("Quote");

    let table = doc.add_table(2, 2);
    table.set_cell_text(0, 0, "a1");
    table.set_cell_text(0, 1, "b1");
    table.set_cell_text(1, 0, "a2");
    table.set_cell_text(1, 1, "b2");
    doc
}

fn document_b() -> Document {
    let mut doc = Document::new();
    doc.add_paragraph("Appendix");
    doc
}

fn write_doc(dir: &TempDir, name: &str, mut doc: Document) -> PathBuf {
    let path = dir.path().join(name);
    doc.save(&path).unwrap();
    path
}

fn block_kinds(doc: &Document) -> Vec<String> {
    doc.blocks()
        .map(|b| match b {
            BlockContent::Paragraph(p) => format!("p:{}", p.text()),
            BlockContent::Table(t) => format!("tbl:{}x{}", t.row_count(), t.column_count()),
            BlockContent::PageBreak => "break".to_string(),
            BlockContent::Unknown(_) => "unknown".to_string(),
        })
        .collect()
}

#[test]
fn merges_two_documents_with_page_break() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_a());
    let b = write_doc(&dir, "b.docx", document_b());
    let out = dir.path().join("combined.docx");

    let options = MergeOptions::default().order(BlockOrder::ParagraphsThenTables);
    let summary = merge_to_file(&[&a, &b], &out, &options).unwrap();

    assert_eq!(summary.documents, 2);
    assert_eq!(summary.paragraphs, 3);
    assert_eq!(summary.tables, 1);
    assert_eq!(summary.separators, 1);
    assert_eq!(summary.output, out);

    let merged = Document::open(&out).unwrap();
    assert_eq!(
        block_kinds(&merged),
        vec!["p:Report", "p:Body text", "tbl:2x2", "break", "p:Appendix"]
    );

    let heading = merged.paragraph(0).unwrap();
    assert_eq!(heading.style(), Some("Heading1"));
    assert_eq!(heading.alignment(), Some(Alignment::Center));
    let run = heading.runs().next().unwrap();
    assert_eq!(run.bold(), Some(true));
    assert_eq!(run.italic(), None);
    assert_eq!(run.color_rgb(), Some(RgbColor(0x1F, 0x4E, 0x79)));

    let table = merged.table(0).unwrap();
    assert_eq!(table.cell(1, 1).unwrap().text(), "b2");

    // The first document's styles travel with the output
    assert!(merged.styles().unwrap().contains("Heading1"));
}

#[test]
fn newline_separator_inserts_two_blank_paragraphs_per_gap() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..3)
        .map(|i| write_doc(&dir, &format!("{i}.docx"), document_b()))
        .collect();

    let options = MergeOptions::default().separator(SeparatorMode::Newline);
    let merged = merge_files(&paths, &options).unwrap();

    let blanks = merged.paragraphs().filter(|p| p.text().is_empty()).count();
    assert_eq!(blanks, 4);
    assert_eq!(merged.paragraph_count(), 3 + 4);
    assert_eq!(merged.page_break_count(), 0);
}

#[test]
fn none_separator_concatenates() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_b());
    let b = write_doc(&dir, "b.docx", document_b());

    let options = MergeOptions::default().separator(SeparatorMode::None);
    let merged = merge_files(&[a, b], &options).unwrap();
    assert_eq!(block_kinds(&merged), vec!["p:Appendix", "p:Appendix"]);
}

#[test]
fn single_source_is_copied_without_separator() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_a());

    let merged = merge_files(&[a], &MergeOptions::default()).unwrap();
    assert_eq!(
        block_kinds(&merged),
        vec!["p:Report", "p:Body text", "tbl:2x2"]
    );
}

#[test]
fn drop_unknown_replaces_undefined_style_references() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_a());

    let options = MergeOptions::default().styles(StylePolicy::DropUnknown);
    let merged = merge_files(&[a], &options).unwrap();

    assert_eq!(merged.paragraph(0).unwrap().style(), Some("Heading1"));
    // "Quote" is not defined; the default paragraph style takes its place
    assert_eq!(merged.paragraph(1).unwrap().style(), Some("Normal"));
}

#[test]
fn bare_policy_writes_no_styles_part() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_a());
    let out = dir.path().join("bare.docx");

    let options = MergeOptions::default().styles(StylePolicy::Bare);
    merge_to_file(&[a], &out, &options).unwrap();

    let merged = Document::open(&out).unwrap();
    assert!(merged.styles().is_none());
    assert_eq!(merged.paragraph(1).unwrap().style(), Some("Quote"));
}

#[test]
fn missing_source_leaves_destination_untouched() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_a());
    let missing = dir.path().join("missing.docx");
    let out = dir.path().join("combined.docx");
    fs::write(&out, b"previous contents").unwrap();

    let err = merge_to_file(&[a, missing.clone()], &out, &MergeOptions::default()).unwrap_err();
    match err {
        Error::SourceUnreadable { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(&out).unwrap(), b"previous contents");
}

#[test]
fn corrupt_source_is_reported_and_nothing_is_written() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.docx");
    fs::write(&bad, b"not a zip archive").unwrap();
    let out = dir.path().join("combined.docx");

    let err = merge_to_file(&[&bad], &out, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable { ref path, .. } if path == &bad));
    assert!(!out.exists());
}

#[test]
fn empty_path_list_is_rejected() {
    let paths: [&Path; 0] = [];
    assert!(matches!(
        merge_files(&paths, &MergeOptions::default()),
        Err(Error::EmptyInput)
    ));
}

#[test]
fn unwritable_destination_is_reported() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_b());
    let out = dir.path().join("no-such-dir").join("combined.docx");

    let err = merge_to_file(&[a], &out, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::DestinationWrite { ref path, .. } if path == &out));
}

#[test]
fn existing_destination_is_replaced_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_b());
    let out = dir.path().join("combined.docx");
    fs::write(&out, b"previous contents").unwrap();

    merge_to_file(&[&a], &out, &MergeOptions::default()).unwrap();

    assert_eq!(Document::open(&out).unwrap().text(), "Appendix");
    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.docx", "combined.docx"]);
}

#[test]
fn failed_replace_keeps_destination_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let a = write_doc(&dir, "a.docx", document_b());
    // A directory cannot be replaced by the finished file
    let out = dir.path().join("combined.docx");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("keep.txt"), b"kept").unwrap();

    let err = merge_to_file(&[&a], &out, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::DestinationWrite { ref path, .. } if path == &out));

    assert_eq!(fs::read(out.join("keep.txt")).unwrap(), b"kept");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
