//! # docx-merge
//!
//! Concatenate DOCX documents into a single document.
//!
//! ## Features
//!
//! - Paragraph text, style references and alignment are carried over
//! - Run formatting (bold, italic, underline, font, size, color) is copied only where set
//! - Tables keep their dimensions and cell text
//! - Page break, blank-paragraph or no separator between documents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docx_merge::{Document, MergeOptions, Merger, SeparatorMode};
//!
//! let sources = vec![Document::open("a.docx")?, Document::open("b.docx")?];
//!
//! let options = MergeOptions::default().separator(SeparatorMode::PageBreak);
//! let mut merged = Merger::new(options).merge(&sources)?;
//! merged.save("combined.docx")?;
//! ```

pub mod document;
pub mod error;
pub mod merge;
pub mod opc;
pub mod xml;

pub use document::{Alignment, BlockContent, Document, Paragraph, Run, StyleSheet, Table};
pub use error::{Error, Result};
pub use merge::{
    merge_files, merge_to_file, BlockOrder, MergeOptions, MergeSummary, Merger, SeparatorMode,
    StylePolicy,
};
pub use opc::{Package, Part, PartUri};
