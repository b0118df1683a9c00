//! Merge configuration

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// What goes between two consecutive source documents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SeparatorMode {
    /// A hard page break
    #[default]
    PageBreak,
    /// Blank paragraphs
    Newline,
    /// Nothing; documents run together
    None,
}

impl SeparatorMode {
    /// Name used on the command line and in `Display`
    pub fn as_str(&self) -> &'static str {
        match self {
            SeparatorMode::PageBreak => "page_break",
            SeparatorMode::Newline => "newline",
            SeparatorMode::None => "none",
        }
    }

    /// Number of separator blocks inserted when merging `documents` sources
    ///
    /// `Newline` inserts one blank paragraph before each later source and
    /// another after each non-final one.
    pub fn block_count(&self, documents: usize) -> usize {
        let gaps = documents.saturating_sub(1);
        match self {
            SeparatorMode::PageBreak => gaps,
            SeparatorMode::Newline => 2 * gaps,
            SeparatorMode::None => 0,
        }
    }
}

impl FromStr for SeparatorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "page_break" | "page-break" => Ok(SeparatorMode::PageBreak),
            "newline" => Ok(SeparatorMode::Newline),
            "none" => Ok(SeparatorMode::None),
            _ => Err(Error::InvalidSeparator(s.to_string())),
        }
    }
}

impl fmt::Display for SeparatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which a source's paragraphs and tables are copied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockOrder {
    /// Blocks in the order they appear in the source
    #[default]
    Document,
    /// All paragraphs first, then all tables
    ParagraphsThenTables,
}

/// Handling of paragraph style references
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StylePolicy {
    /// Keep style ids as-is and carry the first source's style sheet
    #[default]
    Verbatim,
    /// Carry the first source's style sheet; drop ids it does not define
    DropUnknown,
    /// No style sheet in the output; ids kept as-is
    Bare,
}

/// Options for [`Merger`](crate::merge::Merger)
///
/// ```
/// use docx_merge::merge::{BlockOrder, MergeOptions, SeparatorMode};
///
/// let options = MergeOptions::default()
///     .separator(SeparatorMode::Newline)
///     .order(BlockOrder::ParagraphsThenTables);
/// assert_eq!(options.separator, SeparatorMode::Newline);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Separator between documents
    pub separator: SeparatorMode,
    /// Block copy order within each document
    pub order: BlockOrder,
    /// Style reference handling
    pub styles: StylePolicy,
}

impl MergeOptions {
    /// Set the separator
    pub fn separator(mut self, separator: SeparatorMode) -> Self {
        self.separator = separator;
        self
    }

    /// Set the block order
    pub fn order(mut self, order: BlockOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the style policy
    pub fn styles(mut self, styles: StylePolicy) -> Self {
        self.styles = styles;
        self
    }
}
