//! Concatenating documents
//!
//! [`Merger`] copies the body of every source document into a fresh output
//! document, with a configurable separator between consecutive sources.
//!
//! ```rust,ignore
//! use docx_merge::merge::{merge_to_file, MergeOptions, SeparatorMode};
//!
//! let options = MergeOptions::default().separator(SeparatorMode::Newline);
//! let summary = merge_to_file(&["a.docx", "b.docx"], "combined.docx", &options)?;
//! println!("{} paragraphs", summary.paragraphs);
//! ```

mod copy;
mod options;

pub use options::{BlockOrder, MergeOptions, SeparatorMode, StylePolicy};

use crate::document::{BlockContent, Document};
use crate::error::{Error, Result};
use copy::{copy_paragraph, copy_table, StyleFilter};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Merges source documents into one
#[derive(Clone, Debug, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    /// Create a merger with the given options
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Build a new document from `sources`, in order
    pub fn merge(&self, sources: &[Document]) -> Result<Document> {
        if sources.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut output = Document::new();
        if self.options.styles != StylePolicy::Bare {
            if let Some(styles) = sources[0].styles() {
                output.set_styles(styles.clone());
            }
        }

        let last = sources.len() - 1;
        for (index, source) in sources.iter().enumerate() {
            if index > 0 {
                self.insert_separator(&mut output);
            }

            let styles = StyleFilter::new(self.options.styles, output.styles());
            let blocks = self.copy_blocks(source, &styles);
            log::debug!("document {}: copied {} blocks", index + 1, blocks.len());
            for block in blocks {
                output.body_mut().content.push(block);
            }

            // Trailing spacer; together with the leading one this leaves two
            // blank paragraphs between documents
            if self.options.separator == SeparatorMode::Newline && index < last {
                output.add_empty_paragraph();
            }
        }

        log::info!(
            "merged {} documents: {} paragraphs, {} tables",
            sources.len(),
            output.paragraph_count(),
            output.table_count()
        );
        Ok(output)
    }

    fn insert_separator(&self, output: &mut Document) {
        log::debug!("inserting {} separator", self.options.separator);
        match self.options.separator {
            SeparatorMode::PageBreak => output.add_page_break(),
            SeparatorMode::Newline => {
                output.add_empty_paragraph();
            }
            SeparatorMode::None => {}
        }
    }

    fn copy_blocks(&self, source: &Document, styles: &StyleFilter<'_>) -> Vec<BlockContent> {
        let mut copied = Vec::new();
        let mut skipped = 0;

        match self.options.order {
            BlockOrder::Document => {
                for block in source.blocks() {
                    match block {
                        BlockContent::Paragraph(p) => {
                            copied.push(BlockContent::Paragraph(copy_paragraph(p, styles)))
                        }
                        BlockContent::Table(t) => copied.push(BlockContent::Table(copy_table(t))),
                        BlockContent::PageBreak => copied.push(BlockContent::PageBreak),
                        BlockContent::Unknown(_) => skipped += 1,
                    }
                }
            }
            BlockOrder::ParagraphsThenTables => {
                for block in source.blocks() {
                    match block {
                        BlockContent::Paragraph(p) => {
                            copied.push(BlockContent::Paragraph(copy_paragraph(p, styles)))
                        }
                        BlockContent::PageBreak => copied.push(BlockContent::PageBreak),
                        BlockContent::Table(_) => {}
                        BlockContent::Unknown(_) => skipped += 1,
                    }
                }
                copied.extend(source.tables().map(|t| BlockContent::Table(copy_table(t))));
            }
        }

        if skipped > 0 {
            log::warn!("skipped {} unsupported block-level elements", skipped);
        }
        copied
    }
}

/// Outcome of [`merge_to_file`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of source documents
    pub documents: usize,
    /// Paragraphs in the output, separators included
    pub paragraphs: usize,
    /// Tables in the output
    pub tables: usize,
    /// Separator blocks inserted
    pub separators: usize,
    /// Destination path
    pub output: PathBuf,
}

/// Load every path, in order, and merge the documents
///
/// All sources are loaded before merging starts; the first one that cannot
/// be read is reported as [`Error::SourceUnreadable`].
pub fn merge_files<P: AsRef<Path>>(paths: &[P], options: &MergeOptions) -> Result<Document> {
    let sources = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            log::debug!("loading {}", path.display());
            Document::open(path).map_err(|e| Error::SourceUnreadable {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Merger::new(*options).merge(&sources)
}

/// Merge `paths` and write the result to `output`
///
/// The output is fully serialized, written to a temporary file beside the
/// destination and then renamed over it, so a failure at any point leaves
/// an existing file at `output` unchanged.
pub fn merge_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
    paths: &[P],
    output: Q,
    options: &MergeOptions,
) -> Result<MergeSummary> {
    let output = output.as_ref();
    let mut merged = merge_files(paths, options)?;
    let bytes = merged.to_bytes()?;

    write_atomically(output, &bytes).map_err(|source| Error::DestinationWrite {
        path: output.to_path_buf(),
        source,
    })?;
    log::info!("saved {}", output.display());

    Ok(MergeSummary {
        documents: paths.len(),
        paragraphs: merged.paragraph_count(),
        tables: merged.table_count(),
        separators: options.separator.block_count(paths.len()),
        output: output.to_path_buf(),
    })
}

fn write_atomically(output: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(output).map_err(|e| e.error)?;
    Ok(())
}
