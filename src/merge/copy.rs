//! Copy rules from a source tree into the output tree
//!
//! Only explicitly set attributes are carried over. An attribute the source
//! leaves unset stays unset in the copy, so it keeps inheriting from styles.

use crate::document::{Paragraph, Run, StyleSheet, Table};
use crate::merge::StylePolicy;

/// Decides which paragraph style references survive the copy
#[derive(Clone, Copy, Debug)]
pub(crate) struct StyleFilter<'a> {
    policy: StylePolicy,
    sheet: Option<&'a StyleSheet>,
}

impl<'a> StyleFilter<'a> {
    pub(crate) fn new(policy: StylePolicy, sheet: Option<&'a StyleSheet>) -> Self {
        Self { policy, sheet }
    }

    /// Style id to write for a source reference, or `None` to leave it unset
    fn resolve<'s>(&self, style_id: &'s str) -> Option<&'s str>
    where
        'a: 's,
    {
        match self.policy {
            StylePolicy::Verbatim | StylePolicy::Bare => Some(style_id),
            StylePolicy::DropUnknown => {
                let sheet = self.sheet?;
                if sheet.contains(style_id) {
                    Some(style_id)
                } else {
                    sheet.default_paragraph_style()
                }
            }
        }
    }
}

/// Copy a paragraph: style, explicit alignment and every run in reading order
///
/// Runs inside hyperlinks are copied as plain runs; the link target is lost.
pub(crate) fn copy_paragraph(source: &Paragraph, styles: &StyleFilter<'_>) -> Paragraph {
    let mut para = Paragraph::default();

    if let Some(style) = source.style() {
        match styles.resolve(style) {
            Some(id) if id == style => para.set_style(id),
            Some(fallback) => {
                log::warn!("undefined paragraph style '{}', using '{}'", style, fallback);
                para.set_style(fallback);
            }
            None => log::warn!("dropping reference to undefined paragraph style '{}'", style),
        }
    }
    if let Some(alignment) = source.alignment() {
        para.set_alignment(alignment);
    }

    for run in source.all_runs() {
        para.add_run(copy_run(run));
    }

    para
}

/// Copy a run's text and its explicitly set character formatting
pub(crate) fn copy_run(source: &Run) -> Run {
    let mut run = Run::new(source.text());

    if let Some(bold) = source.bold() {
        run.set_bold(bold);
    }
    if let Some(italic) = source.italic() {
        run.set_italic(italic);
    }
    if let Some(underline) = source.underline() {
        run.set_underline(underline);
    }
    if let Some(font) = source.font_name() {
        run.set_font_name(font);
    }
    if let Some(size) = source.font_size_half_points() {
        run.set_font_size_half_points(size);
    }
    if let Some(color) = source.color_rgb() {
        run.set_color_rgb(color);
    }

    run
}

/// Copy a table as a grid of flattened cell text
///
/// Each cell keeps its text and the alignment of its first paragraph. Run
/// formatting and paragraph structure inside cells are not carried over.
pub(crate) fn copy_table(source: &Table) -> Table {
    let rows = source.row_count();
    let cols = source.column_count();
    let mut table = Table::new(rows, cols);

    for r in 0..rows {
        for c in 0..cols {
            let Some(src_cell) = source.cell(r, c) else {
                continue;
            };
            if let Some(cell) = table.cell_mut(r, c) {
                cell.set_text(src_cell.text());
                if let Some(alignment) = src_cell.alignment() {
                    cell.set_alignment(alignment);
                }
            }
        }
    }

    table
}
