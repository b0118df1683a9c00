//! Table row elements (w:tr)

use crate::error::Result;
use crate::xml::{RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use super::cell::TableCell;

/// Table row (w:tr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    /// Row properties, kept raw
    pub properties: Option<RawXmlNode>,
    /// Cells
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with empty cells
    pub fn new(cell_count: usize) -> Self {
        TableRow {
            cells: (0..cell_count).map(|_| TableCell::new("")).collect(),
            ..Default::default()
        }
    }

    /// Parse from reader (after w:tr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut row = TableRow::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"trPr" => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        row.properties = Some(RawXmlNode::Element(raw));
                    }
                    b"tc" => row.cells.push(TableCell::from_reader(reader)?),
                    _ => crate::xml::skip_element(reader, &e)?,
                },
                Event::Empty(e) if e.name().local_name().as_ref() == b"tc" => {
                    row.cells.push(TableCell::default());
                }
                Event::End(e) if e.name().local_name().as_ref() == b"tr" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(row)
    }

    /// Number of grid columns this row covers in a table of `grid_cols` columns
    pub fn grid_width(&self, grid_cols: usize) -> usize {
        self.spans(grid_cols).last().map_or(0, |(_, end)| end)
    }

    /// Cell covering grid column `col` in a table of `grid_cols` columns
    pub fn grid_cell(&self, col: usize, grid_cols: usize) -> Option<&TableCell> {
        self.cells
            .iter()
            .zip(self.spans(grid_cols))
            .find(|(_, (start, end))| *start <= col && col < *end)
            .map(|(cell, _)| cell)
    }

    /// (start, end) grid columns of each cell, in order
    ///
    /// A span never reaches past the declared grid; a cell starting beyond
    /// it, or any cell of a table without a grid, covers one column.
    fn spans(&self, grid_cols: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut start = 0;
        self.cells.iter().map(move |cell| {
            let remaining = grid_cols.saturating_sub(start);
            let width = cell.span().min(remaining).max(1);
            let range = (start, start + width);
            start += width;
            range
        })
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;

        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }
        for cell in &self.cells {
            cell.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
        Ok(())
    }
}
