//! Table elements (w:tbl, w:tr, w:tc)

mod cell;
mod row;

pub use cell::{TableCell, TableCellProperties, VMerge};
pub use row::TableRow;

use crate::error::Result;
use crate::xml::{get_w_attr, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Table element (w:tbl)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Table properties, kept raw
    pub properties: Option<RawXmlNode>,
    /// Table grid
    pub grid: Vec<GridColumn>,
    /// Table rows
    pub rows: Vec<TableRow>,
}

/// Grid column definition (w:gridCol)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridColumn {
    /// Width in twips
    pub width: Option<i32>,
}

impl Table {
    /// Create an empty `rows` x `cols` table; the grid is fixed from here on
    pub fn new(rows: usize, cols: usize) -> Self {
        let properties = RawXmlElement::new("w:tblPr").with_child(
            RawXmlElement::new("w:tblW")
                .with_attr("w:w", "0")
                .with_attr("w:type", "auto"),
        );

        Table {
            properties: Some(RawXmlNode::Element(properties)),
            grid: vec![GridColumn::default(); cols],
            rows: (0..rows).map(|_| TableRow::new(cols)).collect(),
        }
    }

    /// Parse from reader (after w:tbl start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut table = Table::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"tblPr" => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        table.properties = Some(RawXmlNode::Element(raw));
                    }
                    b"tblGrid" => table.grid = parse_table_grid(reader)?,
                    b"tr" => table.rows.push(TableRow::from_reader(reader)?),
                    // Row-level wrappers (customXml, sdt) and revisions are not modelled
                    _ => crate::xml::skip_element(reader, &e)?,
                },
                Event::End(e) if e.name().local_name().as_ref() == b"tbl" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    /// Get row count
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count: the declared grid, widened by rows that run past it
    ///
    /// Spans are clamped to the grid, so a bogus gridSpan cannot inflate it.
    pub fn column_count(&self) -> usize {
        let grid_cols = self.grid.len();
        let widest = self
            .rows
            .iter()
            .map(|row| row.grid_width(grid_cols))
            .max()
            .unwrap_or(0);
        widest.max(grid_cols)
    }

    /// Cell occupying grid position (row, col)
    ///
    /// Horizontally merged cells cover several columns; a vertical merge
    /// continuation resolves to the cell that starts the merge above it.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        let grid_cols = self.grid.len();
        let mut cell = self.rows.get(row)?.grid_cell(col, grid_cols)?;
        for above in self.rows[..row].iter().rev() {
            if !cell.is_merge_continuation() {
                break;
            }
            match above.grid_cell(col, grid_cols) {
                Some(c) => cell = c,
                None => break,
            }
        }
        Some(cell)
    }

    /// Mutable cell at (row, col) of an unmerged table
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// Set cell text at position
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.set_text(text);
        }
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;

        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }

        writer.write_event(Event::Start(BytesStart::new("w:tblGrid")))?;
        for col in &self.grid {
            let mut elem = BytesStart::new("w:gridCol");
            if let Some(w) = col.width {
                elem.push_attribute(("w:w", w.to_string().as_str()));
            }
            writer.write_event(Event::Empty(elem))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tblGrid")))?;

        for row in &self.rows {
            row.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
        Ok(())
    }
}

fn parse_table_grid<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<GridColumn>> {
    let mut columns = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.name().local_name().as_ref() == b"gridCol" => {
                let width = get_w_attr(&e, "w").and_then(|v| v.parse().ok());
                columns.push(GridColumn { width });
            }
            Event::End(e) if e.name().local_name().as_ref() == b"tblGrid" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn parse_table(xml: &str) -> Table {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().local_name().as_ref() == b"tbl" => {
                    return Table::from_reader(&mut reader).unwrap()
                }
                Event::Eof => panic!("no table in {xml}"),
                _ => {}
            }
        }
    }

    const TWO_BY_TWO: &str = r#"<w:tbl>
        <w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr>
        <w:tblGrid><w:gridCol w:w="4500"/><w:gridCol w:w="4500"/></w:tblGrid>
        <w:tr><w:tc><w:p><w:r><w:t>a1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b1</w:t></w:r></w:p></w:tc></w:tr>
        <w:tr><w:tc><w:p><w:pPr><w:jc w:val="right"/></w:pPr><w:r><w:t>a2</w:t></w:r></w:p><w:p><w:r><w:t>more</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc></w:tr>
    </w:tbl>"#;

    #[test]
    fn test_parse_table() {
        let table = parse_table(TWO_BY_TWO);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.grid[0].width, Some(4500));
        assert_eq!(table.cell(0, 1).unwrap().text(), "b1");
        assert_eq!(table.cell(1, 0).unwrap().text(), "a2\nmore");
        assert_eq!(table.cell(1, 1).unwrap().text(), "");
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_grid_span_covers_columns() {
        let table = parse_table(
            r#"<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid>
            <w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>wide</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>"#,
        );

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell(0, 0).unwrap().text(), "wide");
        assert_eq!(table.cell(0, 1).unwrap().text(), "wide");
        assert_eq!(table.cell(0, 2).unwrap().text(), "c");
    }

    #[test]
    fn test_ragged_rows_use_widest() {
        let table = parse_table(
            r#"<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr>
            <w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(table.column_count(), 3);
        assert!(table.cell(0, 2).is_none());
    }

    #[test]
    fn test_oversized_grid_span_is_clamped_to_grid() {
        let table = parse_table(
            r#"<w:tbl><w:tblGrid><w:gridCol/></w:tblGrid>
            <w:tr><w:tc><w:tcPr><w:gridSpan w:val="4000000000"/></w:tcPr><w:p><w:r><w:t>huge</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>"#,
        );

        assert_eq!(table.grid.len(), 1);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.cell(0, 0).unwrap().text(), "huge");
        assert!(table.cell(0, 1).is_none());
    }

    #[test]
    fn test_grid_span_without_grid_counts_one_column() {
        let table = parse_table(
            r#"<w:tbl><w:tr><w:tc><w:tcPr><w:gridSpan w:val="50000000"/></w:tcPr><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_vertical_merge_resolves_to_top_cell() {
        let table = parse_table(
            r#"<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>
            <w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>tall</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b1</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc><w:tc><w:p><w:r><w:t>b2</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr>
            </w:tbl>"#,
        );

        assert_eq!(table.cell(1, 0).unwrap().text(), "tall");
        assert_eq!(table.cell(2, 0).unwrap().text(), "tall");
        assert_eq!(table.cell(1, 1).unwrap().text(), "b2");
        assert_eq!(table.cell(2, 1).unwrap().text(), "");
    }

    #[test]
    fn test_vertical_merge_is_written_back() {
        let mut table = Table::new(2, 1);
        table.rows[0].cells[0].properties = Some(TableCellProperties {
            v_merge: Some(VMerge::Restart),
            ..Default::default()
        });
        table.rows[1].cells[0].properties = Some(TableCellProperties {
            v_merge: Some(VMerge::Continue),
            ..Default::default()
        });

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        table.write_to(&mut writer).unwrap();
        let xml = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(parse_table(&xml), table);
    }

    #[test]
    fn test_new_table_dimensions_and_output() {
        let mut table = Table::new(1, 2);
        table.set_cell_text(0, 1, "x");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 2);

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        table.write_to(&mut writer).unwrap();
        let xml = String::from_utf8(writer.into_inner().into_inner()).unwrap();

        assert_eq!(
            xml,
            concat!(
                r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#,
                r#"<w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>"#,
                r#"<w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr>"#,
                r#"</w:tbl>"#
            )
        );
    }
}
