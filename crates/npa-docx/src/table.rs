//! Tables: column spans become `gridSpan`, row spans become `vMerge`

use npa_render::{Cell, CoverField, Table};

use crate::body::{write_paragraph, Paragraph, RunContext, RunStyle};
use crate::error::Result;
use crate::xml::XmlWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMerge {
    None,
    Restart,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub span: u16,
    pub merge: VerticalMerge,
    pub shaded: bool,
    pub paragraph: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// Repeated at the top of every page
    pub header: bool,
    pub cells: Vec<GridCell>,
}

/// Lay the rendered rows onto the column grid
///
/// Columns still covered by a row span from above get a `Continue` cell;
/// rows that come up short are padded with empty cells.
pub fn grid_rows(table: &Table) -> Vec<GridRow> {
    let columns = usize::from(table.columns.max(1));
    // remaining rows and span of the cell that started at each column
    let mut covered: Vec<(u16, u16)> = vec![(0, 0); columns];
    let mut rows = Vec::new();

    let sections = [
        (&table.header, true, true),
        (&table.body, false, false),
        (&table.footer, false, true),
    ];
    for (source, header, shaded) in sections {
        for row in source {
            rows.push(GridRow {
                header,
                cells: lay_row(row, columns, &mut covered, shaded),
            });
        }
    }
    rows
}

fn lay_row(row: &[Cell], columns: usize, covered: &mut [(u16, u16)], shaded: bool) -> Vec<GridCell> {
    let mut cells = Vec::new();
    let mut source = row.iter();
    let mut column = 0;

    while column < columns {
        let (remaining, span) = covered[column];
        if remaining > 0 {
            covered[column].0 -= 1;
            cells.push(GridCell {
                span,
                merge: VerticalMerge::Continue,
                shaded,
                paragraph: Paragraph::new(),
            });
            column += usize::from(span.max(1));
            continue;
        }

        let Some(cell) = source.next() else {
            cells.push(GridCell {
                span: 1,
                merge: VerticalMerge::None,
                shaded,
                paragraph: Paragraph::new(),
            });
            column += 1;
            continue;
        };

        let span = cell.span.clamp(1, (columns - column) as u16);
        let merge = if cell.row_span > 1 {
            covered[column] = (cell.row_span - 1, span);
            VerticalMerge::Restart
        } else {
            VerticalMerge::None
        };
        let style = RunStyle {
            bold: cell.bold,
            ..RunStyle::default()
        };
        cells.push(GridCell {
            span,
            merge,
            shaded,
            paragraph: Paragraph::new().aligned(cell.align).with_text(&cell.text, style),
        });
        column += usize::from(span);
    }

    if source.next().is_some() {
        tracing::warn!(columns, "table row has more cells than columns");
    }
    cells
}

/// Write a bordered table spanning `width` twips with equal columns
pub fn write_table(
    xml: &mut XmlWriter,
    table: &Table,
    width: u32,
    context: &mut RunContext<'_>,
) -> Result<()> {
    let columns = u32::from(table.columns.max(1));
    let column_width = width / columns;

    xml.start("w:tbl", &[])?;
    xml.start("w:tblPr", &[])?;
    xml.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
    xml.empty("w:tblW", &[("w:w", width.to_string().as_str()), ("w:type", "dxa")])?;
    xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
    xml.end("w:tblPr")?;

    xml.start("w:tblGrid", &[])?;
    for _ in 0..columns {
        xml.empty("w:gridCol", &[("w:w", column_width.to_string().as_str())])?;
    }
    xml.end("w:tblGrid")?;

    for row in grid_rows(table) {
        xml.start("w:tr", &[])?;
        if row.header {
            xml.start("w:trPr", &[])?;
            xml.empty("w:tblHeader", &[])?;
            xml.end("w:trPr")?;
        }
        for cell in &row.cells {
            write_cell(xml, cell, column_width, context)?;
        }
        xml.end("w:tr")?;
    }
    xml.end("w:tbl")
}

fn write_cell(
    xml: &mut XmlWriter,
    cell: &GridCell,
    column_width: u32,
    context: &mut RunContext<'_>,
) -> Result<()> {
    let width = column_width * u32::from(cell.span.max(1));
    xml.start("w:tc", &[])?;
    xml.start("w:tcPr", &[])?;
    xml.empty("w:tcW", &[("w:w", width.to_string().as_str()), ("w:type", "dxa")])?;
    if cell.span > 1 {
        xml.empty("w:gridSpan", &[("w:val", cell.span.to_string().as_str())])?;
    }
    match cell.merge {
        VerticalMerge::Restart => xml.empty("w:vMerge", &[("w:val", "restart")])?,
        VerticalMerge::Continue => xml.empty("w:vMerge", &[])?,
        VerticalMerge::None => {}
    }
    if cell.shaded {
        xml.empty(
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", "F0F0F0")],
        )?;
    }
    xml.empty("w:vAlign", &[("w:val", "center")])?;
    xml.end("w:tcPr")?;
    // every cell needs at least one paragraph
    write_paragraph(xml, &cell.paragraph, context)?;
    xml.end("w:tc")
}

/// Two-column label/value table of the cover page
pub fn cover_table(fields: &[CoverField]) -> Table {
    Table {
        columns: 2,
        header: Vec::new(),
        body: fields
            .iter()
            .map(|field| {
                vec![
                    Cell::header(field.label.clone()),
                    Cell::text(field.lines.join("\n")),
                ]
            })
            .collect(),
        footer: Vec::new(),
    }
}
