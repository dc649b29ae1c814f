//! Table layout: cells are placed on a grid, columns are sized from their
//! content and balanced against the table width, rows are sized from the
//! shaped cells, and the rows are cut into chunks that pages take whole.

mod cell;
mod chunk;
mod column;
mod grid;
mod width;

pub use cell::*;
pub use chunk::*;
pub use column::*;
pub use grid::*;
pub use width::*;

use id_arena::Arena;

use crate::font::Font;
use crate::layout::LayoutContext;
use crate::model::Table;
use crate::stream::Operator;
use crate::units::Pt;
use crate::PDFError;

/// A table with every column, row and cell sized, ready to be drawn chunk
/// by chunk
#[derive(Debug, Clone)]
pub struct TableModel<'a> {
    grid: TableGrid,
    columns: Vec<Column>,
    rows: Vec<Row>,
    cells: Vec<CellLayout<'a>>,
    width: Pt,
    next_row: usize,
    keep_together: bool,
}

impl<'a> TableModel<'a> {
    /// Lay out `table` within `available` width
    pub fn new(
        table: &'a Table,
        available: Pt,
        ctx: &LayoutContext<'a>,
    ) -> Result<TableModel<'a>, PDFError> {
        let total: f32 = table.columns.iter().sum();
        let sane = |v: f32| v.is_finite() && v >= 0.0;
        if table.columns.is_empty()
            || !table.columns.iter().all(|&c| sane(c))
            || total <= 0.0
            || !sane(table.width_percent)
            || table.width_percent == 0.0
        {
            return Err(PDFError::InvalidColumns);
        }

        let width = available * (table.width_percent / 100.0);
        let spans: Vec<(usize, usize)> = table
            .cells
            .iter()
            .map(|c| (c.row_span, c.col_span))
            .collect();
        let grid = TableGrid::build(table.columns.len(), &spans)?;

        let mut columns: Vec<Column> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, share)| Column::new(i, width * (share / total)))
            .collect();

        let mut cells = grid
            .placements()
            .iter()
            .map(|p| CellLayout::new(&table.cells[p.cell], *p, ctx.default_font))
            .collect::<Result<Vec<_>, PDFError>>()?;

        let mut spanning = Vec::new();
        for cell in cells.iter() {
            let placement = cell.placement();
            let minimum = cell.min_width(ctx.fonts)?;
            if placement.col_span == 1 {
                let column = &mut columns[placement.column];
                column.minimum = column.minimum.max(minimum);
            } else {
                spanning.push((placement.columns(), minimum));
            }
        }
        for (span, minimum) in spanning {
            CellWidthHelper::widen_for_span(&mut columns, span, minimum);
        }
        CellWidthHelper::balance(&mut columns)?;

        for cell in cells.iter_mut() {
            let width = columns[cell.placement().columns()]
                .iter()
                .map(|c| c.actual)
                .sum();
            cell.shape(width, ctx.fonts, ctx.hyphenator)?;
        }

        let rows = size_rows(grid.rows(), &mut cells);
        log::debug!(
            "table of {} columns and {} rows is {:.2}pt wide and {:.2}pt tall",
            columns.len(),
            rows.len(),
            *width,
            *rows.iter().map(|r| r.height).sum::<Pt>()
        );

        Ok(TableModel {
            grid,
            columns,
            rows,
            cells,
            width,
            next_row: 0,
            keep_together: table.keep_together,
        })
    }

    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cells(&self) -> &[CellLayout<'a>] {
        &self.cells
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn keep_together(&self) -> bool {
        self.keep_together
    }

    pub fn set_keep_together(&mut self, keep_together: bool) {
        self.keep_together = keep_together;
    }

    /// All rows have been drawn
    pub fn is_done(&self) -> bool {
        self.next_row >= self.rows.len()
    }

    /// The chunks still to be drawn
    pub fn chunks(&self) -> Vec<TableChunk> {
        chunk_rows(&self.grid, &self.rows, self.next_row, self.keep_together)
    }

    /// The chunk that will be drawn next
    pub fn next_chunk(&self) -> Option<TableChunk> {
        if self.is_done() {
            None
        } else if self.keep_together {
            self.chunks().into_iter().next()
        } else {
            Some(chunk_from(&self.grid, &self.rows, self.next_row))
        }
    }

    /// Height of everything not yet drawn
    pub fn remaining_height(&self) -> Pt {
        self.rows[self.next_row.min(self.rows.len())..]
            .iter()
            .map(|r| r.height)
            .sum()
    }

    /// Draw the next chunk with the table's upper-left corner at
    /// (`left`, `top`)
    pub fn render_next(
        &mut self,
        left: Pt,
        top: Pt,
        fonts: &Arena<Font>,
    ) -> Result<Option<(TableChunk, Vec<Operator>)>, PDFError> {
        let Some(chunk) = self.next_chunk() else {
            return Ok(None);
        };

        let mut ops = Vec::new();
        for &index in chunk.cells.iter() {
            let placement = *self.cells[index].placement();
            let x = left
                + self.columns[..placement.column]
                    .iter()
                    .map(|c| c.actual)
                    .sum::<Pt>();
            let y = top
                - self.rows[chunk.rows.start..placement.row]
                    .iter()
                    .map(|r| r.height)
                    .sum::<Pt>();
            ops.extend(self.cells[index].render(x, y, fonts)?);
        }

        self.next_row = chunk.rows.end;
        Ok(Some((chunk, ops)))
    }
}

/// Row heights in three passes: cells spanning one row set their row's
/// height, cells spanning several rows spread whatever they still need
/// evenly over them, then every cell is given the height of its rows
fn size_rows(count: usize, cells: &mut [CellLayout]) -> Vec<Row> {
    let mut rows: Vec<Row> = (0..count)
        .map(|index| Row {
            index,
            height: Pt(0.0),
        })
        .collect();

    for cell in cells.iter().filter(|c| c.placement().row_span == 1) {
        let row = &mut rows[cell.placement().row];
        row.height = row.height.max(cell.min_height());
    }

    for cell in cells.iter().filter(|c| c.placement().row_span > 1) {
        let span = cell.placement().rows();
        let current: Pt = rows[span.clone()].iter().map(|r| r.height).sum();
        if cell.min_height() > current {
            let extra = (cell.min_height() - current) / span.len() as f32;
            for row in rows[span].iter_mut() {
                row.height += extra;
            }
        }
    }

    for cell in cells.iter_mut() {
        let height = rows[cell.placement().rows()].iter().map(|r| r.height).sum();
        cell.set_height(height);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{SpanFont, StandardFont};
    use crate::model::Cell;
    use crate::text::Hyphenator;

    fn context(fonts: &Arena<Font>) -> LayoutContext<'_> {
        let id = fonts.iter().next().map(|(id, _)| id).unwrap();
        LayoutContext {
            fonts,
            hyphenator: Hyphenator::english(),
            default_font: SpanFont::new(id, Pt(10.0)),
        }
    }

    #[test]
    fn percentages_become_widths() {
        let mut fonts: Arena<Font> = Arena::new();
        fonts.alloc(StandardFont::Courier.into());
        let ctx = context(&fonts);
        let table = Table::new(vec![1.0, 3.0])
            .with_width_percent(50.0)
            .push(Cell::from_text("a"))
            .push(Cell::from_text("b"));
        let model = TableModel::new(&table, Pt(400.0), &ctx).unwrap();
        assert_eq!(model.width(), Pt(200.0));
        assert_eq!(model.columns()[0].actual, Pt(50.0));
        assert_eq!(model.columns()[1].actual, Pt(150.0));
        assert_eq!(model.rows().len(), 1);
    }

    #[test]
    fn row_spans_inflate_rows() {
        let mut fonts: Arena<Font> = Arena::new();
        fonts.alloc(StandardFont::Courier.into());
        let ctx = context(&fonts);
        // four lines on the left against one line per row on the right
        let table = Table::new(vec![1.0, 1.0])
            .push(Cell::from_text("a\nb\nc\nd").with_span(2, 1))
            .push(Cell::from_text("x"))
            .push(Cell::from_text("y"));
        let model = TableModel::new(&table, Pt(200.0), &ctx).unwrap();
        let rows: Vec<f32> = model.rows().iter().map(|r| *r.height).collect();
        // the span needs 52 but its two rows only give 32
        assert!((rows[0] - 26.0).abs() < 1e-3);
        assert!((rows[1] - 26.0).abs() < 1e-3);
        assert!((*model.cells()[1].height() - 26.0).abs() < 1e-3);
        assert!((*model.cells()[0].height() - 52.0).abs() < 1e-3);
    }

    #[test]
    fn bad_columns() {
        let mut fonts: Arena<Font> = Arena::new();
        fonts.alloc(StandardFont::Courier.into());
        let ctx = context(&fonts);
        let table = Table::new(vec![]).push(Cell::from_text("a"));
        assert!(matches!(
            TableModel::new(&table, Pt(100.0), &ctx),
            Err(PDFError::InvalidColumns)
        ));
        let table = Table::new(vec![0.0, 0.0]).push(Cell::from_text("a"));
        assert!(matches!(
            TableModel::new(&table, Pt(100.0), &ctx),
            Err(PDFError::InvalidColumns)
        ));
    }

    #[test]
    fn renders_chunk_by_chunk() {
        let mut fonts: Arena<Font> = Arena::new();
        fonts.alloc(StandardFont::Courier.into());
        let ctx = context(&fonts);
        let table = Table::new(vec![1.0, 1.0])
            .push(Cell::from_text("a"))
            .push(Cell::from_text("b"))
            .push(Cell::from_text("c"))
            .push(Cell::from_text("d"));
        let mut model = TableModel::new(&table, Pt(100.0), &ctx).unwrap();
        assert_eq!(model.chunks().len(), 2);

        let (chunk, ops) = model.render_next(Pt(0.0), Pt(500.0), &fonts).unwrap().unwrap();
        assert_eq!(chunk.rows, 0..1);
        assert_eq!(chunk.cells, vec![0, 1]);
        assert_eq!(
            ops.iter().filter(|o| **o == Operator::BeginText).count(),
            2
        );
        let second = model.cells()[1].rect().unwrap();
        assert_eq!(second.x1, Pt(50.0));
        assert_eq!(second.y2, Pt(500.0));

        model.set_keep_together(true);
        assert_eq!(model.chunks().len(), 1);
        assert!(model.render_next(Pt(0.0), Pt(400.0), &fonts).unwrap().is_some());
        assert!(model.is_done());
        assert!(model.render_next(Pt(0.0), Pt(300.0), &fonts).unwrap().is_none());
    }
}
