use crate::PDFError;

/// One (row, column) slot of a table grid. `span` is set on every index a
/// cell covers other than its anchor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableGridIndex {
    pub row: usize,
    pub column: usize,
    pub span: bool,
}

/// Where a cell ended up: its anchor and the rectangle of indices it covers
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    pub cell: usize,
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl Placement {
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.row..self.row + self.row_span
    }

    pub fn columns(&self) -> std::ops::Range<usize> {
        self.column..self.column + self.col_span
    }

    pub fn touches_row(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }

    /// Every index the cell covers, anchor first
    pub fn indices(&self) -> Vec<TableGridIndex> {
        let mut out = Vec::with_capacity(self.row_span * self.col_span);
        for row in self.rows() {
            for column in self.columns() {
                out.push(TableGridIndex {
                    row,
                    column,
                    span: row != self.row || column != self.column,
                });
            }
        }
        out
    }
}

/// The table's cells placed onto a grid that they tile exactly
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    columns: usize,
    placements: Vec<Placement>,
    /// which cell covers each (row, column)
    owners: Vec<Vec<Option<usize>>>,
}

impl TableGrid {
    /// Place cells, given as `(row_span, col_span)` in document order, at
    /// the first index not yet covered, scanning row by row
    pub fn build(columns: usize, spans: &[(usize, usize)]) -> Result<TableGrid, PDFError> {
        if columns == 0 {
            return Err(PDFError::InvalidColumns);
        }
        let mut grid = TableGrid {
            columns,
            placements: Vec::with_capacity(spans.len()),
            owners: Vec::new(),
        };

        let (mut row, mut column) = (0, 0);
        for (cell, &(row_span, col_span)) in spans.iter().enumerate() {
            if row_span == 0 || col_span == 0 {
                return Err(PDFError::InvalidSpan {
                    cell,
                    row_span,
                    col_span,
                });
            }
            while grid.owner(row, column).is_some() {
                column += 1;
                if column == columns {
                    column = 0;
                    row += 1;
                }
            }
            if column + col_span > columns {
                return Err(PDFError::CellSpanOverflow {
                    cell,
                    column,
                    col_span,
                    columns,
                });
            }

            let placement = Placement {
                cell,
                row,
                column,
                row_span,
                col_span,
            };
            for index in placement.indices() {
                if grid.owner(index.row, index.column).is_some() {
                    return Err(PDFError::CellOverlap {
                        cell,
                        row: index.row,
                        column: index.column,
                    });
                }
            }
            for index in placement.indices() {
                grid.cover(index.row, index.column, cell);
            }
            grid.placements.push(placement);
        }

        if grid.owners.is_empty() {
            return Err(PDFError::TableIncomplete { row: 0, column: 0 });
        }
        for (r, owners) in grid.owners.iter().enumerate() {
            if let Some(c) = owners.iter().position(Option::is_none) {
                return Err(PDFError::TableIncomplete { row: r, column: c });
            }
        }
        Ok(grid)
    }

    fn cover(&mut self, row: usize, column: usize, cell: usize) {
        while self.owners.len() <= row {
            self.owners.push(vec![None; self.columns]);
        }
        self.owners[row][column] = Some(cell);
    }

    /// The cell covering an index, if any
    pub fn owner(&self, row: usize, column: usize) -> Option<usize> {
        self.owners.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn rows(&self) -> usize {
        self.owners.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Placements in cell order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, cell: usize) -> Option<&Placement> {
        self.placements.get(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn spans_push_later_cells_along() {
        // | a | b b |
        // | a | c | d |
        let grid = TableGrid::build(3, &[(2, 1), (1, 2), (1, 1), (1, 1)]).unwrap();
        let anchors: Vec<(usize, usize)> = grid
            .placements()
            .iter()
            .map(|p| (p.row, p.column))
            .collect();
        assert_eq!(anchors, vec![(0, 0), (0, 1), (1, 1), (1, 2)]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.owner(1, 0), Some(0));

        let a = grid.placements()[0].indices();
        assert!(!a[0].span);
        assert!(a[1].span);
    }

    #[test]
    fn cells_tile_the_grid() {
        let grid = TableGrid::build(3, &[(1, 3), (3, 1), (1, 1), (1, 1), (2, 2)]).unwrap();
        let mut seen = HashSet::new();
        for p in grid.placements() {
            for index in p.indices() {
                assert!(seen.insert((index.row, index.column)), "covered twice");
            }
        }
        assert_eq!(grid.rows(), 4);
        assert_eq!(seen.len(), grid.rows() * grid.columns());
    }

    #[test]
    fn configuration_errors() {
        assert!(matches!(
            TableGrid::build(2, &[(1, 1), (1, 2)]),
            Err(PDFError::CellSpanOverflow {
                cell: 1,
                column: 1,
                col_span: 2,
                columns: 2
            })
        ));
        assert!(matches!(
            TableGrid::build(2, &[(1, 1), (0, 1)]),
            Err(PDFError::InvalidSpan { cell: 1, .. })
        ));
        // the second row is missing its last cell
        let err = TableGrid::build(2, &[(1, 1), (1, 1), (1, 1)]).unwrap_err();
        assert!(matches!(err, PDFError::TableIncomplete { row: 1, column: 1 }));
        assert_eq!(
            err.to_string(),
            "table is incomplete: row 1, column 1 is not covered by any cell"
        );
        // a row span reaching into a row nobody fills
        assert!(matches!(
            TableGrid::build(2, &[(2, 1), (1, 1)]),
            Err(PDFError::TableIncomplete { row: 1, column: 1 })
        ));
        // the 2x2 cell lands on an index the row span already covers
        assert!(matches!(
            TableGrid::build(3, &[(1, 1), (2, 1), (1, 1), (2, 2)]),
            Err(PDFError::CellOverlap {
                cell: 3,
                row: 1,
                column: 1
            })
        ));
    }
}
