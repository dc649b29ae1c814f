use std::collections::VecDeque;
use std::ops::Range;

use crate::table::{Row, TableGrid};
use crate::units::Pt;

/// Rows that have to land on the same page, with the cells anchored in them
#[derive(Debug, Clone, PartialEq)]
pub struct TableChunk {
    pub rows: Range<usize>,
    pub height: Pt,
    pub cells: Vec<usize>,
}

impl TableChunk {
    fn new(grid: &TableGrid, rows: &[Row], range: Range<usize>) -> TableChunk {
        let height = rows[range.clone()].iter().map(|r| r.height).sum();
        let cells = grid
            .placements()
            .iter()
            .filter(|p| range.contains(&p.row))
            .map(|p| p.cell)
            .collect();
        TableChunk {
            rows: range,
            height,
            cells,
        }
    }
}

/// The chunk starting at row `start`: every row reachable from it through
/// cells that span rows
pub fn chunk_from(grid: &TableGrid, rows: &[Row], start: usize) -> TableChunk {
    let mut last = start;
    let mut visited = vec![false; grid.rows()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(row) = queue.pop_front() {
        for placement in grid.placements().iter().filter(|p| p.touches_row(row)) {
            for linked in placement.rows() {
                if !visited[linked] {
                    visited[linked] = true;
                    last = last.max(linked);
                    queue.push_back(linked);
                }
            }
        }
    }

    TableChunk::new(grid, rows, start..last + 1)
}

/// Split the rows from `start` on into chunks. A table kept together is a
/// single chunk.
pub fn chunk_rows(
    grid: &TableGrid,
    rows: &[Row],
    start: usize,
    keep_together: bool,
) -> Vec<TableChunk> {
    if start >= grid.rows() {
        return Vec::new();
    }
    if keep_together {
        return vec![TableChunk::new(grid, rows, start..grid.rows())];
    }
    let mut chunks = Vec::new();
    let mut next = start;
    while next < grid.rows() {
        let chunk = chunk_from(grid, rows, next);
        next = chunk.rows.end;
        chunks.push(chunk);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(heights: &[f32]) -> Vec<Row> {
        heights
            .iter()
            .enumerate()
            .map(|(index, &h)| Row {
                index,
                height: Pt(h),
            })
            .collect()
    }

    #[test]
    fn spans_link_rows() {
        // row 0 | a | b |
        // row 1 | c | d |   d spans rows 1-2
        // row 2 | e | d |
        // row 3 | f | g |
        let grid =
            TableGrid::build(2, &[(1, 1), (1, 1), (1, 1), (2, 1), (1, 1), (1, 1), (1, 1)])
                .unwrap();
        let rows = rows(&[10.0, 20.0, 30.0, 40.0]);
        let chunks = chunk_rows(&grid, &rows, 0, false);
        let ranges: Vec<Range<usize>> = chunks.iter().map(|c| c.rows.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..3, 3..4]);
        assert_eq!(chunks[1].height, Pt(50.0));
        assert_eq!(chunks[1].cells, vec![2, 3, 4]);

        let whole = chunk_rows(&grid, &rows, 1, true);
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].rows, 1..4);
        assert_eq!(whole[0].height, Pt(90.0));
        assert!(chunk_rows(&grid, &rows, 4, false).is_empty());
    }

    #[test]
    fn chained_spans_form_one_chunk() {
        // a spans rows 0-1, b spans rows 1-2
        let grid = TableGrid::build(2, &[(2, 1), (1, 1), (2, 1), (1, 1)]).unwrap();
        let rows = rows(&[5.0, 5.0, 5.0]);
        let chunks = chunk_rows(&grid, &rows, 0, false);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].rows, 0..3);
    }
}
