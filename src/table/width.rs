use crate::table::Column;
use crate::units::Pt;
use crate::PDFError;

const TOLERANCE: f32 = 1e-3;

/// Resolves column widths so that every column gets at least its minimum
/// while the table keeps its total width
#[derive(Debug, Copy, Clone, Default)]
pub struct CellWidthHelper;

impl CellWidthHelper {
    /// Set `actual` on every column. Columns whose content needs more than
    /// their preferred width get their minimum; the shortfall is taken from
    /// the other columns, none of which is pushed below its own minimum.
    pub fn balance(columns: &mut [Column]) -> Result<(), PDFError> {
        let shortfall: Pt = columns.iter().map(Column::deficit).sum();
        if *shortfall <= 0.0 {
            for column in columns.iter_mut() {
                column.actual = column.preferred;
            }
            return Ok(());
        }

        let mut donors: Vec<usize> = columns
            .iter()
            .filter(|c| c.minimum <= c.preferred)
            .map(|c| c.index)
            .collect();
        let slack: Pt = donors.iter().map(|&i| columns[i].slack()).sum();
        if *slack + TOLERANCE < *shortfall {
            return Err(PDFError::TableTooNarrow {
                shortfall: *(shortfall - slack),
            });
        }

        for column in columns.iter_mut().filter(|c| c.minimum > c.preferred) {
            column.actual = column.minimum;
        }

        // Donors with less slack than their share give up all of it, which
        // raises everyone else's share. Repeat until the shares settle.
        let cap = columns.len() + 1;
        let mut remaining = shortfall;
        let mut passes = 0;
        loop {
            passes += 1;
            if passes > cap {
                return Err(PDFError::ColumnBalanceDiverged { passes: cap });
            }
            if donors.is_empty() {
                break;
            }
            let share = remaining / donors.len() as f32;
            let (exhausted, rest): (Vec<usize>, Vec<usize>) = donors
                .iter()
                .partition(|&&i| columns[i].slack() < share);
            if exhausted.is_empty() {
                for &i in rest.iter() {
                    columns[i].actual = columns[i].preferred - share;
                }
                break;
            }
            for &i in exhausted.iter() {
                remaining -= columns[i].slack();
                columns[i].actual = columns[i].minimum;
            }
            donors = rest;
        }

        log::debug!(
            "balanced {} columns after {passes} passes: {:?}",
            columns.len(),
            columns.iter().map(|c| *c.actual).collect::<Vec<f32>>()
        );
        Ok(())
    }

    /// Make sure a cell spanning `span` columns fits: if its minimum is more
    /// than the spanned columns' minimums add up to, spread the difference
    /// evenly over them
    pub fn widen_for_span(columns: &mut [Column], span: std::ops::Range<usize>, minimum: Pt) {
        let count = span.len();
        if count == 0 {
            return;
        }
        let current: Pt = columns[span.clone()].iter().map(|c| c.minimum).sum();
        if minimum > current {
            let extra = (minimum - current) / count as f32;
            for column in columns[span].iter_mut() {
                column.minimum += extra;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(given: &[(f32, f32)]) -> Vec<Column> {
        given
            .iter()
            .enumerate()
            .map(|(i, &(preferred, minimum))| Column {
                index: i,
                preferred: Pt(preferred),
                minimum: Pt(minimum),
                actual: Pt(0.0),
            })
            .collect()
    }

    fn actual(columns: &[Column]) -> Vec<f32> {
        columns.iter().map(|c| *c.actual).collect()
    }

    #[test]
    fn preferred_widths_are_kept_when_they_suffice() {
        let mut cols = columns(&[(100.0, 40.0), (200.0, 200.0)]);
        CellWidthHelper::balance(&mut cols).unwrap();
        assert_eq!(actual(&cols), vec![100.0, 200.0]);
    }

    #[test]
    fn shortfall_is_shared_between_donors() {
        // column 0 needs 30 more; columns 1 and 2 each give 15
        let mut cols = columns(&[(100.0, 130.0), (100.0, 20.0), (100.0, 50.0)]);
        CellWidthHelper::balance(&mut cols).unwrap();
        assert_eq!(actual(&cols), vec![130.0, 85.0, 85.0]);
    }

    #[test]
    fn tight_donors_give_everything_they_have() {
        // column 1 can only give 5, so column 2 covers the other 55
        let mut cols = columns(&[(100.0, 160.0), (100.0, 95.0), (100.0, 10.0)]);
        CellWidthHelper::balance(&mut cols).unwrap();
        assert_eq!(actual(&cols), vec![160.0, 95.0, 45.0]);
        let total: f32 = actual(&cols).iter().sum();
        assert!((total - 300.0).abs() < 1e-3);
        for c in cols.iter() {
            assert!(c.actual >= c.minimum);
        }
    }

    #[test]
    fn too_narrow_tables_fail() {
        let mut cols = columns(&[(50.0, 120.0), (50.0, 40.0)]);
        let err = CellWidthHelper::balance(&mut cols).unwrap_err();
        assert!(matches!(err, PDFError::TableTooNarrow { shortfall } if (shortfall - 60.0).abs() < 1e-3));
        assert_eq!(err.kind(), crate::ErrorKind::Capacity);
    }

    #[test]
    fn spans_widen_their_columns() {
        let mut cols = columns(&[(50.0, 10.0), (50.0, 20.0), (50.0, 5.0)]);
        CellWidthHelper::widen_for_span(&mut cols, 0..2, Pt(50.0));
        assert_eq!(cols[0].minimum, Pt(20.0));
        assert_eq!(cols[1].minimum, Pt(30.0));
        assert_eq!(cols[2].minimum, Pt(5.0));
        // already wide enough
        CellWidthHelper::widen_for_span(&mut cols, 1..3, Pt(10.0));
        assert_eq!(cols[1].minimum, Pt(30.0));
    }
}
