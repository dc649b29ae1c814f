use crate::units::Pt;

/// A table column's widths: what the table asked for, what its content
/// needs, and what it finally got
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Column {
    pub index: usize,
    pub preferred: Pt,
    pub minimum: Pt,
    pub actual: Pt,
}

impl Column {
    pub fn new(index: usize, preferred: Pt) -> Column {
        Column {
            index,
            preferred,
            minimum: Pt(0.0),
            actual: preferred,
        }
    }

    /// Width the column can give up without dropping below its minimum
    pub fn slack(&self) -> Pt {
        (self.preferred - self.minimum).non_negative()
    }

    /// Width the column needs on top of its preferred width
    pub fn deficit(&self) -> Pt {
        (self.minimum - self.preferred).non_negative()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Row {
    pub index: usize,
    pub height: Pt,
}
