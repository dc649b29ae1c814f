//! Length units. Everything is measured in PDF points internally; inches and
//! millimetres convert into points.

use derive_more::{
    Add, AddAssign, Deref, DerefMut, Display, Div, From, Into, Mul, MulAssign, Neg, Sub,
    SubAssign, Sum,
};

/// A length in PDF points (1/72 of an inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    Neg,
    Sum,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct In(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl Pt {
    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    /// Clamp negative lengths to zero
    pub fn non_negative(self) -> Pt {
        Pt(self.0.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Pt::from(In(1.0)), Pt(72.0));
        assert!((*Pt::from(Mm(25.4)) - 72.0).abs() < 1e-4);
    }

    #[test]
    fn arithmetic() {
        let a = Pt(10.0) + Pt(2.5) - Pt(0.5);
        assert_eq!(a, Pt(12.0));
        assert_eq!(a * 2.0, Pt(24.0));
        assert_eq!(a / 4.0, Pt(3.0));
        let total: Pt = vec![Pt(1.0), Pt(2.0), Pt(3.0)].into_iter().sum();
        assert_eq!(total, Pt(6.0));
        assert_eq!(Pt(-3.0).non_negative(), Pt(0.0));
        assert_eq!(-a, Pt(-12.0));
    }
}
