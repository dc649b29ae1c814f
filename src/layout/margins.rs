use crate::layout::PageSize;
use crate::rect::Rect;
use crate::units::Pt;

/// Space between the page edges and the body that content flows into.
/// Headers and footers are centred in the top and bottom margins.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins clockwise from the top, in CSS order
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// One value for top and bottom, another for left and right
    pub fn symmetric<V: Into<Pt>, H: Into<Pt>>(vertical: V, horizontal: H) -> Margins {
        let (vertical, horizontal) = (vertical.into(), horizontal.into());
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    pub fn empty() -> Margins {
        Margins::all(Pt(0.0))
    }

    /// The body of a page of the given size, in page coordinates
    pub fn body(&self, size: PageSize) -> Rect {
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: size.0 - self.right,
            y2: size.1 - self.top,
        }
    }
}

impl Default for Margins {
    /// One inch all round
    fn default() -> Self {
        Margins::all(Pt(72.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LETTER;
    use crate::units::{In, Mm};

    #[test]
    fn body_is_inside_the_margins() {
        let body = Margins::symmetric(In(1.0), Mm(25.4)).body(LETTER);
        assert_eq!(body.y2, Pt(720.0));
        assert!((*body.x1 - 72.0).abs() < 1e-3);
        assert!((*body.width() - 468.0).abs() < 1e-3);
        assert_eq!(body.height(), Pt(648.0));
    }
}
