use std::fmt;

use crate::colour::{colours, Colour};
use crate::stream::operator::{round4, LineCap, Operator};

/// The drawing mode a content stream is in, which decides the operators
/// that may appear next
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GraphicsObject {
    /// Outside any text or path object
    #[default]
    PageDescription,
    /// Between `BT` and `ET`
    Text,
    /// After a path has been started and before it is painted
    Path,
}

impl fmt::Display for GraphicsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsObject::PageDescription => f.write_str("page description mode"),
            GraphicsObject::Text => f.write_str("a text object"),
            GraphicsObject::Path => f.write_str("a path object"),
        }
    }
}

/// The font selected with `Tf`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontSelection {
    pub font: usize,
    pub size: f32,
}

/// The subset of the PDF graphics state this crate tracks. Values are kept
/// at the precision they are serialized with, so two states compare equal
/// exactly when they would produce the same bytes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraphicsState {
    pub line_width: f32,
    pub line_cap: LineCap,
    pub fill: Colour,
    pub stroke: Colour,
    pub char_spacing: f32,
    pub word_spacing: f32,
    pub leading: f32,
    pub font: Option<FontSelection>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            line_width: 1.0,
            line_cap: LineCap::Butt,
            fill: colours::BLACK,
            stroke: colours::BLACK,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
            font: None,
        }
    }
}

fn rounded(c: &Colour) -> Colour {
    match *c {
        Colour::RGB { r, g, b } => Colour::RGB {
            r: round4(r),
            g: round4(g),
            b: round4(b),
        },
        Colour::CMYK { c, m, y, k } => Colour::CMYK {
            c: round4(c),
            m: round4(m),
            y: round4(y),
            k: round4(k),
        },
        Colour::Grey { g } => Colour::Grey { g: round4(g) },
    }
}

impl GraphicsState {
    /// Apply a state-setting operator, returning whether anything changed.
    /// Operators that don't set state leave it alone and return `false`.
    pub fn apply(&mut self, op: &Operator) -> bool {
        let before = *self;
        match op {
            Operator::SetLineWidth(w) => self.line_width = round4(*w),
            Operator::SetLineCap(cap) => self.line_cap = *cap,
            Operator::SetFillColour(c) => self.fill = rounded(c),
            Operator::SetStrokeColour(c) => self.stroke = rounded(c),
            Operator::SetCharacterSpacing(v) => self.char_spacing = round4(*v),
            Operator::SetWordSpacing(v) => self.word_spacing = round4(*v),
            Operator::SetLeading(v) => self.leading = round4(*v),
            Operator::SetFont { font, size } => {
                self.font = Some(FontSelection {
                    font: *font,
                    size: round4(*size),
                })
            }
            _ => return false,
        }
        *self != before
    }

    /// Replay a serialized content stream from the initial state, honouring
    /// `q`/`Q` nesting, and return the state it ends in.
    pub fn replay(bytes: &[u8]) -> Result<GraphicsState, crate::PDFError> {
        let mut state = GraphicsState::default();
        let mut stack = Vec::new();
        for op in crate::stream::parse(bytes)? {
            match op {
                Operator::SaveState => stack.push(state),
                Operator::RestoreState => {
                    state = stack.pop().ok_or(crate::PDFError::StateStackUnderflow)?
                }
                other => {
                    state.apply(&other);
                }
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_reports_changes() {
        let mut s = GraphicsState::default();
        assert!(!s.apply(&Operator::SetFillColour(colours::BLACK)));
        assert!(s.apply(&Operator::SetFillColour(colours::RED)));
        assert!(!s.apply(&Operator::SetFillColour(Colour::new_rgb(1.0, 0.0, 0.00001))));
        assert!(!s.apply(&Operator::BeginText));
        assert!(s.apply(&Operator::SetFont { font: 1, size: 10.0 }));
        assert!(!s.apply(&Operator::SetFont { font: 1, size: 10.0 }));
    }

    #[test]
    fn replay_honours_nesting() {
        let bytes = b"1 0 0 rg\nq\n0 0 1 rg\n2 w\nQ\n3 TL\n";
        let state = GraphicsState::replay(bytes).unwrap();
        assert_eq!(state.fill, colours::RED);
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.leading, 3.0);
    }
}
