//! The content stream operators this crate emits (ISO 32000-1 §8-9), as data.
//!
//! Which operators are legal where is expressed as tables over
//! [GraphicsObject] rather than behaviour on the operators themselves, so
//! adding an operator forces every match below to be revisited.

use std::fmt;
use std::io::Write;

use crate::colour::Colour;
use crate::stream::GraphicsObject;

/// Line cap style for stroked paths (`J`)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt = 0,
    Round = 1,
    Square = 2,
}

impl LineCap {
    pub(crate) fn from_code(code: i64) -> Option<LineCap> {
        match code {
            0 => Some(LineCap::Butt),
            1 => Some(LineCap::Round),
            2 => Some(LineCap::Square),
            _ => None,
        }
    }
}

/// A string operand for `Tj`. Single-byte fonts are written as literal
/// strings, glyph-id encoded fonts as hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextString {
    Literal(Vec<u8>),
    Hex(Vec<u8>),
}

impl TextString {
    pub fn bytes(&self) -> &[u8] {
        match self {
            TextString::Literal(b) | TextString::Hex(b) => b,
        }
    }

    fn concat(&self, other: &TextString) -> Option<TextString> {
        match (self, other) {
            (TextString::Literal(a), TextString::Literal(b)) => {
                Some(TextString::Literal([a.as_slice(), b.as_slice()].concat()))
            }
            (TextString::Hex(a), TextString::Hex(b)) => {
                Some(TextString::Hex([a.as_slice(), b.as_slice()].concat()))
            }
            _ => None,
        }
    }
}

/// The operator families of the content stream grammar
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperatorCategory {
    GeneralGraphicsState,
    SpecialGraphicsState,
    Colour,
    TextState,
    TextObject,
    TextPositioning,
    TextShowing,
    PathConstruction,
    PathPainting,
}

impl OperatorCategory {
    /// Operators in these categories only change the graphics state, so
    /// they can be dropped when they would not change it.
    pub fn sets_state(self) -> bool {
        matches!(
            self,
            OperatorCategory::GeneralGraphicsState
                | OperatorCategory::Colour
                | OperatorCategory::TextState
        )
    }
}

/// A single content stream operator together with its operands
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `w`
    SetLineWidth(f32),
    /// `J`
    SetLineCap(LineCap),
    /// `q`
    SaveState,
    /// `Q`
    RestoreState,
    /// `cm`
    Transform([f32; 6]),
    /// `rg`, `g` or `k` depending on the colour space
    SetFillColour(Colour),
    /// `RG`, `G` or `K` depending on the colour space
    SetStrokeColour(Colour),
    /// `Tc`
    SetCharacterSpacing(f32),
    /// `Tw`
    SetWordSpacing(f32),
    /// `TL`
    SetLeading(f32),
    /// `Tf`, where `font` is the document font index (resource `/F{font}`)
    SetFont { font: usize, size: f32 },
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `Td`
    MoveText(f32, f32),
    /// `Tm`
    SetTextMatrix([f32; 6]),
    /// `T*`
    NextLine,
    /// `Tj`
    ShowText(TextString),
    /// `m`
    MoveTo(f32, f32),
    /// `l`
    LineTo(f32, f32),
    /// `c`
    CurveTo([f32; 6]),
    /// `re`
    Rectangle(f32, f32, f32, f32),
    /// `h`
    ClosePath,
    /// `S`
    Stroke,
    /// `s`
    CloseStroke,
    /// `f`
    Fill,
    /// `B`
    FillStroke,
    /// `n`
    EndPath,
}

/// What to do with the previous operator when a new one arrives
#[derive(Debug, Clone, PartialEq)]
pub enum Collapse {
    /// Append the new operator as usual
    Keep,
    /// Replace the previous operator with this one and drop the new one
    Merge(Operator),
    /// The two operators annul each other; drop both
    Cancel,
}

use GraphicsObject::{PageDescription, Path, Text};

impl Operator {
    /// The operator keyword as it appears in the stream
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Operator::SetLineWidth(_) => "w",
            Operator::SetLineCap(_) => "J",
            Operator::SaveState => "q",
            Operator::RestoreState => "Q",
            Operator::Transform(_) => "cm",
            Operator::SetFillColour(Colour::RGB { .. }) => "rg",
            Operator::SetFillColour(Colour::Grey { .. }) => "g",
            Operator::SetFillColour(Colour::CMYK { .. }) => "k",
            Operator::SetStrokeColour(Colour::RGB { .. }) => "RG",
            Operator::SetStrokeColour(Colour::Grey { .. }) => "G",
            Operator::SetStrokeColour(Colour::CMYK { .. }) => "K",
            Operator::SetCharacterSpacing(_) => "Tc",
            Operator::SetWordSpacing(_) => "Tw",
            Operator::SetLeading(_) => "TL",
            Operator::SetFont { .. } => "Tf",
            Operator::BeginText => "BT",
            Operator::EndText => "ET",
            Operator::MoveText(..) => "Td",
            Operator::SetTextMatrix(_) => "Tm",
            Operator::NextLine => "T*",
            Operator::ShowText(_) => "Tj",
            Operator::MoveTo(..) => "m",
            Operator::LineTo(..) => "l",
            Operator::CurveTo(_) => "c",
            Operator::Rectangle(..) => "re",
            Operator::ClosePath => "h",
            Operator::Stroke => "S",
            Operator::CloseStroke => "s",
            Operator::Fill => "f",
            Operator::FillStroke => "B",
            Operator::EndPath => "n",
        }
    }

    pub fn category(&self) -> OperatorCategory {
        use OperatorCategory::*;
        match self {
            Operator::SetLineWidth(_) | Operator::SetLineCap(_) => GeneralGraphicsState,
            Operator::SaveState | Operator::RestoreState | Operator::Transform(_) => {
                SpecialGraphicsState
            }
            Operator::SetFillColour(_) | Operator::SetStrokeColour(_) => Colour,
            Operator::SetCharacterSpacing(_)
            | Operator::SetWordSpacing(_)
            | Operator::SetLeading(_)
            | Operator::SetFont { .. } => TextState,
            Operator::BeginText | Operator::EndText => TextObject,
            Operator::MoveText(..) | Operator::SetTextMatrix(_) | Operator::NextLine => {
                TextPositioning
            }
            Operator::ShowText(_) => TextShowing,
            Operator::MoveTo(..)
            | Operator::LineTo(..)
            | Operator::CurveTo(_)
            | Operator::Rectangle(..)
            | Operator::ClosePath => PathConstruction,
            Operator::Stroke
            | Operator::CloseStroke
            | Operator::Fill
            | Operator::FillStroke
            | Operator::EndPath => PathPainting,
        }
    }

    /// The graphics objects in which this operator may appear
    pub fn legal_modes(&self) -> &'static [GraphicsObject] {
        match self {
            Operator::BeginText => &[PageDescription],
            // `m` and `re` both open a path object and extend an open one
            Operator::MoveTo(..) | Operator::Rectangle(..) => &[PageDescription, Path],
            other => match other.category() {
                OperatorCategory::GeneralGraphicsState
                | OperatorCategory::Colour
                | OperatorCategory::TextState => &[PageDescription, Text],
                OperatorCategory::SpecialGraphicsState => &[PageDescription],
                OperatorCategory::TextObject
                | OperatorCategory::TextPositioning
                | OperatorCategory::TextShowing => &[Text],
                OperatorCategory::PathConstruction | OperatorCategory::PathPainting => &[Path],
            },
        }
    }

    pub fn is_legal_in(&self, mode: GraphicsObject) -> bool {
        self.legal_modes().contains(&mode)
    }

    /// The graphics object the stream is in after this operator
    pub fn transition(&self, mode: GraphicsObject) -> GraphicsObject {
        match self {
            Operator::BeginText => Text,
            Operator::EndText => PageDescription,
            Operator::MoveTo(..) | Operator::Rectangle(..) => Path,
            other if other.category() == OperatorCategory::PathPainting => PageDescription,
            _ => mode,
        }
    }

    /// Decide whether `next`, arriving straight after `self`, can be folded
    /// into it
    pub fn collapse(&self, next: &Operator) -> Collapse {
        match (self, next) {
            (Operator::MoveText(a, b), Operator::MoveText(c, d)) => {
                let (x, y) = (a + c, b + d);
                if x == 0.0 && y == 0.0 {
                    Collapse::Cancel
                } else {
                    Collapse::Merge(Operator::MoveText(x, y))
                }
            }
            (Operator::SetTextMatrix(m), Operator::MoveText(tx, ty)) => {
                Collapse::Merge(Operator::SetTextMatrix([
                    m[0],
                    m[1],
                    m[2],
                    m[3],
                    tx * m[0] + ty * m[2] + m[4],
                    tx * m[1] + ty * m[3] + m[5],
                ]))
            }
            (Operator::SetTextMatrix(_), Operator::SetTextMatrix(m)) => {
                Collapse::Merge(Operator::SetTextMatrix(*m))
            }
            (Operator::ShowText(a), Operator::ShowText(b)) => match a.concat(b) {
                Some(joined) => Collapse::Merge(Operator::ShowText(joined)),
                None => Collapse::Keep,
            },
            (Operator::SaveState, Operator::RestoreState) => Collapse::Cancel,
            (Operator::SetFillColour(_), Operator::SetFillColour(_))
            | (Operator::SetStrokeColour(_), Operator::SetStrokeColour(_))
            | (Operator::SetCharacterSpacing(_), Operator::SetCharacterSpacing(_))
            | (Operator::SetWordSpacing(_), Operator::SetWordSpacing(_))
            | (Operator::SetLeading(_), Operator::SetLeading(_))
            | (Operator::SetFont { .. }, Operator::SetFont { .. })
            | (Operator::SetLineWidth(_), Operator::SetLineWidth(_))
            | (Operator::SetLineCap(_), Operator::SetLineCap(_)) => Collapse::Merge(next.clone()),
            _ => Collapse::Keep,
        }
    }

    /// Write the operator as a single line of the content stream
    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self {
            Operator::SetLineWidth(v)
            | Operator::SetCharacterSpacing(v)
            | Operator::SetWordSpacing(v)
            | Operator::SetLeading(v) => write!(w, "{}", Num(*v))?,
            Operator::SetLineCap(cap) => write!(w, "{}", *cap as u8)?,
            Operator::Transform(m) | Operator::SetTextMatrix(m) | Operator::CurveTo(m) => {
                write_numbers(w, m)?
            }
            Operator::SetFillColour(c) | Operator::SetStrokeColour(c) => {
                write_numbers(w, &c.components())?
            }
            Operator::SetFont { font, size } => write!(w, "/F{font} {}", Num(*size))?,
            Operator::MoveText(x, y) | Operator::MoveTo(x, y) | Operator::LineTo(x, y) => {
                write_numbers(w, &[*x, *y])?
            }
            Operator::Rectangle(x, y, width, height) => {
                write_numbers(w, &[*x, *y, *width, *height])?
            }
            Operator::ShowText(TextString::Literal(bytes)) => write_literal(w, bytes)?,
            Operator::ShowText(TextString::Hex(bytes)) => {
                write!(w, "<")?;
                for b in bytes {
                    write!(w, "{b:02x}")?;
                }
                write!(w, ">")?;
            }
            Operator::SaveState
            | Operator::RestoreState
            | Operator::BeginText
            | Operator::EndText
            | Operator::NextLine
            | Operator::ClosePath
            | Operator::Stroke
            | Operator::CloseStroke
            | Operator::Fill
            | Operator::FillStroke
            | Operator::EndPath => {
                return writeln!(w, "{}", self.mnemonic());
            }
        }
        writeln!(w, " {}", self.mnemonic())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(String::from_utf8_lossy(&buf).trim_end())
    }
}

/// Round to the precision the stream is written with
pub(crate) fn round4(v: f32) -> f32 {
    (((v as f64) * 10_000.0).round() / 10_000.0) as f32
}

/// A number formatted for a content stream: at most four decimals, no
/// trailing zeros, no negative zero.
pub(crate) struct Num(pub f32);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = ((self.0 as f64) * 10_000.0).round() / 10_000.0;
        if v == 0.0 {
            f.write_str("0")
        } else if v.fract() == 0.0 && v.abs() < 1e15 {
            write!(f, "{}", v as i64)
        } else {
            write!(f, "{v}")
        }
    }
}

fn write_numbers<W: Write>(w: &mut W, values: &[f32]) -> std::io::Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(w, " ")?;
        }
        write!(w, "{}", Num(*v))?;
    }
    Ok(())
}

fn write_literal<W: Write>(w: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    write!(w, "(")?;
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => write!(w, "\\{}", b as char)?,
            0x20..=0x7e => w.write_all(&[b])?,
            _ => write!(w, "\\{b:03o}")?,
        }
    }
    write!(w, ")")
}
