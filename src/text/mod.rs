//! Text shaping: fitting styled runs into width-bounded lines, with
//! hyphenation, leading and justification.

mod block;
mod hyphenator;
mod line;
mod splitter;

pub use block::*;
pub use hyphenator::*;
pub use line::*;
pub use splitter::*;

use id_arena::Arena;

use crate::colour::Colour;
use crate::font::{Font, SpanFont};
use crate::units::Pt;
use crate::PDFError;

/// A run of text whose style is fully resolved: every field is concrete,
/// inherited from the enclosing phrase or paragraph where the run itself
/// left it open.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub hyphenate: bool,
    /// Leading requested by the phrase the run came from
    pub leading: Option<Pt>,
}

impl StyledRun {
    pub fn new<S: ToString>(text: S, font: SpanFont) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            font,
            colour: Colour::default(),
            hyphenate: false,
            leading: None,
        }
    }
}

/// Resolve a font id against the document's fonts
pub(crate) fn lookup(fonts: &Arena<Font>, font: SpanFont) -> Result<&Font, PDFError> {
    fonts
        .get(font.id)
        .ok_or(PDFError::UnknownFont(font.id.index()))
}
