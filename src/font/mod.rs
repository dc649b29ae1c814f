//! Font metrics as the layout engine sees them: advance widths, minimum
//! leading, and the byte encoding of shown text.

mod standard;
mod truetype;

pub use standard::*;
pub use truetype::*;

use id_arena::Id;
use pdf_writer::{Name, Pdf};

use crate::refs::{ObjectReferences, RefType};
use crate::stream::TextString;
use crate::{PDFError, Pt};

/// A font that can be added to a document. Fonts are referred to by their
/// [Id] within the document.
#[derive(Debug)]
pub enum Font {
    /// One of the standard faces, referenced by name and not embedded
    Standard(StandardFont),
    /// An embedded TrueType / OpenType face
    TrueType(TrueTypeFont),
}

impl From<StandardFont> for Font {
    fn from(f: StandardFont) -> Self {
        Font::Standard(f)
    }
}

impl Font {
    /// Load a TrueType / OpenType font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        Ok(Font::TrueType(TrueTypeFont::load(bytes)?))
    }

    fn ascender(&self) -> f32 {
        match self {
            Font::Standard(f) => f.ascender(),
            Font::TrueType(f) => f.ascender(),
        }
    }

    fn descender(&self) -> f32 {
        match self {
            Font::Standard(f) => f.descender(),
            Font::TrueType(f) => f.descender(),
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        size * (self.ascender() / 1000.0)
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        size * (self.descender() / 1000.0)
    }

    /// The tightest baseline-to-baseline distance at which lines of this font
    /// don't collide
    pub fn min_leading(&self, size: Pt) -> Pt {
        let gap = match self {
            Font::Standard(_) => 0.0,
            Font::TrueType(f) => f.line_gap(),
        };
        size * ((self.ascender() - self.descender() + gap) / 1000.0)
    }

    /// Advance width of a single character
    pub fn char_width(&self, ch: char, size: Pt) -> Pt {
        let units = match self {
            Font::Standard(f) => f.width(to_winansi(ch)),
            Font::TrueType(f) => f.width(ch),
        };
        size * (units / 1000.0)
    }

    /// Advance width of a run of text, without any character or word spacing
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    /// Whether the font encodes each character as one byte. `Tw` only
    /// applies to byte 32 in single-byte encodings.
    pub fn single_byte(&self) -> bool {
        matches!(self, Font::Standard(_))
    }

    /// Encode text for a `Tj` operand
    pub fn encode(&self, text: &str) -> TextString {
        match self {
            Font::Standard(_) => TextString::Literal(text.chars().map(to_winansi).collect()),
            Font::TrueType(f) => TextString::Hex(f.encode(text)),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        match self {
            Font::Standard(f) => {
                let font_id = refs.gen(RefType::Font(font_index));
                writer
                    .type1_font(font_id)
                    .base_font(Name(f.base_font().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            Font::TrueType(f) => f.write(refs, font_index, writer),
        }
    }
}

/// A font reference plus a size, as used by text runs
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

impl SpanFont {
    pub fn new(id: Id<Font>, size: Pt) -> SpanFont {
        SpanFont { id, size }
    }
}
