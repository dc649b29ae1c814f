use id_arena::Arena;

use crate::font::Font;
use crate::model::Paragraph;
use crate::text::{
    lookup, widest_word, Glyph, Hyphenator, LineBuilder, LineStyle, StyledRun, TextLine,
    TextSplitter,
};
use crate::units::Pt;
use crate::PDFError;

/// A paragraph broken into lines for one width
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    lines: Vec<TextLine>,
}

impl TextBlock {
    /// Shape already resolved runs with the paragraph's indents and line
    /// style into lines `width` wide
    pub fn shape(
        paragraph: &Paragraph,
        runs: &[StyledRun],
        width: Pt,
        fonts: &Arena<Font>,
        hyphenator: &Hyphenator,
    ) -> Result<TextBlock, PDFError> {
        let style = LineStyle {
            alignment: paragraph.alignment,
            leading: paragraph.leading,
            line_height: paragraph.line_height,
        };
        let mut builder = LineBuilder::new(runs, fonts, TextSplitter::new(hyphenator), style);

        let mut lines = Vec::new();
        loop {
            let indent = if lines.is_empty() {
                paragraph.indent_left + paragraph.first_line_indent
            } else {
                paragraph.indent_left
            };
            let available = width - indent - paragraph.indent_right;
            match builder.next_line(available, indent)? {
                Some(line) => lines.push(line),
                None => break,
            }
        }
        Ok(TextBlock { lines })
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<TextLine> {
        self.lines
    }

    pub fn height(&self) -> Pt {
        self.lines.iter().map(TextLine::leading).sum()
    }
}

/// The narrowest width a paragraph can be set in without a word
/// overflowing its line
pub fn min_block_width(
    paragraph: &Paragraph,
    runs: &[StyledRun],
    fonts: &Arena<Font>,
) -> Result<Pt, PDFError> {
    let mut glyphs = Vec::new();
    for (index, run) in runs.iter().enumerate() {
        let font = lookup(fonts, run.font)?;
        glyphs.extend(Glyph::measure(index, run, 0, font));
    }
    Ok(widest_word(&glyphs)
        + paragraph.indent_left
        + paragraph.first_line_indent.non_negative()
        + paragraph.indent_right)
}
