//! The document model: plain data describing what to lay out. Nothing here
//! knows about pages or content streams; [crate::layout] turns it into both.

use crate::colour::Colour;
use crate::font::SpanFont;
use crate::outline::BookmarkId;
use crate::text::StyledRun;
use crate::units::Pt;
use crate::PDFError;

pub use crate::text::Alignment;

/// The smallest piece of styled text. Anything left unset is inherited
/// from the enclosing phrase or paragraph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    pub text: String,
    pub font: Option<SpanFont>,
    pub colour: Option<Colour>,
    pub hyphenate: Option<bool>,
}

impl Chunk {
    pub fn new<S: ToString>(text: S) -> Chunk {
        Chunk {
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// A forced line break
    pub fn newline() -> Chunk {
        Chunk::new("\n")
    }

    pub fn with_font(mut self, font: SpanFont) -> Chunk {
        self.font = Some(font);
        self
    }

    pub fn with_colour<C: Into<Colour>>(mut self, colour: C) -> Chunk {
        self.colour = Some(colour.into());
        self
    }

    pub fn with_hyphenation(mut self, hyphenate: bool) -> Chunk {
        self.hyphenate = Some(hyphenate);
        self
    }
}

/// A sequence of chunks sharing a leading, and optionally a font and colour
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Phrase {
    pub chunks: Vec<Chunk>,
    pub leading: Option<Pt>,
    pub font: Option<SpanFont>,
    pub colour: Option<Colour>,
}

impl Phrase {
    pub fn new() -> Phrase {
        Phrase::default()
    }

    pub fn push(mut self, chunk: Chunk) -> Phrase {
        self.chunks.push(chunk);
        self
    }

    pub fn with_leading(mut self, leading: Pt) -> Phrase {
        self.leading = Some(leading);
        self
    }

    pub fn with_font(mut self, font: SpanFont) -> Phrase {
        self.font = Some(font);
        self
    }

    pub fn with_colour<C: Into<Colour>>(mut self, colour: C) -> Phrase {
        self.colour = Some(colour.into());
        self
    }
}

impl From<Chunk> for Phrase {
    fn from(chunk: Chunk) -> Self {
        Phrase::new().push(chunk)
    }
}

/// Anything a paragraph can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Chunk(Chunk),
    Phrase(Phrase),
}

impl From<Chunk> for Inline {
    fn from(c: Chunk) -> Self {
        Inline::Chunk(c)
    }
}

impl From<Phrase> for Inline {
    fn from(p: Phrase) -> Self {
        Inline::Phrase(p)
    }
}

impl From<&str> for Inline {
    fn from(s: &str) -> Self {
        Inline::Chunk(Chunk::new(s))
    }
}

/// A block of text set as a sequence of lines
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
    pub alignment: Alignment,
    pub indent_left: Pt,
    pub indent_right: Pt,
    /// Extra indent of the first line, on top of `indent_left`
    pub first_line_indent: Pt,
    /// Minimum baseline to baseline distance
    pub leading: Option<Pt>,
    /// Leading as a multiple of the font size
    pub line_height: f32,
    pub keep_together: bool,
    pub spacing_before: Pt,
    pub spacing_after: Pt,
    pub font: Option<SpanFont>,
    pub colour: Option<Colour>,
    pub hyphenate: bool,
    pub bookmark: Option<BookmarkId>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Paragraph {
            inlines: Vec::new(),
            alignment: Alignment::default(),
            indent_left: Pt(0.0),
            indent_right: Pt(0.0),
            first_line_indent: Pt(0.0),
            leading: None,
            line_height: 1.2,
            keep_together: false,
            spacing_before: Pt(0.0),
            spacing_after: Pt(0.0),
            font: None,
            colour: None,
            hyphenate: false,
            bookmark: None,
        }
    }
}

impl Paragraph {
    pub fn new() -> Paragraph {
        Paragraph::default()
    }

    /// A paragraph of a single unstyled chunk
    pub fn from_text<S: ToString>(text: S) -> Paragraph {
        Paragraph::new().push(Chunk::new(text))
    }

    pub fn push<I: Into<Inline>>(mut self, inline: I) -> Paragraph {
        self.inlines.push(inline.into());
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Paragraph {
        self.alignment = alignment;
        self
    }

    pub fn with_indents(mut self, left: Pt, right: Pt) -> Paragraph {
        self.indent_left = left;
        self.indent_right = right;
        self
    }

    pub fn with_first_line_indent(mut self, indent: Pt) -> Paragraph {
        self.first_line_indent = indent;
        self
    }

    pub fn with_leading(mut self, leading: Pt) -> Paragraph {
        self.leading = Some(leading);
        self
    }

    pub fn with_line_height(mut self, line_height: f32) -> Paragraph {
        self.line_height = line_height;
        self
    }

    pub fn with_keep_together(mut self, keep_together: bool) -> Paragraph {
        self.keep_together = keep_together;
        self
    }

    pub fn with_spacing(mut self, before: Pt, after: Pt) -> Paragraph {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn with_font(mut self, font: SpanFont) -> Paragraph {
        self.font = Some(font);
        self
    }

    pub fn with_colour<C: Into<Colour>>(mut self, colour: C) -> Paragraph {
        self.colour = Some(colour.into());
        self
    }

    pub fn with_hyphenation(mut self, hyphenate: bool) -> Paragraph {
        self.hyphenate = hyphenate;
        self
    }

    pub fn with_bookmark(mut self, bookmark: BookmarkId) -> Paragraph {
        self.bookmark = Some(bookmark);
        self
    }

    /// The paragraph's text with all styling removed
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in self.inlines.iter() {
            match inline {
                Inline::Chunk(c) => out.push_str(&c.text),
                Inline::Phrase(p) => p.chunks.iter().for_each(|c| out.push_str(&c.text)),
            }
        }
        out
    }

    /// Flatten the paragraph into runs whose styles are fully resolved.
    /// Fonts and colours are inherited chunk <- phrase <- paragraph <-
    /// `default_font`; empty chunks are dropped.
    pub fn resolve(&self, default_font: SpanFont) -> Result<Vec<StyledRun>, PDFError> {
        let font = self.font.unwrap_or(default_font);
        let colour = self.colour.unwrap_or_default();

        let mut runs = Vec::new();
        let mut add = |chunk: &Chunk,
                       font: SpanFont,
                       colour: Colour,
                       leading: Option<Pt>|
         -> Result<(), PDFError> {
            if chunk.text.is_empty() {
                return Ok(());
            }
            let colour = chunk.colour.unwrap_or(colour).validate()?;
            runs.push(StyledRun {
                text: chunk.text.replace("\r\n", "\n"),
                font: chunk.font.unwrap_or(font),
                colour,
                hyphenate: chunk.hyphenate.unwrap_or(self.hyphenate),
                leading,
            });
            Ok(())
        };

        for inline in self.inlines.iter() {
            match inline {
                Inline::Chunk(chunk) => add(chunk, font, colour, None)?,
                Inline::Phrase(phrase) => {
                    let font = phrase.font.unwrap_or(font);
                    let colour = phrase.colour.unwrap_or(colour);
                    for chunk in phrase.chunks.iter() {
                        add(chunk, font, colour, phrase.leading)?;
                    }
                }
            }
        }
        Ok(runs)
    }
}

impl From<Phrase> for Paragraph {
    fn from(phrase: Phrase) -> Self {
        Paragraph::new().push(phrase)
    }
}

/// Space between a cell's edges and its content
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Padding {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Padding {
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Padding {
        Padding {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all<D: Into<Pt>>(value: D) -> Padding {
        let value = value.into();
        Padding::trbl(value, value, value, value)
    }

    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Padding::all(Pt(2.0))
    }
}

/// Which edges of a cell get a border line, and how thick they are
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Borders {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    pub width: Pt,
}

impl Borders {
    pub fn all(width: Pt) -> Borders {
        Borders {
            top: true,
            right: true,
            bottom: true,
            left: true,
            width,
        }
    }

    pub fn none() -> Borders {
        Borders {
            top: false,
            right: false,
            bottom: false,
            left: false,
            width: Pt(0.0),
        }
    }

    /// Whether anything would be drawn
    pub fn is_visible(&self) -> bool {
        *self.width > 0.0 && (self.top || self.right || self.bottom || self.left)
    }
}

impl Default for Borders {
    fn default() -> Self {
        Borders::all(Pt(0.5))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A table cell: a stack of paragraphs occupying one or more grid indices
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: Vec<Paragraph>,
    pub row_span: usize,
    pub col_span: usize,
    pub padding: Padding,
    pub borders: Borders,
    /// Grey level of the background; 1.0 (white) leaves it unfilled
    pub grey_fill: f32,
    pub vertical_align: VerticalAlign,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            content: Vec::new(),
            row_span: 1,
            col_span: 1,
            padding: Padding::default(),
            borders: Borders::default(),
            grey_fill: 1.0,
            vertical_align: VerticalAlign::default(),
        }
    }
}

impl Cell {
    pub fn new() -> Cell {
        Cell::default()
    }

    pub fn from_text<S: ToString>(text: S) -> Cell {
        Cell::new().push(Paragraph::from_text(text))
    }

    pub fn push(mut self, paragraph: Paragraph) -> Cell {
        self.content.push(paragraph);
        self
    }

    pub fn with_span(mut self, rows: usize, columns: usize) -> Cell {
        self.row_span = rows;
        self.col_span = columns;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Cell {
        self.padding = padding;
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Cell {
        self.borders = borders;
        self
    }

    pub fn with_grey_fill(mut self, grey: f32) -> Cell {
        self.grey_fill = grey;
        self
    }

    pub fn with_vertical_align(mut self, align: VerticalAlign) -> Cell {
        self.vertical_align = align;
        self
    }
}

/// A grid of cells. Columns are given as relative widths; cells are placed
/// left to right, top to bottom, skipping indices covered by earlier spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<f32>,
    /// Share of the available width the table occupies, in percent
    pub width_percent: f32,
    pub cells: Vec<Cell>,
    pub keep_together: bool,
    pub spacing_before: Pt,
    pub spacing_after: Pt,
    pub bookmark: Option<BookmarkId>,
}

impl Table {
    pub fn new(columns: Vec<f32>) -> Table {
        Table {
            columns,
            width_percent: 100.0,
            cells: Vec::new(),
            keep_together: false,
            spacing_before: Pt(0.0),
            spacing_after: Pt(0.0),
            bookmark: None,
        }
    }

    pub fn push(mut self, cell: Cell) -> Table {
        self.cells.push(cell);
        self
    }

    pub fn with_width_percent(mut self, percent: f32) -> Table {
        self.width_percent = percent;
        self
    }

    pub fn with_keep_together(mut self, keep_together: bool) -> Table {
        self.keep_together = keep_together;
        self
    }

    pub fn with_spacing(mut self, before: Pt, after: Pt) -> Table {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn with_bookmark(mut self, bookmark: BookmarkId) -> Table {
        self.bookmark = Some(bookmark);
        self
    }
}

/// One item of document content, laid out in order
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Paragraph(Paragraph),
    Phrase(Phrase),
    Table(Table),
    PageBreak,
}

impl From<Paragraph> for Content {
    fn from(p: Paragraph) -> Self {
        Content::Paragraph(p)
    }
}

impl From<Phrase> for Content {
    fn from(p: Phrase) -> Self {
        Content::Phrase(p)
    }
}

impl From<Table> for Content {
    fn from(t: Table) -> Self {
        Content::Table(t)
    }
}
