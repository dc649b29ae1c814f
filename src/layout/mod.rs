//! Pagination: content items are turned into [Line]s by a [ContentLayout],
//! and [DocumentLayout] places those lines onto pages, starting a new page
//! whenever the next line doesn't fit.
//!
//! # Example
//!
//! ```
//! use pdf_flow::{Document, Paragraph, Pt};
//!
//! let mut doc = Document::new();
//! doc.push(Paragraph::from_text("Hello, world!").with_spacing(Pt(0.0), Pt(6.0)));
//! let pages = doc.render().expect("can lay out");
//! assert_eq!(pages.len(), 1);
//! ```

mod document;
mod margins;
mod page;
mod paragraph;
mod settings;
mod table;

pub use document::*;
pub use margins::*;
pub use page::*;
pub use paragraph::*;
pub use settings::*;
pub use table::*;

use id_arena::Arena;

use crate::font::{Font, SpanFont};
use crate::model::{Content, Paragraph};
use crate::outline::BookmarkId;
use crate::stream::Operator;
use crate::text::Hyphenator;
use crate::units::Pt;
use crate::PDFError;

/// A strip of laid out content: how much vertical space it takes and the
/// operators that draw it
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    height: Pt,
    operators: Vec<Operator>,
}

impl Line {
    pub fn new(height: Pt, operators: Vec<Operator>) -> Line {
        Line { height, operators }
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn into_operators(self) -> Vec<Operator> {
        self.operators
    }
}

/// The upper-left corner content is placed at, in page coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Origin {
    pub left: Pt,
    pub top: Pt,
}

/// Everything layout needs from the document
#[derive(Copy, Clone)]
pub struct LayoutContext<'a> {
    pub fonts: &'a Arena<Font>,
    pub hyphenator: &'a Hyphenator,
    pub default_font: SpanFont,
}

/// One content item being broken into lines. Lines are drawn inside a frame
/// opened at the position of the first line placed on a page and closed
/// after the last.
pub trait ContentLayout {
    /// Height that must be free before anything of the item is placed. An
    /// item kept together needs room for all of what remains. `None` once
    /// the item is exhausted.
    fn min_height(&self) -> Option<Pt>;

    /// Height of the next line, `None` once the item is exhausted
    fn next_height(&self) -> Option<Pt>;

    fn open_frame(&mut self, origin: Origin) -> Vec<Operator>;

    /// Produce the next line; `origin` is where it will be placed
    fn next_line(&mut self, origin: Origin) -> Result<Option<Line>, PDFError>;

    fn close_frame(&mut self) -> Vec<Operator>;

    fn keep_together(&self) -> bool;

    fn set_keep_together(&mut self, keep_together: bool);

    fn spacing_before(&self) -> Pt;

    fn spacing_after(&self) -> Pt;

    fn bookmark(&self) -> Option<BookmarkId>;

    fn is_done(&self) -> bool {
        self.next_height().is_none()
    }
}

/// Build the layout for a content item `width` wide. Page breaks have no
/// layout.
pub fn layout_for<'a>(
    content: &'a Content,
    width: Pt,
    ctx: &LayoutContext<'a>,
) -> Result<Option<Box<dyn ContentLayout + 'a>>, PDFError> {
    let layout: Box<dyn ContentLayout + 'a> = match content {
        Content::Paragraph(paragraph) => Box::new(ParagraphLayout::new(paragraph, width, ctx)?),
        Content::Phrase(phrase) => {
            let paragraph = Paragraph::from(phrase.clone());
            Box::new(ParagraphLayout::new(&paragraph, width, ctx)?)
        }
        Content::Table(table) => Box::new(TableLayout::new(table, width, ctx)?),
        Content::PageBreak => return Ok(None),
    };
    Ok(Some(layout))
}
