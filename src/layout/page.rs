use crate::layout::{Line, Origin, PageSettings, PageSize};
use crate::rect::Rect;
use crate::stream::{ContentStream, Operator};
use crate::units::Pt;
use crate::PDFError;

/// Slack allowed when deciding whether something fits
const TOLERANCE: f32 = 1e-3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Nothing has been placed yet
    Empty,
    /// Content has been placed and more may follow
    Filling,
    /// Closed to further content
    Complete,
}

/// A page being filled from the top of its body down
#[derive(Debug)]
pub struct PageLayout {
    index: usize,
    size: PageSize,
    body: Rect,
    cursor: Pt,
    stream: ContentStream,
    state: PageState,
    anchored: bool,
}

impl PageLayout {
    pub fn new(index: usize, settings: &PageSettings) -> PageLayout {
        let body = settings.margins.body(settings.size);
        PageLayout {
            index,
            size: settings.size,
            body,
            cursor: body.y2,
            stream: ContentStream::new(),
            state: PageState::Empty,
            anchored: false,
        }
    }

    /// Zero-based position of the page in the document
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state == PageState::Empty
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Height left between the cursor and the bottom of the body
    pub fn remaining(&self) -> Pt {
        self.cursor - self.body.y1
    }

    pub fn fits(&self, height: Pt) -> bool {
        *height <= *self.remaining() + TOLERANCE
    }

    /// Where the next piece of content goes
    pub fn origin(&self) -> Origin {
        Origin {
            left: self.body.x1,
            top: self.cursor,
        }
    }

    /// Move the cursor down without drawing anything
    pub fn skip(&mut self, height: Pt) {
        self.cursor -= height;
    }

    /// A bookmark points at this page
    pub(crate) fn anchor(&mut self) {
        self.anchored = true;
    }

    pub(crate) fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Send operators that take up no space, such as frame delimiters
    pub fn emit(&mut self, ops: Vec<Operator>) -> Result<(), PDFError> {
        self.stream.extend(ops)
    }

    /// Draw a line at the cursor and move below it
    pub fn place(&mut self, line: Line) -> Result<(), PDFError> {
        debug_assert!(self.state != PageState::Complete);
        self.cursor -= line.height();
        self.stream.extend(line.into_operators())?;
        self.state = PageState::Filling;
        Ok(())
    }

    pub fn complete(&mut self) {
        self.state = PageState::Complete;
    }

    /// Serialize the page's content stream
    pub fn finish(self) -> Result<RenderedPage, PDFError> {
        let content = if self.stream.is_empty() {
            log::debug!("page {} is blank", self.index + 1);
            Vec::new()
        } else {
            self.stream.finish()?
        };
        Ok(RenderedPage {
            index: self.index,
            size: self.size,
            body: self.body,
            content,
        })
    }
}

/// A finished page: its geometry and its content stream bytes
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub index: usize,
    pub size: PageSize,
    pub body: Rect,
    pub content: Vec<u8>,
}
