use crate::layout::{
    layout_for, ContentLayout, LayoutContext, PageLayout, PageSettings, ParagraphLayout,
    RenderedPage,
};
use crate::model::{Content, Paragraph};
use crate::outline::{BookmarkId, Location, Outline};
use crate::units::Pt;
use crate::PDFError;

/// The page a header or footer is drawn on, and how many pages there are
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageNumber {
    /// One-based
    pub current: usize,
    pub total: usize,
}

/// Produces the header or footer for a page, if it has one
pub type HeaderFooter = Box<dyn Fn(PageNumber) -> Option<Paragraph>>;

/// Places content items onto pages in order
pub struct DocumentLayout<'a> {
    ctx: LayoutContext<'a>,
    settings: &'a PageSettings,
    pages: Vec<PageLayout>,
    current: PageLayout,
    previous_after: Pt,
    locations: Vec<(BookmarkId, Location)>,
}

impl<'a> DocumentLayout<'a> {
    pub fn new(ctx: LayoutContext<'a>, settings: &'a PageSettings) -> DocumentLayout<'a> {
        DocumentLayout {
            ctx,
            settings,
            pages: Vec::new(),
            current: PageLayout::new(0, settings),
            previous_after: Pt(0.0),
            locations: Vec::new(),
        }
    }

    /// Width content is laid out in
    pub fn body_width(&self) -> Pt {
        self.current.body().width()
    }

    /// Pages started so far, the one being filled included
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn new_page(&mut self) {
        let index = self.pages.len() + 1;
        log::debug!("starting page {}", index + 1);
        let mut finished = std::mem::replace(
            &mut self.current,
            PageLayout::new(index, self.settings),
        );
        finished.complete();
        self.pages.push(finished);
    }

    fn locate(&mut self, bookmark: Option<BookmarkId>) {
        if let Some(bookmark) = bookmark {
            let origin = self.current.origin();
            self.current.anchor();
            self.locations.push((
                bookmark,
                Location {
                    page: self.current.index(),
                    left: origin.left,
                    top: origin.top,
                },
            ));
        }
    }

    /// Lay out every item in order
    pub fn layout(&mut self, content: &'a [Content]) -> Result<(), PDFError> {
        for (index, item) in content.iter().enumerate() {
            self.place(item)
                .map_err(|e| e.context(format!("laying out content item {index}")))?;
        }
        Ok(())
    }

    /// Lay out a single item after everything placed so far
    pub fn place(&mut self, item: &'a Content) -> Result<(), PDFError> {
        let width = self.body_width();
        let Some(mut layout) = layout_for(item, width, &self.ctx)? else {
            if !self.current.is_empty() {
                self.new_page();
            }
            self.previous_after = Pt(0.0);
            return Ok(());
        };

        if layout.is_done() {
            // nothing to draw, but a bookmark still needs somewhere to point
            self.locate(layout.bookmark());
            return Ok(());
        }

        let mut bookmark = layout.bookmark();
        while let Some(min) = layout.min_height() {
            let gap = if self.current.is_empty() {
                Pt(0.0)
            } else {
                self.previous_after.max(layout.spacing_before())
            };

            if self.current.fits(gap + min) {
                self.current.skip(gap);
                self.locate(bookmark.take());
                self.fill(layout.as_mut())?;
                if !layout.is_done() {
                    self.new_page();
                }
            } else if !self.current.is_empty() {
                self.new_page();
            } else if layout.keep_together() {
                log::debug!(
                    "{:.2}pt of content kept together is taller than the page; letting it split",
                    *min
                );
                layout.set_keep_together(false);
            } else {
                return Err(PDFError::ContentTooTall {
                    height: *min,
                    available: *self.current.remaining(),
                });
            }
        }

        self.previous_after = layout.spacing_after();
        Ok(())
    }

    /// Place lines from `layout` on the current page while they fit
    fn fill(&mut self, layout: &mut (dyn ContentLayout + 'a)) -> Result<(), PDFError> {
        let open = layout.open_frame(self.current.origin());
        self.current.emit(open)?;
        while let Some(height) = layout.next_height() {
            if !self.current.fits(height) {
                break;
            }
            match layout.next_line(self.current.origin())? {
                Some(line) => self.current.place(line)?,
                None => break,
            }
        }
        let close = layout.close_frame();
        self.current.emit(close)
    }

    /// Record bookmark locations, draw headers and footers, and serialize
    /// every page
    pub fn finish(
        mut self,
        outline: &mut Outline,
        header: Option<&HeaderFooter>,
        footer: Option<&HeaderFooter>,
    ) -> Result<Vec<RenderedPage>, PDFError> {
        let trailing_blank = self.current.is_empty() && !self.current.is_anchored();
        if !trailing_blank || self.pages.is_empty() {
            self.current.complete();
            self.pages.push(self.current);
        }
        let mut pages = self.pages;

        for (bookmark, location) in self.locations {
            outline.locate(bookmark, location);
        }
        outline.check()?;

        let total = pages.len();
        for page in pages.iter_mut() {
            let number = PageNumber {
                current: page.index() + 1,
                total,
            };
            let body = page.body();
            let size = self.settings.size;
            if let Some(paragraph) = header.and_then(|h| h(number)) {
                let band = (size.1 - body.y2, size.1);
                draw_band(page, &paragraph, band, &self.ctx, self.settings)
                    .map_err(|e| e.context(format!("drawing the header of page {}", number.current)))?;
            }
            if let Some(paragraph) = footer.and_then(|f| f(number)) {
                let band = (body.y1, body.y1);
                draw_band(page, &paragraph, band, &self.ctx, self.settings)
                    .map_err(|e| e.context(format!("drawing the footer of page {}", number.current)))?;
            }
        }

        log::debug!("laid out {total} pages");
        pages.into_iter().map(PageLayout::finish).collect()
    }
}

/// Draw a header or footer centred in a margin band given as (height, top)
fn draw_band(
    page: &mut PageLayout,
    paragraph: &Paragraph,
    band: (Pt, Pt),
    ctx: &LayoutContext,
    settings: &PageSettings,
) -> Result<(), PDFError> {
    let (height, top) = band;
    let body = page.body();
    let mut layout = ParagraphLayout::new(paragraph, body.width(), ctx)?;
    let needed = layout.remaining_height();
    if *needed <= 0.0 {
        return Ok(());
    }
    let free = height - needed;
    if free < settings.min_band_clearance * 2.0 {
        log::warn!(
            "skipping a {:.2}pt band on page {}: only {:.2}pt of margin",
            *needed,
            page.index() + 1,
            *height
        );
        return Ok(());
    }

    let mut origin = crate::layout::Origin {
        left: body.x1,
        top: top - free / 2.0,
    };
    page.emit(layout.open_frame(origin))?;
    while let Some(line) = layout.next_line(origin)? {
        origin.top -= line.height();
        page.emit(line.into_operators())?;
    }
    page.emit(layout.close_frame())
}
