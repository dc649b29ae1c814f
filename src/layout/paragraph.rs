use id_arena::Arena;

use crate::font::Font;
use crate::layout::{ContentLayout, LayoutContext, Line, Origin};
use crate::model::Paragraph;
use crate::outline::BookmarkId;
use crate::stream::Operator;
use crate::text::{TextBlock, TextLine};
use crate::units::Pt;
use crate::PDFError;

/// Lays out a paragraph one text line at a time. The lines are shaped up
/// front; laying out only moves a cursor through them.
pub struct ParagraphLayout<'a> {
    fonts: &'a Arena<Font>,
    lines: Vec<TextLine>,
    next: usize,
    previous_offset: Pt,
    keep_together: bool,
    spacing_before: Pt,
    spacing_after: Pt,
    bookmark: Option<BookmarkId>,
}

impl<'a> ParagraphLayout<'a> {
    pub fn new(
        paragraph: &Paragraph,
        width: Pt,
        ctx: &LayoutContext<'a>,
    ) -> Result<ParagraphLayout<'a>, PDFError> {
        let runs = paragraph.resolve(ctx.default_font)?;
        let block = TextBlock::shape(paragraph, &runs, width, ctx.fonts, ctx.hyphenator)?;
        Ok(ParagraphLayout {
            fonts: ctx.fonts,
            lines: block.into_lines(),
            next: 0,
            previous_offset: Pt(0.0),
            keep_together: paragraph.keep_together,
            spacing_before: paragraph.spacing_before,
            spacing_after: paragraph.spacing_after,
            bookmark: paragraph.bookmark,
        })
    }

    /// Lines not yet placed
    pub fn remaining(&self) -> &[TextLine] {
        &self.lines[self.next..]
    }

    /// Height of the lines not yet placed
    pub fn remaining_height(&self) -> Pt {
        self.remaining().iter().map(TextLine::leading).sum()
    }
}

impl ContentLayout for ParagraphLayout<'_> {
    fn min_height(&self) -> Option<Pt> {
        if self.keep_together {
            self.next_height().map(|_| self.remaining_height())
        } else {
            self.next_height()
        }
    }

    fn next_height(&self) -> Option<Pt> {
        self.lines.get(self.next).map(TextLine::leading)
    }

    fn open_frame(&mut self, origin: Origin) -> Vec<Operator> {
        self.previous_offset = Pt(0.0);
        vec![
            Operator::BeginText,
            Operator::SetTextMatrix([1.0, 0.0, 0.0, 1.0, *origin.left, *origin.top]),
        ]
    }

    fn next_line(&mut self, _origin: Origin) -> Result<Option<Line>, PDFError> {
        let Some(line) = self.lines.get(self.next) else {
            return Ok(None);
        };
        let operators = line.operators(self.previous_offset, self.fonts)?;
        self.previous_offset = line.offset();
        self.next += 1;
        Ok(Some(Line::new(line.leading(), operators)))
    }

    fn close_frame(&mut self) -> Vec<Operator> {
        vec![Operator::EndText]
    }

    fn keep_together(&self) -> bool {
        self.keep_together
    }

    fn set_keep_together(&mut self, keep_together: bool) {
        self.keep_together = keep_together;
    }

    fn spacing_before(&self) -> Pt {
        self.spacing_before
    }

    fn spacing_after(&self) -> Pt {
        self.spacing_after
    }

    fn bookmark(&self) -> Option<BookmarkId> {
        self.bookmark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{SpanFont, StandardFont};
    use crate::text::Hyphenator;

    #[test]
    fn walks_lines_within_a_frame() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        let ctx = LayoutContext {
            fonts: &fonts,
            hyphenator: Hyphenator::english(),
            default_font: SpanFont::new(id, Pt(10.0)),
        };
        let paragraph = Paragraph::from_text("one two three").with_keep_together(true);
        let mut layout = ParagraphLayout::new(&paragraph, Pt(50.0), &ctx).unwrap();

        assert_eq!(layout.remaining().len(), 2);
        let first = *layout.next_height().unwrap();
        let all = *layout.min_height().unwrap();
        assert!((all - 2.0 * first).abs() < 1e-3);
        layout.set_keep_together(false);
        assert_eq!(layout.min_height(), layout.next_height());

        let origin = Origin {
            left: Pt(72.0),
            top: Pt(700.0),
        };
        let open = layout.open_frame(origin);
        assert_eq!(
            open[1],
            Operator::SetTextMatrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0])
        );
        let line = layout.next_line(origin).unwrap().unwrap();
        assert_eq!(line.operators()[0], Operator::MoveText(0.0, -first));
        assert!(layout.next_line(origin).unwrap().is_some());
        assert!(layout.is_done());
        assert!(layout.next_line(origin).unwrap().is_none());
        assert_eq!(layout.min_height(), None);
        assert_eq!(layout.close_frame(), vec![Operator::EndText]);
    }
}
