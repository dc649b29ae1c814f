use id_arena::Arena;

use crate::colour::{colours, Colour};
use crate::font::{Font, SpanFont};
use crate::model::{Cell, Paragraph, VerticalAlign};
use crate::rect::Rect;
use crate::stream::Operator;
use crate::table::Placement;
use crate::text::{min_block_width, Hyphenator, StyledRun, TextBlock};
use crate::units::Pt;
use crate::PDFError;

/// A cell being sized and drawn: its paragraphs, resolved and shaped to the
/// width its columns were given
#[derive(Debug, Clone)]
pub struct CellLayout<'a> {
    cell: &'a Cell,
    placement: Placement,
    paragraphs: Vec<(&'a Paragraph, Vec<StyledRun>)>,
    blocks: Vec<TextBlock>,
    width: Pt,
    content_height: Pt,
    height: Pt,
    rect: Option<Rect>,
}

impl<'a> CellLayout<'a> {
    pub fn new(
        cell: &'a Cell,
        placement: Placement,
        default_font: SpanFont,
    ) -> Result<CellLayout<'a>, PDFError> {
        if !(0.0..=1.0).contains(&cell.grey_fill) {
            return Err(PDFError::ColourOutOfRange(cell.grey_fill));
        }
        let paragraphs = cell
            .content
            .iter()
            .map(|p| Ok((p, p.resolve(default_font)?)))
            .collect::<Result<Vec<_>, PDFError>>()?;
        Ok(CellLayout {
            cell,
            placement,
            paragraphs,
            blocks: Vec::new(),
            width: Pt(0.0),
            content_height: Pt(0.0),
            height: cell.padding.vertical(),
            rect: None,
        })
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Narrowest width that fits the cell's widest word and its padding
    pub fn min_width(&self, fonts: &Arena<Font>) -> Result<Pt, PDFError> {
        let mut widest = Pt(0.0);
        for (paragraph, runs) in self.paragraphs.iter() {
            widest = widest.max(min_block_width(paragraph, runs, fonts)?);
        }
        Ok(widest + self.cell.padding.horizontal())
    }

    /// Break the cell's text for `width` and work out the height it needs
    pub fn shape(
        &mut self,
        width: Pt,
        fonts: &Arena<Font>,
        hyphenator: &Hyphenator,
    ) -> Result<(), PDFError> {
        let inner = width - self.cell.padding.horizontal();
        self.blocks = self
            .paragraphs
            .iter()
            .map(|(paragraph, runs)| TextBlock::shape(paragraph, runs, inner, fonts, hyphenator))
            .collect::<Result<Vec<_>, PDFError>>()?;
        self.width = width;

        let mut content = Pt(0.0);
        let mut after: Option<Pt> = None;
        for ((paragraph, _), block) in self.paragraphs.iter().zip(self.blocks.iter()) {
            if block.lines().is_empty() {
                continue;
            }
            if let Some(after) = after {
                content += after.max(paragraph.spacing_before);
            }
            content += block.height();
            after = Some(paragraph.spacing_after);
        }
        self.content_height = content;
        self.height = content + self.cell.padding.vertical();
        Ok(())
    }

    /// Height the content needs, padding included
    pub fn min_height(&self) -> Pt {
        self.content_height + self.cell.padding.vertical()
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    /// Height the cell is drawn at, once rows are sized
    pub fn height(&self) -> Pt {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: Pt) {
        self.height = height;
    }

    /// Where the cell was last drawn
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Draw the cell with its upper-left corner at (`left`, `top`): the
    /// background, then the borders, then each paragraph in its own text
    /// object
    pub fn render(
        &mut self,
        left: Pt,
        top: Pt,
        fonts: &Arena<Font>,
    ) -> Result<Vec<Operator>, PDFError> {
        let rect = Rect::from_top_left(left, top, self.width, self.height);
        self.rect = Some(rect);
        let mut ops = Vec::new();

        if self.cell.grey_fill < 1.0 {
            ops.push(Operator::SetFillColour(Colour::new_grey(self.cell.grey_fill)));
            ops.push(Operator::Rectangle(
                *rect.x1,
                *rect.y1,
                *rect.width(),
                *rect.height(),
            ));
            ops.push(Operator::Fill);
        }

        let borders = self.cell.borders;
        if borders.is_visible() {
            ops.push(Operator::SetLineWidth(*borders.width));
            ops.push(Operator::SetStrokeColour(colours::BLACK));
            let edges = [
                (borders.top, (rect.x1, rect.y2), (rect.x2, rect.y2)),
                (borders.right, (rect.x2, rect.y2), (rect.x2, rect.y1)),
                (borders.bottom, (rect.x2, rect.y1), (rect.x1, rect.y1)),
                (borders.left, (rect.x1, rect.y1), (rect.x1, rect.y2)),
            ];
            for (_, from, to) in edges.iter().filter(|(drawn, _, _)| *drawn) {
                ops.push(Operator::MoveTo(*from.0, *from.1));
                ops.push(Operator::LineTo(*to.0, *to.1));
            }
            ops.push(Operator::Stroke);
        }

        let padding = self.cell.padding;
        let free = (self.height - padding.vertical() - self.content_height).non_negative();
        let mut y = match self.cell.vertical_align {
            VerticalAlign::Top => top - padding.top,
            VerticalAlign::Middle => top - padding.top - free / 2.0,
            VerticalAlign::Bottom => top - padding.top - free,
        };
        let x = left + padding.left;

        let mut after: Option<Pt> = None;
        for ((paragraph, _), block) in self.paragraphs.iter().zip(self.blocks.iter()) {
            if block.lines().is_empty() {
                continue;
            }
            if let Some(after) = after {
                y -= after.max(paragraph.spacing_before);
            }
            ops.push(Operator::BeginText);
            ops.push(Operator::SetTextMatrix([1.0, 0.0, 0.0, 1.0, *x, *y]));
            let mut previous = Pt(0.0);
            for line in block.lines() {
                ops.extend(line.operators(previous, fonts)?);
                previous = line.offset();
            }
            ops.push(Operator::EndText);
            y -= block.height();
            after = Some(paragraph.spacing_after);
        }

        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::model::{Borders, Padding};

    fn placement() -> Placement {
        Placement {
            cell: 0,
            row: 0,
            column: 0,
            row_span: 1,
            col_span: 1,
        }
    }

    #[test]
    fn sizes_from_the_widest_word() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        let font = SpanFont::new(id, Pt(10.0));
        let cell = Cell::from_text("tiny enormous")
            .with_padding(Padding::all(Pt(3.0)))
            .push(Paragraph::from_text("x").with_spacing(Pt(5.0), Pt(0.0)));
        let mut layout = CellLayout::new(&cell, placement(), font).unwrap();

        // "enormous" is 8 characters
        assert_eq!(layout.min_width(&fonts).unwrap(), Pt(48.0 + 6.0));

        layout.shape(Pt(54.0), &fonts, Hyphenator::english()).unwrap();
        assert_eq!(layout.blocks()[0].lines().len(), 2);
        // three lines of 12pt, 5pt between the paragraphs, 6pt padding
        assert!((*layout.min_height() - 47.0).abs() < 1e-3);
    }

    #[test]
    fn renders_fill_borders_then_text() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        let font = SpanFont::new(id, Pt(10.0));
        let cell = Cell::from_text("hi")
            .with_grey_fill(0.9)
            .with_padding(Padding::all(Pt(2.0)))
            .with_borders(Borders {
                right: false,
                ..Borders::all(Pt(1.0))
            })
            .with_vertical_align(VerticalAlign::Bottom);
        let mut layout = CellLayout::new(&cell, placement(), font).unwrap();
        layout.shape(Pt(40.0), &fonts, Hyphenator::english()).unwrap();
        layout.set_height(Pt(30.0));

        let ops = layout.render(Pt(10.0), Pt(100.0), &fonts).unwrap();
        assert_eq!(ops[0], Operator::SetFillColour(Colour::new_grey(0.9)));
        assert_eq!(ops[1], Operator::Rectangle(10.0, 70.0, 40.0, 30.0));
        assert_eq!(ops[2], Operator::Fill);
        assert_eq!(ops[3], Operator::SetLineWidth(1.0));
        // three edges, one stroke
        let moves = ops.iter().filter(|o| matches!(o, Operator::MoveTo(..))).count();
        assert_eq!(moves, 3);
        let stroke = ops.iter().position(|o| *o == Operator::Stroke).unwrap();
        assert_eq!(ops[stroke + 1], Operator::BeginText);
        // bottom aligned: 30 - 4 padding - 12 content leaves 14 above
        match ops[stroke + 2] {
            Operator::SetTextMatrix(m) => {
                assert_eq!(m[4], 12.0);
                assert!((m[5] - 84.0).abs() < 1e-3);
            }
            ref other => panic!("expected Tm, got {other:?}"),
        }
        assert_eq!(ops.last(), Some(&Operator::EndText));
        assert!(layout.rect().is_some());
    }

    #[test]
    fn grey_fill_is_validated() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(StandardFont::Courier.into());
        let cell = Cell::new().with_grey_fill(-0.5);
        assert!(matches!(
            CellLayout::new(&cell, placement(), SpanFont::new(id, Pt(10.0))),
            Err(PDFError::ColourOutOfRange(_))
        ));
    }
}
