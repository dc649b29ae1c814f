use id_arena::Arena;

use crate::font::Font;
use crate::layout::{ContentLayout, LayoutContext, Line, Origin};
use crate::model::Table;
use crate::outline::BookmarkId;
use crate::stream::Operator;
use crate::table::TableModel;
use crate::units::Pt;
use crate::PDFError;

/// Lays out a table one chunk at a time. Each chunk is a [Line] drawn at an
/// absolute position, so the frame operators are empty.
pub struct TableLayout<'a> {
    fonts: &'a Arena<Font>,
    model: TableModel<'a>,
    spacing_before: Pt,
    spacing_after: Pt,
    bookmark: Option<BookmarkId>,
}

impl<'a> TableLayout<'a> {
    pub fn new(
        table: &'a Table,
        width: Pt,
        ctx: &LayoutContext<'a>,
    ) -> Result<TableLayout<'a>, PDFError> {
        Ok(TableLayout {
            fonts: ctx.fonts,
            model: TableModel::new(table, width, ctx)?,
            spacing_before: table.spacing_before,
            spacing_after: table.spacing_after,
            bookmark: table.bookmark,
        })
    }

    pub fn model(&self) -> &TableModel<'a> {
        &self.model
    }
}

impl ContentLayout for TableLayout<'_> {
    fn min_height(&self) -> Option<Pt> {
        self.model.next_chunk().map(|c| c.height)
    }

    fn next_height(&self) -> Option<Pt> {
        self.min_height()
    }

    fn open_frame(&mut self, _origin: Origin) -> Vec<Operator> {
        Vec::new()
    }

    fn next_line(&mut self, origin: Origin) -> Result<Option<Line>, PDFError> {
        Ok(self
            .model
            .render_next(origin.left, origin.top, self.fonts)?
            .map(|(chunk, ops)| Line::new(chunk.height, ops)))
    }

    fn close_frame(&mut self) -> Vec<Operator> {
        Vec::new()
    }

    fn keep_together(&self) -> bool {
        self.model.keep_together()
    }

    fn set_keep_together(&mut self, keep_together: bool) {
        self.model.set_keep_together(keep_together);
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
