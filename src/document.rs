use crate::{
    font::{Font, SpanFont, StandardFont},
    info::Info,
    layout::{DocumentLayout, HeaderFooter, LayoutContext, PageNumber, PageSettings, RenderedPage},
    model::{Content, Paragraph},
    outline::{BookmarkId, Outline},
    refs::{ObjectReferences, RefType},
    text::Hyphenator,
    PDFError, Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;
use std::time::Instant;

/// A document is a sequence of content items (paragraphs, tables, page
/// breaks) plus the fonts, page settings and metadata needed to flow them
/// onto pages. Call [Document::write] to paginate and serialize it.
pub struct Document {
    pub info: Info,
    pub settings: PageSettings,
    pub outline: Outline,
    fonts: Arena<Font>,
    default_font: SpanFont,
    hyphenator: Option<Hyphenator>,
    content: Vec<Content>,
    header: Option<HeaderFooter>,
    footer: Option<HeaderFooter>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// An empty document on letter paper. Helvetica at 12pt is added as the
    /// first font and used wherever content doesn't pick one.
    pub fn new() -> Document {
        let mut fonts = Arena::new();
        let helvetica = fonts.alloc(Font::from(StandardFont::Helvetica));
        Document {
            info: Info::new(),
            settings: PageSettings::default(),
            outline: Outline::new(),
            fonts,
            default_font: SpanFont::new(helvetica, Pt(12.0)),
            hyphenator: None,
            content: Vec::new(),
            header: None,
            footer: None,
        }
    }

    /// Add a font to the document. The returned id is what [SpanFont]s refer
    /// to and stays valid for the life of the document.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    pub fn fonts(&self) -> &Arena<Font> {
        &self.fonts
    }

    pub fn default_font(&self) -> SpanFont {
        self.default_font
    }

    /// Font used by content that doesn't specify its own
    pub fn set_default_font(&mut self, font: SpanFont) {
        self.default_font = font;
    }

    /// Hyphenate with custom patterns instead of the built in US English ones
    pub fn set_hyphenator(&mut self, hyphenator: Hyphenator) {
        self.hyphenator = Some(hyphenator);
    }

    /// Declare a bookmark. Attach the returned id to a paragraph or table and
    /// it will point wherever that content lands.
    pub fn bookmark<S: ToString>(&mut self, title: S, parent: Option<BookmarkId>) -> BookmarkId {
        self.outline.declare(title, parent)
    }

    /// Append a content item
    pub fn push<C: Into<Content>>(&mut self, content: C) {
        self.content.push(content.into());
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Draw a header in the top margin of every page it returns a paragraph for
    pub fn set_header<F>(&mut self, header: F)
    where
        F: Fn(PageNumber) -> Option<Paragraph> + 'static,
    {
        self.header = Some(Box::new(header));
    }

    /// Draw a footer in the bottom margin of every page it returns a paragraph for
    pub fn set_footer<F>(&mut self, footer: F)
    where
        F: Fn(PageNumber) -> Option<Paragraph> + 'static,
    {
        self.footer = Some(Box::new(footer));
    }

    /// Paginate the content without writing anything. Bookmarks in
    /// [Document::outline] are located as a side effect.
    pub fn render(&mut self) -> Result<Vec<RenderedPage>, PDFError> {
        let Document {
            settings,
            outline,
            fonts,
            default_font,
            hyphenator,
            content,
            header,
            footer,
            ..
        } = self;

        if fonts.get(default_font.id).is_none() {
            return Err(PDFError::UnknownFont(default_font.id.index()));
        }

        let ctx = LayoutContext {
            fonts: &*fonts,
            hyphenator: hyphenator.as_ref().unwrap_or(Hyphenator::english()),
            default_font: *default_font,
        };

        // locations from an earlier render no longer apply
        let mut placed = outline.unplaced();
        let mut layout = DocumentLayout::new(ctx, &*settings);
        layout.layout(content.as_slice())?;
        let pages = layout.finish(&mut placed, header.as_ref(), footer.as_ref())?;
        *outline = placed;
        Ok(pages)
    }

    /// Paginate and write the entire document to the writer. The whole PDF is
    /// assembled in memory before anything is written.
    pub fn write<W: Write>(mut self, mut w: W) -> Result<(), PDFError> {
        let started = Instant::now();
        let pages = self.render()?;

        let Document {
            info,
            settings,
            outline,
            fonts,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        info.write(&mut refs, &mut writer);

        let page_refs: Vec<Ref> = pages
            .iter()
            .map(|page| refs.gen(RefType::Page(page.index)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter() {
            font.write(&mut refs, i, &mut writer);
        }

        let mut content_bytes = 0;
        for page in pages.iter() {
            content_bytes += page
                .write(&mut refs, &fonts, settings.compress, &mut writer)
                .map_err(|e| e.context(format!("writing page {}", page.index + 1)))?;
        }

        let outline_root = outline.write(&mut refs, &mut writer)?;

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        if let Some(root) = outline_root {
            catalog.outlines(root);
        }
        catalog.finish();

        let bytes = writer.finish();
        w.write_all(bytes.as_slice())?;
        log::info!(
            "wrote {} pages ({} bytes, {} bytes of page content) in {}ms",
            pages.len(),
            bytes.len(),
            content_bytes,
            started.elapsed().as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Table};

    #[test]
    fn writes_a_pdf() {
        let mut doc = Document::new();
        doc.info.title("Quarterly report");
        let intro = doc.bookmark("Introduction", None);
        doc.push(Paragraph::from_text("Hello, world!").with_bookmark(intro));
        doc.push(
            Table::new(vec![1.0, 1.0])
                .push(Cell::from_text("a"))
                .push(Cell::from_text("b")),
        );

        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Outlines"));
        assert!(text.contains("/Helvetica"));
    }

    #[test]
    fn renders_with_a_custom_hyphenator() {
        let mut doc = Document::new();
        let courier = doc.add_font(StandardFont::Courier.into());
        doc.set_default_font(SpanFont::new(courier, Pt(10.0)));
        // 72pt leaves room for 12 characters a line
        doc.settings.margins(crate::layout::Margins::symmetric(Pt(72.0), Pt(270.0)));
        doc.set_hyphenator(Hyphenator::new("", "ab-cdefgh").unwrap());
        doc.push(Paragraph::from_text("xxxxxxx abcdefgh").with_hyphenation(true));

        let pages = doc.render().unwrap();
        let content = String::from_utf8_lossy(&pages[0].content);
        assert!(content.contains("(xxxxxxx ab-) Tj"), "{content}");
        assert!(content.contains("(cdefgh) Tj"), "{content}");
    }

    #[test]
    fn rendering_twice_relocates_bookmarks() {
        let mut doc = Document::new();
        let b = doc.bookmark("End", None);
        doc.push(Paragraph::from_text("first"));
        doc.push(Paragraph::from_text("second").with_bookmark(b));
        doc.render().unwrap();
        let first = doc.outline.get(b).and_then(|e| e.location).unwrap();

        doc.settings.margins(crate::layout::Margins::all(Pt(10.0)));
        doc.render().unwrap();
        let second = doc.outline.get(b).and_then(|e| e.location).unwrap();
        assert!(second.top > first.top);
    }
}
