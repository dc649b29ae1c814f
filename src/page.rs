use id_arena::Arena;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf};

use crate::font::Font;
use crate::layout::RenderedPage;
use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;

impl RenderedPage {
    /// Write the page object and its content stream. Returns the number of
    /// content bytes written.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        fonts: &Arena<Font>,
        compress: bool,
        writer: &mut Pdf,
    ) -> Result<usize, PDFError> {
        let id = refs
            .get(RefType::Page(self.index))
            .ok_or(PDFError::PageMissing(self.index))?;
        let parent = refs
            .get(RefType::PageTree)
            .ok_or(PDFError::PageMissing(self.index))?;
        let content_id = refs.gen(RefType::ContentForPage(self.index));

        let media_box = crate::rect::Rect {
            x1: crate::Pt(0.0),
            y1: crate::Pt(0.0),
            x2: self.size.0,
            y2: self.size.1,
        };

        let mut page = writer.page(id);
        page.media_box(media_box.into());
        page.art_box(self.body.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (id, _) in fonts.iter() {
            let index = id.index();
            if let Some(font_ref) = refs.get(RefType::Font(index)) {
                resource_fonts.pair(Name(format!("F{index}").as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        if compress {
            let compressed =
                compress_to_vec_zlib(&self.content, CompressionLevel::DefaultCompression as u8);
            let written = compressed.len();
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
            Ok(written)
        } else {
            writer.stream(content_id, self.content.as_slice());
            Ok(self.content.len())
        }
    }
}
