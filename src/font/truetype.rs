use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};

use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;

/// A TrueType / OpenType face, embedded as a Type0 font with Identity-H
/// encoding. Glyphs are addressed by glyph id, and every glyph shown is
/// recorded so the widths and ToUnicode tables only cover what the document
/// uses.
pub struct TrueTypeFont {
    pub face: OwnedFace,
    used: RefCell<BTreeMap<u16, char>>,
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("name", &self.name())
            .field("used_glyphs", &self.used.borrow().len())
            .finish()
    }
}

impl TrueTypeFont {
    /// Parse a font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<TrueTypeFont, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(TrueTypeFont {
            face,
            used: RefCell::new(BTreeMap::new()),
        })
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if it carries one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if it carries one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn units_per_em(&self) -> f32 {
        self.face.as_face_ref().units_per_em() as f32
    }

    /// Ascender in 1000-unit glyph space
    pub fn ascender(&self) -> f32 {
        self.face.as_face_ref().ascender() as f32 * 1000.0 / self.units_per_em()
    }

    /// Descender in 1000-unit glyph space (usually negative)
    pub fn descender(&self) -> f32 {
        self.face.as_face_ref().descender() as f32 * 1000.0 / self.units_per_em()
    }

    /// Line gap in 1000-unit glyph space
    pub fn line_gap(&self) -> f32 {
        self.face.as_face_ref().line_gap() as f32 * 1000.0 / self.units_per_em()
    }

    /// The glyph drawn for `ch`, falling back to the replacement glyph and
    /// then `.notdef`
    pub fn glyph_id(&self, ch: char) -> u16 {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .map(|g| g.0)
            .unwrap_or(0)
    }

    /// Advance width of `ch` in 1000-unit glyph space
    pub fn width(&self, ch: char) -> f32 {
        let face = self.face.as_face_ref();
        let gid = owned_ttf_parser::GlyphId(self.glyph_id(ch));
        face.glyph_hor_advance(gid).unwrap_or(0) as f32 * 1000.0 / self.units_per_em()
    }

    /// Encode `text` as big-endian glyph ids, remembering the glyphs used
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut used = self.used.borrow_mut();
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = self.glyph_id(ch);
            used.entry(gid).or_insert(ch);
            out.extend_from_slice(&gid.to_be_bytes());
        }
        out
    }

    fn used_widths(&self) -> Vec<(u16, f32)> {
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / self.units_per_em();
        self.used
            .borrow()
            .keys()
            .map(|&gid| {
                let advance = face
                    .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                    .unwrap_or(0);
                (gid, advance as f32 * scaling)
            })
            .collect()
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let id_widths = self.used_widths();

        // the most common width becomes the default
        let mut widths_counts: HashMap<u32, usize> = HashMap::new();
        for (_, width) in id_widths.iter() {
            *widths_counts.entry(width.round() as u32).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|(&w, &count)| (count, w))
            .map(|(&w, _)| w as f32)
            .unwrap_or(1000.0);
        cid_font.default_width(most_common_width);

        if !id_widths.is_empty() {
            let mut widths = cid_font.widths();
            let mut start_cid: u16 = id_widths[0].0;
            let mut current_widths: Vec<f32> = Vec::new();
            for (cid, width) in id_widths.into_iter() {
                if (cid - start_cid) as usize != current_widths.len() {
                    widths.consecutive(start_cid, current_widths.drain(..));
                    start_cid = cid;
                }
                current_widths.push(width);
            }
            if !current_widths.is_empty() {
                widths.consecutive(start_cid, current_widths);
            }
            widths.finish();
        }

        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        let data = self.face.as_slice();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            data,
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / self.units_per_em();

        let widths: Vec<f32> = self.used_widths().into_iter().map(|(_, w)| w).collect();
        let max_width = widths.iter().copied().fold(0.0, f32::max);
        let avg_width = if widths.is_empty() {
            0.0
        } else {
            widths.iter().sum::<f32>() / widths.len() as f32
        };

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.replace(' ', "").as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(self.ascender());
        descriptor.descent(self.descender());
        descriptor.leading(self.line_gap());
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(self.ascender()),
        );
        descriptor.x_height(
            face.x_height()
                .or_else(|| face.capital_height())
                .unwrap_or_default() as f32
                * scaling,
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width);
        descriptor.max_width(max_width);
        descriptor.missing_width(max_width);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        let used: Vec<(u16, char)> = self.used.borrow().iter().map(|(&g, &c)| (g, c)).collect();

        // bfchar blocks hold at most 100 entries
        for block in used.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{u:04x}"))
                    .collect();
                map.push_str(&format!("<{id:04x}> <{hex}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
