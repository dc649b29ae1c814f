//! Metrics for the standard Type 1 faces every PDF reader provides, written
//! with WinAnsi encoding so no font program needs embedding.

/// A built-in (non-embedded) PDF font
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaOblique,
}

impl StandardFont {
    /// The PostScript name written as the font's `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    fn is_courier(self) -> bool {
        matches!(
            self,
            StandardFont::Courier
                | StandardFont::CourierBold
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    /// Ascender in 1000-unit glyph space
    pub fn ascender(self) -> f32 {
        if self.is_courier() {
            629.0
        } else {
            718.0
        }
    }

    /// Descender in 1000-unit glyph space (negative)
    pub fn descender(self) -> f32 {
        if self.is_courier() {
            -157.0
        } else {
            -207.0
        }
    }

    /// Advance width of a WinAnsi byte in 1000-unit glyph space
    pub fn width(self, byte: u8) -> f32 {
        if self.is_courier() {
            600.0
        } else {
            helvetica_width(byte)
        }
    }
}

/// Helvetica AFM advance widths for WinAnsi codes
fn helvetica_width(byte: u8) -> f32 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        278, 278, 584, 584, 584, 556, 1015, // :..@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        278, 278, 278, 469, 556, 333, // [..`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
        334, 260, 334, 584, // {..~
    ];
    match byte {
        0x20..=0x7e => ASCII[(byte - 0x20) as usize] as f32,
        0x80 => 556.0,
        0x85 | 0x97 | 0xc6 => 1000.0,
        0x91 | 0x92 => 222.0,
        0x93 | 0x94 => 333.0,
        0x95 => 350.0,
        0x96 => 556.0,
        0xa0 => 278.0,
        0xc0..=0xc5 | 0xc8..=0xcb | 0xdd | 0xde => 667.0,
        0xc7 | 0xd0 | 0xd1 | 0xd9..=0xdc => 722.0,
        0xcc..=0xcf | 0xec..=0xef => 278.0,
        0xd2..=0xd6 | 0xd8 => 778.0,
        0xd7 | 0xf7 => 584.0,
        0xdf | 0xf8 => 611.0,
        0xe6 => 889.0,
        0xe7 | 0xfd | 0xff => 500.0,
        _ => 556.0,
    }
}

/// Map a character to its WinAnsi (Windows-1252) byte. Characters with no
/// WinAnsi code come out as `?`.
pub fn to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007e => c as u8,
        0x00a0..=0x00ff => c as u8,
        0x20ac => 0x80,
        0x201a => 0x82,
        0x0192 => 0x83,
        0x201e => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02c6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8a,
        0x2039 => 0x8b,
        0x0152 => 0x8c,
        0x017d => 0x8e,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201c => 0x93,
        0x201d => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02dc => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9a,
        0x203a => 0x9b,
        0x0153 => 0x9c,
        0x017e => 0x9e,
        0x0178 => 0x9f,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_metrics() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.width(b' '), 278.0);
        assert_eq!(f.width(b'W'), 944.0);
        assert_eq!(f.width(b'i'), 222.0);
        assert_eq!(f.width(b'~'), 584.0);
        assert_eq!(f.width(to_winansi('é')), 556.0);
    }

    #[test]
    fn courier_is_monospaced() {
        for b in [b' ', b'W', b'i', 0xe9] {
            assert_eq!(StandardFont::CourierBold.width(b), 600.0);
        }
    }

    #[test]
    fn winansi_mapping() {
        assert_eq!(to_winansi('A'), b'A');
        assert_eq!(to_winansi('€'), 0x80);
        assert_eq!(to_winansi('—'), 0x97);
        assert_eq!(to_winansi('漢'), b'?');
    }
}
