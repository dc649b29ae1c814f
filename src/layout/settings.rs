use crate::layout::Margins;
use crate::units::Pt;

/// Page dimensions as (width, height) in points
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(612.0), Pt(792.0));
pub const LEGAL: PageSize = (Pt(612.0), Pt(1008.0));
pub const TABLOID: PageSize = (Pt(792.0), Pt(1224.0));
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Swap a page size between portrait and landscape
pub trait PageOrientation {
    /// Width no larger than height
    fn portrait(self) -> Self;
    /// Width no smaller than height
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> PageSize {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// How pages are set up
#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    pub size: PageSize,
    pub margins: Margins,
    /// Flate-compress page content streams when writing
    pub compress: bool,
    /// Headers and footers need at least this much room above and below
    /// them inside their margin
    pub min_band_clearance: Pt,
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            size: LETTER,
            margins: Margins::default(),
            compress: true,
            min_band_clearance: Pt(2.0),
        }
    }
}

impl PageSettings {
    pub fn size(&mut self, size: PageSize) -> &mut Self {
        self.size = size;
        self
    }

    pub fn margins(&mut self, margins: Margins) -> &mut Self {
        self.margins = margins;
        self
    }

    pub fn compress(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    pub fn min_band_clearance(&mut self, clearance: Pt) -> &mut Self {
        self.min_band_clearance = clearance;
        self
    }
}
