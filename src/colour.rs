use crate::PDFError;

/// A colour, expressed in RGB, CMYK or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k range from 0.0 to 1.0
    pub fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// The raw components of the colour, in colour-space order
    pub fn components(&self) -> Vec<f32> {
        match *self {
            Colour::RGB { r, g, b } => vec![r, g, b],
            Colour::CMYK { c, m, y, k } => vec![c, m, y, k],
            Colour::Grey { g } => vec![g],
        }
    }

    /// Check that every component lies within [0, 1]
    pub fn validate(&self) -> Result<Colour, PDFError> {
        match self
            .components()
            .into_iter()
            .find(|v| !(0.0..=1.0).contains(v))
        {
            Some(bad) => Err(PDFError::ColourOutOfRange(bad)),
            None => Ok(*self),
        }
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

impl<T: Into<f32>> From<(T, T, T, T)> for Colour {
    fn from(c: (T, T, T, T)) -> Self {
        Colour::CMYK {
            c: c.0.into(),
            m: c.1.into(),
            y: c.2.into(),
            k: c.3.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_out_of_range_components() {
        assert!(Colour::new_rgb(0.0, 0.5, 1.0).validate().is_ok());
        assert!(matches!(
            Colour::new_cmyk(0.0, 1.2, 0.0, 0.0).validate(),
            Err(PDFError::ColourOutOfRange(v)) if v == 1.2
        ));
        assert!(Colour::new_grey(-0.1).validate().is_err());
    }

    #[test]
    fn byte_constructors_scale() {
        assert_eq!(
            Colour::new_rgb_bytes(255, 0, 255),
            Colour::new_rgb(1.0, 0.0, 1.0)
        );
    }
}
