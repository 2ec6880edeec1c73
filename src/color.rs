use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA color with 8 bits per channel. `alpha == 255` is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RgbColor {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel.
    pub alpha: u8,
}

impl RgbColor {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Color with explicit alpha.
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if !s.is_ascii() {
            return Err("hex color must be ASCII".to_owned());
        }
        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
        }
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn to_premul_array(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }

        [
            premul(self.red, self.alpha),
            premul(self.green, self.alpha),
            premul(self.blue, self.alpha),
            self.alpha,
        ]
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// A color usable by fill and draw operations.
///
/// Every variant is resolved against the target canvas by the raster engine
/// (see [`crate::RasterEngine::resolve_color`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// A single solid color.
    Rgb(RgbColor),
    /// Fully transparent.
    Transparent,
    /// Colors cycled pixel by pixel in row-major order.
    Styled(Vec<RgbColor>),
    /// The tile registered on the target surface, repeated from the fill origin.
    Tiled,
    /// The brush registered on the target surface. Fills stamp it once on the fill origin;
    /// shape outlines stamp it along the path.
    Brushed,
}

impl Color {
    /// Opaque solid color.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Rgb(RgbColor::rgb(red, green, blue))
    }
}

impl From<RgbColor> for Color {
    fn from(c: RgbColor) -> Self {
        Self::Rgb(c)
    }
}

#[cfg(test)]
#[path = "../tests/unit/color.rs"]
mod tests;
