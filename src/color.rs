use std::fmt::{self, Display};
use std::ops::Index;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// An 8-bit RGB triple.
///
/// Serializes as `#rrggbb` and accepts either `#rgb` or `#rrggbb` when parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Color([u8; 3]);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Channels widened to `f64` for error arithmetic
    pub fn to_f64(self) -> [f64; 3] {
        self.0.map(f64::from)
    }
}

impl Index<usize> for Color {
    type Output = u8;
    fn index(&'_ self, i: usize) -> &'_ Self::Output {
        &self.0[i]
    }
}

impl From<[u8; 3]> for Color {
    fn from(color: [u8; 3]) -> Self {
        Self(color)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl AsRef<[u8; 3]> for Color {
    fn as_ref(&self) -> &[u8; 3] {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self[0], self[1], self[2])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid hex digit {0:?}")]
    Digit(char),
    #[error("Unexpected length {0} should be 3 or 6")]
    Length(usize),
    #[error("Color should be preceded by a pound symbol")]
    MissingPound,
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let hex = input
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingPound)?;
        if hex.len() != 3 && hex.len() != 6 {
            return Err(ColorParseError::Length(hex.len()));
        }
        let mut parsed = 0u32;
        for c in hex.chars() {
            let digit = c.to_digit(16).ok_or(ColorParseError::Digit(c))?;
            parsed = parsed << 4 | digit;
        }

        let mut res = [0u8; 3];
        if hex.len() == 3 {
            for (i, res_i) in res.iter_mut().enumerate() {
                // Hex shorthand: 0xF becomes 0xFF
                let digit = (parsed >> (8 - 4 * i) & 0xF) as u8;
                *res_i = digit << 4 | digit;
            }
        } else {
            for (i, res_i) in res.iter_mut().enumerate() {
                *res_i = (parsed >> (16 - 8 * i) & 0xFF) as u8;
            }
        }
        Ok(Self(res))
    }
}
