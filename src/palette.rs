use std::io::Read;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use crate::{color::Color, error::ConfigurationError};

/// An ordered, non-empty set of distinct output colors.
///
/// Order only matters for ties: when two entries are equally close to a color,
/// the one listed first is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

#[derive(Debug, Error)]
pub enum PaletteLoadError {
    #[error("palette file is not a JSON list of hex colors: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

/// On-disk palette: either a bare array of hex strings or an object with a
/// `colors` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteFile {
    Colors(Vec<Color>),
    Object { colors: Vec<Color> },
}

impl From<PaletteFile> for Vec<Color> {
    fn from(file: PaletteFile) -> Self {
        match file {
            PaletteFile::Colors(colors) | PaletteFile::Object { colors } => colors,
        }
    }
}

impl Palette {
    pub fn new(colors: impl Into<Vec<Color>>) -> Result<Self, ConfigurationError> {
        let colors = colors.into();
        if colors.is_empty() {
            return Err(ConfigurationError::EmptyPalette);
        }
        for (index, color) in colors.iter().enumerate() {
            if colors[..index].contains(color) {
                return Err(ConfigurationError::DuplicateColor {
                    color: *color,
                    index,
                });
            }
        }
        Ok(Self { colors })
    }

    /// Read a palette from JSON, either `["#000", "#ffffff"]` or
    /// `{"colors": ["#000", "#ffffff"]}`
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PaletteLoadError> {
        let file: PaletteFile = serde_json::from_reader(reader)?;
        Ok(Self::new(file)?)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Find the entry nearest to `color` by Euclidean distance in RGB.
    ///
    /// Channels of `color` may lie outside `0..=255`, as they do once diffused error
    /// has been added. Squared distances are compared since the ordering is the same.
    pub fn closest(&self, color: [f64; 3]) -> Color {
        let mut closest = self.colors[0];
        let mut closest_distance = distance_squared(color, closest);
        for &candidate in &self.colors[1..] {
            let distance = distance_squared(color, candidate);
            // strict: earlier entries win ties
            if distance < closest_distance {
                closest = candidate;
                closest_distance = distance;
            }
        }
        closest
    }
}

fn distance_squared(color: [f64; 3], candidate: Color) -> f64 {
    color
        .iter()
        .zip(candidate.to_f64())
        .map(|(component, palette_component)| (component - palette_component).powi(2))
        .sum()
}

/// Nearest palette color for a single, possibly out-of-range, RGB value.
pub fn closest_palette_color(r: f64, g: f64, b: f64, palette: &Palette) -> Color {
    palette.closest([r, g, b])
}

/// Built-in palettes selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Black and white
    Mono,
    /// Four evenly spaced grays
    Gray4,
    /// The 16-color IBM CGA palette
    Cga,
    /// Seven-color e-paper panels
    SevenColor,
}

const MONO: [Color; 2] = [Color::new(0, 0, 0), Color::new(255, 255, 255)];

const GRAY4: [Color; 4] = [
    Color::new(0, 0, 0),
    Color::new(85, 85, 85),
    Color::new(170, 170, 170),
    Color::new(255, 255, 255),
];

const CGA: [Color; 16] = [
    Color::new(0x00, 0x00, 0x00),
    Color::new(0x00, 0x00, 0xAA),
    Color::new(0x00, 0xAA, 0x00),
    Color::new(0x00, 0xAA, 0xAA),
    Color::new(0xAA, 0x00, 0x00),
    Color::new(0xAA, 0x00, 0xAA),
    Color::new(0xAA, 0x55, 0x00),
    Color::new(0xAA, 0xAA, 0xAA),
    Color::new(0x55, 0x55, 0x55),
    Color::new(0x55, 0x55, 0xFF),
    Color::new(0x55, 0xFF, 0x55),
    Color::new(0x55, 0xFF, 0xFF),
    Color::new(0xFF, 0x55, 0x55),
    Color::new(0xFF, 0x55, 0xFF),
    Color::new(0xFF, 0xFF, 0x55),
    Color::new(0xFF, 0xFF, 0xFF),
];

const SEVEN_COLOR: [Color; 7] = [
    Color::new(0, 0, 0),
    Color::new(255, 255, 255),
    Color::new(0, 255, 0),
    Color::new(0, 0, 255),
    Color::new(255, 0, 0),
    Color::new(255, 255, 0),
    Color::new(255, 128, 0),
];

impl Preset {
    pub fn colors(self) -> &'static [Color] {
        match self {
            Preset::Mono => &MONO,
            Preset::Gray4 => &GRAY4,
            Preset::Cga => &CGA,
            Preset::SevenColor => &SEVEN_COLOR,
        }
    }

    pub fn palette(self) -> Palette {
        Palette {
            colors: self.colors().to_vec(),
        }
    }
}
