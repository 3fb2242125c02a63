use thiserror::Error;

use crate::color::Color;

/// A dithering pass was set up with inputs it cannot process.
///
/// Every variant is detected before the pixel buffer is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("palette cannot be empty")]
    EmptyPalette,
    #[error("palette color {color} at index {index} is a duplicate")]
    DuplicateColor { color: Color, index: usize },
    #[error("unsupported channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels(usize),
    #[error(
        "buffer holds {actual} samples but a {width}x{height} image with {channels} channels needs {expected}"
    )]
    LengthMismatch {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("a {width}x{height} image with {channels} channels is too large to address")]
    DimensionOverflow {
        width: usize,
        height: usize,
        channels: usize,
    },
}
