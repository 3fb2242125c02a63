//! Reduce raster images to a fixed palette with Floyd-Steinberg error diffusion.
//!
//! [`apply_floyd_steinberg`] works on raw interleaved RGB/RGBA samples,
//! [`dither_image`] on decoded [`image::DynamicImage`]s.

pub mod buffer;
pub mod color;
pub mod dither;
pub mod error;
pub mod palette;

pub use buffer::PixelBuffer;
pub use color::{Color, ColorParseError};
pub use dither::{apply_floyd_steinberg, dither_image, Dither, FloydSteinberg};
pub use error::ConfigurationError;
pub use palette::{closest_palette_color, Palette, PaletteLoadError, Preset};
