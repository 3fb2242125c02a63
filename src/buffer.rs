use std::fmt;

use ndarray::prelude::*;

use crate::{color::Color, error::ConfigurationError};

/// Mutable view over interleaved 8-bit RGB or RGBA samples in row-major order.
///
/// Pixel `(x, y)` starts at `(y * width + x) * channels`. A fourth channel is
/// carried along but never read or written.
pub struct PixelBuffer<'a> {
    samples: &'a mut [u8],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(
        samples: &'a mut [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, ConfigurationError> {
        if !(3..=4).contains(&channels) {
            return Err(ConfigurationError::UnsupportedChannels(channels));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(channels))
            .ok_or(ConfigurationError::DimensionOverflow {
                width,
                height,
                channels,
            })?;
        if samples.len() != expected {
            return Err(ConfigurationError::LengthMismatch {
                width,
                height,
                channels,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            samples,
            width,
            height,
            channels,
        })
    }

    /// (width, height)
    pub fn dim(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// Overwrite the color channels of a pixel, leaving alpha alone
    pub fn set_rgb(&mut self, x: usize, y: usize, color: Color) {
        let i = self.offset(x, y);
        let rgb: [u8; 3] = color.into();
        self.samples[i..i + 3].copy_from_slice(&rgb);
    }

    /// Copy the color channels into a `(height, width, 3)` plane of `f64`.
    ///
    /// Diffused error accumulates here, where values may leave `0..=255`.
    pub fn working_plane(&self) -> Array3<f64> {
        Array3::from_shape_fn((self.height, self.width, 3), |(y, x, c)| {
            f64::from(self.samples[self.offset(x, y) + c])
        })
    }
}

// Samples are left out, real images have millions of them
impl fmt::Debug for PixelBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_unsupported_channel_counts() {
        let mut samples = vec![0; 8];
        for channels in [0, 1, 2, 5] {
            assert_eq!(
                PixelBuffer::new(&mut samples, 2, 2, channels).unwrap_err(),
                ConfigurationError::UnsupportedChannels(channels)
            );
        }
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut samples = vec![0; 11];
        assert_eq!(
            PixelBuffer::new(&mut samples, 2, 2, 3).unwrap_err(),
            ConfigurationError::LengthMismatch {
                width: 2,
                height: 2,
                channels: 3,
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let mut samples = Vec::<u8>::new();
        assert_eq!(
            PixelBuffer::new(&mut samples, usize::MAX, 2, 3).unwrap_err(),
            ConfigurationError::DimensionOverflow {
                width: usize::MAX,
                height: 2,
                channels: 3
            }
        );
    }

    #[test]
    fn accepts_empty_image() {
        let mut samples = Vec::<u8>::new();
        let buffer = PixelBuffer::new(&mut samples, 0, 0, 4).unwrap();
        assert_eq!(buffer.dim(), (0, 0));
        assert_eq!(buffer.working_plane().dim(), (0, 0, 3));
    }

    #[test]
    fn addresses_pixels_row_major() {
        // 3x2 RGBA, each sample numbered by position
        let mut samples = (0..24).collect::<Vec<u8>>();
        let mut buffer = PixelBuffer::new(&mut samples, 3, 2, 4).unwrap();
        let plane = buffer.working_plane();
        assert_eq!(plane[[0, 2, 0]], 8.);
        assert_eq!(plane[[1, 1, 2]], 18.);

        buffer.set_rgb(1, 1, Color::new(200, 201, 202));
        buffer.set_rgb(2, 0, Color::new(1, 1, 1));
        assert_eq!(&samples[16..20], &[200, 201, 202, 19]);
        assert_eq!(&samples[8..12], &[1, 1, 1, 11]);
    }

    #[test]
    fn debug_omits_samples() {
        let mut samples = vec![7; 2 * 3 * 4];
        let buffer = PixelBuffer::new(&mut samples, 2, 3, 4).unwrap();
        assert_eq!(
            format!("{buffer:?}"),
            "PixelBuffer { width: 2, height: 3, channels: 4, .. }"
        );
    }

    #[test]
    fn working_plane_drops_alpha() {
        let mut samples = vec![10, 20, 30, 255, 40, 50, 60, 0];
        let buffer = PixelBuffer::new(&mut samples, 2, 1, 4).unwrap();
        assert_eq!(
            buffer.working_plane(),
            array![[[10., 20., 30.], [40., 50., 60.]]]
        );
    }
}
