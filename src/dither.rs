use std::time::Instant;

use image::DynamicImage;
use ndarray::{arr1, azip, s};
use tracing::debug;

use crate::{buffer::PixelBuffer, error::ConfigurationError, palette::Palette};

pub trait Dither {
    /// Replace every pixel of `image` with a palette color, in place.
    fn dither(&self, image: &mut PixelBuffer<'_>, palette: &Palette);
}

/// Classic error diffusion over a single top-to-bottom, left-to-right scan.
///
/// ```text
///        X   7
///    3   5   1     (/16)
/// ```
pub struct FloydSteinberg;

impl FloydSteinberg {
    /// Neighbor offsets `[dx, dy]` and the share of error each one receives
    pub const KERNEL: [([isize; 2], f64); 4] = [
        ([1, 0], 7. / 16.),
        ([-1, 1], 3. / 16.),
        ([0, 1], 5. / 16.),
        ([1, 1], 1. / 16.),
    ];

    /// Neighbors of `(x, y)` that receive error, skipping those off the image.
    fn diffusion_targets(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = ([usize; 2], f64)> {
        Self::KERNEL
            .into_iter()
            .filter_map(move |([i, j], error_fraction)| {
                let x_i = x.checked_add_signed(i).filter(|x_i| *x_i < width)?;
                let y_j = y.checked_add_signed(j).filter(|y_j| *y_j < height)?;
                Some(([x_i, y_j], error_fraction))
            })
    }
}

impl Dither for FloydSteinberg {
    fn dither(&self, image: &mut PixelBuffer<'_>, palette: &Palette) {
        let (width, height) = image.dim();

        // Unvisited pixels accumulate error here without clamping
        let mut compensated_image = image.working_plane();
        for y in 0..height {
            for x in 0..width {
                let old = compensated_image.slice(s![y, x, ..]).to_owned();
                let new = palette.closest([old[0], old[1], old[2]]);
                image.set_rgb(x, y, new);

                let quantization_error = old - arr1(&new.to_f64());
                for ([x_i, y_j], error_fraction) in Self::diffusion_targets(x, y, width, height) {
                    let pixel = compensated_image.slice_mut(s![y_j, x_i, ..]);
                    azip! {
                        (p in pixel, q in &quantization_error) *p += q * error_fraction
                    }
                }
            }
        }
    }
}

/// Dither interleaved 8-bit samples in place.
///
/// `channels` is 3 for RGB or 4 for RGBA, where alpha is left untouched. The
/// buffer is validated against `width * height * channels` first and is not
/// modified when that fails.
pub fn apply_floyd_steinberg(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    palette: &Palette,
) -> Result<(), ConfigurationError> {
    let mut image = PixelBuffer::new(buffer, width, height, channels)?;
    debug!(
        width,
        height,
        channels = image.channels(),
        colors = palette.colors().len(),
        "Applying Floyd-Steinberg dithering"
    );
    let start = Instant::now();
    FloydSteinberg.dither(&mut image, palette);
    debug!(elapsed = ?start.elapsed(), "Floyd-Steinberg dithering complete");
    Ok(())
}

/// Dither a decoded image, keeping its alpha channel if it has one.
///
/// Images with more than 8 bits per channel are reduced to 8 bits first.
pub fn dither_image(
    image: DynamicImage,
    palette: &Palette,
) -> Result<DynamicImage, ConfigurationError> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    if image.color().has_alpha() {
        let mut rgba = image.into_rgba8();
        apply_floyd_steinberg(&mut rgba, width, height, 4, palette)?;
        Ok(DynamicImage::ImageRgba8(rgba))
    } else {
        let mut rgb = image.into_rgb8();
        apply_floyd_steinberg(&mut rgb, width, height, 3, palette)?;
        Ok(DynamicImage::ImageRgb8(rgb))
    }
}
