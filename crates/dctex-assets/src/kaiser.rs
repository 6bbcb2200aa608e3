//! Kaiser Mipmap Filter
//!
//! Halves an image by point sampling the even source pixels and scaling each
//! sample by a separable Kaiser-Bessel weight. This is not an area filter:
//! every destination pixel comes from exactly one source pixel and the
//! weights are not normalized across a neighborhood.
//!
//! Alpha is handled separately from color:
//! - source pixels with zero alpha leave the destination pixel fully
//!   transparent black
//! - color channels are scaled by the window weights
//! - alpha is carried over unweighted

use dctex_core::kaiser_bessel_window;
use image::{Rgba, RgbaImage};

/// Window weight for every destination row or column
fn weights(target_size: u32) -> Vec<f64> {
    let scale = f64::from(target_size);
    (0..target_size)
        .map(|i| kaiser_bessel_window(f64::from(i) / scale - 0.5))
        .collect()
}

#[inline]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Downscale `source` to `target_size` x `target_size`.
///
/// Destination pixel `(x, y)` samples source pixel `(2x, 2y)`. Destination
/// pixels whose sample lies outside the source stay transparent.
pub fn resample(source: &RgbaImage, target_size: u32) -> RgbaImage {
    let mut dest = RgbaImage::new(target_size, target_size);
    let weights = weights(target_size);

    for (x, y, pixel) in dest.enumerate_pixels_mut() {
        let (sx, sy) = (2 * x, 2 * y);
        if sx >= source.width() || sy >= source.height() {
            continue;
        }

        let Rgba([r, g, b, a]) = *source.get_pixel(sx, sy);
        if a == 0 {
            continue;
        }

        let weight = weights[x as usize] * weights[y as usize];
        let opacity = f64::from(a) / 255.0;

        *pixel = Rgba([
            to_channel(weight * f64::from(r)),
            to_channel(weight * f64::from(g)),
            to_channel(weight * f64::from(b)),
            to_channel(opacity * 255.0),
        ]);
    }

    dest
}
