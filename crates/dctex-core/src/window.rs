//! Kaiser-Bessel Window
//!
//! Smoothing weights for mipmap downscaling.

/// Shape parameter of the window. Small values keep the window close to flat.
pub const KAISER_ALPHA: f64 = 0.25;

/// Zeroth order modified Bessel function of the first kind.
///
/// Sums the power series until adding the next term no longer changes the
/// result at `f64` precision.
pub fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;

    loop {
        let factor = x / k;
        term *= 0.25 * factor * factor;
        let next = sum + term;
        if next == sum {
            return sum;
        }
        sum = next;
        k += 1.0;
    }
}

/// Kaiser-Bessel window evaluated at `x` in `[-1, 1]`.
///
/// Returns 1.0 at the center. Inputs outside the window are clamped to its
/// edge.
pub fn kaiser_bessel_window(x: f64) -> f64 {
    let x = x.clamp(-1.0, 1.0);
    bessel_i0(KAISER_ALPHA * (1.0 - x * x).sqrt()) / bessel_i0(KAISER_ALPHA)
}
