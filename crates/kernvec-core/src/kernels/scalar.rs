//! Scalar reference implementations.
//!
//! These functions serve as:
//! - The `generic` variant of every operation (always available)
//! - Reference semantics every SIMD variant is tested against
//! - Tail handlers for SIMD remainder processing
//!
//! Float expressions are written in exactly the order the non-FMA SIMD
//! variants evaluate them, so those variants are bit-identical to this file.

#![allow(clippy::cast_possible_truncation)] // Narrowing casts are the defined semantics here.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

use crate::types::{Complex16, Complex32, Complex8};

// =============================================================================
// Hyperbolic tangent
// =============================================================================

/// Saturation threshold of the rational tanh approximation.
///
/// `x > TANH_SATURATION` yields exactly `1.0`, `x <= -TANH_SATURATION` exactly
/// `-1.0`. The comparison is done in `f32`.
pub const TANH_SATURATION: f32 = 4.97;

/// Numerator/denominator coefficients of the degree-(7,6) rational.
pub(crate) const TANH_C1: f32 = 135_135.0;
pub(crate) const TANH_C2: f32 = 17_325.0;
pub(crate) const TANH_C3: f32 = 378.0;
pub(crate) const TANH_C4: f32 = 62_370.0;
pub(crate) const TANH_C5: f32 = 3_150.0;
pub(crate) const TANH_C6: f32 = 28.0;

/// Rational tanh approximation for a single value.
///
/// Absolute error against `f32::tanh` stays below `1e-4` over the whole
/// non-saturated range and is largest right below the threshold.
#[inline]
#[must_use]
pub fn tanh(x: f32) -> f32 {
    if x > TANH_SATURATION {
        1.0
    } else if x <= -TANH_SATURATION {
        -1.0
    } else {
        let x2 = x * x;
        let a = x * (TANH_C1 + x2 * (TANH_C2 + x2 * (TANH_C3 + x2)));
        let b = TANH_C1 + x2 * (TANH_C4 + x2 * (TANH_C5 + x2 * TANH_C6));
        a / b
    }
}

/// `out[i] = tanh(input[i])`.
pub fn tanh_32f(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    for (o, &x) in out.iter_mut().zip(input) {
        *o = tanh(x);
    }
}

// =============================================================================
// Complex multiply-conjugate (8-bit in, 16-bit out)
// =============================================================================

/// `a * conj(b)` with the wide-accumulator narrowing rules.
///
/// The real part saturates at `i16::MAX`; the imaginary part is narrowed with
/// a plain truncating cast. For 8-bit inputs the real part can only leave the
/// `i16` range upward (`(-128)·(-128)·2 = 32768`), and the imaginary part
/// always fits.
#[inline]
#[must_use]
pub fn multiply_conjugate(a: Complex8, b: Complex8) -> Complex16 {
    let (ar, ai) = (i32::from(a.re), i32::from(a.im));
    let (br, bi) = (i32::from(b.re), i32::from(b.im));
    let re = ar * br + ai * bi;
    let im = ai * br - ar * bi;
    Complex16 {
        re: re.min(i32::from(i16::MAX)) as i16,
        im: im as i16,
    }
}

/// `out[i] = a[i] * conj(b[i])`.
pub fn multiply_conjugate_8ic_16ic(out: &mut [Complex16], a: &[Complex8], b: &[Complex8]) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = multiply_conjugate(x, y);
    }
}

// =============================================================================
// Binary slicer
// =============================================================================

/// `out[i] = 1` when `input[i] >= 0.0`, else `0`.
pub fn binary_slicer_32f_32i(out: &mut [i32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    for (o, &x) in out.iter_mut().zip(input) {
        *o = i32::from(x >= 0.0);
    }
}

/// Binary slicer on the IEEE-754 bit pattern, without a float comparison.
///
/// Matches [`binary_slicer_32f_32i`] for every input: `-0.0` slices to 1 and
/// NaN of either sign slices to 0.
pub fn binary_slicer_32f_32i_branchless(out: &mut [i32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    for (o, &x) in out.iter_mut().zip(input) {
        let bits = x.to_bits();
        let magnitude = bits & 0x7FFF_FFFF;
        let is_nan = 0x7F80_0000_u32.wrapping_sub(magnitude) >> 31;
        let is_negative = (bits >> 31) & (magnitude.wrapping_neg() >> 31);
        *o = i32::from((is_nan | is_negative) == 0);
    }
}

// =============================================================================
// Deinterleave real part with scaling
// =============================================================================

/// Reciprocal of the scale factor, computed in double precision once per call.
#[inline]
#[must_use]
pub fn inverse_scale(scalar: f32) -> f32 {
    (1.0_f64 / f64::from(scalar)) as f32
}

/// `out[i] = input[i].re / scalar` (as a multiply by the reciprocal).
pub fn deinterleave_real_8ic_32f(out: &mut [f32], input: &[Complex8], scalar: f32) {
    debug_assert_eq!(out.len(), input.len());
    let inv = inverse_scale(scalar);
    for (o, c) in out.iter_mut().zip(input) {
        *o = f32::from(c.re) * inv;
    }
}

// =============================================================================
// Complex division
// =============================================================================

/// Limited-range complex division `a / b = a·conj(b) / |b|²`.
#[inline]
#[must_use]
pub fn divide(a: Complex32, b: Complex32) -> Complex32 {
    let re = a.re * b.re + a.im * b.im;
    let im = a.im * b.re - a.re * b.im;
    let norm = b.re * b.re + b.im * b.im;
    Complex32 {
        re: re / norm,
        im: im / norm,
    }
}

/// `out[i] = a[i] / b[i]`.
pub fn divide_32fc(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = divide(x, y);
    }
}

// =============================================================================
// Index of minimum magnitude
// =============================================================================

/// Maximum number of points examined by `index_min_32fc_16u`.
pub const INDEX_MIN_MAX_POINTS: usize = u16::MAX as usize;

/// Continues an argmin scan over `input`, whose first element has index
/// `start`, from the running `(min, index)` state.
///
/// Strict `<` keeps the first occurrence on ties and never selects NaN.
#[inline]
#[must_use]
pub(crate) fn index_min_from(input: &[Complex32], start: usize, min: f32, index: u32) -> (f32, u32) {
    let mut min = min;
    let mut index = index;
    for (i, c) in input.iter().enumerate() {
        let mag = c.re * c.re + c.im * c.im;
        if mag < min {
            min = mag;
            index = (start + i) as u32;
        }
    }
    (min, index)
}

/// Writes the index of the first point with the smallest squared magnitude.
///
/// Leaves `out` untouched for an empty input.
pub fn index_min_32fc_16u(out: &mut u16, input: &[Complex32]) {
    if input.is_empty() {
        return;
    }
    let input = &input[..input.len().min(INDEX_MIN_MAX_POINTS)];
    let (_, index) = index_min_from(input, 0, f32::MAX, 0);
    *out = index as u16;
}

// =============================================================================
// Dot product (i16 samples x complex taps)
// =============================================================================

/// Adds `Σ taps[i] * input[i]` to `acc`, sequentially.
#[inline]
#[must_use]
pub(crate) fn dot_prod_accumulate(acc: Complex32, input: &[i16], taps: &[Complex32]) -> Complex32 {
    let mut acc = acc;
    for (&x, t) in input.iter().zip(taps) {
        let x = f32::from(x);
        acc.re += t.re * x;
        acc.im += t.im * x;
    }
    acc
}

/// Writes `Σ taps[i] * input[i]` using four interleaved accumulators.
///
/// Leaves `out` untouched for an empty input.
pub fn dot_prod_16i_32fc(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    debug_assert_eq!(input.len(), taps.len());
    if input.is_empty() {
        return;
    }
    let mut acc = [Complex32::default(); 4];
    let body = input.len() / 4 * 4;
    for (xs, ts) in input[..body].chunks_exact(4).zip(taps[..body].chunks_exact(4)) {
        for lane in 0..4 {
            let x = f32::from(xs[lane]);
            acc[lane].re += ts[lane].re * x;
            acc[lane].im += ts[lane].im * x;
        }
    }
    acc[0] = dot_prod_accumulate(acc[0], &input[body..], &taps[body..]);
    *out = Complex32 {
        re: acc[0].re + acc[1].re + acc[2].re + acc[3].re,
        im: acc[0].im + acc[1].im + acc[2].im + acc[3].im,
    };
}
