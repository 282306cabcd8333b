//! SSE-family kernels (SSE, SSE2, SSE3, SSE4.1) for x86_64.
//!
//! Each operation has a single body generic over `ALIGNED`; the exported
//! `*_a_*` and `*_u_*` entry points only choose between aligned and unaligned
//! loads/stores. SSE and SSE2 are part of the x86_64 baseline, SSE3 and SSE4.1
//! require runtime detection before calling.

// SAFETY: Numeric casts in this file are intentional and safe:
// - Index casts are bounded by `INDEX_MIN_MAX_POINTS` (fits in u16)
// - All kernels are checked against the scalar reference in kernels_tests.rs
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_ptr_alignment)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::similar_names)]

use std::arch::x86_64::*;

use super::scalar::{
    self, TANH_C1, TANH_C2, TANH_C3, TANH_C4, TANH_C5, TANH_C6, TANH_SATURATION,
};
use super::tail;
use crate::types::{slice_is_aligned, Complex16, Complex32, Complex8};

/// Register size in bytes; aligned variants require this alignment.
const REGISTER_BYTES: usize = 16;

// =============================================================================
// Load/store helpers
// =============================================================================

#[inline(always)]
unsafe fn load_ps<const ALIGNED: bool>(p: *const f32) -> __m128 {
    if ALIGNED {
        _mm_load_ps(p)
    } else {
        _mm_loadu_ps(p)
    }
}

#[inline(always)]
unsafe fn store_ps<const ALIGNED: bool>(p: *mut f32, v: __m128) {
    if ALIGNED {
        _mm_store_ps(p, v);
    } else {
        _mm_storeu_ps(p, v);
    }
}

#[inline(always)]
unsafe fn load_si128<const ALIGNED: bool>(p: *const __m128i) -> __m128i {
    if ALIGNED {
        _mm_load_si128(p)
    } else {
        _mm_loadu_si128(p)
    }
}

#[inline(always)]
unsafe fn store_si128<const ALIGNED: bool>(p: *mut __m128i, v: __m128i) {
    if ALIGNED {
        _mm_store_si128(p, v);
    } else {
        _mm_storeu_si128(p, v);
    }
}

/// Lane-wise `mask ? a : b` without SSE4.1 `blendv`.
#[inline(always)]
unsafe fn select_ps(mask: __m128, a: __m128, b: __m128) -> __m128 {
    _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b))
}

#[inline(always)]
fn aligned<T>(slice: &[T]) -> bool {
    slice_is_aligned(slice, REGISTER_BYTES)
}

// =============================================================================
// tanh_32f (SSE, 4 lanes)
// =============================================================================

/// Rational tanh on four lanes, same operation order as `scalar::tanh`.
#[target_feature(enable = "sse")]
#[inline]
unsafe fn tanh_ps(x: __m128) -> __m128 {
    let x2 = _mm_mul_ps(x, x);
    let a = _mm_mul_ps(
        x,
        _mm_add_ps(
            _mm_set1_ps(TANH_C1),
            _mm_mul_ps(
                x2,
                _mm_add_ps(
                    _mm_set1_ps(TANH_C2),
                    _mm_mul_ps(x2, _mm_add_ps(_mm_set1_ps(TANH_C3), x2)),
                ),
            ),
        ),
    );
    let b = _mm_add_ps(
        _mm_set1_ps(TANH_C1),
        _mm_mul_ps(
            x2,
            _mm_add_ps(
                _mm_set1_ps(TANH_C4),
                _mm_mul_ps(
                    x2,
                    _mm_add_ps(_mm_set1_ps(TANH_C5), _mm_mul_ps(x2, _mm_set1_ps(TANH_C6))),
                ),
            ),
        ),
    );
    let r = _mm_div_ps(a, b);

    // Comparisons are false for NaN, so NaN flows through the rational.
    let high = _mm_cmpgt_ps(x, _mm_set1_ps(TANH_SATURATION));
    let low = _mm_cmple_ps(x, _mm_set1_ps(-TANH_SATURATION));
    let r = select_ps(high, _mm_set1_ps(1.0), r);
    select_ps(low, _mm_set1_ps(-1.0), r)
}

#[target_feature(enable = "sse")]
#[inline]
unsafe fn tanh_32f_sse<const ALIGNED: bool>(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let body = tail::body_len(out.len(), 4);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(4) {
        store_ps::<ALIGNED>(dst.add(i), tanh_ps(load_ps::<ALIGNED>(src.add(i))));
    }
    tail::unary(out, input, body, scalar::tanh_32f);
}

/// SSE tanh over 16-byte aligned buffers.
///
/// # Safety
///
/// Caller must ensure:
/// - `out.len() == input.len()`
/// - `out` and `input` start on a 16-byte boundary
#[target_feature(enable = "sse")]
pub(crate) unsafe fn tanh_32f_a_sse(out: &mut [f32], input: &[f32]) {
    tanh_32f_sse::<true>(out, input);
}

/// SSE tanh, any alignment.
///
/// # Safety
///
/// Caller must ensure `out.len() == input.len()`.
#[target_feature(enable = "sse")]
pub(crate) unsafe fn tanh_32f_u_sse(out: &mut [f32], input: &[f32]) {
    tanh_32f_sse::<false>(out, input);
}

// =============================================================================
// multiply_conjugate_8ic_16ic (SSE4.1, 8 complex per iteration)
// =============================================================================

/// `a * conj(b)` for four complex values held as interleaved `i16` pairs.
///
/// `madd` keeps both products in `i32`; `packs` then saturates. The real part
/// can only overflow upward and the imaginary part always fits, so the signed
/// saturating pack matches the scalar narrowing rules exactly.
#[target_feature(enable = "sse4.1")]
#[inline]
unsafe fn multiply_conjugate_epi16(a: __m128i, b: __m128i) -> __m128i {
    let re = _mm_madd_epi16(a, b);
    // (br, bi) -> (-bi, br) so madd yields ai*br - ar*bi.
    let swapped = _mm_shufflehi_epi16::<0xB1>(_mm_shufflelo_epi16::<0xB1>(b));
    let rotated = _mm_sign_epi16(swapped, _mm_set_epi16(1, -1, 1, -1, 1, -1, 1, -1));
    let im = _mm_madd_epi16(a, rotated);
    _mm_packs_epi32(_mm_unpacklo_epi32(re, im), _mm_unpackhi_epi32(re, im))
}

#[target_feature(enable = "sse4.1")]
#[inline]
unsafe fn multiply_conjugate_8ic_16ic_sse41<const ALIGNED: bool>(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(a) && aligned(b)));

    let body = tail::body_len(out.len(), 8);
    let pa = a.as_ptr();
    let pb = b.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(8) {
        let va = load_si128::<ALIGNED>(pa.add(i).cast());
        let vb = load_si128::<ALIGNED>(pb.add(i).cast());
        let lo = multiply_conjugate_epi16(_mm_cvtepi8_epi16(va), _mm_cvtepi8_epi16(vb));
        let hi = multiply_conjugate_epi16(
            _mm_cvtepi8_epi16(_mm_srli_si128::<8>(va)),
            _mm_cvtepi8_epi16(_mm_srli_si128::<8>(vb)),
        );
        store_si128::<ALIGNED>(dst.add(i).cast(), lo);
        store_si128::<ALIGNED>(dst.add(i + 4).cast(), hi);
    }
    tail::binary(out, a, b, body, scalar::multiply_conjugate_8ic_16ic);
}

/// SSE4.1 multiply-conjugate over 16-byte aligned buffers.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE4.1
/// - `out`, `a` and `b` have the same length and start on a 16-byte boundary
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn multiply_conjugate_8ic_16ic_a_sse4_1(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    multiply_conjugate_8ic_16ic_sse41::<true>(out, a, b);
}

/// SSE4.1 multiply-conjugate, any alignment.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE4.1
/// - `out`, `a` and `b` have the same length
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn multiply_conjugate_8ic_16ic_u_sse4_1(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    multiply_conjugate_8ic_16ic_sse41::<false>(out, a, b);
}

// =============================================================================
// binary_slicer_32f_32i (SSE2, 4 lanes)
// =============================================================================

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn binary_slicer_32f_32i_sse2<const ALIGNED: bool>(out: &mut [i32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let body = tail::body_len(out.len(), 4);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    let zero = _mm_setzero_ps();
    for i in (0..body).step_by(4) {
        let mask = _mm_cmpge_ps(load_ps::<ALIGNED>(src.add(i)), zero);
        // All-ones lanes shift down to 1, all-zero lanes stay 0.
        let bits = _mm_srli_epi32::<31>(_mm_castps_si128(mask));
        store_si128::<ALIGNED>(dst.add(i).cast(), bits);
    }
    tail::unary(out, input, body, scalar::binary_slicer_32f_32i);
}

/// # Safety
///
/// `out.len() == input.len()`; both 16-byte aligned.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn binary_slicer_32f_32i_a_sse2(out: &mut [i32], input: &[f32]) {
    binary_slicer_32f_32i_sse2::<true>(out, input);
}

/// # Safety
///
/// `out.len() == input.len()`.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn binary_slicer_32f_32i_u_sse2(out: &mut [i32], input: &[f32]) {
    binary_slicer_32f_32i_sse2::<false>(out, input);
}

// =============================================================================
// deinterleave_real_8ic_32f (SSE, 4 complex / SSE4.1, 8 complex per iteration)
// =============================================================================

#[target_feature(enable = "sse4.1")]
#[inline]
unsafe fn deinterleave_real_8ic_32f_sse41<const ALIGNED: bool>(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let inv = scalar::inverse_scale(divisor);
    let scale = _mm_set1_ps(inv);
    let body = tail::body_len(out.len(), 8);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(8) {
        let v = load_si128::<ALIGNED>(src.add(i).cast());
        // Real byte is the low byte of each 16-bit pair: shift up, then
        // arithmetic-shift down to sign-extend it.
        let re = _mm_srai_epi16::<8>(_mm_slli_epi16::<8>(v));
        let lo = _mm_cvtepi32_ps(_mm_cvtepi16_epi32(re));
        let hi = _mm_cvtepi32_ps(_mm_cvtepi16_epi32(_mm_srli_si128::<8>(re)));
        store_ps::<ALIGNED>(dst.add(i), _mm_mul_ps(lo, scale));
        store_ps::<ALIGNED>(dst.add(i + 4), _mm_mul_ps(hi, scale));
    }
    tail::scaled_real(out, input, inv, body);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE4.1
/// - `out.len() == input.len()`, both 16-byte aligned
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_a_sse4_1(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_sse41::<true>(out, input, divisor);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE4.1
/// - `out.len() == input.len()`
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_u_sse4_1(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_sse41::<false>(out, input, divisor);
}

#[target_feature(enable = "sse")]
#[inline]
unsafe fn deinterleave_real_8ic_32f_sse<const ALIGNED: bool>(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || aligned(out));

    let inv = scalar::inverse_scale(divisor);
    let scale = _mm_set1_ps(inv);
    let body = tail::body_len(out.len(), 4);
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(4) {
        // Without SSE4.1 sign extension the real bytes are widened one by one.
        let re = _mm_set_ps(
            f32::from(input[i + 3].re),
            f32::from(input[i + 2].re),
            f32::from(input[i + 1].re),
            f32::from(input[i].re),
        );
        store_ps::<ALIGNED>(dst.add(i), _mm_mul_ps(re, scale));
    }
    tail::scaled_real(out, input, inv, body);
}

/// SSE deinterleave for CPUs without SSE4.1.
///
/// # Safety
///
/// Caller must ensure:
/// - `out.len() == input.len()`
/// - `out` starts on a 16-byte boundary
#[target_feature(enable = "sse")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_a_sse(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_sse::<true>(out, input, divisor);
}

/// # Safety
///
/// `out.len() == input.len()`.
#[target_feature(enable = "sse")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_u_sse(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_sse::<false>(out, input, divisor);
}

// =============================================================================
// divide_32fc (SSE3, 2 complex per register)
// =============================================================================

/// Complex division of two interleaved complex pairs.
///
/// Evaluates the numerator and `|b|²` exactly like `scalar::divide`:
/// `addsub(t1, -t2)` gives `t1 + t2` in even lanes and `t1 - t2` in odd lanes.
#[target_feature(enable = "sse3")]
#[inline]
unsafe fn divide_ps(a: __m128, b: __m128) -> __m128 {
    let b_re = _mm_moveldup_ps(b);
    let b_im = _mm_movehdup_ps(b);
    let a_swap = _mm_shuffle_ps::<0xB1>(a, a);
    let t1 = _mm_mul_ps(a, b_re);
    let t2 = _mm_mul_ps(a_swap, b_im);
    let num = _mm_addsub_ps(t1, _mm_xor_ps(t2, _mm_set1_ps(-0.0)));
    let bb = _mm_mul_ps(b, b);
    let norm = _mm_add_ps(bb, _mm_shuffle_ps::<0xB1>(bb, bb));
    _mm_div_ps(num, norm)
}

#[target_feature(enable = "sse3")]
#[inline]
unsafe fn divide_32fc_sse3<const ALIGNED: bool>(
    out: &mut [Complex32],
    a: &[Complex32],
    b: &[Complex32],
) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(a) && aligned(b)));

    let body = tail::body_len(out.len(), 2);
    let pa = a.as_ptr().cast::<f32>();
    let pb = b.as_ptr().cast::<f32>();
    let dst = out.as_mut_ptr().cast::<f32>();
    for i in (0..body).step_by(2) {
        let off = i * 2;
        let q = divide_ps(load_ps::<ALIGNED>(pa.add(off)), load_ps::<ALIGNED>(pb.add(off)));
        store_ps::<ALIGNED>(dst.add(off), q);
    }
    tail::binary(out, a, b, body, scalar::divide_32fc);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE3
/// - `out`, `a` and `b` have the same length and are 16-byte aligned
#[target_feature(enable = "sse3")]
pub(crate) unsafe fn divide_32fc_a_sse3(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    divide_32fc_sse3::<true>(out, a, b);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE3
/// - `out`, `a` and `b` have the same length
#[target_feature(enable = "sse3")]
pub(crate) unsafe fn divide_32fc_u_sse3(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    divide_32fc_sse3::<false>(out, a, b);
}

// =============================================================================
// index_min_32fc_16u (SSE3, 4 complex per iteration)
// =============================================================================

#[target_feature(enable = "sse3")]
#[inline]
unsafe fn index_min_32fc_16u_sse3<const ALIGNED: bool>(out: &mut u16, input: &[Complex32]) {
    debug_assert!(!ALIGNED || aligned(input));
    if input.is_empty() {
        return;
    }
    let input = &input[..input.len().min(scalar::INDEX_MIN_MAX_POINTS)];

    let body = tail::body_len(input.len(), 4);
    let src = input.as_ptr().cast::<f32>();
    let mut min_vals = _mm_set1_ps(f32::MAX);
    let mut min_idx = _mm_setzero_si128();
    let mut idx = _mm_set_epi32(3, 2, 1, 0);
    let step = _mm_set1_epi32(4);
    for i in (0..body).step_by(4) {
        let x0 = load_ps::<ALIGNED>(src.add(i * 2));
        let x1 = load_ps::<ALIGNED>(src.add(i * 2 + 4));
        // hadd pairs (re², im²) into |z|² for points i..i+4, in order.
        let mag = _mm_hadd_ps(_mm_mul_ps(x0, x0), _mm_mul_ps(x1, x1));
        let lt = _mm_cmplt_ps(mag, min_vals);
        min_vals = select_ps(lt, mag, min_vals);
        let lt = _mm_castps_si128(lt);
        min_idx = _mm_or_si128(_mm_and_si128(lt, idx), _mm_andnot_si128(lt, min_idx));
        idx = _mm_add_epi32(idx, step);
    }

    let mut vals = [0.0_f32; 4];
    let mut idxs = [0_u32; 4];
    _mm_storeu_ps(vals.as_mut_ptr(), min_vals);
    _mm_storeu_si128(idxs.as_mut_ptr().cast(), min_idx);
    let (min, index) = tail::argmin_lanes(&vals, &idxs);
    let (_, index) = scalar::index_min_from(&input[body..], body, min, index);
    *out = index as u16;
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE3
/// - `input` is 16-byte aligned
#[target_feature(enable = "sse3")]
pub(crate) unsafe fn index_min_32fc_16u_a_sse3(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_sse3::<true>(out, input);
}

/// # Safety
///
/// CPU supports SSE3.
#[target_feature(enable = "sse3")]
pub(crate) unsafe fn index_min_32fc_16u_u_sse3(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_sse3::<false>(out, input);
}

// =============================================================================
// dot_prod_16i_32fc (SSE, 4 samples per iteration)
// =============================================================================

#[target_feature(enable = "sse")]
#[inline]
unsafe fn dot_prod_16i_32fc_sse<const ALIGNED: bool>(
    out: &mut Complex32,
    input: &[i16],
    taps: &[Complex32],
) {
    debug_assert_eq!(input.len(), taps.len());
    debug_assert!(!ALIGNED || aligned(taps));
    if input.is_empty() {
        return;
    }

    let body = tail::body_len(input.len(), 4);
    let pt = taps.as_ptr().cast::<f32>();
    let mut acc0 = _mm_setzero_ps();
    let mut acc1 = _mm_setzero_ps();
    for i in (0..body).step_by(4) {
        // No integer-to-float conversion below SSE2: widen in scalar code and
        // duplicate each sample across its tap's (re, im) lanes.
        let x0 = f32::from(input[i]);
        let x1 = f32::from(input[i + 1]);
        let x2 = f32::from(input[i + 2]);
        let x3 = f32::from(input[i + 3]);
        let t01 = load_ps::<ALIGNED>(pt.add(i * 2));
        let t23 = load_ps::<ALIGNED>(pt.add(i * 2 + 4));
        acc0 = _mm_add_ps(acc0, _mm_mul_ps(t01, _mm_set_ps(x1, x1, x0, x0)));
        acc1 = _mm_add_ps(acc1, _mm_mul_ps(t23, _mm_set_ps(x3, x3, x2, x2)));
    }

    let mut lanes = [0.0_f32; 4];
    _mm_storeu_ps(lanes.as_mut_ptr(), _mm_add_ps(acc0, acc1));
    let acc = Complex32::new(lanes[0] + lanes[2], lanes[1] + lanes[3]);
    *out = scalar::dot_prod_accumulate(acc, &input[body..], &taps[body..]);
}

/// # Safety
///
/// Caller must ensure:
/// - `input.len() == taps.len()`
/// - `taps` is 16-byte aligned
#[target_feature(enable = "sse")]
pub(crate) unsafe fn dot_prod_16i_32fc_a_sse(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    dot_prod_16i_32fc_sse::<true>(out, input, taps);
}

/// # Safety
///
/// `input.len() == taps.len()`.
#[target_feature(enable = "sse")]
pub(crate) unsafe fn dot_prod_16i_32fc_u_sse(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    dot_prod_16i_32fc_sse::<false>(out, input, taps);
}
