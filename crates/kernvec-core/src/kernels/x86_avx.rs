//! AVX-family kernels (AVX, AVX+FMA, AVX2, AVX2+FMA) for x86_64.
//!
//! 256-bit counterparts of `x86_sse`. The AVX `tanh` variants hand their tail
//! to the unaligned SSE kernel; everything else tails into scalar code.
//!
//! All functions require runtime AVX/AVX2 (and FMA where named) detection
//! before calling.

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
use super::x86_sse;
use crate::types::{slice_is_aligned, Complex16, Complex32, Complex8};

/// Register size in bytes; aligned variants require this alignment.
const REGISTER_BYTES: usize = 32;

// =============================================================================
// Load/store helpers
// =============================================================================

#[target_feature(enable = "avx")]
#[inline]
unsafe fn load_ps<const ALIGNED: bool>(p: *const f32) -> __m256 {
    if ALIGNED {
        _mm256_load_ps(p)
    } else {
        _mm256_loadu_ps(p)
    }
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn store_ps<const ALIGNED: bool>(p: *mut f32, v: __m256) {
    if ALIGNED {
        _mm256_store_ps(p, v);
    } else {
        _mm256_storeu_ps(p, v);
    }
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn load_si256<const ALIGNED: bool>(p: *const __m256i) -> __m256i {
    if ALIGNED {
        _mm256_load_si256(p)
    } else {
        _mm256_loadu_si256(p)
    }
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn store_si256<const ALIGNED: bool>(p: *mut __m256i, v: __m256i) {
    if ALIGNED {
        _mm256_store_si256(p, v);
    } else {
        _mm256_storeu_si256(p, v);
    }
}

#[inline(always)]
fn aligned<T>(slice: &[T]) -> bool {
    slice_is_aligned(slice, REGISTER_BYTES)
}

// =============================================================================
// tanh_32f (AVX / AVX+FMA, 8 lanes)
// =============================================================================

/// Forces `±1.0` outside the threshold. NaN compares false and is kept.
#[target_feature(enable = "avx")]
#[inline]
unsafe fn saturate_ps(x: __m256, r: __m256) -> __m256 {
    let high = _mm256_cmp_ps::<_CMP_GT_OQ>(x, _mm256_set1_ps(TANH_SATURATION));
    let low = _mm256_cmp_ps::<_CMP_LE_OQ>(x, _mm256_set1_ps(-TANH_SATURATION));
    let r = _mm256_blendv_ps(r, _mm256_set1_ps(1.0), high);
    _mm256_blendv_ps(r, _mm256_set1_ps(-1.0), low)
}

/// Rational tanh on eight lanes, same operation order as `scalar::tanh`.
#[target_feature(enable = "avx")]
#[inline]
unsafe fn tanh_ps(x: __m256) -> __m256 {
    let x2 = _mm256_mul_ps(x, x);
    let a = _mm256_mul_ps(
        x,
        _mm256_add_ps(
            _mm256_set1_ps(TANH_C1),
            _mm256_mul_ps(
                x2,
                _mm256_add_ps(
                    _mm256_set1_ps(TANH_C2),
                    _mm256_mul_ps(x2, _mm256_add_ps(_mm256_set1_ps(TANH_C3), x2)),
                ),
            ),
        ),
    );
    let b = _mm256_add_ps(
        _mm256_set1_ps(TANH_C1),
        _mm256_mul_ps(
            x2,
            _mm256_add_ps(
                _mm256_set1_ps(TANH_C4),
                _mm256_mul_ps(
                    x2,
                    _mm256_add_ps(_mm256_set1_ps(TANH_C5), _mm256_mul_ps(x2, _mm256_set1_ps(TANH_C6))),
                ),
            ),
        ),
    );
    saturate_ps(x, _mm256_div_ps(a, b))
}

/// Horner form with fused multiply-adds. Not bit-identical to scalar.
#[target_feature(enable = "avx", enable = "fma")]
#[inline]
unsafe fn tanh_ps_fma(x: __m256) -> __m256 {
    let x2 = _mm256_mul_ps(x, x);
    let p = _mm256_add_ps(_mm256_set1_ps(TANH_C3), x2);
    let p = _mm256_fmadd_ps(x2, p, _mm256_set1_ps(TANH_C2));
    let p = _mm256_fmadd_ps(x2, p, _mm256_set1_ps(TANH_C1));
    let a = _mm256_mul_ps(x, p);
    let q = _mm256_fmadd_ps(x2, _mm256_set1_ps(TANH_C6), _mm256_set1_ps(TANH_C5));
    let q = _mm256_fmadd_ps(x2, q, _mm256_set1_ps(TANH_C4));
    let b = _mm256_fmadd_ps(x2, q, _mm256_set1_ps(TANH_C1));
    saturate_ps(x, _mm256_div_ps(a, b))
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn tanh_32f_avx<const ALIGNED: bool>(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let body = tail::body_len(out.len(), 8);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(8) {
        store_ps::<ALIGNED>(dst.add(i), tanh_ps(load_ps::<ALIGNED>(src.add(i))));
    }
    tail::unary(out, input, body, x86_sse::tanh_32f_u_sse);
}

#[target_feature(enable = "avx", enable = "fma")]
#[inline]
unsafe fn tanh_32f_avx_fma<const ALIGNED: bool>(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let body = tail::body_len(out.len(), 8);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(8) {
        store_ps::<ALIGNED>(dst.add(i), tanh_ps_fma(load_ps::<ALIGNED>(src.add(i))));
    }
    tail::unary(out, input, body, x86_sse::tanh_32f_u_sse);
}

/// AVX tanh over 32-byte aligned buffers.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX (enforced by `#[target_feature]` and runtime detection)
/// - `out.len() == input.len()`
/// - `out` and `input` start on a 32-byte boundary
#[target_feature(enable = "avx")]
pub(crate) unsafe fn tanh_32f_a_avx(out: &mut [f32], input: &[f32]) {
    tanh_32f_avx::<true>(out, input);
}

/// AVX tanh, any alignment.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `out.len() == input.len()`
#[target_feature(enable = "avx")]
pub(crate) unsafe fn tanh_32f_u_avx(out: &mut [f32], input: &[f32]) {
    tanh_32f_avx::<false>(out, input);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX and FMA
/// - `out.len() == input.len()`, both 32-byte aligned
#[target_feature(enable = "avx", enable = "fma")]
pub(crate) unsafe fn tanh_32f_a_avx_fma(out: &mut [f32], input: &[f32]) {
    tanh_32f_avx_fma::<true>(out, input);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX and FMA
/// - `out.len() == input.len()`
#[target_feature(enable = "avx", enable = "fma")]
pub(crate) unsafe fn tanh_32f_u_avx_fma(out: &mut [f32], input: &[f32]) {
    tanh_32f_avx_fma::<false>(out, input);
}

// =============================================================================
// multiply_conjugate_8ic_16ic (AVX2, 16 complex per iteration)
// =============================================================================

/// `a * conj(b)` for eight complex values held as interleaved `i16` pairs.
///
/// All steps stay inside 128-bit lanes, so the unpack/pack pair restores the
/// input element order without a cross-lane permute.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn multiply_conjugate_epi16(a: __m256i, b: __m256i) -> __m256i {
    let re = _mm256_madd_epi16(a, b);
    let swapped = _mm256_shufflehi_epi16::<0xB1>(_mm256_shufflelo_epi16::<0xB1>(b));
    // Low half of every 32-bit pair negated: (bi, br) -> (-bi, br).
    let rotated = _mm256_sign_epi16(swapped, _mm256_set1_epi32(0x0001_FFFF));
    let im = _mm256_madd_epi16(a, rotated);
    _mm256_packs_epi32(_mm256_unpacklo_epi32(re, im), _mm256_unpackhi_epi32(re, im))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn multiply_conjugate_8ic_16ic_avx2<const ALIGNED: bool>(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(a) && aligned(b)));

    let body = tail::body_len(out.len(), 16);
    let pa = a.as_ptr();
    let pb = b.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(16) {
        let va = load_si256::<ALIGNED>(pa.add(i).cast());
        let vb = load_si256::<ALIGNED>(pb.add(i).cast());
        let lo = multiply_conjugate_epi16(
            _mm256_cvtepi8_epi16(_mm256_castsi256_si128(va)),
            _mm256_cvtepi8_epi16(_mm256_castsi256_si128(vb)),
        );
        let hi = multiply_conjugate_epi16(
            _mm256_cvtepi8_epi16(_mm256_extracti128_si256::<1>(va)),
            _mm256_cvtepi8_epi16(_mm256_extracti128_si256::<1>(vb)),
        );
        store_si256::<ALIGNED>(dst.add(i).cast(), lo);
        store_si256::<ALIGNED>(dst.add(i + 8).cast(), hi);
    }
    tail::binary(out, a, b, body, scalar::multiply_conjugate_8ic_16ic);
}

/// AVX2 multiply-conjugate over 32-byte aligned buffers.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `out`, `a` and `b` have the same length and start on a 32-byte boundary
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn multiply_conjugate_8ic_16ic_a_avx2(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    multiply_conjugate_8ic_16ic_avx2::<true>(out, a, b);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `out`, `a` and `b` have the same length
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn multiply_conjugate_8ic_16ic_u_avx2(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) {
    multiply_conjugate_8ic_16ic_avx2::<false>(out, a, b);
}

// =============================================================================
// binary_slicer_32f_32i (AVX, 8 lanes)
// =============================================================================

#[target_feature(enable = "avx")]
#[inline]
unsafe fn binary_slicer_32f_32i_avx<const ALIGNED: bool>(out: &mut [i32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let body = tail::body_len(out.len(), 8);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    let zero = _mm256_setzero_ps();
    // AVX has no 256-bit integer shift: mask against integer 1 instead.
    let one = _mm256_castsi256_ps(_mm256_set1_epi32(1));
    for i in (0..body).step_by(8) {
        let mask = _mm256_cmp_ps::<_CMP_GE_OQ>(load_ps::<ALIGNED>(src.add(i)), zero);
        let bits = _mm256_castps_si256(_mm256_and_ps(mask, one));
        store_si256::<ALIGNED>(dst.add(i).cast(), bits);
    }
    tail::unary(out, input, body, scalar::binary_slicer_32f_32i);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `out.len() == input.len()`, both 32-byte aligned
#[target_feature(enable = "avx")]
pub(crate) unsafe fn binary_slicer_32f_32i_a_avx(out: &mut [i32], input: &[f32]) {
    binary_slicer_32f_32i_avx::<true>(out, input);
}

/// # Safety
///
/// CPU supports AVX; `out.len() == input.len()`.
#[target_feature(enable = "avx")]
pub(crate) unsafe fn binary_slicer_32f_32i_u_avx(out: &mut [i32], input: &[f32]) {
    binary_slicer_32f_32i_avx::<false>(out, input);
}

// =============================================================================
// deinterleave_real_8ic_32f (AVX2, 16 complex per iteration)
// =============================================================================

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn deinterleave_real_8ic_32f_avx2<const ALIGNED: bool>(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    debug_assert_eq!(out.len(), input.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(input)));

    let inv = scalar::inverse_scale(divisor);
    let scale = _mm256_set1_ps(inv);
    let body = tail::body_len(out.len(), 16);
    let src = input.as_ptr();
    let dst = out.as_mut_ptr();
    for i in (0..body).step_by(16) {
        let v = load_si256::<ALIGNED>(src.add(i).cast());
        let re = _mm256_srai_epi16::<8>(_mm256_slli_epi16::<8>(v));
        let lo = _mm256_cvtepi32_ps(_mm256_cvtepi16_epi32(_mm256_castsi256_si128(re)));
        let hi = _mm256_cvtepi32_ps(_mm256_cvtepi16_epi32(_mm256_extracti128_si256::<1>(re)));
        store_ps::<ALIGNED>(dst.add(i), _mm256_mul_ps(lo, scale));
        store_ps::<ALIGNED>(dst.add(i + 8), _mm256_mul_ps(hi, scale));
    }
    tail::scaled_real(out, input, inv, body);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `out.len() == input.len()`, both 32-byte aligned
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_a_avx2(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_avx2::<true>(out, input, divisor);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `out.len() == input.len()`
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn deinterleave_real_8ic_32f_u_avx2(
    out: &mut [f32],
    input: &[Complex8],
    divisor: f32,
) {
    deinterleave_real_8ic_32f_avx2::<false>(out, input, divisor);
}

// =============================================================================
// divide_32fc (AVX, 4 complex per register)
// =============================================================================

/// 256-bit version of `x86_sse::divide_ps`; every shuffle stays in-lane.
#[target_feature(enable = "avx")]
#[inline]
unsafe fn divide_ps(a: __m256, b: __m256) -> __m256 {
    let b_re = _mm256_moveldup_ps(b);
    let b_im = _mm256_movehdup_ps(b);
    let a_swap = _mm256_permute_ps::<0xB1>(a);
    let t1 = _mm256_mul_ps(a, b_re);
    let t2 = _mm256_mul_ps(a_swap, b_im);
    let num = _mm256_addsub_ps(t1, _mm256_xor_ps(t2, _mm256_set1_ps(-0.0)));
    let bb = _mm256_mul_ps(b, b);
    let norm = _mm256_add_ps(bb, _mm256_permute_ps::<0xB1>(bb));
    _mm256_div_ps(num, norm)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn divide_32fc_avx<const ALIGNED: bool>(
    out: &mut [Complex32],
    a: &[Complex32],
    b: &[Complex32],
) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    debug_assert!(!ALIGNED || (aligned(out) && aligned(a) && aligned(b)));

    let body = tail::body_len(out.len(), 4);
    let pa = a.as_ptr().cast::<f32>();
    let pb = b.as_ptr().cast::<f32>();
    let dst = out.as_mut_ptr().cast::<f32>();
    for i in (0..body).step_by(4) {
        let off = i * 2;
        let q = divide_ps(load_ps::<ALIGNED>(pa.add(off)), load_ps::<ALIGNED>(pb.add(off)));
        store_ps::<ALIGNED>(dst.add(off), q);
    }
    tail::binary(out, a, b, body, scalar::divide_32fc);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `out`, `a` and `b` have the same length and are 32-byte aligned
#[target_feature(enable = "avx")]
pub(crate) unsafe fn divide_32fc_a_avx(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    divide_32fc_avx::<true>(out, a, b);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `out`, `a` and `b` have the same length
#[target_feature(enable = "avx")]
pub(crate) unsafe fn divide_32fc_u_avx(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    divide_32fc_avx::<false>(out, a, b);
}

// =============================================================================
// index_min_32fc_16u (AVX2, 8 complex per iteration)
// =============================================================================

/// `RUNNING_MIN` selects how the running minimum is updated: `false` blends
/// it with the comparison mask, `true` recomputes it with `min_ps`. Both
/// keep the earlier value on ties and on NaN magnitudes.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn index_min_32fc_16u_avx2<const ALIGNED: bool, const RUNNING_MIN: bool>(
    out: &mut u16,
    input: &[Complex32],
) {
    debug_assert!(!ALIGNED || aligned(input));
    if input.is_empty() {
        return;
    }
    let input = &input[..input.len().min(scalar::INDEX_MIN_MAX_POINTS)];

    let body = tail::body_len(input.len(), 8);
    let src = input.as_ptr().cast::<f32>();
    let mut min_vals = _mm256_set1_ps(f32::MAX);
    let mut min_idx = _mm256_setzero_si256();
    // In-lane hadd yields magnitudes in point order 0,1,4,5 | 2,3,6,7.
    let mut idx = _mm256_set_epi32(7, 6, 3, 2, 5, 4, 1, 0);
    let step = _mm256_set1_epi32(8);
    for i in (0..body).step_by(8) {
        let x0 = load_ps::<ALIGNED>(src.add(i * 2));
        let x1 = load_ps::<ALIGNED>(src.add(i * 2 + 8));
        let mag = _mm256_hadd_ps(_mm256_mul_ps(x0, x0), _mm256_mul_ps(x1, x1));
        let lt = _mm256_cmp_ps::<_CMP_LT_OQ>(mag, min_vals);
        min_vals = if RUNNING_MIN {
            _mm256_min_ps(mag, min_vals)
        } else {
            _mm256_blendv_ps(min_vals, mag, lt)
        };
        min_idx = _mm256_castps_si256(_mm256_blendv_ps(
            _mm256_castsi256_ps(min_idx),
            _mm256_castsi256_ps(idx),
            lt,
        ));
        idx = _mm256_add_epi32(idx, step);
    }

    let mut vals = [0.0_f32; 8];
    let mut idxs = [0_u32; 8];
    _mm256_storeu_ps(vals.as_mut_ptr(), min_vals);
    _mm256_storeu_si256(idxs.as_mut_ptr().cast(), min_idx);
    let (min, index) = tail::argmin_lanes(&vals, &idxs);
    let (_, index) = scalar::index_min_from(&input[body..], body, min, index);
    *out = index as u16;
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `input` is 32-byte aligned
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn index_min_32fc_16u_a_avx2(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_avx2::<true, false>(out, input);
}

/// # Safety
///
/// CPU supports AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn index_min_32fc_16u_u_avx2(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_avx2::<false, false>(out, input);
}

/// AVX2 index-of-minimum tracking the running minimum with `min_ps`.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `input` is 32-byte aligned
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn index_min_32fc_16u_a_avx2_variant_1(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_avx2::<true, true>(out, input);
}

/// # Safety
///
/// CPU supports AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn index_min_32fc_16u_u_avx2_variant_1(out: &mut u16, input: &[Complex32]) {
    index_min_32fc_16u_avx2::<false, true>(out, input);
}

// =============================================================================
// dot_prod_16i_32fc (AVX2 / AVX2+FMA, 8 samples per iteration)
// =============================================================================

/// Loads eight `i16` samples as `f32`, each duplicated across a (re, im) pair:
/// returns `(x0 x0 x1 x1 x2 x2 x3 x3, x4 x4 .. x7 x7)`.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load_samples<const ALIGNED: bool>(p: *const i16) -> (__m256, __m256) {
    let raw = if ALIGNED {
        _mm_load_si128(p.cast())
    } else {
        _mm_loadu_si128(p.cast())
    };
    let xf = _mm256_cvtepi32_ps(_mm256_cvtepi16_epi32(raw));
    (
        _mm256_permutevar8x32_ps(xf, _mm256_set_epi32(3, 3, 2, 2, 1, 1, 0, 0)),
        _mm256_permutevar8x32_ps(xf, _mm256_set_epi32(7, 7, 6, 6, 5, 5, 4, 4)),
    )
}

/// Folds four interleaved complex partial sums into one.
#[target_feature(enable = "avx")]
#[inline]
unsafe fn reduce_complex(acc: __m256) -> Complex32 {
    let mut lanes = [0.0_f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    Complex32::new(
        lanes[0] + lanes[2] + lanes[4] + lanes[6],
        lanes[1] + lanes[3] + lanes[5] + lanes[7],
    )
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn dot_prod_16i_32fc_avx2<const ALIGNED: bool>(
    out: &mut Complex32,
    input: &[i16],
    taps: &[Complex32],
) {
    debug_assert_eq!(input.len(), taps.len());
    debug_assert!(!ALIGNED || (aligned(input) && aligned(taps)));
    if input.is_empty() {
        return;
    }

    let body = tail::body_len(input.len(), 8);
    let src = input.as_ptr();
    let pt = taps.as_ptr().cast::<f32>();
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();
    for i in (0..body).step_by(8) {
        let (x_lo, x_hi) = load_samples::<ALIGNED>(src.add(i));
        let t_lo = load_ps::<ALIGNED>(pt.add(i * 2));
        let t_hi = load_ps::<ALIGNED>(pt.add(i * 2 + 8));
        acc0 = _mm256_add_ps(acc0, _mm256_mul_ps(t_lo, x_lo));
        acc1 = _mm256_add_ps(acc1, _mm256_mul_ps(t_hi, x_hi));
    }

    let acc = reduce_complex(_mm256_add_ps(acc0, acc1));
    *out = scalar::dot_prod_accumulate(acc, &input[body..], &taps[body..]);
}

#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_prod_16i_32fc_avx2_fma<const ALIGNED: bool>(
    out: &mut Complex32,
    input: &[i16],
    taps: &[Complex32],
) {
    debug_assert_eq!(input.len(), taps.len());
    debug_assert!(!ALIGNED || (aligned(input) && aligned(taps)));
    if input.is_empty() {
        return;
    }

    let body = tail::body_len(input.len(), 8);
    let src = input.as_ptr();
    let pt = taps.as_ptr().cast::<f32>();
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();
    for i in (0..body).step_by(8) {
        let (x_lo, x_hi) = load_samples::<ALIGNED>(src.add(i));
        acc0 = _mm256_fmadd_ps(load_ps::<ALIGNED>(pt.add(i * 2)), x_lo, acc0);
        acc1 = _mm256_fmadd_ps(load_ps::<ALIGNED>(pt.add(i * 2 + 8)), x_hi, acc1);
    }

    let acc = reduce_complex(_mm256_add_ps(acc0, acc1));
    *out = scalar::dot_prod_accumulate(acc, &input[body..], &taps[body..]);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `input.len() == taps.len()`, both 32-byte aligned
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn dot_prod_16i_32fc_a_avx2(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    dot_prod_16i_32fc_avx2::<true>(out, input, taps);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `input.len() == taps.len()`
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn dot_prod_16i_32fc_u_avx2(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    dot_prod_16i_32fc_avx2::<false>(out, input, taps);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA
/// - `input.len() == taps.len()`, both 32-byte aligned
#[target_feature(enable = "avx2", enable = "fma")]
pub(crate) unsafe fn dot_prod_16i_32fc_a_avx2_fma(
    out: &mut Complex32,
    input: &[i16],
    taps: &[Complex32],
) {
    dot_prod_16i_32fc_avx2_fma::<true>(out, input, taps);
}

/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA
/// - `input.len() == taps.len()`
#[target_feature(enable = "avx2", enable = "fma")]
pub(crate) unsafe fn dot_prod_16i_32fc_u_avx2_fma(
    out: &mut Complex32,
    input: &[i16],
    taps: &[Complex32],
) {
    dot_prod_16i_32fc_avx2_fma::<false>(out, input, taps);
}
