//! ARM NEON kernel implementations for aarch64.
//!
//! NEON is always available on aarch64, so no runtime detection is needed and
//! every kernel here is a safe function. NEON loads accept any address, so
//! each operation has a single `neon` variant with no aligned twin.
//!
//! Interleaved complex data is split with `vld2*`/`vst2*`, which keeps the
//! arithmetic identical to the scalar reference (no horizontal adds).

// SAFETY: Numeric casts in this file are intentional and safe:
// - Index casts are bounded by `INDEX_MIN_MAX_POINTS` (fits in u16)
// - All kernels are checked against the scalar reference in kernels_tests.rs
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]

use std::arch::aarch64::*;

use super::scalar::{
    self, TANH_C1, TANH_C2, TANH_C3, TANH_C4, TANH_C5, TANH_C6, TANH_SATURATION,
};
use super::tail;
use crate::types::{Complex16, Complex32, Complex8};

// =============================================================================
// tanh_32f (4 lanes)
// =============================================================================

#[inline]
fn tanh_f32x4(x: float32x4_t) -> float32x4_t {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    // Reason: Register-only arithmetic, same operation order as `scalar::tanh`.
    unsafe {
        let x2 = vmulq_f32(x, x);
        let p = vaddq_f32(vdupq_n_f32(TANH_C3), x2);
        let p = vaddq_f32(vdupq_n_f32(TANH_C2), vmulq_f32(x2, p));
        let p = vaddq_f32(vdupq_n_f32(TANH_C1), vmulq_f32(x2, p));
        let a = vmulq_f32(x, p);
        let q = vmulq_f32(x2, vdupq_n_f32(TANH_C6));
        let q = vaddq_f32(vdupq_n_f32(TANH_C5), q);
        let q = vaddq_f32(vdupq_n_f32(TANH_C4), vmulq_f32(x2, q));
        let b = vaddq_f32(vdupq_n_f32(TANH_C1), vmulq_f32(x2, q));
        let r = vdivq_f32(a, b);

        let high = vcgtq_f32(x, vdupq_n_f32(TANH_SATURATION));
        let low = vcleq_f32(x, vdupq_n_f32(-TANH_SATURATION));
        let r = vbslq_f32(high, vdupq_n_f32(1.0), r);
        vbslq_f32(low, vdupq_n_f32(-1.0), r)
    }
}

/// NEON tanh.
pub(crate) fn tanh_32f_neon(out: &mut [f32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    let body = tail::body_len(out.len(), 4);
    for (o, x) in out[..body].chunks_exact_mut(4).zip(input.chunks_exact(4)) {
        // SAFETY: both chunks hold exactly 4 elements.
        // Reason: Core NEON load/compute/store.
        unsafe { vst1q_f32(o.as_mut_ptr(), tanh_f32x4(vld1q_f32(x.as_ptr()))) };
    }
    // SAFETY: scalar tail has no ISA requirement.
    unsafe { tail::unary(out, input, body, scalar::tanh_32f) };
}

// =============================================================================
// multiply_conjugate_8ic_16ic (8 complex per iteration)
// =============================================================================

/// NEON multiply-conjugate: widening multiply-accumulate into `i32`, then a
/// saturating narrow for the real part and a plain narrow for the imaginary.
pub(crate) fn multiply_conjugate_8ic_16ic_neon(out: &mut [Complex16], a: &[Complex8], b: &[Complex8]) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    let body = tail::body_len(out.len(), 8);
    for ((o, x), y) in out[..body]
        .chunks_exact_mut(8)
        .zip(a.chunks_exact(8))
        .zip(b.chunks_exact(8))
    {
        // SAFETY: each chunk holds 8 complex values = 16 lanes of i8 input and
        // 16 lanes of i16 output, exactly what vld2_s8 / vst2q_s16 touch.
        // Reason: De-interleaving load keeps re and im in separate registers.
        unsafe {
            let va = vld2_s8(x.as_ptr().cast::<i8>());
            let vb = vld2_s8(y.as_ptr().cast::<i8>());
            let (ar, ai) = (vmovl_s8(va.0), vmovl_s8(va.1));
            let (br, bi) = (vmovl_s8(vb.0), vmovl_s8(vb.1));

            let re_lo = vmlal_s16(
                vmull_s16(vget_low_s16(ar), vget_low_s16(br)),
                vget_low_s16(ai),
                vget_low_s16(bi),
            );
            let re_hi = vmlal_s16(
                vmull_s16(vget_high_s16(ar), vget_high_s16(br)),
                vget_high_s16(ai),
                vget_high_s16(bi),
            );
            let im_lo = vmlsl_s16(
                vmull_s16(vget_low_s16(ai), vget_low_s16(br)),
                vget_low_s16(ar),
                vget_low_s16(bi),
            );
            let im_hi = vmlsl_s16(
                vmull_s16(vget_high_s16(ai), vget_high_s16(br)),
                vget_high_s16(ar),
                vget_high_s16(bi),
            );

            let re = vcombine_s16(vqmovn_s32(re_lo), vqmovn_s32(re_hi));
            let im = vcombine_s16(vmovn_s32(im_lo), vmovn_s32(im_hi));
            vst2q_s16(o.as_mut_ptr().cast::<i16>(), int16x8x2_t(re, im));
        }
    }
    // SAFETY: scalar tail has no ISA requirement.
    unsafe { tail::binary(out, a, b, body, scalar::multiply_conjugate_8ic_16ic) };
}

// =============================================================================
// binary_slicer_32f_32i (4 lanes)
// =============================================================================

pub(crate) fn binary_slicer_32f_32i_neon(out: &mut [i32], input: &[f32]) {
    debug_assert_eq!(out.len(), input.len());
    let body = tail::body_len(out.len(), 4);
    for (o, x) in out[..body].chunks_exact_mut(4).zip(input.chunks_exact(4)) {
        // SAFETY: both chunks hold exactly 4 elements.
        unsafe {
            let mask = vcgeq_f32(vld1q_f32(x.as_ptr()), vdupq_n_f32(0.0));
            vst1q_s32(o.as_mut_ptr(), vreinterpretq_s32_u32(vshrq_n_u32::<31>(mask)));
        }
    }
    // SAFETY: scalar tail has no ISA requirement.
    unsafe { tail::unary(out, input, body, scalar::binary_slicer_32f_32i) };
}

// =============================================================================
// deinterleave_real_8ic_32f (8 complex per iteration)
// =============================================================================

pub(crate) fn deinterleave_real_8ic_32f_neon(out: &mut [f32], input: &[Complex8], divisor: f32) {
    debug_assert_eq!(out.len(), input.len());
    let inv = scalar::inverse_scale(divisor);
    let body = tail::body_len(out.len(), 8);
    for (o, c) in out[..body].chunks_exact_mut(8).zip(input.chunks_exact(8)) {
        // SAFETY: `c` holds 16 i8 lanes, `o` holds 8 f32 lanes.
        // Reason: vld2_s8 drops the imaginary bytes in the load itself.
        unsafe {
            let re = vmovl_s8(vld2_s8(c.as_ptr().cast::<i8>()).0);
            let lo = vcvtq_f32_s32(vmovl_s16(vget_low_s16(re)));
            let hi = vcvtq_f32_s32(vmovl_high_s16(re));
            vst1q_f32(o.as_mut_ptr(), vmulq_n_f32(lo, inv));
            vst1q_f32(o.as_mut_ptr().add(4), vmulq_n_f32(hi, inv));
        }
    }
    tail::scaled_real(out, input, inv, body);
}

// =============================================================================
// divide_32fc (4 complex per iteration)
// =============================================================================

pub(crate) fn divide_32fc_neon(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(out.len(), b.len());
    let body = tail::body_len(out.len(), 4);
    for ((o, x), y) in out[..body]
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        // SAFETY: each chunk holds 4 complex = 8 f32 lanes.
        unsafe {
            let va = vld2q_f32(x.as_ptr().cast::<f32>());
            let vb = vld2q_f32(y.as_ptr().cast::<f32>());
            let re = vaddq_f32(vmulq_f32(va.0, vb.0), vmulq_f32(va.1, vb.1));
            let im = vsubq_f32(vmulq_f32(va.1, vb.0), vmulq_f32(va.0, vb.1));
            let norm = vaddq_f32(vmulq_f32(vb.0, vb.0), vmulq_f32(vb.1, vb.1));
            let q = float32x4x2_t(vdivq_f32(re, norm), vdivq_f32(im, norm));
            vst2q_f32(o.as_mut_ptr().cast::<f32>(), q);
        }
    }
    // SAFETY: scalar tail has no ISA requirement.
    unsafe { tail::binary(out, a, b, body, scalar::divide_32fc) };
}

// =============================================================================
// index_min_32fc_16u (4 complex per iteration)
// =============================================================================

pub(crate) fn index_min_32fc_16u_neon(out: &mut u16, input: &[Complex32]) {
    if input.is_empty() {
        return;
    }
    let input = &input[..input.len().min(scalar::INDEX_MIN_MAX_POINTS)];
    let body = tail::body_len(input.len(), 4);

    let mut vals = [0.0_f32; 4];
    let mut idxs = [0_u32; 4];
    // SAFETY: every load reads one 4-element chunk; stores target local arrays
    // of 4 lanes.
    // Reason: Per-lane running argmin, folded in scalar code afterwards.
    unsafe {
        let lane_ids = [0_u32, 1, 2, 3];
        let mut min_vals = vdupq_n_f32(f32::MAX);
        let mut min_idx = vdupq_n_u32(0);
        let mut idx = vld1q_u32(lane_ids.as_ptr());
        let step = vdupq_n_u32(4);
        for chunk in input[..body].chunks_exact(4) {
            let v = vld2q_f32(chunk.as_ptr().cast::<f32>());
            let mag = vaddq_f32(vmulq_f32(v.0, v.0), vmulq_f32(v.1, v.1));
            let lt = vcltq_f32(mag, min_vals);
            min_vals = vbslq_f32(lt, mag, min_vals);
            min_idx = vbslq_u32(lt, idx, min_idx);
            idx = vaddq_u32(idx, step);
        }
        vst1q_f32(vals.as_mut_ptr(), min_vals);
        vst1q_u32(idxs.as_mut_ptr(), min_idx);
    }

    let (min, index) = tail::argmin_lanes(&vals, &idxs);
    let (_, index) = scalar::index_min_from(&input[body..], body, min, index);
    *out = index as u16;
}

// =============================================================================
// dot_prod_16i_32fc (4 samples per iteration)
// =============================================================================

pub(crate) fn dot_prod_16i_32fc_neon(out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
    debug_assert_eq!(input.len(), taps.len());
    if input.is_empty() {
        return;
    }
    let body = tail::body_len(input.len(), 4);

    // SAFETY: each iteration reads 4 i16 samples and 4 complex taps from
    // chunks of exactly that size.
    // Reason: Fused multiply-accumulate into separate re/im accumulators.
    let acc = unsafe {
        let mut acc_re = vdupq_n_f32(0.0);
        let mut acc_im = vdupq_n_f32(0.0);
        for (x, t) in input[..body].chunks_exact(4).zip(taps.chunks_exact(4)) {
            let xf = vcvtq_f32_s32(vmovl_s16(vld1_s16(x.as_ptr())));
            let tv = vld2q_f32(t.as_ptr().cast::<f32>());
            acc_re = vfmaq_f32(acc_re, tv.0, xf);
            acc_im = vfmaq_f32(acc_im, tv.1, xf);
        }
        Complex32::new(vaddvq_f32(acc_re), vaddvq_f32(acc_im))
    };
    *out = scalar::dot_prod_accumulate(acc, &input[body..], &taps[body..]);
}
