//! Remainder handling for SIMD loops.
//!
//! A variant processes `len - len % width` elements in full vector groups and
//! hands the rest to a narrower kernel through one of these helpers. The
//! narrower kernel sees plain sub-slices starting at the first unprocessed
//! element, so no partial vector load ever reads past the end of a buffer.

use crate::types::Complex8;

/// Narrower unary kernel (`out`, `input`).
pub(crate) type UnaryTail<I, O> = unsafe fn(&mut [O], &[I]);

/// Narrower binary kernel (`out`, `a`, `b`).
pub(crate) type BinaryTail<A, B, O> = unsafe fn(&mut [O], &[A], &[B]);

/// Number of elements covered by full groups of `width`.
#[inline]
#[must_use]
pub(crate) const fn body_len(len: usize, width: usize) -> usize {
    len - len % width
}

/// Runs `narrower` over `out[done..]` / `input[done..]` if anything is left.
///
/// # Safety
///
/// `narrower` must be callable on this CPU. Every variant tails into a kernel
/// whose ISA is implied by its own (or into scalar code).
#[inline]
pub(crate) unsafe fn unary<I, O>(
    out: &mut [O],
    input: &[I],
    done: usize,
    narrower: UnaryTail<I, O>,
) {
    if done < out.len() {
        narrower(&mut out[done..], &input[done..]);
    }
}

/// Runs `narrower` over the unprocessed part of two inputs.
///
/// # Safety
///
/// Same contract as [`unary`].
#[inline]
pub(crate) unsafe fn binary<A, B, O>(
    out: &mut [O],
    a: &[A],
    b: &[B],
    done: usize,
    narrower: BinaryTail<A, B, O>,
) {
    if done < out.len() {
        narrower(&mut out[done..], &a[done..], &b[done..]);
    }
}

/// Scalar remainder of `deinterleave_real_8ic_32f` with a precomputed
/// reciprocal, so head and tail scale by the identical factor.
#[inline]
pub(crate) fn scaled_real(out: &mut [f32], input: &[Complex8], inv: f32, done: usize) {
    for (o, c) in out[done..].iter_mut().zip(&input[done..]) {
        *o = f32::from(c.re) * inv;
    }
}

/// Folds per-lane argmin state into one `(min, index)` pair.
///
/// The smallest value wins; among equal values the smallest index wins, which
/// restores first-occurrence order across lanes. Lanes that never updated hold
/// `(f32::MAX, 0)` and cannot displace a real candidate.
#[inline]
#[must_use]
pub(crate) fn argmin_lanes(values: &[f32], indices: &[u32]) -> (f32, u32) {
    let mut best = (f32::MAX, 0_u32);
    for (&value, &index) in values.iter().zip(indices) {
        if value < best.0 || (value == best.0 && index < best.1) {
            best = (value, index);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scalar;

    #[test]
    fn test_body_len() {
        assert_eq!(body_len(0, 8), 0);
        assert_eq!(body_len(7, 8), 0);
        assert_eq!(body_len(8, 8), 8);
        assert_eq!(body_len(21, 8), 16);
        assert_eq!(body_len(21, 4), 20);
    }

    #[test]
    fn test_unary_processes_only_remainder() {
        let input = [0.5_f32, -0.5, 1.0, -1.0, 2.0];
        let mut out = [9.0_f32; 5];
        // SAFETY: scalar tail has no ISA requirement.
        unsafe { unary(&mut out, &input, 3, scalar::tanh_32f) };
        assert_eq!(&out[..3], &[9.0, 9.0, 9.0]);
        assert_eq!(out[3], scalar::tanh(-1.0));
        assert_eq!(out[4], scalar::tanh(2.0));
    }

    #[test]
    fn test_unary_noop_when_done() {
        let input = [1.0_f32; 4];
        let mut out = [7.0_f32; 4];
        // SAFETY: scalar tail has no ISA requirement.
        unsafe { unary(&mut out, &input, 4, scalar::tanh_32f) };
        assert_eq!(out, [7.0; 4]);
    }

    #[test]
    fn test_argmin_lanes_prefers_lowest_index_on_tie() {
        let values = [3.0_f32, 1.0, 1.0, 2.0];
        let indices = [0_u32, 9, 5, 2];
        assert_eq!(argmin_lanes(&values, &indices), (1.0, 5));
    }

    #[test]
    fn test_argmin_lanes_untouched_lanes() {
        let values = [f32::MAX; 4];
        let indices = [0_u32; 4];
        assert_eq!(argmin_lanes(&values, &indices), (f32::MAX, 0));
    }

    #[test]
    fn test_scaled_real_skips_head() {
        let input = [Complex8::new(4, 1), Complex8::new(-8, 2), Complex8::new(12, 3)];
        let mut out = [0.0_f32; 3];
        scaled_real(&mut out, &input, 0.25, 1);
        assert_eq!(out, [0.0, -2.0, 3.0]);
    }
}
