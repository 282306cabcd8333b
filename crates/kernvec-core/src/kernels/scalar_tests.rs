//! Tests for the scalar reference kernels.
//!
//! These pin the numeric semantics every SIMD variant is compared against:
//! saturation thresholds, integer narrowing, NaN handling and the reduction
//! conventions for empty inputs.

use super::scalar::{self, INDEX_MIN_MAX_POINTS, TANH_SATURATION};
use crate::types::{Complex16, Complex32, Complex8};

// =============================================================================
// tanh
// =============================================================================

#[test]
fn test_tanh_boundary_scenario() {
    let input = [-10.0_f32, -4.97, 0.0, 4.97, 10.0];
    let mut out = [0.0_f32; 5];
    scalar::tanh_32f(&mut out, &input);

    assert_eq!(out[0], -1.0);
    assert_eq!(out[1], -1.0, "x <= -T saturates, including the threshold");
    assert_eq!(out[2], 0.0);
    assert!(out[3] < 1.0, "x == T is still evaluated by the rational");
    assert!((out[3] - 1.0).abs() < 1e-4, "got {}", out[3]);
    assert_eq!(out[4], 1.0);
}

#[test]
fn test_tanh_threshold_is_strict_on_the_positive_side() {
    let above = f32::from_bits(TANH_SATURATION.to_bits() + 1);
    let below = f32::from_bits(TANH_SATURATION.to_bits() - 1);

    assert_eq!(scalar::tanh(above), 1.0);
    assert!(scalar::tanh(TANH_SATURATION) < 1.0);
    assert!(scalar::tanh(below) < 1.0);

    assert_eq!(scalar::tanh(-TANH_SATURATION), -1.0);
    assert_eq!(scalar::tanh(-above), -1.0);
    assert!(scalar::tanh(-below) > -1.0);
}

#[test]
fn test_tanh_is_odd_inside_the_threshold() {
    for i in 0..=990 {
        let x = i as f32 * 0.005;
        assert_eq!(scalar::tanh(-x), -scalar::tanh(x), "x = {x}");
    }
}

#[test]
fn test_tanh_error_bound() {
    let mut worst = 0.0_f64;
    for i in -6000..=6000 {
        let x = i as f32 * 0.001;
        let approx = f64::from(scalar::tanh(x));
        let exact = f64::from(x).tanh();
        worst = worst.max((approx - exact).abs());
    }
    assert!(worst < 1e-4, "max abs error {worst}");
}

#[test]
fn test_tanh_known_values() {
    assert!((scalar::tanh(1.0) - 0.761_594_2).abs() < 1e-6);
    assert!((scalar::tanh(0.5) - 0.462_117_2).abs() < 1e-6);
    assert!(scalar::tanh(-0.0).is_sign_negative());
}

#[test]
fn test_tanh_special_values() {
    assert!(scalar::tanh(f32::NAN).is_nan());
    assert_eq!(scalar::tanh(f32::INFINITY), 1.0);
    assert_eq!(scalar::tanh(f32::NEG_INFINITY), -1.0);
    assert_eq!(scalar::tanh(f32::MAX), 1.0);
    assert_eq!(scalar::tanh(f32::MIN), -1.0);
}

// =============================================================================
// multiply_conjugate_8ic_16ic
// =============================================================================

#[test]
fn test_multiply_conjugate_saturation_scenario() {
    let a = [Complex8::new(100, 100)];
    let b = [Complex8::new(100, 100)];
    let mut out = [Complex16::default()];
    scalar::multiply_conjugate_8ic_16ic(&mut out, &a, &b);
    assert_eq!(out[0], Complex16::new(20_000, 0));
}

#[test]
fn test_multiply_conjugate_basic() {
    // (3 + 4i)(1 - 2i) = 11 - 2i
    let c = scalar::multiply_conjugate(Complex8::new(3, 4), Complex8::new(1, 2));
    assert_eq!(c, Complex16::new(11, -2));
}

#[test]
fn test_multiply_conjugate_real_part_saturates() {
    let m = Complex8::new(i8::MIN, i8::MIN);
    let c = scalar::multiply_conjugate(m, m);
    assert_eq!(c.re, i16::MAX, "32768 clamps to i16::MAX");
    assert_eq!(c.im, 0);
}

#[test]
fn test_multiply_conjugate_extremes_fit() {
    let c = scalar::multiply_conjugate(Complex8::new(-128, -128), Complex8::new(127, 127));
    assert_eq!(c.re, -32_512);
    assert_eq!(c.im, 0);

    let c = scalar::multiply_conjugate(Complex8::new(-128, -128), Complex8::new(127, -128));
    assert_eq!(c.re, -128 * 127 + 128 * 128);
    assert_eq!(c.im, -128 * 127 - 128 * 128);
}

#[test]
fn test_multiply_conjugate_exhaustive_against_wide_arithmetic() {
    let values = [i8::MIN, -97, -1, 0, 1, 42, 99, i8::MAX];
    for &ar in &values {
        for &ai in &values {
            for &br in &values {
                for &bi in &values {
                    let c = scalar::multiply_conjugate(Complex8::new(ar, ai), Complex8::new(br, bi));
                    let re = i32::from(ar) * i32::from(br) + i32::from(ai) * i32::from(bi);
                    let im = i32::from(ai) * i32::from(br) - i32::from(ar) * i32::from(bi);
                    assert_eq!(i32::from(c.re), re.min(32_767));
                    assert_eq!(i32::from(c.im), im);
                }
            }
        }
    }
}

// =============================================================================
// binary_slicer_32f_32i
// =============================================================================

#[test]
fn test_binary_slicer() {
    let input = [-1.0_f32, -0.0, 0.0, 2.5, f32::NAN, f32::NEG_INFINITY, f32::INFINITY, -1e-30];
    let mut out = [9_i32; 8];
    scalar::binary_slicer_32f_32i(&mut out, &input);
    assert_eq!(out, [0, 1, 1, 1, 0, 0, 1, 0]);
}

#[test]
fn test_branchless_slicer_matches_comparison_on_bit_patterns() {
    // Sign, exponent and mantissa boundaries, including every NaN class.
    let mut bits = vec![
        0x0000_0000_u32,
        0x8000_0000,
        0x0000_0001,
        0x8000_0001,
        0x7F7F_FFFF,
        0xFF7F_FFFF,
        0x7F80_0000,
        0xFF80_0000,
        0x7F80_0001,
        0xFF80_0001,
        0x7FC0_0000,
        0xFFC0_0000,
        0x7FFF_FFFF,
        0xFFFF_FFFF,
    ];
    bits.extend((0..4096_u32).map(|i| i.wrapping_mul(0x9E37_79B9)));
    let input: Vec<f32> = bits.iter().map(|&b| f32::from_bits(b)).collect();

    let mut expected = vec![0_i32; input.len()];
    let mut got = vec![-1_i32; input.len()];
    scalar::binary_slicer_32f_32i(&mut expected, &input);
    scalar::binary_slicer_32f_32i_branchless(&mut got, &input);
    for (i, (&g, &e)) in got.iter().zip(&expected).enumerate() {
        assert_eq!(g, e, "bits {:#010x}", bits[i]);
    }
}

// =============================================================================
// deinterleave_real_8ic_32f
// =============================================================================

#[test]
fn test_deinterleave_real_scales_real_parts() {
    let input = [
        Complex8::new(-128, 5),
        Complex8::new(0, -5),
        Complex8::new(64, 1),
        Complex8::new(127, 127),
    ];
    let mut out = [0.0_f32; 4];
    scalar::deinterleave_real_8ic_32f(&mut out, &input, 2.0);
    assert_eq!(out, [-64.0, 0.0, 32.0, 63.5]);
}

#[test]
fn test_deinterleave_real_uses_double_precision_reciprocal() {
    assert_eq!(scalar::inverse_scale(3.0), (1.0_f64 / 3.0) as f32);
    assert_eq!(scalar::inverse_scale(0.5), 2.0);
}

#[test]
fn test_deinterleave_real_zero_scale() {
    let input = [Complex8::new(5, 0), Complex8::new(-5, 0), Complex8::new(0, 9)];
    let mut out = [0.0_f32; 3];
    scalar::deinterleave_real_8ic_32f(&mut out, &input, 0.0);
    assert_eq!(out[0], f32::INFINITY);
    assert_eq!(out[1], f32::NEG_INFINITY);
    assert!(out[2].is_nan());
}

// =============================================================================
// divide_32fc
// =============================================================================

#[test]
fn test_divide_basic() {
    // (1 + 2i) / (3 + 4i) = (11 + 2i) / 25
    let q = scalar::divide(Complex32::new(1.0, 2.0), Complex32::new(3.0, 4.0));
    assert_eq!(q, Complex32::new(11.0 / 25.0, 2.0 / 25.0));
}

#[test]
fn test_divide_by_self_is_one() {
    let z = [Complex32::new(2.0, -8.0), Complex32::new(-0.5, 0.25)];
    let mut out = [Complex32::default(); 2];
    scalar::divide_32fc(&mut out, &z, &z);
    for q in out {
        assert_eq!(q, Complex32::new(1.0, 0.0));
    }
}

#[test]
fn test_divide_by_zero_is_nan() {
    let q = scalar::divide(Complex32::new(1.0, 0.0), Complex32::new(0.0, 0.0));
    assert!(q.re.is_nan());
    assert!(q.im.is_nan());
}

// =============================================================================
// index_min_32fc_16u
// =============================================================================

#[test]
fn test_index_min_first_of_ties() {
    let input = [
        Complex32::new(3.0, 4.0),
        Complex32::new(1.0, 1.0),
        Complex32::new(0.0, 2.0),
        Complex32::new(1.0, -1.0),
    ];
    let mut out = 99;
    scalar::index_min_32fc_16u(&mut out, &input);
    assert_eq!(out, 1);
}

#[test]
fn test_index_min_skips_nan() {
    let input = [
        Complex32::new(f32::NAN, 0.0),
        Complex32::new(2.0, 0.0),
        Complex32::new(1.0, 0.0),
        Complex32::new(0.0, f32::NAN),
    ];
    let mut out = 99;
    scalar::index_min_32fc_16u(&mut out, &input);
    assert_eq!(out, 2);

    let all_nan = [Complex32::new(f32::NAN, f32::NAN); 3];
    scalar::index_min_32fc_16u(&mut out, &all_nan);
    assert_eq!(out, 0);
}

#[test]
fn test_index_min_empty_leaves_output() {
    let mut out = 7;
    scalar::index_min_32fc_16u(&mut out, &[]);
    assert_eq!(out, 7);
}

#[test]
fn test_index_min_examines_at_most_u16_max_points() {
    let mut input = vec![Complex32::new(1.0, 1.0); INDEX_MIN_MAX_POINTS + 1];
    input[INDEX_MIN_MAX_POINTS] = Complex32::new(0.0, 0.0);
    let mut out = 99;
    scalar::index_min_32fc_16u(&mut out, &input);
    assert_eq!(out, 0, "point past the cap must be ignored");

    input[INDEX_MIN_MAX_POINTS - 1] = Complex32::new(0.0, 0.0);
    scalar::index_min_32fc_16u(&mut out, &input);
    assert_eq!(usize::from(out), INDEX_MIN_MAX_POINTS - 1);
}

#[test]
fn test_index_min_from_continues_state() {
    let tail = [Complex32::new(1.0, 0.0), Complex32::new(0.5, 0.0)];
    let (min, index) = scalar::index_min_from(&tail, 10, 1.0, 3);
    assert_eq!((min, index), (0.25, 11));

    let (min, index) = scalar::index_min_from(&tail, 10, 0.1, 3);
    assert_eq!((min, index), (0.1, 3));
}

// =============================================================================
// dot_prod_16i_32fc
// =============================================================================

#[test]
fn test_dot_prod_exact_small_integers() {
    let input = [1_i16, 2, 3, 4, 5];
    let taps: Vec<Complex32> = (1..=5).map(|k| Complex32::new(k as f32, -(k as f32))).collect();
    let mut out = Complex32::default();
    scalar::dot_prod_16i_32fc(&mut out, &input, &taps);
    assert_eq!(out, Complex32::new(55.0, -55.0));
}

#[test]
fn test_dot_prod_empty_leaves_output() {
    let mut out = Complex32::new(3.0, 4.0);
    scalar::dot_prod_16i_32fc(&mut out, &[], &[]);
    assert_eq!(out, Complex32::new(3.0, 4.0));
}

#[test]
fn test_dot_prod_matches_sequential_sum() {
    let input: Vec<i16> = (0..103).map(|i| ((i * 37) % 601 - 300) as i16).collect();
    let taps: Vec<Complex32> = (0..103)
        .map(|i| Complex32::new((i % 7) as f32 * 0.25 - 0.75, (i % 5) as f32 * -0.5 + 1.0))
        .collect();

    let mut out = Complex32::default();
    scalar::dot_prod_16i_32fc(&mut out, &input, &taps);

    let (mut re, mut im) = (0.0_f64, 0.0_f64);
    for (&x, t) in input.iter().zip(&taps) {
        re += f64::from(t.re) * f64::from(x);
        im += f64::from(t.im) * f64::from(x);
    }
    // Every product and partial sum is a multiple of 0.25 well inside f32's
    // exact integer range, so the result is exact.
    assert_eq!(f64::from(out.re), re);
    assert_eq!(f64::from(out.im), im);
}
