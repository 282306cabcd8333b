//! Fuzz target for cross-variant kernel equivalence.
//!
//! Runs every variant the CPU supports on arbitrary buffers and checks:
//! - No panics or out-of-bounds accesses on any length or value (NaN, Inf)
//! - Integer and exactly-rounded float kernels agree with the scalar reference
//!   bit for bit
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_kernel_equivalence
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use kernvec_core::catalogue;
use kernvec_core::{
    cpu_features, max_alignment, scalar, AlignedBuffer, Complex16, Complex32, Complex8, Isa,
};

/// Fuzzing input shared by all kernels.
#[derive(Arbitrary, Debug)]
struct KernelInput {
    /// Float samples (tanh, slicer, complex pairs)
    floats: Vec<f32>,
    /// Byte pairs (8-bit complex inputs)
    bytes: Vec<(i8, i8)>,
    /// Deinterleave scale
    scale: f32,
    /// Element offset applied to unaligned runs
    shift: u8,
}

fn same(a: f32, b: f32) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
}

fn placed<T: bytemuck::Zeroable + Copy>(items: &[T], offset: usize) -> AlignedBuffer<T> {
    let mut buf = AlignedBuffer::zeroed(items.len() + offset, max_alignment())
        .expect("aligned allocation");
    buf[offset..].copy_from_slice(items);
    buf
}

fuzz_target!(|input: KernelInput| {
    // Limit sizes to prevent OOM
    let max_len = 4096;
    let floats: Vec<f32> = input.floats.into_iter().take(max_len).collect();
    let bytes: Vec<Complex8> = input
        .bytes
        .into_iter()
        .take(max_len)
        .map(|(re, im)| Complex8::new(re, im))
        .collect();
    let complex: Vec<Complex32> = floats
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect();
    let features = cpu_features();

    let mut want = vec![0.0_f32; floats.len()];
    scalar::tanh_32f(&mut want, &floats);
    for variant in catalogue::tanh_32f().supported(features) {
        let off = if variant.info().alignment == kernvec_core::Alignment::Unaligned {
            usize::from(input.shift % 4)
        } else {
            0
        };
        let src = placed(&floats, off);
        let mut dst = placed(&want, off);
        variant.call(&mut dst[off..], &src[off..]).expect("supported variant");
        if variant.info().isa != Isa::AvxFma {
            assert!(dst[off..].iter().zip(&want).all(|(&g, &w)| same(g, w)), "{}", variant.name());
        }
    }

    let mut want = vec![0_i32; floats.len()];
    scalar::binary_slicer_32f_32i(&mut want, &floats);
    for variant in catalogue::binary_slicer_32f_32i().supported(features) {
        let src = placed(&floats, 0);
        let mut dst = placed(&vec![0_i32; floats.len()], 0);
        variant.call(&mut dst, &src).expect("supported variant");
        assert_eq!(&dst[..], &want[..], "{}", variant.name());
    }

    let mut want = vec![Complex16::default(); bytes.len()];
    scalar::multiply_conjugate_8ic_16ic(&mut want, &bytes, &bytes);
    for variant in catalogue::multiply_conjugate_8ic_16ic().supported(features) {
        let src = placed(&bytes, 0);
        let mut dst = placed(&want, 0);
        variant.call(&mut dst, &src, &src).expect("supported variant");
        assert_eq!(&dst[..], &want[..], "{}", variant.name());
    }

    let mut want = vec![0.0_f32; bytes.len()];
    scalar::deinterleave_real_8ic_32f(&mut want, &bytes, input.scale);
    for variant in catalogue::deinterleave_real_8ic_32f().supported(features) {
        let src = placed(&bytes, 0);
        let mut dst = placed(&want, 0);
        variant.call(&mut dst, &src, input.scale).expect("supported variant");
        assert!(dst.iter().zip(&want).all(|(&g, &w)| same(g, w)), "{}", variant.name());
    }

    let reversed: Vec<Complex32> = complex.iter().rev().copied().collect();
    let mut want = vec![Complex32::default(); complex.len()];
    scalar::divide_32fc(&mut want, &complex, &reversed);
    for variant in catalogue::divide_32fc().supported(features) {
        let (a, b) = (placed(&complex, 0), placed(&reversed, 0));
        let mut dst = placed(&want, 0);
        variant.call(&mut dst, &a, &b).expect("supported variant");
        assert!(
            dst.iter().zip(&want).all(|(g, w)| same(g.re, w.re) && same(g.im, w.im)),
            "{}",
            variant.name()
        );
    }

    let mut want = u16::MAX;
    scalar::index_min_32fc_16u(&mut want, &complex);
    for variant in catalogue::index_min_32fc_16u().supported(features) {
        let src = placed(&complex, 0);
        let mut got = u16::MAX;
        variant.call(&mut got, &src).expect("supported variant");
        assert_eq!(got, want, "{}", variant.name());
    }

    // Dot products only need to stay panic-free: accumulation order differs.
    let samples: Vec<i16> = bytes.iter().map(|c| i16::from(c.re) * i16::from(c.im)).collect();
    let taps: Vec<Complex32> = complex.iter().copied().cycle().take(samples.len()).collect();
    if taps.len() == samples.len() {
        for variant in catalogue::dot_prod_16i_32fc().supported(features) {
            let mut out = Complex32::default();
            variant.call(&mut out, &samples, &taps).ok();
        }
    }
});
