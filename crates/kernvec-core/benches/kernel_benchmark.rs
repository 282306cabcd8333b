//! Benchmark every kernel variant supported by the running CPU.
//!
//! Run with: `cargo bench --bench kernel_benchmark`
//!
//! Buffers come from `AlignedBuffer`, so aligned and unaligned variants see
//! identical data and the comparison isolates the instruction set.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kernvec_core::catalogue;
use kernvec_core::{
    cpu_features, max_alignment, AlignedBuffer, Complex16, Complex32, Complex8,
};

const SIZES: [usize; 3] = [256, 4096, 65_536];

fn floats(len: usize, seed: f32) -> AlignedBuffer<f32> {
    let data: Vec<f32> = (0..len).map(|i| (seed + i as f32 * 0.01).sin() * 6.0).collect();
    AlignedBuffer::from_slice(&data, max_alignment()).expect("aligned allocation")
}

fn bytes(len: usize, seed: usize) -> AlignedBuffer<Complex8> {
    let data: Vec<Complex8> = (0..len)
        .map(|i| Complex8::new(((i + seed) * 31 % 256) as u8 as i8, ((i + seed) * 7 % 256) as u8 as i8))
        .collect();
    AlignedBuffer::from_slice(&data, max_alignment()).expect("aligned allocation")
}

fn complex(len: usize, seed: f32) -> AlignedBuffer<Complex32> {
    let data: Vec<Complex32> = (0..len)
        .map(|i| {
            let t = seed + i as f32 * 0.01;
            Complex32::new(t.cos() + 1.5, t.sin())
        })
        .collect();
    AlignedBuffer::from_slice(&data, max_alignment()).expect("aligned allocation")
}

fn zeroed<T: bytemuck::Zeroable>(len: usize) -> AlignedBuffer<T> {
    AlignedBuffer::zeroed(len, max_alignment()).expect("aligned allocation")
}

fn bench_tanh(c: &mut Criterion) {
    let mut group = c.benchmark_group("tanh_32f");
    for len in SIZES {
        let input = floats(len, 0.0);
        let mut out = zeroed::<f32>(len);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::tanh_32f().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                b.iter(|| variant.call(&mut out, black_box(&input)));
            });
        }
    }
    group.finish();
}

fn bench_multiply_conjugate(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_conjugate_8ic_16ic");
    for len in SIZES {
        let (a, b_in) = (bytes(len, 0), bytes(len, 5));
        let mut out = zeroed::<Complex16>(len);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::multiply_conjugate_8ic_16ic().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                b.iter(|| variant.call(&mut out, black_box(&a), black_box(&b_in)));
            });
        }
    }
    group.finish();
}

fn bench_binary_slicer(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_slicer_32f_32i");
    for len in SIZES {
        let input = floats(len, 1.0);
        let mut out = zeroed::<i32>(len);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::binary_slicer_32f_32i().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                b.iter(|| variant.call(&mut out, black_box(&input)));
            });
        }
    }
    group.finish();
}

fn bench_deinterleave_real(c: &mut Criterion) {
    let mut group = c.benchmark_group("deinterleave_real_8ic_32f");
    for len in SIZES {
        let input = bytes(len, 3);
        let mut out = zeroed::<f32>(len);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::deinterleave_real_8ic_32f().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                b.iter(|| variant.call(&mut out, black_box(&input), black_box(128.0)));
            });
        }
    }
    group.finish();
}

fn bench_divide(c: &mut Criterion) {
    let mut group = c.benchmark_group("divide_32fc");
    for len in SIZES {
        let (a, b_in) = (complex(len, 0.0), complex(len, 2.0));
        let mut out = zeroed::<Complex32>(len);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::divide_32fc().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                b.iter(|| variant.call(&mut out, black_box(&a), black_box(&b_in)));
            });
        }
    }
    group.finish();
}

fn bench_index_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_min_32fc_16u");
    for len in SIZES {
        let input = complex(len, 4.0);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::index_min_32fc_16u().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                let mut out = 0_u16;
                b.iter(|| variant.call(&mut out, black_box(&input)));
            });
        }
    }
    group.finish();
}

fn bench_dot_prod(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_prod_16i_32fc");
    for len in SIZES {
        let samples: Vec<i16> = (0..len).map(|i| ((i * 97) % 4001) as i16 - 2000).collect();
        let input = AlignedBuffer::from_slice(&samples, max_alignment()).expect("aligned allocation");
        let taps = complex(len, 6.0);
        group.throughput(Throughput::Elements(len as u64));
        for variant in catalogue::dot_prod_16i_32fc().supported(cpu_features()) {
            group.bench_with_input(BenchmarkId::new(variant.name(), len), &len, |b, _| {
                let mut out = Complex32::default();
                b.iter(|| variant.call(&mut out, black_box(&input), black_box(&taps)));
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tanh,
    bench_multiply_conjugate,
    bench_binary_slicer,
    bench_deinterleave_real,
    bench_divide,
    bench_index_min,
    bench_dot_prod
);
criterion_main!(benches);
