//! # kernvec Core
//!
//! Vectorized math kernels with interchangeable per-ISA variants.
//!
//! Every operation in the catalogue has a portable scalar `generic` variant
//! plus SIMD variants keyed by instruction set (SSE family, AVX family, NEON)
//! and by alignment class (`a_*` needs register-aligned buffers, `u_*` takes
//! any address). A variant processes full vector groups and hands the
//! remainder to a narrower variant, bottoming out at the scalar reference.
//!
//! ## Features
//!
//! - **Seven operations**: tanh, complex multiply-conjugate, binary slicer,
//!   scaled real deinterleave, complex division, index of minimum magnitude,
//!   real-by-complex dot product
//! - **Checked dispatch**: [`KernelEngine`] resolves one aligned and one
//!   unaligned variant per operation from CPU features and configuration
//! - **Catalogue**: every variant's ISA, width and tail, exportable as JSON
//! - **Aligned storage**: [`AlignedBuffer`] for callers that want `a_*` variants
//!
//! ## Quick Start
//!
//! ```rust
//! use kernvec_core::{multiply_conjugate_8ic_16ic, tanh_32f, Complex16, Complex8};
//!
//! fn main() -> kernvec_core::Result<()> {
//!     let input = [-10.0_f32, -4.97, 0.0, 4.97, 10.0];
//!     let mut out = [0.0_f32; 5];
//!     tanh_32f(&mut out, &input)?;
//!     assert_eq!(out[0], -1.0);
//!     assert_eq!(out[4], 1.0);
//!
//!     let a = [Complex8::new(100, 100)];
//!     let b = [Complex8::new(100, 100)];
//!     let mut c = [Complex16::default()];
//!     multiply_conjugate_8ic_16ic(&mut c, &a, &b)?;
//!     assert_eq!(c[0], Complex16::new(20000, 0));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::uninlined_format_args
    )
)]

pub mod aligned;
pub mod catalogue;
#[cfg(test)]
mod catalogue_tests;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod isa;
pub mod kernels;
pub mod types;

pub use aligned::{max_alignment, AlignedBuffer};
pub use catalogue::{operations, KernelTable, OperationInfo, Variant, VariantInfo};
pub use config::KernelConfig;
pub use dispatch::{
    binary_slicer_32f_32i, deinterleave_real_8ic_32f, divide_32fc, dot_prod_16i_32fc, engine,
    index_min_32fc_16u, multiply_conjugate_8ic_16ic, tanh_32f, warmup, KernelEngine, Selection,
};
pub use error::{Error, Result};
pub use isa::{cpu_features, CpuFeatures, Isa};
pub use kernels::scalar;
pub use types::{Alignment, Complex16, Complex32, Complex8, ElementType};
