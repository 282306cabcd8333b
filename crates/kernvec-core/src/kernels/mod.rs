//! Raw kernel implementations.
//!
//! # Module Structure
//!
//! - `scalar`: Scalar reference semantics; the `generic` variant of every operation
//! - `tail`: Remainder handling shared by all SIMD variants
//! - `x86_sse`: SSE, SSE2, SSE3 and SSE4.1 kernels (x86_64 only)
//! - `x86_avx`: AVX, AVX2 and FMA kernels (x86_64 only)
//! - `neon`: ARM NEON kernels (aarch64 only)
//!
//! Nothing here checks preconditions beyond `debug_assert!`. The checked
//! surface lives in [`crate::catalogue`] and [`crate::dispatch`].
#![allow(clippy::doc_markdown)] // ISA nomenclature in docs.
#![allow(clippy::missing_safety_doc)] // Safety contracts are documented per kernel.

pub mod scalar;
pub(crate) mod tail;

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: Every vector loop runs over `tail::body_len(len, width)` elements,
//   so each load/store of `width` lanes stays inside the slice.
// - Condition 2: Target-featured functions are reached only through catalogue
//   entries whose ISA the caller checked against `CpuFeatures`, or from a wider
//   kernel whose ISA implies theirs.
// - Condition 3: Aligned variants use `*_load_*`/`*_store_*` only on buffers the
//   checked surface verified to be register-size aligned.
// Reason: Intrinsics and pointer math are required for hot-path SIMD performance.

// =============================================================================
// ISA kernel submodules
// =============================================================================

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_sse;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_avx;

#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================


#[cfg(test)]
mod scalar_tests;
