//! Runtime variant selection and the safe entry points.
//!
//! This module provides:
//! - [`KernelEngine`]: one aligned and one unaligned variant per operation,
//!   resolved once from CPU features and [`KernelConfig`]
//! - [`engine()`]: the cached process-wide engine
//! - Free functions (`tanh_32f`, `divide_32fc`, ...) routed through it
//! - [`warmup()`] for eliminating cold-start latency

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalogue::{
    self, ensure_len, BinarySlicerFn, DeinterleaveRealFn, DivideFn, DotProdFn, IndexMinFn,
    KernelTable, MultiplyConjugateFn, TanhFn, Variant,
};
use crate::config::KernelConfig;
use crate::error::{Error, Result};
use crate::isa::{cpu_features, CpuFeatures};
use crate::types::{slice_is_aligned, Alignment, Complex16, Complex32, Complex8};

// =============================================================================
// Per-operation selection
// =============================================================================

/// Variants chosen for one operation.
struct Slot<F: 'static> {
    aligned: &'static Variant<F>,
    unaligned: &'static Variant<F>,
}

impl<F: 'static> Clone for Slot<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: 'static> Copy for Slot<F> {}

impl<F: Copy + 'static> Slot<F> {
    fn best(table: &'static KernelTable<F>, features: CpuFeatures) -> Self {
        Self {
            aligned: table.best(features, Alignment::Aligned),
            unaligned: table.best(features, Alignment::Unaligned),
        }
    }

    fn resolve(
        table: &'static KernelTable<F>,
        features: CpuFeatures,
        preferred: Option<&str>,
    ) -> Result<Self> {
        let mut slot = Self::best(table, features);
        if let Some(name) = preferred {
            let variant = table.variant(name)?;
            if !variant.is_supported(features) {
                return Err(Error::UnsupportedIsa {
                    operation: table.operation(),
                    variant: variant.name(),
                    isa: variant.info().isa,
                });
            }
            slot.aligned = variant;
            // A pinned aligned variant cannot serve unaligned buffers.
            if variant.info().alignment == Alignment::Unaligned {
                slot.unaligned = variant;
            }
        }
        debug!(
            operation = table.operation(),
            aligned = slot.aligned.name(),
            unaligned = slot.unaligned.name(),
            pinned = preferred.is_some(),
            "selected kernel variants"
        );
        Ok(slot)
    }

    /// Whether `buffer` satisfies the aligned variant's contract.
    #[inline]
    fn fits<T>(&self, buffer: &[T]) -> bool {
        slice_is_aligned(buffer, self.aligned.info().alignment_bytes)
    }

    #[inline]
    fn pick(&self, aligned: bool) -> &'static Variant<F> {
        if aligned {
            self.aligned
        } else {
            self.unaligned
        }
    }

    fn selection(&self) -> Selection {
        Selection {
            operation: self.aligned.operation(),
            aligned: self.aligned.name(),
            unaligned: self.unaligned.name(),
        }
    }
}

/// Names of the variants an engine uses for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Operation name.
    pub operation: &'static str,
    /// Variant used when every buffer is aligned.
    pub aligned: &'static str,
    /// Variant used otherwise.
    pub unaligned: &'static str,
}

// =============================================================================
// KernelEngine
// =============================================================================

/// Cached variant selection for every operation.
///
/// Built once, then every call only tests buffer alignment and jumps through
/// a function pointer. `Copy`, `Send` and `Sync`: it holds only `'static`
/// references into the catalogue.
#[derive(Clone, Copy)]
pub struct KernelEngine {
    features: CpuFeatures,
    tanh: Slot<TanhFn>,
    multiply_conjugate: Slot<MultiplyConjugateFn>,
    binary_slicer: Slot<BinarySlicerFn>,
    deinterleave_real: Slot<DeinterleaveRealFn>,
    divide: Slot<DivideFn>,
    index_min: Slot<IndexMinFn>,
    dot_prod: Slot<DotProdFn>,
}

impl KernelEngine {
    /// Resolves variants for the running CPU under `config`.
    ///
    /// Fails when a pinned variant is unknown or needs an ISA that is not
    /// available (after applying `max_isa`).
    pub fn new(config: &KernelConfig) -> Result<Self> {
        config.validate()?;
        let features = config.effective_features(cpu_features());
        let engine = Self {
            features,
            tanh: Slot::resolve(catalogue::tanh_32f(), features, config.preferred_for("tanh_32f"))?,
            multiply_conjugate: Slot::resolve(
                catalogue::multiply_conjugate_8ic_16ic(),
                features,
                config.preferred_for("multiply_conjugate_8ic_16ic"),
            )?,
            binary_slicer: Slot::resolve(
                catalogue::binary_slicer_32f_32i(),
                features,
                config.preferred_for("binary_slicer_32f_32i"),
            )?,
            deinterleave_real: Slot::resolve(
                catalogue::deinterleave_real_8ic_32f(),
                features,
                config.preferred_for("deinterleave_real_8ic_32f"),
            )?,
            divide: Slot::resolve(
                catalogue::divide_32fc(),
                features,
                config.preferred_for("divide_32fc"),
            )?,
            index_min: Slot::resolve(
                catalogue::index_min_32fc_16u(),
                features,
                config.preferred_for("index_min_32fc_16u"),
            )?,
            dot_prod: Slot::resolve(
                catalogue::dot_prod_16i_32fc(),
                features,
                config.preferred_for("dot_prod_16i_32fc"),
            )?,
        };
        info!(
            features = ?features,
            max_isa = ?config.max_isa,
            pinned = config.preferred.len(),
            "kernel engine initialised"
        );
        Ok(engine)
    }

    /// Best variants for the running CPU, no configuration.
    #[must_use]
    pub fn detect() -> Self {
        let features = cpu_features();
        Self {
            features,
            tanh: Slot::best(catalogue::tanh_32f(), features),
            multiply_conjugate: Slot::best(catalogue::multiply_conjugate_8ic_16ic(), features),
            binary_slicer: Slot::best(catalogue::binary_slicer_32f_32i(), features),
            deinterleave_real: Slot::best(catalogue::deinterleave_real_8ic_32f(), features),
            divide: Slot::best(catalogue::divide_32fc(), features),
            index_min: Slot::best(catalogue::index_min_32fc_16u(), features),
            dot_prod: Slot::best(catalogue::dot_prod_16i_32fc(), features),
        }
    }

    /// Capability set the engine selected from.
    #[must_use]
    pub fn features(&self) -> CpuFeatures {
        self.features
    }

    /// Selected variant names, in catalogue order.
    #[must_use]
    pub fn selections(&self) -> Vec<Selection> {
        vec![
            self.tanh.selection(),
            self.multiply_conjugate.selection(),
            self.binary_slicer.selection(),
            self.deinterleave_real.selection(),
            self.divide.selection(),
            self.index_min.selection(),
            self.dot_prod.selection(),
        ]
    }

    /// Selected variant names for one operation.
    pub fn selection(&self, operation: &str) -> Result<Selection> {
        self.selections()
            .into_iter()
            .find(|s| s.operation == operation)
            .ok_or_else(|| Error::UnknownOperation(operation.to_string()))
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// `out[i] = tanh(input[i])`, saturating to exactly `±1` past `±4.97`.
    pub fn tanh_32f(&self, out: &mut [f32], input: &[f32]) -> Result<()> {
        ensure_len("tanh_32f", out.len(), input.len())?;
        let slot = &self.tanh;
        let variant = slot.pick(slot.fits(out) && slot.fits(input));
        // SAFETY: the slot only holds variants supported by `self.features`
        // (a subset of the detected CPU features), lengths were checked, and
        // the aligned variant is picked only for aligned buffers.
        unsafe { variant.call_unchecked(out, input) };
        Ok(())
    }

    /// `out[i] = a[i] * conj(b[i])` with 16-bit narrowing.
    pub fn multiply_conjugate_8ic_16ic(
        &self,
        out: &mut [Complex16],
        a: &[Complex8],
        b: &[Complex8],
    ) -> Result<()> {
        const OP: &str = "multiply_conjugate_8ic_16ic";
        ensure_len(OP, out.len(), a.len())?;
        ensure_len(OP, out.len(), b.len())?;
        let slot = &self.multiply_conjugate;
        let variant = slot.pick(slot.fits(out) && slot.fits(a) && slot.fits(b));
        // SAFETY: see `tanh_32f`.
        unsafe { variant.call_unchecked(out, a, b) };
        Ok(())
    }

    /// `out[i] = 1` if `input[i] >= 0.0`, else `0`.
    pub fn binary_slicer_32f_32i(&self, out: &mut [i32], input: &[f32]) -> Result<()> {
        ensure_len("binary_slicer_32f_32i", out.len(), input.len())?;
        let slot = &self.binary_slicer;
        let variant = slot.pick(slot.fits(out) && slot.fits(input));
        // SAFETY: see `tanh_32f`.
        unsafe { variant.call_unchecked(out, input) };
        Ok(())
    }

    /// `out[i] = input[i].re / scalar`.
    pub fn deinterleave_real_8ic_32f(
        &self,
        out: &mut [f32],
        input: &[Complex8],
        scalar: f32,
    ) -> Result<()> {
        ensure_len("deinterleave_real_8ic_32f", out.len(), input.len())?;
        let slot = &self.deinterleave_real;
        let variant = slot.pick(slot.fits(out) && slot.fits(input));
        // SAFETY: see `tanh_32f`.
        unsafe { variant.call_unchecked(out, input, scalar) };
        Ok(())
    }

    /// `out[i] = a[i] / b[i]` (complex).
    pub fn divide_32fc(&self, out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) -> Result<()> {
        ensure_len("divide_32fc", out.len(), a.len())?;
        ensure_len("divide_32fc", out.len(), b.len())?;
        let slot = &self.divide;
        let variant = slot.pick(slot.fits(out) && slot.fits(a) && slot.fits(b));
        // SAFETY: see `tanh_32f`.
        unsafe { variant.call_unchecked(out, a, b) };
        Ok(())
    }

    /// Index of the first point with the smallest `|z|²` among the first
    /// 65535 points. `out` is untouched for an empty input.
    pub fn index_min_32fc_16u(&self, out: &mut u16, input: &[Complex32]) -> Result<()> {
        let slot = &self.index_min;
        let variant = slot.pick(slot.fits(input));
        // SAFETY: see `tanh_32f`; this kernel has a single input buffer.
        unsafe { variant.call_unchecked(out, input) };
        Ok(())
    }

    /// `Σ taps[i] * input[i]`. `out` is untouched for an empty input.
    pub fn dot_prod_16i_32fc(
        &self,
        out: &mut Complex32,
        input: &[i16],
        taps: &[Complex32],
    ) -> Result<()> {
        ensure_len("dot_prod_16i_32fc", input.len(), taps.len())?;
        let slot = &self.dot_prod;
        let variant = slot.pick(slot.fits(input) && slot.fits(taps));
        // SAFETY: see `tanh_32f`.
        unsafe { variant.call_unchecked(out, input, taps) };
        Ok(())
    }
}

impl fmt::Debug for KernelEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelEngine")
            .field("features", &self.features)
            .field("selections", &self.selections())
            .finish()
    }
}

// =============================================================================
// Process-wide engine
// =============================================================================

/// Cached engine - built once at first use.
static ENGINE: OnceLock<KernelEngine> = OnceLock::new();

fn init_engine() -> KernelEngine {
    let config = KernelConfig::load().unwrap_or_else(|err| {
        warn!(error = %err, "invalid kernel configuration, using defaults");
        KernelConfig::default()
    });
    KernelEngine::new(&config).unwrap_or_else(|err| {
        warn!(error = %err, "kernel configuration rejected, using detected defaults");
        KernelEngine::detect()
    })
}

/// Returns the cached process-wide engine.
///
/// Built from [`KernelConfig::load`] on first use; configuration errors are
/// logged and replaced by the detected defaults.
#[inline]
#[must_use]
pub fn engine() -> &'static KernelEngine {
    ENGINE.get_or_init(init_engine)
}

/// Warms up the engine to eliminate cold-start latency.
///
/// Forces CPU detection, configuration loading and table construction, then
/// runs every operation once on small buffers.
///
/// # Example
///
/// ```
/// kernvec_core::warmup();
/// ```
pub fn warmup() {
    let engine = engine();
    match warmup_engine(engine) {
        Ok(()) => debug!("kernel warmup complete"),
        Err((failed, first)) => warn!(failed, error = %first, "kernel warmup had failing calls"),
    }
}

/// Runs every operation of `engine` once. On failure returns the number of
/// failing calls and the first error.
pub(crate) fn warmup_engine(engine: &KernelEngine) -> std::result::Result<(), (usize, Error)> {
    let n = 256;
    let floats = vec![0.5_f32; n];
    let bytes = vec![Complex8::new(3, -2); n];
    let complex = vec![Complex32::new(1.0, -1.0); n];
    let samples = vec![7_i16; n];

    let mut f_out = vec![0.0_f32; n];
    let mut i_out = vec![0_i32; n];
    let mut c16_out = vec![Complex16::default(); n];
    let mut c32_out = vec![Complex32::default(); n];
    let mut index = 0_u16;
    let mut dot = Complex32::default();

    let results = [
        engine.tanh_32f(&mut f_out, &floats),
        engine.multiply_conjugate_8ic_16ic(&mut c16_out, &bytes, &bytes),
        engine.binary_slicer_32f_32i(&mut i_out, &floats),
        engine.deinterleave_real_8ic_32f(&mut f_out, &bytes, 2.0),
        engine.divide_32fc(&mut c32_out, &complex, &complex),
        engine.index_min_32fc_16u(&mut index, &complex),
        engine.dot_prod_16i_32fc(&mut dot, &samples, &complex),
    ];
    let mut errors = results.into_iter().filter_map(std::result::Result::err);
    match errors.next() {
        None => Ok(()),
        Some(first) => Err((1 + errors.count(), first)),
    }
}

// =============================================================================
// Public API with cached dispatch
// =============================================================================

/// `out[i] = tanh(input[i])` with the best available variant.
pub fn tanh_32f(out: &mut [f32], input: &[f32]) -> Result<()> {
    engine().tanh_32f(out, input)
}

/// `out[i] = a[i] * conj(b[i])` with the best available variant.
pub fn multiply_conjugate_8ic_16ic(
    out: &mut [Complex16],
    a: &[Complex8],
    b: &[Complex8],
) -> Result<()> {
    engine().multiply_conjugate_8ic_16ic(out, a, b)
}

/// `out[i] = (input[i] >= 0.0) as i32` with the best available variant.
pub fn binary_slicer_32f_32i(out: &mut [i32], input: &[f32]) -> Result<()> {
    engine().binary_slicer_32f_32i(out, input)
}

/// `out[i] = input[i].re / scalar` with the best available variant.
pub fn deinterleave_real_8ic_32f(out: &mut [f32], input: &[Complex8], scalar: f32) -> Result<()> {
    engine().deinterleave_real_8ic_32f(out, input, scalar)
}

/// `out[i] = a[i] / b[i]` with the best available variant.
pub fn divide_32fc(out: &mut [Complex32], a: &[Complex32], b: &[Complex32]) -> Result<()> {
    engine().divide_32fc(out, a, b)
}

/// Index of the minimum-magnitude point with the best available variant.
pub fn index_min_32fc_16u(out: &mut u16, input: &[Complex32]) -> Result<()> {
    engine().index_min_32fc_16u(out, input)
}

/// `Σ taps[i] * input[i]` with the best available variant.
pub fn dot_prod_16i_32fc(out: &mut Complex32, input: &[i16], taps: &[Complex32]) -> Result<()> {
    engine().dot_prod_16i_32fc(out, input, taps)
}
