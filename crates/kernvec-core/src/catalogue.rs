//! Operation catalogue: every operation, its buffers and its ordered variants.
//!
//! Each operation has a typed [`KernelTable`] whose entries pair a raw kernel
//! function pointer with its [`VariantInfo`] (ISA, alignment class, native
//! width, tail variant). Tables are built once per process and list variants
//! in preference order, so the last usable entry is the best one.
//!
//! [`operations`] flattens the tables into serialisable [`OperationInfo`]
//! records for external dispatchers.

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::isa::{cpu_features, CpuFeatures, Isa};
use crate::kernels::scalar;
use crate::types::{slice_is_aligned, Alignment, Complex16, Complex32, Complex8, ElementType};

#[cfg(target_arch = "aarch64")]
use crate::kernels::neon;
#[cfg(target_arch = "x86_64")]
use crate::kernels::{x86_avx, x86_sse};

// =============================================================================
// Kernel function-pointer types
// =============================================================================

/// `out[i] = f(input[i])`.
pub type UnaryFn<I, O> = unsafe fn(&mut [O], &[I]);
/// `out[i] = f(a[i], b[i])`.
pub type BinaryFn<A, B, O> = unsafe fn(&mut [O], &[A], &[B]);

/// Kernel signature of `tanh_32f`.
pub type TanhFn = UnaryFn<f32, f32>;
/// Kernel signature of `multiply_conjugate_8ic_16ic`.
pub type MultiplyConjugateFn = BinaryFn<Complex8, Complex8, Complex16>;
/// Kernel signature of `binary_slicer_32f_32i`.
pub type BinarySlicerFn = UnaryFn<f32, i32>;
/// Kernel signature of `deinterleave_real_8ic_32f`.
pub type DeinterleaveRealFn = unsafe fn(&mut [f32], &[Complex8], f32);
/// Kernel signature of `divide_32fc`.
pub type DivideFn = BinaryFn<Complex32, Complex32, Complex32>;
/// Kernel signature of `index_min_32fc_16u`.
pub type IndexMinFn = unsafe fn(&mut u16, &[Complex32]);
/// Kernel signature of `dot_prod_16i_32fc`.
pub type DotProdFn = unsafe fn(&mut Complex32, &[i16], &[Complex32]);

/// Operation names, in catalogue order.
pub const OPERATION_NAMES: [&str; 7] = [
    "tanh_32f",
    "multiply_conjugate_8ic_16ic",
    "binary_slicer_32f_32i",
    "deinterleave_real_8ic_32f",
    "divide_32fc",
    "index_min_32fc_16u",
    "dot_prod_16i_32fc",
];

// =============================================================================
// Variant metadata
// =============================================================================

/// Static description of one kernel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantInfo {
    /// Variant name, e.g. `a_avx`, `u_sse4_1`, `generic`, `neon`.
    pub name: &'static str,
    /// Instruction set the variant is compiled for.
    pub isa: Isa,
    /// Alignment class of every buffer the variant touches.
    pub alignment: Alignment,
    /// Elements processed per vector group.
    pub width: usize,
    /// Required buffer alignment in bytes (1 when any address works).
    pub alignment_bytes: usize,
    /// Variant that processes the `len % width` remainder.
    pub tail: Option<&'static str>,
    /// Second algorithm for the same ISA. Only selected when pinned by name.
    pub alternate: bool,
}

impl VariantInfo {
    const fn new(
        name: &'static str,
        isa: Isa,
        alignment: Alignment,
        width: usize,
        tail: Option<&'static str>,
    ) -> Self {
        let alignment_bytes = match alignment {
            Alignment::Aligned => isa.register_bytes(),
            Alignment::Unaligned => 1,
        };
        Self {
            name,
            isa,
            alignment,
            width,
            alignment_bytes,
            tail,
            alternate: false,
        }
    }

    const fn as_alternate(mut self) -> Self {
        self.alternate = true;
        self
    }
}

/// A kernel function pointer with its metadata.
#[derive(Clone, Copy)]
pub struct Variant<F> {
    operation: &'static str,
    info: VariantInfo,
    func: F,
}

impl<F: Copy> Variant<F> {
    fn new(info: VariantInfo, func: F) -> Self {
        Self {
            operation: "",
            info,
            func,
        }
    }

    /// Operation this variant implements.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Variant metadata.
    #[must_use]
    pub fn info(&self) -> &VariantInfo {
        &self.info
    }

    /// Variant name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// Raw kernel. Calling it is `unsafe`: see the kernel's safety contract.
    #[must_use]
    pub fn func(&self) -> F {
        self.func
    }

    /// Returns true when `features` include this variant's ISA.
    #[must_use]
    pub fn is_supported(&self, features: CpuFeatures) -> bool {
        features.supports(self.info.isa)
    }

    fn ensure_supported(&self) -> Result<()> {
        if self.is_supported(cpu_features()) {
            Ok(())
        } else {
            Err(Error::UnsupportedIsa {
                operation: self.operation,
                variant: self.info.name,
                isa: self.info.isa,
            })
        }
    }

    fn ensure_aligned<T>(&self, buffer: &[T]) -> Result<()> {
        if self.info.alignment == Alignment::Unaligned
            || slice_is_aligned(buffer, self.info.alignment_bytes)
        {
            Ok(())
        } else {
            Err(Error::Misaligned {
                operation: self.operation,
                variant: self.info.name,
                required: self.info.alignment_bytes,
            })
        }
    }
}

impl<F> std::fmt::Debug for Variant<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variant")
            .field("operation", &self.operation)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

pub(crate) fn ensure_len(operation: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            operation,
            expected,
            actual,
        })
    }
}

// =============================================================================
// Checked and unchecked entry points per kernel shape
// =============================================================================

impl<I, O> Variant<UnaryFn<I, O>> {
    /// Runs the kernel after checking ISA support, lengths and alignment.
    pub fn call(&self, out: &mut [O], input: &[I]) -> Result<()> {
        self.ensure_supported()?;
        ensure_len(self.operation, out.len(), input.len())?;
        self.ensure_aligned(out)?;
        self.ensure_aligned(input)?;
        // SAFETY: ISA, length and alignment preconditions checked above.
        unsafe { self.call_unchecked(out, input) };
        Ok(())
    }

    /// Runs the kernel without any checks.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports the variant's ISA, the buffers have
    /// equal length, and aligned variants only receive aligned buffers.
    #[inline]
    pub unsafe fn call_unchecked(&self, out: &mut [O], input: &[I]) {
        (self.func)(out, input);
    }
}

impl<A, B, O> Variant<BinaryFn<A, B, O>> {
    /// Runs the kernel after checking ISA support, lengths and alignment.
    pub fn call(&self, out: &mut [O], a: &[A], b: &[B]) -> Result<()> {
        self.ensure_supported()?;
        ensure_len(self.operation, out.len(), a.len())?;
        ensure_len(self.operation, out.len(), b.len())?;
        self.ensure_aligned(out)?;
        self.ensure_aligned(a)?;
        self.ensure_aligned(b)?;
        // SAFETY: ISA, length and alignment preconditions checked above.
        unsafe { self.call_unchecked(out, a, b) };
        Ok(())
    }

    /// Runs the kernel without any checks.
    ///
    /// # Safety
    ///
    /// Same contract as the unary `call_unchecked`.
    #[inline]
    pub unsafe fn call_unchecked(&self, out: &mut [O], a: &[A], b: &[B]) {
        (self.func)(out, a, b);
    }
}

impl Variant<DeinterleaveRealFn> {
    /// Runs the kernel after checking ISA support, lengths and alignment.
    pub fn call(&self, out: &mut [f32], input: &[Complex8], scalar: f32) -> Result<()> {
        self.ensure_supported()?;
        ensure_len(self.operation, out.len(), input.len())?;
        self.ensure_aligned(out)?;
        self.ensure_aligned(input)?;
        // SAFETY: ISA, length and alignment preconditions checked above.
        unsafe { self.call_unchecked(out, input, scalar) };
        Ok(())
    }

    /// # Safety
    ///
    /// Same contract as the unary `call_unchecked`.
    #[inline]
    pub unsafe fn call_unchecked(&self, out: &mut [f32], input: &[Complex8], scalar: f32) {
        (self.func)(out, input, scalar);
    }
}

impl Variant<IndexMinFn> {
    /// Runs the kernel after checking ISA support and alignment.
    ///
    /// `out` is left untouched when `input` is empty.
    pub fn call(&self, out: &mut u16, input: &[Complex32]) -> Result<()> {
        self.ensure_supported()?;
        self.ensure_aligned(input)?;
        // SAFETY: ISA and alignment preconditions checked above.
        unsafe { self.call_unchecked(out, input) };
        Ok(())
    }

    /// # Safety
    ///
    /// CPU supports the variant's ISA; aligned variants get an aligned `input`.
    #[inline]
    pub unsafe fn call_unchecked(&self, out: &mut u16, input: &[Complex32]) {
        (self.func)(out, input);
    }
}

impl Variant<DotProdFn> {
    /// Runs the kernel after checking ISA support, lengths and alignment.
    ///
    /// `out` is left untouched when `input` is empty.
    pub fn call(&self, out: &mut Complex32, input: &[i16], taps: &[Complex32]) -> Result<()> {
        self.ensure_supported()?;
        ensure_len(self.operation, input.len(), taps.len())?;
        self.ensure_aligned(input)?;
        self.ensure_aligned(taps)?;
        // SAFETY: ISA, length and alignment preconditions checked above.
        unsafe { self.call_unchecked(out, input, taps) };
        Ok(())
    }

    /// # Safety
    ///
    /// CPU supports the variant's ISA, `input.len() == taps.len()`, aligned
    /// variants get aligned buffers.
    #[inline]
    pub unsafe fn call_unchecked(&self, out: &mut Complex32, input: &[i16], taps: &[Complex32]) {
        (self.func)(out, input, taps);
    }
}

// =============================================================================
// Kernel tables
// =============================================================================

/// All variants of one operation, in preference order.
#[derive(Debug)]
pub struct KernelTable<F: 'static> {
    operation: &'static str,
    inputs: &'static [ElementType],
    output: ElementType,
    variants: Vec<Variant<F>>,
}

impl<F: Copy> KernelTable<F> {
    fn new(
        operation: &'static str,
        inputs: &'static [ElementType],
        output: ElementType,
        mut variants: Vec<Variant<F>>,
    ) -> Self {
        for variant in &mut variants {
            variant.operation = operation;
        }
        Self {
            operation,
            inputs,
            output,
            variants,
        }
    }

    /// Operation name.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// All variants compiled for this target.
    #[must_use]
    pub fn variants(&self) -> &[Variant<F>] {
        &self.variants
    }

    /// Iterates over all variants, in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &Variant<F>> {
        self.variants.iter()
    }

    /// Variants whose ISA is in `features`.
    pub fn supported(&self, features: CpuFeatures) -> impl Iterator<Item = &Variant<F>> {
        self.variants.iter().filter(move |v| v.is_supported(features))
    }

    /// Looks a variant up by name.
    pub fn variant(&self, name: &str) -> Result<&Variant<F>> {
        self.variants
            .iter()
            .find(|v| v.info.name == name)
            .ok_or_else(|| Error::UnknownVariant {
                operation: self.operation,
                variant: name.to_string(),
            })
    }

    /// The variant `variant` hands its remainder to, if any.
    #[must_use]
    pub fn tail_of(&self, variant: &Variant<F>) -> Option<&Variant<F>> {
        variant.info.tail.and_then(|name| self.variant(name).ok())
    }

    /// Most preferred variant usable with `features` on buffers of the given
    /// alignment class. Aligned buffers may use either family; unaligned
    /// buffers only the unaligned one. `generic` is always usable and
    /// alternates are never chosen here.
    #[must_use]
    pub fn best(&self, features: CpuFeatures, alignment: Alignment) -> &Variant<F> {
        self.variants
            .iter()
            .rev()
            .find(|v| {
                !v.info.alternate
                    && v.is_supported(features)
                    && (alignment == Alignment::Aligned || v.info.alignment == Alignment::Unaligned)
            })
            .unwrap_or(&self.variants[0])
    }

    /// Serialisable description of the operation.
    #[must_use]
    pub fn describe(&self) -> OperationInfo {
        OperationInfo {
            name: self.operation,
            inputs: self.inputs.to_vec(),
            output: self.output,
            variants: self.variants.iter().map(|v| v.info).collect(),
        }
    }
}

impl<'a, F: Copy> IntoIterator for &'a KernelTable<F> {
    type Item = &'a Variant<F>;
    type IntoIter = std::slice::Iter<'a, Variant<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

fn generic<F: Copy>(func: F) -> Variant<F> {
    Variant::new(
        VariantInfo::new("generic", Isa::Generic, Alignment::Unaligned, 1, None),
        func,
    )
}

/// SIMD variant whose remainder goes to `generic`.
#[allow(dead_code)] // Unused on targets without SIMD kernels.
fn simd<F: Copy>(
    name: &'static str,
    isa: Isa,
    alignment: Alignment,
    width: usize,
    func: F,
) -> Variant<F> {
    Variant::new(VariantInfo::new(name, isa, alignment, width, Some("generic")), func)
}

/// Alternate algorithm for an existing ISA; reachable by pinning only.
fn alternate<F: Copy>(variant: Variant<F>) -> Variant<F> {
    Variant::new(variant.info.as_alternate(), variant.func)
}

// =============================================================================
// Tables per operation
// =============================================================================

/// Variants of `tanh_32f`.
pub fn tanh_32f() -> &'static KernelTable<TanhFn> {
    static TABLE: OnceLock<KernelTable<TanhFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut v: Vec<Variant<TanhFn>> = vec![generic(scalar::tanh_32f as TanhFn)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            // AVX variants tail into u_sse, which tails into generic.
            let avx = |name, isa, alignment, func: TanhFn| {
                Variant::new(VariantInfo::new(name, isa, alignment, 8, Some("u_sse")), func)
            };
            v.extend([
                simd("u_sse", Isa::Sse, Unaligned, 4, x86_sse::tanh_32f_u_sse as TanhFn),
                simd("a_sse", Isa::Sse, Aligned, 4, x86_sse::tanh_32f_a_sse as TanhFn),
                avx("u_avx", Isa::Avx, Unaligned, x86_avx::tanh_32f_u_avx as TanhFn),
                avx("a_avx", Isa::Avx, Aligned, x86_avx::tanh_32f_a_avx as TanhFn),
                avx("u_avx_fma", Isa::AvxFma, Unaligned, x86_avx::tanh_32f_u_avx_fma as TanhFn),
                avx("a_avx_fma", Isa::AvxFma, Aligned, x86_avx::tanh_32f_a_avx_fma as TanhFn),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 4, neon::tanh_32f_neon as TanhFn));
        KernelTable::new("tanh_32f", &[ElementType::F32], ElementType::F32, v)
    })
}

/// Variants of `multiply_conjugate_8ic_16ic`.
pub fn multiply_conjugate_8ic_16ic() -> &'static KernelTable<MultiplyConjugateFn> {
    static TABLE: OnceLock<KernelTable<MultiplyConjugateFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = MultiplyConjugateFn;
        let mut v: Vec<Variant<F>> = vec![generic(scalar::multiply_conjugate_8ic_16ic as F)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse4_1", Isa::Sse41, Unaligned, 8, x86_sse::multiply_conjugate_8ic_16ic_u_sse4_1 as F),
                simd("a_sse4_1", Isa::Sse41, Aligned, 8, x86_sse::multiply_conjugate_8ic_16ic_a_sse4_1 as F),
                simd("u_avx2", Isa::Avx2, Unaligned, 16, x86_avx::multiply_conjugate_8ic_16ic_u_avx2 as F),
                simd("a_avx2", Isa::Avx2, Aligned, 16, x86_avx::multiply_conjugate_8ic_16ic_a_avx2 as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 8, neon::multiply_conjugate_8ic_16ic_neon as F));
        KernelTable::new(
            "multiply_conjugate_8ic_16ic",
            &[ElementType::Complex8, ElementType::Complex8],
            ElementType::Complex16,
            v,
        )
    })
}

/// Variants of `binary_slicer_32f_32i`.
pub fn binary_slicer_32f_32i() -> &'static KernelTable<BinarySlicerFn> {
    static TABLE: OnceLock<KernelTable<BinarySlicerFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = BinarySlicerFn;
        let mut v: Vec<Variant<F>> = vec![
            generic(scalar::binary_slicer_32f_32i as F),
            alternate(Variant::new(
                VariantInfo::new("generic_branchless", Isa::Generic, Alignment::Unaligned, 1, None),
                scalar::binary_slicer_32f_32i_branchless as F,
            )),
        ];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse2", Isa::Sse2, Unaligned, 4, x86_sse::binary_slicer_32f_32i_u_sse2 as F),
                simd("a_sse2", Isa::Sse2, Aligned, 4, x86_sse::binary_slicer_32f_32i_a_sse2 as F),
                simd("u_avx", Isa::Avx, Unaligned, 8, x86_avx::binary_slicer_32f_32i_u_avx as F),
                simd("a_avx", Isa::Avx, Aligned, 8, x86_avx::binary_slicer_32f_32i_a_avx as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 4, neon::binary_slicer_32f_32i_neon as F));
        KernelTable::new("binary_slicer_32f_32i", &[ElementType::F32], ElementType::I32, v)
    })
}

/// Variants of `deinterleave_real_8ic_32f`.
pub fn deinterleave_real_8ic_32f() -> &'static KernelTable<DeinterleaveRealFn> {
    static TABLE: OnceLock<KernelTable<DeinterleaveRealFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = DeinterleaveRealFn;
        let mut v: Vec<Variant<F>> = vec![generic(scalar::deinterleave_real_8ic_32f as F)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse", Isa::Sse, Unaligned, 4, x86_sse::deinterleave_real_8ic_32f_u_sse as F),
                simd("a_sse", Isa::Sse, Aligned, 4, x86_sse::deinterleave_real_8ic_32f_a_sse as F),
                simd("u_sse4_1", Isa::Sse41, Unaligned, 8, x86_sse::deinterleave_real_8ic_32f_u_sse4_1 as F),
                simd("a_sse4_1", Isa::Sse41, Aligned, 8, x86_sse::deinterleave_real_8ic_32f_a_sse4_1 as F),
                simd("u_avx2", Isa::Avx2, Unaligned, 16, x86_avx::deinterleave_real_8ic_32f_u_avx2 as F),
                simd("a_avx2", Isa::Avx2, Aligned, 16, x86_avx::deinterleave_real_8ic_32f_a_avx2 as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 8, neon::deinterleave_real_8ic_32f_neon as F));
        KernelTable::new(
            "deinterleave_real_8ic_32f",
            &[ElementType::Complex8, ElementType::ScalarF32],
            ElementType::F32,
            v,
        )
    })
}

/// Variants of `divide_32fc`.
pub fn divide_32fc() -> &'static KernelTable<DivideFn> {
    static TABLE: OnceLock<KernelTable<DivideFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = DivideFn;
        let mut v: Vec<Variant<F>> = vec![generic(scalar::divide_32fc as F)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse3", Isa::Sse3, Unaligned, 2, x86_sse::divide_32fc_u_sse3 as F),
                simd("a_sse3", Isa::Sse3, Aligned, 2, x86_sse::divide_32fc_a_sse3 as F),
                simd("u_avx", Isa::Avx, Unaligned, 4, x86_avx::divide_32fc_u_avx as F),
                simd("a_avx", Isa::Avx, Aligned, 4, x86_avx::divide_32fc_a_avx as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 4, neon::divide_32fc_neon as F));
        KernelTable::new(
            "divide_32fc",
            &[ElementType::Complex32, ElementType::Complex32],
            ElementType::Complex32,
            v,
        )
    })
}

/// Variants of `index_min_32fc_16u`.
pub fn index_min_32fc_16u() -> &'static KernelTable<IndexMinFn> {
    static TABLE: OnceLock<KernelTable<IndexMinFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = IndexMinFn;
        let mut v: Vec<Variant<F>> = vec![generic(scalar::index_min_32fc_16u as F)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse3", Isa::Sse3, Unaligned, 4, x86_sse::index_min_32fc_16u_u_sse3 as F),
                simd("a_sse3", Isa::Sse3, Aligned, 4, x86_sse::index_min_32fc_16u_a_sse3 as F),
                alternate(simd(
                    "u_avx2_variant_1",
                    Isa::Avx2,
                    Unaligned,
                    8,
                    x86_avx::index_min_32fc_16u_u_avx2_variant_1 as F,
                )),
                alternate(simd(
                    "a_avx2_variant_1",
                    Isa::Avx2,
                    Aligned,
                    8,
                    x86_avx::index_min_32fc_16u_a_avx2_variant_1 as F,
                )),
                simd("u_avx2", Isa::Avx2, Unaligned, 8, x86_avx::index_min_32fc_16u_u_avx2 as F),
                simd("a_avx2", Isa::Avx2, Aligned, 8, x86_avx::index_min_32fc_16u_a_avx2 as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 4, neon::index_min_32fc_16u_neon as F));
        KernelTable::new("index_min_32fc_16u", &[ElementType::Complex32], ElementType::U16, v)
    })
}

/// Variants of `dot_prod_16i_32fc`.
pub fn dot_prod_16i_32fc() -> &'static KernelTable<DotProdFn> {
    static TABLE: OnceLock<KernelTable<DotProdFn>> = OnceLock::new();
    TABLE.get_or_init(|| {
        type F = DotProdFn;
        let mut v: Vec<Variant<F>> = vec![generic(scalar::dot_prod_16i_32fc as F)];
        #[cfg(target_arch = "x86_64")]
        {
            use Alignment::{Aligned, Unaligned};
            v.extend([
                simd("u_sse", Isa::Sse, Unaligned, 4, x86_sse::dot_prod_16i_32fc_u_sse as F),
                simd("a_sse", Isa::Sse, Aligned, 4, x86_sse::dot_prod_16i_32fc_a_sse as F),
                simd("u_avx2", Isa::Avx2, Unaligned, 8, x86_avx::dot_prod_16i_32fc_u_avx2 as F),
                simd("a_avx2", Isa::Avx2, Aligned, 8, x86_avx::dot_prod_16i_32fc_a_avx2 as F),
                simd("u_avx2_fma", Isa::Avx2Fma, Unaligned, 8, x86_avx::dot_prod_16i_32fc_u_avx2_fma as F),
                simd("a_avx2_fma", Isa::Avx2Fma, Aligned, 8, x86_avx::dot_prod_16i_32fc_a_avx2_fma as F),
            ]);
        }
        #[cfg(target_arch = "aarch64")]
        v.push(simd("neon", Isa::Neon, Alignment::Unaligned, 4, neon::dot_prod_16i_32fc_neon as F));
        KernelTable::new(
            "dot_prod_16i_32fc",
            &[ElementType::I16, ElementType::Complex32],
            ElementType::Complex32,
            v,
        )
    })
}

// =============================================================================
// Serialisable catalogue
// =============================================================================

/// Description of one operation and its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    /// Operation name.
    pub name: &'static str,
    /// Input buffer element types, in argument order.
    pub inputs: Vec<ElementType>,
    /// Output element type.
    pub output: ElementType,
    /// Variants compiled for this target, in preference order.
    pub variants: Vec<VariantInfo>,
}

/// Every operation in the catalogue.
#[must_use]
pub fn operations() -> Vec<OperationInfo> {
    vec![
        tanh_32f().describe(),
        multiply_conjugate_8ic_16ic().describe(),
        binary_slicer_32f_32i().describe(),
        deinterleave_real_8ic_32f().describe(),
        divide_32fc().describe(),
        index_min_32fc_16u().describe(),
        dot_prod_16i_32fc().describe(),
    ]
}

/// Looks an operation up by name.
pub fn operation(name: &str) -> Result<OperationInfo> {
    operations()
        .into_iter()
        .find(|op| op.name == name)
        .ok_or_else(|| Error::UnknownOperation(name.to_string()))
}

/// Pretty-printed JSON dump of [`operations`].
pub fn to_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&operations())?)
}
