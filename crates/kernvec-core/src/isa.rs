//! Instruction-set tags and the cached CPU capability probe.
//!
//! Variant selection itself lives in [`crate::dispatch`]; this module only
//! answers "does this CPU report extension X".

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Instruction-set extension a kernel variant is compiled for.
///
/// Declaration order is preference order: later entries are preferred when
/// several are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Isa {
    /// Portable scalar code.
    Generic,
    /// SSE (x86_64 baseline).
    Sse,
    /// SSE2 (x86_64 baseline).
    Sse2,
    /// SSE3.
    Sse3,
    /// SSE4.1.
    #[serde(rename = "sse4_1")]
    Sse41,
    /// AVX.
    Avx,
    /// AVX + FMA3.
    AvxFma,
    /// AVX2.
    Avx2,
    /// AVX2 + FMA3.
    Avx2Fma,
    /// ARM NEON (aarch64 baseline).
    Neon,
}

impl Isa {
    /// All tags, in preference order.
    pub const ALL: [Isa; 10] = [
        Isa::Generic,
        Isa::Sse,
        Isa::Sse2,
        Isa::Sse3,
        Isa::Sse41,
        Isa::Avx,
        Isa::AvxFma,
        Isa::Avx2,
        Isa::Avx2Fma,
        Isa::Neon,
    ];

    /// Register width in bytes; also the alignment aligned variants require.
    #[must_use]
    pub const fn register_bytes(self) -> usize {
        match self {
            Self::Generic => 4,
            Self::Sse | Self::Sse2 | Self::Sse3 | Self::Sse41 | Self::Neon => 16,
            Self::Avx | Self::AvxFma | Self::Avx2 | Self::Avx2Fma => 32,
        }
    }

    /// Lower-case tag used in variant names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sse => "sse",
            Self::Sse2 => "sse2",
            Self::Sse3 => "sse3",
            Self::Sse41 => "sse4_1",
            Self::Avx => "avx",
            Self::AvxFma => "avx_fma",
            Self::Avx2 => "avx2",
            Self::Avx2Fma => "avx2_fma",
            Self::Neon => "neon",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of instruction-set extensions available to kernel dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuFeatures {
    bits: u16,
}

impl CpuFeatures {
    /// Probes the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        let mut features = Self::only(&[Isa::Generic]);

        #[cfg(target_arch = "x86_64")]
        {
            // SSE and SSE2 are part of the x86_64 baseline.
            features.insert(Isa::Sse);
            features.insert(Isa::Sse2);
            if is_x86_feature_detected!("sse3") {
                features.insert(Isa::Sse3);
            }
            if is_x86_feature_detected!("sse4.1") {
                features.insert(Isa::Sse41);
            }
            let fma = is_x86_feature_detected!("fma");
            if is_x86_feature_detected!("avx") {
                features.insert(Isa::Avx);
                if fma {
                    features.insert(Isa::AvxFma);
                }
            }
            if is_x86_feature_detected!("avx2") {
                features.insert(Isa::Avx2);
                if fma {
                    features.insert(Isa::Avx2Fma);
                }
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            features.insert(Isa::Neon);
        }

        features
    }

    /// Builds a set containing exactly the given tags (plus nothing implied).
    #[must_use]
    pub fn only(isas: &[Isa]) -> Self {
        let mut features = Self { bits: 0 };
        for &isa in isas {
            features.insert(isa);
        }
        features
    }

    /// Adds a tag to the set.
    pub fn insert(&mut self, isa: Isa) {
        self.bits |= isa.bit();
    }

    /// Returns a copy without any tag preferred over `max`.
    #[must_use]
    pub fn capped(self, max: Isa) -> Self {
        let mut capped = Self { bits: 0 };
        for isa in self.iter().filter(|&isa| isa <= max) {
            capped.insert(isa);
        }
        capped.insert(Isa::Generic);
        capped
    }

    /// Returns true when `isa` is in the set. `Generic` always is.
    #[inline]
    #[must_use]
    pub fn supports(self, isa: Isa) -> bool {
        isa == Isa::Generic || self.bits & isa.bit() != 0
    }

    /// Iterates over the tags in the set, in preference order.
    pub fn iter(self) -> impl Iterator<Item = Isa> {
        Isa::ALL.into_iter().filter(move |&isa| self.supports(isa))
    }

    /// Most preferred tag in the set.
    #[must_use]
    pub fn best(self) -> Isa {
        self.iter().last().unwrap_or(Isa::Generic)
    }
}

impl fmt::Debug for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Cached CPU features - detected once at first use.
static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Returns the cached capability set of the running CPU.
#[inline]
#[must_use]
pub fn cpu_features() -> CpuFeatures {
    *CPU_FEATURES.get_or_init(CpuFeatures::detect)
}
