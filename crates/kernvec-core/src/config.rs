//! Kernel selection configuration.
//!
//! Loaded with `figment` from, in increasing priority:
//! 1. Built-in defaults (no ISA cap, no pinned variants)
//! 2. `kernvec.toml` in the working directory
//! 3. `KERNVEC_*` environment variables
//!
//! ```toml
//! # kernvec.toml
//! max_isa = "sse4_1"
//!
//! [preferred]
//! tanh_32f = "u_sse"
//! ```
//!
//! Environment equivalents: `KERNVEC_MAX_ISA=sse4_1`,
//! `KERNVEC_PREFERRED__TANH_32F=u_sse`.

use std::collections::BTreeMap;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::catalogue;
use crate::error::{Error, Result};
use crate::isa::{CpuFeatures, Isa};

/// Settings that steer [`crate::KernelEngine`] variant selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Most preferred ISA the engine may select; `None` means no cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_isa: Option<Isa>,
    /// Pinned variant name per operation name.
    pub preferred: BTreeMap<String, String>,
}

impl KernelConfig {
    /// Default configuration file name.
    pub const FILE_NAME: &'static str = "kernvec.toml";
    /// Prefix of configuration environment variables.
    pub const ENV_PREFIX: &'static str = "KERNVEC_";

    /// Loads `kernvec.toml` from the working directory, then the environment.
    pub fn load() -> Result<Self> {
        Self::from_file(Self::FILE_NAME)
    }

    /// Loads the given TOML file (missing files are skipped), then the
    /// environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Self::figment(path.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack used by [`KernelConfig::from_file`].
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Pins `variant` for `operation`.
    #[must_use]
    pub fn with_preferred(mut self, operation: &str, variant: &str) -> Self {
        self.preferred.insert(operation.to_string(), variant.to_string());
        self
    }

    /// Caps the selectable ISA.
    #[must_use]
    pub fn with_max_isa(mut self, isa: Isa) -> Self {
        self.max_isa = Some(isa);
        self
    }

    /// Checks that every pinned operation and variant exists.
    ///
    /// Whether the pinned variant runs on this CPU is checked when the engine
    /// is built.
    pub fn validate(&self) -> Result<()> {
        for (operation, variant) in &self.preferred {
            let info = catalogue::operation(operation)?;
            if !info.variants.iter().any(|v| v.name == variant) {
                return Err(Error::UnknownVariant {
                    operation: info.name,
                    variant: variant.clone(),
                });
            }
        }
        Ok(())
    }

    /// Applies `max_isa` to a detected capability set.
    #[must_use]
    pub fn effective_features(&self, detected: CpuFeatures) -> CpuFeatures {
        match self.max_isa {
            Some(max) => detected.capped(max),
            None => detected,
        }
    }

    /// Pinned variant for `operation`, if any.
    #[must_use]
    pub fn preferred_for(&self, operation: &str) -> Option<&str> {
        self.preferred.get(operation).map(String::as_str)
    }

    /// Serialises the configuration as a `kernvec.toml` document.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
