//! Error types for kernvec.
//!
//! Raw kernels never return errors: they trust their preconditions. These
//! errors are produced by the checked surface (engine, catalogue `call`,
//! configuration, aligned allocation) when a precondition does not hold.

use thiserror::Error;

use crate::isa::Isa;

/// Kernel library error types.
#[derive(Error, Debug)]
pub enum Error {
    /// An input buffer length does not match the output element count.
    #[error("{operation}: buffer length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        /// Operation name.
        operation: &'static str,
        /// Element count taken from the output buffer.
        expected: usize,
        /// Offending input length.
        actual: usize,
    },

    /// A buffer passed to an aligned variant is not aligned to the vector width.
    #[error("{operation}/{variant}: buffer not aligned to {required} bytes")]
    Misaligned {
        /// Operation name.
        operation: &'static str,
        /// Variant name.
        variant: &'static str,
        /// Required alignment in bytes.
        required: usize,
    },

    /// The variant needs an instruction set the CPU does not report.
    #[error("{operation}/{variant}: {isa} not available on this CPU")]
    UnsupportedIsa {
        /// Operation name.
        operation: &'static str,
        /// Variant name.
        variant: &'static str,
        /// Missing instruction set.
        isa: Isa,
    },

    /// No operation with this name exists in the catalogue.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The operation has no variant with this name.
    #[error("{operation}: unknown variant {variant}")]
    UnknownVariant {
        /// Operation name.
        operation: &'static str,
        /// Requested variant name.
        variant: String,
    },

    /// Requested alignment is zero or not a power of two.
    #[error("Invalid alignment: {0} (must be a non-zero power of two)")]
    InvalidAlignment(usize),

    /// The allocator returned null.
    #[error("Allocation of {bytes} bytes aligned to {align} failed")]
    AllocationFailed {
        /// Requested size in bytes.
        bytes: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// Configuration could not be extracted.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_length_mismatch() {
        let err = Error::LengthMismatch {
            operation: "tanh_32f",
            expected: 8,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "tanh_32f: buffer length mismatch (expected 8, got 7)"
        );
    }

    #[test]
    fn test_error_display_misaligned() {
        let err = Error::Misaligned {
            operation: "tanh_32f",
            variant: "a_avx",
            required: 32,
        };
        assert_eq!(err.to_string(), "tanh_32f/a_avx: buffer not aligned to 32 bytes");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
