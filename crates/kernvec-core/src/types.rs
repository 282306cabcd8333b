//! Element and buffer types shared by every kernel.
//!
//! Complex element types are `#[repr(C)]` pairs so that interleaved
//! `re, im, re, im, ...` storage can be viewed as `[ComplexN]` (and back) with
//! `bytemuck::cast_slice`, without copies.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Complex value with signed 8-bit components.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Complex8 {
    /// Real part.
    pub re: i8,
    /// Imaginary part.
    pub im: i8,
}

/// Complex value with signed 16-bit components.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Complex16 {
    /// Real part.
    pub re: i16,
    /// Imaginary part.
    pub im: i16,
}

/// Complex value with single-precision components.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Complex32 {
    /// Real part.
    pub re: f32,
    /// Imaginary part.
    pub im: f32,
}

impl Complex8 {
    /// Creates a complex value from its parts.
    #[inline]
    #[must_use]
    pub const fn new(re: i8, im: i8) -> Self {
        Self { re, im }
    }
}

impl Complex16 {
    /// Creates a complex value from its parts.
    #[inline]
    #[must_use]
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }
}

impl Complex32 {
    /// Creates a complex value from its parts.
    #[inline]
    #[must_use]
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Squared magnitude `re² + im²`.
    #[inline]
    #[must_use]
    pub fn norm_sqr(self) -> f32 {
        self.re * self.re + self.im * self.im
    }
}

/// Memory alignment class a variant requires of every buffer it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Buffers must start on a multiple of the variant's register size.
    Aligned,
    /// Any address is accepted.
    Unaligned,
}

impl Alignment {
    /// Short tag used in variant names (`a_` / `u_`).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Aligned => "a",
            Self::Unaligned => "u",
        }
    }
}

/// Element type of a buffer, as recorded in the operation catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `u16` (index results)
    U16,
    /// `f32`
    F32,
    /// `f32` scalar parameter passed by value.
    ScalarF32,
    /// [`Complex8`]
    Complex8,
    /// [`Complex16`]
    Complex16,
    /// [`Complex32`]
    Complex32,
}

impl ElementType {
    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::I16 | Self::U16 | Self::Complex8 => 2,
            Self::I32 | Self::F32 | Self::ScalarF32 | Self::Complex16 => 4,
            Self::Complex32 => 8,
        }
    }
}

/// Returns true when `ptr` is a multiple of `bytes`.
///
/// `bytes` must be a power of two.
#[inline]
#[must_use]
pub fn is_aligned_to<T>(ptr: *const T, bytes: usize) -> bool {
    debug_assert!(bytes.is_power_of_two());
    (ptr as usize) & (bytes - 1) == 0
}

/// Returns true when the slice starts on a multiple of `bytes`.
///
/// Empty slices are always considered aligned: kernels never touch them.
#[inline]
#[must_use]
pub fn slice_is_aligned<T>(slice: &[T], bytes: usize) -> bool {
    slice.is_empty() || is_aligned_to(slice.as_ptr(), bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_storage_casts_without_copy() {
        let raw: [i8; 6] = [1, -2, 3, -4, 127, -128];
        let complex: &[Complex8] = bytemuck::cast_slice(&raw);
        assert_eq!(complex, [Complex8::new(1, -2), Complex8::new(3, -4), Complex8::new(127, -128)]);

        let pairs = [Complex32::new(1.5, -2.0), Complex32::new(0.0, 4.0)];
        let flat: &[f32] = bytemuck::cast_slice(&pairs);
        assert_eq!(flat, [1.5, -2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_element_sizes_match_layout() {
        assert_eq!(ElementType::Complex8.size(), std::mem::size_of::<Complex8>());
        assert_eq!(ElementType::Complex16.size(), std::mem::size_of::<Complex16>());
        assert_eq!(ElementType::Complex32.size(), std::mem::size_of::<Complex32>());
        assert_eq!(ElementType::I16.size(), 2);
    }

    #[test]
    fn test_norm_sqr() {
        assert_eq!(Complex32::new(3.0, 4.0).norm_sqr(), 25.0);
    }

    #[test]
    fn test_alignment_checks() {
        let words = [0_u64; 4];
        assert!(is_aligned_to(words.as_ptr(), 8));
        assert!(!is_aligned_to(words[1..].as_ptr().cast::<u8>().wrapping_add(1), 2));
        assert!(slice_is_aligned::<f32>(&[], 64));
        assert_eq!(Alignment::Aligned.tag(), "a");
        assert_eq!(Alignment::Unaligned.tag(), "u");
    }
}
