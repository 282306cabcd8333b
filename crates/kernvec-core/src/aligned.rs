//! Owned, aligned element buffers.
//!
//! Aligned kernel variants need storage that starts on a register-size
//! boundary, which `Vec<T>` does not guarantee. [`AlignedBuffer`] owns such an
//! allocation, zero-initialises it and frees it on drop.
//!
//! ```
//! use kernvec_core::{max_alignment, AlignedBuffer};
//!
//! let mut buf = AlignedBuffer::<f32>::zeroed(1000, max_alignment())?;
//! buf[3] = 1.5;
//! assert_eq!(buf.len(), 1000);
//! # Ok::<(), kernvec_core::Error>(())
//! ```

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use bytemuck::Zeroable;

use crate::error::{Error, Result};

/// Largest alignment any variant compiled for this target can require.
#[must_use]
pub const fn max_alignment() -> usize {
    if cfg!(target_arch = "x86_64") {
        32
    } else {
        16
    }
}

/// Heap buffer of `len` elements aligned to a caller-chosen boundary.
pub struct AlignedBuffer<T: Zeroable> {
    ptr: NonNull<T>,
    len: usize,
    /// `None` for zero-sized allocations (nothing to free).
    layout: Option<Layout>,
    _marker: PhantomData<T>,
}

impl<T: Zeroable> AlignedBuffer<T> {
    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// `align` must be a power of two; it is raised to `align_of::<T>()` when
    /// smaller.
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        if align == 0 || !align.is_power_of_two() {
            return Err(Error::InvalidAlignment(align));
        }
        let align = align.max(std::mem::align_of::<T>());
        let bytes = len
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(Error::AllocationFailed { bytes: usize::MAX, align })?;

        if bytes == 0 {
            // No allocation: a dangling pointer with the requested alignment
            // is valid for a zero-length slice.
            let dangling = NonNull::new(align as *mut T).ok_or(Error::InvalidAlignment(align))?;
            return Ok(Self {
                ptr: dangling,
                len,
                layout: None,
                _marker: PhantomData,
            });
        }

        let layout =
            Layout::from_size_align(bytes, align).map_err(|_| Error::AllocationFailed { bytes, align })?;

        // SAFETY: `alloc_zeroed` requires a valid non-zero layout.
        // - Condition 1: `bytes > 0` is checked above.
        // - Condition 2: `Layout::from_size_align` validated size and alignment.
        // Reason: Raw allocation is the only way to request over-alignment.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(Error::AllocationFailed { bytes, align })?;

        Ok(Self {
            ptr,
            len,
            layout: Some(layout),
            _marker: PhantomData,
        })
    }

    /// Allocates an aligned copy of `items`.
    pub fn from_slice(items: &[T], align: usize) -> Result<Self>
    where
        T: Copy,
    {
        let mut buf = Self::zeroed(items.len(), align)?;
        buf.copy_from_slice(items);
        Ok(buf)
    }

    /// Alignment of the allocation in bytes.
    #[must_use]
    pub fn alignment(&self) -> usize {
        self.layout
            .map_or(self.ptr.as_ptr() as usize, |layout| layout.align())
    }
}

impl<T: Zeroable> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` is valid for `len` initialised elements.
        // - Condition 1: the allocation holds `len * size_of::<T>()` zeroed bytes.
        // - Condition 2: `T: Zeroable` makes the all-zero pattern a valid `T`.
        // Reason: Exposes the aligned allocation as an ordinary slice.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: Same invariants as `deref`; `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout {
            // SAFETY: `dealloc` requires the pointer/layout pair it was allocated with.
            // - Condition 1: `self.ptr` was produced by `alloc_zeroed(layout)` in `zeroed`.
            // - Condition 2: `drop` runs at most once.
            unsafe {
                dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
            }
        }
    }
}

impl<T: Zeroable + fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.alignment())
            .finish_non_exhaustive()
    }
}

// SAFETY: `AlignedBuffer` owns its allocation exclusively, like `Vec<T>`.
// - Condition 1: No aliasing references are stored, only pointer + length + layout.
// - Condition 2: Mutation requires `&mut self`.
unsafe impl<T: Zeroable + Send> Send for AlignedBuffer<T> {}
// SAFETY: Shared access only hands out `&[T]`, which is `Sync` when `T: Sync`.
unsafe impl<T: Zeroable + Sync> Sync for AlignedBuffer<T> {}
