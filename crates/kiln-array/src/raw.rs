//! Raw element storage.
//!
//! [`RawBuffer`] owns an uninitialised allocation sized for `capacity`
//! elements of `T`. It never constructs or drops elements; that is the
//! job of [`Array`](crate::Array), which tracks which slots are live.
//!
//! Every `unsafe` block carries a `// SAFETY:` comment. Zero-sized element
//! types never touch the allocator.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use kiln_core::ArrayError;

/// Owned, uninitialised storage for up to `capacity` elements.
///
/// `ptr` is `None` exactly when `capacity` is zero.
pub(crate) struct RawBuffer<T> {
    ptr: Option<NonNull<T>>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawBuffer<T>` uniquely owns its allocation, exactly like a
// `Box<[MaybeUninit<T>]>`; sending or sharing it is sound when `T` allows it.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: see above; `&RawBuffer<T>` only hands out `*const T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty buffer. Does not allocate.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: None,
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Number of element slots in the allocation.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a backing allocation is held.
    pub(crate) fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Base pointer of the allocation, or a dangling pointer when empty.
    ///
    /// The dangling pointer is non-null and aligned, so empty slices can
    /// be built from it.
    pub(crate) fn as_ptr(&self) -> *const T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// Mutable base pointer of the allocation, or a dangling pointer when empty.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    fn layout_for(capacity: usize) -> Result<Layout, ArrayError> {
        Layout::array::<T>(capacity).map_err(|_| ArrayError::CapacityOverflow {
            requested: capacity,
        })
    }

    /// Resize the allocation to exactly `new_capacity` slots.
    ///
    /// Slot contents in `0..min(capacity, new_capacity)` are carried over
    /// bitwise. The caller must already have dropped any live element at
    /// or beyond `new_capacity`. On failure the buffer is left untouched.
    pub(crate) fn try_reallocate(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        if new_capacity == self.capacity {
            return Ok(());
        }

        if Self::IS_ZST {
            self.ptr = (new_capacity > 0).then(NonNull::dangling);
            self.capacity = new_capacity;
            return Ok(());
        }

        if new_capacity == 0 {
            self.release();
            return Ok(());
        }

        let new_layout = Self::layout_for(new_capacity)?;
        let raw = match self.ptr {
            // SAFETY: `new_layout` has a non-zero size because `T` is not
            // zero-sized and `new_capacity > 0`.
            None => unsafe { alloc::alloc(new_layout) },
            Some(old) => {
                let old_layout = Self::layout_for(self.capacity)?;
                // SAFETY: `old` was allocated by the global allocator with
                // `old_layout`. The new size is non-zero and `Layout::array`
                // has checked it does not exceed `isize::MAX`.
                unsafe { alloc::realloc(old.as_ptr().cast(), old_layout, new_layout.size()) }
            }
        };

        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => {
                self.ptr = Some(ptr);
                self.capacity = new_capacity;
                Ok(())
            }
            None => Err(ArrayError::AllocationFailure {
                bytes: new_layout.size(),
            }),
        }
    }

    /// Free the allocation. Live elements must already have been dropped
    /// or relocated.
    pub(crate) fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            if !Self::IS_ZST {
                if let Ok(layout) = Self::layout_for(self.capacity) {
                    // SAFETY: `ptr` was allocated by the global allocator
                    // with exactly this layout.
                    unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) };
                }
            }
        }
        self.capacity = 0;
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Diverge on a failed infallible growth request.
///
/// Allocation failures go to the process allocation-error handler;
/// overflow is a caller bug and panics.
pub(crate) fn capacity_error<T>(err: ArrayError) -> ! {
    match err {
        ArrayError::AllocationFailure { bytes } => {
            let layout = Layout::from_size_align(bytes, mem::align_of::<T>())
                .unwrap_or_else(|_| Layout::new::<T>());
            alloc::handle_alloc_error(layout)
        }
        other => panic!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_holds_no_allocation() {
        let buf = RawBuffer::<u64>::new();
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
        assert!(!buf.as_ptr().is_null());
    }

    #[test]
    fn reallocate_grows_and_preserves_contents() {
        let mut buf = RawBuffer::<u32>::new();
        buf.try_reallocate(4).unwrap();
        assert!(buf.is_allocated());
        for i in 0..4 {
            // SAFETY: slot `i` is within the 4-slot allocation.
            unsafe { buf.as_mut_ptr().add(i).write(i as u32 * 10) };
        }

        buf.try_reallocate(64).unwrap();
        assert_eq!(buf.capacity(), 64);
        for i in 0..4 {
            // SAFETY: slots 0..4 were written above and carried over.
            let value = unsafe { buf.as_ptr().add(i).read() };
            assert_eq!(value, i as u32 * 10);
        }
    }

    #[test]
    fn reallocate_to_zero_frees() {
        let mut buf = RawBuffer::<u8>::new();
        buf.try_reallocate(16).unwrap();
        buf.try_reallocate(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn zero_sized_types_never_allocate_but_track_capacity() {
        let mut buf = RawBuffer::<()>::new();
        buf.try_reallocate(1000).unwrap();
        assert_eq!(buf.capacity(), 1000);
        assert!(buf.is_allocated());
        buf.try_reallocate(0).unwrap();
        assert!(!buf.is_allocated());
    }

    #[test]
    fn oversized_request_is_capacity_overflow() {
        let mut buf = RawBuffer::<u64>::new();
        let result = buf.try_reallocate(usize::MAX / 4);
        assert!(matches!(result, Err(ArrayError::CapacityOverflow { .. })));
        assert_eq!(buf.capacity(), 0);
    }
}
