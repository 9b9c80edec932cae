//! A single bump-allocated memory block.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::ArenaError;

/// One contiguous block from the system allocator with a bump cursor.
///
/// Allocations advance the cursor and are never freed individually;
/// [`reset`](Self::reset) rewinds the cursor without releasing the block,
/// and dropping the arena frees it.
pub struct MemoryArena {
    block: NonNull<u8>,
    layout: Layout,
    /// Bytes from the start of the block to the next free byte.
    offset: usize,
}

// SAFETY: the arena exclusively owns its block; nothing in it is tied to
// the creating thread.
unsafe impl Send for MemoryArena {}

impl MemoryArena {
    /// Allocate a block of `size` bytes aligned to `alignment`.
    pub fn new(size: usize, alignment: usize) -> Result<Self, ArenaError> {
        let invalid = ArenaError::InvalidLayout {
            size,
            align: alignment,
        };
        if size == 0 {
            return Err(invalid);
        }
        let layout = Layout::from_size_align(size, alignment).map_err(|_| invalid)?;
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(block) = NonNull::new(raw) else {
            log::warn!("system allocator refused a {size}-byte arena block");
            return Err(ArenaError::AllocationFailed { bytes: size });
        };
        Ok(Self {
            block,
            layout,
            offset: 0,
        })
    }

    /// Bump-allocate room for `layout`.
    ///
    /// Returns `None` if the aligned request does not fit in the remaining
    /// space. The returned memory is uninitialised and stays valid until
    /// the arena is reset, rewound past it, or dropped.
    pub fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        let base = self.block.as_ptr() as usize;
        let cursor = base.checked_add(self.offset)?;
        let mask = layout.align() - 1;
        let start = cursor.checked_add(mask)? & !mask;
        let end = start.checked_add(layout.size())?;
        if end - base > self.capacity() {
            return None;
        }
        self.offset = end - base;
        // SAFETY: `start - base <= capacity`, so the result stays inside
        // (or one past the end of) the block.
        Some(unsafe { NonNull::new_unchecked(self.block.as_ptr().add(start - base)) })
    }

    /// Rewind the cursor to the start of the block.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Rewind the cursor to an earlier `offset`. Never moves it forward.
    pub(crate) fn rewind_to(&mut self, offset: usize) {
        self.offset = self.offset.min(offset);
    }

    /// Bytes handed out since the last reset, including alignment padding.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Size of the block in bytes.
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Bytes left before the block is full.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Alignment of the block base.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Whether `ptr` points into this block.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let base = self.block.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= base && addr < base + self.capacity()
    }
}

impl Drop for MemoryArena {
    fn drop(&mut self) {
        // SAFETY: `block` was allocated with exactly `layout`.
        unsafe { alloc::dealloc(self.block.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for MemoryArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryArena")
            .field("capacity", &self.capacity())
            .field("used", &self.offset)
            .field("alignment", &self.alignment())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_bump_and_align() {
        let mut arena = MemoryArena::new(256, 16).unwrap();
        let a = arena.allocate(Layout::new::<u8>()).unwrap();
        let b = arena.allocate(Layout::new::<u64>()).unwrap();
        assert_eq!(b.as_ptr() as usize % 8, 0);
        assert!(b.as_ptr() as usize > a.as_ptr() as usize);
        assert_eq!(arena.used(), 16);
        assert_eq!(arena.remaining(), 240);
        assert!(arena.contains(b.as_ptr()));
    }

    #[test]
    fn full_arena_returns_none() {
        let mut arena = MemoryArena::new(32, 8).unwrap();
        assert!(arena.allocate(Layout::from_size_align(24, 8).unwrap()).is_some());
        assert!(arena.allocate(Layout::from_size_align(16, 8).unwrap()).is_none());
        assert!(arena.allocate(Layout::from_size_align(8, 8).unwrap()).is_some());
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn reset_rewinds_without_freeing() {
        let mut arena = MemoryArena::new(64, 8).unwrap();
        let first = arena.allocate(Layout::new::<[u8; 40]>()).unwrap();
        arena.reset();
        assert_eq!(arena.used(), 0);
        let again = arena.allocate(Layout::new::<[u8; 40]>()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn invalid_layouts_rejected() {
        assert!(matches!(
            MemoryArena::new(0, 8),
            Err(ArenaError::InvalidLayout { size: 0, align: 8 })
        ));
        assert!(matches!(
            MemoryArena::new(64, 3),
            Err(ArenaError::InvalidLayout { .. })
        ));
    }
}
