//! Linear (bump) allocator over a chain of [`MemoryArena`] blocks.
//!
//! Allocation always goes to the current block. When it is full the block
//! is retired into an [`Array`] and a new one is opened, large enough for
//! the request. Nothing is freed until [`LinearAllocator::reset`], which
//! drops retired blocks and rewinds the current one.
//!
//! Every block switch and reset advances an epoch. [`ArenaMarker`]s record
//! the epoch so that [`LinearAllocator::rewind`] can refuse a marker that
//! points into a block that is no longer current.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::mem;
use std::ptr::{self, NonNull};

use kiln_array::Array;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::memory_arena::MemoryArena;

/// Saved position of a [`LinearAllocator`], for scoped rewinding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaMarker {
    epoch: u64,
    offset: usize,
}

impl ArenaMarker {
    /// Epoch the marker was taken in.
    pub fn epoch(self) -> u64 {
        self.epoch
    }
}

/// Bump allocator that grows by chaining arena blocks.
#[derive(Debug)]
pub struct LinearAllocator {
    config: ArenaConfig,
    current: MemoryArena,
    retired: Array<MemoryArena>,
    epoch: u64,
}

impl LinearAllocator {
    /// Build an allocator with one block of `config.arena_size` bytes.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let current = MemoryArena::new(config.arena_size, config.alignment)?;
        log::debug!(
            "linear allocator created with a {}-byte arena",
            config.arena_size
        );
        Ok(Self {
            config,
            current,
            retired: Array::new(),
            epoch: 0,
        })
    }

    /// Build an allocator with default settings and the given block size.
    pub fn with_arena_size(arena_size: usize) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(arena_size))
    }

    /// The configuration this allocator was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Bump-allocate uninitialised memory for `layout`.
    ///
    /// The memory stays valid until the allocator is reset, rewound past
    /// it, or dropped.
    pub fn allocate(&mut self, layout: Layout) -> Result<NonNull<u8>, ArenaError> {
        if let Some(ptr) = self.current.allocate(layout) {
            return Ok(ptr);
        }

        let invalid = ArenaError::InvalidLayout {
            size: layout.size(),
            align: layout.align(),
        };
        let fitted = layout
            .size()
            .checked_add(layout.align())
            .ok_or_else(|| invalid.clone())?;
        let size = self.config.arena_size.max(fitted);
        let align = self.config.alignment.max(layout.align());
        let fresh = MemoryArena::new(size, align)?;

        let full = mem::replace(&mut self.current, fresh);
        log::debug!(
            "retiring arena ({} of {} bytes used), opening {size}-byte arena",
            full.used(),
            full.capacity()
        );
        self.retired.push(full);
        self.epoch += 1;
        self.current.allocate(layout).ok_or(invalid)
    }

    /// Copy `items` into the arena and return the copy.
    pub fn alloc_copy_slice<T: Copy>(&mut self, items: &[T]) -> Result<&mut [T], ArenaError> {
        let layout = Layout::for_value(items);
        let dst = self.allocate(layout)?.cast::<T>();
        // SAFETY: `dst` is aligned and sized for `items.len()` values of `T`,
        // freshly allocated so it cannot overlap `items`. The returned borrow
        // of `self` keeps the block alive and un-rewound.
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), dst.as_ptr(), items.len());
            Ok(std::slice::from_raw_parts_mut(dst.as_ptr(), items.len()))
        }
    }

    /// Move `value` into the arena and return a reference to it.
    pub fn alloc_value<T: Copy>(&mut self, value: T) -> Result<&mut T, ArenaError> {
        let dst = self.allocate(Layout::new::<T>())?.cast::<T>();
        // SAFETY: `dst` is aligned and sized for one `T`.
        unsafe {
            dst.as_ptr().write(value);
            Ok(&mut *dst.as_ptr())
        }
    }

    /// Record the current position.
    pub fn mark(&self) -> ArenaMarker {
        ArenaMarker {
            epoch: self.epoch,
            offset: self.current.used(),
        }
    }

    /// Release everything allocated since `marker` was taken.
    ///
    /// Fails if the allocator has switched blocks or been reset since then.
    pub fn rewind(&mut self, marker: ArenaMarker) -> Result<(), ArenaError> {
        if marker.epoch != self.epoch {
            return Err(ArenaError::StaleMarker {
                marker_epoch: marker.epoch,
                current_epoch: self.epoch,
            });
        }
        self.current.rewind_to(marker.offset);
        Ok(())
    }

    /// Release every allocation.
    ///
    /// Retired blocks are freed. With `consolidate_on_reset`, a chain of
    /// several blocks is replaced by a single block of their combined size;
    /// if that block cannot be allocated the current block is kept.
    pub fn reset(&mut self) {
        if self.config.consolidate_on_reset && !self.retired.is_empty() {
            let total = self.bytes_reserved();
            self.retired.clear();
            match MemoryArena::new(total, self.config.alignment) {
                Ok(merged) => {
                    log::debug!("consolidated arenas into one {total}-byte arena");
                    self.current = merged;
                }
                Err(e) => log::warn!("arena consolidation skipped: {e}"),
            }
        } else {
            self.retired.clear();
        }
        self.current.reset();
        self.epoch += 1;
    }

    /// Bytes handed out across all blocks, including alignment padding.
    pub fn bytes_used(&self) -> usize {
        self.retired.iter().map(MemoryArena::used).sum::<usize>() + self.current.used()
    }

    /// Bytes reserved from the system allocator across all blocks.
    pub fn bytes_reserved(&self) -> usize {
        self.retired.iter().map(MemoryArena::capacity).sum::<usize>() + self.current.capacity()
    }

    /// Number of blocks currently held.
    pub fn arena_count(&self) -> usize {
        self.retired.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> LinearAllocator {
        LinearAllocator::new(ArenaConfig {
            arena_size: 64,
            alignment: 8,
            consolidate_on_reset: true,
        })
        .unwrap()
    }

    #[test]
    fn overflow_opens_a_new_arena() {
        let mut alloc = small();
        alloc.allocate(Layout::new::<[u8; 48]>()).unwrap();
        assert_eq!(alloc.arena_count(), 1);
        alloc.allocate(Layout::new::<[u8; 32]>()).unwrap();
        assert_eq!(alloc.arena_count(), 2);
        assert_eq!(alloc.bytes_reserved(), 128);
        assert_eq!(alloc.bytes_used(), 80);
    }

    #[test]
    fn oversized_request_gets_a_dedicated_arena() {
        let mut alloc = small();
        let ptr = alloc
            .allocate(Layout::from_size_align(200, 32).unwrap())
            .unwrap();
        assert_eq!(ptr.as_ptr() as usize % 32, 0);
        assert!(alloc.bytes_reserved() >= 64 + 200);
    }

    #[test]
    fn reset_consolidates_into_one_arena() {
        let mut alloc = small();
        for _ in 0..5 {
            alloc.allocate(Layout::new::<[u8; 40]>()).unwrap();
        }
        let reserved = alloc.bytes_reserved();
        assert!(alloc.arena_count() > 1);

        alloc.reset();
        assert_eq!(alloc.arena_count(), 1);
        assert_eq!(alloc.bytes_reserved(), reserved);
        assert_eq!(alloc.bytes_used(), 0);
    }

    #[test]
    fn reset_without_consolidation_keeps_current_block() {
        let mut alloc = LinearAllocator::new(ArenaConfig {
            consolidate_on_reset: false,
            ..ArenaConfig::new(64)
        })
        .unwrap();
        for _ in 0..3 {
            alloc.allocate(Layout::new::<[u8; 40]>()).unwrap();
        }
        alloc.reset();
        assert_eq!(alloc.arena_count(), 1);
        assert_eq!(alloc.bytes_reserved(), 64);
    }

    #[test]
    fn copies_and_values() {
        let mut alloc = small();
        let copied = alloc.alloc_copy_slice(&[1u32, 2, 3]).unwrap();
        copied[1] = 20;
        assert_eq!(copied, &[1, 20, 3]);
        let value = alloc.alloc_value(7.5f64).unwrap();
        assert_eq!(*value, 7.5);
    }

    #[test]
    fn rewind_releases_since_marker() {
        let mut alloc = small();
        alloc.allocate(Layout::new::<u64>()).unwrap();
        let marker = alloc.mark();
        alloc.allocate(Layout::new::<[u64; 4]>()).unwrap();
        alloc.rewind(marker).unwrap();
        assert_eq!(alloc.bytes_used(), 8);
    }

    #[test]
    fn marker_from_before_a_switch_is_stale() {
        let mut alloc = small();
        let marker = alloc.mark();
        alloc.allocate(Layout::new::<[u8; 100]>()).unwrap();
        let err = alloc.rewind(marker).unwrap_err();
        assert_eq!(
            err,
            ArenaError::StaleMarker {
                marker_epoch: 0,
                current_epoch: 1
            }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = LinearAllocator::with_arena_size(0).unwrap_err();
        assert!(matches!(err, ArenaError::Config(_)));
    }
}
