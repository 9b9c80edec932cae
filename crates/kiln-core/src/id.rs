//! Strongly-typed identifiers for array instances and their generations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArrayId`] allocation.
static ARRAY_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an array.
///
/// Allocated from a monotonic atomic counter via [`ArrayId::next`].
/// Cursors record the id of the array that produced them, so an array
/// can reject a cursor that belongs to a different instance even when
/// the index would be in bounds.
///
/// Moving an array keeps its id. Cloning an array allocates a new one,
/// because the clone owns a different buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(ARRAY_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural generation of an array.
///
/// Incremented whenever live elements shift position or any element is
/// destroyed, including at the back of the array. Appends leave it alone.
/// A cursor taken in an older generation is rejected even if its index has
/// since been refilled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    ///
    /// Wraps on overflow; a wrapped generation can only collide with a
    /// cursor that survived 2^64 structural mutations.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_ids_are_unique() {
        let a = ArrayId::next();
        let b = ArrayId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn generation_advances() {
        let g = Generation::default();
        assert_eq!(g.next(), Generation(1));
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn generation_wraps_instead_of_panicking() {
        assert_eq!(Generation(u64::MAX).next(), Generation(0));
    }

    #[test]
    fn ids_display_as_numbers() {
        assert_eq!(Generation(7).to_string(), "7");
        let id = ArrayId::next();
        assert_eq!(id.to_string(), id.get().to_string());
    }
}
