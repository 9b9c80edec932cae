//! Test utilities and fixtures for Kiln development.
//!
//! Provides [`Tracked`], an element type that records every clone and drop
//! in a shared [`LifecycleCounts`], plus string fixtures that exercise the
//! non-trivial element path of the containers.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

pub use fixtures::{long_strings, numbered_strings};

#[derive(Default)]
struct Counters {
    constructed: Cell<usize>,
    clones: Cell<usize>,
    drops: Cell<usize>,
}

/// Shared lifecycle counters for a family of [`Tracked`] values.
///
/// Cloning a `LifecycleCounts` shares the underlying counters, so a test can
/// hand one to every element and read totals afterwards.
#[derive(Clone, Default)]
pub struct LifecycleCounts {
    inner: Rc<Counters>,
}

impl LifecycleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values created with [`Tracked::new`].
    pub fn constructed(&self) -> usize {
        self.inner.constructed.get()
    }

    /// Values created through `Clone`.
    pub fn clones(&self) -> usize {
        self.inner.clones.get()
    }

    /// Values dropped.
    pub fn drops(&self) -> usize {
        self.inner.drops.get()
    }

    /// Values currently alive.
    pub fn live(&self) -> usize {
        self.constructed() + self.clones() - self.drops()
    }

    /// Snapshot of `(constructed, clones, drops)` for before/after checks.
    pub fn snapshot(&self) -> (usize, usize, usize) {
        (self.constructed(), self.clones(), self.drops())
    }
}

impl fmt::Debug for LifecycleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCounts")
            .field("constructed", &self.constructed())
            .field("clones", &self.clones())
            .field("drops", &self.drops())
            .finish()
    }
}

/// An element that reports its clones and drops to a [`LifecycleCounts`].
///
/// Comparison and ordering look only at `value`.
pub struct Tracked {
    value: i32,
    counts: LifecycleCounts,
}

impl Tracked {
    pub fn new(value: i32, counts: &LifecycleCounts) -> Self {
        counts
            .inner
            .constructed
            .set(counts.inner.constructed.get() + 1);
        Self {
            value,
            counts: counts.clone(),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let counters = &self.counts.inner;
        counters.clones.set(counters.clones.get() + 1);
        Self {
            value: self.value,
            counts: self.counts.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let counters = &self.counts.inner;
        counters.drops.set(counters.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}
