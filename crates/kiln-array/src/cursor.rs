//! Positional cursors for scan-and-edit loops.
//!
//! A [`Cursor`] is a plain index stamped with the [`ArrayId`] of the array
//! that produced it and the array's [`Generation`] at that time. It holds no
//! borrow, so the array stays mutable while a cursor is alive; instead,
//! every dereference goes back through the array, which rejects cursors
//! from another instance (`ForeignCursor`) or from before a shift
//! (`StaleCursor`).
//!
//! Editing operations return a fresh cursor stamped with the new
//! generation. The usual erase-while-scanning loop is:
//!
//! ```
//! # use kiln_array::{array, Array};
//! let mut values: Array<i32> = array![1, 2, 3, 4];
//! let mut cursor = values.begin();
//! while cursor != values.end() {
//!     if *values.get_at(cursor)? % 2 == 0 {
//!         cursor = values.erase_at(cursor)?;
//!     } else {
//!         cursor.inc();
//!     }
//! }
//! assert_eq!(values, [1, 3]);
//! # Ok::<(), kiln_array::ArrayError>(())
//! ```
//!
//! [`ReverseCursor`] stores a forward *base* position and dereferences the
//! element just before it, so `rbegin()` has base `len` and `rend()` has
//! base `0`.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use kiln_core::{ArrayError, ArrayId, Generation};

use crate::array::Array;

/// A forward position within a specific array generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    index: usize,
    owner: ArrayId,
    generation: Generation,
}

impl Cursor {
    /// Index this cursor refers to.
    pub fn index(self) -> usize {
        self.index
    }

    /// Array that produced this cursor.
    pub fn owner(self) -> ArrayId {
        self.owner
    }

    /// Generation this cursor was stamped with.
    pub fn generation(self) -> Generation {
        self.generation
    }

    /// This cursor moved by a signed offset. Wraps; an out-of-range result
    /// is reported when dereferenced.
    #[must_use]
    pub fn offset(self, delta: isize) -> Self {
        Self {
            index: self.index.wrapping_add_signed(delta),
            ..self
        }
    }

    /// Advance to the next element.
    pub fn inc(&mut self) {
        self.index = self.index.wrapping_add(1);
    }

    /// Step back to the previous element.
    pub fn dec(&mut self) {
        self.index = self.index.wrapping_sub(1);
    }

    fn same_origin(&self, other: &Self) -> bool {
        self.owner == other.owner && self.generation == other.generation
    }
}

impl PartialOrd for Cursor {
    /// Cursors from different arrays or generations are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.same_origin(other).then(|| self.index.cmp(&other.index))
    }
}

impl Add<usize> for Cursor {
    type Output = Cursor;

    fn add(self, rhs: usize) -> Cursor {
        Cursor {
            index: self.index.wrapping_add(rhs),
            ..self
        }
    }
}

impl Sub<usize> for Cursor {
    type Output = Cursor;

    fn sub(self, rhs: usize) -> Cursor {
        Cursor {
            index: self.index.wrapping_sub(rhs),
            ..self
        }
    }
}

impl AddAssign<usize> for Cursor {
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl SubAssign<usize> for Cursor {
    fn sub_assign(&mut self, rhs: usize) {
        *self = *self - rhs;
    }
}

impl Sub for Cursor {
    type Output = isize;

    /// Signed distance from `rhs` to `self`.
    ///
    /// # Panics
    ///
    /// Panics if the cursors come from different arrays.
    fn sub(self, rhs: Cursor) -> isize {
        assert_eq!(
            self.owner, rhs.owner,
            "distance between cursors of different arrays"
        );
        self.index.wrapping_sub(rhs.index) as isize
    }
}

/// A reverse position within a specific array generation.
///
/// Advancing a reverse cursor moves toward the front of the array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReverseCursor {
    base: usize,
    owner: ArrayId,
    generation: Generation,
}

impl ReverseCursor {
    /// The forward cursor one past the element this cursor refers to.
    pub fn base(self) -> Cursor {
        Cursor {
            index: self.base,
            owner: self.owner,
            generation: self.generation,
        }
    }

    /// Index of the element this cursor refers to, if any.
    pub fn index(self) -> Option<usize> {
        self.base.checked_sub(1)
    }

    /// Array that produced this cursor.
    pub fn owner(self) -> ArrayId {
        self.owner
    }

    /// Generation this cursor was stamped with.
    pub fn generation(self) -> Generation {
        self.generation
    }

    /// Advance toward the front.
    pub fn inc(&mut self) {
        self.base = self.base.wrapping_sub(1);
    }

    /// Step back toward the end.
    pub fn dec(&mut self) {
        self.base = self.base.wrapping_add(1);
    }
}

impl PartialOrd for ReverseCursor {
    /// Ordered by traversal: the cursor further toward the front is greater.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.owner == other.owner && self.generation == other.generation)
            .then(|| other.base.cmp(&self.base))
    }
}

impl Add<usize> for ReverseCursor {
    type Output = ReverseCursor;

    fn add(self, rhs: usize) -> ReverseCursor {
        ReverseCursor {
            base: self.base.wrapping_sub(rhs),
            ..self
        }
    }
}

impl Sub<usize> for ReverseCursor {
    type Output = ReverseCursor;

    fn sub(self, rhs: usize) -> ReverseCursor {
        ReverseCursor {
            base: self.base.wrapping_add(rhs),
            ..self
        }
    }
}

impl AddAssign<usize> for ReverseCursor {
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl SubAssign<usize> for ReverseCursor {
    fn sub_assign(&mut self, rhs: usize) {
        *self = *self - rhs;
    }
}

impl Sub for ReverseCursor {
    type Output = isize;

    /// Signed traversal distance from `rhs` to `self`.
    fn sub(self, rhs: ReverseCursor) -> isize {
        assert_eq!(
            self.owner, rhs.owner,
            "distance between cursors of different arrays"
        );
        rhs.base.wrapping_sub(self.base) as isize
    }
}

impl<T> Array<T> {
    fn stamp(&self, index: usize) -> Cursor {
        Cursor {
            index,
            owner: self.id,
            generation: self.generation,
        }
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> Cursor {
        self.stamp(0)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor {
        self.stamp(self.len)
    }

    /// Cursor at `index`, which may equal `len` (the end position).
    pub fn cursor_at(&self, index: usize) -> Result<Cursor, ArrayError> {
        if index > self.len {
            return Err(ArrayError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.stamp(index))
    }

    /// Reverse cursor at the last element.
    pub fn rbegin(&self) -> ReverseCursor {
        self.begin_reverse_at(self.len)
    }

    /// Reverse cursor one before the first element.
    pub fn rend(&self) -> ReverseCursor {
        self.begin_reverse_at(0)
    }

    fn begin_reverse_at(&self, base: usize) -> ReverseCursor {
        ReverseCursor {
            base,
            owner: self.id,
            generation: self.generation,
        }
    }

    /// Check that `cursor` belongs to this array and is not stale.
    pub fn validate(&self, cursor: Cursor) -> Result<(), ArrayError> {
        self.check_origin(cursor.owner, cursor.generation)
    }

    fn check_origin(&self, owner: ArrayId, generation: Generation) -> Result<(), ArrayError> {
        if owner != self.id {
            return Err(ArrayError::ForeignCursor {
                cursor_owner: owner,
                array: self.id,
            });
        }
        if generation != self.generation {
            return Err(ArrayError::StaleCursor {
                cursor_generation: generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    /// The element under `cursor`.
    pub fn get_at(&self, cursor: Cursor) -> Result<&T, ArrayError> {
        self.validate(cursor)?;
        self.at(cursor.index)
    }

    /// The element under `cursor`, mutably.
    pub fn get_at_mut(&mut self, cursor: Cursor) -> Result<&mut T, ArrayError> {
        self.validate(cursor)?;
        self.at_mut(cursor.index)
    }

    /// The element under a reverse cursor.
    pub fn get_rev(&self, cursor: ReverseCursor) -> Result<&T, ArrayError> {
        self.check_origin(cursor.owner, cursor.generation)?;
        self.at(cursor.base.wrapping_sub(1))
    }

    /// The element under a reverse cursor, mutably.
    pub fn get_rev_mut(&mut self, cursor: ReverseCursor) -> Result<&mut T, ArrayError> {
        self.check_origin(cursor.owner, cursor.generation)?;
        self.at_mut(cursor.base.wrapping_sub(1))
    }

    /// Insert `value` before `cursor`. Returns a cursor at the new element.
    pub fn insert_at(&mut self, cursor: Cursor, value: T) -> Result<Cursor, ArrayError> {
        self.validate(cursor)?;
        self.try_insert(cursor.index, value)?;
        Ok(self.stamp(cursor.index))
    }

    /// Insert clones of `items` before `cursor`. Returns a cursor at the
    /// first inserted element.
    pub fn insert_slice_at(&mut self, cursor: Cursor, items: &[T]) -> Result<Cursor, ArrayError>
    where
        T: Clone,
    {
        self.validate(cursor)?;
        self.try_insert_slice(cursor.index, items)?;
        Ok(self.stamp(cursor.index))
    }

    /// Drop the element under `cursor`. Returns a cursor at the element
    /// that followed it, which is `end()` when the last element was erased.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<Cursor, ArrayError> {
        self.validate(cursor)?;
        self.try_remove_at(cursor.index)?;
        Ok(self.stamp(cursor.index))
    }

    /// Drop the elements in `begin..end`. Returns a cursor at the element
    /// that followed the range.
    pub fn erase_range(&mut self, begin: Cursor, end: Cursor) -> Result<Cursor, ArrayError> {
        self.validate(begin)?;
        self.validate(end)?;
        if begin.index > end.index {
            return Err(ArrayError::InvalidRange {
                start: begin.index,
                end: end.index,
                len: self.len,
            });
        }
        self.try_remove_range_at(begin.index, end.index - begin.index)?;
        Ok(self.stamp(begin.index))
    }
}
