//! The [`Array`] container: storage policy and mutating operations.
//!
//! Live elements occupy slots `0..len`; slots `len..capacity` are
//! uninitialised. Every mutation below keeps that split intact, including
//! on unwind: whenever a user callback (`clone`, `default`, `drop`) runs
//! while the live range is temporarily split, `len` is first lowered so an
//! unwinding panic leaks elements rather than dropping them twice.

#![allow(unsafe_code)]

use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use kiln_core::{ArrayError, ArrayId, ErrorKind, Generation};

use crate::lifecycle::{
    clone_construct_range, copy_construct_range, default_construct_range, destruct_range,
    fill_construct, relocate_range, shift_toward_back, shift_toward_front,
};
use crate::raw::{capacity_error, RawBuffer};

/// Capacity chosen when an append needs room for `required` elements and
/// the buffer currently holds `current`.
///
/// The rule is `required + current`: for a single push onto a full array
/// of length `n` this is `2n + 1`, so capacity strictly increases even from
/// zero and repeated pushes stay amortised O(1). Saturates instead of
/// overflowing; an unsatisfiable result is rejected by the allocator layer
/// as [`ArrayError::CapacityOverflow`].
pub fn grow_capacity(required: usize, current: usize) -> usize {
    required.saturating_add(current)
}

/// Resolve a `try_*` result for a panicking entry point.
#[track_caller]
pub(crate) fn expect_ok<T, R>(result: Result<R, ArrayError>) -> R {
    match result {
        Ok(value) => value,
        Err(err) if err.kind() == ErrorKind::AllocationFailure => capacity_error::<T>(err),
        Err(err) => panic!("{err}"),
    }
}

/// A growable, contiguous, heap-allocated array.
///
/// `Array<T>` exclusively owns its buffer and every live element in it.
/// Unlike `Vec`, the capacity policy is explicit: [`reserve`](Array::reserve)
/// sets the capacity to an exact value (shrinking destructively below the
/// current length) and automatic growth follows [`grow_capacity`].
///
/// Each array carries an [`ArrayId`] and a [`Generation`]. Positional
/// [`Cursor`](crate::Cursor)s record both, so the array can reject a cursor
/// from another instance or one taken before elements shifted or were
/// destroyed.
///
/// Every operation that can fail has a panicking form and a `try_*` form
/// returning [`ArrayError`].
pub struct Array<T> {
    pub(crate) buf: RawBuffer<T>,
    pub(crate) len: usize,
    pub(crate) id: ArrayId,
    pub(crate) generation: Generation,
}

impl<T> Array<T> {
    /// An empty array. Does not allocate.
    pub fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
            id: ArrayId::next(),
            generation: Generation::default(),
        }
    }

    /// An empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        expect_ok::<T, _>(Self::try_with_capacity(capacity))
    }

    /// Fallible form of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        let mut array = Self::new();
        array.buf.try_reallocate(capacity)?;
        Ok(array)
    }

    /// `count` default-constructed elements.
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(count);
        let base = array.buf.as_mut_ptr();
        // SAFETY: the buffer has `count` uninitialised slots from 0; `len`
        // tracks each constructed slot.
        unsafe { default_construct_range(base, &mut array.len, count) };
        array
    }

    /// `count` clones of `value`.
    pub fn from_elem(count: usize, value: &T) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(count);
        let base = array.buf.as_mut_ptr();
        // SAFETY: as in `with_len`.
        unsafe { fill_construct(base, &mut array.len, count, value) };
        array
    }

    /// Clones of every element of `items`, in order.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(items.len());
        let base = array.buf.as_mut_ptr();
        // SAFETY: `items.len()` uninitialised slots, disjoint from `items`.
        unsafe { clone_construct_range(base, &mut array.len, items) };
        array
    }

    /// Bitwise copy of `items`.
    pub fn from_copy_slice(items: &[T]) -> Self
    where
        T: Copy,
    {
        let mut array = Self::with_capacity(items.len());
        // SAFETY: `items.len()` uninitialised slots, disjoint from `items`.
        unsafe { copy_construct_range(array.buf.as_mut_ptr(), items) };
        array.len = items.len();
        array
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots the buffer holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Identity of this array instance.
    pub fn id(&self) -> ArrayId {
        self.id
    }

    /// Current structural generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Index of the last live element, or `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Bytes occupied by live elements.
    pub fn size_in_bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    /// Bytes reserved by the buffer.
    pub fn capacity_in_bytes(&self) -> usize {
        self.capacity() * mem::size_of::<T>()
    }

    /// Base pointer of the buffer. Dangling (but non-null and aligned) when
    /// nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable base pointer of the buffer.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `0..len` is live and the pointer is non-null and aligned
        // even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        self.as_slice().get(index).ok_or(ArrayError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::OutOfRange { index, len })
    }

    /// `count` elements starting at `offset`.
    pub fn view(&self, offset: usize, count: usize) -> Result<&[T], ArrayError> {
        let end = self.check_range(offset, count)?;
        Ok(&self.as_slice()[offset..end])
    }

    /// Mutable form of [`view`](Self::view).
    pub fn view_mut(&mut self, offset: usize, count: usize) -> Result<&mut [T], ArrayError> {
        let end = self.check_range(offset, count)?;
        Ok(&mut self.as_mut_slice()[offset..end])
    }

    fn check_range(&self, offset: usize, count: usize) -> Result<usize, ArrayError> {
        match offset.checked_add(count) {
            Some(end) if end <= self.len => Ok(end),
            end => Err(ArrayError::InvalidRange {
                start: offset,
                end: end.unwrap_or(usize::MAX),
                len: self.len,
            }),
        }
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.next();
    }

    // ── Capacity ───────────────────────────────────────────────

    /// Set the capacity to exactly `new_capacity`.
    ///
    /// When `new_capacity` is below the current length the surplus tail is
    /// dropped first: this is a destructive shrink, equivalent to
    /// [`truncate`](Self::truncate) followed by [`shrink_to_fit`](Self::shrink_to_fit).
    pub fn reserve(&mut self, new_capacity: usize) {
        expect_ok::<T, _>(self.try_reserve(new_capacity));
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        if new_capacity == self.capacity() {
            return Ok(());
        }
        if new_capacity < self.len {
            log::trace!(
                "array {}: reserve({new_capacity}) drops {} trailing elements",
                self.id,
                self.len - new_capacity
            );
            self.truncate(new_capacity);
        }
        self.reallocate(new_capacity)
    }

    /// Release unused capacity so that `capacity() == len()`.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len {
            expect_ok::<T, _>(self.reallocate(self.len));
        }
    }

    /// Resize the buffer in place. `new_capacity` must not be below `len`.
    fn reallocate(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        debug_assert!(new_capacity >= self.len);
        let old_capacity = self.capacity();
        self.buf.try_reallocate(new_capacity)?;
        log::trace!(
            "array {}: capacity {old_capacity} -> {new_capacity} ({} byte elements)",
            self.id,
            mem::size_of::<T>()
        );
        Ok(())
    }

    /// Make room for `additional` elements past `len`, growing per
    /// [`grow_capacity`] when the buffer is too small.
    fn try_grow_for(&mut self, additional: usize) -> Result<(), ArrayError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(ArrayError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        if required <= self.capacity() {
            return Ok(());
        }
        self.reallocate(grow_capacity(required, self.capacity()))
    }

    /// Open an uninitialised gap of `count` slots at `index <= len`.
    ///
    /// When the buffer is full the elements are moved straight into a new
    /// buffer with the gap already in place, so the tail is moved once.
    /// On return `len` is lowered to `index`; the caller fills the gap and
    /// then sets `len` to `old_len + count`.
    fn try_open_gap(&mut self, index: usize, count: usize) -> Result<(), ArrayError> {
        debug_assert!(index <= self.len);
        let len = self.len;
        let tail = len - index;
        let required = len.checked_add(count).ok_or(ArrayError::CapacityOverflow {
            requested: usize::MAX,
        })?;

        if required > self.capacity() {
            let new_capacity = grow_capacity(required, self.capacity());
            let mut fresh = RawBuffer::new();
            fresh.try_reallocate(new_capacity)?;
            let src = self.buf.as_ptr();
            let dst = fresh.as_mut_ptr();
            // SAFETY: `fresh` holds `len + count` slots; the prefix and tail
            // land in disjoint ranges around the gap. The old buffer is then
            // freed without dropping anything, since every element moved.
            unsafe {
                relocate_range(dst, src, index);
                relocate_range(dst.add(index + count), src.add(index), tail);
            }
            log::trace!(
                "array {}: capacity {} -> {new_capacity} with gap of {count} at {index}",
                self.id,
                self.capacity()
            );
            self.buf = fresh;
        } else {
            // SAFETY: `index..len` is live and `len + count <= capacity`.
            unsafe { shift_toward_back(self.buf.as_mut_ptr(), index, tail, count) };
        }
        self.len = index;
        Ok(())
    }

    // ── Insertion ──────────────────────────────────────────────

    /// Append `value`, growing if full. Returns the new last element.
    pub fn push(&mut self, value: T) -> &mut T {
        expect_ok::<T, _>(self.try_push(value))
    }

    /// Fallible form of [`push`](Self::push).
    pub fn try_push(&mut self, value: T) -> Result<&mut T, ArrayError> {
        self.try_grow_for(1)?;
        // SAFETY: capacity exceeds `len` after growing.
        Ok(unsafe { self.push_unchecked(value) })
    }

    /// Append `value` without checking capacity.
    ///
    /// # Safety
    ///
    /// `len() < capacity()` must hold.
    pub unsafe fn push_unchecked(&mut self, value: T) -> &mut T {
        debug_assert!(self.len < self.capacity());
        // SAFETY: the caller guarantees slot `len` is inside the buffer,
        // and it is uninitialised.
        unsafe {
            let slot = self.buf.as_mut_ptr().add(self.len);
            slot.write(value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Insert `value` at `index`, shifting later elements up by one.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        expect_ok::<T, _>(self.try_insert(index, value))
    }

    /// Fallible form of [`insert`](Self::insert).
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T, ArrayError> {
        let len = self.len;
        if index > len {
            return Err(ArrayError::OutOfRange { index, len });
        }
        if index == len {
            return self.try_push(value);
        }
        self.try_open_gap(index, 1)?;
        self.bump_generation();
        // SAFETY: slot `index` is the freshly opened gap; after writing it
        // every slot in `0..len + 1` is live.
        unsafe {
            let slot = self.buf.as_mut_ptr().add(index);
            slot.write(value);
            self.len = len + 1;
            Ok(&mut *slot)
        }
    }

    /// Insert clones of `items` starting at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_slice(&mut self, index: usize, items: &[T])
    where
        T: Clone,
    {
        expect_ok::<T, _>(self.try_insert_slice(index, items));
    }

    /// Fallible form of [`insert_slice`](Self::insert_slice).
    pub fn try_insert_slice(&mut self, index: usize, items: &[T]) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        self.insert_with(index, items.len(), |base, cursor| {
            // SAFETY: `insert_with` hands out exactly `items.len()` gap slots.
            unsafe { clone_construct_range(base, cursor, items) }
        })
    }

    /// Bitwise-copy `items` in at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_copy_slice(&mut self, index: usize, items: &[T])
    where
        T: Copy,
    {
        expect_ok::<T, _>(self.insert_with(index, items.len(), |base, cursor| {
            // SAFETY: `insert_with` hands out exactly `items.len()` gap slots.
            unsafe { copy_construct_range(base, items) };
            *cursor = items.len();
        }));
    }

    /// Insert every item of `iter` starting at `index`, in order.
    ///
    /// The items are staged first, so the tail is moved only once.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.len {
            panic!(
                "{}",
                ArrayError::OutOfRange {
                    index,
                    len: self.len
                }
            );
        }
        let mut staged: Array<T> = iter.into_iter().collect();
        let count = staged.len;
        expect_ok::<T, _>(self.insert_with(index, count, |base, cursor| {
            // SAFETY: the staged elements move into the gap and `staged`
            // forgets them.
            unsafe { relocate_range(base, staged.as_ptr(), count) };
            staged.len = 0;
            *cursor = count;
        }));
    }

    /// Open a gap of `count` at `index`, let `fill` construct into it, then
    /// publish the new length.
    ///
    /// `fill` receives the gap base and a counter it advances per slot.
    fn insert_with<F>(&mut self, index: usize, count: usize, fill: F) -> Result<(), ArrayError>
    where
        F: FnOnce(*mut T, &mut usize),
    {
        let len = self.len;
        if index > len {
            return Err(ArrayError::OutOfRange { index, len });
        }
        if count == 0 {
            return Ok(());
        }
        self.try_open_gap(index, count)?;
        if index < len {
            self.bump_generation();
        }
        let mut written = 0;
        // SAFETY: the gap `index..index + count` is uninitialised and inside
        // the buffer.
        fill(unsafe { self.buf.as_mut_ptr().add(index) }, &mut written);
        debug_assert_eq!(written, count);
        self.len = len + count;
        Ok(())
    }

    // ── Removal ────────────────────────────────────────────────

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.bump_generation();
        // SAFETY: slot `len` was live and is now outside the live range.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.len)) })
    }

    /// Drop the last `count` elements.
    ///
    /// # Panics
    ///
    /// Panics if `count > len`.
    pub fn pop_range(&mut self, count: usize) {
        expect_ok::<T, _>(self.try_pop_range(count));
    }

    /// Fallible form of [`pop_range`](Self::pop_range).
    pub fn try_pop_range(&mut self, count: usize) -> Result<(), ArrayError> {
        let start = self.len.checked_sub(count).ok_or(ArrayError::InvalidRange {
            start: 0,
            end: count,
            len: self.len,
        })?;
        self.truncate(start);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting later elements
    /// down by one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> T {
        expect_ok::<T, _>(self.try_remove_at(index))
    }

    /// Fallible form of [`remove_at`](Self::remove_at).
    pub fn try_remove_at(&mut self, index: usize) -> Result<T, ArrayError> {
        let len = self.len;
        if index >= len {
            return Err(ArrayError::OutOfRange { index, len });
        }
        let base = self.buf.as_mut_ptr();
        // SAFETY: `index` is live. Reading it leaves a hole that the tail
        // shift closes, so `0..len - 1` is live afterwards.
        let value = unsafe {
            let value = ptr::read(base.add(index));
            shift_toward_front(base, index + 1, len - index - 1, 1);
            value
        };
        self.len = len - 1;
        self.bump_generation();
        Ok(value)
    }

    /// Drop `count` elements starting at `index`, shifting the remainder
    /// down over them.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past `len`.
    pub fn remove_range_at(&mut self, index: usize, count: usize) {
        expect_ok::<T, _>(self.try_remove_range_at(index, count));
    }

    /// Fallible form of [`remove_range_at`](Self::remove_range_at).
    pub fn try_remove_range_at(&mut self, index: usize, count: usize) -> Result<(), ArrayError> {
        let end = self.check_range(index, count)?;
        if count == 0 {
            return Ok(());
        }
        let len = self.len;
        let tail = len - end;
        self.len = index;
        let base = self.buf.as_mut_ptr();
        // SAFETY: `index..end` is live and dropped exactly once; the tail
        // `end..len` then moves down into the vacated slots.
        unsafe {
            destruct_range(base.add(index), count);
            shift_toward_front(base, end, tail, count);
        }
        self.len = len - count;
        self.bump_generation();
        Ok(())
    }

    /// Drop every element at or past `new_len`. No-op when `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        self.len = new_len;
        self.bump_generation();
        // SAFETY: `new_len..new_len + tail` was live and is now outside the
        // live range, so it is dropped exactly once.
        unsafe { destruct_range(self.buf.as_mut_ptr().add(new_len), tail) };
    }

    /// Drop every element, keeping the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
        self.bump_generation();
    }

    /// Drop every element and free the buffer.
    pub fn empty(&mut self) {
        self.clear();
        self.buf.release();
    }

    // ── Resizing ───────────────────────────────────────────────

    /// Grow with default values or shrink to exactly `new_len` elements.
    ///
    /// Growing past the capacity reallocates to exactly `new_len`.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        expect_ok::<T, _>(self.try_resize(new_len));
    }

    /// Fallible form of [`resize`](Self::resize).
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.capacity() {
            self.reallocate(new_len)?;
        }
        let base = self.buf.as_mut_ptr();
        let count = new_len - self.len;
        // SAFETY: `len..new_len` is uninitialised and inside the buffer.
        unsafe { default_construct_range(base, &mut self.len, count) };
        Ok(())
    }

    /// Grow with clones of `value` or shrink to exactly `new_len` elements.
    pub fn resize_with_value(&mut self, new_len: usize, value: &T)
    where
        T: Clone,
    {
        expect_ok::<T, _>(self.try_resize_with_value(new_len, value));
    }

    /// Fallible form of [`resize_with_value`](Self::resize_with_value).
    pub fn try_resize_with_value(&mut self, new_len: usize, value: &T) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.capacity() {
            self.reallocate(new_len)?;
        }
        let base = self.buf.as_mut_ptr();
        let count = new_len - self.len;
        // SAFETY: `len..new_len` is uninitialised and inside the buffer.
        unsafe { fill_construct(base, &mut self.len, count, value) };
        Ok(())
    }

    // ── Whole-array operations ─────────────────────────────────

    /// Exchange contents with `other` in O(1). No element is moved, cloned
    /// or dropped; ids and generations travel with the buffers.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Take the contents, leaving an empty array behind.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Assign a clone of `value` to every live element.
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        for slot in self.as_mut_slice() {
            slot.clone_from(value);
        }
    }

    /// Append clones of `items`.
    pub fn append_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        expect_ok::<T, _>(self.try_append_slice(items));
    }

    /// Fallible form of [`append_slice`](Self::append_slice).
    pub fn try_append_slice(&mut self, items: &[T]) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        self.try_grow_for(items.len())?;
        let base = self.buf.as_mut_ptr();
        // SAFETY: capacity covers `len + items.len()` and `items` cannot
        // alias `self` while `self` is mutably borrowed.
        unsafe { clone_construct_range(base, &mut self.len, items) };
        Ok(())
    }

    /// Append a bitwise copy of `items`.
    pub fn append_copy_slice(&mut self, items: &[T])
    where
        T: Copy,
    {
        expect_ok::<T, _>(self.try_grow_for(items.len()));
        // SAFETY: capacity covers `len + items.len()`.
        unsafe { copy_construct_range(self.buf.as_mut_ptr().add(self.len), items) };
        self.len += items.len();
    }

    /// Move every element of `other` onto the end of `self`, leaving
    /// `other` empty with its buffer intact.
    pub fn append(&mut self, other: &mut Self) {
        let count = other.len;
        expect_ok::<T, _>(self.try_grow_for(count));
        // SAFETY: capacity covers `len + count`; the two arrays own
        // distinct buffers. `other` forgets the moved elements.
        unsafe { relocate_range(self.buf.as_mut_ptr().add(self.len), other.as_ptr(), count) };
        other.len = 0;
        other.bump_generation();
        self.len += count;
    }

    /// Replace the contents with clones of `items`.
    pub fn assign_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.clear();
        if items.len() > self.capacity() {
            self.reserve(items.len());
        }
        self.append_slice(items);
    }

    /// Replace the contents with `count` default values.
    pub fn reset_with_len(&mut self, count: usize)
    where
        T: Default,
    {
        self.clear();
        self.resize(count);
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn reset_with_value(&mut self, count: usize, value: &T)
    where
        T: Clone,
    {
        self.clear();
        self.resize_with_value(count, value);
    }

    // ── Searching ──────────────────────────────────────────────

    /// Index of the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_by(|item| item == value)
    }

    /// Index of the first element matching `predicate`.
    pub fn find_by<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(predicate)
    }

    /// Whether any element matches `predicate`.
    pub fn contains_by<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Remove and return the first element equal to `value`.
    pub fn remove_first(&mut self, value: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let index = self.find(value)?;
        Some(self.remove_at(index))
    }

    /// Remove every element equal to `value`. Returns how many were removed.
    pub fn remove_all_of(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let before = self.len;
        self.retain(|item| item != value);
        before - self.len
    }

    /// Keep only the elements for which `keep` returns `true`, preserving
    /// their order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let original_len = self.len;
        // A panic in `keep` or in a destructor leaks the remainder.
        self.len = 0;
        let base = self.buf.as_mut_ptr();
        let mut kept = 0;
        for read in 0..original_len {
            // SAFETY: `read` is live and not yet visited; `kept <= read`, and
            // every slot below `kept` already holds a kept element.
            unsafe {
                let current = base.add(read);
                if keep(&*current) {
                    if read != kept {
                        ptr::copy_nonoverlapping(current, base.add(kept), 1);
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(current);
                }
            }
        }
        self.len = kept;
        if kept != original_len {
            self.bump_generation();
        }
    }

    // ── Conversion ─────────────────────────────────────────────

    /// Shrink to fit and hand the buffer over as a boxed slice.
    pub fn into_boxed_slice(mut self) -> Box<[T]> {
        self.shrink_to_fit();
        let mut this = ManuallyDrop::new(self);
        let len = this.len;
        if !this.buf.is_allocated() {
            return Box::default();
        }
        let data = this.buf.as_mut_ptr();
        // SAFETY: after `shrink_to_fit` the allocation was made by the
        // global allocator with `Layout::array::<T>(len)`, which is exactly
        // the layout `Box<[T]>` frees with. `this` is never dropped, so the
        // buffer has a single owner.
        unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)) }
    }

    /// Convert into a `Vec` without cloning.
    pub fn into_vec(self) -> Vec<T> {
        self.into_boxed_slice().into_vec()
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: `0..len` is live; the buffer itself is freed by `RawBuffer`.
        unsafe { destruct_range(self.buf.as_mut_ptr(), len) };
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self)
    }

    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);
        let common = self.len;
        self.as_mut_slice().clone_from_slice(&source[..common]);
        self.append_slice(&source[common..]);
        self.bump_generation();
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Array<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for Array<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for Array<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for Array<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for Array<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, U> PartialEq<Array<U>> for Array<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Array<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for Array<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for Array<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for Array<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<Vec<U>> for Array<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Array<T> {}

impl<T: PartialOrd> PartialOrd for Array<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Array<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for Array<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        expect_ok::<T, _>(self.try_grow_for(lower));
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Array<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        Extend::<T>::extend(self, iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(items: [T; N]) -> Self {
        let items = ManuallyDrop::new(items);
        let mut array = Self::with_capacity(N);
        // SAFETY: `N` uninitialised slots; the source array is never
        // dropped, so each element ends up with exactly one owner.
        unsafe { relocate_range(array.buf.as_mut_ptr(), items.as_ptr(), N) };
        array.len = N;
        array
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items)
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(mut items: Vec<T>) -> Self {
        let count = items.len();
        let mut array = Self::with_capacity(count);
        // SAFETY: `count` uninitialised slots; the vector forgets the moved
        // elements before it is dropped.
        unsafe {
            relocate_range(array.buf.as_mut_ptr(), items.as_ptr(), count);
            items.set_len(0);
        }
        array.len = count;
        array
    }
}

impl<T> From<Array<T>> for Vec<T> {
    fn from(array: Array<T>) -> Self {
        array.into_vec()
    }
}

impl<T> From<Array<T>> for Box<[T]> {
    fn from(array: Array<T>) -> Self {
        array.into_boxed_slice()
    }
}
