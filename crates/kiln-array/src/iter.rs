//! Borrowing and owning iterators over an [`Array`].
//!
//! [`Iter`] and [`IterMut`] are a base pointer plus a remaining count. They
//! borrow the array, so the borrow checker rules out the invalidation
//! hazards a raw pointer iterator would have. Reverse iteration is
//! [`DoubleEndedIterator`]; [`Array::iter_rev`] is a shorthand for
//! `iter().rev()`.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::{FusedIterator, Rev};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::slice;

use crate::array::Array;
use crate::lifecycle::destruct_range;
use crate::raw::RawBuffer;

/// Immutable iterator over the elements of an [`Array`].
pub struct Iter<'a, T> {
    ptr: NonNull<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

// SAFETY: `Iter` behaves like `&'a [T]`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<'a, T> Iter<'a, T> {
    fn new(items: &'a [T]) -> Self {
        Self {
            ptr: NonNull::from(items).cast(),
            remaining: items.len(),
            _marker: PhantomData,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &'a [T] {
        // SAFETY: `ptr..ptr + remaining` is a live sub-range of the borrowed
        // array.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.remaining) }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `remaining > 0`, so `ptr` is a live element and `ptr + 1`
        // is at most one past the end.
        unsafe {
            let item = &*self.ptr.as_ptr();
            self.ptr = self.ptr.add(1);
            self.remaining -= 1;
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        let skip = n.min(self.remaining);
        // SAFETY: `skip <= remaining` keeps the pointer within one past the end.
        self.ptr = unsafe { self.ptr.add(skip) };
        self.remaining -= skip;
        self.next()
    }

    fn count(self) -> usize {
        self.remaining
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: `ptr + remaining` is the last live element not yet yielded.
        Some(unsafe { &*self.ptr.as_ptr().add(self.remaining) })
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a T> {
        self.remaining -= n.min(self.remaining);
        self.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

/// Mutable iterator over the elements of an [`Array`].
pub struct IterMut<'a, T> {
    ptr: NonNull<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

// SAFETY: `IterMut` behaves like `&'a mut [T]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    fn new(items: &'a mut [T]) -> Self {
        let remaining = items.len();
        Self {
            ptr: NonNull::from(items).cast(),
            remaining,
            _marker: PhantomData,
        }
    }

    /// The elements not yet yielded, consuming the iterator.
    pub fn into_slice(self) -> &'a mut [T] {
        // SAFETY: the unyielded range is exclusively borrowed by `self`.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.remaining) }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the unyielded range is live and borrowed through `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.remaining) }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: as for `Iter`; each element is yielded at most once, so
        // the mutable references never alias.
        unsafe {
            let item = &mut *self.ptr.as_ptr();
            self.ptr = self.ptr.add(1);
            self.remaining -= 1;
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn nth(&mut self, n: usize) -> Option<&'a mut T> {
        let skip = n.min(self.remaining);
        // SAFETY: `skip <= remaining`.
        self.ptr = unsafe { self.ptr.add(skip) };
        self.remaining -= skip;
        self.next()
    }

    fn count(self) -> usize {
        self.remaining
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: the last unyielded element; never handed out again.
        Some(unsafe { &mut *self.ptr.as_ptr().add(self.remaining) })
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a mut T> {
        self.remaining -= n.min(self.remaining);
        self.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.as_slice()).finish()
    }
}

/// Owning iterator returned by `Array::into_iter`.
///
/// Elements not consumed are dropped with the iterator.
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `start..end` is live.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }

    /// The elements not yet yielded, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `start..end` is live and uniquely owned.
        unsafe {
            slice::from_raw_parts_mut(self.buf.as_mut_ptr().add(self.start), self.end - self.start)
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start` is live and leaves the live range before it is read.
        let item = unsafe { ptr::read(self.buf.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: `end` was live and has just left the live range.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        let first = self.start;
        self.start = self.end;
        // SAFETY: `first..first + remaining` was live and is now forgotten.
        unsafe { destruct_range(self.buf.as_mut_ptr().add(first), remaining) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Array<T> {
    /// Iterate over the elements front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    /// Iterate mutably over the elements front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.as_mut_slice())
    }

    /// Iterate over the elements back to front.
    pub fn iter_rev(&self) -> Rev<Iter<'_, T>> {
        self.iter().rev()
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        IntoIter {
            buf: mem::replace(&mut this.buf, RawBuffer::new()),
            start: 0,
            end: this.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Array<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
