//! Element construction, destruction, and relocation over raw slots.
//!
//! The cheapest valid strategy is picked per element type at compile time:
//!
//! - Destruction is skipped entirely when `T` has no drop glue
//!   (`mem::needs_drop`), otherwise `drop_in_place` runs over the range.
//! - Relocation is always a bulk bitwise copy. Rust values carry no move
//!   constructors, so every element type takes the bulk path.
//! - Copy-construction is a bulk `memcpy` for `T: Copy` and a per-element
//!   `clone()` otherwise.
//!
//! Constructors that can panic (`clone`, `default`) advance a caller-owned
//! counter after each slot, so an unwinding caller knows exactly how many
//! slots are live.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

/// Drop `count` live elements starting at `first`.
///
/// # Safety
///
/// `first..first + count` must be live, and must not be used again
/// until re-initialised.
pub(crate) unsafe fn destruct_range<T>(first: *mut T, count: usize) {
    if mem::needs_drop::<T>() && count > 0 {
        // SAFETY: the caller guarantees the range is live.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, count)) };
    }
}

/// Move `count` elements from `src` into uninitialised slots at `dst`.
///
/// The source slots are logically uninitialised afterwards.
///
/// # Safety
///
/// Both ranges must be valid for `count` elements and must not overlap.
pub(crate) unsafe fn relocate_range<T>(dst: *mut T, src: *const T, count: usize) {
    // SAFETY: forwarded from the caller.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) };
}

/// Bulk-copy `src` into uninitialised slots at `dst`.
///
/// # Safety
///
/// `dst` must be valid for `src.len()` writes and must not overlap `src`.
pub(crate) unsafe fn copy_construct_range<T: Copy>(dst: *mut T, src: &[T]) {
    // SAFETY: forwarded from the caller; `T: Copy` makes a bitwise copy a
    // valid duplicate.
    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len()) };
}

/// Clone each element of `src` into the slots at `base + *cursor ..`,
/// advancing `*cursor` after each slot is written.
///
/// # Safety
///
/// Slots `base + *cursor .. base + *cursor + src.len()` must be
/// uninitialised, writable, and disjoint from `src`.
pub(crate) unsafe fn clone_construct_range<T: Clone>(base: *mut T, cursor: &mut usize, src: &[T]) {
    for item in src {
        let value = item.clone();
        // SAFETY: the slot is inside the range the caller vouched for.
        unsafe { base.add(*cursor).write(value) };
        *cursor += 1;
    }
}

/// Construct `count` clones of `value` at `base + *cursor ..`.
///
/// # Safety
///
/// Slots `base + *cursor .. base + *cursor + count` must be uninitialised
/// and writable.
pub(crate) unsafe fn fill_construct<T: Clone>(
    base: *mut T,
    cursor: &mut usize,
    count: usize,
    value: &T,
) {
    for _ in 0..count {
        let item = value.clone();
        // SAFETY: the slot is inside the range the caller vouched for.
        unsafe { base.add(*cursor).write(item) };
        *cursor += 1;
    }
}

/// Construct `count` default values at `base + *cursor ..`.
///
/// # Safety
///
/// Same contract as [`fill_construct`].
pub(crate) unsafe fn default_construct_range<T: Default>(base: *mut T, cursor: &mut usize, count: usize) {
    for _ in 0..count {
        let item = T::default();
        // SAFETY: the slot is inside the range the caller vouched for.
        unsafe { base.add(*cursor).write(item) };
        *cursor += 1;
    }
}

/// Shift `count` elements starting at `from` toward higher indices by `by`
/// slots, opening a gap at `from..from + by`.
///
/// Overlapping ranges are handled: the copy behaves as if the tail were
/// moved last-element-first.
///
/// # Safety
///
/// `from..from + count` must be live and `from + by + count` must not
/// exceed the allocation. The gap is uninitialised afterwards.
pub(crate) unsafe fn shift_toward_back<T>(base: *mut T, from: usize, count: usize, by: usize) {
    if count == 0 || by == 0 {
        return;
    }
    // SAFETY: both ranges lie inside the allocation; `ptr::copy` is
    // memmove and tolerates the overlap.
    unsafe { ptr::copy(base.add(from), base.add(from + by), count) };
}

/// Shift `count` elements starting at `from` toward lower indices by `by`
/// slots, closing a gap at `from - by..from`.
///
/// # Safety
///
/// `from..from + count` must be live, `by <= from`, and the destination
/// gap must hold no live elements. The vacated tail is uninitialised
/// afterwards.
pub(crate) unsafe fn shift_toward_front<T>(base: *mut T, from: usize, count: usize, by: usize) {
    if count == 0 || by == 0 {
        return;
    }
    // SAFETY: both ranges lie inside the allocation; `ptr::copy` is
    // memmove and tolerates the overlap.
    unsafe { ptr::copy(base.add(from), base.add(from - by), count) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;

    use kiln_test_utils::{LifecycleCounts, Tracked};

    fn slots<T, const N: usize>() -> [MaybeUninit<T>; N] {
        std::array::from_fn(|_| MaybeUninit::uninit())
    }

    #[test]
    fn forward_shift_moves_tail_last_first() {
        let mut data = [1, 2, 3, 4, 0, 0];
        // SAFETY: 1..4 is initialised and 1 + 2 + 3 == 6 fits.
        unsafe { shift_toward_back(data.as_mut_ptr(), 1, 3, 2) };
        assert_eq!(&data[3..], &[2, 3, 4]);
        assert_eq!(data[0], 1);
    }

    #[test]
    fn backward_shift_closes_gap() {
        let mut data = [1, 9, 9, 2, 3, 4];
        // SAFETY: 3..6 is initialised and 3 - 2 >= 0.
        unsafe { shift_toward_front(data.as_mut_ptr(), 3, 3, 2) };
        assert_eq!(&data[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn clone_construct_advances_cursor_per_slot() {
        let src = vec![String::from("a"), String::from("b"), String::from("c")];
        let mut dst = slots::<String, 3>();
        let mut cursor = 0;
        // SAFETY: three uninitialised slots, disjoint from `src`.
        unsafe { clone_construct_range(dst.as_mut_ptr().cast::<String>(), &mut cursor, &src) };
        assert_eq!(cursor, 3);
        // SAFETY: all three slots were written.
        let out: Vec<String> = dst.into_iter().map(|s| unsafe { s.assume_init() }).collect();
        assert_eq!(out, src);
    }

    #[test]
    fn destruct_runs_each_drop_once() {
        let counts = LifecycleCounts::new();
        let mut dst = slots::<Tracked, 4>();
        let mut cursor = 0;
        let proto = Tracked::new(7, &counts);
        // SAFETY: four uninitialised slots.
        unsafe { fill_construct(dst.as_mut_ptr().cast::<Tracked>(), &mut cursor, 4, &proto) };
        assert_eq!(counts.clones(), 4);

        // SAFETY: the four slots are live and not used again.
        unsafe { destruct_range(dst.as_mut_ptr().cast::<Tracked>(), 4) };
        assert_eq!(counts.drops(), 4);
        drop(proto);
        assert_eq!(counts.live(), 0);
    }

    #[test]
    fn trivially_destructible_types_skip_drop() {
        let mut data = [1u8, 2, 3];
        // SAFETY: `u8` has no drop glue; the values stay readable.
        unsafe { destruct_range(data.as_mut_ptr(), 3) };
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn copy_construct_is_bitwise() {
        let src = [1.5f32, 2.5, 3.5];
        let mut dst = [0.0f32; 3];
        // SAFETY: `dst` has three slots and does not alias `src`.
        unsafe { copy_construct_range(dst.as_mut_ptr(), &src) };
        assert_eq!(dst, src);
    }

    #[test]
    fn default_construct_fills_from_cursor() {
        let mut dst = slots::<Vec<u8>, 3>();
        let mut cursor = 1;
        // SAFETY: slots 1 and 2 are uninitialised.
        unsafe { default_construct_range(dst.as_mut_ptr().cast::<Vec<u8>>(), &mut cursor, 2) };
        assert_eq!(cursor, 3);
        // SAFETY: slots 1 and 2 were written and are dropped once here.
        unsafe {
            assert!(dst[1].assume_init_ref().is_empty());
            dst[1].assume_init_drop();
            dst[2].assume_init_drop();
        }
    }
}
