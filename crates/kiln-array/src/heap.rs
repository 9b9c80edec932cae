//! In-place binary max-heap over the live elements.
//!
//! Node `i` has parent `(i - 1) / 2` and children `2i + 1`, `2i + 2`. The
//! `_by` variants take a comparator; the plain forms order by [`Ord`].
//! Reordering leaves the array's generation alone; only `heap_pop`, which
//! destroys a slot, advances it.

use std::cmp::Ordering;

use crate::array::Array;

impl<T> Array<T> {
    /// Rearrange the elements into a max-heap. O(n).
    pub fn heapify(&mut self)
    where
        T: Ord,
    {
        self.heapify_by(T::cmp);
    }

    /// Rearrange the elements into a heap under `compare`.
    pub fn heapify_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = self.len();
        let data = self.as_mut_slice();
        for root in (0..len / 2).rev() {
            sift_down(data, root, len, &mut compare);
        }
    }

    /// The greatest element of a heap.
    pub fn heap_top(&self) -> Option<&T> {
        self.first()
    }

    /// Push `value` onto a max-heap. O(log n).
    pub fn heap_push(&mut self, value: T)
    where
        T: Ord,
    {
        self.heap_push_by(value, T::cmp);
    }

    /// Push `value` onto a heap ordered by `compare`.
    pub fn heap_push_by<F>(&mut self, value: T, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.push(value);
        let last = self.len() - 1;
        sift_up(self.as_mut_slice(), last, &mut compare);
    }

    /// Remove and return the greatest element of a max-heap. O(log n).
    pub fn heap_pop(&mut self) -> Option<T>
    where
        T: Ord,
    {
        self.heap_pop_by(T::cmp)
    }

    /// Remove and return the top of a heap ordered by `compare`.
    pub fn heap_pop_by<F>(&mut self, mut compare: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let last = self.last_index()?;
        self.as_mut_slice().swap(0, last);
        let top = self.pop();
        let len = self.len();
        sift_down(self.as_mut_slice(), 0, len, &mut compare);
        top
    }

    /// Sort ascending in place with heap sort. O(n log n).
    pub fn heap_sort(&mut self)
    where
        T: Ord,
    {
        self.heap_sort_by(T::cmp);
    }

    /// Sort in place so that `compare` is non-decreasing along the array.
    pub fn heap_sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.heapify_by(&mut compare);
        let data = self.as_mut_slice();
        for end in (1..data.len()).rev() {
            data.swap(0, end);
            sift_down(data, 0, end, &mut compare);
        }
    }

    /// Whether the elements satisfy the max-heap property.
    pub fn is_heap(&self) -> bool
    where
        T: Ord,
    {
        self.is_heap_by(T::cmp)
    }

    /// Whether the elements satisfy the heap property under `compare`.
    pub fn is_heap_by<F>(&self, mut compare: F) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let data = self.as_slice();
        (1..data.len())
            .all(|child| compare(&data[(child - 1) / 2], &data[child]) != Ordering::Less)
    }
}

/// Restore heap order below `root`, considering only `data[..end]`.
fn sift_down<T, F>(data: &mut [T], mut root: usize, end: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * root + 1;
        if left >= end {
            break;
        }
        let right = left + 1;
        let mut child = left;
        if right < end && compare(&data[left], &data[right]) == Ordering::Less {
            child = right;
        }
        if compare(&data[root], &data[child]) != Ordering::Less {
            break;
        }
        data.swap(root, child);
        root = child;
    }
}

/// Move `data[index]` up until its parent is not smaller.
fn sift_up<T, F>(data: &mut [T], mut index: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while index > 0 {
        let parent = (index - 1) / 2;
        if compare(&data[parent], &data[index]) != Ordering::Less {
            break;
        }
        data.swap(parent, index);
        index = parent;
    }
}

#[cfg(test)]
mod tests {
    use crate::Array;

    #[test]
    fn heapify_establishes_max_heap() {
        let mut array = Array::from_slice(&[1, 3, 5, 4, 6, 13, 10, 9, 8, 15, 17]);
        assert!(!array.is_heap());
        array.heapify();
        assert!(array.is_heap());
        assert_eq!(array.heap_top(), Some(&17));
    }

    #[test]
    fn push_and_pop_keep_the_heap() {
        let mut array = Array::new();
        for value in [5, 1, 9, 3, 7] {
            array.heap_push(value);
            assert!(array.is_heap());
        }
        let mut popped = Vec::new();
        while let Some(value) = array.heap_pop() {
            popped.push(value);
            assert!(array.is_heap());
        }
        assert_eq!(popped, vec![9, 7, 5, 3, 1]);
    }

    #[test]
    fn comparator_builds_a_min_heap() {
        let mut array = Array::from_slice(&[4, 2, 8, 6]);
        array.heapify_by(|a, b| b.cmp(a));
        assert_eq!(array.heap_top(), Some(&2));
        array.heap_push_by(1, |a, b| b.cmp(a));
        assert_eq!(array.heap_pop_by(|a, b| b.cmp(a)), Some(1));
        assert_eq!(array.heap_pop_by(|a, b| b.cmp(a)), Some(2));
        assert!(array.is_heap_by(|a, b| b.cmp(a)));
    }

    #[test]
    fn heap_sort_orders_strings() {
        let mut array = Array::from_slice(&["pear", "apple", "fig", "kiwi", "date"]);
        array.heap_sort();
        assert_eq!(array, ["apple", "date", "fig", "kiwi", "pear"]);
        array.heap_sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        assert_eq!(array, ["apple", "date", "kiwi", "pear", "fig"]);
    }

    #[test]
    fn tiny_inputs() {
        let mut empty = Array::<i32>::new();
        empty.heapify();
        empty.heap_sort();
        assert_eq!(empty.heap_pop(), None);
        assert!(empty.is_heap());

        let mut one = Array::from_slice(&[42]);
        one.heap_sort();
        assert_eq!(one.heap_pop(), Some(42));

        let mut two = Array::from_slice(&[2, 1]);
        two.heap_sort();
        assert_eq!(two, [1, 2]);
    }

    #[test]
    fn only_heap_pop_advances_generation() {
        let mut array = Array::from_slice(&[3, 1, 2]);
        let generation = array.generation();
        array.heapify();
        array.heap_push(5);
        array.heap_sort();
        assert_eq!(array.generation(), generation);
        array.heap_pop();
        assert_ne!(array.generation(), generation);
    }
}
