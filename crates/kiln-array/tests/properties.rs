//! Property tests: container invariants under arbitrary operation sequences.

use kiln_array::Array;
use proptest::prelude::*;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Remove(usize),
    RemoveRange(usize, usize),
    Resize(usize),
    Reserve(usize),
    ShrinkToFit,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => (any::<usize>(), 0usize..4).prop_map(|(i, n)| Op::RemoveRange(i, n)),
        1 => (0usize..40).prop_map(Op::Resize),
        1 => (0usize..40).prop_map(Op::Reserve),
        1 => Just(Op::ShrinkToFit),
    ]
}

/// Apply `op` to both the array and a `Vec` model.
fn apply(array: &mut Array<i32>, model: &mut Vec<i32>, op: &Op) {
    match *op {
        Op::Push(v) => {
            array.push(v);
            model.push(v);
        }
        Op::Pop => {
            assert_eq!(array.pop(), model.pop());
        }
        Op::Insert(i, v) => {
            let index = i % (model.len() + 1);
            array.insert(index, v);
            model.insert(index, v);
        }
        Op::Remove(i) => {
            if !model.is_empty() {
                let index = i % model.len();
                assert_eq!(array.remove_at(index), model.remove(index));
            }
        }
        Op::RemoveRange(i, n) => {
            if !model.is_empty() {
                let index = i % model.len();
                let count = n.min(model.len() - index);
                array.remove_range_at(index, count);
                model.drain(index..index + count);
            }
        }
        Op::Resize(n) => {
            array.resize(n);
            model.resize(n, 0);
        }
        Op::Reserve(n) => {
            array.reserve(n);
            model.truncate(n);
            assert_eq!(array.capacity(), n);
        }
        Op::ShrinkToFit => {
            array.shrink_to_fit();
            assert_eq!(array.capacity(), array.len());
        }
    }
}

proptest! {
    #[test]
    fn matches_vec_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut array = Array::new();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut array, &mut model, op);
            prop_assert!(array.capacity() >= array.len());
            prop_assert_eq!(array.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn size_is_pushes_minus_pops(pushes in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mut array = Array::new();
        let mut expected = 0usize;
        for push in pushes {
            if push {
                array.push(expected);
                expected += 1;
            } else if array.pop().is_some() {
                expected -= 1;
            }
            prop_assert_eq!(array.len(), expected);
            prop_assert!(array.capacity() >= array.len());
        }
    }

    #[test]
    fn forward_and_reverse_round_trip(values in proptest::collection::vec(any::<u16>(), 0..100)) {
        let array: Array<u16> = values.iter().copied().collect();
        let forward: Vec<u16> = array.iter().copied().collect();
        let mut reverse: Vec<u16> = array.iter_rev().copied().collect();
        prop_assert_eq!(&forward, &values);
        reverse.reverse();
        prop_assert_eq!(&reverse, &values);
    }

    #[test]
    fn shrink_to_fit_is_idempotent(len in 0usize..50, extra in 0usize..50) {
        let mut array = Array::<i32>::with_capacity(len + extra);
        array.resize(len);
        array.shrink_to_fit();
        let once = array.capacity();
        array.shrink_to_fit();
        prop_assert_eq!(once, len);
        prop_assert_eq!(array.capacity(), once);
    }

    #[test]
    fn heap_pop_drains_in_descending_order(values in proptest::collection::vec(any::<i64>(), 0..200)) {
        let mut heap: Array<i64> = values.iter().copied().collect();
        heap.heapify();
        prop_assert!(heap.is_heap());
        let mut drained = Vec::with_capacity(values.len());
        while let Some(top) = heap.heap_pop() {
            drained.push(top);
        }
        let mut expected = values.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn insert_slice_lands_at_requested_index(
        base in proptest::collection::vec(any::<i8>(), 0..30),
        items in proptest::collection::vec(any::<i8>(), 0..10),
        at in any::<usize>(),
    ) {
        let index = at % (base.len() + 1);
        let mut array = Array::from_copy_slice(&base);
        array.shrink_to_fit();
        array.insert_slice(index, &items);

        let mut expected = base.clone();
        expected.splice(index..index, items.iter().copied());
        prop_assert_eq!(array.as_slice(), expected.as_slice());
    }
}

#[test]
fn heap_sort_matches_reference_sort_on_random_input() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x6b69_6c6e);
    for size in [0usize, 1, 2, 3, 17, 1000, 4096] {
        let values: Vec<u32> = (0..size).map(|_| rng.next_u32() % 1000).collect();

        let mut array = Array::from_copy_slice(&values);
        array.heap_sort();

        let mut reference = values.clone();
        reference.sort();
        assert_eq!(array, reference, "size {size}");
    }
}

#[test]
fn heap_sort_by_matches_reference_sort_descending() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let values: Vec<u64> = (0..1500).map(|_| rng.next_u64()).collect();

    let mut array = Array::from_copy_slice(&values);
    array.heap_sort_by(|a, b| b.cmp(a));

    let mut reference = values;
    reference.sort_by(|a, b| b.cmp(a));
    assert_eq!(array, reference);
}
