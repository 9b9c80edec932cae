//! Benchmark workloads for the Kiln containers.
//!
//! - [`random_values`]: seeded integer inputs for sort and heap benches
//! - [`filled_array`]: a pre-populated [`Array`] of a given length

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kiln_array::Array;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `count` pseudo-random values, reproducible for a given `seed`.
pub fn random_values(count: usize, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.next_u32()).collect()
}

/// An array holding `0..len`, with no spare capacity.
pub fn filled_array(len: usize) -> Array<u64> {
    (0..len as u64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_values_are_reproducible() {
        assert_eq!(random_values(64, 9), random_values(64, 9));
        assert_ne!(random_values(64, 9), random_values(64, 10));
    }

    #[test]
    fn filled_array_is_tight() {
        let array = filled_array(100);
        assert_eq!(array.len(), 100);
        assert_eq!(array.capacity(), 100);
        assert_eq!(array[99], 99);
    }
}
