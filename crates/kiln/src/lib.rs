//! Kiln: explicit-storage dynamic arrays, in-place heaps, and bump arenas.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Kiln sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use kiln::prelude::*;
//!
//! let mut scores: Array<u32> = array![40, 10, 30];
//! scores.push(20);
//!
//! // Drop every score below 25 while scanning with a cursor.
//! let mut cursor = scores.begin();
//! while cursor != scores.end() {
//!     if *scores.get_at(cursor).unwrap() < 25 {
//!         cursor = scores.erase_at(cursor).unwrap();
//!     } else {
//!         cursor.inc();
//!     }
//! }
//! assert_eq!(scores, [40, 30]);
//!
//! scores.heap_sort();
//! assert_eq!(scores, [30, 40]);
//!
//! // Per-frame scratch memory.
//! let mut frame = LinearAllocator::new(ArenaConfig::default()).unwrap();
//! let copy = frame.alloc_copy_slice(scores.as_slice()).unwrap();
//! assert_eq!(copy, &[30, 40]);
//! frame.reset();
//! assert_eq!(frame.bytes_used(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kiln-core` | Array ids, generations, error types |
//! | [`array`] | `kiln-array` | `Array<T>`, iterators, cursors, heap algorithms |
//! | [`arena`] | `kiln-arena` | `MemoryArena`, `LinearAllocator`, arena config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identity, generation, and error types shared by the containers (`kiln-core`).
pub use kiln_core as types;

/// The growable array and everything built on its storage (`kiln-array`).
///
/// [`array::Array`] plus its iterators, [`array::Cursor`] and
/// [`array::ReverseCursor`].
pub use kiln_array as array;

/// Bump allocation (`kiln-arena`).
///
/// [`arena::MemoryArena`] is a single block; [`arena::LinearAllocator`]
/// chains blocks and consolidates them on reset.
pub use kiln_arena as arena;

pub use kiln_array::array;

/// Common imports for typical Kiln usage.
///
/// ```rust
/// use kiln::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use kiln_array::{array, Array, Cursor, ReverseCursor};

    // Errors
    pub use kiln_core::{ArrayError, ErrorKind};

    // Arenas
    pub use kiln_arena::{ArenaConfig, ArenaError, ArenaMarker, LinearAllocator, MemoryArena};
}
