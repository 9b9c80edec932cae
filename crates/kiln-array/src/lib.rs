//! Growable contiguous array with explicit storage and in-place heaps.
//!
//! [`Array<T>`] owns a raw buffer of `capacity` slots of which the first
//! `len` hold live elements. On top of that storage it offers the usual
//! push/insert/remove/resize family, bounds-checked and cursor-based
//! access, and binary-heap algorithms that run over the same buffer.
//!
//! # Architecture
//!
//! ```text
//! Array<T>
//! ├── RawBuffer<T>   (raw.rs: alloc / realloc / free, ZST-aware)
//! ├── lifecycle      (construct / clone / drop / overlap-aware shifts)
//! ├── Iter, IterMut, IntoIter   (borrowing and owning iteration)
//! ├── Cursor, ReverseCursor     (positional access stamped with id + generation)
//! └── heap           (heapify / push / pop / sort, max-heap by default)
//! ```
//!
//! # Failure model
//!
//! Each fallible operation has a panicking form and a `try_*` form that
//! returns [`ArrayError`]. Allocation failure in a panicking form goes to
//! [`std::alloc::handle_alloc_error`].
//!
//! # Unsafe code
//!
//! `unsafe` is confined to `raw`, `lifecycle`, `array` and `iter`, and
//! every block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

mod array;
pub mod cursor;
mod heap;
pub mod iter;
mod lifecycle;
mod raw;

pub use array::{grow_capacity, Array};
pub use cursor::{Cursor, ReverseCursor};
pub use iter::{IntoIter, Iter, IterMut};
pub use kiln_core::{ArrayError, ArrayId, ErrorKind, Generation};

/// Build an [`Array`] from a list of elements or a repeated value.
///
/// ```
/// use kiln_array::{array, Array};
///
/// let empty: Array<u8> = array![];
/// let listed = array![1, 2, 3];
/// let repeated = array!["x".to_string(); 2];
///
/// assert!(empty.is_empty());
/// assert_eq!(listed, [1, 2, 3]);
/// assert_eq!(repeated, ["x", "x"]);
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::Array::new()
    };
    ($elem:expr; $count:expr) => {
        $crate::Array::from_elem($count, &$elem)
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Array::from([$($item),+])
    };
}
