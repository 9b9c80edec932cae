//! Core types for the Kiln container library.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers and error types shared by the array and arena crates:
//! per-instance array ids, structural generations, and the array error
//! taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{ArrayError, ErrorKind};
pub use id::{ArrayId, Generation};
