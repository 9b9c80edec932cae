//! Bump-allocated memory arenas for Kiln.
//!
//! A [`MemoryArena`] is one block from the system allocator with a
//! monotonically increasing cursor; resetting rewinds the cursor without
//! freeing. A [`LinearAllocator`] chains arenas so that allocation never
//! fails for lack of room in the current block.
//!
//! # Architecture
//!
//! ```text
//! LinearAllocator
//! ├── MemoryArena (current, bump cursor)
//! └── Array<MemoryArena> (retired, freed on reset)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod linear;
pub mod memory_arena;

pub use config::{ArenaConfig, ConfigError};
pub use error::ArenaError;
pub use linear::{ArenaMarker, LinearAllocator};
pub use memory_arena::MemoryArena;
