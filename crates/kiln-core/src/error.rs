//! Error types for array operations.
//!
//! Precondition violations and allocation failures are reported through
//! [`ArrayError`]. The coarse [`ErrorKind`] groups the variants into the
//! three failure classes callers usually branch on.

use std::error::Error;
use std::fmt;

use crate::id::{ArrayId, Generation};

/// Coarse classification of an [`ArrayError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An index or range fell outside the live elements.
    OutOfRange,
    /// A cursor did not belong to the array or was invalidated.
    InvalidIterator,
    /// The allocator refused the request, or the size overflowed.
    AllocationFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "out of range"),
            Self::InvalidIterator => write!(f, "invalid iterator"),
            Self::AllocationFailure => write!(f, "allocation failure"),
        }
    }
}

/// Errors that can occur during array operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An index was not within the live range of the array.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// A range was inverted or extended past the live elements.
    InvalidRange {
        /// First index of the range.
        start: usize,
        /// One past the last index of the range.
        end: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// A cursor produced by a different array was passed in.
    ForeignCursor {
        /// The array that produced the cursor.
        cursor_owner: ArrayId,
        /// The array the cursor was used with.
        array: ArrayId,
    },
    /// A cursor from an older structural generation was passed in.
    StaleCursor {
        /// Generation recorded in the cursor.
        cursor_generation: Generation,
        /// Current generation of the array.
        current: Generation,
    },
    /// The system allocator could not satisfy the request.
    AllocationFailure {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// The requested element count does not fit in a valid allocation.
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
    },
}

impl ArrayError {
    /// The coarse class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } | Self::InvalidRange { .. } => ErrorKind::OutOfRange,
            Self::ForeignCursor { .. } | Self::StaleCursor { .. } => ErrorKind::InvalidIterator,
            Self::AllocationFailure { .. } | Self::CapacityOverflow { .. } => {
                ErrorKind::AllocationFailure
            }
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(
                    f,
                    "range {start}..{end} invalid for array of length {len}"
                )
            }
            Self::ForeignCursor {
                cursor_owner,
                array,
            } => {
                write!(
                    f,
                    "cursor from array {cursor_owner} used with array {array}"
                )
            }
            Self::StaleCursor {
                cursor_generation,
                current,
            } => {
                write!(
                    f,
                    "stale cursor: generation {cursor_generation}, current {current}"
                )
            }
            Self::AllocationFailure { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements requested")
            }
        }
    }
}

impl Error for ArrayError {}
