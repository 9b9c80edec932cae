//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The system allocator refused a block.
    AllocationFailed {
        /// Size of the refused block in bytes.
        bytes: usize,
    },
    /// A size/alignment pair that no block can satisfy.
    InvalidLayout {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
    /// A marker taken before the allocator switched blocks or was reset.
    StaleMarker {
        /// Epoch recorded in the marker.
        marker_epoch: u64,
        /// Current epoch of the allocator.
        current_epoch: u64,
    },
    /// The allocator configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { bytes } => {
                write!(f, "arena block allocation of {bytes} bytes failed")
            }
            Self::InvalidLayout { size, align } => {
                write!(f, "invalid layout: {size} bytes aligned to {align}")
            }
            Self::StaleMarker {
                marker_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale marker: epoch {marker_epoch}, current {current_epoch}"
                )
            }
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArenaError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_and_chain() {
        let err: ArenaError = ConfigError::ZeroArenaSize.into();
        assert_eq!(err.to_string(), "config: arena size must be non-zero");
        assert!(err.source().is_some());
    }

    #[test]
    fn stale_marker_display() {
        let err = ArenaError::StaleMarker {
            marker_epoch: 1,
            current_epoch: 3,
        };
        assert_eq!(err.to_string(), "stale marker: epoch 1, current 3");
        assert!(err.source().is_none());
    }
}
