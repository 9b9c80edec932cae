//! Linear allocator configuration.

use std::error::Error;
use std::fmt;

/// Configuration for a [`LinearAllocator`](crate::LinearAllocator).
///
/// Checked by [`validate`](Self::validate) when the allocator is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size in bytes of each arena block.
    ///
    /// Default: 4096. An allocation larger than this gets a dedicated
    /// block sized to fit it.
    pub arena_size: usize,

    /// Minimum alignment in bytes of every arena block.
    ///
    /// Default: 16. Must be a power of two.
    pub alignment: usize,

    /// Whether [`reset`](crate::LinearAllocator::reset) replaces all blocks
    /// with a single block of their combined size.
    ///
    /// Default: `true`, so a steady-state workload settles on one block.
    pub consolidate_on_reset: bool,
}

impl ArenaConfig {
    /// Default block size in bytes.
    pub const DEFAULT_ARENA_SIZE: usize = 4096;

    /// Default block alignment in bytes.
    pub const DEFAULT_ALIGNMENT: usize = 16;

    /// Default consolidation policy.
    pub const DEFAULT_CONSOLIDATE_ON_RESET: bool = true;

    /// A config with the given block size and defaults elsewhere.
    pub fn new(arena_size: usize) -> Self {
        Self {
            arena_size,
            alignment: Self::DEFAULT_ALIGNMENT,
            consolidate_on_reset: Self::DEFAULT_CONSOLIDATE_ON_RESET,
        }
    }

    /// Check the structural constraints on every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_size == 0 {
            return Err(ConfigError::ZeroArenaSize);
        }
        if !self.alignment.is_power_of_two() {
            return Err(ConfigError::InvalidAlignment {
                alignment: self.alignment,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ARENA_SIZE)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ArenaConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `arena_size` was zero.
    ZeroArenaSize,
    /// `alignment` was not a power of two.
    InvalidAlignment {
        /// The configured alignment.
        alignment: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroArenaSize => write!(f, "arena size must be non-zero"),
            Self::InvalidAlignment { alignment } => {
                write!(f, "alignment {alignment} is not a power of two")
            }
        }
    }
}

impl Error for ConfigError {}
