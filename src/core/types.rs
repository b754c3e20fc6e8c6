/*!
 * Core Types
 * Common types used across the arena
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Size type for byte counts and capacities
pub type Size = usize;

/// Per-slot version number, bumped every time the slot is freed
pub type Generation = u32;

/// Position of a slot in an arena's slot table
pub type SlotIndex = u32;

/// Common result type for arena operations
pub type ArenaResult<T> = Result<T, super::errors::AllocationError>;

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique arena identifier
///
/// Stamped into every handle so a handle presented to the wrong arena is
/// rejected instead of silently aliasing a slot with the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate the next unused id
    pub fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}
