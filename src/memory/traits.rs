/*!
 * Memory Traits
 * Allocation abstractions shared by `Arena` and `SharedArena`
 */

use super::types::{ArenaStats, Handle, MemoryPressure};
use crate::core::types::{ArenaResult, Size};

/// Handle-based allocator interface
pub trait Allocator {
    /// Reserve `count * element_size` zeroed bytes
    fn allocate(&mut self, count: usize, element_size: usize) -> ArenaResult<Handle>;

    /// Change the element count of a live slot
    fn resize(&mut self, handle: Handle, new_count: usize) -> ArenaResult<Handle>;

    /// Release a slot, invalidating the handle
    fn free(&mut self, handle: Handle) -> ArenaResult<()>;

    /// Check if a handle names a live slot
    fn is_valid(&self, handle: Handle) -> bool;

    /// Get the size of a live slot in bytes
    fn size_of(&self, handle: Handle) -> ArenaResult<Size>;
}

/// Arena statistics provider
pub trait ArenaInfo {
    /// Get overall arena statistics
    fn stats(&self) -> ArenaStats;

    /// Whether the arena has been torn down
    fn is_closed(&self) -> bool;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
