/*!
 * Arena Allocator
 *
 * One growable byte buffer carved into handle-addressed slots.
 *
 * ## Placement
 *
 * - **Recycle**: best-fit search over released ranges, remainder split off
 * - **Bump**: carve from the top of the used region
 * - **Grow**: `max(capacity * growth_factor, capacity + requested)`,
 *   clamped to the configured ceiling
 *
 * ## Handles
 *
 * Callers never see offsets. A `Handle` names a slot and the generation it
 * was issued under; freeing bumps the generation so every copy of the old
 * handle is rejected, even after the slot and its bytes are reused. Because
 * of that indirection, `resize` and `compact` may move bytes freely.
 *
 * ## Lifecycle
 *
 * `teardown` releases everything at once and closes the arena for good.
 */

mod allocator;
pub(crate) mod free_list;
mod lifecycle;
mod stats;
mod storage;

use crate::core::config::ArenaConfig;
use crate::core::errors::{AllocationError, ConfigError};
use crate::core::types::{ArenaId, ArenaResult, Size};
use crate::memory::types::{ArenaState, Handle, Region, Slot};
use free_list::FreeList;
use tracing::info;

/// Manual memory arena
///
/// Mutation takes `&mut self`; wrap in [`SharedArena`](crate::memory::SharedArena)
/// to share across threads.
#[derive(Debug)]
pub struct Arena {
    id: ArenaId,
    config: ArenaConfig,
    buffer: Vec<u8>,
    // End of the highest carved region; bytes past it are untouched capacity
    top: Size,
    free_list: FreeList,
    slots: Vec<Slot>,
    // Freed slot indices available for reuse (retired slots never land here)
    vacant: Vec<u32>,
    live_bytes: Size,
    peak_live_bytes: Size,
    total_allocations: u64,
    total_frees: u64,
    state: ArenaState,
}

impl Arena {
    /// Create an arena with at least `initial_capacity` bytes of backing store
    ///
    /// Zero is a legal capacity; the arena grows on first use.
    pub fn new(initial_capacity: Size) -> Self {
        Self::from_config(ArenaConfig::with_initial_capacity(initial_capacity))
    }

    /// Create an arena from an explicit configuration
    pub fn with_config(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: ArenaConfig) -> Self {
        let id = ArenaId::next();
        info!(
            "Arena {} initialized with {} bytes (ceiling {} bytes, growth x{})",
            id, config.initial_capacity, config.max_capacity, config.growth_factor
        );
        Self {
            id,
            buffer: vec![0u8; config.initial_capacity],
            config,
            top: 0,
            free_list: FreeList::new(),
            slots: Vec::new(),
            vacant: Vec::new(),
            live_bytes: 0,
            peak_live_bytes: 0,
            total_allocations: 0,
            total_frees: 0,
            state: ArenaState::Open,
        }
    }

    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> ArenaState {
        self.state
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == ArenaState::Closed
    }

    #[inline]
    fn check_open(&self) -> ArenaResult<()> {
        match self.state {
            ArenaState::Open => Ok(()),
            ArenaState::Closed => Err(AllocationError::ArenaClosed),
        }
    }

    /// Resolve a handle to its live slot
    ///
    /// Closed status is reported before any handle check.
    fn resolve(&self, handle: Handle) -> ArenaResult<&Slot> {
        self.check_open()?;
        let invalid = AllocationError::InvalidHandle {
            index: handle.index,
            generation: handle.generation,
        };
        if handle.arena != self.id {
            return Err(invalid);
        }
        match self.slots.get(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation && slot.is_live() => Ok(slot),
            _ => Err(invalid),
        }
    }

    /// Resolve a handle to its live region
    fn live_region(&self, handle: Handle) -> ArenaResult<Region> {
        let slot = self.resolve(handle)?;
        slot.region().ok_or(AllocationError::InvalidHandle {
            index: handle.index,
            generation: handle.generation,
        })
    }

    /// Return a region to the free list, lowering `top` when it touches it
    fn release(&mut self, region: Region) {
        self.free_list.insert(region);
        if let Some(new_top) = self.free_list.take_tail(self.top) {
            self.top = new_top;
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(0)
    }
}
