/*!
 * Arena Introspection
 * Statistics, pressure and per-handle queries
 */

use super::Arena;
use crate::core::types::{ArenaResult, Size};
use crate::memory::element::ElementKind;
use crate::memory::types::{ArenaStats, Handle, MemoryPressure};

impl Arena {
    /// Current backing buffer size in bytes
    #[inline]
    pub fn capacity(&self) -> Size {
        self.buffer.len()
    }

    /// Bytes held by live slots
    #[inline]
    pub fn live_bytes(&self) -> Size {
        self.live_bytes
    }

    /// Whether `handle` currently names a live slot of this arena
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Slot size in bytes
    pub fn size_of(&self, handle: Handle) -> ArenaResult<Size> {
        Ok(self.live_region(handle)?.len)
    }

    /// Slot length in elements
    pub fn len(&self, handle: Handle) -> ArenaResult<usize> {
        Ok(self.resolve(handle)?.count)
    }

    /// Element tag recorded for the slot
    pub fn kind(&self, handle: Handle) -> ArenaResult<ElementKind> {
        Ok(self.resolve(handle)?.kind)
    }

    /// Pressure of live bytes against the configured ceiling
    pub fn pressure(&self) -> MemoryPressure {
        MemoryPressure::classify(
            self.usage_ratio(),
            self.config.warning_threshold,
            self.config.critical_threshold,
        )
    }

    fn usage_ratio(&self) -> f64 {
        if self.config.max_capacity == 0 {
            return 0.0;
        }
        self.live_bytes as f64 / self.config.max_capacity as f64
    }

    pub fn stats(&self) -> ArenaStats {
        let live_slots = self.slots.iter().filter(|slot| slot.is_live()).count();
        ArenaStats {
            capacity: self.buffer.len(),
            max_capacity: self.config.max_capacity,
            live_bytes: self.live_bytes,
            free_bytes: self.buffer.len() - self.live_bytes,
            fragmented_bytes: self.free_list.total_bytes(),
            peak_live_bytes: self.peak_live_bytes,
            live_slots,
            free_slots: self.slots.len() - live_slots,
            free_ranges: self.free_list.len(),
            total_allocations: self.total_allocations,
            total_frees: self.total_frees,
            usage_percentage: self.usage_ratio() * 100.0,
        }
    }
}
