/*!
 * Memory Types
 * Handles, slot metadata and statistics for the arena
 */

use super::element::ElementKind;
use crate::core::limits::{
    DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD, MEDIUM_PRESSURE_THRESHOLD,
};
use crate::core::types::{ArenaId, Generation, Size, SlotIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated reference to one arena allocation
///
/// Stands in for a raw address. A handle is only honoured while its
/// generation matches the slot's and it is presented to the arena that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[must_use]
pub struct Handle {
    pub(crate) arena: ArenaId,
    pub(crate) index: SlotIndex,
    pub(crate) generation: Generation,
}

impl Handle {
    pub(crate) fn new(arena: ArenaId, index: SlotIndex, generation: Generation) -> Self {
        Self {
            arena,
            index,
            generation,
        }
    }

    #[inline]
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    #[inline]
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle({}, slot={}, gen={})",
            self.arena, self.index, self.generation
        )
    }
}

/// Byte range `[offset, offset + len)` inside the backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub offset: Size,
    pub len: Size,
}

impl Region {
    #[inline]
    pub fn new(offset: Size, len: Size) -> Self {
        Self { offset, len }
    }

    #[inline]
    pub fn end(&self) -> Size {
        self.offset + self.len
    }
}

/// Allocation state of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Free,
    Live(Region),
}

/// Per-allocation metadata
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub generation: Generation,
    pub state: SlotState,
    pub count: usize,
    pub kind: ElementKind,
}

impl Slot {
    pub fn live(generation: Generation, region: Region, count: usize, kind: ElementKind) -> Self {
        Self {
            generation,
            state: SlotState::Live(region),
            count,
            kind,
        }
    }

    #[inline]
    pub fn region(&self) -> Option<Region> {
        match self.state {
            SlotState::Live(region) => Some(region),
            SlotState::Free => None,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.state, SlotState::Live(_))
    }
}

/// Arena lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaState {
    Open,
    /// Terminal: reached through teardown
    Closed,
}

/// Arena statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaStats {
    pub capacity: Size,
    pub max_capacity: Size,
    pub live_bytes: Size,
    pub free_bytes: Size,
    /// Bytes held in released ranges below the top, reusable without growth
    pub fragmented_bytes: Size,
    pub peak_live_bytes: Size,
    pub live_slots: usize,
    pub free_slots: usize,
    pub free_ranges: usize,
    pub total_allocations: u64,
    pub total_frees: u64,
    /// Live bytes as a percentage of the ceiling
    pub usage_percentage: f64,
}

impl ArenaStats {
    /// Pressure against the default thresholds
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::classify(
            self.usage_percentage / 100.0,
            DEFAULT_WARNING_THRESHOLD,
            DEFAULT_CRITICAL_THRESHOLD,
        )
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    /// Classify a usage ratio against warning/critical thresholds
    pub fn classify(ratio: f64, warning: f64, critical: f64) -> Self {
        if ratio >= critical {
            MemoryPressure::Critical
        } else if ratio >= warning {
            MemoryPressure::High
        } else if ratio >= MEDIUM_PRESSURE_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
