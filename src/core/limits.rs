/*!
 * Arena Limits and Constants
 *
 * Centralized location for capacity ceilings, growth policy and pressure
 * thresholds. Values here are the defaults behind `ArenaConfig`.
 */

// =============================================================================
// CAPACITY
// =============================================================================

/// Default ceiling for a single arena's backing buffer (1GB)
pub const DEFAULT_MAX_CAPACITY: usize = 1024 * 1024 * 1024;

/// Hard ceiling: a `Vec<u8>` can never hold more than `isize::MAX` bytes
pub const ABSOLUTE_MAX_CAPACITY: usize = isize::MAX as usize;

/// Default seed capacity (0 means grow on first use)
pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

// =============================================================================
// GROWTH POLICY
// =============================================================================

/// Capacity multiplier applied when the buffer must grow
/// new = max(capacity * factor, capacity + requested)
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Smallest accepted growth factor
pub const MIN_GROWTH_FACTOR: usize = 2;

// =============================================================================
// SLOTS
// =============================================================================

/// Upper bound on slot table length (indices are u32)
pub const MAX_SLOTS: usize = u32::MAX as usize;

/// Generation at which a slot is retired instead of recycled
pub const RETIRED_GENERATION: u32 = u32::MAX;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Live bytes / ceiling ratio that logs a warning
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.80;

/// Live bytes / ceiling ratio considered critical
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.95;

/// Ratio at which pressure is reported as medium
pub const MEDIUM_PRESSURE_THRESHOLD: f64 = 0.60;
