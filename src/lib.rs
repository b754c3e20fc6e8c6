/*!
 * Handle Arena Library
 * Growable memory arena addressed through generation-checked handles
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::config::ArenaConfig;
pub use crate::core::errors::{AllocationError, ConfigError};
pub use crate::core::guard::{AllocationGuard, AllocationGuardExt, AllocationTransaction, TransactionExt};
pub use crate::core::types::{ArenaId, ArenaResult, Size};
pub use memory::{
    Allocator, Arena, ArenaInfo, ArenaStats, Element, ElementKind, ElementValue, Handle,
    MemoryPressure, SharedArena,
};
pub use monitoring::init_tracing;
