/*!
 * RAII Allocation Guards
 *
 * Scoped ownership of arena allocations with automatic cleanup.
 *
 * ## Guard Types
 *
 * - **AllocationGuard**: one allocation, freed on drop unless kept
 * - **AllocationTransaction**: staged allocations, rolled back together
 *   on drop unless committed
 *
 * ## Example
 *
 * ```rust
 * use handle_arena::core::guard::{AllocationGuardExt, TransactionExt};
 * use handle_arena::memory::{Arena, SharedArena};
 *
 * let shared = SharedArena::new(0);
 * {
 *     let scratch = shared.allocate_guard(64, 1).unwrap();
 *     shared.write(scratch.handle(), b"temporary").unwrap();
 * } // freed here
 * assert_eq!(shared.stats().live_slots, 0);
 *
 * let mut arena = Arena::new(0);
 * let rows = {
 *     let mut tx = arena.begin();
 *     for _ in 0..3 {
 *         tx.allocate(4, 4).unwrap();
 *     }
 *     tx.commit().unwrap()
 * };
 * assert_eq!(rows.len(), 3);
 * ```
 */

mod memory;
mod traits;
mod transaction;

pub use memory::{AllocationGuard, AllocationGuardExt};
pub use traits::Guard;
pub use transaction::{AllocationTransaction, TransactionExt, TransactionState};

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub enum GuardError {
    #[error("Resource already released")]
    #[diagnostic(code(guard::already_released))]
    AlreadyReleased,

    #[error("Invalid state transition: {from} -> {to}")]
    #[diagnostic(
        code(guard::invalid_transition),
        help("A transaction accepts allocations only until it is committed or rolled back.")
    )]
    InvalidTransition { from: String, to: String },

    #[error("Operation failed: {0}")]
    #[diagnostic(code(guard::operation_failed))]
    OperationFailed(#[from] crate::core::errors::AllocationError),
}

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: std::time::Instant,
    pub size_bytes: usize,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: std::time::Instant::now(),
            size_bytes: 0,
        }
    }

    #[inline]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size_bytes = size;
        self
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
