/*!
 * Guard Traits
 * Common view over scoped arena allocations
 */

use super::{GuardMetadata, GuardResult};
use crate::core::types::Size;
use crate::memory::types::Handle;

/// Scoped ownership of one or more arena allocations
///
/// Dropping a guard while it is active frees every handle in `guarded()`.
pub trait Guard {
    /// Handles that would be freed if the guard were dropped now
    fn guarded(&self) -> &[Handle];

    fn metadata(&self) -> &GuardMetadata;

    fn is_active(&self) -> bool;

    /// Free every guarded allocation now
    ///
    /// Returns `Err` once the guard is no longer active
    fn release(&mut self) -> GuardResult<()>;

    /// Bytes requested through this guard
    fn guarded_bytes(&self) -> Size {
        self.metadata().size_bytes
    }
}
