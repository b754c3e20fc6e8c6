/*!
 * Allocation Guards
 *
 * RAII guards for scoped arena allocations with automatic cleanup
 */

use super::traits::Guard;
use super::{GuardError, GuardMetadata, GuardResult};
use crate::core::errors::AllocationError;
use crate::core::types::ArenaResult;
use crate::memory::element::Element;
use crate::memory::shared::SharedArena;
use crate::memory::types::Handle;
use tracing::{debug, error};

/// Scoped allocation with automatic free
///
/// # Example
///
/// ```ignore
/// let guard = arena.allocate_guard(1024, 1)?;
/// arena.write(guard.handle(), b"scratch")?;
/// // Automatically freed on drop
/// ```
pub struct AllocationGuard {
    handle: Handle,
    arena: SharedArena,
    metadata: GuardMetadata,
    active: bool,
}

impl AllocationGuard {
    /// Take ownership of an existing allocation
    pub fn new(handle: Handle, arena: SharedArena) -> Self {
        let size = arena.size_of(handle).unwrap_or(0);
        Self {
            handle,
            arena,
            metadata: GuardMetadata::new("allocation").with_size(size),
            active: true,
        }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    /// Disarm the guard and hand the allocation back to the caller
    pub fn keep(mut self) -> Handle {
        self.active = false;
        self.handle
    }

    /// Manually release without waiting for Drop
    pub fn release_early(mut self) -> GuardResult<()> {
        self.release()
    }
}

impl Guard for AllocationGuard {
    fn guarded(&self) -> &[Handle] {
        if self.active {
            std::slice::from_ref(&self.handle)
        } else {
            &[]
        }
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }
        self.active = false;
        self.arena.free(self.handle)?;
        Ok(())
    }
}

impl Drop for AllocationGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        match self.release() {
            Ok(()) => debug!(
                "Allocation guard released {} after {}us",
                self.handle,
                self.metadata.lifetime_micros()
            ),
            Err(GuardError::OperationFailed(AllocationError::ArenaClosed)) => {
                debug!("Allocation guard for {} outlived its arena", self.handle)
            }
            Err(e) => error!("Allocation guard drop failed for {}: {}", self.handle, e),
        }
    }
}

/// Extension trait for SharedArena to create guards
pub trait AllocationGuardExt {
    /// Allocate raw bytes with a guard
    fn allocate_guard(&self, count: usize, element_size: usize) -> ArenaResult<AllocationGuard>;

    /// Allocate typed elements with a guard
    fn allocate_typed_guard<T: Element>(&self, count: usize) -> ArenaResult<AllocationGuard>;
}

impl AllocationGuardExt for SharedArena {
    fn allocate_guard(&self, count: usize, element_size: usize) -> ArenaResult<AllocationGuard> {
        let handle = self.allocate(count, element_size)?;
        Ok(AllocationGuard::new(handle, self.clone()))
    }

    fn allocate_typed_guard<T: Element>(&self, count: usize) -> ArenaResult<AllocationGuard> {
        let handle = self.allocate_typed::<T>(count)?;
        Ok(AllocationGuard::new(handle, self.clone()))
    }
}
