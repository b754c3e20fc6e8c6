/*!
 * Allocation Transactions
 *
 * Staged allocations released together unless committed. Replaces a chain
 * of hand-written cleanup steps after a partial failure: every allocation
 * made through the transaction is rolled back on drop, in reverse order.
 */

use super::traits::Guard;
use super::{GuardError, GuardMetadata, GuardResult};
use crate::core::errors::AllocationError;
use crate::memory::traits::Allocator;
use crate::memory::types::Handle;
use tracing::{debug, warn};

/// Transaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction in progress
    Active,
    /// Transaction committed successfully
    Committed,
    /// Transaction rolled back
    RolledBack,
}

/// All-or-nothing group of allocations
///
/// # Example
///
/// ```ignore
/// let mut tx = arena.begin();
/// let table = tx.allocate(rows, 8)?;
/// for _ in 0..rows {
///     tx.allocate(cols, 4)?; // any failure drops tx and frees everything
/// }
/// let handles = tx.commit()?;
/// ```
pub struct AllocationTransaction<'a, A: Allocator> {
    allocator: &'a mut A,
    staged: Vec<Handle>,
    state: TransactionState,
    metadata: GuardMetadata,
}

impl<'a, A: Allocator> AllocationTransaction<'a, A> {
    pub fn new(allocator: &'a mut A) -> Self {
        Self {
            allocator,
            staged: Vec::new(),
            state: TransactionState::Active,
            metadata: GuardMetadata::new("transaction"),
        }
    }

    /// Allocate and stage for rollback
    ///
    /// Fails with `InvalidTransition` once the transaction has been rolled
    /// back; allocator failures are wrapped in `OperationFailed`.
    pub fn allocate(&mut self, count: usize, element_size: usize) -> GuardResult<Handle> {
        if self.state != TransactionState::Active {
            return Err(GuardError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: "Allocate".to_string(),
            });
        }
        let handle = self.allocator.allocate(count, element_size)?;
        self.metadata.size_bytes += count * element_size;
        self.staged.push(handle);
        Ok(handle)
    }

    /// Underlying allocator, for writes and reads on staged handles
    pub fn allocator(&mut self) -> &mut A {
        self.allocator
    }

    /// Handles staged so far, in allocation order
    pub fn staged(&self) -> &[Handle] {
        &self.staged
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Keep every staged allocation
    pub fn commit(mut self) -> GuardResult<Vec<Handle>> {
        self.transition(TransactionState::Committed)?;
        debug!(
            "Transaction committed {} allocations ({} bytes)",
            self.staged.len(),
            self.metadata.size_bytes
        );
        Ok(std::mem::take(&mut self.staged))
    }

    /// Free every staged allocation now
    pub fn rollback(mut self) -> GuardResult<()> {
        self.release()
    }

    fn transition(&mut self, to: TransactionState) -> GuardResult<()> {
        if self.state != TransactionState::Active {
            return Err(GuardError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", to),
            });
        }
        self.state = to;
        Ok(())
    }

    fn do_rollback(&mut self) -> GuardResult<()> {
        let mut first_error = None;
        for handle in self.staged.drain(..).rev() {
            match self.allocator.free(handle) {
                Ok(()) => {}
                // Already freed by the caller, or the arena was torn down
                Err(AllocationError::InvalidHandle { .. }) | Err(AllocationError::ArenaClosed) => {
                    debug!("Rollback skipped {}: no longer live", handle)
                }
                Err(e) => {
                    warn!("Rollback failed to free {}: {}", handle, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(GuardError::OperationFailed(e)),
            None => Ok(()),
        }
    }
}

impl<'a, A: Allocator> Guard for AllocationTransaction<'a, A> {
    fn guarded(&self) -> &[Handle] {
        if self.state == TransactionState::Active {
            &self.staged
        } else {
            &[]
        }
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    fn release(&mut self) -> GuardResult<()> {
        self.transition(TransactionState::RolledBack)?;
        let count = self.staged.len();
        self.do_rollback()?;
        debug!("Transaction rolled back {} allocations", count);
        Ok(())
    }
}

impl<'a, A: Allocator> Drop for AllocationTransaction<'a, A> {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            if let Err(e) = self.release() {
                warn!("Transaction rollback on drop failed: {}", e);
            }
        }
    }
}

/// Start a transaction on any allocator
pub trait TransactionExt: Allocator + Sized {
    fn begin(&mut self) -> AllocationTransaction<'_, Self> {
        AllocationTransaction::new(self)
    }
}

impl<A: Allocator> TransactionExt for A {}
