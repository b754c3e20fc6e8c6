/*!
 * Arena Allocation
 * allocate / resize / free and backing-buffer growth
 */

use super::Arena;
use crate::core::errors::AllocationError;
use crate::core::limits::{MAX_SLOTS, RETIRED_GENERATION};
use crate::core::types::{ArenaResult, Size};
use crate::memory::element::{Element, ElementKind};
use crate::memory::types::{Handle, MemoryPressure, Region, Slot, SlotState};
use tracing::{debug, info, warn};

impl Arena {
    /// Reserve `count * element_size` zeroed bytes
    pub fn allocate(&mut self, count: usize, element_size: usize) -> ArenaResult<Handle> {
        self.allocate_kind(count, ElementKind::Raw {
            stride: element_size,
        })
    }

    /// Reserve `count` zeroed elements of `T`, tagging the slot with `T`'s kind
    pub fn allocate_typed<T: Element>(&mut self, count: usize) -> ArenaResult<Handle> {
        self.allocate_kind(count, T::KIND)
    }

    /// Allocate a typed slot initialised from `values`
    pub fn allocate_from<T: Element>(&mut self, values: &[T]) -> ArenaResult<Handle> {
        let handle = self.allocate_typed::<T>(values.len())?;
        self.write_elements(handle, values)?;
        Ok(handle)
    }

    fn allocate_kind(&mut self, count: usize, kind: ElementKind) -> ArenaResult<Handle> {
        self.check_open()?;
        let bytes = self.byte_len(count, kind.stride())?;

        if self.vacant.is_empty() && self.slots.len() >= MAX_SLOTS {
            return Err(self.capacity_exceeded(bytes));
        }

        let region = match self.claim(bytes) {
            Err(AllocationError::CapacityExceeded { .. }) if self.packing_fits(bytes) => {
                self.pack(None);
                self.claim(bytes)?
            }
            other => other?,
        };

        let index = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.state = SlotState::Live(region);
                slot.count = count;
                slot.kind = kind;
                index
            }
            None => {
                self.slots.push(Slot::live(0, region, count, kind));
                (self.slots.len() - 1) as u32
            }
        };
        let generation = self.slots[index as usize].generation;

        self.live_bytes += bytes;
        self.peak_live_bytes = self.peak_live_bytes.max(self.live_bytes);
        self.total_allocations += 1;

        let handle = Handle::new(self.id, index, generation);
        match self.pressure() {
            level @ (MemoryPressure::High | MemoryPressure::Critical) => warn!(
                "Memory pressure {}: allocated {} bytes for {} ({} / {} bytes live)",
                level, bytes, handle, self.live_bytes, self.config.max_capacity
            ),
            _ => debug!(
                "Allocated {} bytes at offset {} for {} ({} x {})",
                bytes, region.offset, handle, count, kind
            ),
        }

        Ok(handle)
    }

    /// Change a slot's element count, realloc-style
    ///
    /// Elements up to `min(old, new)` are preserved and new elements are
    /// zeroed. The generation is kept, so the returned handle equals the
    /// input; the bytes may have moved.
    pub fn resize(&mut self, handle: Handle, new_count: usize) -> ArenaResult<Handle> {
        let (region, kind, old_count) = {
            let slot = self.resolve(handle)?;
            let region = self.live_region(handle)?;
            (region, slot.kind, slot.count)
        };
        if new_count == 0 {
            return Err(AllocationError::ZeroSizeRequest);
        }
        let new_len = self.byte_len(new_count, kind.stride())?;

        let new_region = if new_len < region.len {
            self.release(Region::new(region.offset + new_len, region.len - new_len));
            Region::new(region.offset, new_len)
        } else if new_len > region.len {
            self.grow_region(handle, region, new_len)?
        } else {
            region
        };

        let slot = &mut self.slots[handle.index as usize];
        slot.state = SlotState::Live(new_region);
        slot.count = new_count;

        self.live_bytes = self.live_bytes - region.len + new_len;
        self.peak_live_bytes = self.peak_live_bytes.max(self.live_bytes);

        debug!(
            "Resized {} from {} to {} elements (offset {} -> {})",
            handle, old_count, new_count, region.offset, new_region.offset
        );
        Ok(handle)
    }

    /// Release a slot and invalidate every copy of `handle`
    pub fn free(&mut self, handle: Handle) -> ArenaResult<()> {
        let region = match self.live_region(handle) {
            Ok(region) => region,
            Err(err @ AllocationError::InvalidHandle { .. }) => {
                warn!("Attempted to free invalid or already freed {}", handle);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let slot = &mut self.slots[handle.index as usize];
        slot.state = SlotState::Free;
        slot.count = 0;
        slot.generation = slot.generation.saturating_add(1);
        let retired = slot.generation == RETIRED_GENERATION;

        self.release(region);
        self.live_bytes -= region.len;
        self.total_frees += 1;

        if retired {
            debug!("Slot {} retired at generation {}", handle.index, RETIRED_GENERATION);
        } else {
            self.vacant.push(handle.index);
        }

        debug!(
            "Freed {} bytes at offset {} for {} ({} bytes live, {} free ranges)",
            region.len,
            region.offset,
            handle,
            self.live_bytes,
            self.free_list.len()
        );
        Ok(())
    }

    /// Byte length for `count` elements of `stride` bytes
    fn byte_len(&self, count: usize, stride: usize) -> ArenaResult<Size> {
        if count == 0 || stride == 0 {
            return Err(AllocationError::ZeroSizeRequest);
        }
        count
            .checked_mul(stride)
            .ok_or_else(|| self.capacity_exceeded(usize::MAX))
    }

    /// Find `bytes` of zeroed space: recycle, bump, or grow
    fn claim(&mut self, bytes: Size) -> ArenaResult<Region> {
        let region = match self.free_list.find_best_fit(bytes) {
            Some(region) => {
                debug!(
                    "Recycled offset {} for {} bytes ({} free ranges left)",
                    region.offset,
                    bytes,
                    self.free_list.len()
                );
                region
            }
            None => {
                let end = self
                    .top
                    .checked_add(bytes)
                    .ok_or_else(|| self.capacity_exceeded(bytes))?;
                if end > self.buffer.len() {
                    self.grow(bytes, end)?;
                }
                let region = Region::new(self.top, bytes);
                self.top = end;
                region
            }
        };
        self.buffer[region.offset..region.end()].fill(0);
        Ok(region)
    }

    /// Grow a slot's region, packing the buffer once if it is too fragmented
    fn grow_region(&mut self, handle: Handle, region: Region, new_len: Size) -> ArenaResult<Region> {
        match self.extend_region(region, new_len) {
            Err(AllocationError::CapacityExceeded { .. })
                if self.packing_fits(new_len - region.len) =>
            {
                // The growing slot is packed last, so it can extend at the top
                self.pack(Some(handle.index));
                let packed = self.live_region(handle)?;
                self.extend_region(packed, new_len)
            }
            other => other,
        }
    }

    /// Whether packing live regions would make room for `extra` more bytes
    fn packing_fits(&self, extra: Size) -> bool {
        self.free_list.total_bytes() > 0
            && self
                .live_bytes
                .checked_add(extra)
                .map_or(false, |needed| needed <= self.config.max_capacity)
    }

    /// Grow a live region to `new_len` bytes, in place when possible
    fn extend_region(&mut self, region: Region, new_len: Size) -> ArenaResult<Region> {
        let extra = new_len - region.len;
        let end = region.end();

        if end == self.top {
            let new_end = end
                .checked_add(extra)
                .ok_or_else(|| self.capacity_exceeded(extra))?;
            if new_end > self.buffer.len() {
                self.grow(extra, new_end)?;
            }
            self.top = new_end;
            self.buffer[end..new_end].fill(0);
            return Ok(Region::new(region.offset, new_len));
        }

        if self.free_list.take_at(end, extra) {
            self.buffer[end..end + extra].fill(0);
            return Ok(Region::new(region.offset, new_len));
        }

        let target = self.claim(new_len)?;
        self.buffer
            .copy_within(region.offset..region.end(), target.offset);
        self.release(region);
        Ok(target)
    }

    /// Grow the backing buffer so at least `required_end` bytes exist
    fn grow(&mut self, requested: Size, required_end: Size) -> ArenaResult<()> {
        let capacity = self.buffer.len();
        let limit = self.config.max_capacity;
        let target = capacity
            .saturating_mul(self.config.growth_factor)
            .max(capacity.saturating_add(requested))
            .min(limit);

        if target < required_end {
            warn!(
                "Arena {} cannot grow: requested {} bytes, capacity {} bytes, limit {} bytes",
                self.id, requested, capacity, limit
            );
            return Err(AllocationError::CapacityExceeded {
                requested,
                capacity,
                limit,
            });
        }

        let additional = target - capacity;
        self.buffer
            .try_reserve_exact(additional)
            .map_err(|_| AllocationError::HostAllocationFailure {
                requested: additional,
            })?;
        self.buffer.resize(target, 0);

        info!(
            "Arena {} grew from {} to {} bytes (request {} bytes)",
            self.id, capacity, target, requested
        );
        Ok(())
    }

    fn capacity_exceeded(&self, requested: Size) -> AllocationError {
        AllocationError::CapacityExceeded {
            requested,
            capacity: self.buffer.len(),
            limit: self.config.max_capacity,
        }
    }
}
