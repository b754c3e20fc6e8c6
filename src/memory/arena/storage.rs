/*!
 * Arena Storage Operations
 * Bounds-checked byte and typed-element access through handles
 */

use super::Arena;
use crate::core::errors::AllocationError;
use crate::core::types::{ArenaResult, Size};
use crate::memory::element::{Element, ElementKind, ElementValue};
use crate::memory::types::{Handle, Region};
use std::ops::Range;
use tracing::trace;

/// Absolute buffer range for `[offset, offset + len)` inside `region`
fn checked_range(region: Region, offset: Size, len: Size) -> ArenaResult<Range<Size>> {
    match offset.checked_add(len) {
        Some(end) if end <= region.len => Ok(region.offset + offset..region.offset + end),
        _ => Err(AllocationError::OutOfBounds {
            offset,
            len,
            size: region.len,
        }),
    }
}

impl Arena {
    /// All bytes of a slot
    pub fn read(&self, handle: Handle) -> ArenaResult<&[u8]> {
        let region = self.live_region(handle)?;
        trace!("Read {} bytes from {}", region.len, handle);
        Ok(&self.buffer[region.offset..region.end()])
    }

    /// `len` bytes of a slot starting at `offset`
    pub fn read_at(&self, handle: Handle, offset: Size, len: Size) -> ArenaResult<&[u8]> {
        let region = self.live_region(handle)?;
        let range = checked_range(region, offset, len)?;
        trace!("Read {} bytes at offset {} from {}", len, offset, handle);
        Ok(&self.buffer[range])
    }

    /// Write `data` at the start of a slot
    pub fn write(&mut self, handle: Handle, data: &[u8]) -> ArenaResult<()> {
        self.write_at(handle, 0, data)
    }

    /// Write `data` at `offset` within a slot
    pub fn write_at(&mut self, handle: Handle, offset: Size, data: &[u8]) -> ArenaResult<()> {
        let region = self.live_region(handle)?;
        let range = checked_range(region, offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        trace!("Wrote {} bytes at offset {} to {}", data.len(), offset, handle);
        Ok(())
    }

    /// Check a typed view against the slot's tag, returning the live region
    fn typed_region(&self, handle: Handle, view: ElementKind) -> ArenaResult<Region> {
        let slot = self.resolve(handle)?;
        if !slot.kind.accepts(view) {
            return Err(AllocationError::TypeMismatch {
                expected: view,
                found: slot.kind,
            });
        }
        self.live_region(handle)
    }

    /// Decode every element of a slot as `T`
    pub fn read_elements<T: Element>(&self, handle: Handle) -> ArenaResult<Vec<T>> {
        let region = self.typed_region(handle, T::KIND)?;
        Ok(self.buffer[region.offset..region.end()]
            .chunks_exact(T::SIZE)
            .map(T::read_le)
            .collect())
    }

    /// Decode element `index` of a slot as `T`
    pub fn read_element<T: Element>(&self, handle: Handle, index: usize) -> ArenaResult<T> {
        let region = self.typed_region(handle, T::KIND)?;
        let range = checked_range(region, index.saturating_mul(T::SIZE), T::SIZE)?;
        Ok(T::read_le(&self.buffer[range]))
    }

    /// Encode `values` into a slot starting at element 0
    pub fn write_elements<T: Element>(&mut self, handle: Handle, values: &[T]) -> ArenaResult<()> {
        self.write_elements_at(handle, 0, values)
    }

    /// Encode `values` into a slot starting at element `start`
    pub fn write_elements_at<T: Element>(
        &mut self,
        handle: Handle,
        start: usize,
        values: &[T],
    ) -> ArenaResult<()> {
        let region = self.typed_region(handle, T::KIND)?;
        let range = checked_range(
            region,
            start.saturating_mul(T::SIZE),
            values.len().saturating_mul(T::SIZE),
        )?;
        for (chunk, value) in self.buffer[range].chunks_exact_mut(T::SIZE).zip(values) {
            value.write_le(chunk);
        }
        trace!("Wrote {} x {} to {}", values.len(), T::KIND, handle);
        Ok(())
    }

    /// Encode one element at `index`
    pub fn write_element<T: Element>(&mut self, handle: Handle, index: usize, value: T) -> ArenaResult<()> {
        self.write_elements_at(handle, index, std::slice::from_ref(&value))
    }

    /// Decode element `index` according to the slot's own tag
    pub fn read_value(&self, handle: Handle, index: usize) -> ArenaResult<ElementValue> {
        let slot = self.resolve(handle)?;
        let kind = slot.kind;
        let region = self.live_region(handle)?;
        let stride = kind.stride();
        let range = checked_range(region, index.saturating_mul(stride), stride)?;
        Ok(ElementValue::decode(kind, &self.buffer[range]))
    }
}
