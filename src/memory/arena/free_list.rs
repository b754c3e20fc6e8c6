/*!
 * Free Range List
 * Best-fit recycling of released byte ranges with immediate coalescing
 */

use crate::core::types::Size;
use crate::memory::types::Region;
use std::collections::{BTreeMap, BTreeSet};

/// Released regions of the backing buffer
///
/// Two indexes over the same set of ranges:
/// - `by_offset` finds neighbours for coalescing in O(log n)
/// - `by_size` finds the smallest range that fits in O(log n)
///
/// No two stored ranges are ever adjacent.
#[derive(Debug, Default)]
pub(crate) struct FreeList {
    by_offset: BTreeMap<Size, Size>,
    by_size: BTreeSet<(Size, Size)>,
    total: Size,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a range, merging it with free neighbours
    pub fn insert(&mut self, region: Region) {
        if region.len == 0 {
            return;
        }
        let mut offset = region.offset;
        let mut len = region.len;

        let before = self
            .by_offset
            .range(..offset)
            .next_back()
            .map(|(&off, &l)| (off, l));
        if let Some((prev_off, prev_len)) = before {
            if prev_off + prev_len == offset {
                self.remove(prev_off, prev_len);
                offset = prev_off;
                len += prev_len;
            }
        }

        if let Some(&next_len) = self.by_offset.get(&(offset + len)) {
            self.remove(offset + len, next_len);
            len += next_len;
        }

        self.put(offset, len);
    }

    /// Take the smallest range holding `size` bytes, splitting off the rest
    pub fn find_best_fit(&mut self, size: Size) -> Option<Region> {
        let (len, offset) = *self.by_size.range((size, 0)..).next()?;
        self.remove(offset, len);
        if len > size {
            self.put(offset + size, len - size);
        }
        Some(Region::new(offset, size))
    }

    /// Take `needed` bytes from a free range starting exactly at `offset`
    pub fn take_at(&mut self, offset: Size, needed: Size) -> bool {
        match self.by_offset.get(&offset).copied() {
            Some(len) if len >= needed => {
                self.remove(offset, len);
                if len > needed {
                    self.put(offset + needed, len - needed);
                }
                true
            }
            _ => false,
        }
    }

    /// Remove the range ending at `top`, returning its start
    pub fn take_tail(&mut self, top: Size) -> Option<Size> {
        let (&offset, &len) = self.by_offset.iter().next_back()?;
        if offset + len != top {
            return None;
        }
        self.remove(offset, len);
        Some(offset)
    }

    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }

    /// Sum of all free range lengths
    pub fn total_bytes(&self) -> Size {
        self.total
    }

    pub fn clear(&mut self) {
        self.by_offset.clear();
        self.by_size.clear();
        self.total = 0;
    }

    fn put(&mut self, offset: Size, len: Size) {
        self.by_offset.insert(offset, len);
        self.by_size.insert((len, offset));
        self.total += len;
    }

    fn remove(&mut self, offset: Size, len: Size) {
        self.by_offset.remove(&offset);
        self.by_size.remove(&(len, offset));
        self.total -= len;
    }
}
