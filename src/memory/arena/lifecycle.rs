/*!
 * Arena Lifecycle
 * Bulk teardown, compaction and drop-time release
 */

use super::Arena;
use crate::core::types::{ArenaResult, Size, SlotIndex};
use crate::memory::types::{ArenaState, Region, SlotState};
use tracing::{debug, info, instrument};

impl Arena {
    /// Release every allocation and close the arena
    ///
    /// Every slot's generation is bumped, so all outstanding handles are
    /// invalidated at once. Any later call, including a second teardown,
    /// fails with `ArenaClosed`.
    #[instrument(level = "info", skip(self), fields(arena = %self.id))]
    pub fn teardown(&mut self) -> ArenaResult<()> {
        self.check_open()?;

        let mut released = 0usize;
        for slot in &mut self.slots {
            if slot.is_live() {
                released += 1;
            }
            slot.state = SlotState::Free;
            slot.count = 0;
            slot.generation = slot.generation.saturating_add(1);
        }

        let released_bytes = self.live_bytes;
        self.total_frees += released as u64;
        self.vacant.clear();
        self.free_list.clear();
        self.buffer = Vec::new();
        self.top = 0;
        self.live_bytes = 0;
        self.state = ArenaState::Closed;

        info!(
            "Arena {} torn down: released {} live allocations ({} bytes)",
            self.id, released, released_bytes
        );
        Ok(())
    }

    /// Slide live regions down to offset 0 and shrink the buffer to fit
    ///
    /// Handles stay valid; only offsets change. Returns the number of
    /// capacity bytes given back.
    #[instrument(level = "debug", skip(self), fields(arena = %self.id))]
    pub fn compact(&mut self) -> ArenaResult<Size> {
        self.check_open()?;

        let before = self.buffer.len();
        let used = self.pack(None);
        self.buffer.truncate(used);
        self.buffer.shrink_to_fit();

        let reclaimed = before - used;
        info!(
            "Arena {} compacted: {} bytes live, {} bytes reclaimed",
            self.id, used, reclaimed
        );
        Ok(reclaimed)
    }

    /// Move live regions together from offset 0, keeping capacity
    ///
    /// Regions keep their address order, except `last`, which is placed
    /// after all others. Clears the free list and returns the new top.
    pub(super) fn pack(&mut self, last: Option<SlotIndex>) -> Size {
        let mut live: Vec<(usize, Region)> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(index, _)| last != Some(*index as SlotIndex))
            .filter_map(|(index, slot)| slot.region().map(|region| (index, region)))
            .collect();
        live.sort_by_key(|(_, region)| region.offset);

        // Copied out first: the slides below may overwrite its old bytes
        let tail = last.and_then(|index| {
            let region = self.slots[index as usize].region()?;
            Some((index as usize, self.buffer[region.offset..region.end()].to_vec()))
        });

        let mut cursor = 0;
        for (index, region) in live {
            if region.offset != cursor {
                self.buffer.copy_within(region.offset..region.end(), cursor);
            }
            self.slots[index].state = SlotState::Live(Region::new(cursor, region.len));
            cursor += region.len;
        }
        if let Some((index, bytes)) = tail {
            let region = Region::new(cursor, bytes.len());
            self.buffer[region.offset..region.end()].copy_from_slice(&bytes);
            self.slots[index].state = SlotState::Live(region);
            cursor = region.end();
        }

        let freed = self.free_list.total_bytes();
        self.free_list.clear();
        self.top = cursor;
        debug!("Arena {} packed {} live bytes, merged {} free bytes", self.id, cursor, freed);
        cursor
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if self.state == ArenaState::Open && self.live_bytes > 0 {
            let live = self.slots.iter().filter(|slot| slot.is_live()).count();
            debug!(
                "Dropping arena {} with {} live allocations ({} bytes); releasing all",
                self.id, live, self.live_bytes
            );
        }
    }
}
