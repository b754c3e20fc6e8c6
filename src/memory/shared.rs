/*!
 * Shared Arena
 *
 * Thread-safe arena handle. Structural and data mutation (allocate, resize,
 * free, write, compact, teardown) serialises on one write lock; reads on
 * stable handles share the read lock. Buffer growth happens under the write
 * lock, so a reader never observes a buffer mid-move.
 */

use super::arena::Arena;
use super::element::{Element, ElementKind, ElementValue};
use super::traits::{Allocator, ArenaInfo};
use super::types::{ArenaStats, Handle, MemoryPressure};
use crate::core::config::ArenaConfig;
use crate::core::errors::ConfigError;
use crate::core::types::{ArenaId, ArenaResult, Size};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable, thread-safe reference to one arena
#[derive(Debug, Clone)]
pub struct SharedArena {
    inner: Arc<RwLock<Arena>>,
}

impl SharedArena {
    pub fn new(initial_capacity: Size) -> Self {
        Self::from_arena(Arena::new(initial_capacity))
    }

    pub fn with_config(config: ArenaConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_arena(Arena::with_config(config)?))
    }

    pub fn from_arena(arena: Arena) -> Self {
        Self {
            inner: Arc::new(RwLock::new(arena)),
        }
    }

    /// Arena id, fixed for the arena's lifetime
    pub fn id(&self) -> ArenaId {
        self.inner.read().id()
    }

    /// Run `f` with shared access to the arena
    pub fn with_arena<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the arena
    pub fn with_arena_mut<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn allocate(&self, count: usize, element_size: usize) -> ArenaResult<Handle> {
        self.inner.write().allocate(count, element_size)
    }

    pub fn allocate_typed<T: Element>(&self, count: usize) -> ArenaResult<Handle> {
        self.inner.write().allocate_typed::<T>(count)
    }

    pub fn allocate_from<T: Element>(&self, values: &[T]) -> ArenaResult<Handle> {
        self.inner.write().allocate_from(values)
    }

    pub fn resize(&self, handle: Handle, new_count: usize) -> ArenaResult<Handle> {
        self.inner.write().resize(handle, new_count)
    }

    pub fn free(&self, handle: Handle) -> ArenaResult<()> {
        self.inner.write().free(handle)
    }

    pub fn teardown(&self) -> ArenaResult<()> {
        self.inner.write().teardown()
    }

    pub fn compact(&self) -> ArenaResult<Size> {
        self.inner.write().compact()
    }

    pub fn write(&self, handle: Handle, data: &[u8]) -> ArenaResult<()> {
        self.inner.write().write(handle, data)
    }

    pub fn write_at(&self, handle: Handle, offset: Size, data: &[u8]) -> ArenaResult<()> {
        self.inner.write().write_at(handle, offset, data)
    }

    pub fn write_elements<T: Element>(&self, handle: Handle, values: &[T]) -> ArenaResult<()> {
        self.inner.write().write_elements(handle, values)
    }

    pub fn write_element<T: Element>(&self, handle: Handle, index: usize, value: T) -> ArenaResult<()> {
        self.inner.write().write_element(handle, index, value)
    }

    /// Read-modify-write one element under a single write-lock acquisition
    ///
    /// Returns the stored value.
    pub fn update_element<T, F>(&self, handle: Handle, index: usize, f: F) -> ArenaResult<T>
    where
        T: Element,
        F: FnOnce(T) -> T,
    {
        let mut arena = self.inner.write();
        let value = f(arena.read_element::<T>(handle, index)?);
        arena.write_element(handle, index, value)?;
        Ok(value)
    }

    /// Copy of a slot's bytes
    pub fn read(&self, handle: Handle) -> ArenaResult<Vec<u8>> {
        self.inner.read().read(handle).map(<[u8]>::to_vec)
    }

    pub fn read_at(&self, handle: Handle, offset: Size, len: Size) -> ArenaResult<Vec<u8>> {
        self.inner
            .read()
            .read_at(handle, offset, len)
            .map(<[u8]>::to_vec)
    }

    /// Borrow a slot's bytes for the duration of `f` without copying
    pub fn with_bytes<R>(&self, handle: Handle, f: impl FnOnce(&[u8]) -> R) -> ArenaResult<R> {
        let arena = self.inner.read();
        arena.read(handle).map(f)
    }

    pub fn read_elements<T: Element>(&self, handle: Handle) -> ArenaResult<Vec<T>> {
        self.inner.read().read_elements(handle)
    }

    pub fn read_element<T: Element>(&self, handle: Handle, index: usize) -> ArenaResult<T> {
        self.inner.read().read_element(handle, index)
    }

    pub fn read_value(&self, handle: Handle, index: usize) -> ArenaResult<ElementValue> {
        self.inner.read().read_value(handle, index)
    }

    pub fn is_valid(&self, handle: Handle) -> bool {
        self.inner.read().is_valid(handle)
    }

    pub fn size_of(&self, handle: Handle) -> ArenaResult<Size> {
        self.inner.read().size_of(handle)
    }

    pub fn len(&self, handle: Handle) -> ArenaResult<usize> {
        self.inner.read().len(handle)
    }

    pub fn kind(&self, handle: Handle) -> ArenaResult<ElementKind> {
        self.inner.read().kind(handle)
    }

    pub fn capacity(&self) -> Size {
        self.inner.read().capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().is_closed()
    }

    pub fn stats(&self) -> ArenaStats {
        self.inner.read().stats()
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.inner.read().pressure()
    }
}

impl Default for SharedArena {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Allocator for Arena {
    fn allocate(&mut self, count: usize, element_size: usize) -> ArenaResult<Handle> {
        Arena::allocate(self, count, element_size)
    }

    fn resize(&mut self, handle: Handle, new_count: usize) -> ArenaResult<Handle> {
        Arena::resize(self, handle, new_count)
    }

    fn free(&mut self, handle: Handle) -> ArenaResult<()> {
        Arena::free(self, handle)
    }

    fn is_valid(&self, handle: Handle) -> bool {
        Arena::is_valid(self, handle)
    }

    fn size_of(&self, handle: Handle) -> ArenaResult<Size> {
        Arena::size_of(self, handle)
    }
}

impl ArenaInfo for Arena {
    fn stats(&self) -> ArenaStats {
        Arena::stats(self)
    }

    fn is_closed(&self) -> bool {
        Arena::is_closed(self)
    }

    fn pressure(&self) -> MemoryPressure {
        Arena::pressure(self)
    }
}

impl Allocator for SharedArena {
    fn allocate(&mut self, count: usize, element_size: usize) -> ArenaResult<Handle> {
        SharedArena::allocate(self, count, element_size)
    }

    fn resize(&mut self, handle: Handle, new_count: usize) -> ArenaResult<Handle> {
        SharedArena::resize(self, handle, new_count)
    }

    fn free(&mut self, handle: Handle) -> ArenaResult<()> {
        SharedArena::free(self, handle)
    }

    fn is_valid(&self, handle: Handle) -> bool {
        SharedArena::is_valid(self, handle)
    }

    fn size_of(&self, handle: Handle) -> ArenaResult<Size> {
        SharedArena::size_of(self, handle)
    }
}

impl ArenaInfo for SharedArena {
    fn stats(&self) -> ArenaStats {
        SharedArena::stats(self)
    }

    fn is_closed(&self) -> bool {
        SharedArena::is_closed(self)
    }

    fn pressure(&self) -> MemoryPressure {
        SharedArena::pressure(self)
    }
}
