//! Multiple-reader / single-writer latch guarding one shared collection.
//!
//! Every shared collection in the engine lives behind its own [`RwLatch`].
//! Access is scoped: callers hand in a closure and the lock is released when
//! the closure returns, so no holder can carry a lock across a reconciliation
//! phase or into another collection's latch by accident.
//!
//! ## Fairness
//! The latch is backed by [`parking_lot::RwLock`], which is task-fair: once a
//! writer is parked, newly arriving readers queue behind it. A continuous
//! stream of overlapping readers therefore cannot starve a writer, unlike the
//! "first reader locks, last reader unlocks" counting scheme. The cost is that
//! shared access must never be acquired recursively on the same latch: a
//! reader that re-enters `read` while a writer waits will deadlock.


use parking_lot::RwLock;
use tracing::trace;

pub struct RwLatch<T> {
    name: &'static str,
    inner: RwLock<T>,
}

impl<T> RwLatch<T> {
    pub fn new(
        name: &'static str,
        value: T,
    ) -> Self {
        Self {
            name,
            inner: RwLock::new(value),
        }
    }

    /// Name used in trace output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shared access. Any number of readers may hold the latch at once while
    /// no writer is active.
    pub fn read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        trace!(latch = self.name, "acquire shared");
        let guard = self.inner.read();
        f(&guard)
    }

    /// Exclusive access. Excludes all readers and other writers.
    pub fn write<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        trace!(latch = self.name, "acquire exclusive");
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Shared access without blocking. Returns `None` if a writer holds the
    /// latch or is parked waiting for it.
    pub fn try_read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        self.inner.try_read().map(|guard| f(&guard))
    }

    /// Exclusive access without blocking. Returns `None` if any holder is active.
    pub fn try_write<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.inner.try_write().map(|mut guard| f(&mut guard))
    }
}

impl<T: Default> Default for RwLatch<T> {
    fn default() -> Self {
        Self::new("unnamed", T::default())
    }
}

impl<T> std::fmt::Debug for RwLatch<T> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RwLatch").field("name", &self.name).finish()
    }
}
