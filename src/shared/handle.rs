//! Shared record handles.
//!
//! Records whose identity must survive updates (guilds, channels, members,
//! users, messages) are stored behind a `Shared<T>`. The cache never swaps the
//! handle out while the entity exists, so a handle returned by an earlier
//! query observes every later update.
//!
//! Consumers only get snapshots: `read` clones the current `Arc<T>` and
//! releases the slot lock before returning. A snapshot can be kept across
//! further cache calls, and it never blocks a writer. Writes are crate-only
//! and happen while the owning store's write lock is held, so they stay
//! ordered by that lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Live, read-only handle onto a cached record.
pub struct Shared<T> {
    slot: Arc<RwLock<Arc<T>>>,
}

impl<T> Shared<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(value))),
        }
    }

    /// Snapshot of the current value.
    pub fn read(&self) -> Arc<T> {
        Arc::clone(&self.slot.read())
    }

    /// Whether both handles refer to the same cached record.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.slot, &other.slot)
    }

    /// Publish `value` as the record's new state.
    pub(crate) fn replace(&self, value: T) {
        *self.slot.write() = Arc::new(value);
    }
}

impl<T: Clone> Shared<T> {
    /// Mutate the record and publish the result. Snapshots taken earlier keep
    /// the old value; the copy is made only when such a snapshot exists.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut slot = self.slot.write();
        f(Arc::make_mut(&mut slot))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.read()).finish()
    }
}

/// Wrap a record in a fresh handle.
#[inline]
pub(crate) fn shared<T>(value: T) -> Shared<T> {
    Shared::new(value)
}
