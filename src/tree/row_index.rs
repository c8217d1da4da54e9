//! Advisory cache of flat row indices.
//!
//! Index adjustments may arrive from a notification path that is not the
//! call stack of the mutation that caused them, so the whole table sits
//! behind one mutex. A missing entry is never an error: callers fall back
//! to a depth-first scan and repopulate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::ItemId;

#[derive(Debug, Default)]
pub(crate) struct RowIndexCache {
    rows: Mutex<HashMap<ItemId, usize>>,
    /// Full passes over the table made by `increment_from`/`decrement_after`
    shifts: AtomicUsize,
}

impl RowIndexCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<ItemId, usize>> {
        // The map holds plain integers; a panic mid-update cannot leave it torn.
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get(&self, id: ItemId) -> Option<usize> {
        self.lock().get(&id).copied()
    }

    pub(crate) fn set(&self, id: ItemId, row: usize) {
        self.lock().insert(id, row);
    }

    pub(crate) fn forget(&self, id: ItemId) {
        self.lock().remove(&id);
    }

    /// Shift every cached row at or after `row` down by one (an insert at `row`).
    pub(crate) fn increment_from(&self, row: usize) {
        self.shifts.fetch_add(1, Ordering::Relaxed);
        for cached in self.lock().values_mut() {
            if *cached >= row {
                *cached += 1;
            }
        }
    }

    /// Shift every cached row after `row` up by one (a removal at `row`).
    pub(crate) fn decrement_after(&self, row: usize) {
        self.shifts.fetch_add(1, Ordering::Relaxed);
        for cached in self.lock().values_mut() {
            if *cached > row {
                *cached -= 1;
            }
        }
    }

    pub(crate) fn invalidate_all(&self) {
        self.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn shift_count(&self) -> usize {
        self.shifts.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(slot: usize) -> ItemId {
        ItemId {
            slot,
            generation: 0,
        }
    }

    #[test]
    fn test_shift_on_insert_and_remove() {
        let cache = RowIndexCache::default();
        cache.set(id(0), 0);
        cache.set(id(1), 1);
        cache.set(id(2), 2);

        cache.increment_from(1);
        assert_eq!(cache.get(id(0)), Some(0));
        assert_eq!(cache.get(id(1)), Some(2));
        assert_eq!(cache.get(id(2)), Some(3));

        cache.decrement_after(0);
        assert_eq!(cache.get(id(0)), Some(0));
        assert_eq!(cache.get(id(1)), Some(1));
        assert_eq!(cache.get(id(2)), Some(2));
        assert_eq!(cache.shift_count(), 2);
    }

    #[test]
    fn test_forget_and_invalidate() {
        let cache = RowIndexCache::default();
        cache.set(id(4), 7);
        cache.forget(id(4));
        assert_eq!(cache.get(id(4)), None);

        cache.set(id(1), 1);
        cache.set(id(2), 2);
        cache.invalidate_all();
        assert_eq!(cache.len(), 0);
    }
}
