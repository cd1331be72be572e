//! Per-table record of the live native object, if any.
//!
//! Slots hold a packed [`ObjectId`] (0 = empty) and never keep their object
//! alive. The heap clears a slot through [`FreeObserver`] when the object
//! it names is freed. That path may run while another thread reads the
//! table, so each slot is a single atomic word and clearing is a
//! compare-and-swap against the freed handle.

use std::sync::atomic::{AtomicU64, Ordering};

use tern_core::{FreeObserver, ObjectId, TableIndex};

pub struct Instantiations {
    slots: Box<[AtomicU64]>,
}

impl Instantiations {
    pub fn new(table_count: usize) -> Self {
        Self {
            slots: (0..table_count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, table: TableIndex) -> Option<ObjectId> {
        let slot = self.slots.get(table.as_usize())?;
        ObjectId::from_bits(slot.load(Ordering::Acquire))
    }

    pub fn record(&self, table: TableIndex, id: ObjectId) {
        if let Some(slot) = self.slots.get(table.as_usize()) {
            slot.store(id.to_bits(), Ordering::Release);
        }
    }

    /// Empty the slot only if it still names `id`.
    pub fn clear_if(&self, table: TableIndex, id: ObjectId) -> bool {
        let Some(slot) = self.slots.get(table.as_usize()) else {
            return false;
        };
        slot.compare_exchange(id.to_bits(), 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn reset(&self) {
        for slot in self.slots.iter() {
            slot.store(0, Ordering::Release);
        }
    }

    /// Number of occupied slots.
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.load(Ordering::Acquire) != 0)
            .count()
    }
}

impl FreeObserver for Instantiations {
    fn native_object_freed(&self, id: ObjectId, table: TableIndex) {
        if self.clear_if(table, id) {
            log::trace!("native object for table {table} freed");
        }
    }
}
