//! Data table
//!
//! Interns caller-supplied `(key, value)` pairs under dense slot ids, the
//! way `mmdb_builder.rs::encode_and_deduplicate_data` keeps a permanent
//! `HashMap<Vec<u8>, u32>` from a dedup key to an offset: two inserts of the
//! same key return the same slot, and the value is held for the table's
//! lifetime regardless of how many `Data` records still reference it.
//!
//! Per spec's design note, liveness of a slot is not tracked by an
//! active, continuously-updated refcount — coalescence and overwrite can
//! orphan a `Data` record's slot without the engine walking the (possibly
//! now-unreachable) subtree to release it. Instead the table simply holds
//! every interned value until the tree itself is dropped; "liveness" is
//! re-established on demand by walking reachable records (see
//! `Tree::live_data_slots`).

use rustc_hash::FxHashMap;

struct Slot<V> {
    key: Box<[u8]>,
    value: V,
}

/// Interns opaque `(key, value)` pairs and hands back a dense `u32` slot id.
///
/// `V` is the opaque value type; the table never inspects it beyond storing
/// and returning it.
pub struct DataTable<V> {
    by_key: FxHashMap<Box<[u8]>, u32>,
    slots: Vec<Slot<V>>,
}

impl<V> DataTable<V> {
    /// An empty data table
    pub fn new() -> Self {
        Self {
            by_key: FxHashMap::default(),
            slots: Vec::new(),
        }
    }

    /// Intern `key -> value`, returning the slot id.
    ///
    /// If `key` was interned before, the existing slot is returned and
    /// `value` is dropped unused — "two logical inserts of the same key
    /// return the same interned value" per spec.
    pub fn intern(&mut self, key: &[u8], value: V) -> u32 {
        if let Some(&slot) = self.by_key.get(key) {
            return slot;
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            key: key.into(),
            value,
        });
        self.by_key.insert(key.into(), slot);
        slot
    }

    /// Look up an already-interned slot's value
    pub fn value(&self, slot: u32) -> &V {
        &self.slots[slot as usize].value
    }

    /// Look up an already-interned slot's key
    pub fn key(&self, slot: u32) -> &[u8] {
        &self.slots[slot as usize].key
    }

    /// Number of distinct keys ever interned (not the number of reachable
    /// `Data` records, which can be fewer after deletion/coalescence)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if nothing has been interned yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<V> Default for DataTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_dedupes_to_same_slot() {
        let mut table = DataTable::new();
        let a = table.intern(b"k1", "first");
        let b = table.intern(b"k1", "second-should-be-ignored");
        assert_eq!(a, b);
        assert_eq!(*table.value(a), "first");
    }

    #[test]
    fn distinct_keys_get_distinct_slots() {
        let mut table = DataTable::new();
        let a = table.intern(b"k1", 1);
        let b = table.intern(b"k2", 2);
        assert_ne!(a, b);
        assert_eq!(*table.value(a), 1);
        assert_eq!(*table.value(b), 2);
    }

    #[test]
    fn key_lookup_round_trips() {
        let mut table = DataTable::new();
        let slot = table.intern(b"hello", 42);
        assert_eq!(table.key(slot), b"hello");
    }
}
