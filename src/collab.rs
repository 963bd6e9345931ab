//! External collaborator traits
//!
//! The tree engine consumes two external collaborators during mutation and
//! encoding: a `Merger` (optional data-merge-on-collision policy) and a
//! `Serializer` (the data-section encoder, out of scope for this crate).
//! Grounded in `mmdb_builder.rs`, whose `encode_and_deduplicate_data` is the
//! concrete analogue of `Serializer::store_data`: store a value once, return
//! an offset, memoize by key so repeats don't re-store.

/// Combines two colliding data values into one, used when a tree is
/// configured with `merge_record_collisions = true` (see
/// `Tree::with_merge_record_collisions`).
pub trait Merger<V> {
    /// Combine `existing` (already installed at the target leaf) with
    /// `incoming` (about to be inserted), producing the merged value that
    /// replaces both.
    fn merge(&mut self, existing: &V, incoming: &V) -> V;
}

/// The data-section encoder: stores one value and returns its byte offset.
///
/// Implementations must be idempotent in the sense the engine relies on: the
/// engine will call `store_data` at most once per distinct `Data` record
/// emitted during a single `Tree::write_tree` (it memoizes by data-table
/// slot), but nothing stops a caller from interning the same value under
/// multiple keys, so `store_data` itself still needs to handle repeats
/// sanely if that matters to the outer format.
pub trait Serializer<V> {
    /// Store `value` and return its offset into the (externally-owned) data
    /// section.
    fn store_data(&mut self, value: &V) -> u32;
}
