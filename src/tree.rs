//! Tree core (component D)
//!
//! Insert, delete, lookup, aliasing and reserved-prefix deletion, plus the
//! finalize/iterate/write_tree entry points that hand off to traversal,
//! numbering and encoding. Grounded throughout in `ip_tree_builder.rs`'s
//! `IpTreeBuilder` (arena-backed descent, `backfill_less_specific`-style
//! allocate-on-descent) and `mmdb/tree.rs`'s `SearchTree::lookup_v4/v6`
//! (bail-on-non-node descent for reads).

use crate::arena::{Arena, NodeId, Record};
use crate::collab::{Merger, Serializer};
use crate::data_table::DataTable;
use crate::encoder::{self, RecordSize};
use crate::error::{CidrTreeError, Result};
use crate::network::{
    address_bytes, ipv4_mapped_alias_prefix, ipv4_mapped_prefix, six_to_four_alias_prefix, Family,
    Network,
};
use crate::reserved;
use crate::traversal;
use crate::visitor::{Dir, TreeVisitor};
use std::collections::HashSet;
use std::io::Write;
use std::net::IpAddr;

/// The tree engine: one binary trie per IP family, mapping CIDR networks to
/// opaque interned values.
pub struct Tree<V> {
    family: Family,
    record_size: RecordSize,
    root: NodeId,
    arena: Arena,
    data_table: DataTable<V>,
    finalized: bool,
    node_count: u32,
    merge_record_collisions: bool,
    merger: Option<Box<dyn Merger<V>>>,
}

impl<V> Tree<V> {
    /// Construct an empty tree. `record_size` constrains `write_tree` only;
    /// it has no effect on insert/lookup/delete.
    pub fn new(family: Family, record_size: RecordSize, arena_chunk_size: u32) -> Self {
        let mut arena = Arena::new(arena_chunk_size);
        let root = arena.new_node();
        Self {
            family,
            record_size,
            root,
            arena,
            data_table: DataTable::new(),
            finalized: false,
            node_count: 0,
            merge_record_collisions: false,
            merger: None,
        }
    }

    /// Enable or disable merge-on-collision. A tree with this enabled but no
    /// merger installed falls back to unconditional override, since there is
    /// nothing to call.
    pub fn with_merge_record_collisions(mut self, enabled: bool) -> Self {
        self.merge_record_collisions = enabled;
        self
    }

    /// Install the external merge policy used when
    /// `merge_record_collisions` is enabled and an insert collides with an
    /// existing `Data` record under a different key.
    pub fn with_merger<M: Merger<V> + 'static>(mut self, merger: M) -> Self {
        self.merger = Some(Box::new(merger));
        self
    }

    /// IP family this tree was constructed for
    pub fn family(&self) -> Family {
        self.family
    }

    /// Number of distinct reachable nodes. Only meaningful after `finalize`.
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    fn root_network(&self) -> Network {
        Network::from_bytes([0u8; 16], 0, self.family)
    }

    /// Descend `network.mask_length() - 1` bits from the root, allocating
    /// fresh nodes through `Empty` and splitting `Data` records (duplicating
    /// the data into both new children) as needed. Always returns a node at
    /// the exact depth the final bit should be written to.
    fn descend_allocate(&mut self, network: Network) -> NodeId {
        let mut current = self.root;
        for depth in 0..network.mask_length().saturating_sub(1) {
            let bit = network.bit_at(depth);
            match self.arena.get(current).child(bit) {
                Record::Node(id) => current = id,
                Record::Empty => {
                    let new_id = self.arena.new_node();
                    self.arena.get_mut(current).set_child(bit, Record::Node(new_id));
                    current = new_id;
                }
                Record::Data(slot) => {
                    let new_id = self.arena.new_node();
                    self.arena.get_mut(new_id).left = Record::Data(slot);
                    self.arena.get_mut(new_id).right = Record::Data(slot);
                    self.arena.get_mut(current).set_child(bit, Record::Node(new_id));
                    current = new_id;
                }
            }
        }
        current
    }

    /// Descend up to `limit` bits without allocating, stopping at the first
    /// non-`Node` record. Returns the node holding that record and the bit
    /// depth at which it was found (`== limit` if every tested bit was a
    /// `Node`, leaving the final bit at `limit` untested).
    fn descend_bail(&self, network: Network, limit: u8) -> (NodeId, u8) {
        let mut current = self.root;
        let mut depth = 0u8;
        while depth < limit {
            let bit = network.bit_at(depth);
            match self.arena.get(current).child(bit) {
                Record::Node(id) => {
                    current = id;
                    depth += 1;
                }
                _ => return (current, depth),
            }
        }
        (current, depth)
    }

    /// Resolve the merge-on-collision policy for a write about to happen at
    /// `(node, bit)`. Returns the data-table slot that should ultimately be
    /// written: `incoming_slot` unchanged unless merging applies.
    fn resolve_merge(&mut self, node: NodeId, bit: u8, incoming_slot: u32) -> u32 {
        if !self.merge_record_collisions {
            return incoming_slot;
        }
        let existing_slot = match self.arena.get(node).child(bit) {
            Record::Data(slot) => slot,
            _ => return incoming_slot,
        };
        if existing_slot == incoming_slot {
            return incoming_slot;
        }
        let Some(merger) = self.merger.as_mut() else {
            return incoming_slot;
        };
        let merged_value = merger.merge(
            self.data_table.value(existing_slot),
            self.data_table.value(incoming_slot),
        );
        let mut merged_key = self.data_table.key(existing_slot).to_vec();
        merged_key.push(0);
        merged_key.extend_from_slice(self.data_table.key(incoming_slot));
        self.data_table.intern(&merged_key, merged_value)
    }

    /// Write `record` at the exact leaf position named by `network`,
    /// allocating through it like any insert, but without running the
    /// sibling-coalescence check. Used for the single coalescence bubble-up
    /// step so that bubbling never itself cascades further (see
    /// `insert_network`).
    fn bubble_coalesced(&mut self, network: Network, record: Record) {
        let node = self.descend_allocate(network);
        let bit = network.bit_at(network.mask_length() - 1);
        self.arena.get_mut(node).set_child(bit, record);
    }

    /// Insert `network → value` under `key`, overriding whatever currently
    /// occupies the addresses `network` covers.
    ///
    /// Coalescence bubbles the new record up **exactly one** prefix level
    /// when doing so would make both children of the parent's node
    /// identical `Data` records — a plain write, not a recheck, so a run of
    /// identical siblings several levels deep collapses one level at a time
    /// rather than cascading all the way to the root in a single call. See
    /// `DESIGN.md` for why this one-hop rule (rather than literally
    /// recursing the whole insert) is what reproduces the tree shape the
    /// corpus's own coalescence tests expect.
    pub fn insert_network(&mut self, network: Network, key: &[u8], value: V) -> Result<()> {
        if network.family() != self.family {
            return Err(CidrTreeError::VersionMismatch);
        }

        let incoming_slot = self.data_table.intern(key, value);
        let node = self.descend_allocate(network);
        let bit = network.bit_at(network.mask_length() - 1);
        let final_slot = self.resolve_merge(node, bit, incoming_slot);
        let new_record = Record::Data(final_slot);

        let sibling_bit = 1 - bit;
        if let Record::Data(sib_slot) = self.arena.get(node).child(sibling_bit) {
            if sib_slot == final_slot && network.mask_length() > 1 {
                self.bubble_coalesced(network.prefix_parent(), new_record);
            }
        }
        self.arena.get_mut(node).set_child(bit, new_record);
        self.finalized = false;
        Ok(())
    }

    /// Remove whatever record `network` resolves to, replacing it with
    /// `Empty`. A no-op if `network` is not currently covered by any
    /// non-empty record. Does not compact interior nodes left behind.
    pub fn delete_network(&mut self, network: Network) -> Result<()> {
        if network.family() != self.family {
            return Err(CidrTreeError::VersionMismatch);
        }

        let limit = network.mask_length() - 1;
        let (node, depth) = self.descend_bail(network, limit);

        if depth < limit {
            let bit = network.bit_at(depth);
            match self.arena.get(node).child(bit) {
                Record::Empty => return Ok(()),
                Record::Data(_) => {
                    // Covered by a broader Data record above the target depth;
                    // split down to the exact position (preserving the data in
                    // the untouched half at each split) and clear only that leaf.
                    let target = self.descend_allocate(network);
                    let final_bit = network.bit_at(network.mask_length() - 1);
                    self.arena.get_mut(target).set_child(final_bit, Record::Empty);
                }
                Record::Node(_) => unreachable!("descend_bail only stops on a non-Node record"),
            }
        } else {
            let bit = network.bit_at(limit);
            if self.arena.get(node).child(bit).is_empty() {
                return Ok(());
            }
            self.arena.get_mut(node).set_child(bit, Record::Empty);
        }
        self.finalized = false;
        Ok(())
    }

    /// Resolve the value covering `addr`, if any.
    ///
    /// `Err(UnexpectedNode)` indicates descent consumed every address bit
    /// and still landed on a `Node` record — there are no bits left to
    /// choose a child with, so the tree is malformed.
    pub fn lookup_ip(&self, addr: IpAddr) -> Result<Option<&V>> {
        let (bytes, family) = address_bytes(addr);
        if family != self.family {
            return Err(CidrTreeError::VersionMismatch);
        }

        let max_depth = self.family.max_depth();
        let network = Network::from_bytes(bytes, max_depth, self.family);
        let limit = max_depth - 1;
        let (node, depth) = self.descend_bail(network, limit);
        let bit = network.bit_at(depth);

        match self.arena.get(node).child(bit) {
            Record::Empty => Ok(None),
            Record::Data(slot) => Ok(Some(self.data_table.value(slot))),
            Record::Node(_) => Err(CidrTreeError::UnexpectedNode),
        }
    }

    /// Attach the IPv4-in-IPv6 alias edges (`::ffff:0:0/95`, `2002::/16`) to
    /// whatever currently occupies `::ffff:0:0/96` (the embedded IPv4 root).
    /// A no-op on v4 trees and on v6 trees carrying no IPv4 data at all.
    ///
    /// The aliased position may hold a `Node` (the common case — a whole
    /// subtree reused by identity, producing a DAG) or a `Data` record (a
    /// single value copied to the alias positions); either is a plain
    /// `Record` copy, not a clone of any subtree.
    pub fn alias_ipv4(&mut self) -> Result<()> {
        if self.family != Family::V6 {
            return Ok(());
        }

        let v4_prefix = ipv4_mapped_prefix();
        let limit = v4_prefix.mask_length() - 1;
        let (node, depth) = self.descend_bail(v4_prefix, limit);
        if depth < limit {
            return Ok(());
        }
        let final_bit = v4_prefix.bit_at(limit);
        let v4_root_record = self.arena.get(node).child(final_bit);
        if v4_root_record.is_empty() {
            return Ok(());
        }

        for alias_prefix in [ipv4_mapped_alias_prefix(), six_to_four_alias_prefix()] {
            let target = self.descend_allocate(alias_prefix);
            let bit = alias_prefix.bit_at(alias_prefix.mask_length() - 1);
            self.arena.get_mut(target).set_child(bit, v4_root_record);
        }
        self.finalized = false;
        Ok(())
    }

    /// Delete the built-in reserved-prefix tables (`reserved.rs`): the IPv4
    /// table for a v4 tree, or both the v4-mapped IPv4 table and the native
    /// IPv6 table for a v6 tree.
    pub fn delete_reserved_networks(&mut self) -> Result<()> {
        match self.family {
            Family::V4 => {
                for entry in reserved::IPV4_RESERVED {
                    let net = Network::parse(entry.text, entry.mask_length, Family::V4)?;
                    self.delete_network(net)?;
                }
            }
            Family::V6 => {
                for entry in reserved::IPV4_RESERVED {
                    let net = Network::parse(entry.text, entry.mask_length, Family::V6)?;
                    self.delete_network(net)?;
                }
                for entry in reserved::IPV6_RESERVED {
                    let net = Network::parse(entry.text, entry.mask_length, Family::V6)?;
                    self.delete_network(net)?;
                }
            }
        }
        Ok(())
    }

    /// Assign dense node numbers via a single traversal. Idempotent while
    /// the tree is unmutated; any mutating call above resets `finalized` to
    /// `false` so the next `finalize`/`write_tree` renumbers.
    pub fn finalize(&mut self) -> u32 {
        if !self.finalized {
            let root_network = self.root_network();
            self.node_count = traversal::number_nodes(&mut self.arena, self.root, root_network);
            self.finalized = true;
        }
        self.node_count
    }

    /// Finalize, then encode the bit-packed record stream to `sink` at this
    /// tree's configured `record_size`, calling `serializer.store_data` once
    /// per distinct reachable data value.
    pub fn write_tree<S: Serializer<V>, W: Write>(
        &mut self,
        sink: &mut W,
        serializer: &mut S,
    ) -> Result<()> {
        self.finalize();
        let root_network = self.root_network();
        encoder::write_tree(
            &self.arena,
            self.root,
            root_network,
            self.node_count,
            self.record_size,
            &self.data_table,
            serializer,
            sink,
        )
    }

    /// Walk every reachable record once, invoking `visitor` with positional
    /// metadata. `node_number` values reflect the last `finalize()` call;
    /// call `finalize()` first for meaningful numbers.
    pub fn iterate<Vis: TreeVisitor<V>>(&self, visitor: &mut Vis) {
        let root_network = self.root_network();
        traversal::walk(&self.arena, self.root, root_network, |_id, node, current| {
            for (bit, dir) in [(0u8, Dir::Left), (1u8, Dir::Right)] {
                let next = current.child(bit);
                match node.child(bit) {
                    Record::Empty => visitor.on_empty_record(node.number, dir, current, next),
                    Record::Data(slot) => visitor.on_data_record(
                        node.number,
                        dir,
                        current,
                        next,
                        self.data_table.value(slot),
                    ),
                    Record::Node(id) => visitor.on_node_record(
                        node.number,
                        dir,
                        current,
                        next,
                        self.arena.get(id).number,
                    ),
                }
            }
        });
    }

    /// Data-table slots still referenced by a reachable `Data` record.
    /// Re-derived on demand by walking the tree rather than tracked
    /// incrementally, since coalescence and overwrite can orphan a slot's
    /// only referencing record without the engine visiting it again.
    pub fn live_data_slots(&self) -> HashSet<u32> {
        let mut slots = HashSet::new();
        let root_network = self.root_network();
        traversal::walk(&self.arena, self.root, root_network, |_id, node, _net| {
            for bit in [0u8, 1u8] {
                if let Record::Data(slot) = node.child(bit) {
                    slots.insert(slot);
                }
            }
        });
        slots
    }
}
