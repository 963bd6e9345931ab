//! Bit-packed node stream encoder (component G)
//!
//! Walks the finalized tree in traversal order and writes each node's two
//! records as a fixed-width, record-size-dependent byte sequence.
//!
//! The byte layout is taken directly from the little-endian selection
//! formula: `left`/`right` are treated as 32-bit little-endian arrays
//! `[b0,b1,b2,b3]` (`b0` least significant) and a `record_size`-specific
//! subset of those bytes is emitted. This is *not* the big-endian layout
//! `mmdb/tree.rs::write_24bit_node` and friends use for real MMDB files —
//! there is no on-disk-format compatibility goal here (see `DESIGN.md`), so
//! the formula is implemented exactly as given rather than adapted to match
//! the teacher's concrete byte order.

use crate::arena::{Arena, NodeId, Record};
use crate::collab::Serializer;
use crate::data_table::DataTable;
use crate::error::{CidrTreeError, Result};
use crate::network::Network;
use crate::traversal::walk;
use rustc_hash::FxHashMap;
use std::io::Write;

/// Node-record size in bits, fixed at `Tree` construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSize {
    /// 24 bits (3 bytes) per record; 6 bytes per node
    Bits24,
    /// 28 bits per record, packed into a shared nibble byte; 7 bytes per node
    Bits28,
    /// 32 bits (4 bytes) per record; 8 bytes per node
    Bits32,
}

impl RecordSize {
    /// Bytes written per node for this record size
    pub fn node_bytes(self) -> usize {
        match self {
            RecordSize::Bits24 => 6,
            RecordSize::Bits28 => 7,
            RecordSize::Bits32 => 8,
        }
    }
}

/// The fixed width, in record units, of the data-section separator added to
/// a `Data` record's encoded value (spec's `+ 16`).
const DATA_SECTION_SEPARATOR: u32 = 16;

fn record_value<V>(
    record: Record,
    node_count: u32,
    arena: &Arena,
    data_table: &DataTable<V>,
    serializer: &mut dyn Serializer<V>,
    memo: &mut FxHashMap<u32, u32>,
) -> Result<u32> {
    match record {
        Record::Empty => Ok(0),
        Record::Node(id) => Ok(arena.get(id).number),
        Record::Data(slot) => {
            if let Some(&value) = memo.get(&slot) {
                return Ok(value);
            }
            let stored = serializer.store_data(data_table.value(slot));
            let encoded = stored
                .checked_add(node_count)
                .and_then(|v| v.checked_add(DATA_SECTION_SEPARATOR))
                .ok_or_else(|| {
                    CidrTreeError::SerializerContract(
                        "data offset overflowed u32 after node_count + 16 separator".into(),
                    )
                })?;
            memo.insert(slot, encoded);
            Ok(encoded)
        }
    }
}

fn pack_node(record_size: RecordSize, left: u32, right: u32, out: &mut Vec<u8>) {
    let l = left.to_le_bytes();
    let r = right.to_le_bytes();
    match record_size {
        RecordSize::Bits24 => {
            out.extend_from_slice(&[l[1], l[2], l[3], r[1], r[2], r[3]]);
        }
        RecordSize::Bits28 => {
            let shared = ((l[0] & 0x0F) << 4) | (r[0] & 0x0F);
            out.extend_from_slice(&[l[1], l[2], l[3], shared, r[1], r[2], r[3]]);
        }
        RecordSize::Bits32 => {
            out.extend_from_slice(&[l[0], l[1], l[2], l[3], r[0], r[1], r[2], r[3]]);
        }
    }
}

/// Encode the finalized tree rooted at `root` to `sink`, calling
/// `serializer.store_data` at most once per distinct data-table slot
/// encountered.
///
/// `root` must already be numbered (via `traversal::number_nodes`) in the
/// same order this walk will re-derive; the tree must not have mutated in
/// between.
pub fn write_tree<V, S: Serializer<V>, W: Write>(
    arena: &Arena,
    root: NodeId,
    root_network: Network,
    node_count: u32,
    record_size: RecordSize,
    data_table: &DataTable<V>,
    serializer: &mut S,
    sink: &mut W,
) -> Result<()> {
    let mut memo = FxHashMap::default();
    let mut buf = Vec::with_capacity(node_count as usize * record_size.node_bytes());
    let mut first_err: Option<CidrTreeError> = None;

    walk(arena, root, root_network, |_id, node, _net| {
        if first_err.is_some() {
            return;
        }
        let left = record_value(node.left, node_count, arena, data_table, serializer, &mut memo);
        let right = record_value(node.right, node_count, arena, data_table, serializer, &mut memo);
        match (left, right) {
            (Ok(l), Ok(r)) => pack_node(record_size, l, r, &mut buf),
            (Err(e), _) | (_, Err(e)) => first_err = Some(e),
        }
    });

    if let Some(e) = first_err {
        return Err(e);
    }

    sink.write_all(&buf)
        .map_err(|e| CidrTreeError::SerializerContract(e.to_string()))
}
