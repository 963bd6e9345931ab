//! Traversal and numbering (components E and F)
//!
//! A single depth-first walk from the root, visiting each node identity at
//! most once via a `seen` vector keyed by node id (dense arena ids make this
//! cheaper than a hash set). Aliasing makes the structure a DAG rather than
//! a tree, so the `seen` check is what keeps `alias_ipv4` from causing a
//! node to be visited — and so numbered or encoded — twice.
//!
//! Finalization (numbering) and encoding/iteration both walk in this same
//! left-before-right, pre-order sequence; as long as the tree hasn't
//! mutated between a `finalize()` and a later `write_tree`/`iterate` call,
//! re-running the same deterministic walk reproduces the exact order used
//! for numbering.

use crate::arena::{Arena, Node, NodeId, Record};
use crate::network::Network;

/// Depth-first, pre-order walk of the reachable node DAG starting at
/// `root`. `visit` is called once per distinct node id, before its
/// children are visited, with the node's prefix (`current`) as reached by
/// this walk.
pub fn walk<F>(arena: &Arena, root: NodeId, root_network: Network, mut visit: F)
where
    F: FnMut(NodeId, Node, Network),
{
    let mut seen = vec![false; arena.len() as usize];
    walk_rec(arena, root, root_network, &mut seen, &mut visit);
}

fn walk_rec<F>(arena: &Arena, id: NodeId, network: Network, seen: &mut [bool], visit: &mut F)
where
    F: FnMut(NodeId, Node, Network),
{
    if seen[id as usize] {
        return;
    }
    seen[id as usize] = true;
    let node = *arena.get(id);
    visit(id, node, network);
    if let Record::Node(left_id) = node.left {
        walk_rec(arena, left_id, network.child(0), seen, visit);
    }
    if let Record::Node(right_id) = node.right {
        walk_rec(arena, right_id, network.child(1), seen, visit);
    }
}

/// Run the walk and assign dense ordinals in visitation order.
///
/// Returns the number of distinct nodes visited (`node_count`). The root is
/// visited first and therefore always receives number `0` — the same value
/// as the `Empty` sentinel in the encoded form, which is safe only because
/// no record ever points at the root (see `encoder.rs`).
pub fn number_nodes(arena: &mut Arena, root: NodeId, root_network: Network) -> u32 {
    let mut order = Vec::new();
    walk(arena, root, root_network, |id, _node, _net| order.push(id));
    for (number, id) in order.iter().enumerate() {
        arena.get_mut(*id).number = number as u32;
    }
    order.len() as u32
}
