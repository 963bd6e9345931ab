//! Iterator callback contract (component H)
//!
//! `Tree::iterate` walks the DAG once and, for each record position (left
//! and right of every reachable node), invokes exactly one `TreeVisitor`
//! method with positional metadata describing both the containing node's
//! prefix and the prefix of the half selected by `dir`.

use crate::network::Network;

/// Which child record a callback invocation describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    /// Left child (bit 0)
    Left,
    /// Right child (bit 1)
    Right,
}

/// Visitor invoked once per record position during `Tree::iterate`.
///
/// Return values are ignored; a visitor must not attempt to mutate the tree
/// it is iterating (there is no mutable handle available to it).
pub trait TreeVisitor<V> {
    /// `dir` of `node_number` refines into another node, `next_node_number`
    fn on_node_record(
        &mut self,
        node_number: u32,
        dir: Dir,
        current: Network,
        next: Network,
        next_node_number: u32,
    );

    /// `dir` of `node_number` carries no information
    fn on_empty_record(&mut self, node_number: u32, dir: Dir, current: Network, next: Network);

    /// `dir` of `node_number` resolves entirely to `value`
    fn on_data_record(
        &mut self,
        node_number: u32,
        dir: Dir,
        current: Network,
        next: Network,
        value: &V,
    );
}
