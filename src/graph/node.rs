//! Node numbering shared by the graph, the search and the report.
//!
//! Node 0 is the depot. Loads are numbered by slot, their 1-based position
//! in the input list: the load in slot `k` owns start node `2k - 1` and end
//! node `2k`. Slots keep the graph dense whatever the load ids are; the
//! graph maps slots back to ids.

/// The depot node.
pub const DEPOT: usize = 0;

/// Start (pickup) node of the load in `slot`. `slot` must be positive.
pub fn start_node(slot: usize) -> usize {
    2 * slot - 1
}

/// End (drop-off) node of the load in `slot`. `slot` must be positive.
pub fn end_node(slot: usize) -> usize {
    2 * slot
}

/// Slot of the load owning a non-depot node.
pub fn slot_of(node: usize) -> usize {
    (node + 1) / 2
}
