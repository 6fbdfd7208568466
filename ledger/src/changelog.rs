//! Changelog ring buffer entries.
//!
//! Every successful mutation records the resulting root together with the
//! node values along the mutated leaf's path. A proof generated against an
//! older window root is fast-forwarded by replaying the entries recorded
//! after it: an entry at a different index overwrites exactly one sibling
//! in the proof — the node at the level where the two leaf paths diverge.

use bincode::{Decode, Encode};

use crate::hash::Node;

/// One recorded mutation: the root it produced, the node values along the
/// mutated leaf's path (`path[0]` is the leaf itself), and the leaf index.
#[derive(Debug, Clone, Encode, Decode)]
pub struct ChangeLogEntry {
    /// Root hash after this mutation.
    pub root: Node,
    /// Node value at each level on the mutated leaf's path, leaf first.
    /// `len()` equals the tree depth; the root is stored separately.
    pub path: Vec<Node>,
    /// Index of the mutated leaf.
    pub index: u32,
}

impl ChangeLogEntry {
    /// Replay this entry onto a sibling path for `leaf_index`.
    ///
    /// Must not be called when `self.index == leaf_index`; a newer mutation
    /// of the same leaf invalidates the proof entirely.
    pub(crate) fn apply_to_siblings(&self, leaf_index: u32, siblings: &mut [Node]) {
        let level = critical_level(self.index, leaf_index);
        siblings[level] = self.path[level];
    }
}

/// The level at which the paths of two distinct leaf indices diverge. At
/// that level each index's path node is the other's sibling.
pub(crate) fn critical_level(a: u32, b: u32) -> usize {
    debug_assert_ne!(a, b);
    (31 - (a ^ b).leading_zeros()) as usize
}
