//! Sibling paths for leaf inclusion proofs.
//!
//! A `ProofPath` carries one sibling node per level, ordered from the leaf
//! level upward. Combined with a leaf value and its index, the path
//! reconstructs a root hash; whether that root is acceptable is decided by
//! the ledger's changelog window, not here.

use bincode::{Decode, Encode};

use crate::{
    hash::{node_hash, Node},
    LedgerError,
};

/// A Merkle sibling path, level 0 (the leaf's sibling) first.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ProofPath {
    /// One sibling node per tree level; `len()` equals the tree depth.
    pub nodes: Vec<Node>,
}

impl ProofPath {
    /// Wrap a sibling path. `nodes[0]` must be the leaf-level sibling.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Number of levels covered by this path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path carries no siblings at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, LedgerError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| LedgerError::InvalidData(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects paths longer than [`MAX_DEPTH`](crate::MAX_DEPTH).
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, LedgerError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (path, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| LedgerError::InvalidData(format!("decode error: {}", e)))?;
        if path.nodes.len() > crate::MAX_DEPTH as usize {
            return Err(LedgerError::InvalidData(format!(
                "proof path has {} levels, exceeding the maximum depth {}",
                path.nodes.len(),
                crate::MAX_DEPTH
            )));
        }
        Ok(path)
    }
}

/// Fold a leaf value up a sibling path and return the resulting root.
///
/// At each level the index's low bit selects whether the running node is the
/// left or right child.
pub fn recompute_root(leaf: Node, index: u32, path: &ProofPath) -> Node {
    fold_siblings(leaf, index, &path.nodes)
}

/// Fold over a raw sibling slice. Shared by [`recompute_root`] and the
/// ledger's internal path computations.
pub(crate) fn fold_siblings(leaf: Node, index: u32, siblings: &[Node]) -> Node {
    let mut node = leaf;
    let mut idx = index;
    for sibling in siblings {
        node = if idx & 1 == 1 {
            node_hash(sibling, &node)
        } else {
            node_hash(&node, sibling)
        };
        idx >>= 1;
    }
    node
}
