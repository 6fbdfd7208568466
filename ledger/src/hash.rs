use crate::LedgerError;

/// A 32-byte tree node. Leaves enter the tree as raw 32-byte values; they
/// are already hashes of the record they represent.
pub type Node = [u8; 32];

/// The all-zero node: the value of an empty (never populated) or deleted
/// (tombstoned) leaf slot.
pub const EMPTY_NODE: Node = [0u8; 32];

/// Maximum supported tree depth. Bounds u32 leaf indexing and the memory a
/// full-depth mirror needs for its node pyramid.
pub const MAX_DEPTH: u8 = 20;

/// Validate that depth is in the allowed range [1, 20].
pub(crate) fn validate_depth(depth: u8) -> Result<(), LedgerError> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(LedgerError::InvalidData(format!(
            "depth must be between 1 and {}, got {}",
            MAX_DEPTH, depth
        )));
    }
    Ok(())
}

/// Compute the hash of an internal node: `blake3(left || right)`.
pub fn node_hash(left: &Node, right: &Node) -> Node {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

/// Root of a fully-empty subtree of the given height.
///
/// Level 0 is the empty leaf itself; level `h` is the hash of two empty
/// level `h-1` subtrees.
pub fn empty_subtree_root(level: u8) -> Node {
    let mut node = EMPTY_NODE;
    for _ in 0..level {
        node = node_hash(&node, &node);
    }
    node
}
