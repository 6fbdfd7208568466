use bramble_ledger::{empty_subtree_root, node_hash, Node, ProofPath, MAX_DEPTH};

use crate::MirrorError;

/// A proof produced by the mirror: the root it was generated against, the
/// leaf value at the proved index, and the sibling path. Exactly the
/// artifacts [`replace_with_proof`](bramble_ledger::MerkleLedger) consumes.
#[derive(Debug, Clone)]
pub struct MirrorProof {
    pub root: Node,
    pub leaf: Node,
    pub path: ProofPath,
}

/// A full-depth local shadow of a concurrent Merkle ledger.
///
/// Keeps every node of the tree so proofs can be generated without a trust
/// boundary. Not authoritative: after every confirmed on-ledger mutation
/// the owner must call [`update_leaf`](LedgerMirror::update_leaf) with the
/// same leaf at the same index, in confirmation order. Skipped or
/// out-of-order updates desynchronize the mirror and every proof it
/// generates afterwards will be rejected — that is a caller bug, not a
/// protocol condition.
#[derive(Debug, Clone)]
pub struct LedgerMirror {
    depth: u8,
    /// `levels[0]` holds the `2^depth` leaves; `levels[depth]` is the root.
    levels: Vec<Vec<Node>>,
}

impl LedgerMirror {
    /// Create a mirror of an empty ledger of the given depth (1..=20).
    ///
    /// The initial root equals the empty ledger's root.
    pub fn new(depth: u8) -> Result<Self, MirrorError> {
        if !(1..=MAX_DEPTH).contains(&depth) {
            return Err(MirrorError::InvalidData(format!(
                "depth must be between 1 and {}, got {}",
                MAX_DEPTH, depth
            )));
        }
        let levels = (0..=depth)
            .map(|level| vec![empty_subtree_root(level); 1 << (depth - level)])
            .collect();
        Ok(Self { depth, levels })
    }

    /// Tree depth.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of leaf slots.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Current mirror root.
    pub fn root(&self) -> Node {
        self.levels[self.depth as usize][0]
    }

    /// Leaf value at `index`.
    pub fn leaf(&self, index: u32) -> Result<Node, MirrorError> {
        self.check_index(index)?;
        Ok(self.levels[0][index as usize])
    }

    /// Write `leaf` at `index` and recompute its ancestors up to the root.
    ///
    /// Returns the new root. O(depth).
    pub fn update_leaf(&mut self, index: u32, leaf: Node) -> Result<Node, MirrorError> {
        self.check_index(index)?;
        self.levels[0][index as usize] = leaf;
        let mut idx = index as usize;
        for level in 0..self.depth as usize {
            idx >>= 1;
            let parent = node_hash(
                &self.levels[level][2 * idx],
                &self.levels[level][2 * idx + 1],
            );
            self.levels[level + 1][idx] = parent;
        }
        Ok(self.root())
    }

    /// Generate an inclusion proof for the leaf at `index` against the
    /// current mirror root.
    pub fn proof(&self, index: u32) -> Result<MirrorProof, MirrorError> {
        self.check_index(index)?;
        let nodes = (0..self.depth as usize)
            .map(|level| self.levels[level][(index as usize >> level) ^ 1])
            .collect();
        Ok(MirrorProof {
            root: self.root(),
            leaf: self.levels[0][index as usize],
            path: ProofPath::new(nodes),
        })
    }

    fn check_index(&self, index: u32) -> Result<(), MirrorError> {
        if index as u64 >= self.capacity() {
            return Err(MirrorError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}
