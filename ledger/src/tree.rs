use std::collections::VecDeque;

use crate::{
    changelog::{critical_level, ChangeLogEntry},
    hash::{empty_subtree_root, validate_depth, Node, EMPTY_NODE},
    proof::{fold_siblings, ProofPath},
    LedgerError,
};

/// The contract the mutation protocol expects from an authenticated log
/// store: append a leaf at the next free index, replace a leaf given a
/// proof against a recent root, and expose the root/changelog window.
pub trait MerkleLedger {
    /// Append a leaf at the next free index.
    ///
    /// Returns the assigned index and the new root. Indices are assigned
    /// monotonically and never reused; deleting a record tombstones its
    /// slot rather than freeing it.
    fn append(&mut self, leaf: Node) -> Result<(u32, Node), LedgerError>;

    /// Replace the leaf at `index` with `new_leaf`.
    ///
    /// `old_leaf` and `proof` must reconstruct `caller_root`, and
    /// `caller_root` must still be inside the changelog window. Up to
    /// `buffer_size` unrelated mutations may have landed since the proof
    /// was generated; a mutation of the *same* leaf in that span fails with
    /// [`LedgerError::ProofMismatch`].
    fn replace_with_proof(
        &mut self,
        index: u32,
        old_leaf: Node,
        proof: &ProofPath,
        caller_root: Node,
        new_leaf: Node,
    ) -> Result<Node, LedgerError>;

    /// Verify that `leaf` is the *current* value at `index`.
    ///
    /// Same discipline as [`replace_with_proof`](Self::replace_with_proof)
    /// but read-only: the proof must reconstruct `caller_root` inside the
    /// window, and no newer window entry may have touched `index`.
    fn verify_leaf(
        &self,
        index: u32,
        leaf: Node,
        proof: &ProofPath,
        caller_root: Node,
    ) -> Result<(), LedgerError>;

    /// The current finalized root.
    fn current_root(&self) -> Node;

    /// The roots currently accepted for mutations, newest first.
    fn changelog_window(&self) -> Vec<Node>;
}

/// A concurrent Merkle ledger: the authoritative side of a compressed
/// record store.
///
/// Only the root, a bounded ring buffer of recent change-log entries, and
/// the rightmost frontier are kept; full leaves live exclusively in the
/// callers' off-chain mirrors. The changelog ring depth is the optimistic
/// concurrency tolerance: once an entry scrolls out, proofs taken against
/// its root fail with [`LedgerError::StaleRoot`]. Eviction is deliberate —
/// it bounds memory and defines how stale a cached root may be.
#[derive(Debug, Clone)]
pub struct ConcurrentMerkleLedger {
    depth: u8,
    buffer_size: usize,
    count: u32,
    sequence: u64,
    root: Node,
    changelog: VecDeque<ChangeLogEntry>,
    /// Value of the most recently appended leaf.
    rightmost_leaf: Node,
    /// Sibling path for the rightmost leaf, kept current across replaces so
    /// the next append can derive its own siblings in O(depth).
    rightmost_proof: Vec<Node>,
}

impl ConcurrentMerkleLedger {
    /// Create an empty ledger.
    ///
    /// `depth` must be in [1, 20]; capacity is `2^depth` leaves.
    /// `buffer_size` (>= 1) is the changelog window depth. The changelog is
    /// seeded with the empty root so proofs against an untouched tree
    /// verify.
    pub fn new(depth: u8, buffer_size: usize) -> Result<Self, LedgerError> {
        validate_depth(depth)?;
        if buffer_size == 0 {
            return Err(LedgerError::InvalidData(
                "changelog buffer size must be at least 1".to_string(),
            ));
        }
        let root = empty_subtree_root(depth);
        let empty_path: Vec<Node> = (0..depth).map(empty_subtree_root).collect();
        let mut changelog = VecDeque::with_capacity(buffer_size);
        changelog.push_back(ChangeLogEntry {
            root,
            path: empty_path.clone(),
            index: 0,
        });
        Ok(Self {
            depth,
            buffer_size,
            count: 0,
            sequence: 0,
            root,
            changelog,
            rightmost_leaf: EMPTY_NODE,
            rightmost_proof: empty_path,
        })
    }

    /// Tree depth.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Maximum number of leaves (`2^depth`).
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of leaves appended so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Changelog window depth.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Number of successful mutations since creation.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Fold `leaf` up `siblings`, collecting the node value at each level
    /// on the leaf's own path (leaf first). Returns `(path, root)`.
    fn path_and_root(&self, index: u32, leaf: Node, siblings: &[Node]) -> (Vec<Node>, Node) {
        let mut path = Vec::with_capacity(self.depth as usize);
        let mut node = leaf;
        let mut idx = index;
        for sibling in siblings {
            path.push(node);
            node = if idx & 1 == 1 {
                crate::hash::node_hash(sibling, &node)
            } else {
                crate::hash::node_hash(&node, sibling)
            };
            idx >>= 1;
        }
        (path, node)
    }

    /// Commit a mutation: push the changelog entry (evicting the oldest
    /// once the ring is full), advance the root and sequence number.
    fn record_change(&mut self, root: Node, path: Vec<Node>, index: u32) {
        if self.changelog.len() == self.buffer_size {
            self.changelog.pop_front();
        }
        self.changelog.push_back(ChangeLogEntry { root, path, index });
        self.root = root;
        self.sequence += 1;
    }

    /// Sibling path for the leaf about to be appended at `index`.
    ///
    /// Below the split level (the number of trailing zeros of `index`) all
    /// siblings are empty subtrees; at the split level the sibling is the
    /// subtree containing every previously appended leaf in that span,
    /// obtained by folding the current rightmost leaf up its own path;
    /// above it the rightmost leaf's siblings are shared.
    fn append_siblings(&self, index: u32) -> Vec<Node> {
        if index == 0 {
            return (0..self.depth).map(empty_subtree_root).collect();
        }
        let split = index.trailing_zeros() as usize;
        let mut node = self.rightmost_leaf;
        let mut idx = index - 1;
        for level in 0..split {
            let sibling = self.rightmost_proof[level];
            node = if idx & 1 == 1 {
                crate::hash::node_hash(&sibling, &node)
            } else {
                crate::hash::node_hash(&node, &sibling)
            };
            idx >>= 1;
        }
        let mut siblings = Vec::with_capacity(self.depth as usize);
        for level in 0..self.depth as usize {
            if level < split {
                siblings.push(empty_subtree_root(level as u8));
            } else if level == split {
                siblings.push(node);
            } else {
                siblings.push(self.rightmost_proof[level]);
            }
        }
        siblings
    }

    /// Validate `(old_leaf, proof, caller_root)` for `index` and bring the
    /// sibling path up to the current root.
    ///
    /// The shared core of [`MerkleLedger::replace_with_proof`] and
    /// [`MerkleLedger::verify_leaf`]: locate the caller's root in the
    /// window (else [`LedgerError::StaleRoot`]), check the proof
    /// reconstructs it, then replay every mutation recorded after it onto
    /// the path. A replayed mutation of the *same* leaf means `old_leaf` is
    /// no longer what the tree holds — [`LedgerError::ProofMismatch`].
    fn fast_forwarded_siblings(
        &self,
        index: u32,
        old_leaf: Node,
        proof: &ProofPath,
        caller_root: Node,
    ) -> Result<Vec<Node>, LedgerError> {
        if proof.len() != self.depth as usize {
            return Err(LedgerError::ProofMismatch(format!(
                "proof has {} levels but the tree depth is {}",
                proof.len(),
                self.depth
            )));
        }
        if index >= self.count {
            return Err(LedgerError::ProofMismatch(format!(
                "index {} is beyond the leaf count {}",
                index, self.count
            )));
        }

        // Locate the newest window entry carrying the caller's root.
        let matched = self
            .changelog
            .iter()
            .rposition(|entry| entry.root == caller_root)
            .ok_or(LedgerError::StaleRoot {
                window: self.buffer_size,
            })?;

        // The proof and the recomputed old leaf must reconstruct that root.
        let mut siblings = proof.nodes.clone();
        if fold_siblings(old_leaf, index, &siblings) != caller_root {
            return Err(LedgerError::ProofMismatch(format!(
                "sibling path for index {} does not reconstruct the supplied root {}",
                index,
                hex::encode(caller_root)
            )));
        }

        for entry in self.changelog.iter().skip(matched + 1) {
            if entry.index == index {
                return Err(LedgerError::ProofMismatch(format!(
                    "leaf {} was mutated after the supplied root",
                    index
                )));
            }
            entry.apply_to_siblings(index, &mut siblings);
        }
        debug_assert_eq!(fold_siblings(old_leaf, index, &siblings), self.root);
        Ok(siblings)
    }
}

impl MerkleLedger for ConcurrentMerkleLedger {
    fn append(&mut self, leaf: Node) -> Result<(u32, Node), LedgerError> {
        if self.count as u64 >= self.capacity() {
            return Err(LedgerError::LedgerFull {
                capacity: self.capacity(),
                count: self.count,
            });
        }
        let index = self.count;
        let siblings = self.append_siblings(index);
        let (path, root) = self.path_and_root(index, leaf, &siblings);

        self.rightmost_leaf = leaf;
        self.rightmost_proof = siblings;
        self.count += 1;
        self.record_change(root, path, index);
        Ok((index, root))
    }

    fn replace_with_proof(
        &mut self,
        index: u32,
        old_leaf: Node,
        proof: &ProofPath,
        caller_root: Node,
        new_leaf: Node,
    ) -> Result<Node, LedgerError> {
        let siblings = self.fast_forwarded_siblings(index, old_leaf, proof, caller_root)?;
        let (path, new_root) = self.path_and_root(index, new_leaf, &siblings);

        // Keep the rightmost frontier current for the next append.
        let rightmost = self.count - 1;
        if index == rightmost {
            self.rightmost_leaf = new_leaf;
        } else {
            let level = critical_level(index, rightmost);
            self.rightmost_proof[level] = path[level];
        }
        self.record_change(new_root, path, index);
        Ok(new_root)
    }

    fn verify_leaf(
        &self,
        index: u32,
        leaf: Node,
        proof: &ProofPath,
        caller_root: Node,
    ) -> Result<(), LedgerError> {
        self.fast_forwarded_siblings(index, leaf, proof, caller_root)
            .map(|_| ())
    }

    fn current_root(&self) -> Node {
        self.root
    }

    fn changelog_window(&self) -> Vec<Node> {
        self.changelog.iter().rev().map(|entry| entry.root).collect()
    }
}
