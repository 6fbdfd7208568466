//! Concurrent Merkle ledger with a bounded changelog window, using Blake3.
//!
//! The authoritative side of a compressed record store: it holds only the
//! current root, a ring buffer of the last `buffer_size` roots (with the
//! path deltas that produced them), and the rightmost frontier. Full leaves
//! live in per-client off-chain mirrors, which generate the inclusion
//! proofs consumed by [`MerkleLedger::replace_with_proof`].
//!
//! Internal nodes hash `blake3(left || right)`; leaves are raw 32-byte
//! values. An empty or deleted slot holds `[0; 32]`.

#![warn(missing_docs)]

mod changelog;
mod error;
pub(crate) mod hash;
mod proof;
mod tree;


pub use changelog::ChangeLogEntry;
pub use error::LedgerError;
pub use hash::{empty_subtree_root, node_hash, Node, EMPTY_NODE, MAX_DEPTH};
pub use proof::{recompute_root, ProofPath};
pub use tree::{ConcurrentMerkleLedger, MerkleLedger};
