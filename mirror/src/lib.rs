//! Off-chain mirror for a concurrent Merkle ledger.
//!
//! The ledger's authoritative side stores only the root and a bounded
//! changelog; the full leaf array lives here, privately, so that inclusion
//! proofs can be produced locally. The mirror must be advanced in lock-step
//! with every mutation its owner confirms on the ledger.

mod error;
mod mirror;


pub use error::MirrorError;
pub use mirror::{LedgerMirror, MirrorProof};
