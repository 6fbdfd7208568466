//! Mutation protocol for compressed social-graph records.
//!
//! Orchestrates the leaf codec, session-aware authorization, and the
//! concurrent Merkle ledger into the create/update/delete protocol:
//! creates append a freshly encoded leaf; updates and deletes recompute
//! the old leaf independently and replace it under the ledger's
//! changelog-window discipline; comments and reactions additionally prove
//! their target's existence on its own ledger. No operation retries
//! internally — `StaleRoot`/`ProofMismatch` go back to the caller, who
//! refreshes proof and root from its mirror.

mod engine;
mod error;


pub use engine::{CompressionEngine, MutationReceipt, Profile, TargetRef};
pub use error::ProtocolError;
