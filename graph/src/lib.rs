//! Social-graph record variants and the compression codec.
//!
//! Each record (post, comment, reaction, connection) is reduced to a
//! fixed-size leaf hash via [`LeafSchema`]; the leaf lives in a concurrent
//! Merkle ledger while the full record travels off-chain. Content addresses
//! ([`AssetId`]) are derived deterministically from the ledger id and the
//! record's domain seed, so they survive updates and deletion.

mod error;
mod id;
mod leaf;
mod record;


pub use error::CodecError;
pub use id::{AssetId, LedgerId, ProfileId};
pub use leaf::{canonical_encode, LeafSchema, TOMBSTONE_LEAF};
pub use record::{
    Connection, Post, Reaction, ReactionKind, Record, CONNECTION_SEED_PREFIX,
    MAX_METADATA_URI_LEN, POST_SEED_PREFIX, REACTION_SEED_PREFIX,
};
