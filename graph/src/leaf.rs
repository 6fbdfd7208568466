//! Leaf schema: folds a record into the fixed-width hash stored on-ledger.
//!
//! ```text
//! seed_hash = blake3(concat(domain seed parts))
//! asset_id  = blake3("asset" || ledger_id || seed_hash)
//! data_hash = blake3(canonical_encode(record))
//! leaf      = blake3(asset_id || seed_hash || data_hash)
//! ```
//!
//! The canonical encoding is bincode with big-endian standard config —
//! byte-stable for logically identical values, which `data_hash` requires
//! because it participates in old-leaf verification during update/delete.

use bincode::{Decode, Encode};
use bramble_ledger::{Node, EMPTY_NODE};
use serde::{Deserialize, Serialize};

use crate::{
    id::{AssetId, LedgerId},
    record::Record,
    CodecError,
};

/// The tombstone leaf value marking a deleted slot.
pub const TOMBSTONE_LEAF: Node = EMPTY_NODE;

/// The three hashes every compressed record reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct LeafSchema {
    /// Content address; stable for the record's lifetime.
    pub asset_id: AssetId,
    /// Hash of the domain seed parts.
    pub seed_hash: [u8; 32],
    /// Hash of the canonical record encoding; changes on every update.
    pub data_hash: [u8; 32],
}

impl LeafSchema {
    /// Validate `record` and fold it into its leaf schema for `ledger`.
    pub fn encode(ledger: &LedgerId, record: &Record) -> Result<Self, CodecError> {
        record.validate()?;
        let seed_hash = record.seed_hash();
        let asset_id = AssetId::derive(ledger, &seed_hash);
        let data_hash = *blake3::hash(&canonical_encode(record)?).as_bytes();
        Ok(Self {
            asset_id,
            seed_hash,
            data_hash,
        })
    }

    /// The 32-byte leaf value stored in the tree:
    /// `blake3(asset_id || seed_hash || data_hash)`.
    pub fn to_node(&self) -> Node {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.asset_id.0);
        hasher.update(&self.seed_hash);
        hasher.update(&self.data_hash);
        *hasher.finalize().as_bytes()
    }
}

/// Canonically serialize a record: bincode standard config, big-endian.
pub fn canonical_encode(record: &Record) -> Result<Vec<u8>, CodecError> {
    let config = bincode::config::standard()
        .with_big_endian()
        .with_no_limit();
    bincode::encode_to_vec(record, config)
        .map_err(|e| CodecError::Serialization(e.to_string()))
}
