//! Fixed-width identifiers for ledgers, profiles, and compressed assets.

use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Encode, Decode, Serialize, Deserialize,
        )]
        pub struct $name(pub [u8; 32]);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), hex::encode(self.0))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

id_newtype!(
    /// Identifies one concurrent Merkle ledger instance.
    LedgerId
);
id_newtype!(
    /// Reference to a profile account (kept uncompressed, outside this
    /// engine's scope).
    ProfileId
);
id_newtype!(
    /// Content address of a compressed record: deterministic, derived from
    /// `(ledger, seed_hash)`, and stable across the record's whole
    /// lifetime — updates and deletion never change it.
    AssetId
);

/// Domain prefix folded into every asset-id derivation.
const ASSET_SEED_PREFIX: &[u8] = b"asset";

impl AssetId {
    /// Derive the content address for a record with the given seed hash on
    /// the given ledger: `blake3("asset" || ledger_id || seed_hash)`.
    ///
    /// Pure and deterministic; distinct seed hashes under one ledger yield
    /// distinct asset ids with the hash function's collision resistance.
    pub fn derive(ledger: &LedgerId, seed_hash: &[u8; 32]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ASSET_SEED_PREFIX);
        hasher.update(&ledger.0);
        hasher.update(seed_hash);
        Self(*hasher.finalize().as_bytes())
    }
}
