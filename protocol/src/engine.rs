use serde::{Deserialize, Serialize};
use tracing::debug;

use bramble_graph::{
    Connection, LeafSchema, LedgerId, Post, ProfileId, Reaction, ReactionKind, Record,
    TOMBSTONE_LEAF,
};
use bramble_ledger::{MerkleLedger, Node, ProofPath};
use bramble_session::{Authorization, ProgramId, SignerKey};

use crate::ProtocolError;

/// Ownership binding for a profile. Profile accounts themselves stay
/// uncompressed and outside this engine; the caller resolves them and
/// supplies the `(id, authority)` pair the mutation must be signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub authority: SignerKey,
}

/// Proof artifacts locating a referenced compressed record on its own
/// ledger, supplied when a comment or reaction targets it.
#[derive(Debug, Clone)]
pub struct TargetRef {
    /// A recent root of the target's ledger.
    pub root: Node,
    /// The target's current leaf value.
    pub leaf: Node,
    /// The target's leaf index.
    pub index: u32,
    /// Sibling path for the target leaf at `root`.
    pub path: ProofPath,
}

/// What a successful mutation hands back: everything an off-chain indexer
/// needs to track the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    /// Content address of the mutated record.
    pub asset_id: bramble_graph::AssetId,
    /// Leaf index, assigned at creation and stable thereafter.
    pub index: u32,
    /// The new leaf value (the tombstone for deletions).
    pub leaf: Node,
    /// Ledger root after the mutation.
    pub new_root: Node,
    /// Caller-supplied mutation time.
    pub timestamp: i64,
}

/// The compression and verified-mutation engine for one ledger.
///
/// Orchestrates leaf encoding, authorization, and the optimistic
/// concurrency discipline against the underlying [`MerkleLedger`]. Each
/// operation either fully applies — the ledger root advances and a receipt
/// is returned — or fails with no state change. The caller is responsible
/// for advancing its own mirror with the receipt's `(index, leaf)` pair, in
/// confirmation order.
#[derive(Debug)]
pub struct CompressionEngine<L: MerkleLedger> {
    ledger_id: LedgerId,
    program: ProgramId,
    ledger: L,
}

impl<L: MerkleLedger> CompressionEngine<L> {
    /// Wrap a ledger. `ledger_id` feeds content-address derivation;
    /// `program` scopes session-token validation.
    pub fn new(ledger_id: LedgerId, program: ProgramId, ledger: L) -> Self {
        Self {
            ledger_id,
            program,
            ledger,
        }
    }

    /// The ledger id content addresses are derived against.
    pub fn ledger_id(&self) -> &LedgerId {
        &self.ledger_id
    }

    /// Read access to the underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ── Authorization ───────────────────────────────────────────────────

    /// Resolve the acting authority and require it to be the profile's.
    fn authorize(
        &self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
    ) -> Result<SignerKey, ProtocolError> {
        let acting = auth.acting_as(&self.program, now)?;
        if acting != profile.authority {
            return Err(ProtocolError::UnknownSigner);
        }
        Ok(acting)
    }

    /// Verify that a referenced record currently exists on its ledger at
    /// the claimed position. The target ledger applies its own window and
    /// fast-forward discipline, so a proof captured before a later
    /// mutation of the target is rejected.
    fn verify_target<T: MerkleLedger>(
        target_ledger: &T,
        target: &TargetRef,
    ) -> Result<(), ProtocolError> {
        target_ledger
            .verify_leaf(target.index, target.leaf, &target.path, target.root)
            .map_err(|e| ProtocolError::TargetNotFound(e.to_string()))
    }

    // ── Shared leaf plumbing ────────────────────────────────────────────

    /// Encode `record` and append its leaf at the next free index.
    fn append_record(&mut self, record: &Record, now: i64) -> Result<MutationReceipt, ProtocolError> {
        let schema = LeafSchema::encode(&self.ledger_id, record)?;
        let leaf = schema.to_node();
        let (index, new_root) = self.ledger.append(leaf)?;
        debug!(
            asset_id = %hex::encode(schema.asset_id.0),
            index,
            new_root = %hex::encode(new_root),
            "appended compressed leaf"
        );
        Ok(MutationReceipt {
            asset_id: schema.asset_id,
            index,
            leaf,
            new_root,
            timestamp: now,
        })
    }

    /// Recompute the old leaf from `old_record` (never trusting a
    /// caller-supplied leaf) and replace it with `new_leaf`.
    fn replace_record(
        &mut self,
        old_record: &Record,
        new_leaf: Node,
        root: Node,
        index: u32,
        proof: &ProofPath,
        now: i64,
    ) -> Result<MutationReceipt, ProtocolError> {
        let old_schema = LeafSchema::encode(&self.ledger_id, old_record)?;
        let old_leaf = old_schema.to_node();
        let new_root = self
            .ledger
            .replace_with_proof(index, old_leaf, proof, root, new_leaf)?;
        debug!(
            asset_id = %hex::encode(old_schema.asset_id.0),
            index,
            new_root = %hex::encode(new_root),
            tombstone = (new_leaf == TOMBSTONE_LEAF),
            "replaced compressed leaf"
        );
        Ok(MutationReceipt {
            asset_id: old_schema.asset_id,
            index,
            leaf: new_leaf,
            new_root,
            timestamp: now,
        })
    }

    // ── Posts ───────────────────────────────────────────────────────────

    /// Create a top-level post.
    pub fn create_post(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        metadata_uri: String,
        seed: [u8; 32],
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        let record = Record::Post(Post {
            profile: profile.id,
            metadata_uri,
            random_seed: seed,
            reply_to: None,
        });
        self.append_record(&record, now)
    }

    /// Replace a post's metadata. The old record is rebuilt from
    /// `old_metadata_uri` and `seed` so the old leaf is recomputed
    /// independently; the content address is unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn update_post(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        old_metadata_uri: String,
        new_metadata_uri: String,
        seed: [u8; 32],
        root: Node,
        index: u32,
        proof: &ProofPath,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        let old_record = Record::Post(Post {
            profile: profile.id,
            metadata_uri: old_metadata_uri,
            random_seed: seed,
            reply_to: None,
        });
        let new_record = Record::Post(Post {
            profile: profile.id,
            metadata_uri: new_metadata_uri,
            random_seed: seed,
            reply_to: None,
        });
        let new_leaf = LeafSchema::encode(&self.ledger_id, &new_record)?.to_node();
        self.replace_record(&old_record, new_leaf, root, index, proof, now)
    }

    /// Tombstone a post. The slot is zeroed, never freed; the index is not
    /// recycled and no transition leads out of the tombstoned state.
    #[allow(clippy::too_many_arguments)]
    pub fn delete_post(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        metadata_uri: String,
        seed: [u8; 32],
        root: Node,
        index: u32,
        proof: &ProofPath,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        let old_record = Record::Post(Post {
            profile: profile.id,
            metadata_uri,
            random_seed: seed,
            reply_to: None,
        });
        self.replace_record(&old_record, TOMBSTONE_LEAF, root, index, proof, now)
    }

    // ── Comments ────────────────────────────────────────────────────────

    /// Create a comment: a post whose `reply_to` names another compressed
    /// post by content address. The target's existence is proved against
    /// its own ledger before the new leaf is accepted.
    #[allow(clippy::too_many_arguments)]
    pub fn create_comment<T: MerkleLedger>(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        reply_to: bramble_graph::AssetId,
        metadata_uri: String,
        seed: [u8; 32],
        target_ledger: &T,
        target: &TargetRef,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        Self::verify_target(target_ledger, target)?;
        let record = Record::Post(Post {
            profile: profile.id,
            metadata_uri,
            random_seed: seed,
            reply_to: Some(reply_to),
        });
        self.append_record(&record, now)
    }

    // ── Reactions ───────────────────────────────────────────────────────

    /// Create a reaction against a compressed post, proving the target
    /// exists on its ledger first.
    #[allow(clippy::too_many_arguments)]
    pub fn create_reaction<T: MerkleLedger>(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        to_post: bramble_graph::AssetId,
        kind: ReactionKind,
        target_ledger: &T,
        target: &TargetRef,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        Self::verify_target(target_ledger, target)?;
        let record = Record::Reaction(Reaction {
            from_profile: profile.id,
            to_post,
            kind,
        });
        self.append_record(&record, now)
    }

    /// Tombstone a reaction. `(kind, to_post, from_profile)` rebuilds the
    /// old leaf; no target proof is needed to remove an edge.
    #[allow(clippy::too_many_arguments)]
    pub fn delete_reaction(
        &mut self,
        profile: &Profile,
        auth: &Authorization,
        now: i64,
        to_post: bramble_graph::AssetId,
        kind: ReactionKind,
        root: Node,
        index: u32,
        proof: &ProofPath,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(profile, auth, now)?;
        let old_record = Record::Reaction(Reaction {
            from_profile: profile.id,
            to_post,
            kind,
        });
        self.replace_record(&old_record, TOMBSTONE_LEAF, root, index, proof, now)
    }

    // ── Connections ─────────────────────────────────────────────────────

    /// Create a directed connection edge from the signing profile.
    pub fn create_connection(
        &mut self,
        from_profile: &Profile,
        auth: &Authorization,
        now: i64,
        to_profile: ProfileId,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(from_profile, auth, now)?;
        let record = Record::Connection(Connection {
            from_profile: from_profile.id,
            to_profile,
        });
        self.append_record(&record, now)
    }

    /// Tombstone a connection edge.
    #[allow(clippy::too_many_arguments)]
    pub fn delete_connection(
        &mut self,
        from_profile: &Profile,
        auth: &Authorization,
        now: i64,
        to_profile: ProfileId,
        root: Node,
        index: u32,
        proof: &ProofPath,
    ) -> Result<MutationReceipt, ProtocolError> {
        self.authorize(from_profile, auth, now)?;
        let old_record = Record::Connection(Connection {
            from_profile: from_profile.id,
            to_profile,
        });
        self.replace_record(&old_record, TOMBSTONE_LEAF, root, index, proof, now)
    }
}
