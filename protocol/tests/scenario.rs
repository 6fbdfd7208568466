//! End-to-end scenarios at the reference deployment shape: depth 14,
//! changelog buffer 64, with the caller advancing a full off-chain mirror
//! in lock-step after every confirmed mutation.

use assert_matches::assert_matches;
use rand::Rng;

use bramble_graph::{canonical_encode, LedgerId, Post, ProfileId, ReactionKind, Record};
use bramble_ledger::{ConcurrentMerkleLedger, LedgerError, MerkleLedger, EMPTY_NODE};
use bramble_mirror::LedgerMirror;
use bramble_protocol::{CompressionEngine, Profile, ProtocolError, TargetRef};
use bramble_session::{Authorization, ProgramId, SessionError, SessionToken, SignerKey};

const DEPTH: u8 = 14;
const BUFFER: usize = 64;
const NOW: i64 = 1_700_000_000;
const PROGRAM: ProgramId = ProgramId([7u8; 32]);

fn random_bytes(rng: &mut impl Rng) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    bytes
}

struct Client {
    engine: CompressionEngine<ConcurrentMerkleLedger>,
    mirror: LedgerMirror,
    profile: Profile,
    auth: Authorization,
}

impl Client {
    fn new(rng: &mut impl Rng) -> Self {
        let ledger = ConcurrentMerkleLedger::new(DEPTH, BUFFER).expect("ledger");
        let authority = SignerKey(random_bytes(rng));
        Self {
            engine: CompressionEngine::new(LedgerId(random_bytes(rng)), PROGRAM, ledger),
            mirror: LedgerMirror::new(DEPTH).expect("mirror"),
            profile: Profile {
                id: ProfileId(random_bytes(rng)),
                authority,
            },
            auth: Authorization::Direct { signer: authority },
        }
    }

    fn target_ref(&self, index: u32) -> TargetRef {
        let proof = self.mirror.proof(index).expect("proof");
        TargetRef {
            root: proof.root,
            leaf: proof.leaf,
            index,
            path: proof.path,
        }
    }
}

/// Recompute a post's leaf from the published bit layout, independently of
/// the codec:
///
/// ```text
/// seed_hash = blake3("post" || random_seed)
/// asset_id  = blake3("asset" || ledger_id || seed_hash)
/// data_hash = blake3(canonical_encode(record))
/// leaf      = blake3(asset_id || seed_hash || data_hash)
/// ```
fn expected_post_leaf(ledger_id: &LedgerId, post: &Post) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"post");
    hasher.update(&post.random_seed);
    let seed_hash = *hasher.finalize().as_bytes();

    let mut hasher = blake3::Hasher::new();
    hasher.update(b"asset");
    hasher.update(&ledger_id.0);
    hasher.update(&seed_hash);
    let asset_id = *hasher.finalize().as_bytes();

    let data_hash = *blake3::hash(
        &canonical_encode(&Record::Post(post.clone())).expect("canonical encode"),
    )
    .as_bytes();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&asset_id);
    hasher.update(&seed_hash);
    hasher.update(&data_hash);
    *hasher.finalize().as_bytes()
}

#[test]
fn test_post_lifecycle_end_to_end() {
    let mut rng = rand::rng();
    let mut client = Client::new(&mut rng);
    let seed = random_bytes(&mut rng);

    // Create.
    let create = client
        .engine
        .create_post(
            &client.profile,
            &client.auth,
            NOW,
            "ipfs://QmV1".to_string(),
            seed,
        )
        .expect("create");
    assert_eq!(create.index, 0);

    let expected_l1 = expected_post_leaf(
        client.engine.ledger_id(),
        &Post {
            profile: client.profile.id,
            metadata_uri: "ipfs://QmV1".to_string(),
            random_seed: seed,
            reply_to: None,
        },
    );
    assert_eq!(create.leaf, expected_l1);

    let mirror_root = client.mirror.update_leaf(0, create.leaf).expect("mirror");
    assert_eq!(mirror_root, create.new_root);
    assert_eq!(client.engine.ledger().current_root(), mirror_root);

    // Update, proving the old leaf from the mirror.
    let proof = client.mirror.proof(0).expect("proof");
    let update = client
        .engine
        .update_post(
            &client.profile,
            &client.auth,
            NOW + 10,
            "ipfs://QmV1".to_string(),
            "ipfs://QmV2".to_string(),
            seed,
            proof.root,
            0,
            &proof.path,
        )
        .expect("update");
    // Same content address, different leaf.
    assert_eq!(update.asset_id, create.asset_id);
    assert_ne!(update.leaf, create.leaf);

    let expected_l2 = expected_post_leaf(
        client.engine.ledger_id(),
        &Post {
            profile: client.profile.id,
            metadata_uri: "ipfs://QmV2".to_string(),
            random_seed: seed,
            reply_to: None,
        },
    );
    assert_eq!(update.leaf, expected_l2);

    let mirror_root = client.mirror.update_leaf(0, update.leaf).expect("mirror");
    assert_eq!(mirror_root, update.new_root);

    // Delete: the slot is tombstoned in both ledger and mirror.
    let proof = client.mirror.proof(0).expect("proof");
    let delete = client
        .engine
        .delete_post(
            &client.profile,
            &client.auth,
            NOW + 20,
            "ipfs://QmV2".to_string(),
            seed,
            proof.root,
            0,
            &proof.path,
        )
        .expect("delete");
    assert_eq!(delete.asset_id, create.asset_id);
    assert_eq!(delete.leaf, EMPTY_NODE);

    let mirror_root = client.mirror.update_leaf(0, EMPTY_NODE).expect("mirror");
    assert_eq!(mirror_root, delete.new_root);
    assert_eq!(client.mirror.leaf(0).expect("leaf"), EMPTY_NODE);

    // Tombstone idempotence: replaying the delete against the now-stale
    // proof fails instead of silently succeeding.
    assert_matches!(
        client.engine.delete_post(
            &client.profile,
            &client.auth,
            NOW + 30,
            "ipfs://QmV2".to_string(),
            seed,
            proof.root,
            0,
            &proof.path,
        ),
        Err(ProtocolError::Ledger(LedgerError::ProofMismatch(_)))
    );
}

#[test]
fn test_window_property() {
    let mut rng = rand::rng();
    let mut client = Client::new(&mut rng);
    let seed = random_bytes(&mut rng);

    let create = client
        .engine
        .create_post(
            &client.profile,
            &client.auth,
            NOW,
            "ipfs://QmPinned".to_string(),
            seed,
        )
        .expect("create");
    client.mirror.update_leaf(create.index, create.leaf).expect("mirror");

    let within_window = client.mirror.proof(create.index).expect("proof");

    // Land fewer unrelated mutations than the window depth.
    for _ in 0..BUFFER / 2 {
        let receipt = client
            .engine
            .create_post(
                &client.profile,
                &client.auth,
                NOW,
                "ipfs://QmFiller".to_string(),
                random_bytes(&mut rng),
            )
            .expect("filler");
        client.mirror.update_leaf(receipt.index, receipt.leaf).expect("mirror");
    }

    // The proof is 32 mutations stale but inside the window: accepted.
    let update = client
        .engine
        .update_post(
            &client.profile,
            &client.auth,
            NOW + 1,
            "ipfs://QmPinned".to_string(),
            "ipfs://QmMoved".to_string(),
            seed,
            within_window.root,
            create.index,
            &within_window.path,
        )
        .expect("update within window");
    client.mirror.update_leaf(create.index, update.leaf).expect("mirror");
    assert_eq!(client.mirror.root(), update.new_root);

    // Capture a fresh proof, then scroll the entire window past it.
    let evicted = client.mirror.proof(create.index).expect("proof");
    for _ in 0..BUFFER {
        let receipt = client
            .engine
            .create_post(
                &client.profile,
                &client.auth,
                NOW,
                "ipfs://QmFiller".to_string(),
                random_bytes(&mut rng),
            )
            .expect("filler");
        client.mirror.update_leaf(receipt.index, receipt.leaf).expect("mirror");
    }

    assert_matches!(
        client.engine.update_post(
            &client.profile,
            &client.auth,
            NOW + 2,
            "ipfs://QmMoved".to_string(),
            "ipfs://QmTooLate".to_string(),
            seed,
            evicted.root,
            create.index,
            &evicted.path,
        ),
        Err(ProtocolError::Ledger(LedgerError::StaleRoot { window: BUFFER }))
    );

    // The sole retry path: refresh proof and root from the mirror.
    let fresh = client.mirror.proof(create.index).expect("proof");
    let retried = client
        .engine
        .update_post(
            &client.profile,
            &client.auth,
            NOW + 3,
            "ipfs://QmMoved".to_string(),
            "ipfs://QmRetried".to_string(),
            seed,
            fresh.root,
            create.index,
            &fresh.path,
        )
        .expect("retry with fresh proof");
    client.mirror.update_leaf(create.index, retried.leaf).expect("mirror");
    assert_eq!(client.mirror.root(), retried.new_root);
}

#[test]
fn test_cross_reference_scenario() {
    let mut rng = rand::rng();
    let mut posts = Client::new(&mut rng);
    let mut reactions = Client::new(&mut rng);
    let post_seed = random_bytes(&mut rng);

    let post = posts
        .engine
        .create_post(
            &posts.profile,
            &posts.auth,
            NOW,
            "ipfs://QmOriginal".to_string(),
            post_seed,
        )
        .expect("create post");
    posts.mirror.update_leaf(post.index, post.leaf).expect("mirror");

    // Reaction created with the post's proof as of now: accepted.
    let fresh_target = posts.target_ref(post.index);
    let reaction = reactions
        .engine
        .create_reaction(
            &reactions.profile,
            &reactions.auth,
            NOW + 1,
            post.asset_id,
            ReactionKind::Like,
            posts.engine.ledger(),
            &fresh_target,
        )
        .expect("create reaction");
    reactions
        .mirror
        .update_leaf(reaction.index, reaction.leaf)
        .expect("mirror");

    // Capture the target pair, then mutate the post.
    let stale_target = posts.target_ref(post.index);
    let updated = posts
        .engine
        .update_post(
            &posts.profile,
            &posts.auth,
            NOW + 2,
            "ipfs://QmOriginal".to_string(),
            "ipfs://QmEdited".to_string(),
            post_seed,
            stale_target.root,
            post.index,
            &stale_target.path,
        )
        .expect("update post");
    posts.mirror.update_leaf(post.index, updated.leaf).expect("mirror");

    // The pre-mutation target pair no longer proves current existence.
    assert_matches!(
        reactions.engine.create_reaction(
            &reactions.profile,
            &reactions.auth,
            NOW + 3,
            post.asset_id,
            ReactionKind::Love,
            posts.engine.ledger(),
            &stale_target,
        ),
        Err(ProtocolError::TargetNotFound(_))
    );

    // Reacting with a refreshed target works, and the reaction can later
    // be torn down without any target proof.
    let refreshed = posts.target_ref(post.index);
    let second = reactions
        .engine
        .create_reaction(
            &reactions.profile,
            &reactions.auth,
            NOW + 4,
            post.asset_id,
            ReactionKind::Love,
            posts.engine.ledger(),
            &refreshed,
        )
        .expect("create second reaction");
    reactions
        .mirror
        .update_leaf(second.index, second.leaf)
        .expect("mirror");

    let proof = reactions.mirror.proof(second.index).expect("proof");
    let removed = reactions
        .engine
        .delete_reaction(
            &reactions.profile,
            &reactions.auth,
            NOW + 5,
            post.asset_id,
            ReactionKind::Love,
            proof.root,
            second.index,
            &proof.path,
        )
        .expect("delete reaction");
    assert_eq!(removed.leaf, EMPTY_NODE);
    reactions
        .mirror
        .update_leaf(second.index, EMPTY_NODE)
        .expect("mirror");
    assert_eq!(reactions.mirror.root(), removed.new_root);
}

#[test]
fn test_delegated_session_mutates_like_owner() {
    let mut rng = rand::rng();
    let mut client = Client::new(&mut rng);
    let delegate = SignerKey(random_bytes(&mut rng));
    let token = SessionToken::issue(
        client.profile.authority,
        PROGRAM,
        delegate,
        NOW,
        Some(NOW + 600),
        true,
    )
    .expect("issue");
    let session = Authorization::Session {
        token,
        signer: delegate,
    };
    let seed = random_bytes(&mut rng);

    // The session walks the whole lifecycle the owner could.
    let create = client
        .engine
        .create_post(
            &client.profile,
            &session,
            NOW + 1,
            "ipfs://QmDelegated".to_string(),
            seed,
        )
        .expect("session create");
    client.mirror.update_leaf(create.index, create.leaf).expect("mirror");

    let proof = client.mirror.proof(create.index).expect("proof");
    let delete = client
        .engine
        .delete_post(
            &client.profile,
            &session,
            NOW + 2,
            "ipfs://QmDelegated".to_string(),
            seed,
            proof.root,
            create.index,
            &proof.path,
        )
        .expect("session delete");
    client.mirror.update_leaf(create.index, delete.leaf).expect("mirror");
    assert_eq!(client.mirror.root(), delete.new_root);

    // Past expiry the same session authorizes nothing.
    assert_matches!(
        client.engine.create_post(
            &client.profile,
            &session,
            NOW + 600,
            "ipfs://QmAfterExpiry".to_string(),
            random_bytes(&mut rng),
        ),
        Err(ProtocolError::Session(SessionError::Expired))
    );
}
