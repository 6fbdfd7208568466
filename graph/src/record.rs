//! Record variants: the typed state each compressed leaf stands for.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    id::{AssetId, ProfileId},
    CodecError,
};

/// Maximum metadata URI length in bytes.
pub const MAX_METADATA_URI_LEN: usize = 128;

/// Domain seed prefix for posts and comments.
pub const POST_SEED_PREFIX: &[u8] = b"post";
/// Domain seed prefix for reactions.
pub const REACTION_SEED_PREFIX: &[u8] = b"reaction";
/// Domain seed prefix for connections.
pub const CONNECTION_SEED_PREFIX: &[u8] = b"connection";

/// A post. With `reply_to` set it is a comment on another post, referenced
/// by content address — never by index or in-memory pointer.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Post {
    /// Owning profile.
    pub profile: ProfileId,
    /// Off-chain metadata URI, at most [`MAX_METADATA_URI_LEN`] bytes.
    pub metadata_uri: String,
    /// Caller-chosen 32-byte seed; guarantees seed uniqueness per post.
    pub random_seed: [u8; 32],
    /// Content address of the post this one replies to, if any.
    pub reply_to: Option<AssetId>,
}

/// The closed set of reaction kinds. Validated structurally: anything
/// outside this enum cannot be encoded, keeping `data_hash` collision
/// resistant across semantically equal inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum ReactionKind {
    Like,
    Dislike,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    /// Canonical single-byte tag, used in the domain seed parts.
    pub fn tag(&self) -> u8 {
        match self {
            ReactionKind::Like => 0,
            ReactionKind::Dislike => 1,
            ReactionKind::Love => 2,
            ReactionKind::Haha => 3,
            ReactionKind::Wow => 4,
            ReactionKind::Sad => 5,
            ReactionKind::Angry => 6,
        }
    }
}

/// A reaction from a profile to a post.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Reaction {
    /// Reacting profile.
    pub from_profile: ProfileId,
    /// Content address of the post being reacted to.
    pub to_post: AssetId,
    /// Which reaction.
    pub kind: ReactionKind,
}

/// A directed follow edge between two profiles.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Connection {
    pub from_profile: ProfileId,
    pub to_profile: ProfileId,
}

/// Tagged union over every record variant. The variant tag participates in
/// the canonical encoding, so two variants with identical field bytes still
/// hash differently.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Record {
    Post(Post),
    Reaction(Reaction),
    Connection(Connection),
}

impl Record {
    /// Schema validation, applied before any hashing.
    pub fn validate(&self) -> Result<(), CodecError> {
        match self {
            Record::Post(post) => {
                if post.metadata_uri.len() > MAX_METADATA_URI_LEN {
                    return Err(CodecError::UriTooLong {
                        len: post.metadata_uri.len(),
                        max: MAX_METADATA_URI_LEN,
                    });
                }
            }
            Record::Reaction(_) => {}
            Record::Connection(connection) => {
                if connection.from_profile == connection.to_profile {
                    return Err(CodecError::SelfConnection);
                }
            }
        }
        Ok(())
    }

    /// Hash of the variant-specific domain seed parts. Uniquely identifies
    /// the logical record within its ledger and stays fixed across updates.
    pub fn seed_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        match self {
            Record::Post(post) => {
                hasher.update(POST_SEED_PREFIX);
                hasher.update(&post.random_seed);
            }
            Record::Reaction(reaction) => {
                hasher.update(REACTION_SEED_PREFIX);
                hasher.update(&[reaction.kind.tag()]);
                hasher.update(&reaction.to_post.0);
                hasher.update(&reaction.from_profile.0);
            }
            Record::Connection(connection) => {
                hasher.update(CONNECTION_SEED_PREFIX);
                hasher.update(&connection.from_profile.0);
                hasher.update(&connection.to_profile.0);
            }
        }
        *hasher.finalize().as_bytes()
    }
}
