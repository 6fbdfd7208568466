//! Polymorphic mutation authorization.
//!
//! A mutation is authorized either by the owner's own signature or by a
//! valid session token plus the session signer's signature. Both reduce to
//! one question — which authority is acting — so downstream checks never
//! branch on delegation.

use serde::{Deserialize, Serialize};

use crate::{ProgramId, SessionError, SessionToken, SignerKey};

/// The two ways a mutation can be signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Authorization {
    /// The owner signed directly.
    Direct {
        /// The signing owner key.
        signer: SignerKey,
    },
    /// A delegated session signed on the owner's behalf.
    Session {
        /// The capability being exercised.
        token: SessionToken,
        /// The key that actually signed; must match the token's
        /// session signer.
        signer: SignerKey,
    },
}

impl Authorization {
    /// Resolve which authority this authorization acts as, for a mutation
    /// against `program` at time `now`.
    ///
    /// Direct signatures act as themselves. Session signatures are
    /// validated first and then act as the token's owner authority.
    pub fn acting_as(
        &self,
        program: &ProgramId,
        now: i64,
    ) -> Result<SignerKey, SessionError> {
        match self {
            Authorization::Direct { signer } => Ok(*signer),
            Authorization::Session { token, signer } => {
                token.validate(signer, program, now)?;
                Ok(token.authority)
            }
        }
    }
}
