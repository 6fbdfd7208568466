//! Session tokens: short-lived capabilities that let a second keypair act
//! on behalf of an owner authority.

use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Identifies the program a session is scoped to.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub struct ProgramId(pub [u8; 32]);

/// A signing key identity. Signature verification itself happens outside
/// this engine (wallet/runtime concern); here keys are compared as opaque
/// 32-byte identities.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub struct SignerKey(pub [u8; 32]);

impl fmt::Debug for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramId({})", hex::encode(self.0))
    }
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerKey({})", hex::encode(self.0))
    }
}

/// Default session validity when the issuer does not choose one: 1 hour.
pub const DEFAULT_VALIDITY_SECS: i64 = 60 * 60;
/// Hard ceiling on session validity: 7 days.
pub const MAX_VALIDITY_SECS: i64 = 60 * 60 * 24 * 7;

/// A time-boxed delegated-signing capability.
///
/// Lifecycle is one-way and time-driven: issued, valid until `valid_until`,
/// then expired. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct SessionToken {
    /// The owner the session acts for.
    pub authority: SignerKey,
    /// Program this session is scoped to.
    pub target_program: ProgramId,
    /// The delegated keypair allowed to sign during the session.
    pub session_signer: SignerKey,
    /// Unix timestamp at which the token stops being accepted.
    pub valid_until: i64,
    /// Whether the session may also fund transaction resource costs.
    /// Carried for completeness; validation ignores it.
    pub top_up: bool,
}

impl SessionToken {
    /// Issue a token. `valid_until` defaults to one hour from `now` and may
    /// not exceed seven days from `now`.
    pub fn issue(
        authority: SignerKey,
        target_program: ProgramId,
        session_signer: SignerKey,
        now: i64,
        valid_until: Option<i64>,
        top_up: bool,
    ) -> Result<Self, SessionError> {
        let valid_until = valid_until.unwrap_or(now + DEFAULT_VALIDITY_SECS);
        if valid_until > now + MAX_VALIDITY_SECS {
            return Err(SessionError::ValidityTooLong {
                max_secs: MAX_VALIDITY_SECS,
            });
        }
        Ok(Self {
            authority,
            target_program,
            session_signer,
            valid_until,
            top_up,
        })
    }

    /// Validate this token for a claimed signer and program at time `now`.
    ///
    /// `InvalidToken` on any binding mismatch; `Expired` once
    /// `now >= valid_until`. On success the session stands in for a direct
    /// signature from `self.authority`.
    pub fn validate(
        &self,
        claimed_signer: &SignerKey,
        claimed_program: &ProgramId,
        now: i64,
    ) -> Result<(), SessionError> {
        if claimed_program != &self.target_program || claimed_signer != &self.session_signer {
            return Err(SessionError::InvalidToken);
        }
        if now >= self.valid_until {
            return Err(SessionError::Expired);
        }
        Ok(())
    }
}
