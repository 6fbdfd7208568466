use thiserror::Error;

/// Session delegation failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Requested validity exceeds the issuing limit.
    #[error("requested validity is too long (max {max_secs} seconds)")]
    ValidityTooLong { max_secs: i64 },
    /// Token is bound to a different program or session signer.
    #[error("invalid session token")]
    InvalidToken,
    /// Token validity has elapsed.
    #[error("session token has expired")]
    Expired,
}
