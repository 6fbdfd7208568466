use thiserror::Error;

use bramble_graph::CodecError;
use bramble_ledger::LedgerError;
use bramble_session::SessionError;

/// Errors surfaced by the mutation protocol.
///
/// `StaleRoot` and `ProofMismatch` (inside [`LedgerError`]) are the only
/// retryable conditions — the caller refreshes proof and root from its
/// mirror and resubmits. Everything else is terminal for the request.
/// Every failure aborts the enclosing mutation atomically.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The authorization does not reduce to the record owner's authority.
    #[error("unknown signer for the claimed authority")]
    UnknownSigner,
    /// Cross-reference verification of a comment/reaction target failed.
    #[error("target not found: {0}")]
    TargetNotFound(String),
}
