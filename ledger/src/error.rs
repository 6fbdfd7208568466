use thiserror::Error;

/// Errors from concurrent Merkle ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Construction or state validation failed.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// Append capacity is exhausted.
    #[error("ledger is full (capacity {capacity}, count {count})")]
    LedgerFull {
        /// Maximum number of leaves (`2^depth`).
        capacity: u64,
        /// Number of leaves already appended.
        count: u32,
    },
    /// The caller-supplied root has been evicted from the changelog window.
    /// The caller must refresh its proof and root and resubmit.
    #[error("root is no longer in the changelog window (window size {window})")]
    StaleRoot {
        /// Size of the changelog ring buffer.
        window: usize,
    },
    /// The supplied sibling path does not reconstruct a window root, or the
    /// leaf changed after the supplied root.
    #[error("proof mismatch: {0}")]
    ProofMismatch(String),
}
