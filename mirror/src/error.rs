use thiserror::Error;

/// Errors from mirror operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("leaf index {index} is out of range (capacity {capacity})")]
    IndexOutOfRange { index: u32, capacity: u64 },
}
