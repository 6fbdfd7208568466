use thiserror::Error;

/// Errors from record validation and canonical serialization.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Metadata URI exceeds the schema limit.
    #[error("metadata uri is {len} bytes, exceeding the {max} byte limit")]
    UriTooLong { len: usize, max: usize },
    /// A connection must join two distinct profiles.
    #[error("connection endpoints must be distinct profiles")]
    SelfConnection,
    /// The canonical encoder rejected the record.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
