use thiserror::Error;

/// A vector's length does not match the dimensionality the index was built
/// with. The offending record or query is rejected; nothing else is affected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("dimension mismatch: expected {expected}, got {actual}")]
pub struct DimensionError {
    pub expected: usize,
    pub actual: usize,
}

/// A stored embedding blob that cannot be decoded into a vector of the
/// index's dimensionality.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("blob length {0} is not a multiple of 4")]
    Misaligned(usize),
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid store format: {0}")]
    InvalidFormat(String),
}

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error(transparent)]
    InvalidDimension(#[from] DimensionError),
    /// The store rejected the record; the index was left untouched.
    #[error("failed to persist record")]
    Persistence(#[source] StoreError),
    /// The record is durably stored but not searchable until the next
    /// bootstrap. Recoverable, not fatal.
    #[error("record persisted but not indexed")]
    Unindexed(#[source] DimensionError),
}
