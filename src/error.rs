// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Error types for seqtree.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring or indexing a [`BTreeVec`](crate::BTreeVec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A position fell outside the legal bound for the requested operation.
    /// `len` is the sequence length at the time of the call.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A capacity parameter was odd or smaller than 4.
    #[error("{name} must be even and at least 4, got {value}")]
    InvalidCapacity { name: &'static str, value: usize },

    /// A block could not reserve backing storage.
    #[error("failed to allocate block storage for {requested} entries")]
    AllocationFailed { requested: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = Error::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");
    }

    #[test]
    fn invalid_capacity_message() {
        let err = Error::InvalidCapacity { name: "max_leaf", value: 5 };
        assert_eq!(err.to_string(), "max_leaf must be even and at least 4, got 5");
    }
}
