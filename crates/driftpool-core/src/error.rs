//! Error taxonomy shared by the generator, the aggregator, and the salter.

use thiserror::Error;

/// Failure of a single byte-source operation or of aggregator construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A source delivered fewer bytes than requested and reported no harder
    /// failure of its own.
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    /// An aggregator was built with no sources.
    #[error("aggregator has no sources")]
    NoSources,

    /// A source was registered with weight zero. Weights are relative shares
    /// and must be positive.
    #[error("source weight must be positive")]
    ZeroWeight,

    /// The operating system CSPRNG failed. Fatal platform condition.
    #[error("os random source failed: {0}")]
    OsRandom(#[from] getrandom::Error),
}

/// Failure of an [`Aggregator::fill`](crate::Aggregator::fill) call.
///
/// Carries the cumulative number of bytes already placed in the output buffer
/// before the failing source, so callers always learn the true prefix length.
/// Bytes beyond `filled` are untouched.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("source {index} failed after {filled} bytes: {cause}")]
pub struct FillError {
    /// Bytes successfully written to the output buffer before the failure.
    pub filled: usize,
    /// Insertion-order index of the source that failed.
    pub index: usize,
    /// The underlying failure.
    pub cause: Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_read_display() {
        let err = Error::ShortRead {
            expected: 16,
            got: 7,
        };
        assert_eq!(err.to_string(), "short read: expected 16 bytes, got 7");
    }

    #[test]
    fn fill_error_display_includes_offset_and_cause() {
        let err = FillError {
            filled: 42,
            index: 1,
            cause: Error::ShortRead {
                expected: 10,
                got: 3,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("source 1"), "{msg}");
        assert!(msg.contains("after 42 bytes"), "{msg}");
        assert!(msg.contains("expected 10"), "{msg}");
    }
}
