use snafu::Snafu;

/// Errors surfaced by a transactional store.
///
/// The directory layer never interprets these beyond wrapping them; the retry
/// driver uses [`StoreError::is_retryable`] to decide whether to run a
/// transaction closure again.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// Another transaction committed a write into this transaction's read set.
    #[snafu(display("transaction not committed due to conflict with another transaction"))]
    NotCommitted,

    /// The read version is older than the retained conflict history.
    #[snafu(display("transaction is too old to perform reads or be committed"))]
    TransactionTooOld,

    /// The transaction was already committed or cancelled.
    #[snafu(display("operation issued while a commit was outstanding or after commit"))]
    UsedDuringCommit,

    #[snafu(display("key size {size} exceeds maximum of {max} bytes"))]
    KeyTooLarge { size: usize, max: u32 },

    #[snafu(display("value size {size} exceeds maximum of {max} bytes"))]
    ValueTooLarge { size: usize, max: u32 },

    /// Range bounds are inverted.
    #[snafu(display("inverted range: begin key sorts after end key"))]
    InvertedRange,

    /// Any other backend failure.
    #[snafu(display("store failure: {reason}"))]
    Failed { reason: String },
}

impl StoreError {
    /// Whether re-running the transaction from scratch may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::NotCommitted | StoreError::TransactionTooOld)
    }
}

/// Errors that can tell a retry driver whether another attempt may succeed.
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

impl RetryableError for StoreError {
    fn is_retryable(&self) -> bool {
        StoreError::is_retryable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::NotCommitted.is_retryable());
        assert!(StoreError::TransactionTooOld.is_retryable());
        assert!(!StoreError::UsedDuringCommit.is_retryable());
        assert!(!StoreError::KeyTooLarge { size: 20_000, max: 10_000 }.is_retryable());
        assert!(
            !StoreError::Failed {
                reason: "disk".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::KeyTooLarge { size: 20_000, max: 10_000 }.to_string(),
            "key size 20000 exceeds maximum of 10000 bytes"
        );
    }
}
