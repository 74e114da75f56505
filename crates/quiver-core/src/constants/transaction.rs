//! Transaction retry and conflict tracking constants.

/// Default number of attempts the retry driver makes before giving up.
pub const DEFAULT_RETRY_LIMIT: u32 = 100;

/// Initial backoff between retry attempts in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1;

/// Backoff cap between retry attempts in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 128;

/// Maximum configurable retry limit.
pub const MAX_RETRY_LIMIT: u32 = 10_000;

/// Number of committed write sets the in-memory store retains for conflict
/// checks. Transactions reading from a version older than the oldest retained
/// entry fail with a retryable "too old" error.
pub const MAX_CONFLICT_HISTORY: usize = 10_000;
