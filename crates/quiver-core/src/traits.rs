//! Core traits for transactional key-value access.
//!
//! The directory layer and allocator only ever see a [`Transaction`]. The
//! store behind it owns isolation, conflict detection, and commit. Retrying a
//! failed attempt belongs to [`transact`](crate::retry::transact).

use async_trait::async_trait;
use quiver_kv_types::KeyValue;
use quiver_kv_types::RangeOption;
use quiver_kv_types::StoreError;

/// Read access inside one transaction attempt.
#[async_trait]
pub trait ReadTransaction: Send + Sync {
    /// Read a single key.
    ///
    /// A `snapshot` read does not add the key to the transaction's read
    /// conflict set.
    async fn get(&self, key: &[u8], snapshot: bool) -> Result<Option<Vec<u8>>, StoreError>;

    /// Read an ordered range of pairs.
    ///
    /// Pairs come back in ascending key order, or descending when
    /// `range.reverse` is set. `range.limit` applies after ordering.
    async fn get_range(&self, range: &RangeOption) -> Result<Vec<KeyValue>, StoreError>;
}

/// Read-write access inside one transaction attempt.
///
/// Mutations are buffered by the transaction and become visible to its own
/// later reads immediately, and to other transactions only after commit.
pub trait Transaction: ReadTransaction {
    fn set(&self, key: &[u8], value: &[u8]);

    fn clear(&self, key: &[u8]);

    /// Clear every key in `[begin, end)`. An empty or inverted range is a no-op.
    fn clear_range(&self, begin: &[u8], end: &[u8]);

    /// Add `param` to the stored value, both read as little-endian integers.
    ///
    /// A missing value counts as zero. The result is truncated to
    /// `param.len()` bytes. The addition adds no read conflict.
    fn atomic_add(&self, key: &[u8], param: &[u8]);

    /// Add `[begin, end)` to the read conflict set as if it had been read.
    fn add_read_conflict_range(&self, begin: &[u8], end: &[u8]) -> Result<(), StoreError>;
}

/// A store that hands out transactions and commits them.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    type Transaction: Transaction + Clone + 'static;

    /// Start a transaction reading at the latest committed version.
    fn create_transaction(&self) -> Result<Self::Transaction, StoreError>;

    /// Commit the transaction's buffered mutations atomically.
    ///
    /// # Errors
    ///
    /// `NotCommitted` when another transaction committed a write into this
    /// transaction's read conflict set after it started.
    async fn commit(&self, tr: Self::Transaction) -> Result<(), StoreError>;
}
