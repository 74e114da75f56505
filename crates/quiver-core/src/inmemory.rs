//! In-memory transactional store with optimistic concurrency control.
//!
//! [`MemoryDatabase`] keeps an ordered map of committed data plus a bounded
//! log of recently committed write ranges. Each [`MemoryTransaction`] reads a
//! private copy of the data at its read version with its own mutations
//! applied, and records the key ranges it reads and writes. At commit, the
//! transaction fails with [`StoreError::NotCommitted`] if any transaction
//! that committed after its read version wrote into one of its read ranges.
//!
//! Snapshot reads and atomic adds record no read ranges, which is what lets
//! concurrent allocators share counter keys without conflicting.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quiver_kv_types::KeyValue;
use quiver_kv_types::RangeOption;
use quiver_kv_types::RetryableError;
use quiver_kv_types::StoreError;
use quiver_kv_types::validate_key;
use quiver_kv_types::validate_value;
use quiver_layer::KeySelector;
use tracing::debug;

use crate::config::TransactConfig;
use crate::constants::transaction::MAX_CONFLICT_HISTORY;
use crate::retry;
use crate::traits::ReadTransaction;
use crate::traits::Transaction;
use crate::traits::TransactionalStore;

type KeyRange = (Vec<u8>, Vec<u8>);
type Data = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Debug, Clone)]
enum Mutation {
    Set { key: Vec<u8>, value: Vec<u8> },
    Clear { key: Vec<u8> },
    ClearRange { begin: Vec<u8>, end: Vec<u8> },
    Add { key: Vec<u8>, param: Vec<u8> },
}

#[derive(Debug)]
struct CommittedWrites {
    version: u64,
    ranges: Vec<KeyRange>,
}

#[derive(Debug, Default)]
struct DatabaseState {
    data: Data,
    version: u64,
    history: VecDeque<CommittedWrites>,
    /// Newest version dropped from `history`.
    pruned_version: u64,
}

impl DatabaseState {
    fn check_conflicts(&self, read_version: u64, reads: &[KeyRange]) -> Result<(), StoreError> {
        if self.pruned_version > read_version {
            return Err(StoreError::TransactionTooOld);
        }
        let newer = self.history.iter().filter(|entry| entry.version > read_version);
        for entry in newer {
            let conflict = entry.ranges.iter().any(|w| reads.iter().any(|r| overlaps(w, r)));
            if conflict {
                return Err(StoreError::NotCommitted);
            }
        }
        Ok(())
    }

    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Set { key, value } => {
                self.data.insert(key, value);
            }
            Mutation::Clear { key } => {
                self.data.remove(&key);
            }
            Mutation::ClearRange { begin, end } => remove_range(&mut self.data, &begin, &end),
            Mutation::Add { key, param } => {
                let sum = add_little_endian(self.data.get(&key).map(Vec::as_slice), &param);
                self.data.insert(key, sum);
            }
        }
    }

    fn record(&mut self, ranges: Vec<KeyRange>) -> u64 {
        self.version += 1;
        self.history.push_back(CommittedWrites {
            version: self.version,
            ranges,
        });
        while self.history.len() > MAX_CONFLICT_HISTORY {
            if let Some(dropped) = self.history.pop_front() {
                self.pruned_version = dropped.version;
            }
        }
        self.version
    }
}

/// Shared handle to an in-memory ordered key-value store.
///
/// Cloning is cheap; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Mutex<DatabaseState>>,
    config: TransactConfig,
}

impl MemoryDatabase {
    /// Create an empty database with default retry settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database using `config` for [`transact`](Self::transact).
    pub fn with_config(config: TransactConfig) -> Self {
        Self {
            inner: Arc::default(),
            config,
        }
    }

    /// Retry settings used by [`transact`](Self::transact) and
    /// [`read_transact`](Self::read_transact).
    pub fn config(&self) -> &TransactConfig {
        &self.config
    }

    /// Latest committed version. Starts at zero and grows by one per
    /// committed transaction that wrote something.
    pub fn committed_version(&self) -> u64 {
        self.inner.lock().version
    }

    /// Run `body` in a transaction and commit it, retrying on conflicts.
    ///
    /// See [`retry::transact`].
    pub async fn transact<F, Fut, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnMut(MemoryTransaction) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<StoreError> + RetryableError,
    {
        retry::transact(self, &self.config, body).await
    }

    /// Run `body` in a transaction that is never committed.
    pub async fn read_transact<F, Fut, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnMut(MemoryTransaction) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<StoreError> + RetryableError,
    {
        retry::read_transact(self, &self.config, body).await
    }
}

#[async_trait]
impl TransactionalStore for MemoryDatabase {
    type Transaction = MemoryTransaction;

    fn create_transaction(&self) -> Result<MemoryTransaction, StoreError> {
        let db = self.inner.lock();
        Ok(MemoryTransaction {
            inner: Arc::new(Mutex::new(TransactionState {
                read_version: db.version,
                view: db.data.clone(),
                mutations: Vec::new(),
                read_conflicts: Vec::new(),
                write_conflicts: Vec::new(),
                error: None,
                is_committed: false,
            })),
        })
    }

    async fn commit(&self, tr: MemoryTransaction) -> Result<(), StoreError> {
        let mut txn = tr.inner.lock();
        if txn.is_committed {
            return Err(StoreError::UsedDuringCommit);
        }
        txn.is_committed = true;
        if let Some(err) = txn.error.take() {
            return Err(err);
        }
        if txn.mutations.is_empty() {
            return Ok(());
        }

        let mut db = self.inner.lock();
        db.check_conflicts(txn.read_version, &txn.read_conflicts)?;
        for mutation in txn.mutations.drain(..) {
            db.apply(mutation);
        }
        let version = db.record(std::mem::take(&mut txn.write_conflicts));
        debug!(version, read_version = txn.read_version, "committed transaction");
        Ok(())
    }
}

#[derive(Debug)]
struct TransactionState {
    read_version: u64,
    /// Committed data at `read_version` with this transaction's mutations applied.
    view: Data,
    mutations: Vec<Mutation>,
    read_conflicts: Vec<KeyRange>,
    write_conflicts: Vec<KeyRange>,
    /// First deferred error, reported at commit.
    error: Option<StoreError>,
    is_committed: bool,
}

impl TransactionState {
    fn check_usable(&self) -> Result<(), StoreError> {
        if self.is_committed {
            return Err(StoreError::UsedDuringCommit);
        }
        Ok(())
    }

    /// Record a failure from a mutation method. Returns false when the
    /// mutation must be skipped.
    fn accept(&mut self, checked: Result<(), StoreError>) -> bool {
        let checked = checked.and_then(|()| self.check_usable());
        match checked {
            Ok(()) => true,
            Err(err) => {
                self.error.get_or_insert(err);
                false
            }
        }
    }
}

/// One transaction attempt against a [`MemoryDatabase`].
///
/// Clones share the same transaction.
#[derive(Debug, Clone)]
pub struct MemoryTransaction {
    inner: Arc<Mutex<TransactionState>>,
}

#[async_trait]
impl ReadTransaction for MemoryTransaction {
    async fn get(&self, key: &[u8], snapshot: bool) -> Result<Option<Vec<u8>>, StoreError> {
        let mut state = self.inner.lock();
        state.check_usable()?;
        if !snapshot {
            state.read_conflicts.push(single_key_range(key));
        }
        Ok(state.view.get(key).cloned())
    }

    async fn get_range(&self, range: &RangeOption) -> Result<Vec<KeyValue>, StoreError> {
        let mut state = self.inner.lock();
        state.check_usable()?;
        if range.begin.key() > range.end.key() {
            return Err(StoreError::InvertedRange);
        }

        let begin = resolve_selector(&state.view, &range.begin);
        let end = resolve_selector(&state.view, &range.end).max(begin);
        let span = end - begin;
        let limit = range.limit.unwrap_or(usize::MAX);

        let window = state.view.iter().skip(begin).take(span);
        let pairs: Vec<KeyValue> = if range.reverse {
            window.rev().take(limit).map(|(k, v)| KeyValue::new(k.clone(), v.clone())).collect()
        } else {
            window.take(limit).map(|(k, v)| KeyValue::new(k.clone(), v.clone())).collect()
        };

        if !range.snapshot {
            let conflict = read_conflict_for(range, &pairs, pairs.len() < span);
            if conflict.0 < conflict.1 {
                state.read_conflicts.push(conflict);
            }
        }

        Ok(pairs)
    }
}

impl Transaction for MemoryTransaction {
    fn set(&self, key: &[u8], value: &[u8]) {
        let mut state = self.inner.lock();
        if !state.accept(validate_key(key).and_then(|()| validate_value(value))) {
            return;
        }
        state.view.insert(key.to_vec(), value.to_vec());
        state.write_conflicts.push(single_key_range(key));
        state.mutations.push(Mutation::Set {
            key: key.to_vec(),
            value: value.to_vec(),
        });
    }

    fn clear(&self, key: &[u8]) {
        let mut state = self.inner.lock();
        if !state.accept(validate_key(key)) {
            return;
        }
        state.view.remove(key);
        state.write_conflicts.push(single_key_range(key));
        state.mutations.push(Mutation::Clear { key: key.to_vec() });
    }

    fn clear_range(&self, begin: &[u8], end: &[u8]) {
        if begin >= end {
            return;
        }
        let mut state = self.inner.lock();
        if !state.accept(Ok(())) {
            return;
        }
        remove_range(&mut state.view, begin, end);
        state.write_conflicts.push((begin.to_vec(), end.to_vec()));
        state.mutations.push(Mutation::ClearRange {
            begin: begin.to_vec(),
            end: end.to_vec(),
        });
    }

    fn atomic_add(&self, key: &[u8], param: &[u8]) {
        let mut state = self.inner.lock();
        if !state.accept(validate_key(key).and_then(|()| validate_value(param))) {
            return;
        }
        let sum = add_little_endian(state.view.get(key).map(Vec::as_slice), param);
        state.view.insert(key.to_vec(), sum);
        state.write_conflicts.push(single_key_range(key));
        state.mutations.push(Mutation::Add {
            key: key.to_vec(),
            param: param.to_vec(),
        });
    }

    fn add_read_conflict_range(&self, begin: &[u8], end: &[u8]) -> Result<(), StoreError> {
        if begin > end {
            return Err(StoreError::InvertedRange);
        }
        let mut state = self.inner.lock();
        state.check_usable()?;
        if begin < end {
            state.read_conflicts.push((begin.to_vec(), end.to_vec()));
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Position in `view`'s key order that `selector` resolves to.
///
/// `view.len()` means past the last key.
fn resolve_selector(view: &Data, selector: &KeySelector) -> usize {
    let upper = if selector.or_equal() {
        Bound::Included(selector.key())
    } else {
        Bound::Excluded(selector.key())
    };
    let below = view.range::<[u8], _>((Bound::Unbounded, upper)).count() as i64;
    let position = below - 1 + i64::from(selector.offset());
    position.clamp(0, view.len() as i64) as usize
}

/// Key range a non-snapshot range read depends on.
///
/// When `limit_hit` is set only the part of the range that was actually
/// scanned is covered: up to the last returned key for a forward read, down
/// to it for a reverse read.
fn read_conflict_for(range: &RangeOption, pairs: &[KeyValue], limit_hit: bool) -> KeyRange {
    let mut begin = range.begin.key().to_vec();
    let mut end = range.end.key().to_vec();

    if let (Some(first), Some(last)) = (pairs.first(), pairs.last()) {
        let (low, high) = if range.reverse { (last, first) } else { (first, last) };
        begin = begin.min(low.key.clone());
        let after_high = key_after(&high.key);
        if limit_hit && !range.reverse {
            end = after_high;
        } else {
            end = end.max(after_high);
        }
        if limit_hit && range.reverse {
            begin = low.key.clone();
        }
    }

    (begin, end)
}

fn single_key_range(key: &[u8]) -> KeyRange {
    (key.to_vec(), key_after(key))
}

/// Smallest key sorting after `key`.
fn key_after(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0x00);
    next
}

fn overlaps(a: &KeyRange, b: &KeyRange) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn remove_range(data: &mut Data, begin: &[u8], end: &[u8]) {
    if begin >= end {
        return;
    }
    let mut tail = data.split_off(begin);
    let mut kept = tail.split_off(end);
    data.append(&mut kept);
}

/// Little-endian addition truncated to `param.len()` bytes.
fn add_little_endian(existing: Option<&[u8]>, param: &[u8]) -> Vec<u8> {
    let existing = existing.unwrap_or_default();
    let mut sum = Vec::with_capacity(param.len());
    let mut carry = 0u16;
    for (i, &p) in param.iter().enumerate() {
        let total = u16::from(existing.get(i).copied().unwrap_or(0)) + u16::from(p) + carry;
        sum.push(total as u8);
        carry = total >> 8;
    }
    sum
}
