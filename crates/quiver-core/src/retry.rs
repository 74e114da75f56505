//! Transaction retry driver.
//!
//! The directory layer performs a single attempt per call and never retries.
//! [`transact`] is the loop around it: run the closure with a fresh
//! transaction, commit, and on a retryable failure back off and run the whole
//! closure again.

use std::time::Duration;

use quiver_kv_types::RetryableError;
use quiver_kv_types::StoreError;
use rand::Rng;
use tracing::debug;
use tracing::warn;

use crate::config::TransactConfig;
use crate::traits::TransactionalStore;

/// Run `body` in a transaction on `store` and commit it.
///
/// A retryable error from either `body` or the commit discards the attempt
/// and, after a jittered exponential backoff, runs `body` again with a new
/// transaction. After `config.retry_limit` attempts the last error is
/// returned. Non-retryable errors are returned immediately.
///
/// # Example
///
/// ```ignore
/// let prefix = transact(&db, &config, |tr| {
///     let allocator = allocator.clone();
///     async move { allocator.allocate(&tr).await }
/// })
/// .await?;
/// ```
pub async fn transact<S, F, Fut, T, E>(store: &S, config: &TransactConfig, mut body: F) -> Result<T, E>
where
    S: TransactionalStore,
    F: FnMut(S::Transaction) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<StoreError> + RetryableError,
{
    let mut backoff = Backoff::new(config);
    loop {
        let tr = store.create_transaction()?;
        let outcome = match body(tr.clone()).await {
            Ok(value) => store.commit(tr).await.map(|()| value).map_err(E::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && backoff.attempt < config.retry_limit => backoff.wait().await,
            Err(err) => {
                if err.is_retryable() {
                    warn!(attempts = backoff.attempt, "transaction retry limit exhausted");
                }
                return Err(err);
            }
        }
    }
}

/// Run `body` in a transaction that is discarded instead of committed.
///
/// Retryable errors from `body` are retried as in [`transact`].
pub async fn read_transact<S, F, Fut, T, E>(store: &S, config: &TransactConfig, mut body: F) -> Result<T, E>
where
    S: TransactionalStore,
    F: FnMut(S::Transaction) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<StoreError> + RetryableError,
{
    let mut backoff = Backoff::new(config);
    loop {
        let tr = store.create_transaction()?;
        match body(tr).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && backoff.attempt < config.retry_limit => backoff.wait().await,
            Err(err) => return Err(err),
        }
    }
}

struct Backoff {
    attempt: u32,
    delay_ms: u64,
    max_ms: u64,
}

impl Backoff {
    fn new(config: &TransactConfig) -> Self {
        Self {
            attempt: 1,
            delay_ms: config.initial_backoff_ms,
            max_ms: config.max_backoff_ms,
        }
    }

    async fn wait(&mut self) {
        // Full jitter keeps conflicting retries from lining up again.
        let sleep_ms = rand::rng().random_range(0..=self.delay_ms);
        debug!(attempt = self.attempt, sleep_ms, "retrying transaction");
        tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
        self.attempt += 1;
        self.delay_ms = self.delay_ms.saturating_mul(2).min(self.max_ms);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicU32;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::inmemory::MemoryDatabase;
    use crate::traits::ReadTransaction;
    use crate::traits::Transaction;

    fn config(retry_limit: u32) -> TransactConfig {
        TransactConfig {
            retry_limit,
            initial_backoff_ms: 1,
            max_backoff_ms: 4,
        }
    }

    #[tokio::test]
    async fn test_commits_on_success() {
        let db = MemoryDatabase::new();
        let result: Result<u32, StoreError> = transact(&db, &config(3), |tr| async move {
            tr.set(b"k", b"v");
            Ok(7)
        })
        .await;
        assert_eq!(result, Ok(7));

        let value: Result<Option<Vec<u8>>, StoreError> =
            read_transact(&db, &config(3), |tr| async move { tr.get(b"k", false).await }).await;
        assert_eq!(value, Ok(Some(b"v".to_vec())));
    }

    #[tokio::test]
    async fn test_retries_retryable_errors() {
        let db = MemoryDatabase::new();
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), StoreError> = transact(&db, &config(5), |_tr| {
            let attempts = attempts.clone();
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    return Err(StoreError::NotCommitted);
                }
                Ok(())
            }
        })
        .await;

        assert_eq!(result, Ok(()));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_limit() {
        let db = MemoryDatabase::new();
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), StoreError> = transact(&db, &config(4), |_tr| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::NotCommitted)
            }
        })
        .await;

        assert_eq!(result, Err(StoreError::NotCommitted));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let db = MemoryDatabase::new();
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), StoreError> = transact(&db, &config(10), |_tr| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Failed {
                    reason: "boom".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(StoreError::Failed { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_conflict_reruns_body() {
        let db = MemoryDatabase::new();
        let attempts = Arc::new(AtomicU32::new(0));
        let interferer = db.clone();

        let result: Result<(), StoreError> = transact(&db, &config(5), |tr| {
            let attempts = attempts.clone();
            let interferer = interferer.clone();
            async move {
                tr.get(b"watched", false).await?;
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    let other = interferer.create_transaction()?;
                    other.set(b"watched", b"changed");
                    interferer.commit(other).await?;
                }
                tr.set(b"result", b"done");
                Ok(())
            }
        })
        .await;

        assert_eq!(result, Ok(()));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
