//! High-Contention Allocator (HCA) for directory prefix allocation.
//!
//! Hands out small integers that are unique across all committed
//! transactions, while keeping concurrent allocators from conflicting with
//! each other in the common case.
//!
//! # Algorithm
//!
//! State lives in two subspaces: `counters` maps a window start to the number
//! of allocations begun in that window, and `recent` marks claimed candidates.
//!
//! 1. Snapshot-read the newest counter to find the current window start and
//!    its count. The snapshot read keeps allocators from conflicting on it.
//! 2. If the window is at least half full, clear the old counters and claim
//!    markers and move the window forward.
//! 3. Atomically add one to the current window's counter.
//! 4. Pick random candidates in the window until one is unclaimed, then mark
//!    it. The candidate read is a normal read, so two transactions claiming the
//!    same candidate cannot both commit.
//!
//! After each candidate read the window start is re-read. If another
//! allocator advanced the window meanwhile, the attempt starts over, because
//! the candidate may belong to a window whose markers were just cleared.
//!
//! # Window Sizing
//!
//! - start < 255: window = 64
//! - start < 65535: window = 1024
//! - otherwise: window = 8192
//!
//! # References
//!
//! - [High-Contention Allocator](https://ananthakumaran.in/2018/08/05/high-contention-allocator.html)

use quiver_kv_types::RangeOption;
use quiver_kv_types::RetryableError;
use quiver_kv_types::StoreError;
use quiver_layer::Element;
use quiver_layer::Subspace;
use quiver_layer::Tuple;
use rand::Rng;
use snafu::Snafu;
use tracing::debug;
use tracing::trace;

use crate::constants::directory::HCA_COUNTERS_KEY;
use crate::constants::directory::HCA_INITIAL_WINDOW_SIZE;
use crate::constants::directory::HCA_LARGE_WINDOW_THRESHOLD;
use crate::constants::directory::HCA_MAX_WINDOW_SIZE;
use crate::constants::directory::HCA_MEDIUM_WINDOW_SIZE;
use crate::constants::directory::HCA_MEDIUM_WINDOW_THRESHOLD;
use crate::constants::directory::HCA_RECENT_KEY;
use crate::traits::Transaction;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during prefix allocation.
#[derive(Debug, Snafu)]
pub enum AllocationError {
    /// Allocator keys hold values this allocator did not write.
    #[snafu(display("corrupted allocator state: {reason}"))]
    CorruptedState {
        /// Description of the corruption.
        reason: String,
    },

    /// The window cannot advance without overflowing `i64`.
    #[snafu(display("allocator window at {start} cannot advance further"))]
    CounterExhausted {
        /// Start of the last window.
        start: i64,
    },

    /// Underlying store error.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The underlying store error.
        source: StoreError,
    },
}

impl AllocationError {
    /// Whether retrying the enclosing transaction may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AllocationError::Storage { source } if source.is_retryable())
    }
}

impl RetryableError for AllocationError {
    fn is_retryable(&self) -> bool {
        AllocationError::is_retryable(self)
    }
}

impl From<StoreError> for AllocationError {
    fn from(source: StoreError) -> Self {
        AllocationError::Storage { source }
    }
}

// =============================================================================
// Allocator
// =============================================================================

/// Window size for a window starting at `start`.
pub fn window_size(start: i64) -> i64 {
    if start < HCA_MEDIUM_WINDOW_THRESHOLD {
        HCA_INITIAL_WINDOW_SIZE
    } else if start < HCA_LARGE_WINDOW_THRESHOLD {
        HCA_MEDIUM_WINDOW_SIZE
    } else {
        HCA_MAX_WINDOW_SIZE
    }
}

/// High-Contention Allocator over a dedicated subspace.
///
/// Holds no state of its own; every call works through the supplied
/// transaction, so one allocator value can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighContentionAllocator {
    counters: Subspace,
    recent: Subspace,
}

impl HighContentionAllocator {
    /// Create an allocator storing its state under `subspace`.
    pub fn new(subspace: &Subspace) -> Self {
        Self {
            counters: subspace.sub(HCA_COUNTERS_KEY),
            recent: subspace.sub(HCA_RECENT_KEY),
        }
    }

    /// Allocate an integer unique among all committed allocations in this
    /// subspace, returned as a packed single-element tuple.
    ///
    /// # Errors
    ///
    /// Store errors are returned as `Storage`. Conflicts surface at commit and
    /// are retried by the caller's retry driver.
    pub async fn allocate(&self, tr: &dyn Transaction) -> Result<Vec<u8>, AllocationError> {
        'window: loop {
            let (mut start, count) = self.current_window(tr).await?;
            let mut window = window_size(start);

            let claimed_twice = count
                .checked_add(1)
                .and_then(|c| c.checked_mul(2))
                .filter(|_| count >= 0)
                .ok_or_else(|| AllocationError::CorruptedState {
                    reason: format!("window at {start} has count {count}"),
                })?;
            if claimed_twice >= window {
                let next = start.checked_add(window).ok_or(AllocationError::CounterExhausted { start })?;
                self.advance_window(tr, next);
                debug!(from = start, to = next, "advanced allocation window");
                start = next;
                window = window_size(start);
            }
            // Every candidate lies in [start, start + window).
            if start.checked_add(window).is_none() {
                return Err(AllocationError::CounterExhausted { start });
            }

            tr.atomic_add(&self.counters.pack(&Tuple::new().push(start)), &1i64.to_le_bytes());

            loop {
                let candidate = {
                    let mut rng = rand::rng();
                    start + rng.random_range(0..window)
                };
                let candidate_key = self.recent.pack(&Tuple::new().push(candidate));

                let claimed = tr.get(&candidate_key, false).await?;
                let (latest_start, _) = self.current_window(tr).await?;
                if latest_start > start {
                    trace!(start, latest_start, "window advanced during allocation, restarting");
                    continue 'window;
                }

                if claimed.is_none() {
                    tr.set(&candidate_key, b"");
                    return Ok(Tuple::new().push(candidate).pack());
                }
                trace!(candidate, "allocation candidate already claimed");
            }
        }
    }

    /// Snapshot-read the newest window start and its allocation count.
    async fn current_window(&self, tr: &dyn Transaction) -> Result<(i64, i64), AllocationError> {
        let range = RangeOption::from(&self.counters).with_limit(1).reversed().snapshot();
        let Some(kv) = tr.get_range(&range).await?.into_iter().next() else {
            return Ok((0, 0));
        };

        let start = self
            .counters
            .unpack(&kv.key)
            .ok()
            .and_then(|t| t.get(0).and_then(Element::as_int))
            .ok_or_else(|| AllocationError::CorruptedState {
                reason: "counter key is not an integer tuple".to_string(),
            })?;
        Ok((start, decode_counter(&kv.value)?))
    }

    /// Forget every window below `next_start`.
    fn advance_window(&self, tr: &dyn Transaction, next_start: i64) {
        let boundary = Tuple::new().push(next_start);
        tr.clear_range(&self.counters.range().0, &self.counters.pack(&boundary));
        tr.clear_range(&self.recent.range().0, &self.recent.pack(&boundary));
    }
}

/// Decode a packed allocation result back to its integer.
pub fn decode_allocation(bytes: &[u8]) -> Result<i64, AllocationError> {
    let tuple = Tuple::unpack(bytes).map_err(|e| AllocationError::CorruptedState {
        reason: format!("invalid allocation encoding: {e}"),
    })?;
    match (tuple.len(), tuple.get(0)) {
        (1, Some(Element::Int(n))) => Ok(*n),
        _ => Err(AllocationError::CorruptedState {
            reason: "allocation is not a single integer".to_string(),
        }),
    }
}

/// Counter values are little-endian signed integers of up to 8 bytes.
fn decode_counter(value: &[u8]) -> Result<i64, AllocationError> {
    if value.len() > 8 {
        return Err(AllocationError::CorruptedState {
            reason: format!("counter value has {} bytes", value.len()),
        });
    }
    let mut buf = [0u8; 8];
    buf[..value.len()].copy_from_slice(value);
    Ok(i64::from_le_bytes(buf))
}
