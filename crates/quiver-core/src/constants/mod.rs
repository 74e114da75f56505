//! Centralized constants for quiver.
//!
//! Constants are fixed at compile time and bound every loop and collection
//! the layer could otherwise grow without limit.
//!
//! # Modules
//!
//! - [`directory`]: On-disk layout keys, version, allocator windows, path bounds
//! - [`transaction`]: Retry driver backoff and in-memory conflict history

pub mod directory;
pub mod transaction;

pub use transaction::DEFAULT_INITIAL_BACKOFF_MS;
pub use transaction::DEFAULT_MAX_BACKOFF_MS;
pub use transaction::DEFAULT_RETRY_LIMIT;
