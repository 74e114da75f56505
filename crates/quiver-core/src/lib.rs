//! Transactional layers for quiver.
//!
//! This crate provides the transaction traits the layers are written against,
//! an in-memory optimistic store implementing them, the retry driver, and the
//! layers themselves.
//!
//! # Key Components
//!
//! - **Traits**: `ReadTransaction`, `Transaction`, `TransactionalStore`
//! - **Store**: `MemoryDatabase` (optimistic concurrency, snapshot reads)
//! - **Retry**: `transact`, `read_transact`
//! - **Layers**: `HighContentionAllocator`, `DirectoryLayer` and friends
//! - **Constants**: on-disk layout keys and resource bounds

pub mod config;
pub mod constants;
pub mod inmemory;
pub mod layer;
pub mod retry;
pub mod traits;

// Configuration
pub use config::ConfigError;
pub use config::DirectoryConfig;
pub use config::QuiverConfig;
pub use config::TransactConfig;
// Store
pub use inmemory::MemoryDatabase;
pub use inmemory::MemoryTransaction;
// Layers
pub use layer::AllocationError;
pub use layer::Directory;
pub use layer::DirectoryError;
pub use layer::DirectoryLayer;
pub use layer::DirectoryOutput;
pub use layer::DirectoryPartition;
pub use layer::DirectorySubspace;
pub use layer::HighContentionAllocator;
// Store value types
pub use quiver_kv_types::KeyValue;
pub use quiver_kv_types::RangeOption;
pub use quiver_kv_types::RetryableError;
pub use quiver_kv_types::StoreError;
// Retry
pub use retry::read_transact;
pub use retry::transact;
// Traits
pub use traits::ReadTransaction;
pub use traits::Transaction;
pub use traits::TransactionalStore;
