//! Quiver: a directory layer over a transactional ordered key-value store.
//!
//! Applications name their data with hierarchical paths such as
//! `["app", "users"]`. The directory layer maps every path to a short,
//! unique byte prefix, so keys stay compact and whole directories can be
//! moved by rewriting a single pointer.
//!
//! # Crates
//!
//! - [`quiver_layer`]: tuple encoding, subspaces and key selectors
//! - [`quiver_kv_types`]: key-value, range and error types
//! - [`quiver_core`]: transaction traits, the in-memory store, the retry
//!   driver, the high-contention allocator and the directory layer
//!
//! The most used items are re-exported at the crate root.
//!
//! # Example
//!
//! ```ignore
//! use quiver::Directory;
//! use quiver::DirectoryLayer;
//! use quiver::MemoryDatabase;
//! use quiver::Tuple;
//!
//! let db = MemoryDatabase::new();
//! let dl = DirectoryLayer::default();
//! let users = db
//!     .transact(|tr| {
//!         let dl = dl.clone();
//!         async move { dl.create_or_open(&tr, &["app", "users"], None).await }
//!     })
//!     .await?;
//! let key = users.pack(&Tuple::new().push("alice"))?;
//! ```

pub use quiver_core;
pub use quiver_kv_types;
pub use quiver_layer;

// Encoding
pub use quiver_layer::Element;
pub use quiver_layer::KeySelector;
pub use quiver_layer::Subspace;
pub use quiver_layer::SubspaceError;
pub use quiver_layer::Tuple;
pub use quiver_layer::TupleError;
pub use quiver_layer::strinc;
// Store value types
pub use quiver_kv_types::KeyValue;
pub use quiver_kv_types::RangeOption;
pub use quiver_kv_types::RetryableError;
pub use quiver_kv_types::StoreError;
// Store and retry
pub use quiver_core::MemoryDatabase;
pub use quiver_core::MemoryTransaction;
pub use quiver_core::ReadTransaction;
pub use quiver_core::Transaction;
pub use quiver_core::TransactionalStore;
pub use quiver_core::read_transact;
pub use quiver_core::transact;
// Layers
pub use quiver_core::AllocationError;
pub use quiver_core::Directory;
pub use quiver_core::DirectoryError;
pub use quiver_core::DirectoryLayer;
pub use quiver_core::DirectoryOutput;
pub use quiver_core::DirectoryPartition;
pub use quiver_core::DirectorySubspace;
pub use quiver_core::HighContentionAllocator;
// Configuration
pub use quiver_core::ConfigError;
pub use quiver_core::DirectoryConfig;
pub use quiver_core::QuiverConfig;
pub use quiver_core::TransactConfig;
