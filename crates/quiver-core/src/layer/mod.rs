//! Layers built on top of the transactional store.
//!
//! - [`allocator`]: High-contention allocation of short integer prefixes
//! - [`directory`]: Hierarchical directories mapped onto allocated prefixes

pub mod allocator;
pub mod directory;

pub use allocator::AllocationError;
pub use allocator::HighContentionAllocator;
pub use directory::Directory;
pub use directory::DirectoryError;
pub use directory::DirectoryLayer;
pub use directory::DirectoryOutput;
pub use directory::DirectoryPartition;
pub use directory::DirectorySubspace;
