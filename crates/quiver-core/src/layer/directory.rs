//! FoundationDB-style Directory Layer for hierarchical namespace management.
//!
//! The Directory Layer maps human-readable paths to short binary prefixes
//! minted by the [`HighContentionAllocator`](super::HighContentionAllocator).
//! Every operation runs inside a caller-supplied [`Transaction`] and performs
//! a single attempt; retrying conflicts belongs to the retry driver.
//!
//! # Layout
//!
//! The tree lives in a node subspace (`0xFE` for the root layer). A directory
//! with prefix `P` has a node at `node_subspace.sub(P)` holding:
//!
//! - `("layer",)`: the raw layer tag
//! - `(0, name)`: the prefix of each child directory
//!
//! The root node is `node_subspace.sub(node_subspace.raw_prefix())`. It also
//! carries the format version under `("version",)` and the allocator state
//! under `("hca", ...)`.
//!
//! # Partitions
//!
//! A directory created with the `partition` layer roots a nested directory
//! layer inside its own prefix. Path operations that cross into a partition
//! are resolved once and handed to the partition's layer with the remaining
//! subpath.
//!
//! # Limits
//!
//! Paths are bounded by [`MAX_DIRECTORY_DEPTH`] components per layer and
//! [`MAX_PATH_COMPONENT_LENGTH_BYTES`] bytes per component, failing with
//! [`DirectoryError::PathTooDeep`] and [`DirectoryError::InvalidPath`]. The
//! directory protocol itself has no such bounds; they only cap recursion and
//! key sizes in this implementation. The depth is that of the path the
//! owning layer receives: calls through the root layer count from the root,
//! while calls on a partition handle count from the partition.
//!
//! [`MAX_DIRECTORY_DEPTH`]: crate::constants::directory::MAX_DIRECTORY_DEPTH
//! [`MAX_PATH_COMPONENT_LENGTH_BYTES`]: crate::constants::directory::MAX_PATH_COMPONENT_LENGTH_BYTES
//!
//! # Example
//!
//! ```ignore
//! use quiver_core::layer::{Directory, DirectoryLayer};
//!
//! let dir = DirectoryLayer::default();
//! let invoices = db
//!     .transact(|tr| {
//!         let dir = dir.clone();
//!         async move { dir.create_or_open(&tr, &["apps", "billing", "invoices"], None).await }
//!     })
//!     .await?;
//!
//! let key = invoices.pack(&Tuple::new().push(invoice_id).push("metadata"))?;
//! ```
//!
//! # References
//!
//! - [FoundationDB Directory Layer](https://apple.github.io/foundationdb/developer-guide.html#directories)

mod layer;
mod node;
mod output;
mod partition;
mod subspace;
mod validation;


use async_trait::async_trait;
pub use layer::DirectoryLayer;
pub use output::DirectoryOutput;
pub use partition::DirectoryPartition;
use quiver_kv_types::RetryableError;
use quiver_kv_types::StoreError;
use quiver_layer::SubspaceError;
use snafu::Snafu;
pub use subspace::DirectorySubspace;

use super::allocator::AllocationError;
use crate::traits::Transaction;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during directory operations.
#[derive(Debug, Snafu)]
pub enum DirectoryError {
    /// The root directory cannot be created or opened by name.
    #[snafu(display("the root directory cannot be opened"))]
    CannotOpenRoot,

    #[snafu(display("the root directory cannot be moved"))]
    CannotMoveRoot,

    #[snafu(display("the root directory cannot be removed"))]
    CannotRemoveRoot,

    /// Directory not found at the specified path.
    #[snafu(display("directory does not exist: /{}", path.join("/")))]
    NotFound {
        /// The path that was not found.
        path: Vec<String>,
    },

    /// Directory already exists at the specified path.
    #[snafu(display("directory already exists: /{}", path.join("/")))]
    AlreadyExists {
        /// The path that already exists.
        path: Vec<String>,
    },

    /// The parent of a move destination does not exist.
    #[snafu(display("parent of destination /{} does not exist", path.join("/")))]
    ParentNotFound {
        /// The destination path.
        path: Vec<String>,
    },

    /// Layer tag mismatch when opening a directory.
    #[snafu(display(
        "directory /{} was created with an incompatible layer: expected '{}', found '{}'",
        path.join("/"),
        printable(expected),
        printable(actual)
    ))]
    IncompatibleLayer {
        /// The path with mismatched layer.
        path: Vec<String>,
        /// Layer tag requested by the caller.
        expected: Vec<u8>,
        /// Layer tag stored in the directory.
        actual: Vec<u8>,
    },

    #[snafu(display("cannot move between partitions"))]
    CannotMoveBetweenPartitions,

    /// Cannot move a directory to a subdirectory of itself.
    #[snafu(display("the destination directory cannot be a subdirectory of the source directory"))]
    MoveCycle,

    /// A manually specified prefix overlaps an existing directory.
    #[snafu(display("prefix '{}' is already in use", printable(prefix)))]
    PrefixInUse { prefix: Vec<u8> },

    /// Keys already exist under a freshly allocated prefix.
    #[snafu(display("the database has keys stored at allocated prefix '{}'", printable(prefix)))]
    PrefixNotEmpty { prefix: Vec<u8> },

    /// A freshly allocated prefix overlaps a manually specified one.
    #[snafu(display(
        "manually allocated prefixes conflict with allocated prefix '{}'",
        printable(prefix)
    ))]
    AllocatorPrefixConflict { prefix: Vec<u8> },

    /// The prefix has no key range above it.
    #[snafu(display("invalid prefix '{}'", printable(prefix)))]
    InvalidPrefix { prefix: Vec<u8> },

    #[snafu(display("cannot specify a prefix unless manual prefixes are enabled"))]
    ManualPrefixesDisabled,

    #[snafu(display("cannot specify a prefix in a partition"))]
    PrefixInPartition,

    /// Stored format is newer than this layer can read.
    #[snafu(display("cannot load directory with version {stored}"))]
    IncompatibleVersion { stored: String },

    /// Stored format is newer than this layer can write.
    #[snafu(display("directory with version {stored} is read-only"))]
    ReadOnlyVersion { stored: String },

    /// Key-space operations on a partition root.
    #[snafu(display("cannot use the root of a directory partition as a subspace"))]
    CannotUsePartitionRoot,

    /// Path component is invalid (too long).
    #[snafu(display("invalid path component '{component}': {reason}"))]
    InvalidPath {
        /// The invalid component.
        component: String,
        /// Why it's invalid.
        reason: String,
    },

    /// Path exceeds maximum depth.
    #[snafu(display("path depth {depth} exceeds maximum of {max}"))]
    PathTooDeep { depth: usize, max: usize },

    /// Directory metadata is corrupted.
    #[snafu(display("corrupted directory metadata: {reason}"))]
    CorruptedMetadata {
        /// Description of the corruption.
        reason: String,
    },

    /// A stored key could not be decoded.
    #[snafu(display("key error: {source}"))]
    Key { source: SubspaceError },

    /// Prefix allocation failed.
    #[snafu(display("prefix allocation failed: {source}"))]
    Allocation { source: AllocationError },

    /// Storage error during directory operation.
    #[snafu(display("storage error: {source}"))]
    Storage { source: StoreError },
}

impl From<StoreError> for DirectoryError {
    fn from(source: StoreError) -> Self {
        DirectoryError::Storage { source }
    }
}

impl From<AllocationError> for DirectoryError {
    fn from(source: AllocationError) -> Self {
        match source {
            AllocationError::Storage { source } => DirectoryError::Storage { source },
            source => DirectoryError::Allocation { source },
        }
    }
}

impl From<SubspaceError> for DirectoryError {
    fn from(source: SubspaceError) -> Self {
        DirectoryError::Key { source }
    }
}

impl RetryableError for DirectoryError {
    fn is_retryable(&self) -> bool {
        match self {
            DirectoryError::Storage { source } => source.is_retryable(),
            DirectoryError::Allocation { source } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Render bytes for error messages, escaping anything outside printable ASCII.
fn printable(bytes: &[u8]) -> String {
    bytes.iter().flat_map(|b| std::ascii::escape_default(*b)).map(char::from).collect()
}

// =============================================================================
// Directory Trait
// =============================================================================

/// Path operations shared by [`DirectoryLayer`], [`DirectorySubspace`],
/// [`DirectoryPartition`] and [`DirectoryOutput`].
///
/// Paths are relative to the receiver. `layer` arguments of `None` (or
/// empty) skip the layer check when opening and store an empty tag when
/// creating.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Open the directory at `path`, creating it and any missing parents.
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError>;

    /// Create the directory at `path`; fails if it already exists.
    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError>;

    /// Create the directory at `path` with a caller-chosen prefix.
    async fn create_prefix(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
        prefix: &[u8],
    ) -> Result<DirectoryOutput, DirectoryError>;

    /// Open the existing directory at `path`.
    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError>;

    /// Move this directory to `new_absolute_path` within the same partition.
    async fn move_to(&self, tr: &dyn Transaction, new_absolute_path: &[&str]) -> Result<DirectoryOutput, DirectoryError>;

    /// Move the directory at `old_path` to `new_path`, keeping its prefix.
    async fn move_directory(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError>;

    /// Remove the directory at `path` with all its contents and
    /// subdirectories. Returns `false` if nothing existed there.
    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError>;

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError>;

    /// Names of the immediate subdirectories of `path`, in key order.
    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError>;

    /// Layer tag of this directory.
    fn layer(&self) -> &[u8];

    /// Absolute path of this directory.
    fn path(&self) -> &[String];
}

fn to_owned_path(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}
