//! Directory layer constants.
//!
//! The layout keys below are part of the on-disk format shared with every
//! other implementation of the directory protocol. Changing them breaks
//! interoperability with existing data.

/// Reserved byte prefixing the root node subspace, and appended to a
/// partition's prefix to form the partition's node subspace.
pub const DEFAULT_NODE_PREFIX: u8 = 0xFE;

/// Tuple key (integer) of the child-pointer table inside a node.
pub const SUBDIRS_KEY: i64 = 0;

/// Tuple key (bytes) of a node's layer tag.
pub const LAYER_KEY: &[u8] = b"layer";

/// Tuple key (bytes) of the version triple under the root node.
pub const VERSION_KEY: &[u8] = b"version";

/// Tuple key (bytes) of the allocator state under the root node.
pub const HCA_KEY: &[u8] = b"hca";

/// Layer tag marking a directory partition.
pub const PARTITION_LAYER: &[u8] = b"partition";

/// Directory layer format version written on first use: (major, minor, micro).
pub const LAYER_VERSION: (i32, i32, i32) = (1, 0, 0);

/// Encoded size of the stored version triple: three little-endian `i32`s.
pub const VERSION_ENCODED_SIZE: usize = 12;

// =============================================================================
// High-Contention Allocator
// =============================================================================

/// Tuple key of the allocator's window counters.
pub const HCA_COUNTERS_KEY: i64 = 0;

/// Tuple key of the allocator's recently claimed candidates.
pub const HCA_RECENT_KEY: i64 = 1;

/// Window size while the window start is below [`HCA_MEDIUM_WINDOW_THRESHOLD`].
pub const HCA_INITIAL_WINDOW_SIZE: i64 = 64;

/// Window size while the window start is below [`HCA_LARGE_WINDOW_THRESHOLD`].
pub const HCA_MEDIUM_WINDOW_SIZE: i64 = 1024;

/// Window size once the window start reaches [`HCA_LARGE_WINDOW_THRESHOLD`].
pub const HCA_MAX_WINDOW_SIZE: i64 = 8192;

/// Window start at which windows grow to [`HCA_MEDIUM_WINDOW_SIZE`].
pub const HCA_MEDIUM_WINDOW_THRESHOLD: i64 = 255;

/// Window start at which windows grow to [`HCA_MAX_WINDOW_SIZE`].
pub const HCA_LARGE_WINDOW_THRESHOLD: i64 = 65535;

// =============================================================================
// Path Bounds
// =============================================================================

/// Maximum number of components in a path handed to one directory layer.
///
/// Only bounds the recursion of parent creation. A partition's own layer
/// counts from the partition.
pub const MAX_DIRECTORY_DEPTH: usize = 128;

/// Maximum size of a single path component, in UTF-8 bytes.
pub const MAX_PATH_COMPONENT_LENGTH_BYTES: usize = 1024;
