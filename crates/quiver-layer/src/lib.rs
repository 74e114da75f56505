//! Ordered key encoding for quiver.
//!
//! - **Tuple encoding**: order-preserving serialization of composite keys
//! - **Subspaces**: prefix-scoped key construction and parsing
//! - **Key selectors**: anchors for range reads over the ordered keyspace
//!
//! The wire format is binary-compatible with the FoundationDB tuple layer for
//! null, byte string, unicode string, and integer elements.

pub mod selector;
pub mod subspace;
pub mod tuple;

#[cfg(test)]
mod proptest;

pub use selector::KeySelector;
pub use subspace::Subspace;
pub use subspace::SubspaceError;
pub use tuple::Element;
pub use tuple::Tuple;
pub use tuple::TupleError;
pub use tuple::strinc;
