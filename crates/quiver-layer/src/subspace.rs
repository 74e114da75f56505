//! Subspace: a key prefix with tuple-based key construction.
//!
//! A subspace owns a raw byte prefix. Keys inside it are the prefix followed by
//! a packed tuple, so every key a subspace produces sorts inside the
//! subspace's range and can be decoded back into its tuple.
//!
//! # Example
//!
//! ```
//! use quiver_layer::Subspace;
//! use quiver_layer::Tuple;
//!
//! let users = Subspace::new(&Tuple::new().push("users"));
//! let key = users.pack(&Tuple::new().push("alice").push("profile"));
//!
//! assert!(users.contains(&key));
//! assert_eq!(users.unpack(&key).unwrap(), Tuple::new().push("alice").push("profile"));
//! ```

use snafu::ResultExt;
use snafu::Snafu;

use crate::selector::KeySelector;
use crate::tuple::Element;
use crate::tuple::Tuple;
use crate::tuple::TupleError;

/// Errors returned when decoding keys through a subspace.
#[derive(Debug, Snafu)]
pub enum SubspaceError {
    /// Key does not start with the subspace prefix.
    #[snafu(display("key not in subspace"))]
    NotInSubspace,

    /// Suffix after the prefix is not a valid packed tuple.
    #[snafu(display("failed to decode key suffix: {source}"))]
    Decode {
        /// Underlying tuple error.
        source: TupleError,
    },
}

/// A contiguous region of keyspace identified by a raw byte prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Subspace {
    prefix: Vec<u8>,
}

impl Subspace {
    /// Subspace covering every key (empty prefix).
    pub fn all() -> Self {
        Self { prefix: Vec::new() }
    }

    /// Subspace whose prefix is the packed form of `tuple`.
    pub fn new(tuple: &Tuple) -> Self {
        Self { prefix: tuple.pack() }
    }

    /// Subspace over a raw, non-tuple prefix.
    pub fn from_bytes(prefix: impl Into<Vec<u8>>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// The raw prefix bytes.
    pub fn raw_prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Nested subspace: this prefix followed by the packed `suffix`.
    pub fn subspace(&self, suffix: &Tuple) -> Subspace {
        Subspace {
            prefix: self.pack(suffix),
        }
    }

    /// Nested subspace for a single element.
    pub fn sub<E: Into<Element>>(&self, element: E) -> Subspace {
        self.subspace(&Tuple::new().push(element))
    }

    /// Key for `tuple` inside this subspace.
    pub fn pack(&self, tuple: &Tuple) -> Vec<u8> {
        let mut key = self.prefix.clone();
        tuple.pack_into(&mut key);
        key
    }

    /// Decode the tuple suffix of `key`.
    ///
    /// # Errors
    ///
    /// `NotInSubspace` when `key` does not start with the prefix, `Decode`
    /// when the remainder is not a valid packed tuple.
    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, SubspaceError> {
        let suffix = key.strip_prefix(self.prefix.as_slice()).ok_or(SubspaceError::NotInSubspace)?;
        Tuple::unpack(suffix).context(DecodeSnafu)
    }

    /// Whether `key` starts with this subspace's prefix.
    pub fn contains(&self, key: &[u8]) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Begin and end keys spanning every tuple key in this subspace:
    /// `(prefix + 0x00, prefix + 0xFF)`.
    pub fn range(&self) -> (Vec<u8>, Vec<u8>) {
        let mut begin = self.prefix.clone();
        begin.push(0x00);
        let mut end = self.prefix.clone();
        end.push(0xFF);
        (begin, end)
    }

    /// Selectors for a range read over [`range`](Self::range).
    pub fn range_selectors(&self) -> (KeySelector, KeySelector) {
        let (begin, end) = self.range();
        (
            KeySelector::first_greater_or_equal(begin),
            KeySelector::first_greater_or_equal(end),
        )
    }
}
