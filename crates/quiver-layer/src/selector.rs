//! Key selectors for range reads.

/// Identifies a key relative to an anchor key in the store.
///
/// A selector resolves by finding the last key less than `key` (or less than
/// or equal to `key` when `or_equal` is set) and then stepping `offset` keys
/// forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySelector {
    key: Vec<u8>,
    or_equal: bool,
    offset: i32,
}

impl KeySelector {
    /// Create a selector from its raw parts.
    pub fn new(key: impl Into<Vec<u8>>, or_equal: bool, offset: i32) -> Self {
        Self {
            key: key.into(),
            or_equal,
            offset,
        }
    }

    /// The last key strictly less than `key`.
    pub fn last_less_than(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, false, 0)
    }

    /// The last key less than or equal to `key`.
    pub fn last_less_or_equal(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, true, 0)
    }

    /// The first key strictly greater than `key`.
    pub fn first_greater_than(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, true, 1)
    }

    /// The first key greater than or equal to `key`.
    pub fn first_greater_or_equal(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, false, 1)
    }

    /// Anchor key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Whether the anchor itself counts as "less".
    pub fn or_equal(&self) -> bool {
        self.or_equal
    }

    /// Number of keys to step from the resolved anchor.
    pub fn offset(&self) -> i32 {
        self.offset
    }
}
