use std::cmp::Ordering;

use super::BYTES_CODE;
use super::NULL_CODE;
use super::STRING_CODE;
use super::encoding::encode_bytes_with_null_escaping;
use super::encoding::encode_int;

// =============================================================================
// Element Type
// =============================================================================

/// A single typed value within a [`Tuple`](super::Tuple).
///
/// Elements order first by type code, then by value, matching the byte order
/// of their packed form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// Null value.
    Null,
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// UTF-8 string.
    String(String),
    /// Signed 64-bit integer.
    Int(i64),
}

impl Element {
    /// Append the packed form of this element to `buf`.
    pub(crate) fn pack_into(&self, buf: &mut Vec<u8>) {
        match self {
            Element::Null => buf.push(NULL_CODE),
            Element::Bytes(bytes) => encode_bytes_with_null_escaping(BYTES_CODE, bytes, buf),
            Element::String(s) => encode_bytes_with_null_escaping(STRING_CODE, s.as_bytes(), buf),
            Element::Int(n) => encode_int(*n, buf),
        }
    }

    /// Borrow the contents of a `Bytes` element.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Element::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Borrow the contents of a `String` element.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value of an `Int` element.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Element::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Consume a `Bytes` element, returning its contents.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Element::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Consume a `String` element, returning its contents.
    pub fn into_string(self) -> Option<String> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    fn packed(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.pack_into(&mut buf);
        buf
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Element::Int(a), Element::Int(b)) => a.cmp(b),
            (Element::Bytes(a), Element::Bytes(b)) => a.cmp(b),
            (Element::String(a), Element::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            _ => self.packed().cmp(&other.packed()),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<()> for Element {
    fn from(_: ()) -> Self {
        Element::Null
    }
}

impl From<Vec<u8>> for Element {
    fn from(bytes: Vec<u8>) -> Self {
        Element::Bytes(bytes)
    }
}

impl From<&[u8]> for Element {
    fn from(bytes: &[u8]) -> Self {
        Element::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Element {
    fn from(bytes: &[u8; N]) -> Self {
        Element::Bytes(bytes.to_vec())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::String(s)
    }
}

impl From<&String> for Element {
    fn from(s: &String) -> Self {
        Element::String(s.clone())
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::String(s.to_string())
    }
}

impl From<i64> for Element {
    fn from(n: i64) -> Self {
        Element::Int(n)
    }
}

impl From<i32> for Element {
    fn from(n: i32) -> Self {
        Element::Int(i64::from(n))
    }
}

impl From<u32> for Element {
    fn from(n: u32) -> Self {
        Element::Int(i64::from(n))
    }
}
