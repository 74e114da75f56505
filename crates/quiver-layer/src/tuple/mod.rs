//! Order-preserving tuple encoding.
//!
//! Packs an ordered sequence of typed elements into bytes whose lexicographic
//! order matches the element-wise order of the tuples, following the
//! [FoundationDB Tuple Layer](https://github.com/apple/foundationdb/blob/main/design/tuple.md)
//! wire format for the element types the directory layer needs.
//!
//! # Type Codes
//!
//! | Code | Type | Description |
//! |------|------|-------------|
//! | 0x00 | Null | Null value |
//! | 0x01 | Bytes | Byte string with null escaping |
//! | 0x02 | String | UTF-8 string with null escaping |
//! | 0x0C-0x13 | NegInt | Negative integers (size = 0x14 - code) |
//! | 0x14 | IntZero | Integer zero |
//! | 0x15-0x1C | PosInt | Positive integers (size = code - 0x14) |
//!
//! # Integer Encoding
//!
//! - Zero: single byte 0x14
//! - Positive: 0x14 + size_in_bytes, then big-endian magnitude
//! - Negative: 0x14 - size_in_bytes, then `(max_for_size - |n|)` big-endian
//!
//! # Example
//!
//! ```
//! use quiver_layer::Tuple;
//!
//! let tuple = Tuple::new().push("users").push(42i64).push(());
//!
//! let packed = tuple.pack();
//! let unpacked = Tuple::unpack(&packed).unwrap();
//!
//! assert_eq!(tuple, unpacked);
//! ```

mod decoding;
mod element;
mod encoding;
mod tuple_type;

#[cfg(test)]
mod tests;

pub use element::Element;
use snafu::Snafu;
pub use tuple_type::Tuple;
pub use tuple_type::strinc;

// =============================================================================
// Type Codes
// =============================================================================

/// Null value type code.
const NULL_CODE: u8 = 0x00;

/// Byte string type code.
const BYTES_CODE: u8 = 0x01;

/// UTF-8 string type code.
const STRING_CODE: u8 = 0x02;

/// Integer zero type code (pivot point for integer encoding).
const INT_ZERO_CODE: u8 = 0x14;

/// Smallest integer type code (8-byte negative).
const INT_MIN_CODE: u8 = 0x0C;

/// Largest integer type code (8-byte positive).
const INT_MAX_CODE: u8 = 0x1C;

/// Escape byte following an embedded null.
const NULL_ESCAPE: u8 = 0xFF;

/// Largest magnitude representable in `index + 1` bytes.
const INT_SIZE_LIMITS: [u64; 8] = [
    0xFF,
    0xFFFF,
    0xFF_FFFF,
    0xFFFF_FFFF,
    0xFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF,
    0xFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while decoding packed tuples.
#[derive(Debug, Snafu)]
pub enum TupleError {
    /// Unexpected end of input while decoding.
    #[snafu(display("unexpected end of input at offset {offset}"))]
    UnexpectedEnd {
        /// Byte offset where the error occurred.
        offset: usize,
    },

    /// Unknown type code encountered.
    #[snafu(display("unknown type code 0x{code:02X} at offset {offset}"))]
    UnknownTypeCode {
        /// The unknown type code.
        code: u8,
        /// Byte offset where the error occurred.
        offset: usize,
    },

    /// Invalid UTF-8 string data.
    #[snafu(display("invalid UTF-8 at offset {offset}: {source}"))]
    InvalidUtf8 {
        /// Byte offset where the error occurred.
        offset: usize,
        /// The underlying UTF-8 error.
        source: std::string::FromUtf8Error,
    },

    /// Missing null terminator for a byte or string element.
    #[snafu(display("missing null terminator for element starting at offset {offset}"))]
    MissingTerminator {
        /// Byte offset of the element's type code.
        offset: usize,
    },

    /// Integer does not fit in an `i64`.
    #[snafu(display("integer overflow at offset {offset}"))]
    IntegerOverflow {
        /// Byte offset where the error occurred.
        offset: usize,
    },
}
