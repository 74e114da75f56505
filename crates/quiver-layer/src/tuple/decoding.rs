use snafu::ResultExt;

use super::BYTES_CODE;
use super::INT_MAX_CODE;
use super::INT_MIN_CODE;
use super::INT_SIZE_LIMITS;
use super::INT_ZERO_CODE;
use super::InvalidUtf8Snafu;
use super::NULL_CODE;
use super::NULL_ESCAPE;
use super::STRING_CODE;
use super::TupleError;
use super::element::Element;

// =============================================================================
// Decoding Functions
// =============================================================================

/// Decode a single element from bytes at the given offset.
///
/// Returns the decoded element and the number of bytes consumed.
pub(super) fn decode_element(data: &[u8], offset: usize) -> Result<(Element, usize), TupleError> {
    let Some(&code) = data.get(offset) else {
        return Err(TupleError::UnexpectedEnd { offset });
    };

    match code {
        NULL_CODE => Ok((Element::Null, 1)),

        BYTES_CODE => {
            let (bytes, consumed) = decode_bytes_with_null_escaping(data, offset)?;
            Ok((Element::Bytes(bytes), consumed + 1))
        }

        STRING_CODE => {
            let (bytes, consumed) = decode_bytes_with_null_escaping(data, offset)?;
            let s = String::from_utf8(bytes).context(InvalidUtf8Snafu { offset })?;
            Ok((Element::String(s), consumed + 1))
        }

        INT_MIN_CODE..=INT_MAX_CODE => {
            let (n, consumed) = decode_int(data, offset)?;
            Ok((Element::Int(n), consumed))
        }

        _ => Err(TupleError::UnknownTypeCode { code, offset }),
    }
}

/// Decode the escaped body of a byte or string element whose type code sits
/// at `code_offset`.
///
/// Returns the decoded bytes and the number of bytes consumed after the type
/// code, including the terminator.
fn decode_bytes_with_null_escaping(data: &[u8], code_offset: usize) -> Result<(Vec<u8>, usize), TupleError> {
    let start = code_offset + 1;
    let mut result = Vec::new();
    let mut i = start;

    while i < data.len() {
        let b = data[i];
        if b != 0x00 {
            result.push(b);
            i += 1;
            continue;
        }

        if data.get(i + 1) == Some(&NULL_ESCAPE) {
            result.push(0x00);
            i += 2;
        } else {
            return Ok((result, i - start + 1));
        }
    }

    Err(TupleError::MissingTerminator { offset: code_offset })
}

/// Decode an integer from its ordered encoding.
fn decode_int(data: &[u8], offset: usize) -> Result<(i64, usize), TupleError> {
    let code = data[offset];
    if code == INT_ZERO_CODE {
        return Ok((0, 1));
    }

    let size = code.abs_diff(INT_ZERO_CODE) as usize;
    let body = data
        .get(offset + 1..offset + 1 + size)
        .ok_or(TupleError::UnexpectedEnd { offset })?;
    let raw = decode_uint_be(body);

    let n = if code > INT_ZERO_CODE {
        i64::try_from(raw).map_err(|_| TupleError::IntegerOverflow { offset })?
    } else {
        // Undo the complement against the size limit.
        let magnitude = INT_SIZE_LIMITS[size - 1] - raw;
        if magnitude == i64::MIN.unsigned_abs() {
            i64::MIN
        } else {
            let positive = i64::try_from(magnitude).map_err(|_| TupleError::IntegerOverflow { offset })?;
            -positive
        }
    };

    Ok((n, 1 + size))
}

/// Decode an unsigned integer from big-endian bytes.
fn decode_uint_be(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
