use super::INT_SIZE_LIMITS;
use super::INT_ZERO_CODE;
use super::NULL_ESCAPE;

// =============================================================================
// Encoding Functions
// =============================================================================

/// Encode a byte string under `code`, escaping embedded nulls and appending
/// the terminator.
pub(super) fn encode_bytes_with_null_escaping(code: u8, bytes: &[u8], buf: &mut Vec<u8>) {
    buf.reserve(bytes.len() + 2);
    buf.push(code);
    for &b in bytes {
        buf.push(b);
        if b == 0x00 {
            buf.push(NULL_ESCAPE);
        }
    }
    buf.push(0x00);
}

/// Encode a signed integer using the variable-length ordered scheme.
pub(super) fn encode_int(n: i64, buf: &mut Vec<u8>) {
    if n == 0 {
        buf.push(INT_ZERO_CODE);
        return;
    }

    let magnitude = n.unsigned_abs();
    let size = byte_len(magnitude);
    let be = if n > 0 {
        buf.push(INT_ZERO_CODE + size as u8);
        magnitude.to_be_bytes()
    } else {
        buf.push(INT_ZERO_CODE - size as u8);
        (INT_SIZE_LIMITS[size - 1] - magnitude).to_be_bytes()
    };
    buf.extend_from_slice(&be[8 - size..]);
}

/// Number of bytes needed to hold a non-zero magnitude.
fn byte_len(magnitude: u64) -> usize {
    let bits = 64 - magnitude.leading_zeros() as usize;
    bits.div_ceil(8)
}
