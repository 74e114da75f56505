//! Size limits for keys and values.

use crate::StoreError;

/// Maximum key size in bytes.
pub const MAX_KEY_SIZE: u32 = 10_000;

/// Maximum value size in bytes.
pub const MAX_VALUE_SIZE: u32 = 100_000;

pub fn validate_key(key: &[u8]) -> Result<(), StoreError> {
    if key.len() > MAX_KEY_SIZE as usize {
        return Err(StoreError::KeyTooLarge {
            size: key.len(),
            max: MAX_KEY_SIZE,
        });
    }
    Ok(())
}

pub fn validate_value(value: &[u8]) -> Result<(), StoreError> {
    if value.len() > MAX_VALUE_SIZE as usize {
        return Err(StoreError::ValueTooLarge {
            size: value.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(())
}
