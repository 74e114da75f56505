//! Value types shared by quiver transactional stores.
//!
//! Stores exchange raw byte keys and values, describe range reads with
//! [`RangeOption`], and report failures through [`StoreError`].

mod error;
mod range;
mod validation;

use serde::Deserialize;
use serde::Serialize;

pub use error::RetryableError;
pub use error::StoreError;
pub use range::RangeOption;
pub use validation::MAX_KEY_SIZE;
pub use validation::MAX_VALUE_SIZE;
pub use validation::validate_key;
pub use validation::validate_value;

/// A key and its value as returned by a range read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
