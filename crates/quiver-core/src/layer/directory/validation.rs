//! Path validation helper functions for the directory layer.

use super::DirectoryError;
use crate::constants::directory::MAX_DIRECTORY_DEPTH;
use crate::constants::directory::MAX_PATH_COMPONENT_LENGTH_BYTES;

/// Check a relative path against the depth and component size bounds.
///
/// Empty paths and empty components are valid here; operations that cannot
/// address the root reject the empty path themselves.
pub(super) fn validate_path(path: &[String]) -> Result<(), DirectoryError> {
    if path.len() > MAX_DIRECTORY_DEPTH {
        return Err(DirectoryError::PathTooDeep {
            depth: path.len(),
            max: MAX_DIRECTORY_DEPTH,
        });
    }

    for component in path {
        if component.len() > MAX_PATH_COMPONENT_LENGTH_BYTES {
            return Err(DirectoryError::InvalidPath {
                component: component.chars().take(32).collect(),
                reason: format!(
                    "component length {} exceeds maximum {}",
                    component.len(),
                    MAX_PATH_COMPONENT_LENGTH_BYTES
                ),
            });
        }
    }

    Ok(())
}
