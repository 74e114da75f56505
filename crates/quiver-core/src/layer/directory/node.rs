//! Resolved views of directory tree nodes.
//!
//! Walking a path yields a [`Node`]: where the walk stopped, with no layer
//! read yet. [`Node::fetch_metadata`] performs that one read and produces a
//! [`NodeInfo`]. Both are recomputed per transaction and never cached.

use quiver_layer::Subspace;
use quiver_layer::Tuple;

use super::DirectoryError;
use crate::constants::directory::LAYER_KEY;
use crate::constants::directory::PARTITION_LAYER;
use crate::traits::Transaction;

/// Where a directory's node lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NodeLocation {
    /// Content prefix of the directory.
    pub prefix: Vec<u8>,
    /// `node_subspace.sub(prefix)`.
    pub subspace: Subspace,
}

/// A node reached by walking `path` toward `target_path`.
#[derive(Debug, Clone)]
pub(super) struct Node {
    location: Option<NodeLocation>,
    path: Vec<String>,
    target_path: Vec<String>,
}

impl Node {
    pub fn new(location: Option<NodeLocation>, path: Vec<String>, target_path: Vec<String>) -> Self {
        Self {
            location,
            path,
            target_path,
        }
    }

    /// Read the node's layer tag. Missing nodes read nothing.
    pub async fn fetch_metadata(self, tr: &dyn Transaction) -> Result<NodeInfo, DirectoryError> {
        let layer = match &self.location {
            Some(location) => {
                let key = location.subspace.pack(&Tuple::new().push(LAYER_KEY));
                tr.get(&key, false).await?.unwrap_or_default()
            }
            None => Vec::new(),
        };

        Ok(NodeInfo {
            location: self.location,
            path: self.path,
            target_path: self.target_path,
            layer,
        })
    }
}

/// A node together with its layer tag.
#[derive(Debug, Clone)]
pub(super) struct NodeInfo {
    location: Option<NodeLocation>,
    path: Vec<String>,
    target_path: Vec<String>,
    layer: Vec<u8>,
}

impl NodeInfo {
    pub fn exists(&self) -> bool {
        self.location.is_some()
    }

    pub fn location(&self) -> Option<&NodeLocation> {
        self.location.as_ref()
    }

    pub fn layer(&self) -> &[u8] {
        &self.layer
    }

    /// Path segments consumed by the walk.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_partition(&self) -> bool {
        self.exists() && self.layer == PARTITION_LAYER
    }

    /// Whether the walk stopped at a partition.
    ///
    /// Unless `include_empty_subpath` is set, a path naming the partition
    /// itself does not count as inside it.
    pub fn is_in_partition(&self, include_empty_subpath: bool) -> bool {
        self.is_partition() && (include_empty_subpath || self.target_path.len() > self.path.len())
    }

    /// Remaining segments below the node where the walk stopped.
    pub fn partition_subpath(&self) -> Vec<String> {
        self.target_path[self.path.len()..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(exists: bool, layer: &[u8], path: &[&str], target: &[&str]) -> NodeInfo {
        NodeInfo {
            location: exists.then(|| NodeLocation {
                prefix: vec![0x15],
                subspace: Subspace::from_bytes(vec![0xFE]).sub(vec![0x15u8]),
            }),
            path: path.iter().map(|s| s.to_string()).collect(),
            target_path: target.iter().map(|s| s.to_string()).collect(),
            layer: layer.to_vec(),
        }
    }

    #[test]
    fn test_partition_membership() {
        let at_partition = info(true, b"partition", &["p"], &["p"]);
        assert!(at_partition.is_partition());
        assert!(!at_partition.is_in_partition(false));
        assert!(at_partition.is_in_partition(true));
        assert!(at_partition.partition_subpath().is_empty());

        let below = info(true, b"partition", &["p"], &["p", "a", "b"]);
        assert!(below.is_in_partition(false));
        assert_eq!(below.partition_subpath(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_node_is_not_partition() {
        let missing = info(false, b"", &["p"], &["p", "a"]);
        assert!(!missing.exists());
        assert!(!missing.is_partition());
        assert!(!missing.is_in_partition(true));
    }

    #[test]
    fn test_plain_layer_is_not_partition() {
        let plain = info(true, b"app", &["a"], &["a", "b"]);
        assert!(!plain.is_in_partition(true));
        assert_eq!(plain.layer(), b"app");
    }
}
