//! DirectoryPartition - a directory rooting its own nested directory layer.

use async_trait::async_trait;
use quiver_layer::Subspace;

use super::Directory;
use super::DirectoryError;
use super::layer::DirectoryLayer;
use super::output::DirectoryOutput;
use crate::constants::directory::DEFAULT_NODE_PREFIX;
use crate::constants::directory::PARTITION_LAYER;
use crate::traits::Transaction;

/// A directory whose whole subtree lives in its own prefix.
///
/// The nested layer keeps its nodes under `prefix + 0xFE` and allocates
/// children from `prefix`. The partition itself has no usable keyspace;
/// only its descendants do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPartition {
    inner: DirectoryLayer,
    parent: DirectoryLayer,
    prefix: Vec<u8>,
    path: Vec<String>,
}

impl DirectoryPartition {
    pub(super) fn new(path: Vec<String>, prefix: Vec<u8>, parent: DirectoryLayer) -> Self {
        Self {
            inner: Self::inner_layer(path.clone(), &prefix),
            parent,
            prefix,
            path,
        }
    }

    /// Nested layer for the partition at absolute `path` with `prefix`.
    pub(super) fn inner_layer(path: Vec<String>, prefix: &[u8]) -> DirectoryLayer {
        let mut node_prefix = prefix.to_vec();
        node_prefix.push(DEFAULT_NODE_PREFIX);
        DirectoryLayer::new(Subspace::from_bytes(node_prefix), Subspace::from_bytes(prefix.to_vec()), false)
            .with_path(path)
    }

    /// The nested directory layer rooted at this partition.
    pub fn directory_layer(&self) -> &DirectoryLayer {
        &self.inner
    }

    pub(super) fn raw_prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// An empty path addresses the partition itself, which belongs to the
    /// parent layer; anything below it belongs to the nested layer.
    fn layer_for_path(&self, path: &[&str]) -> &DirectoryLayer {
        if path.is_empty() { &self.parent } else { &self.inner }
    }
}

#[async_trait]
impl Directory for DirectoryPartition {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.inner.create_or_open(tr, path, layer).await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.inner.create(tr, path, layer).await
    }

    async fn create_prefix(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
        prefix: &[u8],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.inner.create_prefix(tr, path, layer, prefix).await
    }

    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.inner.open(tr, path, layer).await
    }

    async fn move_to(&self, tr: &dyn Transaction, new_absolute_path: &[&str]) -> Result<DirectoryOutput, DirectoryError> {
        self.parent.move_absolute(tr, &self.path, new_absolute_path).await
    }

    async fn move_directory(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError> {
        let layer = self.layer_for_path(old_path);
        layer
            .move_internal(
                tr,
                layer.partition_subpath(&self.path, old_path),
                layer.partition_subpath(&self.path, new_path),
            )
            .await
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let layer = self.layer_for_path(path);
        layer.remove_internal(tr, layer.partition_subpath(&self.path, path)).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let layer = self.layer_for_path(path);
        layer.exists_internal(tr, layer.partition_subpath(&self.path, path)).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        self.inner.list(tr, path).await
    }

    fn layer(&self) -> &[u8] {
        PARTITION_LAYER
    }

    fn path(&self) -> &[String] {
        &self.path
    }
}
