//! DirectoryOutput - the result of opening or creating a directory.

use async_trait::async_trait;
use quiver_layer::Element;
use quiver_layer::Subspace;
use quiver_layer::Tuple;

use super::Directory;
use super::DirectoryError;
use super::partition::DirectoryPartition;
use super::subspace::DirectorySubspace;
use crate::traits::Transaction;

/// An opened directory: either a plain directory with usable keyspace or a
/// partition root.
///
/// Key-space accessors fail with [`DirectoryError::CannotUsePartitionRoot`]
/// on a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryOutput {
    Subspace(DirectorySubspace),
    Partition(DirectoryPartition),
}

impl DirectoryOutput {
    pub fn is_partition(&self) -> bool {
        matches!(self, DirectoryOutput::Partition(_))
    }

    /// The directory's subspace.
    pub fn subspace(&self) -> Result<&DirectorySubspace, DirectoryError> {
        match self {
            DirectoryOutput::Subspace(subspace) => Ok(subspace),
            DirectoryOutput::Partition(_) => Err(DirectoryError::CannotUsePartitionRoot),
        }
    }

    pub fn into_subspace(self) -> Result<DirectorySubspace, DirectoryError> {
        match self {
            DirectoryOutput::Subspace(subspace) => Ok(subspace),
            DirectoryOutput::Partition(_) => Err(DirectoryError::CannotUsePartitionRoot),
        }
    }

    pub fn as_partition(&self) -> Option<&DirectoryPartition> {
        match self {
            DirectoryOutput::Partition(partition) => Some(partition),
            DirectoryOutput::Subspace(_) => None,
        }
    }

    pub fn prefix(&self) -> Result<&[u8], DirectoryError> {
        Ok(self.subspace()?.prefix())
    }

    pub fn pack(&self, key: &Tuple) -> Result<Vec<u8>, DirectoryError> {
        Ok(self.subspace()?.pack(key))
    }

    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, DirectoryError> {
        Ok(self.subspace()?.unpack(key)?)
    }

    pub fn range(&self) -> Result<(Vec<u8>, Vec<u8>), DirectoryError> {
        Ok(self.subspace()?.range())
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool, DirectoryError> {
        Ok(self.subspace()?.contains(key))
    }

    pub fn sub<E: Into<Element>>(&self, element: E) -> Result<Subspace, DirectoryError> {
        Ok(self.subspace()?.sub(element))
    }

    /// Fail unless this directory carries the layer tag `expected`.
    pub fn check_layer(&self, expected: &[u8]) -> Result<(), DirectoryError> {
        match self {
            DirectoryOutput::Subspace(subspace) => subspace.check_layer(expected),
            DirectoryOutput::Partition(partition) => {
                if !expected.is_empty() && expected != partition.layer() {
                    return Err(DirectoryError::IncompatibleLayer {
                        path: partition.path().to_vec(),
                        expected: expected.to_vec(),
                        actual: partition.layer().to_vec(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Allocated prefix, including a partition's.
    pub(super) fn raw_prefix(&self) -> &[u8] {
        match self {
            DirectoryOutput::Subspace(subspace) => subspace.prefix(),
            DirectoryOutput::Partition(partition) => partition.raw_prefix(),
        }
    }

    fn as_directory(&self) -> &dyn Directory {
        match self {
            DirectoryOutput::Subspace(subspace) => subspace,
            DirectoryOutput::Partition(partition) => partition,
        }
    }
}

#[async_trait]
impl Directory for DirectoryOutput {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().create_or_open(tr, path, layer).await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().create(tr, path, layer).await
    }

    async fn create_prefix(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
        prefix: &[u8],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().create_prefix(tr, path, layer, prefix).await
    }

    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().open(tr, path, layer).await
    }

    async fn move_to(&self, tr: &dyn Transaction, new_absolute_path: &[&str]) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().move_to(tr, new_absolute_path).await
    }

    async fn move_directory(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.as_directory().move_directory(tr, old_path, new_path).await
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.as_directory().remove(tr, path).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.as_directory().exists(tr, path).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        self.as_directory().list(tr, path).await
    }

    fn layer(&self) -> &[u8] {
        self.as_directory().layer()
    }

    fn path(&self) -> &[String] {
        self.as_directory().path()
    }
}
