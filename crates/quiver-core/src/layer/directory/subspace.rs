//! DirectorySubspace - a directory with an allocated prefix.

use async_trait::async_trait;
use quiver_layer::Element;
use quiver_layer::Subspace;
use quiver_layer::SubspaceError;
use quiver_layer::Tuple;

use super::Directory;
use super::DirectoryError;
use super::layer::DirectoryLayer;
use super::output::DirectoryOutput;
use crate::traits::Transaction;

/// A directory with an allocated prefix, extending Subspace with metadata.
///
/// `DirectorySubspace` provides all the functionality of a `Subspace` for key
/// encoding, plus the directory's absolute path and layer tag. Path
/// operations on it are relative to the directory itself.
///
/// # Example
///
/// ```ignore
/// let invoices = dir.create_or_open(&tr, &["apps", "billing", "invoices"], None).await?;
///
/// // Use subspace operations
/// let key = invoices.pack(&Tuple::new().push(invoice_id).push("name"))?;
///
/// // Nested directories
/// let archived = invoices.create_or_open(&tr, &["archived"], None).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySubspace {
    /// The underlying subspace with the allocated prefix.
    subspace: Subspace,
    /// Layer that owns this directory's node.
    directory_layer: DirectoryLayer,
    /// Full path to this directory.
    path: Vec<String>,
    /// Layer tag stored with the directory.
    layer: Vec<u8>,
}

impl DirectorySubspace {
    pub(super) fn new(subspace: Subspace, directory_layer: DirectoryLayer, path: Vec<String>, layer: Vec<u8>) -> Self {
        Self {
            subspace,
            directory_layer,
            path,
            layer,
        }
    }

    /// Get the underlying subspace.
    pub fn subspace(&self) -> &Subspace {
        &self.subspace
    }

    pub fn directory_layer(&self) -> &DirectoryLayer {
        &self.directory_layer
    }

    /// Get the raw prefix bytes.
    pub fn prefix(&self) -> &[u8] {
        self.subspace.raw_prefix()
    }

    /// Pack a key tuple within this directory's subspace.
    pub fn pack(&self, key: &Tuple) -> Vec<u8> {
        self.subspace.pack(key)
    }

    /// Unpack a key from this directory's subspace.
    ///
    /// Returns the key tuple without this directory's prefix.
    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, SubspaceError> {
        self.subspace.unpack(key)
    }

    /// Get the range of all keys in this directory.
    ///
    /// Returns `(start_key, end_key)` where start is inclusive and end is exclusive.
    pub fn range(&self) -> (Vec<u8>, Vec<u8>) {
        self.subspace.range()
    }

    /// Check if a key belongs to this directory.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.subspace.contains(key)
    }

    /// Create a nested subspace within this directory.
    pub fn sub<E: Into<Element>>(&self, element: E) -> Subspace {
        self.subspace.sub(element)
    }

    /// Fail unless this directory carries the layer tag `expected`.
    pub fn check_layer(&self, expected: &[u8]) -> Result<(), DirectoryError> {
        if !expected.is_empty() && expected != self.layer.as_slice() {
            return Err(DirectoryError::IncompatibleLayer {
                path: self.path.clone(),
                expected: expected.to_vec(),
                actual: self.layer.clone(),
            });
        }
        Ok(())
    }

    fn subpath(&self, path: &[&str]) -> Vec<String> {
        self.directory_layer.partition_subpath(&self.path, path)
    }
}

#[async_trait]
impl Directory for DirectorySubspace {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer
            .create_or_open_internal(tr, self.subpath(path), layer.map(<[u8]>::to_vec), None, true, true)
            .await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer
            .create_or_open_internal(tr, self.subpath(path), layer.map(<[u8]>::to_vec), None, true, false)
            .await
    }

    async fn create_prefix(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
        prefix: &[u8],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer
            .create_or_open_internal(
                tr,
                self.subpath(path),
                layer.map(<[u8]>::to_vec),
                Some(prefix.to_vec()),
                true,
                false,
            )
            .await
    }

    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer
            .create_or_open_internal(tr, self.subpath(path), layer.map(<[u8]>::to_vec), None, false, true)
            .await
    }

    async fn move_to(&self, tr: &dyn Transaction, new_absolute_path: &[&str]) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer.move_absolute(tr, &self.path, new_absolute_path).await
    }

    async fn move_directory(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.directory_layer
            .move_internal(tr, self.subpath(old_path), self.subpath(new_path))
            .await
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.directory_layer.remove_internal(tr, self.subpath(path)).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.directory_layer.exists_internal(tr, self.subpath(path)).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        self.directory_layer.list_internal(tr, self.subpath(path)).await
    }

    fn layer(&self) -> &[u8] {
        &self.layer
    }

    fn path(&self) -> &[String] {
        &self.path
    }
}
