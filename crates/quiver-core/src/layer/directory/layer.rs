//! DirectoryLayer - path operations over a node subspace.

use async_trait::async_trait;
use futures::future::BoxFuture;
use quiver_kv_types::RangeOption;
use quiver_layer::Element;
use quiver_layer::Subspace;
use quiver_layer::Tuple;
use quiver_layer::strinc;
use tracing::debug;

use super::Directory;
use super::DirectoryError;
use super::node::Node;
use super::node::NodeInfo;
use super::node::NodeLocation;
use super::output::DirectoryOutput;
use super::partition::DirectoryPartition;
use super::subspace::DirectorySubspace;
use super::to_owned_path;
use super::validation::validate_path;
use crate::config::DirectoryConfig;
use crate::constants::directory::DEFAULT_NODE_PREFIX;
use crate::constants::directory::HCA_KEY;
use crate::constants::directory::LAYER_KEY;
use crate::constants::directory::LAYER_VERSION;
use crate::constants::directory::PARTITION_LAYER;
use crate::constants::directory::SUBDIRS_KEY;
use crate::constants::directory::VERSION_ENCODED_SIZE;
use crate::constants::directory::VERSION_KEY;
use crate::layer::allocator::HighContentionAllocator;
use crate::traits::Transaction;

/// Directory Layer for hierarchical namespace management.
///
/// Identified by a node subspace holding the tree, a content subspace from
/// which prefixes are allocated, and the absolute path of its root (empty
/// except inside partitions). The value holds no state beyond these
/// subspaces and is cheap to clone; construct one and pass it where needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayer {
    pub(super) node_subspace: Subspace,
    pub(super) content_subspace: Subspace,
    pub(super) root_node: Subspace,
    pub(super) allocator: HighContentionAllocator,
    pub(super) allow_manual_prefixes: bool,
    pub(super) path: Vec<String>,
}

/// Outcome of resolving a path against one layer.
enum Resolved {
    /// The path ends in this layer's own tree.
    Local(NodeInfo),
    /// The path continues inside a partition.
    Partition { layer: DirectoryLayer, subpath: Vec<String> },
}

impl Default for DirectoryLayer {
    /// Root layer at the standard node prefix, manual prefixes allowed.
    fn default() -> Self {
        Self::new_root(DEFAULT_NODE_PREFIX)
    }
}

impl DirectoryLayer {
    /// Create a directory layer storing its tree in `node_subspace` and
    /// allocating prefixes from `content_subspace`.
    pub fn new(node_subspace: Subspace, content_subspace: Subspace, allow_manual_prefixes: bool) -> Self {
        let root_node = node_subspace.sub(node_subspace.raw_prefix().to_vec());
        let allocator = HighContentionAllocator::new(&root_node.sub(HCA_KEY));
        Self {
            node_subspace,
            content_subspace,
            root_node,
            allocator,
            allow_manual_prefixes,
            path: Vec::new(),
        }
    }

    /// Root layer whose nodes live under the single byte `node_prefix` and
    /// whose content spans the whole keyspace.
    pub fn new_root(node_prefix: u8) -> Self {
        Self::new(Subspace::from_bytes(vec![node_prefix]), Subspace::all(), true)
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        let mut layer = Self::new_root(config.node_prefix);
        layer.allow_manual_prefixes = config.allow_manual_prefixes;
        layer
    }

    pub(super) fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    pub fn node_subspace(&self) -> &Subspace {
        &self.node_subspace
    }

    pub fn content_subspace(&self) -> &Subspace {
        &self.content_subspace
    }

    pub fn allows_manual_prefixes(&self) -> bool {
        self.allow_manual_prefixes
    }

    /// Path of `path` relative to this layer, given the absolute path `base`
    /// of a directory inside it.
    pub(super) fn partition_subpath(&self, base: &[String], path: &[&str]) -> Vec<String> {
        let mut subpath = base.get(self.path.len()..).unwrap_or_default().to_vec();
        subpath.extend(path.iter().map(|s| s.to_string()));
        subpath
    }

    // -------------------------------------------------------------------------
    // Version
    // -------------------------------------------------------------------------

    fn version_key(&self) -> Vec<u8> {
        self.root_node.pack(&Tuple::new().push(VERSION_KEY))
    }

    /// Verify the stored format version, writing the current one when unset
    /// and `write` is requested.
    async fn check_version(&self, tr: &dyn Transaction, write: bool) -> Result<(), DirectoryError> {
        let key = self.version_key();
        let Some(stored) = tr.get(&key, false).await? else {
            if write {
                tr.set(&key, &encode_version(LAYER_VERSION));
                debug!(path = ?self.path, "initialized directory layer version");
            }
            return Ok(());
        };

        let (major, minor, micro) = decode_version(&stored)?;
        if major > LAYER_VERSION.0 {
            return Err(DirectoryError::IncompatibleVersion {
                stored: format!("{major}.{minor}.{micro}"),
            });
        }
        if minor > LAYER_VERSION.1 && write {
            return Err(DirectoryError::ReadOnlyVersion {
                stored: format!("{major}.{minor}.{micro}"),
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Node Resolution
    // -------------------------------------------------------------------------

    fn location_for(&self, prefix: Vec<u8>) -> NodeLocation {
        NodeLocation {
            subspace: self.node_subspace.sub(prefix.clone()),
            prefix,
        }
    }

    fn root_location(&self) -> NodeLocation {
        NodeLocation {
            prefix: self.node_subspace.raw_prefix().to_vec(),
            subspace: self.root_node.clone(),
        }
    }

    /// Walk `path` one child pointer at a time, stopping early at a missing
    /// node or at a partition.
    async fn find(&self, tr: &dyn Transaction, path: &[String]) -> Result<NodeInfo, DirectoryError> {
        let mut info = Node::new(Some(self.root_location()), Vec::new(), path.to_vec())
            .fetch_metadata(tr)
            .await?;

        for (depth, segment) in path.iter().enumerate() {
            let Some(current) = info.location() else {
                break;
            };
            let pointer = current.subspace.pack(&subdir_key(segment));
            let child = tr.get(&pointer, false).await?.map(|prefix| self.location_for(prefix));

            info = Node::new(child, path[..=depth].to_vec(), path.to_vec()).fetch_metadata(tr).await?;
            if !info.exists() || info.is_partition() {
                break;
            }
        }

        Ok(info)
    }

    /// Resolve `path`, handing over to a partition's layer when the path
    /// continues below one.
    async fn resolve(
        &self,
        tr: &dyn Transaction,
        path: &[String],
        include_empty_subpath: bool,
    ) -> Result<Resolved, DirectoryError> {
        let info = self.find(tr, path).await?;
        if info.is_in_partition(include_empty_subpath)
            && let Some(location) = info.location()
        {
            return Ok(Resolved::Partition {
                layer: DirectoryPartition::inner_layer(self.absolute(info.path()), &location.prefix),
                subpath: info.partition_subpath(),
            });
        }
        Ok(Resolved::Local(info))
    }

    /// Build the handle for the node at `location`, `path` being relative to
    /// this layer.
    fn contents_of_node(&self, location: &NodeLocation, path: &[String], layer: Vec<u8>) -> DirectoryOutput {
        let mut full_path = self.path.clone();
        full_path.extend_from_slice(path);

        if layer == PARTITION_LAYER {
            DirectoryOutput::Partition(DirectoryPartition::new(full_path, location.prefix.clone(), self.clone()))
        } else {
            DirectoryOutput::Subspace(DirectorySubspace::new(
                Subspace::from_bytes(location.prefix.clone()),
                self.clone(),
                full_path,
                layer,
            ))
        }
    }

    /// Child names and locations of a node, in key order.
    async fn subdirs(
        &self,
        tr: &dyn Transaction,
        location: &NodeLocation,
    ) -> Result<Vec<(String, NodeLocation)>, DirectoryError> {
        let subdirs = location.subspace.sub(SUBDIRS_KEY);
        let mut children = Vec::new();
        for kv in tr.get_range(&RangeOption::from(&subdirs)).await? {
            let name = subdirs
                .unpack(&kv.key)?
                .into_iter()
                .next()
                .and_then(Element::into_string)
                .ok_or_else(|| DirectoryError::CorruptedMetadata {
                    reason: "subdirectory key does not name a child".to_string(),
                })?;
            children.push((name, self.location_for(kv.value)));
        }
        Ok(children)
    }

    // -------------------------------------------------------------------------
    // Prefix Ownership
    // -------------------------------------------------------------------------

    /// Node whose prefix is a prefix of `key`, if any.
    async fn node_containing_key(
        &self,
        tr: &dyn Transaction,
        key: &[u8],
        snapshot: bool,
    ) -> Result<Option<NodeLocation>, DirectoryError> {
        if key.starts_with(self.node_subspace.raw_prefix()) {
            return Ok(Some(self.root_location()));
        }

        let begin = self.node_subspace.range().0;
        let mut end = self.node_subspace.pack(&Tuple::new().push(key));
        end.push(0x00);
        let mut range = RangeOption::from_keys(begin, end).with_limit(1).reversed();
        if snapshot {
            range = range.snapshot();
        }

        let Some(kv) = tr.get_range(&range).await?.into_iter().next() else {
            return Ok(None);
        };
        let previous = self
            .node_subspace
            .unpack(&kv.key)?
            .into_iter()
            .next()
            .and_then(Element::into_bytes)
            .ok_or_else(|| DirectoryError::CorruptedMetadata {
                reason: "node key does not start with a prefix".to_string(),
            })?;

        if key.starts_with(&previous) {
            return Ok(Some(self.location_for(previous)));
        }
        Ok(None)
    }

    /// Whether no directory owns `prefix`, is owned by it, or shares keys
    /// with it.
    ///
    /// A `snapshot` check reads without conflicts and instead adds explicit
    /// read conflict ranges over every node key that could own or overlap
    /// `prefix`, so a concurrent creator of such a node still conflicts.
    async fn is_prefix_free(&self, tr: &dyn Transaction, prefix: &[u8], snapshot: bool) -> Result<bool, DirectoryError> {
        if prefix.is_empty() {
            return Ok(false);
        }
        if self.node_containing_key(tr, prefix, snapshot).await?.is_some() {
            return Ok(false);
        }

        let prefix_end = strinc(prefix).ok_or_else(|| DirectoryError::InvalidPrefix {
            prefix: prefix.to_vec(),
        })?;
        let begin = self.node_subspace.pack(&Tuple::new().push(prefix));
        let end = self.node_subspace.pack(&Tuple::new().push(prefix_end));
        let mut range = RangeOption::from_keys(begin.clone(), end.clone()).with_limit(1);

        if snapshot {
            range = range.snapshot();
            tr.add_read_conflict_range(&begin, &end)?;
            for len in 1..prefix.len() {
                let owner = self.node_subspace.pack(&Tuple::new().push(&prefix[..len]));
                if let Some(owner_end) = strinc(&owner) {
                    tr.add_read_conflict_range(&owner, &owner_end)?;
                }
            }
        }

        Ok(tr.get_range(&range).await?.is_empty())
    }

    async fn allocate_prefix(&self, tr: &dyn Transaction) -> Result<Vec<u8>, DirectoryError> {
        let allocated = self.allocator.allocate(tr).await?;
        let mut prefix = self.content_subspace.raw_prefix().to_vec();
        prefix.extend_from_slice(&allocated);

        let (begin, end) = prefix_range(&prefix)?;
        let existing = tr.get_range(&RangeOption::from_keys(begin, end).with_limit(1)).await?;
        if !existing.is_empty() {
            return Err(DirectoryError::PrefixNotEmpty { prefix });
        }
        if !self.is_prefix_free(tr, &prefix, true).await? {
            return Err(DirectoryError::AllocatorPrefixConflict { prefix });
        }
        Ok(prefix)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    pub(super) fn create_or_open_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: Vec<String>,
        layer: Option<Vec<u8>>,
        prefix: Option<Vec<u8>>,
        allow_create: bool,
        allow_open: bool,
    ) -> BoxFuture<'a, Result<DirectoryOutput, DirectoryError>> {
        Box::pin(async move {
            self.check_version(tr, false).await?;

            if prefix.is_some() && !self.allow_manual_prefixes {
                return Err(if self.path.is_empty() {
                    DirectoryError::ManualPrefixesDisabled
                } else {
                    DirectoryError::PrefixInPartition
                });
            }
            if path.is_empty() {
                return Err(DirectoryError::CannotOpenRoot);
            }
            validate_path(&path)?;

            let existing = match self.resolve(tr, &path, false).await? {
                Resolved::Partition { layer: inner, subpath } => {
                    return inner.create_or_open_internal(tr, subpath, layer, prefix, allow_create, allow_open).await;
                }
                Resolved::Local(info) => info,
            };

            if let Some(location) = existing.location() {
                if !allow_open {
                    return Err(DirectoryError::AlreadyExists {
                        path: self.absolute(&path),
                    });
                }
                if let Some(expected) = layer.filter(|l| !l.is_empty())
                    && expected != existing.layer()
                {
                    return Err(DirectoryError::IncompatibleLayer {
                        path: self.absolute(&path),
                        expected,
                        actual: existing.layer().to_vec(),
                    });
                }
                return Ok(self.contents_of_node(location, &path, existing.layer().to_vec()));
            }

            if !allow_create {
                return Err(DirectoryError::NotFound {
                    path: self.absolute(&path),
                });
            }
            self.check_version(tr, true).await?;

            let prefix = match prefix {
                Some(prefix) => {
                    if !self.is_prefix_free(tr, &prefix, false).await? {
                        return Err(DirectoryError::PrefixInUse { prefix });
                    }
                    prefix
                }
                None => self.allocate_prefix(tr).await?,
            };

            let (parent_path, name) = path.split_at(path.len() - 1);
            let parent = if parent_path.is_empty() {
                self.root_node.clone()
            } else {
                let parent = self
                    .create_or_open_internal(tr, parent_path.to_vec(), None, None, true, true)
                    .await?;
                self.node_subspace.sub(parent.raw_prefix().to_vec())
            };

            let node = self.location_for(prefix.clone());
            let layer = layer.unwrap_or_default();
            tr.set(&parent.pack(&subdir_key(&name[0])), &prefix);
            tr.set(&node.subspace.pack(&Tuple::new().push(LAYER_KEY)), &layer);
            debug!(path = ?self.absolute(&path), prefix = ?prefix, "created directory");

            Ok(self.contents_of_node(&node, &path, layer))
        })
    }

    pub(super) fn move_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        old_path: Vec<String>,
        new_path: Vec<String>,
    ) -> BoxFuture<'a, Result<DirectoryOutput, DirectoryError>> {
        Box::pin(async move {
            self.check_version(tr, true).await?;

            if old_path.is_empty() {
                return Err(DirectoryError::CannotMoveRoot);
            }
            validate_path(&old_path)?;
            validate_path(&new_path)?;
            if new_path.starts_with(&old_path) {
                return Err(DirectoryError::MoveCycle);
            }

            let old_node = self.find(tr, &old_path).await?;
            let new_node = self.find(tr, &new_path).await?;

            let Some(old_location) = old_node.location() else {
                return Err(DirectoryError::NotFound {
                    path: self.absolute(&old_path),
                });
            };

            let old_in_partition = old_node.is_in_partition(false);
            let new_in_partition = new_node.is_in_partition(false);
            if old_in_partition || new_in_partition {
                if !old_in_partition || !new_in_partition || old_node.path() != new_node.path() {
                    return Err(DirectoryError::CannotMoveBetweenPartitions);
                }
                let inner = DirectoryPartition::inner_layer(self.absolute(new_node.path()), &old_location.prefix);
                return inner
                    .move_internal(tr, old_node.partition_subpath(), new_node.partition_subpath())
                    .await;
            }

            if new_node.exists() {
                return Err(DirectoryError::AlreadyExists {
                    path: self.absolute(&new_path),
                });
            }

            let (parent_path, name) = new_path.split_at(new_path.len() - 1);
            let parent = self.find(tr, parent_path).await?;
            let Some(parent_location) = parent.location() else {
                return Err(DirectoryError::ParentNotFound {
                    path: self.absolute(&new_path),
                });
            };

            tr.set(&parent_location.subspace.pack(&subdir_key(&name[0])), &old_location.prefix);
            self.remove_from_parent(tr, &old_path).await?;
            debug!(from = ?self.absolute(&old_path), to = ?self.absolute(&new_path), "moved directory");

            Ok(self.contents_of_node(old_location, &new_path, old_node.layer().to_vec()))
        })
    }

    pub(super) fn remove_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: Vec<String>,
    ) -> BoxFuture<'a, Result<bool, DirectoryError>> {
        Box::pin(async move {
            self.check_version(tr, true).await?;

            if path.is_empty() {
                return Err(DirectoryError::CannotRemoveRoot);
            }
            validate_path(&path)?;

            let node = match self.resolve(tr, &path, false).await? {
                Resolved::Partition { layer, subpath } => return layer.remove_internal(tr, subpath).await,
                Resolved::Local(info) => info,
            };
            let Some(location) = node.location() else {
                return Ok(false);
            };

            self.remove_recursive(tr, location.clone()).await?;
            self.remove_from_parent(tr, &path).await?;
            debug!(path = ?self.absolute(&path), "removed directory");
            Ok(true)
        })
    }

    pub(super) fn list_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: Vec<String>,
    ) -> BoxFuture<'a, Result<Vec<String>, DirectoryError>> {
        Box::pin(async move {
            self.check_version(tr, false).await?;
            validate_path(&path)?;

            let node = match self.resolve(tr, &path, true).await? {
                Resolved::Partition { layer, subpath } => return layer.list_internal(tr, subpath).await,
                Resolved::Local(info) => info,
            };
            let Some(location) = node.location() else {
                return Err(DirectoryError::NotFound {
                    path: self.absolute(&path),
                });
            };

            Ok(self.subdirs(tr, location).await?.into_iter().map(|(name, _)| name).collect())
        })
    }

    pub(super) fn exists_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: Vec<String>,
    ) -> BoxFuture<'a, Result<bool, DirectoryError>> {
        Box::pin(async move {
            self.check_version(tr, false).await?;
            validate_path(&path)?;

            match self.resolve(tr, &path, false).await? {
                Resolved::Partition { layer, subpath } => layer.exists_internal(tr, subpath).await,
                Resolved::Local(info) => Ok(info.exists()),
            }
        })
    }

    /// Move a directory addressed by the absolute `path` to the absolute
    /// `new_absolute_path`; both must lie below this layer's root.
    pub(super) async fn move_absolute(
        &self,
        tr: &dyn Transaction,
        path: &[String],
        new_absolute_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError> {
        let new_absolute_path = to_owned_path(new_absolute_path);
        if !new_absolute_path.starts_with(&self.path) || !path.starts_with(&self.path) {
            return Err(DirectoryError::CannotMoveBetweenPartitions);
        }
        let root_len = self.path.len();
        self.move_internal(tr, path[root_len..].to_vec(), new_absolute_path[root_len..].to_vec())
            .await
    }

    /// Clear a node's subtree depth first: child nodes, then this node's
    /// content range and metadata.
    fn remove_recursive<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        location: NodeLocation,
    ) -> BoxFuture<'a, Result<(), DirectoryError>> {
        Box::pin(async move {
            for (_, child) in self.subdirs(tr, &location).await? {
                self.remove_recursive(tr, child).await?;
            }

            let (begin, end) = prefix_range(&location.prefix)?;
            tr.clear_range(&begin, &end);
            let (begin, end) = location.subspace.range();
            tr.clear_range(&begin, &end);
            Ok(())
        })
    }

    async fn remove_from_parent(&self, tr: &dyn Transaction, path: &[String]) -> Result<(), DirectoryError> {
        let Some((name, parent_path)) = path.split_last() else {
            return Ok(());
        };
        let parent = self.find(tr, parent_path).await?;
        if let Some(location) = parent.location() {
            tr.clear(&location.subspace.pack(&subdir_key(name)));
        }
        Ok(())
    }

    fn absolute(&self, path: &[String]) -> Vec<String> {
        let mut full = self.path.clone();
        full.extend_from_slice(path);
        full
    }
}

#[async_trait]
impl Directory for DirectoryLayer {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.create_or_open_internal(tr, to_owned_path(path), layer.map(<[u8]>::to_vec), None, true, true)
            .await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.create_or_open_internal(tr, to_owned_path(path), layer.map(<[u8]>::to_vec), None, true, false)
            .await
    }

    async fn create_prefix(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&[u8]>,
        prefix: &[u8],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.create_or_open_internal(
            tr,
            to_owned_path(path),
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
        self.create_or_open_internal(tr, to_owned_path(path), layer.map(<[u8]>::to_vec), None, false, true)
            .await
    }

    async fn move_to(&self, _tr: &dyn Transaction, _new_absolute_path: &[&str]) -> Result<DirectoryOutput, DirectoryError> {
        Err(DirectoryError::CannotMoveRoot)
    }

    async fn move_directory(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectoryOutput, DirectoryError> {
        self.move_internal(tr, to_owned_path(old_path), to_owned_path(new_path)).await
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.remove_internal(tr, to_owned_path(path)).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        self.exists_internal(tr, to_owned_path(path)).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        self.list_internal(tr, to_owned_path(path)).await
    }

    fn layer(&self) -> &[u8] {
        &[]
    }

    fn path(&self) -> &[String] {
        &self.path
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn subdir_key(name: &str) -> Tuple {
    Tuple::new().push(SUBDIRS_KEY).push(name)
}

/// Every key starting with `prefix`: `[prefix, strinc(prefix))`.
fn prefix_range(prefix: &[u8]) -> Result<(Vec<u8>, Vec<u8>), DirectoryError> {
    let end = strinc(prefix).ok_or_else(|| DirectoryError::InvalidPrefix {
        prefix: prefix.to_vec(),
    })?;
    Ok((prefix.to_vec(), end))
}

/// Three little-endian `i32`s: major, minor, micro.
fn encode_version((major, minor, micro): (i32, i32, i32)) -> Vec<u8> {
    let mut buf = Vec::with_capacity(VERSION_ENCODED_SIZE);
    buf.extend_from_slice(&major.to_le_bytes());
    buf.extend_from_slice(&minor.to_le_bytes());
    buf.extend_from_slice(&micro.to_le_bytes());
    buf
}

fn decode_version(bytes: &[u8]) -> Result<(i32, i32, i32), DirectoryError> {
    let corrupted = || DirectoryError::CorruptedMetadata {
        reason: format!("version value has {} bytes, expected {VERSION_ENCODED_SIZE}", bytes.len()),
    };
    if bytes.len() != VERSION_ENCODED_SIZE {
        return Err(corrupted());
    }
    let field = |i: usize| -> Result<i32, DirectoryError> {
        let chunk: [u8; 4] = bytes[i * 4..i * 4 + 4].try_into().map_err(|_| corrupted())?;
        Ok(i32::from_le_bytes(chunk))
    };
    Ok((field(0)?, field(1)?, field(2)?))
}
